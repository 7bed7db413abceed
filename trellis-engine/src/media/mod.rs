mod local_media;
mod router;
mod source;

pub use local_media::*;
pub use router::*;
pub use source::*;
