mod audio;
mod engine;
mod error;
mod media;
mod session;
mod signaling;
mod translate;
mod transport;

pub use audio::*;
pub use engine::*;
pub use error::*;
pub use media::*;
pub use session::*;
pub use signaling::*;
pub use translate::*;
pub use transport::*;
