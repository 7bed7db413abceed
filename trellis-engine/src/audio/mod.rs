mod pcm;
mod playback;
mod segmenter;
mod utterance;
mod wav;

pub use pcm::*;
pub use playback::*;
pub use segmenter::*;
pub use utterance::*;
pub use wav::*;
