mod channel;
mod translator;

pub use channel::*;
pub use translator::*;
