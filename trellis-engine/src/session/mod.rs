mod candidate_queue;
mod directory;
mod glare;
mod negotiation;
mod peer_session;

pub use candidate_queue::*;
pub use directory::*;
pub use glare::*;
pub use negotiation::*;
pub use peer_session::*;
