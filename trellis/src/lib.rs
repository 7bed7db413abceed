pub use trellis_core::PeerId;

pub mod model {
    pub use trellis_core::model::*;
}

#[cfg(feature = "engine")]
pub mod engine {
    pub use trellis_engine::*;
}
