pub mod bands;
pub mod engine;

pub use bands::*;
pub use engine::*;
