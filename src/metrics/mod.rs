pub mod filler;
pub mod text;

pub use filler::*;
pub use text::*;
