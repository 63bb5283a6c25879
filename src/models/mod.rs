pub mod criterion;
pub mod number;
pub mod result;
pub mod transcript;

pub use criterion::*;
pub use number::*;
pub use result::*;
pub use transcript::*;
