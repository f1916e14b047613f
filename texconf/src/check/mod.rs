pub mod cases;
pub mod tolerance;
pub mod verify;

pub use cases::*;
pub use tolerance::*;
pub use verify::*;
