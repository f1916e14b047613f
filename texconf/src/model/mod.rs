pub mod address;
pub mod evaluate;
pub mod format;
pub mod lod;
pub mod sampler;
pub mod texel;
pub mod texture;

pub use address::*;
pub use evaluate::*;
pub use format::*;
pub use lod::*;
pub use sampler::*;
pub use texel::*;
pub use texture::*;
