use thiserror::Error;

/// Failures of the reference model itself or of its inputs.
///
/// An actual sampled value landing outside its tolerance range is *not* an
/// error — that is the normal outcome of a failing conformance test and is
/// reported per sample via [`crate::check::Verdict`]. These variants mean the
/// model or the batch inputs are broken, and they abort the whole batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A resolved texel coordinate fell outside the mip level it targets.
    /// Coordinates handed to the texel store must already be in range; this
    /// indicates a defect in address resolution, not in the system under test.
    #[error("texel ({x}, {y}, {z}) out of range for level {level} ({width}x{height}x{depth})")]
    OutOfRange { level: u32, x: u32, y: u32, z: u32, width: u32, height: u32, depth: u32 },

    /// A mip level index fell outside the texture's level count.
    #[error("mip level {level} out of range, texture has {count} levels")]
    LevelOutOfRange { level: u32, count: u32 },

    /// A texture, sampler or request combination is structurally invalid.
    #[error("malformed input: {0}")]
    MalformedInput(String),
}
