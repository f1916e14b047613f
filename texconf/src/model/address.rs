/// Rule for mapping an out-of-range texel coordinate back into `[0, extent)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    ClampToEdge,
    Repeat,
    MirrorRepeat,
}

/// Map an arbitrary integer texel coordinate into `[0, extent)`.
///
/// Applied independently per axis. Total over all finite input: coordinates
/// already in range come back unchanged for every mode.
pub fn resolve(mode: AddressMode, coord: i64, extent: u32) -> u32 {
    debug_assert!(extent > 0);
    let e = extent as i64;
    let resolved = match mode {
        AddressMode::ClampToEdge => coord.clamp(0, e - 1),
        AddressMode::Repeat => coord.rem_euclid(e),
        AddressMode::MirrorRepeat => {
            // Reflect with period 2*extent: forward half maps straight
            // through, backward half mirrors.
            let p = coord.rem_euclid(2 * e);
            if p < e { p } else { 2 * e - 1 - p }
        }
    };
    resolved as u32
}
