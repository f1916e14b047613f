use super::{FilterMode, SamplerConfig};

/// The mip level pair a sample reads from, with the blend between them.
/// `level_lo == level_hi` and `blend == 0` whenever only one level is in play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MipSpan {
    pub level_lo: u32,
    pub level_hi: u32,
    pub blend: f64,
}

impl MipSpan {
    pub const fn single(level: u32) -> Self {
        Self { level_lo: level, level_hi: level, blend: 0.0 }
    }

    pub fn is_single(&self) -> bool {
        self.level_lo == self.level_hi
    }
}

/// Split a fractional level into the span the mipmap filter reads.
fn split(level: f64, mipmap_filter: FilterMode, mip_count: u32) -> MipSpan {
    let max = (mip_count - 1) as f64;
    let level = level.clamp(0.0, max);
    match mipmap_filter {
        FilterMode::Nearest => MipSpan::single(level.round().min(max) as u32),
        FilterMode::Linear => {
            let lo = level.floor();
            let blend = level - lo;
            if blend == 0.0 {
                MipSpan::single(lo as u32)
            } else {
                MipSpan { level_lo: lo as u32, level_hi: (lo as u32 + 1).min(mip_count - 1), blend }
            }
        }
    }
}

/// Select levels for an explicitly requested (possibly fractional) level, as
/// used by the explicit-level sampling builtin. A fractional request with a
/// linear mipmap filter blends between the two surrounding levels; the
/// nearest filter snaps to one.
pub fn select_explicit(level: f64, mipmap_filter: FilterMode, mip_count: u32) -> MipSpan {
    split(level, mipmap_filter, mip_count)
}

/// Level of detail from screen-space coordinate derivatives, scaled by the
/// level-0 texel extents. Degenerate (zero) derivatives produce -inf, which
/// the lod clamps pull back into range.
pub fn lod_from_derivatives(ddx: [f64; 3], ddy: [f64; 3], extents: [u32; 3], filter_w: bool) -> f64 {
    let axes = if filter_w { 3 } else { 2 };
    let mut rho = 0.0f64;
    for i in 0..axes {
        let d = ddx[i].abs().max(ddy[i].abs()) * extents[i] as f64;
        rho = rho.max(d);
    }
    rho.log2()
}

/// Clamp a raw lod by the sampler's lod clamps, then split per the mipmap
/// filter.
pub fn select_for_lod(lod: f64, config: &SamplerConfig, mip_count: u32) -> MipSpan {
    let lod = lod.clamp(config.lod_min_clamp as f64, config.lod_max_clamp as f64);
    split(lod, config.mipmap_filter, mip_count)
}

/// Magnification uses the mag filter, minification the min filter.
pub fn filter_for_lod(lod: f64, config: &SamplerConfig) -> FilterMode {
    if lod <= 0.0 { config.mag_filter } else { config.min_filter }
}
