use super::{AddressMode, Texel, Texture, TextureDimension, resolve};
use crate::error::Error;
use arrayvec::ArrayVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
}

/// Immutable sampler state shared read-only by every evaluation in a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerConfig {
    pub address_mode_u: AddressMode,
    pub address_mode_v: AddressMode,
    pub address_mode_w: AddressMode,
    pub mag_filter: FilterMode,
    pub min_filter: FilterMode,
    pub mipmap_filter: FilterMode,
    pub lod_min_clamp: f32,
    pub lod_max_clamp: f32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            address_mode_w: AddressMode::ClampToEdge,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            mipmap_filter: FilterMode::Linear,
            lod_min_clamp: 0.0,
            lod_max_clamp: 32.0,
        }
    }
}

impl SamplerConfig {
    pub fn nearest() -> Self {
        Self {
            mag_filter: FilterMode::Nearest,
            min_filter: FilterMode::Nearest,
            mipmap_filter: FilterMode::Nearest,
            ..Self::default()
        }
    }

    pub fn with_address_modes(mut self, mode: AddressMode) -> Self {
        self.address_mode_u = mode;
        self.address_mode_v = mode;
        self.address_mode_w = mode;
        self
    }
}

/// One gathered texel: resolved in-range coordinates plus its blend weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub weight: f64,
}

/// Result of filtering one mip level: the blended value and the neighborhood
/// that produced it, kept for failure diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSample {
    pub level: u32,
    pub value: Texel,
    pub taps: ArrayVec<Tap, 8>,
}

// Per-axis tap candidates: (unresolved texel coordinate, weight). Nearest
// produces one, linear up to two.
type AxisTaps = ArrayVec<(i64, f64), 2>;

fn axis_taps(texel_coord: f64, filter: FilterMode) -> AxisTaps {
    let mut taps = AxisTaps::new();
    match filter {
        FilterMode::Nearest => {
            // Round half away from zero, the specification's rounding rule.
            taps.push((texel_coord.round() as i64, 1.0));
        }
        FilterMode::Linear => {
            let base = texel_coord.floor();
            let frac = texel_coord - base;
            if frac < 1.0 {
                taps.push((base as i64, 1.0 - frac));
            }
            if frac > 0.0 {
                taps.push((base as i64 + 1, frac));
            }
        }
    }
    taps
}

/// Filter one mip level of a texture at a normalized coordinate.
///
/// `coords` are normalized to `[0, 1]` over the level's extents (out-of-range
/// values are legal and handled by the address modes). `offset` shifts the
/// texel-space coordinate before address resolution. Total over all finite
/// coordinates; an extent-1 axis degenerates to index 0 without dividing.
pub fn sample_level(
    texture: &Texture,
    level: u32,
    coords: [f64; 3],
    array_index: Option<i32>,
    offset: [i64; 3],
    config: &SamplerConfig,
    filter: FilterMode,
) -> Result<LevelSample, Error> {
    let mip = texture.mip(level)?;

    let u = axis_taps(coords[0] * mip.width as f64 - 0.5 + offset[0] as f64, filter);
    let v = axis_taps(coords[1] * mip.height as f64 - 0.5 + offset[1] as f64, filter);
    let w: AxisTaps = match texture.dimension() {
        TextureDimension::D2 => {
            let mut taps = AxisTaps::new();
            taps.push((0, 1.0));
            taps
        }
        TextureDimension::D2Array => {
            // Array layers are selected, never filtered: clamp the index.
            let layer = array_index.unwrap_or(0).clamp(0, mip.depth as i32 - 1) as i64;
            let mut taps = AxisTaps::new();
            taps.push((layer, 1.0));
            taps
        }
        TextureDimension::D3 => axis_taps(coords[2] * mip.depth as f64 - 0.5 + offset[2] as f64, filter),
    };

    let w_is_layer = texture.dimension() != TextureDimension::D3;
    let mut out = LevelSample { level, value: Texel::ZERO, taps: ArrayVec::new() };
    for &(wz, weight_z) in &w {
        for &(wy, weight_y) in &v {
            for &(wx, weight_x) in &u {
                let weight = weight_x * weight_y * weight_z;
                let tap = Tap {
                    x: resolve(config.address_mode_u, wx, mip.width),
                    y: resolve(config.address_mode_v, wy, mip.height),
                    z: if w_is_layer { wz as u32 } else { resolve(config.address_mode_w, wz, mip.depth) },
                    weight,
                };
                out.value = out.value + texture.read_texel(level, tap.x, tap.y, tap.z)? * weight;
                out.taps.push(tap);
            }
        }
    }
    Ok(out)
}
