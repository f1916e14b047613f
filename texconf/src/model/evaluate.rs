use super::{
    AddressMode, FilterMode, LevelSample, MipSpan, SamplerConfig, Texel, Texture, TextureDimension,
    filter_for_lod, lod_from_derivatives, sample_level, select_explicit, select_for_lod,
};
use crate::error::Error;
use arrayvec::ArrayVec;

/// How the level to sample is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelSelect {
    /// Level 0, no mip selection.
    Base,
    /// Explicitly requested, possibly fractional, level.
    Explicit(f32),
    /// Screen-space derivatives of the coordinate, one pair per axis.
    Derivatives { ddx: [f32; 3], ddy: [f32; 3] },
}

/// Sampling path variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleMode {
    Standard,
    /// The external-source path: always level 0, and every axis forced to
    /// clamp-to-edge no matter what the sampler config says.
    BaseClampToEdge,
}

/// One sample to evaluate. Requests are independent of each other: evaluating
/// them in any order, or in parallel, yields identical results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRequest {
    pub coords: [f32; 3],
    pub array_index: Option<i32>,
    pub level: LevelSelect,
    pub offset: Option<[i32; 3]>,
    pub mode: SampleMode,
}

impl SampleRequest {
    pub fn at(u: f32, v: f32) -> Self {
        Self {
            coords: [u, v, 0.0],
            array_index: None,
            level: LevelSelect::Base,
            offset: None,
            mode: SampleMode::Standard,
        }
    }

    pub fn at_3d(u: f32, v: f32, w: f32) -> Self {
        Self { coords: [u, v, w], ..Self::at(u, v) }
    }

    /// The clamp-to-edge-only base variant used by external-texture builtins.
    pub fn base_clamp_to_edge(u: f32, v: f32) -> Self {
        Self { mode: SampleMode::BaseClampToEdge, ..Self::at(u, v) }
    }

    pub fn with_level(mut self, level: f32) -> Self {
        self.level = LevelSelect::Explicit(level);
        self
    }

    pub fn with_derivatives(mut self, ddx: [f32; 3], ddy: [f32; 3]) -> Self {
        self.level = LevelSelect::Derivatives { ddx, ddy };
        self
    }

    pub fn with_array_index(mut self, index: i32) -> Self {
        self.array_index = Some(index);
        self
    }

    pub fn with_offset(mut self, offset: [i32; 3]) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Expected color for one request, plus everything needed to explain it: the
/// level span and the tap neighborhood of each sampled level.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub value: Texel,
    pub span: MipSpan,
    pub levels: ArrayVec<LevelSample, 2>,
}

/// Compute the expected sampled color for one request.
///
/// Pure and deterministic: identical inputs always produce the identical
/// expected value.
pub fn evaluate(texture: &Texture, config: &SamplerConfig, request: &SampleRequest) -> Result<Evaluation, Error> {
    let config = match request.mode {
        SampleMode::Standard => *config,
        SampleMode::BaseClampToEdge => config.with_address_modes(AddressMode::ClampToEdge),
    };

    let mip0 = texture.mip(0)?;
    let (span, lod) = match (request.mode, request.level) {
        (SampleMode::BaseClampToEdge, _) | (_, LevelSelect::Base) => (MipSpan::single(0), 0.0),
        (_, LevelSelect::Explicit(level)) => {
            (select_explicit(level as f64, config.mipmap_filter, texture.mip_count()), level as f64)
        }
        (_, LevelSelect::Derivatives { ddx, ddy }) => {
            let lod = lod_from_derivatives(
                [ddx[0] as f64, ddx[1] as f64, ddx[2] as f64],
                [ddy[0] as f64, ddy[1] as f64, ddy[2] as f64],
                [mip0.width, mip0.height, mip0.depth],
                texture.dimension() == TextureDimension::D3,
            );
            (select_for_lod(lod, &config, texture.mip_count()), lod)
        }
    };

    let filter = filter_for_lod(lod, &config);
    let coords = [request.coords[0] as f64, request.coords[1] as f64, request.coords[2] as f64];
    let offset = request.offset.map_or([0i64; 3], |o| [o[0] as i64, o[1] as i64, o[2] as i64]);

    let mut levels = ArrayVec::new();
    let lo = sample_level(texture, span.level_lo, coords, request.array_index, offset, &config, filter)?;
    let mut value = lo.value;
    levels.push(lo);
    if !span.is_single() {
        let hi = sample_level(texture, span.level_hi, coords, request.array_index, offset, &config, filter)?;
        value = value * (1.0 - span.blend) + hi.value * span.blend;
        levels.push(hi);
    }

    Ok(Evaluation { value, span, levels })
}
