use crate::error::Error;
use crate::model::{Evaluation, LevelSelect, SampleRequest, SamplerConfig, Texel, Texture, evaluate};

/// Per-component acceptable interval for one sample. Never empty, and always
/// contains the point expectation it was widened from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedRange {
    pub lo: Texel,
    pub hi: Texel,
}

impl ExpectedRange {
    pub fn point(value: Texel) -> Self {
        Self { lo: value, hi: value }
    }

    /// Grow the range to include another observed value.
    pub fn include(&mut self, value: Texel) {
        self.lo = self.lo.component_min(value);
        self.hi = self.hi.component_max(value);
    }

    /// Grow every component's interval outward by a per-component amount.
    pub fn widen(&mut self, slack: [f64; 4]) {
        for i in 0..4 {
            self.lo.components[i] -= slack[i];
            self.hi.components[i] += slack[i];
        }
    }

    pub fn contains(&self, value: Texel) -> bool {
        (0..4).all(|i| {
            value.components[i] >= self.lo.components[i] && value.components[i] <= self.hi.components[i]
        })
    }
}

/// Turns a point expectation into the interval a conforming implementation may
/// legitimately produce.
///
/// Three widenings stack, per the conformance rules this models:
/// 1. a coordinate-perturbation envelope, which captures the discontinuities
///    where sub-ulp coordinate differences legally flip to an adjacent texel
///    (texel-center rounding for nearest filtering, wrap boundaries for
///    repeat/mirror addressing, mip switch points for explicit fractional
///    levels);
/// 2. half a quantization step of the storage format, propagated through the
///    unit-sum filter weights;
/// 3. slack for fixed-point filter-weight resolution plus an absolute epsilon
///    for accumulation error.
///
/// The epsilon magnitudes are implementation-defined by real drivers, so they
/// are configurable constants tuned against observed behavior, not hard
/// invariants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceModel {
    /// Coordinate perturbation in texels applied per axis for the envelope.
    pub coord_epsilon: f64,
    /// Perturbation applied to explicit fractional mip levels.
    pub lod_epsilon: f64,
    /// Resolution of the hardware's fixed-point filter weights.
    pub weight_quantum: f64,
    /// Absolute slack for floating accumulation in filtering and mip blends.
    pub abs_epsilon: f64,
}

impl Default for ToleranceModel {
    fn default() -> Self {
        Self {
            coord_epsilon: 1.0 / 512.0,
            lod_epsilon: 1.0 / 256.0,
            // Common hardware filters with 8 fractional weight bits.
            weight_quantum: 1.0 / 256.0,
            abs_epsilon: 1.0e-6,
        }
    }
}

impl ToleranceModel {
    /// Exact comparison: no widening beyond the envelope degenerating to the
    /// point expectation. Useful when checking the model against itself.
    pub fn exact() -> Self {
        Self { coord_epsilon: 0.0, lod_epsilon: 0.0, weight_quantum: 0.0, abs_epsilon: 0.0 }
    }

    /// Widen `evaluation`'s point expectation into the acceptable range for
    /// `request`.
    pub fn expected_range(
        &self,
        texture: &Texture,
        config: &SamplerConfig,
        request: &SampleRequest,
        evaluation: &Evaluation,
    ) -> Result<ExpectedRange, Error> {
        let mut range = ExpectedRange::point(evaluation.value);

        // Discontinuity envelope: re-evaluate with each coordinate axis
        // nudged both ways by a fraction of a texel.
        if self.coord_epsilon > 0.0 {
            let mip = texture.mip(evaluation.span.level_lo)?;
            let extents = [mip.width, mip.height, mip.depth];
            for axis in 0..3 {
                let delta = (self.coord_epsilon / extents[axis] as f64) as f32;
                for sign in [-1.0f32, 1.0] {
                    let mut nudged = *request;
                    nudged.coords[axis] += sign * delta;
                    range.include(evaluate(texture, config, &nudged)?.value);
                }
            }
        }
        if self.lod_epsilon > 0.0
            && let LevelSelect::Explicit(level) = request.level
        {
            for sign in [-1.0f32, 1.0] {
                let mut nudged = *request;
                nudged.level = LevelSelect::Explicit(level + sign * self.lod_epsilon as f32);
                range.include(evaluate(texture, config, &nudged)?.value);
            }
        }

        let format = texture.format();
        let filtering = !evaluation.span.is_single() || evaluation.levels.iter().any(|l| l.taps.len() > 1);
        let spread = tap_spread(texture, evaluation)?;
        let mut slack = [0.0f64; 4];
        for i in 0..4 {
            slack[i] = 0.5 * format.linear_space_step(i, evaluation.value.components[i]);
            if filtering {
                slack[i] += self.weight_quantum * spread[i];
            }
            if !format.is_integer() {
                slack[i] += self.abs_epsilon;
            }
        }
        range.widen(slack);
        Ok(range)
    }
}

// Per-component max-min across every texel the evaluation tapped.
fn tap_spread(texture: &Texture, evaluation: &Evaluation) -> Result<[f64; 4], Error> {
    let mut min = evaluation.value;
    let mut max = evaluation.value;
    for level in &evaluation.levels {
        for tap in &level.taps {
            let texel = texture.read_texel(level.level, tap.x, tap.y, tap.z)?;
            min = min.component_min(texel);
            max = max.component_max(texel);
        }
    }
    let mut spread = [0.0f64; 4];
    for i in 0..4 {
        spread[i] = max.components[i] - min.components[i];
    }
    Ok(spread)
}
