use crate::error::Error;
use crate::model::{
    AddressMode, FilterMode, SampleRequest, SamplerConfig, Texel, TexelFormat, Texture, TextureDescriptor,
};

/// One generated conformance case: a texture, a sampler configuration and the
/// requests to drive through them.
#[derive(Debug, Clone)]
pub struct Case {
    pub label: String,
    pub texture: Texture,
    pub sampler: SamplerConfig,
    pub requests: Vec<SampleRequest>,
}

/// Cross-products formats, address modes and filter modes into a sequence of
/// cases, keeping the evaluation core itself free of enumeration logic.
///
/// Texel content is a deterministic gradient authored through the format's
/// encode path; sample coordinates sweep past `[0, 1]` on both sides so every
/// address mode's wrap behavior gets exercised. Integer formats are not
/// filterable and only pair with nearest filtering.
#[derive(Debug, Clone)]
pub struct CaseBuilder {
    formats: Vec<TexelFormat>,
    address_modes: Vec<AddressMode>,
    filters: Vec<FilterMode>,
    width: u32,
    height: u32,
    mip_count: u32,
    samples_per_case: usize,
}

impl Default for CaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseBuilder {
    pub fn new() -> Self {
        Self {
            formats: vec![TexelFormat::Rgba8Unorm],
            address_modes: vec![AddressMode::ClampToEdge],
            filters: vec![FilterMode::Linear],
            width: 8,
            height: 8,
            mip_count: 1,
            samples_per_case: 16,
        }
    }

    pub fn formats(mut self, formats: &[TexelFormat]) -> Self {
        self.formats = formats.to_vec();
        self
    }

    pub fn address_modes(mut self, modes: &[AddressMode]) -> Self {
        self.address_modes = modes.to_vec();
        self
    }

    pub fn filters(mut self, filters: &[FilterMode]) -> Self {
        self.filters = filters.to_vec();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn mip_count(mut self, mip_count: u32) -> Self {
        self.mip_count = mip_count;
        self
    }

    pub fn samples_per_case(mut self, count: usize) -> Self {
        self.samples_per_case = count;
        self
    }

    pub fn build(&self) -> Result<Vec<Case>, Error> {
        let mut cases = Vec::new();
        for &format in &self.formats {
            let texture = self.gradient_texture(format)?;
            for &mode in &self.address_modes {
                for &filter in &self.filters {
                    if format.is_integer() && filter == FilterMode::Linear {
                        continue;
                    }
                    let sampler = SamplerConfig {
                        mag_filter: filter,
                        min_filter: filter,
                        mipmap_filter: filter,
                        ..SamplerConfig::default()
                    }
                    .with_address_modes(mode);
                    cases.push(Case {
                        label: format!("{format:?}/{mode:?}/{filter:?}"),
                        texture: texture.clone(),
                        sampler,
                        requests: self.requests(),
                    });
                }
            }
        }
        Ok(cases)
    }

    fn gradient_texture(&self, format: TexelFormat) -> Result<Texture, Error> {
        let bpt = format.bytes_per_texel();
        let mut level0 = vec![0u8; self.width as usize * self.height as usize * bpt];
        for y in 0..self.height {
            for x in 0..self.width {
                let value = if format.is_integer() {
                    Texel::new((x % 16) as f64, (y % 16) as f64, ((x + y) % 16) as f64, 15.0)
                } else {
                    Texel::new(
                        (x as f64 + 0.5) / self.width as f64,
                        (y as f64 + 0.5) / self.height as f64,
                        ((x ^ y) & 1) as f64,
                        1.0,
                    )
                };
                let at = (y as usize * self.width as usize + x as usize) * bpt;
                format.encode(value, &mut level0[at..at + bpt]);
            }
        }
        let desc = TextureDescriptor::d2(format, self.width, self.height).with_mip_count(self.mip_count);
        Texture::with_generated_mips(desc, &level0)
    }

    fn requests(&self) -> Vec<SampleRequest> {
        // Sweep a diagonal through [-0.25, 1.25) so out-of-range addressing
        // is hit from both sides.
        (0..self.samples_per_case)
            .map(|i| {
                let t = i as f32 / self.samples_per_case as f32;
                let mut request = SampleRequest::at(-0.25 + 1.5 * t, 1.25 - 1.5 * t);
                if self.mip_count > 1 {
                    request = request.with_level(t * (self.mip_count - 1) as f32);
                }
                request
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{ToleranceModel, verify_batch};
    use crate::model::evaluate;

    #[test]
    fn cross_product_counts() {
        let cases = CaseBuilder::new()
            .formats(&[TexelFormat::Rgba8Unorm, TexelFormat::R8Unorm])
            .address_modes(&[AddressMode::ClampToEdge, AddressMode::Repeat, AddressMode::MirrorRepeat])
            .filters(&[FilterMode::Nearest, FilterMode::Linear])
            .build()
            .unwrap();
        assert_eq!(cases.len(), 2 * 3 * 2);
    }

    #[test]
    fn integer_formats_skip_linear_filtering() {
        let cases = CaseBuilder::new()
            .formats(&[TexelFormat::Rgba8Uint])
            .filters(&[FilterMode::Nearest, FilterMode::Linear])
            .build()
            .unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].sampler.mag_filter, FilterMode::Nearest);
    }

    #[test]
    fn generated_cases_self_verify() {
        // The model's own expectations must pass its own tolerance.
        let cases = CaseBuilder::new()
            .formats(&[TexelFormat::Rgba8Unorm, TexelFormat::Rgba8UnormSrgb, TexelFormat::R16Float])
            .address_modes(&[AddressMode::Repeat, AddressMode::MirrorRepeat])
            .filters(&[FilterMode::Nearest, FilterMode::Linear])
            .mip_count(3)
            .build()
            .unwrap();
        let tolerance = ToleranceModel::default();
        for case in &cases {
            let actuals: Vec<Texel> = case
                .requests
                .iter()
                .map(|r| evaluate(&case.texture, &case.sampler, r).unwrap().value)
                .collect();
            let report =
                verify_batch(&case.texture, &case.sampler, &tolerance, &case.requests, &actuals).unwrap();
            assert!(report.passed(), "case {}", case.label);
        }
    }

    #[test]
    fn requests_are_deterministic() {
        let a = CaseBuilder::new().build().unwrap();
        let b = CaseBuilder::new().build().unwrap();
        assert_eq!(a[0].requests, b[0].requests);
    }
}
