use texconf::check::*;
use texconf::model::*;

macro_rules! assert_texel_eq {
    ($left:expr, $right:expr, $tol:expr $(,)?) => {{
        let l = $left;
        let r = $right;
        let tol: f64 = $tol;
        for i in 0..4 {
            let d = (l.components[i] - r.components[i]).abs();
            if d > tol {
                panic!(
                    "assertion failed: left != right within tol={}\n  left: {:?}\n right: {:?}",
                    tol, l, r
                );
            }
        }
    }};
}

// Texel layout (row-major):
// [ (0,0): red,  (1,0): green ]
// [ (0,1): blue, (1,1): white ]
fn rgba_2x2() -> Texture {
    let texels: [u8; 16] = [
        255, 0, 0, 255, // (0,0) red
        0, 255, 0, 255, // (1,0) green
        0, 0, 255, 255, // (0,1) blue
        255, 255, 255, 255, // (1,1) white
    ];
    Texture::new(TextureDescriptor::d2(TexelFormat::Rgba8Unorm, 2, 2), &[&texels]).unwrap()
}

#[test]
fn linear_center_sample_averages_all_four_texels() {
    let texture = rgba_2x2();
    let config = SamplerConfig::default();
    let tolerance = ToleranceModel::default();
    let request = SampleRequest::at(0.5, 0.5);

    let eval = evaluate(&texture, &config, &request).unwrap();
    // Equal-weighted average of red, green, blue and white.
    assert_texel_eq!(eval.value, Texel::new(0.5, 0.5, 0.5, 1.0), 1e-12);

    let range = tolerance.expected_range(&texture, &config, &request, &eval).unwrap();
    assert!(range.contains(Texel::new(0.5, 0.5, 0.5, 1.0)));
    // A device answer quantized to unorm8 also passes.
    assert!(range.contains(Texel::new(128.0 / 255.0, 128.0 / 255.0, 128.0 / 255.0, 1.0)));
}

#[test]
fn repeat_addressing_is_periodic() {
    let texture = rgba_2x2();
    let config = SamplerConfig::default().with_address_modes(AddressMode::Repeat);
    for filter_config in [config, SamplerConfig::nearest().with_address_modes(AddressMode::Repeat)] {
        let inside = evaluate(&texture, &filter_config, &SampleRequest::at(0.5, 0.5)).unwrap();
        let wrapped = evaluate(&texture, &filter_config, &SampleRequest::at(1.5, 0.5)).unwrap();
        assert_texel_eq!(inside.value, wrapped.value, 1e-12);
    }
}

#[test]
fn nearest_on_texel_boundary_is_deterministic_and_widened() {
    // 4x1 ramp, boundary between texels 1 and 2 at u = 0.5.
    let texture =
        Texture::new(TextureDescriptor::d2(TexelFormat::R8Unorm, 4, 1), &[&[0, 60, 120, 240]]).unwrap();
    let config = SamplerConfig::nearest();
    let tolerance = ToleranceModel::default();
    let request = SampleRequest::at(0.5, 0.5);

    // Rounding half away from zero picks texel 2, every time.
    let eval = evaluate(&texture, &config, &request).unwrap();
    assert_eq!(eval.value.components[0], 120.0 / 255.0);

    // But the tolerance admits a driver landing on either neighbor.
    let range = tolerance.expected_range(&texture, &config, &request, &eval).unwrap();
    assert!(range.contains(Texel::new(60.0 / 255.0, 0.0, 0.0, 1.0)));
    assert!(range.contains(Texel::new(120.0 / 255.0, 0.0, 0.0, 1.0)));
    // Not a third texel though.
    assert!(!range.contains(Texel::new(240.0 / 255.0, 0.0, 0.0, 1.0)));
}

#[test]
fn batch_reports_exactly_the_engineered_failures() {
    let texture = rgba_2x2();
    let config = SamplerConfig::default();
    let tolerance = ToleranceModel::default();
    let requests: Vec<SampleRequest> = (0..5).map(|i| SampleRequest::at(0.15 + 0.17 * i as f32, 0.4)).collect();
    let mut actuals: Vec<Texel> = requests
        .iter()
        .map(|r| evaluate(&texture, &config, r).unwrap().value)
        .collect();
    actuals[2].components[1] += 0.3;
    actuals[4].components[0] -= 0.3;

    let report = verify_batch(&texture, &config, &tolerance, &requests, &actuals).unwrap();
    assert!(!report.passed());
    assert_eq!(report.failing_indices(), vec![2, 4]);
    for mismatch in report.failures() {
        assert!(!mismatch.expected.contains(mismatch.actual));
        assert!(!mismatch.levels.is_empty(), "diagnostics carry the tap neighborhood");
    }
}

#[test]
fn trilinear_mip_blend_lies_between_level_results() {
    let level0: Vec<u8> = (0..64).map(|i| (i * 4) as u8).collect();
    let texture = Texture::with_generated_mips(
        TextureDescriptor::d2(TexelFormat::R8Unorm, 8, 8).with_mip_count(4),
        &level0,
    )
    .unwrap();
    let config = SamplerConfig::default();
    let request = SampleRequest::at(0.4, 0.6).with_level(1.5);
    let eval = evaluate(&texture, &config, &request).unwrap();
    assert_eq!(eval.levels.len(), 2);
    let a = eval.levels[0].value.components[0];
    let b = eval.levels[1].value.components[0];
    let v = eval.value.components[0];
    assert!(v >= a.min(b) - 1e-12 && v <= a.max(b) + 1e-12);
}

#[test]
fn base_clamp_variant_conforms_regardless_of_sampler_addressing() {
    let texture = rgba_2x2();
    let tolerance = ToleranceModel::default();
    // Sampler asks for repeat; the base variant must clamp anyway.
    let config = SamplerConfig::default().with_address_modes(AddressMode::Repeat);
    let requests = vec![
        SampleRequest::base_clamp_to_edge(-0.5, 0.25),
        SampleRequest::base_clamp_to_edge(1.5, 0.25),
        SampleRequest::base_clamp_to_edge(0.25, 1.5),
    ];
    // Clamped expectations: left edge red, right edge green, bottom-left blue.
    let actuals = vec![
        Texel::new(1.0, 0.0, 0.0, 1.0),
        Texel::new(0.0, 1.0, 0.0, 1.0),
        Texel::new(0.0, 0.0, 1.0, 1.0),
    ];
    let report = verify_batch(&texture, &config, &tolerance, &requests, &actuals).unwrap();
    assert!(report.passed(), "failures: {:?}", report.failing_indices());
}

#[test]
fn simulated_quantizing_device_passes_every_generated_case() {
    // Model an ideal device that computes the exact expectation and then
    // stores it at the texture format's precision.
    let cases = CaseBuilder::new()
        .formats(&[TexelFormat::Rgba8Unorm, TexelFormat::Rgba8UnormSrgb, TexelFormat::Rgba16Float])
        .address_modes(&[AddressMode::ClampToEdge, AddressMode::Repeat, AddressMode::MirrorRepeat])
        .filters(&[FilterMode::Nearest, FilterMode::Linear])
        .mip_count(2)
        .build()
        .unwrap();
    let tolerance = ToleranceModel::default();
    for case in &cases {
        let format = case.texture.format();
        let mut bytes = vec![0u8; format.bytes_per_texel()];
        let actuals: Vec<Texel> = case
            .requests
            .iter()
            .map(|r| {
                let exact = evaluate(&case.texture, &case.sampler, r).unwrap().value;
                format.encode(exact, &mut bytes);
                format.decode(&bytes)
            })
            .collect();
        let report =
            verify_batch(&case.texture, &case.sampler, &tolerance, &case.requests, &actuals).unwrap();
        assert!(report.passed(), "case {}: failures {:?}", case.label, report.failing_indices());
    }
}
