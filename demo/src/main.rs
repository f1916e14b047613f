use texconf::check::{CaseBuilder, ToleranceModel, verify_batch};
use texconf::model::{AddressMode, FilterMode, Texel, TexelFormat, evaluate};

/// Runs the generated case grid against a simulated ideal device: the device
/// "computes" the exact expectation and returns it quantized to the texture
/// format's storage precision. A healthy model passes every case.
fn main() {
    env_logger::init();

    let cases = CaseBuilder::new()
        .formats(&[
            TexelFormat::R8Unorm,
            TexelFormat::Rgba8Unorm,
            TexelFormat::Rgba8UnormSrgb,
            TexelFormat::Rgba8Snorm,
            TexelFormat::Rgba16Float,
            TexelFormat::Rgba32Float,
            TexelFormat::Rgba8Uint,
        ])
        .address_modes(&[AddressMode::ClampToEdge, AddressMode::Repeat, AddressMode::MirrorRepeat])
        .filters(&[FilterMode::Nearest, FilterMode::Linear])
        .size(16, 16)
        .mip_count(3)
        .samples_per_case(64)
        .build()
        .expect("case generation");
    let tolerance = ToleranceModel::default();

    let mut failed_cases = 0usize;
    for case in &cases {
        let format = case.texture.format();
        let mut bytes = vec![0u8; format.bytes_per_texel()];
        let actuals: Vec<Texel> = case
            .requests
            .iter()
            .map(|request| {
                let exact = evaluate(&case.texture, &case.sampler, request)
                    .expect("reference evaluation")
                    .value;
                format.encode(exact, &mut bytes);
                format.decode(&bytes)
            })
            .collect();
        let report = verify_batch(&case.texture, &case.sampler, &tolerance, &case.requests, &actuals)
            .expect("batch verification");
        if report.passed() {
            log::info!("{}: {} samples ok", case.label, case.requests.len());
        } else {
            failed_cases += 1;
            log::error!("{}: failing samples {:?}", case.label, report.failing_indices());
            for mismatch in report.failures() {
                log::error!(
                    "  sample {} at {:?}: actual {:?} outside [{:?}, {:?}]",
                    mismatch.sample_index,
                    mismatch.coords,
                    mismatch.actual.components,
                    mismatch.expected.lo.components,
                    mismatch.expected.hi.components,
                );
            }
        }
    }

    println!("{} cases, {} failed", cases.len(), failed_cases);
    if failed_cases > 0 {
        std::process::exit(1);
    }
}
