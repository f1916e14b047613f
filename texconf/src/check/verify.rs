use super::{ExpectedRange, ToleranceModel};
use crate::error::Error;
use crate::model::{LevelSample, SampleRequest, SamplerConfig, Texel, Texture, evaluate};
use arrayvec::ArrayVec;
use rayon::prelude::*;

/// Everything needed to diagnose one failing sample: where it was taken, what
/// interval was acceptable, what came back, and which texels with which
/// weights produced the expectation.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub sample_index: usize,
    pub coords: [f32; 3],
    pub expected: ExpectedRange,
    pub actual: Texel,
    pub levels: ArrayVec<LevelSample, 2>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    Fail(Mismatch),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// Check one actual result against the reference model.
pub fn check_sample(
    texture: &Texture,
    config: &SamplerConfig,
    tolerance: &ToleranceModel,
    sample_index: usize,
    request: &SampleRequest,
    actual: Texel,
) -> Result<Verdict, Error> {
    let evaluation = evaluate(texture, config, request)?;
    let expected = tolerance.expected_range(texture, config, request, &evaluation)?;
    if expected.contains(actual) {
        Ok(Verdict::Pass)
    } else {
        log::debug!(
            "sample {sample_index} at {:?} out of tolerance: actual {:?}, expected [{:?}, {:?}], taps {:?}",
            request.coords,
            actual.components,
            expected.lo.components,
            expected.hi.components,
            evaluation.levels,
        );
        Ok(Verdict::Fail(Mismatch {
            sample_index,
            coords: request.coords,
            expected,
            actual,
            levels: evaluation.levels,
        }))
    }
}

/// One verdict per request, in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub verdicts: Vec<Verdict>,
}

impl BatchReport {
    /// The batch passes iff every sample passed.
    pub fn passed(&self) -> bool {
        self.verdicts.iter().all(Verdict::is_pass)
    }

    /// Every failing sample, never just the first.
    pub fn failures(&self) -> impl Iterator<Item = &Mismatch> {
        self.verdicts.iter().filter_map(|v| match v {
            Verdict::Pass => None,
            Verdict::Fail(mismatch) => Some(mismatch),
        })
    }

    pub fn failing_indices(&self) -> Vec<usize> {
        self.failures().map(|m| m.sample_index).collect()
    }
}

/// Verify a batch of actual results against the reference model.
///
/// `actuals` must parallel `requests` one-to-one and in order. Requests are
/// independent and all inputs are read-only, so evaluation fans out across
/// the rayon pool; verdict order still matches request order. A model-level
/// failure ([`Error`]) aborts the batch; out-of-tolerance samples never do.
pub fn verify_batch(
    texture: &Texture,
    config: &SamplerConfig,
    tolerance: &ToleranceModel,
    requests: &[SampleRequest],
    actuals: &[Texel],
) -> Result<BatchReport, Error> {
    if requests.len() != actuals.len() {
        return Err(Error::MalformedInput(format!(
            "{} requests but {} actual results",
            requests.len(),
            actuals.len()
        )));
    }
    let verdicts = requests
        .par_iter()
        .zip(actuals.par_iter())
        .enumerate()
        .map(|(index, (request, &actual))| check_sample(texture, config, tolerance, index, request, actual))
        .collect::<Result<Vec<_>, Error>>()?;
    let report = BatchReport { verdicts };
    if !report.passed() {
        log::debug!(
            "batch failed: {} of {} samples out of tolerance",
            report.failing_indices().len(),
            requests.len()
        );
    }
    Ok(report)
}
