use crate::core::io::batch::{Batch, load_batch};
use crate::core::io::timings::TimingRecord;
use crate::core::models::molecule::Molecule;
use crate::core::records::{RecordKind, TypedRecord};
use crate::engine::classify::classify;
use crate::engine::config::{FailurePolicy, PipelineConfig};
use crate::engine::error::PipelineError;
use crate::engine::progress::{Progress, ProgressReporter, TripleOutcome};
use crate::engine::reconstruct::Reconstructor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug)]
pub struct ConversionResult {
    pub kind: RecordKind,
    /// Successfully reconstructed pairs, in input order.
    pub pairs: Vec<(TypedRecord, Molecule)>,
    /// Per-triple failures set aside under [`FailurePolicy::Skip`], in input order.
    pub failures: Vec<PipelineError>,
    /// One entry per successful pair, in the same order as `pairs`.
    pub timings: Vec<TimingRecord>,
}

impl ConversionResult {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn failed_indices(&self) -> Vec<usize> {
        self.failures.iter().filter_map(PipelineError::index).collect()
    }

    pub fn records(&self) -> impl Iterator<Item = &TypedRecord> {
        self.pairs.iter().map(|(record, _)| record)
    }

    pub fn molecules(&self) -> impl Iterator<Item = &Molecule> {
        self.pairs.iter().map(|(_, molecule)| molecule)
    }
}

type TripleResult = Result<(TypedRecord, Molecule, TimingRecord), PipelineError>;

/// Classifies `batch` and reconstructs every triple.
///
/// Triples are consumed as they are processed. Output order is input order
/// whether or not the `parallel` feature is enabled.
///
/// # Errors
///
/// Classification errors are always returned. Per-triple errors are returned
/// under [`FailurePolicy::Abort`] (the lowest failing index wins, and triples
/// after it are not started once it is known) and collected
/// into [`ConversionResult::failures`] under [`FailurePolicy::Skip`].
#[instrument(skip_all, name = "convert_workflow", fields(triples = batch.len()))]
pub fn run(
    batch: Batch,
    config: &PipelineConfig,
    reporter: &ProgressReporter,
) -> Result<ConversionResult, PipelineError> {
    // === Phase 1: Classification ===
    reporter.report(Progress::PhaseStart {
        name: "Classification",
    });
    let kind = classify(&batch)?;
    reporter.report(Progress::Classified {
        kind,
        triples: batch.len(),
    });
    reporter.report(Progress::PhaseFinish);
    info!(%kind, triples = batch.len(), "Batch classified.");

    // === Phase 2: Reconstruction ===
    reporter.report(Progress::PhaseStart {
        name: "Reconstruction",
    });
    let results = reconstruct_all(batch, kind, config, reporter);
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Collect in input order ===
    let mut pairs = Vec::with_capacity(results.len());
    let mut timings = Vec::with_capacity(results.len());
    // Under Abort every index below the first failure was reconstructed, so
    // the first error seen in input order is the lowest failing one.
    let mut failures = Vec::new();
    for result in results.into_iter().flatten() {
        match result {
            Ok((record, molecule, timing)) => {
                pairs.push((record, molecule));
                timings.push(timing);
            }
            Err(err) => match config.on_error {
                FailurePolicy::Abort => return Err(err),
                FailurePolicy::Skip => {
                    warn!(error = %err, "Skipping triple.");
                    failures.push(err);
                }
            },
        }
    }

    info!(
        converted = pairs.len(),
        skipped = failures.len(),
        "Conversion complete."
    );
    Ok(ConversionResult {
        kind,
        pairs,
        failures,
        timings,
    })
}

/// Loads the batch at `path` and runs [`run`] on it.
pub fn run_path(
    path: impl AsRef<Path>,
    config: &PipelineConfig,
    reporter: &ProgressReporter,
) -> Result<ConversionResult, PipelineError> {
    let path = path.as_ref();
    info!(path = %path.display(), "Loading batch.");
    let batch = load_batch(path)?;
    run(batch, config, reporter)
}

/// Reconstructs every triple; `None` marks a triple abandoned after an
/// earlier one failed under [`FailurePolicy::Abort`].
fn reconstruct_all(
    batch: Batch,
    kind: RecordKind,
    config: &PipelineConfig,
    reporter: &ProgressReporter,
) -> Vec<Option<TripleResult>> {
    let reconstructor = Reconstructor::new(kind, config);
    let triples = batch.into_triples();
    reporter.report(Progress::ReconstructionStart {
        total: triples.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = triples.into_iter().enumerate();

    #[cfg(feature = "parallel")]
    let iterator = triples.into_par_iter().enumerate();

    let abort = config.on_error == FailurePolicy::Abort;
    let first_failure = AtomicUsize::new(usize::MAX);

    let results: Vec<Option<TripleResult>> = iterator
        .map(|(index, triple)| {
            if abort && index > first_failure.load(Ordering::Relaxed) {
                return None;
            }

            let started = Instant::now();
            let result = reconstructor.reconstruct(index, triple).map(|(record, molecule)| {
                let timing =
                    TimingRecord::new(index, record.id(), molecule.n_atoms(), started.elapsed());
                (record, molecule, timing)
            });

            let outcome = match (&result, config.on_error) {
                (Ok(_), _) => TripleOutcome::Converted,
                (Err(_), FailurePolicy::Skip) => TripleOutcome::Skipped,
                (Err(_), FailurePolicy::Abort) => TripleOutcome::Failed,
            };
            if abort && result.is_err() {
                first_failure.fetch_min(index, Ordering::Relaxed);
            }
            reporter.report(Progress::TripleFinished { index, outcome });
            Some(result)
        })
        .collect();

    let abandoned = results.iter().filter(|r| r.is_none()).count();
    if abandoned > 0 {
        debug!(abandoned, "Stopped reconstruction after a failed triple.");
    }
    reporter.report(Progress::ReconstructionFinish);
    results
}
