use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use qcrecords::engine::progress::{Progress, ProgressCallback, TripleOutcome};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 100;

/// Drives an `indicatif` bar from pipeline progress events.
///
/// Callbacks fire from rayon worker threads, so the bar sits behind a mutex.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
    skipped: Arc<Mutex<u64>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// A handler whose bar never draws; used when logging is quiet.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::spinner_style())
            .with_message("Waiting for batch");
        pb.set_draw_target(target);
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
            skipped: Arc::new(Mutex::new(0)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();
        let skipped_clone = self.skipped.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar lock poisoned; dropping progress event.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    pb_guard.reset();
                    pb_guard.set_length(0);
                    pb_guard.set_style(Self::spinner_style());
                    pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb_guard.set_message(name.to_string());
                }
                Progress::PhaseFinish => {
                    pb_guard.disable_steady_tick();
                    pb_guard.finish_with_message("✓ done");
                }
                Progress::Classified { kind, triples } => {
                    pb_guard.set_message(format!("{triples} {kind} record(s)"));
                }
                Progress::ReconstructionStart { total } => {
                    pb_guard.disable_steady_tick();
                    pb_guard.reset();
                    pb_guard.set_length(total);
                    pb_guard.set_position(0);
                    pb_guard.set_style(Self::bar_style());
                    pb_guard.set_message("Reconstructing");
                }
                Progress::TripleFinished { outcome, .. } => {
                    if outcome == TripleOutcome::Skipped {
                        if let Ok(mut skipped) = skipped_clone.lock() {
                            *skipped += 1;
                            pb_guard.set_message(format!("Reconstructing ({} skipped)", *skipped));
                        }
                    }
                    pb_guard.inc(1);
                }
                Progress::ReconstructionFinish => {
                    if pb_guard.position() < pb_guard.length().unwrap_or(0) {
                        pb_guard.set_position(pb_guard.length().unwrap_or(0));
                    }
                    pb_guard.finish();
                }
                Progress::Message(msg) => {
                    if !pb_guard.is_finished() {
                        pb_guard.println(format!("  · {msg}"));
                    } else {
                        pb_guard.set_message(msg);
                    }
                }
            }
        })
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.lock().map(|n| *n).unwrap_or(0)
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{msg:<28} {bar:40.green/white} {pos:>6}/{len:6} records [{elapsed_precise}] {per_sec}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcrecords::core::records::RecordKind;
    use std::thread;

    #[test]
    fn hidden_handler_starts_finished_and_empty() {
        let handler = CliProgressHandler::hidden();
        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.length(), Some(0));
        assert!(pb.is_finished());
        assert_eq!(handler.skipped(), 0);
    }

    #[test]
    fn conversion_events_drive_the_bar() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Classification",
        });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.message(), "Classification");
            assert!(!pb.is_finished());
        }

        callback(Progress::Classified {
            kind: RecordKind::Optimization,
            triples: 3,
        });
        assert_eq!(
            handler.pb.lock().unwrap().message(),
            "3 optimization record(s)"
        );

        callback(Progress::ReconstructionStart { total: 3 });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.length(), Some(3));
            assert_eq!(pb.position(), 0);
        }

        callback(Progress::TripleFinished {
            index: 1,
            outcome: TripleOutcome::Converted,
        });
        callback(Progress::TripleFinished {
            index: 0,
            outcome: TripleOutcome::Skipped,
        });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.position(), 2);
            assert_eq!(pb.message(), "Reconstructing (1 skipped)");
        }
        assert_eq!(handler.skipped(), 1);

        callback(Progress::ReconstructionFinish);
        {
            let pb = handler.pb.lock().unwrap();
            assert!(pb.is_finished());
            assert_eq!(pb.position(), 3);
        }

        callback(Progress::PhaseFinish);
        assert_eq!(handler.pb.lock().unwrap().message(), "✓ done");
    }

    #[test]
    fn callback_can_run_on_a_worker_thread() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart {
                name: "Reconstruction",
            });
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "✓ done");
    }
}
