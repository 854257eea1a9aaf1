use crate::core::records::RecordKind;

/// How a single triple left the reconstructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripleOutcome {
    Converted,
    /// Failed and was set aside under the skip policy.
    Skipped,
    /// Failed and ends the run under the abort policy.
    Failed,
}

/// Pipeline events, in the order a run emits them.
///
/// `TripleFinished` events arrive in completion order, which under the
/// `parallel` feature is not input order.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    Classified { kind: RecordKind, triples: usize },

    ReconstructionStart { total: u64 },
    TripleFinished { index: usize, outcome: TripleOutcome },
    ReconstructionFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards pipeline events to an optional observer.
///
/// Shared by reference across worker threads, hence the `Send + Sync` bound on
/// the callback.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    pub fn is_observed(&self) -> bool {
        self.callback.is_some()
    }
}
