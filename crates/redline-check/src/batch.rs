//! Checking many documents in sequence.
//!
//! Checker calls are spaced by a fixed delay. A failing document is recorded and skipped;
//! nothing one document does can stop the rest of the batch. Progress is shared through
//! [`BatchProgress`] so another thread can watch for a stalled run, cancel it, or reset it.

use std::{
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use redline_config::CheckSettings;
use redline_document::{ExtractOptions, extract};
use tracing::{debug, warn};

use crate::{AllowList, CheckError, Checker, DocumentStore, Issue, truncate_chars};

/// Settings for a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Extraction options shared by check and fix.
    pub extract: ExtractOptions,
    /// Language passed to the checker.
    pub language: String,
    /// Longest flat-text prefix submitted, in characters.
    pub max_text_length: usize,
    /// Pause between consecutive checker calls.
    pub delay: Duration,
}

impl BatchOptions {
    /// Builds batch options from the `[check]` settings.
    pub fn from_settings(settings: &CheckSettings, extract: ExtractOptions) -> Self {
        Self {
            extract,
            language: settings.language.clone(),
            max_text_length: settings.max_text_length,
            delay: Duration::from_millis(settings.delay_ms),
        }
    }
}

/// Result of checking one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedDocument {
    /// Issues left after allow-list filtering.
    pub issues: Vec<Issue>,
    /// Fingerprint of the flat text that was checked.
    pub fingerprint: String,
    /// Whether the flat text was cut to fit the length limit.
    pub truncated: bool,
}

/// Outcome for one document in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    /// Document id.
    pub id: String,
    /// The check result, or the error message.
    pub outcome: Result<CheckedDocument, String>,
}

/// Live counters for a batch, shared between the runner and its observers.
#[derive(Debug)]
pub struct BatchProgress {
    /// Documents finished, successfully or not.
    processed: AtomicUsize,
    /// Documents that failed.
    failed: AtomicUsize,
    /// Set while a run is in progress.
    running: AtomicBool,
    /// Set to stop the run before its next document.
    cancelled: AtomicBool,
    /// When the run last made progress.
    last_progress: Mutex<Instant>,
}

impl Default for BatchProgress {
    fn default() -> Self {
        Self {
            processed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            running: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
            last_progress: Mutex::new(Instant::now()),
        }
    }
}

impl BatchProgress {
    /// Returns the number of documents finished.
    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::SeqCst)
    }

    /// Returns the number of documents that failed.
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Returns true while a run is in progress.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns true if a running batch has made no progress for longer than `threshold`.
    pub fn is_stale(&self, threshold: Duration) -> bool {
        self.is_running() && self.since_progress() > threshold
    }

    /// Asks the run to stop before its next document.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clears all state, abandoning a stalled run so a new one can start.
    pub fn force_reset(&self) {
        self.processed.store(0, Ordering::SeqCst);
        self.failed.store(0, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
        self.cancelled.store(false, Ordering::SeqCst);
        self.touch();
    }

    /// Starts a run: zeroes the counters and marks it running. A pending cancellation stays.
    fn begin(&self) {
        self.processed.store(0, Ordering::SeqCst);
        self.failed.store(0, Ordering::SeqCst);
        self.running.store(true, Ordering::SeqCst);
        self.touch();
    }

    /// Returns the time since the last recorded progress.
    fn since_progress(&self) -> Duration {
        self.last_progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }

    /// Records progress now.
    fn touch(&self) {
        *self.last_progress.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    /// Records one finished document.
    fn record(&self, failed: bool) {
        self.processed.fetch_add(1, Ordering::SeqCst);
        if failed {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
        self.touch();
    }
}

/// Checks documents one after another.
pub struct BatchRunner<'a, C: ?Sized, S: ?Sized> {
    /// Checking service.
    checker: &'a C,
    /// Document source.
    store: &'a S,
    /// Run settings.
    options: BatchOptions,
    /// Optional allow-list filter.
    allow_list: Option<AllowList>,
    /// Shared progress.
    progress: Arc<BatchProgress>,
}

impl<'a, C: Checker + ?Sized, S: DocumentStore + ?Sized> BatchRunner<'a, C, S> {
    /// Creates a runner.
    pub fn new(checker: &'a C, store: &'a S, options: BatchOptions) -> Self {
        Self {
            checker,
            store,
            options,
            allow_list: None,
            progress: Arc::new(BatchProgress::default()),
        }
    }

    /// Filters every document's issues through `allow_list`.
    pub fn with_allow_list(mut self, allow_list: AllowList) -> Self {
        self.allow_list = Some(allow_list);
        self
    }

    /// Reports progress through an existing handle instead of a fresh one.
    pub fn with_progress(mut self, progress: Arc<BatchProgress>) -> Self {
        self.progress = progress;
        self
    }

    /// Returns a handle to the shared progress.
    pub fn progress(&self) -> Arc<BatchProgress> {
        Arc::clone(&self.progress)
    }

    /// Checks each document in `ids`, in order.
    ///
    /// Stops early if the progress handle is cancelled; documents not reached are omitted
    /// from the returned reports. Counters start from zero, but a cancellation requested
    /// before the call is honoured: the run returns no reports until
    /// [`BatchProgress::force_reset`] clears it.
    pub fn run(&mut self, ids: &[String]) -> Vec<DocumentReport> {
        self.progress.begin();

        let mut reports = Vec::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if self.progress.is_cancelled() {
                warn!(remaining = ids.len() - i, "batch cancelled");
                break;
            }
            if i > 0 && !self.options.delay.is_zero() {
                thread::sleep(self.options.delay);
            }

            let outcome = self.check_one(id).map_err(|e| {
                warn!(id = %id, "document check failed: {e}");
                e.to_string()
            });
            self.progress.record(outcome.is_err());
            reports.push(DocumentReport {
                id: id.clone(),
                outcome,
            });
        }

        self.progress.running.store(false, Ordering::SeqCst);
        reports
    }

    /// Loads, extracts and checks one document.
    fn check_one(&mut self, id: &str) -> Result<CheckedDocument, CheckError> {
        let document = self.store.load(id)?;
        let extraction = extract(&document, &self.options.extract);
        let text = truncate_chars(extraction.flat_text(), self.options.max_text_length);
        let truncated = text.len() < extraction.flat_text().len();
        if truncated {
            debug!(id, limit = self.options.max_text_length, "flat text truncated");
        }

        let mut issues = self.checker.check(text, &self.options.language)?;
        if let Some(allow_list) = &mut self.allow_list {
            issues = allow_list.filter_issues(text, issues);
        }
        debug!(id, issues = issues.len(), "document checked");

        Ok(CheckedDocument {
            issues,
            fingerprint: extraction.fingerprint(),
            truncated,
        })
    }
}
