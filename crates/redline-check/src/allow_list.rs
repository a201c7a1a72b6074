//! Words the checker must never flag.
//!
//! The list comes from an external source and is cached for a fixed TTL. The cache is an owned
//! value handed to whoever filters issues; there is no process-wide state.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::{CheckError, Issue};

/// Where allowed words come from.
pub trait AllowListSource {
    /// Fetches the current list of allowed words or phrases.
    fn fetch(&self) -> Result<Vec<String>, CheckError>;
}

/// A fixed list, such as the `allow_words` configuration setting.
#[derive(Debug, Clone, Default)]
pub struct StaticWords(pub Vec<String>);

impl AllowListSource for StaticWords {
    fn fetch(&self) -> Result<Vec<String>, CheckError> {
        Ok(self.0.clone())
    }
}

/// A TTL cache over an [`AllowListSource`].
pub struct AllowList {
    /// Upstream source.
    source: Box<dyn AllowListSource + Send>,
    /// How long a fetch stays fresh.
    ttl: Duration,
    /// Lowercased words and the instant they were fetched.
    cached: Option<(Instant, Vec<String>)>,
}

impl AllowList {
    /// Creates an empty cache over `source`.
    pub fn new(source: impl AllowListSource + Send + 'static, ttl: Duration) -> Self {
        Self {
            source: Box::new(source),
            ttl,
            cached: None,
        }
    }

    /// Returns the allowed words, lowercased, fetching them if the cache is cold or expired.
    pub fn words(&mut self) -> Result<&[String], CheckError> {
        let fresh = self
            .cached
            .as_ref()
            .is_some_and(|(fetched, _)| fetched.elapsed() < self.ttl);
        if !fresh {
            let words = self.source.fetch()?;
            debug!(count = words.len(), "fetched allow-list");
            let words = words.iter().map(|w| w.trim().to_lowercase()).collect();
            self.cached = Some((Instant::now(), words));
        }
        Ok(self
            .cached
            .as_ref()
            .map(|(_, words)| words.as_slice())
            .unwrap_or_default())
    }

    /// Drops the cached words so the next call fetches again.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Removes issues whose flagged text is an allowed word, ignoring case.
    ///
    /// If the source fails, the last fetched words are used; with nothing cached, every issue
    /// is kept.
    pub fn filter_issues(&mut self, flat_text: &str, issues: Vec<Issue>) -> Vec<Issue> {
        if let Err(e) = self.words() {
            warn!("allow-list unavailable, using cached words: {e}");
        }
        let Some((_, words)) = &self.cached else {
            return issues;
        };

        issues
            .into_iter()
            .filter(|issue| {
                let allowed = issue
                    .covered_text(flat_text)
                    .is_some_and(|text| words.contains(&text.trim().to_lowercase()));
                if allowed {
                    debug!(offset = issue.offset, rule = %issue.rule_id, "issue on allowed word");
                }
                !allowed
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    };

    use super::*;

    /// Counts fetches and can be switched to failing.
    #[derive(Clone, Default)]
    struct CountingSource {
        fetches: Arc<AtomicUsize>,
        failing: Arc<AtomicBool>,
    }

    impl AllowListSource for CountingSource {
        fn fetch(&self) -> Result<Vec<String>, CheckError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(CheckError::AllowList("offline".into()));
            }
            Ok(vec!["Redline".into(), "Payload CMS".into()])
        }
    }

    fn issue(offset: usize, length: usize) -> Issue {
        Issue {
            offset,
            length,
            message: String::new(),
            category: "TYPOS".into(),
            rule_id: "SPELLING".into(),
            suggested_replacements: vec![],
            original: None,
        }
    }

    #[test]
    fn test_words_cached_within_ttl() {
        let source = CountingSource::default();
        let mut list = AllowList::new(source.clone(), Duration::from_secs(3600));
        assert_eq!(list.words().unwrap(), ["redline", "payload cms"]);
        list.words().unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_expired_words_refetched() {
        let source = CountingSource::default();
        let mut list = AllowList::new(source.clone(), Duration::ZERO);
        list.words().unwrap();
        list.words().unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_invalidate_forces_fetch() {
        let source = CountingSource::default();
        let mut list = AllowList::new(source.clone(), Duration::from_secs(3600));
        list.words().unwrap();
        list.invalidate();
        list.words().unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_filter_issues_ignores_case() {
        let mut list = AllowList::new(CountingSource::default(), Duration::from_secs(60));
        let text = "REDLINE sur Payload CMS, une test.";
        let kept = list.filter_issues(text, vec![issue(0, 7), issue(12, 11), issue(25, 3)]);
        assert_eq!(kept, vec![issue(25, 3)]);
    }

    #[test]
    fn test_filter_keeps_stale_words_when_source_fails() {
        let source = CountingSource::default();
        let mut list = AllowList::new(source.clone(), Duration::ZERO);
        list.words().unwrap();
        source.failing.store(true, Ordering::SeqCst);

        let kept = list.filter_issues("Redline", vec![issue(0, 7)]);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_filter_without_words_keeps_everything() {
        let source = CountingSource::default();
        source.failing.store(true, Ordering::SeqCst);
        let mut list = AllowList::new(source, Duration::from_secs(60));
        assert!(list.words().is_err());
        assert_eq!(list.filter_issues("Redline", vec![issue(0, 7)]).len(), 1);
    }

    #[test]
    fn test_static_words() {
        let mut list = AllowList::new(StaticWords(vec!["Été".into()]), Duration::from_secs(1));
        assert_eq!(list.words().unwrap(), ["été"]);
    }
}
