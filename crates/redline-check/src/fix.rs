//! Single-document correction flows.

use redline_document::{
    CorrectionRequest, CorrectionResult, ExtractOptions, correct, correct_all, extract,
};
use serde_json::Value;
use tracing::debug;

use crate::{CheckError, DocumentStore, Issue};

/// Applies one correction to a stored document and saves the field it changed.
///
/// The document is loaded once and extracted once; only the modified top-level field is
/// written back.
pub fn fix_document<S: DocumentStore + ?Sized>(
    store: &S,
    id: &str,
    request: &CorrectionRequest,
    options: &ExtractOptions,
) -> Result<CorrectionResult, CheckError> {
    let mut document = store.load(id)?;
    let result = correct(&mut document, request, options);

    if let Some(field) = &result.modified_field {
        debug!(id, field, method = ?result.method, "saving corrected field");
        store.save_field(id, field, &document[field.as_str()])?;
    }
    Ok(result)
}

/// What happened to one checker issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueOutcome {
    /// The issue.
    pub issue: Issue,
    /// The correction attempted, if the issue carried a usable suggestion.
    pub result: Option<CorrectionResult>,
}

impl IssueOutcome {
    /// Returns true if the issue was corrected.
    pub fn is_applied(&self) -> bool {
        self.result.as_ref().is_some_and(|r| r.applied)
    }
}

/// Applies the first suggestion of each issue, working from the highest offset down.
///
/// Flagged text is read from the document as it is now, so issues should come from a check of
/// this same document. Issues without a suggestion are reported with no result.
pub fn apply_issues(
    document: &mut Value,
    issues: Vec<Issue>,
    options: &ExtractOptions,
) -> Vec<IssueOutcome> {
    let extraction = extract(document, options);
    let requests: Vec<Option<CorrectionRequest>> =
        issues.iter().map(|issue| issue.to_request(&extraction)).collect();

    let located: Vec<CorrectionRequest> = requests.iter().flatten().cloned().collect();
    let mut results = correct_all(document, &located, options).into_iter();

    issues
        .into_iter()
        .zip(requests)
        .map(|(issue, request)| IssueOutcome {
            issue,
            result: request.and_then(|_| results.next()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::MemoryStore;

    fn page() -> Value {
        json!({
            "title": "Titre",
            "content": {"root": {"type": "root", "children": [
                {"type": "paragraph", "children": [{"type": "text", "text": "Ceci est une test."}]},
            ]}},
            "layout": [{"blockType": "cta", "heading": "Apellez-nous"}],
        })
    }

    fn issue(offset: usize, length: usize, replacement: Option<&str>) -> Issue {
        Issue {
            offset,
            length,
            message: String::new(),
            category: String::new(),
            rule_id: String::new(),
            suggested_replacements: replacement.into_iter().map(String::from).collect(),
            original: None,
        }
    }

    #[test]
    fn test_fix_document_saves_only_modified_field() {
        let store = MemoryStore::new();
        store.insert("home", page());
        let result = fix_document(
            &store,
            "home",
            &CorrectionRequest::at(15, "une", "un"),
            &ExtractOptions::default(),
        )
        .unwrap();

        assert!(result.applied);
        let saved = store.get("home").unwrap();
        assert_eq!(
            saved["content"]["root"]["children"][0]["children"][0]["text"],
            "Ceci est un test."
        );
        assert_eq!(saved["layout"], page()["layout"]);
    }

    #[test]
    fn test_fix_document_not_applied_saves_nothing() {
        let store = MemoryStore::new();
        store.insert("home", page());
        let result = fix_document(
            &store,
            "home",
            &CorrectionRequest::unlocated("absent", "x"),
            &ExtractOptions::default(),
        )
        .unwrap();
        assert!(!result.applied);
        assert_eq!(store.get("home").unwrap(), page());
    }

    #[test]
    fn test_fix_missing_document() {
        let store = MemoryStore::new();
        let err = fix_document(
            &store,
            "nope",
            &CorrectionRequest::unlocated("a", "b"),
            &ExtractOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CheckError::NotFound { .. }));
    }

    #[test]
    fn test_apply_issues_in_request_order() {
        let mut doc = page();
        // Flat text: "Titre\nCeci est une test.\n\nApellez-nous"
        let issues = vec![
            issue(15, 3, Some("un")),
            issue(0, 5, None),
            issue(26, 7, Some("Appelez")),
        ];
        let outcomes = apply_issues(&mut doc, issues, &ExtractOptions::default());

        assert!(outcomes[0].is_applied());
        assert!(outcomes[1].result.is_none());
        assert!(outcomes[2].is_applied());
        assert_eq!(
            outcomes[2].result.as_ref().unwrap().modified_field.as_deref(),
            Some("layout")
        );
        assert_eq!(doc["layout"][0]["heading"], "Appelez-nous");
        assert_eq!(doc["title"], "Titre");
    }
}
