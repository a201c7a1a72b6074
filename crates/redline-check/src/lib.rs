//! Collaborator seams around the redline core.
//!
//! The core in `redline-document` never talks to the outside world. This crate defines the
//! traits it is driven through and the flows that tie them together:
//! - [`Checker`]: the natural-language checking service
//! - [`DocumentStore`]: loading documents and saving single fields
//! - [`AllowList`]: an owned, TTL-bounded cache of words that are never errors
//! - [`fix_document`], [`apply_issues`] and [`BatchRunner`]: the flows built on them

#![warn(missing_docs)]

mod allow_list;
mod batch;
mod checker;
mod error;
mod fix;
mod store;

pub use allow_list::{AllowList, AllowListSource, StaticWords};
pub use batch::{BatchOptions, BatchProgress, BatchRunner, CheckedDocument, DocumentReport};
pub use checker::{Checker, Issue, truncate_chars};
pub use error::CheckError;
pub use fix::{IssueOutcome, apply_issues, fix_document};
pub use store::{DocumentStore, MemoryStore};
