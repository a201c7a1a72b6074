//! redline: corrections for structured CMS documents
//!
//! A CMS page is a JSON tree: a title, an optional hero, a rich-text body and a list of
//! layout blocks. Language checkers only understand plain text. redline flattens a page into
//! one text, keeps a map from every character back to the node it came from, and uses that
//! map to write a checker's suggestions back into the tree without touching formatting.

#![warn(missing_docs)]

pub mod cli;
