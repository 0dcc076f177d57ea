//! File-backed FAQ knowledge base
//!
//! Categories and FAQ entries are XML documents stored in a directory tree,
//! with per-FAQ answer bodies kept in sibling HTML files.

pub mod domain;
pub use domain::{
    Alias, AliasRegistry, Category, CategoryCollection, Config, Editor, Faq, ValidationError,
};

/// Filesystem storage and directory reconciliation for the FAQ tree.
pub mod storage;
pub use storage::{LoadError, delete_folder};
