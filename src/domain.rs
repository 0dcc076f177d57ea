//! Domain models for the FAQ knowledge base.
//!
//! This module contains the core domain types: aliases, editors, FAQ
//! entries, categories, the root category collection, and configuration.

/// Alias newtype and validation.
pub mod alias;
pub use alias::{Alias, InvalidAliasError};

/// Editor records attributed to FAQ entries.
pub mod editor;
pub use editor::Editor;

/// FAQ entry domain model and persistence.
pub mod faq;
pub use faq::Faq;

/// Category domain model and persistence.
pub mod category;
pub use category::Category;

mod collection;
pub use collection::CategoryCollection;

mod config;
pub use config::Config;

mod registry;
pub use registry::{AliasRegistry, ValidationError};
