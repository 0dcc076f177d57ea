mod paths;
pub(crate) use paths::{
    answer_file, category_dir, category_file, config_path, faq_dir, faq_file, manifest_path,
};

/// Directory reconciliation: pruning folders for entities that are gone
/// from the in-memory model.
pub mod reconcile;
pub use reconcile::delete_folder;
pub(crate) use reconcile::prune_unknown_dirs;

/// XML serialization for the FAQ tree.
pub mod xml;
pub use xml::LoadError;
