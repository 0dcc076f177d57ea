//! Path construction for the on-disk FAQ tree.
//!
//! Layout under a storage root `R`:
//!
//! ```text
//! R/config.toml
//! R/categories.xml
//! R/<categoryAlias>/category.xml
//! R/<categoryAlias>/<faqAlias>/faq.xml
//! R/<categoryAlias>/<faqAlias>/answer.html
//! ```

use std::path::{Path, PathBuf};

use crate::domain::Alias;

pub(crate) fn config_path(root: &Path) -> PathBuf {
    root.join("config.toml")
}

pub(crate) fn manifest_path(root: &Path) -> PathBuf {
    root.join("categories.xml")
}

pub(crate) fn category_dir(root: &Path, category: &Alias) -> PathBuf {
    root.join(category.as_str())
}

pub(crate) fn category_file(root: &Path, category: &Alias) -> PathBuf {
    category_dir(root, category).join("category.xml")
}

pub(crate) fn faq_dir(root: &Path, category: &Alias, faq: &Alias) -> PathBuf {
    category_dir(root, category).join(faq.as_str())
}

pub(crate) fn faq_file(root: &Path, category: &Alias, faq: &Alias) -> PathBuf {
    faq_dir(root, category, faq).join("faq.xml")
}

pub(crate) fn answer_file(root: &Path, category: &Alias, faq: &Alias) -> PathBuf {
    faq_dir(root, category, faq).join("answer.html")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faq_paths_nest_under_category() {
        let root = Path::new("/data/faq");
        let category = Alias::try_from("general").unwrap();
        let faq = Alias::try_from("what-is-php").unwrap();

        assert_eq!(
            faq_file(root, &category, &faq),
            Path::new("/data/faq/general/what-is-php/faq.xml")
        );
        assert_eq!(
            answer_file(root, &category, &faq),
            Path::new("/data/faq/general/what-is-php/answer.html")
        );
        assert_eq!(
            category_file(root, &category),
            Path::new("/data/faq/general/category.xml")
        );
    }
}
