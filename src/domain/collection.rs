use std::{
    fs, io,
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    domain::{Alias, AliasRegistry, Category, Config, ValidationError},
    storage::{self, LoadError, xml},
};

/// The root of a FAQ knowledge base: an ordered list of categories bound
/// to a storage directory.
///
/// The collection is always bound to a root path, so every load and save
/// operation knows where to go. Category order is authoritative here (and
/// in the on-disk manifest), not the directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCollection {
    root: PathBuf,
    config: Config,
    categories: Vec<Category>,
}

impl CategoryCollection {
    /// Creates an empty collection bound to the given storage root, with
    /// default configuration.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: Config::default(),
            categories: Vec::new(),
        }
    }

    /// Loads a collection from the given storage root.
    ///
    /// Loading is forgiving: a missing or unreadable manifest yields an
    /// empty collection, and individual categories that fail to load are
    /// skipped with a warning. Folders on disk that the manifest does not
    /// list are ignored entirely.
    #[must_use]
    pub fn load(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let config = load_config(&root);
        let mut collection = Self {
            root,
            config,
            categories: Vec::new(),
        };

        let manifest = match xml::read_file(&storage::manifest_path(&collection.root)) {
            Ok(content) => content,
            Err(LoadError::NotFound) => return collection,
            Err(e) => {
                tracing::warn!("failed to read category manifest: {e}");
                return collection;
            }
        };
        let aliases = match xml::read_manifest(&manifest) {
            Ok(aliases) => aliases,
            Err(e) => {
                tracing::warn!("failed to parse category manifest: {e}");
                return collection;
            }
        };

        for entry in aliases {
            let Ok(alias) = Alias::new(entry.clone()) else {
                tracing::warn!("skipping category with invalid alias '{entry}'");
                continue;
            };
            match Category::load(&collection.root, &alias) {
                Ok(category) => {
                    if let Err(e) = collection.push_category(category) {
                        tracing::warn!("skipping category '{alias}': {e}");
                    }
                }
                Err(e) => tracing::warn!("skipping category '{alias}': {e}"),
            }
        }
        collection
    }

    /// The storage root this collection is bound to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The collection configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the collection configuration.
    pub const fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// The number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns whether the collection holds no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Iterates over the categories in order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// Returns the category at the given index.
    #[must_use]
    pub fn category(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    /// Returns the category with the given alias.
    #[must_use]
    pub fn category_by_alias(&self, alias: &Alias) -> Option<&Category> {
        self.index_of(alias).map(|i| &self.categories[i])
    }

    /// Returns a mutable reference to the category with the given alias.
    #[must_use]
    pub fn category_by_alias_mut(&mut self, alias: &Alias) -> Option<&mut Category> {
        self.index_of(alias).map(|i| &mut self.categories[i])
    }

    /// Returns the index of the category with the given alias.
    #[must_use]
    pub fn index_of(&self, alias: &Alias) -> Option<usize> {
        self.categories.iter().position(|c| c.alias() == alias)
    }

    /// Returns whether a category with the given alias exists.
    #[must_use]
    pub fn contains_alias(&self, alias: &Alias) -> bool {
        self.index_of(alias).is_some()
    }

    /// Appends a category to the collection.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateCategoryAlias`] if a category
    /// with the same alias exists, or
    /// [`ValidationError::DuplicateFaqAlias`] if any of the category's
    /// entries collides with an entry elsewhere in the collection. The
    /// collection is left unchanged on error.
    pub fn push_category(&mut self, category: Category) -> Result<(), ValidationError> {
        if self.contains_alias(category.alias()) {
            return Err(ValidationError::DuplicateCategoryAlias(
                category.alias().clone(),
            ));
        }
        if let Some(faq) = category
            .faqs()
            .iter()
            .find(|f| self.contains_faq_alias(f.alias()))
        {
            return Err(ValidationError::DuplicateFaqAlias(faq.alias().clone()));
        }
        self.categories.push(category);
        Ok(())
    }

    /// Removes and returns the category with the given alias.
    ///
    /// The category's folder stays on disk until the next save prunes it.
    pub fn remove_category(&mut self, alias: &Alias) -> Option<Category> {
        self.index_of(alias).map(|i| self.categories.remove(i))
    }

    /// Renames the category with alias `current` to `new`.
    ///
    /// A no-op when `new` equals `current`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownAlias`] if no category uses
    /// `current`, or [`ValidationError::DuplicateCategoryAlias`] if
    /// another category already uses `new`; the current alias is left
    /// intact.
    pub fn rename_category(&mut self, current: &Alias, new: Alias) -> Result<(), ValidationError> {
        let Some(index) = self.index_of(current) else {
            return Err(ValidationError::UnknownAlias(current.clone()));
        };
        if &new != current && self.contains_alias(&new) {
            return Err(ValidationError::DuplicateCategoryAlias(new));
        }
        self.categories[index].alias = new;
        Ok(())
    }

    /// Moves the category at `index` one position earlier.
    ///
    /// Returns `false` (and changes nothing) when the index is `0` or out
    /// of bounds.
    pub fn move_category_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.categories.len() {
            return false;
        }
        let category = self.categories.remove(index);
        self.categories.insert(index - 1, category);
        true
    }

    /// Moves the category at `index` one position later.
    ///
    /// Returns `false` (and changes nothing) when the index is the last
    /// one or out of bounds.
    pub fn move_category_down(&mut self, index: usize) -> bool {
        if index >= self.categories.len().saturating_sub(1) {
            return false;
        }
        let category = self.categories.remove(index);
        self.categories.insert(index + 1, category);
        true
    }

    /// Saves the whole collection to its storage root.
    ///
    /// Writes `categories.xml` in collection order, saves every category
    /// (which saves its entries in turn), and, when pruning is enabled,
    /// deletes root subfolders whose name is no longer a known category
    /// alias.
    ///
    /// # Errors
    ///
    /// Returns an error if any file or folder cannot be written or
    /// removed.
    pub fn save(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;

        let file = fs::File::create(storage::manifest_path(&self.root))?;
        let mut writer = io::BufWriter::new(file);
        let aliases: Vec<&Alias> = self.categories.iter().map(Category::alias).collect();
        xml::write_manifest(&mut writer, &aliases)?;
        writer.flush()?;

        for category in &self.categories {
            category.save(&self.root, &self.config)?;
        }

        if self.config.prune_on_save() {
            let keep: Vec<&str> = self.categories.iter().map(|c| c.alias().as_str()).collect();
            storage::prune_unknown_dirs(&self.root, &keep)?;
        }

        tracing::info!(
            "saved {} categories to {}",
            self.categories.len(),
            self.root.display()
        );
        Ok(())
    }

    /// Rebinds the collection to a different storage root and saves it
    /// there.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not an existing directory, or if the
    /// save itself fails. The collection stays bound to the new root even
    /// if the save fails partway.
    pub fn save_to(&mut self, root: impl Into<PathBuf>) -> io::Result<()> {
        let root = root.into();
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", root.display()),
            ));
        }
        self.root = root;
        self.save()
    }
}

impl<'a> IntoIterator for &'a CategoryCollection {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}

impl AliasRegistry for CategoryCollection {
    fn contains_faq_alias(&self, alias: &Alias) -> bool {
        self.categories.iter().any(|c| c.contains_faq_alias(alias))
    }
}

fn load_config(root: &Path) -> Config {
    Config::load(&storage::config_path(root)).unwrap_or_else(|e| {
        tracing::debug!("using default config: {e}");
        Config::default()
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::domain::Faq;

    fn alias(s: &str) -> Alias {
        Alias::try_from(s).unwrap()
    }

    fn category(cat: &str, faq_aliases: &[&str]) -> Category {
        let mut category = Category::new(alias(cat), cat.to_uppercase(), "");
        for f in faq_aliases {
            let mut faq = Faq::new(alias(f), "alice");
            faq.set_question(format!("{f}?"));
            category.push_faq(faq).unwrap();
        }
        category
    }

    fn sample_collection(root: &Path) -> CategoryCollection {
        let mut collection = CategoryCollection::new(root);
        collection
            .push_category(category("general", &["what", "why"]))
            .unwrap();
        collection
            .push_category(category("install", &["how"]))
            .unwrap();
        collection
    }

    #[test]
    fn load_from_empty_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let collection = CategoryCollection::load(tmp.path());
        assert!(collection.is_empty());
        assert_eq!(collection.root(), tmp.path());
    }

    #[test]
    fn save_load_round_trip_preserves_order() {
        let tmp = TempDir::new().unwrap();
        let collection = sample_collection(tmp.path());

        collection.save().unwrap();
        let loaded = CategoryCollection::load(tmp.path());

        assert_eq!(loaded, collection);
    }

    #[test]
    fn manifest_order_wins_over_directory_order() {
        let tmp = TempDir::new().unwrap();
        let mut collection = sample_collection(tmp.path());
        // "install" sorts before "general" in a directory listing
        assert!(collection.move_category_down(0));
        collection.save().unwrap();

        let loaded = CategoryCollection::load(tmp.path());
        assert_eq!(loaded.category(0).unwrap().alias(), &alias("install"));
        assert_eq!(loaded.category(1).unwrap().alias(), &alias("general"));
    }

    #[test]
    fn move_up_swaps_with_predecessor() {
        let tmp = TempDir::new().unwrap();
        let mut collection = sample_collection(tmp.path());
        collection.push_category(category("misc", &[])).unwrap();

        assert!(collection.move_category_up(2));
        let order: Vec<_> = collection.iter().map(|c| c.alias().as_str()).collect();
        assert_eq!(order, ["general", "misc", "install"]);
    }

    #[test]
    fn move_up_first_and_down_last_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut collection = sample_collection(tmp.path());

        assert!(!collection.move_category_up(0));
        assert!(!collection.move_category_down(1));
        assert!(!collection.move_category_up(99));

        let order: Vec<_> = collection.iter().map(|c| c.alias().as_str()).collect();
        assert_eq!(order, ["general", "install"]);
    }

    #[test]
    fn move_down_far_out_of_range_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut collection = sample_collection(tmp.path());

        assert!(!collection.move_category_down(99));
        assert!(!collection.move_category_down(usize::MAX));

        let order: Vec<_> = collection.iter().map(|c| c.alias().as_str()).collect();
        assert_eq!(order, ["general", "install"]);
    }

    #[test]
    fn moves_on_empty_collection_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut collection = CategoryCollection::new(tmp.path());

        assert!(!collection.move_category_up(0));
        assert!(!collection.move_category_down(0));
    }

    #[test]
    fn push_category_rejects_duplicate_category_alias() {
        let tmp = TempDir::new().unwrap();
        let mut collection = sample_collection(tmp.path());

        let result = collection.push_category(category("general", &[]));
        assert_eq!(
            result,
            Err(ValidationError::DuplicateCategoryAlias(alias("general")))
        );
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn push_category_rejects_cross_category_faq_collision() {
        let tmp = TempDir::new().unwrap();
        let mut collection = sample_collection(tmp.path());

        // "how" already lives in "install"
        let result = collection.push_category(category("misc", &["how"]));
        assert_eq!(
            result,
            Err(ValidationError::DuplicateFaqAlias(alias("how")))
        );
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn contains_faq_alias_cascades_over_categories() {
        let tmp = TempDir::new().unwrap();
        let collection = sample_collection(tmp.path());

        assert!(collection.contains_faq_alias(&alias("what")));
        assert!(collection.contains_faq_alias(&alias("how")));
        assert!(!collection.contains_faq_alias(&alias("nowhere")));
    }

    #[test]
    fn rename_category_rejects_collision() {
        let tmp = TempDir::new().unwrap();
        let mut collection = sample_collection(tmp.path());

        let result = collection.rename_category(&alias("install"), alias("general"));
        assert_eq!(
            result,
            Err(ValidationError::DuplicateCategoryAlias(alias("general")))
        );
        assert_eq!(collection.category(1).unwrap().alias(), &alias("install"));
    }

    #[test]
    fn rename_category_of_unknown_alias_is_reported() {
        let tmp = TempDir::new().unwrap();
        let mut collection = sample_collection(tmp.path());

        let result = collection.rename_category(&alias("missing"), alias("anything"));
        assert_eq!(result, Err(ValidationError::UnknownAlias(alias("missing"))));
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn save_prunes_unlisted_category_folder() {
        let tmp = TempDir::new().unwrap();
        let mut collection = sample_collection(tmp.path());
        collection.save().unwrap();

        collection.remove_category(&alias("install")).unwrap();
        collection.save().unwrap();

        assert!(!tmp.path().join("install").exists());
        assert!(tmp.path().join("general/what/faq.xml").exists());
    }

    #[test]
    fn save_to_rejects_non_directory() {
        let tmp = TempDir::new().unwrap();
        let mut collection = sample_collection(tmp.path());

        let error = collection
            .save_to(tmp.path().join("does-not-exist"))
            .unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::NotADirectory);
    }

    #[test]
    fn save_to_writes_full_tree_at_new_root() {
        let tmp = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        let mut collection = sample_collection(tmp.path());

        collection.save_to(target.path()).unwrap();

        assert_eq!(collection.root(), target.path());
        assert!(target.path().join("categories.xml").exists());
        assert!(target.path().join("install/how/faq.xml").exists());
        let loaded = CategoryCollection::load(target.path());
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn load_reads_config_from_root() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            storage::config_path(tmp.path()),
            "_version = \"1\"\nprune_on_save = false\n",
        )
        .unwrap();

        let collection = CategoryCollection::load(tmp.path());
        assert!(!collection.config().prune_on_save());
    }

    #[test]
    fn load_skips_unloadable_listed_category() {
        let tmp = TempDir::new().unwrap();
        let collection = sample_collection(tmp.path());
        collection.save().unwrap();

        fs::remove_dir_all(tmp.path().join("general")).unwrap();

        let loaded = CategoryCollection::load(tmp.path());
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.category(0).unwrap().alias(), &alias("install"));
    }
}
