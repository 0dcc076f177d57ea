use std::{fs, io, io::Write, path::Path};

use crate::{
    domain::{Alias, AliasRegistry, Config, Faq, ValidationError},
    storage::{self, LoadError, xml},
};

/// A named, keyworded grouping owning an ordered list of FAQ entries.
///
/// The category enforces sibling alias uniqueness: no two of its entries
/// may share an alias. Checks are linear scans over the (small) entry
/// list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub(crate) alias: Alias,
    pub(crate) name: String,
    pub(crate) keywords: String,
    pub(crate) faqs: Vec<Faq>,
}

impl Category {
    /// Creates a new, empty category.
    #[must_use]
    pub fn new(alias: Alias, name: impl Into<String>, keywords: impl Into<String>) -> Self {
        Self {
            alias,
            name: name.into(),
            keywords: keywords.into(),
            faqs: Vec::new(),
        }
    }

    /// The unique category alias.
    #[must_use]
    pub const fn alias(&self) -> &Alias {
        &self.alias
    }

    /// The category display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The comma-separated keyword list.
    #[must_use]
    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    /// The FAQ entries of this category, in order.
    #[must_use]
    pub fn faqs(&self) -> &[Faq] {
        &self.faqs
    }

    /// Returns the entry at the given index.
    #[must_use]
    pub fn faq(&self, index: usize) -> Option<&Faq> {
        self.faqs.get(index)
    }

    /// Returns the entry with the given alias.
    #[must_use]
    pub fn faq_by_alias(&self, alias: &Alias) -> Option<&Faq> {
        self.index_of_faq(alias).map(|i| &self.faqs[i])
    }

    /// Returns a mutable reference to the entry with the given alias.
    #[must_use]
    pub fn faq_by_alias_mut(&mut self, alias: &Alias) -> Option<&mut Faq> {
        self.index_of_faq(alias).map(|i| &mut self.faqs[i])
    }

    /// Sets the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Sets the comma-separated keyword list.
    pub fn set_keywords(&mut self, keywords: impl Into<String>) {
        self.keywords = keywords.into();
    }

    /// Returns the index of the entry with the given alias.
    #[must_use]
    pub fn index_of_faq(&self, alias: &Alias) -> Option<usize> {
        self.faqs.iter().position(|f| f.alias() == alias)
    }

    /// Returns whether this alias exists in this category or anywhere in
    /// the given wider scope (typically the owning collection).
    #[must_use]
    pub fn global_faq_alias_exists(&self, alias: &Alias, scope: &dyn AliasRegistry) -> bool {
        self.contains_faq_alias(alias) || scope.contains_faq_alias(alias)
    }

    /// Appends an entry to the category.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateFaqAlias`] if an entry with the
    /// same alias is already present; the list is left unchanged.
    pub fn push_faq(&mut self, faq: Faq) -> Result<(), ValidationError> {
        if self.contains_faq_alias(faq.alias()) {
            return Err(ValidationError::DuplicateFaqAlias(faq.alias().clone()));
        }
        self.faqs.push(faq);
        Ok(())
    }

    /// Removes and returns the entry with the given alias.
    ///
    /// The entry's folder stays on disk until the next save prunes it.
    pub fn remove_faq(&mut self, alias: &Alias) -> Option<Faq> {
        self.index_of_faq(alias).map(|i| self.faqs.remove(i))
    }

    /// Renames the entry with alias `current` to `new`.
    ///
    /// A no-op when `new` equals `current`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownAlias`] if no entry uses
    /// `current`, or [`ValidationError::DuplicateFaqAlias`] if a sibling
    /// already uses `new`; the current alias is left intact.
    pub fn rename_faq(&mut self, current: &Alias, new: Alias) -> Result<(), ValidationError> {
        let Some(index) = self.index_of_faq(current) else {
            return Err(ValidationError::UnknownAlias(current.clone()));
        };
        if &new != current && self.contains_faq_alias(&new) {
            return Err(ValidationError::DuplicateFaqAlias(new));
        }
        self.faqs[index].alias = new;
        Ok(())
    }

    /// Loads a category and all of its FAQ entries from
    /// `root/<alias>/category.xml`.
    ///
    /// Entries listed in the category file that fail to load are skipped
    /// with a warning; the category itself still loads.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotFound`] if the category file is absent, and
    /// other [`LoadError`] variants for malformed documents.
    pub fn load(root: &Path, alias: &Alias) -> Result<Self, LoadError> {
        let content = xml::read_file(&storage::category_file(root, alias))?;
        let raw = xml::read_category(&content)?;

        let mut category = Self::new(Alias::new(raw.alias)?, raw.name, raw.keywords);
        for entry in raw.faq_aliases {
            let Ok(faq_alias) = Alias::new(entry.clone()) else {
                tracing::warn!("skipping FAQ entry with invalid alias '{entry}'");
                continue;
            };
            match Faq::load(root, category.alias(), &faq_alias) {
                Ok(faq) => {
                    if let Err(e) = category.push_faq(faq) {
                        tracing::warn!("skipping FAQ entry '{faq_alias}': {e}");
                    }
                }
                Err(e) => tracing::warn!("skipping FAQ entry '{faq_alias}': {e}"),
            }
        }
        Ok(category)
    }

    /// Saves the category and all of its FAQ entries under `root/<alias>/`.
    ///
    /// Writes `category.xml` (including the redundant ordered `<Faqs>`
    /// listing), saves every entry, and, when pruning is enabled in the
    /// configuration, deletes subfolders whose name is no longer a known
    /// entry alias.
    ///
    /// # Errors
    ///
    /// Returns an error if any file or folder cannot be written or
    /// removed.
    pub fn save(&self, root: &Path, config: &Config) -> io::Result<()> {
        let dir = storage::category_dir(root, &self.alias);
        fs::create_dir_all(&dir)?;

        let file = fs::File::create(storage::category_file(root, &self.alias))?;
        let mut writer = io::BufWriter::new(file);
        xml::write_category(&mut writer, self)?;
        writer.flush()?;

        for faq in &self.faqs {
            faq.save(root, &self.alias)?;
        }

        if config.prune_on_save() {
            let keep: Vec<&str> = self.faqs.iter().map(|f| f.alias().as_str()).collect();
            storage::prune_unknown_dirs(&dir, &keep)?;
        }

        tracing::info!("saved category '{}'", self.alias);
        Ok(())
    }
}

impl AliasRegistry for Category {
    fn contains_faq_alias(&self, alias: &Alias) -> bool {
        self.faqs.iter().any(|f| f.alias() == alias)
    }
}
