use std::{fs, io, io::Write, path::Path};

use chrono::{DateTime, Utc};

use crate::{
    domain::{Alias, AliasRegistry, Editor, ValidationError, editor::parse_date_opt},
    storage::{self, LoadError, xml},
};

/// A question/answer record owned by exactly one category.
///
/// The answer body is not held in memory: it lives in a sibling
/// `answer.html` file and is read and written on demand through
/// [`Faq::answer`] and [`Faq::set_answer`]. Everything else round-trips
/// through the entry's `faq.xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Faq {
    pub(crate) alias: Alias,
    pub(crate) author: String,
    pub(crate) created: Option<DateTime<Utc>>,
    pub(crate) keywords: String,
    pub(crate) question: String,
    pub(crate) editors: Vec<Editor>,
}

impl Faq {
    /// Creates a new FAQ entry with no creation date, keywords, question
    /// or editors.
    #[must_use]
    pub fn new(alias: Alias, author: impl Into<String>) -> Self {
        Self {
            alias,
            author: author.into(),
            created: None,
            keywords: String::new(),
            question: String::new(),
            editors: Vec::new(),
        }
    }

    /// The unique alias of this entry.
    #[must_use]
    pub const fn alias(&self) -> &Alias {
        &self.alias
    }

    /// The name of the initial author.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// The optional creation date.
    #[must_use]
    pub const fn created(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    /// The comma-separated keyword list.
    #[must_use]
    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    /// The question text.
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    /// The editors attributed on this entry, in list order.
    #[must_use]
    pub fn editors(&self) -> &[Editor] {
        &self.editors
    }

    /// Returns the editor at the given index.
    #[must_use]
    pub fn editor(&self, index: usize) -> Option<&Editor> {
        self.editors.get(index)
    }

    /// The number of attributed editors.
    #[must_use]
    pub fn editor_count(&self) -> usize {
        self.editors.len()
    }

    /// Returns the index of the editor with the given name.
    #[must_use]
    pub fn index_of_editor(&self, name: &str) -> Option<usize> {
        self.editors.iter().position(|e| e.name() == name)
    }

    /// Renames this entry.
    ///
    /// A no-op when the alias is unchanged. The alias format itself is
    /// guaranteed by the [`Alias`] type; uniqueness is checked against the
    /// given registry (the owning category for sibling uniqueness, or the
    /// whole collection for global uniqueness).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateFaqAlias`] and leaves the
    /// current alias intact if the registry already knows the new alias.
    pub fn set_alias(
        &mut self,
        alias: Alias,
        registry: &dyn AliasRegistry,
    ) -> Result<(), ValidationError> {
        if self.alias == alias {
            return Ok(());
        }
        if registry.contains_faq_alias(&alias) {
            return Err(ValidationError::DuplicateFaqAlias(alias));
        }
        self.alias = alias;
        Ok(())
    }

    /// Sets the author name.
    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    /// Sets or clears the creation date.
    pub const fn set_created(&mut self, created: Option<DateTime<Utc>>) {
        self.created = created;
    }

    /// Sets the comma-separated keyword list.
    pub fn set_keywords(&mut self, keywords: impl Into<String>) {
        self.keywords = keywords.into();
    }

    /// Sets the question text.
    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    /// Replaces the whole editor list.
    pub fn set_editors(&mut self, editors: Vec<Editor>) {
        self.editors = editors;
    }

    /// Reads the answer HTML from `root/<category>/<alias>/answer.html`.
    ///
    /// A missing answer file yields an empty string, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn answer(&self, root: &Path, category: &Alias) -> io::Result<String> {
        match fs::read_to_string(storage::answer_file(root, category, &self.alias)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            other => other,
        }
    }

    /// Writes the answer HTML, creating or overwriting the file
    /// unconditionally.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn set_answer(&self, root: &Path, category: &Alias, answer: &str) -> io::Result<()> {
        fs::create_dir_all(storage::faq_dir(root, category, &self.alias))?;
        fs::write(storage::answer_file(root, category, &self.alias), answer)
    }

    /// Loads a FAQ entry from `root/<category>/<alias>/faq.xml`.
    ///
    /// Editor entries with missing attributes are skipped; unparseable
    /// dates degrade to their best-effort defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotFound`] if the file is absent, and other
    /// [`LoadError`] variants for unreadable or malformed documents.
    pub fn load(root: &Path, category: &Alias, alias: &Alias) -> Result<Self, LoadError> {
        let content = xml::read_file(&storage::faq_file(root, category, alias))?;
        let raw = xml::read_faq(&content)?;

        let editors = raw
            .editors
            .into_iter()
            .map(|e| Editor::from_date_str(e.name, &e.last_edit))
            .collect();

        Ok(Self {
            alias: Alias::new(raw.alias)?,
            author: raw.author,
            created: raw.created.as_deref().and_then(parse_date_opt),
            keywords: raw.keywords,
            question: raw.question,
            editors,
        })
    }

    /// Writes this entry's `faq.xml`, creating the entry folder if needed.
    ///
    /// The creation date is written only when present; the `<Editors>`
    /// block only when the list is non-empty. Orphaned answer files are
    /// not touched here.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder or file cannot be written.
    pub fn save(&self, root: &Path, category: &Alias) -> io::Result<()> {
        fs::create_dir_all(storage::faq_dir(root, category, &self.alias))?;
        let file = fs::File::create(storage::faq_file(root, category, &self.alias))?;
        let mut writer = io::BufWriter::new(file);
        xml::write_faq(&mut writer, self)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;
    use crate::domain::Category;

    fn alias(s: &str) -> Alias {
        Alias::try_from(s).unwrap()
    }

    fn sample_faq() -> Faq {
        let mut faq = Faq::new(alias("what-is-php"), "alice");
        faq.set_question("What is PHP?");
        faq.set_keywords("php, basics");
        faq.set_created(Some(Utc.with_ymd_and_hms(2020, 1, 15, 0, 0, 0).unwrap()));
        faq.set_editors(vec![
            Editor::new("bob", Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap()),
            Editor::new("carol", Utc.with_ymd_and_hms(2022, 2, 2, 0, 0, 0).unwrap()),
        ]);
        faq
    }

    #[test]
    fn save_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let category = alias("general");
        let faq = sample_faq();

        faq.save(tmp.path(), &category).unwrap();
        let loaded = Faq::load(tmp.path(), &category, faq.alias()).unwrap();

        assert_eq!(loaded, faq);
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = Faq::load(tmp.path(), &alias("general"), &alias("ghost"));
        assert!(matches!(result, Err(LoadError::NotFound)));
    }

    #[test]
    fn editor_timestamps_truncate_to_day_on_round_trip() {
        let tmp = TempDir::new().unwrap();
        let category = alias("general");

        let mut faq = Faq::new(alias("dates"), "alice");
        faq.set_question("?");
        faq.set_editors(vec![Editor::new(
            "bob",
            Utc.with_ymd_and_hms(2021, 6, 1, 14, 30, 59).unwrap(),
        )]);

        faq.save(tmp.path(), &category).unwrap();
        let loaded = Faq::load(tmp.path(), &category, faq.alias()).unwrap();

        assert_eq!(
            loaded.editors()[0].last_edit(),
            Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn missing_answer_file_yields_empty_string() {
        let tmp = TempDir::new().unwrap();
        let faq = sample_faq();
        let answer = faq.answer(tmp.path(), &alias("general")).unwrap();
        assert_eq!(answer, "");
    }

    #[test]
    fn answer_round_trip() {
        let tmp = TempDir::new().unwrap();
        let category = alias("general");
        let faq = sample_faq();

        faq.set_answer(tmp.path(), &category, "<p>PHP is a language.</p>")
            .unwrap();
        assert_eq!(
            faq.answer(tmp.path(), &category).unwrap(),
            "<p>PHP is a language.</p>"
        );
    }

    #[test]
    fn set_alias_rejects_sibling_collision() {
        let mut category = Category::new(alias("general"), "General", "");
        category.push_faq(Faq::new(alias("taken"), "alice")).unwrap();

        let mut faq = Faq::new(alias("free"), "bob");
        let result = faq.set_alias(alias("taken"), &category);

        assert_eq!(
            result,
            Err(ValidationError::DuplicateFaqAlias(alias("taken")))
        );
        assert_eq!(faq.alias(), &alias("free"));
    }

    #[test]
    fn set_alias_to_same_value_is_noop_success() {
        let category = Category::new(alias("general"), "General", "");
        let mut faq = Faq::new(alias("same"), "alice");
        faq.set_alias(alias("same"), &category).unwrap();
        assert_eq!(faq.alias(), &alias("same"));
    }

    #[test]
    fn index_of_editor_finds_by_name() {
        let faq = sample_faq();
        assert_eq!(faq.index_of_editor("carol"), Some(1));
        assert_eq!(faq.index_of_editor("mallory"), None);
        assert_eq!(faq.editor_count(), 2);
    }
}
