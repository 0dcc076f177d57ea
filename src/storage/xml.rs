//! Reading and writing the XML documents of the FAQ tree.
//!
//! All three document kinds (`categories.xml`, `category.xml`, `faq.xml`)
//! are attribute-based UTF-8 XML with 2-space indentation. Reading is
//! lenient where the data model allows it: unknown elements are ignored
//! and invalid `<Editor>` entries are skipped, while missing required
//! fields abort the load of that one document.

use std::{
    fs, io,
    io::Write,
    path::Path,
};

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event, attributes::AttrError},
};

use crate::domain::{Alias, Category, Faq, alias::InvalidAliasError, editor::format_day};

/// Errors that can occur when loading an entity from its XML file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file was not found.
    #[error("file not found")]
    NotFound,
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The document is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// An attribute could not be parsed.
    #[error("malformed attribute: {0}")]
    Attr(#[from] AttrError),
    /// An escape sequence could not be decoded.
    #[error("malformed escape sequence: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
    /// A required attribute or element is absent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    /// An alias stored on disk does not match the required format.
    #[error(transparent)]
    Alias(#[from] InvalidAliasError),
}

/// Reads a file to a string, mapping a missing file to
/// [`LoadError::NotFound`].
pub(crate) fn read_file(path: &Path) -> Result<String, LoadError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(LoadError::NotFound),
        Err(e) => Err(LoadError::Io(e)),
    }
}

/// The fields of a `faq.xml` document, before domain validation.
#[derive(Debug)]
pub(crate) struct RawFaq {
    pub(crate) alias: String,
    pub(crate) author: String,
    pub(crate) created: Option<String>,
    pub(crate) question: String,
    pub(crate) keywords: String,
    pub(crate) editors: Vec<RawEditor>,
}

/// An `<Editor>` element with both required attributes present.
#[derive(Debug)]
pub(crate) struct RawEditor {
    pub(crate) name: String,
    pub(crate) last_edit: String,
}

/// The fields of a `category.xml` document, before domain validation.
#[derive(Debug)]
pub(crate) struct RawCategory {
    pub(crate) alias: String,
    pub(crate) name: String,
    pub(crate) keywords: String,
    pub(crate) faq_aliases: Vec<String>,
}

/// Parses a `categories.xml` manifest into its ordered alias list.
pub(crate) fn read_manifest(content: &str) -> Result<Vec<String>, LoadError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut aliases = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"Category" => {
                match attr(&e, "alias")? {
                    Some(alias) => aliases.push(alias),
                    None => tracing::debug!("skipping manifest entry without alias"),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(aliases)
}

/// Parses a `category.xml` document.
///
/// The `alias` attribute is required; `name` and `keywords` default to
/// empty. `<Faq>` listing entries without an alias are skipped.
pub(crate) fn read_category(content: &str) -> Result<RawCategory, LoadError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut root: Option<(String, String, String)> = None;
    let mut faq_aliases = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"Category" => {
                    let alias = required_attr(&e, "alias")?;
                    let name = attr(&e, "name")?.unwrap_or_default();
                    let keywords = attr(&e, "keywords")?.unwrap_or_default();
                    root = Some((alias, name, keywords));
                }
                b"Faq" => match attr(&e, "alias")? {
                    Some(alias) => faq_aliases.push(alias),
                    None => tracing::debug!("skipping FAQ listing entry without alias"),
                },
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    let (alias, name, keywords) = root.ok_or(LoadError::MissingField("Category"))?;
    Ok(RawCategory {
        alias,
        name,
        keywords,
        faq_aliases,
    })
}

/// Which text-bearing element is currently open while reading `faq.xml`.
enum TextField {
    Question,
    Keywords,
}

/// Parses a `faq.xml` document.
///
/// The `alias` and `author` attributes and the `<Question>` and
/// `<Keywords>` elements are required. `<Editor>` entries missing either
/// attribute are skipped rather than failing the load.
pub(crate) fn read_faq(content: &str) -> Result<RawFaq, LoadError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut root: Option<(String, String, Option<String>)> = None;
    let mut question: Option<String> = None;
    let mut keywords: Option<String> = None;
    let mut editors = Vec::new();
    let mut current: Option<TextField> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"Faq" => root = Some(read_faq_attrs(&e)?),
                b"Question" => {
                    question.get_or_insert_with(String::new);
                    current = Some(TextField::Question);
                }
                b"Keywords" => {
                    keywords.get_or_insert_with(String::new);
                    current = Some(TextField::Keywords);
                }
                b"Editor" => {
                    if let Some(editor) = read_editor(&e)? {
                        editors.push(editor);
                    }
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"Faq" => root = Some(read_faq_attrs(&e)?),
                b"Question" => {
                    question.get_or_insert_with(String::new);
                }
                b"Keywords" => {
                    keywords.get_or_insert_with(String::new);
                }
                b"Editor" => {
                    if let Some(editor) = read_editor(&e)? {
                        editors.push(editor);
                    }
                }
                _ => {}
            },
            // Text can arrive in several segments when a comment or CDATA
            // section splits it; append rather than assign.
            Event::Text(t) => {
                let text = t.unescape()?;
                match current {
                    Some(TextField::Question) => {
                        question.get_or_insert_default().push_str(&text);
                    }
                    Some(TextField::Keywords) => {
                        keywords.get_or_insert_default().push_str(&text);
                    }
                    None => {}
                }
            }
            Event::CData(t) => {
                let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                match current {
                    Some(TextField::Question) => {
                        question.get_or_insert_default().push_str(&text);
                    }
                    Some(TextField::Keywords) => {
                        keywords.get_or_insert_default().push_str(&text);
                    }
                    None => {}
                }
            }
            Event::End(_) => current = None,
            Event::Eof => break,
            _ => {}
        }
    }

    let (alias, author, created) = root.ok_or(LoadError::MissingField("Faq"))?;
    Ok(RawFaq {
        alias,
        author,
        created,
        question: question.ok_or(LoadError::MissingField("Question"))?,
        keywords: keywords.ok_or(LoadError::MissingField("Keywords"))?,
        editors,
    })
}

fn read_faq_attrs(e: &BytesStart) -> Result<(String, String, Option<String>), LoadError> {
    let alias = required_attr(e, "alias")?;
    let author = required_attr(e, "author")?;
    let created = attr(e, "created")?;
    Ok((alias, author, created))
}

fn read_editor(e: &BytesStart) -> Result<Option<RawEditor>, LoadError> {
    match (attr(e, "name")?, attr(e, "lastedit")?) {
        (Some(name), Some(last_edit)) => Ok(Some(RawEditor { name, last_edit })),
        _ => {
            tracing::debug!("skipping editor element with missing attributes");
            Ok(None)
        }
    }
}

fn attr(start: &BytesStart, name: &str) -> Result<Option<String>, LoadError> {
    let Some(attribute) = start.try_get_attribute(name)? else {
        return Ok(None);
    };
    Ok(Some(attribute.unescape_value()?.into_owned()))
}

fn required_attr(start: &BytesStart, name: &'static str) -> Result<String, LoadError> {
    attr(start, name)?.ok_or(LoadError::MissingField(name))
}

/// Writes a `categories.xml` manifest with the given ordered aliases.
pub(crate) fn write_manifest<W: Write>(writer: W, aliases: &[&Alias]) -> io::Result<()> {
    let mut xml = indented_writer(writer)?;
    if aliases.is_empty() {
        io_err(xml.write_event(Event::Empty(BytesStart::new("Categories"))))?;
        return Ok(());
    }
    io_err(xml.write_event(Event::Start(BytesStart::new("Categories"))))?;
    for alias in aliases {
        let mut entry = BytesStart::new("Category");
        entry.push_attribute(("alias", alias.as_str()));
        io_err(xml.write_event(Event::Empty(entry)))?;
    }
    io_err(xml.write_event(Event::End(BytesEnd::new("Categories"))))
}

/// Writes a `category.xml` document.
pub(crate) fn write_category<W: Write>(writer: W, category: &Category) -> io::Result<()> {
    let mut xml = indented_writer(writer)?;

    let mut root = BytesStart::new("Category");
    root.push_attribute(("alias", category.alias().as_str()));
    root.push_attribute(("name", category.name()));
    root.push_attribute(("keywords", category.keywords()));
    io_err(xml.write_event(Event::Start(root)))?;

    // The listing pins FAQ ordering; directory enumeration order is not
    // authoritative.
    io_err(xml.write_event(Event::Comment(BytesText::new(
        " The FAQs are listed here redundantly to pin their order. ",
    ))))?;

    if !category.faqs().is_empty() {
        io_err(xml.write_event(Event::Start(BytesStart::new("Faqs"))))?;
        for faq in category.faqs() {
            let mut entry = BytesStart::new("Faq");
            entry.push_attribute(("alias", faq.alias().as_str()));
            io_err(xml.write_event(Event::Empty(entry)))?;
        }
        io_err(xml.write_event(Event::End(BytesEnd::new("Faqs"))))?;
    }

    io_err(xml.write_event(Event::End(BytesEnd::new("Category"))))
}

/// Writes a `faq.xml` document.
pub(crate) fn write_faq<W: Write>(writer: W, faq: &Faq) -> io::Result<()> {
    let mut xml = indented_writer(writer)?;

    let mut root = BytesStart::new("Faq");
    root.push_attribute(("alias", faq.alias().as_str()));
    root.push_attribute(("author", faq.author()));
    if let Some(created) = faq.created() {
        root.push_attribute(("created", format_day(created).as_str()));
    }
    io_err(xml.write_event(Event::Start(root)))?;

    write_text_element(&mut xml, "Question", faq.question())?;
    write_text_element(&mut xml, "Keywords", faq.keywords())?;

    if !faq.editors().is_empty() {
        io_err(xml.write_event(Event::Start(BytesStart::new("Editors"))))?;
        for editor in faq.editors() {
            let mut entry = BytesStart::new("Editor");
            entry.push_attribute(("name", editor.name()));
            entry.push_attribute(("lastedit", format_day(editor.last_edit()).as_str()));
            io_err(xml.write_event(Event::Empty(entry)))?;
        }
        io_err(xml.write_event(Event::End(BytesEnd::new("Editors"))))?;
    }

    io_err(xml.write_event(Event::End(BytesEnd::new("Faq"))))
}

fn indented_writer<W: Write>(writer: W) -> io::Result<Writer<W>> {
    let mut xml = Writer::new_with_indent(writer, b' ', 2);
    io_err(xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None))))?;
    Ok(xml)
}

fn write_text_element<W: Write>(xml: &mut Writer<W>, name: &str, text: &str) -> io::Result<()> {
    io_err(xml.write_event(Event::Start(BytesStart::new(name))))?;
    io_err(xml.write_event(Event::Text(BytesText::new(text))))?;
    io_err(xml.write_event(Event::End(BytesEnd::new(name))))
}

fn io_err<T>(
    result: Result<T, impl Into<Box<dyn std::error::Error + Send + Sync>>>,
) -> io::Result<T> {
    result.map_err(io::Error::other)
}
