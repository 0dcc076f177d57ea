use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// A contributor attributed on a FAQ entry: a name plus the date of their
/// last edit.
///
/// Editors are owned exclusively by one [`Faq`](crate::Faq). Timestamps are
/// stored at day resolution on disk; the time-of-day component is discarded
/// on every round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    name: String,
    last_edit: DateTime<Utc>,
}

impl Editor {
    /// Creates an editor from a name and a timestamp.
    #[must_use]
    pub fn new(name: impl Into<String>, last_edit: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            last_edit,
        }
    }

    /// Creates an editor from a name and a free-form date string.
    ///
    /// The date is parsed best-effort: an unparseable string silently
    /// becomes the Unix epoch rather than an error. This lossy fallback is
    /// part of the contract; callers that need strict parsing should parse
    /// the date themselves.
    #[must_use]
    pub fn from_date_str(name: impl Into<String>, date: &str) -> Self {
        Self::new(name, parse_date_lenient(date))
    }

    /// The editor's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// When this editor last changed the owning FAQ entry.
    #[must_use]
    pub const fn last_edit(&self) -> DateTime<Utc> {
        self.last_edit
    }

    /// Sets the editor's name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Sets the last-edit timestamp.
    pub const fn set_last_edit(&mut self, last_edit: DateTime<Utc>) {
        self.last_edit = last_edit;
    }
}

/// Parses a date string, defaulting to the Unix epoch on failure.
///
/// Accepted formats are the wire format (`YYYY-MM-DD HH:MM:SS`), a bare
/// date (`YYYY-MM-DD`), and RFC 3339.
pub(crate) fn parse_date_lenient(s: &str) -> DateTime<Utc> {
    parse_date_opt(s).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Like [`parse_date_lenient`], but reports failure as `None`.
pub(crate) fn parse_date_opt(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    tracing::debug!("unparseable date '{s}', falling back to default");
    None
}

/// Formats a timestamp in the wire format, truncated to day resolution.
pub(crate) fn format_day(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d 00:00:00").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn from_date_str_parses_wire_format() {
        let editor = Editor::from_date_str("alice", "2024-03-05 14:30:12");
        assert_eq!(editor.name(), "alice");
        assert_eq!(
            editor.last_edit(),
            Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 12).unwrap()
        );
    }

    #[test]
    fn from_date_str_parses_bare_date() {
        let editor = Editor::from_date_str("bob", "2021-12-24");
        assert_eq!(
            editor.last_edit(),
            Utc.with_ymd_and_hms(2021, 12, 24, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn unparseable_date_defaults_to_epoch() {
        let editor = Editor::from_date_str("carol", "not a date");
        assert_eq!(editor.last_edit(), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn format_day_truncates_time() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 12).unwrap();
        assert_eq!(format_day(ts), "2024-03-05 00:00:00");
    }

    #[test]
    fn day_format_round_trip_normalises_to_midnight() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 23, 59, 59).unwrap();
        let parsed = parse_date_lenient(&format_day(ts));
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap());
    }
}
