//! In-memory collection of font slots
//!
//! The collection is never edited in place: every change builds a new vector
//! and swaps it in, so snapshots handed out earlier stay consistent while
//! fetches for other slots are still in flight.

use std::sync::Arc;

use crate::record::{DEFAULT_SAMPLE_TEXT, FontId, FontRecord, ParsedFont, PreviewStyle, VariableAxes};
use crate::Error;

/// All font slots of one session
#[derive(Debug, Clone)]
pub struct FontSession {
    records: Arc<Vec<FontRecord>>,
    next_id: u64,
    default_sample_text: String,
}

impl Default for FontSession {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_TEXT)
    }
}

impl FontSession {
    /// Empty session; new slots start with `sample_text`
    pub fn new(sample_text: impl Into<String>) -> Self {
        Self {
            records: Arc::new(Vec::new()),
            next_id: 1,
            default_sample_text: sample_text.into(),
        }
    }

    /// Current snapshot of all records
    pub fn records(&self) -> Arc<Vec<FontRecord>> {
        Arc::clone(&self.records)
    }

    pub fn get(&self, id: FontId) -> Option<&FontRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add an empty slot
    pub fn add_font(&mut self) -> FontId {
        let id = FontId::new(self.next_id);
        self.next_id += 1;

        let record = FontRecord::empty(id, &self.default_sample_text);
        self.replace(|records| records.push(record));
        tracing::debug!(%id, "added font slot");
        id
    }

    /// Remove a slot. Returns false if it doesn't exist.
    pub fn remove_font(&mut self, id: FontId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.replace(|records| records.retain(|r| r.id() != id));
        tracing::debug!(%id, "removed font slot");
        true
    }

    /// Set the stylesheet URL of a slot that hasn't been processed yet
    pub fn set_source_url(&mut self, id: FontId, url: impl Into<String>) -> Result<(), Error> {
        let record = self.require(id)?;
        if record.is_populated() {
            return Err(Error::input(format!(
                "{id} has already been processed; add a new font instead"
            )));
        }
        let url = url.into();
        self.update(id, |record| record.set_source_url(url));
        Ok(())
    }

    /// Merge the outcome of a fetch + parse into a slot.
    ///
    /// On success the stylesheet data replaces the previous state and the
    /// error is cleared. On failure only `last_error` changes.
    pub fn apply_result(&mut self, id: FontId, result: &Result<ParsedFont, Error>) -> Result<(), Error> {
        self.require(id)?;
        match result {
            Ok(parsed) => {
                let parsed = parsed.clone();
                self.update(id, |record| record.apply_parsed(parsed));
            }
            Err(error) => self.update(id, |record| record.set_error(error)),
        }
        Ok(())
    }

    pub fn set_sample_text(&mut self, id: FontId, text: impl Into<String>) -> Result<(), Error> {
        self.require(id)?;
        let text = text.into();
        self.update(id, |record| record.set_sample_text(text));
        Ok(())
    }

    pub fn set_preview_style(&mut self, id: FontId, style: PreviewStyle) -> Result<(), Error> {
        self.require(id)?;
        self.update(id, |record| record.set_preview_style(style));
        Ok(())
    }

    /// Update the axis values of a variable font
    pub fn set_variable_axes(&mut self, id: FontId, axes: VariableAxes) -> Result<(), Error> {
        let record = self.require(id)?;
        if !record.is_variable_font() {
            return Err(Error::input(format!(
                "{} is not a variable font",
                display_label(record)
            )));
        }
        self.update(id, |record| record.set_variable_axes(axes));
        Ok(())
    }

    /// Family names of all populated slots, in slot order
    pub fn family_names(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.is_populated())
            .map(|r| r.display_name())
            .collect()
    }

    fn require(&self, id: FontId) -> Result<&FontRecord, Error> {
        self.get(id)
            .ok_or_else(|| Error::input(format!("no such font slot: {id}")))
    }

    fn update(&mut self, id: FontId, f: impl FnOnce(&mut FontRecord)) {
        self.replace(|records| {
            if let Some(record) = records.iter_mut().find(|r| r.id() == id) {
                f(record);
            }
        });
    }

    /// Build the next collection from a copy of the current one and swap it in
    fn replace(&mut self, f: impl FnOnce(&mut Vec<FontRecord>)) {
        let mut next = Vec::clone(&self.records);
        f(&mut next);
        self.records = Arc::new(next);
    }
}

fn display_label(record: &FontRecord) -> String {
    if record.display_name().is_empty() {
        record.id().to_string()
    } else {
        record.display_name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Axis;
    use localfont_css::StylesheetInfo;

    fn parsed(family: &str, variable: bool) -> ParsedFont {
        ParsedFont {
            source_url: format!("https://fonts.googleapis.com/css2?family={family}"),
            stylesheet: format!("@font-face {{ font-family: '{family}'; font-weight: 400; }}"),
            info: StylesheetInfo {
                family: family.to_string(),
                weights: vec!["400".to_string()],
                is_variable: variable,
            },
            estimated_size_kb: 1,
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let mut session = FontSession::default();
        let a = session.add_font();
        let b = session.add_font();
        session.remove_font(a);
        let c = session.add_font();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn test_remove_unknown_slot() {
        let mut session = FontSession::default();
        let id = session.add_font();
        assert!(session.remove_font(id));
        assert!(!session.remove_font(id));
        assert!(session.is_empty());
    }

    #[test]
    fn test_new_slot_uses_session_sample_text() {
        let mut session = FontSession::new("abc");
        let id = session.add_font();
        assert_eq!(session.get(id).unwrap().sample_text(), "abc");
        assert_eq!(session.get(id).unwrap().subset_ranges(), "U+61-63");
    }

    #[test]
    fn test_success_populates_record() {
        let mut session = FontSession::default();
        let id = session.add_font();
        session.apply_result(id, &Ok(parsed("Inter", false))).unwrap();

        let record = session.get(id).unwrap();
        assert_eq!(record.display_name(), "Inter");
        assert!(record.is_populated());
        assert_eq!(record.declared_weights(), ["400"]);
        assert!(record.last_error().is_none());
        assert!(record.variable_axes().is_empty());
    }

    #[test]
    fn test_failure_keeps_prior_state() {
        let mut session = FontSession::default();
        let id = session.add_font();
        session.apply_result(id, &Ok(parsed("Inter", false))).unwrap();

        let failure = Err(Error::Network("HTTP 500".to_string()));
        session.apply_result(id, &failure).unwrap();

        let record = session.get(id).unwrap();
        assert_eq!(record.display_name(), "Inter");
        assert!(record.is_populated());
        assert_eq!(record.last_error(), Some("HTTP 500"));

        // A later success clears the error again
        session.apply_result(id, &Ok(parsed("Inter", false))).unwrap();
        assert!(session.get(id).unwrap().last_error().is_none());
    }

    #[test]
    fn test_failure_is_isolated_to_slot() {
        let mut session = FontSession::default();
        let good = session.add_font();
        let bad = session.add_font();
        session.apply_result(good, &Ok(parsed("Lato", false))).unwrap();
        session
            .apply_result(bad, &Err(Error::Parse("could not extract font family name".into())))
            .unwrap();

        assert!(session.get(good).unwrap().last_error().is_none());
        assert!(!session.get(bad).unwrap().is_populated());
        assert_eq!(session.family_names(), vec!["Lato"]);
    }

    #[test]
    fn test_snapshots_are_not_mutated() {
        let mut session = FontSession::default();
        let id = session.add_font();
        let before = session.records();
        session.apply_result(id, &Ok(parsed("Inter", false))).unwrap();

        assert!(!before[0].is_populated());
        assert!(session.records()[0].is_populated());
    }

    #[test]
    fn test_source_url_locked_after_processing() {
        let mut session = FontSession::default();
        let id = session.add_font();
        session
            .set_source_url(id, "https://fonts.googleapis.com/css2?family=Inter")
            .unwrap();
        session.apply_result(id, &Ok(parsed("Inter", false))).unwrap();

        let err = session
            .set_source_url(id, "https://fonts.googleapis.com/css2?family=Lato")
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Input);
    }

    #[test]
    fn test_variable_axes() {
        let mut session = FontSession::default();
        let static_font = session.add_font();
        let variable_font = session.add_font();
        session.apply_result(static_font, &Ok(parsed("Lato", false))).unwrap();
        session.apply_result(variable_font, &Ok(parsed("Inter", true))).unwrap();

        let record = session.get(variable_font).unwrap();
        assert_eq!(record.variable_axes().get(Axis::Weight), Some(400.0));

        let axes = record.variable_axes().with(Axis::Weight, 650.0).unwrap();
        session.set_variable_axes(variable_font, axes).unwrap();
        assert_eq!(
            session.get(variable_font).unwrap().variable_axes().get(Axis::Weight),
            Some(650.0)
        );

        assert!(session.set_variable_axes(static_font, axes).is_err());
        assert!(session.get(static_font).unwrap().variable_axes().is_empty());
    }

    #[test]
    fn test_unknown_slot_is_input_error() {
        let mut session = FontSession::default();
        let id = session.add_font();
        session.remove_font(id);
        let err = session.set_sample_text(id, "x").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Input);
    }
}
