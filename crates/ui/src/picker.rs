//! Patient picker: typeahead-by-numeric-entry on a selection control.
//!
//! The user types digits straight into the select; the composed query is
//! capped at a full cédula, echoed into the placeholder option, and
//! searched server-side after a debounce (driven by the caller through
//! `intake-client`). The currently selected option survives list
//! replacement even when the search results exclude it.

use intake_core::MessageCatalog;
use intake_types::PatientSummary;

use crate::effect::{Effect, SelectOption};

/// Keys the selection control reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    /// Any other printable character; always suppressed.
    OtherChar,
    Backspace,
    Delete,
    Enter,
    Escape,
    ArrowDown,
    ArrowUp,
}

/// What a keystroke produced.
#[derive(Debug, Default)]
pub struct KeyOutcome {
    pub effects: Vec<Effect>,
    /// Issue a debounced search for this query.
    pub search: Option<String>,
    /// Enter confirmed the single remaining match.
    pub picked: Option<PatientSummary>,
}

/// State of the patient selection control.
#[derive(Debug, Clone)]
pub struct PatientPicker {
    texts: MessageCatalog,
    initial: Vec<PatientSummary>,
    current: Vec<PatientSummary>,
    typing: String,
    is_typing: bool,
    selected: Option<i64>,
    last_selected: Option<i64>,
}

impl PatientPicker {
    /// `initial` is the option list rendered at page load.
    pub fn new(texts: MessageCatalog, initial: Vec<PatientSummary>) -> Self {
        Self {
            texts,
            current: initial.clone(),
            initial,
            typing: String::new(),
            is_typing: false,
            selected: None,
            last_selected: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.typing
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected
    }

    /// Current option rows, for rendering.
    pub fn options(&self) -> Vec<SelectOption> {
        self.current.iter().map(SelectOption::from).collect()
    }

    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::Digit(c) if c.is_ascii_digit() => {
                if self.typing.len() >= intake_client::QUERY_MAX_DIGITS {
                    return KeyOutcome::default();
                }
                self.typing.push(c);
                self.after_edit()
            }
            Key::Digit(_) | Key::OtherChar => KeyOutcome::default(),
            Key::Backspace => {
                self.typing.pop();
                self.after_edit()
            }
            Key::Delete => {
                self.typing.clear();
                self.after_edit()
            }
            Key::Enter => self.confirm_single_match(),
            Key::Escape => {
                self.is_typing = false;
                self.typing.clear();
                let mut effects = vec![Effect::SetPlaceholder(
                    self.texts.search_placeholder_default.clone(),
                )];
                effects.extend(self.restore_initial(self.selected));
                KeyOutcome {
                    effects,
                    ..Default::default()
                }
            }
            Key::ArrowDown | Key::ArrowUp => {
                let mut outcome = KeyOutcome::default();
                if !self.is_typing {
                    outcome.effects = self.restore_initial(self.selected);
                }
                outcome
            }
        }
    }

    fn after_edit(&mut self) -> KeyOutcome {
        self.is_typing = true;
        if self.typing.is_empty() {
            // Empty query restores the unfiltered list immediately.
            let mut effects = vec![Effect::SetPlaceholder(
                self.texts.search_placeholder_default.clone(),
            )];
            effects.extend(self.restore_initial(self.selected));
            return KeyOutcome {
                effects,
                ..Default::default()
            };
        }
        KeyOutcome {
            effects: vec![Effect::SetPlaceholder(
                self.texts.searching_echo(&self.typing),
            )],
            search: Some(self.typing.clone()),
            picked: None,
        }
    }

    /// Enter selects when the list has exactly one candidate left.
    fn confirm_single_match(&mut self) -> KeyOutcome {
        if self.current.len() != 1 {
            return KeyOutcome::default();
        }
        let patient = self.current[0].clone();
        self.selected = Some(patient.id);
        self.last_selected = Some(patient.id);
        self.is_typing = false;
        self.typing.clear();

        let mut effects = vec![Effect::SetPlaceholder(
            self.texts.search_placeholder_default.clone(),
        )];
        effects.extend(self.restore_initial(self.selected));
        KeyOutcome {
            effects,
            search: None,
            picked: Some(patient),
        }
    }

    /// Selection changed on the control itself.
    ///
    /// Returns the selected patient (if any) so the page can fill its
    /// fields.
    pub fn select(&mut self, value: Option<i64>) -> (Vec<Effect>, Option<PatientSummary>) {
        self.last_selected = value;
        self.is_typing = false;
        self.typing.clear();

        let mut effects = vec![Effect::SetPlaceholder(
            self.texts.search_placeholder_default.clone(),
        )];
        match value {
            Some(id) => {
                self.selected = Some(id);
                let patient = self
                    .current
                    .iter()
                    .chain(self.initial.iter())
                    .find(|p| p.id == id)
                    .cloned();
                effects.push(self.replace_options());
                (effects, patient)
            }
            None => {
                self.selected = None;
                effects.extend(self.restore_initial(None));
                (effects, None)
            }
        }
    }

    pub fn handle_focus(&mut self) -> Vec<Effect> {
        if !self.is_typing {
            self.restore_initial(self.last_selected)
        } else if !self.typing.is_empty() {
            vec![Effect::SetPlaceholder(self.texts.searching_echo(&self.typing))]
        } else {
            Vec::new()
        }
    }

    pub fn handle_click(&mut self) -> Vec<Effect> {
        if !self.is_typing && self.typing.is_empty() {
            let mut effects = self.restore_initial(self.last_selected);
            effects.push(Effect::SetPlaceholder(
                self.texts.search_placeholder_default.clone(),
            ));
            effects
        } else {
            Vec::new()
        }
    }

    pub fn handle_blur(&mut self) -> Vec<Effect> {
        if self.selected.is_none() && self.typing.is_empty() {
            self.is_typing = false;
            let mut effects = vec![Effect::SetPlaceholder(
                self.texts.search_placeholder_default.clone(),
            )];
            effects.extend(self.restore_initial(None));
            effects
        } else if !self.typing.is_empty() {
            vec![Effect::SetPlaceholder(self.texts.searching_echo(&self.typing))]
        } else {
            Vec::new()
        }
    }

    /// Full reset, used by the "register new patient" flow.
    pub fn reset(&mut self) -> Vec<Effect> {
        self.selected = None;
        self.last_selected = None;
        self.is_typing = false;
        self.typing.clear();
        let mut effects = vec![Effect::SetPlaceholder(
            self.texts.search_placeholder_default.clone(),
        )];
        effects.extend(self.restore_initial(None));
        effects
    }

    /// Applies a search response for `query`.
    ///
    /// The selected option, if excluded by the results, is spliced back in
    /// from the initial snapshot so the selection never silently vanishes.
    pub fn apply_results(
        &mut self,
        query: &str,
        patients: Vec<PatientSummary>,
    ) -> Vec<Effect> {
        let mut merged = patients;
        if let Some(id) = self.selected {
            if !merged.iter().any(|p| p.id == id) {
                if let Some(kept) = self.initial.iter().find(|p| p.id == id) {
                    merged.insert(0, kept.clone());
                }
            }
        }
        self.current = merged;
        vec![
            self.replace_options(),
            Effect::SetPlaceholder(self.texts.searching_echo(query)),
        ]
    }

    /// Restores the page-load option list, newest patients first.
    fn restore_initial(&mut self, selected: Option<i64>) -> Vec<Effect> {
        let mut restored = self.initial.clone();
        restored.sort_by(|a, b| b.id.cmp(&a.id));
        self.current = restored;
        self.selected = selected;
        vec![self.replace_options()]
    }

    fn replace_options(&self) -> Effect {
        Effect::ReplaceOptions {
            options: self.options(),
            selected: self.selected.map(|id| id.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_types::Sex;

    fn patient(id: i64, dni: &str) -> PatientSummary {
        PatientSummary {
            id,
            dni: dni.into(),
            first_name: "Luz".into(),
            last_name: "Vega".into(),
            phone: "0999999999".into(),
            email: "luz@example.com".into(),
            age_approx: 41,
            sex: Sex::Female,
        }
    }

    fn picker() -> PatientPicker {
        PatientPicker::new(
            MessageCatalog::default(),
            vec![patient(1, "0123456782"), patient(2, "1710034065")],
        )
    }

    #[test]
    fn test_only_digits_compose_the_query() {
        let mut p = picker();
        assert!(p.handle_key(Key::OtherChar).effects.is_empty());
        let outcome = p.handle_key(Key::Digit('1'));
        assert_eq!(outcome.search.as_deref(), Some("1"));
        assert_eq!(p.query(), "1");
        assert!(p.handle_key(Key::Digit('x')).search.is_none());
        assert_eq!(p.query(), "1");
    }

    #[test]
    fn test_query_is_capped_at_ten_digits() {
        let mut p = picker();
        for _ in 0..12 {
            p.handle_key(Key::Digit('7'));
        }
        assert_eq!(p.query().len(), 10);
    }

    #[test]
    fn test_placeholder_echoes_the_query() {
        let mut p = picker();
        let outcome = p.handle_key(Key::Digit('1'));
        assert!(outcome
            .effects
            .contains(&Effect::SetPlaceholder("Buscando: 1".into())));
    }

    #[test]
    fn test_backspace_to_empty_restores_initial_list() {
        let mut p = picker();
        p.handle_key(Key::Digit('1'));
        let outcome = p.handle_key(Key::Backspace);
        assert!(outcome.search.is_none());
        assert!(outcome
            .effects
            .iter()
            .any(|e| matches!(e, Effect::ReplaceOptions { options, .. } if options.len() == 2)));
        // Newest first.
        let opts = p.options();
        assert_eq!(opts[0].value, "2");
    }

    #[test]
    fn test_selected_option_is_spliced_back_into_results() {
        let mut p = picker();
        p.select(Some(1));
        let effects = p.apply_results("17", vec![patient(2, "1710034065")]);
        let Some(Effect::ReplaceOptions { options, selected }) = effects.first() else {
            panic!("expected ReplaceOptions");
        };
        assert_eq!(selected.as_deref(), Some("1"));
        assert_eq!(options[0].value, "1", "selected spliced to the front");
        assert_eq!(options[1].value, "2");
    }

    #[test]
    fn test_enter_confirms_a_single_match() {
        let mut p = picker();
        p.handle_key(Key::Digit('1'));
        p.apply_results("1", vec![patient(2, "1710034065")]);
        let outcome = p.handle_key(Key::Enter);
        assert_eq!(outcome.picked.map(|pt| pt.id), Some(2));
        assert_eq!(p.selected_id(), Some(2));
        assert_eq!(p.query(), "");
    }

    #[test]
    fn test_enter_with_many_matches_does_nothing() {
        let mut p = picker();
        let outcome = p.handle_key(Key::Enter);
        assert!(outcome.picked.is_none());
        assert!(outcome.effects.is_empty());
    }

    #[test]
    fn test_escape_resets_typing_but_keeps_selection() {
        let mut p = picker();
        p.select(Some(2));
        p.handle_key(Key::Digit('9'));
        let outcome = p.handle_key(Key::Escape);
        assert_eq!(p.query(), "");
        assert_eq!(p.selected_id(), Some(2));
        assert!(outcome.effects.contains(&Effect::SetPlaceholder(
            MessageCatalog::default().search_placeholder_default
        )));
    }

    #[test]
    fn test_select_returns_the_patient_for_field_fill() {
        let mut p = picker();
        let (_, chosen) = p.select(Some(2));
        assert_eq!(chosen.map(|pt| pt.dni), Some("1710034065".to_string()));
        let (_, none) = p.select(None);
        assert!(none.is_none());
        assert_eq!(p.selected_id(), None);
    }
}
