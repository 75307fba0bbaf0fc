//! Change-detection gate for edit forms.
//!
//! The submit control stays locked until at least one tracked field's
//! current (trimmed) value differs from its value at page load. Forms with
//! a file input OR a separately tracked file-dirty flag into the result.

use std::collections::BTreeMap;

use intake_types::FieldKey;

/// Tracks a form's baseline values and computes dirtiness.
#[derive(Debug, Clone)]
pub struct ChangeGate {
    baseline: BTreeMap<FieldKey, String>,
    current: BTreeMap<FieldKey, String>,
    file_dirty: bool,
}

impl ChangeGate {
    /// Snapshots the initial values. Taken once, at setup.
    pub fn new<I>(initial: I) -> Self
    where
        I: IntoIterator<Item = (FieldKey, String)>,
    {
        let baseline: BTreeMap<FieldKey, String> = initial
            .into_iter()
            .map(|(key, value)| (key, value.trim().to_string()))
            .collect();
        let current = baseline.clone();
        Self {
            baseline,
            current,
            file_dirty: false,
        }
    }

    /// Records a field's current value. Fields that were not present at
    /// snapshot time are skipped; optional presence is normal across the
    /// form variants.
    pub fn update(&mut self, field: FieldKey, value: &str) {
        if self.baseline.contains_key(&field) {
            self.current.insert(field, value.trim().to_string());
        }
    }

    /// Valid-file-selected flag for forms with a file input.
    pub fn set_file_dirty(&mut self, dirty: bool) {
        self.file_dirty = dirty;
    }

    /// True when any tracked field differs from its baseline, or a valid
    /// file has been selected.
    pub fn is_dirty(&self) -> bool {
        self.file_dirty
            || self
                .baseline
                .iter()
                .any(|(key, initial)| self.current.get(key) != Some(initial))
    }

    /// Derives the submit control state for the current dirtiness.
    pub fn submit_control(&self, label: &str, locked_hint: &str) -> SubmitControl {
        if self.is_dirty() {
            SubmitControl::Enabled {
                label: label.to_string(),
            }
        } else {
            SubmitControl::Locked {
                label: label.to_string(),
                hint: locked_hint.to_string(),
            }
        }
    }
}

/// State of a form's submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitControl {
    /// Disabled, rendered with a lock marker and an explanatory tooltip.
    Locked { label: String, hint: String },
    Enabled { label: String },
}

impl SubmitControl {
    pub fn is_enabled(&self) -> bool {
        matches!(self, SubmitControl::Enabled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> ChangeGate {
        ChangeGate::new([
            (FieldKey::FirstName, "Ana".to_string()),
            (FieldKey::LastName, " Pérez ".to_string()),
            (FieldKey::Email, "ana@example.com".to_string()),
        ])
    }

    #[test]
    fn test_untouched_form_is_locked() {
        let g = gate();
        assert!(!g.is_dirty());
        let control = g.submit_control("Actualizar Perfil", "bloqueado");
        assert!(!control.is_enabled());
    }

    #[test]
    fn test_mutating_one_field_enables_and_reverting_locks() {
        let mut g = gate();
        g.update(FieldKey::FirstName, "Anita");
        assert!(g.is_dirty());
        g.update(FieldKey::FirstName, "Ana");
        assert!(!g.is_dirty());
    }

    #[test]
    fn test_comparison_is_on_trimmed_values() {
        let mut g = gate();
        // Baseline was snapshotted as " Pérez " but compares trimmed.
        g.update(FieldKey::LastName, "Pérez");
        assert!(!g.is_dirty());
        g.update(FieldKey::LastName, "  Pérez  ");
        assert!(!g.is_dirty());
    }

    #[test]
    fn test_untracked_fields_are_skipped() {
        let mut g = gate();
        g.update(FieldKey::City, "Quito");
        assert!(!g.is_dirty());
    }

    #[test]
    fn test_file_dirty_flag_is_ored_in() {
        let mut g = gate();
        g.set_file_dirty(true);
        assert!(g.is_dirty());
        g.set_file_dirty(false);
        assert!(!g.is_dirty());
    }
}
