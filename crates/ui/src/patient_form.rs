//! Patient registration/edit form controller.
//!
//! Unlike the upload page this form posts natively; the controller only
//! decides whether the post may proceed. In edit mode the submit control
//! additionally stays locked until some field actually changed from its
//! page-load value.

use std::collections::BTreeMap;

use intake_core::cedula::Requirement;
use intake_core::notice::NoticeKind;
use intake_core::validate::EMAIL_MAX_PATIENT;
use intake_core::{format, ChangeGate, FieldValidator, MessageCatalog};
use intake_types::{FieldKey, Severity};

use crate::effect::Effect;

const FORM_FIELDS: [FieldKey; 7] = [
    FieldKey::FirstName,
    FieldKey::LastName,
    FieldKey::Dni,
    FieldKey::Phone,
    FieldKey::Email,
    FieldKey::AgeApprox,
    FieldKey::Sex,
];

/// Whether the native form post may go ahead.
#[derive(Debug, PartialEq)]
pub enum SubmitDecision {
    Allow,
    Deny { effects: Vec<Effect> },
}

#[derive(Debug, Clone)]
pub struct PatientFormController {
    texts: MessageCatalog,
    fields: BTreeMap<FieldKey, String>,
    /// Present in edit mode only; registration is always submittable.
    gate: Option<ChangeGate>,
    submit_label: String,
}

impl PatientFormController {
    /// Registration form: all fields start empty, submit always enabled.
    pub fn register(texts: MessageCatalog, submit_label: impl Into<String>) -> Self {
        Self {
            texts,
            fields: FORM_FIELDS
                .iter()
                .map(|key| (*key, String::new()))
                .collect(),
            gate: None,
            submit_label: submit_label.into(),
        }
    }

    /// Edit form: snapshots `initial` and locks the submit control until a
    /// tracked field diverges from it.
    pub fn edit<I>(texts: MessageCatalog, submit_label: impl Into<String>, initial: I) -> Self
    where
        I: IntoIterator<Item = (FieldKey, String)>,
    {
        let fields: BTreeMap<FieldKey, String> = initial.into_iter().collect();
        let gate = ChangeGate::new(fields.clone());
        Self {
            texts,
            fields,
            gate: Some(gate),
            submit_label: submit_label.into(),
        }
    }

    /// Initial submit control state, applied at page setup.
    pub fn initial_submit_control(&self) -> Vec<Effect> {
        match &self.gate {
            Some(gate) => vec![Effect::SetSubmitControl(
                gate.submit_control(&self.submit_label, &self.texts.locked_hint),
            )],
            None => Vec::new(),
        }
    }

    pub fn field_input(&mut self, field: FieldKey, value: &str) -> Vec<Effect> {
        let mut effects = vec![Effect::ClearFieldMessage { field }];
        let stored = match field {
            FieldKey::Dni => format::format_cedula_input(value),
            FieldKey::Phone => format::format_phone_input(value),
            _ => value.to_string(),
        };
        if stored != value {
            effects.push(Effect::SetFieldValue {
                field,
                value: stored.clone(),
            });
        }
        self.fields.insert(field, stored.clone());

        if let Some(gate) = &mut self.gate {
            gate.update(field, &stored);
            effects.push(Effect::SetSubmitControl(
                gate.submit_control(&self.submit_label, &self.texts.locked_hint),
            ));
        }
        effects
    }

    pub fn field_blur(&self, field: FieldKey) -> Vec<Effect> {
        let value = self.fields.get(&field).cloned().unwrap_or_default();
        match self.validate(field, &value) {
            Some((text, severity)) => vec![Effect::SetFieldMessage {
                field,
                text,
                severity,
            }],
            None => vec![Effect::ClearFieldMessage { field }],
        }
    }

    /// Validates the whole form; denies the post when anything blocks.
    pub fn prepare_submit(&self) -> SubmitDecision {
        if let Some(gate) = &self.gate {
            if !gate.is_dirty() {
                // Locked control; nothing to submit.
                return SubmitDecision::Deny {
                    effects: Vec::new(),
                };
            }
        }

        let mut effects = Vec::new();
        let mut blocking = false;
        for field in FORM_FIELDS {
            let value = self.fields.get(&field).cloned().unwrap_or_default();
            if let Some((text, severity)) = self.validate(field, &value) {
                blocking |= severity == Severity::Error;
                effects.push(Effect::SetFieldMessage {
                    field,
                    text,
                    severity,
                });
            }
        }

        if blocking {
            effects.push(Effect::ShowBanner {
                kind: NoticeKind::Error,
                text: self.texts.form_errors.clone(),
            });
            SubmitDecision::Deny { effects }
        } else {
            SubmitDecision::Allow
        }
    }

    fn validate(&self, field: FieldKey, value: &str) -> Option<(String, Severity)> {
        let v = FieldValidator::new(&self.texts);
        let issue = match field {
            FieldKey::FirstName | FieldKey::LastName => v.full_name(value),
            FieldKey::Dni => v.cedula(value, Requirement::Mandatory),
            FieldKey::Phone => v.phone(value, Requirement::Mandatory),
            FieldKey::Email => v.email(value, EMAIL_MAX_PATIENT),
            FieldKey::AgeApprox => v.age(value),
            FieldKey::Sex => v.required_choice(value),
            _ => None,
        };
        issue.map(|i| (i.text, i.severity))
    }
}
