//! Profile edit form controller.
//!
//! Same change-gated native post as the patient edit form, with two
//! differences: most fields are optional (empty ones get an advisory, not
//! an error) and a valid profile picture selection counts as a change on
//! its own. The backend caps the profile email at 50 characters.

use std::collections::BTreeMap;

use intake_core::cedula::Requirement;
use intake_core::notice::NoticeKind;
use intake_core::validate::EMAIL_MAX_PROFILE;
use intake_core::{format, ChangeGate, FieldValidator, FileMeta, MessageCatalog};
use intake_types::{FieldKey, Severity};

use crate::effect::Effect;
use crate::patient_form::SubmitDecision;

const PROFILE_FIELDS: [FieldKey; 7] = [
    FieldKey::FirstName,
    FieldKey::LastName,
    FieldKey::Dni,
    FieldKey::Email,
    FieldKey::Address,
    FieldKey::City,
    FieldKey::Phone,
];

#[derive(Debug, Clone)]
pub struct ProfileController {
    texts: MessageCatalog,
    fields: BTreeMap<FieldKey, String>,
    gate: ChangeGate,
    submit_label: String,
}

impl ProfileController {
    pub fn new<I>(texts: MessageCatalog, submit_label: impl Into<String>, initial: I) -> Self
    where
        I: IntoIterator<Item = (FieldKey, String)>,
    {
        let fields: BTreeMap<FieldKey, String> = initial.into_iter().collect();
        let gate = ChangeGate::new(fields.clone());
        Self {
            texts,
            fields,
            gate,
            submit_label: submit_label.into(),
        }
    }

    pub fn initial_submit_control(&self) -> Vec<Effect> {
        vec![self.submit_control()]
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
        self.gate.update(field, &stored);
        self.fields.insert(field, stored);
        effects.push(self.submit_control());
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

    /// A profile picture was chosen. Only a valid selection unlocks the
    /// submit control.
    pub fn picture_selected(&mut self, file: Option<&FileMeta>) -> Vec<Effect> {
        let v = FieldValidator::new(&self.texts);
        match v.profile_picture(file) {
            Some(issue) if issue.is_blocking() => {
                self.gate.set_file_dirty(false);
                vec![
                    Effect::SetFieldMessage {
                        field: FieldKey::ProfilePicture,
                        text: issue.text,
                        severity: issue.severity,
                    },
                    self.submit_control(),
                ]
            }
            _ => {
                self.gate.set_file_dirty(file.is_some());
                let mut effects = vec![Effect::ClearFieldMessage {
                    field: FieldKey::ProfilePicture,
                }];
                if file.is_some() {
                    effects.push(Effect::ShowImagePreview);
                }
                effects.push(self.submit_control());
                effects
            }
        }
    }

    /// Warnings on empty optional fields never block the post.
    pub fn prepare_submit(&self) -> SubmitDecision {
        if !self.gate.is_dirty() {
            return SubmitDecision::Deny {
                effects: Vec::new(),
            };
        }

        let mut effects = Vec::new();
        let mut blocking = false;
        for field in PROFILE_FIELDS {
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
            FieldKey::Dni => v.cedula(value, Requirement::Optional),
            FieldKey::Email => v.email(value, EMAIL_MAX_PROFILE),
            FieldKey::Address | FieldKey::City => v.address_or_city(value),
            FieldKey::Phone => v.phone(value, Requirement::Optional),
            _ => None,
        };
        issue.map(|i| (i.text, i.severity))
    }

    fn submit_control(&self) -> Effect {
        Effect::SetSubmitControl(
            self.gate
                .submit_control(&self.submit_label, &self.texts.locked_hint),
        )
    }
}
