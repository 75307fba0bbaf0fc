//! Authentication form validation: login, account registration, and
//! password reset. All three post natively; the controllers only gate the
//! post and annotate fields.

use std::collections::BTreeMap;

use intake_core::notice::NoticeKind;
use intake_core::validate::EMAIL_MAX_PATIENT;
use intake_core::{FieldValidator, MessageCatalog};
use intake_types::{FieldKey, Severity};

use crate::effect::Effect;
use crate::patient_form::SubmitDecision;

/// Login form. The username is the account's email address.
#[derive(Debug, Clone)]
pub struct LoginForm {
    texts: MessageCatalog,
    email: String,
    password: String,
}

impl LoginForm {
    pub fn new(texts: MessageCatalog) -> Self {
        Self {
            texts,
            email: String::new(),
            password: String::new(),
        }
    }

    pub fn email_input(&mut self, value: &str) -> Vec<Effect> {
        self.email = value.to_string();
        vec![Effect::ClearFieldMessage {
            field: FieldKey::Email,
        }]
    }

    pub fn password_input(&mut self, value: &str) -> Vec<Effect> {
        self.password = value.to_string();
        vec![Effect::ClearFieldMessage {
            field: FieldKey::Password,
        }]
    }

    pub fn prepare_submit(&self) -> SubmitDecision {
        let v = FieldValidator::new(&self.texts);
        let mut effects = Vec::new();
        if let Some(issue) = v.email(&self.email, EMAIL_MAX_PATIENT) {
            effects.push(message(FieldKey::Email, issue.text, issue.severity));
        }
        if let Some(issue) = v.password(&self.password) {
            effects.push(message(FieldKey::Password, issue.text, issue.severity));
        }
        deny_if_any(&self.texts, effects)
    }
}

/// Account registration form.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    texts: MessageCatalog,
    fields: BTreeMap<FieldKey, String>,
}

impl RegisterForm {
    pub fn new(texts: MessageCatalog) -> Self {
        let fields = [
            FieldKey::FirstName,
            FieldKey::LastName,
            FieldKey::Email,
            FieldKey::Password,
            FieldKey::PasswordConfirm,
        ]
        .into_iter()
        .map(|key| (key, String::new()))
        .collect();
        Self { texts, fields }
    }

    pub fn field_input(&mut self, field: FieldKey, value: &str) -> Vec<Effect> {
        self.fields.insert(field, value.to_string());
        vec![Effect::ClearFieldMessage { field }]
    }

    pub fn field_blur(&self, field: FieldKey) -> Vec<Effect> {
        match self.validate(field) {
            Some(effect) => vec![effect],
            None => vec![Effect::ClearFieldMessage { field }],
        }
    }

    pub fn prepare_submit(&self) -> SubmitDecision {
        let effects: Vec<Effect> = self
            .fields
            .keys()
            .filter_map(|field| self.validate(*field))
            .collect();
        deny_if_any(&self.texts, effects)
    }

    fn validate(&self, field: FieldKey) -> Option<Effect> {
        let v = FieldValidator::new(&self.texts);
        let value = self.fields.get(&field).cloned().unwrap_or_default();
        let issue = match field {
            FieldKey::FirstName | FieldKey::LastName => v.full_name(&value),
            FieldKey::Email => v.email(&value, EMAIL_MAX_PATIENT),
            FieldKey::Password => v.password(&value),
            FieldKey::PasswordConfirm => {
                let original = self
                    .fields
                    .get(&FieldKey::Password)
                    .cloned()
                    .unwrap_or_default();
                v.confirm_password(&value, &original)
            }
            _ => None,
        };
        issue.map(|i| message(field, i.text, i.severity))
    }
}

/// Password reset form: the new password, twice.
#[derive(Debug, Clone)]
pub struct PasswordResetForm {
    texts: MessageCatalog,
    password: String,
    confirm: String,
}

impl PasswordResetForm {
    pub fn new(texts: MessageCatalog) -> Self {
        Self {
            texts,
            password: String::new(),
            confirm: String::new(),
        }
    }

    pub fn password_input(&mut self, value: &str) -> Vec<Effect> {
        self.password = value.to_string();
        vec![Effect::ClearFieldMessage {
            field: FieldKey::Password,
        }]
    }

    pub fn confirm_input(&mut self, value: &str) -> Vec<Effect> {
        self.confirm = value.to_string();
        vec![Effect::ClearFieldMessage {
            field: FieldKey::PasswordConfirm,
        }]
    }

    pub fn prepare_submit(&self) -> SubmitDecision {
        let v = FieldValidator::new(&self.texts);
        let mut effects = Vec::new();
        if let Some(issue) = v.password(&self.password) {
            effects.push(message(FieldKey::Password, issue.text, issue.severity));
        }
        if let Some(issue) = v.confirm_password(&self.confirm, &self.password) {
            effects.push(message(
                FieldKey::PasswordConfirm,
                issue.text,
                issue.severity,
            ));
        }
        deny_if_any(&self.texts, effects)
    }
}

fn message(field: FieldKey, text: String, severity: Severity) -> Effect {
    Effect::SetFieldMessage {
        field,
        text,
        severity,
    }
}

fn deny_if_any(texts: &MessageCatalog, mut effects: Vec<Effect>) -> SubmitDecision {
    if effects.is_empty() {
        SubmitDecision::Allow
    } else {
        effects.push(Effect::ShowBanner {
            kind: NoticeKind::Error,
            text: texts.form_errors.clone(),
        });
        SubmitDecision::Deny { effects }
    }
}
