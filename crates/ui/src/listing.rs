//! List page affordances: the patient list search box and per-row detail
//! modal, and the report list cards with their email/PDF actions.

use std::time::Duration;

use intake_core::notice::{reveal_delay, NoticeKind};
use intake_core::validate::EMAIL_MAX_PATIENT;
use intake_core::{format, FieldValidator, MessageCatalog};
use intake_types::{FieldKey, Severity};

use crate::effect::Effect;
use crate::patient_form::SubmitDecision;

/// How long the PDF button shows its spinner before springing back.
pub const PDF_BUTTON_RESTORE: Duration = Duration::from_secs(3);

/// Minimum query length for the patient list search.
pub const SEARCH_MIN_CHARS: usize = 3;

/// The cédula search box on the patient list page.
#[derive(Debug, Clone)]
pub struct PatientListSearch {
    texts: MessageCatalog,
    query: String,
}

impl PatientListSearch {
    pub fn new(texts: MessageCatalog) -> Self {
        Self {
            texts,
            query: String::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Keeps the box digits-only, capped at a full cédula.
    pub fn on_input(&mut self, value: &str) -> Vec<Effect> {
        let sanitized = format::format_cedula_input(value);
        let mut effects = Vec::new();
        if sanitized != value {
            effects.push(Effect::SetFieldValue {
                field: FieldKey::Dni,
                value: sanitized.clone(),
            });
        }
        self.query = sanitized;
        effects
    }

    /// Queries shorter than three digits are rejected with an advisory.
    pub fn on_submit(&self) -> SubmitDecision {
        if self.query.len() < SEARCH_MIN_CHARS {
            SubmitDecision::Deny {
                effects: vec![Effect::ShowBanner {
                    kind: NoticeKind::Warning,
                    text: self.texts.search_min_length.clone(),
                }],
            }
        } else {
            SubmitDecision::Allow
        }
    }
}

/// The per-row detail modal on the patient list page.
///
/// At most one detail modal is open at a time; the close button, the
/// backdrop and Escape all funnel into [`PatientDetailModal::close`].
#[derive(Debug, Clone, Default)]
pub struct PatientDetailModal {
    open: Option<i64>,
}

impl PatientDetailModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_id(&self) -> Option<i64> {
        self.open
    }

    /// Opens the modal for `patient_id`, closing any other one first.
    pub fn open(&mut self, patient_id: i64) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(previous) = self.open.replace(patient_id) {
            if previous != patient_id {
                effects.push(Effect::ClosePatientModal);
            }
        }
        effects.push(Effect::OpenPatientModal(patient_id));
        effects
    }

    /// No-op when nothing is open (Escape on an idle page).
    pub fn close(&mut self) -> Vec<Effect> {
        match self.open.take() {
            Some(_) => vec![Effect::ClosePatientModal],
            None => Vec::new(),
        }
    }
}

/// Outcome of the email modal's send button.
#[derive(Debug, PartialEq)]
pub enum EmailSubmit {
    /// Address validated; post it and show the spinner.
    Send { email: String, effects: Vec<Effect> },
    Invalid { effects: Vec<Effect> },
}

/// The report list page: staggered card reveal, per-report email modal,
/// and the PDF download button's loading state.
#[derive(Debug, Clone)]
pub struct ReportListPage {
    texts: MessageCatalog,
}

impl ReportListPage {
    pub fn new(texts: MessageCatalog) -> Self {
        Self { texts }
    }

    /// Reveal delays for `count` report cards, top to bottom.
    pub fn card_reveal_delays(count: usize) -> Vec<Duration> {
        (0..count).map(reveal_delay).collect()
    }

    /// Stored addresses may be the literal placeholder `N/A`; the modal
    /// treats it like no address at all.
    pub fn email_prefill(stored: &str) -> String {
        let stored = stored.trim();
        if stored.is_empty() || stored.eq_ignore_ascii_case("n/a") {
            String::new()
        } else {
            stored.to_string()
        }
    }

    pub fn open_email_modal(&self, report_id: i64, stored_email: &str) -> Vec<Effect> {
        vec![Effect::OpenEmailModal {
            title: format!("Enviar Reporte #{report_id}"),
            email_prefill: Self::email_prefill(stored_email),
        }]
    }

    pub fn submit_email(&self, value: &str) -> EmailSubmit {
        let value = value.trim();
        if value.is_empty() {
            return EmailSubmit::Invalid {
                effects: vec![
                    Effect::SetFieldMessage {
                        field: FieldKey::Email,
                        text: self.texts.modal_email_required.clone(),
                        severity: Severity::Error,
                    },
                    Effect::FocusField(FieldKey::Email),
                ],
            };
        }
        let v = FieldValidator::new(&self.texts);
        if v.email(value, EMAIL_MAX_PATIENT).is_some() {
            return EmailSubmit::Invalid {
                effects: vec![
                    Effect::SetFieldMessage {
                        field: FieldKey::Email,
                        text: self.texts.modal_email_invalid.clone(),
                        severity: Severity::Error,
                    },
                    Effect::FocusField(FieldKey::Email),
                ],
            };
        }
        EmailSubmit::Send {
            email: value.to_string(),
            effects: vec![Effect::SetButtonLoading {
                label: self.texts.sending_label.clone(),
            }],
        }
    }

    /// The send finished, one way or the other.
    pub fn email_finished(&self, ok: bool, message: &str) -> Vec<Effect> {
        vec![
            Effect::RestoreButton,
            Effect::CloseEmailModal,
            Effect::ShowBanner {
                kind: if ok {
                    NoticeKind::Success
                } else {
                    NoticeKind::Error
                },
                text: message.to_string(),
            },
        ]
    }

    /// PDF download: spinner now, restore after [`PDF_BUTTON_RESTORE`].
    pub fn pdf_clicked(&self) -> (Vec<Effect>, Duration) {
        (
            vec![Effect::SetButtonLoading {
                label: self.texts.generating_label.clone(),
            }],
            PDF_BUTTON_RESTORE,
        )
    }

    pub fn pdf_restore(&self) -> Vec<Effect> {
        vec![Effect::RestoreButton]
    }
}
