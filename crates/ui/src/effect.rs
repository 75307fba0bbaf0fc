//! UI effects: the DOM mutations a controller asks its rendering layer to
//! perform. Controllers never touch the document; they return these.

use intake_core::notice::NoticeKind;
use intake_core::SubmitControl;
use intake_types::{FieldKey, PatientSummary, Severity};

/// An option row in the patient selection control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl From<&PatientSummary> for SelectOption {
    fn from(patient: &PatientSummary) -> Self {
        Self {
            value: patient.id.to_string(),
            label: patient.option_label(),
        }
    }
}

/// A DOM mutation requested by a controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Render a message in the field's error slot and mark the input.
    SetFieldMessage {
        field: FieldKey,
        text: String,
        severity: Severity,
    },
    /// Remove the field's message and marking.
    ClearFieldMessage { field: FieldKey },
    /// Rewrite the field's value (live formatters).
    SetFieldValue { field: FieldKey, value: String },
    /// Enable/disable the submit button with its label and optional hint.
    SetSubmitControl(SubmitControl),
    /// Show the page-level alert banner.
    ShowBanner { kind: NoticeKind, text: String },
    HideBanner,
    /// Replace the selection control's option list.
    ReplaceOptions {
        options: Vec<SelectOption>,
        selected: Option<String>,
    },
    /// Rewrite the placeholder option's text (query echo).
    SetPlaceholder(String),
    /// Show or hide the new-patient fields section.
    ShowPatientSection(bool),
    /// Toggle readonly/disabled on the six patient fields.
    SetFieldsReadonly(bool),
    /// Copy a selected patient's data into the fields.
    FillPatientFields(PatientSummary),
    ClearPatientFields,
    ShowImagePreview,
    ResetImagePreview,
    /// Highlight the drop area during drag-over.
    SetDropHighlight(bool),
    ShowLoadingOverlay(bool),
    /// Success: leave the page.
    Navigate(String),
    /// Swap a button into its spinner/loading state.
    SetButtonLoading { label: String },
    RestoreButton,
    FocusField(FieldKey),
    /// Open the report email modal with its title and prefilled address.
    OpenEmailModal { title: String, email_prefill: String },
    CloseEmailModal,
    /// Open the detail modal for a patient list row.
    OpenPatientModal(i64),
    ClosePatientModal,
}
