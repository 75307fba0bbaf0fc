//! Upload page controller: lesion image plus patient selection or inline
//! registration.
//!
//! The page either reuses an existing patient (picked through
//! [`crate::picker::PatientPicker`]) or registers a new one from six raw
//! fields submitted alongside the image. Everything is validated locally
//! before any network traffic; a submission with no image selected never
//! leaves the page.

use std::collections::BTreeMap;

use intake_client::{
    ClientError, NewPatient, PatientPayload, SubmitOutcome, UploadImage, UploadRequest,
};
use intake_core::cedula::Requirement;
use intake_core::notice::NoticeKind;
use intake_core::validate::EMAIL_MAX_PATIENT;
use intake_core::{format, FieldValidator, FileMeta, MessageCatalog};
use intake_types::{FieldKey, PatientSummary, Severity};

use crate::effect::Effect;

const NEW_PATIENT_FIELDS: [FieldKey; 6] = [
    FieldKey::FirstName,
    FieldKey::LastName,
    FieldKey::Dni,
    FieldKey::Phone,
    FieldKey::Email,
    FieldKey::AgeApprox,
];

/// Result of a submit attempt, before any network call.
#[derive(Debug)]
pub enum SubmitPrep {
    /// Everything validated; post `request` and show the overlay.
    Ready {
        request: UploadRequest,
        effects: Vec<Effect>,
    },
    /// Local validation failed; no request is made.
    Blocked { effects: Vec<Effect> },
}

/// State machine for the upload page.
#[derive(Debug, Clone)]
pub struct UploadController {
    texts: MessageCatalog,
    selected: Option<PatientSummary>,
    fields: BTreeMap<FieldKey, String>,
    anatom_site: String,
    image: Option<FileMeta>,
}

impl UploadController {
    pub fn new(texts: MessageCatalog) -> Self {
        let fields = NEW_PATIENT_FIELDS
            .iter()
            .chain([FieldKey::Sex].iter())
            .map(|key| (*key, String::new()))
            .collect();
        Self {
            texts,
            selected: None,
            fields,
            anatom_site: String::new(),
            image: None,
        }
    }

    pub fn selected_patient(&self) -> Option<&PatientSummary> {
        self.selected.as_ref()
    }

    /// An existing patient was picked; fill and lock the patient fields.
    pub fn patient_picked(&mut self, patient: PatientSummary) -> Vec<Effect> {
        self.fields.insert(FieldKey::FirstName, patient.first_name.clone());
        self.fields.insert(FieldKey::LastName, patient.last_name.clone());
        self.fields.insert(FieldKey::Dni, patient.dni.clone());
        self.fields.insert(FieldKey::Phone, patient.phone.clone());
        self.fields.insert(FieldKey::Email, patient.email.clone());
        self.fields
            .insert(FieldKey::AgeApprox, patient.age_approx.to_string());
        self.fields
            .insert(FieldKey::Sex, patient.sex.as_str().to_string());
        self.selected = Some(patient.clone());

        let mut effects = vec![
            Effect::ShowPatientSection(true),
            Effect::FillPatientFields(patient),
            Effect::SetFieldsReadonly(true),
        ];
        effects.extend(self.clear_patient_messages());
        effects
    }

    /// Switch to registering a new patient: empty, editable fields.
    pub fn register_new_patient(&mut self) -> Vec<Effect> {
        self.selected = None;
        for value in self.fields.values_mut() {
            value.clear();
        }
        let mut effects = vec![
            Effect::ShowPatientSection(true),
            Effect::ClearPatientFields,
            Effect::SetFieldsReadonly(false),
        ];
        effects.extend(self.clear_patient_messages());
        effects
    }

    /// Selection was cleared without starting a registration.
    pub fn patient_cleared(&mut self) -> Vec<Effect> {
        self.selected = None;
        for value in self.fields.values_mut() {
            value.clear();
        }
        vec![
            Effect::ClearPatientFields,
            Effect::SetFieldsReadonly(false),
            Effect::ShowPatientSection(false),
        ]
    }

    /// Live input on a patient field. Cédula and phone get reformatted as
    /// typed; every keystroke clears the field's message.
    pub fn field_input(&mut self, field: FieldKey, value: &str) -> Vec<Effect> {
        let mut effects = vec![Effect::ClearFieldMessage { field }];
        let stored = match field {
            FieldKey::Dni => {
                let formatted = format::format_cedula_input(value);
                if formatted != value {
                    effects.push(Effect::SetFieldValue {
                        field,
                        value: formatted.clone(),
                    });
                }
                formatted
            }
            FieldKey::Phone => {
                let formatted = format::format_phone_input(value);
                if formatted != value {
                    effects.push(Effect::SetFieldValue {
                        field,
                        value: formatted.clone(),
                    });
                }
                formatted
            }
            _ => value.to_string(),
        };
        if field == FieldKey::AnatomSite {
            self.anatom_site = stored;
        } else {
            self.fields.insert(field, stored);
        }
        effects
    }

    /// Leaving a field validates it in place.
    pub fn field_blur(&self, field: FieldKey) -> Vec<Effect> {
        let value = if field == FieldKey::AnatomSite {
            self.anatom_site.clone()
        } else {
            self.fields.get(&field).cloned().unwrap_or_default()
        };
        match self.validate_field(field, &value) {
            Some((text, severity)) => vec![Effect::SetFieldMessage {
                field,
                text,
                severity,
            }],
            None => vec![Effect::ClearFieldMessage { field }],
        }
    }

    fn validate_field(&self, field: FieldKey, value: &str) -> Option<(String, Severity)> {
        let v = FieldValidator::new(&self.texts);
        let issue = match field {
            FieldKey::FirstName | FieldKey::LastName => v.full_name(value),
            FieldKey::Dni => v.cedula(value, Requirement::Mandatory),
            FieldKey::Phone => v.phone(value, Requirement::Mandatory),
            FieldKey::Email => v.email(value, EMAIL_MAX_PATIENT),
            FieldKey::AgeApprox => v.age(value),
            FieldKey::Sex => v.required_choice(value),
            FieldKey::AnatomSite => {
                if value.trim().is_empty() {
                    return Some((self.texts.site_required.clone(), Severity::Error));
                }
                None
            }
            _ => None,
        };
        issue.map(|i| (i.text, i.severity))
    }

    /// A file landed in the file input or the drop area.
    pub fn image_selected(&mut self, file: FileMeta) -> Vec<Effect> {
        let v = FieldValidator::new(&self.texts);
        match v.lesion_image(Some(&file)) {
            Some(issue) => {
                self.image = None;
                vec![
                    Effect::ResetImagePreview,
                    Effect::SetFieldMessage {
                        field: FieldKey::Image,
                        text: issue.text,
                        severity: issue.severity,
                    },
                ]
            }
            None => {
                self.image = Some(file);
                vec![
                    Effect::ShowImagePreview,
                    Effect::ClearFieldMessage {
                        field: FieldKey::Image,
                    },
                ]
            }
        }
    }

    pub fn image_removed(&mut self) -> Vec<Effect> {
        self.image = None;
        vec![Effect::ResetImagePreview]
    }

    pub fn drag_over(&self) -> Vec<Effect> {
        vec![Effect::SetDropHighlight(true)]
    }

    pub fn drag_leave(&self) -> Vec<Effect> {
        vec![Effect::SetDropHighlight(false)]
    }

    pub fn drop_file(&mut self, file: FileMeta) -> Vec<Effect> {
        let mut effects = vec![Effect::SetDropHighlight(false)];
        effects.extend(self.image_selected(file));
        effects
    }

    /// Validates everything and either builds the request or blocks.
    ///
    /// `image_bytes` are read by the caller only when a file is selected;
    /// with no image the attempt is blocked before any I/O.
    pub fn prepare_submit(&self, image_bytes: Vec<u8>) -> SubmitPrep {
        let mut effects = Vec::new();
        let mut blocking = false;

        if self.selected.is_none() {
            for field in NEW_PATIENT_FIELDS.iter().chain([FieldKey::Sex].iter()) {
                let value = self.fields.get(field).cloned().unwrap_or_default();
                if let Some((text, severity)) = self.validate_field(*field, &value) {
                    blocking |= severity == Severity::Error;
                    effects.push(Effect::SetFieldMessage {
                        field: *field,
                        text,
                        severity,
                    });
                }
            }
        }

        let v = FieldValidator::new(&self.texts);
        if let Some(issue) = v.lesion_image(self.image.as_ref()) {
            blocking = true;
            effects.push(Effect::SetFieldMessage {
                field: FieldKey::Image,
                text: issue.text,
                severity: issue.severity,
            });
        }
        if self.anatom_site.trim().is_empty() {
            blocking = true;
            effects.push(Effect::SetFieldMessage {
                field: FieldKey::AnatomSite,
                text: self.texts.site_required.clone(),
                severity: Severity::Error,
            });
        }

        if blocking {
            effects.push(Effect::ShowBanner {
                kind: NoticeKind::Error,
                text: self.texts.form_errors.clone(),
            });
            return SubmitPrep::Blocked { effects };
        }

        let image = self.image.as_ref().map(|meta| UploadImage {
            bytes: image_bytes,
            filename: meta.name.clone(),
            mime: meta.mime.clone(),
        });
        let Some(image) = image else {
            // Unreachable in practice; lesion_image above already blocked.
            return SubmitPrep::Blocked { effects };
        };

        let patient = match &self.selected {
            Some(p) => PatientPayload::Existing {
                id: p.id.to_string(),
            },
            None => PatientPayload::New(NewPatient {
                first_name: self.field(FieldKey::FirstName),
                last_name: self.field(FieldKey::LastName),
                dni: self.field(FieldKey::Dni),
                phone: self.field(FieldKey::Phone),
                email: self.field(FieldKey::Email),
                age_approx: self.field(FieldKey::AgeApprox),
                sex: self.field(FieldKey::Sex),
            }),
        };

        SubmitPrep::Ready {
            request: UploadRequest {
                patient,
                image,
                anatom_site: self.anatom_site.trim().to_string(),
            },
            effects: vec![Effect::HideBanner, Effect::ShowLoadingOverlay(true)],
        }
    }

    /// Applies the server's verdict on a submitted request.
    pub fn apply_outcome(&self, outcome: SubmitOutcome) -> Vec<Effect> {
        match outcome {
            SubmitOutcome::Redirect(url) => vec![Effect::Navigate(url)],
            SubmitOutcome::Rejected(rejection) => {
                let mut effects = vec![Effect::ShowLoadingOverlay(false)];
                for (field, message) in &rejection.field_errors {
                    effects.push(Effect::SetFieldMessage {
                        field: *field,
                        text: message.clone(),
                        severity: Severity::Error,
                    });
                }
                let mut banner = match &rejection.general {
                    Some(text) => text.clone(),
                    None if !rejection.field_errors.is_empty() => self.texts.form_errors.clone(),
                    None => self.texts.server_error.clone(),
                };
                for (key, message) in &rejection.unmapped {
                    banner.push_str(&format!(" {key}: {message}"));
                }
                effects.push(Effect::ShowBanner {
                    kind: NoticeKind::Error,
                    text: banner,
                });
                effects
            }
        }
    }

    /// A transport failure: hide the overlay, surface the error.
    pub fn apply_failure(&self, err: &ClientError) -> Vec<Effect> {
        tracing::warn!(error = %err, "upload submission failed");
        vec![
            Effect::ShowLoadingOverlay(false),
            Effect::ShowBanner {
                kind: NoticeKind::Error,
                text: err.to_string(),
            },
        ]
    }

    /// A patient search failed; the option list is left untouched.
    pub fn search_failed(&self, err: &ClientError) -> Vec<Effect> {
        tracing::warn!(error = %err, "patient search failed");
        vec![Effect::ShowBanner {
            kind: NoticeKind::Error,
            text: format!("{} {}", self.texts.error_searching_patients, err),
        }]
    }

    fn field(&self, key: FieldKey) -> String {
        self.fields.get(&key).cloned().unwrap_or_default()
    }

    fn clear_patient_messages(&self) -> Vec<Effect> {
        NEW_PATIENT_FIELDS
            .iter()
            .chain([FieldKey::Sex].iter())
            .map(|field| Effect::ClearFieldMessage { field: *field })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_client::SubmitRejection;
    use intake_types::Sex;

    fn controller() -> UploadController {
        UploadController::new(MessageCatalog::default())
    }

    fn patient() -> PatientSummary {
        PatientSummary {
            id: 7,
            dni: "1710034065".into(),
            first_name: "Luz".into(),
            last_name: "Vega".into(),
            phone: "0999999999".into(),
            email: "luz@example.com".into(),
            age_approx: 41,
            sex: Sex::Female,
        }
    }

    fn jpeg() -> FileMeta {
        FileMeta {
            name: "lesion.jpg".into(),
            mime: "image/jpeg".into(),
            len: 1024,
        }
    }

    #[test]
    fn test_picking_a_patient_fills_and_locks_fields() {
        let mut c = controller();
        let effects = c.patient_picked(patient());
        assert!(effects.contains(&Effect::SetFieldsReadonly(true)));
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::FillPatientFields(p) if p.id == 7)));
        assert_eq!(c.selected_patient().map(|p| p.id), Some(7));
    }

    #[test]
    fn test_register_new_unlocks_and_clears() {
        let mut c = controller();
        c.patient_picked(patient());
        let effects = c.register_new_patient();
        assert!(effects.contains(&Effect::SetFieldsReadonly(false)));
        assert!(effects.contains(&Effect::ClearPatientFields));
        assert!(c.selected_patient().is_none());
    }

    #[test]
    fn test_cedula_input_is_reformatted_live() {
        let mut c = controller();
        let effects = c.field_input(FieldKey::Dni, "17a100-34065999");
        assert!(effects.contains(&Effect::SetFieldValue {
            field: FieldKey::Dni,
            value: "1710034065".into(),
        }));
    }

    #[test]
    fn test_blur_validates_in_place() {
        let mut c = controller();
        c.field_input(FieldKey::Email, "not-an-email");
        let effects = c.field_blur(FieldKey::Email);
        let texts = MessageCatalog::default();
        assert_eq!(
            effects,
            vec![Effect::SetFieldMessage {
                field: FieldKey::Email,
                text: texts.email_invalid,
                severity: Severity::Error,
            }]
        );
    }

    #[test]
    fn test_invalid_image_resets_preview() {
        let mut c = controller();
        let effects = c.image_selected(FileMeta {
            name: "x.gif".into(),
            mime: "image/gif".into(),
            len: 10,
        });
        assert!(effects.contains(&Effect::ResetImagePreview));
        let texts = MessageCatalog::default();
        assert!(effects.iter().any(
            |e| matches!(e, Effect::SetFieldMessage { text, .. } if *text == texts.image_invalid_type)
        ));
    }

    #[test]
    fn test_submit_without_image_is_blocked_locally() {
        let mut c = controller();
        c.patient_picked(patient());
        c.field_input(FieldKey::AnatomSite, "back");
        let prep = c.prepare_submit(Vec::new());
        let SubmitPrep::Blocked { effects } = prep else {
            panic!("expected blocked submit");
        };
        let texts = MessageCatalog::default();
        assert!(effects.iter().any(
            |e| matches!(e, Effect::SetFieldMessage { field, text, .. }
                if *field == FieldKey::Image && *text == texts.image_required)
        ));
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::ShowBanner { .. })));
        assert!(!effects.contains(&Effect::ShowLoadingOverlay(true)));
    }

    #[test]
    fn test_submit_with_existing_patient_builds_request() {
        let mut c = controller();
        c.patient_picked(patient());
        c.field_input(FieldKey::AnatomSite, "back");
        c.image_selected(jpeg());
        let prep = c.prepare_submit(vec![0xFF, 0xD8]);
        let SubmitPrep::Ready { request, effects } = prep else {
            panic!("expected ready submit");
        };
        assert!(matches!(
            request.patient,
            PatientPayload::Existing { ref id } if id == "7"
        ));
        assert_eq!(request.anatom_site, "back");
        assert!(effects.contains(&Effect::ShowLoadingOverlay(true)));
    }

    #[test]
    fn test_submit_new_patient_validates_all_fields() {
        let mut c = controller();
        c.field_input(FieldKey::AnatomSite, "face");
        c.image_selected(jpeg());
        let prep = c.prepare_submit(vec![1]);
        let SubmitPrep::Blocked { effects } = prep else {
            panic!("expected blocked submit");
        };
        // All six patient fields plus sex are empty.
        let flagged: Vec<_> = effects
            .iter()
            .filter_map(|e| match e {
                Effect::SetFieldMessage { field, .. } => Some(*field),
                _ => None,
            })
            .collect();
        for field in NEW_PATIENT_FIELDS {
            assert!(flagged.contains(&field), "{field:?} should be flagged");
        }
        assert!(flagged.contains(&FieldKey::Sex));
    }

    #[test]
    fn test_rejection_hides_overlay_and_maps_fields() {
        let c = controller();
        let effects = c.apply_outcome(SubmitOutcome::Rejected(SubmitRejection {
            field_errors: vec![(FieldKey::Dni, "ya existe".into())],
            general: None,
            unmapped: vec![("extraneous".into(), "sin campo".into())],
        }));
        assert_eq!(effects[0], Effect::ShowLoadingOverlay(false));
        assert!(effects.contains(&Effect::SetFieldMessage {
            field: FieldKey::Dni,
            text: "ya existe".into(),
            severity: Severity::Error,
        }));
        let texts = MessageCatalog::default();
        let expected = format!("{} extraneous: sin campo", texts.form_errors);
        assert!(effects.contains(&Effect::ShowBanner {
            kind: NoticeKind::Error,
            text: expected,
        }));
    }

    #[test]
    fn test_empty_rejection_falls_back_to_server_error() {
        let c = controller();
        let effects = c.apply_outcome(SubmitOutcome::Rejected(SubmitRejection::default()));
        let texts = MessageCatalog::default();
        assert!(effects.contains(&Effect::ShowBanner {
            kind: NoticeKind::Error,
            text: texts.server_error,
        }));
    }

    #[test]
    fn test_redirect_navigates() {
        let c = controller();
        let effects = c.apply_outcome(SubmitOutcome::Redirect("/reports/42/".into()));
        assert_eq!(effects, vec![Effect::Navigate("/reports/42/".into())]);
    }
}
