//! Multipart upload submission with server-error remapping.
//!
//! The upload page posts either a selected patient id or the six raw
//! patient fields, plus the lesion image and the anatomical site, with the
//! CSRF token in `X-CSRFToken`. The response is `{success, redirect_url?,
//! errors?}`; error values are a string or a list of strings keyed by field
//! name. Keys that match a known field are remapped onto it, `general` and
//! `__all__` feed the banner, and anything else is reported unmapped.

use std::collections::BTreeMap;
use std::str::FromStr;

use intake_types::FieldKey;
use reqwest::multipart;
use serde::Deserialize;

use crate::error::ClientResult;

/// Patient part of the submission body.
#[derive(Debug, Clone)]
pub enum PatientPayload {
    /// An existing patient was picked from the selection list.
    Existing { id: String },
    /// A new patient is registered inline with the upload.
    New(NewPatient),
}

/// Raw field values for an inline patient registration. Values travel as
/// entered; the backend re-validates.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub phone: String,
    pub email: String,
    pub age_approx: String,
    pub sex: String,
}

/// The selected lesion image.
#[derive(Debug, Clone)]
pub struct UploadImage {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime: String,
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub patient: PatientPayload,
    pub image: UploadImage,
    pub anatom_site: String,
}

/// Result of a submission that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Success; navigate to the server-provided URL.
    Redirect(String),
    Rejected(SubmitRejection),
}

/// Server-side rejection, already remapped to fields where possible.
///
/// An all-empty rejection means the server failed without anything more
/// specific; callers fall back to their generic server-error message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitRejection {
    /// Errors attached to a known form field.
    pub field_errors: Vec<(FieldKey, String)>,
    /// `general` / `__all__` message for the banner.
    pub general: Option<String>,
    /// Keys the client knows no field for; surfaced in the banner verbatim.
    pub unmapped: Vec<(String, String)>,
}

impl SubmitRejection {
    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty() && self.general.is_none() && self.unmapped.is_empty()
    }
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    redirect_url: Option<String>,
    #[serde(default)]
    errors: Option<BTreeMap<String, ErrorDetail>>,
}

/// Field error values arrive as a bare string or a list of strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    One(String),
    Many(Vec<String>),
}

impl ErrorDetail {
    fn joined(&self) -> String {
        match self {
            ErrorDetail::One(s) => s.clone(),
            ErrorDetail::Many(list) => list.join(", "),
        }
    }
}

/// Client for the upload submission endpoint.
#[derive(Clone)]
pub struct SubmitClient {
    http: reqwest::Client,
    submit_url: String,
    csrf_token: String,
}

impl SubmitClient {
    pub fn new(submit_url: impl Into<String>, csrf_token: impl Into<String>) -> ClientResult<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            submit_url: submit_url.into(),
            csrf_token: csrf_token.into(),
        })
    }

    /// Posts the multipart body and classifies the response.
    ///
    /// Only transport failures surface as `Err`; every server-side refusal
    /// becomes `SubmitOutcome::Rejected` so the page stays usable for
    /// retry.
    pub async fn submit(&self, request: UploadRequest) -> ClientResult<SubmitOutcome> {
        let mut form = multipart::Form::new();
        match request.patient {
            PatientPayload::Existing { id } => {
                form = form.text("patient", id);
            }
            PatientPayload::New(p) => {
                form = form
                    .text("first_name", p.first_name)
                    .text("last_name", p.last_name)
                    .text("dni", p.dni)
                    .text("phone", p.phone)
                    .text("email", p.email)
                    .text("age_approx", p.age_approx)
                    .text("sex", p.sex);
            }
        }

        let image_part = multipart::Part::bytes(request.image.bytes)
            .file_name(request.image.filename)
            .mime_str(&request.image.mime)?;
        form = form
            .part("image", image_part)
            .text("anatom_site_general", request.anatom_site);

        let response = self
            .http
            .post(&self.submit_url)
            .header("X-CSRFToken", &self.csrf_token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let parsed: Option<SubmitResponse> = serde_json::from_str(&body).ok();
        let outcome = match parsed {
            Some(resp) if status.is_success() && resp.success => match resp.redirect_url {
                Some(url) => SubmitOutcome::Redirect(url),
                // success: false-equivalent; no destination to go to.
                None => SubmitOutcome::Rejected(remap(resp.errors)),
            },
            Some(resp) => SubmitOutcome::Rejected(remap(resp.errors)),
            None if !status.is_success() => {
                tracing::warn!(status = status.as_u16(), "submission failed without JSON body");
                SubmitOutcome::Rejected(SubmitRejection {
                    general: Some(format!("Error: {}", status.as_u16())),
                    ..Default::default()
                })
            }
            None => {
                tracing::warn!("submission response was not JSON");
                SubmitOutcome::Rejected(SubmitRejection::default())
            }
        };
        Ok(outcome)
    }
}

/// Distributes a server error body onto form fields.
fn remap(errors: Option<BTreeMap<String, ErrorDetail>>) -> SubmitRejection {
    let mut rejection = SubmitRejection::default();
    let Some(errors) = errors else {
        return rejection;
    };

    for (key, detail) in errors {
        let message = detail.joined();
        if key == "general" || key == "__all__" {
            rejection.general = Some(message);
            continue;
        }
        // "image" and "anatom_site_general" parse like any other field key;
        // they only differ in which slot the page renders them to.
        match FieldKey::from_str(&key) {
            Ok(field) => rejection.field_errors.push((field, message)),
            Err(_) => {
                tracing::warn!(key = %key, message = %message, "server error key has no matching field");
                rejection.unmapped.push((key, message));
            }
        }
    }
    rejection
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> UploadRequest {
        UploadRequest {
            patient: PatientPayload::Existing { id: "7".into() },
            image: UploadImage {
                bytes: vec![0xFF, 0xD8, 0xFF],
                filename: "lesion.jpg".into(),
                mime: "image/jpeg".into(),
            },
            anatom_site: "back".into(),
        }
    }

    fn new_patient_request() -> UploadRequest {
        UploadRequest {
            patient: PatientPayload::New(NewPatient {
                first_name: "Luz".into(),
                last_name: "Vega".into(),
                dni: "1710034065".into(),
                phone: "0999999999".into(),
                email: "luz@example.com".into(),
                age_approx: "41".into(),
                sex: "female".into(),
            }),
            image: UploadImage {
                bytes: vec![1, 2, 3],
                filename: "lesion.png".into(),
                mime: "image/png".into(),
            },
            anatom_site: "face".into(),
        }
    }

    async fn client_for(server: &MockServer) -> SubmitClient {
        SubmitClient::new(format!("{}/submit-upload/", server.uri()), "csrf-abc").unwrap()
    }

    #[tokio::test]
    async fn test_success_yields_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/submit-upload/"))
            .and(header("X-CSRFToken", "csrf-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "redirect_url": "/reports/42/"
            })))
            .mount(&server)
            .await;

        let outcome = client_for(&server).await.submit(request()).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Redirect("/reports/42/".into()));
    }

    #[tokio::test]
    async fn test_field_errors_are_remapped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "errors": {
                    "dni": ["ya existe"],
                    "image": "demasiado grande",
                    "general": "revise el formulario",
                    "extraneous": "sin campo"
                }
            })))
            .mount(&server)
            .await;

        let outcome = client_for(&server)
            .await
            .submit(new_patient_request())
            .await
            .unwrap();
        let SubmitOutcome::Rejected(rejection) = outcome else {
            panic!("expected rejection");
        };
        assert!(rejection
            .field_errors
            .contains(&(FieldKey::Dni, "ya existe".into())));
        assert!(rejection
            .field_errors
            .contains(&(FieldKey::Image, "demasiado grande".into())));
        assert_eq!(rejection.general.as_deref(), Some("revise el formulario"));
        assert_eq!(rejection.unmapped, vec![("extraneous".into(), "sin campo".into())]);
    }

    #[tokio::test]
    async fn test_success_without_redirect_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
            )
            .mount(&server)
            .await;

        let outcome = client_for(&server).await.submit(request()).await.unwrap();
        let SubmitOutcome::Rejected(rejection) = outcome else {
            panic!("expected rejection");
        };
        assert!(rejection.is_empty());
    }

    #[tokio::test]
    async fn test_non_json_error_folds_into_status_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let outcome = client_for(&server).await.submit(request()).await.unwrap();
        let SubmitOutcome::Rejected(rejection) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(rejection.general.as_deref(), Some("Error: 502"));
    }
}
