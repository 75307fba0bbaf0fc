//! # Intake Client
//!
//! Async HTTP access to the two backend endpoints the intake pages consume:
//! the patient search (`GET ?dni=`) and the multipart upload submission.
//!
//! The search side wraps the raw client in a [`search::SearchDriver`] that
//! debounces queries (300 ms) and gates responses behind a generation
//! token, so a slow response for a superseded query can never overwrite the
//! result of a later one.

pub mod error;
pub mod search;
pub mod submit;

pub use error::{ClientError, ClientResult};
pub use search::{SearchClient, SearchDriver, QUERY_MAX_DIGITS, SEARCH_DEBOUNCE};
pub use submit::{
    NewPatient, PatientPayload, SubmitClient, SubmitOutcome, SubmitRejection, UploadImage,
    UploadRequest,
};
