//! # Intake Core
//!
//! Pure form logic for the clinical intake pages:
//! - National ID (cédula) check-digit validation
//! - Field-level validators and input formatters
//! - Change-detection gate for edit forms
//! - Notice lifecycle (auto-dismissed alerts)
//! - The message catalog holding every user-facing string
//!
//! **No I/O concerns**: network access lives in `intake-client`, page
//! orchestration in `intake-ui`. Everything here is deterministic and
//! unit-testable without a browser.

pub mod cedula;
pub mod form;
pub mod format;
pub mod notice;
pub mod texts;
pub mod validate;

pub use cedula::{validate_cedula, CedulaCheck, Requirement};
pub use form::{ChangeGate, SubmitControl};
pub use notice::{Notice, NoticeBoard, NoticeKind};
pub use texts::MessageCatalog;
pub use validate::{FieldIssue, FieldValidator, FileMeta};
