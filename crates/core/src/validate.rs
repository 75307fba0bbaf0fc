//! Field-level validators.
//!
//! Each validator trims its input and returns `None` when the value passes,
//! or a [`FieldIssue`] carrying the message to render and its severity.
//! `Warning` issues mark empty optional fields; they are shown but never
//! block submission.

use std::sync::LazyLock;

use intake_types::Severity;
use regex::Regex;

use crate::cedula::{validate_cedula, CedulaCheck, Requirement};
use crate::texts::MessageCatalog;

/// Maximum accepted lesion/profile image size.
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Email length limit on the patient registration/edit forms.
pub const EMAIL_MAX_PATIENT: usize = 254;
/// Email length limit on the profile form (the backend caps it there).
pub const EMAIL_MAX_PROFILE: usize = 50;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zÁÉÍÓÚáéíóúÑñ\s]+$").expect("static regex"));
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("static regex")
});
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+593 \d{2} \d{3} \d{4}|0\d{9})$").expect("static regex"));
static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zÁÉÍÓÚáéíóúÑñ.\s]+$").expect("static regex"));

/// A validation finding for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub text: String,
    pub severity: Severity,
}

impl FieldIssue {
    fn error(text: &str) -> Self {
        Self {
            text: text.to_string(),
            severity: Severity::Error,
        }
    }

    fn warning(text: &str) -> Self {
        Self {
            text: text.to_string(),
            severity: Severity::Warning,
        }
    }

    /// True when the issue blocks submission.
    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Metadata of a selected file, as reported by the file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub mime: String,
    pub len: u64,
}

/// Validates form fields against an explicit message catalog.
///
/// Construct one per page with the catalog the page was configured with.
#[derive(Debug, Clone, Copy)]
pub struct FieldValidator<'a> {
    texts: &'a MessageCatalog,
}

impl<'a> FieldValidator<'a> {
    pub fn new(texts: &'a MessageCatalog) -> Self {
        Self { texts }
    }

    /// First or last name: required, 3..=50 chars, letters (incl. accents
    /// and Ñ) and spaces only.
    pub fn full_name(&self, value: &str) -> Option<FieldIssue> {
        let value = value.trim();
        if value.is_empty() {
            return Some(FieldIssue::error(&self.texts.empty_field));
        }
        if value.chars().count() < 3 {
            return Some(FieldIssue::error(&self.texts.name_min_length));
        }
        if value.chars().count() > 50 {
            return Some(FieldIssue::error(&self.texts.name_max_length));
        }
        if !NAME_RE.is_match(value) {
            return Some(FieldIssue::error(&self.texts.name_regex));
        }
        None
    }

    /// Email: required, bounded by `max_len` (the patient and profile forms
    /// carry different backend limits).
    pub fn email(&self, value: &str, max_len: usize) -> Option<FieldIssue> {
        let value = value.trim();
        if value.is_empty() {
            return Some(FieldIssue::error(&self.texts.empty_field));
        }
        if value.chars().count() > max_len {
            return Some(FieldIssue::error(&self.texts.email_max_length));
        }
        if !EMAIL_RE.is_match(value) {
            return Some(FieldIssue::error(&self.texts.email_invalid));
        }
        None
    }

    /// Phone: exactly `0999999999` or `+593 99 999 9999` (single spaces).
    ///
    /// Optional contexts warn on empty and cap the raw length at 16.
    pub fn phone(&self, value: &str, requirement: Requirement) -> Option<FieldIssue> {
        let value = value.trim();
        if value.is_empty() {
            return Some(match requirement {
                Requirement::Mandatory => FieldIssue::error(&self.texts.empty_field),
                Requirement::Optional => FieldIssue::warning(&self.texts.empty_optional),
            });
        }
        if requirement == Requirement::Optional && value.chars().count() > 16 {
            return Some(FieldIssue::error(&self.texts.phone_max_length));
        }
        if !PHONE_RE.is_match(value) {
            return Some(FieldIssue::error(&self.texts.phone_invalid_format));
        }
        None
    }

    /// Approximate age: required integer in 0..=120.
    pub fn age(&self, value: &str) -> Option<FieldIssue> {
        let value = value.trim();
        if value.is_empty() {
            return Some(FieldIssue::error(&self.texts.empty_field));
        }
        match value.parse::<i64>() {
            Ok(age) if (0..=120).contains(&age) => None,
            _ => Some(FieldIssue::error(&self.texts.age_invalid)),
        }
    }

    /// Required select controls (sex, anatomical site outside the upload
    /// page): any non-empty choice passes.
    pub fn required_choice(&self, value: &str) -> Option<FieldIssue> {
        if value.trim().is_empty() {
            Some(FieldIssue::error(&self.texts.empty_field))
        } else {
            None
        }
    }

    /// Address or city on the profile form: optional, 5..=255 chars,
    /// letters, accents, spaces and `.` only.
    pub fn address_or_city(&self, value: &str) -> Option<FieldIssue> {
        let value = value.trim();
        if value.is_empty() {
            return Some(FieldIssue::warning(&self.texts.empty_optional));
        }
        if value.chars().count() > 255 {
            return Some(FieldIssue::error(&self.texts.address_max_length));
        }
        if value.chars().count() < 5 {
            return Some(FieldIssue::error(&self.texts.address_min_length));
        }
        if !ADDRESS_RE.is_match(value) {
            return Some(FieldIssue::error(&self.texts.address_regex));
        }
        None
    }

    /// Cédula, classified by [`validate_cedula`] and mapped to messages.
    pub fn cedula(&self, value: &str, requirement: Requirement) -> Option<FieldIssue> {
        match validate_cedula(value, requirement) {
            CedulaCheck::Valid => None,
            CedulaCheck::Empty => Some(FieldIssue::error(&self.texts.empty_field)),
            CedulaCheck::EmptyOptional => Some(FieldIssue::warning(&self.texts.empty_optional)),
            CedulaCheck::WrongLength => Some(FieldIssue::error(&self.texts.dni_exact_length)),
            CedulaCheck::NonNumeric => Some(FieldIssue::error(&self.texts.dni_numeric)),
            CedulaCheck::ChecksumMismatch => Some(FieldIssue::error(&self.texts.dni_invalid)),
        }
    }

    /// Lesion image on the upload page: required, JPEG/PNG, at most 5 MiB.
    pub fn lesion_image(&self, file: Option<&FileMeta>) -> Option<FieldIssue> {
        let file = match file {
            Some(f) => f,
            None => return Some(FieldIssue::error(&self.texts.image_required)),
        };
        if !matches!(file.mime.as_str(), "image/jpeg" | "image/png" | "image/jpg") {
            return Some(FieldIssue::error(&self.texts.image_invalid_type));
        }
        if file.len > MAX_IMAGE_BYTES {
            return Some(FieldIssue::error(&self.texts.image_max_size));
        }
        None
    }

    /// Profile picture: optional; extension must be png/jpg/jpeg.
    pub fn profile_picture(&self, file: Option<&FileMeta>) -> Option<FieldIssue> {
        let file = match file {
            Some(f) => f,
            None => return Some(FieldIssue::warning(&self.texts.empty_optional)),
        };
        let extension = file
            .name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !matches!(extension.as_str(), "png" | "jpg" | "jpeg") {
            return Some(FieldIssue::error(&self.texts.picture_invalid_type));
        }
        None
    }

    /// Password: required, at least 8 characters.
    pub fn password(&self, value: &str) -> Option<FieldIssue> {
        if value.trim().is_empty() {
            return Some(FieldIssue::error(&self.texts.empty_field));
        }
        if value.chars().count() < 8 {
            return Some(FieldIssue::error(&self.texts.password_min_length));
        }
        None
    }

    /// Password confirmation: required and identical to the original.
    pub fn confirm_password(&self, value: &str, original: &str) -> Option<FieldIssue> {
        if value.trim().is_empty() {
            return Some(FieldIssue::error(&self.texts.empty_field));
        }
        if value != original {
            return Some(FieldIssue::error(&self.texts.password_mismatch));
        }
        None
    }
}
