//! # Intake UI
//!
//! Page controllers for the intake pages, written as plain state machines:
//! every user interaction is a method call, every DOM mutation the page
//! should perform comes back as an [`effect::Effect`] value. The rendering
//! layer owns the element handles; nothing in this crate touches a
//! document, which keeps the whole interaction logic unit-testable.
//!
//! One controller per page:
//! - [`upload::UploadController`] — image upload with patient typeahead
//! - [`patient_form::PatientFormController`] — patient registration/edit
//! - [`profile::ProfileController`] — profile edit with optional fields
//! - [`listing`] — patient list search box and report list affordances
//! - [`auth`] — login/register/password-reset field validation

pub mod auth;
pub mod effect;
pub mod listing;
pub mod patient_form;
pub mod picker;
pub mod profile;
pub mod upload;

pub use effect::{Effect, SelectOption};
