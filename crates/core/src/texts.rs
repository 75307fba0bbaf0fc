//! User-facing message catalog.
//!
//! Every string a page shows lives here and is passed explicitly into the
//! components that need it, replacing the process-wide mutable text table
//! the pages used to read. Defaults carry the Spanish strings served by the
//! upload view.

use serde::{Deserialize, Serialize};

/// All user-facing strings for the intake pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCatalog {
    // Field validation
    pub empty_field: String,
    pub empty_optional: String,
    pub name_min_length: String,
    pub name_max_length: String,
    pub name_regex: String,
    pub dni_exact_length: String,
    pub dni_numeric: String,
    pub dni_invalid: String,
    pub email_max_length: String,
    pub email_invalid: String,
    pub phone_max_length: String,
    pub phone_invalid_format: String,
    pub address_min_length: String,
    pub address_max_length: String,
    pub address_regex: String,
    pub age_invalid: String,
    pub image_required: String,
    pub image_invalid_type: String,
    pub image_max_size: String,
    pub site_required: String,
    pub picture_invalid_type: String,
    pub password_min_length: String,
    pub password_mismatch: String,

    // Patient search
    pub searching_prefix: String,
    pub search_placeholder_default: String,
    pub error_searching_patients: String,
    pub search_min_length: String,

    // Report list email modal
    pub modal_email_required: String,
    pub modal_email_invalid: String,
    pub sending_label: String,
    pub generating_label: String,

    // Banners and submit control
    pub form_errors: String,
    pub server_error: String,
    pub locked_hint: String,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            empty_field: "El campo está vacío, por favor rellénelo.".into(),
            empty_optional: "El campo esta vacio (opcional rellenarlo)".into(),
            name_min_length: "El nombre o apellido debe tener al menos 3 caracteres.".into(),
            name_max_length: "El nombre o apellido no puede tener más de 50 caracteres.".into(),
            name_regex: "Solo puede contener letras, incluyendo letras especiales como la Ñ o tilde."
                .into(),
            dni_exact_length: "La cédula debe contener exactamente 10 dígitos.".into(),
            dni_numeric: "La cédula debe contener solo números.".into(),
            dni_invalid: "La cédula ingresada no es válida.".into(),
            email_max_length: "El correo electrónico excede la longitud máxima permitida.".into(),
            email_invalid: "Ingrese un correo electrónico válido.".into(),
            phone_max_length: "El campo no puede tener más de 16 caracteres.".into(),
            phone_invalid_format:
                "Ingrese un número válido (formato: +593 99 999 9999 o 0999999999)".into(),
            address_min_length: "El campo debe tener mas de 5 caracteres.".into(),
            address_max_length: "El campo no puede tener más de 255 caracteres.".into(),
            address_regex:
                "El campo solo puede contener letras y espacios, incluyendo caracteres especiales como la Ñ, letras con tilde o Puntuación ( . )."
                    .into(),
            age_invalid: "Ingrese una edad válida entre 0 y 120 años.".into(),
            image_required: "Por favor seleccione una imagen para analizar.".into(),
            image_invalid_type: "El archivo debe ser una imagen (JPG, JPEG o PNG).".into(),
            image_max_size: "La imagen no debe exceder los 5MB.".into(),
            site_required: "Por favor seleccione la localización anatómica.".into(),
            picture_invalid_type: "Solo se permiten imágenes en formato PNG, JPG o JPEG.".into(),
            password_min_length: "La contraseña debe tener al menos 8 caracteres.".into(),
            password_mismatch: "Las contraseñas no coinciden.".into(),

            searching_prefix: "Buscando:".into(),
            search_placeholder_default: "Busque por cédula (solo números, máx. 10)".into(),
            error_searching_patients: "Error al buscar pacientes:".into(),
            search_min_length: "La búsqueda debe tener al menos 3 caracteres".into(),

            modal_email_required: "El email es requerido".into(),
            modal_email_invalid: "Por favor ingrese un email válido".into(),
            sending_label: "Enviando...".into(),
            generating_label: "Generando...".into(),

            form_errors: "Por favor, corrija los errores en el formulario.".into(),
            server_error: "Ocurrió un error en el servidor. Intente de nuevo.".into(),
            locked_hint: "SE HABILITARÁ CUANDO REALICE ALGÚN CAMBIO EN EL FORMULARIO".into(),
        }
    }
}

impl MessageCatalog {
    /// Placeholder echo while typing a search query: `"Buscando: 1712"`.
    pub fn searching_echo(&self, query: &str) -> String {
        format!("{} {}", self.searching_prefix, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_spanish() {
        let texts = MessageCatalog::default();
        assert!(texts.empty_field.contains("vacío"));
        assert_eq!(texts.searching_echo("1712"), "Buscando: 1712");
    }
}
