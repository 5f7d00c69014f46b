//! ARCO data-rights requests (access, rectification, cancellation,
//! opposition).

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::user::PersonName;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMethods {
    #[serde(default)]
    pub telefono: Vec<String>,
    #[serde(default)]
    pub correo: Vec<String>,
}

/// Body of `POST /api/arco/registrar`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcoRequest {
    pub solicitante: PersonName,
    pub medios_contacto: ContactMethods,
    pub tipo_solicitud: Vec<String>,
    pub complemento: Vec<String>,
}

/// A request as listed by `GET /api/arco/listar`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcoRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub solicitante: PersonName,
    #[serde(default)]
    pub medios_contacto: ContactMethods,
    #[serde(default)]
    pub tipo_solicitud: Vec<String>,
    #[serde(default)]
    pub complemento: Vec<String>,
}

impl ArcoRecord {
    /// One-line listing: name, phones, emails and request types.
    pub fn summary(&self) -> String {
        format!(
            "{} | Tel: {} | Correo: {} | Tipo: {}",
            self.solicitante.full_name(),
            self.medios_contacto.telefono.join(", "),
            self.medios_contacto.correo.join(", "),
            self.tipo_solicitud.join(", ")
        )
    }
}

/// Raw new-request form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArcoRequestForm {
    pub nombre: String,
    pub ap_pat: String,
    pub ap_mat: String,
    pub telefono: String,
    pub correo: String,
    pub tipo: String,
    pub complemento: String,
}

fn optional_list(value: &str) -> Vec<String> {
    match value.trim() {
        "" => Vec::new(),
        trimmed => vec![trimmed.to_string()],
    }
}

impl ArcoRequestForm {
    /// Only the requester's name is required. Every field is trimmed and
    /// blank optional fields become empty lists.
    pub fn into_request(self) -> Result<ArcoRequest, ValidationError> {
        if self.nombre.trim().is_empty() {
            return Err(ValidationError::missing(["nombre"]));
        }

        Ok(ArcoRequest {
            solicitante: PersonName::new(
                self.nombre.trim(),
                self.ap_pat.trim(),
                self.ap_mat.trim(),
            ),
            medios_contacto: ContactMethods {
                telefono: optional_list(&self.telefono),
                correo: optional_list(&self.correo),
            },
            tipo_solicitud: optional_list(&self.tipo),
            complemento: optional_list(&self.complemento),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_required() {
        let form = ArcoRequestForm {
            nombre: "   ".to_string(),
            correo: "ana@example.com".to_string(),
            ..ArcoRequestForm::default()
        };
        assert_eq!(
            form.into_request(),
            Err(ValidationError::missing(["nombre"]))
        );
    }

    #[test]
    fn blank_optional_fields_become_empty_lists() {
        let request = ArcoRequestForm {
            nombre: " Ana ".to_string(),
            ap_pat: "López".to_string(),
            tipo: "Acceso".to_string(),
            ..ArcoRequestForm::default()
        }
        .into_request()
        .unwrap();

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["solicitante"]["nombre"], "Ana");
        assert_eq!(json["medios_contacto"]["telefono"], serde_json::json!([]));
        assert_eq!(json["tipo_solicitud"], serde_json::json!(["Acceso"]));
        assert_eq!(json["complemento"], serde_json::json!([]));
    }

    #[test]
    fn sparse_record_deserializes() {
        let record: ArcoRecord =
            serde_json::from_str(r#"{"_id":"a1","solicitante":{"nombre":"Ana"}}"#).unwrap();
        assert_eq!(record.id.as_deref(), Some("a1"));
        assert_eq!(record.summary(), "Ana | Tel:  | Correo:  | Tipo: ");
    }
}
