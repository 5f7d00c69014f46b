//! User identity shapes shared by the registration record and the profile
//! endpoint.

use serde::{Deserialize, Serialize};

/// Given name plus paternal and maternal surnames.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub ap_pat: String,
    #[serde(default)]
    pub ap_mat: String,
}

impl PersonName {
    pub fn new(
        nombre: impl Into<String>,
        ap_pat: impl Into<String>,
        ap_mat: impl Into<String>,
    ) -> Self {
        Self {
            nombre: nombre.into(),
            ap_pat: ap_pat.into(),
            ap_mat: ap_mat.into(),
        }
    }

    /// Non-empty parts joined by a single space.
    pub fn full_name(&self) -> String {
        [&self.nombre, &self.ap_pat, &self.ap_mat]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A user object as returned by the backend or stored at registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre_usuario: Option<PersonName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usuario: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrasena: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub correo: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telefono: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entidad: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precio_suscripcion: Option<f64>,
}

impl UserProfile {
    /// Username, else first email.
    pub fn login_name(&self) -> Option<&str> {
        self.usuario
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.correo.first().map(String::as_str))
            .filter(|u| !u.is_empty())
    }

    /// Full name when present, else the login name.
    pub fn display_name(&self) -> Option<String> {
        self.nombre_usuario
            .as_ref()
            .map(PersonName::full_name)
            .filter(|name| !name.is_empty())
            .or_else(|| self.login_name().map(str::to_string))
    }
}

/// `usuario` in stored or returned data is either a plain username or a
/// nested user object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Name(String),
    Profile(Box<UserProfile>),
}

impl UserRef {
    /// Name to pre-fill the login form with.
    pub fn login_name(&self) -> Option<&str> {
        match self {
            UserRef::Name(name) => Some(name.as_str()).filter(|n| !n.is_empty()),
            UserRef::Profile(profile) => profile.login_name(),
        }
    }

    /// Password nested inside an object-shaped `usuario`.
    pub fn nested_password(&self) -> Option<&str> {
        match self {
            UserRef::Name(_) => None,
            UserRef::Profile(profile) => profile.contrasena.as_deref(),
        }
    }
}

/// Up to two uppercase initials from the first two words of `name`.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
