//! Registration form and the local fallback registration record.
//!
//! The record under `registro_usuario` is a local-only cache. It never
//! expires and its presence says nothing about the remote session.

use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::storage::{KeyValueStore, REGISTRATION_KEY};
use crate::user::{PersonName, UserProfile, UserRef};
use crate::validation::{
    generate_password, require_fields, username_from_email, validate_password,
};
use crate::vehicle::{Vehicle, VehicleDraft};

/// The registration payload, also persisted as the local fallback record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalRegistration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre_usuario: Option<PersonName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usuario: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrasena: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub correo: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telefono: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero_vehiculos: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entidad: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipio: Option<String>,
    /// Vehicle created together with the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehiculo: Option<Vehicle>,
    /// Vehicles added later while the backend was unavailable.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vehiculos: Vec<Vehicle>,
}

impl LocalRegistration {
    /// Registration vehicle first, then locally added ones.
    pub fn all_vehicles(&self) -> Vec<Vehicle> {
        self.vehiculo
            .iter()
            .chain(self.vehiculos.iter())
            .cloned()
            .collect()
    }

    /// Name to pre-fill the login form with: plain `usuario`, nested
    /// `usuario.usuario`, else the first email.
    pub fn login_prefill(&self) -> Option<String> {
        self.usuario
            .as_ref()
            .and_then(UserRef::login_name)
            .or_else(|| self.correo.first().map(String::as_str))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    /// Full name when present, else the login name.
    pub fn display_name(&self) -> Option<String> {
        self.nombre_usuario
            .as_ref()
            .map(PersonName::full_name)
            .filter(|name| !name.is_empty())
            .or_else(|| self.login_prefill())
    }

    /// The record seen as a user profile. Fields of an object-shaped
    /// `usuario` fill whatever the record itself leaves empty.
    pub fn to_profile(&self) -> UserProfile {
        let nested = match &self.usuario {
            Some(UserRef::Profile(profile)) => profile.as_ref().clone(),
            _ => UserProfile::default(),
        };
        let non_empty = |list: &Vec<String>, fallback: Vec<String>| {
            if list.is_empty() {
                fallback
            } else {
                list.clone()
            }
        };

        UserProfile {
            nombre_usuario: self.nombre_usuario.clone().or(nested.nombre_usuario),
            usuario: self
                .usuario
                .as_ref()
                .and_then(UserRef::login_name)
                .map(str::to_string),
            contrasena: self.contrasena.clone().or(nested.contrasena),
            correo: non_empty(&self.correo, nested.correo),
            telefono: non_empty(&self.telefono, nested.telefono),
            entidad: self.entidad.clone().or(nested.entidad),
            municipio: self.municipio.clone().or(nested.municipio),
            precio_suscripcion: nested.precio_suscripcion,
        }
    }
}

/// Raw registration form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub nombre: String,
    pub ap_pat: String,
    pub ap_mat: String,
    pub correo: String,
    pub telefono: String,
    pub usuario: String,
    pub contrasena: String,
    pub entidad: String,
    pub municipio: String,
    /// Vehicle to create in the same request, when the user opted in.
    pub vehiculo: Option<VehicleDraft>,
}

impl RegistrationForm {
    /// Validate the form and build the payload.
    ///
    /// A blank username defaults to the email local part and a blank
    /// password is replaced by a generated one.
    pub fn into_registration(self) -> std::result::Result<LocalRegistration, ValidationError> {
        require_fields(&[
            ("nombre", self.nombre.as_str()),
            ("ap_pat", self.ap_pat.as_str()),
            ("correo", self.correo.as_str()),
        ])?;

        let vehiculo = self
            .vehiculo
            .as_ref()
            .map(VehicleDraft::validate)
            .transpose()?;

        let contrasena = if self.contrasena.is_empty() {
            generate_password()
        } else {
            validate_password(&self.contrasena)?;
            self.contrasena
        };

        let usuario = match self.usuario.trim() {
            "" => username_from_email(&self.correo)?,
            name => name.to_string(),
        };

        Ok(LocalRegistration {
            nombre_usuario: Some(PersonName::new(self.nombre, self.ap_pat, self.ap_mat)),
            usuario: Some(UserRef::Name(usuario)),
            contrasena: Some(contrasena),
            correo: vec![self.correo.trim().to_string()],
            telefono: vec![self.telefono.trim().to_string()],
            numero_vehiculos: Some(1),
            entidad: Some(self.entidad),
            municipio: Some(self.municipio),
            vehiculo,
            vehiculos: Vec::new(),
        })
    }
}

/// Reads and writes the local registration record.
#[derive(Clone)]
pub struct LocalRegistrationStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for LocalRegistrationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalRegistrationStore")
            .finish_non_exhaustive()
    }
}

impl LocalRegistrationStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored record, or `None` when absent, unreadable or corrupt.
    pub fn load(&self) -> Option<LocalRegistration> {
        let raw = match self.store.get_item(REGISTRATION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("[Registration] Failed to read local record: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("[Registration] Failed to parse local record: {}", e);
                None
            }
        }
    }

    pub fn save(&self, record: &LocalRegistration) -> Result<()> {
        let json = serde_json::to_string(record)?;
        self.store.set_item(REGISTRATION_KEY, &json)?;
        debug!("[Registration] Local record saved");
        Ok(())
    }

    /// Append a vehicle to the record, creating an empty record if none is
    /// stored. An unreadable record is left untouched and reported.
    pub fn append_vehicle(&self, vehicle: Vehicle) -> Result<LocalRegistration> {
        let mut record = match self.store.get_item(REGISTRATION_KEY)? {
            Some(raw) => serde_json::from_str::<LocalRegistration>(&raw)?,
            None => LocalRegistration::default(),
        };
        record.vehiculos.push(vehicle.normalized());
        self.save(&record)?;
        Ok(record)
    }

    pub fn login_prefill(&self) -> Option<String> {
        self.load().and_then(|record| record.login_prefill())
    }

}
