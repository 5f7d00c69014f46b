//! Vehicle records and the add-vehicle form.

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::validation::require_fields;

/// A vehicle as exchanged with the backend and kept in the local record.
///
/// `placas` and `VIN` are uppercase once a value has gone through
/// [`Vehicle::normalized`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub marca: String,
    #[serde(default)]
    pub modelo: String,
    #[serde(default)]
    pub placas: String,
    #[serde(rename = "VIN", default, skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado_motor: Option<bool>,
}

impl Vehicle {
    /// Trim text fields, uppercase plates and VIN, and drop a blank VIN.
    pub fn normalized(mut self) -> Self {
        self.marca = self.marca.trim().to_string();
        self.modelo = self.modelo.trim().to_string();
        self.placas = self.placas.trim().to_uppercase();
        self.vin = self
            .vin
            .map(|vin| vin.trim().to_uppercase())
            .filter(|vin| !vin.is_empty());
        self
    }

    /// "Marca Modelo" for listings.
    pub fn title(&self) -> String {
        format!("{} {}", self.marca, self.modelo).trim().to_string()
    }
}

/// Raw add-vehicle form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDraft {
    pub marca: String,
    pub modelo: String,
    pub placas: String,
    #[serde(default)]
    pub vin: String,
}

impl VehicleDraft {
    pub fn new(
        marca: impl Into<String>,
        modelo: impl Into<String>,
        placas: impl Into<String>,
        vin: impl Into<String>,
    ) -> Self {
        Self {
            marca: marca.into(),
            modelo: modelo.into(),
            placas: placas.into(),
            vin: vin.into(),
        }
    }

    /// Marca, Modelo and Placas are required; the result is normalized.
    pub fn validate(&self) -> Result<Vehicle, ValidationError> {
        require_fields(&[
            ("marca", self.marca.as_str()),
            ("modelo", self.modelo.as_str()),
            ("placas", self.placas.as_str()),
        ])?;

        Ok(Vehicle {
            marca: self.marca.clone(),
            modelo: self.modelo.clone(),
            placas: self.placas.clone(),
            vin: Some(self.vin.clone()),
            ..Vehicle::default()
        }
        .normalized())
    }
}
