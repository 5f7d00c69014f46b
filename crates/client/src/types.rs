//! Wire shapes of backend requests and responses.

use ivss_core::arco::ArcoRecord;
use ivss_core::user::UserRef;
use ivss_core::vehicle::Vehicle;
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where the data of a fallback-capable operation ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persistence {
    /// Accepted by the backend.
    Remote,
    /// Backend unavailable; written to the local registration record only.
    LocalFallback,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub usuario: &'a str,
    pub contrasena: &'a str,
}

/// Successful login body. Fields stay untyped so an odd `usuario` shape
/// never turns an accepted login into a failure.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    token: Option<Value>,
    #[serde(default)]
    usuario: Option<Value>,
}

impl LoginResponse {
    pub fn from_body(body: Value) -> Self {
        decode_lenient(body, "login")
    }

    pub fn token(&self) -> Option<&str> {
        self.token
            .as_ref()
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
    }

    pub fn login_name(&self) -> Option<String> {
        self.usuario.as_ref().and_then(login_name_from)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RegisterResponse {
    #[serde(default)]
    usuario: Option<Value>,
    #[serde(default)]
    vehiculo: Option<Value>,
}

impl RegisterResponse {
    pub fn from_body(body: Value) -> Self {
        decode_lenient(body, "register")
    }

    pub fn login_name(&self) -> Option<String> {
        self.usuario.as_ref().and_then(login_name_from)
    }

    /// The echoed vehicle, when it decodes.
    pub fn vehicle(&self) -> Option<Vehicle> {
        let value = self.vehiculo.as_ref().filter(|v| !v.is_null())?;
        match serde_json::from_value::<Vehicle>(value.clone()) {
            Ok(vehicle) => Some(vehicle.normalized()),
            Err(e) => {
                warn!("[Api] Ignoring unreadable vehiculo in response: {}", e);
                None
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ArcoListResponse {
    #[serde(default)]
    pub data: Vec<ArcoRecord>,
}

/// Decode a 2xx body, reading an unexpected shape as the empty response.
fn decode_lenient<T: DeserializeOwned + Default>(body: Value, what: &str) -> T {
    if body.is_null() {
        return T::default();
    }
    serde_json::from_value(body).unwrap_or_else(|e| {
        warn!("[Api] Unexpected {} response shape: {}", what, e);
        T::default()
    })
}

/// Login name from a `usuario` value: a plain name, a user object, or the
/// `usuario`/`correo` of an object that does not decode as a user.
pub(crate) fn login_name_from(value: &Value) -> Option<String> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value::<UserRef>(value.clone()) {
        Ok(user) => user.login_name().map(str::to_string),
        Err(e) => {
            warn!("[Api] Loosely shaped usuario in response: {}", e);
            let correo = value.get("correo").and_then(|correo| {
                correo
                    .as_str()
                    .or_else(|| correo.get(0).and_then(Value::as_str))
            });
            value
                .get("usuario")
                .and_then(Value::as_str)
                .or(correo)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
        }
    }
}

/// `body[key]` when it holds an object or array, else the body itself.
///
/// Several endpoints answer either `{ "<key>": payload }` or the bare payload.
pub(crate) fn unwrap_envelope(mut body: Value, key: &str) -> Value {
    match body.get_mut(key) {
        Some(inner) if inner.is_object() || inner.is_array() => inner.take(),
        _ => body,
    }
}

/// Vehicles from the first of `keys` holding an array, else from a bare
/// array body. Entries that are not vehicle objects are skipped.
pub(crate) fn vehicles_from(body: &Value, keys: &[&str]) -> Option<Vec<Vehicle>> {
    let list = keys
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_array))
        .or_else(|| body.as_array())?;

    Some(
        list.iter()
            .filter_map(|item| serde_json::from_value::<Vehicle>(item.clone()).ok())
            .map(Vehicle::normalized)
            .collect(),
    )
}
