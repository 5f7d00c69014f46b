//! Profile screen data.

use ivss_core::user::{initials, UserProfile};
use ivss_core::vehicle::Vehicle;
use log::{debug, warn};
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::outcome::CallOutcome;
use crate::services::ServiceContext;
use crate::transport::ApiRequest;
use crate::types::{unwrap_envelope, vehicles_from};

pub(crate) const ME_PATH: &str = "/api/usuario/me";
pub(crate) const MY_VEHICLES_PATH: &str = "/api/vehiculo/mis-vehiculos";

/// Where the profile data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    UserEndpoint,
    VehicleEndpoint,
    LocalRecord,
    /// Nothing remote and no local record.
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub source: ProfileSource,
    pub user: Option<UserProfile>,
    pub vehicles: Vec<Vehicle>,
    /// Username cached at login.
    pub username: Option<String>,
}

impl Profile {
    pub fn display_name(&self) -> Option<String> {
        self.user
            .as_ref()
            .and_then(UserProfile::display_name)
            .or_else(|| self.username.clone())
    }

    /// Initials of the given name, else of the cached username.
    pub fn initials(&self) -> String {
        let given = self
            .user
            .as_ref()
            .and_then(|user| user.nombre_usuario.as_ref())
            .map(|name| name.nombre.as_str())
            .filter(|name| !name.trim().is_empty());

        match given.or(self.username.as_deref()) {
            Some(name) => initials(name),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProfileService {
    ctx: ServiceContext,
}

impl ProfileService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// User endpoint, then the vehicle endpoint, then the local record.
    ///
    /// Only a rejected token is an error: any other remote failure moves on
    /// to the next source.
    pub async fn load_profile(&self) -> Result<Profile> {
        let username = self.ctx.session().username();
        let caller = self.ctx.caller();

        match caller.call(&ApiRequest::get(ME_PATH)).await {
            CallOutcome::Success(body) => {
                return Ok(Self::from_user_body(body, username));
            }
            CallOutcome::SessionInvalid => return Err(ClientError::SessionInvalid),
            CallOutcome::Unauthenticated => {}
            other => debug!("[Profile] User endpoint unavailable: {:?}", other),
        }

        match caller.call(&ApiRequest::get(MY_VEHICLES_PATH)).await {
            CallOutcome::Success(body) => {
                return Ok(Profile {
                    source: ProfileSource::VehicleEndpoint,
                    user: None,
                    vehicles: vehicles_from(&body, &["vehiculos"]).unwrap_or_default(),
                    username,
                });
            }
            CallOutcome::SessionInvalid => return Err(ClientError::SessionInvalid),
            CallOutcome::Unauthenticated => {}
            other => debug!("[Profile] Vehicle endpoint unavailable: {:?}", other),
        }

        Ok(match self.ctx.registrations().load() {
            Some(record) => Profile {
                source: ProfileSource::LocalRecord,
                user: Some(record.to_profile()),
                vehicles: record.all_vehicles(),
                username,
            },
            None => Profile {
                source: ProfileSource::Empty,
                user: None,
                vehicles: Vec::new(),
                username,
            },
        })
    }

    fn from_user_body(body: Value, username: Option<String>) -> Profile {
        let vehicles = vehicles_from(&body, &["vehiculos", "vehiculos_usuario"]);
        let user_value = unwrap_envelope(body, "usuario");
        let vehicles = vehicles
            .or_else(|| vehicles_from(&user_value, &["vehiculos", "vehiculos_usuario"]))
            .unwrap_or_default();

        let user = match serde_json::from_value::<UserProfile>(user_value) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("[Profile] Unexpected user shape: {}", e);
                None
            }
        };

        Profile {
            source: ProfileSource::UserEndpoint,
            user,
            vehicles,
            username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackPolicy;
    use crate::services::testing::context;
    use crate::test_support::{respond, MockServer};
    use ivss_core::registration::LocalRegistration;
    use ivss_core::user::{PersonName, UserRef};

    #[tokio::test]
    async fn user_endpoint_wins() {
        let server = MockServer::start(vec![respond(
            200,
            r#"{"usuario":{"nombre_usuario":{"nombre":"Ana María","ap_pat":"López"},"usuario":"ana"},"vehiculos":[{"marca":"Kia","modelo":"Rio","placas":"jal-12"}]}"#,
        )])
        .await;
        let (ctx, _) = context(&server.base_url, Some("abc123"), FallbackPolicy::LocalCache);

        let profile = ctx.profile().load_profile().await.unwrap();

        assert_eq!(profile.source, ProfileSource::UserEndpoint);
        assert_eq!(profile.display_name().as_deref(), Some("Ana María López"));
        assert_eq!(profile.initials(), "AM");
        assert_eq!(profile.vehicles[0].placas, "JAL-12");
        assert_eq!(server.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn raw_user_body_is_accepted() {
        let server = MockServer::start(vec![respond(
            200,
            r#"{"usuario":"ana","correo":["ana@example.com"],"vehiculos_usuario":[]}"#,
        )])
        .await;
        let (ctx, _) = context(&server.base_url, Some("abc123"), FallbackPolicy::LocalCache);

        let profile = ctx.profile().load_profile().await.unwrap();

        let user = profile.user.unwrap();
        assert_eq!(user.usuario.as_deref(), Some("ana"));
        assert_eq!(user.correo, vec!["ana@example.com".to_string()]);
    }

    #[tokio::test]
    async fn falls_through_to_vehicle_endpoint() {
        let server = MockServer::start(vec![
            respond(404, r#"{"error":"Not found"}"#),
            respond(200, r#"[{"marca":"Kia","modelo":"Rio","placas":"abc"}]"#),
        ])
        .await;
        let (ctx, _) = context(&server.base_url, Some("abc123"), FallbackPolicy::LocalCache);

        let profile = ctx.profile().load_profile().await.unwrap();

        assert_eq!(profile.source, ProfileSource::VehicleEndpoint);
        assert_eq!(profile.vehicles.len(), 1);
        assert_eq!(profile.initials(), "A");
        let paths: Vec<_> = server.requests().await.into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec![ME_PATH.to_string(), MY_VEHICLES_PATH.to_string()]);
    }

    #[tokio::test]
    async fn rejected_token_is_an_error() {
        let server = MockServer::start(vec![respond(401, "")]).await;
        let (ctx, _) = context(&server.base_url, Some("abc123"), FallbackPolicy::LocalCache);

        let err = ctx.profile().load_profile().await.unwrap_err();

        assert!(err.requires_login());
        assert_eq!(ctx.session().token(), None);
        assert_eq!(server.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn without_token_uses_local_record() {
        let server = MockServer::start(vec![]).await;
        let (ctx, _) = context(&server.base_url, None, FallbackPolicy::LocalCache);
        ctx.registrations()
            .save(&LocalRegistration {
                nombre_usuario: Some(PersonName::new("Ana", "López", "")),
                usuario: Some(UserRef::Name("ana".to_string())),
                vehiculo: Some(Vehicle {
                    placas: "ABC123".to_string(),
                    ..Vehicle::default()
                }),
                vehiculos: vec![Vehicle {
                    placas: "XYZ9".to_string(),
                    ..Vehicle::default()
                }],
                ..LocalRegistration::default()
            })
            .unwrap();

        let profile = ctx.profile().load_profile().await.unwrap();

        assert_eq!(profile.source, ProfileSource::LocalRecord);
        assert_eq!(profile.display_name().as_deref(), Some("Ana López"));
        assert_eq!(profile.vehicles.len(), 2);
        assert!(server.requests().await.is_empty());
    }

    #[tokio::test]
    async fn nothing_anywhere_is_empty() {
        let (ctx, _) = context("http://localhost:3000", None, FallbackPolicy::LocalCache);

        let profile = ctx.profile().load_profile().await.unwrap();

        assert_eq!(profile.source, ProfileSource::Empty);
        assert_eq!(profile.display_name(), None);
        assert_eq!(profile.initials(), "");
    }
}
