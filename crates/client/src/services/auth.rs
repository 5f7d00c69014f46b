//! Login, registration and logout.

use ivss_core::registration::{LocalRegistration, RegistrationForm};
use ivss_core::validation::require_fields;
use ivss_core::{ClearScope, SessionField, SessionState};
use log::{info, warn};

use crate::error::Result;
use crate::outcome::CallOutcome;
use crate::services::ServiceContext;
use crate::transport::ApiRequest;
use crate::types::{LoginRequest, LoginResponse, Persistence, RegisterResponse};

const LOGIN_PATH: &str = "/api/auth/login";
const REGISTER_PATH: &str = "/api/auth/register";

/// Result of a registration attempt that did not fail outright.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationOutcome {
    pub record: LocalRegistration,
    pub persistence: Persistence,
    /// Name to pre-fill the login form with.
    pub login_prefill: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthService {
    ctx: ServiceContext,
}

impl AuthService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Sign in and cache the returned token and username.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionState> {
        let username = username.trim();
        require_fields(&[("usuario", username), ("contrasena", password)])?;

        let request = ApiRequest::post(LOGIN_PATH)
            .public()
            .failure_message("Invalid username or password")
            .json(&LoginRequest {
                usuario: username,
                contrasena: password,
            })?;
        let body = self.ctx.caller().call(&request).await.into_result()?;
        let response = LoginResponse::from_body(body);

        let session = self.ctx.session();
        match response.token() {
            Some(token) => session.save(SessionField::Token, token)?,
            None => warn!("[Auth] Login response carried no token"),
        }

        let name = response
            .login_name()
            .unwrap_or_else(|| username.to_string());
        session.save(SessionField::Username, &name)?;
        info!("[Auth] Signed in as {}", name);

        Ok(session.load())
    }

    /// Create the account remotely and keep a local copy of the record.
    ///
    /// When the backend is unreachable and the fallback policy allows it, the
    /// record is stored locally only.
    pub async fn register(&self, form: RegistrationForm) -> Result<RegistrationOutcome> {
        let mut record = form.into_registration()?;

        let request = ApiRequest::post(REGISTER_PATH)
            .public()
            .failure_message("Registration failed")
            .json(&record)?;

        let persistence = match self.ctx.caller().call(&request).await {
            CallOutcome::NetworkError(message) if self.ctx.fallback().allows_local_cache() => {
                warn!(
                    "[Auth] Backend unreachable ({}), keeping registration locally",
                    message
                );
                Persistence::LocalFallback
            }
            outcome => {
                let response = RegisterResponse::from_body(outcome.into_result()?);
                if let Some(vehicle) = response.vehicle() {
                    record.vehiculo = Some(vehicle);
                }
                info!(
                    "[Auth] Registered {}",
                    response.login_name().as_deref().unwrap_or("new user")
                );
                Persistence::Remote
            }
        };

        self.ctx.registrations().save(&record)?;

        Ok(RegistrationOutcome {
            login_prefill: record.login_prefill(),
            record,
            persistence,
        })
    }

    /// Forget the cached token and username. The local registration record
    /// is kept.
    pub fn logout(&self) -> Result<()> {
        self.ctx.session().clear(ClearScope::All)?;
        info!("[Auth] Signed out");
        Ok(())
    }
}
