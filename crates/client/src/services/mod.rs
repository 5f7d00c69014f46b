//! Screen-level operations built on the remote call wrapper.

use std::sync::Arc;

use ivss_core::registration::LocalRegistrationStore;
use ivss_core::storage::KeyValueStore;
use ivss_core::SessionStore;

use crate::client::IvssClient;
use crate::config::{ClientConfig, FallbackPolicy};
use crate::error::Result;
use crate::transport::HttpTransport;
use crate::wrapper::RemoteCaller;

pub mod arco;
pub mod auth;
pub mod profile;
pub mod vehicles;

pub use arco::ArcoService;
pub use auth::{AuthService, RegistrationOutcome};
pub use profile::{Profile, ProfileService, ProfileSource};
pub use vehicles::{AddedVehicle, VehicleService};

/// Shared dependencies of the services: one caller, the local registration
/// record, and the offline fallback policy.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    caller: RemoteCaller,
    registrations: LocalRegistrationStore,
    fallback: FallbackPolicy,
}

impl ServiceContext {
    /// reqwest transport configured from `config`, persisting into `store`.
    pub fn new(config: &ClientConfig, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let client = IvssClient::new(config)?;
        Ok(Self::with_transport(Arc::new(client), store, config.fallback))
    }

    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn KeyValueStore>,
        fallback: FallbackPolicy,
    ) -> Self {
        Self {
            caller: RemoteCaller::new(transport, SessionStore::new(Arc::clone(&store))),
            registrations: LocalRegistrationStore::new(store),
            fallback,
        }
    }

    pub fn caller(&self) -> &RemoteCaller {
        &self.caller
    }

    pub fn session(&self) -> &SessionStore {
        self.caller.session()
    }

    pub fn registrations(&self) -> &LocalRegistrationStore {
        &self.registrations
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.clone())
    }

    pub fn profile(&self) -> ProfileService {
        ProfileService::new(self.clone())
    }

    pub fn vehicles(&self) -> VehicleService {
        VehicleService::new(self.clone())
    }

    pub fn arco(&self) -> ArcoService {
        ArcoService::new(self.clone())
    }
}
