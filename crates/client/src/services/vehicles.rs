//! Vehicle add, register and list operations.

use ivss_core::vehicle::{Vehicle, VehicleDraft};
use log::{info, warn};
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::outcome::CallOutcome;
use crate::services::profile::MY_VEHICLES_PATH;
use crate::services::ServiceContext;
use crate::transport::ApiRequest;
use crate::types::{unwrap_envelope, vehicles_from, Persistence};

const ADD_VEHICLE_PATH: &str = "/api/vehiculo";
const REGISTER_VEHICLE_PATH: &str = "/api/vehiculos/agregar";

#[derive(Debug, Clone, PartialEq)]
pub struct AddedVehicle {
    pub vehicle: Vehicle,
    pub persistence: Persistence,
}

#[derive(Debug, Clone)]
pub struct VehicleService {
    ctx: ServiceContext,
}

impl VehicleService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add a vehicle to the signed-in user's profile.
    ///
    /// Without a token, or when the backend is unreachable, the fallback
    /// policy decides between appending to the local record and failing.
    pub async fn add_vehicle(&self, draft: &VehicleDraft) -> Result<AddedVehicle> {
        let vehicle = draft.validate()?;
        let request = ApiRequest::post(ADD_VEHICLE_PATH)
            .failure_message("Could not add the vehicle")
            .json(&vehicle)?;

        match self.ctx.caller().call(&request).await {
            CallOutcome::Success(body) => Ok(AddedVehicle {
                vehicle: created_vehicle(body, &vehicle),
                persistence: Persistence::Remote,
            }),
            CallOutcome::Unauthenticated | CallOutcome::NetworkError(_)
                if self.ctx.fallback().allows_local_cache() =>
            {
                self.ctx.registrations().append_vehicle(vehicle.clone())?;
                info!("[Vehicles] Added {} to the local record", vehicle.placas);
                Ok(AddedVehicle {
                    vehicle,
                    persistence: Persistence::LocalFallback,
                })
            }
            outcome => Err(into_error(outcome)),
        }
    }

    /// Register a vehicle with its engine marked as running. Needs a session
    /// and never falls back.
    pub async fn register_vehicle(&self, draft: &VehicleDraft) -> Result<Vehicle> {
        let vehicle = Vehicle {
            estado_motor: Some(true),
            ..draft.validate()?
        };
        let request = ApiRequest::post(REGISTER_VEHICLE_PATH)
            .failure_message("Could not register the vehicle")
            .json(&vehicle)?;

        let body = self.ctx.caller().call(&request).await.into_result()?;
        Ok(created_vehicle(body, &vehicle))
    }

    pub async fn list_vehicles(&self) -> Result<Vec<Vehicle>> {
        let request =
            ApiRequest::get(MY_VEHICLES_PATH).failure_message("Could not load vehicles");
        let body = self.ctx.caller().call(&request).await.into_result()?;

        vehicles_from(&body, &["vehiculos"])
            .ok_or_else(|| ClientError::failure("Could not load vehicles"))
    }
}

/// The vehicle echoed by the backend, else what was sent.
fn created_vehicle(body: Value, sent: &Vehicle) -> Vehicle {
    match serde_json::from_value::<Vehicle>(unwrap_envelope(body, "vehiculo")) {
        Ok(created) if !created.placas.is_empty() => created.normalized(),
        _ => {
            warn!("[Vehicles] Backend did not echo the vehicle, keeping the submitted one");
            sent.clone()
        }
    }
}

fn into_error(outcome: CallOutcome<Value>) -> ClientError {
    match outcome.into_result() {
        Ok(_) => ClientError::failure("Unexpected response"),
        Err(e) => e,
    }
}
