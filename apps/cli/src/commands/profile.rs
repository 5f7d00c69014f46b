use anyhow::Result;
use ivss_client::services::ProfileSource;
use ivss_client::ServiceContext;
use ivss_core::vehicle::Vehicle;

use super::client_failure;

pub async fn show(ctx: &ServiceContext) -> Result<()> {
    let profile = ctx
        .profile()
        .load_profile()
        .await
        .map_err(client_failure)?;

    if profile.source == ProfileSource::Empty {
        println!("No profile data. Sign in or register first.");
        return Ok(());
    }

    let name = profile.display_name().unwrap_or_default();
    println!("[{}] {}", profile.initials(), name);

    if let Some(user) = &profile.user {
        if let Some(email) = user.correo.first() {
            println!("Email: {}", email);
        }
        if let Some(phone) = user.telefono.first() {
            println!("Phone: {}", phone);
        }
        let place: Vec<&str> = [user.municipio.as_deref(), user.entidad.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        if !place.is_empty() {
            println!("Location: {}", place.join(", "));
        }
    }

    if profile.source == ProfileSource::LocalRecord {
        println!("(showing data saved on this device)");
    }

    print_vehicles(&profile.vehicles);
    Ok(())
}

pub(crate) fn print_vehicles(vehicles: &[Vehicle]) {
    if vehicles.is_empty() {
        println!("No vehicles");
        return;
    }
    println!("Vehicles:");
    for vehicle in vehicles {
        match vehicle.vin.as_deref() {
            Some(vin) => println!("  {} ({}) VIN {}", vehicle.title(), vehicle.placas, vin),
            None => println!("  {} ({})", vehicle.title(), vehicle.placas),
        }
    }
}
