use anyhow::Result;
use clap::{Args, Subcommand};
use ivss_client::{Persistence, ServiceContext};
use ivss_core::vehicle::VehicleDraft;

use super::client_failure;
use super::profile::print_vehicles;

#[derive(Args, Debug)]
pub struct VehicleArgs {
    #[arg(long)]
    pub marca: String,
    #[arg(long)]
    pub modelo: String,
    #[arg(long)]
    pub placas: String,
    #[arg(long, default_value = "")]
    pub vin: String,
}

impl VehicleArgs {
    fn draft(&self) -> VehicleDraft {
        VehicleDraft::new(
            self.marca.as_str(),
            self.modelo.as_str(),
            self.placas.as_str(),
            self.vin.as_str(),
        )
    }
}

#[derive(Subcommand, Debug)]
pub enum VehicleCommands {
    /// Add a vehicle to your profile
    Add(VehicleArgs),

    /// Register a vehicle with the engine service
    Register(VehicleArgs),

    /// List your vehicles
    #[command(alias = "ls")]
    List,
}

pub async fn run(ctx: &ServiceContext, command: VehicleCommands) -> Result<()> {
    let vehicles = ctx.vehicles();
    match command {
        VehicleCommands::Add(args) => {
            let added = vehicles
                .add_vehicle(&args.draft())
                .await
                .map_err(client_failure)?;
            match added.persistence {
                Persistence::Remote => println!("Vehicle {} added", added.vehicle.placas),
                Persistence::LocalFallback => println!(
                    "Vehicle {} saved on this device only",
                    added.vehicle.placas
                ),
            }
        }
        VehicleCommands::Register(args) => {
            let vehicle = vehicles
                .register_vehicle(&args.draft())
                .await
                .map_err(client_failure)?;
            println!("Vehicle {} registered", vehicle.placas);
        }
        VehicleCommands::List => {
            let list = vehicles.list_vehicles().await.map_err(client_failure)?;
            print_vehicles(&list);
        }
    }
    Ok(())
}
