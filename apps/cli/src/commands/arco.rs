use anyhow::Result;
use clap::{Args, Subcommand};
use ivss_client::ServiceContext;
use ivss_core::arco::ArcoRequestForm;

use super::client_failure;

#[derive(Args, Debug)]
pub struct SubmitArgs {
    #[arg(long)]
    pub nombre: String,
    #[arg(long, default_value = "")]
    pub ap_pat: String,
    #[arg(long, default_value = "")]
    pub ap_mat: String,
    #[arg(long, default_value = "")]
    pub telefono: String,
    #[arg(long, default_value = "")]
    pub correo: String,
    /// Acceso, Rectificación, Cancelación or Oposición
    #[arg(long, default_value = "")]
    pub tipo: String,
    #[arg(long, default_value = "")]
    pub complemento: String,
}

impl From<SubmitArgs> for ArcoRequestForm {
    fn from(args: SubmitArgs) -> Self {
        ArcoRequestForm {
            nombre: args.nombre,
            ap_pat: args.ap_pat,
            ap_mat: args.ap_mat,
            telefono: args.telefono,
            correo: args.correo,
            tipo: args.tipo,
            complemento: args.complemento,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ArcoCommands {
    /// List submitted requests
    #[command(alias = "ls")]
    List {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Submit a new request
    Submit(SubmitArgs),
}

pub async fn run(ctx: &ServiceContext, command: ArcoCommands) -> Result<()> {
    let arco = ctx.arco();
    match command {
        ArcoCommands::List { json } => {
            let records = arco.list_requests().await.map_err(client_failure)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("No requests");
            } else {
                for record in &records {
                    println!("{}", record.summary());
                }
            }
        }
        ArcoCommands::Submit(args) => {
            let message = arco
                .submit_request(args.into())
                .await
                .map_err(client_failure)?;
            println!("{}", message);
        }
    }
    Ok(())
}
