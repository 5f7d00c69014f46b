//! `login`, `logout`, `register` and `status`.

use anyhow::{bail, Result};
use clap::Args;
use ivss_client::{Persistence, ServiceContext};
use ivss_core::registration::RegistrationForm;
use ivss_core::vehicle::VehicleDraft;

use super::{client_failure, prompt_line};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Username or email (defaults to the locally registered one)
    pub username: Option<String>,

    /// Password (prompted for when omitted)
    #[arg(long, env = "IVSS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub nombre: String,
    #[arg(long)]
    pub ap_pat: String,
    #[arg(long, default_value = "")]
    pub ap_mat: String,
    #[arg(long)]
    pub correo: String,
    #[arg(long, default_value = "")]
    pub telefono: String,
    /// Defaults to the part of the email before `@`
    #[arg(long, default_value = "")]
    pub usuario: String,
    /// A random password is generated when omitted
    #[arg(long, default_value = "")]
    pub contrasena: String,
    #[arg(long, default_value = "")]
    pub entidad: String,
    #[arg(long, default_value = "")]
    pub municipio: String,

    /// Also register a vehicle (requires --marca, --modelo and --placas)
    #[arg(long)]
    pub with_vehicle: bool,
    #[arg(long, default_value = "")]
    pub marca: String,
    #[arg(long, default_value = "")]
    pub modelo: String,
    #[arg(long, default_value = "")]
    pub placas: String,
    #[arg(long, default_value = "")]
    pub vin: String,
}

impl From<RegisterArgs> for RegistrationForm {
    fn from(args: RegisterArgs) -> Self {
        let vehiculo = args
            .with_vehicle
            .then(|| VehicleDraft::new(args.marca, args.modelo, args.placas, args.vin));

        RegistrationForm {
            nombre: args.nombre,
            ap_pat: args.ap_pat,
            ap_mat: args.ap_mat,
            correo: args.correo,
            telefono: args.telefono,
            usuario: args.usuario,
            contrasena: args.contrasena,
            entidad: args.entidad,
            municipio: args.municipio,
            vehiculo,
        }
    }
}

pub async fn login(ctx: &ServiceContext, args: LoginArgs) -> Result<()> {
    let username = match args.username {
        Some(username) => username,
        None => match ctx.registrations().login_prefill() {
            Some(prefill) => {
                println!("Signing in as {}", prefill);
                prefill
            }
            None => bail!("No username given and no local registration to take it from"),
        },
    };

    let password = match args.password {
        Some(password) => password,
        None => prompt_line("Password: ")?.unwrap_or_default(),
    };

    let state = ctx
        .auth()
        .login(&username, &password)
        .await
        .map_err(client_failure)?;

    println!(
        "Signed in as {}",
        state.username.as_deref().unwrap_or(username.as_str())
    );
    Ok(())
}

pub fn logout(ctx: &ServiceContext) -> Result<()> {
    ctx.auth().logout().map_err(client_failure)?;
    println!("Signed out");
    Ok(())
}

pub async fn register(ctx: &ServiceContext, args: RegisterArgs) -> Result<()> {
    let generated_password = args.contrasena.is_empty();
    let outcome = ctx
        .auth()
        .register(args.into())
        .await
        .map_err(client_failure)?;

    match outcome.persistence {
        Persistence::Remote => println!("Account created"),
        Persistence::LocalFallback => {
            println!("Server unavailable: registration saved on this device only")
        }
    }
    if let Some(prefill) = &outcome.login_prefill {
        println!("Username: {}", prefill);
    }
    if generated_password {
        if let Some(password) = &outcome.record.contrasena {
            println!("Generated password: {}", password);
        }
    }
    Ok(())
}

pub fn status(ctx: &ServiceContext) -> Result<()> {
    let state = ctx.session().load();
    match (&state.username, state.is_authenticated()) {
        (Some(username), true) => println!("Signed in as {}", username),
        (Some(username), false) => println!("Session expired for {}", username),
        (None, true) => println!("Signed in"),
        (None, false) => println!("Not signed in"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: RegisterArgs,
    }

    #[test]
    fn vehicle_is_only_included_when_requested() {
        let harness = Harness::parse_from([
            "ivss", "--nombre", "Ana", "--ap-pat", "López", "--correo", "ana@example.com",
            "--placas", "abc123",
        ]);
        let form = RegistrationForm::from(harness.args);
        assert_eq!(form.vehiculo, None);

        let harness = Harness::parse_from([
            "ivss", "--nombre", "Ana", "--ap-pat", "López", "--correo", "ana@example.com",
            "--with-vehicle", "--marca", "Nissan", "--modelo", "Versa", "--placas", "abc123",
        ]);
        let form = RegistrationForm::from(harness.args);
        assert_eq!(
            form.vehiculo,
            Some(VehicleDraft::new("Nissan", "Versa", "abc123", ""))
        );
        assert_eq!(form.ap_mat, "");
    }
}
