//! Check-in/out, office listing and device commands.

use clap::{Args, Subcommand};
use hrdesk_attendance::{
    register_device, verify_device, ActionContext, ActionOutcome, AttendanceAction, DeviceStatus,
    LocationProbe, Outcome, ProbePolicy,
};
use hrdesk_core::{Direction, GeoCoordinate, LocationSample};

use crate::app::App;
use crate::provider::FixedLocationProvider;

#[derive(Debug, Subcommand)]
pub enum CheckCommands {
    /// Record arrival
    In(CheckArgs),
    /// Record departure
    Out(CheckArgs),
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Office id as listed by `hrdesk offices`
    #[arg(long)]
    pub office: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
    /// Reported fix accuracy in meters
    #[arg(long)]
    pub accuracy: Option<f64>,
    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum DeviceCommands {
    /// Compare this device's id with the server's record
    Verify,
    /// Register this device under a fresh id
    Register {
        #[arg(long, default_value = "")]
        push_token: String,
    },
}

pub(crate) async fn run_offices(app: &App) -> anyhow::Result<()> {
    let session = app.require_session()?;
    let offices = app.offices(&session.user_id).await?;

    if offices.is_empty() {
        println!("no offices configured for {}", session.user_id);
        return Ok(());
    }

    println!("{:<10}{:<28}{:<26}RADIUS", "ID", "NAME", "LOCATION");
    for office in &offices {
        println!(
            "{:<10}{:<28}{:<26}{} m",
            office.id,
            office.name,
            office.coordinate.to_wire(),
            office.allowed_radius_m
        );
    }
    Ok(())
}

/// Runs one check-in or check-out with the position from `args`.
///
/// # Errors
///
/// Returns an error carrying the user-facing message when the action fails.
pub(crate) async fn run_check(
    app: &App,
    direction: Direction,
    args: &CheckArgs,
) -> anyhow::Result<()> {
    let session = app.require_session()?;
    let coordinate = GeoCoordinate::new(args.lat, args.lon)?;

    let office = match args.office.as_deref() {
        Some(id) => {
            let offices = app.offices(&session.user_id).await?;
            let found = offices.into_iter().find(|o| o.id == id);
            if found.is_none() {
                anyhow::bail!("office '{id}' not found; run `hrdesk offices` to list them");
            }
            found
        }
        None => None,
    };

    let provider = FixedLocationProvider::new(LocationSample::new(coordinate, args.accuracy));
    let probe = LocationProbe::new(provider, ProbePolicy::from(&app.config));
    let ctx = ActionContext {
        user_id: session.user_id.clone(),
        device_id: session.device_id.clone(),
        now: chrono::Local::now().naive_local(),
    };

    let result = AttendanceAction::new(&probe, &app.client, &app.store)
        .run(&ctx, office.as_ref(), direction)
        .await;
    let outcome = ActionOutcome::from_result(direction, &result);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }
    match outcome.outcome {
        Outcome::Succeeded => {
            if !args.json {
                println!("{}", outcome.message);
            }
            Ok(())
        }
        Outcome::Failed => Err(anyhow::anyhow!(outcome.message)),
    }
}

pub(crate) async fn run_device_verify(app: &App) -> anyhow::Result<()> {
    let session = app.require_session()?;
    match verify_device(&app.client, &app.store, &session).await? {
        DeviceStatus::Registered(id) => println!("registered: {id}"),
        DeviceStatus::NeedsRegistration => {
            println!("not registered; run `hrdesk device register`");
        }
        DeviceStatus::Revoked => {
            anyhow::bail!("registration is held by another device; you have been signed out")
        }
    }
    Ok(())
}

pub(crate) async fn run_device_register(app: &App, push_token: &str) -> anyhow::Result<()> {
    let session = app.require_session()?;
    match register_device(&app.client, &app.store, &session, push_token).await? {
        DeviceStatus::Registered(id) => {
            println!("registered: {id}");
            Ok(())
        }
        DeviceStatus::Revoked | DeviceStatus::NeedsRegistration => {
            anyhow::bail!("another device is already registered; you have been signed out")
        }
    }
}
