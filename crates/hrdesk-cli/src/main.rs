mod account;
mod app;
mod attendance;
mod leave;
mod provider;
mod requests;
mod session_file;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::attendance::{CheckCommands, DeviceCommands};
use crate::leave::LeaveCommands;
use crate::requests::RequestCommands;

#[derive(Debug, Parser)]
#[command(name = "hrdesk")]
#[command(about = "HR self-service: attendance, leave and approvals")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and make sure this device is registered
    Login {
        /// Employee number
        #[arg(long)]
        user: String,
        #[arg(long, env = "HRDESK_PASSWORD", hide_env_values = true)]
        password: String,
        /// Push notification token to register alongside the device
        #[arg(long, default_value = "")]
        push_token: String,
    },
    /// Forget the stored session
    Logout {
        /// Also release this user's device binding on the server
        #[arg(long)]
        release_device: bool,
    },
    /// List offices available for check-in
    Offices,
    /// Check in or out at an office
    Check {
        #[command(subcommand)]
        command: CheckCommands,
    },
    /// Inspect or renew this device's registration
    Device {
        #[command(subcommand)]
        command: DeviceCommands,
    },
    /// Leave types, requests and history
    Leave {
        #[command(subcommand)]
        command: LeaveCommands,
    },
    /// Approval queue and HR request listing
    Requests {
        #[command(subcommand)]
        command: RequestCommands,
    },
    /// Print the server's current date and time
    ServerTime,
    /// Check that the HR service answers
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = hrdesk_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let app = app::App::new(config)?;

    match cli.command {
        Commands::Login {
            user,
            password,
            push_token,
        } => account::run_login(&app, &user, &password, &push_token).await,
        Commands::Logout { release_device } => account::run_logout(&app, release_device).await,
        Commands::Offices => attendance::run_offices(&app).await,
        Commands::Check { command } => match command {
            CheckCommands::In(args) => {
                attendance::run_check(&app, hrdesk_core::Direction::In, &args).await
            }
            CheckCommands::Out(args) => {
                attendance::run_check(&app, hrdesk_core::Direction::Out, &args).await
            }
        },
        Commands::Device { command } => match command {
            DeviceCommands::Verify => attendance::run_device_verify(&app).await,
            DeviceCommands::Register { push_token } => {
                attendance::run_device_register(&app, &push_token).await
            }
        },
        Commands::Leave { command } => leave::run(&app, command).await,
        Commands::Requests { command } => requests::run(&app, command).await,
        Commands::ServerTime => account::run_server_time(&app).await,
        Commands::Ping => account::run_ping(&app).await,
    }
}
