use hrdesk_attendance::{register_device, verify_device, DeviceStatus, SessionStore};
use hrdesk_core::Session;

use crate::app::App;

/// Signs in, stores the session and settles the device registration.
///
/// A device id already stored for the same user is kept so the server can
/// confirm it; otherwise a fresh one is registered.
///
/// # Errors
///
/// Returns an error on bad credentials, when another device holds the
/// registration, or on any transport or storage failure.
pub(crate) async fn run_login(
    app: &App,
    user: &str,
    password: &str,
    push_token: &str,
) -> anyhow::Result<()> {
    let outcome = app
        .client
        .check_login(user, password, &app.config.app_version)
        .await?;
    if !outcome.authenticated {
        anyhow::bail!("invalid employee number or password");
    }

    let previous = app.store.load()?.filter(|s| s.user_id == user);
    let session = Session {
        user_id: user.to_string(),
        device_id: previous.and_then(|s| s.device_id),
        is_hr: outcome.is_hr,
    };
    app.store.save(&session)?;
    tracing::info!(user, is_hr = session.is_hr, "signed in");

    let status = match verify_device(&app.client, &app.store, &session).await? {
        DeviceStatus::NeedsRegistration => {
            let current = app.require_session()?;
            register_device(&app.client, &app.store, &current, push_token).await?
        }
        other => other,
    };

    match status {
        DeviceStatus::Registered(device_id) => {
            println!("signed in as {user} (device {device_id})");
            if session.is_hr {
                println!("HR tools enabled");
            }
            Ok(())
        }
        DeviceStatus::Revoked | DeviceStatus::NeedsRegistration => anyhow::bail!(
            "this account is registered on another device; ask HR to release it"
        ),
    }
}

pub(crate) async fn run_logout(app: &App, release_device: bool) -> anyhow::Result<()> {
    let Some(session) = app.store.load()? else {
        println!("not signed in");
        return Ok(());
    };
    if release_device {
        app.client.clear_user_device_id(&session.user_id).await?;
    }
    app.store.clear()?;
    println!("signed out {}", session.user_id);
    Ok(())
}

pub(crate) async fn run_server_time(app: &App) -> anyhow::Result<()> {
    let now = app.client.get_server_time().await?;
    println!("{} {}", now.date, now.time);
    Ok(())
}

pub(crate) async fn run_ping(app: &App) -> anyhow::Result<()> {
    app.client.ping().await?;
    println!("ok: {}", app.config.server_url);
    Ok(())
}
