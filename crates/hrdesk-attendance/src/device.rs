//! One registered device per user.
//!
//! The server keeps a single device id per user. A local id that no longer
//! matches means another device took over and this one must sign out.

use std::future::Future;

use hrdesk_core::Session;
use hrdesk_rpc::{RpcError, TokenRegistration};
use uuid::Uuid;

use crate::error::DeviceError;
use crate::session::SessionStore;

pub trait DeviceBackend: Sync {
    /// The device id on file for `user_id`; empty when none.
    fn server_device_id(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<String, RpcError>> + Send;

    fn claim_device(
        &self,
        user_id: &str,
        push_token: &str,
        device_id: &str,
    ) -> impl Future<Output = Result<TokenRegistration, RpcError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceStatus {
    /// This device holds the registration.
    Registered(String),
    /// No registration on either side; call [`register_device`].
    NeedsRegistration,
    /// Another device holds the registration. The session has been cleared.
    Revoked,
}

/// Compares the locally stored device id with the server's.
///
/// # Errors
///
/// Returns [`DeviceError`] if the server cannot be reached or the store
/// cannot be updated.
pub async fn verify_device<B, S>(
    backend: &B,
    store: &S,
    session: &Session,
) -> Result<DeviceStatus, DeviceError>
where
    B: DeviceBackend,
    S: SessionStore,
{
    let Some(local) = session.device_id.as_deref() else {
        return Ok(DeviceStatus::NeedsRegistration);
    };

    let server = backend.server_device_id(&session.user_id).await?;
    let server = server.trim();

    if server == local {
        return Ok(DeviceStatus::Registered(local.to_string()));
    }
    if server.is_empty() {
        tracing::info!(user = %session.user_id, "server has no device on file; dropping local id");
        let mut updated = session.clone();
        updated.device_id = None;
        store.save(&updated)?;
        return Ok(DeviceStatus::NeedsRegistration);
    }

    tracing::warn!(user = %session.user_id, "device registration held elsewhere; signing out");
    store.clear()?;
    Ok(DeviceStatus::Revoked)
}

/// Claims the registration for this device under a fresh id.
///
/// # Errors
///
/// Returns [`DeviceError::Rejected`] for any server answer other than `ok`
/// or `exists`, and [`DeviceError::Rpc`] / [`DeviceError::Store`] on
/// transport or storage failure.
pub async fn register_device<B, S>(
    backend: &B,
    store: &S,
    session: &Session,
    push_token: &str,
) -> Result<DeviceStatus, DeviceError>
where
    B: DeviceBackend,
    S: SessionStore,
{
    let device_id = Uuid::new_v4().to_string();

    match backend
        .claim_device(&session.user_id, push_token, &device_id)
        .await?
    {
        TokenRegistration::Registered => {
            let mut updated = session.clone();
            updated.device_id = Some(device_id.clone());
            store.save(&updated)?;
            tracing::info!(user = %session.user_id, device = %device_id, "device registered");
            Ok(DeviceStatus::Registered(device_id))
        }
        TokenRegistration::AlreadyClaimed => {
            tracing::warn!(user = %session.user_id, "another device is already registered");
            store.clear()?;
            Ok(DeviceStatus::Revoked)
        }
        TokenRegistration::Other(reply) => Err(DeviceError::Rejected(reply)),
    }
}
