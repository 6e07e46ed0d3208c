use hrdesk_attendance::{LocationProvider, PermissionStatus, ProviderError};
use hrdesk_core::LocationSample;

/// Answers every fix request with a position given on the command line.
pub(crate) struct FixedLocationProvider {
    sample: LocationSample,
}

impl FixedLocationProvider {
    pub fn new(sample: LocationSample) -> Self {
        Self { sample }
    }
}

impl LocationProvider for FixedLocationProvider {
    async fn request_permission(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn current_position(&self) -> Result<LocationSample, ProviderError> {
        Ok(self.sample)
    }
}
