use hrdesk_attendance::SessionStore;
use hrdesk_core::{AppConfig, OfficeLocation, Session};
use hrdesk_rpc::HrClient;

use crate::session_file::FileSessionStore;

/// Everything a command handler needs.
pub(crate) struct App {
    pub config: AppConfig,
    pub client: HrClient,
    pub store: FileSessionStore,
}

impl App {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let client = HrClient::new(&config.server_url, config.http_timeout_secs)?;
        let store = FileSessionStore::new(config.session_path.clone());
        Ok(Self {
            config,
            client,
            store,
        })
    }

    pub fn require_session(&self) -> anyhow::Result<Session> {
        self.store
            .load()?
            .ok_or_else(|| anyhow::anyhow!("not signed in; run `hrdesk login` first"))
    }

    /// Offices from the server, or from the configured YAML file when the
    /// server cannot be reached.
    pub async fn offices(&self, user: &str) -> anyhow::Result<Vec<OfficeLocation>> {
        match self.client.get_locations(user).await {
            Ok(offices) => Ok(offices),
            Err(err) => {
                let Some(path) = self.config.offices_path.as_deref() else {
                    return Err(err.into());
                };
                tracing::warn!(error = %err, path = %path.display(), "using local office list");
                Ok(hrdesk_core::load_offices(path)?.offices)
            }
        }
    }
}
