use crate::config::Config;

/// Read-only state shared by every request.
pub struct AppState {
    pub config: Config,
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            // Transport defaults only, no timeout override.
            client: reqwest::Client::new(),
        }
    }
}
