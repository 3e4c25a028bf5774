use std::sync::Arc;

use log::{info, warn};

use crate::alerting::alertmanager_client::AlertmanagerClient;
use crate::configuration::config::Config;
use crate::error_handling::types::*;
use crate::session_management::flash_store::FlashStore;
use crate::silence::orchestrator::SilenceOrchestrator;
use crate::web_interface::web_server::WebServer;

/// Owns every long-lived component of the service.
///
/// # Fields Overview
///
/// - `config`: validated configuration the components were built from
/// - `web_server`: HTTP API and dashboard, holding the orchestrator and flash store
pub struct Controller {
    pub config: Config,
    web_server: WebServer,
}

impl Controller {
    /// Wires the Alertmanager client into the orchestrator and the web server.
    pub fn new(config: Config) -> Result<Self, ControllerError> {
        let client = AlertmanagerClient::new(&config.alertmanager_api, &config.client)?;
        info!("Alertmanager API: {}", config.alertmanager_api);

        let orchestrator = SilenceOrchestrator::new(Arc::new(client));
        let flashes = Arc::new(FlashStore::new());
        let web_server = WebServer::new(orchestrator, flashes);

        Ok(Self { config, web_server })
    }

    /// Serves until the web server stops or Ctrl-C is received.
    pub async fn run(&mut self) -> Result<(), ControllerError> {
        let web = &self.config.web;
        tokio::select! {
            result = self.web_server.start(&web.bind_address, web.port) => {
                result?;
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!("Unable to listen for shutdown signal: {}", e);
                }
                self.shutdown();
            }
        }
        Ok(())
    }

    pub fn shutdown(&self) {
        info!("Shutting down silence scheduler");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api: &str) -> Config {
        Config::parse(&format!("alertmanager_api = \"{}\"", api)).unwrap()
    }

    #[test]
    fn test_new_with_valid_config() {
        let controller = Controller::new(config("http://localhost:9093/api/v2")).unwrap();
        assert_eq!(controller.config.web.port, 8080);
    }

    #[test]
    fn test_new_rejects_bad_api_url() {
        assert!(matches!(
            Controller::new(config("not a url")),
            Err(ControllerError::BackendError(BackendError::InvalidUrl(_)))
        ));
    }

    #[tokio::test]
    async fn test_run_fails_on_bad_bind_address() {
        let mut cfg = config("http://localhost:9093/api/v2");
        cfg.web.bind_address = "nowhere".to_string();
        let mut controller = Controller::new(cfg).unwrap();

        assert!(matches!(
            controller.run().await,
            Err(ControllerError::WebError(WebError::BindFailed(_)))
        ));
    }
}
