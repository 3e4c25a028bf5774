use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use log::info;

use super::routes::routes;
use crate::error_handling::types::WebError;
use crate::session_management::flash_store::FlashStore;
use crate::silence::orchestrator::SilenceOrchestrator;

/// Web server for the HTTP API and dashboard
///
/// # Fields Overview
///
/// - `orchestrator`: scheduling engine every silence route calls into
/// - `flashes`: one-shot messages shown on the dashboard after a form submission
pub struct WebServer {
    orchestrator: SilenceOrchestrator,
    flashes: Arc<FlashStore>,
}

impl WebServer {
    pub fn new(orchestrator: SilenceOrchestrator, flashes: Arc<FlashStore>) -> Self {
        Self {
            orchestrator,
            flashes,
        }
    }

    /// Resolves the listen address from the configured bind address and port.
    pub fn listen_address(bind_address: &str, port: u16) -> Result<SocketAddr, WebError> {
        let ip: IpAddr = bind_address
            .parse()
            .map_err(|e| WebError::BindFailed(format!("{}: {}", bind_address, e)))?;
        Ok(SocketAddr::new(ip, port))
    }

    /// Serves every route until the process stops.
    pub async fn start(&self, bind_address: &str, port: u16) -> Result<(), WebError> {
        let addr = Self::listen_address(bind_address, port)?;
        let routes = routes(self.orchestrator.clone(), self.flashes.clone());

        info!("Web interface listening on http://{}", addr);
        warp::serve(routes).run(addr).await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_address() {
        let addr = WebServer::listen_address("127.0.0.1", 8080).unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8080");

        let addr = WebServer::listen_address("::", 9000).unwrap();
        assert_eq!(addr.port(), 9000);

        assert!(matches!(
            WebServer::listen_address("localhost", 8080),
            Err(WebError::BindFailed(_))
        ));
    }
}
