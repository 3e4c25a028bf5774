// Web Interface module root
pub mod assets;
pub mod form;
pub mod routes;
pub mod types;
pub mod web_server;

pub use routes::routes;
pub use web_server::WebServer;
