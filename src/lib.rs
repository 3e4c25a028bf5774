pub mod alerting;
pub mod configuration;
pub mod controller;
pub mod error_handling;
pub mod session_management;
pub mod silence;
pub mod web_interface;

pub use controller::Controller;
