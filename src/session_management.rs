//! Session management for the web interface.
//!
//! Sessions only exist to carry one-shot flash messages from a form
//! submission to the page the browser is redirected to.

use serde::{Deserialize, Serialize};

/// Submodule for the in-memory flash message store.
pub mod flash_store;

pub use flash_store::{FlashStore, SESSION_COOKIE};

/// Severity of a flash message, named after the dashboard's alert styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashStatus {
    Success,
    Danger,
}

impl FlashStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashStatus::Success => "success",
            FlashStatus::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub status: FlashStatus,
    pub message: String,
}
