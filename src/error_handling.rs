//! Error types shared across the scheduler, its backend client and the web layer.

pub mod types;

pub use types::*;
