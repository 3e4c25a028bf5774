//! Recurring silence scheduling.
//!
//! A [`SilenceRequest`] carries the silence definition and a schedule. The
//! request is validated, its schedule expanded into windows, and one silence
//! is created per window through the injected backend.
//!
//! ```ignore
//! use std::sync::Arc;
//! use silence_scheduler::silence::SilenceOrchestrator;
//!
//! let orchestrator = SilenceOrchestrator::new(Arc::new(client));
//! let result = orchestrator.run(&request).await?;
//! println!("{}", result.summary()); // "5/5 new silences created"
//! ```

pub mod filter;
pub mod orchestrator;
#[cfg(test)]
mod tests;
pub mod types;
pub mod validator;
pub mod window;

pub use filter::filter_expired;
pub use orchestrator::SilenceOrchestrator;
pub use types::{
    Matcher, OrchestrationResult, Repeat, Schedule, SilenceRequest, SilenceWindow, WindowOutcome,
};
pub use validator::validate;
pub use window::{add_duration, expand};
