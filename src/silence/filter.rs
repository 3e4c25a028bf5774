//! Helpers for trimming silence listings.

use crate::alerting::types::Silence;

/// Drops silences in the "expired" state, keeping the others in order.
pub fn filter_expired(silences: Vec<Silence>) -> Vec<Silence> {
    silences.into_iter().filter(|s| !s.is_expired()).collect()
}
