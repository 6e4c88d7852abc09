use std::sync::Arc;

use crate::filters::FilterState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Fetching,
    Settled,
    Error,
}

/// What a panel currently has to show.
#[derive(Debug)]
pub struct Snapshot<T> {
    pub phase: Phase,
    /// Last successfully applied response; kept across errors.
    pub data: Option<Arc<T>>,
    /// Parameters that produced `data`.
    pub params: Option<FilterState>,
    /// Message of the most recent failure, cleared by the next success.
    pub error: Option<String>,
    /// A debounce timer is armed.
    pub pending: bool,
    /// Sequence number of the last issued request.
    pub issued: u64,
    /// Sequence number whose response is in `data`.
    pub applied: u64,
}

impl<T> Snapshot<T> {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Fetching
    }

    /// Nothing armed and nothing in flight.
    pub fn is_quiescent(&self) -> bool {
        !self.pending && self.phase != Phase::Fetching
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            data: None,
            params: None,
            error: None,
            pending: false,
            issued: 0,
            applied: 0,
        }
    }
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            phase: self.phase,
            data: self.data.clone(),
            params: self.params.clone(),
            error: self.error.clone(),
            pending: self.pending,
            issued: self.issued,
            applied: self.applied,
        }
    }
}
