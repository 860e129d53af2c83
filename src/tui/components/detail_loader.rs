//! Lazy detail fetch for a single card
//!
//! The loader never talks to the network itself. `request()` decides whether
//! a fetch is needed and the app spawns it; the result comes back through
//! `complete()`. The loaded detail lives as long as the loader (one card
//! instance) and is never shared across instances.

use crate::api::{BlogDetail, FetchError};

#[derive(Debug, Clone, Default)]
pub enum DetailState {
    /// Nothing requested yet
    #[default]
    Idle,
    Pending,
    Loaded(Box<BlogDetail>),
    /// Last fetch failed; shown until the next request
    Failed(FetchError),
}

#[derive(Debug)]
pub struct DetailLoader {
    post_id: String,
    state: DetailState,
}

impl DetailLoader {
    pub fn new(post_id: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            state: DetailState::Idle,
        }
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn detail(&self) -> Option<&BlogDetail> {
        match &self.state {
            DetailState::Loaded(detail) => Some(detail),
            _ => None,
        }
    }

    /// Whether the skeleton should show
    pub fn is_loading(&self) -> bool {
        matches!(self.state, DetailState::Idle | DetailState::Pending)
    }

    /// Ask for the detail; returns true if the caller must start a fetch
    ///
    /// Already loaded or already in flight means no new fetch.
    pub fn request(&mut self) -> bool {
        match self.state {
            DetailState::Loaded(_) | DetailState::Pending => false,
            DetailState::Idle | DetailState::Failed(_) => {
                self.state = DetailState::Pending;
                true
            }
        }
    }

    /// Apply a fetch result; ignored unless a fetch is pending
    pub fn complete(&mut self, result: Result<BlogDetail, FetchError>) {
        if !matches!(self.state, DetailState::Pending) {
            tracing::debug!("Dropping unexpected detail result for {}", self.post_id);
            return;
        }

        self.state = match result {
            Ok(detail) => {
                tracing::debug!("Loaded detail for {}", self.post_id);
                DetailState::Loaded(Box::new(detail))
            }
            Err(e) => {
                tracing::warn!("Failed to fetch blog detail {}: {}", self.post_id, e);
                DetailState::Failed(e)
            }
        };
    }
}
