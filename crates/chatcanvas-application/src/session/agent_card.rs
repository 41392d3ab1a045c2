use std::sync::Arc;

use chatcanvas_core::a2a::{A2aService, AgentCard};
use tokio::sync::watch;

/// Fetch state of the agent card.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentCardState {
    Pending,
    Loaded(AgentCard),
    Failed,
}

/// Agent card fetched once per session.
///
/// Readers never wait: while the fetch is pending or after it failed,
/// [`AgentCardCache::current`] returns `None` and callers use their defaults.
#[derive(Debug, Clone)]
pub struct AgentCardCache {
    state: watch::Receiver<AgentCardState>,
}

impl AgentCardCache {
    /// Starts the fetch in a background task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(service: Arc<dyn A2aService>) -> Self {
        let (tx, rx) = watch::channel(AgentCardState::Pending);

        tokio::spawn(async move {
            let state = match service.get_agent_card().await {
                Ok(card) => {
                    tracing::debug!(name = %card.name, "Agent card loaded");
                    AgentCardState::Loaded(card)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to fetch agent card");
                    AgentCardState::Failed
                }
            };
            tx.send_replace(state);
        });

        Self { state: rx }
    }

    /// A cache that is already settled with `card`.
    pub fn ready(card: AgentCard) -> Self {
        let (_tx, rx) = watch::channel(AgentCardState::Loaded(card));
        Self { state: rx }
    }

    pub fn current(&self) -> Option<AgentCard> {
        match &*self.state.borrow() {
            AgentCardState::Loaded(card) => Some(card.clone()),
            AgentCardState::Pending | AgentCardState::Failed => None,
        }
    }

    pub fn state(&self) -> AgentCardState {
        self.state.borrow().clone()
    }

    /// Waits until the fetch settled and returns the card if it succeeded.
    pub async fn settled(&self) -> Option<AgentCard> {
        let mut rx = self.state.clone();
        let state = match rx
            .wait_for(|state| !matches!(state, AgentCardState::Pending))
            .await
        {
            Ok(state) => state.clone(),
            Err(_) => return self.current(),
        };
        match state {
            AgentCardState::Loaded(card) => Some(card),
            AgentCardState::Pending | AgentCardState::Failed => None,
        }
    }
}
