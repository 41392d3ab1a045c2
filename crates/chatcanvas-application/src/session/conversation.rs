//! Conversation session: history, the single in-flight request, and folding.
//!
//! A send appends a user message and a pending agent placeholder, then waits
//! for the agent. The placeholder stays the last message until the request
//! settles, and settling replaces exactly that message with a new value.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chatcanvas_core::a2a::{A2aService, Part, SendMessageSuccessResponse};
use chatcanvas_core::canvas::{CanvasBridge, canvas_request};
use chatcanvas_core::config::{DEFAULT_AGENT_ICON_URL, DEFAULT_AGENT_NAME};
use chatcanvas_core::error::{ChatCanvasError, Result};
use chatcanvas_core::message::{
    MessageStatus, Role, UiAgent, UiMessage, convert_part_to_content, text_content,
};
use chatcanvas_core::renderer::RenderingContext;
use chatcanvas_core::surface::{
    ClientToServerMessage, InMemorySurfaceProcessor, ServerToClientMessage, Surface,
    SurfaceProcessor, UserAction, extract_a2ui_messages,
};
use chatcanvas_core::turn::{Turn, group_by_turn};
use chatcanvas_core::variant::PartResolver;
use chrono::Utc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::agent_card::AgentCardCache;

/// Bubble text when the user aborted the request.
pub const CANCELLED_RESPONSE_TEXT: &str = "You cancelled the response.";

/// Ordered chat history. Entries are shared; only the tail is ever replaced.
pub type History = Vec<Arc<UiMessage>>;

/// The request currently awaiting the agent.
struct InFlight {
    generation: u64,
    token: CancellationToken,
    placeholder_id: String,
}

/// Abandons its request when the sending future is dropped unsettled.
struct SendGuard<'a> {
    session: &'a ConversationSession,
    generation: u64,
    settled: bool,
}

impl Drop for SendGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.session.abandon(self.generation);
        }
    }
}

struct SessionState {
    /// Incremented by every send; identifies the request allowed to fold.
    generation: u64,
    in_flight: Option<InFlight>,
    context_id: Option<String>,
    processor: Box<dyn SurfaceProcessor>,
}

/// A chat with one agent.
///
/// At most one request is in flight: a new send cancels the previous one
/// first. All mutation of history happens under the session lock, so the
/// placeholder of the in-flight request is always the last message.
pub struct ConversationSession {
    service: Arc<dyn A2aService>,
    resolvers: Vec<PartResolver>,
    agent_card: AgentCardCache,
    default_agent: UiAgent,
    canvas: Option<Arc<CanvasBridge>>,
    state: Mutex<SessionState>,
    history: watch::Sender<History>,
    surfaces: watch::Sender<HashMap<String, Surface>>,
    stream_open: watch::Sender<bool>,
}

impl ConversationSession {
    /// Creates an idle session with empty history.
    ///
    /// # Arguments
    ///
    /// * `service` - Transport to the agent
    /// * `resolvers` - Ordered resolver chain used to normalize response parts
    /// * `agent_card` - Cached agent identity
    pub fn new(
        service: Arc<dyn A2aService>,
        resolvers: Vec<PartResolver>,
        agent_card: AgentCardCache,
    ) -> Self {
        Self {
            service,
            resolvers,
            agent_card,
            default_agent: UiAgent::new(DEFAULT_AGENT_NAME, DEFAULT_AGENT_ICON_URL),
            canvas: None,
            state: Mutex::new(SessionState {
                generation: 0,
                in_flight: None,
                context_id: None,
                processor: Box::new(InMemorySurfaceProcessor::new()),
            }),
            history: watch::Sender::new(Vec::new()),
            surfaces: watch::Sender::new(HashMap::new()),
            stream_open: watch::Sender::new(false),
        }
    }

    /// Identity used while the agent card is pending or unavailable.
    pub fn with_default_agent(mut self, name: impl Into<String>, icon_url: impl Into<String>) -> Self {
        self.default_agent = UiAgent::new(name, icon_url);
        self
    }

    /// Bridge that receives surfaces asking for canvas promotion.
    pub fn with_canvas(mut self, canvas: Arc<CanvasBridge>) -> Self {
        self.canvas = Some(canvas);
        self
    }

    /// Replaces the surface processor. Existing surface state is dropped.
    pub fn with_surface_processor(mut self, processor: Box<dyn SurfaceProcessor>) -> Self {
        let surfaces = processor.surfaces();
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .processor = processor;
        self.surfaces.send_replace(surfaces);
        self
    }

    // ============================================================================
    // Operations
    // ============================================================================

    /// Sends `text` to the agent and folds the answer into history.
    ///
    /// Any request still in flight is cancelled first. The user message and
    /// the pending placeholder are visible before the transport is called.
    /// Failures never escape: they become an error bubble in history.
    pub async fn send_message(&self, text: impl Into<String>) {
        let text = text.into();

        let (generation, token) = {
            let mut state = self.lock_state();
            self.preempt(&mut state);

            state.generation += 1;
            let generation = state.generation;
            let token = CancellationToken::new();

            let now = Utc::now();
            let context_id = state.context_id.clone().unwrap_or_default();
            let user = UiMessage::new(
                context_id.clone(),
                Role::User,
                vec![text_content(text.clone())],
                MessageStatus::Completed,
                now,
            );
            let placeholder = UiMessage::new(
                context_id,
                Role::Agent(self.agent_role(None)),
                Vec::new(),
                MessageStatus::Pending,
                now,
            );

            state.in_flight = Some(InFlight {
                generation,
                token: token.clone(),
                placeholder_id: placeholder.id.clone(),
            });
            self.history.send_modify(|history| {
                history.push(Arc::new(user));
                history.push(Arc::new(placeholder));
            });
            self.stream_open.send_replace(true);

            (generation, token)
        };

        // Settles the placeholder if this future is dropped before the agent answers.
        let mut guard = SendGuard {
            session: self,
            generation,
            settled: false,
        };

        tracing::debug!(generation, "Sending message to agent");
        let result = self.service.send_message(vec![Part::text(text)], token).await;
        guard.settled = true;
        self.complete(generation, result);
    }

    /// Sends an A2UI user action back to the agent as JSON text.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the action cannot be encoded; nothing
    /// is sent in that case.
    pub async fn send_user_action(&self, action: UserAction) -> Result<()> {
        let payload = serde_json::to_string(&ClientToServerMessage::UserAction(action))?;
        self.send_message(payload).await;
        Ok(())
    }

    /// Aborts the in-flight request, if any.
    ///
    /// The placeholder is completed with the cancellation bubble right away.
    /// Without a request in flight this is a no-op.
    pub async fn cancel_ongoing_stream(&self) {
        let mut state = self.lock_state();
        let Some(in_flight) = state.in_flight.take() else {
            tracing::debug!("No stream open, nothing to cancel");
            return;
        };

        tracing::info!(generation = in_flight.generation, "Cancelling ongoing stream");
        in_flight.token.cancel();
        self.fold_failure(&in_flight, &ChatCanvasError::Cancelled, MessageStatus::Completed);
        self.stream_open.send_replace(false);
    }

    // ============================================================================
    // Read access
    // ============================================================================

    /// Snapshot of the history. Unchanged entries keep their `Arc` identity.
    pub fn history(&self) -> History {
        self.history.borrow().clone()
    }

    pub fn subscribe_history(&self) -> watch::Receiver<History> {
        self.history.subscribe()
    }

    /// History grouped into turns.
    pub fn turns(&self) -> Vec<Turn> {
        group_by_turn(&self.history.borrow())
    }

    /// True while a request is in flight.
    pub fn is_stream_open(&self) -> bool {
        *self.stream_open.borrow()
    }

    pub fn subscribe_stream_open(&self) -> watch::Receiver<bool> {
        self.stream_open.subscribe()
    }

    /// Latest known state of every surface, refreshed after each successful fold.
    pub fn surfaces(&self) -> HashMap<String, Surface> {
        self.surfaces.borrow().clone()
    }

    pub fn subscribe_surfaces(&self) -> watch::Receiver<HashMap<String, Surface>> {
        self.surfaces.subscribe()
    }

    /// Conversation id assigned by the agent, once known.
    pub fn context_id(&self) -> Option<String> {
        self.lock_state().context_id.clone()
    }

    /// Context handed to renderer components.
    pub fn rendering_context(&self) -> RenderingContext {
        RenderingContext {
            is_stream_open: self.is_stream_open(),
            surfaces: self.surfaces(),
        }
    }

    pub fn canvas(&self) -> Option<&Arc<CanvasBridge>> {
        self.canvas.as_ref()
    }

    pub fn agent_card(&self) -> &AgentCardCache {
        &self.agent_card
    }

    // ============================================================================
    // Folding
    // ============================================================================

    /// The state holds no invariant a panic could break midway, so a
    /// poisoned lock is still usable.
    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Settles request `generation` whose caller stopped waiting for it.
    fn abandon(&self, generation: u64) {
        let mut state = self.lock_state();
        let Some(in_flight) = state
            .in_flight
            .take_if(|in_flight| in_flight.generation == generation)
        else {
            return;
        };

        tracing::debug!(generation, "Send dropped before the agent answered");
        in_flight.token.cancel();
        self.fold_failure(&in_flight, &ChatCanvasError::Cancelled, MessageStatus::Completed);
        self.stream_open.send_replace(false);
    }

    /// Cancels the previous request and closes its placeholder.
    fn preempt(&self, state: &mut SessionState) {
        if let Some(previous) = state.in_flight.take() {
            tracing::debug!(
                generation = previous.generation,
                "Preempting in-flight request"
            );
            previous.token.cancel();
            self.fold_failure(&previous, &ChatCanvasError::Cancelled, MessageStatus::Cancelled);
        }
    }

    /// Folds the outcome of request `generation`, unless it was superseded.
    fn complete(&self, generation: u64, result: Result<SendMessageSuccessResponse>) {
        let mut state = self.lock_state();

        let Some(in_flight) = state
            .in_flight
            .take_if(|in_flight| in_flight.generation == generation)
        else {
            tracing::debug!(generation, "Discarding result of a superseded request");
            return;
        };

        match result {
            Ok(response) => self.fold_success(&mut state, &in_flight, response),
            Err(e) => {
                if !e.is_cancelled() {
                    tracing::warn!(generation, error = %e, "Agent request failed");
                }
                self.fold_failure(&in_flight, &e, MessageStatus::Completed);
            }
        }

        self.stream_open.send_replace(false);
    }

    fn fold_success(
        &self,
        state: &mut SessionState,
        in_flight: &InFlight,
        response: SendMessageSuccessResponse,
    ) {
        if let Some(context_id) = response.context_id() {
            if state.context_id.as_deref() != Some(context_id) {
                tracing::debug!(context_id, "Adopting context id from agent");
                state.context_id = Some(context_id.to_string());
            }
        }

        let parts = response.parts();
        let contents = parts
            .iter()
            .cloned()
            .map(|part| convert_part_to_content(part, &self.resolvers))
            .collect();
        let role = Role::Agent(self.agent_role(Some(&response)));
        let context_id = state.context_id.clone();

        self.replace_tail(&in_flight.placeholder_id, move |placeholder| {
            let mut message = placeholder.folded(Some(role), contents);
            if message.context_id.is_empty() {
                message.context_id = context_id.unwrap_or_default();
            }
            message
        });

        let messages = extract_a2ui_messages(&parts);
        if !messages.is_empty() {
            state.processor.process_messages(&messages);
        }
        let surfaces = state.processor.surfaces();
        self.promote_to_canvas(&messages, &surfaces);
        self.surfaces.send_replace(surfaces);

        tracing::debug!(
            generation = in_flight.generation,
            parts = parts.len(),
            a2ui_messages = messages.len(),
            "Folded agent response"
        );
    }

    fn fold_failure(&self, in_flight: &InFlight, error: &ChatCanvasError, status: MessageStatus) {
        let text = if error.is_cancelled() {
            CANCELLED_RESPONSE_TEXT.to_string()
        } else {
            format!("Something went wrong: {error}")
        };

        self.replace_tail(&in_flight.placeholder_id, move |placeholder| {
            let mut message = placeholder.folded(None, vec![text_content(text)]);
            message.status = status;
            message
        });
    }

    /// Replaces the last message with `fold(last)` if it is `placeholder_id`.
    fn replace_tail<F>(&self, placeholder_id: &str, fold: F)
    where
        F: FnOnce(&UiMessage) -> UiMessage,
    {
        self.history.send_if_modified(|history| match history.last_mut() {
            Some(last) if last.id == placeholder_id => {
                *last = Arc::new(fold(last));
                true
            }
            _ => {
                tracing::warn!(placeholder_id, "Placeholder is not the last message, skipping fold");
                false
            }
        });
    }

    /// Opens the canvas when a surface with a `Canvas` component begins
    /// rendering, and closes it when the open surface is deleted.
    ///
    /// Later updates to a promoted surface leave the canvas as it is.
    fn promote_to_canvas(
        &self,
        messages: &[ServerToClientMessage],
        surfaces: &HashMap<String, Surface>,
    ) {
        let Some(canvas) = &self.canvas else {
            return;
        };

        for message in messages {
            match message {
                ServerToClientMessage::BeginRendering(begin) => {
                    let contents = surfaces.get(&begin.surface_id).and_then(canvas_request);
                    if let Some(contents) = contents {
                        canvas.open_surface(begin.surface_id.as_str(), &contents);
                    }
                }
                ServerToClientMessage::DeleteSurface(delete) if canvas.is_open(&delete.surface_id) => {
                    canvas.close_surface();
                }
                _ => {}
            }
        }
    }

    /// Agent identity from the cached card, with the sub-agent override of
    /// `response` when present.
    fn agent_role(&self, response: Option<&SendMessageSuccessResponse>) -> UiAgent {
        let card = self.agent_card.current();
        let mut agent = UiAgent::new(
            card.as_ref()
                .map(|card| card.name.clone())
                .unwrap_or_else(|| self.default_agent.name.clone()),
            card.and_then(|card| card.icon_url)
                .unwrap_or_else(|| self.default_agent.icon_url.clone()),
        );

        if let Some(subagent) = response.and_then(SendMessageSuccessResponse::subagent) {
            agent.subagent_name = Some(subagent.name);
            agent.subagent_icon_url = subagent.icon_url;
        }
        agent
    }
}
