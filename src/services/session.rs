//! Chat session — remote streaming turns with a local fallback.
//!
//! DESIGN
//! ======
//! A `ChatSession` is built once by its owner and passed by reference. It
//! holds the optional transport, the fixed [`SessionConfig`], and the history
//! of completed turns sent with each new turn.
//!
//! Every `send` yields a [`TurnReply`]: either a live [`TurnStream`] or a
//! single fallback [`Fragment`] from the local [`Responder`]. Transport
//! failures never reach the caller as errors; only session misuse does.
//!
//! Phases: `Uninitialized → TurnInFlight → Active | Degraded`, and from
//! `Active`/`Degraded` back to `TurnInFlight` on the next turn. A failed turn
//! degrades only that turn. A second `send` while a turn is in flight is
//! rejected with [`ChatError::TurnInFlight`].
//!
//! The in-flight slot is released by a drop guard, so abandoning a reply
//! stream mid-way (or dropping the `send` future) frees the session and drops
//! the underlying HTTP response.

use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures::stream::{self, BoxStream, Stream, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::llm::types::{ChatTransport, Fragment, FragmentStream, Message, SessionConfig};
use crate::services::responder::{NOT_INDEXED, Responder};
use crate::state::{Conversation, MessageId};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("a turn is already in flight for this session")]
    TurnInFlight,
    #[error("message {0:?} is still streaming")]
    StreamInProgress(MessageId),
}

impl ErrorCode for ChatError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::TurnInFlight => "E_TURN_IN_FLIGHT",
            Self::StreamInProgress(_) => "E_STREAM_IN_PROGRESS",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::TurnInFlight)
    }
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No turn has been sent yet.
    Uninitialized,
    /// Last turn completed remotely; no turn in flight.
    Active,
    /// A turn has been issued and its reply is not yet settled.
    TurnInFlight,
    /// Last turn fell back or broke mid-stream; the next turn tries remote again.
    Degraded,
}

struct SessionInner {
    phase: SessionPhase,
    history: Vec<Message>,
}

fn lock(inner: &Mutex<SessionInner>) -> MutexGuard<'_, SessionInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// SESSION
// =============================================================================

pub struct ChatSession {
    id: Uuid,
    transport: Option<Arc<dyn ChatTransport>>,
    config: SessionConfig,
    responder: Responder,
    inner: Arc<Mutex<SessionInner>>,
}

impl ChatSession {
    /// Create a session. `None` transport means every turn falls back locally.
    #[must_use]
    pub fn new(transport: Option<Arc<dyn ChatTransport>>, config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            transport,
            config,
            responder: Responder::default(),
            inner: Arc::new(Mutex::new(SessionInner { phase: SessionPhase::Uninitialized, history: Vec::new() })),
        }
    }

    /// Replace the local responder's rule table.
    #[must_use]
    pub fn with_responder(mut self, responder: Responder) -> Self {
        self.responder = responder;
        self
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn has_transport(&self) -> bool {
        self.transport.is_some()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        lock(&self.inner).phase
    }

    /// Completed turns, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Message> {
        lock(&self.inner).history.clone()
    }

    /// Start a turn for `text`.
    ///
    /// Blank input never reaches the transport and yields the "not indexed"
    /// fallback without changing the phase.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::TurnInFlight`] if the previous reply is still live.
    pub async fn send(&self, text: &str) -> Result<TurnReply, ChatError> {
        if text.trim().is_empty() {
            debug!(session_id = %self.id, "chat: blank input, skipping transport");
            return Ok(TurnReply::Fallback(Fragment::new(NOT_INDEXED)));
        }

        let (previous, history) = {
            let mut inner = lock(&self.inner);
            let previous = inner.phase;
            match previous {
                SessionPhase::TurnInFlight => return Err(ChatError::TurnInFlight),
                SessionPhase::Uninitialized => info!(session_id = %self.id, "chat: session opened"),
                SessionPhase::Active | SessionPhase::Degraded => {}
            }
            inner.phase = SessionPhase::TurnInFlight;
            (previous, inner.history.clone())
        };
        let mut guard = TurnGuard { session_id: self.id, inner: Arc::clone(&self.inner), previous, settled: false };

        let Some(transport) = &self.transport else {
            warn!(session_id = %self.id, code = "E_LLM_NOT_CONFIGURED", "chat: no transport, using local fallback");
            guard.degrade();
            return Ok(TurnReply::Fallback(self.fallback(text)));
        };

        debug!(session_id = %self.id, history = history.len(), "chat: sending turn");
        match transport.send_turn(&self.config, &history, text).await {
            Ok(fragments) => Ok(TurnReply::Streaming(TurnStream {
                inner: fragments,
                query: text.to_string(),
                responder: self.responder,
                reply: String::new(),
                delivered: 0,
                guard: Some(guard),
            })),
            Err(e) => {
                warn!(
                    session_id = %self.id,
                    error = %e,
                    code = e.error_code(),
                    quota = e.is_quota(),
                    "chat: remote turn failed, using local fallback"
                );
                guard.degrade();
                Ok(TurnReply::Fallback(self.fallback(text)))
            }
        }
    }

    fn fallback(&self, text: &str) -> Fragment {
        Fragment::new(self.responder.respond_or_default(text))
    }
}

// =============================================================================
// TURN GUARD
// =============================================================================

/// Owns the in-flight slot of a turn until it is settled or dropped.
///
/// An unsettled turn restores the phase the session had before it began.
struct TurnGuard {
    session_id: Uuid,
    inner: Arc<Mutex<SessionInner>>,
    previous: SessionPhase,
    settled: bool,
}

impl TurnGuard {
    fn degrade(&mut self) {
        lock(&self.inner).phase = SessionPhase::Degraded;
        self.settled = true;
    }

    fn complete(&mut self, query: String, reply: String) {
        let mut inner = lock(&self.inner);
        inner.history.push(Message::user(query));
        inner.history.push(Message::model(reply));
        inner.phase = SessionPhase::Active;
        self.settled = true;
    }
}

impl Drop for TurnGuard {
    fn drop(&mut self) {
        if !self.settled {
            debug!(session_id = %self.session_id, phase = ?self.previous, "chat: turn abandoned");
            lock(&self.inner).phase = self.previous;
        }
    }
}

// =============================================================================
// TURN REPLY
// =============================================================================

/// Outcome of [`ChatSession::send`], tagged by which path produced it.
pub enum TurnReply {
    /// Live fragments from the remote model.
    Streaming(TurnStream),
    /// One locally computed reply; the remote was not used.
    Fallback(Fragment),
}

impl TurnReply {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// Flatten either path into one fragment sequence for display.
    #[must_use]
    pub fn into_stream(self) -> BoxStream<'static, Fragment> {
        match self {
            Self::Streaming(turn) => turn.boxed(),
            Self::Fallback(fragment) => stream::iter(std::iter::once(fragment)).boxed(),
        }
    }
}

/// Remote reply fragments with per-turn failure handling.
///
/// - An error (or an empty reply) before any fragment yields one fallback
///   fragment and degrades the turn.
/// - An error after fragments were delivered ends the stream; the partial
///   text stands and the turn is degraded.
/// - Normal exhaustion records the turn in the session history.
pub struct TurnStream {
    inner: FragmentStream,
    query: String,
    responder: Responder,
    reply: String,
    delivered: usize,
    guard: Option<TurnGuard>,
}

impl Stream for TurnStream {
    type Item = Fragment;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Fragment>> {
        let this = self.get_mut();
        let Some(guard) = this.guard.as_mut() else {
            return Poll::Ready(None);
        };

        match this.inner.poll_next_unpin(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(Ok(fragment))) => {
                this.reply.push_str(&fragment.text);
                this.delivered += 1;
                Poll::Ready(Some(fragment))
            }
            Poll::Ready(Some(Err(e))) => {
                warn!(
                    session_id = %guard.session_id,
                    error = %e,
                    code = e.error_code(),
                    quota = e.is_quota(),
                    fragments = this.delivered,
                    "chat: stream failed"
                );
                guard.degrade();
                this.guard = None;
                if this.delivered == 0 {
                    Poll::Ready(Some(Fragment::new(this.responder.respond_or_default(&this.query))))
                } else {
                    Poll::Ready(None)
                }
            }
            Poll::Ready(None) if this.delivered == 0 => {
                warn!(session_id = %guard.session_id, "chat: remote reply was empty, using local fallback");
                guard.degrade();
                this.guard = None;
                Poll::Ready(Some(Fragment::new(this.responder.respond_or_default(&this.query))))
            }
            Poll::Ready(None) => {
                debug!(session_id = %guard.session_id, fragments = this.delivered, "chat: turn complete");
                guard.complete(std::mem::take(&mut this.query), std::mem::take(&mut this.reply));
                this.guard = None;
                Poll::Ready(None)
            }
        }
    }
}

// =============================================================================
// STREAMING AGGREGATION
// =============================================================================

/// Closes the model message even if the turn future is dropped mid-stream.
struct StreamingSlot<'a> {
    conversation: &'a mut Conversation,
    id: MessageId,
}

impl Drop for StreamingSlot<'_> {
    fn drop(&mut self) {
        self.conversation.finish(self.id);
    }
}

/// Drive one turn into `conversation`.
///
/// Appends the user message and a streaming model message, grows the model
/// message with every fragment (calling `on_fragment` after each), and
/// always leaves it with `is_streaming == false`.
///
/// # Errors
///
/// Returns [`ChatError::StreamInProgress`] if the conversation already has a
/// streaming message, or [`ChatError::TurnInFlight`] if the session is busy.
/// Neither leaves any trace in the conversation.
pub async fn run_turn<F>(
    session: &ChatSession,
    conversation: &mut Conversation,
    text: &str,
    mut on_fragment: F,
) -> Result<MessageId, ChatError>
where
    F: FnMut(&str),
{
    if let Some(open) = conversation.streaming() {
        return Err(ChatError::StreamInProgress(open.id));
    }
    let reply = session.send(text).await?;
    if reply.is_fallback() {
        debug!(session_id = %session.id(), "chat: turn served locally");
    }

    conversation.push_user(text);
    let id = conversation.begin_model()?;
    let mut slot = StreamingSlot { conversation, id };

    let mut fragments = reply.into_stream();
    while let Some(fragment) = fragments.next().await {
        slot.conversation.append(id, &fragment.text);
        on_fragment(&fragment.text);
    }
    drop(slot);
    Ok(id)
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
