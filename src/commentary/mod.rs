//! Pit boss radio chatter
//!
//! Discrete game events fire a request to a text-generation backend. The
//! request runs as a detached local task; the frame loop never waits on it.
//! Whatever resolves last lands in the single `MessageSlot` the HUD reads,
//! so a slow reply can overwrite a newer one. There is no queue, retry or
//! cancellation, and replies arriving after a reset are shown as-is.

pub mod gemini;

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use thiserror::Error;

use crate::consts::MESSAGE_VISIBLE_MS;
use crate::display_speed;
use crate::sim::{GameEvent, RunState};

pub use gemini::{GeminiClient, GeminiConfig};

/// Shown when the backend fails for any reason
pub const FALLBACK_TEXT: &str = "The signal is breaking up! Just drive!";
/// Shown when the backend answers with nothing
pub const EMPTY_RESPONSE_TEXT: &str = "Keep your eyes on the grid, pilot!";

/// Tone of a pit boss message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageCategory {
    Encouragement,
    Warning,
    Milestone,
}

/// Events the pit boss reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentaryEvent {
    Start,
    Collision,
    Milestone,
}

impl CommentaryEvent {
    /// Event description embedded in the prompt
    pub fn label(&self) -> &'static str {
        match self {
            CommentaryEvent::Start => "System Initialized",
            CommentaryEvent::Collision => "Vehicle Impact",
            CommentaryEvent::Milestone => "Distance Milestone",
        }
    }

    pub fn category(&self) -> MessageCategory {
        match self {
            CommentaryEvent::Start => MessageCategory::Encouragement,
            CommentaryEvent::Collision => MessageCategory::Warning,
            CommentaryEvent::Milestone => MessageCategory::Milestone,
        }
    }

    /// Game over is covered by the collision that caused it
    pub fn from_game_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Started => Some(CommentaryEvent::Start),
            GameEvent::Collision { .. } => Some(CommentaryEvent::Collision),
            GameEvent::Milestone { .. } => Some(CommentaryEvent::Milestone),
            GameEvent::GameOver { .. } => None,
        }
    }
}

/// The message currently on the pit boss panel
#[derive(Debug, Clone, PartialEq)]
pub struct CommentaryMessage {
    pub text: String,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: f64,
    pub category: MessageCategory,
}

impl CommentaryMessage {
    pub fn is_visible(&self, now_ms: f64) -> bool {
        now_ms - self.timestamp_ms < MESSAGE_VISIBLE_MS
    }
}

/// Text-generation failures (never shown to the player)
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommentaryError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("text generation is only available in the browser")]
    Unsupported,
    #[error("request failed: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("backend answered with HTTP {0}")]
    Http(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

pub type TextFuture = Pin<Box<dyn Future<Output = Result<String, CommentaryError>>>>;

/// A backend that turns a prompt into a short line of text
pub trait TextGenerator {
    fn generate(&self, prompt: String) -> TextFuture;
}

/// Single latest-message slot shared between commentary tasks and the HUD
#[derive(Debug, Clone, Default)]
pub struct MessageSlot(Rc<RefCell<Option<CommentaryMessage>>>);

impl MessageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, message: CommentaryMessage) {
        *self.0.borrow_mut() = Some(message);
    }

    pub fn latest(&self) -> Option<CommentaryMessage> {
        self.0.borrow().clone()
    }

    /// Latest message if it's still within its display window
    pub fn visible(&self, now_ms: f64) -> Option<CommentaryMessage> {
        self.latest().filter(|m| m.is_visible(now_ms))
    }
}

/// Prompt sent for an event
pub fn build_prompt(event: &str, score: u64, speed: f32) -> String {
    format!(
        "You are a high-energy AI Pit Boss for a futuristic neon car racing game. \
         The player just experienced this event: \"{event}\". \
         Current Score: {score}, Current Speed: {} mph. \
         Provide a very short, punchy, witty radio transmission (max 15 words) \
         that sounds futuristic and cool. Use slang like \"nitro\", \"cyber-grid\", \"redline\".",
        display_speed(speed)
    )
}

/// Issues commentary requests and publishes their results
pub struct Commentator {
    generator: Rc<dyn TextGenerator>,
    slot: MessageSlot,
    clock: fn() -> f64,
}

impl Commentator {
    pub fn new(generator: Rc<dyn TextGenerator>, slot: MessageSlot) -> Self {
        Self {
            generator,
            slot,
            clock: crate::platform::now_ms,
        }
    }

    /// Override the timestamp source
    pub fn with_clock(mut self, clock: fn() -> f64) -> Self {
        self.clock = clock;
        self
    }

    pub fn slot(&self) -> &MessageSlot {
        &self.slot
    }

    /// Start a request for `event`, capturing score and speed now
    ///
    /// The returned future never fails; hand it to a local executor and
    /// forget it.
    pub fn notify(
        &self,
        event: CommentaryEvent,
        score: u64,
        speed: f32,
    ) -> impl Future<Output = ()> + 'static {
        let request = self
            .generator
            .generate(build_prompt(event.label(), score, speed));
        let slot = self.slot.clone();
        let clock = self.clock;
        let category = event.category();

        async move {
            let text = match request.await {
                Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
                Ok(_) => EMPTY_RESPONSE_TEXT.to_string(),
                Err(e) => {
                    log::warn!("Pit boss commentary failed: {e}");
                    FALLBACK_TEXT.to_string()
                }
            };
            slot.set(CommentaryMessage {
                text,
                timestamp_ms: clock(),
                category,
            });
        }
    }

    /// Route a frame's drained events to the backend
    ///
    /// Every event with a commentary counterpart starts one request, using
    /// the score and speed in `run` at call time. Nothing is sent while
    /// `enabled` is false. Returns how many requests were started.
    pub fn dispatch<S>(
        &self,
        events: &[GameEvent],
        run: &RunState,
        enabled: bool,
        mut spawn: S,
    ) -> usize
    where
        S: FnMut(Pin<Box<dyn Future<Output = ()>>>),
    {
        if !enabled {
            return 0;
        }

        let mut issued = 0;
        for event in events.iter().filter_map(CommentaryEvent::from_game_event) {
            spawn(Box::pin(self.notify(event, run.score, run.speed)));
            issued += 1;
        }
        issued
    }
}
