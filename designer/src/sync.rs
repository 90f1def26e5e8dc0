//! Text/JSON sync bridge.
//!
//! DESIGN
//! ======
//! Each bridge pairs a model with a raw-text surface and keeps two
//! independent queues. The outbound queue carries model snapshots to the
//! surface; the inbound queue carries user keystrokes back to the model once
//! the surface has been quiet for the debounce delay.
//!
//! Only one direction is ever pending. A keystroke cancels any queued
//! outbound push, and model changes are dropped while an inbound edit is
//! waiting, so the user's typing always wins over a stale snapshot.
//!
//! The bridge remembers the last text it pushed. A change notification
//! carrying exactly that text is the surface echoing our own write and is
//! ignored, which keeps the two queues from feeding each other.
//!
//! Text that does not parse is a no-op: the model keeps its last good value
//! and the surface keeps the user's text.
//!
//! Time is passed in explicitly. Hosts drive the bridge with
//! [`JsonBridge::next_deadline`] and [`JsonBridge::poll`].

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::marker::PhantomData;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::consts::JSON_CONTENT_TYPE;
use crate::doc::FormDefinition;
use crate::error::EditorError;
use crate::records::Record;

// =============================================================================
// TEXT SURFACE
// =============================================================================

/// A raw-text editor widget.
pub trait TextSurface {
    fn value(&self) -> String;
    fn set_value(&mut self, text: &str);
    /// Content-type hint for syntax highlighting.
    fn content_type(&self) -> &str {
        JSON_CONTENT_TYPE
    }
}

/// In-memory surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferSurface {
    text: String,
}

impl BufferSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextSurface for BufferSurface {
    fn value(&self) -> String {
        self.text.clone()
    }

    fn set_value(&mut self, text: &str) {
        text.clone_into(&mut self.text);
    }
}

// =============================================================================
// JSON DOCUMENTS
// =============================================================================

/// A model with a JSON text form.
pub trait JsonDocument: Sized {
    /// # Errors
    ///
    /// Returns `Parse` if `text` is not a valid document.
    fn parse(text: &str) -> Result<Self, EditorError>;

    /// # Errors
    ///
    /// Returns `Parse` if the model cannot be serialized.
    fn render(&self) -> Result<String, EditorError>;
}

impl JsonDocument for FormDefinition {
    fn parse(text: &str) -> Result<Self, EditorError> {
        Self::from_json(text)
    }

    fn render(&self) -> Result<String, EditorError> {
        self.to_json()
    }
}

impl JsonDocument for Record {
    fn parse(text: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(text)?)
    }

    fn render(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// =============================================================================
// DEBOUNCE
// =============================================================================

/// Holds the most recent item until `delay` has passed without a newer one.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debounce<T> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Queue `item`, replacing anything pending and restarting the delay.
    pub fn schedule(&mut self, item: T, now: Instant) {
        self.pending = Some((now + self.delay, item));
    }

    /// Take the pending item if its deadline has passed.
    pub fn due(&mut self, now: Instant) -> Option<T> {
        match self.pending.take() {
            Some((deadline, item)) if deadline <= now => Some(item),
            still_waiting => {
                self.pending = still_waiting;
                None
            }
        }
    }

    /// Take the pending item without waiting for its deadline.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take().map(|(_, item)| item)
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

// =============================================================================
// BRIDGE
// =============================================================================

/// Result of one [`JsonBridge::poll`].
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome<T> {
    /// Nothing was due.
    Idle,
    /// A model snapshot was written to the surface.
    Pushed,
    /// Edited text parsed; the caller should adopt this model.
    Applied(T),
    /// Edited text failed to parse; the model is unchanged.
    Rejected,
}

pub struct JsonBridge<T, S = BufferSurface> {
    surface: S,
    outbound: Debounce<String>,
    inbound: Debounce<String>,
    last_pushed: Option<String>,
    model: PhantomData<fn() -> T>,
}

impl<T: JsonDocument, S: TextSurface> JsonBridge<T, S> {
    #[must_use]
    pub fn new(surface: S, inbound_delay: Duration, outbound_delay: Duration) -> Self {
        Self {
            surface,
            outbound: Debounce::new(outbound_delay),
            inbound: Debounce::new(inbound_delay),
            last_pushed: None,
            model: PhantomData,
        }
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Queue a snapshot of `model` for the surface. Dropped while an edit is
    /// waiting to be parsed. With a zero outbound delay the snapshot is
    /// written at once; returns whether it was.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if the model cannot be serialized.
    pub fn model_changed(&mut self, model: &T, now: Instant) -> Result<bool, EditorError> {
        if self.inbound.is_pending() {
            debug!("model change not pushed; text edit pending");
            return Ok(false);
        }
        self.outbound.schedule(model.render()?, now);
        Ok(self.push_due(now))
    }

    fn push_due(&mut self, now: Instant) -> bool {
        let Some(text) = self.outbound.due(now) else {
            return false;
        };
        self.surface.set_value(&text);
        self.last_pushed = Some(text);
        true
    }

    /// Write `text` into the surface directly, bypassing the queue.
    pub fn show_text(&mut self, text: &str) {
        self.outbound.cancel();
        self.surface.set_value(text);
        self.last_pushed = Some(text.to_owned());
    }

    /// Show `model` now, discarding anything queued in either direction.
    /// Used when the surface switches to a different model.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if the model cannot be serialized.
    pub fn show_model(&mut self, model: &T) -> Result<(), EditorError> {
        let text = model.render()?;
        self.inbound.cancel();
        self.show_text(&text);
        Ok(())
    }

    /// Parse a pending edit immediately instead of waiting for the quiet
    /// period. `Idle` if no edit is pending.
    pub fn flush(&mut self) -> SyncOutcome<T> {
        match self.inbound.take() {
            Some(text) => self.apply(text),
            None => SyncOutcome::Idle,
        }
    }

    /// The surface reported a change. Echoes of our own push are ignored.
    pub fn text_changed(&mut self, now: Instant) {
        let text = self.surface.value();
        if self.last_pushed.as_deref() == Some(text.as_str()) {
            return;
        }
        self.outbound.cancel();
        self.inbound.schedule(text, now);
    }

    /// Type `text` into the surface and report the change.
    pub fn edit_text(&mut self, text: &str, now: Instant) {
        self.surface.set_value(text);
        self.text_changed(now);
    }

    /// Earliest time something becomes due.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.outbound.deadline(), self.inbound.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.outbound.is_pending() || self.inbound.is_pending()
    }

    /// Run whatever is due at `now`.
    pub fn poll(&mut self, now: Instant) -> SyncOutcome<T> {
        if self.push_due(now) {
            return SyncOutcome::Pushed;
        }
        match self.inbound.due(now) {
            Some(text) => self.apply(text),
            None => SyncOutcome::Idle,
        }
    }

    fn apply(&mut self, text: String) -> SyncOutcome<T> {
        match T::parse(&text) {
            Ok(model) => {
                self.last_pushed = Some(text);
                SyncOutcome::Applied(model)
            }
            Err(e) => {
                debug!(error = %e, "edited text rejected; keeping last good model");
                SyncOutcome::Rejected
            }
        }
    }
}
