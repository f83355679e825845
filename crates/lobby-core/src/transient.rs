//! Short-lived status messages with automatic expiry.
//!
//! A [`TransientChannel`] holds at most one message and one pending expiry
//! timer. Setting a new message cancels the previous timer before scheduling
//! the next one, so a superseded message can never be cleared late and a
//! replacement never disappears early. Dropping the channel cancels the timer.
//!
//! [`Alert`] layers a fallback message on top: the transient message wins
//! while it is showing and the default comes back the moment it expires.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

struct ChannelState {
    tx: watch::Sender<Option<String>>,
    /// Bumped on every set/clear; a timer only fires for its own generation
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl ChannelState {
    fn cancel_timer(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

pub struct TransientChannel {
    delay: Duration,
    state: Arc<Mutex<ChannelState>>,
}

impl TransientChannel {
    pub fn new(delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            delay,
            state: Arc::new(Mutex::new(ChannelState {
                tx,
                generation: 0,
                timer: None,
            })),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Show `message` until the delay elapses or another message replaces it.
    ///
    /// An empty message clears the channel without scheduling anything.
    /// Outside a Tokio runtime no expiry can be scheduled, so the message is
    /// dropped with a warning and the channel is left as it was.
    pub fn set(&self, message: impl Into<String>) {
        let message = message.into();
        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) if !message.is_empty() => {
                tracing::warn!("not showing transient message: {}", e);
                return;
            }
            Err(_) => {
                self.clear();
                return;
            }
        };

        let mut state = self.state.lock();
        state.cancel_timer();

        if message.is_empty() {
            state.tx.send_replace(None);
            return;
        }

        let generation = state.generation;
        let deadline = Instant::now() + self.delay;
        let shared = Arc::downgrade(&self.state);
        state.timer = Some(runtime.spawn(expire_at(shared, generation, deadline)));
        state.tx.send_replace(Some(message));
    }

    /// Cancel any pending expiry and return to idle immediately.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.cancel_timer();
        state.tx.send_replace(None);
    }

    pub fn current(&self) -> Option<String> {
        self.state.lock().tx.borrow().clone()
    }

    pub fn is_showing(&self) -> bool {
        self.state.lock().tx.borrow().is_some()
    }

    /// Receiver notified on every change, including expiry.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.state.lock().tx.subscribe()
    }
}

async fn expire_at(shared: Weak<Mutex<ChannelState>>, generation: u64, deadline: Instant) {
    tokio::time::sleep_until(deadline).await;

    let Some(state) = shared.upgrade() else {
        return;
    };
    let mut state = state.lock();
    if state.generation != generation {
        return;
    }
    state.timer = None;
    state.tx.send_replace(None);
    tracing::trace!("transient message expired");
}

impl Drop for TransientChannel {
    fn drop(&mut self) {
        self.state.lock().cancel_timer();
    }
}

/// Status line that shows a transient message when one is set and the
/// default message otherwise.
pub struct Alert {
    default_message: String,
    channel: TransientChannel,
}

impl Alert {
    pub fn new(default_message: impl Into<String>, delay: Duration) -> Self {
        Self {
            default_message: default_message.into(),
            channel: TransientChannel::new(delay),
        }
    }

    /// Text to render right now.
    pub fn text(&self) -> String {
        self.channel
            .current()
            .unwrap_or_else(|| self.default_message.clone())
    }

    pub fn set(&self, message: impl Into<String>) {
        self.channel.set(message);
    }

    pub fn default_message(&self) -> &str {
        &self.default_message
    }

    pub fn channel(&self) -> &TransientChannel {
        &self.channel
    }
}
