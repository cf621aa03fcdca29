//! Cross-thread subscription handoff using mpsc channels.
//!
//! The registry itself is confined to the window's thread. Other threads get
//! a `RemoteSubscriptions` handle:
//! - Any thread can queue a subscribe/unsubscribe via the handle
//! - The window thread applies queued commands at the start of its next dispatch
//!
//! Tokens are allocated from a shared atomic counter, so a remote subscribe
//! returns its token immediately even though the listener is only installed
//! later.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::Arc;

use super::registry::{SendListener, SubscriptionToken};
use super::types::EventKind;
use crate::error::{HookError, HookResult};
use crate::model::WindowId;

/// Command queued by another thread for the window thread.
pub(crate) enum RemoteCommand {
    Subscribe {
        token: SubscriptionToken,
        kind: EventKind,
        listener: SendListener,
    },
    Unsubscribe(SubscriptionToken),
}

/// Shared token source for local and remote subscriptions of one registry.
#[derive(Debug, Clone, Default)]
pub(crate) struct TokenSource(Arc<AtomicU64>);

impl TokenSource {
    /// Next unused token; never zero.
    pub(crate) fn next(&self) -> SubscriptionToken {
        SubscriptionToken(self.0.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Drain every queued command without blocking.
pub(crate) fn drain(receiver: &Receiver<RemoteCommand>) -> Vec<RemoteCommand> {
    let mut commands = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(command) => commands.push(command),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
        }
    }
    commands
}

/// A cloneable, thread-safe handle for subscribing from outside the window thread.
///
/// Changes take effect at the start of the next dispatch on the window thread,
/// never during one already in progress.
#[derive(Clone)]
pub struct RemoteSubscriptions {
    window: WindowId,
    sender: Sender<RemoteCommand>,
    tokens: TokenSource,
    /// Set by the registry when it is cancelled or dropped.
    closed: Arc<AtomicBool>,
}

impl RemoteSubscriptions {
    pub(crate) fn new(
        window: WindowId,
        sender: Sender<RemoteCommand>,
        tokens: TokenSource,
        closed: Arc<AtomicBool>,
    ) -> Self {
        Self {
            window,
            sender,
            tokens,
            closed,
        }
    }

    /// Window whose registry this handle feeds.
    pub fn window(&self) -> WindowId {
        self.window
    }

    /// False once the hook has been detached.
    pub fn is_active(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }

    /// Queue a subscription. Fails once the hook has been torn down.
    pub fn subscribe<F>(&self, kind: EventKind, listener: F) -> HookResult<SubscriptionToken>
    where
        F: FnMut(&super::types::HookEvent) -> super::registry::ListenerResult + Send + 'static,
    {
        if !self.is_active() {
            return Err(HookError::Detached(self.window));
        }
        let token = self.tokens.next();
        self.sender
            .send(RemoteCommand::Subscribe {
                token,
                kind,
                listener: Box::new(listener),
            })
            .map_err(|_| HookError::Detached(self.window))?;
        Ok(token)
    }

    /// Queue an unsubscribe. Unknown tokens are ignored when applied.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> HookResult<()> {
        if !self.is_active() {
            return Err(HookError::Detached(self.window));
        }
        self.sender
            .send(RemoteCommand::Unsubscribe(token))
            .map_err(|_| HookError::Detached(self.window))
    }
}
