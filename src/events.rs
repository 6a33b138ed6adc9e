// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Change notifications published by the account store.
//!
//! UI layers subscribe to re-render when cached account data moves;
//! emission is decoupled from storage writes so a subscriber can never
//! block or fail a store mutation.

use tokio::sync::broadcast;

/// What changed in the account store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountEvent {
    UserUpdated,
    SettingsUpdated,
    SubscriptionUpdated,
    ThemeUpdated,
    AccountCleared,
}

/// Broadcasts account change events to all subscribed UI components.
#[derive(Clone)]
pub struct AccountEvents {
    tx: broadcast::Sender<AccountEvent>,
}

impl Default for AccountEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Publish an event to all subscribers.
    pub fn emit(&self, event: AccountEvent) {
        // Ignore errors; no subscribers is fine
        let _ = self.tx.send(event);
    }

    /// Subscribe to all account change events.
    pub fn subscribe(&self) -> broadcast::Receiver<AccountEvent> {
        self.tx.subscribe()
    }
}
