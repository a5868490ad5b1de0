//! Input bridge: externally delivered pinch gestures.
//!
//! Subscriptions are handle-based: `subscribe` hands back an id plus a
//! receiver, and `unsubscribe` cancels exactly that id. Teardown can
//! therefore never orphan a listener the way removal-by-recreated-closure
//! would.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::debug;
use xrgallery_core::{Hand, Transform};

/// Phase of a pinch gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PinchPhase {
    /// Fingers closed; carries the controller pose at the moment of the
    /// pinch.
    Start(Transform),
    /// Fingers released. Accepted by consumers but currently unmapped.
    End,
}

/// One pinch gesture event from a tracked hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchEvent {
    pub hand: Hand,
    pub phase: PinchPhase,
}

/// An active subscription: the handle to cancel it with, plus the event
/// stream.
pub struct InputSubscription {
    pub handle: u64,
    pub events: Receiver<PinchEvent>,
}

/// Fans pinch events out to handle-identified subscribers.
#[derive(Default)]
pub struct InputBridge {
    subscribers: HashMap<u64, Sender<PinchEvent>>,
    next_handle: u64,
}

impl InputBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber.
    pub fn subscribe(&mut self) -> InputSubscription {
        let handle = self.next_handle;
        self.next_handle += 1;
        let (tx, rx) = mpsc::channel();
        self.subscribers.insert(handle, tx);
        debug!(handle, "input subscription added");
        InputSubscription { handle, events: rx }
    }

    /// Cancel exactly the subscription identified by `handle`. Returns
    /// whether anything was removed; cancelling twice is a no-op.
    pub fn unsubscribe(&mut self, handle: u64) -> bool {
        let removed = self.subscribers.remove(&handle).is_some();
        if removed {
            debug!(handle, "input subscription removed");
        }
        removed
    }

    /// Deliver an event to every live subscriber. Subscribers whose
    /// receiver is gone are pruned.
    pub fn emit(&mut self, event: PinchEvent) {
        self.subscribers.retain(|_, tx| tx.send(event).is_ok());
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
