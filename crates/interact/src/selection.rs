//! Selection feedback: hover tracking and pinch-driven pulses.
//!
//! Two independent channels feed this controller. Gaze hover is stateless
//! frame-to-frame apart from the previous hit, and is re-derived every
//! frame. Pinch selection is discrete: a pinch-start on a hit object arms
//! a pulse (scale up now, revert on a deadline); a retrigger while armed
//! resets the deadline instead of stacking a second reversion.
//!
//! The controller owns no scene access. It emits [`SelectionEvent`]s that
//! the session applies to the graph, so a cancelled controller can never
//! touch disposed geometry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;
use xrgallery_core::Hand;

use crate::ray::RayKind;
use crate::raycast::HitResult;
use crate::registry::ObjectId;

/// Tunable feedback behavior.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackPolicy {
    /// Scale applied to a selected object while its pulse is live.
    pub pulse_scale: f32,
    /// How long a pulse lasts before reverting.
    pub revert_after: Duration,
}

impl Default for FeedbackPolicy {
    fn default() -> Self {
        Self {
            pulse_scale: 1.2,
            revert_after: Duration::from_millis(1000),
        }
    }
}

/// Discrete selection state of one object. Hover is orthogonal and not
/// part of this enum; query [`SelectionFeedback::is_hovered`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectState {
    /// No live pulse.
    Idle,
    /// Pulse armed, awaiting its revert deadline.
    Selected,
}

/// Visual changes the session must apply to the scene graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionEvent {
    /// A ray source started hovering the object this frame.
    HoverEnter(ObjectId),
    /// A ray source stopped hovering the object this frame.
    HoverExit(ObjectId),
    /// A pinch selected the object; apply `scale` to its node now.
    PulseStarted {
        /// The selected object.
        object: ObjectId,
        /// Uniform scale factor to apply.
        scale: f32,
    },
    /// A pulse's deadline elapsed; restore the node to scale 1.0.
    PulseReverted(ObjectId),
}

/// The selection feedback state machine.
#[derive(Default)]
pub struct SelectionFeedback {
    policy: FeedbackPolicy,
    // Last hovered object, tracked independently per ray kind.
    hovered: HashMap<RayKind, ObjectId>,
    // Armed revert deadlines; at most one per object.
    deadlines: HashMap<ObjectId, Instant>,
}

impl SelectionFeedback {
    /// Controller with the given policy.
    pub fn new(policy: FeedbackPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// The active policy.
    pub fn policy(&self) -> FeedbackPolicy {
        self.policy
    }

    /// Feed one frame's hit for a continuous pointer channel. Emits
    /// hover-exit for the object left and hover-enter for the object
    /// gained, in that order. Hover state is fully determined by `hit`.
    pub fn pointer_frame(&mut self, kind: RayKind, hit: Option<&HitResult>) -> Vec<SelectionEvent> {
        let current = hit.map(|h| h.object);
        let previous = self.hovered.get(&kind).copied();
        if previous == current {
            return Vec::new();
        }

        let mut events = Vec::with_capacity(2);
        if let Some(old) = previous {
            self.hovered.remove(&kind);
            events.push(SelectionEvent::HoverExit(old));
        }
        if let Some(new) = current {
            self.hovered.insert(kind, new);
            events.push(SelectionEvent::HoverEnter(new));
        }
        events
    }

    /// Whether the given ray kind is hovering anything (drives the binary
    /// cursor color).
    pub fn is_pointer_hovering(&self, kind: RayKind) -> bool {
        self.hovered.contains_key(&kind)
    }

    /// Whether any channel hovers the object.
    pub fn is_hovered(&self, object: ObjectId) -> bool {
        self.hovered.values().any(|o| *o == object)
    }

    /// Handle a pinch-start whose ray resolved to `hit`. On a hit, the
    /// object becomes Selected and its revert deadline is (re)armed at
    /// `now + revert_after`; an already-armed deadline is reset, never
    /// duplicated. Hover never gates this transition.
    pub fn pinch_start(&mut self, hit: Option<&HitResult>, now: Instant) -> Option<SelectionEvent> {
        let object = hit?.object;
        let deadline = now + self.policy.revert_after;
        let rearmed = self.deadlines.insert(object, deadline).is_some();
        debug!(object = object.raw(), rearmed, "pinch selected object");
        Some(SelectionEvent::PulseStarted {
            object,
            scale: self.policy.pulse_scale,
        })
    }

    /// Pinch-end is accepted and deliberately produces no transition; it
    /// is an extension point, not an error.
    pub fn pinch_end(&mut self, hand: Hand) {
        debug!(?hand, "pinch ended");
    }

    /// Advance timers. Every deadline at or before `now` fires exactly one
    /// [`SelectionEvent::PulseReverted`] and returns its object to Idle.
    pub fn update(&mut self, now: Instant) -> Vec<SelectionEvent> {
        let mut elapsed: Vec<ObjectId> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(object, _)| *object)
            .collect();
        // HashMap order is arbitrary; sort for deterministic application.
        elapsed.sort();
        elapsed
            .into_iter()
            .map(|object| {
                self.deadlines.remove(&object);
                SelectionEvent::PulseReverted(object)
            })
            .collect()
    }

    /// Discrete state of an object.
    pub fn state_of(&self, object: ObjectId) -> ObjectState {
        if self.deadlines.contains_key(&object) {
            ObjectState::Selected
        } else {
            ObjectState::Idle
        }
    }

    /// Number of armed reversion deadlines.
    pub fn armed(&self) -> usize {
        self.deadlines.len()
    }

    /// Drop all state for an object that is being destroyed.
    pub fn forget(&mut self, object: ObjectId) {
        self.deadlines.remove(&object);
        self.hovered.retain(|_, o| *o != object);
    }

    /// Cancel every armed deadline and hover. Teardown path; idempotent.
    pub fn cancel_all(&mut self) {
        self.deadlines.clear();
        self.hovered.clear();
    }
}
