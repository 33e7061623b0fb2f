//! Drag-and-drop reorder controller
//!
//! An explicit Idle/Dragging state machine. [`transition`] is pure: it maps a
//! state and a synthetic [`DragEvent`] to the next state and an outcome. The
//! [`DragController`] wraps it and applies resulting moves to a
//! [`ScheduleStore`].

use tracing::{debug, info};

use crate::schedule::ScheduleStore;

/// The place card being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSource {
    pub day: usize,
    pub place: usize,
}

/// Candidate destination under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    pub day: usize,
    /// `None` = empty day-card space, i.e. append to the end of the day
    pub place: Option<usize>,
}

impl DropTarget {
    pub fn place(day: usize, place: usize) -> Self {
        Self {
            day,
            place: Some(place),
        }
    }

    pub fn day_end(day: usize) -> Self {
        Self { day, place: None }
    }
}

/// Transient gesture state; never part of the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: DragSource,
        target: Option<DropTarget>,
    },
}

/// Pointer events from the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    /// Drag started on a place card
    Start(DragSource),
    /// Pointer is over a place card or empty day space
    Over(DropTarget),
    /// Released over a target
    Drop(DropTarget),
    /// Gesture ended without a drop
    End,
}

/// Resolved arguments for [`ScheduleStore::move_place`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub source_day: usize,
    pub source_place: usize,
    pub target_day: usize,
    pub target_place: usize,
}

/// What a single event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Started,
    /// Highlight moved; no mutation
    Targeted,
    /// Dropped somewhere; the move should be applied
    Moved(MoveRequest),
    /// Dropped back onto the source card
    Cancelled,
    /// Gesture ended without a drop
    Aborted,
    /// Event not meaningful in the current state
    Ignored,
}

/// Pure transition function
///
/// `day_len` reports the current number of places in a day; it resolves a
/// drop on empty day space to "append".
pub fn transition(state: DragState, event: DragEvent, day_len: impl Fn(usize) -> usize) -> (DragState, DragOutcome) {
    debug!(?state, ?event, "transition: called");
    match (state, event) {
        (DragState::Idle, DragEvent::Start(source)) => (DragState::Dragging { source, target: None }, DragOutcome::Started),
        // Single pointer: a second start while dragging is ignored
        (DragState::Dragging { .. }, DragEvent::Start(_)) => (state, DragOutcome::Ignored),
        (DragState::Dragging { source, .. }, DragEvent::Over(target)) => (
            DragState::Dragging {
                source,
                target: Some(target),
            },
            DragOutcome::Targeted,
        ),
        (DragState::Dragging { source, .. }, DragEvent::Drop(target)) => {
            if target.day == source.day && target.place == Some(source.place) {
                debug!("transition: dropped onto source, cancelling");
                return (DragState::Idle, DragOutcome::Cancelled);
            }
            let target_place = target.place.unwrap_or_else(|| day_len(target.day));
            let request = MoveRequest {
                source_day: source.day,
                source_place: source.place,
                target_day: target.day,
                target_place,
            };
            (DragState::Idle, DragOutcome::Moved(request))
        }
        (DragState::Dragging { .. }, DragEvent::End) => (DragState::Idle, DragOutcome::Aborted),
        (DragState::Idle, _) => (DragState::Idle, DragOutcome::Ignored),
    }
}

/// Drives [`transition`] and applies moves to the store
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn source(&self) -> Option<DragSource> {
        match self.state {
            DragState::Dragging { source, .. } => Some(source),
            DragState::Idle => None,
        }
    }

    pub fn drop_target(&self) -> Option<DropTarget> {
        match self.state {
            DragState::Dragging { target, .. } => target,
            DragState::Idle => None,
        }
    }

    /// Whether a card (or, with `place == None`, a day body) is highlighted
    pub fn is_highlighted(&self, day: usize, place: Option<usize>) -> bool {
        self.drop_target() == Some(DropTarget { day, place })
    }

    /// Feed one event; a drop mutates `store` through `move_place`
    ///
    /// A drop whose move the store rejects still returns the controller to
    /// idle and reports [`DragOutcome::Ignored`].
    pub fn handle(&mut self, event: DragEvent, store: &mut ScheduleStore) -> DragOutcome {
        let (next, outcome) = transition(self.state, event, |day| store.day_len(day));
        self.state = next;
        match outcome {
            DragOutcome::Moved(req) => {
                if store.move_place(req.source_day, req.source_place, req.target_day, req.target_place) {
                    info!(?req, "Drag move applied");
                    outcome
                } else {
                    debug!(?req, "DragController::handle: store rejected move");
                    DragOutcome::Ignored
                }
            }
            other => other,
        }
    }

    /// Clear transient state unconditionally
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }
}
