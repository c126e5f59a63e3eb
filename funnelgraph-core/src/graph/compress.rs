//! Phase compression.
//!
//! A journey's classified events are folded through a five-slot state machine
//! (one slot per [`Phase`]):
//!
//! | Incoming level | Effect |
//! |----------------|--------|
//! | above the last level | fill the slot; a cart-add absorbs the journey (nothing after it is read) |
//! | same or below the last level | fill the slot and empty every slot above it |
//!
//! When the events run out (or the cart absorbs), the exit slot is filled with
//! an exit event synthesized from the last event read. The compressed journey
//! is the filled slots in funnel order.

use super::phase::{Phase, PHASE_COUNT};
use crate::types::{Journey, RawEvent};

/// One funnel slot: empty, or holding the index of an event in its journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Empty,
    Filled(usize),
}

/// Immutable compression state; every transition yields a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotState {
    slots: [Slot; PHASE_COUNT],
    last: Option<Phase>,
}

/// Result of feeding one event into a [`SlotState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: SlotState,
    /// The event was a forward move into the cart; stop reading the journey
    pub absorbed: bool,
}

impl SlotState {
    /// All slots empty, last level below landing.
    pub const fn new() -> Self {
        Self {
            slots: [Slot::Empty; PHASE_COUNT],
            last: None,
        }
    }

    /// Feed the event at `event_index`, classified as `phase`.
    pub fn transition(self, phase: Phase, event_index: usize) -> Transition {
        let forward = self.last.map_or(true, |last| phase > last);

        let mut slots = self.slots;
        slots[phase.index()] = Slot::Filled(event_index);
        if !forward {
            slots[phase.index() + 1..].fill(Slot::Empty);
        }

        Transition {
            state: Self {
                slots,
                last: Some(phase),
            },
            absorbed: forward && phase == Phase::Cart,
        }
    }

    /// Fill the exit slot from the event at `event_index`, replacing any
    /// previous occupant.
    pub fn close(self, event_index: usize) -> Self {
        let mut slots = self.slots;
        slots[Phase::Exit.index()] = Slot::Filled(event_index);
        Self { slots, ..self }
    }

    pub fn slot(&self, phase: Phase) -> Slot {
        self.slots[phase.index()]
    }

    pub fn last(&self) -> Option<Phase> {
        self.last
    }

    /// Filled slots in funnel order.
    pub fn filled(&self) -> impl Iterator<Item = (Phase, usize)> + '_ {
        Phase::ALL
            .into_iter()
            .filter_map(move |phase| match self.slot(phase) {
                Slot::Filled(index) => Some((phase, index)),
                Slot::Empty => None,
            })
    }
}

impl Default for SlotState {
    fn default() -> Self {
        Self::new()
    }
}

/// One row of a compressed journey.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseRow {
    pub phase: Phase,
    pub event: RawEvent,
}

/// Compress a journey to at most one event per phase, ending in exit.
///
/// Events of unrecognized type are skipped. A journey with no recognized
/// event compresses to nothing.
pub fn compress(journey: &Journey) -> Vec<PhaseRow> {
    let mut state = SlotState::new();
    let mut last_read = None;

    let classified = journey
        .events
        .iter()
        .enumerate()
        .filter_map(|(index, event)| Phase::classify(&event.event_type).map(|p| (p, index)));

    for (phase, index) in classified {
        let transition = state.transition(phase, index);
        state = transition.state;
        last_read = Some(index);
        if transition.absorbed {
            break;
        }
    }

    let Some(last_read) = last_read else {
        tracing::trace!(journey_id = %journey.id, "Journey has no classified events");
        return Vec::new();
    };

    state
        .close(last_read)
        .filled()
        .map(|(phase, index)| {
            let source = &journey.events[index];
            let event = if phase == Phase::Exit {
                RawEvent::exit_from(source)
            } else {
                source.clone()
            };
            PhaseRow { phase, event }
        })
        .collect()
}
