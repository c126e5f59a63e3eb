//! Funnel phase classification.

use crate::types::EventType;

/// Number of funnel levels, exit included.
pub const PHASE_COUNT: usize = 5;

/// Ordinal funnel level of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Landing = 0,
    Category = 1,
    Product = 2,
    Cart = 3,
    Exit = 4,
}

impl Phase {
    /// All phases in funnel order.
    pub const ALL: [Phase; PHASE_COUNT] = [
        Phase::Landing,
        Phase::Category,
        Phase::Product,
        Phase::Cart,
        Phase::Exit,
    ];

    /// Map an event type to its funnel level.
    ///
    /// Returns `None` for unrecognized types; such events are left out of
    /// compression and edge extraction.
    pub fn classify(event_type: &EventType) -> Option<Phase> {
        match event_type {
            EventType::LandingView => Some(Phase::Landing),
            EventType::CategoryView => Some(Phase::Category),
            EventType::ProductView => Some(Phase::Product),
            EventType::CartAdd => Some(Phase::Cart),
            EventType::Exit => Some(Phase::Exit),
            EventType::Other(_) => None,
        }
    }

    /// The event type that classifies to this phase.
    pub fn event_type(self) -> EventType {
        match self {
            Phase::Landing => EventType::LandingView,
            Phase::Category => EventType::CategoryView,
            Phase::Product => EventType::ProductView,
            Phase::Cart => EventType::CartAdd,
            Phase::Exit => EventType::Exit,
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }

    /// Slot index of this phase in a compressed journey.
    pub fn index(self) -> usize {
        self as usize
    }
}
