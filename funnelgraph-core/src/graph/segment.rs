//! Journey segmentation.
//!
//! Events are grouped by visitor identity and each identity's timeline is cut
//! wherever the previous event was a cart-add or the gap to the previous event
//! exceeds the timeout.
//!
//! ## Ordering
//!
//! [`JourneySegmenter::segment`] sorts its input by timestamp itself and never
//! trusts input order. The sort is stable, so events with equal timestamps keep
//! their arrival (ingestion) order. Journeys are returned ordered by the first
//! event of their identity, then by sub-journey index.

use crate::config::JourneyConfig;
use crate::types::{Journey, RawEvent};
use chrono::Duration;
use std::collections::HashMap;

/// Why a new journey starts at an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// The previous event of this identity was a cart-add
    AfterCart,
    /// The previous event of this identity is older than the timeout
    Timeout,
}

/// Boundary between two consecutive events of one identity, if any.
///
/// The cart rule wins when both apply.
pub fn boundary_between(prev: &RawEvent, next: &RawEvent, timeout: Duration) -> Option<Boundary> {
    if prev.is_cart_add() {
        Some(Boundary::AfterCart)
    } else if next.timestamp - prev.timestamp > timeout {
        Some(Boundary::Timeout)
    } else {
        None
    }
}

/// Sub-journey index of every event in one identity's time-ordered timeline.
///
/// The index counts the boundaries seen up to and including each event, so the
/// first event is always in sub-journey 0.
pub fn sub_journey_indices(timeline: &[RawEvent], timeout: Duration) -> Vec<usize> {
    std::iter::once(false)
        .chain(
            timeline
                .windows(2)
                .map(|pair| boundary_between(&pair[0], &pair[1], timeout).is_some()),
        )
        .take(timeline.len())
        .scan(0usize, |index, starts_journey| {
            *index += usize::from(starts_journey);
            Some(*index)
        })
        .collect()
}

/// Splits an event batch into journeys.
#[derive(Debug, Clone)]
pub struct JourneySegmenter {
    timeout: Duration,
}

impl JourneySegmenter {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn from_config(config: &JourneyConfig) -> Self {
        Self::new(config.timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Segment a complete batch of events into journeys.
    pub fn segment(&self, mut events: Vec<RawEvent>) -> Vec<Journey> {
        // stable: equal timestamps stay in arrival order
        events.sort_by_key(|e| e.timestamp);

        let timelines = group_by_identity(events);
        let identities = timelines.len();

        let journeys: Vec<Journey> = timelines
            .into_iter()
            .flat_map(|(identity, timeline)| self.split_timeline(&identity, timeline))
            .collect();

        tracing::debug!(
            identities,
            journeys = journeys.len(),
            timeout_secs = self.timeout().num_seconds(),
            "Segmented events into journeys"
        );

        journeys
    }

    fn split_timeline(&self, identity: &str, timeline: Vec<RawEvent>) -> Vec<Journey> {
        let indices = sub_journey_indices(&timeline, self.timeout);

        let mut journeys = Vec::new();
        let mut current: Vec<RawEvent> = Vec::new();
        let mut current_index = 0;

        for (event, index) in timeline.into_iter().zip(indices) {
            if index != current_index && !current.is_empty() {
                journeys.push(build_journey(
                    journey_id(identity, current_index),
                    std::mem::take(&mut current),
                ));
            }
            current_index = index;
            current.push(event);
        }
        if !current.is_empty() {
            journeys.push(build_journey(journey_id(identity, current_index), current));
        }

        journeys
    }
}

impl Default for JourneySegmenter {
    fn default() -> Self {
        Self::from_config(&JourneyConfig::default())
    }
}

fn journey_id(identity: &str, index: usize) -> String {
    format!("{}_{}", identity, index)
}

/// Group time-ordered events by identity, keeping each identity's order and
/// ordering identities by their first event.
fn group_by_identity(events: Vec<RawEvent>) -> Vec<(String, Vec<RawEvent>)> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<RawEvent>)> = Vec::new();

    for event in events {
        let key = event.identity_key();
        let position = match positions.get(&key) {
            Some(&p) => p,
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, Vec::new()));
                groups.len() - 1
            }
        };
        groups[position].1.push(event);
    }

    groups
}

fn build_journey(id: String, events: Vec<RawEvent>) -> Journey {
    let total = events
        .windows(2)
        .fold(Duration::zero(), |sum, pair| {
            sum + (pair[1].timestamp - pair[0].timestamp)
        });

    Journey {
        id,
        total_time: duration_secs(total),
        total_steps: events.len(),
        has_cart_event: events.iter().any(RawEvent::is_cart_add),
        events,
    }
}

/// Seconds with microsecond precision.
fn duration_secs(duration: Duration) -> f64 {
    match duration.num_microseconds() {
        Some(micros) => micros as f64 / 1e6,
        None => duration.num_seconds() as f64,
    }
}
