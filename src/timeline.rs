//! Timeline construction: clipping a class-change plan to the projection
//! window and bracketing it with synthetic boundary events.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::ProjectionError;
use crate::catalog::{Character, ClassCatalog, ClassDefinition};

/// A caller-supplied class change, pre-sorted ascending by level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassChange {
    /// Level at which the change takes effect.
    pub level: i32,
    /// Id of the class entered.
    pub class: String,
}

/// What a timeline event carries.
///
/// The terminal marker is a distinct variant rather than a nullable class, so
/// the evaluator cannot consult it for bases, growths, or boosts.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Pure boundary; supplies only the closing level of the last interval.
    Boundary,
    /// The character enters this class at the event level.
    Enter(ClassDefinition),
}

/// One event on a projection timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    pub level: i32,
    pub kind: EventKind,
}

/// Most projections hold the start boundary, at most two changes in range,
/// and the terminal boundary.
type EventVec = SmallVec<[TimelineEvent; 4]>;

/// Clipped, boundary-complete ordered sequence of class-change events.
///
/// Built fresh for every evaluation and discarded afterwards. Always carries
/// at least the two synthetic boundaries; levels ascend strictly whenever the
/// final level is at or above the base level.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    events: EventVec,
}

impl Timeline {
    /// Assemble a timeline directly from events.
    ///
    /// Intended for callers that precompute event lists; [`build_timeline`]
    /// is the normal entry point and is the only one that clips.
    #[must_use]
    pub fn from_events(events: impl IntoIterator<Item = TimelineEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Class occupying the last real interval: the one entered by the final
    /// `Enter` event, which precedes the terminal boundary.
    #[must_use]
    pub fn last_class(&self) -> Option<&ClassDefinition> {
        self.events.iter().rev().find_map(|event| match &event.kind {
            EventKind::Enter(class) => Some(class),
            EventKind::Boundary => None,
        })
    }
}

/// Build the projection timeline for one evaluation.
///
/// Changes before `base_level` predate the character and are dropped; the
/// retained list is truncated at the first change beyond `final_level`. The
/// input is trusted to be pre-sorted, so both cuts are prefix/suffix trims.
/// The result is bracketed by the starting class at `base_level` and a
/// terminal boundary at `final_level`.
///
/// # Errors
///
/// Returns [`ProjectionError::UnknownClass`] when the character's starting
/// class or any retained change names a class absent from the catalog.
pub fn build_timeline(
    character: &Character,
    base_level: i32,
    final_level: i32,
    changes: &[ClassChange],
    classes: &ClassCatalog,
) -> Result<Timeline, ProjectionError> {
    let start = changes
        .iter()
        .position(|change| change.level >= base_level)
        .unwrap_or(changes.len());
    let retained = &changes[start..];
    let end = retained
        .iter()
        .position(|change| change.level > final_level)
        .unwrap_or(retained.len());
    let retained = &retained[..end];

    let starting_class = resolve(classes, &character.class)?;

    let mut events = EventVec::with_capacity(retained.len() + 2);
    events.push(TimelineEvent {
        level: base_level,
        kind: EventKind::Enter(starting_class),
    });
    for change in retained {
        events.push(TimelineEvent {
            level: change.level,
            kind: EventKind::Enter(resolve(classes, &change.class)?),
        });
    }
    events.push(TimelineEvent {
        level: final_level,
        kind: EventKind::Boundary,
    });

    log::trace!(
        "timeline for '{}': {} events over levels {base_level}..{final_level}",
        character.id,
        events.len()
    );

    Ok(Timeline { events })
}

fn resolve(classes: &ClassCatalog, id: &str) -> Result<ClassDefinition, ProjectionError> {
    classes
        .get(id)
        .cloned()
        .ok_or_else(|| ProjectionError::UnknownClass(id.to_string()))
}
