//! Core value records shared between the store and its callers.

use crate::datetime::EventDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an area, dense within the store.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct AreaId(pub u32);

impl AreaId {
    /// The "not yet created" sentinel.
    pub const NEW: AreaId = AreaId(0);

    pub fn is_new(self) -> bool {
        self.0 == 0
    }

    /// Zero-based position of this id in a dense `1..N` range.
    pub(crate) fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Debug for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AreaId({})", self.0)
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an event, dense within its owning area.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct EventId(pub u32);

impl EventId {
    /// The "not yet created" sentinel.
    pub const NEW: EventId = EventId(0);

    pub fn is_new(self) -> bool {
        self.0 == 0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Debug for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventId({})", self.0)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An area of interest as held by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    pub description: String,
}

/// A dated event belonging to exactly one area.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Owning area.
    pub area_id: AreaId,
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub date_time: EventDateTime,
}

/// Payload for adding or editing an area.
///
/// A payload for a new area carries [`AreaId::NEW`]; a payload for an edit
/// carries the id of the area being replaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AreaData {
    pub id: AreaId,
    pub name: String,
    pub description: String,
}

impl AreaData {
    /// Payload for an area that does not exist yet.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: AreaId::NEW,
            name: name.into(),
            description: description.into(),
        }
    }

    /// Payload replacing the fields of an existing area.
    pub fn existing(id: AreaId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }
}

impl From<Area> for AreaData {
    fn from(area: Area) -> Self {
        Self {
            id: area.id,
            name: area.name,
            description: area.description,
        }
    }
}

/// Payload for adding or editing an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventData {
    pub area_id: AreaId,
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub date_time: EventDateTime,
}

impl EventData {
    /// Payload for a new event in `area_id` with empty description and location.
    pub fn new(area_id: AreaId, name: impl Into<String>, date_time: EventDateTime) -> Self {
        Self {
            area_id,
            id: EventId::NEW,
            name: name.into(),
            description: String::new(),
            location: String::new(),
            date_time,
        }
    }

    /// Target an existing event instead of creating one.
    pub fn with_id(mut self, id: EventId) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

impl From<Event> for EventData {
    fn from(event: Event) -> Self {
        Self {
            area_id: event.area_id,
            id: event.id,
            name: event.name,
            description: event.description,
            location: event.location,
            date_time: event.date_time,
        }
    }
}

/// Store statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub area_count: usize,
    pub event_count: usize,
}
