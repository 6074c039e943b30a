//! In-memory record store for areas and their events.

use crate::datetime::EventDateTime;
use crate::document::{self, Node};
use crate::error::{Result, StoreError};
use crate::types::{Area, AreaData, AreaId, Event, EventData, EventId, StoreStats};
use tracing::debug;

/// Element names of the persisted document.
pub mod elements {
    pub const ROOT: &str = "root";
    pub const AREA: &str = "area";
    pub const EVENT: &str = "event";
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const DATE_TIME: &str = "date-time";
    pub const LOCATION: &str = "location";
    pub const ID: &str = "id";
}

use elements::*;

/// Capabilities a presentation layer needs from an organizer backend.
///
/// Every failing call leaves the backend unchanged.
pub trait Organizer {
    /// Add an area from a payload carrying [`AreaId::NEW`]. Returns the
    /// assigned id, which is always the area count after the insert.
    fn add_area(&mut self, data: AreaData) -> Result<AreaId>;

    /// Replace the name and description of an existing area.
    fn edit_area(&mut self, data: AreaData) -> Result<()>;

    /// Remove an area with all of its events and close the id gap.
    fn delete_area(&mut self, id: AreaId) -> Result<()>;

    /// Add an event from a payload carrying [`EventId::NEW`].
    fn add_event(&mut self, data: EventData) -> Result<EventId>;

    /// Replace every mutable field of an existing event.
    fn edit_event(&mut self, data: EventData) -> Result<()>;

    /// Remove an event and close the id gap within its area.
    fn delete_event(&mut self, area: AreaId, id: EventId) -> Result<()>;

    /// All areas in id order.
    fn list_areas(&self) -> Vec<Area>;

    /// Events of one area in id order.
    fn list_events(&self, area: AreaId) -> Result<Vec<Event>>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AreaEntry {
    area: Area,
    events: Vec<Event>,
}

/// The in-memory store.
///
/// Areas are numbered `1..=N` and events `1..=M` within each area. The
/// position of a record in its collection always equals its id minus one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Store {
    areas: Vec<AreaEntry>,
}

fn require_name(entity: &'static str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(StoreError::EmptyName { entity });
    }
    Ok(())
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Lookups ---

    fn entry(&self, id: AreaId) -> Result<&AreaEntry> {
        if id.is_new() {
            return Err(StoreError::AreaNotFound(id));
        }
        self.areas
            .get(id.index())
            .ok_or(StoreError::AreaNotFound(id))
    }

    fn entry_mut(&mut self, id: AreaId) -> Result<&mut AreaEntry> {
        if id.is_new() {
            return Err(StoreError::AreaNotFound(id));
        }
        self.areas
            .get_mut(id.index())
            .ok_or(StoreError::AreaNotFound(id))
    }

    fn event_index(entry: &AreaEntry, id: EventId) -> Result<usize> {
        if id.is_new() || id.index() >= entry.events.len() {
            return Err(StoreError::EventNotFound {
                area: entry.area.id,
                event: id,
            });
        }
        Ok(id.index())
    }

    /// Get an area by id.
    pub fn get_area(&self, id: AreaId) -> Result<&Area> {
        self.entry(id).map(|e| &e.area)
    }

    /// Get an event by area and event id.
    pub fn get_event(&self, area: AreaId, id: EventId) -> Result<&Event> {
        let entry = self.entry(area)?;
        let index = Self::event_index(entry, id)?;
        Ok(&entry.events[index])
    }

    /// Iterate areas in id order without cloning.
    pub fn areas(&self) -> impl Iterator<Item = &Area> + '_ {
        self.areas.iter().map(|e| &e.area)
    }

    /// Iterate the events of an area without cloning.
    pub fn events(&self, area: AreaId) -> Result<impl Iterator<Item = &Event> + '_> {
        Ok(self.entry(area)?.events.iter())
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn event_count(&self, area: AreaId) -> Result<usize> {
        Ok(self.entry(area)?.events.len())
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            area_count: self.areas.len(),
            event_count: self.areas.iter().map(|e| e.events.len()).sum(),
        }
    }

    // --- Document mapping ---

    /// Rebuild a store from a document tree.
    ///
    /// The tree must already be dense: area ids `1..N` in document order,
    /// event ids `1..M` within each area.
    pub fn from_document(root: &Node) -> Result<Self> {
        if root.name != ROOT {
            return Err(malformed(format!(
                "expected <{ROOT}> as root element, found <{}>",
                root.name
            )));
        }

        let mut areas = Vec::with_capacity(root.children.len());
        for (position, node) in root.children.iter().enumerate() {
            if node.name != AREA {
                return Err(malformed(format!(
                    "unexpected <{}> under <{ROOT}>",
                    node.name
                )));
            }
            let id = AreaId(dense_id(node, position)?);
            areas.push(Self::area_from_node(id, node)?);
        }

        let store = Self { areas };
        debug!(areas = store.area_count(), "loaded store from document");
        Ok(store)
    }

    fn area_from_node(id: AreaId, node: &Node) -> Result<AreaEntry> {
        let context = format!("area {id}");
        let [name, description] = leaf_fields(node, [NAME, DESCRIPTION], &[EVENT], &context)?;
        if name.is_empty() {
            return Err(malformed(format!("{context} has an empty name")));
        }

        let mut events = Vec::new();
        for child in node.children_named(EVENT) {
            let event_id = EventId(dense_id(child, events.len())?);
            events.push(Self::event_from_node(id, event_id, child)?);
        }

        Ok(AreaEntry {
            area: Area {
                id,
                name: name.to_string(),
                description: description.to_string(),
            },
            events,
        })
    }

    fn event_from_node(area_id: AreaId, id: EventId, node: &Node) -> Result<Event> {
        let context = format!("event {id} of area {area_id}");
        let [name, description, location, token] =
            leaf_fields(node, [NAME, DESCRIPTION, LOCATION, DATE_TIME], &[], &context)?;
        if name.is_empty() {
            return Err(malformed(format!("{context} has an empty name")));
        }
        let date_time = EventDateTime::decode(token)
            .map_err(|e| malformed(format!("{context}: {e}")))?;

        Ok(Event {
            area_id,
            id,
            name: name.to_string(),
            description: description.to_string(),
            location: location.to_string(),
            date_time,
        })
    }

    /// Build the document tree for this store.
    pub fn to_document(&self) -> Node {
        let mut root = Node::new(ROOT);
        for entry in &self.areas {
            let mut area = Node::new(AREA)
                .with_attribute(ID, entry.area.id.to_string())
                .with_child(Node::leaf(NAME, entry.area.name.as_str()))
                .with_child(Node::leaf(DESCRIPTION, entry.area.description.as_str()));

            for event in &entry.events {
                area = area.with_child(
                    Node::new(EVENT)
                        .with_attribute(ID, event.id.to_string())
                        .with_child(Node::leaf(NAME, event.name.as_str()))
                        .with_child(Node::leaf(DESCRIPTION, event.description.as_str()))
                        .with_child(Node::leaf(DATE_TIME, event.date_time.encode()))
                        .with_child(Node::leaf(LOCATION, event.location.as_str())),
                );
            }
            root = root.with_child(area);
        }
        root
    }

    /// Parse a document string into a store.
    pub fn from_xml_str(input: &str) -> Result<Self> {
        Self::from_document(&document::parse(input)?)
    }

    /// The store rendered as a complete document.
    pub fn to_xml_string(&self) -> String {
        document::render(&self.to_document())
    }
}

fn malformed(message: String) -> StoreError {
    StoreError::MalformedDocument(message)
}

/// Read the `id` attribute of `node` and check it sits at `position` in a
/// dense `1..N` range.
fn dense_id(node: &Node, position: usize) -> Result<u32> {
    let raw = node
        .attribute(ID)
        .ok_or_else(|| malformed(format!("<{}> at position {} has no id", node.name, position + 1)))?;
    let id: u32 = raw
        .parse()
        .map_err(|_| malformed(format!("<{}> has non-numeric id {raw:?}", node.name)))?;
    if raw != id.to_string() {
        return Err(malformed(format!(
            "<{}> id {raw:?} is not a plain decimal integer",
            node.name
        )));
    }
    if id as usize != position + 1 {
        return Err(malformed(format!(
            "<{}> id {id} at position {} breaks dense numbering",
            node.name,
            position + 1
        )));
    }
    Ok(id)
}

/// Text of each child named in `fields`, every one present exactly once.
///
/// Children named in `nested` are left to the caller; any other child
/// element is rejected so nothing is dropped on the next save.
fn leaf_fields<'a, const N: usize>(
    node: &'a Node,
    fields: [&str; N],
    nested: &[&str],
    context: &str,
) -> Result<[&'a str; N]> {
    let mut found: [Option<&'a str>; N] = [None; N];

    for child in &node.children {
        if nested.contains(&child.name.as_str()) {
            continue;
        }
        let slot = fields
            .iter()
            .position(|field| *field == child.name)
            .ok_or_else(|| malformed(format!("unexpected <{}> in {context}", child.name)))?;
        if !child.children.is_empty() {
            return Err(malformed(format!(
                "<{}> in {context} must hold text only",
                child.name
            )));
        }
        if found[slot].replace(child.text.as_str()).is_some() {
            return Err(malformed(format!(
                "{context} has more than one <{}>",
                child.name
            )));
        }
    }

    let mut values = [""; N];
    for (slot, field) in fields.iter().enumerate() {
        values[slot] =
            found[slot].ok_or_else(|| malformed(format!("{context} is missing <{field}>")))?;
    }
    Ok(values)
}

impl Organizer for Store {
    fn add_area(&mut self, data: AreaData) -> Result<AreaId> {
        if !data.id.is_new() {
            return Err(StoreError::ExpectedSentinel {
                entity: "Area",
                id: data.id.0,
            });
        }
        require_name("Area", &data.name)?;

        let id = AreaId(self.areas.len() as u32 + 1);
        self.areas.push(AreaEntry {
            area: Area {
                id,
                name: data.name,
                description: data.description,
            },
            events: Vec::new(),
        });

        debug!(area = %id, "added area");
        Ok(id)
    }

    fn edit_area(&mut self, data: AreaData) -> Result<()> {
        if data.id.is_new() {
            return Err(StoreError::SentinelId {
                entity: "Area",
                operation: "edit",
            });
        }
        require_name("Area", &data.name)?;

        let entry = self.entry_mut(data.id)?;
        entry.area.name = data.name;
        entry.area.description = data.description;

        debug!(area = %data.id, "edited area");
        Ok(())
    }

    fn delete_area(&mut self, id: AreaId) -> Result<()> {
        if id.is_new() {
            return Err(StoreError::SentinelId {
                entity: "Area",
                operation: "delete",
            });
        }
        self.entry(id)?;

        let removed = self.areas.remove(id.index());

        for entry in self.areas.iter_mut().filter(|e| e.area.id > id) {
            entry.area.id = AreaId(entry.area.id.0 - 1);
            for event in &mut entry.events {
                event.area_id = entry.area.id;
            }
        }

        debug!(
            area = %id,
            events = removed.events.len(),
            remaining = self.areas.len(),
            "deleted area"
        );
        Ok(())
    }

    fn add_event(&mut self, data: EventData) -> Result<EventId> {
        if !data.id.is_new() {
            return Err(StoreError::ExpectedSentinel {
                entity: "Event",
                id: data.id.0,
            });
        }
        if data.area_id.is_new() {
            return Err(StoreError::SentinelId {
                entity: "Area",
                operation: "add an event to",
            });
        }
        require_name("Event", &data.name)?;

        let entry = self.entry_mut(data.area_id)?;
        let id = EventId(entry.events.len() as u32 + 1);
        entry.events.push(Event {
            area_id: data.area_id,
            id,
            name: data.name,
            description: data.description,
            location: data.location,
            date_time: data.date_time,
        });

        debug!(area = %data.area_id, event = %id, "added event");
        Ok(id)
    }

    fn edit_event(&mut self, data: EventData) -> Result<()> {
        if data.area_id.is_new() {
            return Err(StoreError::SentinelId {
                entity: "Area",
                operation: "edit an event of",
            });
        }
        if data.id.is_new() {
            return Err(StoreError::SentinelId {
                entity: "Event",
                operation: "edit",
            });
        }
        require_name("Event", &data.name)?;

        let entry = self.entry_mut(data.area_id)?;
        let index = Self::event_index(entry, data.id)?;
        let event = &mut entry.events[index];
        event.name = data.name;
        event.description = data.description;
        event.location = data.location;
        event.date_time = data.date_time;

        debug!(area = %data.area_id, event = %data.id, "edited event");
        Ok(())
    }

    fn delete_event(&mut self, area: AreaId, id: EventId) -> Result<()> {
        if area.is_new() {
            return Err(StoreError::SentinelId {
                entity: "Area",
                operation: "delete an event of",
            });
        }
        if id.is_new() {
            return Err(StoreError::SentinelId {
                entity: "Event",
                operation: "delete",
            });
        }

        let entry = self.entry_mut(area)?;
        let index = Self::event_index(entry, id)?;
        entry.events.remove(index);

        for event in entry.events.iter_mut().filter(|e| e.id > id) {
            event.id = EventId(event.id.0 - 1);
        }

        debug!(area = %area, event = %id, remaining = entry.events.len(), "deleted event");
        Ok(())
    }

    fn list_areas(&self) -> Vec<Area> {
        self.areas().cloned().collect()
    }

    fn list_events(&self, area: AreaId) -> Result<Vec<Event>> {
        Ok(self.events(area)?.cloned().collect())
    }
}
