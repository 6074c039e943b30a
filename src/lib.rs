//! # Agenda Store
//!
//! Areas of interest and their dated events, kept in memory with dense ids
//! and persisted as a single XML document.
//!
//! ## Core Concepts
//!
//! - **Areas**: named groupings numbered `1..N`
//! - **Events**: dated items numbered `1..M` within their area
//! - **Compaction**: deleting a record renumbers every later sibling so ids
//!   never have gaps
//! - **Sessions**: a locked document loaded on open and written on close
//!
//! ## Example
//!
//! ```ignore
//! use agenda::{AreaData, EventData, EventDateTime, GatewayConfig, Organizer, Session};
//!
//! let mut session = Session::open(GatewayConfig::new("./agenda.xml"))?;
//!
//! let area = session.add_area(AreaData::new("chemistry", "high school class"))?;
//! let when = EventDateTime::new(2024, 3, 14, 15, 0)?;
//! session.add_event(EventData::new(area, "lab report due", when).with_location("room 204"))?;
//!
//! session.close().map_err(|(e, _)| e)?;
//! ```

pub mod datetime;
pub mod document;
pub mod error;
pub mod gateway;
pub mod session;
pub mod store;
pub mod types;

// Re-exports
pub use datetime::{Convention, EventDateTime};
pub use document::Node;
pub use error::{ErrorKind, Result, StoreError};
pub use gateway::{Gateway, GatewayConfig};
pub use session::Session;
pub use store::{Organizer, Store};
pub use types::*;
