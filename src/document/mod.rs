//! Document tree and its XML form.
//!
//! This layer knows element and attribute names only; what an `area` or an
//! `event` means is decided by the store.

mod node;
mod xml;

pub use node::Node;
pub use xml::{parse, render, XML_DECLARATION};
