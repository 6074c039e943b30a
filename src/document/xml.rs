//! XML reading and canonical rendering for [`Node`] trees.

use super::node::Node;
use crate::error::{Result, StoreError};
use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Declaration written at the top of every rendered document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

const INDENT: &str = "  ";

fn utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| StoreError::MalformedDocument(format!("invalid UTF-8 in name: {e}")))
}

fn start_node(start: &BytesStart<'_>) -> Result<Node> {
    let mut node = Node::new(utf8(start.name().as_ref())?);
    for attr in start.attributes() {
        let attr = attr?;
        let key = utf8(attr.key.as_ref())?;
        let value = attr.unescape_value()?.into_owned();
        node.attributes.push((key, value));
    }
    Ok(node)
}

fn attach(stack: &mut [Node], root: &mut Option<Node>, node: Node) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => {
            return Err(StoreError::MalformedDocument(format!(
                "second root element <{}>",
                node.name
            )))
        }
    }
    Ok(())
}

/// Parse a document into its root element.
pub fn parse(input: &str) -> Result<Node> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(start_node(&start)?),
            Event::Empty(start) => {
                let node = start_node(&start)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| {
                    StoreError::MalformedDocument("unbalanced closing tag".into())
                })?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(StoreError::MalformedDocument(
                            "text outside the root element".into(),
                        ))
                    }
                }
            }
            Event::CData(data) => {
                let text = utf8(&data.into_inner())?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Event::Eof => break,
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(StoreError::MalformedDocument(format!(
            "element <{}> is never closed",
            open.name
        )));
    }

    root.ok_or_else(|| StoreError::MalformedDocument("document has no root element".into()))
}

/// Render a tree as a canonical document.
///
/// One element per line with two-space indentation. Leaf text is written
/// inline and an element with neither children nor text is self-closed.
pub fn render(root: &Node) -> String {
    let mut out = String::with_capacity(256);
    out.push_str(XML_DECLARATION);
    out.push('\n');
    write_node(&mut out, root, 0);
    out
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push('<');
    out.push_str(&node.name);
    for (key, value) in &node.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }

    if !node.children.is_empty() {
        out.push_str(">\n");
        for child in &node.children {
            write_node(out, child, depth + 1);
        }
        for _ in 0..depth {
            out.push_str(INDENT);
        }
        write_close(out, &node.name);
    } else if node.text.is_empty() {
        out.push_str(" />\n");
    } else {
        out.push('>');
        // Quotes stay literal in text so a loaded document saves back unchanged.
        out.push_str(&partial_escape(node.text.as_str()));
        write_close(out, &node.name);
    }
}

fn write_close(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push_str(">\n");
}
