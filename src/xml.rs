//! XML to generic tree conversion.
//!
//! Parses a bureau XML export into a `serde_json::Value` tree: an element
//! with child elements becomes an object keyed by tag name, an element with
//! only text becomes a string scalar, and repeated sibling tags are promoted
//! to an array in encounter order. A tag that appears once is therefore a
//! plain object while the same tag appearing twice is an array; downstream
//! consumers normalize that ambiguity via `DocNode::as_many`.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::errors::AppError;

/// An element being assembled while its subtree is read.
struct Element {
    attrs: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
}

impl Element {
    fn from_start(e: &quick_xml::events::BytesStart<'_>) -> Self {
        let mut attrs = Map::new();
        for attr in e.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = String::from_utf8_lossy(&attr.value).into_owned();
            attrs.insert(key, Value::String(value));
        }
        Self {
            attrs,
            children: Map::new(),
            text: String::new(),
        }
    }

    /// Collapse into a tree value. An element with children or attributes
    /// becomes an object (children shadow same-named attributes, stray
    /// mixed-content text is dropped); anything else collapses to its
    /// trimmed text.
    fn finish(self) -> Value {
        if self.children.is_empty() && self.attrs.is_empty() {
            Value::String(self.text.trim().to_string())
        } else {
            let mut map = self.attrs;
            for (name, value) in self.children {
                map.insert(name, value);
            }
            Value::Object(map)
        }
    }
}

/// Insert a child value, promoting repeated siblings to an array.
fn insert_child(children: &mut Map<String, Value>, name: String, value: Value) {
    match children.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            children.insert(name, value);
        }
    }
}

/// Parse raw XML text into the generic source tree.
///
/// The result is an object with a single key, the document's root element.
/// Attributes are merged into their element's object as string entries; a
/// child element with the same name shadows the attribute. Malformed or
/// rootless input is rejected; nothing downstream of this function fails on
/// missing content.
pub fn parse_document(xml: &str) -> Result<Value, AppError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<(String, Element)> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if stack.is_empty() && root.is_some() {
                    return Err(AppError::UnparsableInput(
                        "multiple root elements".to_string(),
                    ));
                }
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                stack.push((name, Element::from_start(e)));
            }

            Ok(Event::Empty(ref e)) => {
                if stack.is_empty() && root.is_some() {
                    return Err(AppError::UnparsableInput(
                        "multiple root elements".to_string(),
                    ));
                }
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let value = Element::from_start(e).finish();
                match stack.last_mut() {
                    Some((_, parent)) => insert_child(&mut parent.children, name, value),
                    None => root = Some((name, value)),
                }
            }

            Ok(Event::Text(ref e)) => {
                if let Some((_, element)) = stack.last_mut() {
                    if let Ok(text) = e.unescape() {
                        element.text.push_str(&text);
                    }
                }
            }

            Ok(Event::CData(ref e)) => {
                if let Some((_, element)) = stack.last_mut() {
                    let text = String::from_utf8_lossy(e.as_ref());
                    element.text.push_str(&text);
                }
            }

            Ok(Event::End(_)) => {
                let (name, element) = stack.pop().ok_or_else(|| {
                    AppError::UnparsableInput("unexpected closing tag".to_string())
                })?;
                let value = element.finish();
                match stack.last_mut() {
                    Some((_, parent)) => insert_child(&mut parent.children, name, value),
                    None => root = Some((name, value)),
                }
            }

            Ok(Event::Eof) => break,
            Ok(_) => {} // declaration, comments, processing instructions
            Err(e) => {
                return Err(AppError::UnparsableInput(format!("malformed XML: {}", e)));
            }
        }
    }

    if !stack.is_empty() {
        return Err(AppError::UnparsableInput(
            "unexpected end of document".to_string(),
        ));
    }

    let (name, value) =
        root.ok_or_else(|| AppError::UnparsableInput("document has no root element".to_string()))?;

    let mut doc = Map::new();
    doc.insert(name, value);
    Ok(Value::Object(doc))
}
