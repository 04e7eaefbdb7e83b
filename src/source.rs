//! Absent-safe access to the parsed source document.
//!
//! The bureau export is parsed into a generic tree (`serde_json::Value`)
//! where nothing is guaranteed: any tag may be missing, an element that can
//! repeat shows up as a single object or as an array, and numeric fields
//! arrive as strings. `DocNode` wraps every traversal so a missing
//! intermediate node resolves to the field's default instead of an error.

use serde_json::Value;

/// Cursor over the source tree. Copyable; absent nodes stay navigable.
#[derive(Debug, Clone, Copy)]
pub struct DocNode<'a> {
    node: Option<&'a Value>,
}

impl<'a> DocNode<'a> {
    pub fn root(doc: &'a Value) -> Self {
        Self { node: Some(doc) }
    }

    /// Descend one hop. An absent current node short-circuits.
    pub fn child(self, name: &str) -> Self {
        Self {
            node: self.node.and_then(|v| v.get(name)),
        }
    }

    /// Walk a fixed navigation path.
    pub fn path(self, names: &[&str]) -> Self {
        names.iter().fold(self, |node, name| node.child(name))
    }

    /// Resolve to trimmed text; empty string when absent or not a scalar.
    pub fn text(self) -> String {
        match self.node {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    /// Integer parse-or-default. Fractional input truncates; anything that
    /// does not parse resolves to 0.
    pub fn integer(self) -> i64 {
        match self.node {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
                    .unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Decimal parse-or-default. Sign and fraction are preserved as parsed;
    /// non-finite or unparsable input resolves to 0.
    pub fn decimal(self) -> f64 {
        match self.node {
            Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Normalize the single-vs-repeated element ambiguity into a sequence:
    /// an array yields its elements in order, a single node yields itself,
    /// an absent node yields nothing.
    pub fn as_many(self) -> Vec<DocNode<'a>> {
        match self.node {
            Some(Value::Array(items)) => items.iter().map(|v| Self { node: Some(v) }).collect(),
            Some(v) => vec![Self { node: Some(v) }],
            None => Vec::new(),
        }
    }

    /// Ordered fallback chain over candidate paths; first non-empty text wins.
    pub fn first_text(self, candidates: &[&[&str]]) -> String {
        for path in candidates {
            let text = self.path(path).text();
            if !text.is_empty() {
                return text;
            }
        }
        String::new()
    }
}
