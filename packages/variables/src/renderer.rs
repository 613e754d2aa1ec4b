//! # Token Renderer
//!
//! Bidirectional conversion between placeholder text (`{user.name}`) and
//! rendered marker elements.
//!
//! Both directions are two-phase: collect an immutable snapshot of match
//! paths first, then apply replacements in reverse document order. Mutation
//! during traversal can therefore never skip or duplicate nodes.

use regex::Regex;
use tracing::debug;
use varmark_dom::{Element, Node};
use varmark_surface::{Params, Surface, VariableEvent};

/// CSS class carried by every rendered marker
pub const MARKER_CLASS: &str = "variable";

/// Attribute holding the exact original placeholder, braces included
pub const ORIGINAL_ATTR: &str = "data-original-variable";

/// Placeholder syntax: `{<name>}` with lowercase letters, period, space, underscore
const PLACEHOLDER_PATTERN: &str = r"\{[a-z. _]*\}";

/// Converts placeholder text to marker elements and back
#[derive(Debug, Clone)]
pub struct Renderer {
    pattern: Regex,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(PLACEHOLDER_PATTERN).unwrap(),
        }
    }

    /// Forward conversion: placeholder text → marker elements
    ///
    /// Emits one [`VariableEvent::Rendered`] per produced marker. Text with
    /// no surviving match (malformed syntax, or every candidate rejected by
    /// the allow-list) is left untouched. Idempotent: markers are elements,
    /// not text, so they are never rescanned.
    pub fn render(&self, surface: &mut Surface) {
        let params = surface.params().clone();
        let paths = surface.body().collect_paths(|node| {
            node.as_text()
                .is_some_and(|text| self.pattern.is_match(text))
        });

        let mut produced = 0;
        for path in paths.iter().rev() {
            let Some(text) = surface
                .body()
                .node_at(path)
                .and_then(Node::as_text)
                .map(str::to_string)
            else {
                continue;
            };
            let Some((nodes, events)) = self.convert_text(&text, &params, surface) else {
                continue;
            };
            surface.body_mut().splice(path, nodes);
            produced += events.len();
            for event in events {
                surface.emit(event);
            }
        }

        if produced > 0 {
            debug!(surface = %surface.name(), markers = produced, "rendered variables");
        }
    }

    /// Reverse conversion: marker elements → their original placeholder text
    ///
    /// Restores the identity attribute's raw value, including any characters
    /// that were stripped from the display label, then merges the restored
    /// text with adjacent text siblings so the result is byte-faithful.
    pub fn strip(&self, surface: &mut Surface) {
        let paths = surface.body().collect_paths(|node| {
            node.as_element()
                .is_some_and(|element| element.attribute(ORIGINAL_ATTR).is_some())
        });

        for path in paths.iter().rev() {
            let Some(raw) = surface
                .body()
                .node_at(path)
                .and_then(Node::as_element)
                .and_then(|element| element.attribute(ORIGINAL_ATTR))
                .map(str::to_string)
            else {
                continue;
            };
            surface.body_mut().splice(path, vec![Node::Text(raw)]);
        }
        surface.body_mut().merge_adjacent_text();

        debug!(surface = %surface.name(), markers = paths.len(), "stripped variables");
    }

    /// Split one text node into literal runs and marker elements
    ///
    /// Returns `None` when nothing converts, so the caller leaves the node
    /// alone.
    fn convert_text(
        &self,
        text: &str,
        params: &Params,
        surface: &mut Surface,
    ) -> Option<(Vec<Node>, Vec<VariableEvent>)> {
        let mut nodes = Vec::new();
        let mut events = Vec::new();
        let mut literal = String::new();
        let mut cursor = 0;

        for found in self.pattern.find_iter(text) {
            literal.push_str(&text[cursor..found.start()]);
            cursor = found.end();

            let raw = found.as_str();
            let name = clean_name(raw);
            if !params.is_valid(&name) {
                // rejected match stays literal text
                literal.push_str(raw);
                continue;
            }

            let label = params.label_for(&name).to_string();
            if !literal.is_empty() {
                nodes.push(Node::Text(std::mem::take(&mut literal)));
            }

            let mut marker = Element::new("span", surface.next_node_id());
            marker.class_names.push(MARKER_CLASS.to_string());
            marker.set_attribute(ORIGINAL_ATTR, raw);
            marker.children.push(Node::Text(label.clone()));
            nodes.push(Node::Element(marker));

            events.push(VariableEvent::Rendered {
                raw: raw.to_string(),
                label,
            });
        }

        if events.is_empty() {
            return None;
        }

        literal.push_str(&text[cursor..]);
        if !literal.is_empty() {
            nodes.push(Node::Text(literal));
        }
        Some((nodes, events))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Candidate variable name: the raw match with everything outside
/// `[a-zA-Z._]` stripped
fn clean_name(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_ascii_alphabetic() || matches!(ch, '.' | '_'))
        .collect()
}
