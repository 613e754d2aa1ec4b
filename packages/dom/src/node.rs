//! Content tree nodes and path-addressed editing
//!
//! The tree is deliberately small: elements and text, nothing else. Elements
//! carry a generated `id` for caret resolution; ids are internal and never
//! serialized to markup.

use serde::{Deserialize, Serialize};

/// Child-index path from the body root to a node
pub type NodePath = Vec<usize>;

/// A node in the content tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }
}

/// An element with attributes, classes and children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Tag name (e.g. "span")
    pub tag: String,

    /// Generated node ID for caret resolution (not serialized to markup)
    pub id: String,

    /// Plain attributes, in source order
    pub attributes: Vec<(String, String)>,

    /// CSS class names (the `class` attribute, split)
    pub class_names: Vec<String>,

    /// Child nodes
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: id.into(),
            attributes: Vec::new(),
            class_names: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing any existing value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(attr, _)| *attr == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.class_names.iter().any(|class| class == name)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Resolve the node at `path`, relative to this element's children
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let (&last, parents) = path.split_last()?;
        let mut element = self;
        for &index in parents {
            element = element.children.get(index)?.as_element()?;
        }
        element.children.get(last)
    }

    /// Replace the node at `path` with a run of sibling nodes
    ///
    /// Returns false if the path no longer resolves.
    pub fn splice(&mut self, path: &[usize], replacement: Vec<Node>) -> bool {
        let Some((&last, parents)) = path.split_last() else {
            return false;
        };
        let Some(children) = self.child_list_mut(parents) else {
            return false;
        };
        if last >= children.len() {
            return false;
        }
        children.splice(last..=last, replacement);
        true
    }

    /// Insert a node immediately after the node at `path`
    pub fn insert_after(&mut self, path: &[usize], node: Node) -> bool {
        let Some((&last, parents)) = path.split_last() else {
            return false;
        };
        let Some(children) = self.child_list_mut(parents) else {
            return false;
        };
        if last >= children.len() {
            return false;
        }
        children.insert(last + 1, node);
        true
    }

    /// Remove and return the node at `path`
    pub fn remove(&mut self, path: &[usize]) -> Option<Node> {
        let (&last, parents) = path.split_last()?;
        let children = self.child_list_mut(parents)?;
        if last >= children.len() {
            return None;
        }
        Some(children.remove(last))
    }

    /// Collect paths of all nodes matching `predicate`, in document order
    ///
    /// This is the immutable first phase of a two-phase rewrite. Applying
    /// replacements in *reverse* document order keeps the unprocessed paths
    /// valid: a mutation at path `p` can only invalidate paths that come
    /// after `p` in document order, and those have already been handled.
    pub fn collect_paths<F>(&self, predicate: F) -> Vec<NodePath>
    where
        F: Fn(&Node) -> bool,
    {
        let mut paths = Vec::new();
        let mut path = Vec::new();
        collect_into(&self.children, &predicate, &mut path, &mut paths);
        paths
    }

    /// Find the path of the first element (document order) matching `predicate`
    pub fn find_path<F>(&self, predicate: F) -> Option<NodePath>
    where
        F: Fn(&Element) -> bool,
    {
        let mut path = Vec::new();
        find_into(&self.children, &predicate, &mut path)
    }

    /// Find the path of the first element carrying `name="value"`
    pub fn find_by_attribute(&self, name: &str, value: &str) -> Option<NodePath> {
        self.find_path(|element| element.attribute(name) == Some(value))
    }

    /// Find an element by generated ID, including this element itself
    pub fn find_element_by_id(&self, id: &str) -> Option<&Element> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .iter()
            .filter_map(Node::as_element)
            .find_map(|child| child.find_element_by_id(id))
    }

    /// Merge runs of adjacent text children, recursively
    pub fn merge_adjacent_text(&mut self) {
        let children = std::mem::take(&mut self.children);
        for mut node in children {
            if let Node::Element(ref mut element) = node {
                element.merge_adjacent_text();
            }
            let merged = if let (Some(Node::Text(previous)), Node::Text(next)) =
                (self.children.last_mut(), &node)
            {
                previous.push_str(next);
                true
            } else {
                false
            };
            if !merged {
                self.children.push(node);
            }
        }
    }

    fn child_list_mut(&mut self, path: &[usize]) -> Option<&mut Vec<Node>> {
        let mut element = self;
        for &index in path {
            element = match element.children.get_mut(index)? {
                Node::Element(child) => child,
                Node::Text(_) => return None,
            };
        }
        Some(&mut element.children)
    }
}

fn collect_text(children: &[Node], out: &mut String) {
    for node in children {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
        }
    }
}

fn collect_into<F>(children: &[Node], predicate: &F, path: &mut NodePath, out: &mut Vec<NodePath>)
where
    F: Fn(&Node) -> bool,
{
    for (index, node) in children.iter().enumerate() {
        path.push(index);
        if predicate(node) {
            out.push(path.clone());
        }
        if let Node::Element(element) = node {
            collect_into(&element.children, predicate, path, out);
        }
        path.pop();
    }
}

fn find_into<F>(children: &[Node], predicate: &F, path: &mut NodePath) -> Option<NodePath>
where
    F: Fn(&Element) -> bool,
{
    for (index, node) in children.iter().enumerate() {
        let Node::Element(element) = node else {
            continue;
        };
        path.push(index);
        if predicate(element) {
            return Some(path.clone());
        }
        if let Some(found) = find_into(&element.children, predicate, path) {
            return Some(found);
        }
        path.pop();
    }
    None
}
