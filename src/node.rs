//! Renderable node handles attached to measured shapes.

use serde::{Deserialize, Serialize};

/// The element a shape was measured from.
///
/// Timing never looks at it; only attribute writers read and write it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeNode {
    /// Element name (e.g., "path", "circle")
    #[serde(default)]
    pub name: String,
    /// Attributes in document order
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// An attribute on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl ShapeNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Get an attribute value by name.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute value, keeping its position if it already exists.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if let Some(attr) = self.attributes.iter_mut().find(|a| a.name == name) {
            attr.value = value.into();
        } else {
            self.attributes.push(Attribute::new(name, value));
        }
    }

    /// Remove an attribute by name.
    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|a| a.name != name);
    }

    /// Class names currently on the node.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.get_attr("class")
            .into_iter()
            .flat_map(str::split_whitespace)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_names().any(|c| c == class)
    }

    /// Put `classes` in front of the existing class names.
    pub fn prepend_classes<I, S>(&mut self, classes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = classes.into_iter().map(Into::into).collect();
        names.extend(self.class_names().map(str::to_string));
        self.set_attr("class", names.join(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attr_keeps_position() {
        let mut node = ShapeNode::new("path")
            .with_attr("d", "M0 0h1")
            .with_attr("fill", "none");
        node.set_attr("d", "M1 1h1");
        assert_eq!(node.attributes[0].name, "d");
        assert_eq!(node.get_attr("d"), Some("M1 1h1"));
        assert_eq!(node.attributes.len(), 2);
    }

    #[test]
    fn test_remove_attr() {
        let mut node = ShapeNode::new("path").with_attr("class", "a");
        node.remove_attr("class");
        assert_eq!(node.get_attr("class"), None);
    }

    #[test]
    fn test_prepend_classes() {
        let mut node = ShapeNode::new("path").with_attr("class", "  outline  thin ");
        node.prepend_classes(["animate-fill"]);
        assert_eq!(node.get_attr("class"), Some("animate-fill outline thin"));
        assert!(node.has_class("thin"));
        assert!(!node.has_class("animate-stroke"));
    }

    #[test]
    fn test_prepend_classes_without_existing() {
        let mut node = ShapeNode::new("circle");
        node.prepend_classes(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(node.get_attr("class"), Some("a b"));
    }
}
