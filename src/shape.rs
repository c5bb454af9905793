//! Measured shapes and icons.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SvanimError;
use crate::node::ShapeNode;

/// One animatable element, as measured by the shape-length collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Arc length of the outline
    pub length: f64,
    /// Stroke paint, `None` when the shape has no stroke
    #[serde(default, deserialize_with = "deserialize_paint")]
    pub stroke: Option<String>,
    /// Fill paint, `None` when the shape is not filled
    #[serde(default, deserialize_with = "deserialize_paint")]
    pub fill: Option<String>,
    #[serde(default)]
    pub node: ShapeNode,
}

impl Shape {
    /// A stroked shape of the given length.
    pub fn stroked(length: f64) -> Self {
        Self {
            length,
            stroke: Some("currentColor".into()),
            fill: None,
            node: ShapeNode::new("path"),
        }
    }

    /// A filled shape without a stroke.
    pub fn filled(length: f64) -> Self {
        Self {
            length,
            stroke: None,
            fill: Some("currentColor".into()),
            node: ShapeNode::new("path"),
        }
    }

    pub fn has_stroke(&self) -> bool {
        self.stroke.is_some()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Paint {
    Color(String),
    Flag(bool),
}

/// Paint is a color string, or `false`/`null` for no paint.
fn deserialize_paint<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Paint>::deserialize(deserializer)? {
        None | Some(Paint::Flag(false)) => Ok(None),
        Some(Paint::Color(color)) => Ok(Some(color)),
        Some(Paint::Flag(true)) => Err(D::Error::custom(
            "paint must be a color or false, not true",
        )),
    }
}

/// Measured shapes of a single icon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl Icon {
    pub fn new(width: f64, height: f64, shapes: Vec<Shape>) -> Self {
        Self {
            width,
            height,
            shapes,
        }
    }

    /// Synthetic length used for fill-animated shapes.
    pub fn fill_length(&self) -> f64 {
        (self.width + self.height) / 2.0
    }
}

/// Icons keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    pub icons: BTreeMap<String, Icon>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, icon: Icon) {
        self.icons.insert(key.into(), icon);
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, SvanimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load measurements written by the shape-length collaborator.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SvanimError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

impl FromIterator<(String, Icon)> for Collection {
    fn from_iter<T: IntoIterator<Item = (String, Icon)>>(iter: T) -> Self {
        Self {
            icons: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_length() {
        let icon = Icon::new(24.0, 20.0, vec![]);
        assert_eq!(icon.fill_length(), 22.0);
    }

    #[test]
    fn test_parse_collection() {
        let json = r#"{
            "home": {
                "width": 24,
                "height": 24,
                "shapes": [
                    { "length": 12.5, "stroke": "currentColor" },
                    { "length": 3, "fill": "currentColor",
                      "node": { "name": "circle", "attributes": [{ "name": "class", "value": "dot" }] } }
                ]
            }
        }"#;

        let collection = Collection::from_json(json).unwrap();
        let icon = &collection.icons["home"];
        assert_eq!(icon.shapes.len(), 2);
        assert!(icon.shapes[0].has_stroke());
        assert!(!icon.shapes[1].has_stroke());
        assert_eq!(icon.shapes[1].node.get_attr("class"), Some("dot"));
    }

    #[test]
    fn test_parse_collection_false_paint() {
        let json = r##"{
            "check": {
                "width": 24,
                "height": 24,
                "shapes": [
                    { "length": 10, "stroke": "#000", "fill": false },
                    { "length": 4, "stroke": false, "fill": "#000" },
                    { "length": 2, "stroke": null }
                ]
            }
        }"##;

        let collection = Collection::from_json(json).unwrap();
        let shapes = &collection.icons["check"].shapes;
        assert_eq!(shapes[0].stroke.as_deref(), Some("#000"));
        assert_eq!(shapes[0].fill, None);
        assert!(!shapes[1].has_stroke());
        assert_eq!(shapes[1].fill.as_deref(), Some("#000"));
        assert_eq!(shapes[2].stroke, None);
    }

    #[test]
    fn test_parse_collection_rejects_true_paint() {
        let json = r#"{ "x": { "width": 1, "height": 1, "shapes": [{ "length": 1, "stroke": true }] } }"#;
        assert!(matches!(
            Collection::from_json(json),
            Err(SvanimError::Json(_))
        ));
    }

    #[test]
    fn test_parse_collection_rejects_garbage() {
        assert!(matches!(
            Collection::from_json("[1, 2]"),
            Err(SvanimError::Json(_))
        ));
    }
}
