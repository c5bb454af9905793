//! Writing computed timing onto shape nodes.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::shape::Shape;
use crate::timing::ShapeTiming;

/// A measured shape together with its computed timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatedShape {
    #[serde(flatten)]
    pub shape: Shape,
    pub timing: ShapeTiming,
}

/// Callback that turns a shape's timing into node attributes.
///
/// Receives the shape and its index in processing order, which is reversed
/// when `reverseAnimationOrder` is set.
#[derive(Clone)]
pub struct AttributeWriter(Arc<dyn Fn(&mut AnimatedShape, usize) + Send + Sync>);

impl AttributeWriter {
    pub fn new(f: impl Fn(&mut AnimatedShape, usize) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Writer that leaves nodes untouched.
    pub fn noop() -> Self {
        Self::new(|_, _| {})
    }

    pub fn write(&self, shape: &mut AnimatedShape, index: usize) {
        (self.0)(shape, index)
    }
}

impl Default for AttributeWriter {
    fn default() -> Self {
        Self::new(write_class_names)
    }
}

impl fmt::Debug for AttributeWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AttributeWriter(..)")
    }
}

/// Class names describing a shape's timing.
pub fn class_names(timing: &ShapeTiming) -> Vec<String> {
    let mut names = vec![
        format!("animation-delay-{}", timing.delay),
        format!("animation-duration-{}", timing.duration),
    ];
    if timing.stroke {
        names.push("animate-stroke".into());
        names.push(format!("stroke-length-{}", timing.break_point));
    } else {
        names.push("animate-fill".into());
    }
    names
}

/// Default writer: timing classes first, then any classes already on the node.
pub fn write_class_names(shape: &mut AnimatedShape, _index: usize) {
    let names = class_names(&shape.timing);
    shape.shape.node.prepend_classes(names);
}
