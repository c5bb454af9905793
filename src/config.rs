//! Animation options and per-icon overrides.
//!
//! Settings for one icon are merged with a fixed precedence: built-in
//! defaults, then the global [`Options`], then the [`IconConfig`] fragment
//! resolved for that icon.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};

use crate::breakpoints::BreakPointList;
use crate::error::SvanimError;
use crate::shape::Icon;
use crate::writer::AttributeWriter;

/// A value given either once for every shape or per shape index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PerShape<T> {
    All(T),
    Each(BTreeMap<usize, T>),
}

impl<T> PerShape<T> {
    /// Value for the shape at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&T> {
        match self {
            PerShape::All(value) => Some(value),
            PerShape::Each(map) => map.get(&index),
        }
    }
}

// Untagged enums buffer map keys as strings, so integer keys need a manual pass.
impl<'de, T> Deserialize<'de> for PerShape<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Object(map) => map
                .into_iter()
                .map(|(key, value)| {
                    let index = key
                        .parse::<usize>()
                        .map_err(|_| D::Error::custom(format!("invalid shape index: {:?}", key)))?;
                    let value = serde_json::from_value(value).map_err(D::Error::custom)?;
                    Ok((index, value))
                })
                .collect::<Result<BTreeMap<_, _>, D::Error>>()
                .map(PerShape::Each),
            other => serde_json::from_value(other)
                .map(PerShape::All)
                .map_err(D::Error::custom),
        }
    }
}

/// Hand-authored overrides for one icon.
///
/// Shape indices refer to the order shapes are processed in, which is
/// reversed when `reverseAnimationOrder` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct IconConfig {
    /// Force fill-style animation for all shapes or selected shapes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<PerShape<bool>>,
    /// Target index -> source index; the target reuses the source's timing
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub copy: BTreeMap<usize, usize>,
    /// Added to the measured length before timing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_length: Option<PerShape<f64>>,
    /// Replaces the computed delay
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub delay: BTreeMap<usize, i64>,
    /// Added to the delay after copies and replacements
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_delay: Option<PerShape<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_short_animations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse_animation_order: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_segments: Option<u32>,
}

/// Override fragments keyed by icon name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconConfigTable {
    pub entries: BTreeMap<String, IconConfig>,
}

impl IconConfigTable {
    pub fn insert(&mut self, key: impl Into<String>, config: IconConfig) {
        self.entries.insert(key.into(), config);
    }

    /// Find the fragment for an icon.
    ///
    /// Tries the full key first, then drops leading `-`-separated segments
    /// one at a time, so `arrow-left-alt` falls back to `left-alt` and `alt`.
    pub fn resolve(&self, key: &str) -> Option<&IconConfig> {
        let mut candidate = key;
        loop {
            if let Some(config) = self.entries.get(candidate) {
                return Some(config);
            }
            candidate = candidate.split_once('-')?.1;
        }
    }
}

pub type IconConfigResolver = Arc<dyn Fn(&str, &Icon) -> IconConfig + Send + Sync>;

/// Source of per-icon overrides.
#[derive(Clone)]
pub enum IconsConfig {
    Table(IconConfigTable),
    Resolver(IconConfigResolver),
}

impl IconsConfig {
    pub fn resolver(f: impl Fn(&str, &Icon) -> IconConfig + Send + Sync + 'static) -> Self {
        IconsConfig::Resolver(Arc::new(f))
    }

    /// Fragment for `key`, empty when nothing matches.
    pub fn resolve(&self, key: &str, icon: &Icon) -> IconConfig {
        match self {
            IconsConfig::Table(table) => table.resolve(key).cloned().unwrap_or_default(),
            IconsConfig::Resolver(f) => f(key, icon),
        }
    }
}

impl Default for IconsConfig {
    fn default() -> Self {
        IconsConfig::Table(IconConfigTable::default())
    }
}

impl From<IconConfigTable> for IconsConfig {
    fn from(table: IconConfigTable) -> Self {
        IconsConfig::Table(table)
    }
}

impl fmt::Debug for IconsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconsConfig::Table(table) => f.debug_tuple("Table").field(table).finish(),
            IconsConfig::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

impl<'de> Deserialize<'de> for IconsConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IconConfigTable::deserialize(deserializer).map(IconsConfig::Table)
    }
}

/// Global animation options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    /// Speed factor for stylesheet emission (not used by timing)
    pub animation_multiplier: f64,
    /// Number of timing ticks an icon's animation is divided into
    pub animation_segments: u32,
    /// Animate long shapes first, then short ones
    pub split_short_animations: bool,
    /// Animate shapes last-to-first
    pub reverse_animation_order: bool,
    /// Writes computed timing onto shape nodes
    #[serde(skip)]
    pub attributes_callback: AttributeWriter,
    /// Per-icon overrides
    pub icons_config: IconsConfig,
    /// Explicit break points; when set, the three options below are ignored
    pub break_point_list: Option<Vec<u32>>,
    pub min_break_point: u32,
    pub max_break_point: u32,
    pub break_point_multiplier: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            animation_multiplier: 1.8,
            animation_segments: 20,
            split_short_animations: true,
            reverse_animation_order: false,
            attributes_callback: AttributeWriter::default(),
            icons_config: IconsConfig::default(),
            break_point_list: None,
            min_break_point: 4,
            max_break_point: 500,
            break_point_multiplier: 1.5,
        }
    }
}

impl Options {
    pub fn from_json(json: &str) -> Result<Self, SvanimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SvanimError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Build the break point table these options describe.
    pub fn break_points(&self) -> Result<BreakPointList, SvanimError> {
        match &self.break_point_list {
            Some(list) => BreakPointList::from_list(list),
            None => BreakPointList::generate(
                self.min_break_point,
                self.max_break_point,
                self.break_point_multiplier,
            ),
        }
    }
}

/// Fully merged settings for one icon.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSettings {
    pub animation_segments: u32,
    pub split_short_animations: bool,
    pub reverse_animation_order: bool,
    pub fill: Option<PerShape<bool>>,
    pub copy: BTreeMap<usize, usize>,
    pub extra_length: Option<PerShape<f64>>,
    pub delay: BTreeMap<usize, i64>,
    pub extra_delay: Option<PerShape<i64>>,
}

impl IconSettings {
    /// Layer an icon fragment over the global options.
    pub fn merge(options: &Options, icon: IconConfig) -> Self {
        Self {
            animation_segments: icon
                .animation_segments
                .unwrap_or(options.animation_segments),
            split_short_animations: icon
                .split_short_animations
                .unwrap_or(options.split_short_animations),
            reverse_animation_order: icon
                .reverse_animation_order
                .unwrap_or(options.reverse_animation_order),
            fill: icon.fill,
            copy: icon.copy,
            extra_length: icon.extra_length,
            delay: icon.delay,
            extra_delay: icon.extra_delay,
        }
    }

    pub fn is_copy_target(&self, index: usize) -> bool {
        self.copy.contains_key(&index)
    }

    /// Whether the shape at `index` is forced to animate as a fill.
    pub fn forces_fill(&self, index: usize) -> bool {
        self.fill
            .as_ref()
            .and_then(|fill| fill.get(index))
            .copied()
            .unwrap_or(false)
    }

    pub fn extra_length(&self, index: usize) -> f64 {
        self.extra_length
            .as_ref()
            .and_then(|extra| extra.get(index))
            .copied()
            .unwrap_or(0.0)
    }
}

impl Default for IconSettings {
    fn default() -> Self {
        Self::merge(&Options::default(), IconConfig::default())
    }
}
