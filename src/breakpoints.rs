//! Stroke length break points.
//!
//! Every stroke-animated shape is assigned one of a small, fixed set of
//! lengths so a stylesheet needs a single keyframe rule per value.

use crate::error::SvanimError;

/// Margin applied to a shape length before picking its break point, so the
/// dash never ends exactly at the path end.
const LENGTH_MARGIN: f64 = 1.1;

/// Strictly ascending list of stroke length thresholds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakPointList {
    points: Vec<u32>,
}

impl BreakPointList {
    /// Generate break points by geometric growth from `min` up to `max`.
    pub fn generate(min: u32, max: u32, multiplier: f64) -> Result<Self, SvanimError> {
        if min == 0 {
            return Err(SvanimError::Config(
                "minBreakPoint must be greater than 0".into(),
            ));
        }
        if max <= min {
            return Err(SvanimError::Config(format!(
                "maxBreakPoint ({}) must be greater than minBreakPoint ({})",
                max, min
            )));
        }
        if !multiplier.is_finite() || multiplier <= 1.0 {
            return Err(SvanimError::Config(format!(
                "breakPointMultiplier must be greater than 1, got {}",
                multiplier
            )));
        }

        let mut points: Vec<u32> = Vec::new();
        let mut bp = min as f64;
        while bp < max as f64 {
            let value = bp.floor() as u32;
            // Small multipliers can floor to the same value twice
            if points.last() != Some(&value) {
                points.push(value);
            }
            bp *= multiplier;
        }
        if points.last().is_some_and(|&last| last < max) {
            points.push(max);
        }

        Ok(Self { points })
    }

    /// Build a table from an explicit list, in any order.
    pub fn from_list(list: &[u32]) -> Result<Self, SvanimError> {
        let mut points = list.to_vec();
        points.sort_unstable();
        points.dedup();

        if points.first() == Some(&0) {
            return Err(SvanimError::Config(
                "breakPointList entries must be greater than 0".into(),
            ));
        }
        if points.len() < 2 {
            return Err(SvanimError::Config(format!(
                "breakPointList needs at least 2 distinct entries, got {:?}",
                list
            )));
        }

        Ok(Self { points })
    }

    pub fn min(&self) -> u32 {
        self.points[0]
    }

    pub fn max(&self) -> u32 {
        self.points[self.points.len() - 1]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.points
    }

    /// Pick the break point for a shape of the given length.
    ///
    /// Returns the smallest entry that is at least `length * 1.1`, or the
    /// largest entry when none clears the margin.
    pub fn classify(&self, length: f64) -> u32 {
        let threshold = length * LENGTH_MARGIN;
        self.points
            .iter()
            .copied()
            .reduce(|a, b| {
                let low = a.min(b);
                if low as f64 >= threshold {
                    low
                } else {
                    a.max(b)
                }
            })
            .unwrap_or_default()
    }
}

impl Default for BreakPointList {
    fn default() -> Self {
        Self {
            points: vec![4, 6, 9, 13, 20, 30, 45, 68, 102, 153, 230, 345, 500],
        }
    }
}
