//! Per-icon animation timing.
//!
//! Each icon's animation spans a fraction of `animation_segments` ticks. The
//! span is shared between shapes in proportion to their length, and shapes
//! start one after another along a single timeline.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::breakpoints::BreakPointList;
use crate::config::{IconSettings, PerShape};
use crate::error::SvanimError;
use crate::shape::{Icon, Shape};

/// Shapes shorter than this fraction of the longest stroke are "short".
const SHORT_LENGTH_RATIO: f64 = 0.3;

/// Computed animation values for one shape, in segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeTiming {
    pub duration: u32,
    pub delay: i64,
    pub break_point: u32,
    /// Animated by stroke dash offset rather than by fading in
    pub stroke: bool,
    /// The shape has a stroke but was forced to animate as a fill
    pub ignore_stroke: bool,
}

/// Fraction of the icon's segments used by the whole animation.
///
/// 0.5 for a single shape, approaching 1 as the shape count grows.
pub fn total_duration(shape_count: usize) -> f64 {
    1.0 - (1.0 / shape_count as f64).sqrt() / 2.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    All,
    Long,
    Short,
}

impl Pass {
    fn accepts(self, length: f64, short_length_max: f64) -> bool {
        match self {
            Pass::All => true,
            Pass::Long => !Pass::Short.accepts(length, short_length_max),
            Pass::Short => length < short_length_max,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Measured {
    length: f64,
    stroke: bool,
    ignore_stroke: bool,
}

/// Compute timing for every shape of an icon.
///
/// Results are in the icon's shape order. Override indices in `settings`
/// address processing order, which is reversed when
/// `reverse_animation_order` is set.
pub fn compute_timings(
    icon: &Icon,
    settings: &IconSettings,
    break_points: &BreakPointList,
) -> Result<Vec<ShapeTiming>, SvanimError> {
    let mut shapes: Vec<&Shape> = icon.shapes.iter().collect();
    if settings.reverse_animation_order {
        shapes.reverse();
    }

    let fill_length = icon.fill_length();
    let mut measured: Vec<Option<Measured>> = Vec::with_capacity(shapes.len());
    let mut total_length = 0.0;
    let mut max_length: f64 = 0.0;
    let mut shape_count = 0usize;

    for (index, shape) in shapes.iter().enumerate() {
        if settings.is_copy_target(index) {
            measured.push(None);
            continue;
        }

        let ignore_stroke = shape.has_stroke() && settings.forces_fill(index);
        let stroke = shape.has_stroke() && !ignore_stroke;

        let mut length = settings.extra_length(index);
        if stroke {
            length += shape.length;
        } else {
            length += fill_length;
        }
        if !length.is_finite() || length < 0.0 {
            return Err(SvanimError::InvalidLength { index, length });
        }
        if stroke {
            max_length = max_length.max(length);
        }
        total_length += length;
        shape_count += 1;

        measured.push(Some(Measured {
            length,
            stroke,
            ignore_stroke,
        }));
    }

    let total_duration = total_duration(shape_count);
    let short_length_max = max_length * SHORT_LENGTH_RATIO;
    let passes: &[Pass] = if settings.split_short_animations {
        &[Pass::Long, Pass::Short]
    } else {
        &[Pass::All]
    };
    let segments = settings.animation_segments as f64;
    let max_break_point = break_points.max();

    let mut timings: Vec<Option<ShapeTiming>> = vec![None; shapes.len()];
    let mut start = 0.0;

    for &pass in passes {
        for (index, shape) in measured.iter().enumerate() {
            let Some(shape) = shape else { continue };
            if !pass.accepts(shape.length, short_length_max) {
                continue;
            }

            if shape.length >= max_break_point as f64 {
                return Err(SvanimError::LengthExceedsMax {
                    length: shape.length,
                    max: max_break_point,
                });
            }

            let part = if total_length > 0.0 {
                shape.length * total_duration / total_length
            } else {
                0.0
            };
            let timing = ShapeTiming {
                duration: (part * segments).round() as u32,
                delay: (start * segments).round() as i64,
                break_point: break_points.classify(shape.length),
                stroke: shape.stroke,
                ignore_stroke: shape.ignore_stroke,
            };
            trace!(index, ?pass, length = shape.length, ?timing, "timed shape");
            timings[index] = Some(timing);
            start += part;
        }
    }

    for (&target, &source) in &settings.copy {
        let target_shape = shapes.get(target).ok_or_else(|| {
            SvanimError::CopyMismatch(format!(
                "copy instruction for shape that does not exist: {}",
                target
            ))
        })?;
        let source_shape = shapes.get(source).ok_or_else(|| {
            SvanimError::CopyMismatch(format!(
                "copy instruction for shape that does not exist: {}",
                source
            ))
        })?;
        if target_shape.length != source_shape.length {
            return Err(SvanimError::CopyMismatch(format!(
                "shapes {} and {} have different lengths: {} and {}",
                target, source, target_shape.length, source_shape.length
            )));
        }

        let source_timing = timings[source].ok_or_else(|| {
            SvanimError::CopyMismatch(format!(
                "shape {} copies shape {}, which has no timing of its own",
                target, source
            ))
        })?;
        // Copy targets are never timed directly, so nothing is overwritten here
        timings[target] = Some(ShapeTiming {
            stroke: target_shape.has_stroke() && !source_timing.ignore_stroke,
            ..source_timing
        });
    }

    let mut timings = timings
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| SvanimError::CopyMismatch("copied shape was left without timing".into()))?;

    for (&index, &delay) in &settings.delay {
        timing_at(&mut timings, index)?.delay = delay;
    }

    match &settings.extra_delay {
        Some(PerShape::All(extra)) => {
            for timing in &mut timings {
                timing.delay += extra;
            }
        }
        Some(PerShape::Each(map)) => {
            for (&index, &extra) in map {
                timing_at(&mut timings, index)?.delay += extra;
            }
        }
        None => {}
    }

    if settings.reverse_animation_order {
        timings.reverse();
    }

    Ok(timings)
}

fn timing_at(timings: &mut [ShapeTiming], index: usize) -> Result<&mut ShapeTiming, SvanimError> {
    timings
        .get_mut(index)
        .ok_or(SvanimError::UnknownShape { index })
}
