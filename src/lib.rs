//! svanim - staggered stroke animation timing for SVG icon sets
//!
//! svanim takes measured icon shapes and decides when each one starts
//! drawing, how long it takes, and which stroke length class it uses, so
//! one shared stylesheet can animate a whole icon set.

mod breakpoints;
mod config;
mod error;
mod node;
mod shape;
mod timing;
mod writer;

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::thread;

use tracing::debug;

pub use breakpoints::*;
pub use config::*;
pub use error::*;
pub use node::*;
pub use shape::*;
pub use timing::*;
pub use writer::*;

/// Animate a lone icon with default settings.
pub fn animate(icon: &Icon) -> Result<Vec<AnimatedShape>, SvanimError> {
    animate_with_options(icon, &Options::default())
}

/// Animate a lone icon with custom options.
pub fn animate_with_options(
    icon: &Icon,
    options: &Options,
) -> Result<Vec<AnimatedShape>, SvanimError> {
    Animator::new(options.clone())?.animate_icon("icon", icon)
}

/// Per-icon results of a batch run.
pub type BatchResults = BTreeMap<String, Result<Vec<AnimatedShape>, SvanimError>>;

/// Validated options plus the break point table built from them.
///
/// Holds no state between icons, so one animator can serve many threads.
#[derive(Debug, Clone)]
pub struct Animator {
    options: Options,
    break_points: BreakPointList,
}

impl Animator {
    pub fn new(options: Options) -> Result<Self, SvanimError> {
        let break_points = options.break_points()?;
        debug!(break_points = ?break_points.as_slice(), "built break point table");
        Ok(Self {
            options,
            break_points,
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn break_points(&self) -> &BreakPointList {
        &self.break_points
    }

    /// Settings for one icon: global options with its override fragment on top.
    pub fn settings_for(&self, key: &str, icon: &Icon) -> IconSettings {
        let fragment = self.options.icons_config.resolve(key, icon);
        IconSettings::merge(&self.options, fragment)
    }

    /// Time every shape of an icon, then run the attribute writer on each.
    ///
    /// Nothing is written unless the whole icon succeeds. Shapes are returned
    /// in the icon's order; the writer sees them in processing order.
    pub fn animate_icon(&self, key: &str, icon: &Icon) -> Result<Vec<AnimatedShape>, SvanimError> {
        let settings = self.settings_for(key, icon);
        let timings = compute_timings(icon, &settings, &self.break_points)?;
        debug!(
            icon = key,
            shapes = icon.shapes.len(),
            reversed = settings.reverse_animation_order,
            "timed icon"
        );

        let mut shapes: Vec<AnimatedShape> = icon
            .shapes
            .iter()
            .cloned()
            .zip(timings)
            .map(|(shape, timing)| AnimatedShape { shape, timing })
            .collect();
        // The writer walks shapes in processing order, the same index space as overrides
        let count = shapes.len();
        for position in 0..count {
            let index = if settings.reverse_animation_order {
                count - 1 - position
            } else {
                position
            };
            self.options
                .attributes_callback
                .write(&mut shapes[index], position);
        }

        Ok(shapes)
    }

    /// Animate every icon, stopping at the first failure.
    pub fn animate_collection(
        &self,
        collection: &Collection,
    ) -> Result<BTreeMap<String, Vec<AnimatedShape>>, SvanimError> {
        collection
            .icons
            .iter()
            .map(|(key, icon)| {
                self.animate_icon(key, icon)
                    .map(|shapes| (key.clone(), shapes))
                    .map_err(|e| e.in_icon(key.as_str()))
            })
            .collect()
    }

    /// Animate every icon independently, in parallel.
    ///
    /// A failing icon is reported in its own slot and does not affect others.
    pub fn animate_each(&self, collection: &Collection) -> BatchResults {
        let entries: Vec<(&String, &Icon)> = collection.icons.iter().collect();
        if entries.is_empty() {
            return BatchResults::new();
        }

        let workers = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        let chunk_size = entries.len().div_ceil(workers);

        thread::scope(|scope| {
            let handles: Vec<_> = entries
                .chunks(chunk_size)
                .map(|chunk| scope.spawn(move || self.animate_chunk(chunk)))
                .collect();

            let mut results = BatchResults::new();
            for handle in handles {
                match handle.join() {
                    Ok(chunk) => results.extend(chunk),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            results
        })
    }

    fn animate_chunk(
        &self,
        chunk: &[(&String, &Icon)],
    ) -> Vec<(String, Result<Vec<AnimatedShape>, SvanimError>)> {
        chunk
            .iter()
            .map(|&(key, icon)| {
                let result = self
                    .animate_icon(key, icon)
                    .map_err(|e| e.in_icon(key.as_str()));
                if let Err(e) = &result {
                    debug!(icon = key.as_str(), error = %e, "failed to animate icon");
                }
                (key.clone(), result)
            })
            .collect()
    }
}
