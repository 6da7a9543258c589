//! Spectrum visualizers: straight bars, circular bars and a filled wave.

use super::surface::{Bar, Visual, WidgetBox};
use super::{FrameContext, RenderSurface, Widget};
use crate::audio::spectrum::Smoother;
use crate::foundation::core::{BezPath, Point, Size};
use crate::foundation::ids::ObjectId;
use crate::foundation::math::sample_linear;
use crate::save::model::{ObjectKind, VisualizerProps};

const BYTE_MAX: f64 = 255.0;

/// Sample the inclusive bin range `[lo, hi]` of `spectrum` into `count` evenly spaced values.
///
/// The range is clamped to the spectrum; a single point samples `lo`.
pub fn sample_range(spectrum: &[f64], range: [u32; 2], count: usize) -> Vec<f64> {
    if count == 0 || spectrum.is_empty() {
        return vec![0.0; count];
    }
    let last = (spectrum.len() - 1) as f64;
    let lo = f64::from(range[0].min(range[1])).min(last);
    let hi = f64::from(range[0].max(range[1])).min(last);
    if count == 1 {
        return vec![sample_linear(spectrum, lo)];
    }
    let step = (hi - lo) / (count - 1) as f64;
    (0..count)
        .map(|k| sample_linear(spectrum, lo + step * k as f64))
        .collect()
}

fn scale(value: f64, max_length: f64) -> f64 {
    (value / BYTE_MAX).clamp(0.0, 1.0) * max_length.max(0.0)
}

/// Closed wave outline: baseline at the bottom edge, one quadratic segment per pair of points.
pub fn wave_path(values: &[f64], size: Size) -> BezPath {
    let mut path = BezPath::new();
    let h = size.height;
    path.move_to(Point::new(0.0, h));
    let Some(last) = values.len().checked_sub(1) else {
        path.line_to(Point::new(size.width, h));
        path.close_path();
        return path;
    };
    let dx = if last == 0 {
        0.0
    } else {
        size.width / last as f64
    };
    let pts: Vec<Point> = values
        .iter()
        .enumerate()
        .map(|(k, &v)| Point::new(dx * k as f64, h - scale(v, h)))
        .collect();
    path.line_to(pts[0]);
    for pair in pts.windows(2) {
        let mid = pair[0].midpoint(pair[1]);
        path.quad_to(pair[0], mid);
    }
    path.line_to(pts[last]);
    path.line_to(Point::new(size.width, h));
    path.close_path();
    path
}

pub struct VisualizerWidget {
    id: ObjectId,
    smoother: Option<Smoother>,
}

impl VisualizerWidget {
    pub fn new(id: ObjectId) -> Self {
        Self { id, smoother: None }
    }

    fn smooth(&mut self, viz: &VisualizerProps, spectrum: &[f64]) -> Vec<f64> {
        let raw = sample_range(
            spectrum,
            viz.visualizer_analyzer_range,
            viz.visualizer_points_count as usize,
        );
        let def = viz.visualization_smoothing;
        let smoother = self.smoother.get_or_insert_with(|| Smoother::from_def(def));
        smoother.set(def);
        smoother.apply(&raw).to_vec()
    }
}

impl Widget for VisualizerWidget {
    fn id(&self) -> &ObjectId {
        &self.id
    }

    fn update(&mut self, ctx: &FrameContext<'_>, surface: &mut dyn RenderSurface) -> bool {
        let Some(record) = ctx.record(&self.id) else {
            return true;
        };
        let frame = WidgetBox::from(&record.common);
        let size = record.common.size;
        let spectrum = ctx.audio.frequency;

        let visual = match &record.kind {
            ObjectKind::VisualizerStraightBar(props) => {
                let values = self.smooth(&props.visualizer, spectrum);
                let slot = size.width / values.len().max(1) as f64;
                let bars = values
                    .iter()
                    .enumerate()
                    .map(|(k, &v)| Bar {
                        position: slot * (k as f64 + 0.5),
                        length: scale(v, size.height),
                    })
                    .collect();
                Visual::Bars {
                    frame,
                    color: props.visualizer.color.clone(),
                    thickness: props.visualizer_bar_thickness,
                    bars,
                }
            }
            ObjectKind::VisualizerCircularBar(props) => {
                let values = self.smooth(&props.visualizer, spectrum);
                let step = 360.0 / values.len().max(1) as f64;
                let reach = size.width.min(size.height) / 2.0 - props.visualizer_radius;
                let bars = values
                    .iter()
                    .enumerate()
                    .map(|(k, &v)| Bar {
                        position: step * k as f64,
                        length: scale(v, reach),
                    })
                    .collect();
                Visual::CircularBars {
                    frame,
                    color: props.visualizer.color.clone(),
                    thickness: props.visualizer_bar_thickness,
                    radius: props.visualizer_radius,
                    bars,
                }
            }
            ObjectKind::VisualizerStraightWave(props) => {
                let values = self.smooth(&props.visualizer, spectrum);
                Visual::Wave {
                    frame,
                    color: props.visualizer.color.clone(),
                    path: wave_path(&values, size).to_svg(),
                }
            }
            _ => return true,
        };
        surface.apply(&self.id, visual);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widgets/visualizer.rs"]
mod tests;
