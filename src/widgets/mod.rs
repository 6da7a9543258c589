//! Live widgets: one per persisted object, redrawn once per accepted frame.
//!
//! Widgets hold only their object's ID and re-read the record from the project's object map on
//! every update, so displayed state never drifts from persisted state.

pub mod particles;
pub mod shape;
pub mod surface;
pub mod text;
pub mod timer;
pub mod visualizer;

use crate::foundation::core::{Fps, FrameIndex, Screen};
use crate::foundation::ids::ObjectId;
use crate::foundation::math::object_seed;
use crate::save::model::{ObjectKind, ObjectRecord};
use std::collections::BTreeMap;

pub use surface::{RecordingSurface, RenderSurface, Visual};

/// Read-only audio state of one frame, identical for every widget.
#[derive(Clone, Copy, Debug)]
pub struct AudioSnapshot<'a> {
    /// Log-scaled frequency magnitudes of this frame (0..=255 nominal).
    pub frequency: &'a [f64],
    /// Frequency array after the pipeline's own volume smoothing.
    pub smoothed: &'a [f64],
    pub volume: f64,
    /// `(current, total)` playback time in seconds.
    pub time: (f64, f64),
}

/// Everything a widget may read during its update.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext<'a> {
    pub frame: FrameIndex,
    pub fps: Fps,
    pub screen: Screen,
    pub objects: &'a BTreeMap<ObjectId, ObjectRecord>,
    pub audio: AudioSnapshot<'a>,
}

impl<'a> FrameContext<'a> {
    pub fn record(&self, id: &ObjectId) -> Option<&'a ObjectRecord> {
        self.objects.get(id)
    }
}

pub trait Widget {
    fn id(&self) -> &ObjectId;

    /// Apply this frame's visual state. Returns `true` once the frame is fully applied.
    fn update(&mut self, ctx: &FrameContext<'_>, surface: &mut dyn RenderSurface) -> bool;

    /// Polled by the frame gate for widgets whose last update returned `false`.
    fn is_idle(&self) -> bool {
        true
    }
}

/// Build the live widget for a record.
pub fn create_widget(id: ObjectId, record: &ObjectRecord, seed: u64) -> Box<dyn Widget> {
    match &record.kind {
        ObjectKind::Shape(_) => Box::new(shape::ShapeWidget::new(id)),
        ObjectKind::Text(_) => Box::new(text::TextWidget::new(id)),
        ObjectKind::TimerStraightBar(_) => Box::new(timer::TimerBarWidget::new(id)),
        ObjectKind::TimerStraightLinePoint(_) => Box::new(timer::TimerPointWidget::new(id)),
        ObjectKind::ParticleFlow(_) => {
            let seed = object_seed(seed, id.as_str());
            Box::new(particles::ParticleFlowWidget::new(id, seed))
        }
        ObjectKind::VisualizerStraightBar(_)
        | ObjectKind::VisualizerCircularBar(_)
        | ObjectKind::VisualizerStraightWave(_) => {
            Box::new(visualizer::VisualizerWidget::new(id))
        }
    }
}

struct Slot {
    widget: Box<dyn Widget>,
    complete: bool,
}

/// Live widgets in insertion order, with each widget's last completion flag.
#[derive(Default)]
pub struct WidgetSet {
    slots: Vec<Slot>,
}

impl std::fmt::Debug for WidgetSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

impl WidgetSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.slots.iter().any(|s| s.widget.id() == id)
    }

    /// Append a widget; a widget with the same ID is replaced in place.
    pub fn insert(&mut self, widget: Box<dyn Widget>) {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.widget.id() == widget.id()) {
            slot.widget = widget;
            slot.complete = true;
            return;
        }
        self.slots.push(Slot {
            widget,
            complete: true,
        });
    }

    pub fn remove(&mut self, id: &ObjectId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| s.widget.id() != id);
        self.slots.len() != before
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn ids(&self) -> impl Iterator<Item = &ObjectId> {
        self.slots.iter().map(|s| s.widget.id())
    }

    /// `true` when every widget's previous update has completed. Widgets that reported
    /// incomplete are re-polled through [`Widget::is_idle`].
    pub fn all_complete(&mut self) -> bool {
        let mut all = true;
        for slot in &mut self.slots {
            if !slot.complete {
                slot.complete = slot.widget.is_idle();
                all &= slot.complete;
            }
        }
        all
    }

    /// Update every widget in insertion order, recording fresh completion flags.
    pub fn update_all(
        &mut self,
        ctx: &FrameContext<'_>,
        surface: &mut dyn RenderSurface,
    ) -> Vec<bool> {
        let flags: Vec<bool> = self
            .slots
            .iter_mut()
            .map(|slot| {
                slot.complete = slot.widget.update(ctx, surface);
                slot.complete
            })
            .collect();
        flags
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widgets/set.rs"]
mod tests;
