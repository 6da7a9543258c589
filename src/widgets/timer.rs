//! Playback progress timers.

use super::surface::{Visual, WidgetBox};
use super::{FrameContext, RenderSurface, Widget};
use crate::foundation::ids::ObjectId;
use crate::save::model::ObjectKind;

/// Fraction of playback elapsed, in `[0, 1]`; 0 when the total is unknown.
pub fn progress(current: f64, total: f64) -> f64 {
    if !(total.is_finite() && total > 0.0) || !current.is_finite() {
        return 0.0;
    }
    (current / total).clamp(0.0, 1.0)
}

/// Width of the filled bar inside the border and the border-to-bar gap.
pub fn inner_bar_width(outer_width: f64, border: f64, spacing: f64, progress: f64) -> f64 {
    let track = (outer_width - 2.0 * (border + spacing)).max(0.0);
    track * progress
}

pub struct TimerBarWidget {
    id: ObjectId,
}

impl TimerBarWidget {
    pub fn new(id: ObjectId) -> Self {
        Self { id }
    }
}

impl Widget for TimerBarWidget {
    fn id(&self) -> &ObjectId {
        &self.id
    }

    fn update(&mut self, ctx: &FrameContext<'_>, surface: &mut dyn RenderSurface) -> bool {
        let Some(record) = ctx.record(&self.id) else {
            return true;
        };
        let ObjectKind::TimerStraightBar(props) = &record.kind else {
            return true;
        };
        let (current, total) = ctx.audio.time;
        let bar_width = inner_bar_width(
            record.common.size.width,
            props.border_thickness,
            props.border_to_bar_space,
            progress(current, total),
        );
        surface.apply(
            &self.id,
            Visual::TimerBar {
                frame: WidgetBox::from(&record.common),
                color: props.color.clone(),
                border_thickness: props.border_thickness,
                bar_width,
            },
        );
        true
    }
}

pub struct TimerPointWidget {
    id: ObjectId,
}

impl TimerPointWidget {
    pub fn new(id: ObjectId) -> Self {
        Self { id }
    }
}

impl Widget for TimerPointWidget {
    fn id(&self) -> &ObjectId {
        &self.id
    }

    fn update(&mut self, ctx: &FrameContext<'_>, surface: &mut dyn RenderSurface) -> bool {
        let Some(record) = ctx.record(&self.id) else {
            return true;
        };
        let ObjectKind::TimerStraightLinePoint(props) = &record.kind else {
            return true;
        };
        let (current, total) = ctx.audio.time;
        // The cursor travels the line between the two border caps.
        let line = (record.common.size.width - 2.0 * props.border_thickness).max(0.0);
        let cursor_x = props.border_thickness + line * progress(current, total);
        surface.apply(
            &self.id,
            Visual::TimerPoint {
                frame: WidgetBox::from(&record.common),
                color: props.color.clone(),
                border_thickness: props.border_thickness,
                cursor_x,
            },
        );
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widgets/timer.rs"]
mod tests;
