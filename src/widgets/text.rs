use super::surface::{Visual, WidgetBox};
use super::{FrameContext, RenderSurface, Widget};
use crate::foundation::ids::ObjectId;
use crate::save::model::{ObjectKind, TextType};

pub struct TextWidget {
    id: ObjectId,
}

impl TextWidget {
    pub fn new(id: ObjectId) -> Self {
        Self { id }
    }
}

/// `m:ss` with whole seconds truncated; negative and non-finite inputs read as zero.
pub fn format_clock(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// `current | total` playback time, e.g. `1:05 | 3:20`.
pub fn format_time_pair(current: f64, total: f64) -> String {
    format!("{} | {}", format_clock(current), format_clock(total))
}

impl Widget for TextWidget {
    fn id(&self) -> &ObjectId {
        &self.id
    }

    fn update(&mut self, ctx: &FrameContext<'_>, surface: &mut dyn RenderSurface) -> bool {
        let Some(record) = ctx.record(&self.id) else {
            return true;
        };
        let ObjectKind::Text(props) = &record.kind else {
            return true;
        };
        let content = match props.text_type {
            TextType::Any => props.text_content.clone(),
            TextType::Time => {
                let (current, total) = ctx.audio.time;
                format_time_pair(current, total)
            }
        };
        surface.apply(
            &self.id,
            Visual::Text {
                frame: WidgetBox::from(&record.common),
                content,
                font_size: props.font_size,
                color: props.color.clone(),
                decoration: props.text_decoration,
                align: props.text_align,
                text_shadow: props.text_shadow.clone(),
            },
        );
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widgets/text.rs"]
mod tests;
