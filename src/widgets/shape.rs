use super::surface::{Visual, WidgetBox};
use super::{FrameContext, RenderSurface, Widget};
use crate::foundation::ids::ObjectId;
use crate::save::model::ObjectKind;

/// Static shape with a CSS-style background; redrawn from its record every frame.
pub struct ShapeWidget {
    id: ObjectId,
}

impl ShapeWidget {
    pub fn new(id: ObjectId) -> Self {
        Self { id }
    }
}

impl Widget for ShapeWidget {
    fn id(&self) -> &ObjectId {
        &self.id
    }

    fn update(&mut self, ctx: &FrameContext<'_>, surface: &mut dyn RenderSurface) -> bool {
        let Some(record) = ctx.record(&self.id) else {
            return true;
        };
        let ObjectKind::Shape(props) = &record.kind else {
            return true;
        };
        surface.apply(
            &self.id,
            Visual::Shape {
                frame: WidgetBox::from(&record.common),
                background: props.background.clone(),
                border_radius: props.border_radius.clone(),
                box_shadow: props.box_shadow.clone(),
            },
        );
        true
    }
}
