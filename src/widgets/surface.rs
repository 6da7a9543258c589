use crate::foundation::core::{Point, Size};
use crate::foundation::ids::ObjectId;
use crate::save::model::{BackgroundDef, CommonProps, TextAlign, TextDecoration};
use std::collections::BTreeMap;

/// Placement shared by every visual.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct WidgetBox {
    pub origin: Point,
    pub size: Size,
    pub rotation: f64,
    pub layer: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub svg_filter: String,
}

impl From<&CommonProps> for WidgetBox {
    fn from(c: &CommonProps) -> Self {
        Self {
            origin: c.coordinates,
            size: c.size,
            rotation: c.rotation,
            layer: c.layer,
            svg_filter: c.svg_filter.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Bar {
    /// Horizontal center for straight bars, angle in degrees for circular bars.
    pub position: f64,
    pub length: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Dot {
    pub center: Point,
    pub radius: f64,
}

/// Fully resolved visual state of one widget for one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "visual", rename_all = "snake_case")]
pub enum Visual {
    Shape {
        frame: WidgetBox,
        background: BackgroundDef,
        border_radius: String,
        box_shadow: String,
    },
    Text {
        frame: WidgetBox,
        content: String,
        font_size: f64,
        color: String,
        decoration: TextDecoration,
        align: TextAlign,
        text_shadow: String,
    },
    TimerBar {
        frame: WidgetBox,
        color: String,
        border_thickness: f64,
        /// Width of the filled inner bar.
        bar_width: f64,
    },
    TimerPoint {
        frame: WidgetBox,
        color: String,
        border_thickness: f64,
        cursor_x: f64,
    },
    Bars {
        frame: WidgetBox,
        color: String,
        thickness: f64,
        bars: Vec<Bar>,
    },
    CircularBars {
        frame: WidgetBox,
        color: String,
        thickness: f64,
        radius: f64,
        bars: Vec<Bar>,
    },
    Wave {
        frame: WidgetBox,
        color: String,
        /// SVG path data in widget-local coordinates.
        path: String,
    },
    Particles {
        frame: WidgetBox,
        color: String,
        particles: Vec<Dot>,
    },
}

/// Rendering collaborator: receives each widget's visual once per accepted frame.
pub trait RenderSurface {
    fn apply(&mut self, id: &ObjectId, visual: Visual);

    /// Remove the widget's element; called synchronously when an object is deleted.
    fn detach(&mut self, id: &ObjectId);
}

/// Surface that keeps the latest visual per object.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    visuals: BTreeMap<ObjectId, Visual>,
    applied: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Visual> {
        self.visuals.get(id)
    }

    pub fn visuals(&self) -> &BTreeMap<ObjectId, Visual> {
        &self.visuals
    }

    /// Total number of `apply` calls received.
    pub fn applied(&self) -> u64 {
        self.applied
    }
}

impl RenderSurface for RecordingSurface {
    fn apply(&mut self, id: &ObjectId, visual: Visual) {
        self.applied += 1;
        self.visuals.insert(id.clone(), visual);
    }

    fn detach(&mut self, id: &ObjectId) {
        self.visuals.remove(id.as_str());
    }
}
