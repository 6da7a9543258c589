use crate::foundation::core::{Point, Screen, Size};
use crate::foundation::ids::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root persisted entity at the current save version.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectSave {
    pub save_version: u64,
    pub software_version_used: String,
    pub software_version_first_created: String,
    pub screen: Screen,
    pub fps: u32,
    pub audio_filename: String,
    pub objects: BTreeMap<ObjectId, ObjectRecord>,
}

/// One widget's persisted state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    #[serde(flatten)]
    pub common: CommonProps,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl ObjectRecord {
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommonProps {
    pub name: String,
    pub layer: u32,
    pub coordinates: Point,
    pub size: Size,
    /// Degrees, clockwise.
    pub rotation: f64,
    /// Raw SVG filter markup, empty for none.
    pub svg_filter: String,
}

impl Default for CommonProps {
    fn default() -> Self {
        Self {
            name: String::new(),
            layer: 0,
            coordinates: Point::ZERO,
            size: Size::new(400.0, 100.0),
            rotation: 0.0,
            svg_filter: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "visual_object_type", rename_all = "snake_case")]
pub enum ObjectKind {
    Shape(ShapeProps),
    ParticleFlow(ParticleFlowProps),
    Text(TextProps),
    TimerStraightBar(TimerBarProps),
    TimerStraightLinePoint(TimerPointProps),
    VisualizerStraightBar(VisualizerBarProps),
    VisualizerCircularBar(VisualizerCircularProps),
    VisualizerStraightWave(VisualizerWaveProps),
}

impl ObjectKind {
    pub const TYPE_NAMES: [&'static str; 8] = [
        "shape",
        "particle_flow",
        "text",
        "timer_straight_bar",
        "timer_straight_line_point",
        "visualizer_straight_bar",
        "visualizer_circular_bar",
        "visualizer_straight_wave",
    ];

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Shape(_) => "shape",
            Self::ParticleFlow(_) => "particle_flow",
            Self::Text(_) => "text",
            Self::TimerStraightBar(_) => "timer_straight_bar",
            Self::TimerStraightLinePoint(_) => "timer_straight_line_point",
            Self::VisualizerStraightBar(_) => "visualizer_straight_bar",
            Self::VisualizerCircularBar(_) => "visualizer_circular_bar",
            Self::VisualizerStraightWave(_) => "visualizer_straight_wave",
        }
    }

    /// Default payload for a type name; `None` for names outside the closed set.
    pub fn default_for(type_name: &str) -> Option<Self> {
        Some(match type_name {
            "shape" => Self::Shape(ShapeProps::default()),
            "particle_flow" => Self::ParticleFlow(ParticleFlowProps::default()),
            "text" => Self::Text(TextProps::default()),
            "timer_straight_bar" => Self::TimerStraightBar(TimerBarProps::default()),
            "timer_straight_line_point" => {
                Self::TimerStraightLinePoint(TimerPointProps::default())
            }
            "visualizer_straight_bar" => {
                Self::VisualizerStraightBar(VisualizerBarProps::default())
            }
            "visualizer_circular_bar" => {
                Self::VisualizerCircularBar(VisualizerCircularProps::default())
            }
            "visualizer_straight_wave" => {
                Self::VisualizerStraightWave(VisualizerWaveProps::default())
            }
            _ => return None,
        })
    }
}

// ----------------------------
// Shape
// ----------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundKind {
    #[default]
    Color,
    Gradient,
    Image,
}

/// Structured CSS background; the `last_*` slots remember every mode's value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackgroundDef {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    pub last_color: String,
    pub last_gradient: String,
    pub last_image: String,
    pub size: String,
    pub repeat: String,
}

impl Default for BackgroundDef {
    fn default() -> Self {
        Self {
            kind: BackgroundKind::Color,
            last_color: "#fff".to_owned(),
            last_gradient: String::new(),
            last_image: String::new(),
            size: "cover".to_owned(),
            repeat: "no-repeat".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeProps {
    pub background: BackgroundDef,
    pub border_radius: String,
    pub box_shadow: String,
}

// ----------------------------
// Particle flow
// ----------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowType {
    #[default]
    Radial,
    Directional,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleFlowProps {
    pub color: String,
    /// `[min, max]` radius in pixels.
    pub particle_radius_range: [f64; 2],
    pub flow_type: FlowType,
    /// Emission center, relative to the widget's top-left corner.
    pub flow_center: Point,
    /// Degrees; 0 points right, 90 points down.
    pub flow_direction: f64,
    pub particle_spawn_probability: f64,
    pub particle_spawn_tests: u32,
}

impl ParticleFlowProps {
    /// Upper bound on spawn trials per frame.
    pub const MAX_SPAWN_TESTS: u32 = 64;
}

impl Default for ParticleFlowProps {
    fn default() -> Self {
        Self {
            color: "#ffffff".to_owned(),
            particle_radius_range: [1.0, 2.0],
            flow_type: FlowType::Radial,
            flow_center: Point::new(200.0, 50.0),
            flow_direction: 0.0,
            particle_spawn_probability: 0.75,
            particle_spawn_tests: 1,
        }
    }
}

// ----------------------------
// Text
// ----------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextType {
    #[default]
    Any,
    Time,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextDecoration {
    pub italic: bool,
    pub bold: bool,
    pub underline: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextProps {
    pub text_type: TextType,
    pub text_content: String,
    pub font_size: f64,
    pub color: String,
    pub text_decoration: TextDecoration,
    pub text_align: TextAlign,
    pub text_shadow: String,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            text_type: TextType::Any,
            text_content: "text".to_owned(),
            font_size: 20.0,
            color: "#ffffff".to_owned(),
            text_decoration: TextDecoration::default(),
            text_align: TextAlign::Center,
            text_shadow: String::new(),
        }
    }
}

// ----------------------------
// Timers
// ----------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimerBarProps {
    pub color: String,
    pub border_to_bar_space: f64,
    pub border_thickness: f64,
    pub border_radius: String,
    pub box_shadow: String,
}

impl Default for TimerBarProps {
    fn default() -> Self {
        Self {
            color: "#ffffff".to_owned(),
            border_to_bar_space: 2.0,
            border_thickness: 2.0,
            border_radius: String::new(),
            box_shadow: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimerPointProps {
    pub color: String,
    pub border_thickness: f64,
    pub border_radius: String,
    pub box_shadow: String,
}

impl Default for TimerPointProps {
    fn default() -> Self {
        Self {
            color: "#ffffff".to_owned(),
            border_thickness: 2.0,
            border_radius: String::new(),
            box_shadow: String::new(),
        }
    }
}

// ----------------------------
// Visualizers
// ----------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingKind {
    #[default]
    Average,
    /// Constant-rate decay.
    LinearDecrease,
    ProportionalDecrease,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SmoothingDef {
    #[serde(rename = "type")]
    pub kind: SmoothingKind,
    pub factor: f64,
}

impl Default for SmoothingDef {
    fn default() -> Self {
        Self {
            kind: SmoothingKind::Average,
            factor: 0.7,
        }
    }
}

/// Fields shared by every visualizer kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualizerProps {
    pub color: String,
    pub visualizer_points_count: u32,
    /// Inclusive `[lo, hi]` bin range of the log-scaled spectrum.
    pub visualizer_analyzer_range: [u32; 2],
    pub visualization_smoothing: SmoothingDef,
    pub border_radius: String,
    pub box_shadow: String,
}

impl VisualizerProps {
    pub const MAX_BIN: u32 = 1023;
}

impl Default for VisualizerProps {
    fn default() -> Self {
        Self {
            color: "#ffffff".to_owned(),
            visualizer_points_count: 50,
            visualizer_analyzer_range: [0, 750],
            visualization_smoothing: SmoothingDef::default(),
            border_radius: String::new(),
            box_shadow: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualizerBarProps {
    #[serde(flatten)]
    pub visualizer: VisualizerProps,
    pub visualizer_bar_thickness: f64,
}

impl Default for VisualizerBarProps {
    fn default() -> Self {
        Self {
            visualizer: VisualizerProps::default(),
            visualizer_bar_thickness: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualizerCircularProps {
    #[serde(flatten)]
    pub visualizer: VisualizerProps,
    pub visualizer_bar_thickness: f64,
    pub visualizer_radius: f64,
}

impl Default for VisualizerCircularProps {
    fn default() -> Self {
        Self {
            visualizer: VisualizerProps::default(),
            visualizer_bar_thickness: 2.0,
            visualizer_radius: 30.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualizerWaveProps {
    #[serde(flatten)]
    pub visualizer: VisualizerProps,
}

#[cfg(test)]
#[path = "../../tests/unit/save/model.rs"]
mod tests;
