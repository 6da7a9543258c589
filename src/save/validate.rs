//! Current-version validation.
//!
//! Every persisted field is read through a validity predicate. A missing or invalid value is
//! replaced by a fallback (the previous value during a merge, the documented default otherwise)
//! and a warning is logged. Only structural problems abort a load.

use crate::foundation::core::{Fps, Point, Screen, Size};
use crate::foundation::error::{SonoError, SonoResult};
use crate::foundation::ids::ObjectId;
use crate::save::log::MigrationLog;
use crate::save::migrate::{CURRENT_SAVE_VERSION, save_version};
use crate::save::model::{
    BackgroundDef, CommonProps, ObjectKind, ObjectRecord, ParticleFlowProps, ProjectSave,
    ShapeProps, SmoothingDef, TextProps, TimerBarProps, TimerPointProps, VisualizerBarProps,
    VisualizerCircularProps, VisualizerProps, VisualizerWaveProps,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Read a migrated document into the typed model.
#[tracing::instrument(skip(doc, log))]
pub fn read_save(doc: &Value, log: &mut MigrationLog) -> SonoResult<ProjectSave> {
    let version = save_version(doc)?;
    if version != CURRENT_SAVE_VERSION {
        return Err(SonoError::malformed(format!(
            "expected save version {CURRENT_SAVE_VERSION}, got {version}"
        )));
    }
    let root = doc
        .as_object()
        .ok_or_else(|| SonoError::malformed("save document must be a JSON object"))?;

    let mut top = FieldReader::new("project".to_owned(), root, None, log);
    let screen = top.field("screen", Screen::default(), |s: &Screen| s.is_valid());
    let fps = top.field("fps", 60u32, |f: &u32| (1..=Fps::MAX).contains(f));
    let audio_filename = top.field("audio_filename", String::new(), |s: &String| {
        is_bare_file_name(s)
    });
    let software_version_used = top.quiet_field("software_version_used", String::new());
    let software_version_first_created =
        top.quiet_field("software_version_first_created", String::new());

    let raw_objects = match root.get("objects") {
        Some(Value::Object(m)) => m,
        Some(_) => return Err(SonoError::malformed("objects must be a map keyed by id")),
        None => return Err(SonoError::malformed("missing objects")),
    };

    let mut objects = BTreeMap::new();
    for (id, value) in raw_objects {
        let record = read_record(id, value, screen, None, log)?;
        objects.insert(ObjectId::new(id.clone()), record);
    }

    Ok(ProjectSave {
        save_version: version,
        software_version_used,
        software_version_first_created,
        screen,
        fps,
        audio_filename,
        objects,
    })
}

/// A file name with no directory part; the empty name means "no audio".
pub fn is_bare_file_name(name: &str) -> bool {
    !name.contains(['/', '\\']) && name != "." && name != ".."
}

/// Read one object record.
///
/// `fallback` is the record's previous, already valid, JSON form: invalid fields then keep their
/// previous value instead of reverting to the default.
pub fn read_record(
    id: &str,
    value: &Value,
    screen: Screen,
    fallback: Option<&Value>,
    log: &mut MigrationLog,
) -> SonoResult<ObjectRecord> {
    let map = value
        .as_object()
        .ok_or_else(|| SonoError::malformed(format!("object {id} is not a JSON object")))?;
    let type_name = map
        .get("visual_object_type")
        .and_then(Value::as_str)
        .unwrap_or("");
    let default_kind =
        ObjectKind::default_for(type_name).ok_or_else(|| SonoError::UnknownObjectType {
            object: id.to_owned(),
            object_type: type_name.to_owned(),
        })?;

    let name = map.get("name").and_then(Value::as_str).unwrap_or("");
    let label = if name.is_empty() {
        format!("object {id}")
    } else {
        format!("object {id} ({name})")
    };
    let mut r = FieldReader::new(label, map, fallback.and_then(Value::as_object), log);

    let common = read_common(&mut r, &default_kind, screen);
    let kind = match default_kind {
        ObjectKind::Shape(d) => ObjectKind::Shape(read_shape(&mut r, d)),
        ObjectKind::ParticleFlow(d) => ObjectKind::ParticleFlow(read_particle_flow(&mut r, d)),
        ObjectKind::Text(d) => ObjectKind::Text(read_text(&mut r, d)),
        ObjectKind::TimerStraightBar(d) => ObjectKind::TimerStraightBar(read_timer_bar(&mut r, d)),
        ObjectKind::TimerStraightLinePoint(d) => {
            ObjectKind::TimerStraightLinePoint(read_timer_point(&mut r, d))
        }
        ObjectKind::VisualizerStraightBar(d) => {
            ObjectKind::VisualizerStraightBar(VisualizerBarProps {
                visualizer: read_visualizer(&mut r, d.visualizer),
                visualizer_bar_thickness: r.field(
                    "visualizer_bar_thickness",
                    d.visualizer_bar_thickness,
                    non_negative,
                ),
            })
        }
        ObjectKind::VisualizerCircularBar(d) => {
            ObjectKind::VisualizerCircularBar(VisualizerCircularProps {
                visualizer: read_visualizer(&mut r, d.visualizer),
                visualizer_bar_thickness: r.field(
                    "visualizer_bar_thickness",
                    d.visualizer_bar_thickness,
                    non_negative,
                ),
                visualizer_radius: r.field("visualizer_radius", d.visualizer_radius, non_negative),
            })
        }
        ObjectKind::VisualizerStraightWave(d) => {
            ObjectKind::VisualizerStraightWave(VisualizerWaveProps {
                visualizer: read_visualizer(&mut r, d.visualizer),
            })
        }
    };

    Ok(ObjectRecord { common, kind })
}

fn read_common(r: &mut FieldReader<'_>, kind: &ObjectKind, screen: Screen) -> CommonProps {
    let d = CommonProps::default();
    let default_size = match kind {
        ObjectKind::Shape(_) => Size::new(f64::from(screen.width), f64::from(screen.height)),
        _ => d.size,
    };
    CommonProps {
        name: r.field("name", d.name, |_| true),
        layer: r.field("layer", d.layer, |_| true),
        coordinates: r.field("coordinates", d.coordinates, |p: &Point| {
            p.x.is_finite() && p.y.is_finite()
        }),
        size: r.field("size", default_size, |s: &Size| {
            s.width.is_finite() && s.height.is_finite() && s.width >= 0.0 && s.height >= 0.0
        }),
        rotation: r.field("rotation", d.rotation, finite),
        svg_filter: r.field("svg_filter", d.svg_filter, |_| true),
    }
}

fn read_shape(r: &mut FieldReader<'_>, d: ShapeProps) -> ShapeProps {
    ShapeProps {
        background: r.field("background", d.background, |b: &BackgroundDef| {
            !b.size.is_empty() && !b.repeat.is_empty()
        }),
        border_radius: r.field("border_radius", d.border_radius, |_| true),
        box_shadow: r.field("box_shadow", d.box_shadow, |_| true),
    }
}

fn read_particle_flow(r: &mut FieldReader<'_>, d: ParticleFlowProps) -> ParticleFlowProps {
    ParticleFlowProps {
        color: r.field("color", d.color, non_empty),
        particle_radius_range: r.field(
            "particle_radius_range",
            d.particle_radius_range,
            |[min, max]: &[f64; 2]| min.is_finite() && max.is_finite() && 0.0 <= *min && min <= max,
        ),
        flow_type: r.field("flow_type", d.flow_type, |_| true),
        flow_center: r.field("flow_center", d.flow_center, |p: &Point| {
            p.x.is_finite() && p.y.is_finite()
        }),
        flow_direction: r.field("flow_direction", d.flow_direction, finite),
        particle_spawn_probability: r.field(
            "particle_spawn_probability",
            d.particle_spawn_probability,
            unit,
        ),
        particle_spawn_tests: r.field("particle_spawn_tests", d.particle_spawn_tests, |n: &u32| {
            *n <= ParticleFlowProps::MAX_SPAWN_TESTS
        }),
    }
}

fn read_text(r: &mut FieldReader<'_>, d: TextProps) -> TextProps {
    TextProps {
        text_type: r.field("text_type", d.text_type, |_| true),
        text_content: r.field("text_content", d.text_content, |_| true),
        font_size: r.field("font_size", d.font_size, |f: &f64| {
            f.is_finite() && *f > 0.0
        }),
        color: r.field("color", d.color, non_empty),
        text_decoration: r.field("text_decoration", d.text_decoration, |_| true),
        text_align: r.field("text_align", d.text_align, |_| true),
        text_shadow: r.field("text_shadow", d.text_shadow, |_| true),
    }
}

fn read_timer_bar(r: &mut FieldReader<'_>, d: TimerBarProps) -> TimerBarProps {
    TimerBarProps {
        color: r.field("color", d.color, non_empty),
        border_to_bar_space: r.field("border_to_bar_space", d.border_to_bar_space, non_negative),
        border_thickness: r.field("border_thickness", d.border_thickness, non_negative),
        border_radius: r.field("border_radius", d.border_radius, |_| true),
        box_shadow: r.field("box_shadow", d.box_shadow, |_| true),
    }
}

fn read_timer_point(r: &mut FieldReader<'_>, d: TimerPointProps) -> TimerPointProps {
    TimerPointProps {
        color: r.field("color", d.color, non_empty),
        border_thickness: r.field("border_thickness", d.border_thickness, non_negative),
        border_radius: r.field("border_radius", d.border_radius, |_| true),
        box_shadow: r.field("box_shadow", d.box_shadow, |_| true),
    }
}

fn read_visualizer(r: &mut FieldReader<'_>, d: VisualizerProps) -> VisualizerProps {
    VisualizerProps {
        color: r.field("color", d.color, non_empty),
        visualizer_points_count: r.field("visualizer_points_count", d.visualizer_points_count, |n: &u32| {
            *n >= 1
        }),
        visualizer_analyzer_range: r.field(
            "visualizer_analyzer_range",
            d.visualizer_analyzer_range,
            |[lo, hi]: &[u32; 2]| lo < hi && *hi <= VisualizerProps::MAX_BIN,
        ),
        visualization_smoothing: r.field(
            "visualization_smoothing",
            d.visualization_smoothing,
            |s: &SmoothingDef| unit(&s.factor),
        ),
        border_radius: r.field("border_radius", d.border_radius, |_| true),
        box_shadow: r.field("box_shadow", d.box_shadow, |_| true),
    }
}

fn finite(v: &f64) -> bool {
    v.is_finite()
}

fn non_negative(v: &f64) -> bool {
    v.is_finite() && *v >= 0.0
}

fn unit(v: &f64) -> bool {
    (0.0..=1.0).contains(v)
}

#[allow(clippy::ptr_arg)]
fn non_empty(s: &String) -> bool {
    !s.trim().is_empty()
}

/// Reads typed fields out of one JSON object, logging every substitution.
pub(crate) struct FieldReader<'a> {
    label: String,
    map: &'a Map<String, Value>,
    fallback: Option<&'a Map<String, Value>>,
    log: &'a mut MigrationLog,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(
        label: String,
        map: &'a Map<String, Value>,
        fallback: Option<&'a Map<String, Value>>,
        log: &'a mut MigrationLog,
    ) -> Self {
        Self {
            label,
            map,
            fallback,
            log,
        }
    }

    fn parse<T: DeserializeOwned>(
        map: &Map<String, Value>,
        key: &str,
        valid: &impl Fn(&T) -> bool,
    ) -> Option<T> {
        let t = T::deserialize(map.get(key)?).ok()?;
        valid(&t).then_some(t)
    }

    pub(crate) fn field<T>(&mut self, key: &str, default: T, valid: impl Fn(&T) -> bool) -> T
    where
        T: DeserializeOwned + Serialize,
    {
        if let Some(t) = Self::parse(self.map, key, &valid) {
            return t;
        }

        let (value, source) = match self.fallback.and_then(|m| Self::parse(m, key, &valid)) {
            Some(prev) => (prev, "previous value"),
            None => (default, "default"),
        };
        let shown = serde_json::to_string(&value).unwrap_or_default();
        let problem = if self.map.contains_key(key) {
            "invalid"
        } else {
            "missing"
        };
        self.log.push(format!(
            "{}: {problem} {key}, using {source} {shown}",
            self.label
        ));
        value
    }

    /// Like [`Self::field`] but without a warning; for provenance fields that drive no logic.
    pub(crate) fn quiet_field<T: DeserializeOwned>(&mut self, key: &str, default: T) -> T {
        Self::parse(self.map, key, &|_: &T| true).unwrap_or(default)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/save/validate.rs"]
mod tests;
