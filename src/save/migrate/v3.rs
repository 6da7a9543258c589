use crate::foundation::error::{SonoError, SonoResult};
use crate::foundation::ids::ObjectId;
use crate::foundation::math::rad_to_deg;
use crate::save::log::MigrationLog;
use crate::save::migrate::{legacy_label, legacy_objects};
use serde_json::{Map, Value, json};

/// v3 → v4: object list becomes an ID-keyed map, dual-purpose types split into concrete kinds.
pub(super) fn to_v4(doc: &Value, log: &mut MigrationLog) -> SonoResult<Value> {
    let mut out = doc
        .as_object()
        .cloned()
        .ok_or_else(|| SonoError::malformed("save document must be a JSON object"))?;

    let mut objects = Map::new();
    for (i, record) in legacy_objects(doc)?.iter().enumerate() {
        let obj = record
            .as_object()
            .ok_or_else(|| SonoError::malformed(format!("object #{i} is not a JSON object")))?;
        let label = legacy_label(obj, i);

        let converted = convert_record(obj, &label, log)?;

        let id = match obj.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() && !objects.contains_key(id) => id.to_owned(),
            Some(id) if !id.is_empty() => {
                let fresh = ObjectId::random().to_string();
                log.push(format!("{label}: duplicate id {id}, reassigned to {fresh}"));
                fresh
            }
            _ => {
                let fresh = ObjectId::random().to_string();
                log.push(format!("{label}: missing id, assigned {fresh}"));
                fresh
            }
        };
        objects.insert(id, converted);
    }
    out.insert("objects".to_owned(), Value::Object(objects));

    Ok(Value::Object(out))
}

fn convert_record(
    obj: &Map<String, Value>,
    label: &str,
    log: &mut MigrationLog,
) -> SonoResult<Value> {
    let object_type = obj.get("object_type").and_then(Value::as_str).unwrap_or("");
    let subtype = obj.get("type").and_then(Value::as_str).unwrap_or("");

    let mut out = common_fields(obj);
    let visual_type = match object_type {
        "background" | "image" => {
            copy(obj, &mut out, &["background", "border_radius", "box_shadow"]);
            "shape"
        }
        "particle_flow" => {
            convert_particle_flow(obj, &mut out);
            "particle_flow"
        }
        "text" => {
            convert_text(obj, &mut out);
            "text"
        }
        "timer" => {
            let point = match subtype {
                "bar" => false,
                "point" => true,
                other => return Err(unknown_subtype(label, "timer", other)),
            };
            convert_timer(obj, &mut out, point, label, log);
            if point {
                "timer_straight_line_point"
            } else {
                "timer_straight_bar"
            }
        }
        "visualizer" => {
            let visual_type = match subtype {
                "straight" => "visualizer_straight_bar",
                "straight-wave" => "visualizer_straight_wave",
                "circular" => "visualizer_circular_bar",
                other => return Err(unknown_subtype(label, "visualizer", other)),
            };
            convert_visualizer(obj, &mut out, visual_type);
            visual_type
        }
        other => {
            return Err(SonoError::UnknownObjectType {
                object: label.to_owned(),
                object_type: other.to_owned(),
            });
        }
    };
    out.insert("visual_object_type".to_owned(), json!(visual_type));

    Ok(Value::Object(out))
}

fn unknown_subtype(label: &str, object_type: &str, value: &str) -> SonoError {
    SonoError::UnknownSubtype {
        object: label.to_owned(),
        object_type: object_type.to_owned(),
        field: "type",
        value: value.to_owned(),
    }
}

fn common_fields(obj: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    copy(obj, &mut out, &["name", "layer", "rotation", "svg_filter"]);

    let x = obj.get("x").cloned().unwrap_or(json!(0));
    let y = obj.get("y").cloned().unwrap_or(json!(0));
    out.insert("coordinates".to_owned(), json!({ "x": x, "y": y }));

    // Full-screen legacy backgrounds had no explicit size; validation fills it from the screen.
    if obj.contains_key("width") || obj.contains_key("height") {
        let w = obj.get("width").cloned().unwrap_or(Value::Null);
        let h = obj.get("height").cloned().unwrap_or(Value::Null);
        out.insert("size".to_owned(), json!({ "width": w, "height": h }));
    }
    out
}

fn convert_particle_flow(obj: &Map<String, Value>, out: &mut Map<String, Value>) {
    copy(obj, out, &["color", "particle_radius_range"]);
    rename(obj, out, &[
        ("type", "flow_type"),
        ("center", "flow_center"),
        ("spawn_probability", "particle_spawn_probability"),
        ("spawn_tests", "particle_spawn_tests"),
    ]);
    if let Some(rad) = obj.get("particle_direction").and_then(Value::as_f64) {
        out.insert(
            "flow_direction".to_owned(),
            json!(rad_to_deg(rad).round()),
        );
    }
}

fn convert_text(obj: &Map<String, Value>, out: &mut Map<String, Value>) {
    copy(obj, out, &["font_size", "color", "text_align", "text_shadow"]);
    rename(obj, out, &[("type", "text_type"), ("text", "text_content")]);

    let flag = |key: &str| obj.get(key).and_then(Value::as_bool).unwrap_or(false);
    out.insert(
        "text_decoration".to_owned(),
        json!({
            "italic": flag("italic"),
            "bold": flag("bold"),
            "underline": flag("underline"),
        }),
    );
}

fn convert_timer(
    obj: &Map<String, Value>,
    out: &mut Map<String, Value>,
    point: bool,
    label: &str,
    log: &mut MigrationLog,
) {
    copy(obj, out, &["color", "border_thickness", "border_radius", "box_shadow"]);
    if !point {
        copy(obj, out, &["border_to_bar_space"]);
    }

    let num = |key: &str| obj.get(key).and_then(Value::as_f64);
    let (Some(width), Some(height), Some(border)) =
        (num("width"), num("height"), num("border_thickness"))
    else {
        log.push(format!(
            "{label}: timer size or border thickness missing, border adjustment skipped"
        ));
        return;
    };

    let width = width + 2.0 * border;
    let height = height + 2.0 * border;
    out.insert("size".to_owned(), json!({ "width": width, "height": height }));

    if point {
        let x = num("x").unwrap_or(0.0);
        let y = num("y").unwrap_or(0.0) - height / 2.0;
        out.insert("coordinates".to_owned(), json!({ "x": x, "y": y }));
    }
}

fn convert_visualizer(obj: &Map<String, Value>, out: &mut Map<String, Value>, visual_type: &str) {
    copy(obj, out, &["color", "border_radius", "box_shadow"]);
    rename(obj, out, &[
        ("points_count", "visualizer_points_count"),
        ("analyser_range", "visualizer_analyzer_range"),
    ]);
    if visual_type != "visualizer_straight_wave" {
        rename(obj, out, &[("bar_thickness", "visualizer_bar_thickness")]);
    }
    if visual_type == "visualizer_circular_bar" {
        rename(obj, out, &[("radius", "visualizer_radius")]);
    }

    if let Some(Value::Object(smoothing)) = obj.get("visualization_smoothing") {
        let mut smoothing = smoothing.clone();
        if smoothing.get("type").and_then(Value::as_str) == Some("constant_decrease") {
            smoothing.insert("type".to_owned(), json!("linear_decrease"));
        }
        out.insert(
            "visualization_smoothing".to_owned(),
            Value::Object(smoothing),
        );
    }
}

fn copy(src: &Map<String, Value>, dst: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        if let Some(v) = src.get(*key) {
            dst.insert((*key).to_owned(), v.clone());
        }
    }
}

fn rename(src: &Map<String, Value>, dst: &mut Map<String, Value>, pairs: &[(&str, &str)]) {
    for (from, to) in pairs {
        if let Some(v) = src.get(*from) {
            dst.insert((*to).to_owned(), v.clone());
        }
    }
}
