use super::*;
use serde_json::json;

fn v1_doc(objects: Value) -> Value {
    json!({
        "save_version": 1,
        "software_version_used": "0.1.0",
        "software_version_first_created": "0.1.0",
        "screen": {"width": 1280, "height": 720},
        "fps": 60,
        "objects": objects,
    })
}

fn v3_doc(objects: Value) -> Value {
    json!({
        "save_version": 3,
        "software_version_used": "0.1.3",
        "software_version_first_created": "0.1.0",
        "screen": {"width": 1280, "height": 720},
        "fps": 60,
        "audio_filename": "",
        "objects": objects,
    })
}

fn only_object(doc: &Value) -> &serde_json::Map<String, Value> {
    let objects = doc["objects"].as_object().unwrap();
    assert_eq!(objects.len(), 1);
    objects.values().next().unwrap().as_object().unwrap()
}

#[test]
fn current_version_is_a_noop() {
    let mut doc = json!({
        "save_version": CURRENT_SAVE_VERSION,
        "screen": {"width": 10, "height": 10},
        "fps": 30,
        "audio_filename": "",
        "objects": {},
    });
    let before = doc.clone();
    let mut log = MigrationLog::new();
    let report = migrate(&mut doc, &mut log).unwrap();
    assert!(report.is_noop());
    assert_eq!(doc, before);
    assert!(log.is_empty());
}

#[test]
fn future_version_fails_without_mutation() {
    let mut doc = json!({"save_version": CURRENT_SAVE_VERSION + 1, "objects": {}});
    let before = doc.clone();
    let mut log = MigrationLog::new();
    let err = migrate(&mut doc, &mut log).unwrap_err();
    assert!(matches!(
        err,
        SonoError::VersionTooNew { found, supported }
            if found == CURRENT_SAVE_VERSION + 1 && supported == CURRENT_SAVE_VERSION
    ));
    assert_eq!(doc, before);
    assert!(log.is_empty());
}

#[test]
fn every_intermediate_version_is_visited_once() {
    let mut doc = v1_doc(json!([]));
    let mut log = MigrationLog::new();
    let report = migrate(&mut doc, &mut log).unwrap();
    assert_eq!(report.applied, vec![1, 2, 3]);
    assert_eq!(report.to_version, CURRENT_SAVE_VERSION);
    assert_eq!(save_version(&doc).unwrap(), CURRENT_SAVE_VERSION);
}

#[test]
fn step_table_covers_every_version_below_current() {
    for v in 1..CURRENT_SAVE_VERSION {
        assert_eq!(STEPS.iter().filter(|(from, _)| *from == v).count(), 1);
    }
}

#[test]
fn missing_or_fractional_version_is_malformed() {
    let mut log = MigrationLog::new();
    assert!(matches!(
        migrate(&mut json!({"objects": []}), &mut log),
        Err(SonoError::MalformedSave(_))
    ));
    assert!(matches!(
        migrate(&mut json!({"save_version": 1.5, "objects": []}), &mut log),
        Err(SonoError::MalformedSave(_))
    ));
    assert!(matches!(
        migrate(&mut json!({"save_version": 0, "objects": []}), &mut log),
        Err(SonoError::MalformedSave(_))
    ));
}

#[test]
fn hex_background_becomes_color_descriptor() {
    let mut doc = v1_doc(json!([
        {"object_type": "background", "id": "bg", "name": "bg", "layer": 0, "background": "#ff0000"}
    ]));
    let mut log = MigrationLog::new();
    let out = v1::to_v2(&doc, &mut log).unwrap();
    let bg = &out["objects"][0]["background"];
    assert_eq!(bg["type"], "color");
    assert_eq!(bg["last_color"], "#ff0000");
    assert_eq!(bg["last_gradient"], "");
    assert!(log.is_empty());
    assert_eq!(out["audio_filename"], "");

    migrate(&mut doc, &mut log).unwrap();
    assert_eq!(only_object(&doc)["visual_object_type"], "shape");
}

#[test]
fn gradient_background_becomes_gradient_descriptor() {
    let doc = v1_doc(json!([
        {"object_type": "image", "id": "i", "background": "linear-gradient(90deg,red,blue)"}
    ]));
    let mut log = MigrationLog::new();
    let out = v1::to_v2(&doc, &mut log).unwrap();
    let bg = &out["objects"][0]["background"];
    assert_eq!(bg["type"], "gradient");
    assert_eq!(bg["last_gradient"], "linear-gradient(90deg,red,blue)");
    assert_eq!(bg["last_color"], "");
}

#[test]
fn unparseable_background_defaults_to_white_with_one_warning() {
    let doc = v1_doc(json!([
        {"object_type": "background", "id": "b1", "name": "sky", "background": "banana"}
    ]));
    let mut log = MigrationLog::new();
    let out = v1::to_v2(&doc, &mut log).unwrap();
    let bg = &out["objects"][0]["background"];
    assert_eq!(bg["type"], "color");
    assert_eq!(bg["last_color"], "#fff");
    assert_eq!(log.len(), 1);
    assert!(log.entries()[0].contains("sky"));
}

#[test]
fn v1_keeps_existing_audio_filename() {
    let mut doc = v1_doc(json!([]));
    doc["audio_filename"] = json!("song.mp3");
    let out = v1::to_v2(&doc, &mut MigrationLog::new()).unwrap();
    assert_eq!(out["audio_filename"], "song.mp3");
}

#[test]
fn bar_timer_grows_by_twice_the_border() {
    let mut doc = v3_doc(json!([{
        "object_type": "timer", "type": "bar", "id": "t1", "name": "timer",
        "x": 10, "y": 40, "width": 100, "height": 20, "border_thickness": 5,
        "border_to_bar_space": 2, "color": "#fff"
    }]));
    migrate(&mut doc, &mut MigrationLog::new()).unwrap();
    let t = only_object(&doc);
    assert_eq!(t["visual_object_type"], "timer_straight_bar");
    assert_eq!(t["size"]["width"].as_f64(), Some(110.0));
    assert_eq!(t["size"]["height"].as_f64(), Some(30.0));
    assert_eq!(t["coordinates"]["y"].as_f64(), Some(40.0));
    assert_eq!(t["border_to_bar_space"].as_f64(), Some(2.0));
}

#[test]
fn point_timer_is_recentered_on_adjusted_height() {
    let mut doc = v3_doc(json!([{
        "object_type": "timer", "type": "point", "id": "t2",
        "x": 10, "y": 40, "width": 100, "height": 20, "border_thickness": 5
    }]));
    migrate(&mut doc, &mut MigrationLog::new()).unwrap();
    let t = only_object(&doc);
    assert_eq!(t["visual_object_type"], "timer_straight_line_point");
    assert_eq!(t["size"]["height"].as_f64(), Some(30.0));
    assert_eq!(t["coordinates"]["y"].as_f64(), Some(25.0));
    assert!(t.get("border_to_bar_space").is_none());
}

#[test]
fn particle_direction_becomes_degrees() {
    let mut doc = v3_doc(json!([{
        "object_type": "particle_flow", "id": "p", "type": "directional",
        "particle_direction": std::f64::consts::FRAC_PI_2,
        "center": {"x": 5, "y": 6}, "spawn_probability": 0.5, "spawn_tests": 3
    }]));
    migrate(&mut doc, &mut MigrationLog::new()).unwrap();
    let p = only_object(&doc);
    assert_eq!(p["flow_direction"].as_f64(), Some(90.0));
    assert_eq!(p["flow_type"], "directional");
    assert_eq!(p["flow_center"]["x"], 5);
    assert_eq!(p["particle_spawn_tests"], 3);
}

#[test]
fn visualizers_split_by_discriminator() {
    let mut doc = v3_doc(json!([
        {"object_type": "visualizer", "type": "straight", "id": "a", "points_count": 10,
         "analyser_range": [0, 500], "bar_thickness": 3,
         "visualization_smoothing": {"type": "constant_decrease", "factor": 0.1}},
        {"object_type": "visualizer", "type": "straight-wave", "id": "b", "bar_thickness": 3},
        {"object_type": "visualizer", "type": "circular", "id": "c", "radius": 40}
    ]));
    migrate(&mut doc, &mut MigrationLog::new()).unwrap();
    let objects = doc["objects"].as_object().unwrap();
    assert_eq!(objects["a"]["visual_object_type"], "visualizer_straight_bar");
    assert_eq!(objects["a"]["visualizer_points_count"], 10);
    assert_eq!(objects["a"]["visualizer_bar_thickness"], 3);
    assert_eq!(objects["a"]["visualization_smoothing"]["type"], "linear_decrease");
    assert_eq!(objects["b"]["visual_object_type"], "visualizer_straight_wave");
    assert!(objects["b"].get("visualizer_bar_thickness").is_none());
    assert_eq!(objects["c"]["visual_object_type"], "visualizer_circular_bar");
    assert_eq!(objects["c"]["visualizer_radius"], 40);
}

#[test]
fn text_decoration_is_grouped() {
    let mut doc = v3_doc(json!([{
        "object_type": "text", "type": "time", "id": "x", "text": "hello", "bold": true
    }]));
    migrate(&mut doc, &mut MigrationLog::new()).unwrap();
    let t = only_object(&doc);
    assert_eq!(t["text_type"], "time");
    assert_eq!(t["text_content"], "hello");
    assert_eq!(t["text_decoration"], json!({"italic": false, "bold": true, "underline": false}));
}

#[test]
fn unknown_discriminator_aborts_without_write_back() {
    let mut doc = v1_doc(json!([
        {"object_type": "background", "id": "ok", "background": "banana"},
        {"object_type": "timer", "type": "spiral", "id": "bad"}
    ]));
    let before = doc.clone();
    let mut log = MigrationLog::new();
    let err = migrate(&mut doc, &mut log).unwrap_err();
    assert!(matches!(err, SonoError::UnknownSubtype { ref value, .. } if value == "spiral"));
    assert_eq!(doc, before);
    assert!(log.is_empty());
}

#[test]
fn unknown_object_type_is_fatal() {
    let mut doc = v3_doc(json!([{"object_type": "hologram", "id": "h"}]));
    let err = migrate(&mut doc, &mut MigrationLog::new()).unwrap_err();
    assert!(matches!(err, SonoError::UnknownObjectType { ref object_type, .. } if object_type == "hologram"));
}

#[test]
fn missing_and_duplicate_ids_are_reassigned_with_warnings() {
    let mut doc = v3_doc(json!([
        {"object_type": "text", "id": "same"},
        {"object_type": "text", "id": "same"},
        {"object_type": "text"}
    ]));
    let mut log = MigrationLog::new();
    migrate(&mut doc, &mut log).unwrap();
    assert_eq!(doc["objects"].as_object().unwrap().len(), 3);
    assert_eq!(log.len(), 2);
}

#[test]
fn reassigned_ids_are_uuids_and_unique_ids_migrate_reproducibly() {
    let mut doc = v3_doc(json!([
        {"object_type": "text", "id": "same"},
        {"object_type": "text", "id": "same"},
    ]));
    let mut log = MigrationLog::new();
    migrate(&mut doc, &mut log).unwrap();
    let fresh: Vec<&String> = doc["objects"]
        .as_object()
        .unwrap()
        .keys()
        .filter(|k| k.as_str() != "same")
        .collect();
    assert_eq!(fresh.len(), 1);
    let uuid = uuid::Uuid::parse_str(fresh[0]).unwrap();
    assert_eq!(uuid.get_version_num(), 4);
    assert!(log.entries()[0].contains(fresh[0].as_str()));

    let unique = v3_doc(json!([
        {"object_type": "text", "id": "a"},
        {"object_type": "particle_flow", "id": "b", "particle_direction": 1.0},
    ]));
    let (mut first, mut second) = (unique.clone(), unique);
    migrate(&mut first, &mut MigrationLog::new()).unwrap();
    migrate(&mut second, &mut MigrationLog::new()).unwrap();
    assert_eq!(first, second);
}
