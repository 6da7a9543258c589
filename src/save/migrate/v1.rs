use crate::foundation::error::{SonoError, SonoResult};
use crate::save::background::classify;
use crate::save::log::MigrationLog;
use crate::save::migrate::{legacy_label, legacy_objects};
use crate::save::model::BackgroundDef;
use serde_json::{Map, Value};

/// v1 → v2: structured background descriptors and a top-level `audio_filename`.
pub(super) fn to_v2(doc: &Value, log: &mut MigrationLog) -> SonoResult<Value> {
    let mut out = doc
        .as_object()
        .cloned()
        .ok_or_else(|| SonoError::malformed("save document must be a JSON object"))?;

    let objects = legacy_objects(doc)?
        .iter()
        .enumerate()
        .map(|(i, record)| convert_record(record, i, log))
        .collect::<SonoResult<Vec<_>>>()?;
    out.insert("objects".to_owned(), Value::Array(objects));

    out.entry("audio_filename")
        .or_insert_with(|| Value::String(String::new()));

    Ok(Value::Object(out))
}

fn convert_record(record: &Value, index: usize, log: &mut MigrationLog) -> SonoResult<Value> {
    let obj = record
        .as_object()
        .ok_or_else(|| SonoError::malformed(format!("object #{index} is not a JSON object")))?;
    let object_type = obj.get("object_type").and_then(Value::as_str).unwrap_or("");
    if !matches!(object_type, "background" | "image") {
        return Ok(record.clone());
    }

    let mut out: Map<String, Value> = obj.clone();
    let size = out
        .remove("background_size")
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_else(|| "cover".to_owned());
    let repeat = out
        .remove("background_repeat")
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_else(|| "no-repeat".to_owned());

    let css = obj.get("background").and_then(Value::as_str).unwrap_or("");
    let def = match classify(css) {
        Some(bg) => bg.into_def(size, repeat),
        None => {
            log.push(format!(
                "{}: unrecognised background \"{css}\", replaced with white",
                legacy_label(obj, index)
            ));
            BackgroundDef {
                size,
                repeat,
                ..BackgroundDef::default()
            }
        }
    };
    out.insert("background".to_owned(), serde_json::to_value(def)?);
    Ok(Value::Object(out))
}
