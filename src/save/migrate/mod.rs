//! Save schema migration.
//!
//! Migration runs on the untyped JSON document: legacy shapes have no typed model. Each entry of
//! [`STEPS`] lifts a document from exactly one version to the next by re-deriving the whole object
//! collection. Steps run against a working copy, and the caller's document is only replaced once
//! every step has succeeded.

mod v1;
mod v3;

use crate::foundation::error::{SonoError, SonoResult};
use crate::save::log::MigrationLog;
use serde_json::Value;

/// The save version this build reads and writes.
pub const CURRENT_SAVE_VERSION: u64 = 4;

/// One migration step: document at `from_version` in, document at `from_version + 1` out.
pub type StepFn = fn(&Value, &mut MigrationLog) -> SonoResult<Value>;

/// Ordered `(from_version, transform)` table.
pub const STEPS: &[(u64, StepFn)] = &[(1, v1::to_v2), (2, v2_to_v3), (3, v3::to_v4)];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MigrationReport {
    pub from_version: u64,
    pub to_version: u64,
    /// Every source version a step was applied to, in order.
    pub applied: Vec<u64>,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Read `save_version` from a document.
pub fn save_version(doc: &Value) -> SonoResult<u64> {
    let v = doc
        .get("save_version")
        .ok_or_else(|| SonoError::malformed("missing save_version"))?;
    if let Some(n) = v.as_u64() {
        return Ok(n);
    }
    match v.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as u64),
        _ => Err(SonoError::malformed(format!(
            "save_version must be a non-negative integer, got {v}"
        ))),
    }
}

/// Bring `doc` up to [`CURRENT_SAVE_VERSION`], appending warnings to `log`.
///
/// On error `doc` and `log` are left untouched.
#[tracing::instrument(skip(doc, log))]
pub fn migrate(doc: &mut Value, log: &mut MigrationLog) -> SonoResult<MigrationReport> {
    let from_version = save_version(doc)?;
    if from_version > CURRENT_SAVE_VERSION {
        return Err(SonoError::VersionTooNew {
            found: from_version,
            supported: CURRENT_SAVE_VERSION,
        });
    }
    if from_version == CURRENT_SAVE_VERSION {
        return Ok(MigrationReport {
            from_version,
            to_version: from_version,
            applied: Vec::new(),
        });
    }

    let mut work = doc.clone();
    let mut work_log = MigrationLog::new();
    let mut applied = Vec::new();
    let mut version = from_version;

    while version < CURRENT_SAVE_VERSION {
        let step = STEPS
            .iter()
            .find(|(from, _)| *from == version)
            .map(|(_, f)| *f)
            .ok_or_else(|| {
                SonoError::malformed(format!("no migration registered for save version {version}"))
            })?;

        let mut next = step(&work, &mut work_log)?;
        version += 1;
        set_version(&mut next, version)?;
        tracing::debug!(from = version - 1, to = version, "applied save migration step");
        applied.push(version - 1);
        work = next;
    }

    *doc = work;
    log.extend(work_log);
    tracing::info!(from_version, to_version = version, "migrated save");
    Ok(MigrationReport {
        from_version,
        to_version: version,
        applied,
    })
}

fn set_version(doc: &mut Value, version: u64) -> SonoResult<()> {
    let obj = doc
        .as_object_mut()
        .ok_or_else(|| SonoError::malformed("save document must be a JSON object"))?;
    obj.insert("save_version".to_owned(), Value::from(version));
    Ok(())
}

/// v3 introduced a field that is populated lazily when the project is opened; there is nothing to
/// rewrite.
fn v2_to_v3(doc: &Value, _log: &mut MigrationLog) -> SonoResult<Value> {
    Ok(doc.clone())
}

/// Human-readable label for an unmigrated record, used in warnings.
pub(crate) fn legacy_label(obj: &serde_json::Map<String, Value>, index: usize) -> String {
    let name = obj.get("name").and_then(Value::as_str);
    let id = obj.get("id").and_then(Value::as_str);
    match (name, id) {
        (Some(n), Some(id)) => format!("object \"{n}\" ({id})"),
        (Some(n), None) => format!("object \"{n}\""),
        (None, Some(id)) => format!("object {id}"),
        (None, None) => format!("object #{index}"),
    }
}

/// Legacy saves before v4 store objects as an array.
pub(crate) fn legacy_objects(doc: &Value) -> SonoResult<&Vec<Value>> {
    match doc.get("objects") {
        Some(Value::Array(a)) => Ok(a),
        Some(_) => Err(SonoError::malformed(
            "objects must be an array before save version 4",
        )),
        None => Err(SonoError::malformed("missing objects")),
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/save/migrate.rs"]
mod tests;
