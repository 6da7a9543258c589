use super::property::Property;
use crate::foundation::core::{Fps, Screen};
use crate::foundation::error::{SonoError, SonoResult};
use crate::foundation::ids::ObjectId;
use crate::pipeline::Scene;
use crate::save::log::{MigrationLog, ReportMode};
use crate::save::migrate::{CURRENT_SAVE_VERSION, migrate};
use crate::save::model::{BackgroundKind, ObjectKind, ObjectRecord, ProjectSave};
use crate::save::store::ProjectStore;
use crate::save::validate::{is_bare_file_name, read_record, read_save};
use crate::widgets::{RenderSurface, WidgetSet, create_widget};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Provenance string written into saves.
pub const SOFTWARE_VERSION: &str = concat!("sonoglyph ", env!("CARGO_PKG_VERSION"));

/// Options for loading a project.
#[derive(Clone, Debug, Default)]
pub struct LoadOpts {
    /// Whether the warning digest is handed back or only logged.
    pub report: ReportMode,
    /// Application log file that receives every conversion warning.
    pub log_path: Option<PathBuf>,
    /// Global seed for widget randomness.
    pub seed: u64,
}

/// Result of [`Project::load`].
#[derive(Debug)]
pub struct Loaded {
    pub project: Project,
    pub log: MigrationLog,
    /// User-facing warning summary; `None` in batch mode or when nothing was converted.
    pub digest: Option<String>,
}

fn valid_fps(fps: &u32) -> Result<(), String> {
    Fps::new(*fps).map(|_| ()).map_err(|e| e.to_string())
}

fn valid_screen(screen: &Screen) -> Result<(), String> {
    if screen.is_valid() {
        Ok(())
    } else {
        Err("width and height must be positive".to_owned())
    }
}

#[allow(clippy::ptr_arg)]
fn valid_audio_filename(name: &String) -> Result<(), String> {
    if is_bare_file_name(name) {
        Ok(())
    } else {
        Err("must be a bare file name".to_owned())
    }
}

/// The in-memory project: persisted objects, settings, and their live widgets.
///
/// Objects are only mutated through the create/delete/merge entry points, which keep the widget
/// set in step with the object map.
#[derive(Debug)]
pub struct Project {
    software_version_first_created: String,
    fps: Property<u32>,
    screen: Property<Screen>,
    audio_filename: Property<String>,
    objects: BTreeMap<ObjectId, ObjectRecord>,
    widgets: WidgetSet,
    store: Option<ProjectStore>,
    seed: u64,
}

impl Project {
    /// Empty project at the current save version.
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::build(
            SOFTWARE_VERSION.to_owned(),
            Fps::default().get(),
            Screen::default(),
            String::new(),
            BTreeMap::new(),
            seed,
        )
    }

    fn build(
        first_created: String,
        fps: u32,
        screen: Screen,
        audio_filename: String,
        objects: BTreeMap<ObjectId, ObjectRecord>,
        seed: u64,
    ) -> Self {
        let fps = Property::with_fallback("fps", fps, Fps::default().get(), valid_fps);
        let screen = Property::with_fallback("screen", screen, Screen::default(), valid_screen);
        let audio_filename = Property::with_fallback(
            "audio_filename",
            audio_filename,
            String::new(),
            valid_audio_filename,
        );

        let mut widgets = WidgetSet::new();
        for (id, record) in &objects {
            widgets.insert(create_widget(id.clone(), record, seed));
        }
        Self {
            software_version_first_created: first_created,
            fps,
            screen,
            audio_filename,
            objects,
            widgets,
            store: None,
            seed,
        }
    }

    /// Build a session from a validated save.
    pub fn from_save(save: ProjectSave, seed: u64) -> Self {
        Self::build(
            save.software_version_first_created,
            save.fps,
            save.screen,
            save.audio_filename,
            save.objects,
            seed,
        )
    }

    /// Migrate and validate a raw save document.
    ///
    /// Fatal errors (future version, unknown type or subtype, structural damage) abort with
    /// nothing applied; everything else is repaired and recorded in the returned log.
    #[tracing::instrument(skip(doc, opts))]
    pub fn from_document(mut doc: Value, opts: &LoadOpts) -> SonoResult<(Self, MigrationLog)> {
        let mut log = MigrationLog::new();
        let report = migrate(&mut doc, &mut log)?;
        let save = read_save(&doc, &mut log)?;
        tracing::info!(
            from = report.from_version,
            to = report.to_version,
            objects = save.objects.len(),
            warnings = log.len(),
            "project loaded"
        );
        Ok((Self::from_save(save, opts.seed), log))
    }

    /// Load a project directory and report its conversion warnings.
    pub fn load(dir: impl Into<PathBuf>, opts: &LoadOpts) -> SonoResult<Loaded> {
        let store = ProjectStore::new(dir);
        let doc = store.read_document()?;
        let (mut project, log) = Self::from_document(doc, opts)?;
        let digest = log.report(opts.report, opts.log_path.as_deref())?;
        project.store = Some(store);
        Ok(Loaded {
            project,
            log,
            digest,
        })
    }

    /// Write the project into `dir` and keep using it as the project's store.
    pub fn save(&mut self, dir: impl Into<PathBuf>) -> SonoResult<()> {
        let store = ProjectStore::new(dir);
        store.write_save(&self.to_save())?;
        tracing::info!(dir = %store.root().display(), "project saved");
        self.store = Some(store);
        Ok(())
    }

    /// Snapshot of the persisted state at the current save version.
    pub fn to_save(&self) -> ProjectSave {
        ProjectSave {
            save_version: CURRENT_SAVE_VERSION,
            software_version_used: SOFTWARE_VERSION.to_owned(),
            software_version_first_created: self.software_version_first_created.clone(),
            screen: *self.screen.get(),
            fps: *self.fps.get(),
            audio_filename: self.audio_filename.get().clone(),
            objects: self.objects.clone(),
        }
    }

    pub fn store(&self) -> Option<&ProjectStore> {
        self.store.as_ref()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn objects(&self) -> &BTreeMap<ObjectId, ObjectRecord> {
        &self.objects
    }

    pub fn object(&self, id: &str) -> Option<&ObjectRecord> {
        self.objects.get(id)
    }

    pub fn widgets(&self) -> &WidgetSet {
        &self.widgets
    }

    pub fn fps(&self) -> Fps {
        Fps::new(*self.fps.get()).unwrap_or_default()
    }

    pub fn fps_mut(&mut self) -> &mut Property<u32> {
        &mut self.fps
    }

    pub fn screen(&self) -> Screen {
        *self.screen.get()
    }

    pub fn screen_mut(&mut self) -> &mut Property<Screen> {
        &mut self.screen
    }

    pub fn audio_filename(&self) -> &str {
        self.audio_filename.get()
    }

    pub fn audio_filename_mut(&mut self) -> &mut Property<String> {
        &mut self.audio_filename
    }

    /// Absolute path of the attached audio track, when both a store and a track exist.
    pub fn audio_path(&self) -> Option<PathBuf> {
        self.store.as_ref()?.audio_path(self.audio_filename.get())
    }

    /// Everything one pipeline frame needs from the project.
    pub fn scene(&mut self) -> Scene<'_> {
        Scene {
            objects: &self.objects,
            widgets: &mut self.widgets,
            screen: *self.screen.get(),
            fps: Fps::new(*self.fps.get()).unwrap_or_default(),
        }
    }

    /// Add an object under a fresh random ID and start its widget.
    ///
    /// The record goes through the same field validation as a loaded save; substituted fields are
    /// reported in the returned log.
    pub fn create_object(&mut self, record: ObjectRecord) -> SonoResult<(ObjectId, MigrationLog)> {
        let mut id = ObjectId::random();
        while self.objects.contains_key(&id) {
            id = ObjectId::random();
        }

        let mut log = MigrationLog::new();
        let raw = serde_json::to_value(&record)?;
        let record = read_record(id.as_str(), &raw, self.screen(), None, &mut log)?;

        self.widgets.insert(create_widget(id.clone(), &record, self.seed));
        tracing::info!(%id, kind = record.type_name(), warnings = log.len(), "object created");
        self.objects.insert(id.clone(), record);
        Ok((id, log))
    }

    /// Remove an object, its widget, its visual, and its assets. Returns `false` for an unknown ID.
    ///
    /// Assets go first: if they cannot be removed the object stays fully in place.
    pub fn delete_object(
        &mut self,
        id: &ObjectId,
        surface: &mut dyn RenderSurface,
    ) -> SonoResult<bool> {
        if id.is_empty() {
            return Err(SonoError::MissingArgument("object id"));
        }
        if !self.objects.contains_key(id) {
            return Ok(false);
        }
        if let Some(store) = &self.store {
            store.remove_object_assets(id)?;
        }
        self.objects.remove(id);
        self.widgets.remove(id);
        surface.detach(id);
        tracing::info!(%id, "object deleted");
        Ok(true)
    }

    /// Deep-merge a partial JSON patch into an object and revalidate it.
    ///
    /// Invalid patched values keep the object's previous value and are reported in the returned
    /// log. The object's type never changes through a merge.
    pub fn merge_object(&mut self, id: &ObjectId, patch: &Value) -> SonoResult<MigrationLog> {
        if id.is_empty() {
            return Err(SonoError::MissingArgument("object id"));
        }
        let current = self
            .objects
            .get(id)
            .ok_or_else(|| SonoError::invalid_field("id", format!("no object {id}")))?;
        let previous = serde_json::to_value(current)?;
        let type_name = current.type_name();

        let mut log = MigrationLog::new();
        let mut merged = previous.clone();
        deep_merge(&mut merged, patch);
        if let Some(map) = merged.as_object_mut()
            && map.get("visual_object_type").and_then(Value::as_str) != Some(type_name)
        {
            log.push(format!(
                "object {id}: visual_object_type cannot change, keeping {type_name}"
            ));
            map.insert("visual_object_type".to_owned(), Value::from(type_name));
        }

        let screen = self.screen();
        let record = read_record(id.as_str(), &merged, screen, Some(&previous), &mut log)?;
        self.objects.insert(id.clone(), record);
        tracing::debug!(%id, warnings = log.len(), "object merged");
        Ok(log)
    }

    /// Copy a track into the project's store and make it the project's audio.
    pub fn import_audio(&mut self, src: &Path) -> SonoResult<()> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| SonoError::malformed("project has no directory yet; save it first"))?;
        let name = store.import_audio(src)?;
        self.audio_filename.set(name)?;
        Ok(())
    }

    /// Copy an image into a shape's asset folder and switch its background to it.
    pub fn import_background_image(
        &mut self,
        id: &ObjectId,
        src: &Path,
    ) -> SonoResult<MigrationLog> {
        if id.is_empty() {
            return Err(SonoError::MissingArgument("object id"));
        }
        match self.objects.get(id).map(|r| &r.kind) {
            Some(ObjectKind::Shape(_)) => {}
            Some(other) => {
                return Err(SonoError::invalid_field(
                    "background",
                    format!("{} objects have no background", other.type_name()),
                ));
            }
            None => return Err(SonoError::invalid_field("id", format!("no object {id}"))),
        }
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| SonoError::malformed("project has no directory yet; save it first"))?;
        let rel = store.import_background_image(id, src)?;
        let patch = serde_json::json!({
            "background": {"type": BackgroundKind::Image, "last_image": rel}
        });
        self.merge_object(id, &patch)
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursive object merge; `null` patch values leave the target untouched.
pub fn deep_merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(t), Value::Object(p)) => {
            for (k, v) in p {
                match t.get_mut(k) {
                    Some(existing) => deep_merge(existing, v),
                    None if !v.is_null() => {
                        t.insert(k.clone(), v.clone());
                    }
                    None => {}
                }
            }
        }
        (_, Value::Null) => {}
        (t, p) => *t = p.clone(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/session.rs"]
mod tests;
