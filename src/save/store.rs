//! On-disk project container: one JSON document plus an asset tree keyed by object ID.
//!
//! ```text
//! <root>/data.json
//! <root>/assets/audio/<audio_filename>
//! <root>/assets/<object_id>/background/<file>
//! ```

use crate::foundation::error::{SonoError, SonoResult};
use crate::foundation::ids::ObjectId;
use crate::save::model::ProjectSave;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

pub const DOCUMENT_FILE: &str = "data.json";
const ASSETS_DIR: &str = "assets";
const AUDIO_DIR: &str = "audio";
const BACKGROUND_DIR: &str = "background";

#[derive(Clone, Debug)]
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    /// Open (or prepare to create) a project directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn document_path(&self) -> PathBuf {
        self.root.join(DOCUMENT_FILE)
    }

    /// Read the raw save document; migration happens later.
    pub fn read_document(&self) -> SonoResult<Value> {
        read_json(&self.document_path())
    }

    pub fn write_save(&self, save: &ProjectSave) -> SonoResult<()> {
        std::fs::create_dir_all(&self.root)?;
        let f = File::create(self.document_path())?;
        serde_json::to_writer_pretty(BufWriter::new(f), save)?;
        Ok(())
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.root.join(ASSETS_DIR).join(AUDIO_DIR)
    }

    /// Absolute path of the project's audio track, `None` when no audio is attached.
    pub fn audio_path(&self, audio_filename: &str) -> Option<PathBuf> {
        (!audio_filename.is_empty()).then(|| self.audio_dir().join(audio_filename))
    }

    /// Copy an audio file into the project, replacing any previous track. Returns the stored
    /// file name.
    pub fn import_audio(&self, src: &Path) -> SonoResult<String> {
        let name = file_name(src)?;
        let dir = self.audio_dir();
        empty_dir(&dir)?;
        std::fs::copy(src, dir.join(&name))?;
        tracing::info!(file = %name, "imported audio");
        Ok(name)
    }

    pub fn object_dir(&self, id: &ObjectId) -> PathBuf {
        self.root.join(ASSETS_DIR).join(id.as_str())
    }

    /// Copy a background image for an object. Returns the path relative to the project root, as
    /// stored in `background.last_image`.
    pub fn import_background_image(&self, id: &ObjectId, src: &Path) -> SonoResult<String> {
        if id.is_empty() {
            return Err(SonoError::MissingArgument("object id"));
        }
        let name = file_name(src)?;
        let dir = self.object_dir(id).join(BACKGROUND_DIR);
        empty_dir(&dir)?;
        std::fs::copy(src, dir.join(&name))?;
        Ok(format!("{ASSETS_DIR}/{id}/{BACKGROUND_DIR}/{name}"))
    }

    /// Remove every asset owned by an object. Missing directories are not an error.
    pub fn remove_object_assets(&self, id: &ObjectId) -> SonoResult<()> {
        let dir = self.object_dir(id);
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

pub fn read_json(path: &Path) -> SonoResult<Value> {
    let f = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(f))?)
}

fn file_name(src: &Path) -> SonoResult<String> {
    src.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
        .ok_or_else(|| SonoError::invalid_field("path", format!("'{}' has no file name", src.display())))
}

fn empty_dir(dir: &Path) -> SonoResult<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/save/store.rs"]
mod tests;
