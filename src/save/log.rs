use crate::foundation::error::SonoResult;
use std::io::Write as _;
use std::path::Path;

/// Ordered warnings collected while migrating and validating a save.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MigrationLog {
    entries: Vec<String>,
}

/// How a finished load presents its warnings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// Hand a digest back to the caller for display.
    #[default]
    Interactive,
    /// Write entries to the application log only.
    Batch,
}

impl MigrationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        tracing::debug!(%entry, "save warning");
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn extend(&mut self, other: MigrationLog) {
        self.entries.extend(other.entries);
    }

    /// Human-readable digest, one bullet per entry. `None` when there is nothing to report.
    pub fn digest(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let mut out = String::from("The project was converted with the following warnings:");
        for e in &self.entries {
            out.push_str("\n• ");
            out.push_str(e);
        }
        Some(out)
    }

    /// Persist every entry to the application log and, in interactive mode, return the digest.
    ///
    /// A `log_path` of `None` skips the file and only emits tracing events.
    pub fn report(&self, mode: ReportMode, log_path: Option<&Path>) -> SonoResult<Option<String>> {
        for e in &self.entries {
            tracing::warn!(warning = %e, "save conversion");
        }

        if let Some(path) = log_path
            && !self.entries.is_empty()
        {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            let mut f = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            for e in &self.entries {
                writeln!(f, "[save conversion] {e}")?;
            }
        }

        Ok(match mode {
            ReportMode::Interactive => self.digest(),
            ReportMode::Batch => None,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/save/log.rs"]
mod tests;
