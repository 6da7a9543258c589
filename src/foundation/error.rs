/// Crate-wide result alias.
pub type SonoResult<T> = Result<T, SonoError>;

#[derive(thiserror::Error, Debug)]
pub enum SonoError {
    /// The save was written by a newer build than this one.
    #[error("save version {found} is newer than the supported version {supported}")]
    VersionTooNew { found: u64, supported: u64 },

    #[error("unknown object type '{object_type}' for object {object}")]
    UnknownObjectType { object: String, object_type: String },

    #[error("unknown {field} '{value}' for {object_type} object {object}")]
    UnknownSubtype {
        object: String,
        object_type: String,
        field: &'static str,
        value: String,
    },

    #[error("malformed save: {0}")]
    MalformedSave(String),

    #[error("invalid value for {field}: {message}")]
    InvalidFieldValue { field: String, message: String },

    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("audio error: {0}")]
    Audio(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SonoError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedSave(msg.into())
    }

    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFieldValue {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for errors that must abort a project load.
    pub fn is_fatal_load_error(&self) -> bool {
        !matches!(self, Self::InvalidFieldValue { .. })
    }
}

impl From<serde_json::Error> for SonoError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
