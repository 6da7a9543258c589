use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SonoError::malformed("x")
            .to_string()
            .contains("malformed save:")
    );
    assert!(
        SonoError::invalid_field("fps", "must be > 0")
            .to_string()
            .contains("invalid value for fps:")
    );
    assert!(SonoError::audio("x").to_string().contains("audio error:"));
    assert!(
        SonoError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn version_too_new_names_both_versions() {
    let err = SonoError::VersionTooNew {
        found: 5,
        supported: 4,
    };
    let msg = err.to_string();
    assert!(msg.contains('5') && msg.contains('4'));
    assert!(err.is_fatal_load_error());
}

#[test]
fn invalid_field_is_recoverable() {
    assert!(!SonoError::invalid_field("layer", "negative").is_fatal_load_error());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SonoError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
