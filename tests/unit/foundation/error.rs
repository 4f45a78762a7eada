use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        VitrineError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        VitrineError::measurement("x")
            .to_string()
            .contains("measurement error:")
    );
    assert!(
        VitrineError::timeline("x")
            .to_string()
            .contains("timeline error:")
    );
    assert!(
        VitrineError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = VitrineError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: VitrineError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, VitrineError::Serde(_)));
    assert!(!err.is_measurement());
    assert!(VitrineError::measurement("zero size").is_measurement());
}
