#![cfg(feature = "serialize")]

use pretty_assertions::assert_eq;
use tagstream::{BuildConfig, IdStrategy};
use tagstream_dom::EscapeMode;

#[test]
fn config_round_trips_through_json() {
    let config = BuildConfig::default()
        .with_id_prefix("el-")
        .with_id_strategy(IdStrategy::Global)
        .with_escape(EscapeMode::Standard);

    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id_prefix": "el-",
            "id_strategy": "global",
            "escape": "standard",
        })
    );

    let back: BuildConfig = serde_json::from_value(json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn missing_fields_use_defaults() {
    let config: BuildConfig = serde_json::from_str(r#"{ "id_prefix": "x" }"#).unwrap();
    assert_eq!(config, BuildConfig::default().with_id_prefix("x"));
}
