use std::path::PathBuf;

use ir_battleship::{LinkConfig, SessionConfig};

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ir-battleship-{}-{}.json", name, std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn defaults_match_the_hardware_timing() {
    let config = SessionConfig::default();
    assert_eq!(config.link.loop_rate, 300);
    assert_eq!(config.link.send_cadence(), 15);
    assert_eq!(config.link.watchdog_ticks, 60);
    assert_eq!(config.link.max_resends, 5);
    assert_eq!(config.link.confirm_burst, 3);
    assert_eq!(config.result_timeout_ticks, 10_000);
}

#[test]
fn cadence_never_drops_to_zero() {
    let link = LinkConfig {
        loop_rate: 10,
        send_rate: 0,
        ..LinkConfig::default()
    };
    assert_eq!(link.send_cadence(), 10);
    let link = LinkConfig {
        loop_rate: 10,
        send_rate: 100,
        ..LinkConfig::default()
    };
    assert_eq!(link.send_cadence(), 1);
}

#[test]
fn partial_json_keeps_defaults() {
    let path = write_temp("partial", r#"{ "banner_ticks": 5, "link": { "max_resends": 2 } }"#);
    let config = SessionConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.banner_ticks, 5);
    assert_eq!(config.link.max_resends, 2);
    assert_eq!(config.result_timeout_ticks, 10_000);
    assert_eq!(config.link.watchdog_ticks, 60);
}

#[test]
fn config_round_trips_through_json() {
    let config = SessionConfig {
        result_timeout_ticks: 42,
        ..SessionConfig::default()
    };
    let path = write_temp("full", &serde_json::to_string(&config).unwrap());
    let loaded = SessionConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, config);
}

#[test]
fn bad_config_files_are_errors() {
    let missing = std::env::temp_dir().join("ir-battleship-does-not-exist.json");
    let err = SessionConfig::from_json_file(&missing).unwrap_err();
    assert!(err.to_string().contains("Failed to read config"));

    let path = write_temp("invalid", "{ banner_ticks: ");
    let err = SessionConfig::from_json_file(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(err.to_string().contains("Invalid config"));
}
