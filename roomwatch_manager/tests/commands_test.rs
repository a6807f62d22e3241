// Command entry points that need no terminal interaction
use roomwatch_core::ports::{IdentityProvider, Permission};
use roomwatch_core::config::StorePaths;
use roomwatch_core::MonitorConfig;
use roomwatch_library::FileIdentity;
use roomwatch_manager::commands::{self, dashboard::DashboardOptions};
use std::sync::Arc;

fn options() -> DashboardOptions {
    DashboardOptions {
        tui: false,
        simulate: false,
        snapshot: None,
        probe: false,
        notifications: Permission::Denied,
        seed: Some(1),
        mute: true,
    }
}

#[test]
fn test_logout_and_whoami() {
    let dir = tempfile::tempdir().unwrap();
    let identity = FileIdentity::open(dir.path()).unwrap();

    commands::auth::run_whoami(&identity).unwrap();
    identity.create_account("warden@hostel.test", "secret1").unwrap();
    commands::auth::run_whoami(&identity).unwrap();

    commands::auth::run_logout(&identity).unwrap();
    assert!(identity.current_session().is_none());
    // Logging out twice is not an error
    commands::auth::run_logout(&identity).unwrap();
}

#[test]
fn test_probe_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");
    std::fs::write(&path, r#"{"SensorData":{"temperature":24}}"#).unwrap();

    commands::probe::run_probe(&path, false).unwrap();
    commands::probe::run_probe(&path, true).unwrap();
    assert!(commands::probe::run_probe(&dir.path().join("missing.json"), false).is_err());
}

#[test]
fn test_probed_paths_keep_configured_alerts() {
    let mut config = MonitorConfig::default();
    config.paths.alerts = "/Room12/Alerts".to_string();

    commands::dashboard::apply_probed_paths(&mut config, StorePaths::under("/SensorData"));

    assert_eq!(config.paths.temperature, "/SensorData/temperature");
    assert_eq!(config.paths.humidity, "/SensorData/humidity");
    assert_eq!(config.paths.light, "/SensorData/light");
    assert_eq!(config.paths.alerts, "/Room12/Alerts");
}

#[tokio::test]
async fn test_dashboard_redirects_without_session() {
    let dir = tempfile::tempdir().unwrap();
    let identity = Arc::new(FileIdentity::open(dir.path()).unwrap());

    // Returns straight away instead of waiting on stdin
    commands::dashboard::run_dashboard(MonitorConfig::default(), identity, options())
        .await
        .unwrap();
}
