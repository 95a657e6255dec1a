// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Round-trips the lab config through a temporary directory.

use lab_app_core::config::{ConfigError, ConfigService, ConfigStore};
use lab_app_core::config_port::ConfigPort;
use lab_app_core::settings::LabConfig;
use lab_config_fs::FsConfigStore;

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsConfigStore::at(dir.path()).unwrap();
    assert!(matches!(store.load_raw("lab"), Err(ConfigError::NotFound)));
}

#[test]
fn saved_config_is_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let svc = ConfigService::new(FsConfigStore::at(dir.path()).unwrap());
    let mut cfg = LabConfig::default();
    cfg.pour.max_rate = 42.0;
    svc.save_lab(&cfg);
    assert_eq!(svc.load_lab(), Some(cfg));
    assert!(dir.path().join("lab.json").exists());
}

#[test]
fn corrupt_file_falls_back_to_none() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("lab.json"), b"][").unwrap();
    let svc = ConfigService::new(FsConfigStore::at(dir.path()).unwrap());
    assert_eq!(svc.load_lab(), None);
}

#[test]
fn nested_base_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a/b");
    let store = FsConfigStore::at(&nested).unwrap();
    assert_eq!(store.base(), nested.as_path());
    assert!(nested.is_dir());
}

#[test]
fn keys_cannot_escape_the_base() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsConfigStore::at(dir.path().join("cfg")).unwrap();
    for key in ["", "..", "../lab", "a/b", "a\\b"] {
        assert!(matches!(store.save_raw(key, b"{}"), Err(ConfigError::Other(_))));
        assert!(matches!(store.load_raw(key), Err(ConfigError::Other(_))));
    }
    assert!(!dir.path().join("lab.json").exists());
}

#[test]
fn save_replaces_whole_file_and_leaves_no_staging() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsConfigStore::at(dir.path()).unwrap();
    store.save_raw("lab", br#"{ "pour": { "max_rate": 10.0 } }"#).unwrap();
    store.save_raw("lab", b"{}").unwrap();
    assert_eq!(store.load_raw("lab").unwrap(), b"{}");
    assert_eq!(store.lab_path(), dir.path().join("lab.json"));
    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("lab.json")]);
}

#[test]
fn out_of_range_file_values_are_repaired_on_load() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("lab.json"),
        br#"{ "interaction": { "max_tilt_deg": -5.0 } }"#,
    )
    .unwrap();
    let svc = ConfigService::new(FsConfigStore::at(dir.path()).unwrap());
    let cfg = svc.load_lab().unwrap();
    assert_eq!(cfg.interaction.max_tilt_deg, 0.0);
}
