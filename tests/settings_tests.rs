use class_schedule::{Settings, SettingsError};
use std::io::Write;
use std::path::Path;

fn settings_from(toml: &str) -> Result<Settings, SettingsError> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(toml.as_bytes()).unwrap();
    Settings::from_file(file.path())
}

#[test]
fn missing_file_gives_defaults() {
    let settings = Settings::from_file(Path::new("does-not-exist.toml")).unwrap();
    assert_eq!(settings.http.addr, "0.0.0.0:3000");
    assert_eq!(settings.log.level, "info");
    assert!(settings.storage.path.is_none());
    assert_eq!(settings.http_addr().unwrap().port(), 3000);
}

#[test]
fn toml_file_overrides_defaults() {
    let settings = settings_from(
        "[http]\naddr = \"127.0.0.1:8081\"\n\n[log]\nlevel = \"debug\"\n\n[storage]\npath = \"catalog.json\"\n",
    )
    .unwrap();
    assert_eq!(settings.http_addr().unwrap().port(), 8081);
    assert_eq!(settings.log.level, "debug");
    assert_eq!(
        settings.storage.path.as_deref(),
        Some(Path::new("catalog.json"))
    );
}

#[test]
fn partial_file_keeps_other_defaults() {
    let settings = settings_from("[log]\nlevel = \"warn\"\n").unwrap();
    assert_eq!(settings.log.level, "warn");
    assert_eq!(settings.http.addr, "0.0.0.0:3000");
}

#[test]
fn bad_address_is_reported() {
    assert!(matches!(
        settings_from("[http]\naddr = \"not an address\"\n"),
        Err(SettingsError::InvalidAddr { .. })
    ));
}

#[test]
fn malformed_toml_is_an_error() {
    assert!(matches!(
        settings_from("[http\naddr = "),
        Err(SettingsError::Config(_))
    ));
}
