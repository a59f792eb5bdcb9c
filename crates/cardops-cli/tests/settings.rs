use std::path::PathBuf;

use cardops_cli::settings::Settings;

#[test]
fn explicit_settings_file_is_loaded() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("cardops.toml");
    std::fs::write(
        &path,
        "[submit]\ntimeout_secs = 15\n\n[export]\noutput_dir = \"/srv/exports\"\n",
    )
    .expect("write settings");

    let settings = Settings::load(Some(&path)).expect("load settings");
    assert_eq!(settings.submit.timeout_secs, 15);
    assert_eq!(
        settings.export.output_dir,
        Some(PathBuf::from("/srv/exports"))
    );
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = Settings::load(Some(&dir.path().join("absent.toml"))).expect_err("missing file");
    assert!(format!("{err:#}").contains("absent.toml"));
}

#[test]
fn malformed_file_names_its_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[submit\n").expect("write settings");
    let err = Settings::load(Some(&path)).expect_err("malformed");
    assert!(format!("{err:#}").contains("broken.toml"));
}
