use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_prdigest"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success(), "prdigest init failed: {}", String::from_utf8_lossy(&output.stderr));

    let config_path = dir.path().join(".prdigest.toml");
    assert!(config_path.exists(), ".prdigest.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[github]"));
    assert!(content.contains("[summary]"));

    // Everything is commented out, so it parses to the defaults
    let config: prdigest_core::PrDigestConfig = toml::from_str(&content).unwrap();
    assert_eq!(config.summary.bot_marker, "[bot]");
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".prdigest.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_prdigest"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let content = std::fs::read_to_string(dir.path().join(".prdigest.toml")).unwrap();
    assert_eq!(content, "# existing");
}
