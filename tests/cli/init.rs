use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert!(
        parsed.get("moduleFilter").is_some(),
        "Config should have 'moduleFilter' field"
    );
    assert_eq!(parsed["groupIndex"], serde_json::json!([1]));
    assert_eq!(parsed["mangle"], Value::Bool(false));

    assert!(
        content.contains("\n  \"mangle\""),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success());
    assert_eq!(stdout(&output), "\u{2713} Created .keymanglerc.json\n");

    assert!(test.root().join(".keymanglerc.json").exists());
    let content = test.read_file(".keymanglerc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".keymanglerc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output), "error: .keymanglerc.json already exists\n");
    assert_eq!(test.read_file(".keymanglerc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file("src/app.js", r#"gettext("Hello")"#)?;

    let output = test.extract_command().args(["-o", "keys.json"]).output()?;
    assert!(
        output.status.success(),
        "Extract should work with initialized config. stderr: {}",
        stderr(&output)
    );
    assert_eq!(test.read_json("keys.json")?, serde_json::json!({ "Hello": "Hello" }));

    Ok(())
}
