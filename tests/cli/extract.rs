use anyhow::Result;
use insta::assert_snapshot;
use serde_json::json;

use crate::{CliTest, stderr, stdout};

const INTL_CONFIG: &str = r#"{
    "functionPattern": { "regex": "formatMessage\\(\\{id:'([^']+)'\\}\\)" },
    "functionReplace": "formatMessage({id:'$1'})",
    "output": "i18n/keys.json"
}"#;

#[test]
fn test_extract_without_mangling() -> Result<()> {
    let test = CliTest::with_file(".keymanglerc.json", INTL_CONFIG)?;
    test.write_file(
        "src/app.js",
        "intl.formatMessage({id:'k1'});\nintl.formatMessage({id:'k1'});\n",
    )?;

    let output = test.extract_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_snapshot!(test.read_file("i18n/keys.json")?.trim_end(), @r#"
    {
      "k1": "k1"
    }
    "#);
    assert!(stdout(&output).contains("Extracted 1 key in 1 group from 1 file"));

    Ok(())
}

#[test]
fn test_extract_with_mangling() -> Result<()> {
    let test = CliTest::with_file(".keymanglerc.json", INTL_CONFIG)?;
    test.write_file(
        "src/app.js",
        "formatMessage({id:'a'}); formatMessage({id:'b'}); formatMessage({id:'a'});",
    )?;

    let output = test.extract_command().arg("--mangle").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_snapshot!(test.read_file("i18n/keys.json")?.trim_end(), @r#"
    {
      "0": "a",
      "1": "b"
    }
    "#);

    // Dry run: sources are untouched.
    assert!(stdout(&output).contains("Would rewrite 1 file(s)"));
    assert_eq!(
        test.read_file("src/app.js")?,
        "formatMessage({id:'a'}); formatMessage({id:'b'}); formatMessage({id:'a'});"
    );

    Ok(())
}

#[test]
fn test_extract_apply_rewrites_sources() -> Result<()> {
    let test = CliTest::with_file(".keymanglerc.json", INTL_CONFIG)?;
    test.write_file("src/a.js", "formatMessage({id:'greeting'})")?;
    test.write_file("src/b.js", "x(formatMessage({id:'greeting'}))")?;

    let output = test.extract_command().args(["--mangle", "--apply"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(test.read_file("src/a.js")?, "formatMessage({id:'0'})");
    assert_eq!(test.read_file("src/b.js")?, "x(formatMessage({id:'0'}))");
    assert_eq!(test.read_json("i18n/keys.json")?, json!({ "0": "greeting" }));

    Ok(())
}

#[test]
fn test_extract_per_chunk_output() -> Result<()> {
    let test = CliTest::with_file(
        ".keymanglerc.json",
        r#"{
            "functionPattern": { "regex": "t\\('([^']+)'\\)" },
            "functionReplace": "t('$1')",
            "mangle": true,
            "name": "web",
            "output": "i18n/[name]/[chunk].json",
            "chunks": [{ "name": "admin/pages", "include": ["admin/**"] }]
        }"#,
    )?;
    test.write_file("admin/users.js", "t('users.title')")?;
    test.write_file("app.js", "t('home.title'); t('users.title')")?;

    let output = test.extract_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    // Units are processed in path order: admin/users.js first.
    assert_eq!(
        test.read_json("i18n/web/admin-pages.json")?,
        json!({ "0": "users.title" })
    );
    assert_eq!(
        test.read_json("i18n/web/main.json")?,
        json!({ "1": "home.title", "2": "users.title" })
    );

    Ok(())
}

#[test]
fn test_extract_skips_filtered_modules() -> Result<()> {
    let test = CliTest::with_file(".keymanglerc.json", INTL_CONFIG)?;
    test.write_file("src/app.js", "formatMessage({id:'app'})")?;
    test.write_file("node_modules/lib/index.js", "formatMessage({id:'lib'})")?;
    test.write_file("src/view.tsx", "formatMessage({id:'view'})")?;

    let output = test.extract_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(test.read_json("i18n/keys.json")?, json!({ "app": "app" }));

    Ok(())
}

#[test]
fn test_extract_multiple_roots() -> Result<()> {
    let test = CliTest::with_file(".keymanglerc.json", INTL_CONFIG)?;
    test.write_file("client/app.js", "formatMessage({id:'x'}); formatMessage({id:'y'})")?;
    test.write_file("server/app.js", "formatMessage({id:'y'})")?;

    let output = test
        .extract_command()
        .args(["client", "server", "--mangle", "-o", "out/[name].json"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    // Numbering restarts for every run.
    assert_eq!(test.read_json("out/client.json")?, json!({ "0": "x", "1": "y" }));
    assert_eq!(test.read_json("out/server.json")?, json!({ "0": "y" }));

    let stdout = stdout(&output);
    assert!(stdout.contains("[client] Mangled 2 keys"));
    assert!(stdout.contains("[server] Mangled 1 key"));

    Ok(())
}

#[test]
fn test_extract_verbose_lists_keys() -> Result<()> {
    let test = CliTest::with_file(".keymanglerc.json", INTL_CONFIG)?;
    test.write_file("app.js", "formatMessage({id:'title'})")?;

    let output = test.extract_command().args(["-v", "--mangle"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert!(stdout(&output).contains("group main (1 key)\n  0 = title\n"));

    Ok(())
}

#[test]
fn test_extraction_error_exit_code() -> Result<()> {
    let test = CliTest::with_file(
        ".keymanglerc.json",
        r#"{
            "functionPattern": { "regex": "t\\(\"([^\"]*)\"\\)" },
            "functionReplace": "t(\"$1\")",
            "output": "keys.json"
        }"#,
    )?;
    test.write_file("app.js", r#"t("ok"); t("")"#)?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(1));

    let stdout = stdout(&output);
    assert!(stdout.contains("error: no capture group in [1] matched a key"));
    assert!(stdout.contains("--> app.js"));
    assert!(!test.root().join("keys.json").exists());

    Ok(())
}

#[test]
fn test_mangle_without_replace_is_config_error() -> Result<()> {
    let test = CliTest::with_file(".keymanglerc.json", r#"{ "mangle": true }"#)?;
    test.write_file("app.js", r#"gettext("a")"#)?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("`functionReplace` is required when `mangle` is enabled"));

    Ok(())
}

#[test]
fn test_invalid_pattern_is_config_error() -> Result<()> {
    let test = CliTest::with_file(
        ".keymanglerc.json",
        r#"{ "functionPattern": { "regex": "(unclosed" }, "functionReplace": "$1" }"#,
    )?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("invalid `functionPattern`"));

    Ok(())
}
