//! Document decoding, rendering and the YAML provider.

use std::path::Path;

use anyhow::{Context, Result, anyhow, ensure};
use figment::{Figment, Provider};
use rstest::rstest;
use serde::Deserialize;
use serde_json::json;
use tempfile::TempDir;

use super::{SaphyrYaml, load_document, parse_document, to_pretty_json, to_yaml};
use crate::TnError;

fn write(dir: &TempDir, name: &str, contents: &str) -> Result<std::path::PathBuf> {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).with_context(|| format!("write {name}"))?;
    Ok(path)
}

#[rstest]
#[case("run.yaml", "model:\n  lr: 0.1\n  layers: [8, 16]\n")]
#[case("run.yml", "model: {lr: 0.1, layers: [8, 16]}\n")]
#[case("run.json", r#"{"model": {"lr": 0.1, "layers": [8, 16]}}"#)]
#[case("run.toml", "[model]\nlr = 0.1\nlayers = [8, 16]\n")]
#[case("run.cfg", "model:\n  lr: 0.1\n  layers: [8, 16]\n")]
fn formats_follow_the_extension(#[case] name: &str, #[case] contents: &str) -> Result<()> {
    let dir = TempDir::new()?;
    let path = write(&dir, name, contents)?;
    let doc = load_document(&path).map_err(|err| anyhow!(err.to_string()))?;
    ensure!(
        doc == json!({"model": {"lr": 0.1, "layers": [8, 16]}}),
        "unexpected document from {name}: {doc}"
    );
    Ok(())
}

#[rstest]
fn missing_files_report_their_path() -> Result<()> {
    let err = load_document(Path::new("definitely/not/here.yaml"))
        .err()
        .context("loading a missing file must fail")?;
    match err.as_ref() {
        TnError::File { path, .. } => {
            ensure!(path.ends_with("here.yaml"), "unexpected path {}", path.display());
        }
        other => return Err(anyhow!("unexpected error: {other:?}")),
    }
    Ok(())
}

#[rstest]
fn decode_failures_report_their_path() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write(&dir, "broken.json", "{\"model\": ")?;
    let err = load_document(&path).err().context("decoding must fail")?;
    ensure!(
        matches!(err.as_ref(), TnError::File { .. }),
        "unexpected error: {err:?}"
    );
    ensure!(err.to_string().contains("broken.json"), "path missing from {err}");
    Ok(())
}

#[rstest]
#[case("flag: yes", json!({"flag": "yes"}))]
#[case("flag: on", json!({"flag": "on"}))]
#[case("flag: true", json!({"flag": true}))]
#[case("", json!(null))]
fn yaml_booleans_are_strict(#[case] text: &str, #[case] expected: serde_json::Value) -> Result<()> {
    let doc = parse_document(text).map_err(|err| anyhow!(err.to_string()))?;
    ensure!(doc == expected, "unexpected document: {doc}");
    Ok(())
}

#[rstest]
#[case("model: [")]
#[case("a: 1\na: 2")]
#[case("a: 1\n---\nb: 2")]
fn invalid_yaml_is_a_parse_error(#[case] text: &str) -> Result<()> {
    let err = parse_document(text).err().context("parsing must fail")?;
    ensure!(
        matches!(err.as_ref(), TnError::Parse(_)),
        "unexpected error: {err:?}"
    );
    Ok(())
}

#[rstest]
fn rendered_yaml_decodes_to_the_same_tree() -> Result<()> {
    let doc = json!({
        "_sweep_": "tn.sweep.grid",
        "model": {"lr": 0.001, "name": "resnet", "layers": [{"units": 8}, null]},
        "flag": "yes",
    });
    let text = to_yaml(&doc).map_err(|err| anyhow!(err.to_string()))?;
    let decoded = parse_document(&text).map_err(|err| anyhow!(err.to_string()))?;
    ensure!(decoded == doc, "round trip changed the tree:\n{text}");
    Ok(())
}

#[rstest]
fn pretty_json_is_indented() -> Result<()> {
    let text = to_pretty_json(&json!({"model": {"lr": 0.1}}))
        .map_err(|err| anyhow!(err.to_string()))?;
    ensure!(text.contains("\n  \"model\": {\n    \"lr\": 0.1"), "got {text}");
    Ok(())
}

#[derive(Debug, Deserialize, PartialEq)]
struct Settings {
    verbose: bool,
    greeting: String,
}

#[rstest]
fn provider_reads_strict_yaml() -> Result<()> {
    let figment = Figment::from(SaphyrYaml::string(".tn.yaml", "verbose: true\ngreeting: yes\n"));
    let settings: Settings = figment.extract().map_err(|err| anyhow!(err.to_string()))?;
    ensure!(
        settings
            == Settings {
                verbose: true,
                greeting: "yes".to_owned(),
            },
        "unexpected settings {settings:?}"
    );
    Ok(())
}

#[rstest]
fn provider_selects_a_section() -> Result<()> {
    let yaml = "settings:\n  verbose: false\n  greeting: hi\nother: 1\n";
    let figment = Figment::from(SaphyrYaml::string(".tn.yaml", yaml).section("settings"));
    let settings: Settings = figment.extract().map_err(|err| anyhow!(err.to_string()))?;
    ensure!(settings.greeting == "hi", "unexpected settings {settings:?}");
    ensure!(
        figment.find_value("other").is_err(),
        "keys outside the section must not leak"
    );
    Ok(())
}

#[rstest]
#[case("")]
#[case("other: 1\n")]
#[case("settings:\n")]
fn provider_treats_missing_sections_as_empty(#[case] yaml: &str) -> Result<()> {
    let figment = Figment::from(SaphyrYaml::string(".tn.yaml", yaml).section("settings"));
    let data = figment.data().map_err(|err| anyhow!(err.to_string()))?;
    ensure!(
        data.values().all(figment::value::Dict::is_empty),
        "expected no values, got {data:?}"
    );
    Ok(())
}

#[rstest]
fn provider_reports_malformed_files() -> Result<()> {
    let figment = Figment::from(SaphyrYaml::string(".tn.yaml", "settings: ["));
    let err = figment
        .extract::<serde_json::Value>()
        .err()
        .context("parsing must fail")?;
    ensure!(err.to_string().contains(".tn.yaml"), "path missing from {err}");
    Ok(())
}
