use assert_cmd::Command;
use predicates::prelude::*;
use serde_yaml::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn ducatify() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ducatify"));
    cmd.env_remove("DUCATIFY_LOG")
        .env_remove("DUCATIFY_LOG_OUTPUT")
        .env_remove("RUST_LOG")
        .env_remove("DUCATIFY_RELEASE_VERSION");
    cmd
}

fn load_yaml(bytes: &[u8]) -> Value {
    serde_yaml::from_slice(bytes).unwrap()
}

fn find_named<'a>(items: &'a Value, name: &str) -> &'a Value {
    items
        .as_sequence()
        .unwrap()
        .iter()
        .find(|item| item["name"].as_str() == Some(name))
        .unwrap_or_else(|| panic!("missing expected element {}", name))
}

fn transformed_fixture() -> Value {
    let output = ducatify()
        .arg("--diego")
        .arg(fixture("skeleton_vanilla.yml"))
        .arg("--cf-creds")
        .arg(fixture("cf_creds.yml"))
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    load_yaml(&output.stdout)
}

#[test]
fn test_leaves_deployment_configuration_intact() {
    let vanilla = load_yaml(&fs::read(fixture("skeleton_vanilla.yml")).unwrap());
    let actual = transformed_fixture();

    let keys = |value: &Value| {
        let mut keys: Vec<String> = value
            .as_mapping()
            .unwrap()
            .keys()
            .map(|key| key.as_str().unwrap().to_string())
            .collect();
        keys.sort();
        keys
    };
    assert_eq!(keys(&actual), keys(&vanilla));

    for key in ["name", "networks", "update", "resource_pools"] {
        assert_eq!(actual[key], vanilla[key], "{} changed", key);
    }
}

#[test]
fn test_grafts_ducati_onto_the_fixture() {
    let actual = transformed_fixture();

    let ducati = find_named(&actual["releases"], "ducati");
    assert_eq!(ducati["version"].as_str(), Some("latest"));
    assert_eq!(actual["releases"].as_sequence().unwrap().len(), 5);

    let jobs = &actual["jobs"];
    assert_eq!(jobs[1]["name"].as_str(), Some("ducati_db"));
    assert_eq!(
        jobs[1]["networks"][0]["static_ips"][0].as_str(),
        Some("10.244.16.40")
    );

    for cell in ["cell_z1", "cell_z2"] {
        let templates = find_named(jobs, cell)["templates"].as_sequence().unwrap();
        assert_eq!(templates.last().unwrap()["name"].as_str(), Some("ducati"));
    }

    let colocated = find_named(jobs, "colocated_z1");
    assert_eq!(colocated["templates"].as_sequence().unwrap().len(), 4);
    assert_eq!(colocated["properties"]["metron_agent"]["zone"].as_str(), Some("z1"));

    let bridge = find_named(jobs, "cc_bridge_z1");
    assert_eq!(
        bridge["properties"]["route_registrar"]["routes"][0]["uris"][0].as_str(),
        Some("connet.bosh-lite.com")
    );
    assert_eq!(
        bridge["properties"]["nats"],
        actual["properties"]["diego"]["route_emitter"]["nats"]
    );

    let errand = jobs.as_sequence().unwrap().last().unwrap();
    assert_eq!(errand["name"].as_str(), Some("ducati-acceptance"));

    let creds = load_yaml(&fs::read(fixture("cf_creds.yml")).unwrap());
    assert_eq!(actual["properties"]["acceptance-with-cf"], creds);
}

#[test]
fn test_json_output() {
    let output = ducatify()
        .arg("--diego")
        .arg(fixture("skeleton_vanilla.yml"))
        .arg("--system-domain")
        .arg("example.com")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["jobs"][1]["name"], "ducati_db");
    assert!(json["properties"].get("acceptance-with-cf").is_none());
}

#[test]
fn test_writes_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("diego-ducati.yml");

    ducatify()
        .arg("--diego")
        .arg(fixture("skeleton_vanilla.yml"))
        .arg("--cf-creds")
        .arg(fixture("cf_creds.yml"))
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = load_yaml(&fs::read(&out).unwrap());
    assert_eq!(written["jobs"][1]["name"].as_str(), Some("ducati_db"));
}

#[test]
fn test_config_file_changes_release_version() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("ducatify.toml");
    fs::write(&config, "release_version = \"0.9.1\"\n").unwrap();

    let output = ducatify()
        .arg("--diego")
        .arg(fixture("skeleton_vanilla.yml"))
        .arg("--cf-creds")
        .arg(fixture("cf_creds.yml"))
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());

    let actual = load_yaml(&output.stdout);
    assert_eq!(
        find_named(&actual["releases"], "ducati")["version"].as_str(),
        Some("0.9.1")
    );
}

#[test]
fn test_requires_diego_manifest() {
    ducatify()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--diego"));
}

#[test]
fn test_failed_transform_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("diego.yml");
    fs::write(
        &manifest,
        "releases: []\njobs:\n- name: brain_z1\n  templates: []\nnetworks:\n- name: diego1\n  subnets:\n  - static: [10.0.0.2 - 10.0.0.9]\n",
    )
    .unwrap();
    let out = temp_dir.path().join("out.yml");

    ducatify()
        .arg("--diego")
        .arg(&manifest)
        .arg("-o")
        .arg(&out)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "transforming: adding ducati_db job: anchor job database_z1 not found",
        ));
    assert!(!out.exists());
}

#[test]
fn test_cc_bridge_needs_a_system_domain() {
    ducatify()
        .arg("--diego")
        .arg(fixture("skeleton_vanilla.yml"))
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "missing system domain for route registration",
        ));
}

#[test]
fn test_cf_creds_without_api() {
    let temp_dir = TempDir::new().unwrap();
    let creds = temp_dir.path().join("cf_creds.yml");
    fs::write(&creds, "admin_user: admin\n").unwrap();

    ducatify()
        .arg("--diego")
        .arg(fixture("skeleton_vanilla.yml"))
        .arg("--cf-creds")
        .arg(&creds)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "getting system domain: missing expected config in cfCreds: api",
        ));
}

#[test]
fn test_unreadable_manifest() {
    ducatify()
        .arg("--diego")
        .arg(fixture("does_not_exist.yml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("reading diego manifest"));
}

#[test]
fn test_help_lists_inputs() {
    ducatify()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--cf-creds"))
        .stdout(predicate::str::contains("--system-domain"))
        .stdout(predicate::str::contains("Example:"))
        .stdout(predicate::str::contains("DUCATIFY_DB_PASSWORD"))
        .stdout(predicate::str::contains("DUCATIFY_LOG_OUTPUT"));
}

#[test]
fn test_aborted_step_reports_the_chain_once() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("diego.yml");
    fs::write(&manifest, "releases: not-a-list\njobs: []\n").unwrap();

    let output = ducatify().arg("--diego").arg(&manifest).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("panicked at"), "stderr: {}", stderr);
    let chain = "transforming: updating releases: step aborted: input type not sequence: string";
    assert_eq!(stderr.matches(chain).count(), 1, "stderr: {}", stderr);
    assert_eq!(stderr.matches("step aborted").count(), 1, "stderr: {}", stderr);
}

#[test]
fn test_successful_run_is_silent_on_stderr() {
    let output = ducatify()
        .arg("--diego")
        .arg(fixture("skeleton_vanilla.yml"))
        .arg("--cf-creds")
        .arg(fixture("cf_creds.yml"))
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(
        output.stderr.is_empty(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_reads_json_inputs() {
    let temp_dir = TempDir::new().unwrap();
    let vanilla = load_yaml(&fs::read(fixture("skeleton_vanilla.yml")).unwrap());
    let manifest = temp_dir.path().join("diego.json");
    fs::write(&manifest, serde_json::to_vec(&vanilla).unwrap()).unwrap();
    let creds = temp_dir.path().join("cf_creds.json");
    fs::write(&creds, r#"{"api": "api.json.example.com"}"#).unwrap();

    let output = ducatify()
        .arg("--diego")
        .arg(&manifest)
        .arg("--cf-creds")
        .arg(&creds)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let actual = load_yaml(&output.stdout);
    let bridge = find_named(&actual["jobs"], "cc_bridge_z1");
    assert_eq!(
        bridge["properties"]["route_registrar"]["routes"][0]["uris"][0].as_str(),
        Some("connet.json.example.com")
    );
}

#[test]
fn test_malformed_json_manifest_is_a_decode_error() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("diego.json");
    fs::write(&manifest, "{\"jobs\": [").unwrap();

    ducatify()
        .arg("--diego")
        .arg(&manifest)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("reading diego manifest"))
        .stderr(predicate::str::contains("unmarshalling json"));
}
