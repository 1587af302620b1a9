mod common;

use common::TestContext;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;

const PROXY_PARAMS: &str = r#"
[facts]
processor_count = 3

[proxy]
url = "http://fake.com"
port = 7777
username = "al"
password = "beproxyin"

[plugins]
rpm = true
"#;

#[test]
fn plan_lists_default_artifacts() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["plan", "--processor-count", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/etc/default/pulp_workers"))
        .stdout(predicate::str::contains("/etc/pulp/server.conf"))
        .stdout(predicate::str::contains("iso_importer.json"))
        .stdout(predicate::str::contains("rpm_importer.json").not());
}

#[test]
fn plan_with_every_plugin_lists_five_importers() {
    let ctx = TestContext::new();

    let output = ctx
        .cli()
        .args(["plan", "--processor-count", "2"])
        .args(["--enable", "rpm", "--enable", "puppet", "--enable", "docker", "--enable", "ostree"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let importers: Vec<&str> = stdout.lines().filter(|l| l.ends_with("_importer.json")).collect();
    assert_eq!(importers.len(), 5);
    assert!(importers[0].ends_with("/iso_importer.json"));
}

#[test]
fn plan_rejects_unknown_plugin() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["plan", "--processor-count", "2", "--enable", "deb"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown plugin 'deb'"));
}

#[test]
fn missing_processor_count_fails_validation() {
    let ctx = TestContext::new();

    ctx.cli()
        .arg("plan")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("facts.processor_count"));
}

#[test]
fn render_shows_worker_defaults_and_hides_server_config() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["render", "--processor-count", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PULP_CONCURRENCY=8"))
        .stdout(predicate::str::contains("topic_exchange").not())
        .stdout(predicate::str::contains("pass --reveal"));
}

#[test]
fn render_reveal_prints_everything() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["render", "--processor-count", "3", "--reveal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("topic_exchange: 'amq.topic'"));
}

#[test]
fn apply_writes_all_artifacts_with_modes() {
    let ctx = TestContext::new();
    let params = ctx.write_params("params.toml", PROXY_PARAMS);

    ctx.apply(&params)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created /etc/pulp/server.conf"))
        .stdout(predicate::str::contains("content changed (diff suppressed)"));

    assert!(ctx.read_staged("/etc/default/pulp_workers").contains("PULP_CONCURRENCY=3\n"));

    let importer = ctx.read_staged("/etc/pulp/server/plugins.conf.d/rpm_importer.json");
    assert!(importer.contains(r#""proxy_host": "http://fake.com","#));
    assert!(importer.contains(r#""proxy_port": 7777,"#));

    let server_mode = fs::metadata(ctx.staged("/etc/pulp/server.conf")).unwrap().permissions().mode();
    assert_eq!(server_mode & 0o7777, 0o600);
    let importer_mode = fs::metadata(ctx.staged("/etc/pulp/server/plugins.conf.d/iso_importer.json"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(importer_mode & 0o7777, 0o644);
}

#[test]
fn second_apply_is_a_no_op() {
    let ctx = TestContext::new();
    let params = ctx.write_params("params.toml", PROXY_PARAMS);

    ctx.apply(&params).assert().success();
    let before = ctx.read_staged("/etc/pulp/server.conf");

    ctx.apply(&params)
        .assert()
        .success()
        .stdout(predicate::str::contains("All 4 artifact(s) already up to date"))
        .stdout(predicate::str::contains("Created").not());
    assert_eq!(ctx.read_staged("/etc/pulp/server.conf"), before);
}

#[test]
fn apply_prints_worker_diff() {
    let ctx = TestContext::new();
    let params = ctx.write_params("params.toml", "[facts]\nprocessor_count = 3\n");
    ctx.apply(&params).assert().success();

    ctx.apply(&params)
        .args(["--processor-count", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated /etc/default/pulp_workers"))
        .stdout(predicate::str::contains("-PULP_CONCURRENCY=3"))
        .stdout(predicate::str::contains("+PULP_CONCURRENCY=5"));
}

#[test]
fn show_conf_diff_exposes_server_config_diff() {
    let ctx = TestContext::new();
    let params = ctx.write_params("params.toml", "show_conf_diff = true\n[facts]\nprocessor_count = 3\n");

    ctx.apply(&params)
        .assert()
        .success()
        .stdout(predicate::str::contains("+topic_exchange: 'amq.topic'"))
        .stdout(predicate::str::contains("diff suppressed").not());
}

#[test]
fn apply_reports_failures_and_continues() {
    let ctx = TestContext::new();
    let params = ctx.write_params("params.toml", "[facts]\nprocessor_count = 3\n");
    fs::remove_dir_all(ctx.staged("/etc/default")).unwrap();

    ctx.apply(&params)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("❌ Failed /etc/default/pulp_workers"))
        .stdout(predicate::str::contains("Created /etc/pulp/server.conf"))
        .stderr(predicate::str::contains("1 of 3 artifact(s) failed to reconcile"));
}

#[test]
fn invalid_parameters_write_nothing() {
    let ctx = TestContext::new();
    let params = ctx.write_params(
        "params.toml",
        "[facts]\nprocessor_count = 3\n[database]\nusername = \"rspec\"\n",
    );

    ctx.apply(&params)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("database.password"));
    assert!(!ctx.staged("/etc/default/pulp_workers").exists());
    assert!(!ctx.staged("/etc/pulp/server.conf").exists());
}

#[test]
fn unparsable_parameter_file_exits_with_input_error() {
    let ctx = TestContext::new();
    let params = ctx.write_params("params.toml", "[facts\nprocessor_count = 3\n");

    ctx.apply(&params).assert().code(2).stderr(predicate::str::contains("TOML parse error"));
    assert!(!ctx.staged("/etc/default/pulp_workers").exists());
}

#[test]
fn ssl_flags_render_as_lowercase_literals() {
    let ctx = TestContext::new();
    let params = ctx.write_params(
        "params.toml",
        "[facts]\nprocessor_count = 3\n[database]\nssl = true\n[tasks]\ncelery_require_ssl = true\n",
    );

    ctx.apply(&params).assert().success();

    let server = ctx.read_staged("/etc/pulp/server.conf");
    assert!(server.lines().any(|l| l == "ssl: true"));
    assert!(server.lines().any(|l| l == "celery_require_ssl: true"));
}

#[test]
fn yaml_parameter_files_are_supported() {
    let ctx = TestContext::new();
    let params = ctx.write_params(
        "params.yaml",
        "facts:\n  processor_count: 4\n  mongodb_version: '2.6.1'\ndatabase:\n  username: rspec\n  password: rsp3c4l1f3\n",
    );

    ctx.apply(&params).assert().success();

    let server = ctx.read_staged("/etc/pulp/server.conf");
    assert!(server.lines().any(|l| l == "username: rspec"));
    assert!(server.lines().any(|l| l == "password: rsp3c4l1f3"));
}
