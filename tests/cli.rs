use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("aws-authenticator").unwrap();
    cmd.env_remove("AWS_PROFILE")
        .env("AWS_EC2_METADATA_DISABLED", "true");
    cmd
}

#[test]
fn version_prints_package_version() {
    for flag in ["-v", "--version"] {
        cmd()
            .arg(flag)
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}

#[test]
fn help_lists_flags() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--auth_method"))
        .stdout(predicate::str::contains("--sso_url"));
}

#[test]
fn invalid_auth_method_is_rejected() {
    cmd()
        .args(["-m", "invalid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid auth method"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn missing_auth_method_is_rejected() {
    cmd()
        .args(["-p", "default"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--auth_method"));
}

#[test]
fn abbreviated_flag_is_rejected() {
    cmd().args(["--auth_meth", "profile"]).assert().failure();
}

#[test]
fn missing_profile_reports_login_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config");
    let credentials = dir.path().join("credentials");
    std::fs::write(&config, "[default]\nregion = us-east-1\n").unwrap();
    std::fs::write(&credentials, "").unwrap();

    cmd()
        .env("AWS_CONFIG_FILE", &config)
        .env("AWS_SHARED_CREDENTIALS_FILE", &credentials)
        .env("AWS_REGION", "us-east-1")
        .args(["-m", "profile", "-p", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: AWS profile login: "))
        .stderr(predicate::function(|stderr: &str| {
            stderr.matches("AWS profile login: ").count() == 1
        }))
        .stdout(predicate::str::is_empty());
}
