use assert_cmd::{Command, cargo_bin_cmd};
use predicates::prelude::PredicateBooleanExt;
use predicates::prelude::predicate;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use testing::{Foundation, ISSUER, mount_foundation, mount_uaa};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn migrator() -> Command {
    let mut cmd = cargo_bin_cmd!("cc-to-perm-migrator");
    cmd.env_remove("RUST_LOG")
        .env_remove("MIGRATOR_DRY_RUN")
        .env_remove("MIGRATOR_LOG_LEVEL")
        .env_remove("MIGRATOR_CC_CLIENT_SECRET")
        .env_remove("MIGRATOR_REQUEST_TIMEOUT_SECONDS");
    cmd
}

struct Environment {
    uaa: MockServer,
    cc: MockServer,
    perm: MockServer
}

impl Environment {
    async fn start() -> Self {
        Self {
            uaa: MockServer::start().await,
            cc: MockServer::start().await,
            perm: MockServer::start().await
        }
    }

    fn config_yaml(&self, client_scopes: &str) -> String {
        format!(
            r#"
log_level: info
uaa:
  url: {uaa}
cloud_controller:
  url: {cc}
  client_id: perm-migrator
  client_secret: secret
  client_scopes: {client_scopes}
perm:
  hostname: 127.0.0.1
  port: {perm_port}
"#,
            uaa = self.uaa.uri(),
            cc = self.cc.uri(),
            perm_port = self.perm.address().port()
        )
    }
}

fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

async fn mount_perm(server: &MockServer, roles: u64, assignments: u64) {
    Mock::given(method("POST"))
        .and(path("/roles"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"name": "role"})))
        .expect(roles)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/role-assignments"))
        .respond_with(ResponseTemplate::new(201))
        .expect(assignments)
        .mount(server)
        .await;
}

mod usage {
    use super::*;

    #[test]
    fn test_help_lists_subcommands() {
        migrator()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"))
            .stdout(predicate::str::contains("migrate"))
            .stdout(predicate::str::contains("inventory"));
    }

    #[test]
    fn test_migrate_help_shows_flags() {
        migrator()
            .args(["migrate", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--config-file-path"))
            .stdout(predicate::str::contains("--dry-run"));
    }

    #[test]
    fn test_config_file_path_is_required() {
        migrator()
            .arg("migrate")
            .assert()
            .failure()
            .stderr(predicate::str::contains("--config-file-path"));
    }

    #[test]
    fn test_missing_config_file() {
        migrator()
            .args(["migrate", "--config-file-path", "/nonexistent/config.yml"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to load configuration"))
            .stderr(predicate::str::contains("failed to load configuration"));
    }
}

mod migrate {
    use super::*;

    #[tokio::test]
    async fn test_rejects_config_without_client_scopes() {
        let env = Environment::start().await;
        let (_dir, path) = write_config(&env.config_yaml("[]"));

        migrator()
            .args(["migrate", "--config-file-path"])
            .arg(&path)
            .assert()
            .failure()
            .stderr(predicate::str::contains("must request client scopes"));
    }

    #[tokio::test]
    async fn test_dry_run() {
        let env = Environment::start().await;
        mount_uaa(&env.uaa, Some(ISSUER)).await;
        mount_foundation(&env.cc).await;
        mount_perm(&env.perm, 0, 0).await;
        let (_dir, path) = write_config(&env.config_yaml("[cloud_controller.admin_read_only]"));

        migrator()
            .args(["migrate", "--dry-run", "--config-file-path"])
            .arg(&path)
            .assert()
            .success()
            .stderr(predicate::str::contains(
                "DRY-RUN; ROLE ASSIGNMENTS WILL NOT BE MIGRATED\nReport\n"
            ))
            .stderr(predicate::str::contains("Number of role assignments: 5\n"))
            .stderr(predicate::str::contains("Total errors: 0\n"))
            .stderr(predicate::str::contains("DRY-RUN; ROLE ASSIGNMENTS WERE NOT MIGRATED"));
    }

    #[tokio::test]
    async fn test_migrates_into_perm() {
        let env = Environment::start().await;
        mount_uaa(&env.uaa, Some(ISSUER)).await;
        mount_foundation(&env.cc).await;
        mount_perm(
            &env.perm,
            Foundation::ROLES_CREATED as u64,
            Foundation::ROLES_ASSIGNED as u64
        )
        .await;
        let (_dir, path) = write_config(&env.config_yaml("[cloud_controller.admin_read_only]"));

        migrator()
            .args(["migrate", "--config-file-path"])
            .arg(&path)
            .assert()
            .success()
            .stderr(predicate::str::contains("Number of role assignments: 5\n"))
            .stderr(predicate::str::contains("DRY-RUN").not());
    }

    #[tokio::test]
    async fn test_blank_perm_ca_keeps_plain_http() {
        let env = Environment::start().await;
        mount_uaa(&env.uaa, Some(ISSUER)).await;
        mount_foundation(&env.cc).await;
        mount_perm(
            &env.perm,
            Foundation::ROLES_CREATED as u64,
            Foundation::ROLES_ASSIGNED as u64
        )
        .await;
        let config = format!(
            "{}  ca_cert: \"\"\n",
            env.config_yaml("[cloud_controller.admin_read_only]")
        );
        let (_dir, path) = write_config(&config);

        migrator()
            .args(["migrate", "--config-file-path"])
            .arg(&path)
            .assert()
            .success()
            .stderr(predicate::str::contains("Total errors: 0\n"));
    }

    #[tokio::test]
    async fn test_fails_without_oidc_issuer() {
        let env = Environment::start().await;
        mount_uaa(&env.uaa, None).await;
        mount_foundation(&env.cc).await;
        mount_perm(&env.perm, 0, 0).await;
        let (_dir, path) = write_config(&env.config_yaml("[cloud_controller.admin_read_only]"));

        migrator()
            .args(["migrate", "--config-file-path"])
            .arg(&path)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("failed-to-get-issuer-from-oidc-provider"))
            .stderr(predicate::str::contains("Report").not());
    }

    #[tokio::test]
    async fn test_fails_on_invalid_ca_content() {
        let env = Environment::start().await;
        let config = env
            .config_yaml("[cloud_controller.admin_read_only]")
            .replace("uaa:\n", "uaa:\n  ca_cert_path: not-a-certificate\n");
        let (_dir, path) = write_config(&config);

        migrator()
            .args(["migrate", "--config-file-path"])
            .arg(&path)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("CA certificate"));
    }
}

mod inventory {
    use super::*;

    #[tokio::test]
    async fn test_counts_assignments_without_perm() {
        let env = Environment::start().await;
        mount_uaa(&env.uaa, None).await;
        mount_foundation(&env.cc).await;
        mount_perm(&env.perm, 0, 0).await;
        let (_dir, path) = write_config(&env.config_yaml("[cloud_controller.admin_read_only]"));

        migrator()
            .args(["inventory", "--config-file-path"])
            .arg(&path)
            .assert()
            .success()
            .stderr(predicate::str::contains(format!(
                "Number of role assignments: {}\n",
                Foundation::ASSIGNMENTS
            )));
    }
}
