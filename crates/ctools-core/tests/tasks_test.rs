#![allow(clippy::unwrap_used)]
// End-to-end task tests against a mocked portal.
//
// Unmocked paths answer 404, which the inspector treats as "field
// unavailable"; tests only mount what a scenario needs.

use std::path::Path;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ctools_core::{
    CommandTarget, CoreError, DeviceRef, OutputMode, ReportError, SENTINEL, STATUS_HEADER,
    Session, SessionConfig, Task, TaskOutcome, TenantSelector, TlsVerification, dispatch,
    portal_url,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn api_path(suffix: &str) -> String {
    format!("/ServicesPortal/api/{suffix}")
}

fn remote_path(tenant: &str, device: &str, suffix: &str) -> String {
    api_path(&format!("portals/{tenant}/devices/{device}/remote/{suffix}"))
}

async fn portal() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("login")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

async fn expect_logout(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path(api_path("logout")))
        .respond_with(ResponseTemplate::new(204))
        .expect(times)
        .mount(server)
        .await;
}

async fn login(server: &MockServer) -> Session {
    let config = SessionConfig {
        url: portal_url(&server.uri()).unwrap(),
        username: "admin".into(),
        password: "s3cret".to_string().into(),
        tls: TlsVerification::SystemDefaults,
        timeout: Duration::from_secs(5),
    };
    Session::login(&config).await.unwrap()
}

async fn mount_json(server: &MockServer, http_method: &str, at: String, body: serde_json::Value) {
    Mock::given(method(http_method))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_tenants(server: &MockServer, tenants: &[&str]) {
    let list: Vec<_> = tenants.iter().map(|t| json!({ "name": t })).collect();
    mount_json(server, "GET", api_path("portals"), json!(list)).await;
    for tenant in tenants {
        mount_json(
            server,
            "GET",
            api_path(&format!("portals/{tenant}")),
            json!({ "name": tenant }),
        )
        .await;
    }
}

async fn mount_devices(server: &MockServer, tenant: &str, devices: &[(&str, bool)]) {
    let list: Vec<_> = devices
        .iter()
        .map(|(name, connected)| {
            json!({ "name": name, "deviceConnectionStatus": { "connected": connected } })
        })
        .collect();
    mount_json(
        server,
        "GET",
        api_path(&format!("portals/{tenant}/devices")),
        json!(list),
    )
    .await;
    for (name, connected) in devices {
        mount_json(
            server,
            "GET",
            api_path(&format!("portals/{tenant}/devices/{name}")),
            json!({ "name": name, "deviceConnectionStatus": { "connected": connected } }),
        )
        .await;
    }
}

/// Mount a plausible set of status reads for one filer.
async fn mount_filer_status(server: &MockServer, tenant: &str, device: &str) {
    let at = |suffix: &str| remote_path(tenant, device, suffix);
    mount_json(
        server,
        "GET",
        at("proc/cloudsync/serviceStatus"),
        json!({
            "id": "Synced",
            "uploadingFiles": 3,
            "scanningFiles": 0,
            "selfVerificationScanningFiles": 1
        }),
    )
    .await;
    mount_json(server, "GET", at("status/device/runningFirmware"), json!("7.6.2031.4")).await;
    mount_json(server, "GET", at("config/logging/log2File/maxFileSizeMB"), json!(100)).await;
    mount_json(
        server,
        "GET",
        at("status/network/ports/0"),
        json!({ "ip": { "address": "10.0.0.5" } }),
    )
    .await;
    mount_json(
        server,
        "GET",
        at("proc/perfMonitor"),
        json!({
            "current": { "cpu": 12, "memUsage": 40.5 },
            "samples": [
                { "cpu": 30, "memUsage": 50 },
                { "cpu": 80, "memUsage": 45 }
            ]
        }),
    )
    .await;
}

fn read_report(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let bytes = std::fs::read(path).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"), "report must start with a BOM");
    let mut reader = csv::Reader::from_reader(&bytes[3..]);
    let header = reader.headers().unwrap().iter().map(str::to_owned).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_owned).collect())
        .collect();
    (header, rows)
}

fn status_task(output: &Path, mode: OutputMode) -> Task {
    Task::Status {
        output: output.to_path_buf(),
        mode,
        tenants: TenantSelector::All,
    }
}

// ── Status report ───────────────────────────────────────────────────

#[tokio::test]
async fn status_reports_connected_filers_only() {
    let server = portal().await;
    expect_logout(&server, 1).await;
    mount_tenants(&server, &["Acme"]).await;
    mount_devices(&server, "Acme", &[("edge1", true), ("edge2", false)]).await;
    mount_filer_status(&server, "Acme", "edge1").await;
    Mock::given(path_regex("^/ServicesPortal/api/portals/Acme/devices/edge2/remote/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("status.csv");
    let session = login(&server).await;

    let outcome = dispatch(session, status_task(&output, OutputMode::Replace))
        .await
        .unwrap();

    let TaskOutcome::Status(summary) = outcome else {
        panic!("expected a status outcome");
    };
    assert_eq!(summary.tenants_scanned, 1);
    assert_eq!(summary.rows_written, 1);
    assert!(summary.skipped.is_empty());

    let (header, rows) = read_report(&output);
    assert_eq!(header, STATUS_HEADER.to_vec());
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(row.len(), 20);
    assert_eq!(row[0], "edge1");
    assert_eq!(row[1], "Synced");
    assert_eq!(row[3], "3");
    assert_eq!(row[4], "0");
    assert_eq!(row[5], "1");
    assert_eq!(row[9], "7.6.2031.4");
    assert_eq!(row[13], "10.0.0.5");
    assert_eq!(row[17], "CPU: 12%, Memory: 40.5%");
    assert_eq!(row[18], "80%");
    assert_eq!(row[19], "50%");
}

#[tokio::test]
async fn status_uses_fallback_location_then_sentinel() {
    let server = portal().await;
    expect_logout(&server, 1).await;
    mount_tenants(&server, &["Acme"]).await;
    mount_devices(&server, "Acme", &[("edge1", true)]).await;
    mount_filer_status(&server, "Acme", "edge1").await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("status.csv");
    let session = login(&server).await;

    dispatch(session, status_task(&output, OutputMode::Replace))
        .await
        .unwrap();

    let (_, rows) = read_report(&output);
    let row = &rows[0];
    // Only the older log2File location exists on this filer.
    assert_eq!(row[7], "100");
    // Neither the debug CLI nor the debugLevel path answered.
    assert_eq!(row[6], SENTINEL);
    assert_eq!(row[8], SENTINEL);
    // Columns after the missing ones are still filled in.
    assert_eq!(row[9], "7.6.2031.4");
    assert_eq!(row[16], SENTINEL);
}

#[tokio::test]
async fn status_reads_log_setting_from_debug_cli() {
    let server = portal().await;
    expect_logout(&server, 1).await;
    mount_tenants(&server, &["Acme"]).await;
    mount_devices(&server, "Acme", &[("edge1", true)]).await;
    Mock::given(method("POST"))
        .and(path(remote_path("Acme", "edge1", "config/device")))
        .and(body_json(json!({ "name": "debugCmd", "param": "dbg le" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("error\n")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(remote_path("Acme", "edge1", "config/logging/general/debugLevel")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("info")))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("status.csv");
    let session = login(&server).await;

    dispatch(session, status_task(&output, OutputMode::Replace))
        .await
        .unwrap();

    let (_, rows) = read_report(&output);
    assert_eq!(rows[0][6], "error");
}

#[tokio::test]
async fn status_replace_is_idempotent() {
    let server = portal().await;
    expect_logout(&server, 2).await;
    mount_tenants(&server, &["Acme"]).await;
    mount_devices(&server, "Acme", &[("edge1", true)]).await;
    mount_filer_status(&server, "Acme", "edge1").await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("status.csv");

    dispatch(login(&server).await, status_task(&output, OutputMode::Replace))
        .await
        .unwrap();
    let first = std::fs::read(&output).unwrap();

    dispatch(login(&server).await, status_task(&output, OutputMode::Replace))
        .await
        .unwrap();
    let second = std::fs::read(&output).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn status_append_adds_rows_under_one_header() {
    let server = portal().await;
    expect_logout(&server, 2).await;
    mount_tenants(&server, &["Acme"]).await;
    mount_devices(&server, "Acme", &[("edge1", true)]).await;
    mount_filer_status(&server, "Acme", "edge1").await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("status.csv");

    dispatch(login(&server).await, status_task(&output, OutputMode::Replace))
        .await
        .unwrap();
    dispatch(login(&server).await, status_task(&output, OutputMode::Append))
        .await
        .unwrap();

    let (_, rows) = read_report(&output);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r[0] == "edge1"));
}

#[tokio::test]
async fn status_append_refuses_foreign_header_and_still_logs_out() {
    let server = portal().await;
    expect_logout(&server, 1).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("status.csv");
    std::fs::write(&output, "Gateway,Firmware\r\n").unwrap();

    let err = dispatch(login(&server).await, status_task(&output, OutputMode::Append))
        .await
        .unwrap_err();

    assert!(
        matches!(err, CoreError::Report(ReportError::HeaderMismatch { .. })),
        "expected header mismatch, got {err:?}"
    );
}

#[tokio::test]
async fn status_skips_filer_on_permission_error() {
    let server = portal().await;
    expect_logout(&server, 1).await;
    mount_tenants(&server, &["Acme"]).await;
    mount_devices(&server, "Acme", &[("edge1", true), ("edge3", true)]).await;
    mount_filer_status(&server, "Acme", "edge1").await;
    Mock::given(method("GET"))
        .and(path(remote_path("Acme", "edge3", "status/device/runningFirmware")))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("status.csv");

    let outcome = dispatch(login(&server).await, status_task(&output, OutputMode::Replace))
        .await
        .unwrap();

    let TaskOutcome::Status(summary) = outcome else {
        panic!("expected a status outcome");
    };
    assert_eq!(summary.rows_written, 1);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].filer, "edge3");

    let (_, rows) = read_report(&output);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "edge1");
}

#[tokio::test]
async fn status_for_single_tenant_only_lists_that_tenant() {
    let server = portal().await;
    expect_logout(&server, 1).await;
    mount_tenants(&server, &["Acme", "Globex"]).await;
    mount_devices(&server, "Acme", &[("edge1", true)]).await;
    Mock::given(method("GET"))
        .and(path(api_path("portals/Globex/devices")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("status.csv");
    let task = Task::Status {
        output: output.clone(),
        mode: OutputMode::Replace,
        tenants: TenantSelector::Only("Acme".into()),
    };

    let outcome = dispatch(login(&server).await, task).await.unwrap();

    let TaskOutcome::Status(summary) = outcome else {
        panic!("expected a status outcome");
    };
    assert_eq!(summary.tenants_scanned, 1);
    assert_eq!(summary.rows_written, 1);
}

// ── Remote commands ─────────────────────────────────────────────────

#[tokio::test]
async fn run_command_reports_each_filer() {
    let server = portal().await;
    expect_logout(&server, 1).await;
    mount_tenants(&server, &["Acme", "Globex"]).await;
    mount_devices(&server, "Acme", &[("edge1", true)]).await;
    mount_devices(&server, "Globex", &[("edge7", true), ("edge8", false)]).await;
    Mock::given(method("POST"))
        .and(path(remote_path("Acme", "edge1", "config/device")))
        .and(body_json(json!({ "name": "debugCmd", "param": "uptime" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("up 3 days")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(remote_path("Globex", "edge7", "config/device")))
        .respond_with(ResponseTemplate::new(500).set_body_string("busy"))
        .expect(1)
        .mount(&server)
        .await;

    let task = Task::RunCommand {
        command: "uptime".into(),
        target: CommandTarget::AllFilers,
    };
    let outcome = dispatch(login(&server).await, task).await.unwrap();

    let TaskOutcome::Commands { reports } = outcome else {
        panic!("expected command reports");
    };
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].filer, "edge1");
    assert_eq!(reports[0].output.as_deref(), Some("up 3 days"));
    assert!(reports[0].is_success());
    assert_eq!(reports[1].filer, "edge7");
    assert!(!reports[1].is_success());
}

#[tokio::test]
async fn run_command_on_named_device_searches_all_tenants() {
    let server = portal().await;
    expect_logout(&server, 1).await;
    mount_tenants(&server, &["Acme", "Globex"]).await;
    mount_devices(&server, "Acme", &[("edge1", true)]).await;
    mount_devices(&server, "Globex", &[("edge7", true)]).await;
    Mock::given(method("POST"))
        .and(path(remote_path("Globex", "edge7", "config/device")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("done")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(remote_path("Acme", "edge1", "config/device")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("wrong filer")))
        .expect(0)
        .mount(&server)
        .await;

    let task = Task::RunCommand {
        command: "reboot".into(),
        target: CommandTarget::Device("edge7".into()),
    };
    let outcome = dispatch(login(&server).await, task).await.unwrap();

    let TaskOutcome::Commands { reports } = outcome else {
        panic!("expected command reports");
    };
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].tenant, "Globex");
}

// ── Single-device actions ───────────────────────────────────────────

#[tokio::test]
async fn reset_password_puts_new_password_once() {
    let server = portal().await;
    expect_logout(&server, 1).await;
    mount_tenants(&server, &["Acme"]).await;
    mount_devices(&server, "Acme", &[("edge1", true)]).await;
    Mock::given(method("PUT"))
        .and(path(remote_path("Acme", "edge1", "config/auth/users/admin/password")))
        .and(body_json(json!("N3w-pass")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let task = Task::ResetPassword {
        device: DeviceRef::new("Acme", "edge1"),
        username: "admin".into(),
        password: "N3w-pass".to_string().into(),
    };
    let outcome = dispatch(login(&server).await, task).await.unwrap();

    assert!(matches!(
        outcome,
        TaskOutcome::Applied {
            action: "reset-password",
            ..
        }
    ));
}

#[tokio::test]
async fn suspend_sync_on_missing_device_sends_nothing() {
    let server = portal().await;
    expect_logout(&server, 1).await;
    mount_tenants(&server, &["Acme"]).await;
    Mock::given(method("POST"))
        .and(path_regex("/remote/config/cloudsync$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let task = Task::SuspendSync {
        device: DeviceRef::new("Acme", "ghost"),
    };
    let err = dispatch(login(&server).await, task).await.unwrap_err();

    assert!(
        matches!(err, CoreError::DeviceNotFound { ref name, .. } if name == "ghost"),
        "expected DeviceNotFound, got {err:?}"
    );
}

#[tokio::test]
async fn enable_ssh_in_unknown_tenant_fails() {
    let server = portal().await;
    expect_logout(&server, 1).await;

    let task = Task::EnableSsh {
        device: DeviceRef::new("Nowhere", "edge1"),
        public_key: Some("ssh-ed25519 AAAA test".into()),
    };
    let err = dispatch(login(&server).await, task).await.unwrap_err();

    assert!(matches!(err, CoreError::TenantNotFound { .. }));
}

#[tokio::test]
async fn device_actions_hit_expected_endpoints() {
    let server = portal().await;
    expect_logout(&server, 5).await;
    mount_tenants(&server, &["Acme"]).await;
    mount_devices(&server, "Acme", &[("edge1", true)]).await;
    let actions = [
        (
            "config/device",
            json!({ "name": "startSSHD", "param": { "publicKey": "ssh-ed25519 AAAAC3Nz ops@lab" } }),
        ),
        ("config/cloudsync", json!({ "name": "suspend" })),
        ("config/cloudsync", json!({ "name": "unsuspend" })),
        ("config/device", json!({ "name": "stopSSHD" })),
        (
            "config/device",
            json!({ "name": "startTelnetd", "param": { "code": "1234" } }),
        ),
    ];
    for (at, body) in actions {
        Mock::given(method("POST"))
            .and(path(remote_path("Acme", "edge1", at)))
            .and(body_json(body))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
    }

    let device = || DeviceRef::new("Acme", "edge1");
    let tasks = [
        Task::EnableSsh {
            device: device(),
            public_key: Some("ssh-ed25519 AAAAC3Nz ops@lab".into()),
        },
        Task::SuspendSync { device: device() },
        Task::UnsuspendSync { device: device() },
        Task::DisableSsh { device: device() },
        Task::EnableTelnet {
            device: device(),
            code: Some("1234".into()),
        },
    ];
    for task in tasks {
        dispatch(login(&server).await, task).await.unwrap();
    }
}

#[tokio::test]
async fn rejected_login_is_authentication_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("login")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let config = SessionConfig {
        url: portal_url(&server.uri()).unwrap(),
        username: "admin".into(),
        password: "wrong".to_string().into(),
        tls: TlsVerification::SystemDefaults,
        timeout: Duration::from_secs(5),
    };
    let err = Session::login(&config).await.unwrap_err();

    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
}
