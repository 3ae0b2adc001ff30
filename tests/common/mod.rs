use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// Key the spawned server is configured with; requests from `api_client`
/// carry it automatically.
pub const API_KEY: &str = "testdeck-integration-key";

const BIN: &str = "target/debug/testdeck-api";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    _child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Best-effort: put the schema in place first. Fails silently when no
        // database is reachable; DB-dependent tests skip themselves later.
        let _ = Command::new(BIN)
            .arg("migrate")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests.
        // Assumes debug profile; adjust if you run tests with --release.
        let mut cmd = Command::new(BIN);
        cmd.env("TESTDECK_API_PORT", port.to_string())
            .env("APP_ENV", "development")
            .env("SECURITY_API_KEY", API_KEY)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server can see DATABASE_URL from .env
        // (loaded by the server itself)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            _child: child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // Ready as soon as the router answers; 503 just means no DB
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// True when the spawned server has a working database behind it. Tests that
/// need real rows bail out quietly when it doesn't, so the suite still passes
/// on machines without PostgreSQL.
pub async fn database_ready(server: &TestServer) -> Result<bool> {
    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    if res.status() != StatusCode::OK {
        eprintln!("skipping: database not reachable (health returned {})", res.status());
        return Ok(false);
    }
    Ok(true)
}

/// Client with the x-api-key header preset.
pub fn api_client() -> reqwest::Client {
    let mut headers = HeaderMap::new();
    headers.insert("x-api-key", HeaderValue::from_static(API_KEY));
    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .expect("client")
}

/// Client without credentials, for exercising the key gate itself.
pub fn anonymous_client() -> reqwest::Client {
    reqwest::Client::new()
}

/// Short unique suffix so repeated runs against the same database don't
/// trip unique constraints.
pub fn unique_suffix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .subsec_nanos();
    format!("{}-{}", std::process::id(), nanos)
}
