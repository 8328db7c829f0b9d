//! # Common Test Utilities
//!
//! This module centralizes the test harness used across the `bookrec-server`
//! integration tests. It includes:
//!
//! - `TestApp`: A full application harness that spawns a real server on a random port,
//!   backed by a temporary database and a fixture catalog written to a temp directory.
//! - Helpers for registering users, logging in and minting custom tokens.

// Allow unused code because this is a test utility module, and not all
// functions might be used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use bookrec_server::{
    auth::Claims,
    config, router,
    state::{build_app_state, AppState},
};
use bookrec_test_utils::{sample_catalog, CatalogFixture};
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::{redirect::Policy, Client, Response};
use serde_json::{json, Value};
use std::{
    fs::File,
    io::Write,
    net::SocketAddr,
    time::{SystemTime, UNIX_EPOCH},
};
use tempfile::{tempdir, NamedTempFile, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const TEST_PASSWORD: &str = "password123";

// --- Full Application Test Harness ---

/// A harness for end-to-end testing of the Axum server.
///
/// This struct spawns the server on a random available port, sets up a temporary
/// SQLite database, and loads the catalog from CSV files written by a fixture.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub app_state: AppState,
    _data_dir: TempDir,
    _db_file: NamedTempFile,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server over the shared sample catalog.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_catalog(sample_catalog()).await
    }

    /// Spawns the server over a custom catalog fixture.
    pub async fn spawn_with_catalog(fixture: CatalogFixture) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let data_dir = fixture.write_temp_dir()?;
        let db_file = NamedTempFile::new()?;

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
db_url: "{}"
data_dir: "{}"
jwt_secret: "{TEST_JWT_SECRET}"
token_ttl_secs: 3600
"#,
            db_file.path().display(),
            data_dir.path().display(),
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config_path = config_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("temp path is not valid UTF-8"))?;
        let config = config::get_config(Some(config_path))?;
        let app_state = build_app_state(config).await?;
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        // Redirects are asserted on, not followed.
        let client = Client::builder().redirect(Policy::none()).build()?;

        Ok(Self {
            address,
            client,
            app_state: app_state_for_harness,
            _data_dir: data_dir,
            _db_file: db_file,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/register"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?)
    }

    /// Registers `username` and returns a session token for it.
    pub async fn sign_up(&self, username: &str) -> Result<String> {
        let response = self.register(username, TEST_PASSWORD).await?;
        anyhow::ensure!(
            response.status().is_success(),
            "registration failed: {}",
            response.status()
        );
        let body: Value = self.login(username, TEST_PASSWORD).await?.json().await?;
        body["result"]["token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("login response carried no token: {body}"))
    }

    /// Looks up the id behind a registered username.
    pub async fn user_id(&self, username: &str) -> Result<i64> {
        core_access::find_user_by_username(&self.app_state.sqlite_provider.db, username)
            .await?
            .map(|user| user.id)
            .ok_or_else(|| anyhow::anyhow!("no user named '{username}'"))
    }

    /// Counts the rows of `table` owned by `user_id`.
    pub async fn count_rows_for_user(&self, table: &str, user_id: i64) -> Result<i64> {
        let conn = self.app_state.sqlite_provider.db.connect()?;
        let mut rows = conn
            .query(
                &format!("SELECT COUNT(*) FROM {table} WHERE user_id = ?"),
                turso::params![user_id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| anyhow::anyhow!("COUNT(*) returned no row"))?;
        Ok(row.get(0)?)
    }

    /// Counts every row of `table`.
    pub async fn count_rows(&self, table: &str) -> Result<i64> {
        let conn = self.app_state.sqlite_provider.db.connect()?;
        let mut rows = conn
            .query(&format!("SELECT COUNT(*) FROM {table}"), ())
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| anyhow::anyhow!("COUNT(*) returned no row"))?;
        Ok(row.get(0)?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

// --- Token Helpers ---

/// Mints a token with arbitrary claims. `expires_in_secs` may be negative.
pub fn generate_jwt(secret: &str, user_id: i64, username: &str, expires_in_secs: i64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs() as i64;
    let claims = Claims {
        sub: username.to_string(),
        user_id,
        exp: (now + expires_in_secs) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .expect("Failed to encode JWT")
}
