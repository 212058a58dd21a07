//! Test helpers for integration tests
//!
//! Provides the test server, seeded accounts and HTTP shortcuts.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use parish_api::{create_app, AppState};
use parish_common::{AppConfig, JwtService};
use parish_core::{PhoneNumber, Role, SmsError, SmsSender, User, UserId, UserRepository};
use parish_db::InMemoryStore;
use parish_service::ServiceContextBuilder;
use parking_lot::Mutex;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Signing secret shared by the server and the tokens minted here
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// SMS sender that keeps every message in memory
#[derive(Debug, Default)]
pub struct CapturingSmsSender {
    sent: Mutex<Vec<(String, String)>>,
}

impl CapturingSmsSender {
    /// Messages sent so far as `(phone, body)` pairs
    pub fn messages(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl SmsSender for CapturingSmsSender {
    async fn send(&self, to: &PhoneNumber, body: &str) -> Result<String, SmsError> {
        let mut sent = self.sent.lock();
        sent.push((to.as_str().to_string(), body.to_string()));
        Ok(format!("SMtest{}", sent.len()))
    }
}

/// Accounts present in every fresh server
#[derive(Debug, Clone)]
pub struct SeededUsers {
    pub super_admin: User,
    pub admin: User,
    pub peer: User,
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: InMemoryStore,
    pub sms: Arc<CapturingSmsSender>,
    pub users: SeededUsers,
    jwt: JwtService,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with the default in-memory configuration
    pub async fn start() -> Result<Self> {
        Self::start_with_config(AppConfig::in_memory(TEST_JWT_SECRET)).await
    }

    /// Start a server whose sweep endpoint requires `secret`
    pub async fn start_with_cron_secret(secret: &str) -> Result<Self> {
        let mut config = AppConfig::in_memory(TEST_JWT_SECRET);
        config.cron.secret = Some(secret.to_string());
        Self::start_with_config(config).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let store = InMemoryStore::new();
        let users = seed_users(&store).await?;
        let sms = Arc::new(CapturingSmsSender::default());
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);

        let context = ServiceContextBuilder::new()
            .in_memory(store.clone())
            .sms_sender(sms.clone())
            .jwt_service(Arc::new(jwt.clone()))
            .reminders(config.reminders.clone())
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build service context: {e}"))?;

        let app = create_app(AppState::new(context, config));

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            store,
            sms,
            users,
            jwt,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Mint an access token for a user
    pub fn token_for(&self, user_id: UserId) -> String {
        self.jwt
            .issue_access_token(user_id)
            .unwrap_or_else(|e| panic!("failed to issue token: {e}"))
    }

    pub fn super_admin_token(&self) -> String {
        self.token_for(self.users.super_admin.id)
    }

    pub fn admin_token(&self) -> String {
        self.token_for(self.users.admin.id)
    }

    pub fn peer_token(&self) -> String {
        self.token_for(self.users.peer.id)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Make a POST request with auth token and no body
    pub async fn post_empty(&self, path: &str, token: Option<&str>) -> Result<Response> {
        let request = self.client.post(self.url(path));
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        Ok(request.send().await?)
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a PATCH request with auth token
    pub async fn patch_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .patch(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a PUT request with auth token
    pub async fn put_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a DELETE request with auth token
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }
}

async fn seed_users(store: &InMemoryStore) -> Result<SeededUsers> {
    let mut super_admin = User::new(
        "Father Tom".to_string(),
        PhoneNumber::parse("5550001000")?,
        Role::SuperAdmin,
    );
    super_admin.set_email(Some("tom@parish.test".to_string()));
    let mut admin = User::new(
        "Ruth".to_string(),
        PhoneNumber::parse("5550001001")?,
        Role::Admin,
    );
    admin.set_email(Some("ruth@parish.test".to_string()));
    let peer = User::new(
        "Ann".to_string(),
        PhoneNumber::parse("5550001002")?,
        Role::PeerMinister,
    );

    for user in [&super_admin, &admin, &peer] {
        UserRepository::create(store, user).await?;
    }

    Ok(SeededUsers {
        super_admin,
        admin,
        peer,
    })
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error response and return its `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| anyhow::anyhow!("error body without code: {body}"))
}
