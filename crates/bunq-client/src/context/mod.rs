//! API context: installation, device registration and session handling
//!
//! Opening a context is the three-step bunq handshake:
//! 1. `POST installation` registers the client public key and yields an
//!    installation token.
//! 2. `POST device-server` binds the API key to this installation.
//! 3. `POST session-server` opens a session and returns the session token
//!    together with the user it belongs to.

mod session;
mod user;

pub use session::{SessionContext, SessionUser, UserKind};
pub use user::UserContext;

use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::ApiKey;
use crate::error::{BunqError, Result};
use crate::http::{extract_id, extract_object, ApiClient};
use crate::signing::{KeyPair, CLIENT_KEY_BITS};

/// Authenticated connection to the bunq API
#[derive(Debug)]
pub struct ApiContext {
    client: ApiClient,
    api_key: ApiKey,
    key_pair: KeyPair,
    installation_token: String,
    server_public_key: String,
    device_id: u64,
    session: RwLock<SessionContext>,
}

impl ApiContext {
    /// Run the full handshake with a freshly generated client key
    pub async fn create(client: ApiClient, api_key: ApiKey, description: &str) -> Result<Self> {
        info!("Generating client key pair");
        let key_pair = tokio::task::spawn_blocking(|| KeyPair::generate(CLIENT_KEY_BITS))
            .await
            .map_err(|e| BunqError::Signing(format!("Key generation task failed: {}", e)))??;

        Self::create_with_key_pair(client, api_key, description, key_pair).await
    }

    /// Run the full handshake with an existing client key
    pub async fn create_with_key_pair(
        client: ApiClient,
        api_key: ApiKey,
        description: &str,
        key_pair: KeyPair,
    ) -> Result<Self> {
        info!("Registering installation");
        let items = client
            .post(
                "installation",
                &json!({ "client_public_key": key_pair.public_key_pem() }),
                None,
                &key_pair,
            )
            .await?;
        let installation_token = token_from(&items)?;
        let server_public_key = extract_object(&items, "ServerPublicKey")?
            .get("server_public_key")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_default();

        info!("Registering device: {}", description);
        let items = client
            .post(
                "device-server",
                &json!({
                    "description": description,
                    "secret": api_key.expose(),
                    "permitted_ips": ["*"],
                }),
                Some(&installation_token),
                &key_pair,
            )
            .await?;
        let device_id = extract_id(&items)?;
        debug!("Device registered with id {}", device_id);

        let session =
            open_session(&client, &api_key, &installation_token, &key_pair).await?;

        Ok(Self {
            client,
            api_key,
            key_pair,
            installation_token,
            server_public_key,
            device_id,
            session: RwLock::new(session),
        })
    }

    /// User the current session belongs to
    pub async fn session_user(&self) -> SessionUser {
        self.session.read().await.user.clone()
    }

    /// Device id assigned at registration
    pub fn device_id(&self) -> u64 {
        self.device_id
    }

    /// Server public key received at installation
    pub fn server_public_key(&self) -> &str {
        &self.server_public_key
    }

    /// Session token, renewing the session first when it is about to expire
    pub async fn session_token(&self) -> Result<String> {
        {
            let session = self.session.read().await;
            if !session.needs_refresh(Utc::now()) {
                return Ok(session.token.clone());
            }
        }

        let mut session = self.session.write().await;
        if session.needs_refresh(Utc::now()) {
            info!("Session expiring, opening a new one");
            *session = open_session(
                &self.client,
                &self.api_key,
                &self.installation_token,
                &self.key_pair,
            )
            .await?;
        }

        Ok(session.token.clone())
    }

    /// Authenticated GET
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<Value>> {
        let token = self.session_token().await?;
        self.client.get(path, query, &token).await
    }

    /// Authenticated, signed POST
    pub async fn post(&self, path: &str, body: &Value) -> Result<Vec<Value>> {
        let token = self.session_token().await?;
        self.client
            .post(path, body, Some(&token), &self.key_pair)
            .await
    }
}

async fn open_session(
    client: &ApiClient,
    api_key: &ApiKey,
    installation_token: &str,
    key_pair: &KeyPair,
) -> Result<SessionContext> {
    info!("Opening session");
    let items = client
        .post(
            "session-server",
            &json!({ "secret": api_key.expose() }),
            Some(installation_token),
            key_pair,
        )
        .await?;

    let token = token_from(&items)?;
    let user = SessionUser::from_items(&items)?;
    debug!("Session opened for user {} ({:?})", user.id, user.kind);

    Ok(SessionContext::new(token, user))
}

fn token_from(items: &[Value]) -> Result<String> {
    extract_object(items, "Token")?
        .get("token")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| BunqError::UnexpectedResponse("Token object without token".to_string()))
}
