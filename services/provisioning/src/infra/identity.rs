use std::time::Duration;

use anyhow::Context as _;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use posyandu_domain::id::AccountId;
use posyandu_domain::identifier::LoginHandle;

use crate::domain::repository::IdentityStore;
use crate::domain::types::{Credential, CredentialMetadata};
use crate::error::IdentityStoreError;

const ADMIN_USERS_PATH: &str = "/auth/v1/admin/users";

/// Error codes the identity store uses for an already-registered login handle.
const ALREADY_REGISTERED_CODES: &[&str] = &["email_exists", "user_already_exists"];

/// Identity store client for a GoTrue-compatible admin API.
///
/// Base URL and service key are optional at construction; a missing value
/// surfaces as [`IdentityStoreError::NotConfigured`] on first use.
#[derive(Clone)]
pub struct HttpIdentityStore {
    client: reqwest::Client,
    base_url: Option<String>,
    service_key: Option<String>,
}

impl HttpIdentityStore {
    pub fn new(
        base_url: Option<String>,
        service_key: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build identity store http client")?;
        Ok(Self {
            client,
            base_url: base_url
                .map(|url| url.trim().trim_end_matches('/').to_owned())
                .filter(|url| !url.is_empty()),
            service_key: service_key
                .map(|key| key.trim().to_owned())
                .filter(|key| !key.is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.service_key.is_some()
    }

    fn endpoint(&self) -> Result<(&str, &str), IdentityStoreError> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| IdentityStoreError::NotConfigured("IDENTITY_URL is not set".into()))?;
        let key = self.service_key.as_deref().ok_or_else(|| {
            IdentityStoreError::NotConfigured("IDENTITY_SERVICE_KEY is not set".into())
        })?;
        Ok((base_url, key))
    }
}

#[derive(Serialize)]
struct CreateUserRequest<'a> {
    email: &'a str,
    password: &'a str,
    email_confirm: bool,
    user_metadata: &'a CredentialMetadata,
}

#[derive(Deserialize)]
struct CreatedUser {
    id: Uuid,
}

#[derive(Default, Deserialize)]
struct ErrorBody {
    error_code: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
}

impl ErrorBody {
    fn message(&self) -> Option<&str> {
        self.msg
            .as_deref()
            .or(self.message.as_deref())
            .or(self.error_description.as_deref())
    }
}

/// Map a failed create-credential response to a semantic outcome.
///
/// The structured `error_code` wins; older deployments only send a 422 with
/// an "already been registered" message.
pub fn classify_create_failure(status: StatusCode, body: &str) -> IdentityStoreError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    if parsed
        .error_code
        .as_deref()
        .is_some_and(|code| ALREADY_REGISTERED_CODES.contains(&code))
    {
        return IdentityStoreError::AlreadyRegistered;
    }
    let message = parsed.message().unwrap_or(body);
    if status == StatusCode::UNPROCESSABLE_ENTITY
        && message.to_ascii_lowercase().contains("already been registered")
    {
        return IdentityStoreError::AlreadyRegistered;
    }
    IdentityStoreError::Backend(anyhow::anyhow!(
        "identity store rejected create ({status}): {message}"
    ))
}

impl IdentityStore for HttpIdentityStore {
    async fn create_credential(
        &self,
        handle: &LoginHandle,
        secret: &str,
        metadata: &CredentialMetadata,
    ) -> Result<Credential, IdentityStoreError> {
        let (base_url, key) = self.endpoint()?;
        let resp = self
            .client
            .post(format!("{base_url}{ADMIN_USERS_PATH}"))
            .header("apikey", key)
            .bearer_auth(key)
            .json(&CreateUserRequest {
                email: handle.as_str(),
                password: secret,
                email_confirm: true,
                user_metadata: metadata,
            })
            .send()
            .await
            .context("send create credential request")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_create_failure(status, &body));
        }

        let created: CreatedUser = resp
            .json()
            .await
            .context("decode create credential response")?;
        debug!(credential_id = %created.id, handle = %handle, "credential created");
        Ok(Credential {
            id: AccountId(created.id),
            handle: handle.clone(),
        })
    }

    async fn delete_credential(&self, id: AccountId) -> Result<(), IdentityStoreError> {
        let (base_url, key) = self.endpoint()?;
        let resp = self
            .client
            .delete(format!("{base_url}{ADMIN_USERS_PATH}/{id}"))
            .header("apikey", key)
            .bearer_auth(key)
            .send()
            .await
            .context("send delete credential request")?;

        let status = resp.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(IdentityStoreError::Backend(anyhow::anyhow!(
            "identity store rejected delete of {id} ({status}): {body}"
        )))
    }
}
