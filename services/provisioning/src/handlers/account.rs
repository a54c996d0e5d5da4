use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use posyandu_auth_types::identity::CallerIdentity;
use posyandu_domain::id::{AccountId, ChildId, HealthPostId};
use posyandu_domain::identifier::LoginSource;
use posyandu_domain::role::Role;

use crate::domain::types::{AccountInput, BulkSummary, LinkFailure, Profile};
use crate::error::ProvisionError;
use crate::state::AppState;
use crate::usecase::bulk::BulkEntry;

// ── POST /accounts ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub full_name: String,
    pub phone: String,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub login_source: LoginSource,
    /// Omitted means the login identifier doubles as the initial password.
    #[serde(default)]
    pub password: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub health_post_id: Option<HealthPostId>,
}

impl CreateAccountRequest {
    fn into_input(self, caller: &CallerIdentity) -> Result<AccountInput, ProvisionError> {
        let health_post_id = authorize(caller, self.role, self.health_post_id)?;
        Ok(AccountInput {
            full_name: self.full_name,
            phone: self.phone,
            national_id: self.national_id,
            login_source: self.login_source,
            secret: self.password,
            role: self.role,
            health_post_id,
            created_by: Some(caller.account_id),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: AccountId,
    pub full_name: String,
    pub phone: String,
    pub national_id: Option<String>,
    pub role: Role,
    pub health_post_id: Option<HealthPostId>,
    pub is_active: bool,
    pub uses_default_password: bool,
    pub created_by: Option<AccountId>,
    #[serde(serialize_with = "posyandu_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            full_name: profile.full_name,
            phone: profile.phone,
            national_id: profile.national_id,
            role: profile.role,
            health_post_id: profile.health_post_id,
            is_active: profile.is_active,
            uses_default_password: profile.uses_default_password,
            created_by: profile.created_by,
            created_at: profile.created_at,
        }
    }
}

pub async fn create_account(
    caller: CallerIdentity,
    State(state): State<AppState>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProfileResponse>), ProvisionError> {
    let Json(body) = payload?;
    let input = body.into_input(&caller)?;
    let profile = state.provision_usecase().execute(input).await?;
    Ok((StatusCode::CREATED, Json(profile.into())))
}

// ── POST /accounts/parents ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterParentRequest {
    pub full_name: String,
    pub phone: String,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub login_source: LoginSource,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub health_post_id: Option<HealthPostId>,
    #[serde(default)]
    pub child_ids: Vec<ChildId>,
}

#[derive(Debug, Serialize)]
pub struct ParentRegistrationResponse {
    pub profile: ProfileResponse,
    pub linked_children: Vec<ChildId>,
    pub failed_links: Vec<LinkFailure>,
}

pub async fn register_parent(
    caller: CallerIdentity,
    State(state): State<AppState>,
    payload: Result<Json<RegisterParentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ParentRegistrationResponse>), ProvisionError> {
    let Json(body) = payload?;
    let health_post_id = authorize(&caller, Role::OrangTua, body.health_post_id)?;
    let input = AccountInput {
        full_name: body.full_name,
        phone: body.phone,
        national_id: body.national_id,
        login_source: body.login_source,
        secret: body.password,
        role: Role::OrangTua,
        health_post_id,
        created_by: Some(caller.account_id),
    };
    let registration = state.parent_usecase().execute(input, body.child_ids).await?;
    Ok((
        StatusCode::CREATED,
        Json(ParentRegistrationResponse {
            profile: registration.profile.into(),
            linked_children: registration.linked,
            failed_links: registration.failed_links,
        }),
    ))
}

// ── POST /accounts/bulk ──────────────────────────────────────────────────────

/// Records are decoded one by one so a malformed record fails alone.
#[derive(Debug, Deserialize)]
pub struct BulkCreateRequest {
    pub accounts: Vec<serde_json::Value>,
}

pub async fn create_accounts_bulk(
    caller: CallerIdentity,
    State(state): State<AppState>,
    payload: Result<Json<BulkCreateRequest>, JsonRejection>,
) -> Result<Json<BulkSummary>, ProvisionError> {
    let Json(body) = payload?;
    let entries: Vec<BulkEntry> = body
        .accounts
        .into_iter()
        .map(|record| bulk_entry(record, &caller))
        .collect();
    let summary = state.bulk_usecase().execute(entries).await?;
    Ok(Json(summary))
}

fn bulk_entry(record: serde_json::Value, caller: &CallerIdentity) -> BulkEntry {
    let text = |name: &str| {
        record
            .get(name)
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_owned()
    };
    let full_name = text("full_name");
    let phone = text("phone");
    let input = serde_json::from_value::<CreateAccountRequest>(record)
        .map_err(|e| ProvisionError::validation(format!("data akun tidak valid: {e}")))
        .and_then(|request| request.into_input(caller));
    match input {
        Ok(input) => BulkEntry::Ready(input),
        Err(error) => BulkEntry::Rejected {
            full_name,
            phone,
            error,
        },
    }
}

// ── authorization ────────────────────────────────────────────────────────────

/// Check that `caller` may create an account with `role` and resolve its health post.
///
/// A kader is pinned to its own health post; an omitted post defaults to it.
pub fn authorize(
    caller: &CallerIdentity,
    role: Role,
    requested: Option<HealthPostId>,
) -> Result<Option<HealthPostId>, ProvisionError> {
    if !caller.role.may_provision(role) {
        return Err(ProvisionError::Forbidden);
    }
    match caller.role {
        Role::Kader => {
            let own = caller.health_post_id.ok_or(ProvisionError::Forbidden)?;
            match requested {
                Some(post) if post != own => Err(ProvisionError::Forbidden),
                _ => Ok(Some(own)),
            }
        }
        _ => Ok(requested),
    }
}
