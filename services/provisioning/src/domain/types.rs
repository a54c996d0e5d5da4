use chrono::{DateTime, Utc};
use serde::Serialize;

use posyandu_domain::id::{AccountId, ChildId, HealthPostId};
use posyandu_domain::identifier::{LoginHandle, LoginSource, NationalId, PhoneNumber};
use posyandu_domain::role::Role;
use posyandu_provisioning_schema::profiles::{NATIONAL_ID_UNIQUE_KEY, PHONE_UNIQUE_KEY};

/// Minimum secret length accepted by the identity store.
pub const MIN_SECRET_LEN: usize = 6;

/// Owner label used when the colliding profile's health post cannot be determined.
pub const GENERIC_OWNER_LABEL: &str = "posyandu lain";

/// A login credential as returned by the identity store.
#[derive(Debug, Clone)]
pub struct Credential {
    pub id: AccountId,
    pub handle: LoginHandle,
}

/// Profile fields that travel with the credential as identity-store metadata.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialMetadata {
    pub full_name: String,
    pub role: Role,
}

/// Validated provisioning request, ready for the saga.
#[derive(Debug, Clone)]
pub struct AccountDraft {
    pub handle: LoginHandle,
    pub secret: String,
    pub uses_default_password: bool,
    pub full_name: String,
    pub phone: PhoneNumber,
    pub national_id: Option<NationalId>,
    pub role: Role,
    pub health_post_id: Option<HealthPostId>,
    pub created_by: Option<AccountId>,
}

/// Profile row to insert; `id` is the freshly created credential id.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub id: AccountId,
    pub full_name: String,
    pub phone: PhoneNumber,
    pub national_id: Option<NationalId>,
    pub role: Role,
    pub health_post_id: Option<HealthPostId>,
    pub uses_default_password: bool,
    pub created_by: Option<AccountId>,
}

impl NewProfile {
    pub fn for_credential(credential: &Credential, draft: &AccountDraft) -> Self {
        Self {
            id: credential.id,
            full_name: draft.full_name.clone(),
            phone: draft.phone.clone(),
            national_id: draft.national_id.clone(),
            role: draft.role,
            health_post_id: draft.health_post_id,
            uses_default_password: draft.uses_default_password,
            created_by: draft.created_by,
        }
    }
}

/// Stored profile.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: AccountId,
    pub full_name: String,
    pub phone: String,
    pub national_id: Option<String>,
    pub role: Role,
    pub health_post_id: Option<HealthPostId>,
    pub is_active: bool,
    pub uses_default_password: bool,
    pub created_by: Option<AccountId>,
    pub created_at: DateTime<Utc>,
}

/// Raw provisioning request as received from a caller.
#[derive(Debug, Clone)]
pub struct AccountInput {
    pub full_name: String,
    pub phone: String,
    pub national_id: Option<String>,
    pub login_source: LoginSource,
    pub secret: Option<String>,
    pub role: Role,
    pub health_post_id: Option<HealthPostId>,
    /// Account performing the provisioning, when known.
    pub created_by: Option<AccountId>,
}

/// Human-meaningful field that collided with an existing profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConflictField {
    #[serde(rename = "phone")]
    Phone,
    #[serde(rename = "nationalId")]
    NationalId,
}

impl ConflictField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::NationalId => "nationalId",
        }
    }

    /// Label used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Phone => "nomor HP",
            Self::NationalId => "NIK",
        }
    }
}

/// A uniqueness violation reported by the profile store.
#[derive(Debug, Clone)]
pub struct UniqueViolation {
    /// Constraint or index name, when the store reports one.
    pub constraint: Option<String>,
    /// Store error message.
    pub message: String,
}

impl UniqueViolation {
    /// Attribute the violation to a field.
    ///
    /// A known constraint name is authoritative. Otherwise the constraint name
    /// and the message are inspected for column names.
    pub fn field(&self) -> Option<ConflictField> {
        match self.constraint.as_deref() {
            Some(PHONE_UNIQUE_KEY) => return Some(ConflictField::Phone),
            Some(NATIONAL_ID_UNIQUE_KEY) => return Some(ConflictField::NationalId),
            _ => {}
        }
        let haystack = format!(
            "{} {}",
            self.constraint.as_deref().unwrap_or_default(),
            self.message
        )
        .to_ascii_lowercase();
        if haystack.contains("national_id") || haystack.contains("nik") {
            Some(ConflictField::NationalId)
        } else if haystack.contains("phone") || haystack.contains("no_hp") {
            Some(ConflictField::Phone)
        } else {
            None
        }
    }
}

/// Identifying values of the rejected insert, used to look up the existing owner.
#[derive(Debug, Clone)]
pub struct ConflictCandidates {
    pub phone: PhoneNumber,
    pub national_id: Option<NationalId>,
}

impl ConflictCandidates {
    pub fn from_draft(draft: &AccountDraft) -> Self {
        Self {
            phone: draft.phone.clone(),
            national_id: draft.national_id.clone(),
        }
    }
}

/// Existing profile that holds a colliding phone number or NIK.
#[derive(Debug, Clone)]
pub struct ExistingOwner {
    pub account_id: AccountId,
    pub health_post_name: Option<String>,
}

/// Resolved explanation of a profile uniqueness violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileConflict {
    pub field: ConflictField,
    pub owner_hint: String,
}

/// What happened to the credential after a failed profile insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compensation {
    /// Nothing was created, or the saga succeeded.
    NotNeeded,
    /// The credential was deleted; the system is back in its prior state.
    CredentialDeleted,
    /// The delete failed; the credential exists without a profile.
    Orphaned { credential_id: AccountId },
}

/// A child link that could not be created. Never rolls back the parent profile.
#[derive(Debug, Clone, Serialize)]
pub struct LinkFailure {
    pub child_id: ChildId,
    pub reason: String,
}

/// Parent account plus the outcome of each child link.
#[derive(Debug, Clone)]
pub struct ParentRegistration {
    pub profile: Profile,
    pub linked: Vec<ChildId>,
    pub failed_links: Vec<LinkFailure>,
}

impl ParentRegistration {
    pub fn is_partial(&self) -> bool {
        !self.failed_links.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkStatus {
    Created,
    Failed,
}

/// Outcome of one record in a bulk request.
#[derive(Debug, Clone, Serialize)]
pub struct BulkRecordResult {
    /// Zero-based position in the request.
    pub index: usize,
    pub full_name: String,
    pub phone: String,
    pub status: BulkStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    /// Error kind of a failed record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    pub message: String,
}

/// Aggregate result of a bulk request. `succeeded + failed == results.len()`.
#[derive(Debug, Clone, Serialize)]
pub struct BulkSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<BulkRecordResult>,
}

impl BulkSummary {
    pub fn from_results(results: Vec<BulkRecordResult>) -> Self {
        let succeeded = results
            .iter()
            .filter(|r| r.status == BulkStatus::Created)
            .count();
        Self {
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &BulkRecordResult> {
        self.results
            .iter()
            .filter(|r| r.status == BulkStatus::Failed)
    }
}
