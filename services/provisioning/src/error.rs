use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use posyandu_domain::identifier::IdentifierError;

use crate::domain::types::{ConflictField, UniqueViolation};

/// Provisioning service error variants.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("{0}")]
    Validation(String),
    #[error("akses ditolak")]
    Forbidden,
    #[error("akun {identifier} sudah terdaftar")]
    IdentityConflict { identifier: String },
    #[error("layanan autentikasi sedang bermasalah, silakan coba lagi")]
    IdentityBackendFailure(#[source] anyhow::Error),
    #[error("{} sudah terdaftar di {owner_hint}", .field.label())]
    ProfileConflict {
        field: ConflictField,
        owner_hint: String,
    },
    #[error("gagal menyimpan profil pengguna")]
    ProfileBackendFailure(#[source] anyhow::Error),
    #[error("layanan autentikasi belum dikonfigurasi")]
    Configuration(String),
}

impl ProvisionError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::Forbidden => "FORBIDDEN",
            Self::IdentityConflict { .. } => "IDENTITY_CONFLICT",
            Self::IdentityBackendFailure(_) => "IDENTITY_BACKEND_FAILURE",
            Self::ProfileConflict { .. } => "PROFILE_CONFLICT",
            Self::ProfileBackendFailure(_) => "PROFILE_BACKEND_FAILURE",
            Self::Configuration(_) => "CONFIGURATION",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::IdentityConflict { .. } | Self::ProfileConflict { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::IdentityBackendFailure(_) | Self::Configuration(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::ProfileBackendFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<IdentifierError> for ProvisionError {
    fn from(err: IdentifierError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<JsonRejection> for ProvisionError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(format!(
            "data permintaan tidak valid: {}",
            rejection.body_text()
        ))
    }
}

impl IntoResponse for ProvisionError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::IdentityBackendFailure(e) | Self::ProfileBackendFailure(e) => {
                tracing::error!(error = ?e, kind = self.kind(), "backend failure");
            }
            Self::Configuration(detail) => {
                tracing::error!(detail = %detail, kind = self.kind(), "identity store not configured");
            }
            _ => {}
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::ProfileConflict { field, owner_hint } = &self {
            body["field"] = serde_json::json!(field);
            body["owner_hint"] = serde_json::json!(owner_hint);
        }
        (status, axum::Json(body)).into_response()
    }
}

/// Failure reported by the identity store.
#[derive(Debug, thiserror::Error)]
pub enum IdentityStoreError {
    #[error("login handle already registered")]
    AlreadyRegistered,
    #[error("identity store not configured: {0}")]
    NotConfigured(String),
    #[error("identity store failure")]
    Backend(#[from] anyhow::Error),
}

/// Failure reported by the profile store on insert.
#[derive(Debug, thiserror::Error)]
pub enum ProfileInsertError {
    #[error("unique violation: {}", .0.message)]
    UniqueViolation(UniqueViolation),
    #[error("health post does not exist")]
    UnknownHealthPost,
    #[error("profile store failure")]
    Backend(#[from] anyhow::Error),
}

/// Failure linking a child to a parent profile.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("data anak tidak ditemukan")]
    ChildNotFound,
    #[error("anak sudah terhubung dengan akun ini")]
    AlreadyLinked,
    #[error("gagal menghubungkan data anak")]
    Backend(#[from] anyhow::Error),
}
