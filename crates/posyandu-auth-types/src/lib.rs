//! Auth types shared across Posyandu services.
//!
//! Provides the `CallerIdentity` extractor for gateway-injected identity headers.

pub mod identity;

/// Header carrying the authenticated account id.
pub const USER_ID_HEADER: &str = "x-posyandu-user-id";

/// Header carrying the authenticated account role (`ADMIN`, `KADER`, `ORANG_TUA`).
pub const USER_ROLE_HEADER: &str = "x-posyandu-user-role";

/// Header carrying the health post the caller is assigned to, if any.
pub const HEALTH_POST_HEADER: &str = "x-posyandu-health-post-id";
