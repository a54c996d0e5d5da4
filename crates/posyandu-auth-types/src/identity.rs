//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use posyandu_domain::id::{AccountId, HealthPostId};
use posyandu_domain::role::Role;

use crate::{HEALTH_POST_HEADER, USER_ID_HEADER, USER_ROLE_HEADER};

/// Caller identity injected by the gateway after it has verified the session.
///
/// Returns 401 if the user id or role header is absent or malformed. A
/// malformed health-post header is also a 401; an absent one is `None`.
/// Role enforcement (403) is done by handlers after extraction.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub account_id: AccountId,
    pub role: Role,
    pub health_post_id: Option<HealthPostId>,
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 declares this as `fn -> impl Future + Send`; read the headers
    // synchronously so the returned future does not borrow `parts`.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };

        let account_id = header(USER_ID_HEADER).and_then(|s| s.parse::<Uuid>().ok());
        let role = header(USER_ROLE_HEADER).and_then(|s| s.parse::<Role>().ok());
        let health_post_id = header(HEALTH_POST_HEADER).map(|s| s.parse::<Uuid>());

        async move {
            let account_id = account_id.ok_or(StatusCode::UNAUTHORIZED)?;
            let role = role.ok_or(StatusCode::UNAUTHORIZED)?;
            let health_post_id = health_post_id
                .transpose()
                .map_err(|_| StatusCode::UNAUTHORIZED)?;
            Ok(Self {
                account_id: AccountId(account_id),
                role,
                health_post_id: health_post_id.map(HealthPostId),
            })
        }
    }
}
