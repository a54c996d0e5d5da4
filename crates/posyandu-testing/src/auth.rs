//! Mock auth helpers for integration tests.
//!
//! Services behind the gateway receive `x-posyandu-user-*` headers injected by
//! the gateway. In tests, `MockAuth` produces these headers directly so no real
//! gateway or session is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use posyandu_auth_types::{HEALTH_POST_HEADER, USER_ID_HEADER, USER_ROLE_HEADER};
use posyandu_domain::id::HealthPostId;
use posyandu_domain::role::Role;

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub role: Role,
    pub health_post_id: Option<HealthPostId>,
}

impl MockAuth {
    pub fn admin() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
            health_post_id: None,
        }
    }

    pub fn kader(health_post_id: HealthPostId) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            role: Role::Kader,
            health_post_id: Some(health_post_id),
        }
    }

    pub fn parent(health_post_id: HealthPostId) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            role: Role::OrangTua,
            health_post_id: Some(health_post_id),
        }
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
        );
        map.insert(
            HeaderName::from_static(USER_ROLE_HEADER),
            HeaderValue::from_static(self.role.as_str()),
        );
        if let Some(post) = self.health_post_id {
            map.insert(
                HeaderName::from_static(HEALTH_POST_HEADER),
                HeaderValue::from_str(&post.to_string()).unwrap(),
            );
        }
        map
    }
}
