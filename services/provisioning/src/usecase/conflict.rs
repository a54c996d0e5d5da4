use std::time::Duration;

use tracing::warn;

use posyandu_core::timeout::bounded;

use crate::domain::repository::ProfileRepository;
use crate::domain::types::{
    ConflictCandidates, ConflictField, ExistingOwner, GENERIC_OWNER_LABEL, ProfileConflict,
    UniqueViolation,
};

/// Explains a profile uniqueness violation in terms a health worker can act on.
pub struct ConflictResolver<'a, P: ProfileRepository> {
    pub profiles: &'a P,
    pub call_timeout: Duration,
}

impl<P: ProfileRepository> ConflictResolver<'_, P> {
    /// Returns `None` when the violation cannot be attributed to phone or NIK.
    pub async fn explain(
        &self,
        violation: &UniqueViolation,
        candidates: &ConflictCandidates,
    ) -> Option<ProfileConflict> {
        let field = violation.field()?;
        let owner_hint = self.owner_hint(field, candidates).await;
        Some(ProfileConflict { field, owner_hint })
    }

    async fn owner_hint(&self, field: ConflictField, candidates: &ConflictCandidates) -> String {
        let (phone, national_id) = match field {
            ConflictField::Phone => (Some(&candidates.phone), None),
            ConflictField::NationalId => (None, candidates.national_id.as_ref()),
        };
        let lookup = bounded(
            "find conflicting profile",
            self.call_timeout,
            self.profiles.find_owner(phone, national_id),
        )
        .await;
        match lookup {
            Ok(Ok(Some(ExistingOwner {
                health_post_name: Some(name),
                ..
            }))) => name,
            Ok(Ok(_)) => GENERIC_OWNER_LABEL.to_owned(),
            Ok(Err(e)) => {
                warn!(error = ?e, field = field.as_str(), "conflicting profile lookup failed");
                GENERIC_OWNER_LABEL.to_owned()
            }
            Err(elapsed) => {
                warn!(error = %elapsed, field = field.as_str(), "conflicting profile lookup timed out");
                GENERIC_OWNER_LABEL.to_owned()
            }
        }
    }
}
