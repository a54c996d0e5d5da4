use tracing::{info, warn};

use posyandu_core::timeout::bounded;
use posyandu_domain::id::ChildId;
use posyandu_domain::role::Role;

use crate::domain::repository::{ChildLinkRepository, IdentityStore, ProfileRepository};
use crate::domain::types::{AccountInput, LinkFailure, ParentRegistration};
use crate::error::ProvisionError;
use crate::usecase::provision::ProvisionAccountUseCase;

/// Provisions a parent account, then links it to the given children.
///
/// Linking runs after the account exists and is best-effort: a failed link is
/// returned in [`ParentRegistration::failed_links`] and never removes the account.
pub struct RegisterParentUseCase<I: IdentityStore, P: ProfileRepository, L: ChildLinkRepository> {
    pub provision: ProvisionAccountUseCase<I, P>,
    pub links: L,
}

impl<I, P, L> RegisterParentUseCase<I, P, L>
where
    I: IdentityStore,
    P: ProfileRepository,
    L: ChildLinkRepository,
{
    pub async fn execute(
        &self,
        input: AccountInput,
        child_ids: Vec<ChildId>,
    ) -> Result<ParentRegistration, ProvisionError> {
        if input.role != Role::OrangTua {
            return Err(ProvisionError::validation(
                "pendaftaran orang tua hanya untuk peran ORANG_TUA",
            ));
        }

        let profile = self.provision.execute(input).await?;

        let mut linked = Vec::new();
        let mut failed_links = Vec::new();
        let mut seen = Vec::with_capacity(child_ids.len());
        for child_id in child_ids {
            if seen.contains(&child_id) {
                continue;
            }
            seen.push(child_id);

            let result = bounded(
                "link child",
                self.provision.call_timeout,
                self.links.link(profile.id, child_id),
            )
            .await;
            let reason = match result {
                Ok(Ok(())) => {
                    linked.push(child_id);
                    continue;
                }
                Ok(Err(e)) => {
                    warn!(parent_id = %profile.id, %child_id, error = ?e, "child link failed");
                    e.to_string()
                }
                Err(elapsed) => {
                    warn!(parent_id = %profile.id, %child_id, error = %elapsed, "child link timed out");
                    "waktu habis saat menghubungkan data anak".to_owned()
                }
            };
            failed_links.push(LinkFailure { child_id, reason });
        }

        info!(
            parent_id = %profile.id,
            linked = linked.len(),
            failed = failed_links.len(),
            "parent registered"
        );
        Ok(ParentRegistration {
            profile,
            linked,
            failed_links,
        })
    }
}
