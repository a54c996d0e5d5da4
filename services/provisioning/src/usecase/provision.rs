use std::time::Duration;

use tracing::{error, info, warn};

use posyandu_core::timeout::bounded;
use posyandu_domain::id::AccountId;
use posyandu_domain::identifier::{LoginHandle, LoginSource, NationalId, PhoneNumber};

use crate::domain::repository::{IdentityStore, ProfileRepository};
use crate::domain::types::{
    AccountDraft, AccountInput, Compensation, ConflictCandidates, Credential, CredentialMetadata,
    MIN_SECRET_LEN, NewProfile, Profile,
};
use crate::error::{IdentityStoreError, ProfileInsertError, ProvisionError};
use crate::usecase::conflict::ConflictResolver;

/// Result of one provisioning attempt, including what happened to the credential.
#[derive(Debug)]
pub struct ProvisionOutcome {
    pub result: Result<Profile, ProvisionError>,
    pub compensation: Compensation,
}

impl ProvisionOutcome {
    fn failed(error: ProvisionError) -> Self {
        Self {
            result: Err(error),
            compensation: Compensation::NotNeeded,
        }
    }
}

/// Creates a credential and its profile as one unit of work.
///
/// The two stores share no transaction. A failed profile insert is undone by
/// deleting the credential; if that delete fails too, the credential is left
/// orphaned and reported through [`Compensation::Orphaned`].
pub struct ProvisionAccountUseCase<I: IdentityStore, P: ProfileRepository> {
    pub identity: I,
    pub profiles: P,
    pub login_domain: String,
    pub call_timeout: Duration,
}

impl<I: IdentityStore, P: ProfileRepository> ProvisionAccountUseCase<I, P> {
    pub async fn execute(&self, input: AccountInput) -> Result<Profile, ProvisionError> {
        self.run(input).await.result
    }

    pub async fn run(&self, input: AccountInput) -> ProvisionOutcome {
        let draft = match prepare(input, &self.login_domain) {
            Ok(draft) => draft,
            Err(e) => return ProvisionOutcome::failed(e),
        };

        let credential = match self.create_credential(&draft).await {
            Ok(credential) => credential,
            Err(e) => return ProvisionOutcome::failed(e),
        };

        let profile = NewProfile::for_credential(&credential, &draft);
        let inserted = bounded(
            "insert profile",
            self.call_timeout,
            self.profiles.insert(&profile),
        )
        .await
        .unwrap_or_else(|elapsed| Err(ProfileInsertError::Backend(elapsed.into())));

        match inserted {
            Ok(profile) => {
                info!(
                    account_id = %profile.id,
                    role = %profile.role,
                    health_post_id = ?profile.health_post_id,
                    "account provisioned"
                );
                ProvisionOutcome {
                    result: Ok(profile),
                    compensation: Compensation::NotNeeded,
                }
            }
            Err(insert_error) => {
                let compensation = self.compensate(credential.id).await;
                let error = self.insert_failure(insert_error, &draft).await;
                ProvisionOutcome {
                    result: Err(error),
                    compensation,
                }
            }
        }
    }

    async fn create_credential(&self, draft: &AccountDraft) -> Result<Credential, ProvisionError> {
        let metadata = CredentialMetadata {
            full_name: draft.full_name.clone(),
            role: draft.role,
        };
        let created = bounded(
            "create credential",
            self.call_timeout,
            self.identity
                .create_credential(&draft.handle, &draft.secret, &metadata),
        )
        .await
        .map_err(|elapsed| ProvisionError::IdentityBackendFailure(elapsed.into()))?;

        created.map_err(|e| match e {
            IdentityStoreError::AlreadyRegistered => ProvisionError::IdentityConflict {
                identifier: draft.handle.identifier().to_owned(),
            },
            IdentityStoreError::NotConfigured(detail) => ProvisionError::Configuration(detail),
            IdentityStoreError::Backend(e) => ProvisionError::IdentityBackendFailure(e),
        })
    }

    async fn compensate(&self, credential_id: AccountId) -> Compensation {
        let deleted = bounded(
            "delete credential",
            self.call_timeout,
            self.identity.delete_credential(credential_id),
        )
        .await;
        match deleted {
            Ok(Ok(())) => {
                warn!(%credential_id, "profile insert failed, credential deleted");
                Compensation::CredentialDeleted
            }
            Ok(Err(e)) => {
                error!(%credential_id, error = ?e, "compensating delete failed, credential orphaned");
                Compensation::Orphaned { credential_id }
            }
            Err(elapsed) => {
                error!(%credential_id, error = %elapsed, "compensating delete timed out, credential orphaned");
                Compensation::Orphaned { credential_id }
            }
        }
    }

    async fn insert_failure(&self, err: ProfileInsertError, draft: &AccountDraft) -> ProvisionError {
        match err {
            ProfileInsertError::UniqueViolation(violation) => {
                let resolver = ConflictResolver {
                    profiles: &self.profiles,
                    call_timeout: self.call_timeout,
                };
                let candidates = ConflictCandidates::from_draft(draft);
                match resolver.explain(&violation, &candidates).await {
                    Some(conflict) => ProvisionError::ProfileConflict {
                        field: conflict.field,
                        owner_hint: conflict.owner_hint,
                    },
                    None => ProvisionError::ProfileBackendFailure(anyhow::anyhow!(
                        "unattributed unique violation (constraint {:?}): {}",
                        violation.constraint,
                        violation.message
                    )),
                }
            }
            ProfileInsertError::UnknownHealthPost => {
                ProvisionError::validation("posyandu tidak ditemukan")
            }
            ProfileInsertError::Backend(e) => ProvisionError::ProfileBackendFailure(e),
        }
    }
}

/// Validate raw input and derive the login handle and secret.
pub fn prepare(input: AccountInput, login_domain: &str) -> Result<AccountDraft, ProvisionError> {
    let full_name = input.full_name.trim();
    if full_name.is_empty() {
        return Err(ProvisionError::validation("nama lengkap wajib diisi"));
    }

    let phone = PhoneNumber::parse(&input.phone)?;
    let national_id = match input.national_id.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(raw) => Some(NationalId::parse(raw)?),
    };

    if input.role.requires_health_post() && input.health_post_id.is_none() {
        return Err(ProvisionError::validation(format!(
            "posyandu wajib dipilih untuk peran {}",
            input.role
        )));
    }

    let identifier = match input.login_source {
        LoginSource::Phone => phone.as_str(),
        LoginSource::NationalId => national_id
            .as_ref()
            .map(NationalId::as_str)
            .ok_or_else(|| ProvisionError::validation("NIK wajib diisi untuk login dengan NIK"))?,
    };
    let handle = LoginHandle::new(identifier, login_domain);

    let (secret, uses_default_password) = match input.secret {
        Some(secret) if !secret.is_empty() => {
            if secret.trim().chars().count() < MIN_SECRET_LEN {
                return Err(ProvisionError::validation(format!(
                    "kata sandi minimal {MIN_SECRET_LEN} karakter"
                )));
            }
            (secret, false)
        }
        _ => (identifier.to_owned(), true),
    };

    Ok(AccountDraft {
        handle,
        secret,
        uses_default_password,
        full_name: full_name.to_owned(),
        phone,
        national_id,
        role: input.role,
        health_post_id: input.health_post_id,
        created_by: input.created_by,
    })
}
