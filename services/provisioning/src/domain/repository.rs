#![allow(async_fn_in_trait)]

use posyandu_domain::id::{AccountId, ChildId};
use posyandu_domain::identifier::{LoginHandle, NationalId, PhoneNumber};

use crate::domain::types::{Credential, CredentialMetadata, ExistingOwner, NewProfile, Profile};
use crate::error::{IdentityStoreError, LinkError, ProfileInsertError};

/// Identity store holding login credentials.
pub trait IdentityStore: Send + Sync {
    /// Create a pre-confirmed credential for `handle`.
    async fn create_credential(
        &self,
        handle: &LoginHandle,
        secret: &str,
        metadata: &CredentialMetadata,
    ) -> Result<Credential, IdentityStoreError>;

    async fn delete_credential(&self, id: AccountId) -> Result<(), IdentityStoreError>;
}

/// Relational store for profiles.
pub trait ProfileRepository: Send + Sync {
    async fn insert(&self, profile: &NewProfile) -> Result<Profile, ProfileInsertError>;

    /// Find an existing profile holding `phone` or `national_id`, with the
    /// name of its health post. Absent arguments are not matched.
    async fn find_owner(
        &self,
        phone: Option<&PhoneNumber>,
        national_id: Option<&NationalId>,
    ) -> anyhow::Result<Option<ExistingOwner>>;
}

/// Parent-to-child links.
pub trait ChildLinkRepository: Send + Sync {
    async fn link(&self, parent_id: AccountId, child_id: ChildId) -> Result<(), LinkError>;
}
