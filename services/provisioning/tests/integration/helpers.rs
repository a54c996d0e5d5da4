use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;

use posyandu_domain::id::{AccountId, ChildId, HealthPostId};
use posyandu_domain::identifier::{LoginHandle, LoginSource, NationalId, PhoneNumber};
use posyandu_domain::role::Role;
use posyandu_provisioning::domain::repository::{
    ChildLinkRepository, IdentityStore, ProfileRepository,
};
use posyandu_provisioning::domain::types::{
    AccountInput, Credential, CredentialMetadata, ExistingOwner, NewProfile, Profile,
    UniqueViolation,
};
use posyandu_provisioning::error::{IdentityStoreError, LinkError, ProfileInsertError};
use posyandu_provisioning::usecase::provision::ProvisionAccountUseCase;
use posyandu_provisioning_schema::profiles::{NATIONAL_ID_UNIQUE_KEY, PHONE_UNIQUE_KEY};

pub const LOGIN_DOMAIN: &str = "posyandu.local";

// ── MockIdentityStore ────────────────────────────────────────────────────────

#[derive(Default)]
struct IdentityState {
    credentials: HashMap<String, AccountId>,
    create_calls: usize,
    delete_calls: Vec<AccountId>,
    fail_create: bool,
    fail_delete: bool,
    unconfigured: bool,
}

/// In-memory identity store. Clones share state, so a test can keep a handle
/// after moving the store into a use case.
#[derive(Clone, Default)]
pub struct MockIdentityStore {
    state: Arc<Mutex<IdentityState>>,
}

impl MockIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_create() -> Self {
        let store = Self::new();
        store.state.lock().unwrap().fail_create = true;
        store
    }

    pub fn failing_delete() -> Self {
        let store = Self::new();
        store.state.lock().unwrap().fail_delete = true;
        store
    }

    pub fn unconfigured() -> Self {
        let store = Self::new();
        store.state.lock().unwrap().unconfigured = true;
        store
    }

    pub fn register(&self, handle: &str) -> AccountId {
        let id = AccountId::new();
        self.state
            .lock()
            .unwrap()
            .credentials
            .insert(handle.to_owned(), id);
        id
    }

    pub fn contains(&self, id: AccountId) -> bool {
        self.state
            .lock()
            .unwrap()
            .credentials
            .values()
            .any(|c| *c == id)
    }

    pub fn id_of(&self, handle: &str) -> Option<AccountId> {
        self.state.lock().unwrap().credentials.get(handle).copied()
    }

    pub fn credential_count(&self) -> usize {
        self.state.lock().unwrap().credentials.len()
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().create_calls
    }

    pub fn delete_calls(&self) -> Vec<AccountId> {
        self.state.lock().unwrap().delete_calls.clone()
    }
}

impl IdentityStore for MockIdentityStore {
    async fn create_credential(
        &self,
        handle: &LoginHandle,
        _secret: &str,
        _metadata: &CredentialMetadata,
    ) -> Result<Credential, IdentityStoreError> {
        let mut state = self.state.lock().unwrap();
        state.create_calls += 1;
        if state.unconfigured {
            return Err(IdentityStoreError::NotConfigured(
                "IDENTITY_URL is not set".into(),
            ));
        }
        if state.fail_create {
            return Err(IdentityStoreError::Backend(anyhow::anyhow!(
                "connection refused"
            )));
        }
        if state.credentials.contains_key(handle.as_str()) {
            return Err(IdentityStoreError::AlreadyRegistered);
        }
        let id = AccountId::new();
        state.credentials.insert(handle.as_str().to_owned(), id);
        Ok(Credential {
            id,
            handle: handle.clone(),
        })
    }

    async fn delete_credential(&self, id: AccountId) -> Result<(), IdentityStoreError> {
        let mut state = self.state.lock().unwrap();
        state.delete_calls.push(id);
        if state.fail_delete {
            return Err(IdentityStoreError::Backend(anyhow::anyhow!(
                "identity store unavailable"
            )));
        }
        state.credentials.retain(|_, c| *c != id);
        Ok(())
    }
}

// ── MockProfileRepo ──────────────────────────────────────────────────────────

#[derive(Default)]
struct ProfileState {
    profiles: Vec<Profile>,
    health_posts: HashMap<HealthPostId, String>,
    fail_insert: bool,
    fail_lookup: bool,
    unnamed_violations: bool,
}

/// In-memory profile store enforcing the phone and NIK unique keys.
#[derive(Clone, Default)]
pub struct MockProfileRepo {
    state: Arc<Mutex<ProfileState>>,
}

impl MockProfileRepo {
    pub fn with_health_posts(posts: &[(HealthPostId, &str)]) -> Self {
        let repo = Self::default();
        repo.state.lock().unwrap().health_posts = posts
            .iter()
            .map(|(id, name)| (*id, (*name).to_owned()))
            .collect();
        repo
    }

    pub fn failing_insert(self) -> Self {
        self.state.lock().unwrap().fail_insert = true;
        self
    }

    pub fn failing_lookup(self) -> Self {
        self.state.lock().unwrap().fail_lookup = true;
        self
    }

    /// Report violations without a constraint name, as some drivers do.
    pub fn unnamed_violations(self) -> Self {
        self.state.lock().unwrap().unnamed_violations = true;
        self
    }

    pub fn profiles(&self) -> Vec<Profile> {
        self.state.lock().unwrap().profiles.clone()
    }

    pub fn count(&self) -> usize {
        self.state.lock().unwrap().profiles.len()
    }
}

impl ProfileRepository for MockProfileRepo {
    async fn insert(&self, profile: &NewProfile) -> Result<Profile, ProfileInsertError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_insert {
            return Err(ProfileInsertError::Backend(anyhow::anyhow!(
                "could not serialize access"
            )));
        }
        if let Some(post) = profile.health_post_id {
            if !state.health_posts.contains_key(&post) {
                return Err(ProfileInsertError::UnknownHealthPost);
            }
        }

        let phone = profile.phone.as_str();
        let national_id = profile.national_id.as_ref().map(NationalId::as_str);
        let violation = if state.profiles.iter().any(|p| p.phone == phone) {
            Some((PHONE_UNIQUE_KEY, "phone", phone))
        } else if let Some(nid) = national_id.filter(|nid| {
            state
                .profiles
                .iter()
                .any(|p| p.national_id.as_deref() == Some(*nid))
        }) {
            Some((NATIONAL_ID_UNIQUE_KEY, "national_id", nid))
        } else {
            None
        };
        if let Some((constraint, column, value)) = violation {
            let unnamed = state.unnamed_violations;
            return Err(ProfileInsertError::UniqueViolation(UniqueViolation {
                constraint: (!unnamed).then(|| constraint.to_owned()),
                message: if unnamed {
                    format!("Key ({column})=({value}) already exists.")
                } else {
                    format!("duplicate key value violates unique constraint \"{constraint}\"")
                },
            }));
        }

        let stored = Profile {
            id: profile.id,
            full_name: profile.full_name.clone(),
            phone: phone.to_owned(),
            national_id: national_id.map(str::to_owned),
            role: profile.role,
            health_post_id: profile.health_post_id,
            is_active: true,
            uses_default_password: profile.uses_default_password,
            created_by: profile.created_by,
            created_at: Utc::now(),
        };
        state.profiles.push(stored.clone());
        Ok(stored)
    }

    async fn find_owner(
        &self,
        phone: Option<&PhoneNumber>,
        national_id: Option<&NationalId>,
    ) -> anyhow::Result<Option<ExistingOwner>> {
        let state = self.state.lock().unwrap();
        if state.fail_lookup {
            anyhow::bail!("statement timeout");
        }
        let found = state.profiles.iter().find(|p| {
            phone.is_some_and(|ph| p.phone == ph.as_str())
                || national_id.is_some_and(|n| p.national_id.as_deref() == Some(n.as_str()))
        });
        Ok(found.map(|p| ExistingOwner {
            account_id: p.id,
            health_post_name: p
                .health_post_id
                .and_then(|id| state.health_posts.get(&id).cloned()),
        }))
    }
}

// ── MockChildLinkRepo ────────────────────────────────────────────────────────

/// Links succeed for known children; `broken` children fail with a backend error.
#[derive(Clone, Default)]
pub struct MockChildLinkRepo {
    pub known: Vec<ChildId>,
    pub broken: Vec<ChildId>,
    pub links: Arc<Mutex<Vec<(AccountId, ChildId)>>>,
}

impl MockChildLinkRepo {
    pub fn new(known: Vec<ChildId>) -> Self {
        Self {
            known,
            ..Default::default()
        }
    }
}

impl ChildLinkRepository for MockChildLinkRepo {
    async fn link(&self, parent_id: AccountId, child_id: ChildId) -> Result<(), LinkError> {
        if self.broken.contains(&child_id) {
            return Err(LinkError::Backend(anyhow::anyhow!("deadlock detected")));
        }
        if !self.known.contains(&child_id) {
            return Err(LinkError::ChildNotFound);
        }
        let mut links = self.links.lock().unwrap();
        if links.contains(&(parent_id, child_id)) {
            return Err(LinkError::AlreadyLinked);
        }
        links.push((parent_id, child_id));
        Ok(())
    }
}

// ── builders ─────────────────────────────────────────────────────────────────

pub fn usecase(
    identity: &MockIdentityStore,
    profiles: &MockProfileRepo,
) -> ProvisionAccountUseCase<MockIdentityStore, MockProfileRepo> {
    usecase_with_domain(identity, profiles, LOGIN_DOMAIN)
}

pub fn usecase_with_domain(
    identity: &MockIdentityStore,
    profiles: &MockProfileRepo,
    login_domain: &str,
) -> ProvisionAccountUseCase<MockIdentityStore, MockProfileRepo> {
    ProvisionAccountUseCase {
        identity: identity.clone(),
        profiles: profiles.clone(),
        login_domain: login_domain.to_owned(),
        call_timeout: Duration::from_secs(5),
    }
}

pub fn parent_input(phone: &str, health_post_id: HealthPostId) -> AccountInput {
    AccountInput {
        full_name: "Dewi Lestari".into(),
        phone: phone.into(),
        national_id: None,
        login_source: LoginSource::Phone,
        secret: Some("rahasia123".into()),
        role: Role::OrangTua,
        health_post_id: Some(health_post_id),
        created_by: None,
    }
}

pub fn kader_input(phone: &str, national_id: &str, health_post_id: HealthPostId) -> AccountInput {
    AccountInput {
        full_name: "Siti Aminah".into(),
        phone: phone.into(),
        national_id: Some(national_id.into()),
        login_source: LoginSource::Phone,
        secret: Some("rahasia123".into()),
        role: Role::Kader,
        health_post_id: Some(health_post_id),
        created_by: None,
    }
}
