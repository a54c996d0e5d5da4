use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::infra::db::{DbChildLinkRepository, DbProfileRepository};
use crate::infra::identity::HttpIdentityStore;
use crate::usecase::bulk::BulkProvisionUseCase;
use crate::usecase::parent::RegisterParentUseCase;
use crate::usecase::provision::ProvisionAccountUseCase;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub identity: HttpIdentityStore,
    pub login_domain: String,
    pub call_timeout: Duration,
    pub bulk_concurrency: usize,
    pub bulk_max_records: usize,
}

impl AppState {
    pub fn profile_repo(&self) -> DbProfileRepository {
        DbProfileRepository {
            db: self.db.clone(),
        }
    }

    pub fn child_link_repo(&self) -> DbChildLinkRepository {
        DbChildLinkRepository {
            db: self.db.clone(),
        }
    }

    pub fn provision_usecase(
        &self,
    ) -> ProvisionAccountUseCase<HttpIdentityStore, DbProfileRepository> {
        ProvisionAccountUseCase {
            identity: self.identity.clone(),
            profiles: self.profile_repo(),
            login_domain: self.login_domain.clone(),
            call_timeout: self.call_timeout,
        }
    }

    pub fn bulk_usecase(&self) -> BulkProvisionUseCase<HttpIdentityStore, DbProfileRepository> {
        BulkProvisionUseCase {
            provision: self.provision_usecase(),
            concurrency: self.bulk_concurrency,
            max_records: self.bulk_max_records,
        }
    }

    pub fn parent_usecase(
        &self,
    ) -> RegisterParentUseCase<HttpIdentityStore, DbProfileRepository, DbChildLinkRepository> {
        RegisterParentUseCase {
            provision: self.provision_usecase(),
            links: self.child_link_repo(),
        }
    }
}
