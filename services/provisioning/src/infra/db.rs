use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, SqlErr,
};

use posyandu_domain::id::{AccountId, ChildId, HealthPostId};
use posyandu_domain::identifier::{NationalId, PhoneNumber};
use posyandu_provisioning_schema::{health_posts, parent_children, profiles};

use crate::domain::repository::{ChildLinkRepository, ProfileRepository};
use crate::domain::types::{ExistingOwner, NewProfile, Profile, UniqueViolation};
use crate::error::{LinkError, ProfileInsertError};

// ── Profile repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProfileRepository {
    pub db: DatabaseConnection,
}

impl ProfileRepository for DbProfileRepository {
    async fn insert(&self, profile: &NewProfile) -> Result<Profile, ProfileInsertError> {
        let now = Utc::now();
        let model = profiles::ActiveModel {
            id: Set(profile.id.0),
            full_name: Set(profile.full_name.clone()),
            phone: Set(profile.phone.as_str().to_owned()),
            national_id: Set(profile.national_id.as_ref().map(|n| n.as_str().to_owned())),
            role: Set(profile.role.as_str().to_owned()),
            health_post_id: Set(profile.health_post_id.map(|id| id.0)),
            is_active: Set(true),
            uses_default_password: Set(profile.uses_default_password),
            created_by: Set(profile.created_by.map(|id| id.0)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(classify_insert_error)?;

        Ok(Profile {
            id: AccountId(model.id),
            full_name: model.full_name,
            phone: model.phone,
            national_id: model.national_id,
            role: profile.role,
            health_post_id: model.health_post_id.map(HealthPostId),
            is_active: model.is_active,
            uses_default_password: model.uses_default_password,
            created_by: model.created_by.map(AccountId),
            created_at: model.created_at,
        })
    }

    async fn find_owner(
        &self,
        phone: Option<&PhoneNumber>,
        national_id: Option<&NationalId>,
    ) -> anyhow::Result<Option<ExistingOwner>> {
        if phone.is_none() && national_id.is_none() {
            return Ok(None);
        }
        let mut condition = Condition::any();
        if let Some(phone) = phone {
            condition = condition.add(profiles::Column::Phone.eq(phone.as_str()));
        }
        if let Some(national_id) = national_id {
            condition = condition.add(profiles::Column::NationalId.eq(national_id.as_str()));
        }

        let found = profiles::Entity::find()
            .filter(condition)
            .find_also_related(health_posts::Entity)
            .one(&self.db)
            .await
            .context("find conflicting profile")?;

        Ok(found.map(|(profile, health_post)| ExistingOwner {
            account_id: AccountId(profile.id),
            health_post_name: health_post.map(|hp| hp.name),
        }))
    }
}

/// Map a profile insert failure to a semantic outcome.
fn classify_insert_error(err: DbErr) -> ProfileInsertError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => {
            ProfileInsertError::UniqueViolation(UniqueViolation {
                constraint: constraint_name(&message),
                message,
            })
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => ProfileInsertError::UnknownHealthPost,
        _ => ProfileInsertError::Backend(anyhow::Error::new(err).context("insert profile")),
    }
}

/// Extract the quoted constraint name from a PostgreSQL constraint violation message,
/// e.g. `duplicate key value violates unique constraint "profiles_phone_key"`.
fn constraint_name(message: &str) -> Option<String> {
    let (_, rest) = message.split_once("constraint \"")?;
    let (name, _) = rest.split_once('"')?;
    Some(name.to_owned())
}

// ── Child link repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbChildLinkRepository {
    pub db: DatabaseConnection,
}

impl ChildLinkRepository for DbChildLinkRepository {
    async fn link(&self, parent_id: AccountId, child_id: ChildId) -> Result<(), LinkError> {
        let result = parent_children::ActiveModel {
            parent_id: Set(parent_id.0),
            child_id: Set(child_id.0),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => Err(match err.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => LinkError::ChildNotFound,
                Some(SqlErr::UniqueConstraintViolation(_)) => LinkError::AlreadyLinked,
                _ => LinkError::Backend(anyhow::Error::new(err).context("link child to parent")),
            }),
        }
    }
}
