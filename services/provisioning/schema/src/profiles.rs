use sea_orm::entity::prelude::*;

/// Name of the unique index on `phone`.
pub const PHONE_UNIQUE_KEY: &str = "profiles_phone_key";

/// Name of the unique index on `national_id`.
pub const NATIONAL_ID_UNIQUE_KEY: &str = "profiles_national_id_key";

/// Application-level account record. `id` equals the identity-store credential id.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    #[sea_orm(unique)]
    pub phone: String,
    #[sea_orm(unique)]
    pub national_id: Option<String>,
    /// `ADMIN`, `KADER` or `ORANG_TUA`.
    pub role: String,
    pub health_post_id: Option<Uuid>,
    pub is_active: bool,
    pub uses_default_password: bool,
    pub created_by: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::health_posts::Entity",
        from = "Column::HealthPostId",
        to = "super::health_posts::Column::Id"
    )]
    HealthPost,
    #[sea_orm(has_many = "super::parent_children::Entity")]
    ParentChildren,
}

impl Related<super::health_posts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HealthPost.def()
    }
}

impl Related<super::parent_children::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParentChildren.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
