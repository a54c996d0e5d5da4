use sea_orm::entity::prelude::*;

/// A child registered at a health post.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "children")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    pub birth_date: Option<chrono::NaiveDate>,
    pub health_post_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
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
