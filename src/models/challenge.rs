use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An ordered tutorial unit composed of steps.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "challenges")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Position in the tutorial sequence; drives unblock-next
    #[sea_orm(unique)]
    pub number: i32,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::step::Entity")]
    Steps,
    #[sea_orm(has_many = "super::user_challenge::Entity")]
    UserChallenges,
}

impl Related<super::step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Steps.def()
    }
}

impl Related<super::user_challenge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserChallenges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
