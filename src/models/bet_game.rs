use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Join between a bet and the games it covers; optionally carries the
/// championship the fixture belongs to.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bet_games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub bet_id: i64,
    pub game_id: i64,
    pub championship_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bet::Entity",
        from = "Column::BetId",
        to = "super::bet::Column::Id",
        on_delete = "Cascade"
    )]
    Bet,
    #[sea_orm(
        belongs_to = "super::game::Entity",
        from = "Column::GameId",
        to = "super::game::Column::Id",
        on_delete = "Cascade"
    )]
    Game,
}

impl Related<super::bet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bet.def()
    }
}

impl Related<super::game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
