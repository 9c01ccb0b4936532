use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    #[sea_orm(string_value = "ongoing")]
    Ongoing,
    #[sea_orm(string_value = "finished")]
    Finished,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub home_team: String,
    pub away_team: String,
    pub scheduled_at: DateTimeUtc,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub game_state: GameState,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bet_game::Entity")]
    BetGames,
}

impl Related<super::bet_game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BetGames.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
