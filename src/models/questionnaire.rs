use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single-question quiz referenced by questionnaire steps.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "questionnaires")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Text")]
    pub question: String,
    /// JSON array of 2..=5 option strings
    pub options: Json,
    /// Index into `options`
    pub correct_option: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
