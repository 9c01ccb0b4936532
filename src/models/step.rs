use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// The crate Result alias would shadow std::result::Result inside the
// DeriveEntityModel expansion below; keep it renamed here.
use crate::error::{AppError, Result as AppResult};

/// Concrete teaching unit a step carries. Exactly one per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    #[sea_orm(string_value = "video")]
    Video,
    #[sea_orm(string_value = "bet_demo")]
    BetDemo,
    #[sea_orm(string_value = "view")]
    View,
    #[sea_orm(string_value = "questionnaire")]
    Questionnaire,
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepKind::Video => "video",
            StepKind::BetDemo => "bet_demo",
            StepKind::View => "view",
            StepKind::Questionnaire => "questionnaire",
        };
        write!(f, "{}", s)
    }
}

/// Sum type replacing the source's four nullable foreign keys: a step holds
/// exactly one payload, enforced by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepPayload {
    Video(VideoPayload),
    BetDemo(BetDemoPayload),
    View(ViewPayload),
    Questionnaire(QuestionnairePayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoPayload {
    pub url: String,
    pub duration_secs: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetDemoPayload {
    /// Description of the simulated fixture shown to the learner
    pub fixture: String,
    pub odds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewPayload {
    pub page: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionnairePayload {
    pub questionnaire_id: i64,
}

impl StepPayload {
    pub fn kind(&self) -> StepKind {
        match self {
            StepPayload::Video(_) => StepKind::Video,
            StepPayload::BetDemo(_) => StepKind::BetDemo,
            StepPayload::View(_) => StepKind::View,
            StepPayload::Questionnaire(_) => StepKind::Questionnaire,
        }
    }

    /// Parse and validate a payload for the given kind.
    pub fn from_parts(kind: StepKind, value: serde_json::Value) -> AppResult<Self> {
        let payload = match kind {
            StepKind::Video => StepPayload::Video(serde_json::from_value(value)?),
            StepKind::BetDemo => StepPayload::BetDemo(serde_json::from_value(value)?),
            StepKind::View => StepPayload::View(serde_json::from_value(value)?),
            StepKind::Questionnaire => StepPayload::Questionnaire(serde_json::from_value(value)?),
        };
        payload.validate()?;
        Ok(payload)
    }

    pub fn to_value(&self) -> AppResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn validate(&self) -> AppResult<()> {
        match self {
            StepPayload::Video(v) if v.url.trim().is_empty() => Err(AppError::BadRequest(
                "Video step requires a non-empty url".to_string(),
            )),
            StepPayload::BetDemo(b) if b.fixture.trim().is_empty() => Err(AppError::BadRequest(
                "Bet-demo step requires a non-empty fixture".to_string(),
            )),
            StepPayload::BetDemo(b) if b.odds <= 1.0 => Err(AppError::BadRequest(
                "Bet-demo odds must be greater than 1.0".to_string(),
            )),
            StepPayload::View(v) if v.page.trim().is_empty() => Err(AppError::BadRequest(
                "View step requires a non-empty page".to_string(),
            )),
            StepPayload::Questionnaire(q) if q.questionnaire_id <= 0 => Err(AppError::BadRequest(
                "Questionnaire step requires a positive questionnaire id".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "steps")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub challenge_id: i64,
    pub kind: StepKind,
    /// Serialized `StepPayload` matching `kind`
    pub payload: Json,
}

impl Model {
    pub fn payload(&self) -> AppResult<StepPayload> {
        StepPayload::from_parts(self.kind, self.payload.clone())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::challenge::Entity",
        from = "Column::ChallengeId",
        to = "super::challenge::Column::Id",
        on_delete = "Cascade"
    )]
    Challenge,
    #[sea_orm(has_many = "super::user_challenge_step::Entity")]
    UserChallengeSteps,
}

impl Related<super::challenge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Challenge.def()
    }
}

impl Related<super::user_challenge_step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserChallengeSteps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_roundtrip_matches_kind() {
        let payload = StepPayload::Video(VideoPayload {
            url: "https://cdn.betclass.app/lessons/odds-101.mp4".to_string(),
            duration_secs: Some(240),
        });
        assert_eq!(payload.kind(), StepKind::Video);

        let value = payload.to_value().unwrap();
        let parsed = StepPayload::from_parts(StepKind::Video, value).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn empty_video_url_is_rejected() {
        let result = StepPayload::from_parts(
            StepKind::Video,
            serde_json::json!({"url": "  ", "duration_secs": null}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn bet_demo_odds_must_exceed_one() {
        let result = StepPayload::from_parts(
            StepKind::BetDemo,
            serde_json::json!({"fixture": "Flamengo x Palmeiras", "odds": 0.8}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn stored_model_payload_parses_back() {
        let model = Model {
            id: 1,
            challenge_id: 1,
            kind: StepKind::View,
            payload: serde_json::json!({"page": "/glossary"}),
        };
        assert_eq!(
            model.payload().unwrap(),
            StepPayload::View(ViewPayload {
                page: "/glossary".to_string()
            })
        );
    }

    #[test]
    fn mismatched_payload_shape_is_rejected() {
        // Video payload offered for a questionnaire step
        let result = StepPayload::from_parts(
            StepKind::Questionnaire,
            serde_json::json!({"url": "https://example.com/v.mp4"}),
        );
        assert!(result.is_err());
    }
}
