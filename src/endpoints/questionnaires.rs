//! Questionnaires backing the questionnaire step kind.

use axum::{
    extract::{Extension, Path, State},
    routing::{get, post},
    Json, Router,
};
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::{ensure_admin, Principal};
use crate::models::prelude::*;
use crate::models::questionnaire;
use crate::schemas::Envelope;
use crate::state::AppState;

pub fn questionnaires_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_questionnaires).post(create_questionnaire))
        .route(
            "/{questionnaire_id}",
            get(get_questionnaire)
                .patch(update_questionnaire)
                .delete(delete_questionnaire),
        )
        .route("/{questionnaire_id}/answer", post(answer_questionnaire))
        .with_state(state)
}

const MIN_OPTIONS: usize = 2;
const MAX_OPTIONS: usize = 5;

#[derive(Debug, Deserialize)]
pub struct CreateQuestionnaireRequest {
    pub question: String,
    pub options: Vec<String>,
    pub correct_option: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuestionnaireRequest {
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_option: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub option: i32,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub correct: bool,
}

fn validate_options(options: &[String], correct_option: i32) -> Result<()> {
    if options.len() < MIN_OPTIONS || options.len() > MAX_OPTIONS {
        return Err(AppError::BadRequest(format!(
            "A questionnaire needs between {} and {} options",
            MIN_OPTIONS, MAX_OPTIONS
        )));
    }
    if options.iter().any(|o| o.trim().is_empty()) {
        return Err(AppError::BadRequest(
            "Options must not be empty".to_string(),
        ));
    }
    if correct_option < 0 || correct_option as usize >= options.len() {
        return Err(AppError::BadRequest(
            "Correct option is out of range".to_string(),
        ));
    }
    Ok(())
}

async fn list_questionnaires(
    State(state): State<AppState>,
) -> Result<Envelope<Vec<questionnaire::Model>>> {
    let questionnaires = Questionnaire::find()
        .order_by_asc(questionnaire::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Envelope::ok("Questionnaires retrieved", questionnaires))
}

async fn get_questionnaire(
    State(state): State<AppState>,
    Path(questionnaire_id): Path<i64>,
) -> Result<Envelope<questionnaire::Model>> {
    let found = find_questionnaire(&state, questionnaire_id).await?;
    Ok(Envelope::ok("Questionnaire retrieved", found))
}

async fn create_questionnaire(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateQuestionnaireRequest>,
) -> Result<Envelope<questionnaire::Model>> {
    ensure_admin(&principal)?;

    if payload.question.trim().is_empty() {
        return Err(AppError::BadRequest("Question must not be empty".to_string()));
    }
    validate_options(&payload.options, payload.correct_option)?;

    let new_questionnaire = questionnaire::ActiveModel {
        question: Set(payload.question.trim().to_string()),
        options: Set(serde_json::to_value(&payload.options)?),
        correct_option: Set(payload.correct_option),
        ..Default::default()
    };
    let created = new_questionnaire.insert(&state.db).await?;

    tracing::info!(questionnaire_id = created.id, "Questionnaire created");
    Ok(Envelope::created("Questionnaire created", created))
}

async fn update_questionnaire(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(questionnaire_id): Path<i64>,
    Json(payload): Json<UpdateQuestionnaireRequest>,
) -> Result<Envelope<questionnaire::Model>> {
    ensure_admin(&principal)?;

    let found = find_questionnaire(&state, questionnaire_id).await?;

    // Validate the combination that will end up stored
    let options = match &payload.options {
        Some(options) => options.clone(),
        None => serde_json::from_value(found.options.clone())?,
    };
    let correct_option = payload.correct_option.unwrap_or(found.correct_option);
    validate_options(&options, correct_option)?;

    let mut model: questionnaire::ActiveModel = found.into();
    if let Some(question) = payload.question {
        if question.trim().is_empty() {
            return Err(AppError::BadRequest("Question must not be empty".to_string()));
        }
        model.question = Set(question.trim().to_string());
    }
    if payload.options.is_some() {
        model.options = Set(serde_json::to_value(&options)?);
    }
    if payload.correct_option.is_some() {
        model.correct_option = Set(correct_option);
    }

    let updated = model.update(&state.db).await?;
    Ok(Envelope::ok("Questionnaire updated", updated))
}

async fn delete_questionnaire(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(questionnaire_id): Path<i64>,
) -> Result<Envelope<()>> {
    ensure_admin(&principal)?;

    let found = find_questionnaire(&state, questionnaire_id).await?;
    found.delete(&state.db).await?;

    tracing::info!(questionnaire_id, "Questionnaire deleted");
    Ok(Envelope::message("Questionnaire deleted"))
}

/// POST /api/questionnaires/{questionnaire_id}/answer
async fn answer_questionnaire(
    State(state): State<AppState>,
    Path(questionnaire_id): Path<i64>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Envelope<AnswerResponse>> {
    let found = find_questionnaire(&state, questionnaire_id).await?;

    let options: Vec<String> = serde_json::from_value(found.options.clone())?;
    if payload.option < 0 || payload.option as usize >= options.len() {
        return Err(AppError::BadRequest(
            "Answer option is out of range".to_string(),
        ));
    }

    Ok(Envelope::ok(
        "Answer checked",
        AnswerResponse {
            correct: payload.option == found.correct_option,
        },
    ))
}

async fn find_questionnaire(
    state: &AppState,
    questionnaire_id: i64,
) -> Result<questionnaire::Model> {
    Questionnaire::find_by_id(questionnaire_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Questionnaire not found".to_string()))
}
