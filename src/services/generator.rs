//! Fictional-championship generator.
//!
//! Asks a generative-AI provider for a JSON championship document (standings
//! plus one round of fixtures), validates it against the fixed shape the
//! frontend renders, and persists the blob. Generation output is untrusted:
//! the response may wrap the JSON in prose and frequently violates the schema,
//! so parse/validation failures and provider timeouts retry within a bounded
//! attempt budget. This is the only retry logic in the service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{json, Value};

use crate::config::generator::GeneratorConfig;
use crate::config::CONFIG;
use crate::error::{AppError, Result};
use crate::models::championship;
use crate::state::DbConn;

const CLASSIFICATION_ROWS: usize = 18;
const GAMES_PER_ROUND: usize = 9;
const FORM_LENGTH: usize = 5;

/// Outcome letters in a classification row's form array: win, draw, loss.
const FORM_LETTERS: [&str; 3] = ["V", "E", "D"];

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(CONFIG.generator.timeout_secs))
        .build()
        .expect("failed to build HTTP client")
});

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Wall-clock timeout on the provider call. Retryable.
    #[error("Content provider call timed out")]
    Timeout,
    #[error("Content provider call failed: {0}")]
    Http(String),
    #[error("Content provider returned no text content")]
    EmptyResponse,
}

/// Seam between the generator and the outbound AI call, so tests can script
/// responses without a network.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, ProviderError>;
}

/// Google Gemini `generateContent` client.
pub struct GeminiProvider {
    endpoint: String,
    api_key: String,
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
}

impl GeminiProvider {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

#[async_trait]
impl ContentProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, ProviderError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.temperature,
                "topP": self.top_p,
                "topK": self.top_k,
                "maxOutputTokens": self.max_output_tokens,
            },
        });

        let response = HTTP_CLIENT
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Http(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(ProviderError::Http(format!(
                "Provider responded with status {}",
                response.status()
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or(ProviderError::EmptyResponse)
    }
}

/// Generates and persists championship documents through a [`ContentProvider`].
#[derive(Clone)]
pub struct ChampionshipGenerator {
    provider: Arc<dyn ContentProvider>,
    max_attempts: u32,
}

impl ChampionshipGenerator {
    pub fn new(provider: impl ContentProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
            max_attempts: CONFIG.generator.max_attempts,
        }
    }

    #[cfg(test)]
    fn with_attempts(provider: impl ContentProvider + 'static, max_attempts: u32) -> Self {
        Self {
            provider: Arc::new(provider),
            max_attempts,
        }
    }

    /// Generate a schema-valid championship, persist it and return the row.
    /// Exhausting the attempt budget surfaces an internal error.
    pub async fn generate_and_store(&self, db: &DbConn) -> Result<championship::Model> {
        let prompt = build_prompt();

        for attempt in 1..=self.max_attempts {
            let raw = match self.provider.generate(&prompt).await {
                Ok(text) => text,
                Err(ProviderError::Timeout) => {
                    tracing::warn!(attempt, "Championship generation timed out, retrying");
                    continue;
                }
                Err(ProviderError::EmptyResponse) => {
                    tracing::warn!(attempt, "Provider returned no content, retrying");
                    continue;
                }
                Err(ProviderError::Http(reason)) => {
                    tracing::error!(attempt, %reason, "Provider call failed");
                    return Err(AppError::ServiceUnavailable(
                        "Content provider is unavailable".to_string(),
                    ));
                }
            };

            let Some(snippet) = extract_json(&raw) else {
                tracing::warn!(attempt, "No JSON object in provider output, retrying");
                continue;
            };
            let document: Value = match serde_json::from_str(snippet) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Unparseable championship JSON, retrying");
                    continue;
                }
            };

            if let Err(errors) = validate_championship(&document) {
                tracing::warn!(
                    attempt,
                    errors = ?errors,
                    "Championship document failed schema validation, retrying"
                );
                continue;
            }

            let row = championship::ActiveModel {
                data: Set(document.to_string()),
                created_at: Set(Utc::now()),
                ..Default::default()
            };
            return Ok(row.insert(db).await?);
        }

        Err(AppError::Internal(format!(
            "Championship generation failed after {} attempts",
            self.max_attempts
        )))
    }
}

fn build_prompt() -> String {
    format!(
        "Generate a fictional football championship as a single JSON object with \
         no surrounding text. Required top-level keys: \"championship_id\" (string), \
         \"championship_name\" (string), \"round\" (integer), \"generated_at\" \
         (ISO 8601 string), \"classification\" and \"games\". \"classification\" must \
         contain exactly {rows} rows, each with the fields: \"position\" (integer), \
         \"team\" (string), \"points\", \"played\", \"wins\", \"draws\", \"losses\", \
         \"goals_for\", \"goals_against\", \"goal_difference\" (all integers) and \
         \"form\" (array of exactly {form} letters, each one of \"V\", \"E\" or \"D\" \
         for win, draw, loss). \"games\" must contain exactly {games} entries, each \
         with \"home_team\" (string), \"away_team\" (string), \"schedule\" (time as \
         \"HH:MM\") and \"odds\" (object with numeric keys \"1\", \"x\" and \"2\", \
         each greater than 1.0). Invent all team names; do not use real clubs.",
        rows = CLASSIFICATION_ROWS,
        form = FORM_LENGTH,
        games = GAMES_PER_ROUND,
    )
}

/// Slice out the outermost `{...}` from prose-wrapped provider output.
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Validate a championship document against the fixed persisted shape,
/// collecting every field error instead of stopping at the first.
pub fn validate_championship(document: &Value) -> std::result::Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if !document.is_object() {
        return Err(vec!["document is not a JSON object".to_string()]);
    }

    for key in ["championship_id", "championship_name", "generated_at"] {
        match document.get(key).and_then(Value::as_str) {
            Some(s) if !s.trim().is_empty() => {}
            _ => errors.push(format!("{key}: missing or empty string")),
        }
    }
    if document.get("round").and_then(Value::as_i64).is_none() {
        errors.push("round: missing or not an integer".to_string());
    }

    match document.get("classification").and_then(Value::as_array) {
        Some(rows) if rows.len() == CLASSIFICATION_ROWS => {
            for (i, row) in rows.iter().enumerate() {
                validate_classification_row(i, row, &mut errors);
            }
        }
        Some(rows) => errors.push(format!(
            "classification: expected {} rows, got {}",
            CLASSIFICATION_ROWS,
            rows.len()
        )),
        None => errors.push("classification: missing or not an array".to_string()),
    }

    match document.get("games").and_then(Value::as_array) {
        Some(games) if games.len() == GAMES_PER_ROUND => {
            for (i, game) in games.iter().enumerate() {
                validate_game(i, game, &mut errors);
            }
        }
        Some(games) => errors.push(format!(
            "games: expected {} entries, got {}",
            GAMES_PER_ROUND,
            games.len()
        )),
        None => errors.push("games: missing or not an array".to_string()),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_classification_row(index: usize, row: &Value, errors: &mut Vec<String>) {
    match row.get("team").and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => {}
        _ => errors.push(format!("classification[{index}].team: missing or empty")),
    }

    for key in [
        "position",
        "points",
        "played",
        "wins",
        "draws",
        "losses",
        "goals_for",
        "goals_against",
        "goal_difference",
    ] {
        if row.get(key).and_then(Value::as_i64).is_none() {
            errors.push(format!(
                "classification[{index}].{key}: missing or not an integer"
            ));
        }
    }

    match row.get("form").and_then(Value::as_array) {
        Some(form) if form.len() == FORM_LENGTH => {
            for (j, letter) in form.iter().enumerate() {
                let valid = letter
                    .as_str()
                    .map(|s| FORM_LETTERS.contains(&s))
                    .unwrap_or(false);
                if !valid {
                    errors.push(format!(
                        "classification[{index}].form[{j}]: expected one of V, E, D"
                    ));
                }
            }
        }
        _ => errors.push(format!(
            "classification[{index}].form: expected an array of {FORM_LENGTH} letters"
        )),
    }
}

fn validate_game(index: usize, game: &Value, errors: &mut Vec<String>) {
    for key in ["home_team", "away_team"] {
        match game.get(key).and_then(Value::as_str) {
            Some(s) if !s.trim().is_empty() => {}
            _ => errors.push(format!("games[{index}].{key}: missing or empty")),
        }
    }

    match game.get("schedule").and_then(Value::as_str) {
        Some(s) if is_valid_time(s) => {}
        _ => errors.push(format!("games[{index}].schedule: expected HH:MM")),
    }

    match game.get("odds") {
        Some(odds) if odds.is_object() => {
            for key in ["1", "x", "2"] {
                match odds.get(key).and_then(Value::as_f64) {
                    Some(v) if v > 1.0 => {}
                    _ => errors.push(format!(
                        "games[{index}].odds.{key}: expected a number greater than 1.0"
                    )),
                }
            }
        }
        _ => errors.push(format!("games[{index}].odds: missing or not an object")),
    }
}

/// Strict `HH:MM`, 24-hour clock.
fn is_valid_time(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return false;
    }
    if !bytes[0].is_ascii_digit()
        || !bytes[1].is_ascii_digit()
        || !bytes[3].is_ascii_digit()
        || !bytes[4].is_ascii_digit()
    {
        return false;
    }
    let hours = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
    let minutes = (bytes[3] - b'0') * 10 + (bytes[4] - b'0');
    hours < 24 && minutes < 60
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::create_test_db;
    use sea_orm::EntityTrait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays a fixed sequence of provider outcomes.
    struct ScriptedProvider {
        responses: Mutex<VecDeque<std::result::Result<String, ProviderError>>>,
    }

    impl ScriptedProvider {
        fn new(
            responses: impl IntoIterator<Item = std::result::Result<String, ProviderError>>,
        ) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
            }
        }
    }

    #[async_trait]
    impl ContentProvider for ScriptedProvider {
        async fn generate(&self, _prompt: &str) -> std::result::Result<String, ProviderError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("scripted provider ran out of responses")
        }
    }

    fn sample_document() -> Value {
        let classification: Vec<Value> = (1..=CLASSIFICATION_ROWS as i64)
            .map(|position| {
                json!({
                    "position": position,
                    "team": format!("Clube Atletico {position}"),
                    "points": 40 - position,
                    "played": 20,
                    "wins": 10,
                    "draws": 5,
                    "losses": 5,
                    "goals_for": 30,
                    "goals_against": 20,
                    "goal_difference": 10,
                    "form": ["V", "E", "D", "V", "V"],
                })
            })
            .collect();
        let games: Vec<Value> = (0..GAMES_PER_ROUND)
            .map(|i| {
                json!({
                    "home_team": format!("Clube Atletico {}", 2 * i + 1),
                    "away_team": format!("Clube Atletico {}", 2 * i + 2),
                    "schedule": "16:30",
                    "odds": { "1": 2.1, "x": 3.2, "2": 3.6 },
                })
            })
            .collect();

        json!({
            "championship_id": "liga-fantasia-2025",
            "championship_name": "Liga Fantasia",
            "round": 21,
            "generated_at": "2025-09-01T12:00:00Z",
            "classification": classification,
            "games": games,
        })
    }

    #[test]
    fn sample_document_passes_validation() {
        assert!(validate_championship(&sample_document()).is_ok());
    }

    #[test]
    fn missing_game_is_itemized() {
        let mut doc = sample_document();
        doc["games"].as_array_mut().unwrap().pop();

        let errors = validate_championship(&doc).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("games: expected 9")));
    }

    #[test]
    fn bad_form_letter_and_odds_are_both_reported() {
        let mut doc = sample_document();
        doc["classification"][0]["form"][2] = json!("W");
        doc["games"][3]["odds"]["x"] = json!(0.5);

        let errors = validate_championship(&doc).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.contains("classification[0].form[2]")));
        assert!(errors.iter().any(|e| e.contains("games[3].odds.x")));
    }

    #[test]
    fn schedule_must_be_a_valid_clock_time() {
        assert!(is_valid_time("00:00"));
        assert!(is_valid_time("23:59"));
        assert!(!is_valid_time("24:00"));
        assert!(!is_valid_time("12:60"));
        assert!(!is_valid_time("9:30"));
        assert!(!is_valid_time("12-30"));
    }

    #[test]
    fn json_is_extracted_from_prose() {
        let wrapped = "Sure! Here is your championship:\n```json\n{\"round\": 1}\n```\nEnjoy.";
        assert_eq!(extract_json(wrapped), Some("{\"round\": 1}"));
        assert_eq!(extract_json("no json here"), None);
    }

    #[tokio::test]
    async fn valid_generation_is_persisted() {
        let db = create_test_db().await;
        let provider = ScriptedProvider::new([Ok(sample_document().to_string())]);
        let generator = ChampionshipGenerator::with_attempts(provider, 3);

        let row = generator.generate_and_store(&db).await.unwrap();
        let stored: Value = serde_json::from_str(&row.data).unwrap();
        assert_eq!(stored["championship_name"], "Liga Fantasia");

        let count = crate::models::prelude::Championship::find()
            .all(&db)
            .await
            .unwrap()
            .len();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn invalid_shape_retries_then_succeeds() {
        let db = create_test_db().await;
        let mut truncated = sample_document();
        truncated["games"].as_array_mut().unwrap().pop();

        let provider = ScriptedProvider::new([
            Ok(truncated.to_string()),
            Ok(format!("Here you go: {}", sample_document())),
        ]);
        let generator = ChampionshipGenerator::with_attempts(provider, 3);

        assert!(generator.generate_and_store(&db).await.is_ok());
    }

    #[tokio::test]
    async fn timeout_is_retried() {
        let db = create_test_db().await;
        let provider = ScriptedProvider::new([
            Err(ProviderError::Timeout),
            Ok(sample_document().to_string()),
        ]);
        let generator = ChampionshipGenerator::with_attempts(provider, 3);

        assert!(generator.generate_and_store(&db).await.is_ok());
    }

    #[tokio::test]
    async fn exhausted_attempts_surface_internal_error() {
        let db = create_test_db().await;
        let provider = ScriptedProvider::new([
            Ok("not json at all".to_string()),
            Ok("still not json".to_string()),
        ]);
        let generator = ChampionshipGenerator::with_attempts(provider, 2);

        let result = generator.generate_and_store(&db).await;
        assert!(matches!(result, Err(AppError::Internal(_))));

        let rows = crate::models::prelude::Championship::find()
            .all(&db)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }
}
