use std::env;

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Generative-AI provider endpoint for championship generation.
    pub endpoint: String,
    pub api_key: String,
    /// Wall-clock timeout for a single provider call, in seconds.
    pub timeout_secs: u64,
    /// Bounded retry budget for invalid/unparseable generations.
    pub max_attempts: u32,

    // Generation parameters
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl GeneratorConfig {
    pub fn from_env() -> Self {
        Self {
            endpoint: env::var("BETCLASS_GENERATOR_ENDPOINT").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
                    .to_string()
            }),
            api_key: env::var("BETCLASS_GENERATOR_API_KEY").unwrap_or_default(),
            timeout_secs: env::var("BETCLASS_GENERATOR_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            max_attempts: env::var("BETCLASS_GENERATOR_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            temperature: 0.9,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 4096,
        }
    }
}
