use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    EnDa,
    DaEn,
}

impl Direction {
    /// Anything other than `DA_EN` translates English to Darija.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "DA_EN" => Direction::DaEn,
            _ => Direction::EnDa,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TranslationRequest {
    pub text: Option<String>,
    pub direction: Option<String>,
}

impl TranslationRequest {
    /// Returns the untrimmed text and the requested direction.
    pub fn validate(self) -> Result<(String, Direction), TranslateError> {
        let text = self
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| TranslateError::BadRequest("Field 'text' is required".to_string()))?;
        let direction = Direction::parse(self.direction.as_deref().unwrap_or("EN_DA"));
        Ok((text, direction))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResponse {
    pub translated_text: String,
}

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Gemini API key not configured")]
    Config,

    #[error("Gemini API Error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Always built through `TranslateError::transport`, which drops the URL.
    #[error("Gemini request failed: {0}")]
    Transport(reqwest::Error),

    #[error("Unexpected Gemini response: {0}")]
    Parse(String),
}

impl TranslateError {
    /// The request URL carries the API key as a query parameter.
    fn transport(e: reqwest::Error) -> Self {
        TranslateError::Transport(e.without_url())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            TranslateError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TranslateError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

pub fn build_prompt(text: &str, direction: Direction) -> String {
    match direction {
        Direction::DaEn => format!(
            "Translate the following Moroccan Darija text to English.\n\
             Use natural fluent English.\n\
             Without explain details.\n\
             Text: {}\n",
            text
        ),
        Direction::EnDa => format!(
            "Translate the following English text to Moroccan Darija only.\n\
             Use natural everyday spoken language.\n\
             Use Arabic letters.\n\
             Text: {}\n",
            text
        ),
    }
}

/// One upstream round-trip, no retries.
pub async fn translate_text(
    config: &Config,
    client: &reqwest::Client,
    text: &str,
    direction: Direction,
) -> Result<String, TranslateError> {
    let api_key = config.api_key.as_deref().ok_or(TranslateError::Config)?;

    let prompt = build_prompt(text, direction);
    let request = GenerateRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart { text: &prompt }],
        }],
    };

    let url = format!(
        "{}/v1beta/models/{}:generateContent",
        config.base_url.trim_end_matches('/'),
        config.model
    );
    debug!("POST {} ({:?}, {} chars)", url, direction, text.chars().count());

    let response = client
        .post(&url)
        .query(&[("key", api_key)])
        .json(&request)
        .send()
        .await
        .map_err(|e| {
            let err = TranslateError::transport(e);
            error!("{}", err);
            err
        })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| {
        let err = TranslateError::transport(e);
        error!("Failed to read Gemini response: {}", err);
        err
    })?;

    if status != reqwest::StatusCode::OK {
        error!("Gemini API Error {}: {}", status.as_u16(), body);
        return Err(TranslateError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    extract_text(&body).inspect_err(|e| {
        let preview: String = body.chars().take(500).collect();
        error!("{} - body: {}", e, preview);
    })
}

fn extract_text(body: &str) -> Result<String, TranslateError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| TranslateError::Parse(e.to_string()))?;

    parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| TranslateError::Parse("no candidates".to_string()))?
        .content
        .parts
        .into_iter()
        .next()
        .map(|p| p.text)
        .ok_or_else(|| TranslateError::Parse("candidate has no parts".to_string()))
}
