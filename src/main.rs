mod auth;
mod config;
mod state;
mod translate;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    routing::post,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::state::AppState;
use crate::translate::{TranslateError, TranslationRequest, TranslationResponse};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "darija_translator=info,tower_http=info".into()),
        )
        .init();

    let config = config::Config::from_env();
    info!("Darija Translator starting...");
    info!("Gemini base URL: {}", config.base_url);
    info!("Gemini model: {}", config.model);
    if config.api_key.is_none() {
        warn!("GEMINI_API_KEY is not set, translate requests will fail");
    }
    if !config.credentials.is_configured() {
        warn!("AUTH_USERNAME/AUTH_PASSWORD not set, every request will be rejected");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/translate", post(translate).options(preflight))
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_basic_auth,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> Result<Json<TranslationResponse>, TranslateError> {
    let Json(request) = payload.map_err(|e| {
        warn!("Rejected translate body: {}", e);
        TranslateError::BadRequest("Field 'text' is required".to_string())
    })?;
    let (text, direction) = request.validate()?;

    let translated_text =
        translate::translate_text(&state.config, &state.client, &text, direction).await?;

    Ok(Json(TranslationResponse { translated_text }))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}
