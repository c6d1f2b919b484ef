use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header::ACCEPT, HeaderMap},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cloudsave_core::assistant::fixture::{FileFixtureSource, FixtureSource};
use cloudsave_core::assistant::stream::{spawn_chunk_stream, StreamOptions};
use cloudsave_core::assistant::{compose_reply, AssistantRequest};
use cloudsave_core::domain::recommendation::RecommendationStub;
use cloudsave_core::domain::timeline::TimelineBlock;
use cloudsave_core::error::GenerationError;
use cloudsave_core::mock::recommendations::RecommendationGenerator;
use cloudsave_core::mock::timelines::TimelineGenerator;
use cloudsave_core::seed;

mod error;

use error::ApiError;

const DEFAULT_FIXTURE_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/assistant.json");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = cloudsave_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let fixture_path = settings
        .assistant_fixture_path
        .clone()
        .unwrap_or_else(|| DEFAULT_FIXTURE_PATH.to_string());
    let fixtures = FileFixtureSource::new(fixture_path);

    // The fixture is re-read per request; a bad file only degrades the assistant endpoint.
    if let Err(e) = fixtures.load().await {
        sentry_anyhow::capture_anyhow(&e);
        let detail = format!("{e:#}");
        tracing::error!(
            source = %fixtures.describe(),
            error = %detail,
            "assistant fixture failed to load; starting API in degraded mode"
        );
    }

    if let Some(seed) = settings.mock_seed {
        tracing::warn!(seed, "MOCK_SEED set; mock endpoints ignore the daily seed");
    }

    let state = AppState {
        fixtures: Arc::new(fixtures),
        mock_seed: settings.mock_seed,
        stream: settings.stream_options(),
    };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/mock/recommendations", get(get_mock_recommendations))
        .route("/api/mock/timelines", get(get_mock_timelines))
        .route("/api/assistant", post(post_assistant))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    fixtures: Arc<dyn FixtureSource>,
    mock_seed: Option<u32>,
    stream: StreamOptions,
}

impl AppState {
    fn seed_for(&self, date_arg: Option<&str>) -> Result<(NaiveDate, u32), ApiError> {
        let date = seed::resolve_date(date_arg, Utc::now()).map_err(|e| {
            ApiError::bad_request("INVALID_DATE", e.to_string(), "Pass ?date=YYYY-MM-DD.")
        })?;
        let seed = self.mock_seed.unwrap_or_else(|| seed::daily_seed(date));
        Ok((date, seed))
    }
}

#[derive(Debug, Deserialize)]
struct DateQuery {
    date: Option<String>,
}

#[derive(Debug, Serialize)]
struct MockBatch<T> {
    date: NaiveDate,
    seed: u32,
    items: Vec<T>,
}

async fn get_mock_recommendations(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<MockBatch<RecommendationStub>>, ApiError> {
    let (date, seed) = state.seed_for(query.date.as_deref())?;
    let items = RecommendationGenerator::default()
        .generate_with(&mut seed::create_seeded_random(seed))
        .map_err(anyhow::Error::new)?;

    tracing::debug!(%date, seed, count = items.len(), "generated mock recommendations");
    Ok(Json(MockBatch { date, seed, items }))
}

async fn get_mock_timelines(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<MockBatch<TimelineBlock>>, ApiError> {
    let (date, seed) = state.seed_for(query.date.as_deref())?;
    let items = TimelineGenerator::default()
        .generate_with(&mut seed::create_seeded_random(seed), date)
        .map_err(|e| match e {
            GenerationError::DateOutOfRange { .. } => {
                ApiError::bad_request(
                    "INVALID_DATE",
                    e.to_string(),
                    "Pass a date with a full window before it.",
                )
            }
            other => anyhow::Error::new(other).into(),
        })?;

    tracing::debug!(%date, seed, count = items.len(), "generated mock timelines");
    Ok(Json(MockBatch { date, seed, items }))
}

async fn post_assistant(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<AssistantRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body.map_err(|e| {
        ApiError::bad_request(
            "INVALID_BODY",
            e.body_text(),
            "Send a JSON object like {\"prompt\": \"...\"}.",
        )
    })?;
    let prompt = request.validated_prompt().map_err(|e| {
        ApiError::bad_request(
            "INVALID_PROMPT",
            e.to_string(),
            "Prompts must be between 1 and 1000 characters.",
        )
    })?;

    let fixture = state.fixtures.load().await?;
    let reply = compose_reply(&fixture, prompt)?;

    let streaming = wants_event_stream(&headers);
    tracing::info!(
        interaction_id = %reply.interaction_id,
        references = reply.references.len(),
        streaming,
        "assistant reply ready"
    );

    if streaming {
        return Ok(event_stream(reply.response, state.stream).into_response());
    }
    Ok(Json(reply).into_response())
}

fn wants_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("text/event-stream"))
}

/// Chunk events followed by `{"done": true}`. Dropping the response (client
/// disconnect) drops the receiver, which stops the emitting task.
fn event_stream(
    text: String,
    opts: StreamOptions,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let (rx, _emitter) = spawn_chunk_stream(text, opts);
    let events = futures::stream::unfold(rx, |mut rx| async move {
        let event = rx.recv().await?;
        Some((Event::default().json_data(&event), rx))
    });
    Sse::new(events).keep_alive(KeepAlive::default())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &cloudsave_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
