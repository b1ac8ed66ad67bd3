use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    Result, WeatherMapError,
    config::WeatherMapConfig,
    input::QueryDebouncer,
    map::{MapSnapshot, SnapshotSurface},
    models::{PlaceCandidate, ResolvedView},
    pipeline::{Pipeline, Resolution, Trigger},
};

#[derive(Clone)]
pub struct ApiState {
    pub pipeline: Pipeline<SnapshotSurface>,
    pub input: QueryDebouncer,
}

impl ApiState {
    /// Live providers, with the map starting at the configured default view
    pub fn from_config(config: &WeatherMapConfig) -> Result<Self> {
        let pipeline = Pipeline::from_config(config, SnapshotSurface::default())?;
        pipeline
            .session()
            .center_on(config.map.default_center, config.map.default_zoom);

        Ok(Self {
            pipeline,
            input: QueryDebouncer::from_config(&config.search),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SelectResponse {
    Rendered { view: ResolvedView },
    Superseded,
    Failed { error: String },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MapState {
    pub generation: u64,
    #[serde(flatten)]
    pub snapshot: MapSnapshot,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/suggest", get(suggest))
        .route("/select", post(select))
        .route("/map", get(get_map))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn suggest(
    State(state): State<ApiState>,
    Query(params): Query<SuggestParams>,
) -> Json<Vec<PlaceCandidate>> {
    match state.input.accepts(&params.q) {
        Some(query) => Json(state.pipeline.suggest(query).await),
        None => Json(Vec::new()),
    }
}

async fn select(
    State(state): State<ApiState>,
    Json(trigger): Json<Trigger>,
) -> (StatusCode, Json<SelectResponse>) {
    // Detached so a dropped request does not leave the newest invocation half-rendered
    let pipeline = state.pipeline.clone();
    let outcome = tokio::spawn(async move { pipeline.run(trigger).await }).await;

    match outcome {
        Ok(Ok(Resolution::Rendered(view))) => (StatusCode::OK, Json(SelectResponse::Rendered { view })),
        Ok(Ok(Resolution::Superseded)) => (StatusCode::OK, Json(SelectResponse::Superseded)),
        Ok(Err(e)) => (
            status_for(&e),
            Json(SelectResponse::Failed {
                error: e.user_message(),
            }),
        ),
        Err(e) => {
            tracing::error!("Pipeline task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SelectResponse::Failed {
                    error: "internal error".to_string(),
                }),
            )
        }
    }
}

async fn get_map(State(state): State<ApiState>) -> Json<MapState> {
    let session = state.pipeline.session();
    Json(MapState {
        generation: session.generation().0,
        snapshot: session.surface().snapshot().clone(),
    })
}

fn status_for(error: &WeatherMapError) -> StatusCode {
    match error {
        WeatherMapError::Network { .. } | WeatherMapError::MalformedResponse { .. } => {
            StatusCode::BAD_GATEWAY
        }
        WeatherMapError::NoResults { .. } => StatusCode::NOT_FOUND,
        WeatherMapError::Validation { .. } => StatusCode::BAD_REQUEST,
        WeatherMapError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&WeatherMapError::network("down")),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&WeatherMapError::no_results("'x'")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&WeatherMapError::validation("lat")),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_state_starts_at_default_view() {
        let config = WeatherMapConfig::default();
        let state = ApiState::from_config(&config).unwrap();
        let session = state.pipeline.session();
        let snapshot = session.surface().snapshot();

        assert_eq!(snapshot.center, Some(config.map.default_center));
        assert_eq!(snapshot.zoom, Some(8));
        assert!(snapshot.markers.is_empty());
        assert_eq!(session.generation().0, 0);
    }

    #[test]
    fn test_select_response_shape() {
        let json = serde_json::to_value(SelectResponse::Superseded).unwrap();
        assert_eq!(json, serde_json::json!({"status": "superseded"}));
    }
}
