mod handlers;
mod processors;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use handlers::{ErrorBody, MessageBody, ToggleGeneratorInput};
pub use state::{BackendState, ToggleError};

/// Port the shell expects a development backend on.
pub const DEFAULT_PORT: u16 = 5001;

pub fn create_router(state: BackendState) -> Router {
    let api = Router::new()
        // Processing
        .route("/process/toggle_generator", post(handlers::toggle_generator))
        .route("/process/{id}", post(handlers::process_feature))
        // Catalog
        .route("/features", get(handlers::list_features))
        .route("/features/{id}", get(handlers::get_feature))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
