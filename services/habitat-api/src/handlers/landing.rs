//! Landing page handler.

use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::Response};
use habitat_protocol::{media_types, RootResponse};
use tracing::warn;

use crate::error::json_response;
use crate::state::AppState;

/// GET / - Service description and available layers
pub async fn root_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let service = Arc::clone(&state.service);
    let layers = tokio::task::spawn_blocking(move || service.list_layers()).await;

    // The landing page stays up without a metadata table.
    let available_layers = match layers {
        Ok(Ok(table)) => table.keys().cloned().collect(),
        Ok(Err(e)) => {
            warn!(error = %e, "Landing page without layer list");
            Vec::new()
        }
        Err(e) => {
            warn!(error = %e, "Landing page without layer list");
            Vec::new()
        }
    };

    let root = RootResponse::new(
        state.version.clone(),
        available_layers,
        state.service.data_dir().root().display().to_string(),
    );
    json_response(StatusCode::OK, media_types::JSON, &root)
}
