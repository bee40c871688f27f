//! Route table for the pgdesk API.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the application router with all routes.
pub fn build_router(state: AppState) -> Router {
    // The UI is served from a file:// or dev-server origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let health_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::api_health));

    let schema_routes = Router::new()
        .route("/api/connect", post(handlers::connection::connect))
        .route(
            "/api/getTablesAndSchemas",
            post(handlers::schema::get_tables_and_schemas),
        )
        .route(
            "/api/getTableStructure",
            post(handlers::schema::get_table_structure),
        )
        .route("/api/getTableInfo", post(handlers::schema::get_table_info));

    let column_routes = Router::new()
        .route("/api/addColumn", post(handlers::columns::add_column))
        .route("/api/editColumn", post(handlers::columns::edit_column))
        .route("/api/deleteColumn", post(handlers::columns::delete_column));

    let row_routes = Router::new()
        .route("/api/getTableValues", post(handlers::rows::get_table_values))
        .route("/api/editRow", post(handlers::rows::edit_row))
        .route("/api/deleteRow", post(handlers::rows::delete_row))
        .route("/api/runQuery", post(handlers::query::run_query));

    let session_routes = Router::new().route(
        "/api/session",
        get(handlers::session::get_session)
            .put(handlers::session::save_session)
            .delete(handlers::session::clear_session),
    );

    Router::new()
        .merge(health_routes)
        .merge(schema_routes)
        .merge(column_routes)
        .merge(row_routes)
        .merge(session_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
