//! Admin API 模块 (脚手架)
//!
//! Stub endpoints; the admin panel ships after auth/roles exist.

use axum::{Json, Router, routing::get, routing::patch};

use super::{Placeholder, placeholder};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/admin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/users", get(list_users))
        .route("/users/{id}/role", patch(update_user_role))
        .route("/users/{id}/status", patch(update_user_status))
        .route("/restaurants/{id}/status", patch(update_restaurant_status))
}

async fn dashboard() -> Json<Placeholder> {
    placeholder("Admin dashboard endpoint - not implemented yet")
}

async fn list_users() -> Json<Placeholder> {
    placeholder("Admin user listing endpoint - not implemented yet")
}

async fn update_user_role() -> Json<Placeholder> {
    placeholder("Admin role update endpoint - not implemented yet")
}

async fn update_user_status() -> Json<Placeholder> {
    placeholder("Admin user status endpoint - not implemented yet")
}

async fn update_restaurant_status() -> Json<Placeholder> {
    placeholder("Admin restaurant status endpoint - not implemented yet")
}
