//! Users API 模块 (脚手架)
//!
//! Stub endpoints; user self-service lands together with auth.

use axum::{Json, Router, routing::get, routing::patch};

use super::{Placeholder, placeholder};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/users", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/me", get(me).patch(update_me))
        .route("/me/password", patch(update_password))
        .route("/me/addresses", get(my_addresses))
}

async fn me() -> Json<Placeholder> {
    placeholder("Current user endpoint - not implemented yet")
}

async fn update_me() -> Json<Placeholder> {
    placeholder("Update profile endpoint - not implemented yet")
}

async fn update_password() -> Json<Placeholder> {
    placeholder("Change password endpoint - not implemented yet")
}

async fn my_addresses() -> Json<Placeholder> {
    placeholder("User addresses endpoint - not implemented yet")
}
