//! Auth API 模块 (脚手架)
//!
//! Stub endpoints only. Registration, login, JWT issuing/refresh and
//! password recovery are not implemented yet; every route answers with a
//! placeholder payload so clients can wire against the final paths.

use axum::{Json, Router, routing::get, routing::post};

use super::{Placeholder, placeholder};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh", post(refresh))
        .route("/profile", get(profile))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}

async fn register() -> Json<Placeholder> {
    placeholder("Register endpoint - not implemented yet")
}

async fn login() -> Json<Placeholder> {
    placeholder("Login endpoint - not implemented yet")
}

async fn logout() -> Json<Placeholder> {
    placeholder("Logout endpoint - not implemented yet")
}

async fn refresh() -> Json<Placeholder> {
    placeholder("Token refresh endpoint - not implemented yet")
}

async fn profile() -> Json<Placeholder> {
    placeholder("Profile endpoint - not implemented yet")
}

async fn forgot_password() -> Json<Placeholder> {
    placeholder("Forgot password endpoint - not implemented yet")
}

async fn reset_password() -> Json<Placeholder> {
    placeholder("Reset password endpoint - not implemented yet")
}
