//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`restaurants`] - 餐厅目录接口
//! - [`categories`] - 菜系分类接口
//! - [`addresses`] - 餐厅地址接口
//! - [`schedules`] - 营业时间接口
//! - [`menus`] - 菜单接口
//! - [`products`] - 菜品接口
//! - [`tables`] - 桌台与空位查询接口
//! - [`reservations`] - 预订接口
//! - [`orders`] - 订单接口
//! - [`reviews`] - 点评接口
//! - [`auth`] / [`users`] / [`admin`] - 脚手架 (占位实现)

pub mod health;

// Catalog
pub mod addresses;
pub mod categories;
pub mod menus;
pub mod products;
pub mod restaurants;
pub mod schedules;

// Booking & orders
pub mod orders;
pub mod reservations;
pub mod tables;

// Reviews
pub mod reviews;

// Scaffolding (stub endpoints)
pub mod admin;
pub mod auth;
pub mod users;

use axum::{Json, Router};
use serde::Serialize;

use crate::core::ServerState;

/// Assemble the full application router.
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(restaurants::router())
        .merge(categories::router())
        .merge(addresses::router())
        .merge(schedules::router())
        .merge(menus::router())
        .merge(products::router())
        .merge(tables::router())
        .merge(reservations::router())
        .merge(orders::router())
        .merge(reviews::router())
        .merge(auth::router())
        .merge(users::router())
        .merge(admin::router())
}

/// Payload returned by the unimplemented scaffolding endpoints.
#[derive(Debug, Serialize)]
pub struct Placeholder {
    pub message: &'static str,
    pub data: Option<()>,
}

pub(crate) fn placeholder(message: &'static str) -> Json<Placeholder> {
    Json(Placeholder {
        message,
        data: None,
    })
}
