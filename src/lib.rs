use crate::cli::Args;
use anyhow::Context;
use axum::Router;
use axum::routing::{get, post};
use deadpool_diesel::Runtime;
use deadpool_diesel::postgres::{Manager, Pool};
use tracing::log::info;

pub mod cli;
pub mod completion;
pub mod errors;
pub mod model;
pub mod payloads;
pub mod response;
pub mod schema;

mod api;

pub fn init_router(args: &Args) -> anyhow::Result<Router> {
    info!("Initializing database pool...");
    let pool = init_pool(&args.connection_str, args.db_pool_max_size)
        .context("Failed to initialize database pool")?;

    info!("Initializing router...");
    Ok(init_router_internal(pool))
}

pub fn init_test_router(pool: Pool) -> Router {
    init_router_internal(pool)
}

fn init_router_internal(pool: Pool) -> Router {
    Router::new()
        .nest("/teacher", teacher_routes())
        .nest("/student", student_routes())
        .nest("/certificates", certificate_routes())
        .with_state(pool)
}

fn init_pool(conn_str: &str, max_size: u32) -> anyhow::Result<Pool> {
    let manager = Manager::new(conn_str, Runtime::Tokio1);
    let pool = Pool::builder(manager).max_size(max_size as usize).build()?;
    Ok(pool)
}

fn teacher_routes() -> Router<Pool> {
    Router::new()
        .route(
            "/can_complete_group/{group_id}",
            get(api::teacher::can_complete_group),
        )
        .route(
            "/complete_group/{group_id}",
            post(api::teacher::complete_group),
        )
        .route(
            "/get_attendance_statistics/{group_id}",
            get(api::teacher::get_attendance_statistics),
        )
}

fn student_routes() -> Router<Pool> {
    Router::new()
        .route(
            "/get_completed_groups",
            get(api::student::get_completed_groups),
        )
        .route("/get_certificate/{uuid}", get(api::student::get_certificate))
}

fn certificate_routes() -> Router<Pool> {
    Router::new().route("/verify/{uuid}", get(api::certificates::verify_certificate))
}
