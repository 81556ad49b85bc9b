use std::sync::Arc;
use std::time::Duration;

use auth::JwtHandler;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::change_password::change_password;
use super::handlers::delete_user::delete_user;
use super::handlers::get_user::get_user;
use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::refresh_token::refresh_token;
use super::handlers::register::register;
use super::handlers::update_email::update_email;
use super::handlers::update_user_status::update_user_status;
use super::middleware::authenticate;
use super::middleware::optional_authenticate;
use super::middleware::require_role;
use super::middleware::RequiredRoles;
use crate::domain::user::models::Role;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub jwt_handler: Arc<JwtHandler>,
}

pub fn create_router(user_service: Arc<dyn UserServicePort>, jwt_handler: Arc<JwtHandler>) -> Router {
    let state = AppState {
        user_service,
        jwt_handler,
    };

    let public_routes = Router::new()
        .route("/api/users/register", post(register))
        .route("/api/auth/login", post(login));

    let optional_auth_routes = Router::new()
        .route("/api/users/:user_id", get(get_user))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.jwt_handler),
            optional_authenticate,
        ));

    let protected_routes = Router::new()
        .route("/api/auth/refresh", post(refresh_token))
        .route("/api/me", get(me))
        .route("/api/me/password", put(change_password))
        .route("/api/me/email", put(update_email))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.jwt_handler),
            authenticate,
        ));

    // Layers run bottom-up: authenticate, then the role guard.
    let admin_routes = Router::new()
        .route("/api/admin/users/:user_id/status", patch(update_user_status))
        .route("/api/admin/users/:user_id", delete(delete_user))
        .route_layer(middleware::from_fn_with_state(
            RequiredRoles::new([Role::Admin.as_str()]),
            require_role,
        ))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.jwt_handler),
            authenticate,
        ));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(optional_auth_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
