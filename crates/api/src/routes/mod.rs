//! API routes

pub mod accounts;
pub mod auth;
pub mod health;
pub mod inquiries;
pub mod tires;
pub mod vehicles;
pub mod wheels;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    auth::{require_auth, require_super_admin},
    state::AppState,
};

/// Create all API routes
pub fn create_router(state: AppState) -> Router {
    let auth_state = state.auth_state();

    // Health check routes (at root level for infrastructure monitoring)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    // Public storefront and auth routes (no auth required)
    let public_api_routes = Router::new()
        .route("/admin/login", post(auth::login))
        .route("/admin/forgot-password", post(auth::forgot_password))
        .route("/admin/reset-password/:token", get(auth::verify_reset_token))
        .route("/admin/reset-password", post(auth::reset_password))
        .route("/inquiries", post(inquiries::submit_inquiry))
        .route("/vehicles", get(vehicles::list_vehicles))
        .route("/vehicles/:vehicle_id", get(vehicles::get_vehicle))
        .route("/tires", get(tires::list_tires))
        .route("/tires/:tire_id", get(tires::get_tire))
        .route("/wheels", get(wheels::list_wheels))
        .route("/wheels/:wheel_id", get(wheels::get_wheel));

    // Back-office routes (bearer token required)
    let protected_api_routes = Router::new()
        .route("/admin/me", get(auth::me))
        // Inventory management
        .route(
            "/admin/vehicles",
            get(vehicles::admin_list_vehicles).post(vehicles::create_vehicle),
        )
        .route(
            "/admin/vehicles/:vehicle_id",
            patch(vehicles::update_vehicle).delete(vehicles::delete_vehicle),
        )
        .route(
            "/admin/tires",
            get(tires::admin_list_tires).post(tires::create_tire),
        )
        .route(
            "/admin/tires/:tire_id",
            patch(tires::update_tire).delete(tires::delete_tire),
        )
        .route(
            "/admin/wheels",
            get(wheels::admin_list_wheels).post(wheels::create_wheel),
        )
        .route(
            "/admin/wheels/:wheel_id",
            patch(wheels::update_wheel).delete(wheels::delete_wheel),
        )
        // Inquiry triage
        .route("/admin/inquiries", get(inquiries::list_inquiries))
        .route(
            "/admin/inquiries/:inquiry_id",
            get(inquiries::get_inquiry).patch(inquiries::update_inquiry),
        )
        .route(
            "/admin/inquiries/:inquiry_id/reply",
            post(inquiries::reply_to_inquiry),
        )
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            require_auth,
        ));

    // Account management (super admin only); layers run outermost-last, so
    // require_auth runs before the role gate
    let super_admin_routes = Router::new()
        .route(
            "/admin/accounts",
            get(accounts::list_accounts).post(accounts::create_account),
        )
        .route(
            "/admin/accounts/:account_id",
            patch(accounts::update_account).delete(accounts::delete_account),
        )
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            require_super_admin,
        ))
        .layer(middleware::from_fn_with_state(auth_state, require_auth));

    let api_routes = Router::new()
        .merge(public_api_routes)
        .merge(protected_api_routes)
        .merge(super_admin_routes);

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // Global request body size limit to prevent DoS via large payloads
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}
