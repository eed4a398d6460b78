use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{admin, auth, fare};
use crate::middleware::auth::{auth_middleware, require_admin};
use crate::middleware::rate_limit::{create_public_governor, log_request};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // IP-based governor for everything unauthenticated
    let public_governor = create_public_governor();

    // Public routes (rate limited per IP)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(public_governor.clone());

    // Public fare routes (quote computation, category display)
    let public_routes = Router::new()
        .route("/fare/quote", post(fare::quote_fare))
        .route("/truck-categories", get(fare::list_truck_categories))
        .layer(public_governor);

    // Admin routes (requires auth + admin role)
    let admin_routes = Router::new()
        .route("/truck-categories", get(admin::list_truck_categories))
        .route("/truck-categories", post(admin::create_truck_category))
        .route("/truck-categories/{id}", put(admin::update_truck_category))
        .route(
            "/truck-categories/{id}",
            delete(admin::delete_truck_category),
        )
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", public_routes)
        .nest("/api/admin", admin_routes)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
