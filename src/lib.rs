use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware as axum_mw,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub mod authz;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    // --- Auth routes (login/register public, profile behind auth) ---
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route(
            "/profile",
            get(routes::auth::profile).layer(axum_mw::from_fn_with_state(
                state.clone(),
                middleware::auth::authenticate,
            )),
        );

    // --- Organizations (creation is public, everything else scoped) ---
    let organization_routes = Router::new()
        .route("/", post(routes::organizations::create_organization))
        .route(
            "/",
            get(routes::organizations::list_organizations).layer(axum_mw::from_fn_with_state(
                state.clone(),
                middleware::auth::authenticate,
            )),
        )
        .route(
            "/:id",
            get(routes::organizations::get_organization)
                .put(routes::organizations::update_organization)
                .layer(axum_mw::from_fn_with_state(
                    state.clone(),
                    middleware::auth::authenticate,
                )),
        );

    let user_routes = Router::new()
        .route(
            "/",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route("/:id/role", put(routes::users::update_user_role))
        .route("/:id", delete(routes::users::delete_user))
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::authenticate,
        ));

    let business_routes = Router::new()
        .route(
            "/",
            get(routes::businesses::list_businesses).post(routes::businesses::create_business),
        )
        .route(
            "/:id",
            get(routes::businesses::get_business)
                .put(routes::businesses::update_business)
                .delete(routes::businesses::delete_business),
        )
        .route("/:id/assign-user", post(routes::businesses::assign_user))
        .route("/:id/users", get(routes::businesses::list_business_users))
        .route(
            "/users/:assignment_id",
            put(routes::businesses::update_assignment)
                .delete(routes::businesses::delete_assignment),
        )
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::authenticate,
        ));

    let customer_routes = Router::new()
        .route(
            "/",
            get(routes::customers::list_customers).post(routes::customers::create_customer),
        )
        .route(
            "/:id",
            get(routes::customers::get_customer)
                .put(routes::customers::update_customer)
                .delete(routes::customers::delete_customer),
        )
        .route("/:id/points", post(routes::customers::add_points))
        .route("/:id/visits", post(routes::customers::record_visit))
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::authenticate,
        ));

    // --- Compose full API ---
    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/organizations", organization_routes)
        .nest("/users", user_routes)
        .nest("/businesses", business_routes)
        .nest("/customers", customer_routes);

    Router::new()
        .nest("/api", api)
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health))
        .layer(cors)
        .with_state(state)
}
