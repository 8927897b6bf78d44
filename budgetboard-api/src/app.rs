/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use budgetboard_api::{app::{build_router, AppState}, config::Config};
/// use budgetboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use budgetboard_shared::db::postgres::PgStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig::new(
///     config.database.url.clone(),
///     config.database.max_connections,
/// ))
/// .await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post},
    Extension, Router,
};
use budgetboard_shared::auth::middleware::authenticate;
use budgetboard_shared::db::store::Store;
use budgetboard_shared::models::Family;
use budgetboard_shared::services::Services;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            services: Services::new(store),
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.services.store().as_ref()
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── /health                           # public
/// └── /v1/
///     ├── /auth/register|login|refresh  # public
///     ├── /auth/me
///     ├── /users/search, /users/:identifier
///     ├── /boards, /boards/search, /boards/:id, /boards/:id/members[/:user_id]
///     ├── /groups, /groups/search, /groups/:id
///     ├── /group-subjects, /category-types, /currencies
///     └── /{finance,budget,activity}/
///         ├── /categories, /categories/search, /categories/:id
///         └── /records, /records/search, /records/:id
/// ```
///
/// Everything under `/v1` except the public auth routes requires a Bearer
/// access token.
pub fn build_router(state: AppState) -> Router {
    let public_auth = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let users = Router::new()
        .route("/search", get(routes::users::search))
        .route("/:identifier", get(routes::users::find));

    let boards = Router::new()
        .route("/", post(routes::boards::create))
        .route("/search", get(routes::boards::search))
        .route(
            "/:id",
            get(routes::boards::find)
                .patch(routes::boards::update)
                .delete(routes::boards::delete),
        )
        .route("/:id/members", post(routes::boards::add_member))
        .route("/:id/members/:user_id", delete(routes::boards::remove_member));

    let groups = Router::new()
        .route("/", post(routes::groups::create))
        .route("/search", get(routes::groups::search))
        .route(
            "/:id",
            get(routes::groups::find)
                .patch(routes::groups::update)
                .delete(routes::groups::delete),
        );

    let mut protected = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .nest("/users", users)
        .nest("/boards", boards)
        .nest("/groups", groups)
        .route("/group-subjects", get(routes::reference::group_subjects))
        .route("/category-types", get(routes::reference::category_types))
        .route("/currencies", get(routes::reference::currencies));

    for family in Family::ALL {
        protected = protected.nest(&format!("/{}", family), family_routes(family));
    }

    let protected = protected.route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        jwt_auth_layer,
    ));

    let v1_routes = Router::new().nest("/auth", public_auth).merge(protected);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Category and record routes of one family; handlers read the family from
/// the request extensions
fn family_routes(family: Family) -> Router<AppState> {
    Router::new()
        .route("/categories", post(routes::categories::create))
        .route("/categories/search", get(routes::categories::search))
        .route(
            "/categories/:id",
            get(routes::categories::find)
                .patch(routes::categories::update)
                .delete(routes::categories::delete),
        )
        .route("/records", post(routes::records::create))
        .route("/records/search", get(routes::records::search))
        .route(
            "/records/:id",
            get(routes::records::find)
                .patch(routes::records::update)
                .delete(routes::records::delete),
        )
        .layer(Extension(family))
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.permissive_cors() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// JWT authentication middleware layer
///
/// Validates the Bearer access token, loads the caller's board roles and
/// injects the resulting `AuthorizedUser` into the request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let user = authenticate(state.store(), state.jwt_secret(), authorization).await?;
    tracing::debug!(user_id = user.id, "Request authenticated");

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
