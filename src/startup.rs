use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;
use tracing::{Level, event, instrument};

use crate::{
    configuration::{RelatedConfig, Settings},
    handlers::{
        assign_role, check_my_permissions, health_check, list_roles, my_permissions,
        related_posts, role_permissions,
    },
    permission::PermissionEngine,
    repository::{ContentRepository, MemoryStore, PgStore, UserRepository},
};

#[derive(Debug)]
pub struct Application {
    listener: tokio::net::TcpListener,
    state: Arc<AppState>,
    port: u16,
}

impl Application {
    /// Builds the server on Postgres when `database.url` is set, on an empty
    /// in-memory store otherwise.
    #[instrument(name = "build_server", skip(cfg))]
    pub async fn build(cfg: &Settings) -> anyhow::Result<Self> {
        match &cfg.database.url {
            Some(db_url) => {
                // connect to database and get the pool
                let pool = PgPool::connect(db_url).await?;

                // apply migrations
                sqlx::migrate!("./migrations").run(&pool).await?;

                let store = Arc::new(PgStore::new(pool));
                Self::build_with_store(cfg, store.clone(), store).await
            }
            None => {
                event!(
                    Level::WARN,
                    "No database url configured, serving from an empty in-memory store"
                );
                let store = Arc::new(MemoryStore::new());
                Self::build_with_store(cfg, store.clone(), store).await
            }
        }
    }

    pub async fn build_with_store(
        cfg: &Settings,
        content: Arc<dyn ContentRepository>,
        users: Arc<dyn UserRepository>,
    ) -> anyhow::Result<Self> {
        let host = &cfg.server.host;
        let port = cfg.server.port;

        // Create the TCPListener for further usage
        let lst = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
        let port = lst.local_addr()?.port();

        let state = AppState {
            engine: PermissionEngine::shipped(),
            content,
            users,
            auth: AuthState {
                jwt_secret: cfg.auth.jwt_secret.clone(),
            },
            related: cfg.related.clone(),
        };

        Ok(Self {
            listener: lst,
            state: Arc::new(state),
            port,
        })
    }

    #[instrument(name = "mainloop", skip(self))]
    pub async fn run_until_stopped(mut self) -> std::io::Result<()> {
        let addr = self.listener.local_addr()?;
        let host = addr.ip().to_string();
        let port = addr.port();

        // Create the router
        let router = self.create_app_router();

        event!(Level::INFO, "Serving at {}:{}", host, port);

        // Serve the server
        axum::serve(self.listener, router).await
    }

    fn create_app_router(&mut self) -> Router {
        Router::new()
            .route("/health_check", get(health_check))
            .route("/roles", get(list_roles))
            .route("/roles/{role}/permissions", get(role_permissions))
            .route("/me/permissions", get(my_permissions))
            .route("/me/permissions/check", post(check_my_permissions))
            .route("/posts/{post_id}/related", get(related_posts))
            .route("/users/{user_id}/role", put(assign_role))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

pub struct AppState {
    pub engine: PermissionEngine,
    pub content: Arc<dyn ContentRepository>,
    pub users: Arc<dyn UserRepository>,
    pub auth: AuthState,
    pub related: RelatedConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("engine", &self.engine)
            .field("related", &self.related)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct AuthState {
    pub jwt_secret: String,
}
