//! HTTP server exposing the hero catalogue.
//!
//! The server owns a single [`HeroStore`], loaded before startup and shared
//! with every handler through [`AppState`].

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::Router;
use herodex_core::{HeroStore, Result};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 3000;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Enable permissive CORS.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            cors: true,
        }
    }
}

impl ServerConfig {
    /// Creates a new server config builder.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))
}

/// Builder for ServerConfig.
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    addr: Option<SocketAddr>,
    cors: Option<bool>,
}

impl ServerConfigBuilder {
    /// Sets the listen address.
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    /// Sets whether CORS is enabled.
    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors = Some(enabled);
        self
    }

    /// Builds the server config.
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            addr: self.addr.unwrap_or_else(default_addr),
            cors: self.cors.unwrap_or(true),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// The hero collection.
    pub store: HeroStore,
    /// Server configuration.
    pub config: ServerConfig,
    /// Server start time.
    pub start_time: Instant,
}

impl AppState {
    /// Creates new app state around a loaded store.
    pub fn new(config: ServerConfig, store: HeroStore) -> Self {
        Self {
            store,
            config,
            start_time: Instant::now(),
        }
    }
}

/// The HTTP server.
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Creates a new server serving `store`.
    pub fn new(config: ServerConfig, store: HeroStore) -> Self {
        let state = Arc::new(AppState::new(config.clone(), store));
        Self { config, state }
    }

    /// Returns the shared state.
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Builds the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/", get(handlers::root).fallback(handlers::method_not_allowed))
            .route(
                "/health",
                get(handlers::health).fallback(handlers::method_not_allowed),
            )
            .route(
                "/api/heroes",
                get(handlers::list_heroes).fallback(handlers::method_not_allowed),
            )
            // An empty hero name lands on the list, as a trailing slash would.
            .route(
                "/api/heroes/",
                get(handlers::list_heroes).fallback(handlers::method_not_allowed),
            )
            // One segment serves both the name lookup (GET) and the id routes.
            .route(
                "/api/heroes/:key",
                get(handlers::get_hero)
                    .put(handlers::update_hero)
                    .delete(handlers::delete_hero)
                    .fallback(handlers::method_not_allowed),
            )
            .route(
                "/api/create-hero",
                post(handlers::create_hero).fallback(handlers::method_not_allowed),
            )
            .fallback(handlers::route_not_found)
            .with_state(self.state.clone());

        router = router.layer(TraceLayer::new_for_http());

        if self.config.cors {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }

    /// Runs the server until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound or the server fails.
    pub async fn run(self) -> Result<()> {
        let router = self.router();
        let heroes = self.state.store.len().await;

        tracing::info!(
            addr = %self.config.addr,
            heroes,
            snapshot = %self.state.store.storage_location(),
            "Starting Herodex server"
        );

        let listener = tokio::net::TcpListener::bind(self.config.addr).await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use herodex_core::{Hero, MemoryStorage};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn hero(id: u64, localized_name: &str, attr: &str, attack: &str) -> Hero {
        Hero {
            id,
            name: format!(
                "npc_dota_hero_{}",
                localized_name.to_lowercase().replace(' ', "_")
            ),
            localized_name: localized_name.to_string(),
            primary_attr: attr.to_string(),
            attack_type: attack.to_string(),
            roles: vec!["Carry".to_string()],
            base_health: 200.0,
            base_mana: 75.0,
            base_armor: 0.0,
            attack_range: if attack == "Melee" { 150.0 } else { 600.0 },
        }
    }

    fn roster() -> Vec<Hero> {
        vec![
            hero(1, "Anti-Mage", "agi", "Melee"),
            hero(2, "Axe", "str", "Melee"),
            hero(3, "Bane", "all", "Ranged"),
            hero(4, "Bloodseeker", "agi", "Melee"),
            hero(5, "Crystal Maiden", "int", "Ranged"),
            hero(6, "Drow Ranger", "agi", "Ranged"),
            hero(7, "Earthshaker", "str", "Melee"),
        ]
    }

    fn test_server() -> (Server, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new(roster()));
        let store = HeroStore::with_heroes(roster(), storage.clone());
        (Server::new(ServerConfig::default(), store), storage)
    }

    async fn send(server: &Server, request: Request<Body>) -> (StatusCode, Value) {
        let response = server.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn with_json(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_server_config_builder() {
        let config = ServerConfig::builder()
            .addr("127.0.0.1:8080".parse().unwrap())
            .cors(false)
            .build();

        assert_eq!(config.addr, "127.0.0.1:8080".parse().unwrap());
        assert!(!config.cors);

        let defaults = ServerConfig::builder().build();
        assert_eq!(defaults.addr.port(), DEFAULT_PORT);
        assert!(defaults.cors);
    }

    #[tokio::test]
    async fn test_root_health_check() {
        let (server, _) = test_server();

        let (status, body) = send(&server, get("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "The API is working!" }));
    }

    #[tokio::test]
    async fn test_health_reports_hero_count() {
        let (server, _) = test_server();

        let (status, body) = send(&server, get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["heroes"], 7);
    }

    #[tokio::test]
    async fn test_list_second_page() {
        let (server, _) = test_server();

        let (status, body) = send(&server, get("/api/heroes?limit=5&page=2")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["currentPage"], 2);
        assert_eq!(body["currentLimit"], 5);
        assert_eq!(body["totalItems"], 7);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["heroes"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_filter_and_sort() {
        let (server, _) = test_server();

        let (status, body) = send(
            &server,
            get("/api/heroes?attack_type=melee&primary_attr=AGI&sortBy=desc"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalItems"], 2);
        let names: Vec<&str> = body["heroes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| h["localized_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Bloodseeker", "Anti-Mage"]);
    }

    #[tokio::test]
    async fn test_list_bad_paging_falls_back_to_defaults() {
        let (server, _) = test_server();

        let (status, body) = send(&server, get("/api/heroes?page=abc&limit=-2")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["currentPage"], 1);
        assert_eq!(body["currentLimit"], 5);
    }

    #[tokio::test]
    async fn test_trailing_slash_lists_heroes() {
        let (server, _) = test_server();

        let (status, body) = send(&server, get("/api/heroes/?limit=3")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalItems"], 7);
        assert_eq!(body["heroes"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unrouted_requests_get_json_errors() {
        let (server, storage) = test_server();

        let (status, body) = send(&server, get("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Route not found." }));

        let (status, body) = send(
            &server,
            with_json("POST", "/api/heroes/1", &json!({ "base_armor": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "message": "Method not allowed." }));

        let (status, body) = send(&server, delete("/api/create-hero")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["message"], "Method not allowed.");

        assert_eq!(storage.save_count(), 0);
    }

    #[tokio::test]
    async fn test_get_hero_by_name_fragment() {
        let (server, _) = test_server();

        let (status, body) = send(&server, get("/api/heroes/MAIDEN")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 5);

        let (status, body) = send(&server, get("/api/heroes/drow%20r")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["localized_name"], "Drow Ranger");
    }

    #[tokio::test]
    async fn test_get_hero_errors() {
        let (server, _) = test_server();

        let (status, body) = send(&server, get("/api/heroes/Zeus")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Hero not found.");

        let (status, body) = send(&server, get("/api/heroes/%20")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Hero name is required.");
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (server, storage) = test_server();
        let payload = json!({
            "name": "npc_dota_hero_lina",
            "localized_name": "Lina",
            "primary_attr": "int",
            "attack_type": "Ranged",
            "roles": ["Support", "Nuker"],
            "base_health": 200,
            "base_mana": 75,
            "base_armor": 0,
            "hero_attack_range": 670
        });

        let (status, created) =
            send(&server, with_json("POST", "/api/create-hero", &payload)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], 8);
        assert_eq!(created["attack_range"], 670.0);

        let (status, fetched) = send(&server, get("/api/heroes/lina")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
        assert_eq!(storage.contents().len(), 8);
    }

    #[tokio::test]
    async fn test_create_rejects_incomplete_body() {
        let (server, storage) = test_server();
        let payload = json!({ "name": "npc_dota_hero_lion" });

        let (status, body) = send(&server, with_json("POST", "/api/create-hero", &payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("localized_name"));
        assert_eq!(storage.save_count(), 0);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let (server, storage) = test_server();

        let (status, body) = send(
            &server,
            with_json("PUT", "/api/heroes/2", &json!({ "base_armor": 3, "id": 40 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 2);
        assert_eq!(body["base_armor"], 3.0);
        assert_eq!(body["localized_name"], "Axe");
        assert_eq!(storage.contents()[1].base_armor, 3.0);
    }

    #[tokio::test]
    async fn test_update_errors() {
        let (server, storage) = test_server();

        let (status, body) = send(
            &server,
            with_json("PUT", "/api/heroes/99", &json!({ "base_armor": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Hero not found.");

        let (status, _) = send(
            &server,
            with_json("PUT", "/api/heroes/axe", &json!({ "base_armor": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &server,
            with_json("PUT", "/api/heroes/2", &json!({ "base_armor": "thick" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(storage.save_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let (server, storage) = test_server();

        let (status, body) = send(&server, delete("/api/heroes/3")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Hero deleted successfully");
        assert_eq!(body["deletedHero"]["localized_name"], "Bane");

        let (status, _) = send(&server, get("/api/heroes/bane")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(storage.contents().iter().all(|h| h.id != 3));

        let (status, body) = send(&server, delete("/api/heroes/3")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Hero not found.");
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal_error() {
        let (server, storage) = test_server();
        storage.set_fail_saves(true);

        let (status, body) = send(&server, delete("/api/heroes/1")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error.");
        assert_eq!(server.state().store.len().await, 7);
    }
}
