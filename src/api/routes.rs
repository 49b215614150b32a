//! API Route Definitions
//!
//! This module defines all HTTP routes and their corresponding handlers using a
//! builder pattern. The RouterBuilder allows selective enabling of route groups,
//! e.g. a read-only catalogue deployment that exposes only item listing.

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};

use super::auth_handlers::{login, profile, register};
use super::handlers::{health_check, not_found, AppState};
use super::item_handlers::{create_item, delete_item, get_item, list_items, update_item};
use super::middleware::{auth_middleware, require_role};
use super::security_middleware::security_headers_middleware;
use super::user_handlers::{delete_user, get_user, list_users, update_user};
use crate::models::Role;

/// Builder for creating API routes with configurable route groups
#[derive(Default)]
pub struct RouterBuilder {
    /// GET /health
    health_check: bool,
    /// /api/auth/register, /api/auth/login, /api/auth/profile
    auth_routes: bool,
    /// /api/users and /api/users/{id}
    user_routes: bool,
    /// Public reads of /api/items and /api/items/{id}
    item_read_routes: bool,
    /// Authenticated item create, update and delete
    item_write_routes: bool,
    /// Attach the standard security response headers
    security_headers: bool,
}

impl RouterBuilder {
    /// Creates a new router builder with all routes disabled by default
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a router builder with every route group and the security headers enabled
    pub fn with_all_routes() -> Self {
        Self {
            health_check: true,
            auth_routes: true,
            user_routes: true,
            item_read_routes: true,
            item_write_routes: true,
            security_headers: true,
        }
    }

    /// Health check plus the public item catalogue
    pub fn with_readonly_routes() -> Self {
        Self {
            health_check: true,
            item_read_routes: true,
            security_headers: true,
            ..Self::default()
        }
    }

    /// Creates a router with only the health check endpoint
    pub fn with_minimal_routes() -> Self {
        Self {
            health_check: true,
            ..Self::default()
        }
    }

    pub fn health_check(mut self, enabled: bool) -> Self {
        self.health_check = enabled;
        self
    }

    /// Enables or disables registration, login and profile
    pub fn auth_routes(mut self, enabled: bool) -> Self {
        self.auth_routes = enabled;
        self
    }

    /// Enables or disables the user management endpoints
    pub fn user_routes(mut self, enabled: bool) -> Self {
        self.user_routes = enabled;
        self
    }

    pub fn item_read_routes(mut self, enabled: bool) -> Self {
        self.item_read_routes = enabled;
        self
    }

    pub fn item_write_routes(mut self, enabled: bool) -> Self {
        self.item_write_routes = enabled;
        self
    }

    pub fn security_headers(mut self, enabled: bool) -> Self {
        self.security_headers = enabled;
        self
    }

    /// Builds the Axum router with the configured routes
    ///
    /// Protected routes get the auth middleware as a route layer, so unknown
    /// paths still fall through to the JSON 404 instead of a 401.
    pub fn build(self, state: AppState) -> Router {
        let auth = from_fn_with_state(state.jwt_service.clone(), auth_middleware);
        let admin_only = from_fn_with_state(Role::Admin, require_role);

        let mut router = Router::new();

        if self.health_check {
            router = router.route("/health", get(health_check));
        }

        if self.auth_routes {
            router = router
                .route("/api/auth/register", post(register))
                .route("/api/auth/login", post(login))
                .route(
                    "/api/auth/profile",
                    get(profile).route_layer(auth.clone()),
                );
        }

        if self.user_routes {
            router = router
                .route(
                    "/api/users",
                    get(list_users)
                        .route_layer(admin_only)
                        .route_layer(auth.clone()),
                )
                .route(
                    "/api/users/{id}",
                    get(get_user)
                        .put(update_user)
                        .delete(delete_user)
                        .route_layer(auth.clone()),
                );
        }

        match (self.item_read_routes, self.item_write_routes) {
            (true, true) => {
                router = router
                    .route(
                        "/api/items",
                        get(list_items).merge(post(create_item).route_layer(auth.clone())),
                    )
                    .route(
                        "/api/items/{id}",
                        get(get_item).merge(
                            put(update_item)
                                .delete(delete_item)
                                .route_layer(auth.clone()),
                        ),
                    );
            }
            (true, false) => {
                router = router
                    .route("/api/items", get(list_items))
                    .route("/api/items/{id}", get(get_item));
            }
            (false, true) => {
                router = router
                    .route("/api/items", post(create_item).route_layer(auth.clone()))
                    .route(
                        "/api/items/{id}",
                        put(update_item)
                            .delete(delete_item)
                            .route_layer(auth),
                    );
            }
            (false, false) => {}
        }

        let mut router = router.fallback(not_found);

        if self.security_headers {
            router = router.layer(from_fn(security_headers_middleware));
        }

        router.with_state(state)
    }
}

/// Creates all API routes
pub fn create_routes(state: AppState) -> Router {
    RouterBuilder::with_all_routes().build(state)
}
