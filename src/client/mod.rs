//! HTTP API Client
//!
//! Typed reqwest client for the REST API. The client keeps the bearer token
//! returned by [`ApiClient::login`] and attaches it to every later request
//! until [`ApiClient::logout`] discards it.

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::api::SuccessResponse;
use crate::models::{
    CreateItemRequest, HealthCheckResponse, Item, ItemListResponse, ListItemsParams, LoginRequest,
    LoginResponse, RegisterRequest, UpdateItemRequest, UpdateUserRequest, User,
};
use crate::utils::error::ErrorResponse;

/// Errors returned by [`ApiClient`]
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure or undecodable body
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("API error {status} ({error}): {message}")]
    Api {
        status: u16,
        error: String,
        message: String,
    },
}

impl ClientError {
    /// HTTP status for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Client for the web application API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` without a trailing slash, e.g. `http://localhost:3000`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Use a token obtained elsewhere
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub async fn health(&self) -> ClientResult<HealthCheckResponse> {
        self.send(self.request(Method::GET, "/health")).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<User> {
        self.send(self.request(Method::POST, "/api/auth/register").json(request))
            .await
    }

    /// Log in and keep the returned token for later calls
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .send(self.request(Method::POST, "/api/auth/login").json(&request))
            .await?;

        self.token = Some(response.token.access_token.clone());
        Ok(response)
    }

    /// Forget the stored token; the server keeps no session to end
    pub fn logout(&mut self) {
        self.token = None;
    }

    pub async fn profile(&self) -> ClientResult<User> {
        self.send(self.request(Method::GET, "/api/auth/profile"))
            .await
    }

    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.send(self.request(Method::GET, "/api/users")).await
    }

    pub async fn get_user(&self, id: Uuid) -> ClientResult<User> {
        self.send(self.request(Method::GET, &format!("/api/users/{}", id)))
            .await
    }

    pub async fn update_user(&self, id: Uuid, request: &UpdateUserRequest) -> ClientResult<User> {
        self.send(
            self.request(Method::PUT, &format!("/api/users/{}", id))
                .json(request),
        )
        .await
    }

    pub async fn delete_user(&self, id: Uuid) -> ClientResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/api/users/{}", id)))
            .await
    }

    pub async fn list_items(&self, params: &ListItemsParams) -> ClientResult<ItemListResponse> {
        self.send(self.request(Method::GET, "/api/items").query(params))
            .await
    }

    pub async fn get_item(&self, id: Uuid) -> ClientResult<Item> {
        self.send(self.request(Method::GET, &format!("/api/items/{}", id)))
            .await
    }

    pub async fn create_item(&self, request: &CreateItemRequest) -> ClientResult<Item> {
        self.send(self.request(Method::POST, "/api/items").json(request))
            .await
    }

    pub async fn update_item(&self, id: Uuid, request: &UpdateItemRequest) -> ClientResult<Item> {
        self.send(
            self.request(Method::PUT, &format!("/api/items/{}", id))
                .json(request),
        )
        .await
    }

    pub async fn delete_item(&self, id: Uuid) -> ClientResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/api/items/{}", id)))
            .await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));

        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = Self::check(builder.send().await?).await?;
        let envelope: SuccessResponse<T> = response.json().await?;
        Ok(envelope.data)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> ClientResult<()> {
        Self::check(builder.send().await?).await?;
        Ok(())
    }

    /// Turns non-success responses into [`ClientError::Api`]
    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        let (error, message) = match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(body) => (body.error, body.message),
            Err(_) => (fallback_code(status), text),
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            error,
            message,
        })
    }
}

/// Error code for responses without a JSON error body (e.g. extractor rejections)
fn fallback_code(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("HTTP_ERROR")
        .to_uppercase()
        .replace(' ', "_")
}
