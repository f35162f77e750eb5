//! Client helpers for the admin user endpoints. Every call reads the bearer
//! token from the token store at call time; without one the call fails before
//! any request is built.

use crate::{
    common::{
        api::{self, build_url},
        AuthError, ErrorKind,
    },
    features::{
        session::TokenStore,
        users::types::{AdminUserRecord, ResetPasswordRequest, UserUpdate},
    },
};
use reqwest::{Client, Method, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use url::Url;

pub const USERS_PATH: &str = "/api/admin/users";

#[derive(Clone, Debug)]
pub struct AdminClient {
    http: Client,
    base_url: String,
    store: Arc<TokenStore>,
}

impl AdminClient {
    #[must_use]
    pub fn new(http: Client, base_url: &Url, store: Arc<TokenStore>) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            store,
        }
    }

    /// # Errors
    /// Returns a normalized `AuthError` on missing token, transport failure or non-2xx status.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<AdminUserRecord>, AuthError> {
        let response = self
            .send::<()>("admin.list_users", Method::GET, USERS_PATH, None)
            .await?;
        api::handle_json_response(response).await
    }

    /// # Errors
    /// `NotFound` when the id does not exist.
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: i64) -> Result<AdminUserRecord, AuthError> {
        let response = self
            .send::<()>("admin.get_user", Method::GET, &user_path(id, ""), None)
            .await?;
        api::handle_json_response(response).await
    }

    /// Sends the full record; the service replaces every field.
    ///
    /// # Errors
    /// Returns a normalized `AuthError` on missing token, transport failure or non-2xx status.
    #[instrument(skip(self, update))]
    pub async fn update_user(
        &self,
        id: i64,
        update: &UserUpdate,
    ) -> Result<AdminUserRecord, AuthError> {
        let response = self
            .send("admin.update_user", Method::PUT, &user_path(id, ""), Some(update))
            .await?;
        api::handle_json_response(response).await
    }

    /// # Errors
    /// Returns a normalized `AuthError` on missing token, transport failure or non-2xx status.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: i64) -> Result<(), AuthError> {
        let response = self
            .send::<()>("admin.delete_user", Method::DELETE, &user_path(id, ""), None)
            .await?;
        api::handle_empty_response(response).await
    }

    /// # Errors
    /// Returns a normalized `AuthError` on missing token, transport failure or non-2xx status.
    #[instrument(skip(self))]
    pub async fn activate_user(&self, id: i64) -> Result<(), AuthError> {
        let response = self
            .send::<()>(
                "admin.activate_user",
                Method::POST,
                &user_path(id, "/activate"),
                None,
            )
            .await?;
        api::handle_empty_response(response).await
    }

    /// # Errors
    /// Returns a normalized `AuthError` on missing token, transport failure or non-2xx status.
    #[instrument(skip(self))]
    pub async fn deactivate_user(&self, id: i64) -> Result<(), AuthError> {
        let response = self
            .send::<()>(
                "admin.deactivate_user",
                Method::POST,
                &user_path(id, "/deactivate"),
                None,
            )
            .await?;
        api::handle_empty_response(response).await
    }

    /// # Errors
    /// Returns a normalized `AuthError` on missing token, transport failure or non-2xx status.
    #[instrument(skip(self, new_password))]
    pub async fn reset_password(
        &self,
        id: i64,
        new_password: &SecretString,
    ) -> Result<(), AuthError> {
        let request = ResetPasswordRequest {
            new_password: new_password.expose_secret(),
        };
        let response = self
            .send(
                "admin.reset_password",
                Method::POST,
                &user_path(id, "/reset-password"),
                Some(&request),
            )
            .await?;
        api::handle_empty_response(response).await
    }

    fn bearer(&self) -> Result<SecretString, AuthError> {
        self.store.read_token().present().ok_or_else(|| {
            AuthError::new(ErrorKind::InvalidCredentials, "Not signed in")
        })
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, AuthError> {
        let token = self.bearer()?;
        let url = build_url(&self.base_url, path);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(token.expose_secret());
        if let Some(body) = body {
            request = request.json(body);
        }

        api::send(operation, method.as_str(), &url, request).await
    }
}

fn user_path(id: i64, suffix: &str) -> String {
    format!("{USERS_PATH}/{id}{suffix}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        common::api::http_client,
        features::{
            auth::{Role, UserProfile},
            session::MemoryStorage,
        },
    };
    use serde_json::json;
    use std::{net::TcpListener, time::Duration};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn signed_in_store() -> Arc<TokenStore> {
        let store = Arc::new(TokenStore::new(Box::new(MemoryStorage::new())));
        let profile = UserProfile {
            username: "root".to_string(),
            email: "r@x.com".to_string(),
            role: Role::Admin,
        };
        store
            .save(&SecretString::from("admin-token".to_string()), &profile)
            .unwrap();
        store
    }

    fn client_for(uri: &str, store: Arc<TokenStore>) -> AdminClient {
        let http = http_client(Duration::from_secs(5)).unwrap();
        AdminClient::new(http, &Url::parse(uri).unwrap(), store)
    }

    fn record_json(id: i64, username: &str, enabled: bool) -> serde_json::Value {
        json!({
            "id": id,
            "username": username,
            "email": format!("{username}@x.com"),
            "role": "USER",
            "enabled": enabled,
            "createdAt": "2024-03-01T10:15:30",
            "updatedAt": null
        })
    }

    #[tokio::test]
    async fn list_users_sends_bearer_token() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(USERS_PATH))
            .and(header("authorization", "Bearer admin-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                record_json(1, "alice", true),
                record_json(2, "bob", false)
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), signed_in_store());
        let users = client.list_users().await.unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[1].username, "bob");
        assert!(!users[1].enabled);
    }

    #[tokio::test]
    async fn missing_token_fails_without_request() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let store = Arc::new(TokenStore::new(Box::new(MemoryStorage::new())));
        let client = client_for(&server.uri(), store);
        let err = client.list_users().await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::InvalidCredentials);
    }

    #[tokio::test]
    async fn get_user_maps_404_to_not_found() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/users/99"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "User not found"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), signed_in_store());
        let err = client.get_user(99).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "User not found");
    }

    #[tokio::test]
    async fn update_user_puts_full_record() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/admin/users/3"))
            .and(body_json(json!({
                "username": "carol",
                "email": "carol@x.com",
                "role": "ADMIN",
                "enabled": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(record_json(3, "carol", true)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), signed_in_store());
        let update = UserUpdate {
            username: "carol".to_string(),
            email: "carol@x.com".to_string(),
            role: Role::Admin,
            enabled: true,
        };
        let record = client.update_user(3, &update).await.unwrap();

        assert_eq!(record.id, 3);
    }

    #[tokio::test]
    async fn acknowledgements_ignore_body() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/users/4/activate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User activated"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/admin/users/4/deactivate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/admin/users/4"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), signed_in_store());
        client.activate_user(4).await.unwrap();
        client.deactivate_user(4).await.unwrap();
        client.delete_user(4).await.unwrap();
    }

    #[tokio::test]
    async fn reset_password_sends_camel_case_body() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/users/5/reset-password"))
            .and(header("authorization", "Bearer admin-token"))
            .and(body_json(json!({"newPassword": "Changed1!"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), signed_in_store());
        client
            .reset_password(5, &SecretString::from("Changed1!".to_string()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn forbidden_maps_to_invalid_credentials() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/admin/users/1"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Access denied"))
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), signed_in_store());
        let err = client.delete_user(1).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::InvalidCredentials);
        assert_eq!(err.message, "Access denied");
    }
}
