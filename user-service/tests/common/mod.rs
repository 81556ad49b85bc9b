use std::sync::Arc;

use auth::JwtHandler;
use auth::JwtSettings;
use serde_json::json;
use serde_json::Value;
use user_service::domain::user::models::EmailAddress;
use user_service::domain::user::models::PasswordHash;
use user_service::domain::user::models::Role;
use user_service::domain::user::models::User;
use user_service::domain::user::models::Username;
use user_service::domain::user::ports::UserRepository;
use user_service::domain::user::service::UserService;
use user_service::inbound::http::router::create_router;
use user_service::outbound::repositories::InMemoryUserRepository;

pub const JWT_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const PASSWORD: &str = "Passw0rd!";

/// Test application that spawns a real server on a random port
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: Arc<JwtHandler>,
    pub repository: Arc<InMemoryUserRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let settings = JwtSettings::new(JWT_SECRET, chrono::Duration::hours(24))
            .expect("Invalid test JWT settings");
        let jwt_handler = Arc::new(JwtHandler::new(&settings));

        let repository = Arc::new(InMemoryUserRepository::new());
        let user_service = Arc::new(UserService::new(Arc::clone(&repository)));

        let router = create_router(user_service, Arc::clone(&jwt_handler));

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            jwt_handler,
            repository,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.put(self.url(path)).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.patch(self.url(path)).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(self.url(path)).bearer_auth(token)
    }

    /// Register a user through the API and return the response body.
    pub async fn register(&self, username: &str, email: &str) -> Value {
        let response = self
            .post("/api/users/register")
            .json(&json!({
                "username": username,
                "email": email,
                "password": PASSWORD
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Log in through the API and return the issued token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Token missing from login response")
            .to_string()
    }

    /// Register and log in a user, returning (user id, token).
    pub async fn register_and_login(&self, username: &str, email: &str) -> (String, String) {
        let body = self.register(username, email).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();
        let token = self.login(email, PASSWORD).await;
        (id, token)
    }

    /// Seed an admin account directly in the store and log it in.
    pub async fn admin_token(&self) -> String {
        let hash = auth::PasswordHasher::new()
            .hash(PASSWORD)
            .expect("Failed to hash password");
        let mut admin = User::register(
            Username::new("root".to_string()).unwrap(),
            EmailAddress::new("root@example.com".to_string()).unwrap(),
            PasswordHash::new(hash).unwrap(),
        );
        admin.role = Role::Admin;
        self.repository
            .create(admin)
            .await
            .expect("Failed to seed admin");

        self.login("root@example.com", PASSWORD).await
    }
}
