//! Account endpoints.
//!
//! Signup and email verification happen before the user has a token and
//! go out without an `Authorization` header. Creating an operations user
//! is an authenticated call like any other.

use reqwest::Method;
use serde_json::json;

use super::client::{ApiClient, Body};
use super::error::{ApiError, TransportError};
use crate::models::file::MessageResponse;
use crate::models::SignupReceipt;

const SIGNUP_ENDPOINT: &str = "/api/signup";
const VERIFY_EMAIL_ENDPOINT: &str = "/api/verify-email";
const CREATE_OPS_USER_ENDPOINT: &str = "/api/create-ops-user";

const MISSING_FIELDS_MESSAGE: &str = "Missing required fields!";

/// JSON body shared by signup and operations-user creation
fn account_body(username: &str, email: &str, password: &str) -> Result<Body, ApiError> {
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ApiError::Rejected(MISSING_FIELDS_MESSAGE.to_string()));
    }
    Ok(Body::Json(json!({
        "username": username,
        "email": email,
        "password": password,
    })))
}

/// Verification tokens are URL-safe base64 and go into the path verbatim.
fn is_url_safe_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl ApiClient {
    /// Register a client account. The server answers with a verification
    /// link; the account cannot sign in until it has been followed.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<SignupReceipt, ApiError> {
        let body = account_body(username, email, password)?;
        let payload = self
            .request_unauthenticated(SIGNUP_ENDPOINT, Method::POST, Some(body))
            .await?;
        Ok(serde_json::from_value(payload).map_err(TransportError::from)?)
    }

    /// Confirm an email address with the token from the verification link.
    /// Returns the server's message.
    pub async fn verify_email(&self, token: &str) -> Result<String, ApiError> {
        if !is_url_safe_token(token) {
            return Err(ApiError::Rejected("Invalid verification token".to_string()));
        }
        let url = format!("{}/{}", VERIFY_EMAIL_ENDPOINT, token);
        let payload = self.request_unauthenticated(&url, Method::GET, None).await?;
        let response: MessageResponse =
            serde_json::from_value(payload).map_err(TransportError::from)?;
        Ok(response.message)
    }

    /// Create another operations user (operations role). Returns the
    /// server's message.
    pub async fn create_ops_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let body = account_body(username, email, password)?;
        let response: MessageResponse = self
            .request_as(CREATE_OPS_USER_ENDPOINT, Method::POST, Some(body))
            .await?;
        Ok(response.message)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::header;
    use serde_json::Value;

    use super::*;
    use crate::api::transport::mock::MockTransport;
    use crate::api::transport::{HttpRequest, RequestBody};
    use crate::auth::{CredentialStore, MemoryStorage, Role, UserRecord};

    fn api(store: CredentialStore, transport: &Arc<MockTransport>) -> ApiClient {
        ApiClient::with_transport("http://files.test", store, transport.clone())
    }

    fn signed_out() -> CredentialStore {
        CredentialStore::new(Arc::new(MemoryStorage::new()))
    }

    fn signed_in() -> CredentialStore {
        let store = signed_out();
        store.store("abc", &UserRecord::new(Role::Operations)).unwrap();
        store
    }

    fn json_body(request: &HttpRequest) -> Value {
        let Some(RequestBody::Bytes(bytes)) = &request.body else {
            panic!("expected a JSON body, got {:?}", request.body);
        };
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_signup_sends_json_without_token() {
        let transport = Arc::new(MockTransport::json(
            201,
            r#"{"message":"User registered successfully!","verification_url":"http://files.test/api/verify-email/tok"}"#,
        ));

        let receipt = api(signed_in(), &transport)
            .signup("dana", "d@example.com", "pw")
            .await
            .unwrap();
        assert_eq!(receipt.message, "User registered successfully!");
        assert_eq!(
            receipt.verification_url.as_deref(),
            Some("http://files.test/api/verify-email/tok")
        );

        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "http://files.test/api/signup");
        assert!(request.headers.get(header::AUTHORIZATION).is_none());
        assert_eq!(
            request.headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        assert_eq!(
            json_body(&request),
            json!({"username": "dana", "email": "d@example.com", "password": "pw"})
        );
    }

    #[tokio::test]
    async fn test_signup_error_uses_server_message() {
        let transport = Arc::new(MockTransport::json(400, r#"{"message":"Username already exists!"}"#));

        let err = api(signed_out(), &transport)
            .signup("dana", "d@example.com", "pw")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "Username already exists!");
    }

    #[tokio::test]
    async fn test_missing_account_fields_rejected_locally() {
        let transport = Arc::new(MockTransport::json(201, "{}"));
        let client = api(signed_in(), &transport);

        let err = client.signup("dana", "", "pw").await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected(ref m) if m == MISSING_FIELDS_MESSAGE));
        let err = client.create_ops_user("", "o@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_verify_email_without_token() {
        let transport = Arc::new(MockTransport::json(200, r#"{"message":"Email verified successfully!"}"#));

        let message = api(signed_out(), &transport)
            .verify_email("abc_DEF-19")
            .await
            .unwrap();
        assert_eq!(message, "Email verified successfully!");

        let request = transport.last_request();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, "http://files.test/api/verify-email/abc_DEF-19");
        assert!(request.headers.get(header::AUTHORIZATION).is_none());
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_verify_email_rejects_path_changing_tokens() {
        let transport = Arc::new(MockTransport::json(200, "{}"));
        let client = api(signed_out(), &transport);

        for token in ["", "../files", "a/b", "tok?x=1", "tok#frag"] {
            let err = client.verify_email(token).await.unwrap_err();
            assert!(matches!(err, ApiError::Rejected(_)), "{}", token);
        }
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_verify_email_html_answer_is_transport_error() {
        let transport = Arc::new(MockTransport::json(200, "<html><body>Verified</body></html>"));

        let err = api(signed_out(), &transport).verify_email("tok").await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_create_ops_user_sends_bearer_token() {
        let transport = Arc::new(MockTransport::json(
            201,
            r#"{"message":"Operations user created successfully!"}"#,
        ));

        let message = api(signed_in(), &transport)
            .create_ops_user("ops2", "o@example.com", "pw")
            .await
            .unwrap();
        assert_eq!(message, "Operations user created successfully!");

        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "http://files.test/api/create-ops-user");
        assert_eq!(
            request.headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("Bearer abc")
        );
        assert_eq!(
            json_body(&request),
            json!({"username": "ops2", "email": "o@example.com", "password": "pw"})
        );
    }

    #[tokio::test]
    async fn test_create_ops_user_requires_token() {
        let transport = Arc::new(MockTransport::json(201, "{}"));

        let err = api(signed_out(), &transport)
            .create_ops_user("ops2", "o@example.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_create_ops_user_conflict_message() {
        let transport = Arc::new(MockTransport::json(400, r#"{"message":"Email already exists!"}"#));

        let err = api(signed_in(), &transport)
            .create_ops_user("ops2", "o@example.com", "pw")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email already exists!");
    }
}
