//! The API client.

use mentormatch_common::{MatchRequestId, UserId, UserRole};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::types::{
    ApiErrorEnvelope, CreateMatchRequest, LoginRequest, LoginResponse, MatchRequest,
    OutgoingMatchRequest, SignupRequest, UpdateProfileRequest, UserProfile,
};

/// Typed client for the MentorMatch REST API.
///
/// Holds the bearer token after a successful login; protected calls fail
/// with [`ClientError::MissingToken`] until then.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client against the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Create a client with a pre-existing session token.
    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: Some(token.into()),
        }
    }

    /// The current session token, if logged in.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::MissingToken)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Decode the error envelope; fall back to the bare status on foreign bodies
        let (code, message) = match response.json::<ApiErrorEnvelope>().await {
            Ok(envelope) => (envelope.error.code, envelope.error.message),
            Err(_) => ("UNKNOWN".to_string(), status.to_string()),
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        Ok(Self::check(response).await?.json::<T>().await?)
    }

    /// POST /api/signup
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: UserRole,
    ) -> Result<(), ClientError> {
        let response = self
            .request(Method::POST, "/api/signup")
            .json(&SignupRequest {
                email: email.to_string(),
                password: password.to_string(),
                name: name.to_string(),
                role,
            })
            .send()
            .await?;

        Self::check(response).await.map(|_| ())
    }

    /// POST /api/login
    ///
    /// Stores the returned token for subsequent protected calls.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        let response = self
            .request(Method::POST, "/api/login")
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        let login: LoginResponse = Self::decode(response).await?;
        self.token = Some(login.token);
        Ok(())
    }

    /// GET /api/me
    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        let response = self.authed(Method::GET, "/api/me")?.send().await?;
        Self::decode(response).await
    }

    /// PUT /api/profile
    pub async fn update_profile(
        &self,
        payload: &UpdateProfileRequest,
    ) -> Result<UserProfile, ClientError> {
        let response = self
            .authed(Method::PUT, "/api/profile")?
            .json(payload)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Absolute URL for a user's profile image
    pub fn profile_image_url(&self, role: UserRole, user_id: UserId) -> String {
        self.url(&format!("/images/{}/{}", role, user_id))
    }

    /// GET /api/mentors
    pub async fn list_mentors(
        &self,
        skill: Option<&str>,
        order_by: Option<&str>,
    ) -> Result<Vec<UserProfile>, ClientError> {
        let mut request = self.authed(Method::GET, "/api/mentors")?;
        if let Some(skill) = skill {
            request = request.query(&[("skill", skill)]);
        }
        if let Some(order_by) = order_by {
            request = request.query(&[("order_by", order_by)]);
        }

        Self::decode(request.send().await?).await
    }

    /// POST /api/match-requests
    pub async fn create_match_request(
        &self,
        mentor_id: UserId,
        mentee_id: UserId,
        message: &str,
    ) -> Result<MatchRequest, ClientError> {
        let response = self
            .authed(Method::POST, "/api/match-requests")?
            .json(&CreateMatchRequest {
                mentor_id,
                mentee_id,
                message: message.to_string(),
            })
            .send()
            .await?;
        Self::decode(response).await
    }

    /// GET /api/match-requests/incoming
    pub async fn incoming_requests(&self) -> Result<Vec<MatchRequest>, ClientError> {
        let response = self
            .authed(Method::GET, "/api/match-requests/incoming")?
            .send()
            .await?;
        Self::decode(response).await
    }

    /// GET /api/match-requests/outgoing
    pub async fn outgoing_requests(&self) -> Result<Vec<OutgoingMatchRequest>, ClientError> {
        let response = self
            .authed(Method::GET, "/api/match-requests/outgoing")?
            .send()
            .await?;
        Self::decode(response).await
    }

    /// PUT /api/match-requests/{id}/accept
    pub async fn accept_request(&self, id: MatchRequestId) -> Result<MatchRequest, ClientError> {
        let response = self
            .authed(Method::PUT, &format!("/api/match-requests/{}/accept", id))?
            .send()
            .await?;
        Self::decode(response).await
    }

    /// PUT /api/match-requests/{id}/reject
    pub async fn reject_request(&self, id: MatchRequestId) -> Result<MatchRequest, ClientError> {
        let response = self
            .authed(Method::PUT, &format!("/api/match-requests/{}/reject", id))?
            .send()
            .await?;
        Self::decode(response).await
    }

    /// DELETE /api/match-requests/{id}
    pub async fn cancel_request(&self, id: MatchRequestId) -> Result<MatchRequest, ClientError> {
        let response = self
            .authed(Method::DELETE, &format!("/api/match-requests/{}", id))?
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_calls_without_token_fail_fast() {
        let client = ApiClient::new("http://localhost:8080");
        assert!(matches!(
            client.authed(Method::GET, "/api/me"),
            Err(ClientError::MissingToken)
        ));
    }

    #[test]
    fn image_urls_are_keyed_by_role_and_id() {
        let client = ApiClient::new("http://localhost:8080");
        assert_eq!(
            client.profile_image_url(UserRole::Mentor, 3),
            "http://localhost:8080/images/mentor/3"
        );
    }

    #[test]
    fn with_token_retains_the_session() {
        let client = ApiClient::with_token("http://localhost:8080", "abc");
        assert_eq!(client.token(), Some("abc"));
    }
}
