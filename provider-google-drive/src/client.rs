//! Authorized Google Drive REST client
//!
//! Sends host-built requests with the current bearer credential and reports
//! every failure in the domain taxonomy. Requests are never retried here:
//! `TokenExpired` and `RateLimitExceeded` go straight back to the caller.

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use core_auth::DomainError;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::authorizer::DriveAuthorizer;
use crate::constants::DRIVE_API_BASE;
use crate::error::{GoogleDriveError, Result};

/// Default timeout applied to requests that do not set one
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Drive REST client bound to a [`DriveAuthorizer`].
#[derive(Clone)]
pub struct DriveApiClient {
    http_client: Arc<dyn HttpClient>,
    authorizer: Arc<DriveAuthorizer>,
}

impl DriveApiClient {
    pub fn new(http_client: Arc<dyn HttpClient>, authorizer: Arc<DriveAuthorizer>) -> Self {
        Self {
            http_client,
            authorizer,
        }
    }

    /// Builds an absolute URL for a Drive API path such as `/files`.
    pub fn url(path: &str) -> String {
        format!("{}/{}", DRIVE_API_BASE, path.trim_start_matches('/'))
    }

    /// Authorizes and sends `request`, returning only 2xx responses.
    ///
    /// # Errors
    ///
    /// - Authorization failures from [`DriveAuthorizer::authorize_request`]
    /// - Non-2xx statuses translated through the REST table
    /// - Transport failures as `ServiceError::Unknown`
    #[instrument(skip(self, request), fields(method = ?request.method, url = %request.url))]
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut request = self.authorizer.authorize_request(request)?;
        if request.timeout.is_none() {
            request.timeout = Some(DEFAULT_TIMEOUT);
        }
        if !request.headers.contains_key("Accept") {
            request = request.header("Accept", "application/json");
        }

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| {
                warn!(error = %e, "Drive request failed in transport");
                DomainError::from(GoogleDriveError::from(e))
            })?;

        if response.is_success() {
            debug!(status = response.status, "Drive request succeeded");
            return Ok(response);
        }

        let error = GoogleDriveError::from_response(response.status, &response.body);
        warn!(status = response.status, error = %error, "Drive request failed");
        Err(error.into())
    }

    /// GETs `url` and decodes the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.execute(HttpRequest::new(HttpMethod::Get, url)).await?;
        serde_json::from_slice(&response.body)
            .map_err(|e| GoogleDriveError::ParseError(e.to_string()).into())
    }
}

impl std::fmt::Debug for DriveApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveApiClient")
            .field("authorizer", &self.authorizer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bytes::Bytes;
    use core_auth::{AuthenticationError, Credential, ServiceError, StorageAuthorizer};
    use mockall::mock;
    use serde::Deserialize;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    fn response(status: u16, body: &'static str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    fn signed_in_authorizer() -> Arc<DriveAuthorizer> {
        let authorizer = DriveAuthorizer::new();
        authorizer.authorize(Credential::new("test_token"));
        Arc::new(authorizer)
    }

    fn files_request() -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, DriveApiClient::url("/files"))
    }

    #[test]
    fn test_url() {
        assert_eq!(
            DriveApiClient::url("files"),
            "https://www.googleapis.com/drive/v3/files"
        );
        assert_eq!(
            DriveApiClient::url("/files"),
            "https://www.googleapis.com/drive/v3/files"
        );
    }

    #[tokio::test]
    async fn test_execute_success() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            // Verify authorization header
            assert_eq!(
                req.headers.get("Authorization").map(String::as_str),
                Some("Bearer test_token")
            );
            assert_eq!(req.timeout, Some(DEFAULT_TIMEOUT));
            Ok(response(200, r#"{"files": []}"#))
        });

        let client = DriveApiClient::new(Arc::new(mock_http), signed_in_authorizer());
        let response = client.execute(files_request()).await.unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_execute_without_credential_skips_transport() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().never();

        let client = DriveApiClient::new(Arc::new(mock_http), Arc::new(DriveAuthorizer::new()));
        assert_eq!(
            client.execute(files_request()).await.unwrap_err(),
            DomainError::Authentication(AuthenticationError::NoSavedCredentials)
        );
    }

    #[tokio::test]
    async fn test_status_translation() {
        let cases: [(u16, &'static str); 4] = [
            (401, r#"{"error": {"code": 401, "message": "Invalid Credentials"}}"#),
            (403, r#"{"error": {"code": 403, "message": "Rate Limit Exceeded"}}"#),
            (404, "Not Found"),
            (500, r#"{"error": {"code": 500, "message": "Backend Error"}}"#),
        ];

        for (status, body) in cases {
            let mut mock_http = MockHttpClient::new();
            mock_http
                .expect_execute()
                .times(1)
                .returning(move |_| Ok(response(status, body)));

            let client = DriveApiClient::new(Arc::new(mock_http), signed_in_authorizer());
            let error = client.execute(files_request()).await.unwrap_err();

            match status {
                401 => assert!(error.requires_reauthentication()),
                403 => assert!(error.should_back_off()),
                404 => assert_eq!(error, DomainError::Service(ServiceError::ItemNotFound)),
                _ => assert!(matches!(
                    error,
                    DomainError::Service(ServiceError::Unknown(_))
                )),
            }
        }
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::OperationFailed("connection reset".to_string())));

        let client = DriveApiClient::new(Arc::new(mock_http), signed_in_authorizer());
        assert!(matches!(
            client.execute(files_request()).await,
            Err(DomainError::Service(ServiceError::Unknown(_)))
        ));
    }

    #[derive(Debug, Deserialize)]
    struct About {
        kind: String,
    }

    #[tokio::test]
    async fn test_get_json() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(2)
            .returning(|req| {
                if req.url.ends_with("/about") {
                    Ok(response(200, r#"{"kind": "drive#about"}"#))
                } else {
                    Ok(response(200, "not json"))
                }
            });

        let client = DriveApiClient::new(Arc::new(mock_http), signed_in_authorizer());
        let about: About = client.get_json(&DriveApiClient::url("about")).await.unwrap();
        assert_eq!(about.kind, "drive#about");

        let result: Result<About> = client.get_json(&DriveApiClient::url("files")).await;
        assert!(matches!(
            result,
            Err(DomainError::Service(ServiceError::Unknown(_)))
        ));
    }
}
