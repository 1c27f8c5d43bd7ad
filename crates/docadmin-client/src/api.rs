use reqwest::header::AUTHORIZATION;
use reqwest::multipart::Form;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{AdminError, Operation};

pub const LOGIN_PATH: &str = "/admin/login";
pub const UPLOAD_PATH: &str = "/admin/upload";
pub const REINDEX_PATH: &str = "/admin/reindex";

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

/// HTTP access to the three admin endpoints.
///
/// Construction fails with [`AdminError::MissingBaseUrl`] when no base URL is
/// configured, so holding an `ApiClient` means requests can be addressed.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, AdminError> {
        let base = config.api_base()?.to_owned();
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AdminError::Configuration(format!("build HTTP client: {e}")))?;
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// POST form-encoded credentials; returns the token from `{ "token": .. }`.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AdminError> {
        debug!(url = %self.url(LOGIN_PATH), "sending login request");
        let resp = self
            .http
            .post(self.url(LOGIN_PATH))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .map_err(|e| AdminError::Auth {
                status: None,
                message: e.to_string(),
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| AdminError::Auth {
            status: Some(status.as_u16()),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            warn!(%status, "login rejected");
            return Err(AdminError::Auth {
                status: Some(status.as_u16()),
                message: text,
            });
        }

        match serde_json::from_str::<LoginResponse>(&text) {
            Ok(LoginResponse { token }) if !token.is_empty() => Ok(token),
            Ok(_) => Err(AdminError::Auth {
                status: Some(status.as_u16()),
                message: "malformed login response: empty token".into(),
            }),
            Err(e) => Err(AdminError::Auth {
                status: Some(status.as_u16()),
                message: format!("malformed login response: {e}"),
            }),
        }
    }

    /// POST a multipart document. Returns the raw response body.
    pub async fn upload(&self, authorization: &str, form: Form) -> Result<String, AdminError> {
        debug!(url = %self.url(UPLOAD_PATH), "sending upload request");
        let resp = self
            .http
            .post(self.url(UPLOAD_PATH))
            .header(AUTHORIZATION, authorization)
            .multipart(form)
            .send()
            .await
            .map_err(|source| AdminError::Transport {
                operation: Operation::Upload,
                source,
            })?;

        read_body(Operation::Upload, resp).await
    }

    /// POST with no body. Returns the raw response body.
    pub async fn reindex(&self, authorization: &str) -> Result<String, AdminError> {
        debug!(url = %self.url(REINDEX_PATH), "sending reindex request");
        let resp = self
            .http
            .post(self.url(REINDEX_PATH))
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|source| AdminError::Transport {
                operation: Operation::Reindex,
                source,
            })?;

        read_body(Operation::Reindex, resp).await
    }
}

/// The body is opaque text either way; only the status decides the outcome.
async fn read_body(operation: Operation, resp: Response) -> Result<String, AdminError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|source| AdminError::Transport { operation, source })?;

    debug!(%operation, %status, "response received");
    if status.is_success() {
        Ok(body)
    } else {
        warn!(%operation, %status, "request rejected");
        Err(AdminError::Remote {
            operation,
            status: status.as_u16(),
            body,
        })
    }
}
