use certbox_common::{CERT_PATH, PEM_CONTENT_TYPE, views::CertResponse};
use reqwest::{Client, Response, StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("This operation needs a bearer token (set --token or CERTBOX_TOKEN)")]
    MissingCredentials,

    #[error("API returned {status}: {}", .tag.as_deref().unwrap_or("no details"))]
    Api {
        status: StatusCode,
        tag: Option<String>,
    },

    #[error("Request failed: {0}")]
    ReqwestError(#[from] reqwest::Error),
}

pub struct ApiClient {
    api_url: String,
    client: Client,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(api_url: String, token: Option<String>) -> Result<Self, ApiClientError> {
        let client = Client::builder()
            .user_agent(format!("certboxctl/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            api_url,
            client,
            token,
        })
    }

    fn cert_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            CERT_PATH.trim_start_matches('/')
        )
    }

    async fn read(response: Response) -> Result<CertResponse, ApiClientError> {
        let status = response.status();
        let body = response.json::<CertResponse>().await;

        if !status.is_success() {
            return Err(ApiClientError::Api {
                status,
                tag: body.ok().and_then(|b| b.status),
            });
        }

        Ok(body?)
    }

    /// Store `pem` as the caller's newest certificate.
    pub async fn upload(&self, pem: String) -> Result<(), ApiClientError> {
        let token = self
            .token
            .as_deref()
            .ok_or(ApiClientError::MissingCredentials)?;

        let response = self
            .client
            .post(self.cert_url())
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, PEM_CONTENT_TYPE)
            .body(pem)
            .send()
            .await?;

        Self::read(response).await.map(|_| ())
    }

    /// Latest certificate for `email`, or for the caller when `None`.
    pub async fn fetch(&self, email: Option<&str>) -> Result<Option<String>, ApiClientError> {
        let mut req = self.client.get(self.cert_url());
        if let Some(email) = email {
            req = req.query(&[("email", email)]);
        }
        if let Some(token) = self.token.as_deref() {
            req = req.bearer_auth(token);
        }

        Ok(Self::read(req.send().await?).await?.cert)
    }
}
