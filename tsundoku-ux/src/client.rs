use anyhow::Result;
use reqwest::{header, Client, Method, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Serialize};
use tsundoku_types::{ApiResponse, NyaaIndividualResult, NyaaSearchResult, Show, WebhookBase};

use crate::webhooks::{webhook_path, WEBHOOKS_PATH};

/// Transport used by the webhook dialogs.
#[async_trait::async_trait]
pub trait WebhookClient: Send + Sync {
    /// `path` is relative to the server root, e.g. `/api/webhooks/3`.
    /// `form` is an url-encoded body.
    async fn send(&self, method: Method, path: &str, form: Option<String>) -> Result<()>;
}

/// reqwest-backed client for a tsundoku server.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(base: Url, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base,
            token,
        }
    }

    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow!("{} cannot be used as a base url", self.base))?;
            segments.pop_if_empty();
            for segment in path.split('/') {
                if segment.is_empty() {
                    continue;
                }
                segments.push(segment);
            }
        }
        let mut request = self.client.request(method, url);
        if let Some(token) = &self.token {
            request = request.header(header::AUTHORIZATION, token.as_str());
        }
        Ok(request)
    }

    /// `request` with an optional url-encoded form body.
    pub fn form_request(
        &self,
        method: Method,
        path: &str,
        form: Option<String>,
    ) -> Result<RequestBuilder> {
        let mut request = self.request(method, path)?;
        if let Some(form) = form {
            request = request
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(form);
        }
        Ok(request)
    }

    async fn checked(request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        if !response.status().is_success() {
            bail!(
                "Got HTTP Status: {}\n{}",
                response.status(),
                response.text().await?
            );
        }
        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = Self::checked(self.request(Method::GET, path)?).await?;
        response.json::<ApiResponse<T>>().await?.into_result()
    }

    pub async fn list_webhooks(&self) -> Result<Vec<WebhookBase>> {
        self.get(WEBHOOKS_PATH).await
    }

    pub async fn get_webhook(&self, base_id: u64) -> Result<WebhookBase> {
        self.get(&webhook_path(base_id)).await
    }

    pub async fn list_shows(&self) -> Result<Vec<Show>> {
        self.get("/api/shows").await
    }

    pub async fn get_show(&self, id: u64) -> Result<Show> {
        self.get(&format!("/api/shows/{id}")).await
    }

    /// Sends a partial show update, e.g. `{"watch": false}`.
    pub async fn update_show<B: Serialize + ?Sized>(&self, id: u64, body: &B) -> Result<()> {
        Self::checked(
            self.request(Method::PUT, &format!("/api/shows/{id}"))?
                .json(body),
        )
        .await?;
        Ok(())
    }

    pub async fn search_nyaa(&self, query: &str) -> Result<Vec<NyaaIndividualResult>> {
        let response = Self::checked(
            self.request(Method::GET, "/api/nyaa")?
                .query(&[("query", query)]),
        )
        .await?;
        response.json::<NyaaSearchResult>().await?.into_result()
    }
}

#[async_trait::async_trait]
impl WebhookClient for HttpClient {
    async fn send(&self, method: Method, path: &str, form: Option<String>) -> Result<()> {
        debug!("{} {}", method, path);
        Self::checked(self.form_request(method, path, form)?).await?;
        Ok(())
    }
}
