use {async_trait::async_trait, serde::de::DeserializeOwned, serde_json::Value, tracing::debug};

use crate::error::{Error, Result};

/// Body of an outbound POST.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    /// `application/x-www-form-urlencoded` pairs.
    Form(Vec<(String, String)>),
}

/// Raw response handed back to callers; status codes are not interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Minimal HTTP transport used by drivers.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn post(
        &self,
        url: &str,
        query: &[(String, String)],
        body: RequestBody,
        headers: &[(String, String)],
    ) -> Result<HttpResponse>;
}

/// [`HttpClient`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post(
        &self,
        url: &str,
        query: &[(String, String)],
        body: RequestBody,
        headers: &[(String, String)],
    ) -> Result<HttpResponse> {
        let mut request = self.client.post(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        request = match body {
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Form(fields) => request.form(&fields),
        };

        let resp = request
            .send()
            .await
            .map_err(|e| Error::external(format!("POST {url}"), e))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::external(format!("read response from {url}"), e))?;
        debug!(url, status, "http post finished");
        Ok(HttpResponse { status, body })
    }
}
