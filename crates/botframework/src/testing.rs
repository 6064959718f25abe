use std::{collections::VecDeque, sync::Mutex};

use {
    async_trait::async_trait,
    botwire_channels::{HttpClient, HttpResponse, RequestBody},
};

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub url: String,
    pub body: RequestBody,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Fake transport replaying queued responses and recording every request.
#[derive(Default)]
pub(crate) struct RecordingHttp {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl RecordingHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(HttpResponse {
                status,
                body: body.to_string(),
            });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl HttpClient for RecordingHttp {
    async fn post(
        &self,
        url: &str,
        _query: &[(String, String)],
        body: RequestBody,
        headers: &[(String, String)],
    ) -> botwire_channels::Result<HttpResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedRequest {
                url: url.to_string(),
                body,
                headers: headers.to_vec(),
            });
        let next = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        Ok(next.unwrap_or(HttpResponse {
            status: 200,
            body: "{}".into(),
        }))
    }
}
