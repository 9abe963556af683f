//! HTTP calls made by the widget (gloo-net / fetch)

use async_trait::async_trait;
use gloo_net::http::Request;
use shared::dto::chat::{ChatRequest, ChatResponse};
use shared::dto::lookup::IpInfo;

use crate::error::{Result, WidgetError};
use crate::ports::{ChatTransport, IpResolver};

/// Map a response status to the widget error it stands for
pub fn check_status(status: u16) -> Result<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(WidgetError::Status(status))
    }
}

/// Posts messages to the backend `/chat` endpoint
#[derive(Clone, Debug)]
pub struct HttpChatTransport {
    endpoint: String,
}

impl HttpChatTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait(?Send)]
impl ChatTransport for HttpChatTransport {
    async fn post_message(&self, request: &ChatRequest) -> Result<ChatResponse> {
        // `.json()` also sets Content-Type: application/json
        let response = Request::post(&self.endpoint).json(request)?.send().await?;

        if let Err(e) = check_status(response.status()) {
            let body = response.text().await.unwrap_or_default();
            log::error!("POST {} -> {}: {}", self.endpoint, response.status(), body);
            return Err(e);
        }

        let reply: ChatResponse = response.json().await?;
        Ok(reply)
    }
}

/// Looks the visitor's IP up with ipinfo.io
#[derive(Clone, Debug)]
pub struct IpInfoResolver {
    url: String,
}

impl IpInfoResolver {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait(?Send)]
impl IpResolver for IpInfoResolver {
    async fn resolve(&self) -> Result<String> {
        let response = Request::get(&self.url).send().await?;
        check_status(response.status())?;
        let info: IpInfo = response.json().await?;
        Ok(info.ip)
    }
}
