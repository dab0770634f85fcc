use std::error::Error as StdError;

use async_trait::async_trait;
use reqwest::{redirect, Client};

use crate::runtime::contract::{ProbeError, ProbeResult};
use crate::runtime::settings::ProbeSettings;

/// One outbound diagnostic request. A completed exchange is a success
/// regardless of its HTTP status.
#[async_trait]
pub trait ExternalProbe: Send + Sync {
    async fn probe(&self) -> Result<ProbeResult, ProbeError>;
}

pub struct HttpsProbe {
    client: Client,
    settings: ProbeSettings,
}

impl HttpsProbe {
    pub fn new(settings: ProbeSettings) -> Result<Self, reqwest::Error> {
        // One request per invocation: no pooled connections, no redirects.
        let client = Client::builder()
            .pool_max_idle_per_host(0)
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl ExternalProbe for HttpsProbe {
    async fn probe(&self) -> Result<ProbeResult, ProbeError> {
        let url = self.settings.url.as_str();
        let exchange = async {
            let response = self.client.get(url).send().await?;
            let status_code = response.status().as_u16();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status_code, body))
        };

        // Dropping the in-flight exchange on elapse aborts the connection.
        match tokio::time::timeout(self.settings.timeout, exchange).await {
            Err(_) => Err(ProbeError::Timeout),
            Ok(Err(error)) => Err(ProbeError::Transport(describe_transport_error(&error))),
            Ok(Ok((status_code, body))) => Ok(ProbeResult::from_body(
                url,
                status_code,
                &String::from_utf8_lossy(&body),
            )),
        }
    }
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
