use async_trait::async_trait;
use chart_error::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{GenerateStrategy, GenerationRequest};

const SOURCE: &str = "mcp-server-chart";

/// Delegates rendering to a hosted chart service and returns whatever URL it hands back.
pub struct RemoteApiStrategy {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result_obj: Option<Value>,
    #[serde(default)]
    error_message: Option<String>,
}

impl RemoteApiStrategy {
    pub fn new(endpoint: String) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Startup(format!("http client: {e}")))?;
        Ok(Self { client, endpoint })
    }
}

fn payload(request: &GenerationRequest) -> Value {
    let mut body = request.render_options();
    if let Some(map) = body.as_object_mut() {
        map.insert("source".into(), json!(SOURCE));
    }
    body
}

/// Turns the service reply into a locator or a failure carrying its message.
fn interpret(status: u16, body: &str) -> Result<String> {
    if !(200..300).contains(&status) {
        return Err(Error::Http {
            status,
            message: body.to_string(),
        });
    }

    let response: RemoteResponse = serde_json::from_str(body)?;
    if !response.success {
        return Err(Error::Internal(
            response
                .error_message
                .unwrap_or_else(|| "remote service reported failure".into()),
        ));
    }

    match response.result_obj {
        Some(Value::String(url)) => Ok(url),
        Some(other) => Ok(other.to_string()),
        None => Err(Error::Internal("remote service returned no result".into())),
    }
}

#[async_trait]
impl GenerateStrategy for RemoteApiStrategy {
    fn name(&self) -> &'static str {
        "antvis"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload(request))
            .send()
            .await
            .map_err(|e| Error::System(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::System(e.to_string()))?;
        tracing::debug!(status, chart = %request.chart_type, "Remote chart service replied");

        interpret(status, &body)
    }
}
