//! Sampling through the connected MCP client.

use futures::future::BoxFuture;
use never_give_up_core::{Sampler, SamplingError, SamplingRequest};
use rmcp::model as m;
use rmcp::{Peer, RoleServer};
use serde_json::{Value, json};

/// Forwards sampling requests to the client over `sampling/createMessage`.
#[derive(Clone)]
pub struct PeerSampler {
    peer: Peer<RoleServer>,
}

impl PeerSampler {
    pub fn new(peer: Peer<RoleServer>) -> Self {
        Self { peer }
    }

    /// Whether the client declared the sampling capability during initialization.
    pub fn client_supports_sampling(&self) -> bool {
        self.peer
            .peer_info()
            .and_then(|info| serde_json::to_value(info).ok())
            .is_some_and(|info| !info["capabilities"]["sampling"].is_null())
    }
}

impl Sampler for PeerSampler {
    fn create_message(
        &self,
        request: SamplingRequest,
    ) -> BoxFuture<'static, Result<String, SamplingError>> {
        let supported = self.client_supports_sampling();
        let peer = self.peer.clone();
        Box::pin(async move {
            if !supported {
                return Err(SamplingError::Unavailable);
            }
            let params = request_params(&request)?;
            let result = peer
                .create_message(params)
                .await
                .map_err(|e| SamplingError::Failed(e.to_string()))?;
            let value = serde_json::to_value(&result)
                .map_err(|e| SamplingError::Failed(e.to_string()))?;
            Ok(response_text(&value))
        })
    }
}

/// Build `sampling/createMessage` params from the wire shape.
pub fn request_params(request: &SamplingRequest) -> Result<m::CreateMessageRequestParam, SamplingError> {
    let prefs = &request.model_preferences;
    let wire = json!({
        "messages": request
            .messages
            .iter()
            .map(|msg| json!({
                "role": msg.role,
                "content": { "type": "text", "text": msg.content },
            }))
            .collect::<Vec<_>>(),
        "systemPrompt": request.system_prompt,
        "maxTokens": request.max_tokens,
        "includeContext": request.include_context,
        "modelPreferences": {
            "hints": prefs.hints.iter().map(|h| json!({ "name": h })).collect::<Vec<_>>(),
            "speedPriority": prefs.speed_priority,
            "costPriority": prefs.cost_priority,
            "intelligencePriority": prefs.intelligence_priority,
        },
    });
    serde_json::from_value(wire)
        .map_err(|e| SamplingError::Failed(format!("invalid sampling request: {e}")))
}

/// Text of a `createMessage` result; non-text content yields an empty string.
pub fn response_text(result: &Value) -> String {
    let content = &result["content"];
    match content {
        Value::Array(blocks) => blocks
            .iter()
            .filter(|b| b["type"] == "text")
            .filter_map(|b| b["text"].as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(_) if content["type"] == "text" => {
            content["text"].as_str().unwrap_or_default().to_string()
        }
        _ => String::new(),
    }
}
