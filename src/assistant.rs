use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{data_formats::ChatMessage, errors::RequestError};

const SYSTEM_PROMPT: &str = "You are CabMate, the assistant for UK taxi and private-hire \
     drivers. You help with licensing and local authority rules, self-assessment tax, the \
     Highway Code, vehicle standards, and what to do after an incident. Answer plainly and \
     keep it short. If a question is not about driving work, say you can only help with \
     driving-related topics.";

const DEFAULT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const COMPLETION_MODEL: &str = "gpt-4o-mini";
const MAX_COMPLETION_TOKENS: u32 = 512;

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: String,
}

/// Stateless relay: the caller resupplies the whole conversation on every
/// call, the persona is prepended, and the single reply is returned. No
/// retries, no streaming, nothing persisted.
pub async fn relay_chat(
    client: &reqwest::Client,
    history: &[ChatMessage],
) -> Result<String, RequestError> {
    if history.is_empty() {
        return Err(RequestError::BadRequest("messages must not be empty"));
    }
    for message in history {
        if message.role != "user" && message.role != "assistant" {
            return Err(RequestError::BadRequest(
                "message role must be user or assistant",
            ));
        }
    }

    // Checked before anything leaves the process.
    let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
        error!("OPENAI_API_KEY is not set");
        RequestError::ServerError
    })?;
    let url =
        std::env::var("COMPLETIONS_API_URL").unwrap_or_else(|_| DEFAULT_COMPLETIONS_URL.into());

    let mut messages = vec![WireMessage {
        role: "system",
        content: SYSTEM_PROMPT,
    }];
    messages.extend(history.iter().map(|message| WireMessage {
        role: &message.role,
        content: &message.content,
    }));
    let request = CompletionRequest {
        model: COMPLETION_MODEL,
        messages,
        max_tokens: MAX_COMPLETION_TOKENS,
    };

    let response = client
        .post(&url)
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .await
        .map_err(|e| {
            error!("completion request failed: {e}");
            RequestError::ServerError
        })?;

    if !response.status().is_success() {
        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        error!("completion API returned {status}");
        return Err(RequestError::Upstream(status));
    }

    let completion: CompletionResponse = response.json().await.map_err(|e| {
        error!("completion response unreadable: {e}");
        RequestError::ServerError
    })?;
    let reply = completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .unwrap_or_default();
    if reply.is_empty() {
        error!("completion API returned no choices");
        return Err(RequestError::ServerError);
    }
    Ok(reply)
}
