use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::completion::{CompletionClient, CompletionOutcome, OpenAiCompletionClient};
use crate::config::Config;
use crate::media::{ImageFetcher, TwilioImageFetcher};
use crate::reply::{REPLY_PREFIX, chunk_reply, twiml_response};
use crate::store::PendingImageStore;

/// Prefix token separating the transport from the sender id in `From`.
const SENDER_PREFIX: &str = "whatsapp:";

const IMAGE_RECEIVED_REPLY: &str =
    "Image received. What would you like to know about this image?";
const IMAGE_FAILED_REPLY: &str =
    "Sorry, I couldn't process the image. Please try sending it again.";
const NO_ANSWER_REPLY: &str = "I'm ready for your question about the image.";

/// Shared state between webhook handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PendingImageStore>,
    pub fetcher: Arc<dyn ImageFetcher>,
    pub completion: Arc<dyn CompletionClient>,
}

/// Inbound Twilio webhook form payload.
#[derive(Debug, Deserialize)]
pub struct InboundForm {
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "Body", default)]
    pub body: Option<String>,
    #[serde(rename = "MediaUrl0", default)]
    pub media_url: Option<String>,
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/webhook", post(webhook_handler))
        .with_state(state)
}

/// GET / — health check.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({"msg": "working"}))
}

/// POST /webhook — handle an inbound WhatsApp message.
///
/// Routes to the image flow when `MediaUrl0` is present, otherwise to the
/// text flow. Always replies 200 with a TwiML document; internal failures
/// degrade to fixed apology text.
async fn webhook_handler(
    State(state): State<AppState>,
    Form(form): Form<InboundForm>,
) -> impl IntoResponse {
    let sender = sender_id(&form.from);
    let body = form.body.unwrap_or_default().to_lowercase();

    let messages = if let Some(media_url) = form.media_url.as_deref() {
        info!("inbound image message from {}", sender);
        handle_image_message(&state, media_url, sender).await
    } else {
        info!(
            "inbound text message from {}: body_len={}",
            sender,
            body.len()
        );
        handle_text_message(&state, &body, sender).await
    };

    (
        [(header::CONTENT_TYPE, "text/xml")],
        twiml_response(&messages),
    )
}

/// Sender id is everything after the last `whatsapp:` occurrence; inputs
/// without the prefix pass through unchanged.
fn sender_id(from: &str) -> &str {
    match from.rfind(SENDER_PREFIX) {
        Some(idx) => &from[idx + SENDER_PREFIX.len()..],
        None => from,
    }
}

/// Download the image and stage it for the sender's next question.
async fn handle_image_message(state: &AppState, media_url: &str, sender: &str) -> Vec<String> {
    match state.fetcher.fetch_base64(media_url).await {
        Ok(image) => {
            debug!("staged pending image for {}", sender);
            state.store.put(sender, image);
            vec![IMAGE_RECEIVED_REPLY.to_string()]
        }
        Err(e) => {
            error!("image download failed for {}: {}", sender, e);
            vec![IMAGE_FAILED_REPLY.to_string()]
        }
    }
}

/// Forward the query (plus any pending image, consumed exactly once) to the
/// completion API and chunk the answer.
async fn handle_text_message(state: &AppState, query: &str, sender: &str) -> Vec<String> {
    let image = state.store.take(sender);
    if image.is_some() {
        debug!("attaching pending image for {}", sender);
    }

    match state.completion.complete(query, image).await {
        Ok(CompletionOutcome::Answer(text)) => chunk_reply(&text)
            .into_iter()
            .map(|chunk| format!("{}{}", REPLY_PREFIX, chunk))
            .collect(),
        Ok(CompletionOutcome::NoAnswer) => {
            warn!("completion returned no answer for {}", sender);
            vec![NO_ANSWER_REPLY.to_string()]
        }
        Err(e) => {
            error!("completion call failed for {}: {}", sender, e);
            vec![NO_ANSWER_REPLY.to_string()]
        }
    }
}

/// Start the webhook server and serve until ctrl-c.
pub async fn run(config: &Config, host: &str, port: u16) -> Result<()> {
    let state = AppState {
        store: Arc::new(PendingImageStore::new()),
        fetcher: Arc::new(TwilioImageFetcher::new(&config.twilio)),
        completion: Arc::new(OpenAiCompletionClient::new(&config.completion)),
    };

    let app = build_router(state);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("webhook server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    Ok(())
}
