//! Streaming completion turn driver
//!
//! A turn is one user message plus the resulting assistant reply. The
//! driver owns the whole lifecycle: the optimistic store inserts, the
//! completion POST, the chunk loop feeding decoder and accumulator, the
//! failure mappings, and the authoritative re-fetch once the stream
//! settles.
//!
//! One driver serves one open conversation at a time; a second send while
//! one is in flight is refused, not queued.

use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::Client;

use crate::api::types::LlmModel;
use crate::api::ConversationService;
use crate::completion::accumulator::{EventKind, FrameEffect, StreamAccumulator};
use crate::completion::decoder::FrameDecoder;
use crate::completion::request::{CompletionRequest, ToolSelection};
use crate::error::{CovoError, Result};
use crate::store::MessageStore;

/// Localized apology shown in place of a reply when a turn fails before
/// any token was rendered.
pub const FAILURE_APOLOGY: &str = "죄송합니다. 응답을 생성하는 중 오류가 발생했습니다.";

/// What a settled turn produced
#[derive(Debug)]
pub struct TurnOutcome {
    /// The final assistant reply text
    pub reply: String,
    /// Whether the post-turn conversation re-fetch succeeded and the
    /// store now holds server-confirmed messages
    pub refreshed: bool,
}

/// HTTP client for the streaming completion endpoint
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http_client: Client,
    endpoint: url::Url,
    idle_timeout: Option<Duration>,
}

impl CompletionClient {
    /// Construct a client for `base_url`'s completion endpoint
    ///
    /// `idle_timeout_seconds` bounds the wait between stream chunks; 0
    /// disables the bound. No overall request timeout is set, replies
    /// legitimately stream for minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` does not parse or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, idle_timeout_seconds: u64) -> Result<Self> {
        let base_url = url::Url::parse(base_url)
            .map_err(|e| CovoError::Config(format!("invalid api base url: {}", e)))?;
        let endpoint = base_url
            .join("/api/v1/completion")
            .map_err(|e| CovoError::Config(format!("invalid api base url: {}", e)))?;
        let http_client = Client::builder().build()?;
        Ok(Self {
            http_client,
            endpoint,
            idle_timeout: match idle_timeout_seconds {
                0 => None,
                s => Some(Duration::from_secs(s)),
            },
        })
    }

    /// Open the completion stream for one turn
    ///
    /// Maps non-2xx responses to [`CovoError::TransportStatus`] and a
    /// declared empty body to [`CovoError::TransportNoBody`]; in both
    /// cases no bytes are ever handed to the decoder.
    async fn open_stream(
        &self,
        request: &CompletionRequest,
    ) -> Result<impl Stream<Item = reqwest::Result<Bytes>>> {
        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CovoError::TransportStatus {
                status: status.as_u16(),
            }
            .into());
        }
        if response.content_length() == Some(0) {
            return Err(CovoError::TransportNoBody.into());
        }

        Ok(response.bytes_stream())
    }
}

/// Drives completion turns against one open conversation
pub struct TurnDriver {
    client: CompletionClient,
    sending: bool,
}

impl TurnDriver {
    /// Creates a driver around `client` with no turn in flight
    pub fn new(client: CompletionClient) -> Self {
        Self {
            client,
            sending: false,
        }
    }

    /// Whether a turn is currently in flight
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Runs one full turn: optimistic inserts, stream, settle
    ///
    /// `on_update` is called with the assistant message's visible text
    /// every time it changes, for incremental rendering; the flag is true
    /// while the text is pre-answer status narration rather than reply
    /// tokens.
    ///
    /// # Errors
    ///
    /// Refuses with [`CovoError::TurnInFlight`] while another turn is
    /// outstanding. Stream failures are mapped per the turn's failure
    /// taxonomy; in every case the store is left consistent, showing
    /// either the best-known partial reply or the apology text.
    #[allow(clippy::too_many_arguments)]
    pub async fn send_message(
        &mut self,
        service: &dyn ConversationService,
        store: &mut MessageStore,
        conversation_id: &str,
        text: &str,
        llm: &LlmModel,
        agent_id: Option<&str>,
        tools: &ToolSelection,
        on_update: impl FnMut(&str, bool),
    ) -> Result<TurnOutcome> {
        if self.sending {
            return Err(CovoError::TurnInFlight.into());
        }
        self.sending = true;
        let result = self
            .run_turn(
                service,
                store,
                conversation_id,
                text,
                llm,
                agent_id,
                tools,
                on_update,
            )
            .await;
        self.sending = false;
        result
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_turn(
        &self,
        service: &dyn ConversationService,
        store: &mut MessageStore,
        conversation_id: &str,
        text: &str,
        llm: &LlmModel,
        agent_id: Option<&str>,
        tools: &ToolSelection,
        mut on_update: impl FnMut(&str, bool),
    ) -> Result<TurnOutcome> {
        // The request's parent is the thread tip as it stood before this
        // turn's optimistic inserts.
        let parent_message_id = store.tip().map(|tip| tip.message_id.clone());
        let user_id = store.append_user_message(text, None)?;
        let reply_id = store.append_assistant_placeholder(
            &user_id,
            Some(llm.clone()),
            agent_id.map(str::to_string),
        )?;

        let request = CompletionRequest::next_turn(
            conversation_id,
            parent_message_id.as_deref(),
            text,
            llm,
            agent_id,
            tools,
        );

        tracing::debug!(
            conversation_id,
            parent = parent_message_id.as_deref().unwrap_or("<root>"),
            "sending completion request"
        );

        let stream = match self.client.open_stream(&request).await {
            Ok(stream) => stream,
            Err(e) => {
                store.update_content(&reply_id, FAILURE_APOLOGY)?;
                on_update(FAILURE_APOLOGY, false);
                return Err(e);
            }
        };
        futures::pin_mut!(stream);

        let mut apply = |replacement: &str, is_status: bool| -> Result<()> {
            store.update_content(&reply_id, replacement)?;
            on_update(replacement, is_status);
            Ok(())
        };
        let (accumulator, stream_error) =
            consume_stream(stream, self.client.idle_timeout, &mut apply).await?;

        if let Some(error) = stream_error {
            if !accumulator.has_data() {
                store.update_content(&reply_id, FAILURE_APOLOGY)?;
                on_update(FAILURE_APOLOGY, false);
            }
            return Err(error.into());
        }

        if !accumulator.has_data() {
            store.update_content(&reply_id, FAILURE_APOLOGY)?;
            on_update(FAILURE_APOLOGY, false);
            return Err(CovoError::EmptyReply.into());
        }

        let reply = accumulator.data().to_string();

        // The streamed text stays on screen even if the re-fetch fails.
        let refreshed = match service.get_conversation(conversation_id).await {
            Ok(response) => {
                store.replace_all(response.messages);
                true
            }
            Err(e) => {
                tracing::warn!("post-turn conversation refresh failed: {}", e);
                false
            }
        };

        Ok(TurnOutcome { reply, refreshed })
    }
}

/// Feeds a byte stream through decoder and accumulator until it ends
///
/// Frames are applied strictly in arrival order; every complete line of a
/// chunk is processed before the next chunk is awaited. On a transport
/// read failure the leftover buffer is abandoned unprocessed; on a clean
/// end it is flushed through the same line rules.
///
/// Returns the final accumulator state and, if the stream failed, the
/// error that ended it. The outer `Result` carries failures raised by
/// `apply` itself.
async fn consume_stream<S, E>(
    mut stream: S,
    idle_timeout: Option<Duration>,
    apply: &mut impl FnMut(&str, bool) -> Result<()>,
) -> Result<(StreamAccumulator, Option<CovoError>)>
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut decoder = FrameDecoder::new();
    let mut accumulator = StreamAccumulator::new();

    let stream_error = 'read: loop {
        let item = match idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, stream.next()).await {
                Ok(item) => item,
                Err(_) => {
                    break 'read Some(CovoError::TransportAborted(format!(
                        "no stream data for {}s",
                        limit.as_secs()
                    )));
                }
            },
            None => stream.next().await,
        };

        let chunk = match item {
            Some(Ok(chunk)) => chunk,
            Some(Err(e)) => break 'read Some(CovoError::TransportAborted(e.to_string())),
            None => break 'read None,
        };

        for frame in decoder.push_chunk(&chunk) {
            let is_status = EventKind::from_name(&frame.event) == EventKind::Status;
            match accumulator.apply(&frame) {
                FrameEffect::Replace(text) => apply(&text, is_status)?,
                FrameEffect::Fatal(message) => {
                    break 'read Some(CovoError::ServerStream(message));
                }
                FrameEffect::None => {}
            }
        }
    };

    if stream_error.is_none() {
        for frame in decoder.finish() {
            let is_status = EventKind::from_name(&frame.event) == EventKind::Status;
            match accumulator.apply(&frame) {
                FrameEffect::Replace(text) => apply(&text, is_status)?,
                FrameEffect::Fatal(message) => {
                    return Ok((accumulator, Some(CovoError::ServerStream(message))));
                }
                FrameEffect::None => {}
            }
        }
    }

    Ok((accumulator, stream_error))
}
