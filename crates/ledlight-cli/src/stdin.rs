//! Line-oriented messaging client over stdin/stdout.
//!
//! Each input line is one inbound command. Lines that parse as JSON are
//! delivered as JSON; anything else is delivered as a plain string, so both
//! `on()` and `{"command":"setColor(\"blue\")"}` work. Every reply is written
//! back as one JSON line.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use ledlight_bridge::{
    BoxFuture, BridgeResult, COMMAND_CHANNEL, ClientFactory, InboundMessage, MessageHandler,
    MessagingClient,
};
use ledlight_core::WidgetEvent;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, warn};

use crate::error::CliResult;

/// Turns one input line into a command payload.
pub fn payload_from_line(line: &str) -> serde_json::Value {
    serde_json::from_str(line).unwrap_or_else(|_| serde_json::Value::String(line.to_string()))
}

pub struct StdinClient {
    subscription_id: String,
    handler: Mutex<Option<MessageHandler>>,
    connected: AtomicBool,
}

impl std::fmt::Debug for StdinClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdinClient")
            .field("subscription_id", &self.subscription_id)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

impl StdinClient {
    pub fn new(subscription_id: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            handler: Mutex::new(None),
            connected: AtomicBool::new(false),
        }
    }

    /// Factory that always hands out this client.
    pub fn factory(client: &Arc<Self>) -> ClientFactory {
        let client = Arc::clone(client);
        Arc::new(move |_: &str| Arc::clone(&client) as Arc<dyn MessagingClient>)
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Reads commands until EOF or disconnect. Returns the number of
    /// replies written.
    ///
    /// When `events` is given, pending widget notifications are written to
    /// the same output before each reply, so every line on `writer` appears
    /// in the order it happened.
    pub async fn run<R, W>(
        &self,
        reader: R,
        writer: &mut W,
        mut events: Option<broadcast::Receiver<WidgetEvent>>,
    ) -> CliResult<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut replies = 0;

        write_pending_events(events.as_mut(), writer).await?;
        while let Some(line) = lines.next_line().await? {
            if !self.is_connected() {
                debug!("client disconnected, stopping");
                break;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Some(handler) = self.handler() else {
                warn!(line, "no command handler registered, dropping line");
                continue;
            };

            let reply = handler(InboundMessage::command(payload_from_line(line))).await;
            write_pending_events(events.as_mut(), writer).await?;
            write_line(writer, &serde_json::to_string(&reply)?).await?;
            replies += 1;
        }
        write_pending_events(events.as_mut(), writer).await?;

        Ok(replies)
    }

    fn handler(&self) -> Option<MessageHandler> {
        self.handler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> CliResult<()> {
    let mut out = String::with_capacity(line.len() + 1);
    out.push_str(line);
    out.push('\n');
    writer.write_all(out.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

async fn write_pending_events<W: AsyncWrite + Unpin>(
    events: Option<&mut broadcast::Receiver<WidgetEvent>>,
    writer: &mut W,
) -> CliResult<()> {
    let Some(events) = events else {
        return Ok(());
    };
    loop {
        match events.try_recv() {
            Ok(event) => write_line(writer, &serde_json::to_string(&event)?).await?,
            Err(TryRecvError::Lagged(skipped)) => warn!(skipped, "dropped notifications"),
            Err(TryRecvError::Empty | TryRecvError::Closed) => return Ok(()),
        }
    }
}

impl MessagingClient for StdinClient {
    fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    fn connect(&self) -> BoxFuture<'_, BridgeResult<()>> {
        Box::pin(async move {
            self.connected.store(true, Ordering::SeqCst);
            debug!(subscription_id = %self.subscription_id, "stdin client ready");
            Ok(())
        })
    }

    fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        *self.handler.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn on_message(&self, channel: &str, handler: MessageHandler) {
        if channel != COMMAND_CHANNEL {
            warn!(channel, "stdin client only carries the command channel");
            return;
        }
        *self.handler.lock().unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledlight_bridge::{CommandHandler, new_shared_indicator};
    use ledlight_core::Indicator;
    use tokio::io::BufReader;

    async fn connected_client() -> (StdinClient, ledlight_bridge::SharedIndicator) {
        let widget = new_shared_indicator(Indicator::new());
        let client = StdinClient::new("desk");
        client.connect().await.unwrap();
        client.on_message(
            COMMAND_CHANNEL,
            CommandHandler::new(Arc::clone(&widget)).into_message_handler(),
        );
        (client, widget)
    }

    #[test]
    fn payloads_prefer_json() {
        assert_eq!(payload_from_line("on()"), serde_json::json!("on()"));
        assert_eq!(
            payload_from_line(r#"{"command":"off()"}"#),
            serde_json::json!({"command": "off()"})
        );
        assert_eq!(payload_from_line("42"), serde_json::json!(42));
    }

    #[tokio::test]
    async fn replies_one_line_per_command() {
        let (client, widget) = connected_client().await;
        let input = b"on()\n\n{\"method\":\"setColor\",\"params\":[\"blue\"]}\nexplode()\n";
        let mut output = Vec::new();

        let count = client
            .run(BufReader::new(&input[..]), &mut output, None)
            .await
            .unwrap();
        assert_eq!(count, 3);

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(r#"{"success":true"#));
        assert!(lines[1].contains(r#""color":"blue""#));
        assert_eq!(
            lines[2],
            r#"{"success":false,"error":"unknown method: explode"}"#
        );

        let widget = widget.read().await;
        assert!(widget.power());
        assert_eq!(widget.color(), "blue");
    }

    #[tokio::test]
    async fn stops_after_disconnect() {
        let (client, _widget) = connected_client().await;
        client.disconnect();
        let mut output = Vec::new();
        let count = client
            .run(BufReader::new(&b"on()\n"[..]), &mut output, None)
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn events_precede_the_reply_they_belong_to() {
        let (client, widget) = connected_client().await;
        let events = widget.read().await.subscribe();
        let mut output = Vec::new();

        client
            .run(
                BufReader::new(&b"on()\ngetState()\n"[..]),
                &mut output,
                Some(events),
            )
            .await
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            r#"{"type":"change","power":true,"color":"red","diameter":30.0}"#
        );
        assert!(lines[1].starts_with(r#"{"success":true"#));
        assert!(lines[2].starts_with(r#"{"success":true"#));
    }

    #[test]
    fn ignores_other_channels() {
        let client = StdinClient::new("desk");
        let widget = new_shared_indicator(Indicator::new());
        client.on_message(
            "status",
            CommandHandler::new(widget).into_message_handler(),
        );
        assert!(client.handler().is_none());
    }
}
