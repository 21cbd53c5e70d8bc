//! `ledlight listen`: remote control over stdin/stdout.

use std::sync::Arc;

use ledlight_bridge::{BridgeState, LedLightElement};
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tracing::info;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::stdin::StdinClient;

/// Connects the indicator to stdin and serves commands until EOF or Ctrl-C.
///
/// Replies and widget events are both written to stdout as JSON lines;
/// events carry a `type` field, replies a `success` field.
pub async fn listen(config: &CliConfig) -> CliResult<()> {
    let mut stdout = tokio::io::stdout();
    tokio::select! {
        result = serve(config, BufReader::new(tokio::io::stdin()), &mut stdout) => {
            result.map(|replies| info!(replies, "stdin closed"))
        }
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted");
            Ok(())
        }
    }
}

/// Runs one session over `reader`/`writer` and returns the number of
/// replies written.
pub async fn serve<R, W>(config: &CliConfig, reader: R, writer: &mut W) -> CliResult<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut attributes = config.light.clone();
    if attributes.subscription_id.is_empty() {
        attributes.subscription_id = super::exec::LOCAL_SUBSCRIPTION.to_string();
    }
    let indicator = super::create_indicator(&attributes)?;
    let events = indicator.subscribe();

    let client = Arc::new(StdinClient::new(attributes.subscription_id.clone()));
    let mut element = LedLightElement::with_config(
        indicator,
        StdinClient::factory(&client),
        config.bridge.to_bridge_config(),
    );

    if element.connected_callback().await != BridgeState::Connected {
        let reason = element.bridge().last_error().unwrap_or("unknown").to_string();
        return Err(CliError::NotConnected(reason));
    }
    info!(subscription_id = %attributes.subscription_id, "listening");

    let result = client.run(reader, writer, Some(events)).await;
    element.disconnected_callback().await;
    result
}
