//! `ledlight exec`: run instructions through an in-process remote session.

use std::io::Write;
use std::sync::Arc;

use ledlight_bridge::{BridgeState, COMMAND_CHANNEL, LedLightElement, LoopbackClient};
use tracing::debug;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::stdin::payload_from_line;

/// Subscription id used when the configuration names none.
pub const LOCAL_SUBSCRIPTION: &str = "local";

/// Delivers each instruction as a remote command and prints the replies.
///
/// Every instruction runs even after a failure; the command fails if any
/// reply was unsuccessful.
pub async fn exec<W: Write>(
    config: &CliConfig,
    instructions: &[String],
    render: bool,
    out: &mut W,
) -> CliResult<()> {
    let mut attributes = config.light.clone();
    if attributes.subscription_id.is_empty() {
        attributes.subscription_id = LOCAL_SUBSCRIPTION.to_string();
    }
    let indicator = super::create_indicator(&attributes)?;

    let client = Arc::new(LoopbackClient::new(attributes.subscription_id.clone()));
    let mut element = LedLightElement::with_config(
        indicator,
        LoopbackClient::factory(&client),
        config.bridge.to_bridge_config(),
    );
    if element.connected_callback().await != BridgeState::Connected {
        let reason = element.bridge().last_error().unwrap_or("unknown").to_string();
        return Err(CliError::NotConnected(reason));
    }

    let mut failed = 0;
    for instruction in instructions {
        debug!(instruction = %instruction, "executing");
        let reply = client
            .deliver(COMMAND_CHANNEL, payload_from_line(instruction))
            .await?;
        if !reply.is_success() {
            failed += 1;
        }
        writeln!(out, "{}", serde_json::to_string(&reply)?)?;
    }

    if render {
        writeln!(out, "{}", element.render().await)?;
    }
    element.disconnected_callback().await;

    if failed > 0 {
        return Err(CliError::InstructionsFailed(failed));
    }
    Ok(())
}
