//! `ledlight render`.

use std::io::Write;

use ledlight_core::STYLES;

use crate::config::CliConfig;
use crate::error::CliResult;

/// Prints the markup for the configured indicator.
pub fn render<W: Write>(config: &CliConfig, styles: bool, out: &mut W) -> CliResult<()> {
    let indicator = super::create_indicator(&config.light)?;
    if styles {
        writeln!(out, "<style>{}</style>", STYLES)?;
    }
    writeln!(out, "{}", indicator.render())?;
    Ok(())
}
