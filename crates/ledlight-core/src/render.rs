//! Markup and stylesheet for the indicator.

use crate::state::IndicatorState;

/// Stylesheet shared by every indicator instance.
pub const STYLES: &str = r#":host {
  display: inline-block;
  margin: 5px;
  position: relative;
}
.led {
  border-radius: 50%;
  width: var(--led-diameter, 30px);
  height: var(--led-diameter, 30px);
  background-color: rgba(0, 0, 0, 0.2);
  box-shadow: 0 0 5px rgba(0, 0, 0, 0.4);
  transition: background-color 0.2s, box-shadow 0.2s;
  border: 2px solid #333;
  cursor: pointer;
}
.led.on {
  background-color: var(--led-color, red);
  box-shadow: 0 0 10px var(--led-color, red), 0 0 20px var(--led-color, red);
  border-color: var(--led-color, red);
}
.led:hover {
  opacity: 0.8;
}
.remote-indicator {
  position: absolute;
  top: -5px;
  right: -5px;
  width: 8px;
  height: 8px;
  border-radius: 50%;
  background-color: #4caf50;
  opacity: 0;
  transition: opacity 0.3s;
}
.remote-indicator.connected {
  opacity: 1;
}
"#;

/// Renders the indicator circle and, when remote control is configured,
/// the connection dot.
pub fn render(state: &IndicatorState) -> String {
    let mut out = format!(
        r#"<div class="{}" style="--led-color: {}; --led-diameter: {}px;"></div>"#,
        if state.power { "led on" } else { "led" },
        html_escape(&state.color),
        state.diameter,
    );

    if state.has_subscription() {
        out.push('\n');
        out.push_str(if state.remote_connected {
            r#"<div class="remote-indicator connected"></div>"#
        } else {
            r#"<div class="remote-indicator"></div>"#
        });
    }

    out
}

/// Escapes a value for use inside a double-quoted attribute.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
