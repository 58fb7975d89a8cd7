//! Prompt assembly
//!
//! Flattens a transcript into the single prompt string the upstream model
//! expects: persona preamble, one `Speaker: text` line per message, then a
//! trailing cue for the model to continue from.

use super::Message;

/// Cue appended after the transcript so the model answers as the bot
pub const TRAILING_CUE: &str = "Bot:";

pub fn assemble_prompt(persona: &str, history: &[Message]) -> String {
    let mut lines = Vec::with_capacity(history.len() + 2);
    lines.push(persona.to_string());
    lines.extend(
        history
            .iter()
            .map(|m| format!("{}: {}", m.sender.label(), m.text)),
    );
    lines.push(TRAILING_CUE.to_string());
    lines.join("\n")
}
