use anyhow::Result;
use enrollment_flow::ChatAssistant;
use std::io::{BufRead, Write};

use crate::prompt::Prompt;

/// Conversation loop; ends on `/quit` or end of input
pub async fn run<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    assistant: &mut ChatAssistant,
) -> Result<()> {
    for message in assistant.transcript() {
        prompt.say(format!("aabb> {}", message.content))?;
    }
    prompt.say("(type /quit to leave)")?;
    while let Some(line) = prompt.read_line("you> ")? {
        if matches!(line.as_str(), "/quit" | "/exit") {
            break;
        }
        if let Some(reply) = assistant.send(&line).await {
            prompt.say(format!("aabb> {}", reply.content))?;
        }
    }
    Ok(())
}
