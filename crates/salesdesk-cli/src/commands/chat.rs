//! Interactive question loop

use std::io::{BufRead, Write};

use anyhow::Result;
use salesdesk_core::Assistant;

use super::render_reply;

/// Read questions line by line until EOF or "exit"/"quit"
///
/// A failed question prints its message and the loop carries on.
pub async fn cmd_chat<R: BufRead, W: Write>(
    assistant: &Assistant,
    input: R,
    mut output: W,
) -> Result<()> {
    writeln!(output, "💬 SalesDesk - ask about sales, stores or categories.")?;
    writeln!(output, "   Type \"exit\" to quit.\n")?;

    let mut lines = input.lines();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;
        let question = line.trim();

        if question.is_empty() {
            continue;
        }
        if matches!(question.to_lowercase().as_str(), "exit" | "quit") {
            break;
        }

        let reply = assistant.ask(question).await;
        writeln!(output, "\n{}", render_reply(&reply))?;
    }

    writeln!(output, "👋 Bye")?;
    Ok(())
}
