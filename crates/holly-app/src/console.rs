//! Console connector: chat with the bot over stdin/stdout.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use uuid::Uuid;

use holly_dialog::{DialogError, HollyBot};

/// Read lines from stdin until EOF, printing each reply.
///
/// One conversation spans the whole session.
pub async fn run_console(bot: &HollyBot) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut conversation: Option<Uuid> = None;

    stdout.write_all(b"Say \"holly\" to start.\n> ").await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        match bot.handle_message(&line, conversation) {
            Ok(reply) => {
                conversation = Some(reply.conversation_id);
                for message in &reply.replies {
                    stdout.write_all(message.text.as_bytes()).await?;
                    stdout.write_all(b"\n").await?;
                }
            }
            Err(DialogError::EmptyMessage) => {}
            Err(e) => tracing::warn!(error = %e, "Message rejected"),
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    stdout.write_all(b"\n").await?;
    stdout.flush().await
}
