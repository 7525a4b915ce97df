//! Durable conversation log backed by a JSON-lines file.
//!
//! One persisted `Message` per line, appended in `sent_at` order. The file
//! is replayed into memory on open; reads are served from memory.
//!
//! A line only counts once its trailing `\n` is on disk. A torn final line
//! (crash mid-append) is cut off on open, and a failed append is rolled
//! back to the previous length.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
    sync::Mutex,
};

use crate::domain::{
    ConversationRepository, Message, MessageIdFactory, NewMessage, RepositoryError, UserId,
};

use super::{conversation_between, next_sent_at};

struct JsonlState {
    file: File,
    /// Length of the file up to the last complete line
    len: u64,
    messages: Vec<Message>,
}

pub struct JsonlConversationRepository {
    path: PathBuf,
    state: Mutex<JsonlState>,
}

impl JsonlConversationRepository {
    /// Open (or create) the log at `path` and replay its contents.
    ///
    /// # Errors
    ///
    /// `RepositoryError::Corrupt` if a complete line does not decode to a
    /// message.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();
        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        let complete = complete_lines(&contents);
        let text = std::str::from_utf8(complete)
            .map_err(|e| RepositoryError::Corrupt(format!("invalid UTF-8: {e}")))?;
        let messages = parse_log(text)?;
        let len = complete.len() as u64;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        if len < contents.len() as u64 {
            tracing::warn!(
                "Dropping {} bytes of torn trailing line in {}",
                contents.len() as u64 - len,
                path.display()
            );
            file.set_len(len).await?;
        }

        tracing::info!(
            "Opened conversation log {} ({} messages)",
            path.display(),
            messages.len()
        );

        Ok(Self {
            path,
            state: Mutex::new(JsonlState {
                file,
                len,
                messages,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Prefix of `contents` up to and including the last `\n`.
fn complete_lines(contents: &[u8]) -> &[u8] {
    match contents.iter().rposition(|b| *b == b'\n') {
        Some(end) => &contents[..=end],
        None => &[],
    }
}

fn parse_log(contents: &str) -> Result<Vec<Message>, RepositoryError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str::<Message>(line)
                .map_err(|e| RepositoryError::Corrupt(format!("line {}: {e}", index + 1)))
        })
        .collect()
}

async fn write_line(file: &mut File, line: &[u8]) -> std::io::Result<()> {
    file.write_all(line).await?;
    file.flush().await
}

#[async_trait]
impl ConversationRepository for JsonlConversationRepository {
    async fn append(&self, draft: NewMessage) -> Result<Message, RepositoryError> {
        let mut state = self.state.lock().await;
        let sent_at = next_sent_at(state.messages.last().map(|m| m.sent_at));
        let message = Message::from_draft(MessageIdFactory::generate(), draft, sent_at);

        let mut line =
            serde_json::to_string(&message).map_err(|e| RepositoryError::Corrupt(e.to_string()))?;
        line.push('\n');
        if let Err(e) = write_line(&mut state.file, line.as_bytes()).await {
            if let Err(rollback) = state.file.set_len(state.len).await {
                tracing::error!("Failed to roll back torn append: {}", rollback);
            }
            return Err(e.into());
        }
        state.len += line.len() as u64;

        // only visible to readers once it is on disk
        state.messages.push(message.clone());
        Ok(message)
    }

    async fn list_between(&self, a: &UserId, b: &UserId) -> Result<Vec<Message>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(conversation_between(&state.messages, a, b))
    }

    async fn count(&self) -> usize {
        self.state.lock().await.messages.len()
    }
}
