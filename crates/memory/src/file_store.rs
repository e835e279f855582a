//! File-based conversation store — one file per conversation.
//!
//! Each conversation persists as a single codec-encoded file under a base
//! directory. Appends are whole-conversation read-modify-write cycles,
//! serialized per conversation id and made visible atomically via
//! write-to-temp-then-rename, so a concurrent reader sees either the old or
//! the new file, never a torn one.
//!
//! Default storage location: `~/.relai/conversations/`

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use relai_core::error::StoreError;
use relai_core::message::{ConversationId, Message};
use relai_core::store::ConversationStore;

use crate::codec::{ConversationCodec, JsonCodec};
use crate::settings::StoreSettings;

/// How many id characters to keep as the human-readable file name prefix.
const PREFIX_MAX_LEN: usize = 40;

/// A conversation store backed by one file per conversation.
pub struct FileStore {
    base_dir: PathBuf,
    codec: Box<dyn ConversationCodec>,
    /// Per-conversation write locks. Appends are read-modify-write and must
    /// not interleave for the same id; different ids never contend.
    ///
    /// Entries are never removed: a task that already fetched a lock handle
    /// may not have acquired it yet, and replacing the entry would let two
    /// appends for the same id serialize on different locks.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FileStore {
    /// Create a store rooted at `base_dir` with the default JSON codec.
    ///
    /// The directory is created lazily on first append.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::with_codec(base_dir, Box::new(JsonCodec))
    }

    /// Create a store with an explicit codec.
    pub fn with_codec(base_dir: impl Into<PathBuf>, codec: Box<dyn ConversationCodec>) -> Self {
        let base_dir = base_dir.into();
        debug!(dir = %base_dir.display(), "File conversation store created");
        Self {
            base_dir,
            codec,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Create a store from settings.
    pub fn from_settings(settings: &StoreSettings) -> Self {
        Self::new(settings.dir.clone())
    }

    /// The directory this store persists into.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Storage location for a conversation id.
    ///
    /// The id is untrusted external input, so the file name is a sanitized
    /// prefix (readable when listing the directory) plus a sha256 digest
    /// suffix that keeps distinct ids collision-free even when their
    /// sanitized prefixes coincide.
    fn conversation_path(&self, id: &ConversationId) -> PathBuf {
        let prefix: String = id
            .0
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
            .take(PREFIX_MAX_LEN)
            .collect();
        let prefix = if prefix.is_empty() {
            "conversation".to_string()
        } else {
            prefix
        };

        let digest = Sha256::digest(id.0.as_bytes());
        let digest_hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();

        self.base_dir.join(format!("{prefix}-{digest_hex}.json"))
    }

    async fn lock_for(&self, id: &ConversationId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(id.0.clone()).or_default().clone()
    }

    /// Load the full history for a conversation file.
    ///
    /// A missing file is an empty conversation. An undecodable file is
    /// treated the same way, logged but never propagated: losing history is
    /// preferable to failing the turn, and fabricating data is not an
    /// option.
    fn load(&self, path: &Path) -> Result<Vec<Message>, StoreError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Io(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        match self.codec.decode(&bytes) {
            Ok(messages) => Ok(messages),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Corrupt conversation file, treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Replace the conversation file atomically.
    fn persist(&self, path: &Path, messages: &[Message]) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            StoreError::Io(format!("Failed to create conversation directory: {e}"))
        })?;

        let bytes = self.codec.encode(messages)?;

        let tmp = path.with_extension(format!("tmp-{}", Uuid::new_v4()));
        std::fs::write(&tmp, &bytes)
            .map_err(|e| StoreError::Io(format!("Failed to write conversation file: {e}")))?;
        std::fs::rename(&tmp, path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            StoreError::Io(format!("Failed to replace conversation file: {e}"))
        })?;

        Ok(())
    }
}

#[async_trait]
impl ConversationStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn append(
        &self,
        id: &ConversationId,
        messages: Vec<Message>,
    ) -> Result<(), StoreError> {
        if messages.is_empty() {
            return Ok(());
        }

        let lock = self.lock_for(id).await;
        let _guard = lock.lock().await;

        let path = self.conversation_path(id);
        let mut history = self.load(&path)?;
        let appended = messages.len();
        history.extend(messages);
        self.persist(&path, &history)?;

        debug!(
            conversation_id = %id,
            appended,
            total = history.len(),
            "Appended messages to conversation"
        );
        Ok(())
    }

    async fn get(&self, id: &ConversationId, last_n: usize) -> Result<Vec<Message>, StoreError> {
        if last_n == 0 {
            return Ok(Vec::new());
        }

        let history = self.load(&self.conversation_path(id))?;
        let skip = history.len().saturating_sub(last_n);
        Ok(history.into_iter().skip(skip).collect())
    }

    async fn clear(&self, id: &ConversationId) -> Result<(), StoreError> {
        let lock = self.lock_for(id).await;
        let _guard = lock.lock().await;

        let path = self.conversation_path(id);
        match std::fs::remove_file(&path) {
            Ok(()) => debug!(conversation_id = %id, "Cleared conversation"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(StoreError::Io(format!(
                    "Failed to clear conversation {id}: {e}"
                )));
            }
        }
        Ok(())
    }
}
