//! Persistent store for GitHub personal access tokens.
//!
//! Tokens are kept in insertion order and persisted as a bare JSON array
//! of strings. Every mutation writes the full list back to disk before
//! returning, so the file is never ahead of or behind the UI.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

/// Minimum accepted token length, in characters.
/// GitHub tokens are far longer; this only rejects obvious typos.
pub const MIN_TOKEN_LENGTH: usize = 8;

/// Number of leading/trailing characters left visible by `masked_display`.
const MASK_VISIBLE_CHARS: usize = 4;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("token must be at least {MIN_TOKEN_LENGTH} characters (got {len})")]
    TooShort { len: usize },

    #[error("token is already in the store")]
    Duplicate,

    #[error("no token at index {index} (store has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("token file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("failed to write token file: {0}")]
    Write(#[from] std::io::Error),
}

#[derive(Debug)]
pub struct TokenStore {
    path: PathBuf,
    tokens: Vec<String>,
}

impl TokenStore {
    /// Create an empty store that will persist to `path`.
    pub fn empty(path: PathBuf) -> Self {
        Self {
            path,
            tokens: Vec::new(),
        }
    }

    /// Load the store from disk.
    ///
    /// A missing file is a normal first run and yields an empty store. A
    /// file that exists but cannot be parsed yields `StoreError::Corrupt`;
    /// callers recover by falling back to `empty()` and warning the user.
    pub fn load(path: PathBuf) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(?path, "No token file, starting with empty store");
            return Ok(Self::empty(path));
        }

        let contents = std::fs::read_to_string(&path)?;
        let tokens: Vec<String> = serde_json::from_str(&contents)?;
        debug!(count = tokens.len(), "Loaded token store");
        Ok(Self { path, tokens })
    }

    /// Append a token and persist.
    ///
    /// Validation failures (`TooShort`, `Duplicate`) leave the store
    /// untouched. A persist failure after the append returns
    /// `StoreError::Write` with the token still in memory; the caller is
    /// expected to surface the warning.
    pub fn add(&mut self, token: &str) -> Result<(), StoreError> {
        let len = token.chars().count();
        if len < MIN_TOKEN_LENGTH {
            return Err(StoreError::TooShort { len });
        }
        if self.tokens.iter().any(|t| t == token) {
            return Err(StoreError::Duplicate);
        }

        self.tokens.push(token.to_string());
        self.save()
    }

    /// Remove the token at `index` and persist. Returns the removed token.
    pub fn remove(&mut self, index: usize) -> Result<String, StoreError> {
        if index >= self.tokens.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.tokens.len(),
            });
        }

        let removed = self.tokens.remove(index);
        self.save()?;
        Ok(removed)
    }

    /// Write the full token list to disk.
    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string(&self.tokens)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Most recently added token, if any. Startup auto-login uses this.
    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }
}

/// Mask a token for display: first 4 + `*` padding + last 4.
///
/// Tokens of exactly 8 characters get an empty mask portion. Anything
/// shorter is fully masked rather than partially revealed; the store never
/// holds such values but display code should not be able to leak them.
pub fn masked_display(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() < MIN_TOKEN_LENGTH {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..MASK_VISIBLE_CHARS].iter().collect();
    let tail: String = chars[chars.len() - MASK_VISIBLE_CHARS..].iter().collect();
    format!(
        "{}{}{}",
        head,
        "*".repeat(chars.len() - 2 * MASK_VISIBLE_CHARS),
        tail
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("tokens.json")
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::load(store_path(&dir)).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_persists_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = TokenStore::load(store_path(&dir)).unwrap();
        store.add("ghp_abcdef123456").unwrap();

        // A fresh load sees the token exactly once
        let reloaded = TokenStore::load(store_path(&dir)).unwrap();
        let matches = reloaded
            .tokens()
            .iter()
            .filter(|t| *t == "ghp_abcdef123456")
            .count();
        assert_eq!(matches, 1);
    }

    #[test]
    fn test_add_too_short_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = TokenStore::empty(store_path(&dir));
        let err = store.add("short").unwrap_err();
        assert!(matches!(err, StoreError::TooShort { len: 5 }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = TokenStore::empty(store_path(&dir));
        store.add("tok_old_1234").unwrap();
        let err = store.add("tok_old_1234").unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_out_of_range() {
        let dir = TempDir::new().unwrap();
        let mut store = TokenStore::empty(store_path(&dir));
        let err = store.remove(0).unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { index: 0, len: 0 }));
    }

    #[test]
    fn test_remove_persists() {
        let dir = TempDir::new().unwrap();
        let mut store = TokenStore::empty(store_path(&dir));
        store.add("tok_old_1234").unwrap();
        store.add("tok_new_5678").unwrap();

        let removed = store.remove(0).unwrap();
        assert_eq!(removed, "tok_old_1234");

        let reloaded = TokenStore::load(store_path(&dir)).unwrap();
        assert_eq!(reloaded.tokens(), &["tok_new_5678".to_string()]);
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        std::fs::write(&path, "not json at all").unwrap();
        let err = TokenStore::load(path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let dir = TempDir::new().unwrap();
        let mut store = TokenStore::empty(store_path(&dir));
        store.add("tok_old_1234").unwrap();
        store.add("tok_new_5678").unwrap();
        assert_eq!(store.last(), Some("tok_new_5678"));
    }

    #[test]
    fn test_masked_display_exact_eight() {
        // Mask portion is empty for 8-char tokens
        assert_eq!(masked_display("abcd1234"), "abcd1234");
    }

    #[test]
    fn test_masked_display_long_token() {
        assert_eq!(masked_display("abcdWXYZ9876wxyz"), "abcd********wxyz");
    }

    #[test]
    fn test_masked_display_reveals_at_most_eight_chars() {
        for len in 8..64 {
            let token: String = std::iter::repeat('x').take(len).collect();
            let masked = masked_display(&token);
            let revealed = masked.chars().filter(|c| *c != '*').count();
            assert!(revealed <= 8);
            assert_eq!(masked.chars().count(), len);
        }
    }

    #[test]
    fn test_masked_display_short_string_fully_masked() {
        assert_eq!(masked_display("abc"), "***");
    }
}
