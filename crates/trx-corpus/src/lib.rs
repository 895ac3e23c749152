//! Word corpus for generated attribute values.
//!
//! A corpus is a plain-text word list, one word per line, loaded once at
//! startup and shared read-only across every worker session. When no
//! corpus is available, callers fall back to [`FALLBACK_WORD`].

use rand::seq::IndexedRandom;
use rand::Rng;
use std::io;
use std::path::Path;
use tracing::{info, warn};

/// Typical Linux dictionary location.
pub const DEFAULT_DICT_PATH: &str = "/usr/share/dict/words";

/// Value used for `attr1` when no corpus is loaded.
pub const FALLBACK_WORD: &str = "foo";

/// A fixed, ordered list of words.
#[derive(Debug, Clone)]
pub struct WordCorpus {
    words: Vec<String>,
}

impl WordCorpus {
    /// Load a corpus from a word-list file, one word per line. Blank
    /// lines are skipped.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let words: Vec<String> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.to_string())
            .collect();
        info!("loaded {} words from {}", words.len(), path.display());
        Ok(Self { words })
    }

    /// Load from [`DEFAULT_DICT_PATH`]. An absent or empty dictionary is
    /// not an error; callers use [`FALLBACK_WORD`] instead.
    pub fn load_default() -> Option<Self> {
        match Self::load(DEFAULT_DICT_PATH) {
            Ok(corpus) if !corpus.is_empty() => Some(corpus),
            Ok(_) => {
                warn!(
                    "dictionary {} is empty, falling back to {:?}",
                    DEFAULT_DICT_PATH, FALLBACK_WORD
                );
                None
            }
            Err(e) => {
                warn!(
                    "no dictionary at {}, falling back to {:?}: {}",
                    DEFAULT_DICT_PATH, FALLBACK_WORD, e
                );
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Pick one word uniformly at random. An empty corpus yields
    /// [`FALLBACK_WORD`].
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.words
            .choose(rng)
            .map(String::as_str)
            .unwrap_or(FALLBACK_WORD)
    }
}
