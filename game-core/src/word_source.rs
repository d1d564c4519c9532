use anyhow::{anyhow, Result};
use rand::seq::IndexedRandom;

/// Vocabulary used when no word list is configured.
pub const DEFAULT_WORDS: &[&str] = &[
    "udacity",
    "university",
    "trouble",
    "international",
    "boat",
    "hangman",
    "keyboard",
    "mountain",
    "puzzle",
    "gallows",
    "lantern",
    "whisper",
    "journey",
    "crystal",
    "harbor",
];

/// Supplies secret words for new games
pub trait WordSource: Send + Sync {
    fn pick_word(&self) -> String;
}

/// Uniform random choice over a fixed vocabulary
pub struct RandomWordSource {
    words: Vec<String>,
}

impl RandomWordSource {
    /// Build a source from a newline-separated word list
    pub fn new(word_list: &str) -> Result<Self> {
        let words: Vec<String> = word_list
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|word| word.to_lowercase())
            .filter(|word| word.chars().all(|c| c.is_ascii_alphabetic()))
            .collect();

        if words.is_empty() {
            return Err(anyhow!("No words available in word list"));
        }

        Ok(Self { words })
    }

    pub fn with_default_words() -> Self {
        Self {
            words: DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Load a word list from disk
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read word list {}: {}", path.display(), e))?;
        let source = Self::new(&contents)?;
        tracing::info!("Loaded {} words from {}", source.len(), path.display());
        Ok(source)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }
}

impl WordSource for RandomWordSource {
    fn pick_word(&self) -> String {
        // The constructors reject empty vocabularies, so choose always yields a word.
        self.words
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_default()
    }
}

/// Always returns the same word. Useful for tests and fixtures.
#[derive(Debug, Clone)]
pub struct FixedWordSource {
    word: String,
}

impl FixedWordSource {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into().to_lowercase(),
        }
    }
}

impl WordSource for FixedWordSource {
    fn pick_word(&self) -> String {
        self.word.clone()
    }
}
