use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::core::{Language, QuoteBook};
use crate::session::Mode;

const MAX_NUMBER: u32 = 10_000;

/// Produces the tokens a session asks the user to type
pub trait WordSource {
    fn generate(&mut self, mode: Mode, count: usize) -> Vec<String>;
}

/// Word source drawing from an in-memory pool of words and quotes
#[derive(Debug, Clone)]
pub struct PoolSource {
    words: Vec<String>,
    quotes: Vec<String>,
    rng: StdRng,
    /// index of the last plain word handed out, carried across batches
    previous: Option<usize>,
}

impl PoolSource {
    /// Bundled english words and quotes
    pub fn english() -> Self {
        Self {
            words: Language::english().words,
            quotes: QuoteBook::bundled().quotes,
            rng: StdRng::from_entropy(),
            previous: None,
        }
    }

    /// Caller-supplied words; blank entries are dropped and multi-word
    /// entries split. Falls back to the bundled list if nothing is left.
    pub fn with_pool(pool: Vec<String>) -> Self {
        let words: Vec<String> = pool
            .iter()
            .flat_map(|entry| entry.split_whitespace())
            .map(str::to_string)
            .collect();

        let mut source = Self::english();
        if words.is_empty() {
            tracing::warn!("word pool override is empty, using bundled words");
        } else {
            source.words = words;
        }
        source
    }

    pub fn from_pool(pool: Option<Vec<String>>) -> Self {
        match pool {
            Some(pool) => Self::with_pool(pool),
            None => Self::english(),
        }
    }

    /// Replace the random generator with a deterministic one.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn pool_size(&self) -> usize {
        self.words.len()
    }

    fn plain_words(&mut self, count: usize) -> Vec<String> {
        let len = self.words.len();
        if len == 0 {
            return Vec::new();
        }

        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            // avoid the same word twice in a row
            let idx = match self.previous {
                Some(prev) if len > 1 => {
                    let idx = self.rng.gen_range(0..len - 1);
                    if idx >= prev {
                        idx + 1
                    } else {
                        idx
                    }
                }
                _ => self.rng.gen_range(0..len),
            };
            out.push(self.words[idx].clone());
            self.previous = Some(idx);
        }
        out
    }

    fn numbers(&mut self, count: usize) -> Vec<String> {
        (0..count)
            .map(|_| self.rng.gen_range(0..MAX_NUMBER).to_string())
            .collect()
    }

    fn quote_fragments(&mut self, count: usize) -> Vec<String> {
        let mut out = Vec::with_capacity(count);
        while out.len() < count {
            let Some(quote) = self.quotes.choose(&mut self.rng) else {
                break;
            };
            out.extend(quote.split_whitespace().map(str::to_string));
        }
        if out.len() < count {
            // no quotes at all
            return self.plain_words(count);
        }
        out.truncate(count);
        out
    }
}

impl Default for PoolSource {
    fn default() -> Self {
        Self::english()
    }
}

impl WordSource for PoolSource {
    fn generate(&mut self, mode: Mode, count: usize) -> Vec<String> {
        match mode {
            Mode::Words => self.plain_words(count),
            Mode::Numbers => self.numbers(count),
            Mode::Quote => self.quote_fragments(count),
        }
    }
}
