//! Acknowledgement phrase selection.

use rand::Rng;

/// Chooses which acknowledgement to prefix to the next question.
///
/// Purely cosmetic; tests pin it with [`FixedPhraseSelector`].
pub trait PhraseSelector: Send + Sync {
    /// Returns an index in `0..count`. `count` is never zero.
    fn select(&self, count: usize) -> usize;
}

/// Uniformly random selection.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPhraseSelector;

impl PhraseSelector for RandomPhraseSelector {
    fn select(&self, count: usize) -> usize {
        rand::thread_rng().gen_range(0..count)
    }
}

/// Always the same index (wrapped into range).
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedPhraseSelector(pub usize);

impl PhraseSelector for FixedPhraseSelector {
    fn select(&self, count: usize) -> usize {
        self.0 % count
    }
}
