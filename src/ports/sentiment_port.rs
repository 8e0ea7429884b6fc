//! Text polarity scoring port.

use crate::domain::sentiment::SentimentLabel;

pub trait SentimentScorer: Send + Sync {
    /// Compound polarity in [-1, 1].
    fn compound(&self, text: &str) -> f64;

    fn label(&self, text: &str) -> SentimentLabel {
        SentimentLabel::from_compound(self.compound(text))
    }
}
