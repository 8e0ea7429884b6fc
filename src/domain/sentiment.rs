//! Sentiment labels derived from a compound polarity score.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Strict thresholds: > 0 positive, < 0 negative, anything else neutral.
    pub fn from_compound(compound: f64) -> Self {
        if compound > 0.0 {
            SentimentLabel::Positive
        } else if compound < 0.0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn score(&self) -> f64 {
        match self {
            SentimentLabel::Positive => 1.0,
            SentimentLabel::Negative => -1.0,
            SentimentLabel::Neutral => 0.0,
        }
    }
}

/// Mean of the numeric label values. An empty set averages to neutral.
pub fn average_sentiment<I>(labels: I) -> f64
where
    I: IntoIterator<Item = SentimentLabel>,
{
    let (sum, count) = labels
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), label| (sum + label.score(), count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn compound_thresholds_are_strict() {
        assert_eq!(SentimentLabel::from_compound(0.0001), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_compound(-0.0001), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_compound(0.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_compound(-0.0), SentimentLabel::Neutral);
    }

    #[test]
    fn average_maps_labels_to_numbers() {
        let labels = [
            SentimentLabel::Positive,
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Neutral,
        ];
        assert_relative_eq!(average_sentiment(labels), 0.25);
    }

    #[test]
    fn average_of_nothing_is_neutral() {
        assert_eq!(average_sentiment(Vec::<SentimentLabel>::new()), 0.0);
    }

    #[test]
    fn labels_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&SentimentLabel::Negative).unwrap(),
            "\"negative\""
        );
    }
}
