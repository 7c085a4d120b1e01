//! Property tests for the score/label invariants of the keyword heuristic

use proptest::prelude::*;
use sentimeter_classifiers::KeywordHeuristic;
use sentimeter_core::Sentiment;

proptest! {
    #[test]
    fn score_is_bounded_and_label_follows_threshold(text in ".{0,300}", seed in any::<u64>()) {
        let heuristic = KeywordHeuristic::with_seed(seed).unwrap();
        let result = heuristic.predict(&text);

        prop_assert!((0.0..=1.0).contains(&result.score));
        prop_assert_eq!(result.sentiment == Sentiment::Positive, result.score > 0.5);
    }

    #[test]
    fn label_depends_only_on_keyword_counts(
        words in prop::collection::vec(prop::sample::select(vec!["love", "great", "hate", "awful", "table", "river"]), 0..20),
        seed_a in any::<u64>(),
        seed_b in any::<u64>(),
    ) {
        let text = words.join(" ");
        let a = KeywordHeuristic::with_seed(seed_a).unwrap();
        let b = KeywordHeuristic::with_seed(seed_b).unwrap();
        let counts = a.count(&text);

        let first = a.predict(&text);
        let second = b.predict(&text);

        if counts.positive > counts.negative {
            prop_assert_eq!(first.sentiment, Sentiment::Positive);
            prop_assert_eq!(second.sentiment, Sentiment::Positive);
            prop_assert!(first.score >= 0.7);
        } else if counts.negative > counts.positive {
            prop_assert_eq!(first.sentiment, Sentiment::Negative);
            prop_assert_eq!(second.sentiment, Sentiment::Negative);
            prop_assert!(first.score <= 0.3);
        } else {
            prop_assert!(first.score >= 0.3 && first.score < 0.7);
        }
    }
}
