use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Intent {
    CostBreakdown,
    Commitment,
    Rightsizing,
    General,
}

// First match wins, so the more specific intents come first. Keywords only
// match whole words (or listed inflections), so "committee" is not "commit".
const KEYWORDS: &[(Intent, &str)] = &[
    (
        Intent::Commitment,
        r"\b(savings plans?|commit(s|ted|ment|ments)?|reserved|reservations?|coverage)\b",
    ),
    (
        Intent::Rightsizing,
        r"\b(right-?siz(e|ed|es|ing)|idle|unused|underutili[sz](e|ed|ation)|wasted?|wasteful)\b",
    ),
    (
        Intent::CostBreakdown,
        r"\b(costs?|costly|spend(s|ing)?|spent|bills?|billed|billing|expensive|invoices?)\b",
    ),
];

fn keyword_patterns() -> &'static [(Intent, Regex)] {
    static PATTERNS: OnceLock<Vec<(Intent, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        KEYWORDS
            .iter()
            .map(|(intent, pattern)| (*intent, Regex::new(pattern).expect("intent pattern compiles")))
            .collect()
    })
}

impl Intent {
    pub fn classify(prompt: &str) -> Intent {
        let lower = prompt.to_lowercase();
        keyword_patterns()
            .iter()
            .find(|(_, re)| re.is_match(&lower))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::General)
    }

    pub fn all() -> [Intent; 4] {
        [
            Intent::CostBreakdown,
            Intent::Commitment,
            Intent::Rightsizing,
            Intent::General,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_keyword() {
        assert_eq!(Intent::classify("Why did my COST go up?"), Intent::CostBreakdown);
        assert_eq!(Intent::classify("Should I buy a Savings Plan?"), Intent::Commitment);
        assert_eq!(Intent::classify("find idle instances"), Intent::Rightsizing);
        assert_eq!(Intent::classify("hello there"), Intent::General);
    }

    #[test]
    fn specific_intents_win_over_cost() {
        assert_eq!(
            Intent::classify("how much would a savings plan cut my cost"),
            Intent::Commitment
        );
        assert_eq!(
            Intent::classify("what does unused storage cost me"),
            Intent::Rightsizing
        );
    }

    #[test]
    fn keywords_match_whole_words_only() {
        assert_eq!(Intent::classify("the committee approved it"), Intent::General);
        assert_eq!(Intent::classify("we serve a billion requests"), Intent::General);
        assert_eq!(Intent::classify("is this idleness normal?"), Intent::General);

        assert_eq!(Intent::classify("what are my commitments?"), Intent::Commitment);
        assert_eq!(Intent::classify("Explain my billing"), Intent::CostBreakdown);
        assert_eq!(Intent::classify("which instances should I right-size?"), Intent::Rightsizing);
        assert_eq!(Intent::classify("rightsizing ideas"), Intent::Rightsizing);
        assert_eq!(Intent::classify("underutilized databases"), Intent::Rightsizing);
    }
}
