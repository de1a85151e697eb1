//! Merging and prioritizing suite recommendations.

use std::cmp::Reverse;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::Recommendations;

/// Keywords that raise a recommendation's priority, matched case-insensitively.
pub const PRIORITY_KEYWORDS: [&str; 5] = ["critical", "severe", "failure", "error", "performance"];

const IMMEDIATE_WINDOW: usize = 5;
const MEDIUM_TERM_WINDOW: usize = 5;

/// Recommendations split into three consecutive priority windows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationPlan {
    pub immediate_actions: Vec<String>,
    pub medium_term_improvements: Vec<String>,
    pub long_term_optimizations: Vec<String>,
}

impl RecommendationPlan {
    /// Split a prioritized list into windows of 5, 5 and the remainder.
    pub fn from_prioritized(mut prioritized: Vec<String>) -> Self {
        let long_term = split_off_at(&mut prioritized, IMMEDIATE_WINDOW + MEDIUM_TERM_WINDOW);
        let medium_term = split_off_at(&mut prioritized, IMMEDIATE_WINDOW);
        Self {
            immediate_actions: prioritized,
            medium_term_improvements: medium_term,
            long_term_optimizations: long_term,
        }
    }

    /// The full prioritized list.
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.immediate_actions
            .iter()
            .chain(&self.medium_term_improvements)
            .chain(&self.long_term_optimizations)
    }

    /// The first `n` recommendations overall.
    pub fn top(&self, n: usize) -> Vec<String> {
        self.all().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.immediate_actions.len()
            + self.medium_term_improvements.len()
            + self.long_term_optimizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn split_off_at(items: &mut Vec<String>, at: usize) -> Vec<String> {
    if items.len() > at {
        items.split_off(at)
    } else {
        Vec::new()
    }
}

/// Number of distinct priority keywords mentioned in a recommendation.
pub fn priority_score(recommendation: &str) -> usize {
    let lowered = recommendation.to_lowercase();
    PRIORITY_KEYWORDS
        .iter()
        .filter(|keyword| lowered.contains(*keyword))
        .count()
}

/// Deduplicate keeping first occurrences, then stable-sort by descending priority.
pub fn prioritize<'a, I>(recommendations: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut unique: Vec<String> = recommendations
        .into_iter()
        .filter(|rec| seen.insert(*rec))
        .map(str::to_string)
        .collect();

    unique.sort_by_key(|rec| Reverse(priority_score(rec)));
    unique
}

/// Merge the recommendations of all suites, in suite run order.
pub fn merge_recommendations(sources: &[&Recommendations]) -> RecommendationPlan {
    let prioritized = prioritize(sources.iter().flat_map(|recs| recs.iter()));
    RecommendationPlan::from_prioritized(prioritized)
}
