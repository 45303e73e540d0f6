//! Description similarity and greedy clustering of issues

use crate::core::Issue;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Tokens this short carry no signal
const MIN_TOKEN_LEN: usize = 4;

static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

fn tokens(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    PUNCTUATION
        .replace_all(&lowered, " ")
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// Jaccard similarity of the long-word sets of two descriptions, 0..=1
pub fn description_similarity(a: &str, b: &str) -> f64 {
    jaccard(&tokens(a), &tokens(b))
}

/// Greedy single pass in input order
///
/// Each unclaimed issue seeds a cluster and claims every later unclaimed
/// issue whose description is at least `threshold` similar to the seed.
/// Every issue ends up in exactly one cluster.
pub fn cluster_by_description(issues: &[Issue], threshold: f64) -> Vec<Vec<&Issue>> {
    let token_sets: Vec<HashSet<String>> = issues.iter().map(|i| tokens(&i.description)).collect();
    let mut claimed = vec![false; issues.len()];
    let mut clusters = Vec::new();

    for seed in 0..issues.len() {
        if claimed[seed] {
            continue;
        }
        claimed[seed] = true;
        let mut cluster = vec![&issues[seed]];
        for other in seed + 1..issues.len() {
            if claimed[other] {
                continue;
            }
            if jaccard(&token_sets[seed], &token_sets[other]) >= threshold {
                claimed[other] = true;
                cluster.push(&issues[other]);
            }
        }
        clusters.push(cluster);
    }
    clusters
}

fn jaccard(left: &HashSet<String>, right: &HashSet<String>) -> f64 {
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    left.intersection(right).count() as f64 / left.union(right).count() as f64
}
