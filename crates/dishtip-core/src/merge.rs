use std::collections::HashSet;

use tracing::debug;

use crate::dispatch::ChunkOutcome;
use crate::model::{Dish, Review};

/// Fold chunk outputs back into their owning reviews.
///
/// `owners[i]` is the index into `reviews` of the review that produced chunk `i`, and
/// `outputs[i]` is that chunk's extraction outcome. Errors and blank or `none` outputs
/// contribute nothing. Names from every chunk of a review are unioned, keeping first-seen
/// order, and each review's `dishes` is replaced by one unranked dish per name.
pub fn merge(mut reviews: Vec<Review>, owners: &[usize], outputs: &[ChunkOutcome]) -> Vec<Review> {
    let mut names_by_review: Vec<Vec<String>> = vec![Vec::new(); reviews.len()];
    let mut seen_by_review: Vec<HashSet<String>> = vec![HashSet::new(); reviews.len()];

    for (&owner, outcome) in owners.iter().zip(outputs) {
        let Ok(output) = outcome else {
            continue;
        };
        if owner >= reviews.len() {
            debug!(owner, reviews = reviews.len(), "chunk owner out of range, dropping output");
            continue;
        }
        for name in parse_dish_list(output) {
            if seen_by_review[owner].insert(name.clone()) {
                names_by_review[owner].push(name);
            }
        }
    }

    for (review, names) in reviews.iter_mut().zip(names_by_review) {
        review.dishes = names.into_iter().map(Dish::unranked).collect();
    }
    reviews
}

/// Parse a model reply into normalized dish names. `none` and empty items are dropped.
pub fn parse_dish_list(output: &str) -> Vec<String> {
    let output = output.trim();
    if output.is_empty() || output.eq_ignore_ascii_case("none") {
        return Vec::new();
    }
    output
        .split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty() && item != "none")
        .collect()
}
