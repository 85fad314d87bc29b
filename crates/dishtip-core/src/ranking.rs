/// Heuristic dish scoring.
///
/// A dish's score is the sum of three parts:
/// - source: blog reviews get 1000, everything else 0
/// - author: Google reviewers with a multi-word name longer than five characters get 10
/// - name: `min(words^3, 50)`, so longer, more specific dish names rank higher
///
/// Scoring is all-or-nothing per call. If any dish in the set already has a ranking the
/// call does nothing, so a second invocation can never double-score.
use tracing::{info, warn};

use crate::model::{Dish, Review, ReviewSource};

const BLOG_SOURCE_POINTS: i64 = 1000;
const GOOGLE_SOURCE_POINTS: i64 = 0;
const NAMED_AUTHOR_POINTS: i64 = 10;
const MAX_NAME_POINTS: i64 = 50;

pub fn rank(reviews: &mut [Review]) {
    let already_ranked = reviews
        .iter()
        .flat_map(|r| r.dishes.iter())
        .any(|d| d.ranking.is_some());
    if already_ranked {
        warn!("review set already contains ranked dishes, skipping scoring");
        return;
    }

    for (i, review) in reviews.iter_mut().enumerate() {
        let source_p = source_points(review.source);
        let author_p = author_points(review);
        for dish in review.dishes.iter_mut() {
            let name_p = name_points(dish);
            let score = source_p + author_p + name_p;
            dish.ranking = Some(score);
            info!(
                review = i + 1,
                dish = %dish.name,
                score,
                source_points = source_p,
                author_points = author_p,
                name_points = name_p,
                "dish scored"
            );
        }
    }
}

fn source_points(source: ReviewSource) -> i64 {
    match source {
        ReviewSource::Google => GOOGLE_SOURCE_POINTS,
        ReviewSource::Blog => BLOG_SOURCE_POINTS,
        ReviewSource::Other => 0,
    }
}

fn author_points(review: &Review) -> i64 {
    if review.source != ReviewSource::Google {
        return 0;
    }
    let author = review.author.as_deref().unwrap_or("");
    if word_count(author) > 1 && author.chars().count() > 5 {
        NAMED_AUTHOR_POINTS
    } else {
        0
    }
}

fn name_points(dish: &Dish) -> i64 {
    let words = word_count(&dish.name) as i64;
    words.saturating_pow(3).min(MAX_NAME_POINTS)
}

fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}
