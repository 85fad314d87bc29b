use std::cmp::Ordering;

use crate::model::{Recommendation, Review};

/// Flatten every dish of every review into recommendations, best first.
///
/// Ranked dishes come before unranked ones and higher scores come first. The sort is
/// stable, so equal scores keep review order, then dish order within a review.
pub fn assemble(reviews: &[Review]) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = reviews
        .iter()
        .flat_map(|review| {
            review.dishes.iter().map(move |dish| Recommendation {
                dish_name: dish.name.clone(),
                ranking: dish.ranking,
                author: review.author.clone(),
                source: review.source,
                timestamp: review.date,
                review_link: review.url.clone(),
            })
        })
        .collect();

    recommendations.sort_by(|a, b| by_ranking_desc(a.ranking, b.ranking));
    recommendations
}

fn by_ranking_desc(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
