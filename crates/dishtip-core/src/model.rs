use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReviewSource {
    Google,
    Blog,
    #[serde(other)]
    Other,
}

impl ReviewSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewSource::Google => "google",
            ReviewSource::Blog => "blog",
            ReviewSource::Other => "other",
        }
    }
}

impl std::fmt::Display for ReviewSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    /// Lowercase, trimmed dish name.
    pub name: String,
    /// `None` until the ranking engine scores it.
    pub ranking: Option<i64>,
}

impl Dish {
    pub fn unranked(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ranking: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub id: Option<String>,
    pub source: ReviewSource,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub dishes: Vec<Dish>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub author_url: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl Review {
    pub fn new(source: ReviewSource, text: impl Into<String>) -> Self {
        Self {
            id: None,
            source,
            author: None,
            text: text.into(),
            dishes: Vec::new(),
            rating: None,
            date: None,
            url: None,
            author_url: None,
            language: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Recommendation {
    pub dish_name: String,
    pub ranking: Option<i64>,
    pub author: Option<String>,
    pub source: ReviewSource,
    pub timestamp: Option<DateTime<Utc>>,
    pub review_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_source_deserializes_as_other() {
        let source: ReviewSource = serde_json::from_str("\"tripadvisor\"").unwrap();
        assert_eq!(source, ReviewSource::Other);
        assert_eq!(serde_json::to_string(&ReviewSource::Blog).unwrap(), "\"blog\"");
    }

    #[test]
    fn review_deserializes_with_missing_optional_fields() {
        let review: Review =
            serde_json::from_str(r#"{"source": "google", "text": "Great ramen."}"#).unwrap();
        assert_eq!(review.source, ReviewSource::Google);
        assert!(review.dishes.is_empty());
        assert!(review.author.is_none());
        assert!(review.date.is_none());
    }
}
