/// Normalisation of raw review records into [`Review`].
///
/// Each source has its own field names. Google records come either in the legacy Place
/// Details shape (`author_name`, `text`, `time`, ...) or the Places v1 shape
/// (`authorAttribution.displayName`, `text.text`, `publishTime`, ...). Blog records use
/// schema.org article fields. Unknown keys are ignored and missing keys stay empty.
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::model::{Review, ReviewSource};

/// Normalise a batch of raw records from one source, skipping anything that is not a JSON
/// object.
pub fn normalise_reviews(raw: &[Value], source: ReviewSource) -> Vec<Review> {
    raw.iter()
        .enumerate()
        .filter_map(|(i, record)| {
            let review = normalise_review(record, source);
            if review.is_none() {
                warn!(index = i, %source, "skipping review record that is not a JSON object");
            }
            review
        })
        .collect()
}

pub fn normalise_review(raw: &Value, source: ReviewSource) -> Option<Review> {
    let obj = raw.as_object()?;
    let mut review = Review::new(source, "");

    match source {
        ReviewSource::Google => apply_google(obj, &mut review),
        ReviewSource::Blog => apply_blog(obj, &mut review),
        ReviewSource::Other => {
            warn!("no field mapping for source 'other', keeping text only");
            review.text = text_field(obj.get("text")).unwrap_or_default();
        }
    }

    review.id = string_field(obj.get("id")).or_else(|| Some(derive_id(source, &review.text)));
    Some(review)
}

fn apply_google(obj: &Map<String, Value>, review: &mut Review) {
    let attribution = obj.get("authorAttribution").and_then(Value::as_object);

    review.author = string_field(obj.get("author_name"))
        .or_else(|| attribution.and_then(|a| string_field(a.get("displayName"))));
    review.author_url = string_field(obj.get("author_url"))
        .or_else(|| attribution.and_then(|a| string_field(a.get("uri"))));
    review.text = text_field(obj.get("text")).unwrap_or_default();
    review.rating = obj.get("rating").and_then(Value::as_f64);
    review.date = obj
        .get("time")
        .or_else(|| obj.get("publishTime"))
        .and_then(parse_date);
    review.url = string_field(obj.get("url")).or_else(|| string_field(obj.get("googleMapsUri")));
    review.language = string_field(obj.get("language")).or_else(|| {
        obj.get("originalText")
            .and_then(|t| t.get("languageCode"))
            .and_then(|l| string_field(Some(l)))
    });
}

fn apply_blog(obj: &Map<String, Value>, review: &mut Review) {
    review.author = string_field(obj.get("provider"));
    review.text = text_field(obj.get("description")).unwrap_or_default();
    review.date = obj.get("datePublished").and_then(parse_date);
    review.url = string_field(obj.get("url"));
}

fn string_field(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Plain string, or an object wrapping it as `{"text": ...}`.
fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Object(inner) => string_field(inner.get("text")),
        _ => None,
    }
}

/// Unix seconds, RFC 3339, or a bare `YYYY-MM-DD` date taken as midnight UTC.
fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        Value::String(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                        .map(|dt| dt.and_utc())
                })
        }
        _ => None,
    }
}

fn derive_id(source: ReviewSource, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_str().as_bytes());
    hasher.update(b"|");
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    digest[..16].iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn legacy_google_record() {
        let raw = json!({
            "author_name": "Jane Smith",
            "author_url": "https://maps.google.com/contrib/1",
            "text": "The carbonara was great.",
            "rating": 5,
            "time": 1_700_000_000,
            "language": "en",
            "profile_photo_url": "ignored"
        });
        let review = normalise_review(&raw, ReviewSource::Google).unwrap();
        assert_eq!(review.source, ReviewSource::Google);
        assert_eq!(review.author.as_deref(), Some("Jane Smith"));
        assert_eq!(review.author_url.as_deref(), Some("https://maps.google.com/contrib/1"));
        assert_eq!(review.text, "The carbonara was great.");
        assert_eq!(review.rating, Some(5.0));
        assert_eq!(review.date.map(|d| d.timestamp()), Some(1_700_000_000));
        assert_eq!(review.language.as_deref(), Some("en"));
        assert!(review.dishes.is_empty());
    }

    #[test]
    fn places_v1_google_record() {
        let raw = json!({
            "authorAttribution": {"displayName": "Ann Lee", "uri": "https://maps.google.com/u/2"},
            "text": {"text": "Try the laksa.", "languageCode": "en"},
            "originalText": {"text": "Try the laksa.", "languageCode": "en"},
            "publishTime": "2024-05-01T12:30:00Z",
            "googleMapsUri": "https://maps.google.com/r/2",
            "rating": 4
        });
        let review = normalise_review(&raw, ReviewSource::Google).unwrap();
        assert_eq!(review.author.as_deref(), Some("Ann Lee"));
        assert_eq!(review.author_url.as_deref(), Some("https://maps.google.com/u/2"));
        assert_eq!(review.text, "Try the laksa.");
        assert_eq!(review.url.as_deref(), Some("https://maps.google.com/r/2"));
        assert_eq!(review.language.as_deref(), Some("en"));
        assert_eq!(
            review.date,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).single()
        );
    }

    #[test]
    fn blog_record() {
        let raw = json!({
            "provider": "Eater",
            "description": "Loved the carbonara and the tiramisu.",
            "datePublished": "2023-11-20",
            "url": "https://eater.example/post"
        });
        let review = normalise_review(&raw, ReviewSource::Blog).unwrap();
        assert_eq!(review.author.as_deref(), Some("Eater"));
        assert_eq!(review.text, "Loved the carbonara and the tiramisu.");
        assert_eq!(review.url.as_deref(), Some("https://eater.example/post"));
        assert_eq!(review.date, Utc.with_ymd_and_hms(2023, 11, 20, 0, 0, 0).single());
        assert!(review.rating.is_none());
    }

    #[test]
    fn unparseable_date_is_dropped() {
        let raw = json!({"description": "ok", "datePublished": "last tuesday"});
        let review = normalise_review(&raw, ReviewSource::Blog).unwrap();
        assert!(review.date.is_none());
    }

    #[test]
    fn id_is_kept_or_derived_deterministically() {
        let with_id = json!({"id": "abc", "text": "pho"});
        assert_eq!(
            normalise_review(&with_id, ReviewSource::Google).unwrap().id.as_deref(),
            Some("abc")
        );

        let a = normalise_review(&json!({"text": "pho"}), ReviewSource::Google).unwrap();
        let b = normalise_review(&json!({"text": "pho"}), ReviewSource::Google).unwrap();
        let c = normalise_review(&json!({"description": "pho"}), ReviewSource::Blog).unwrap();
        let id = a.id.clone().unwrap();
        assert_eq!(id.len(), 32);
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn non_objects_are_skipped() {
        let raw = vec![json!("just a string"), json!({"text": "ramen"}), json!(null)];
        let reviews = normalise_reviews(&raw, ReviewSource::Google);
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].text, "ramen");
    }
}
