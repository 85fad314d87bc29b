/// Sentence-respecting text chunker.
///
/// Review text is split into sentences on `.`, `!` or `?` followed by whitespace, then
/// sentences are packed greedily into chunks of at most `max_words` words. A sentence is
/// never split across chunks, so a single sentence longer than the budget becomes its own
/// oversized chunk.
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

pub const DEFAULT_MAX_WORDS: usize = 500;

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

/// Split `text` into chunks of whole sentences, each holding at most `max_words` words
/// unless a single sentence alone exceeds it. Words inside a chunk are joined by one space.
pub fn chunk_text(text: &str, max_words: usize) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for sentence in split_sentences(text) {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        if !current.is_empty() && current.len() + words.len() > max_words {
            chunks.push(current.join(" "));
            current.clear();
        }
        current.extend(words);
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    if chunks.len() > 1 {
        debug!(chunks = chunks.len(), max_words, "review text chunked");
    }
    chunks
}

fn split_sentences(text: &str) -> Vec<&str> {
    let text = text.trim();
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END.find_iter(text) {
        // Punctuation is a single ASCII byte, so `m.start() + 1` is a char boundary.
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}
