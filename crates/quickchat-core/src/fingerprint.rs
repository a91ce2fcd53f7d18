//! Message fingerprints
//!
//! A fingerprint is a short human-readable string built from a message's
//! sequence number and its first and last words. It is a display aid, not a
//! digest; distinct messages may share one.

/// Width the sequence id is zero-padded to before the prefix is taken
const SEQUENCE_WIDTH: usize = 10;

/// Literal separator between the prefix and the running count
const SEPARATOR_TOKEN: &str = "token";

/// Compute the display fingerprint for a message.
///
/// Layout is `{prefix}-token-{count}-{first}-{last}` where `prefix` is the last
/// two digits of the zero-padded sequence id, `count` is the message ordinal
/// and both words are lowercased. A single-word body uses that word twice.
pub fn compute_fingerprint(sequence_id: u64, body: &str) -> String {
    let (first, last) = boundary_words(body);

    format!(
        "{}-{}-{}-{}-{}",
        sequence_prefix(sequence_id),
        SEPARATOR_TOKEN,
        sequence_id,
        first.to_lowercase(),
        last.to_lowercase()
    )
}

/// First and last whitespace-separated words; both empty for a blank body
pub fn boundary_words(body: &str) -> (&str, &str) {
    let mut words = body.split_whitespace();
    let first = words.next().unwrap_or("");
    let last = words.last().unwrap_or(first);
    (first, last)
}

fn sequence_prefix(sequence_id: u64) -> String {
    let padded = format!("{:0width$}", sequence_id, width = SEQUENCE_WIDTH);
    padded[padded.len() - 2..].to_string()
}
