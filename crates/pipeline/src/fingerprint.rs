//! Post fingerprints and the processed set.
//!
//! A fingerprint is the first 10 hex digits of the MD5 digest of the post
//! text, so equal text always yields an equal fingerprint. When the text
//! could not be read there is nothing stable to hash; those posts get a
//! fallback fingerprint that never repeats, which makes them novel on every
//! pass instead of colliding with each other.

use std::collections::HashSet;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

const DIGEST_PREFIX_LEN: usize = 10;
const FALLBACK_PREFIX: char = 't';

/// Short, stable identity of a post's content
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint derived from post text
    pub fn of_text(text: &str) -> Self {
        let digest = format!("{:x}", md5::compute(text.as_bytes()));
        Self(digest[..DIGEST_PREFIX_LEN].to_string())
    }

    /// Whether this fingerprint was issued because the text was unreadable
    ///
    /// Digest fingerprints are lowercase hex and never start with `t`.
    pub fn is_fallback(&self) -> bool {
        self.0.starts_with(FALLBACK_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues fingerprints and remembers which ones were already evaluated
///
/// ## Invariants
/// - The processed set only grows during a session; [`reset`](Self::reset)
///   is the only way to shrink it.
/// - Fallback fingerprints combine a nanosecond timestamp with a per-index
///   sequence number, so two of them are never equal.
#[derive(Debug, Default)]
pub struct FingerprintIndex {
    processed: HashSet<Fingerprint>,
    fallback_seq: u64,
}

impl FingerprintIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint for a post whose text read produced `text`
    ///
    /// `None` (unreadable text) yields a fresh fallback fingerprint.
    pub fn fingerprint(&mut self, text: Option<&str>) -> Fingerprint {
        match text {
            Some(text) => Fingerprint::of_text(text),
            None => self.fallback(),
        }
    }

    fn fallback(&mut self) -> Fingerprint {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        self.fallback_seq += 1;
        Fingerprint(format!("{}{}-{}", FALLBACK_PREFIX, nanos, self.fallback_seq))
    }

    /// Pure membership test
    pub fn seen(&self, fingerprint: &Fingerprint) -> bool {
        self.processed.contains(fingerprint)
    }

    /// Record `fingerprint` as evaluated; marking twice has no extra effect
    pub fn mark_seen(&mut self, fingerprint: Fingerprint) {
        self.processed.insert(fingerprint);
    }

    /// Number of distinct fingerprints evaluated this session
    pub fn len(&self) -> usize {
        self.processed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }

    /// Forget every evaluated fingerprint (start of a new session)
    pub fn reset(&mut self) {
        self.processed.clear();
    }
}
