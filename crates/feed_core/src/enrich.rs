//! One-shot enrichment of upstream records into feed posts.
//!
//! Every raw record passes through [`Enricher::enrich`] exactly once, before it
//! reaches the store. The random avatar and tag draws are stored on the
//! resulting [`Post`] so that later renders and tag filters see the same values.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Post, RawPost};

pub const TAG_KEYWORDS: [&str; 6] = ["nature", "art", "people", "travel", "landscape", "abstract"];

/// Avatar ids accepted by the avatar service.
pub const AVATAR_ID_RANGE: Range<u32> = 0..70;

const AVATAR_URL_PREFIX: &str = "https://i.pravatar.cc/50?img=";

/// Returns `[first token of author, random keyword]`.
///
/// The author is split on whitespace and the first segment kept as-is, so an
/// empty author (or one starting with whitespace) gives an empty first tag.
/// Consumes exactly one draw from `rng`.
pub fn generate_tags<R: Rng + ?Sized>(author: &str, rng: &mut R) -> [String; 2] {
    let first = author.split(char::is_whitespace).next().unwrap_or_default();
    let keyword = TAG_KEYWORDS[rng.gen_range(0..TAG_KEYWORDS.len())];
    [first.to_string(), keyword.to_string()]
}

pub fn avatar_url(id: u32) -> String {
    format!("{AVATAR_URL_PREFIX}{id}")
}

/// Owns the session's shared random source.
#[derive(Debug, Clone)]
pub struct Enricher<R = StdRng> {
    rng: R,
}

impl Enricher<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Deterministic enricher, used by tests and by the `seed` config option.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Enricher<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn enrich(&mut self, raw: RawPost) -> Post {
        let user_image = avatar_url(self.rng.gen_range(AVATAR_ID_RANGE));
        let tags = generate_tags(&raw.author, &mut self.rng);
        Post::new(raw, user_image, tags)
    }

    pub fn enrich_batch(&mut self, raws: Vec<RawPost>) -> Vec<Post> {
        raws.into_iter().map(|raw| self.enrich(raw)).collect()
    }
}
