pub type PostId = String;

/// Listing record as delivered by the upstream source, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPost {
    pub id: PostId,
    pub author: String,
    pub download_url: String,
}

/// An enriched feed entry. Avatar and tags are fixed at construction.
///
/// `seq` is the post's arrival position in the store and tells apart posts
/// that share an upstream id. It is zero until the post is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    seq: u64,
    id: PostId,
    author: String,
    download_url: String,
    user_image: String,
    tags: [String; 2],
}

impl Post {
    pub fn new(raw: RawPost, user_image: String, tags: [String; 2]) -> Self {
        Self {
            seq: 0,
            id: raw.id,
            author: raw.author,
            download_url: raw.download_url,
            user_image,
            tags,
        }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub(crate) fn with_seq(mut self, seq: u64) -> Self {
        self.seq = seq;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn download_url(&self) -> &str {
        &self.download_url
    }

    pub fn user_image(&self) -> &str {
        &self.user_image
    }

    pub fn tags(&self) -> &[String; 2] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
