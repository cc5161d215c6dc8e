use crate::Post;

/// Append-only, arrival-ordered collection of posts.
///
/// Duplicate ids are kept: the upstream listing does not promise that pages
/// are disjoint, and the store reflects exactly what was delivered. Each
/// appended post is stamped with its arrival position (see [`Post::seq`]).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedStore {
    posts: Vec<Post>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, posts: impl IntoIterator<Item = Post>) {
        for post in posts {
            let seq = self.posts.len() as u64;
            self.posts.push(post.with_seq(seq));
        }
    }

    pub fn all_posts(&self) -> &[Post] {
        &self.posts
    }

    /// Posts carrying `tag`, in store order.
    pub fn filtered_by<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Post> + 'a {
        self.posts.iter().filter(move |post| post.has_tag(tag))
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
