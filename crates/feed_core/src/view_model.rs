use crate::Post;

/// Date label shown under every author name.
pub const POST_DATE_LABEL: &str = "March 19, 2025";

/// Comments shown under every post.
pub const POST_COMMENTS: [&str; 2] = ["Amazing!", "Looks great!"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedViewModel {
    pub body: FeedBody,
    /// "Show All" is offered while filtered or in detail view.
    pub show_all_visible: bool,
    /// Tag named in the "Showing results for" banner.
    pub selected_tag: Option<String>,
    pub fetching: bool,
    pub load_more: LoadMoreControl,
    pub sentinel_armed: bool,
    pub last_failure: Option<String>,
    pub post_count: usize,
    pub next_page: u32,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedBody {
    Detail(PostCard),
    Placeholder,
    Posts(Vec<PostCard>),
}

impl Default for FeedBody {
    fn default() -> Self {
        FeedBody::Posts(Vec::new())
    }
}

impl FeedBody {
    pub fn cards(&self) -> &[PostCard] {
        match self {
            FeedBody::Detail(card) => std::slice::from_ref(card),
            FeedBody::Placeholder => &[],
            FeedBody::Posts(cards) => cards,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMoreControl {
    #[default]
    Hidden,
    Button,
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub user_image: String,
    pub username: String,
    pub photo: String,
    pub date: &'static str,
    pub tags: Vec<String>,
    pub comments: Vec<&'static str>,
    pub liked: bool,
    pub like_count: u32,
    /// Echoed back in `Msg::PostClicked`.
    pub post: Post,
}

impl PostCard {
    pub(crate) fn new(post: &Post, liked: bool) -> Self {
        Self {
            user_image: post.user_image().to_string(),
            username: post.author().to_string(),
            photo: post.download_url().to_string(),
            date: POST_DATE_LABEL,
            tags: post.tags().to_vec(),
            comments: POST_COMMENTS.to_vec(),
            liked,
            like_count: u32::from(liked),
            post: post.clone(),
        }
    }
}
