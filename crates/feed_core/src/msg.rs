use crate::{FetchFailure, Post};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The feed was mounted; loads the first page.
    Mounted,
    /// Proximity sensor reported the trailing sentinel as visible.
    SentinelVisible,
    /// User clicked "load more".
    LoadMoreClicked,
    /// A page arrived and was enriched.
    PageLoaded { page: u32, posts: Vec<Post> },
    /// A page request failed.
    PageFailed(FetchFailure),
    /// User clicked a tag on any post.
    TagClicked(String),
    /// User clicked a post.
    PostClicked(Post),
    /// User clicked "Show All".
    ShowAllClicked,
    /// The tag-switch timer scheduled for `generation` fired.
    TagSwitchElapsed { generation: u64 },
    /// User toggled the like button of the post with this [`Post::seq`].
    LikeToggled(u64),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
