//! Feed core: pure pagination and view-state machine plus view-model helpers.
mod effect;
mod enrich;
mod msg;
mod post;
mod state;
mod store;
mod update;
mod view_model;

pub use effect::Effect;
pub use enrich::{avatar_url, generate_tags, Enricher, AVATAR_ID_RANGE, TAG_KEYWORDS};
pub use msg::Msg;
pub use post::{Post, PostId, RawPost};
pub use state::{
    FeedState, FetchFailure, PageRequest, TriggerPolicy, ViewMode, PAGE_SIZE, TAG_SWITCH_DELAY,
};
pub use store::FeedStore;
pub use update::update;
pub use view_model::{
    FeedBody, FeedViewModel, LoadMoreControl, PostCard, POST_COMMENTS, POST_DATE_LABEL,
};
