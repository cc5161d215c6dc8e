use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use crate::view_model::{FeedBody, FeedViewModel, LoadMoreControl, PostCard};
use crate::{FeedStore, Post};

/// Items requested per page from the upstream listing.
pub const PAGE_SIZE: u32 = 10;

/// How long the placeholder is shown after a tag is selected.
pub const TAG_SWITCH_DELAY: Duration = Duration::from_millis(500);

/// How the feed decides to load the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerPolicy {
    /// Load whenever the trailing sentinel becomes visible in the full feed.
    #[default]
    Proximity,
    /// Load only on an explicit "load more" action.
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    AllPosts,
    TagFiltered(String),
    PostDetail(Post),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
}

/// The single error kind of the core: a page could not be fetched or decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub page: u32,
    pub message: String,
}

impl FetchFailure {
    pub fn new(page: u32, message: impl Into<String>) -> Self {
        Self {
            page,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fetching page {} failed: {}", self.page, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedState {
    store: FeedStore,
    next_page: u32,
    in_flight: Option<u32>,
    policy: TriggerPolicy,
    mode: ViewMode,
    tag_switching: bool,
    tag_generation: u64,
    tag_switch_delay: Duration,
    /// Liked posts by [`Post::seq`].
    liked: BTreeSet<u64>,
    last_failure: Option<FetchFailure>,
    dirty: bool,
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new(TriggerPolicy::default())
    }
}

impl FeedState {
    pub fn new(policy: TriggerPolicy) -> Self {
        Self {
            store: FeedStore::new(),
            next_page: 1,
            in_flight: None,
            policy,
            mode: ViewMode::AllPosts,
            tag_switching: false,
            tag_generation: 0,
            tag_switch_delay: TAG_SWITCH_DELAY,
            liked: BTreeSet::new(),
            last_failure: None,
            dirty: false,
        }
    }

    pub fn with_tag_switch_delay(mut self, delay: Duration) -> Self {
        self.tag_switch_delay = delay;
        self
    }

    pub fn store(&self) -> &FeedStore {
        &self.store
    }

    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn policy(&self) -> TriggerPolicy {
        self.policy
    }

    pub fn mode(&self) -> &ViewMode {
        &self.mode
    }

    pub fn is_tag_switching(&self) -> bool {
        self.tag_switching
    }

    pub fn tag_generation(&self) -> u64 {
        self.tag_generation
    }

    pub fn tag_switch_delay(&self) -> Duration {
        self.tag_switch_delay
    }

    pub fn last_failure(&self) -> Option<&FetchFailure> {
        self.last_failure.as_ref()
    }

    pub fn is_liked(&self, seq: u64) -> bool {
        self.liked.contains(&seq)
    }

    /// Returns whether the state changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// The sensor is only mounted while the full feed is displayed.
    pub fn sentinel_armed(&self) -> bool {
        self.policy == TriggerPolicy::Proximity && self.mode == ViewMode::AllPosts
    }

    pub fn view(&self) -> FeedViewModel {
        let body = match &self.mode {
            ViewMode::PostDetail(post) => FeedBody::Detail(self.card(post)),
            _ if self.tag_switching => FeedBody::Placeholder,
            ViewMode::TagFiltered(tag) => FeedBody::Posts(
                self.store
                    .filtered_by(tag)
                    .map(|post| self.card(post))
                    .collect(),
            ),
            ViewMode::AllPosts => FeedBody::Posts(
                self.store
                    .all_posts()
                    .iter()
                    .map(|post| self.card(post))
                    .collect(),
            ),
        };

        let load_more = match (self.policy, self.is_fetching()) {
            (TriggerPolicy::Proximity, _) => LoadMoreControl::Hidden,
            (TriggerPolicy::Manual, true) => LoadMoreControl::Loading,
            (TriggerPolicy::Manual, false) => LoadMoreControl::Button,
        };

        let selected_tag = match &self.mode {
            ViewMode::TagFiltered(tag) => Some(tag.clone()),
            _ => None,
        };

        FeedViewModel {
            body,
            show_all_visible: self.mode != ViewMode::AllPosts,
            selected_tag,
            fetching: self.is_fetching(),
            load_more,
            sentinel_armed: self.sentinel_armed(),
            last_failure: self.last_failure.as_ref().map(ToString::to_string),
            post_count: self.store.len(),
            next_page: self.next_page,
            dirty: self.dirty,
        }
    }

    fn card(&self, post: &Post) -> PostCard {
        PostCard::new(post, self.is_liked(post.seq()))
    }

    /// Marks the next page as in flight. Returns `None` while another fetch is outstanding.
    pub(crate) fn begin_fetch(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() {
            return None;
        }
        self.in_flight = Some(self.next_page);
        self.dirty = true;
        Some(PageRequest {
            page: self.next_page,
            limit: PAGE_SIZE,
        })
    }

    /// Appends a completed page. Completions for pages not in flight are ignored.
    pub(crate) fn complete_fetch(&mut self, page: u32, posts: Vec<Post>) -> bool {
        if self.in_flight != Some(page) {
            return false;
        }
        self.store.append(posts);
        self.next_page += 1;
        self.in_flight = None;
        self.last_failure = None;
        self.dirty = true;
        true
    }

    /// Clears the in-flight marker without advancing the cursor.
    pub(crate) fn fail_fetch(&mut self, failure: &FetchFailure) -> bool {
        if self.in_flight != Some(failure.page) {
            return false;
        }
        self.in_flight = None;
        self.last_failure = Some(failure.clone());
        self.dirty = true;
        true
    }

    /// Switches to the filtered view and returns the generation of the new switch.
    pub(crate) fn select_tag(&mut self, tag: String) -> u64 {
        self.mode = ViewMode::TagFiltered(tag);
        self.tag_switching = true;
        self.tag_generation += 1;
        self.dirty = true;
        self.tag_generation
    }

    pub(crate) fn select_post(&mut self, post: Post) {
        self.mode = ViewMode::PostDetail(post);
        self.dirty = true;
    }

    pub(crate) fn show_all(&mut self) {
        self.mode = ViewMode::AllPosts;
        self.dirty = true;
    }

    /// Ends the tag switch only if no newer switch has started since `generation`.
    pub(crate) fn clear_tag_switch(&mut self, generation: u64) -> bool {
        if generation != self.tag_generation || !self.tag_switching {
            return false;
        }
        self.tag_switching = false;
        self.dirty = true;
        true
    }

    pub(crate) fn toggle_like(&mut self, seq: u64) {
        if !self.liked.remove(&seq) {
            self.liked.insert(seq);
        }
        self.dirty = true;
    }
}
