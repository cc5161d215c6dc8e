use std::sync::Once;

use feed_core::{
    update, Effect, Enricher, FeedState, FetchFailure, Msg, PageRequest, Post, RawPost,
    TriggerPolicy, PAGE_SIZE,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(feed_logging::initialize_for_tests);
}

const AUTHORS: [&str; 10] = [
    "Alice Smith",
    "Bob Lee",
    "Carol Diaz",
    "Dan Brown",
    "Eve Adams",
    "Frank Moore",
    "Grace Hopper",
    "Heidi Klum",
    "Ivan Petrov",
    "Judy Garland",
];

fn raw_page(page: u32) -> Vec<RawPost> {
    AUTHORS
        .iter()
        .enumerate()
        .map(|(i, author)| RawPost {
            id: format!("{page}-{i}"),
            author: author.to_string(),
            download_url: format!("https://picsum.photos/id/{page}{i}/400/300"),
        })
        .collect()
}

fn load_page(state: FeedState, enricher: &mut Enricher, page: u32) -> (FeedState, Vec<Effect>) {
    let posts: Vec<Post> = enricher.enrich_batch(raw_page(page));
    update(state, Msg::PageLoaded { page, posts })
}

#[test]
fn mount_requests_first_page() {
    init_logging();
    let (state, effects) = update(FeedState::default(), Msg::Mounted);

    assert_eq!(
        effects,
        vec![Effect::FetchPage(PageRequest {
            page: 1,
            limit: PAGE_SIZE
        })]
    );
    assert!(state.is_fetching());
    assert_eq!(state.next_page(), 1);
}

#[test]
fn first_page_is_appended_with_author_tags() {
    init_logging();
    let mut enricher = Enricher::seeded(7);
    let (state, _) = update(FeedState::default(), Msg::Mounted);
    let (mut state, effects) = load_page(state, &mut enricher, 1);

    assert!(effects.is_empty());
    assert_eq!(state.store().len(), 10);
    assert_eq!(state.next_page(), 2);
    assert!(!state.is_fetching());
    for (post, author) in state.store().all_posts().iter().zip(AUTHORS) {
        assert_eq!(post.author(), author);
        assert_eq!(&post.tags()[0], author.split(' ').next().unwrap());
    }
    assert!(state.consume_dirty());
}

#[test]
fn each_successful_page_grows_store_by_batch_and_cursor_by_one() {
    init_logging();
    let mut enricher = Enricher::seeded(1);
    let mut state = FeedState::default();

    for page in 1..=3 {
        let (next, effects) = update(state, Msg::SentinelVisible);
        assert_eq!(
            effects,
            vec![Effect::FetchPage(PageRequest {
                page,
                limit: PAGE_SIZE
            })]
        );
        let before = next.store().len();
        let (next, _) = load_page(next, &mut enricher, page);
        assert_eq!(next.store().len(), before + 10);
        assert_eq!(next.next_page(), page + 1);
        state = next;
    }

    let ids: Vec<_> = state.store().all_posts().iter().map(|p| p.id()).collect();
    assert_eq!(ids.first().copied(), Some("1-0"));
    assert_eq!(ids.last().copied(), Some("3-9"));
}

#[test]
fn fetch_while_in_flight_is_noop() {
    init_logging();
    let (state, _) = update(FeedState::default(), Msg::Mounted);
    let before = state.clone();

    let (state, effects) = update(state, Msg::SentinelVisible);
    assert!(effects.is_empty());
    assert_eq!(state.store().len(), before.store().len());
    assert_eq!(state.next_page(), before.next_page());

    let (state, effects) = update(state, Msg::Mounted);
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn failed_page_is_reported_once_and_can_be_retried() {
    init_logging();
    let mut enricher = Enricher::seeded(3);
    let (state, _) = update(FeedState::default(), Msg::Mounted);
    let (state, _) = load_page(state, &mut enricher, 1);
    let (state, effects) = update(state, Msg::SentinelVisible);
    assert_eq!(
        effects,
        vec![Effect::FetchPage(PageRequest {
            page: 2,
            limit: PAGE_SIZE
        })]
    );

    let failure = FetchFailure::new(2, "connection reset");
    let (state, effects) = update(state, Msg::PageFailed(failure.clone()));

    assert_eq!(state.store().len(), 10);
    assert_eq!(state.next_page(), 2);
    assert!(!state.is_fetching());
    assert_eq!(effects, vec![Effect::ReportFetchFailure(failure.clone())]);
    assert_eq!(state.last_failure(), Some(&failure));
    assert_eq!(
        state.view().last_failure.as_deref(),
        Some("fetching page 2 failed: connection reset")
    );

    // A duplicate failure report for a page no longer in flight is ignored.
    let (state, effects) = update(state, Msg::PageFailed(failure));
    assert!(effects.is_empty());

    // The same page is requested again by the next trigger.
    let (state, effects) = update(state, Msg::SentinelVisible);
    assert_eq!(
        effects,
        vec![Effect::FetchPage(PageRequest {
            page: 2,
            limit: PAGE_SIZE
        })]
    );
    let (state, _) = load_page(state, &mut enricher, 2);
    assert_eq!(state.store().len(), 20);
    assert_eq!(state.next_page(), 3);
    assert!(state.last_failure().is_none());
}

#[test]
fn stale_page_completion_is_ignored() {
    init_logging();
    let mut enricher = Enricher::seeded(5);
    let (state, _) = update(FeedState::default(), Msg::Mounted);
    let before = state.clone();

    let (state, effects) = load_page(state, &mut enricher, 4);

    assert!(effects.is_empty());
    assert_eq!(state, before);
    assert!(state.is_fetching());
}

#[test]
fn duplicate_ids_across_pages_are_kept() {
    init_logging();
    let mut enricher = Enricher::seeded(9);
    let (state, _) = update(FeedState::new(TriggerPolicy::Manual), Msg::Mounted);
    let (state, _) = load_page(state, &mut enricher, 1);
    let (state, _) = update(state, Msg::LoadMoreClicked);
    let repeated = enricher.enrich_batch(raw_page(1));
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            page: 2,
            posts: repeated,
        },
    );

    assert_eq!(state.store().len(), 20);
    let dupes = state
        .store()
        .all_posts()
        .iter()
        .filter(|p| p.id() == "1-0")
        .count();
    assert_eq!(dupes, 2);
}

#[test]
fn like_marks_only_one_of_duplicate_ids() {
    init_logging();
    let mut enricher = Enricher::seeded(9);
    let (state, _) = update(FeedState::new(TriggerPolicy::Manual), Msg::Mounted);
    let (state, _) = load_page(state, &mut enricher, 1);
    let (state, _) = update(state, Msg::LoadMoreClicked);
    let repeated = enricher.enrich_batch(raw_page(1));
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            page: 2,
            posts: repeated,
        },
    );

    let first = state.store().all_posts()[0].seq();
    let (state, _) = update(state, Msg::LikeToggled(first));

    let liked: Vec<bool> = state
        .view()
        .body
        .cards()
        .iter()
        .filter(|card| card.post.id() == "1-0")
        .map(|card| card.liked)
        .collect();
    assert_eq!(liked, vec![true, false]);
}
