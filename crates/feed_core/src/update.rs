use crate::{Effect, FeedState, Msg, TriggerPolicy, ViewMode};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: FeedState, msg: Msg) -> (FeedState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted => {
            // Only the very first page loads on mount; later pages need a trigger.
            if state.next_page() == 1 {
                fetch_next_page(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::SentinelVisible => {
            if state.policy() == TriggerPolicy::Proximity && *state.mode() == ViewMode::AllPosts {
                fetch_next_page(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::LoadMoreClicked => {
            if state.policy() == TriggerPolicy::Manual {
                fetch_next_page(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::PageLoaded { page, posts } => {
            state.complete_fetch(page, posts);
            Vec::new()
        }
        Msg::PageFailed(failure) => {
            if state.fail_fetch(&failure) {
                vec![Effect::ReportFetchFailure(failure)]
            } else {
                Vec::new()
            }
        }
        Msg::TagClicked(tag) => {
            let generation = state.select_tag(tag);
            vec![
                Effect::ScheduleTagSwitchClear {
                    generation,
                    delay: state.tag_switch_delay(),
                },
                Effect::ScrollToTop,
            ]
        }
        Msg::PostClicked(post) => {
            state.select_post(post);
            vec![Effect::ScrollToTop]
        }
        Msg::ShowAllClicked => {
            state.show_all();
            vec![Effect::ScrollToTop]
        }
        Msg::TagSwitchElapsed { generation } => {
            state.clear_tag_switch(generation);
            Vec::new()
        }
        Msg::LikeToggled(seq) => {
            state.toggle_like(seq);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn fetch_next_page(state: &mut FeedState) -> Vec<Effect> {
    state
        .begin_fetch()
        .map(Effect::FetchPage)
        .into_iter()
        .collect()
}
