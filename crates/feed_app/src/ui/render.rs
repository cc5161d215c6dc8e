use feed_core::{FeedBody, FeedViewModel, LoadMoreControl, PostCard};

pub const TOP_ANCHOR: &str = "==================== top ====================";

/// Renders the view model as plain text lines, top to bottom.
pub fn render(view: &FeedViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if view.show_all_visible {
        lines.push("[all] Show All".to_string());
    }
    if let Some(tag) = &view.selected_tag {
        lines.push(format!("Showing results for #{tag}"));
    }

    match &view.body {
        FeedBody::Detail(card) => push_card(&mut lines, 1, card),
        FeedBody::Placeholder => lines.push("Loading...".to_string()),
        FeedBody::Posts(cards) if cards.is_empty() && !view.fetching => {
            lines.push("(no posts)".to_string());
        }
        FeedBody::Posts(cards) => {
            for (i, card) in cards.iter().enumerate() {
                push_card(&mut lines, i + 1, card);
            }
        }
    }

    if view.fetching {
        lines.push("Loading...".to_string());
    }
    if view.load_more == LoadMoreControl::Button {
        lines.push("[more] Load more".to_string());
    }
    if view.sentinel_armed {
        lines.push("-- scroll for more --".to_string());
    }
    if let Some(failure) = &view.last_failure {
        lines.push(format!("! {failure}; try again"));
    }
    lines.push(format!(
        "{} posts loaded, next page {}",
        view.post_count, view.next_page
    ));
    lines
}

fn push_card(lines: &mut Vec<String>, position: usize, card: &PostCard) {
    let heart = if card.liked { "♥" } else { "♡" };
    let tags = card
        .tags
        .iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<_>>()
        .join(" ");

    lines.push(format!("{position:>3}. {} ({})", card.username, card.date));
    lines.push(format!("     avatar {}", card.user_image));
    lines.push(format!("     photo  {}", card.photo));
    lines.push(format!("     {heart} {}  {tags}", card.like_count));
    lines.push(format!("     {}", card.comments.join(" | ")));
}

#[cfg(test)]
mod tests {
    use feed_core::{update, Enricher, FeedState, Msg, RawPost, TriggerPolicy};

    use super::*;

    fn state_with_posts(policy: TriggerPolicy) -> FeedState {
        let mut enricher = Enricher::seeded(3);
        let raws = vec![
            RawPost {
                id: "0".to_string(),
                author: "Alice Smith".to_string(),
                download_url: "https://picsum.photos/id/0/10/10".to_string(),
            },
            RawPost {
                id: "1".to_string(),
                author: "Bob Lee".to_string(),
                download_url: "https://picsum.photos/id/1/10/10".to_string(),
            },
        ];
        let (state, _) = update(FeedState::new(policy), Msg::Mounted);
        let (state, _) = update(
            state,
            Msg::PageLoaded {
                page: 1,
                posts: enricher.enrich_batch(raws),
            },
        );
        state
    }

    #[test]
    fn full_feed_lists_every_card_and_sentinel() {
        let lines = render(&state_with_posts(TriggerPolicy::Proximity).view());

        assert!(lines[0].starts_with("  1. Alice Smith (March 19, 2025)"));
        assert!(lines.iter().any(|l| l.starts_with("  2. Bob Lee")));
        assert!(lines.iter().any(|l| l == "-- scroll for more --"));
        assert!(!lines.iter().any(|l| l.contains("Show All")));
        assert_eq!(lines.last().unwrap(), "2 posts loaded, next page 2");
    }

    #[test]
    fn tag_switch_renders_banner_and_placeholder() {
        let state = state_with_posts(TriggerPolicy::Manual);
        let (state, _) = update(state, Msg::TagClicked("Bob".to_string()));
        let lines = render(&state.view());

        assert_eq!(lines[0], "[all] Show All");
        assert_eq!(lines[1], "Showing results for #Bob");
        assert_eq!(lines[2], "Loading...");
        assert!(lines.iter().any(|l| l == "[more] Load more"));
    }

    #[test]
    fn liked_card_shows_count() {
        let state = state_with_posts(TriggerPolicy::Proximity);
        let (state, _) = update(state, Msg::LikeToggled(0));
        let lines = render(&state.view());

        assert!(lines.iter().any(|l| l.trim_start().starts_with("♥ 1  #Alice")));
    }
}
