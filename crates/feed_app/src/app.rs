use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use feed_core::{update, Enricher, FeedState, FeedViewModel, Msg};
use feed_engine::EngineHandle;
use feed_logging::{feed_debug, feed_info};

use crate::config::AppConfig;
use crate::effects::EffectRunner;
use crate::ui::input::{parse_command, Command, HELP};
use crate::ui::render::{render, TOP_ANCHOR};

const POLL_INTERVAL: Duration = Duration::from_millis(75);

pub fn run_app(config: AppConfig) -> anyhow::Result<()> {
    let engine = EngineHandle::new(config.fetch_settings())?;
    let enricher = match config.seed {
        Some(seed) => Enricher::seeded(seed),
        None => Enricher::from_entropy(),
    };
    let state = FeedState::new(config.trigger_policy())
        .with_tag_switch_delay(config.tag_switch_delay());
    feed_info!(
        "Starting feed from {} with {:?} policy",
        config.base_url,
        state.policy()
    );

    let mut session = FeedSession::new(state, EffectRunner::new(engine, enricher));
    let commands = spawn_stdin_reader();
    let mut out = io::stdout().lock();

    writeln!(out, "{HELP}")?;
    session.dispatch(Msg::Mounted);

    loop {
        session.pump_engine();
        if let Some(lines) = session.take_render() {
            for line in lines {
                writeln!(out, "{line}")?;
            }
            out.flush()?;
        }

        match commands.recv_timeout(POLL_INTERVAL) {
            Ok(Command::Quit) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Ok(Command::Help) => writeln!(out, "{HELP}")?,
            Ok(command) => {
                if let Some(note) = session.handle_command(command) {
                    writeln!(out, "{note}")?;
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => session.dispatch(Msg::Tick),
        }
    }

    feed_info!(
        "Session ended with {} posts, {} failed fetches",
        session.state().store().len(),
        session.failures_reported()
    );
    session.shutdown();
    Ok(())
}

fn spawn_stdin_reader() -> mpsc::Receiver<Command> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(parse_command(&line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Command::Quit);
    });
    rx
}

/// Owns the feed state for one session and drives it with messages.
pub struct FeedSession {
    state: FeedState,
    effects: EffectRunner,
    last_view: FeedViewModel,
}

impl FeedSession {
    pub fn new(state: FeedState, effects: EffectRunner) -> Self {
        let last_view = state.view();
        Self {
            state,
            effects,
            last_view,
        }
    }

    pub fn dispatch(&mut self, msg: Msg) {
        feed_debug!("Msg {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.effects.enqueue(effects);
    }

    /// Feeds every ready engine event back into the state.
    pub fn pump_engine(&mut self) {
        while let Some(msg) = self.effects.poll() {
            self.dispatch(msg);
        }
    }

    /// Lines to print if anything changed since the last render.
    pub fn take_render(&mut self) -> Option<Vec<String>> {
        if !self.state.consume_dirty() {
            return None;
        }
        self.last_view = self.state.view();
        let mut lines = Vec::new();
        if self.effects.take_scroll_request() {
            lines.push(TOP_ANCHOR.to_string());
        }
        lines.extend(render(&self.last_view));
        Some(lines)
    }

    /// Resolves a command against the last rendered view. Returns a note for the user
    /// when the command does nothing.
    pub fn handle_command(&mut self, command: Command) -> Option<String> {
        let msg = match command {
            Command::Scroll if self.last_view.sentinel_armed => Msg::SentinelVisible,
            Command::Scroll => return Some("Nothing more to load here.".to_string()),
            Command::LoadMore => Msg::LoadMoreClicked,
            Command::Tag(tag) => Msg::TagClicked(tag),
            Command::Open(position) => match self.card_at(position) {
                Some(card) => Msg::PostClicked(card.post.clone()),
                None => return Some(no_post_at(position)),
            },
            Command::Like(position) => match self.card_at(position) {
                Some(card) => Msg::LikeToggled(card.post.seq()),
                None => return Some(no_post_at(position)),
            },
            Command::ShowAll => Msg::ShowAllClicked,
            Command::Help | Command::Quit => Msg::NoOp,
            Command::Unknown(raw) => return Some(format!("Unknown command {raw:?}. {HELP}")),
        };
        self.dispatch(msg);
        None
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn failures_reported(&self) -> u64 {
        self.effects.failures_reported()
    }

    pub fn shutdown(&self) {
        self.effects.shutdown();
    }

    fn card_at(&self, position: usize) -> Option<&feed_core::PostCard> {
        self.last_view.body.cards().get(position.checked_sub(1)?)
    }
}

fn no_post_at(position: usize) -> String {
    format!("No post at position {position}.")
}
