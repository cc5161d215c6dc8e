#[cfg(test)]
use std::time::Duration;

use feed_core::{Effect, Enricher, FetchFailure, Msg, RawPost};
use feed_engine::{EngineEvent, EngineHandle, PhotoRecord};
use feed_logging::{feed_debug, feed_info, feed_warn};

/// Executes core effects against the engine and turns engine events back into messages.
///
/// Raw listing records are enriched here, exactly once, on their way into
/// `Msg::PageLoaded`.
pub struct EffectRunner {
    engine: EngineHandle,
    enricher: Enricher,
    scroll_requested: bool,
    failures_reported: u64,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, enricher: Enricher) -> Self {
        Self {
            engine,
            enricher,
            scroll_requested: false,
            failures_reported: 0,
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            feed_debug!("Effect {:?}", effect);
            match effect {
                Effect::FetchPage(request) => {
                    self.engine.fetch_page(request.page, request.limit);
                }
                Effect::ScheduleTagSwitchClear { generation, delay } => {
                    self.engine.schedule_timer(generation, delay);
                }
                Effect::ScrollToTop => {
                    self.scroll_requested = true;
                }
                Effect::ReportFetchFailure(failure) => {
                    self.failures_reported += 1;
                    feed_warn!(
                        "{} (failures this session: {})",
                        failure,
                        self.failures_reported
                    );
                }
            }
        }
    }

    /// Next engine event as a message, if one is ready.
    pub fn poll(&mut self) -> Option<Msg> {
        let event = self.engine.try_recv()?;
        Some(self.to_msg(event))
    }

    #[cfg(test)]
    pub fn wait(&mut self, timeout: Duration) -> Option<Msg> {
        let event = self.engine.recv_timeout(timeout)?;
        Some(self.to_msg(event))
    }

    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    pub fn failures_reported(&self) -> u64 {
        self.failures_reported
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }

    fn to_msg(&mut self, event: EngineEvent) -> Msg {
        match event {
            EngineEvent::PageFetched { page, photos } => {
                let raws = photos.into_iter().map(to_raw_post).collect();
                let posts = self.enricher.enrich_batch(raws);
                feed_info!("Page {} enriched {} posts", page, posts.len());
                Msg::PageLoaded { page, posts }
            }
            EngineEvent::PageFailed { page, error } => {
                Msg::PageFailed(FetchFailure::new(page, error.to_string()))
            }
            EngineEvent::TimerElapsed { generation } => Msg::TagSwitchElapsed { generation },
        }
    }
}

fn to_raw_post(photo: PhotoRecord) -> RawPost {
    RawPost {
        id: photo.id,
        author: photo.author,
        download_url: photo.download_url,
    }
}
