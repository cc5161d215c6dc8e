//! Feed engine: upstream page fetching, timers and cancellation.
mod engine;
mod fetch;
mod types;

pub use engine::{fetch_with_retry, EngineHandle, RetryPolicy};
pub use fetch::{FetchSettings, PageSource, ReqwestPageSource, DEFAULT_LISTING_URL};
pub use types::{EngineEvent, FailureKind, FetchError, PhotoRecord, TimerGeneration};
