use std::time::Duration;

use crate::{FetchFailure, PageRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Request one page from the upstream listing source.
    FetchPage(PageRequest),
    /// Deliver `Msg::TagSwitchElapsed { generation }` after `delay`.
    ScheduleTagSwitchClear { generation: u64, delay: Duration },
    /// Scroll the presentation back to the top anchor.
    ScrollToTop,
    /// Hand a failed fetch to the diagnostic observer.
    ReportFetchFailure(FetchFailure),
}
