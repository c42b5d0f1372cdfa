// src/display/mod.rs
mod page;

use std::fmt;

pub use page::PageDisplay;

/// Named output slots, each updated independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Osint,
    Geo,
    Sigint,
    History,
}

impl Region {
    /// The three regions an analysis cycle writes results into
    pub const RESULTS: [Region; 3] = [Region::Osint, Region::Geo, Region::Sigint];

    pub const ALL: [Region; 4] = [Region::Osint, Region::Geo, Region::Sigint, Region::History];

    pub fn id(&self) -> &'static str {
        match self {
            Region::Osint => "osint-results",
            Region::Geo => "geo-results",
            Region::Sigint => "sigint-results",
            Region::History => "input-history",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            Region::Osint => "OSINT Analysis",
            Region::Geo => "Geolocation Analysis",
            Region::Sigint => "SIGINT Analysis",
            Region::History => "Input History",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Output surface the orchestrator writes to
pub trait DisplayPort: Send + Sync {
    /// Replace the region with a loading indicator
    fn set_loading(&self, region: Region);

    /// Replace the region with rendered markup
    fn set_content(&self, region: Region, markup: String);

    /// Replace the region with an error message
    fn set_error(&self, region: Region, message: &str);

    /// Keep the newest content of the region in view
    fn scroll_to_latest(&self, _region: Region) {}
}
