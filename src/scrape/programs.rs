//! EPG schedule extraction from a channel page.
//!
//! A channel page carries its schedule in an `epg_prog` table: one `li`
//! per program, the start time in a `time` cell and the title in a
//! `prname2` cell.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::{PortalScraper, ScrapeError};
use crate::channel::ChannelProgram;

static PROGRAM_TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse(".epg_prog").unwrap());
static PROGRAM_ENTRY: Lazy<Selector> = Lazy::new(|| Selector::parse("li").unwrap());
static TIME_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse(".time").unwrap());
static NAME_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse(".prname2").unwrap());

/// Scraper for a channel page's program schedule.
pub struct ProgramScraper {
    page_url: String,
}

impl ProgramScraper {
    /// Create a scraper for the given channel page URL.
    #[must_use]
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
        }
    }
}

/// Parse one schedule entry. `None` when the time or title cell is
/// missing or the time text is malformed; the rest of the schedule is
/// still usable.
fn parse_program(entry: ElementRef<'_>) -> Option<ChannelProgram> {
    let time = entry.select(&TIME_CELL).next();
    let name = entry.select(&NAME_CELL).next();

    let (Some(time), Some(name)) = (time, name) else {
        warn!("Program entry missing time or title");
        return None;
    };

    let time = time.text().collect::<String>().trim().to_string();
    let name = name.text().collect::<String>().trim().to_string();

    match ChannelProgram::new(name, &time) {
        Ok(program) => Some(program),
        Err(e) => {
            warn!("Skipping program with bad time {time:?}: {e}");
            None
        }
    }
}

#[async_trait::async_trait]
impl PortalScraper for ProgramScraper {
    type Output = Vec<ChannelProgram>;

    fn url(&self) -> String {
        self.page_url.clone()
    }

    fn parse(&self, html: &str) -> Result<Vec<ChannelProgram>, ScrapeError> {
        let document = Html::parse_document(html);

        let Some(table) = document.select(&PROGRAM_TABLE).next() else {
            return Err(ScrapeError::Parse(
                "no program table on the channel page".to_string(),
            ));
        };

        let programs: Vec<ChannelProgram> = table
            .select(&PROGRAM_ENTRY)
            .filter_map(parse_program)
            .collect();

        debug!("Parsed {} programs", programs.len());
        Ok(programs)
    }
}
