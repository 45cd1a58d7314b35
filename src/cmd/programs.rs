use anyhow::Result;
use chrono::{Local, Timelike};

use teletap::channel::{current_program_index, ProgramTime};
use teletap::http_client::PortalClient;
use teletap::scrape::{PortalScraper, ProgramScraper};

use super::resolve_channel;

/// Show a channel's EPG schedule, marking the program on air now.
pub async fn cmd_programs(
    client: &PortalClient,
    portal: &str,
    channel: &str,
    json: bool,
) -> Result<()> {
    let channel = resolve_channel(client, portal, channel).await?;
    let programs = ProgramScraper::new(&channel.page_url).load(client).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&programs)?);
        return Ok(());
    }

    let now = Local::now();
    #[allow(clippy::cast_possible_truncation)]
    let now = ProgramTime {
        hour: now.hour() as u8,
        minute: now.minute() as u8,
    };
    let current = current_program_index(&programs, now);

    println!("📺 {}\n", channel.name);
    for (i, program) in programs.iter().enumerate() {
        let marker = if current == Some(i) { "▶" } else { " " };
        println!("{marker} {} | {}", program.time, program.name);
    }
    println!("\n({} programs)", programs.len());

    Ok(())
}
