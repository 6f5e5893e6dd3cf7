use std::{ops::RangeInclusive, path::Path};

use anyhow::{bail, Context};
use log::{info, warn};
use scraper::Html;

use crate::{
    chart::{FetchHtml, PeriodGranularity},
    config::ChartConfig,
    interrupt::{Interrupt, Interrupted},
    parser::chart_list,
    resolved_json::{ArrayStyle, ResolvedSongWriter},
    schema::ResolvedSong,
    song_log,
    soundcloud::{RenderPage, ResolveError, SearchUrlResolver, FAILED_URL_SENTINEL},
};

/// Fetches every period in order and appends one block per period to the log.
///
/// The first failure aborts the run; blocks written before it are kept, so a
/// run can be resumed by starting from the failed period.
pub async fn scrape_into_log<F: FetchHtml>(
    fetcher: &F,
    config: &ChartConfig,
    granularity: &PeriodGranularity,
    years: RangeInclusive<i32>,
    log_path: &Path,
    interrupt: &Interrupt,
) -> anyhow::Result<usize> {
    let periods = granularity.periods(years);
    for period in &periods {
        interrupt.check()?;
        info!("Fetching chart for {period}");
        let url = period.chart_url(config);
        let body = fetcher
            .fetch_html(&url)
            .await
            .with_context(|| format!("While fetching {url}"))?;
        interrupt.check()?;
        let entries = chart_list::parse(&Html::parse_document(&body), granularity.row_limit())
            .with_context(|| format!("While parsing the chart for {period}"))?;
        song_log::append_block(log_path, period, &entries)?;
    }
    Ok(periods.len())
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ResolveSummary {
    pub resolved: usize,
    pub failed: usize,
}

/// Resolves every unique song of the log and rebuilds the JSON output.
///
/// Failed lookups become [`FAILED_URL_SENTINEL`].  An interrupt stops the run
/// before anything is written for the current song, leaving the array open.
pub fn resolve_into_json<R: RenderPage>(
    resolver: &SearchUrlResolver<R>,
    log_path: &Path,
    json_path: &Path,
    style: ArrayStyle,
    interrupt: &Interrupt,
) -> anyhow::Result<ResolveSummary> {
    let songs = song_log::read_unique_songs(log_path)?;
    info!("Found {} songs", songs.len());

    let mut writer = ResolvedSongWriter::create(json_path, style)?;
    let mut summary = ResolveSummary {
        resolved: 0,
        failed: 0,
    };
    for song in songs {
        let url = match resolver.resolve(&song) {
            Ok(url) => {
                summary.resolved += 1;
                url
            }
            Err(ResolveError::Interrupted) => bail!(Interrupted),
            Err(_) if interrupt.is_raised() => bail!(Interrupted),
            Err(e) => {
                warn!("Failed to get SoundCloud URL for {song}: {e}");
                summary.failed += 1;
                FAILED_URL_SENTINEL.to_owned()
            }
        };
        writer.append(&ResolvedSong { url, string: song })?;
    }
    writer.finish()?;
    info!(
        "Wrote {} songs to {json_path:?} ({} not found)",
        summary.resolved + summary.failed,
        summary.failed
    );
    Ok(summary)
}
