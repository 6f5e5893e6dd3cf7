use billboard_scraping_utils::selector;
use scraper::{ElementRef, Html};

use crate::{chart::RowLimit, schema::ChartEntry};

pub const ROW: &str = "div.o-chart-results-list-row-container";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChartParseError {
    #[error("Title not found in chart row {0}")]
    MissingTitle(usize),
    #[error("Artist not found next to the title in chart row {0}")]
    MissingArtist(usize),
    #[error("Requested top {requested} rows, but the chart has only {found}")]
    TooFewRows { requested: usize, found: usize },
}

pub fn parse(html: &Html, limit: RowLimit) -> Result<Vec<ChartEntry>, ChartParseError> {
    let rows = html.select(selector!(ROW)).collect::<Vec<_>>();
    let rows = match limit {
        RowLimit::Top(requested) => rows.get(..requested).ok_or(ChartParseError::TooFewRows {
            requested,
            found: rows.len(),
        })?,
        RowLimit::All => &rows[..],
    };
    rows.iter()
        .enumerate()
        .map(|(i, &row)| parse_row(row, i))
        .collect()
}

fn parse_row(row: ElementRef, index: usize) -> Result<ChartEntry, ChartParseError> {
    let title = row
        .select(selector!("h3#title-of-a-story"))
        .next()
        .ok_or(ChartParseError::MissingTitle(index))?;
    let artist = title
        .parent()
        .and_then(ElementRef::wrap)
        .and_then(|parent| parent.select(selector!("span")).next())
        .ok_or(ChartParseError::MissingArtist(index))?;
    Ok(ChartEntry {
        title: text_of(title),
        artist: text_of(artist),
    })
}

fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_owned()
}
