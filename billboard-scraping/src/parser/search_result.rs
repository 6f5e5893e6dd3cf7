use billboard_scraping_utils::selector;
use scraper::Html;

/// Present once the client-side search results have been rendered.
pub const ITEM: &str = "div.searchItem";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SearchResultParseError {
    #[error("No search result found")]
    NoSearchResult,
    #[error("The first search result has no primary link")]
    NoPrimaryLink,
    #[error("Attribute `href` not found in the primary link")]
    MissingHref,
}

/// Returns the relative `href` of the first result's primary link.
pub fn parse_first_link(html: &Html) -> Result<String, SearchResultParseError> {
    let item = html
        .select(selector!(ITEM))
        .next()
        .ok_or(SearchResultParseError::NoSearchResult)?;
    let link = item
        .select(selector!("a.sc-link-primary"))
        .next()
        .ok_or(SearchResultParseError::NoPrimaryLink)?;
    Ok(link
        .attr("href")
        .ok_or(SearchResultParseError::MissingHref)?
        .to_owned())
}
