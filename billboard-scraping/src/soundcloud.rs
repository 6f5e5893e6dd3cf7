use log::info;
use scraper::Html;

use crate::{
    config::SearchConfig,
    parser::search_result::{self, SearchResultParseError},
    schema::SongKey,
};

/// Written in place of a URL when resolution fails for any reason but an interrupt.
pub const FAILED_URL_SENTINEL: &str = "FAILED_TO_GET_SOUNDCLOUD_URL";

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Interrupted by user")]
    Interrupted,
    #[error("Failed to render the search page: {0:#}")]
    Render(anyhow::Error),
    #[error(transparent)]
    Parse(#[from] SearchResultParseError),
}

/// Loads a page in a browser and returns the HTML after client-side rendering.
pub trait RenderPage {
    /// Waits until `ready_selector` matches or the renderer's timeout expires,
    /// then returns whatever has been rendered.
    fn render(&self, url: &str, ready_selector: &str) -> Result<String, ResolveError>;
}

pub struct SearchUrlResolver<R> {
    renderer: R,
    config: SearchConfig,
}

impl<R: RenderPage> SearchUrlResolver<R> {
    pub fn new(renderer: R, config: SearchConfig) -> Self {
        Self { renderer, config }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn search_url(&self, song: &SongKey) -> String {
        // `/` stays literal, the rest is encoded byte-wise
        let query = urlencoding::encode(song.as_ref()).replace("%2F", "/");
        format!("{}{query}", self.config.url_prefix)
    }

    pub fn resolve(&self, song: &SongKey) -> Result<String, ResolveError> {
        info!("Searching SoundCloud for {song}");
        let html = self
            .renderer
            .render(&self.search_url(song), search_result::ITEM)?;
        let href = search_result::parse_first_link(&Html::parse_document(&html))?;
        Ok(format!("{}{href}", self.config.origin))
    }
}
