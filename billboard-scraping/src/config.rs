use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use billboard_scraping_utils::fs_toml_util::read_toml;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding `{name}.txt` and `{name}.json`.
    pub output_dir: PathBuf,
    pub chart: ChartConfig,
    pub search: SearchConfig,
    pub browser: BrowserConfig,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: "songs".into(),
            chart: Default::default(),
            search: Default::default(),
            browser: Default::default(),
        }
    }
}
impl Config {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => read_toml(path),
            None => Ok(Self::default()),
        }
    }

    pub fn log_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.txt"))
    }

    pub fn json_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.json"))
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    pub date_base_url: String,
    pub year_end_base_url: String,
    pub user_agent: Option<String>,
}
impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            date_base_url: "https://www.billboard.com/charts/hot-100/".to_owned(),
            year_end_base_url: "https://www.billboard.com/charts/year-end/".to_owned(),
            user_agent: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// The percent-encoded song string is appended as is.
    pub url_prefix: String,
    /// Prepended to the relative `href` of the first result.
    pub origin: String,
}
impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url_prefix: "https://soundcloud.com/search/sounds?q=".to_owned(),
            origin: "https://soundcloud.com".to_owned(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowserConfig {
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
    pub remote_debugging_port: Option<u16>,
    pub render_timeout_ms: u64,
    pub poll_interval_ms: u64,
}
impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_path: None,
            remote_debugging_port: None,
            render_timeout_ms: 3000,
            poll_interval_ms: 100,
        }
    }
}
impl BrowserConfig {
    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
