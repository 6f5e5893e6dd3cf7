use std::{fmt::Display, ops::RangeInclusive};

use itertools::Itertools;
use log::warn;

use crate::config::ChartConfig;

/// One chart listing page: a weekly chart of a given date, or a year-end chart.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Period {
    Date { year: i32, month: u32, day: u32 },
    Year { year: i32 },
}
impl Period {
    pub fn chart_url(&self, config: &ChartConfig) -> String {
        match *self {
            Period::Date { year, month, day } => {
                format!("{}{year}-{month:02}-{day:02}", config.date_base_url)
            }
            Period::Year { year } => {
                format!("{}{year}/hot-100-songs", config.year_end_base_url)
            }
        }
    }

    pub fn header(&self) -> String {
        format!("=== {self} ===")
    }
}
/// The label written in period headers.  The month is not zero-padded.
impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Date { year, month, .. } => write!(f, "{month} {year}"),
            Period::Year { year } => write!(f, "{year}"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RowLimit {
    /// Exactly this many rows, or an error if the page has fewer.
    Top(usize),
    All,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PeriodGranularity {
    ByMonth {
        months: RangeInclusive<u32>,
        day: u32,
        top: usize,
    },
    ByYear,
}
impl PeriodGranularity {
    /// Years outer, months inner, both ascending.
    pub fn periods(&self, years: RangeInclusive<i32>) -> Vec<Period> {
        match self {
            PeriodGranularity::ByMonth { months, day, .. } => years
                .cartesian_product(months.clone())
                .map(|(year, month)| Period::Date {
                    year,
                    month,
                    day: *day,
                })
                .collect(),
            PeriodGranularity::ByYear => years.map(|year| Period::Year { year }).collect(),
        }
    }

    pub fn row_limit(&self) -> RowLimit {
        match self {
            PeriodGranularity::ByMonth { top, .. } => RowLimit::Top(*top),
            PeriodGranularity::ByYear => RowLimit::All,
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait FetchHtml {
    async fn fetch_html(&self, url: &str) -> anyhow::Result<String>;
}

pub struct ChartClient {
    reqwest: reqwest::Client,
}
impl ChartClient {
    pub fn new(config: &ChartConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }
        Ok(Self {
            reqwest: builder.build()?,
        })
    }
}
impl FetchHtml for ChartClient {
    async fn fetch_html(&self, url: &str) -> anyhow::Result<String> {
        let response = self.reqwest.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            // The body is still parsed; an error page simply has no chart rows.
            warn!("{url} returned {status}");
        }
        Ok(response.text().await?)
    }
}
