use derive_more::{AsRef, Display, From};
use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ChartEntry {
    pub title: String,
    pub artist: String,
}
impl std::fmt::Display for ChartEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.title, self.artist)
    }
}
impl From<&ChartEntry> for SongKey {
    fn from(entry: &ChartEntry) -> Self {
        Self(entry.to_string())
    }
}

/// `"{title} - {artist}"`, compared byte for byte after trimming.
#[derive(Clone, PartialEq, Eq, Hash, Debug, From, AsRef, Display, Serialize, Deserialize)]
#[as_ref(forward)]
pub struct SongKey(String);

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolvedSong {
    pub url: String,
    pub string: SongKey,
}
