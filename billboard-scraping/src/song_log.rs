use std::{
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use fs_err::OpenOptions;
use itertools::Itertools;

use crate::{
    chart::Period,
    schema::{ChartEntry, SongKey},
};

/// Any line containing this is a period header.
pub const HEADER_MARKER: &str = "===";

/// Appends one period block and flushes it before returning.
pub fn append_block(path: &Path, period: &Period, entries: &[ChartEntry]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", period.header())?;
    for entry in entries {
        writeln!(writer, "{entry}")?;
    }
    writer
        .flush()
        .with_context(|| format!("While appending {period} to {path:?}"))?;
    Ok(())
}

pub fn unique_songs(content: &str) -> Vec<SongKey> {
    content
        .lines()
        .filter(|line| !line.contains(HEADER_MARKER))
        .map(|line| line.trim())
        .unique()
        .map(|song| SongKey::from(song.to_owned()))
        .collect()
}

pub fn read_unique_songs(path: impl AsRef<Path>) -> anyhow::Result<Vec<SongKey>> {
    let content = fs_err::read_to_string(path.as_ref())?;
    Ok(unique_songs(&content))
}

#[cfg(test)]
mod tests {
    use super::{append_block, read_unique_songs, unique_songs};
    use crate::{chart::Period, schema::ChartEntry};

    fn keys(songs: &[crate::schema::SongKey]) -> Vec<&str> {
        songs.iter().map(AsRef::<str>::as_ref).collect()
    }

    fn entry(title: &str, artist: &str) -> ChartEntry {
        ChartEntry {
            title: title.to_owned(),
            artist: artist.to_owned(),
        }
    }

    #[test]
    fn keeps_first_occurrence_order() {
        let log = "=== 1 2000 ===\nA - X\nB - Y\n=== 2 2000 ===\nA - X\n";
        assert_eq!(keys(&unique_songs(log)), ["A - X", "B - Y"]);
    }

    #[test]
    fn dedup_is_idempotent() {
        let log = "=== 2019 ===\nC - Z\nA - X\n=== 2020 ===\nA - X\nC - Z\nB - Y\n";
        let once = unique_songs(log);
        let rebuilt = once
            .iter()
            .map(|s| format!("{s}\n"))
            .collect::<String>();
        assert_eq!(unique_songs(log), once);
        assert_eq!(unique_songs(&rebuilt), once);
    }

    #[test]
    fn only_surrounding_whitespace_is_ignored() {
        let log = "  A - X \r\nA - X\nA  - X\na - x\n";
        assert_eq!(keys(&unique_songs(log)), ["A - X", "A  - X", "a - x"]);
    }

    #[test]
    fn any_line_with_the_marker_is_dropped() {
        let log = "=== 2010 ===\nTitle === Weird - Artist\nOK - Fine\n";
        assert_eq!(keys(&unique_songs(log)), ["OK - Fine"]);
    }

    #[test]
    fn blocks_accumulate_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("default.txt");
        let period = Period::Year { year: 2010 };
        append_block(&path, &period, &[entry("A", "X")]).unwrap();
        append_block(&path, &period, &[entry("B", "Y"), entry("A", "X")]).unwrap();
        assert_eq!(
            fs_err::read_to_string(&path).unwrap(),
            "=== 2010 ===\nA - X\n=== 2010 ===\nB - Y\nA - X\n"
        );
        assert_eq!(keys(&read_unique_songs(&path).unwrap()), ["A - X", "B - Y"]);
    }

    #[test]
    fn empty_block_still_has_a_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        append_block(&path, &Period::Year { year: 1999 }, &[]).unwrap();
        assert_eq!(fs_err::read_to_string(&path).unwrap(), "=== 1999 ===\n");
        assert!(read_unique_songs(&path).unwrap().is_empty());
    }

    #[test]
    fn missing_log_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_unique_songs(dir.path().join("none.txt")).is_err());
    }
}
