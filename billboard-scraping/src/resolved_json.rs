use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use fs_err::{File, OpenOptions};
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};

use crate::schema::ResolvedSong;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ArrayStyle {
    /// `,\n` after every object, including the last one.
    #[default]
    TrailingComma,
    /// A valid JSON array.
    Strict,
}

/// Builds the output array one object at a time, reopening the file for each
/// write so that finished objects survive an abort.
pub struct ResolvedSongWriter {
    path: PathBuf,
    style: ArrayStyle,
    written: usize,
}

impl ResolvedSongWriter {
    /// Truncates `path` and writes the opening bracket.
    pub fn create(path: impl Into<PathBuf>, style: ArrayStyle) -> anyhow::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent)?;
        }
        File::create(&path)?.write_all(b"[\n")?;
        Ok(Self {
            path,
            style,
            written: 0,
        })
    }

    pub fn append(&mut self, song: &ResolvedSong) -> anyhow::Result<()> {
        let mut writer = self.open()?;
        if self.style == ArrayStyle::Strict && self.written > 0 {
            writer.write_all(b",\n")?;
        }
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut writer, AsciiPrettyFormatter::new());
        song.serialize(&mut serializer)?;
        if self.style == ArrayStyle::TrailingComma {
            writer.write_all(b",\n")?;
        }
        writer.flush()?;
        self.written += 1;
        Ok(())
    }

    /// Writes the closing bracket.  Returns the number of objects written.
    pub fn finish(self) -> anyhow::Result<usize> {
        let mut writer = self.open()?;
        match self.style {
            ArrayStyle::Strict if self.written > 0 => writer.write_all(b"\n]\n")?,
            _ => writer.write_all(b"]\n")?,
        }
        writer.flush()?;
        Ok(self.written)
    }

    fn open(&self) -> anyhow::Result<BufWriter<File>> {
        Ok(BufWriter::new(
            OpenOptions::new().append(true).open(&self.path)?,
        ))
    }
}

/// Four-space pretty printing with every non-ASCII character written as a
/// `\uXXXX` escape (UTF-16 surrogate pairs outside the BMP).
struct AsciiPrettyFormatter(PrettyFormatter<'static>);

impl AsciiPrettyFormatter {
    fn new() -> Self {
        Self(PrettyFormatter::with_indent(b"    "))
    }
}

impl Formatter for AsciiPrettyFormatter {
    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if !c.is_ascii() {
                writer.write_all(fragment[start..i].as_bytes())?;
                for unit in c.encode_utf16(&mut [0; 2]) {
                    write!(writer, "\\u{unit:04x}")?;
                }
                start = i + c.len_utf8();
            }
        }
        writer.write_all(fragment[start..].as_bytes())?;
        Ok(())
    }

    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::{ArrayStyle, ResolvedSongWriter};
    use crate::schema::ResolvedSong;

    fn song(url: &str, string: &str) -> ResolvedSong {
        ResolvedSong {
            url: url.to_owned(),
            string: string.to_owned().into(),
        }
    }

    const EXPECTED_TRAILING: &str = r#"[
{
    "url": "FAILED_TO_GET_SOUNDCLOUD_URL",
    "string": "A - X"
},
{
    "url": "https://soundcloud.com/b/y",
    "string": "B - Y"
},
]
"#;

    #[test]
    fn trailing_comma_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.json");
        let mut writer = ResolvedSongWriter::create(&path, ArrayStyle::TrailingComma).unwrap();
        writer
            .append(&song("FAILED_TO_GET_SOUNDCLOUD_URL", "A - X"))
            .unwrap();
        writer
            .append(&song("https://soundcloud.com/b/y", "B - Y"))
            .unwrap();
        assert_eq!(writer.finish().unwrap(), 2);
        assert_eq!(fs_err::read_to_string(&path).unwrap(), EXPECTED_TRAILING);
    }

    #[test]
    fn non_ascii_is_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.json");
        let mut writer = ResolvedSongWriter::create(&path, ArrayStyle::TrailingComma).unwrap();
        writer
            .append(&song("u\"1", "Señorita - Shawn Mendes & Camila Cabello 😀"))
            .unwrap();
        writer.finish().unwrap();
        let content = fs_err::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "[\n{\n    \"url\": \"u\\\"1\",\n    \"string\": \"Se\\u00f1orita - Shawn Mendes & Camila Cabello \\ud83d\\ude00\"\n},\n]\n"
        );
        assert!(content.is_ascii());
    }

    #[test]
    fn strict_layout_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.json");
        let mut writer = ResolvedSongWriter::create(&path, ArrayStyle::Strict).unwrap();
        writer.append(&song("u1", "A - X")).unwrap();
        writer.append(&song("u2", "B - Y")).unwrap();
        writer.finish().unwrap();
        let content = fs_err::read_to_string(&path).unwrap();
        assert!(content.ends_with("}\n]\n"), "{content}");
        let parsed: Vec<ResolvedSong> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].url, "u2");
    }

    #[test]
    fn empty_arrays() {
        let dir = tempfile::tempdir().unwrap();
        for style in [ArrayStyle::TrailingComma, ArrayStyle::Strict] {
            let path = dir.path().join("empty.json");
            ResolvedSongWriter::create(&path, style)
                .unwrap()
                .finish()
                .unwrap();
            assert_eq!(fs_err::read_to_string(&path).unwrap(), "[\n]\n");
        }
    }

    #[test]
    fn create_truncates_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.json");
        fs_err::write(&path, "stale content that is much longer than the new one").unwrap();
        let writer = ResolvedSongWriter::create(&path, ArrayStyle::TrailingComma).unwrap();
        assert_eq!(fs_err::read_to_string(&path).unwrap(), "[\n");
        writer.finish().unwrap();
    }

    #[test]
    fn unfinished_array_keeps_written_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.json");
        let mut writer = ResolvedSongWriter::create(&path, ArrayStyle::TrailingComma).unwrap();
        writer.append(&song("u1", "A - X")).unwrap();
        drop(writer);
        assert_eq!(
            fs_err::read_to_string(&path).unwrap(),
            "[\n{\n    \"url\": \"u1\",\n    \"string\": \"A - X\"\n},\n"
        );
    }
}
