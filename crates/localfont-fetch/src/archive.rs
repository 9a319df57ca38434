//! Zip packaging of downloaded font files
//!
//! Entries live under a folder named after the archive:
//! `Inter-fonts.zip` → `Inter/UcC73Fwr....woff2`

use std::collections::HashSet;
use std::io::{Cursor, Write};

use localfont_css::file_name_from_url;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::FetchError;

/// A finished archive, ready to be written somewhere
#[derive(Debug, Clone)]
pub struct FontArchive {
    /// `<archive-name>-fonts.zip`
    pub file_name: String,
    /// Entry paths inside the archive, in insertion order
    pub entries: Vec<String>,
    /// The zip bytes
    pub bytes: Vec<u8>,
}

/// Name of the archive entry for a font URL.
///
/// Falls back to `<archive-name>.woff2` when the URL has no final path segment.
pub fn archive_entry_name(url: &str, archive_name: &str) -> String {
    file_name_from_url(url).unwrap_or_else(|| format!("{archive_name}.woff2"))
}

/// Pack `(url, bytes)` pairs into a zip with a single `<archive_name>/` folder.
///
/// When two URLs map to the same file name the first one wins.
pub fn build_archive(archive_name: &str, files: &[(String, Vec<u8>)]) -> Result<FontArchive, FetchError> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    writer.add_directory(format!("{archive_name}/"), options)?;

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(files.len());
    for (url, bytes) in files {
        let entry = format!("{archive_name}/{}", archive_entry_name(url, archive_name));
        if !seen.insert(entry.clone()) {
            tracing::warn!(url = %url, entry = %entry, "duplicate archive entry, skipping");
            continue;
        }
        writer.start_file(entry.as_str(), options)?;
        writer.write_all(bytes)?;
        entries.push(entry);
    }

    let bytes = writer.finish()?.into_inner();

    Ok(FontArchive {
        file_name: format!("{archive_name}-fonts.zip"),
        entries,
        bytes,
    })
}
