//! CSS, archive and snippet exports for processed fonts

use camino::{Utf8Path, Utf8PathBuf};
use eyre::{Result as EyreResult, WrapErr};
use localfont_css::{
    CssInJsSnippets, css_in_js_snippets, extract_remote_urls, extract_woff2_urls, inline_font_data,
    rewrite_to_prefix, tailwind_config,
};
use localfont_fetch::{Fetcher, FontArchive};
use tracing::info;

use crate::record::FontRecord;
use crate::{Error, FontSession};

/// How font URLs appear in an exported stylesheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssMode {
    /// The stylesheet exactly as fetched
    Original,
    /// Remote URLs replaced by `<prefix>/<font>/<file>`
    LocalPaths { prefix: String },
    /// Remote URLs replaced by base64 `data:` URLs where the fetch succeeded
    Inlined,
}

/// File name of an exported stylesheet: `Open Sans` → `open sans.css`
pub fn css_file_name(record: &FontRecord) -> String {
    format!("{}.css", record.display_name().to_lowercase())
}

/// Render the stylesheet of a populated record in the requested mode
pub async fn render_css(fetcher: &Fetcher, record: &FontRecord, mode: &CssMode) -> Result<String, Error> {
    let css = populated_stylesheet(record)?;
    let rendered = match mode {
        CssMode::Original => css.to_string(),
        CssMode::LocalPaths { prefix } => rewrite_to_prefix(css, record.display_name(), prefix),
        CssMode::Inlined => {
            let urls = extract_remote_urls(css);
            let assets = fetcher.fetch_inline_assets(&urls).await;
            info!(
                font = %record.display_name(),
                inlined = assets.len(),
                total = urls.len(),
                "inlined font data"
            );
            inline_font_data(css, &assets)
        }
    };
    Ok(rendered)
}

/// Download every WOFF2 file of a record into `<name>-fonts.zip` (in memory).
///
/// Any failure here is a download error, never attached to the slot.
pub async fn download_fonts(fetcher: &Fetcher, record: &FontRecord) -> Result<FontArchive, Error> {
    let css = populated_stylesheet(record)?;
    let urls = extract_woff2_urls(css);
    fetcher
        .download_archive(&urls, record.display_name())
        .await
        .map_err(|e| Error::Download(e.to_string()))
}

/// Styled-components / emotion wrappers for a record's stylesheet
pub fn css_in_js_for(record: &FontRecord) -> Result<CssInJsSnippets, Error> {
    Ok(css_in_js_snippets(populated_stylesheet(record)?))
}

/// Tailwind config covering every populated record in the session
pub fn tailwind_for(session: &FontSession) -> String {
    tailwind_config(session.family_names())
}

/// Write an exported stylesheet into `dir`, returning the written path
pub fn write_css(dir: &Utf8Path, record: &FontRecord, css: &str) -> EyreResult<Utf8PathBuf> {
    let path = dir.join(css_file_name(record));
    write_file(&path, css.as_bytes())?;
    Ok(path)
}

/// Write an archive into `dir` under its own file name
pub fn write_archive(dir: &Utf8Path, archive: &FontArchive) -> EyreResult<Utf8PathBuf> {
    let path = dir.join(&archive.file_name);
    write_file(&path, &archive.bytes)?;
    Ok(path)
}

fn write_file(path: &Utf8Path, contents: &[u8]) -> EyreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(path, contents).wrap_err_with(|| format!("failed to write {path}"))?;
    info!(path = %path, bytes = contents.len(), "wrote file");
    Ok(())
}

fn populated_stylesheet(record: &FontRecord) -> Result<&str, Error> {
    if record.is_populated() {
        Ok(record.raw_stylesheet())
    } else {
        Err(Error::input(format!("{} has not been processed yet", record.id())))
    }
}
