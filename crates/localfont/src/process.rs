//! Fetch + parse pipeline feeding the session

use std::time::Instant;

use futures_util::future::join_all;
use localfont_css::{estimate_size_kb, parse_stylesheet};
use localfont_fetch::Fetcher;
use tracing::{debug, info, warn};

use crate::record::{FontId, ParsedFont};
use crate::{Error, FontSession};

/// Fetch a stylesheet and extract its metadata.
///
/// Touches no session state; the caller merges the result with
/// [`FontSession::apply_result`].
pub async fn fetch_and_parse(fetcher: &Fetcher, url: &str) -> Result<ParsedFont, Error> {
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::input("please provide a Google Fonts URL"));
    }

    let start = Instant::now();
    let stylesheet = fetcher.fetch_stylesheet(url).await?;
    let info = parse_stylesheet(&stylesheet)?;

    debug!(
        family = %info.family,
        weights = ?info.weights,
        variable = info.is_variable,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "parsed stylesheet"
    );

    Ok(ParsedFont {
        source_url: url.to_string(),
        estimated_size_kb: estimate_size_kb(&stylesheet),
        stylesheet,
        info,
    })
}

/// Process one slot and store the outcome in it.
///
/// The returned error (if any) has already been recorded on the slot.
pub async fn process_font(session: &mut FontSession, fetcher: &Fetcher, id: FontId) -> Result<(), Error> {
    let url = session
        .get(id)
        .map(|record| record.source_url().to_string())
        .ok_or_else(|| Error::input(format!("no such font slot: {id}")))?;

    let result = fetch_and_parse(fetcher, &url).await;
    session.apply_result(id, &result)?;
    log_outcome(id, &result);
    result.map(|_| ())
}

/// Process several slots concurrently.
///
/// Fetches run in parallel; results are merged one at a time once all of
/// them have settled. A failure only affects its own slot.
pub async fn process_all(
    session: &mut FontSession,
    fetcher: &Fetcher,
    ids: &[FontId],
) -> Vec<(FontId, Result<(), Error>)> {
    let jobs: Vec<(FontId, Option<String>)> = ids
        .iter()
        .map(|&id| (id, session.get(id).map(|r| r.source_url().to_string())))
        .collect();

    let results = join_all(jobs.into_iter().map(|(id, url)| async move {
        let result = match url {
            Some(url) => fetch_and_parse(fetcher, &url).await,
            None => Err(Error::input(format!("no such font slot: {id}"))),
        };
        (id, result)
    }))
    .await;

    let mut outcomes = Vec::with_capacity(results.len());
    for (id, result) in results {
        // Slot may have disappeared; that's the only way apply can fail
        if let Err(e) = session.apply_result(id, &result) {
            outcomes.push((id, Err(e)));
            continue;
        }
        log_outcome(id, &result);
        outcomes.push((id, result.map(|_| ())));
    }
    outcomes
}

fn log_outcome(id: FontId, result: &Result<ParsedFont, Error>) {
    match result {
        Ok(parsed) => info!(
            %id,
            family = %parsed.info.family,
            size_kb = parsed.estimated_size_kb,
            "font processed"
        ),
        Err(e) => warn!(%id, kind = ?e.kind(), error = %e, "font processing failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use localfont_fetch::FetchOptions;

    #[tokio::test]
    async fn test_empty_url_is_input_error() {
        let fetcher = Fetcher::new(FetchOptions::default()).unwrap();
        let err = fetch_and_parse(&fetcher, "   ").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[tokio::test]
    async fn test_disallowed_host_recorded_on_slot() {
        let fetcher = Fetcher::new(FetchOptions::default()).unwrap();
        let mut session = FontSession::default();
        let id = session.add_font();
        session.set_source_url(id, "https://example.com/font.css").unwrap();

        let err = process_font(&mut session, &fetcher, id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);

        let record = session.get(id).unwrap();
        assert_eq!(record.last_error(), Some(err.to_string().as_str()));
        assert!(!record.is_populated());
    }

    #[tokio::test]
    async fn test_missing_slot() {
        let fetcher = Fetcher::new(FetchOptions::default()).unwrap();
        let mut session = FontSession::default();
        let id = session.add_font();
        session.remove_font(id);

        let outcomes = process_all(&mut session, &fetcher, &[id]).await;
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].1.as_ref().unwrap_err().kind(), ErrorKind::Input);
    }
}
