//! HTTP fetching with host policy, timeouts and cancellation

use std::collections::HashMap;
use std::time::{Duration, Instant};

use futures_util::future::{join_all, try_join_all};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use url::Url;

use crate::FetchError;
use crate::archive::{FontArchive, build_archive};

/// The only stylesheet host accepted by default
pub const GOOGLE_FONTS_HOST: &str = "fonts.googleapis.com";

/// Per-request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Browser-like User-Agent.
///
/// Google Fonts picks the font format from the User-Agent; anything that
/// doesn't look like a modern browser gets TTF instead of WOFF2.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Options for the HTTP client
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Hosts stylesheets may be fetched from
    pub allowed_hosts: Vec<String>,
    /// Timeout applied to each request, body included
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            allowed_hosts: vec![GOOGLE_FONTS_HOST.to_string()],
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allowed_hosts(mut self, hosts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.allowed_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP client for stylesheets and font files
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    options: FetchOptions,
    cancel: CancellationToken,
}

impl Fetcher {
    pub fn new(options: FetchOptions) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            options,
            cancel: CancellationToken::new(),
        })
    }

    /// Use an externally owned cancellation token
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that aborts every in-flight and future request of this fetcher
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Validate a stylesheet URL against the host policy
    pub fn check_stylesheet_url(&self, url: &str) -> Result<Url, FetchError> {
        let parsed = Url::parse(url.trim()).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "{url}: unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl(format!("{url}: missing host")))?;

        let allowed = self
            .options
            .allowed_hosts
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(host));
        if !allowed {
            return Err(FetchError::DisallowedHost {
                host: host.to_string(),
            });
        }

        Ok(parsed)
    }

    /// Fetch a stylesheet's text after checking the host policy
    pub async fn fetch_stylesheet(&self, url: &str) -> Result<String, FetchError> {
        let parsed = self.check_stylesheet_url(url)?;
        let url = parsed.as_str();

        let start = Instant::now();
        let css = self
            .guarded(url, async {
                let response = self.send(url).await?;
                response
                    .text()
                    .await
                    .map_err(|e| FetchError::from_reqwest(url, e, self.options.timeout))
            })
            .await?;

        info!(
            url,
            bytes = css.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fetched stylesheet"
        );
        Ok(css)
    }

    /// Fetch a binary asset
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let start = Instant::now();
        let bytes = self
            .guarded(url, async {
                let response = self.send(url).await?;
                response
                    .bytes()
                    .await
                    .map(|b| b.to_vec())
                    .map_err(|e| FetchError::from_reqwest(url, e, self.options.timeout))
            })
            .await?;

        info!(
            url,
            bytes = bytes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fetched asset"
        );
        Ok(bytes)
    }

    /// Download all `urls` concurrently and pack them into `<archive_name>-fonts.zip`.
    ///
    /// All-or-nothing: the first failure aborts the remaining requests and no
    /// archive is produced. Repeated URLs are fetched once.
    pub async fn download_archive(
        &self,
        urls: &[String],
        archive_name: &str,
    ) -> Result<FontArchive, FetchError> {
        let mut unique: Vec<&str> = Vec::new();
        for url in urls {
            if !unique.contains(&url.as_str()) {
                unique.push(url.as_str());
            }
        }
        if unique.is_empty() {
            return Err(FetchError::NoAssets);
        }

        info!(
            files = unique.len(),
            archive = archive_name,
            "downloading font files"
        );

        let downloads = unique.iter().map(|url| async move {
            let bytes = self.fetch_bytes(url).await?;
            Ok::<_, FetchError>((url.to_string(), bytes))
        });

        let files = try_join_all(downloads).await.map_err(|e| {
            warn!(error = %e, archive = archive_name, "font download failed");
            FetchError::Download(Box::new(e))
        })?;

        let name = archive_name.to_string();
        let archive = tokio::task::spawn_blocking(move || build_archive(&name, &files))
            .await
            .map_err(|e| FetchError::Archive(format!("task join error: {e}")))??;

        info!(
            file_name = %archive.file_name,
            entries = archive.entries.len(),
            bytes = archive.bytes.len(),
            "built font archive"
        );
        Ok(archive)
    }

    /// Fetch assets for inlining. Best effort: failures are logged and left out.
    pub async fn fetch_inline_assets(&self, urls: &[String]) -> HashMap<String, Vec<u8>> {
        let results = join_all(urls.iter().map(|url| async move {
            (url.clone(), self.fetch_bytes(url).await)
        }))
        .await;

        let mut assets = HashMap::new();
        for (url, result) in results {
            match result {
                Ok(bytes) => {
                    assets.insert(url, bytes);
                }
                Err(e) => warn!(url = %url, error = %e, "could not inline asset"),
            }
        }
        assets
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e, self.options.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    /// Race `fut` against the timeout and the cancellation token
    async fn guarded<T>(
        &self,
        url: &str,
        fut: impl Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(FetchError::Cancelled { url: url.to_string() }),
            result = tokio::time::timeout(self.options.timeout, fut) => match result {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout {
                    url: url.to_string(),
                    after: self.options.timeout,
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> Fetcher {
        Fetcher::new(FetchOptions::default()).unwrap()
    }

    #[test]
    fn test_accepts_google_fonts_url() {
        let url = fetcher()
            .check_stylesheet_url("https://fonts.googleapis.com/css2?family=Inter:wght@400;700&display=swap")
            .unwrap();
        assert_eq!(url.host_str(), Some("fonts.googleapis.com"));
    }

    #[test]
    fn test_rejects_other_hosts() {
        let err = fetcher()
            .check_stylesheet_url("https://example.com/fonts.css")
            .unwrap_err();
        assert!(matches!(err, FetchError::DisallowedHost { ref host } if host == "example.com"));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_rejects_lookalike_hosts() {
        let err = fetcher()
            .check_stylesheet_url("https://fonts.googleapis.com.evil.test/css2")
            .unwrap_err();
        assert!(matches!(err, FetchError::DisallowedHost { .. }));
    }

    #[test]
    fn test_rejects_malformed_and_non_http() {
        assert!(matches!(
            fetcher().check_stylesheet_url("not a url"),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(
            fetcher().check_stylesheet_url("ftp://fonts.googleapis.com/css2"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_custom_allowed_hosts() {
        let fetcher =
            Fetcher::new(FetchOptions::new().allowed_hosts(["127.0.0.1", "fonts.example.org"]))
                .unwrap();
        assert!(fetcher.check_stylesheet_url("http://127.0.0.1:8080/css").is_ok());
        assert!(fetcher.check_stylesheet_url("https://FONTS.example.org/css").is_ok());
        assert!(
            fetcher
                .check_stylesheet_url("https://fonts.googleapis.com/css2")
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_empty_batch_has_no_assets() {
        let err = fetcher().download_archive(&[], "Inter").await.unwrap_err();
        assert!(matches!(err, FetchError::NoAssets));
    }
}
