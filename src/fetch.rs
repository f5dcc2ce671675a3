//! Resilient page fetching.
//!
//! Landing pages for email campaigns rarely sit at the URL the message
//! links to: tracking services chain HTTP redirects, set cookies the
//! next hop requires, and some hops redirect from script or a meta
//! refresh tag instead of a status code. The fetcher follows all of
//! that manually, accumulating cookies across hops, and wraps the
//! whole chain in exponential-backoff retry for transient failures.
//!
//! Script and meta-refresh detection is best-effort pattern matching
//! over the body, not a script interpreter. When several patterns
//! match different targets, the fixed priority order below decides.

use log::{debug, warn};
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::{redirect, Client, StatusCode};
use url::Url;

use crate::error::{Error, Result};
use crate::extract::{extract_content, PageContent};
use crate::options::Options;
use crate::patterns;

/// Result of fetching the final rendered page behind a URL.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// URL of the last hop actually retrieved.
    pub final_url: String,
    /// Raw HTML of the final response.
    pub html: String,
    /// Extracted comparison content.
    pub content: PageContent,
}

/// Request-scoped cookie jar.
///
/// Holds the `name=value` segment of every `Set-Cookie` seen across
/// redirect hops, insertion-ordered, replacing by name. Cookies are
/// never dropped: a hop that sets nothing still gets everything
/// accumulated so far.
#[derive(Debug, Default)]
struct CookieJar {
    cookies: Vec<(String, String)>,
}

impl CookieJar {
    /// Store the name=value segment of one Set-Cookie header value,
    /// ignoring attributes (Path, Expires, and the rest).
    fn store(&mut self, header_value: &str) {
        let Some(pair) = header_value.split(';').next() else {
            return;
        };
        let Some((name, value)) = pair.split_once('=') else {
            return;
        };
        let name = name.trim();
        let value = value.trim();
        if name.is_empty() {
            return;
        }
        if let Some(existing) = self.cookies.iter_mut().find(|(n, _)| n == name) {
            existing.1 = value.to_string();
        } else {
            self.cookies.push((name.to_string(), value.to_string()));
        }
    }

    /// Serialize as a single `Cookie` header value, or `None` when empty.
    fn header_value(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(n, v)| format!("{n}={v}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// One response worth of data pulled out of reqwest before the body is
/// consumed.
struct HopResponse {
    status: StatusCode,
    location: Option<String>,
    body: String,
}

/// Fetches the final rendered HTML behind a URL.
pub struct Fetcher {
    client: Client,
    options: Options,
}

impl Fetcher {
    /// Build a fetcher from run options.
    ///
    /// Redirects are disabled at the client level; the hop loop in
    /// [`Fetcher::fetch`] follows them manually so cookies and
    /// script-based redirects are handled.
    pub fn new(options: &Options) -> Result<Self> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .user_agent(&options.user_agent)
            .timeout(options.request_timeout)
            .build()
            .map_err(|e| Error::Fetch {
                attempts: 0,
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            options: options.clone(),
        })
    }

    /// Fetch a URL, following redirects, with retry on transient failure.
    ///
    /// Retries up to `Options::max_retries` attempts with exponential
    /// backoff starting at `Options::retry_base_delay`. Only transient
    /// failures (connect/timeout/DNS errors, 5xx status) are retried;
    /// 4xx and parse failures surface immediately.
    pub async fn fetch(&self, url: &str) -> Result<FetchResult> {
        let start = Url::parse(url)
            .map_err(|e| Error::Input(format!("invalid target URL {url:?}: {e}")))?;

        let mut delay = self.options.retry_base_delay;
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.fetch_once(start.clone()).await {
                Ok(result) => return Ok(result),
                Err(FetchFailure { transient, message }) => {
                    if !transient || attempts >= self.options.max_retries {
                        return Err(Error::Fetch { attempts, message });
                    }
                    warn!(
                        "fetch attempt {attempts} failed ({message}), retrying in {delay:?}"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }

    /// One full redirect chain: request, follow hops, extract content.
    async fn fetch_once(&self, start: Url) -> std::result::Result<FetchResult, FetchFailure> {
        let mut current = start;
        let mut jar = CookieJar::default();
        let mut hop = HopResponse {
            status: StatusCode::OK,
            location: None,
            body: String::new(),
        };

        for hop_index in 0..=self.options.max_redirects {
            hop = self.request(&current, &mut jar).await?;

            if hop_index == self.options.max_redirects {
                // Hop cap reached: use the last response obtained.
                debug!("redirect cap reached at {current}, using last response");
                break;
            }

            let Some(target) = next_redirect_target(&hop) else {
                break;
            };
            match current.join(&target) {
                Ok(next) => {
                    debug!("redirect {current} -> {next}");
                    current = next;
                }
                Err(e) => {
                    debug!("unresolvable redirect target {target:?} at {current}: {e}");
                    break;
                }
            }
        }

        if hop.status.is_server_error() {
            return Err(FetchFailure {
                transient: true,
                message: format!("server error {} from {current}", hop.status),
            });
        }
        if hop.status.is_client_error() {
            return Err(FetchFailure {
                transient: false,
                message: format!("client error {} from {current}", hop.status),
            });
        }

        let content = extract_content(&hop.body, self.options.min_paragraph_len);
        Ok(FetchResult {
            final_url: current.to_string(),
            html: hop.body,
            content,
        })
    }

    /// Issue one request, forwarding accumulated cookies, and absorb
    /// any Set-Cookie headers from the response.
    async fn request(
        &self,
        url: &Url,
        jar: &mut CookieJar,
    ) -> std::result::Result<HopResponse, FetchFailure> {
        let mut request = self.client.get(url.clone());
        if let Some(cookie_header) = jar.header_value() {
            request = request.header(COOKIE, cookie_header);
        }

        let response = request.send().await.map_err(|e| FetchFailure {
            transient: is_transient(&e),
            message: format!("request to {url} failed: {e}"),
        })?;

        let status = response.status();
        for value in response.headers().get_all(SET_COOKIE) {
            if let Ok(value) = value.to_str() {
                jar.store(value);
            }
        }
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.text().await.map_err(|e| FetchFailure {
            transient: is_transient(&e),
            message: format!("reading body from {url} failed: {e}"),
        })?;

        Ok(HopResponse {
            status,
            location,
            body,
        })
    }
}

/// Internal failure carrying the transient/permanent classification.
struct FetchFailure {
    transient: bool,
    message: String,
}

/// Redirect statuses followed by the hop loop.
fn is_redirect_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

/// Determine the next hop target, if any.
///
/// Resolution order: `Location` header; then, for redirect statuses
/// without one, body patterns (`redirecturl` variable,
/// `window.location` assignment, `window.location.replace`, meta
/// refresh). A non-redirect status yields no target.
fn next_redirect_target(hop: &HopResponse) -> Option<String> {
    if !is_redirect_status(hop.status) {
        return None;
    }
    if let Some(location) = &hop.location {
        return Some(location.clone());
    }
    redirect_target_from_body(&hop.body)
}

/// Scan a response body for script or meta-refresh redirect targets.
fn redirect_target_from_body(body: &str) -> Option<String> {
    for pattern in [
        &patterns::REDIRECT_URL_VAR,
        &patterns::WINDOW_LOCATION,
        &patterns::LOCATION_REPLACE,
        &patterns::META_REFRESH,
    ] {
        if let Some(caps) = pattern.captures(body) {
            return Some(caps[1].to_string());
        }
    }
    None
}

/// Classify a reqwest error as transient (worth retrying) or not.
///
/// Connection resets, aborts, and DNS failures surface through
/// `is_connect`; timeouts through `is_timeout`. Body-decode and builder
/// errors are neither and fail immediately.
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}
