// src/fetch.rs
use crate::errors::FetchError;
use crate::feed::{FeedId, PostSummary};
use crate::listing::ListingParser;
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

pub const DEFAULT_HOST: &str = "www.reddit.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn ok(body: &str) -> Self {
        Self { status: 200, body: body.to_string() }
    }

    pub fn status(status: u16) -> Self {
        Self { status, body: String::new() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ===== source
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// One GET request. Only transport failures are errors; any status is a response.
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError>;
}

// ===== Live http source
pub struct HttpFeedSource {
    client: Client,
}

impl HttpFeedSource {
    pub fn new() -> Result<Self, FetchError> {
        const APP_USER_AGENT: &str = concat!(
            "redlanes/",
            env!("CARGO_PKG_VERSION"),
            " (terminal subreddit dashboard)"
        );

        let client: Client = reqwest::Client::builder().user_agent(APP_USER_AGENT).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError> {
        info!("HttpFeedSource: fetching {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("HttpFeedSource: {} answered {} ({} bytes)", url, status, body.len());
        Ok(RawResponse { status, body })
    }
}

// ===== Fake source for testing
#[derive(Default)]
pub struct FakeSource {
    responses: HashMap<String, Result<RawResponse, FetchError>>,
    requests: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, response: RawResponse) -> Self {
        self.responses.insert(url.to_string(), Ok(response));
        self
    }

    pub fn fail(mut self, url: &str, error: FetchError) -> Self {
        self.responses.insert(url.to_string(), Err(error));
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl FeedSource for FakeSource {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        self.responses.get(url).cloned().unwrap_or_else(|| Ok(RawResponse::status(404)))
    }
}

// ===== fetcher
pub struct FeedFetcher {
    base: Url,
    source: Arc<dyn FeedSource>,
    parser: ListingParser,
}

impl FeedFetcher {
    pub fn new(host: &str, source: Arc<dyn FeedSource>) -> Result<Self, url::ParseError> {
        let base = Url::parse(&format!("https://{}/", host))?;
        Ok(Self { base, source, parser: ListingParser::new() })
    }

    pub fn with_parser(mut self, parser: ListingParser) -> Self {
        self.parser = parser;
        self
    }

    /// `https://<host>/r/<id>.json`
    pub fn listing_url(&self, id: &FeedId) -> String {
        let file = format!("{}.json", id.as_str());
        self.url_for(&["r", file.as_str()])
    }

    /// `https://<host>/r/<id>/about.json`
    pub fn about_url(&self, id: &FeedId) -> String {
        self.url_for(&["r", id.as_str(), "about.json"])
    }

    fn url_for(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.clear().extend(segments);
        }
        url.to_string()
    }

    pub async fn fetch_posts(&self, id: &FeedId) -> Result<Vec<PostSummary>, FetchError> {
        let url = self.listing_url(id);
        let response = self.source.get(&url).await?;
        if !response.is_success() {
            warn!("FeedFetcher: {} answered HTTP {}", url, response.status);
            return Err(FetchError::Http(response.status));
        }
        let posts = self.parser.parse_posts(&response.body)?;
        info!("FeedFetcher: r/{} returned {} posts", id, posts.len());
        Ok(posts)
    }

    pub async fn verify_exists(&self, id: &FeedId) -> Result<(), FetchError> {
        let url = self.about_url(id);
        let response = self.source.get(&url).await?;
        if !response.is_success() {
            return Err(FetchError::NotFound);
        }
        self.parser.check_about(&response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> FeedId {
        FeedId::parse(name).unwrap()
    }

    fn fetcher(source: FakeSource) -> (FeedFetcher, Arc<FakeSource>) {
        let source = Arc::new(source);
        let fetcher = FeedFetcher::new(DEFAULT_HOST, source.clone()).unwrap();
        (fetcher, source)
    }

    #[test]
    fn urls_follow_endpoint_layout() {
        let (fetcher, _) = fetcher(FakeSource::new());
        assert_eq!(fetcher.listing_url(&id("rust")), "https://www.reddit.com/r/rust.json");
        assert_eq!(fetcher.about_url(&id("rust")), "https://www.reddit.com/r/rust/about.json");
    }

    #[test]
    fn identifiers_are_percent_encoded() {
        let (fetcher, _) = fetcher(FakeSource::new());
        assert_eq!(fetcher.listing_url(&id("a b/c")), "https://www.reddit.com/r/a%20b%2Fc.json");
    }

    #[tokio::test]
    async fn fetch_posts_returns_posts_in_order() {
        let body = r#"{"data":{"children":[
            {"data":{"title":"one","author":"a","score":3,"num_comments":0,"permalink":"/1"}},
            {"data":{"title":"two","author":"b","score":9,"num_comments":2,"permalink":"/2"}}
        ]}}"#;
        let (fetcher, source) = fetcher(
            FakeSource::new().respond("https://www.reddit.com/r/rust.json", RawResponse::ok(body)),
        );

        let posts = fetcher.fetch_posts(&id("rust")).await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title(), "one");
        assert_eq!(source.requests().len(), 1);
    }

    #[tokio::test]
    async fn fetch_posts_reports_http_status() {
        let (fetcher, _) = fetcher(FakeSource::new());
        let err = fetcher.fetch_posts(&id("nope")).await.unwrap_err();
        assert_eq!(err, FetchError::Http(404));
        assert_eq!(err.to_string(), "HTTP 404");
    }

    #[tokio::test]
    async fn fetch_posts_rejects_unwrapped_body() {
        let (fetcher, _) = fetcher(
            FakeSource::new()
                .respond("https://www.reddit.com/r/rust.json", RawResponse::ok(r#"{"kind":"x"}"#)),
        );
        let err = fetcher.fetch_posts(&id("rust")).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid response");
    }

    #[tokio::test]
    async fn fetch_posts_passes_transport_errors_through() {
        let (fetcher, _) = fetcher(FakeSource::new().fail(
            "https://www.reddit.com/r/rust.json",
            FetchError::Network("connection reset".to_string()),
        ));
        let err = fetcher.fetch_posts(&id("rust")).await.unwrap_err();
        assert_eq!(err, FetchError::Network("connection reset".to_string()));
    }

    #[tokio::test]
    async fn verify_exists_contract() {
        let about = "https://www.reddit.com/r/rust/about.json";
        let user = "https://www.reddit.com/r/someone/about.json";
        let (fetcher, _) = fetcher(
            FakeSource::new()
                .respond(about, RawResponse::ok(r#"{"kind":"t5"}"#))
                .respond(user, RawResponse::ok(r#"{"kind":"t2"}"#)),
        );

        assert_eq!(fetcher.verify_exists(&id("rust")).await, Ok(()));
        assert_eq!(fetcher.verify_exists(&id("someone")).await, Err(FetchError::NotASubreddit));
        let missing = fetcher.verify_exists(&id("missing")).await.unwrap_err();
        assert_eq!(missing.to_string(), "Not found");
    }
}
