use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::api::ApiClient;
use crate::config::Config;
use crate::model::ImageSource;

#[derive(Debug, Clone, PartialEq)]
pub struct FoundImage {
    pub url: String,
    pub source: ImageSource,
}

/// One step of the fallback chain. `Ok(None)` means "nothing here, try the next step".
pub trait ImageProvider {
    fn name(&self) -> &'static str;
    fn find(&self, name: &str, country: Option<&str>) -> Result<Option<FoundImage>>;
}

#[derive(Debug, Deserialize)]
struct SummaryImage {
    source: String,
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(default)]
    thumbnail: Option<SummaryImage>,
    #[serde(default)]
    originalimage: Option<SummaryImage>,
}

/// Maps and flags are SVGs; they make poor city photos.
fn usable_image_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http") && !lower.ends_with(".svg") && !lower.contains(".svg/")
}

/// Free lookup against the Wikipedia page-summary API.
pub struct WikipediaProvider {
    http: Client,
    base_url: String,
}

impl WikipediaProvider {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("trip_spotlight/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Unable to create HTTP client")?;

        let mut base_url = config.wikipedia_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self { http, base_url })
    }

    pub fn page_url(&self, name: &str) -> Result<reqwest::Url> {
        let title = name.split_whitespace().collect::<Vec<_>>().join("_");
        let mut url = reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("Invalid Wikipedia URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Wikipedia URL cannot be a base: {}", self.base_url))?
            .pop_if_empty()
            .push(&title);
        Ok(url)
    }
}

impl ImageProvider for WikipediaProvider {
    fn name(&self) -> &'static str {
        "wikipedia"
    }

    fn find(&self, name: &str, _country: Option<&str>) -> Result<Option<FoundImage>> {
        let response = self
            .http
            .get(self.page_url(name)?)
            .send()
            .context("Failed to query Wikipedia")?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let summary: PageSummary = response
            .error_for_status()
            .context("Wikipedia request returned error status")?
            .json()
            .context("Failed to parse Wikipedia summary JSON")?;

        let url = summary
            .thumbnail
            .into_iter()
            .chain(summary.originalimage)
            .map(|i| i.source)
            .find(|u| usable_image_url(u));

        Ok(url.map(|url| FoundImage {
            url,
            source: ImageSource::Wikipedia,
        }))
    }
}

/// Backend proxy: server-side cache first, then the paid places API.
pub struct BackendProvider<'a> {
    client: &'a ApiClient,
}

impl<'a> BackendProvider<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }
}

pub fn parse_source(source: Option<&str>) -> ImageSource {
    match source.map(str::trim) {
        Some("wikipedia") => ImageSource::Wikipedia,
        _ => ImageSource::GooglePlaces,
    }
}

impl ImageProvider for BackendProvider<'_> {
    fn name(&self) -> &'static str {
        "backend"
    }

    fn find(&self, name: &str, country: Option<&str>) -> Result<Option<FoundImage>> {
        let resp = self
            .client
            .city_image(name, country)
            .context("City image proxy request failed")?;

        Ok(resp
            .image_url
            .filter(|u| !u.trim().is_empty())
            .map(|url| FoundImage {
                url,
                source: parse_source(resp.source.as_deref()),
            }))
    }
}
