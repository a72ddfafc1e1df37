//! Web page scanning for video links
//!
//! Pages are fetched with a single shared HTTP client. Requests run on a
//! private current-thread runtime and block the caller until they finish
//! or hit the configured timeout.

use crate::discovery::{has_video_extension, size_to_human, type_from_name, VideoRecord};
use crate::utils::config::NetworkConfig;
use crate::utils::error::{IntoPlayerError, Result, TPlayerError};
use log::{debug, error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, Url};
use std::time::Duration;
use tokio::runtime::Runtime;

/// `href="..."` or `href='...'`, any case. This is a text match, not a
/// markup parse: attributes inside comments or scripts match as well.
static HREF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)href=["']([^"']+)["']"#).expect("valid href pattern"));

/// Metadata for a single remote video, from one HEAD request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub name: String,
    pub url: String,
    pub type_tag: String,
    pub content_type: String,
    pub size: Option<String>,
}

/// Network session used to scan pages and probe remote media.
pub struct UrlScanner {
    session: Option<Session>,
}

struct Session {
    runtime: Runtime,
    client: Client,
}

impl UrlScanner {
    /// Open the HTTP session
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .network_err("Failed to create HTTP runtime")?;

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .network_err("Failed to create HTTP client")?;

        Ok(Self {
            session: Some(Session { runtime, client }),
        })
    }

    /// Fetch `url` and list the video links it contains.
    ///
    /// Transport failures and non-2xx statuses yield an empty list.
    pub fn scan_url(&self, url: &str) -> Vec<VideoRecord> {
        info!("Scanning URL for videos: {}", url);

        let base = match Url::parse(url) {
            Ok(base) => base,
            Err(e) => {
                error!("Invalid URL '{}': {}", url, e);
                return Vec::new();
            }
        };

        let page = match self.fetch_page(base.clone()) {
            Ok(page) => page,
            Err(e) => {
                error!("Request error while scanning URL: {}", e);
                return Vec::new();
            }
        };

        let videos: Vec<VideoRecord> = extract_video_links(&page, &base)
            .into_iter()
            .filter_map(|(name, full_url)| {
                let size = self.probe_size(&full_url).unwrap_or_default();
                VideoRecord::new(name, full_url.to_string(), size)
            })
            .collect();

        info!("Found {} video files", videos.len());
        videos
    }

    /// Whether `url` points straight at a video.
    ///
    /// A recognized extension answers without touching the network;
    /// otherwise the answer is the HEAD response's content type.
    pub fn is_direct_video(&self, url: &str) -> bool {
        debug!("Checking if URL is video: {}", url);

        if has_video_extension(url) {
            debug!("Video detected by extension: {}", url);
            return true;
        }

        match self.head(url) {
            Ok(response) => {
                let content_type = header_text(&response, CONTENT_TYPE).to_lowercase();
                debug!("Content type: {}", content_type);
                content_type.starts_with("video/")
            }
            Err(e) => {
                debug!("Error checking content type: {}", e);
                false
            }
        }
    }

    /// Name, type and size of a remote video
    pub fn get_video_info(&self, url: &str) -> Option<VideoInfo> {
        let response = match self.head(url) {
            Ok(response) => response,
            Err(e) => {
                error!("Error getting video info: {}", e);
                return None;
            }
        };

        let name = filename_from_link(url);
        Some(VideoInfo {
            type_tag: type_from_name(&name),
            url: url.to_string(),
            content_type: header_text(&response, CONTENT_TYPE),
            size: content_length(&response).map(size_to_human),
            name,
        })
    }

    /// Close the session. Later requests fail soft.
    pub fn cleanup(&mut self) {
        if self.session.take().is_some() {
            info!("URL scanner session closed");
        }
    }

    fn session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| TPlayerError::Network("URL scanner session is closed".to_string()))
    }

    fn fetch_page(&self, url: Url) -> Result<String> {
        let session = self.session()?;
        session.runtime.block_on(async {
            let response = session.client.get(url).send().await?.error_for_status()?;
            Ok::<String, TPlayerError>(response.text().await?)
        })
    }

    fn head(&self, url: &str) -> Result<reqwest::Response> {
        let session = self.session()?;
        Ok(session
            .runtime
            .block_on(session.client.head(url).send())?)
    }

    fn probe_size(&self, url: &Url) -> Option<String> {
        match self.head(url.as_str()) {
            Ok(response) => content_length(&response).map(size_to_human),
            Err(e) => {
                debug!("Could not get file size for {}: {}", url, e);
                None
            }
        }
    }
}

/// Video links in `page`, resolved against `base`, with display names.
pub fn extract_video_links(page: &str, base: &Url) -> Vec<(String, Url)> {
    HREF_PATTERN
        .captures_iter(page)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|link| has_video_extension(link))
        .filter_map(|link| match base.join(link) {
            Ok(full_url) => Some((filename_from_link(link), full_url)),
            Err(e) => {
                error!("Error processing video link '{}': {}", link, e);
                None
            }
        })
        .collect()
}

/// Last path segment of `link`, or the link itself when that is empty
pub fn filename_from_link(link: &str) -> String {
    let path = link.split(['?', '#']).next().unwrap_or(link);
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => link.to_string(),
    }
}

fn header_text(response: &reqwest::Response, name: reqwest::header::HeaderName) -> String {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn content_length(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
