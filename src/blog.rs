//! Blog pages backed by a public posts API
//!
//! The blog has no storage of its own: the index and post pages fetch
//! `<base>/posts` and `<base>/posts/<slug>` on every request and reshape the
//! records for rendering. A failed fetch never fails the page. The loaders log
//! it and hand back no data, except for a missing post which the page layer
//! turns into a not-found page.

use log::{error, info};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("Post not found")]
    NotFound,

    #[error("Response status: {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Record shape returned by the upstream API
#[derive(Debug, Deserialize)]
struct RawPost {
    id: u64,
    title: String,
    body: String,
}

/// Entry on the blog index page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
}

/// A single post ready for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub title: String,
    pub content: String,
}

impl From<RawPost> for PostSummary {
    fn from(raw: RawPost) -> Self {
        PostSummary {
            slug: raw.id.to_string(),
            title: raw.title,
        }
    }
}

impl From<RawPost> for Post {
    fn from(raw: RawPost) -> Self {
        Post {
            title: raw.title,
            content: raw.body,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlogClient {
    http: Client,
    base_url: String,
}

impl BlogClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Use a preconfigured HTTP client, e.g. one with a proxy or timeout
    pub fn with_client(http: Client, base_url: &str) -> Self {
        BlogClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn posts_url(&self) -> String {
        format!("{}/posts", self.base_url)
    }

    fn post_url(&self, slug: &str) -> String {
        format!("{}/posts/{}", self.base_url, urlencoding::encode(slug))
    }

    /// Fetch every post and reduce it to a summary
    ///
    /// # Errors
    /// * `BlogError::Status` on a non-success response
    /// * `BlogError::Network` if the request or body read fails
    /// * `BlogError::Decode` if the body is not a list of posts
    pub async fn fetch_posts(&self) -> Result<Vec<PostSummary>, BlogError> {
        let response = self.http.get(self.posts_url()).send().await?;
        if !response.status().is_success() {
            return Err(BlogError::Status(response.status().as_u16()));
        }

        let bytes = response.bytes().await?;
        let posts: Vec<RawPost> = serde_json::from_slice(&bytes)?;

        Ok(posts.into_iter().map(PostSummary::from).collect())
    }

    /// Fetch a single post by slug
    ///
    /// A 404 from upstream, or a body that is `null` or an empty object, is
    /// reported as `BlogError::NotFound`.
    ///
    /// # Errors
    /// * `BlogError::NotFound` if the post does not exist
    /// * `BlogError::Status` on any other non-success response
    /// * `BlogError::Network` or `BlogError::Decode` on transport or body errors
    pub async fn fetch_post(&self, slug: &str) -> Result<Post, BlogError> {
        let response = self.http.get(self.post_url(slug)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(BlogError::NotFound),
            status if !status.is_success() => return Err(BlogError::Status(status.as_u16())),
            _ => {}
        }

        let bytes = response.bytes().await?;
        let data: Value = serde_json::from_slice(&bytes)?;
        if is_empty_record(&data) {
            return Err(BlogError::NotFound);
        }

        Ok(serde_json::from_value::<RawPost>(data)?.into())
    }

    /// Loader for the blog index page
    ///
    /// Any failure is logged and yields `None`, letting the page render
    /// without posts.
    pub async fn load_index(&self) -> Option<Vec<PostSummary>> {
        info!("Fetching data from API {}", self.posts_url());

        match self.fetch_posts().await {
            Ok(summaries) => {
                info!("Fetching data succeed with {} post(s)", summaries.len());
                Some(summaries)
            }
            Err(e) => {
                error!("{e}");
                None
            }
        }
    }

    /// Loader for a single post page
    ///
    /// Only `BlogError::NotFound` is returned as an error. Every other failure
    /// is logged and yields `Ok(None)`.
    pub async fn load_post(&self, slug: &str) -> Result<Option<Post>, BlogError> {
        info!("Fetching data from API {}", self.post_url(slug));

        match self.fetch_post(slug).await {
            Ok(post) => {
                info!("Fetching data succeed: {}", post.title);
                Ok(Some(post))
            }
            Err(BlogError::NotFound) => Err(BlogError::NotFound),
            Err(e) => {
                error!("{e}");
                Ok(None)
            }
        }
    }
}

fn is_empty_record(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_urls() {
        let client = BlogClient::new("http://upstream.test/");
        assert_eq!(client.base_url(), "http://upstream.test");
        assert_eq!(client.posts_url(), "http://upstream.test/posts");
        assert_eq!(client.post_url("7"), "http://upstream.test/posts/7");
        assert_eq!(client.post_url("a b/c"), "http://upstream.test/posts/a%20b%2Fc");
    }

    #[test]
    fn test_record_mapping() {
        let raw: RawPost = serde_json::from_value(json!({
            "userId": 1,
            "id": 3,
            "title": "ea molestias",
            "body": "et iusto sed"
        }))
        .unwrap();

        assert_eq!(
            Post::from(raw),
            Post {
                title: "ea molestias".to_string(),
                content: "et iusto sed".to_string(),
            }
        );

        let raw: RawPost =
            serde_json::from_value(json!({"id": 3, "title": "t", "body": "b"})).unwrap();
        assert_eq!(PostSummary::from(raw).slug, "3");
    }

    #[test]
    fn test_empty_record() {
        assert!(is_empty_record(&Value::Null));
        assert!(is_empty_record(&json!({})));
        assert!(!is_empty_record(&json!({"id": 1})));
    }
}
