// Blog API client
//
// The remote API is an opaque JSON source with two endpoints:
// - GET {api_base}/api/blogs/      -> list of posts
// - GET {api_base}/api/blogs/{id}  -> one post with long-form content
//
// Everything the UI needs goes through the `BlogSource` trait so the demo
// source and test doubles can stand in for the HTTP client.

mod error;
mod models;

pub use error::FetchError;
pub use models::{BlogDetail, BlogPost, DetailInfo, ImageRef};

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Anything that can serve blog posts
pub trait BlogSource: Send + Sync {
    /// Short name for logs and the status bar
    fn name(&self) -> &str;

    /// Fetch the post list
    fn list(&self) -> BoxFuture<'_, Result<Vec<BlogPost>, FetchError>>;

    /// Fetch the full content of one post
    fn detail<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<BlogDetail, FetchError>>;
}

/// Shared handle passed to background fetch tasks
pub type SharedSource = Arc<dyn BlogSource>;

/// HTTP implementation of [`BlogSource`]
pub struct HttpBlogSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBlogSource {
    /// Create a client for the given API base (e.g. `https://host`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!("Blog API client ready: {}", base_url);

        Ok(Self { client, base_url })
    }

    fn list_url(&self) -> String {
        format!("{}/api/blogs/", self.base_url)
    }

    fn detail_url(&self, id: &str) -> String {
        format!("{}/api/blogs/{}", self.base_url, id)
    }

    /// GET a URL and decode its JSON body, mapping non-2xx to `FetchError::Http`
    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, FetchError> {
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

impl BlogSource for HttpBlogSource {
    fn name(&self) -> &str {
        &self.base_url
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<BlogPost>, FetchError>> {
        Box::pin(self.get_json(self.list_url()))
    }

    fn detail<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<BlogDetail, FetchError>> {
        Box::pin(self.get_json(self.detail_url(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    /// Serve `router` on an ephemeral port, returning its base URL
    async fn spawn_api(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn post_json(id: &str, author: &str) -> Value {
        json!({
            "_id": id,
            "title": format!("Post {}", id),
            "authorName": author,
            "authorRole": "Writer",
            "slug": format!("post-{}", id),
            "smallDescription": "Short",
            "image": { "url": "https://cdn.example/thumb.png", "fileName": "thumb.png" }
        })
    }

    fn client(base: &str) -> HttpBlogSource {
        HttpBlogSource::new(base, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn lists_posts() {
        let router = Router::new().route(
            "/api/blogs/",
            get(|| async { Json(json!([post_json("a", "Ada Lovelace"), post_json("b", "Alan Turing")])) }),
        );
        let base = spawn_api(router).await;

        let posts = client(&base).list().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].tab_label(), "Alan");
    }

    #[tokio::test]
    async fn empty_list_is_ok() {
        let router = Router::new().route("/api/blogs/", get(|| async { Json(json!([])) }));
        let base = spawn_api(router).await;

        assert!(client(&base).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetches_detail_by_id() {
        let router = Router::new().route(
            "/api/blogs/:id",
            get(|Path(id): Path<String>| async move {
                let mut body = post_json(&id, "Grace Hopper");
                body["largeImage"] = json!({ "url": "https://cdn.example/large.png", "fileName": "large.png" });
                body["detailInfo"] = json!([{ "title": "Intro", "paragraph": "Once upon a time" }]);
                Json(body)
            }),
        );
        let base = spawn_api(router).await;

        let detail = client(&base).detail("xyz").await.unwrap();
        assert_eq!(detail.post.id, "xyz");
        assert_eq!(detail.banner_url(), "https://cdn.example/large.png");
        assert_eq!(detail.detail_info[0].title, "Intro");
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let router = Router::new().route(
            "/api/blogs/",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = spawn_api(router).await;

        let err = client(&base).list().await.unwrap_err();
        assert_eq!(err, FetchError::Http { status: 500 });
    }

    #[tokio::test]
    async fn missing_post_is_http_error() {
        let router = Router::new().route("/api/blogs/", get(|| async { Json(json!([])) }));
        let base = spawn_api(router).await;

        let err = client(&base).detail("nope").await.unwrap_err();
        assert_eq!(err, FetchError::Http { status: 404 });
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let router = Router::new().route(
            "/api/blogs/",
            get(|| async { Json(json!({ "not": "a list" })) }),
        );
        let base = spawn_api(router).await;

        let err = client(&base).list().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}", addr)).list().await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }

    #[test]
    fn trailing_slash_in_base_is_normalized() {
        let source = client("https://blogs.example/");
        assert_eq!(source.list_url(), "https://blogs.example/api/blogs/");
        assert_eq!(source.detail_url("42"), "https://blogs.example/api/blogs/42");
    }
}
