// Demo mode: serve canned posts instead of calling the blog API
//
// Lets the TUI be showcased (and tested) without network access. Latency is
// simulated so the loading skeletons are visible.
//
// Run with: BLOGDECK_DEMO=1 cargo run --release   (or `blogdeck --demo`)

use crate::api::{BlogDetail, BlogPost, BlogSource, DetailInfo, FetchError, ImageRef};
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::sleep;

/// In-memory blog source
pub struct DemoSource {
    posts: Vec<BlogDetail>,
    latency: Duration,
    list_failure: Option<FetchError>,
    detail_failure: Option<FetchError>,
    list_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl DemoSource {
    /// Demo source with the bundled posts
    pub fn new(latency: Duration) -> Self {
        Self::with_posts(demo_posts(), latency)
    }

    /// Demo source serving the given posts
    pub fn with_posts(posts: Vec<BlogDetail>, latency: Duration) -> Self {
        Self {
            posts,
            latency,
            list_failure: None,
            detail_failure: None,
            list_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
        }
    }

    /// Make every list request fail with `err`
    #[allow(dead_code)] // Failure injection for tests
    pub fn failing_list(mut self, err: FetchError) -> Self {
        self.list_failure = Some(err);
        self
    }

    /// Make every detail request fail with `err`
    #[allow(dead_code)] // Failure injection for tests
    pub fn failing_detail(mut self, err: FetchError) -> Self {
        self.detail_failure = Some(err);
        self
    }

    /// Number of list requests served so far
    #[allow(dead_code)]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of detail requests served so far
    #[allow(dead_code)]
    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

impl BlogSource for DemoSource {
    fn name(&self) -> &str {
        "demo"
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<BlogPost>, FetchError>> {
        Box::pin(async move {
            let n = self.list_calls.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::debug!("Demo list request #{}", n);
            sleep(self.latency).await;

            if let Some(err) = &self.list_failure {
                return Err(err.clone());
            }
            Ok(self.posts.iter().map(|d| d.post.clone()).collect())
        })
    }

    fn detail<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<BlogDetail, FetchError>> {
        Box::pin(async move {
            let n = self.detail_calls.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::debug!("Demo detail request #{} for {}", n, id);
            sleep(self.latency).await;

            if let Some(err) = &self.detail_failure {
                return Err(err.clone());
            }
            self.posts
                .iter()
                .find(|d| d.post.id == id)
                .cloned()
                .ok_or(FetchError::Http { status: 404 })
        })
    }
}

/// Build a post with a thumbnail named after its id
pub fn demo_post(id: &str, title: &str, author: &str, role: &str, summary: &str) -> BlogPost {
    BlogPost {
        id: id.to_string(),
        title: title.to_string(),
        author_name: author.to_string(),
        author_role: role.to_string(),
        slug: title.to_lowercase().replace(' ', "-"),
        small_description: summary.to_string(),
        image: ImageRef {
            url: format!("https://images.example/{}.jpg", id),
            file_name: format!("{}.jpg", id),
        },
    }
}

fn section(title: &str, paragraph: &str) -> DetailInfo {
    DetailInfo {
        title: title.to_string(),
        paragraph: paragraph.to_string(),
    }
}

/// The bundled demo posts
pub fn demo_posts() -> Vec<BlogDetail> {
    vec![
        BlogDetail {
            post: demo_post(
                "6650a1",
                "Small Models, Big Wins",
                "Priya Raman",
                "ML Engineer",
                "Why compact models keep beating large ones on latency-bound workloads.",
            ),
            large_image: Some(ImageRef {
                url: "https://images.example/6650a1-large.jpg".to_string(),
                file_name: "6650a1-large.jpg".to_string(),
            }),
            detail_info: vec![
                section(
                    "The latency budget",
                    "Most production inference runs against a hard budget. A model that \
                     answers in 40ms is often worth more than one that is two points better \
                     on a benchmark but takes half a second.",
                ),
                section(
                    "Distillation in practice",
                    "We trained a small model on the large model's soft labels and kept the \
                     tokenizer fixed. It kept 94% of quality at a tenth of the cost.",
                ),
                section(
                    "What we would do again",
                    "Measure on real traffic early. Synthetic evaluations flattered both \
                     models equally and hid the tail latency problem.",
                ),
            ],
        },
        BlogDetail {
            post: demo_post(
                "6650b2",
                "Vector Search Without Tears",
                "Marcus Okafor",
                "Staff Engineer",
                "A pragmatic guide to choosing an index before you need one.",
            ),
            large_image: None,
            detail_info: vec![
                section(
                    "Start with brute force",
                    "Below a million vectors an exact scan on a modern CPU is fast enough \
                     and removes a whole class of recall bugs.",
                ),
                section(
                    "When to reach for HNSW",
                    "Once queries per second and corpus size both grow, graph indexes pay \
                     for their memory overhead.",
                ),
            ],
        },
        BlogDetail {
            post: demo_post(
                "6650c3",
                "Evaluating Agents Honestly",
                "Lena Fischer",
                "Research Scientist",
                "Benchmarks reward the wrong things. Here is how we built an eval that hurts.",
            ),
            large_image: Some(ImageRef {
                url: "https://images.example/6650c3-large.jpg".to_string(),
                file_name: "6650c3-large.jpg".to_string(),
            }),
            detail_info: vec![section(
                "Tasks, not prompts",
                "Every task ends in a checkable state of the world. No grading by \
                 another model, no partial credit for eloquence.",
            )],
        },
    ]
}
