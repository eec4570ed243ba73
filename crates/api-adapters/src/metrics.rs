//! # Metrics
//!
//! Prometheus counters for the write paths, rendered at `/metrics`.

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ToggleLabels {
    /// `like` or `dislike`
    pub kind: String,
    /// `inserted`, `deleted` or `overwritten`
    pub outcome: String,
}

#[derive(Debug)]
pub struct Metrics {
    registry: Registry,
    posts_created: Counter,
    comments_created: Counter,
    toggles: Family<ToggleLabels, Counter>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix("blog");
        let posts_created = Counter::default();
        let comments_created = Counter::default();
        let toggles = Family::<ToggleLabels, Counter>::default();

        registry.register("posts_created", "Top-level posts created", posts_created.clone());
        registry.register("comments_created", "Comments created", comments_created.clone());
        registry.register(
            "interaction_toggles",
            "Applied like/dislike toggles by requested kind and store step",
            toggles.clone(),
        );

        Self { registry, posts_created, comments_created, toggles }
    }

    pub fn post_created(&self) {
        self.posts_created.inc();
    }

    pub fn comment_created(&self) {
        self.comments_created.inc();
    }

    pub fn toggled(&self, kind: &str, outcome: &str) {
        self.toggles
            .get_or_create(&ToggleLabels { kind: kind.into(), outcome: outcome.into() })
            .inc();
    }

    /// OpenMetrics text exposition of every registered metric.
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        encode(&mut out, &self.registry)?;
        Ok(out)
    }
}
