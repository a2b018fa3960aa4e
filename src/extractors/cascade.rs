//! Ordered first-success evaluation of extraction stages

use super::page::Page;

type Stage<T> = Box<dyn Fn(&Page) -> Option<T> + Send + Sync>;

/// An ordered list of named extraction stages for one field.
///
/// Stages run left to right; evaluation stops at the first one returning
/// `Some`, so later stages are never consulted once a value is found.
pub struct Cascade<T> {
    field: &'static str,
    stages: Vec<(&'static str, Stage<T>)>,
}

impl<T> Cascade<T> {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            stages: Vec::new(),
        }
    }

    /// Append a stage after the existing ones
    pub fn stage<F>(mut self, name: &'static str, f: F) -> Self
    where
        F: Fn(&Page) -> Option<T> + Send + Sync + 'static,
    {
        self.stages.push((name, Box::new(f)));
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|(name, _)| *name).collect()
    }

    pub fn evaluate(&self, page: &Page) -> Option<T> {
        for (name, stage) in &self.stages {
            if let Some(value) = stage(page) {
                log::debug!("{}: matched by '{}' stage for {}", self.field, name, page.url());
                return Some(value);
            }
        }
        log::debug!("{}: no stage matched for {}", self.field, page.url());
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use url::Url;

    #[test]
    fn test_first_success_wins() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let cascade = Cascade::new("test")
            .stage("miss", |_| None)
            .stage("hit", |_| Some(1))
            .stage("counter", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Some(2)
            });

        let page = Page::parse(Url::parse("https://example.com/").unwrap(), "<p></p>");
        assert_eq!(cascade.evaluate(&page), Some(1));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(cascade.stage_names(), vec!["miss", "hit", "counter"]);
    }

    #[test]
    fn test_all_miss() {
        let cascade: Cascade<u32> = Cascade::new("test").stage("a", |_| None).stage("b", |_| None);
        let page = Page::parse(Url::parse("https://example.com/").unwrap(), "");
        assert_eq!(cascade.evaluate(&page), None);
    }
}
