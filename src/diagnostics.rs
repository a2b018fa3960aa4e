//! Optional sinks for fetched documents, used when tuning selectors

use std::fs;
use std::path::PathBuf;
use url::Url;

/// Receives every successfully fetched document
pub trait DiagnosticSink: Send + Sync {
    fn record_document(&self, url: &Url, html: &str);
}

/// Discards everything
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record_document(&self, _url: &Url, _html: &str) {}
}

/// Writes each document to `<dir>/<sanitized url>.html`
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, url: &Url) -> PathBuf {
        self.dir.join(format!("{}.html", sanitize_filename(url.as_str())))
    }
}

impl DiagnosticSink for DirectorySink {
    fn record_document(&self, url: &Url, html: &str) {
        let path = self.path_for(url);
        let result = fs::create_dir_all(&self.dir).and_then(|_| fs::write(&path, html));
        match result {
            Ok(()) => log::debug!("saved {} to {}", url, path.display()),
            Err(e) => log::warn!("could not save {} to {}: {}", url, path.display(), e),
        }
    }
}

/// Convert a URL to a filesystem-safe name
pub fn sanitize_filename(url: &str) -> String {
    let name = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .replace(['/', ':', '?', '&', '=', '#', '%', '\\'], "_");

    // Limit filename length
    name.chars().take(100).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(
            sanitize_filename("https://shop.example.com/p/mug-1?color=red"),
            "shop.example.com_p_mug-1_color_red"
        );
        let long = format!("https://example.com/{}", "a".repeat(300));
        assert_eq!(sanitize_filename(&long).len(), 100);
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("pages"));
        let url = Url::parse("https://example.com/p/1").unwrap();

        sink.record_document(&url, "<html>ok</html>");

        let saved = fs::read_to_string(sink.path_for(&url)).unwrap();
        assert_eq!(saved, "<html>ok</html>");
    }
}
