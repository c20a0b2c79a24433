use std::path::{Path, PathBuf};

use vibeflicks::model::types::MovieRecord;
use vibeflicks::search::CatalogIndex;

/// Captures tracing output for tests.
#[allow(dead_code)]
pub struct TestTracing {
    buffer: std::sync::Arc<std::sync::Mutex<Vec<u8>>>,
}

#[allow(dead_code)]
impl TestTracing {
    pub fn new() -> Self {
        Self {
            buffer: std::sync::Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.buffer.clone();
        let make_writer = move || TestWriter(writer.clone());
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_writer(make_writer)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn output(&self) -> String {
        let buf = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Assert that the captured log output contains the provided substring.
    pub fn assert_contains(&self, needle: &str) {
        let out = self.output();
        assert!(
            out.contains(needle),
            "expected logs to contain `{needle}`, got:\n{out}"
        );
    }
}

struct TestWriter(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Path to the checked-in sample catalog.
#[allow(dead_code)]
pub fn fixture_catalog() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/movies.csv")
}

#[allow(dead_code)]
pub fn fixture_index() -> CatalogIndex {
    CatalogIndex::open(&fixture_catalog()).expect("fixture catalog loads")
}

/// A synthetic catalog of `n` English movies sharing the word "galaxy", each
/// with a unique title token so the raw vocabulary grows with `n`.
#[allow(dead_code)]
pub fn synthetic_records(n: usize) -> Vec<MovieRecord> {
    (0..n)
        .map(|i| {
            MovieRecord::titled(format!("Movie{i}"))
                .with_language(if i % 2 == 0 { "en" } else { "es" })
                .with_overview(format!("galaxy voyage uniqueword{i} extra{}", i % 7))
                .with_vote_average((i % 10) as f64)
                .with_release_date(format!("2000-01-{:02}", i % 28 + 1))
        })
        .collect()
}
