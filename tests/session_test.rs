//! Integration tests for tree sessions and the dump pipeline.
//!
//! All output goes to a TempDir via `dump.logs_dir`; rendering uses
//! recording or deliberately broken renderers so no Graphviz install is needed.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use bstviz::application::services::TreeSession;
use bstviz::application::ApplicationError;
use bstviz::config::Settings;
use bstviz::domain::Traversal;
use bstviz::infrastructure::traits::{
    FileSystem, GraphvizRenderer, ImageRenderer, NoopRenderer, RealCommandRunner, RealFileSystem,
};
use bstviz::util::testing;

fn settings_in(dir: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.dump.logs_dir = dir.join("logs");
    settings
}

fn open(dir: &Path, capacity: usize, renderer: Arc<dyn ImageRenderer>) -> TreeSession {
    TreeSession::init(capacity, Arc::new(RealFileSystem), renderer, &settings_in(dir))
        .expect("session init")
}

#[derive(Default)]
struct RecordingRenderer {
    calls: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl ImageRenderer for RecordingRenderer {
    fn render(&self, graph: &Path, image: &Path) {
        self.calls
            .lock()
            .unwrap()
            .push((graph.to_path_buf(), image.to_path_buf()));
    }
}

/// Real filesystem that refuses to write graph files.
struct ReadOnlyGraphs;

impl FileSystem for ReadOnlyGraphs {
    fn write(&self, _path: &Path, _content: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }
    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        RealFileSystem.create(path)
    }
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        RealFileSystem.create_dir_all(path)
    }
}

/// Real filesystem whose visual log rejects writes while the disk is "full".
struct FullDiskLog {
    full: Arc<AtomicBool>,
}

struct FullDiskWriter {
    file: File,
    full: Arc<AtomicBool>,
}

impl Write for FullDiskWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.full.load(Ordering::SeqCst) {
            return Err(io::Error::other("no space left on device"));
        }
        self.file.write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        if self.full.load(Ordering::SeqCst) {
            return Err(io::Error::other("no space left on device"));
        }
        self.file.flush()
    }
}

impl FileSystem for FullDiskLog {
    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        RealFileSystem.write(path, content)
    }
    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        Ok(Box::new(FullDiskWriter {
            file: File::create(path)?,
            full: self.full.clone(),
        }))
    }
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        RealFileSystem.create_dir_all(path)
    }
}

// ============================================================
// Lifecycle
// ============================================================

#[test]
fn given_zero_capacity_when_init_then_invalid_capacity_and_no_files() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();

    let result = TreeSession::init(
        0,
        Arc::new(RealFileSystem),
        Arc::new(NoopRenderer),
        &settings_in(temp.path()),
    );

    let err = result.err().expect("capacity 0 must fail");
    assert_eq!(err.code(), 2);
    assert!(fs::read_dir(temp.path()).unwrap().next().is_none());
}

#[test]
fn given_destroyed_session_when_using_it_then_null_tree_everywhere() {
    let temp = TempDir::new().unwrap();
    let mut session = open(temp.path(), 4, Arc::new(NoopRenderer));
    session.insert(1).unwrap();

    // Act
    session.destroy().unwrap();
    session.destroy().unwrap();

    // Assert
    assert!(matches!(session.insert(2), Err(ApplicationError::NullTree)));
    assert!(matches!(session.dump(None), Err(ApplicationError::NullTree)));
    assert!(matches!(session.dump_value(1), Err(ApplicationError::NullTree)));
    assert!(matches!(session.tree(), Err(ApplicationError::NullTree)));
    assert!(matches!(session.dump_count(), Err(ApplicationError::NullTree)));
    let mut sink = Vec::new();
    assert!(matches!(
        session.write_traversal(Traversal::InOrder, &mut sink),
        Err(ApplicationError::NullTree)
    ));
    assert!(sink.is_empty());
}

#[test]
fn given_full_session_when_inserting_then_overflow_code() {
    let temp = TempDir::new().unwrap();
    let mut session = open(temp.path(), 1, Arc::new(NoopRenderer));
    session.insert(1).unwrap();

    let err = session.insert(2).unwrap_err();

    assert_eq!(err.code(), 5);
}

// ============================================================
// Dumps and the visual log
// ============================================================

#[test]
fn given_two_dumps_when_done_then_sequential_artifacts_and_two_log_entries() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let renderer = Arc::new(RecordingRenderer::default());
    let mut session = open(temp.path(), 8, renderer.clone());

    // Act
    session.insert(10).unwrap();
    let first = session.dump(None).unwrap();
    session.insert(5).unwrap();
    let second = session.dump(None).unwrap();
    session.destroy().unwrap();

    // Assert
    let logs = temp.path().join("logs");
    assert_eq!(first.dot_path, logs.join("dot/tree_dump0000.dot"));
    assert_eq!(second.dot_path, logs.join("dot/tree_dump0001.dot"));
    assert!(first.dot_path.is_file());
    assert!(second.dot_path.is_file());

    let log = fs::read_to_string(logs.join("tree.html")).unwrap();
    assert_eq!(
        log,
        "<h2>Dump 0</h2>\r\n<img src = \"img/tree_dump0000.png\">\r\n\
         <h2>Dump 1</h2>\r\n<img src = \"img/tree_dump0001.png\">\r\n"
    );

    let calls = renderer.calls.lock().unwrap();
    assert_eq!(
        *calls,
        vec![
            (first.dot_path.clone(), logs.join("img/tree_dump0000.png")),
            (second.dot_path.clone(), logs.join("img/tree_dump0001.png")),
        ]
    );
}

#[test]
fn given_missing_renderer_program_when_dumping_then_dump_still_succeeds() {
    let temp = TempDir::new().unwrap();
    let renderer = Arc::new(GraphvizRenderer::new(
        Arc::new(RealCommandRunner),
        "bstviz-no-such-renderer",
        "png",
    ));
    let mut session = open(temp.path(), 2, renderer);
    session.insert(3).unwrap();

    let artifact = session.dump(None).unwrap();

    assert_eq!(artifact.index, 0);
    assert_eq!(session.dump_count().unwrap(), 1);
    let log = fs::read_to_string(temp.path().join("logs/tree.html")).unwrap();
    assert!(log.contains("img/tree_dump0000.png"));
}

#[test]
fn given_unwritable_graph_dir_when_dumping_then_dump_error_and_counter_unchanged() {
    let temp = TempDir::new().unwrap();
    let mut session = TreeSession::init(
        4,
        Arc::new(ReadOnlyGraphs),
        Arc::new(NoopRenderer),
        &settings_in(temp.path()),
    )
    .unwrap();
    session.insert(1).unwrap();

    let err = session.dump(None).unwrap_err();

    assert!(matches!(err, ApplicationError::Dump { .. }));
    assert_eq!(err.code(), 4);
    assert!(err.to_string().contains("tree_dump0000.dot"));
    assert_eq!(session.dump_count().unwrap(), 0);
    assert_eq!(fs::read_to_string(temp.path().join("logs/tree.html")).unwrap(), "");
}

#[test]
fn given_full_disk_for_log_when_dumping_then_dump_error_and_no_stale_entry_later() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let full = Arc::new(AtomicBool::new(true));
    let fs_double = Arc::new(FullDiskLog { full: full.clone() });
    let mut session =
        TreeSession::init(4, fs_double, Arc::new(NoopRenderer), &settings_in(temp.path()))
            .unwrap();
    session.insert(7).unwrap();
    let logs = temp.path().join("logs");

    // Act
    let err = session.dump(None).unwrap_err();

    // Assert: graph kept, nothing counted
    assert!(matches!(err, ApplicationError::Dump { .. }));
    assert!(err.to_string().contains("append to visual log"));
    assert_eq!(session.dump_count().unwrap(), 0);
    assert!(logs.join("dot/tree_dump0000.dot").is_file());

    // Act: space is back
    full.store(false, Ordering::SeqCst);
    let artifact = session.dump(None).unwrap();
    session.destroy().unwrap();

    // Assert: exactly one entry for the one successful dump
    assert_eq!(artifact.index, 0);
    let log = fs::read_to_string(logs.join("tree.html")).unwrap();
    assert_eq!(
        log,
        "<h2>Dump 0</h2>\r\n<img src = \"img/tree_dump0000.png\">\r\n"
    );
}

#[test]
fn given_empty_tree_when_dumping_then_writes_empty_digraph() {
    let temp = TempDir::new().unwrap();
    let mut session = open(temp.path(), 2, Arc::new(NoopRenderer));

    let artifact = session.dump(None).unwrap();

    let dot = fs::read_to_string(artifact.dot_path).unwrap();
    assert!(dot.starts_with("digraph {\r\n"));
    assert!(dot.ends_with("}\r\n"));
    assert!(!dot.contains("node0["));
}

#[test]
fn given_reference_run_when_highlighting_slot_four_then_only_that_node_uses_highlight_color() {
    let temp = TempDir::new().unwrap();
    let mut session = open(temp.path(), 32, Arc::new(NoopRenderer));
    session.insert(10).unwrap();
    session.dump(None).unwrap();
    for value in [10, 10, 40, 10, 50, 20, 40, 20, 60, 30, 20] {
        session.insert(value).unwrap();
    }

    // Act
    let highlight = session.tree().unwrap().slot(4);
    let artifact = session.dump(highlight).unwrap();

    // Assert
    assert_eq!(artifact.index, 1);
    let dot = fs::read_to_string(&artifact.dot_path).unwrap();
    let highlighted: Vec<&str> = dot.lines().filter(|l| l.contains("#9d8189")).collect();
    assert_eq!(highlighted.len(), 1);
    assert!(highlighted[0].starts_with("node4[rank = 3, label = \"{ data = 10 |"));
    assert!(dot.contains(
        "node0[rank = 0, label = \"{ data = 10 | { <left> LEFT | <right> RIGHT } }\", \
         fillcolor = \"#f4acb7\"];\r\n"
    ));
    assert!(dot.contains("node0:<left>->node1;\r\n"));
    assert!(dot.contains("node0:<right>->node3;\r\n"));
}

#[test]
fn given_session_when_streaming_traversal_then_writes_to_sink() {
    let temp = TempDir::new().unwrap();
    let mut session = open(temp.path(), 4, Arc::new(NoopRenderer));
    for value in [2, 1, 3] {
        session.insert(value).unwrap();
    }

    let mut out = Vec::new();
    session.write_traversal(Traversal::PostOrder, &mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "((()()1)(()()3)2)");
    assert_eq!(
        session.traversal(Traversal::PreOrder).unwrap(),
        "(2(1()())(3()()))"
    );
}
