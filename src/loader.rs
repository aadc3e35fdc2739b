use crossbeam::channel::{self, Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use crate::geometry::{Geometry, GeometryError};

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

enum LoadCommand {
    Load { ticket: u64, path: PathBuf },
    Stop,
}

pub enum LoadResult {
    Loaded { path: PathBuf, geometry: Geometry },
    Failed { path: PathBuf, error: LoadError },
}

struct Ticketed {
    ticket: u64,
    result: LoadResult,
}

/// Only the most recent request is ever delivered: older requests still in
/// flight are dropped, whichever finishes first.
pub struct FileLoader {
    tx_cmd: Sender<LoadCommand>,
    rx_result: Receiver<Ticketed>,
    latest: Arc<AtomicU64>,
    thread_handle: Option<JoinHandle<()>>,
}

impl FileLoader {
    pub fn new() -> Self {
        let (tx_cmd, rx_cmd) = channel::unbounded::<LoadCommand>();
        let (tx_result, rx_result) = channel::unbounded::<Ticketed>();
        let latest = Arc::new(AtomicU64::new(0));

        let latest_clone = Arc::clone(&latest);
        let thread_handle = thread::Builder::new()
            .name("geometry-loader".into())
            .spawn(move || loader_thread(rx_cmd, tx_result, latest_clone))
            .map_err(|e| log::error!("failed to spawn geometry loader: {e}"))
            .ok();

        Self {
            tx_cmd,
            rx_result,
            latest,
            thread_handle,
        }
    }

    pub fn request(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!("loading geometry from {}", path.display());
        let _ = self.tx_cmd.send(LoadCommand::Load { ticket, path });
    }

    pub fn try_recv_result(&self) -> Option<LoadResult> {
        while let Ok(ticketed) = self.rx_result.try_recv() {
            if ticketed.ticket == self.latest.load(Ordering::SeqCst) {
                return Some(ticketed.result);
            }
        }
        None
    }

    pub fn stop(&self) {
        let _ = self.tx_cmd.send(LoadCommand::Stop);
    }
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FileLoader {
    fn drop(&mut self) {
        let _ = self.tx_cmd.send(LoadCommand::Stop);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

pub fn load_geometry_file(path: &Path) -> Result<Geometry, LoadError> {
    let text = std::fs::read_to_string(path)?;
    Ok(Geometry::from_json(&text)?)
}

fn loader_thread(
    rx_cmd: Receiver<LoadCommand>,
    tx_result: Sender<Ticketed>,
    latest: Arc<AtomicU64>,
) {
    loop {
        let cmd = match rx_cmd.recv() {
            Ok(c) => c,
            Err(_) => return,
        };

        match cmd {
            LoadCommand::Load { ticket, path } => {
                if ticket != latest.load(Ordering::SeqCst) {
                    log::debug!("skipping superseded load of {}", path.display());
                    continue;
                }

                let result = match load_geometry_file(&path) {
                    Ok(geometry) => LoadResult::Loaded { path, geometry },
                    Err(error) => {
                        log::error!("failed to load {}: {error}", path.display());
                        LoadResult::Failed { path, error }
                    }
                };

                if tx_result.send(Ticketed { ticket, result }).is_err() {
                    return;
                }
            }
            LoadCommand::Stop => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("trigon-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn wait(loader: &FileLoader) -> LoadResult {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(result) = loader.try_recv_result() {
                return result;
            }
            assert!(Instant::now() < deadline, "loader produced no result");
            thread::sleep(Duration::from_millis(5));
        }
    }

    const TWO_TRIANGLES: &str = r#"{
        "positions": [0,0,0, 1,0,0, 0,1,0, 0,0,0, -1,0,0, 0,-1,0],
        "colors": [1,0,0,1, 1,0,0,1, 1,0,0,1, 0,1,0,1, 0,1,0,1, 0,1,0,1]
    }"#;

    #[test]
    fn loads_valid_file() {
        let path = temp_file("valid.json", TWO_TRIANGLES);
        let loader = FileLoader::new();
        loader.request(&path);

        match wait(&loader) {
            LoadResult::Loaded { path: p, geometry } => {
                assert_eq!(p, path);
                assert_eq!(geometry.triangle_count(), 2);
            }
            LoadResult::Failed { error, .. } => panic!("unexpected failure: {error}"),
        }
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn malformed_file_reports_failure() {
        let path = temp_file("malformed.json", "{\"positions\": [1, 2");
        let loader = FileLoader::new();
        loader.request(&path);

        assert!(matches!(
            wait(&loader),
            LoadResult::Failed {
                error: LoadError::Geometry(GeometryError::Json(_)),
                ..
            }
        ));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_reports_io_error() {
        let loader = FileLoader::new();
        loader.request(std::env::temp_dir().join("trigon-does-not-exist.json"));
        assert!(matches!(
            wait(&loader),
            LoadResult::Failed {
                error: LoadError::Io(_),
                ..
            }
        ));
    }

    #[test]
    fn only_latest_request_is_delivered() {
        let first = temp_file("first.json", TWO_TRIANGLES);
        let second = temp_file(
            "second.json",
            r#"{"positions": [0,0,0,1,0,0,0,1,0], "colors": [1,1,1,1,1,1,1,1,1,1,1,1]}"#,
        );
        let loader = FileLoader::new();
        loader.request(&first);
        loader.request(&second);

        match wait(&loader) {
            LoadResult::Loaded { path, geometry } => {
                assert_eq!(path, second);
                assert_eq!(geometry.triangle_count(), 1);
            }
            LoadResult::Failed { error, .. } => panic!("unexpected failure: {error}"),
        }
        thread::sleep(Duration::from_millis(50));
        assert!(loader.try_recv_result().is_none());

        let _ = std::fs::remove_file(first);
        let _ = std::fs::remove_file(second);
    }
}
