//! File-backed persistence for the store document.

use crate::document::{self, Node};
use crate::error::{Result, StoreError};
use crate::store::Store;
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Gateway configuration.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Path of the document.
    pub path: PathBuf,

    /// Write an empty document if none exists yet. When false a missing
    /// document fails the open.
    pub create_if_missing: bool,

    /// Extra attempts after a failed write.
    pub write_retries: u32,

    /// Pause between write attempts.
    pub retry_backoff: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./agenda.xml"),
            create_if_missing: false,
            write_retries: 2,
            retry_backoff: Duration::from_millis(50),
        }
    }
}

impl GatewayConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

/// Reads and writes one document, holding an exclusive lock on it for as
/// long as the gateway lives.
pub struct Gateway {
    config: GatewayConfig,

    /// Lock file for exclusive access.
    _lock_file: File,
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Write through a temp file and rename over the target.
fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let temp_path = sibling(path, ".tmp");
    let mut file = File::create(&temp_path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)
}

impl Gateway {
    /// Open the document named by `config` and lock it.
    pub fn open(config: GatewayConfig) -> Result<Self> {
        if !config.path.exists() && !config.create_if_missing {
            return Err(StoreError::NotFound(config.path));
        }

        let lock_file = Self::acquire_lock(&config.path)?;

        // Only the lock holder may create the document.
        if !config.path.exists() {
            write_atomic(&config.path, &document::render(&Store::new().to_document()))?;
            info!("Created empty document: {}", config.path.display());
        }

        Ok(Self {
            config,
            _lock_file: lock_file,
        })
    }

    /// Path of the document.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Read and parse the whole document.
    pub fn read_document(&self) -> Result<Node> {
        let text = fs::read_to_string(&self.config.path)?;
        document::parse(&text)
    }

    /// Render and write the whole document, retrying failed writes.
    pub fn write_document(&self, root: &Node) -> Result<()> {
        let contents = document::render(root);
        let mut attempt = 0;
        loop {
            match write_atomic(&self.config.path, &contents) {
                Ok(()) => {
                    debug!(
                        bytes = contents.len(),
                        "Saved document: {}",
                        self.config.path.display()
                    );
                    return Ok(());
                }
                Err(e) if attempt < self.config.write_retries => {
                    attempt += 1;
                    warn!(
                        attempt,
                        error = %e,
                        "Retrying write of {}",
                        self.config.path.display()
                    );
                    thread::sleep(self.config.retry_backoff);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Load the store held in the document.
    pub fn load(&self) -> Result<Store> {
        let store = Store::from_document(&self.read_document()?)?;
        debug!(
            areas = store.area_count(),
            "Loaded document: {}",
            self.config.path.display()
        );
        Ok(store)
    }

    /// Replace the document with the contents of `store`.
    pub fn save(&self, store: &Store) -> Result<()> {
        self.write_document(&store.to_document())
    }

    fn acquire_lock(path: &Path) -> Result<File> {
        let lock_file = File::create(sibling(path, ".lock"))?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| StoreError::Locked)?;

        Ok(lock_file)
    }
}
