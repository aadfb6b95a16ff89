//! Persistence collaborators shipped with the crate.

#![cfg(feature = "file_saver")]
#![cfg_attr(docsrs, doc(cfg(feature = "file_saver")))]

use std::{fs, io, path, sync, time};

use crate::{Error, Saver, Store};

/// A [`Saver`] that keeps the generator state in a JSON file.
///
/// Saves are throttled: a snapshot is written only if at least [`interval`](FileSaver::interval)
/// has passed since the last write. The file is replaced atomically by writing a temporary
/// sibling (the file name with `.tmp` appended) and renaming it over the target.
///
/// A snapshot that carries the node and clock sequence of the last written one but an older
/// timestamp arrived late and is skipped. An older timestamp with a different clock sequence
/// records a clock regression and is written.
///
/// # Examples
///
/// ```rust
/// use std::{sync::Arc, time::Duration};
/// use uuid_gen::{savers::FileSaver, Generator};
///
/// let dir = std::env::temp_dir().join("uuid_gen-doc");
/// let saver = FileSaver::new(dir.join("state.json")).with_interval(Duration::from_secs(1));
///
/// let g = Generator::with_defaults();
/// g.register_saver(Arc::new(saver));
/// println!("{}", g.new_v1()?);
/// # Ok::<(), uuid_gen::Error>(())
/// ```
#[derive(Debug)]
pub struct FileSaver {
    path: path::PathBuf,
    interval: time::Duration,
    last_written: sync::Mutex<Option<(time::Instant, Store)>>,
}

impl FileSaver {
    /// The default minimum interval between two writes.
    pub const DEFAULT_INTERVAL: time::Duration = time::Duration::from_secs(10);

    /// Creates a saver that writes to `path`, creating parent directories as needed.
    pub fn new(path: impl Into<path::PathBuf>) -> Self {
        Self {
            path: path.into(),
            interval: Self::DEFAULT_INTERVAL,
            last_written: sync::Mutex::new(None),
        }
    }

    /// Sets the minimum interval between two writes. `Duration::ZERO` writes on every save.
    pub fn with_interval(mut self, interval: time::Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Returns the path of the state file.
    pub fn path(&self) -> &path::Path {
        &self.path
    }

    /// Returns the minimum interval between two writes.
    pub fn interval(&self) -> time::Duration {
        self.interval
    }

    /// Returns the path of the temporary sibling written before the rename.
    fn temp_path(&self) -> path::PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        name.into()
    }

    fn write(&self, store: &Store) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_vec(store)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)
    }
}

/// Returns true if `store` is an earlier state of the same run as `written`.
fn is_late(store: &Store, written: &Store) -> bool {
    store.node == written.node
        && store.sequence == written.sequence
        && store.timestamp < written.timestamp
}

impl Saver for FileSaver {
    fn save(&self, store: Store) {
        let mut last_written = self
            .last_written
            .lock()
            .unwrap_or_else(sync::PoisonError::into_inner);
        let now = time::Instant::now();
        if let Some((at, written)) = &*last_written {
            if is_late(&store, written) {
                log::trace!("uuid_gen: skipped {} older than {}", store, written);
                return;
            }
            if now.duration_since(*at) < self.interval {
                return;
            }
        }

        match self.write(&store) {
            Ok(()) => {
                log::trace!("uuid_gen: saved {} to {}", store, self.path.display());
                *last_written = Some((now, store));
            }
            Err(err) => log::warn!(
                "uuid_gen: could not save state to {}: {}",
                self.path.display(),
                err
            ),
        }
    }

    fn read(&self) -> Result<Store, Error> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Store::default()),
            Err(err) => {
                return Err(Error::PersistenceRead(format!(
                    "{}: {}",
                    self.path.display(),
                    err
                )))
            }
        };
        serde_json::from_slice(&bytes)
            .map_err(|err| Error::PersistenceRead(format!("{}: {}", self.path.display(), err)))
    }
}
