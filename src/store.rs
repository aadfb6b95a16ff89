//! The persisted generator state and the persistence collaborator interface.

use std::fmt;

use crate::{Error, Node, Sequence, Timestamp};

/// The last known generation state: where the clock sequence left off.
///
/// `node` holds the raw bytes as recorded by a [`Saver`]. Persisted state is not trusted to be a
/// well-formed six-byte node, so it is compared with the current [`Node`] byte for byte instead.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Store {
    /// Node identifier bytes.
    pub node: Vec<u8>,
    /// Clock sequence.
    pub sequence: Sequence,
    /// Timestamp of the last generation.
    pub timestamp: Timestamp,
}

impl Store {
    /// Creates a snapshot of a generator state.
    pub fn new(node: &Node, sequence: Sequence, timestamp: Timestamp) -> Self {
        Self {
            node: node.as_bytes().to_vec(),
            sequence,
            timestamp,
        }
    }

    /// Returns true if every field holds its zero value, i.e. the store carries no usable state.
    pub fn is_empty(&self) -> bool {
        self.node.iter().all(|&b| b == 0) && self.sequence == 0 && self.timestamp.as_u64() == 0
    }

    /// Returns true if the recorded node equals `node` byte for byte.
    pub fn is_same_node(&self, node: &Node) -> bool {
        *node == self.node[..]
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Timestamp[{}]-Sequence[{}]-Node[",
            self.timestamp, self.sequence
        )?;
        self.node.iter().try_for_each(|b| write!(f, "{:02x}", b))?;
        f.write_str("]")
    }
}

/// A persistence collaborator that durably records generator state between process runs.
///
/// # Examples
///
/// ```rust
/// use std::sync::Mutex;
/// use uuid_gen::{Error, Saver, Store};
///
/// #[derive(Default)]
/// struct MemorySaver(Mutex<Option<Store>>);
///
/// impl Saver for MemorySaver {
///     fn save(&self, store: Store) {
///         *self.0.lock().unwrap() = Some(store);
///     }
///
///     fn read(&self) -> Result<Store, Error> {
///         Ok(self.0.lock().unwrap().clone().unwrap_or_default())
///     }
/// }
/// ```
pub trait Saver: Send + Sync {
    /// Records a snapshot of the generator state.
    ///
    /// This is fire-and-forget from the generator's perspective; failures surface only through
    /// the next [`read`](Saver::read).
    fn save(&self, store: Store);

    /// Returns the most recently recorded state.
    ///
    /// An empty [`Store`] means there is no prior state.
    fn read(&self) -> Result<Store, Error>;
}
