//! Stateful RFC4122 generator and related types.

use std::{fmt, sync};

use crate::{
    ClockSource, Domain, Error, HardwareNode, Node, NodeSource, Saver, Sequence, Store,
    SystemClock, Timestamp, Uuid, MAX_SEQUENCE,
};

pub mod with_rand08;
pub use with_rand08::OsEntropy;


/// A trait that defines the random byte supply interface for [`Generator`].
///
/// Implementations fill the whole `dest` and return its length, or return
/// [`Error::EntropyUnavailable`] leaving `dest` unmodified.
pub trait EntropySource {
    /// Fills `dest` with cryptographically strong random data.
    fn fill(&mut self, dest: &mut [u8]) -> Result<usize, Error>;
}

impl<F: FnMut(&mut [u8]) -> Result<usize, Error>> EntropySource for F {
    fn fill(&mut self, dest: &mut [u8]) -> Result<usize, Error> {
        self(dest)
    }
}

/// The generator type wired with the default sources by [`Generator::with_defaults`].
pub type DefaultGenerator = Generator<OsEntropy, SystemClock, HardwareNode>;

/// Represents a stateful UUID generator that tracks the timestamp, node, and clock sequence of
/// time-based UUIDs and keeps them unique across process restarts with the help of a [`Saver`].
///
/// All state lives behind a single lock scoped to the instance, so a generator can be shared
/// among threads as is.
///
/// # Reconciliation
///
/// Before the first time-based UUID is minted, and again after every call of
/// [`register_saver`](Generator::register_saver), the generator reads the prior state from the
/// saver and derives a clock sequence from it:
///
/// | Prior state                         | Resulting clock sequence |
/// | ----------------------------------- | ------------------------ |
/// | Same node, timestamp not older      | Prior plus one           |
/// | Same node, timestamp older than now | Prior                    |
/// | Different node                      | Random                   |
/// | Empty, unreadable, or no saver      | Random                   |
///
/// Read failures are recorded in [`last_error`](Generator::last_error) and the failing saver is
/// detached, but generation goes on. Entropy failures abort the construction and are returned.
///
/// # Examples
///
/// ```rust
/// use std::{sync::Arc, thread};
/// use uuid_gen::Generator;
///
/// let g = Arc::new(Generator::with_defaults());
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.new_v1().unwrap(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
pub struct Generator<E, C, N> {
    inner: sync::Mutex<Inner<E, C, N>>,

    /// Taken before the state lock is released so that snapshots reach the saver in the order
    /// they were taken.
    save_order: sync::Mutex<()>,
}

struct Inner<E, C, N> {
    entropy: E,
    clock: C,
    node_source: N,

    node: Node,
    sequence: Sequence,
    timestamp: Timestamp,

    /// The clock sequence the current timestamp started with.
    tick_sequence: Sequence,

    reconciled: bool,
    last_error: Option<Error>,
    saver: Option<sync::Arc<dyn Saver>>,
}

/// The state handed out of the critical section for a single construction.
struct Snapshot {
    node: Node,
    sequence: Sequence,
    timestamp: Timestamp,
    saver: Option<sync::Arc<dyn Saver>>,
}

impl Snapshot {
    /// Hands a fresh copy of the state to the saver, if any.
    fn save(self) {
        if let Some(saver) = self.saver {
            saver.save(Store::new(&self.node, self.sequence, self.timestamp));
        }
    }
}

impl DefaultGenerator {
    /// Creates a generator with the operating system's random number generator, the system
    /// clock, and the first hardware address of the host.
    pub fn with_defaults() -> Self {
        Self::new(OsEntropy::default(), SystemClock, HardwareNode)
    }
}

impl<E: EntropySource, C: ClockSource, N: NodeSource> Generator<E, C, N> {
    /// Creates a generator instance with the given sources and no saver.
    pub const fn new(entropy: E, clock: C, node_source: N) -> Self {
        Self {
            inner: sync::Mutex::new(Inner {
                entropy,
                clock,
                node_source,
                node: Node::new([0; 6]),
                sequence: 0,
                timestamp: Timestamp::ZERO,
                tick_sequence: 0,
                reconciled: false,
                last_error: None,
                saver: None,
            }),
            save_order: sync::Mutex::new(()),
        }
    }

    /// Locks the state, recovering it if a previous holder panicked. The state is only ever
    /// written as a whole, so a poisoned lock still guards a consistent value.
    fn lock(&self) -> sync::MutexGuard<'_, Inner<E, C, N>> {
        self.inner
            .lock()
            .unwrap_or_else(sync::PoisonError::into_inner)
    }

    /// Waits for the turn to hand `snapshot` to its saver, if it has one.
    fn save_turn(&self, snapshot: &Snapshot) -> Option<sync::MutexGuard<'_, ()>> {
        snapshot.saver.as_ref().map(|_| {
            self.save_order
                .lock()
                .unwrap_or_else(sync::PoisonError::into_inner)
        })
    }

    /// Advances the state for the next time-based UUID and takes the save turn while still
    /// holding the state lock.
    fn next_in_order(&self) -> Result<(Snapshot, Option<sync::MutexGuard<'_, ()>>), Error> {
        let mut inner = self.lock();
        let snapshot = inner.next()?;
        let turn = self.save_turn(&snapshot);
        drop(inner);
        Ok((snapshot, turn))
    }

    /// Registers a persistence collaborator, replacing any previous one and forcing
    /// reconciliation on the next use.
    pub fn register_saver(&self, saver: sync::Arc<dyn Saver>) {
        let mut inner = self.lock();
        inner.saver = Some(saver);
        inner.reconciled = false;
    }

    /// Detaches the persistence collaborator, returning it if one was registered.
    pub fn unregister_saver(&self) -> Option<sync::Arc<dyn Saver>> {
        self.lock().saver.take()
    }

    /// Returns true if a persistence collaborator is registered.
    pub fn has_saver(&self) -> bool {
        self.lock().saver.is_some()
    }

    /// Returns the last error recorded by the generator, if any.
    pub fn last_error(&self) -> Option<Error> {
        self.lock().last_error.clone()
    }

    /// Returns a snapshot of the current node, clock sequence, and timestamp.
    pub fn state(&self) -> Store {
        let inner = self.lock();
        Store::new(&inner.node, inner.sequence, inner.timestamp)
    }

    /// Reconciles the current state with the clock, the node source, and the saver.
    ///
    /// This happens implicitly before the first time-based UUID; calling it explicitly re-reads
    /// the saver.
    pub fn reconcile(&self) -> Result<(), Error> {
        self.lock().reconcile()
    }

    /// Hands a snapshot of the current state to the saver. Does nothing if no saver is
    /// registered.
    pub fn save(&self) {
        let inner = self.lock();
        let snapshot = inner.snapshot();
        let _turn = self.save_turn(&snapshot);
        drop(inner);
        snapshot.save();
    }

    /// Generates a new UUIDv1 object.
    pub fn new_v1(&self) -> Result<Uuid, Error> {
        let (snapshot, _turn) = self.next_in_order()?;
        let id = Uuid::from_fields_v1(snapshot.timestamp, snapshot.sequence, &snapshot.node);
        snapshot.save();
        Ok(id)
    }

    /// Generates a new UUIDv2 object embedding `domain`.
    pub fn new_v2(&self, domain: Domain) -> Result<Uuid, Error> {
        self.new_v2_core(domain, None)
    }

    /// Generates a new UUIDv2 object embedding `domain` and a local identifier (e.g. a POSIX
    /// UID or GID) in place of the low 32 bits of the timestamp.
    pub fn new_v2_with_id(&self, domain: Domain, local_id: u32) -> Result<Uuid, Error> {
        self.new_v2_core(domain, Some(local_id))
    }

    fn new_v2_core(&self, domain: Domain, local_id: Option<u32>) -> Result<Uuid, Error> {
        let (snapshot, _turn) = self.next_in_order()?;
        let id = Uuid::from_fields_v2(
            snapshot.timestamp,
            snapshot.sequence,
            &snapshot.node,
            domain,
            local_id,
        );
        snapshot.save();
        Ok(id)
    }

    /// Generates a new UUIDv4 object from the entropy source.
    pub fn new_v4(&self) -> Result<Uuid, Error> {
        let mut bytes = [0u8; 16];
        self.lock().fill_random(&mut bytes)?;
        Ok(Uuid::from_random_bytes_v4(bytes))
    }
}

impl<E: EntropySource, C: ClockSource, N: NodeSource> Inner<E, C, N> {
    fn record(&mut self, err: Error) {
        self.last_error = Some(err);
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            node: self.node,
            sequence: self.sequence,
            timestamp: self.timestamp,
            saver: self.saver.clone(),
        }
    }

    /// Prepares the state for the next time-based UUID.
    ///
    /// The first call after a reconciliation uses the reconciled state as is. Later calls go on
    /// with the latest timestamp and bump the clock sequence whenever the clock has not moved
    /// forward; once every sequence value of a timestamp is used up, the timestamp is moved one
    /// tick ahead of the clock.
    fn next(&mut self) -> Result<Snapshot, Error> {
        if !self.reconciled {
            self.reconcile()?;
            return Ok(self.snapshot());
        }

        let now = self.clock.now();
        if now > self.timestamp {
            self.timestamp = now;
            self.tick_sequence = self.sequence;
        } else {
            self.sequence = self.sequence.wrapping_add(1) & MAX_SEQUENCE;
            if self.sequence == self.tick_sequence {
                // increment timestamp at sequence overflow
                self.timestamp = Timestamp::from(self.timestamp.as_u64().wrapping_add(1));
                log::debug!("uuid_gen: clock sequence exhausted; moved to {}", self.timestamp);
            }
        }
        Ok(self.snapshot())
    }

    fn fill_random(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        let result = match self.entropy.fill(dest) {
            Ok(n) if n == dest.len() => return Ok(()),
            Ok(n) => Error::EntropyUnavailable(format!("read {} of {} bytes", n, dest.len())),
            Err(err @ Error::EntropyUnavailable(_)) => err,
            Err(err) => Error::EntropyUnavailable(err.to_string()),
        };
        log::error!("uuid_gen: {}", result);
        self.record(result.clone());
        Err(result)
    }

    fn random_sequence(&mut self) -> Result<Sequence, Error> {
        let mut buf = [0u8; 2];
        self.fill_random(&mut buf)?;
        Ok(Sequence::from_be_bytes(buf) & MAX_SEQUENCE)
    }

    /// Reads the prior state from the saver, detaching the saver if it fails.
    fn read_prior(&mut self) -> Option<Store> {
        let result = self.saver.as_ref().map(|saver| saver.read())?;
        match result {
            Ok(store) if store.is_empty() => {
                log::debug!("uuid_gen: no prior state recorded");
                self.record(Error::PersistenceRead("no prior state".to_owned()));
                None
            }
            Ok(store) => Some(store),
            Err(err) => {
                let err = match err {
                    Error::PersistenceRead(_) => err,
                    other => Error::PersistenceRead(other.to_string()),
                };
                log::warn!("uuid_gen: {}; detaching saver", err);
                self.saver = None;
                self.record(err);
                None
            }
        }
    }

    fn resolve(&mut self, now: Timestamp) -> Result<(Node, Sequence), Error> {
        let node = match self.node_source.node() {
            Some(node) => node,
            None => {
                let mut bytes = [0u8; 6];
                self.fill_random(&mut bytes)?;
                Node::random_multicast(bytes)
            }
        };

        let sequence = match self.read_prior() {
            Some(prior) if prior.is_same_node(&node) => {
                if prior.timestamp >= now {
                    log::debug!("uuid_gen: clock not ahead of {}; incrementing sequence", prior);
                    prior.sequence.wrapping_add(1) & MAX_SEQUENCE
                } else {
                    prior.sequence & MAX_SEQUENCE
                }
            }
            Some(prior) => {
                log::debug!("uuid_gen: node changed since {}; drawing sequence", prior);
                self.random_sequence()?
            }
            None => self.random_sequence()?,
        };
        Ok((node, sequence))
    }

    fn reconcile(&mut self) -> Result<(), Error> {
        let now = self.clock.now();
        self.timestamp = now;
        match self.resolve(now) {
            Ok((node, sequence)) => {
                self.node = node;
                self.sequence = sequence;
                self.tick_sequence = sequence;
                self.reconciled = true;
                Ok(())
            }
            Err(err) => {
                self.sequence = 0;
                self.reconciled = false;
                Err(err)
            }
        }
    }
}

impl<E, C, N> fmt::Debug for Generator<E, C, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Ok(inner) => f
                .debug_struct("Generator")
                .field("node", &inner.node)
                .field("sequence", &inner.sequence)
                .field("timestamp", &inner.timestamp)
                .field("reconciled", &inner.reconciled)
                .field("has_saver", &inner.saver.is_some())
                .field("last_error", &inner.last_error)
                .finish(),
            Err(_) => f.debug_struct("Generator").finish_non_exhaustive(),
        }
    }
}
