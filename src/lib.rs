//! An implementation of RFC4122 UUID versions 1, 2, and 4 with persistent generator state
//!
//! ```rust
//! let uuid = uuid_gen::new_v1()?;
//! println!("{}", uuid); // e.g. "0d5a0e48-8f5e-11ee-9c1e-0242ac120002"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//!
//! let uuid = uuid_gen::new_v4()?;
//! println!("{}", uuid); // e.g. "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
//! # Ok::<(), uuid_gen::Error>(())
//! ```
//!
//! See [RFC 4122](https://www.rfc-editor.org/rfc/rfc4122).
//!
//! # Field and bit layout
//!
//! Time-based identifiers have the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          time_low                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |       time_mid                |  ver  |       time_hi         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|  clock_seq_hi |  clock_seq_low  |         node (0-1)      |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                         node (2-5)                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 60-bit timestamp counts 100-nanosecond intervals since 15 October 1582 and is split
//!   into the `time_low`, `time_mid`, and `time_hi` fields.
//! - The 4-bit `ver` field is set at `0001` (version 1) or `0010` (version 2).
//! - The 2-bit `var` field is set at `10`.
//! - The 14-bit clock sequence occupies `clock_seq_hi` and `clock_seq_low`. Version 2 replaces
//!   `clock_seq_low` with a DCE security [`Domain`].
//! - The 48-bit `node` is the first hardware address of the host, or a random value with the
//!   multicast bit set if none is available.
//!
//! The clock sequence is incremented whenever the clock fails to move forward, and is carried
//! across process restarts through a [`Saver`] registered with [`register_saver`]. A saver that
//! reports a different node, or none at all, makes the generator start from a random clock
//! sequence instead.
//!
//! # Crate features
//!
//! - `global_gen` (default): the process-wide generator behind [`new_v1`], [`new_v2`], and
//!   [`new_v4`].
//! - `hardware_node` (default): resolves the node from network interfaces.
//! - `serde`: `Serialize` and `Deserialize` for [`Uuid`] and [`Store`].
//! - `file_saver`: [`savers::FileSaver`], a JSON file backed [`Saver`].
//! - `uuid`: conversions from and to `uuid::Uuid`.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::Error;

mod id;
pub use id::{Domain, ParseError, Uuid, Variant};

mod node;
pub use node::{HardwareNode, Node, NodeSource};

mod timestamp;
pub use timestamp::{ClockSource, SystemClock, Timestamp};

mod store;
pub use store::{Saver, Store};

pub mod generator;
pub use generator::{DefaultGenerator, EntropySource, Generator, OsEntropy};

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{default_generator, new_v1, new_v2, new_v4, register_saver};

pub mod savers;

/// A clock sequence. Only the lower 14 bits are significant.
pub type Sequence = u16;

/// The largest clock sequence value that fits in the RFC4122 layout.
pub const MAX_SEQUENCE: Sequence = (1 << 14) - 1;
