//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::{DefaultGenerator, Domain, Error, Saver, Uuid};

/// Returns the process-wide default generator, creating one if none exists.
pub fn default_generator() -> &'static DefaultGenerator {
    static G: sync::OnceLock<DefaultGenerator> = sync::OnceLock::new();
    G.get_or_init(DefaultGenerator::with_defaults)
}

/// Registers a persistence collaborator on the default generator, replacing any previous one.
///
/// The generator reconciles with the saver's state before it mints the next time-based UUID.
pub fn register_saver(saver: sync::Arc<dyn Saver>) {
    default_generator().register_saver(saver)
}

/// Generates a UUIDv1 object.
///
/// This function employs the default generator and guarantees the process-wide uniqueness of
/// time-based UUIDs.
///
/// # Examples
///
/// ```rust
/// let uuid = uuid_gen::new_v1()?;
/// println!("{}", uuid); // e.g., "0d5a0e48-8f5e-11ee-9c1e-0242ac120002"
///
/// let uuid_string: String = uuid_gen::new_v1()?.to_string();
/// # Ok::<(), uuid_gen::Error>(())
/// ```
pub fn new_v1() -> Result<Uuid, Error> {
    default_generator().new_v1()
}

/// Generates a UUIDv2 object embedding `domain`.
///
/// # Examples
///
/// ```rust
/// use uuid_gen::Domain;
///
/// let uuid = uuid_gen::new_v2(Domain::Group)?;
/// assert_eq!(uuid.as_bytes()[9], Domain::Group as u8);
/// # Ok::<(), uuid_gen::Error>(())
/// ```
pub fn new_v2(domain: Domain) -> Result<Uuid, Error> {
    default_generator().new_v2(domain)
}

/// Generates a UUIDv4 object.
///
/// # Examples
///
/// ```rust
/// let uuid = uuid_gen::new_v4()?;
/// println!("{}", uuid); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// # Ok::<(), uuid_gen::Error>(())
/// ```
pub fn new_v4() -> Result<Uuid, Error> {
    default_generator().new_v4()
}
