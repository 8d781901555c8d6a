//! Cancellable double SHA-256 nonce search.
//!
//! A [`MiningEngine`] appends a 32-bit nonce to an opaque [`HeaderTemplate`],
//! hashes the candidate with SHA-256 twice and compares the digest, read as a
//! big-endian 256-bit integer, against a [`Target`]. Each search runs on its
//! own thread, streams best-effort [`ProgressEvent`]s to a
//! [`ProgressReporter`] and ends with exactly one [`MiningResult`].
//!
//! ```no_run
//! use dsha_miner::{progress_channel, HeaderTemplate, MiningEngine, Target};
//!
//! let engine = MiningEngine::default();
//! let (reporter, progress) = progress_channel(16);
//! let handle = engine
//!     .start(
//!         HeaderTemplate::from("block-header"),
//!         Target::from_leading_zero_bits(16),
//!         0,
//!         reporter,
//!     )
//!     .expect("valid inputs");
//! for event in progress.iter() {
//!     println!("nonce {} after {} attempts", event.nonce, event.attempts);
//! }
//! println!("{:?}", handle.await_result());
//! ```
pub mod config;
pub mod engine;
pub mod error;
pub mod hash;
pub mod progress;
pub mod target;
pub mod template;
pub mod verify;
pub mod work;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use engine::{MiningEngine, MiningHandle, MiningResult, Solution};
pub use error::{Error, VerifyError};
pub use hash::double_sha256;
pub use progress::{progress_channel, ChannelReporter, ProgressEvent, ProgressReporter};
pub use target::Target;
pub use template::{HeaderTemplate, NonceEncoding};
pub use verify::verify_solution;
pub use work::CancelToken;
