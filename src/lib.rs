//! # cw-paddle-keyer
//!
//! Iambic Morse keyer with a gap-timing decoder.
//!
//! ## Architecture
//!
//! Paddle edges drive an [`IambicKeyer`] that schedules elements on a
//! single [`Scheduler`]. Each sounded element goes to an [`OutputSink`]
//! and, once finished, into the [`Decoder`], which turns silence into
//! character, word and idle boundaries. A [`Session`] owns all of it and
//! is advanced by whoever holds the clock: the tokio [`Runtime`] in real
//! time, or a [`ScriptSession`](console::ScriptSession) in virtual time.
//!
//! All durations derive from one speed setting; see [`Timing`].

pub mod config;
pub mod console;
pub mod decoder;
pub mod element;
pub mod error;
pub mod keyer;
pub mod morse;
pub mod runtime;
pub mod scheduler;
pub mod sender;
pub mod session;
pub mod sink;
pub mod stats;
pub mod timing;

pub use config::KeyerConfig;
pub use decoder::{Boundary, Decoder, IDLE_MARKER, WORD_SEPARATOR};
pub use element::Element;
pub use error::{ConfigError, KeyerError};
pub use keyer::IambicKeyer;
pub use morse::{Category, MorseEntry, MORSE_TABLE, UNKNOWN_GLYPH};
pub use runtime::{Runtime, RuntimeHandle};
pub use scheduler::{Scheduler, SessionToken, TimerHandle};
pub use sender::TextSender;
pub use session::{Event, Session, Snapshot};
pub use sink::{NullSink, OutputSink, RecordingSink, TraceSink};
pub use stats::TimingStats;
pub use timing::Timing;
