//! lect-player: Playback position synchronizer
//!
//! Reconciles the media source's asynchronous clock with user-driven seeking.
//! The seek latch decides which producer is authoritative for the current
//! position at any moment.

pub mod controller;
pub mod playback;
pub mod source;

pub use controller::PlayerController;
pub use playback::{format_clock, PlaybackState, SeekLatch};
pub use source::{MediaTransport, SimulatedMedia, SourceEvent, DEFAULT_MEDIA_PATH};
