//! Binds playback state to a media transport with a detach guard.

use std::sync::Arc;

use crate::{
    playback::PlaybackState,
    source::{MediaTransport, SourceEvent},
};

/// Owns the [`PlaybackState`] for one attached media resource and forwards
/// user seeks to the transport. Once detached, late source events are
/// discarded instead of being applied to a dead attachment.
pub struct PlayerController {
    state: PlaybackState,
    transport: Arc<dyn MediaTransport>,
    attached: bool,
}

impl PlayerController {
    pub fn new(transport: Arc<dyn MediaTransport>) -> Self {
        Self {
            state: PlaybackState::new(),
            transport,
            attached: true,
        }
    }

    /// The playback state (for rendering)
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Apply a source-pushed event. No-op after detach.
    pub fn apply(&mut self, event: SourceEvent) {
        if !self.attached {
            tracing::debug!(?event, "discarding event for detached player");
            return;
        }
        match event {
            SourceEvent::Progress { position } => self.state.on_source_progress(position),
            SourceEvent::MetadataLoaded { duration } => self.state.on_source_metadata(duration),
        }
    }

    /// Take the seek latch for a user scrub gesture
    pub fn begin_scrub(&mut self) {
        self.state.begin_scrub();
    }

    /// Release the seek latch
    pub fn end_scrub(&mut self) {
        self.state.end_scrub();
    }

    /// Apply a user seek and forward the clamped target to the media source
    pub fn seek_to(&mut self, position: f64) {
        let target = self.state.seek_to(position);
        self.transport.seek(target);
    }

    /// Seek relative to the current position (discrete seek keys)
    pub fn seek_by(&mut self, delta: f64) {
        let target = self.state.current_time() + delta;
        self.seek_to(target);
    }

    /// Detach from the media resource; subsequent events are discarded
    pub fn detach(&mut self) {
        self.attached = false;
    }
}
