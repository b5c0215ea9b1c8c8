//! Media source events and the seek command seam.
//!
//! The real media origin is an external resource reached by URL; lect only
//! models its event vocabulary (progress ticks, metadata) and the seek
//! command surface. [`SimulatedMedia`] is an in-process source used by the
//! TUI and by controller tests.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Path appended to the service base URL when no explicit media source is
/// supplied.
pub const DEFAULT_MEDIA_PATH: &str = "/api/video/default";

/// Notifications pushed by the media source
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    /// The playback clock advanced
    Progress { position: f64 },
    /// Resource metadata became available
    MetadataLoaded { duration: f64 },
}

/// Command surface of the media source: assign a target time
pub trait MediaTransport: Send + Sync {
    fn seek(&self, position: f64);
}

struct MediaClock {
    position: Mutex<f64>,
    playing: AtomicBool,
}

/// In-process media source: ticks a playback clock on a tokio interval and
/// emits [`SourceEvent`]s while playing.
pub struct SimulatedMedia {
    clock: Arc<MediaClock>,
    duration: f64,
}

impl SimulatedMedia {
    /// Create a paused source for a resource of the given duration
    pub fn new(duration: f64) -> Self {
        Self {
            clock: Arc::new(MediaClock {
                position: Mutex::new(0.0),
                playing: AtomicBool::new(false),
            }),
            duration: duration.max(0.0),
        }
    }

    /// Start advancing the clock
    pub fn play(&self) {
        self.clock.playing.store(true, Ordering::Release);
    }

    /// Stop advancing the clock
    pub fn pause(&self) {
        self.clock.playing.store(false, Ordering::Release);
    }

    /// Toggle between playing and paused
    pub fn toggle(&self) {
        self.clock.playing.fetch_xor(true, Ordering::AcqRel);
    }

    /// Whether the clock is currently advancing
    pub fn is_playing(&self) -> bool {
        self.clock.playing.load(Ordering::Acquire)
    }

    /// Spawn the tick task. Emits `MetadataLoaded` once, then `Progress` on
    /// every tick while playing. The task exits when the receiver is dropped.
    pub fn spawn(&self, tick: Duration) -> mpsc::UnboundedReceiver<SourceEvent> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let clock = Arc::clone(&self.clock);
        let duration = self.duration;
        let step = tick.as_secs_f64();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // The first interval tick fires immediately; use it for metadata.
            interval.tick().await;
            if event_tx
                .send(SourceEvent::MetadataLoaded { duration })
                .is_err()
            {
                return;
            }

            loop {
                interval.tick().await;
                if !clock.playing.load(Ordering::Acquire) {
                    continue;
                }
                let position = {
                    let mut position = clock.position.lock();
                    *position = (*position + step).min(duration);
                    if *position >= duration {
                        clock.playing.store(false, Ordering::Release);
                    }
                    *position
                };
                if event_tx.send(SourceEvent::Progress { position }).is_err() {
                    return;
                }
            }
        });

        event_rx
    }
}

impl MediaTransport for SimulatedMedia {
    fn seek(&self, position: f64) {
        let mut current = self.clock.position.lock();
        *current = position.clamp(0.0, self.duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_metadata_emitted_first() {
        let media = SimulatedMedia::new(120.0);
        let mut events = media.spawn(Duration::from_millis(100));
        let first = events.recv().await.unwrap();
        assert_eq!(first, SourceEvent::MetadataLoaded { duration: 120.0 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_ticks_while_playing() {
        let media = SimulatedMedia::new(120.0);
        media.play();
        let mut events = media.spawn(Duration::from_millis(500));
        events.recv().await.unwrap(); // metadata
        let event = events.recv().await.unwrap();
        match event {
            SourceEvent::Progress { position } => assert!(position > 0.0),
            other => panic!("expected progress, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_moves_the_clock() {
        let media = SimulatedMedia::new(120.0);
        media.seek(60.0);
        media.play();
        let mut events = media.spawn(Duration::from_millis(500));
        events.recv().await.unwrap(); // metadata
        let event = events.recv().await.unwrap();
        match event {
            SourceEvent::Progress { position } => assert!(position >= 60.0),
            other => panic!("expected progress, got {:?}", other),
        }
    }

    #[test]
    fn test_seek_clamped_to_duration() {
        let media = SimulatedMedia::new(120.0);
        media.seek(500.0);
        assert_eq!(*media.clock.position.lock(), 120.0);
        media.seek(-3.0);
        assert_eq!(*media.clock.position.lock(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_pauses_at_end_of_media() {
        let media = SimulatedMedia::new(1.0);
        media.seek(0.9);
        media.play();
        let mut events = media.spawn(Duration::from_millis(500));
        events.recv().await.unwrap(); // metadata
        let event = events.recv().await.unwrap();
        assert_eq!(event, SourceEvent::Progress { position: 1.0 });
        assert!(!media.is_playing());
    }
}
