//! Playback state: believed position and duration, plus the seek latch.

/// Which producer currently owns the playback position.
///
/// While `UserControlled`, source-pushed progress is ignored so the slider
/// cannot jump back under the user's cursor mid-scrub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeekLatch {
    /// Source progress events are authoritative
    #[default]
    Idle,
    /// The user's scrub gesture is authoritative
    UserControlled,
}

/// Believed current time and duration of the attached media resource.
///
/// `duration == 0.0` means metadata has not loaded yet. Once known,
/// `current_time <= duration` holds.
#[derive(Debug, Clone, Default)]
pub struct PlaybackState {
    current_time: f64,
    duration: f64,
    latch: SeekLatch,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position in seconds
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Total duration in seconds; 0.0 until metadata loads
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Whether the user currently owns the position
    pub fn is_scrubbing(&self) -> bool {
        self.latch == SeekLatch::UserControlled
    }

    /// Apply a source-pushed position update. Ignored while the user holds
    /// the latch.
    pub fn on_source_progress(&mut self, position: f64) {
        if self.latch == SeekLatch::UserControlled {
            return;
        }
        self.current_time = self.clamp_position(position);
    }

    /// Apply source metadata. May arrive at any time, including mid-scrub.
    pub fn on_source_metadata(&mut self, duration: f64) {
        self.duration = duration.max(0.0);
        self.current_time = self.clamp_position(self.current_time);
    }

    /// Take the latch: the user's gesture becomes authoritative
    pub fn begin_scrub(&mut self) {
        self.latch = SeekLatch::UserControlled;
    }

    /// Release the latch: source progress resumes authority
    pub fn end_scrub(&mut self) {
        self.latch = SeekLatch::Idle;
    }

    /// Apply a user seek. Sets the position and returns the clamped target
    /// to forward to the media source as a seek command.
    pub fn seek_to(&mut self, position: f64) -> f64 {
        self.current_time = self.clamp_position(position);
        self.current_time
    }

    /// Fraction of the resource played through, in `[0, 1]`. Returns 0 while
    /// the duration is unknown.
    pub fn progress_fraction(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn clamp_position(&self, position: f64) -> f64 {
        let position = position.max(0.0);
        if self.duration > 0.0 {
            position.min(self.duration)
        } else {
            position
        }
    }
}

/// Format a position in seconds as `M:SS`. Negative input is clamped to 0.
pub fn format_clock(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, secs)
}
