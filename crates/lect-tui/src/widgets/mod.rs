//! Custom widgets for the TUI

pub mod input_box;
pub mod spinner;
pub mod timeline;
pub mod transcript;

pub use input_box::InputBox;
pub use spinner::Spinner;
pub use timeline::Timeline;
pub use transcript::{Transcript, TranscriptEntry};
