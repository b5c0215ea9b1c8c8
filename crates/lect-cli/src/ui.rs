//! TUI implementation for lect

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};
use tokio::sync::mpsc;

use lect_chat::{ChatController, ChatEvent, Message, Role, session::is_failure_notice};
use lect_player::{PlayerController, SimulatedMedia, SourceEvent, format_clock};
use lect_tui::{
    Theme,
    input::{Action, event_to_action},
    widgets::{InputBox, Spinner, Timeline, Transcript, TranscriptEntry, transcript::transcript_height},
};

/// How far the discrete seek keys jump, in seconds
const SEEK_STEP: f64 = 5.0;

/// Which pane receives input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Chat,
    Player,
}

/// TUI application state
pub struct TuiState {
    /// Question input box
    input: InputBox,
    /// Current transcript scroll position (rendered lines from the top)
    scroll: usize,
    /// Whether the view follows the newest message
    follow: bool,
    /// Which pane has focus
    focus: Focus,
    /// Media source URL shown in the header
    media_url: String,
    /// Theme
    theme: Theme,
    /// Spinner start time for animation
    spinner_start: Instant,
    /// Set by quit actions; the loop exits after the current iteration
    quit: bool,
}

impl TuiState {
    pub fn new(media_url: String) -> Self {
        let mut input = InputBox::new().with_placeholder("Ask a question...");
        input.set_focused(true);
        Self {
            input,
            scroll: 0,
            follow: true,
            focus: Focus::Chat,
            media_url,
            theme: Theme::dark(),
            spinner_start: Instant::now(),
            quit: false,
        }
    }

    /// Handle one input action. Mutates the controllers as needed.
    fn handle_action(
        &mut self,
        action: Action,
        chat: &mut ChatController,
        player: &mut PlayerController,
        media: &SimulatedMedia,
        width: u16,
    ) {
        // Global keys first
        match action {
            Action::Interrupt | Action::Quit | Action::Eof => {
                self.quit = true;
                return;
            }
            Action::Tab => {
                self.focus = match self.focus {
                    Focus::Chat => Focus::Player,
                    Focus::Player => Focus::Chat,
                };
                self.input.set_focused(self.focus == Focus::Chat);
                if self.focus == Focus::Chat && player.state().is_scrubbing() {
                    player.end_scrub();
                }
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Chat => self.handle_chat_action(action, chat, width),
            Focus::Player => Self::handle_player_action(action, player, media),
        }
    }

    fn handle_chat_action(&mut self, action: Action, chat: &mut ChatController, width: u16) {
        match action {
            Action::Submit => {
                if chat.submit(self.input.content()) {
                    self.input.clear();
                    self.spinner_start = Instant::now();
                    self.follow = true;
                }
            }
            Action::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                self.follow = false;
            }
            Action::Down => {
                self.scroll += 1;
            }
            Action::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
                self.follow = false;
            }
            Action::PageDown => {
                self.scroll += 10;
            }
            other => {
                self.input.handle_action(&other, width);
            }
        }
    }

    fn handle_player_action(action: Action, player: &mut PlayerController, media: &SimulatedMedia) {
        match action {
            Action::Char(' ') => media.toggle(),
            Action::Char('s') => {
                if player.state().is_scrubbing() {
                    player.end_scrub();
                } else {
                    player.begin_scrub();
                }
            }
            Action::Submit | Action::Escape => {
                if player.state().is_scrubbing() {
                    player.end_scrub();
                }
            }
            Action::Left => player.seek_by(-SEEK_STEP),
            Action::Right => player.seek_by(SEEK_STEP),
            Action::Home => player.seek_to(0.0),
            Action::End => {
                let duration = player.state().duration();
                player.seek_to(duration);
            }
            _ => {}
        }
    }

    fn entries(transcript: &[Message]) -> Vec<TranscriptEntry> {
        transcript
            .iter()
            .map(|message| match message.role {
                Role::User => TranscriptEntry::user(&message.content),
                Role::Assistant => {
                    let entry = TranscriptEntry::assistant(&message.content);
                    if is_failure_notice(message) {
                        entry.with_error()
                    } else {
                        entry
                    }
                }
            })
            .collect()
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        chat: &ChatController,
        player: &PlayerController,
        media: &SimulatedMedia,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Min(3),    // transcript
                Constraint::Length(1), // timeline
                Constraint::Length(3), // input
                Constraint::Length(1), // status
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0], chat);
        self.render_transcript(frame, chunks[1], chat);
        self.render_timeline(frame, chunks[2], player, media);
        if chat.session().is_pending() {
            self.input.set_placeholder("Waiting for answer...");
        } else {
            self.input.set_placeholder("Ask a question...");
        }
        self.input.render(chunks[3], frame.buffer_mut(), &self.theme);
        self.render_status(frame, chunks[4], chat, player);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, chat: &ChatController) {
        let line = Line::from(vec![
            Span::styled(
                format!("lect · course {} ", chat.session().course_id()),
                self.theme.accent_bold(),
            ),
            Span::styled(format!("· {}", self.media_url), self.theme.dim_style()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_transcript(&mut self, frame: &mut Frame, area: Rect, chat: &ChatController) {
        let entries = Self::entries(chat.session().transcript());
        let height = transcript_height(&entries, area.width as usize);
        let max_scroll = height.saturating_sub(area.height as usize);
        if self.follow || self.scroll > max_scroll {
            self.scroll = max_scroll;
        }
        if self.scroll == max_scroll {
            self.follow = true;
        }

        let transcript = Transcript::new(&entries, &self.theme).scroll(self.scroll);
        frame.render_widget(transcript, area);
    }

    fn render_timeline(
        &self,
        frame: &mut Frame,
        area: Rect,
        player: &PlayerController,
        media: &SimulatedMedia,
    ) {
        let state = player.state();
        let elapsed = format_clock(state.current_time());
        let total = format_clock(state.duration());
        let timeline = Timeline::new(&elapsed, &total, state.progress_fraction(), &self.theme)
            .scrubbing(state.is_scrubbing())
            .playing(media.is_playing());
        frame.render_widget(timeline, area);
    }

    fn render_status(
        &self,
        frame: &mut Frame,
        area: Rect,
        chat: &ChatController,
        player: &PlayerController,
    ) {
        if chat.session().is_pending() {
            let spinner = Spinner::new("Waiting for answer...", &self.theme)
                .with_start_time(self.spinner_start);
            frame.render_widget(spinner, area);
            return;
        }

        let left = match self.focus {
            Focus::Chat => "chat │ Enter: ask │ ↑/↓: scroll",
            Focus::Player if player.state().is_scrubbing() => {
                "player · scrubbing │ ←/→: move │ s/Enter: done"
            }
            Focus::Player => "player │ space: play/pause │ ←/→: seek │ s: scrub",
        };
        let right = "Tab: pane │ Ctrl+C: quit";

        let left_width = left.chars().count();
        let right_width = right.chars().count();
        let available = area.width as usize;

        let line = if left_width + right_width + 2 <= available {
            let spacing = available - left_width - right_width;
            Line::from(vec![
                Span::styled(left, self.theme.dim_style()),
                Span::raw(" ".repeat(spacing)),
                Span::styled(right, self.theme.dim_style()),
            ])
        } else {
            Line::from(Span::styled(left, self.theme.dim_style()))
        };

        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Run the TUI session loop.
///
/// All controller mutation happens here, on one task: terminal input, chat
/// resolutions, and media source events are multiplexed through a single
/// `select!`. On exit the chat controller is closed and the player detached
/// so anything still in flight resolves into the void.
pub async fn run_tui(
    mut chat: ChatController,
    mut chat_events: mpsc::UnboundedReceiver<ChatEvent>,
    mut player: PlayerController,
    media: Arc<SimulatedMedia>,
    mut source_events: mpsc::UnboundedReceiver<SourceEvent>,
    media_url: String,
) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = TuiState::new(media_url);
    let mut event_stream = EventStream::new();
    // Tick keeps the spinner animating while nothing else is happening.
    let mut tick = tokio::time::interval(Duration::from_millis(80));

    let result = loop {
        terminal.draw(|frame| state.render(frame, &chat, &player, &media))?;
        let width = terminal.size()?.width;

        tokio::select! {
            terminal_event = event_stream.next() => {
                match terminal_event {
                    Some(Ok(event)) => {
                        if let Some(action) = event_to_action(event) {
                            state.handle_action(action, &mut chat, &mut player, &media, width);
                        }
                    }
                    Some(Err(e)) => break Err(e.into()),
                    None => break Ok(()),
                }
            }
            Some(event) = chat_events.recv() => {
                chat.apply(event);
                state.follow = true;
            }
            Some(event) = source_events.recv() => {
                player.apply(event);
            }
            _ = tick.tick() => {}
        }

        if state.quit {
            break Ok(());
        }
    };

    // Teardown: late resolutions and source events must not touch the
    // destroyed surfaces.
    chat.close();
    player.detach();
    tracing::debug!("session closed");

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}
