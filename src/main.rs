//! dirbuf - browse and edit directories as plain text listings
//!
//! Usage: `dirbuf [DIR | FILE]`. Starting on a file opens its directory
//! with the cursor on it.

use std::io::{self, stdout};
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders, Paragraph},
};
use tracing_subscriber::EnvFilter;

use dirbuf::config::{self, Config};
use dirbuf::diagnostics::{AnnotationSource, DiagnosticStore};
use dirbuf::fs::utils::{dirname, normalize};
use dirbuf::git::GitAnnotations;
use dirbuf::input::{self, DialogOutcome};
use dirbuf::prompt::{Answer, InputRequest, Prompt};
use dirbuf::providers::LocalProvider;
use dirbuf::state::mode::{ConfirmState, InputState, PickState};
use dirbuf::state::{App, Command, Effect, Mode};
use dirbuf::store::{KeyValueStore, MemoryStore, TomlStore};
use dirbuf::ui::{Backdrop, DialogWidget, ListingWidget, StatusBar, StatusMessage, Theme, dialog_cursor_position};

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Event wait when annotations are not polled
const IDLE_TICK: Duration = Duration::from_secs(1);

/// Set up panic hook to restore terminal on panic
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Initialize the terminal for TUI mode
fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore terminal to normal mode
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Log to a file in the config directory; the terminal belongs to the UI
fn init_logging() {
    let Some(path) = config::log_file() else {
        return;
    };
    if let Some(dir) = path.parent()
        && std::fs::create_dir_all(dir).is_err()
    {
        return;
    }
    let Ok(file) = std::fs::OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let filter = EnvFilter::try_from_env("DIRBUF_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

/// Prompts answered with modal dialogs drawn over the last frame
struct TerminalPrompt<'t> {
    terminal: &'t mut Tui,
    theme: &'t Theme,
    backdrop: Buffer,
    messages: Vec<StatusMessage>,
    failure: Option<io::Error>,
}

impl<'t> TerminalPrompt<'t> {
    fn new(terminal: &'t mut Tui, theme: &'t Theme, backdrop: Buffer) -> Self {
        Self { terminal, theme, backdrop, messages: Vec::new(), failure: None }
    }

    /// Last message and any terminal failure seen while prompting
    fn finish(mut self) -> (Option<StatusMessage>, Option<io::Error>) {
        (self.messages.pop(), self.failure)
    }

    /// Show `mode` until the user answers it
    fn run_dialog(&mut self, mut mode: Mode) -> DialogOutcome {
        if self.failure.is_some() {
            return dismissed(&mode);
        }
        loop {
            let backdrop = &self.backdrop;
            let theme = self.theme;
            let drawn = self.terminal.draw(|frame| {
                let area = frame.area();
                frame.render_widget(Backdrop::new(backdrop), area);
                frame.render_widget(DialogWidget::new(&mode, theme), area);
                if let Some(position) = dialog_cursor_position(&mode, area) {
                    frame.set_cursor_position(position);
                }
            });
            if let Err(e) = drawn {
                self.failure = Some(e);
                return dismissed(&mode);
            }

            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    let outcome = input::handle_dialog_key(&mut mode, key);
                    if outcome != DialogOutcome::Pending {
                        return outcome;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    self.failure = Some(e);
                    return dismissed(&mode);
                }
            }
        }
    }
}

/// What a dialog answers when it is abandoned
fn dismissed(mode: &Mode) -> DialogOutcome {
    match mode {
        Mode::Confirm(_) => DialogOutcome::Answer(Answer::Cancel),
        Mode::Pick(_) => DialogOutcome::Pick(None),
        Mode::Input(_) | Mode::Normal => DialogOutcome::Input(None),
    }
}

impl Prompt for TerminalPrompt<'_> {
    fn input(&mut self, request: &InputRequest) -> Option<String> {
        match self.run_dialog(Mode::Input(InputState::new(request))) {
            DialogOutcome::Input(value) => value,
            _ => None,
        }
    }

    fn confirm(&mut self, message: &str, accept_label: &str) -> Answer {
        match self.run_dialog(Mode::Confirm(ConfirmState::new(message, accept_label))) {
            DialogOutcome::Answer(answer) => answer,
            _ => Answer::Cancel,
        }
    }

    fn pick(&mut self, title: &str, items: &[String]) -> Option<usize> {
        if items.is_empty() {
            return None;
        }
        match self.run_dialog(Mode::Pick(PickState::new(title, items))) {
            DialogOutcome::Pick(index) => index,
            _ => None,
        }
    }

    fn notify(&mut self, message: &str) {
        self.messages.push(StatusMessage::info(message));
    }

    fn notify_error(&mut self, message: &str) {
        self.messages.push(StatusMessage::error(message));
    }
}

/// Draw the listing and the status bar
fn draw(frame: &mut Frame, app: &mut App, theme: &Theme, message: Option<&StatusMessage>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    let icons = app.config.display.nerd_font_icons;
    let (view, diagnostics) = app.view_with_diagnostics();
    match view {
        Some(view) => {
            let widget = ListingWidget::new(theme)
                .with_diagnostics(diagnostics)
                .with_icons(icons);
            frame.render_stateful_widget(widget, chunks[0], view);
        }
        None => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border).bg(theme.background))
                .style(Style::default().bg(theme.background));
            frame.render_widget(Paragraph::new("").block(block), chunks[0]);
        }
    }

    let cursor_diag = app.view().and_then(|v| app.diagnostics().for_line(v.cursor()));
    let status = StatusBar::new(app.view(), theme)
        .with_git(app.git_status.as_ref())
        .with_message(message)
        .with_diagnostic(cursor_diag);
    frame.render_widget(status, chunks[1]);
}

/// Editor command: config, then $VISUAL, then $EDITOR, then hx or vi
fn resolve_editor(configured: &str) -> String {
    if !configured.trim().is_empty() {
        return configured.trim().to_string();
    }
    std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .ok()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| {
            if cfg!(windows) {
                "notepad".to_string()
            } else if std::process::Command::new("hx").arg("--version").output().is_ok() {
                "hx".to_string()
            } else {
                "vi".to_string()
            }
        })
}

/// Leave the TUI, edit `path`, come back. Returns a message for the status
/// bar if the editor could not be started.
fn open_in_editor(terminal: &mut Tui, app: &mut App, path: &Path) -> io::Result<Option<StatusMessage>> {
    let editor = resolve_editor(&app.config.editor.command);
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or("vi").to_string();
    let args: Vec<&str> = parts.collect();

    restore_terminal()?;
    tracing::info!("editing {:?} with {}", path, program);
    let status = std::process::Command::new(&program).args(&args).arg(path).status();
    *terminal = setup_terminal()?;
    terminal.clear()?;

    app.set_active_document(Some(path.to_path_buf()));

    Ok(match status {
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("could not run {}: {}", program, e);
            Some(StatusMessage::error(format!("Failed to run '{}': {}", program, e)))
        }
    })
}

/// Build the app, falling back to in-memory state when the state file
/// cannot be read
fn build_app(config: Config, start_dir: PathBuf) -> io::Result<(App, Option<StatusMessage>)> {
    let make = |config: Config, store: Box<dyn KeyValueStore>| {
        let fs = LocalProvider::new().with_trash(config.general.use_trash);
        let annotations: Box<dyn AnnotationSource> = if config.display.show_git_status {
            Box::new(GitAnnotations::new())
        } else {
            Box::new(DiagnosticStore::new())
        };
        App::new(config, Box::new(fs), store, annotations, start_dir.clone())
    };

    let store: Box<dyn KeyValueStore> = match config::state_file() {
        Some(path) => Box::new(TomlStore::new(path)),
        None => Box::new(MemoryStore::new()),
    };
    match make(config.clone(), store) {
        Ok(app) => Ok((app, None)),
        Err(e) => {
            tracing::warn!("bookmarks unavailable: {}", e);
            let app = make(config, Box::new(MemoryStore::new())).map_err(|e| io::Error::other(e.to_string()))?;
            Ok((app, Some(StatusMessage::error(format!("Bookmarks unavailable: {}", e)))))
        }
    }
}

/// Resolve the command-line argument into a start directory and an optional
/// document to select
fn start_location(arg: Option<String>) -> io::Result<(PathBuf, Option<PathBuf>)> {
    let cwd = std::env::current_dir()?;
    let Some(arg) = arg else {
        return Ok((cwd, None));
    };
    let path = normalize(&cwd.join(arg));
    if path.is_file() {
        Ok((dirname(&path), Some(path)))
    } else {
        Ok((path, None))
    }
}

/// Main event loop
fn run(terminal: &mut Tui, app: &mut App, theme: &Theme, mut message: Option<StatusMessage>) -> io::Result<()> {
    let poll_every = match app.config.display.git_poll_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    let mut last_poll = Instant::now();

    loop {
        let backdrop = terminal
            .draw(|frame| draw(frame, app, theme, message.as_ref()))?
            .buffer
            .clone();

        if app.should_quit {
            return Ok(());
        }

        let timeout = poll_every
            .map(|every| every.saturating_sub(last_poll.elapsed()))
            .unwrap_or(IDLE_TICK);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let mut prompt = TerminalPrompt::new(terminal, theme, backdrop);
                    let effect = input::handle_normal_key(app, key, &mut prompt);
                    let (notice, failure) = prompt.finish();
                    if let Some(e) = failure {
                        return Err(e);
                    }
                    message = notice;

                    if let Effect::OpenFile(path) = effect {
                        if let Some(error) = open_in_editor(terminal, app, &path)? {
                            message = Some(error);
                        }
                        // The file may have changed on disk
                        let mut prompt = TerminalPrompt::new(terminal, theme, Buffer::default());
                        app.dispatch(Command::Refresh, &mut prompt);
                        if let (Some(notice), _) = prompt.finish() {
                            message = Some(notice);
                        }
                    }
                }
                // Resize just falls through to the next draw
                _ => {}
            }
        }

        if let Some(every) = poll_every
            && last_poll.elapsed() >= every
        {
            app.poll_annotations();
            last_poll = Instant::now();
        }
    }
}

fn main() -> io::Result<()> {
    init_logging();

    let config = Config::load();
    let theme = config.theme.build_theme();
    let (start_dir, document) = start_location(std::env::args().nth(1))?;
    tracing::info!("starting in {:?}", start_dir);

    let (mut app, mut message) = build_app(config, start_dir)?;
    app.set_active_document(document);

    setup_panic_hook();
    let mut terminal = setup_terminal()?;

    let mut prompt = TerminalPrompt::new(&mut terminal, &theme, Buffer::default());
    app.dispatch(Command::Open(None), &mut prompt);
    let (notice, failure) = prompt.finish();
    if let Some(e) = failure {
        restore_terminal()?;
        return Err(e);
    }
    if notice.is_some() {
        message = notice;
    }

    let result = run(&mut terminal, &mut app, &theme, message);

    restore_terminal()?;
    result
}
