use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, size as terminal_size};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io;
use std::time::Duration;

use crate::config::KeyBindings;
use crate::query::TaskStore;
use crate::tui::app::{App, Mode};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::utils::{ParsedKeyBinding, parse_key_binding};

/// Guard that ensures terminal state is restored even on panic
/// If the terminal is left in raw mode or the alternate screen,
/// the user's shell is unusable.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut guard = Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: false,
        };
        execute!(io::stdout(), EnterAlternateScreen)?;
        guard.alternate_screen_enabled = true;
        Ok(guard)
    }

    /// Manually restore terminal state (called on normal exit)
    /// After calling this, the guard will do nothing on drop
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Ignore errors in drop - we're already in a cleanup path
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

/// Configured dashboard keys, parsed once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    pub quit: ParsedKeyBinding,
    pub list_up: ParsedKeyBinding,
    pub list_down: ParsedKeyBinding,
    pub mark_complete: ParsedKeyBinding,
    pub add_task: ParsedKeyBinding,
    pub filter: ParsedKeyBinding,
    pub toggle_today: ParsedKeyBinding,
    pub help: ParsedKeyBinding,
}

impl KeyMap {
    pub fn from_config(bindings: &KeyBindings) -> Result<Self, TuiError> {
        let parse = |name: &str, value: &str| {
            parse_key_binding(value).map_err(|e| TuiError::KeyBindingError(format!("{}: {}", name, e)))
        };
        Ok(Self {
            quit: parse("quit", &bindings.quit)?,
            list_up: parse("list_up", &bindings.list_up)?,
            list_down: parse("list_down", &bindings.list_down)?,
            mark_complete: parse("mark_complete", &bindings.mark_complete)?,
            add_task: parse("add_task", &bindings.add_task)?,
            filter: parse("filter", &bindings.filter)?,
            toggle_today: parse("toggle_today", &bindings.toggle_today)?,
            help: parse("help", &bindings.help)?,
        })
    }
}

pub fn run_event_loop<S: TaskStore>(mut app: App<S>) -> Result<(), TuiError> {
    // Check terminal size before entering alternate screen
    // so the message lands in the normal terminal
    let (width, height) = terminal_size()?;
    let min_width_with_border = Layout::MIN_WIDTH + 2;
    let min_height_with_border = Layout::MIN_HEIGHT + 2;

    if width < min_width_with_border || height < min_height_with_border {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width_with_border, min_height_with_border
        )));
    }

    let mut guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    loop {
        app.check_status_message_timeout();

        let size = terminal.size()?;
        let terminal_rect = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(terminal_rect);
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        // Only process Press events to avoid duplicate processing on Windows
        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && handle_key_event(&mut app, key_event) {
                    break;
                }
            }
        }
    }

    guard.restore()?;
    Ok(())
}

/// Dispatch one key press. Returns true when the session should end.
pub fn handle_key_event<S: TaskStore>(app: &mut App<S>, key_event: KeyEvent) -> bool {
    // Ctrl+C always quits, whatever the mode
    if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match app.ui.mode {
        Mode::Dialog => {
            app.handle_dialog_key(key_event);
            false
        }
        Mode::Help => {
            handle_help_mode(app, key_event);
            false
        }
        Mode::Filter => {
            handle_filter_mode(app, key_event);
            false
        }
        Mode::View => handle_view_mode(app, key_event),
    }
}

fn handle_help_mode<S: TaskStore>(app: &mut App<S>, key_event: KeyEvent) {
    // Esc or the help binding closes; all other keys are ignored
    if key_event.code == KeyCode::Esc || matches_key_event(key_event, &app.keys.help) {
        app.exit_help_mode();
    }
}

fn handle_filter_mode<S: TaskStore>(app: &mut App<S>, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Esc => app.exit_filter_mode(false),
        KeyCode::Enter => app.exit_filter_mode(true),
        _ => app.handle_filter_key(key_event),
    }
}

fn handle_view_mode<S: TaskStore>(app: &mut App<S>, key_event: KeyEvent) -> bool {
    let keys = app.keys.clone();

    if matches_key_event(key_event, &keys.quit) {
        return true;
    }

    if matches_key_event(key_event, &keys.list_up) || key_event.code == KeyCode::Up {
        app.move_selection_up();
    } else if matches_key_event(key_event, &keys.list_down) || key_event.code == KeyCode::Down {
        app.move_selection_down();
    } else if matches_key_event(key_event, &keys.mark_complete) {
        app.mark_selected_complete();
    } else if matches_key_event(key_event, &keys.add_task) {
        app.open_add_task_dialog();
    } else if matches_key_event(key_event, &keys.filter) {
        app.enter_filter_mode();
    } else if matches_key_event(key_event, &keys.toggle_today) {
        app.toggle_today_only();
    } else if matches_key_event(key_event, &keys.help) {
        app.enter_help_mode();
    }

    false
}

fn matches_key_event(key_event: KeyEvent, binding: &ParsedKeyBinding) -> bool {
    // Primary modifier is Ctrl on Windows/Linux, Option/Alt on macOS
    let has_primary_mod = crate::utils::has_primary_modifier(key_event.modifiers);
    if binding.requires_ctrl != has_primary_mod {
        return false;
    }

    binding.key_code == key_event.code
}
