mod app;
mod form;
mod input;
mod views;

use app::{App, Mode, PromptAction};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use types_core::config::CONFIG_FILE_NAME;
use types_core::EditorConfig;

const LOG_FILE_NAME: &str = "types_editor.log";

/// The terminal belongs to the UI, so logs go to a file
fn init_logging() {
    let Ok(file) = File::create(LOG_FILE_NAME) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "types_core=info,types_editor=info".into());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn main() -> Result<(), io::Error> {
    init_logging();

    // Load config and create app
    let config = EditorConfig::load_or_default(Path::new(CONFIG_FILE_NAME));
    let mut app = App::new(config);
    if let Some(path) = std::env::args().nth(1) {
        app.import_path(&PathBuf::from(path));
    }
    tracing::info!("editor started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("editor stopped: {err}");
        println!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if let Event::Key(key) = event::read()? {
            // Only handle key press events
            if key.kind != KeyEventKind::Press {
                continue;
            }

            // Clear message on any keypress
            app.clear_message();

            // Ctrl+C always quits
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(());
            }

            // Config error screen only offers quitting
            if app.config_error.is_some() {
                if key.code == KeyCode::Char('q') {
                    return Ok(());
                }
                continue;
            }

            // Handle quit confirmation popup
            if app.show_quit_confirm {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => return Ok(()),
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        app.show_quit_confirm = false;
                    }
                    _ => {}
                }
                continue;
            }

            // Handle delete confirmation popup
            if app.show_delete_confirm {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => {
                        app.confirm_delete();
                        app.show_delete_confirm = false;
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        app.show_delete_confirm = false;
                    }
                    _ => {}
                }
                continue;
            }

            // Handle new list confirmation popup
            if app.show_new_list_confirm {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => {
                        app.new_list();
                        app.show_new_list_confirm = false;
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        app.show_new_list_confirm = false;
                    }
                    _ => {}
                }
                continue;
            }

            // Handle quit
            if key.code == KeyCode::Char('q') && app.mode == Mode::Browse {
                if app.dirty {
                    app.show_quit_confirm = true;
                    continue;
                }
                return Ok(());
            }

            // Handle mode-specific input
            match app.mode {
                Mode::Browse => handle_browse_mode(&mut app, key.code),
                Mode::Edit => handle_edit_mode(&mut app, key.code, key.modifiers),
                Mode::Prompt => handle_prompt_mode(&mut app, key.code),
            }
        }
    }
}

fn handle_browse_mode(app: &mut App, code: KeyCode) {
    match code {
        // List navigation
        KeyCode::Up | KeyCode::Char('k') => app.list_up(),
        KeyCode::Down | KeyCode::Char('j') => app.list_down(),

        // Record actions
        KeyCode::Enter | KeyCode::Char('e') => app.enter_edit_mode(),
        KeyCode::Char('n') => app.enter_create_mode(),
        KeyCode::Char('c') => app.duplicate_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),

        // Files and presets
        KeyCode::Char('i') => app.open_prompt(PromptAction::Import),
        KeyCode::Char('x') => app.open_prompt(PromptAction::Export),
        KeyCode::Char('p') => app.open_prompt(PromptAction::LoadPresets),
        KeyCode::Char('P') => app.clear_presets(),
        KeyCode::Char('N') => app.request_new_list(),

        _ => {}
    }
}

fn handle_edit_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match code {
            KeyCode::Char('s') => app.save_form(),
            KeyCode::Char('p') => app.apply_next_preset(),
            KeyCode::Char('x') => app.list_field_remove(),
            KeyCode::Up | KeyCode::Char('k') => app.prev_field(),
            KeyCode::Down | KeyCode::Char('j') => app.next_field(),
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Tab => app.next_field(),
        KeyCode::BackTab => app.prev_field(),

        // Pick list
        KeyCode::PageDown if app.has_suggestions() => app.suggestion_step(true),
        KeyCode::PageUp if app.has_suggestions() => app.suggestion_step(false),

        // Flags field
        KeyCode::Up if app.is_flags_field() => app.nested_up(),
        KeyCode::Down if app.is_flags_field() => app.nested_down(),

        // List field navigation
        KeyCode::Up if app.is_list_field() => app.nested_up(),
        KeyCode::Down if app.is_list_field() => app.nested_down(),
        KeyCode::Enter if app.is_list_field() => app.list_field_add(),
        // 'x' removes the highlighted entry while nothing is typed
        KeyCode::Char('x') if app.is_list_field() && app.text_input.is_empty() => {
            app.list_field_remove()
        }

        KeyCode::Up => app.prev_field(),
        KeyCode::Down | KeyCode::Enter => app.next_field(),

        // Text input
        KeyCode::Char(c) => app.text_input_char(c),
        KeyCode::Backspace => app.text_input_backspace(),
        KeyCode::Delete => app.text_input_delete(),
        KeyCode::Left => app.text_input_left(),
        KeyCode::Right => app.text_input_right(),
        KeyCode::Home => app.text_input_home(),
        KeyCode::End => app.text_input_end(),

        _ => {}
    }
}

fn handle_prompt_mode(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter => app.confirm_prompt(),
        KeyCode::Esc => app.cancel_prompt(),
        _ => {
            let Some(input) = app.prompt_input() else {
                return;
            };
            match code {
                KeyCode::Char(c) if !c.is_control() => input.insert(c),
                KeyCode::Backspace => input.backspace(),
                KeyCode::Delete => input.delete(),
                KeyCode::Left => input.move_left(),
                KeyCode::Right => input.move_right(),
                KeyCode::Home => input.move_home(),
                KeyCode::End => input.move_end(),
                _ => {}
            }
        }
    }
}
