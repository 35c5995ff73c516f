use crate::form::{FormField, RecordForm};
use crate::input::{TextInputState, ValidationMode};
use crate::views;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::path::{Path, PathBuf};
use types_core::config::ConfigError;
use types_core::{
    load_document, save_document, Association, EditorConfig, Flags, PresetLibrary,
    TypeCollection,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Edit,
    Prompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    Import,
    Export,
    LoadPresets,
}

impl PromptAction {
    pub fn title(&self) -> &'static str {
        match self {
            PromptAction::Import => " Import types.xml ",
            PromptAction::Export => " Export types.xml ",
            PromptAction::LoadPresets => " Load Presets from types.xml ",
        }
    }
}

#[derive(Debug)]
pub struct PathPrompt {
    pub action: PromptAction,
    pub input: TextInputState,
}

pub struct App {
    pub config: EditorConfig,
    pub collection: TypeCollection,
    pub presets: PresetLibrary,
    pub list_state: ListState,
    pub mode: Mode,

    pub form: RecordForm,
    pub field_index: usize,
    /// Highlighted flag or list entry inside the current field
    pub nested_index: usize,
    /// Highlighted pick-list suggestion for category and list fields
    pub suggestion_index: usize,
    pub preset_index: Option<usize>,
    pub text_input: TextInputState,

    pub prompt: Option<PathPrompt>,
    pub current_path: Option<PathBuf>,
    pub dirty: bool,
    pub message: Option<String>,

    // Popups
    pub show_quit_confirm: bool,
    pub show_delete_confirm: bool,
    pub show_new_list_confirm: bool,

    // Config load error
    pub config_error: Option<String>,
}

impl App {
    pub fn new(config: Result<EditorConfig, ConfigError>) -> Self {
        let (config, config_error) = match config {
            Ok(config) => (config, None),
            Err(e) => (EditorConfig::default(), Some(e.to_string())),
        };
        let collection = TypeCollection::new(config.suggestions.categories.clone());

        Self {
            config,
            collection,
            presets: PresetLibrary::new(),
            list_state: ListState::default(),
            mode: Mode::Browse,
            form: RecordForm::default(),
            field_index: 0,
            nested_index: 0,
            suggestion_index: 0,
            preset_index: None,
            text_input: TextInputState::default(),
            prompt: None,
            current_path: None,
            dirty: false,
            message: None,
            show_quit_confirm: false,
            show_delete_confirm: false,
            show_new_list_confirm: false,
            config_error,
        }
    }

    fn sync_list_state(&mut self) {
        self.list_state.select(self.collection.selection().index());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn current_field(&self) -> FormField {
        FormField::at(self.field_index).unwrap_or(FormField::Name)
    }

    // Browse mode

    pub fn list_up(&mut self) {
        if let Some(selected) = self.collection.selection().index() {
            if selected > 0 && self.collection.select(selected - 1).is_ok() {
                self.sync_list_state();
            }
        }
    }

    pub fn list_down(&mut self) {
        let next = match self.collection.selection().index() {
            Some(selected) => selected + 1,
            None => 0,
        };
        if self.collection.select(next).is_ok() {
            self.sync_list_state();
        }
    }

    pub fn enter_edit_mode(&mut self) {
        let Some(record) = self.collection.selected_record() else {
            self.message = Some("No type selected".to_string());
            return;
        };
        self.form = RecordForm::from_record(record);
        self.start_editing();
    }

    /// Clear the selection so the next save adds a new type
    pub fn enter_create_mode(&mut self) {
        self.collection.clear_selection();
        self.sync_list_state();
        self.form = RecordForm::default();
        self.start_editing();
    }

    fn start_editing(&mut self) {
        self.mode = Mode::Edit;
        self.field_index = 0;
        self.preset_index = None;
        self.reset_field_cursor();
    }

    pub fn duplicate_selected(&mut self) {
        let Some(index) = self.collection.selection().index() else {
            return;
        };
        match self.collection.duplicate(index) {
            Ok(new_index) => {
                self.dirty = true;
                if let Some(copy) = self.collection.get(new_index) {
                    self.message = Some(format!("Duplicated as {}", copy.name));
                }
            }
            Err(e) => self.message = Some(e.to_string()),
        }
        self.sync_list_state();
    }

    pub fn request_delete(&mut self) {
        if self.collection.selected_record().is_some() {
            self.show_delete_confirm = true;
        }
    }

    pub fn confirm_delete(&mut self) {
        let Some(index) = self.collection.selection().index() else {
            return;
        };
        match self.collection.delete_at(index) {
            Ok(removed) => {
                self.dirty = true;
                self.message = Some(format!("Deleted {}", removed.name));
            }
            Err(e) => self.message = Some(e.to_string()),
        }
        self.sync_list_state();
    }

    pub fn request_new_list(&mut self) {
        if self.dirty {
            self.show_new_list_confirm = true;
        } else {
            self.new_list();
        }
    }

    pub fn new_list(&mut self) {
        self.collection.clear();
        self.current_path = None;
        self.dirty = false;
        self.form = RecordForm::default();
        self.sync_list_state();
        self.message = Some("Started a new list".to_string());
    }

    pub fn clear_presets(&mut self) {
        self.presets.clear();
        self.preset_index = None;
        self.message = Some("Presets cleared".to_string());
    }

    // Path prompt

    pub fn open_prompt(&mut self, action: PromptAction) {
        let initial = match action {
            PromptAction::Import | PromptAction::Export => self
                .current_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "types.xml".to_string()),
            PromptAction::LoadPresets => String::new(),
        };
        self.prompt = Some(PathPrompt {
            action,
            input: TextInputState::new(initial),
        });
        self.mode = Mode::Prompt;
    }

    pub fn prompt_input(&mut self) -> Option<&mut TextInputState> {
        self.prompt.as_mut().map(|p| &mut p.input)
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
        self.mode = Mode::Browse;
    }

    pub fn confirm_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        self.mode = Mode::Browse;

        let raw = prompt.input.value().trim();
        if raw.is_empty() {
            return;
        }
        let path = PathBuf::from(raw);
        match prompt.action {
            PromptAction::Import => self.import_path(&path),
            PromptAction::Export => self.export_path(&path),
            PromptAction::LoadPresets => self.load_presets(&path),
        }
    }

    /// Replace the list with a document; on failure nothing changes
    pub fn import_path(&mut self, path: &Path) {
        let result = load_document(path).and_then(|doc| {
            let count = doc.records.len();
            self.collection.replace_all(doc.records).map(|_| count)
        });
        match result {
            Ok(count) => {
                self.current_path = Some(path.to_path_buf());
                self.dirty = false;
                self.message = Some(format!("Imported {} types from {}", count, path.display()));
            }
            Err(e) => {
                tracing::warn!("import of {} failed: {}", path.display(), e);
                self.message = Some(format!("Import failed: {}", e));
            }
        }
        self.sync_list_state();
    }

    pub fn export_path(&mut self, path: &Path) {
        if self.collection.is_empty() {
            self.message =
                Some("Nothing to export: add at least one type before exporting".to_string());
            return;
        }
        match save_document(path, self.collection.records(), self.config.indent) {
            Ok(()) => {
                self.current_path = Some(path.to_path_buf());
                self.dirty = false;
                self.message = Some(format!("Saved to {}", path.display()));
            }
            Err(e) => self.message = Some(format!("Export failed: {}", e)),
        }
    }

    pub fn load_presets(&mut self, path: &Path) {
        match self.presets.load_from_path(path) {
            Ok(count) => {
                self.preset_index = None;
                self.message = Some(format!("Loaded {} presets from {}", count, path.display()));
            }
            Err(e) => self.message = Some(format!("Load presets failed: {}", e)),
        }
    }

    // Edit mode

    pub fn cancel_edit(&mut self) {
        self.mode = Mode::Browse;
        self.sync_list_state();
    }

    pub fn save_form(&mut self) {
        let saved = self
            .form
            .to_record()
            .and_then(|record| self.collection.save(record));
        match saved {
            Ok(index) => {
                self.dirty = true;
                if let Some(record) = self.collection.get(index) {
                    self.message = Some(format!("Saved {}", record.name));
                }
                self.mode = Mode::Browse;
                self.sync_list_state();
            }
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    /// Fill the form from the next preset without touching the list selection
    pub fn apply_next_preset(&mut self) {
        let count = self.presets.len();
        if count == 0 {
            self.message = Some("No presets loaded (press p in the list to load some)".to_string());
            return;
        }
        let next = self.preset_index.map_or(0, |i| (i + 1) % count);
        let Some(name) = self.presets.names().nth(next).map(str::to_string) else {
            return;
        };
        if let Some(record) = self.presets.get(&name) {
            self.form = RecordForm::from_record(record);
            self.preset_index = Some(next);
            self.message = Some(format!("Preset {}/{}: {}", next + 1, count, name));
            self.reset_field_cursor();
        }
    }

    pub fn next_field(&mut self) {
        if self.field_index + 1 < FormField::COUNT {
            self.field_index += 1;
            self.reset_field_cursor();
        }
    }

    pub fn prev_field(&mut self) {
        if self.field_index > 0 {
            self.field_index -= 1;
            self.reset_field_cursor();
        }
    }

    fn reset_field_cursor(&mut self) {
        self.nested_index = 0;
        self.suggestion_index = 0;
        let field = self.current_field();
        self.text_input = TextInputState::new(self.form.text(field));
    }

    fn write_back_text(&mut self) {
        let field = self.current_field();
        if field.is_text() {
            self.form.set_text(field, self.text_input.value().to_string());
        }
    }

    fn validation_mode(&self) -> ValidationMode {
        match self.current_field() {
            FormField::Int(_) => ValidationMode::Integer,
            _ => ValidationMode::None,
        }
    }

    pub fn text_input_char(&mut self, c: char) {
        if self.current_field() == FormField::Flags {
            if c == ' ' {
                self.toggle_flag();
            }
            return;
        }
        if !self.validation_mode().validate(c) {
            return;
        }
        self.text_input.insert(c);
        self.write_back_text();
    }

    pub fn text_input_backspace(&mut self) {
        self.text_input.backspace();
        self.write_back_text();
    }

    pub fn text_input_delete(&mut self) {
        self.text_input.delete();
        self.write_back_text();
    }

    pub fn text_input_left(&mut self) {
        self.text_input.move_left();
    }

    pub fn text_input_right(&mut self) {
        self.text_input.move_right();
    }

    pub fn text_input_home(&mut self) {
        self.text_input.move_home();
    }

    pub fn text_input_end(&mut self) {
        self.text_input.move_end();
    }

    pub fn is_flags_field(&self) -> bool {
        self.current_field() == FormField::Flags
    }

    pub fn is_list_field(&self) -> bool {
        matches!(self.current_field(), FormField::List(_))
    }

    pub fn has_suggestions(&self) -> bool {
        matches!(
            self.current_field(),
            FormField::Category | FormField::List(_)
        )
    }

    /// Pick list for the current field
    pub fn suggestions(&self) -> Vec<String> {
        let lists = &self.config.suggestions;
        match self.current_field() {
            FormField::Category => self.collection.category_suggestions(),
            FormField::List(Association::Usage) => lists.usages.clone(),
            FormField::List(Association::Value) => lists.values.clone(),
            FormField::List(Association::Tag) => lists.tags.clone(),
            _ => Vec::new(),
        }
    }

    pub fn nested_up(&mut self) {
        if self.nested_index > 0 {
            self.nested_index -= 1;
        }
    }

    pub fn nested_down(&mut self) {
        let len = match self.current_field() {
            FormField::Flags => Flags::KEYS.len(),
            FormField::List(kind) => self.form.list(kind).len(),
            _ => 0,
        };
        if self.nested_index < len.saturating_sub(1) {
            self.nested_index += 1;
        }
    }

    pub fn toggle_flag(&mut self) {
        if let Some(key) = Flags::KEYS.get(self.nested_index) {
            self.form.flags.toggle(key);
        }
    }

    pub fn suggestion_step(&mut self, forward: bool) {
        let suggestions = self.suggestions();
        if suggestions.is_empty() {
            return;
        }
        let len = suggestions.len();
        self.suggestion_index = if forward {
            (self.suggestion_index + 1) % len
        } else {
            (self.suggestion_index + len - 1) % len
        };

        if self.current_field() == FormField::Category {
            let pick = suggestions[self.suggestion_index].clone();
            self.text_input = TextInputState::new(pick);
            self.write_back_text();
        }
    }

    /// Add the typed text, or the highlighted suggestion when nothing is typed
    pub fn list_field_add(&mut self) {
        let FormField::List(kind) = self.current_field() else {
            return;
        };
        let typed = self.text_input.value().trim().to_string();
        let value = if typed.is_empty() {
            match self.suggestions().get(self.suggestion_index) {
                Some(pick) => pick.clone(),
                None => return,
            }
        } else {
            typed
        };

        if self.form.add_to_list(kind, &value) {
            self.nested_index = self.form.list(kind).len() - 1;
            self.text_input = TextInputState::default();
        } else {
            self.message = Some(format!("{} is already listed", value));
        }
    }

    pub fn list_field_remove(&mut self) {
        let FormField::List(kind) = self.current_field() else {
            return;
        };
        if self.form.remove_from_list(kind, self.nested_index).is_some() {
            let len = self.form.list(kind).len();
            if self.nested_index >= len && self.nested_index > 0 {
                self.nested_index -= 1;
            }
        }
    }

    // Rendering
    pub fn render(&mut self, f: &mut Frame) {
        if let Some(ref error) = self.config_error {
            self.render_config_error(f, error.clone());
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title bar
                Constraint::Min(0),    // Main content
                Constraint::Length(3), // Help bar
            ])
            .split(f.area());

        self.render_title(f, chunks[0]);
        self.render_main(f, chunks[1]);
        self.render_help(f, chunks[2]);

        if self.show_quit_confirm {
            self.render_confirm(f, " Confirm Quit ", "You have unsaved changes.", "Quit without saving? (y/n)");
        }
        if self.show_delete_confirm {
            let name = self
                .collection
                .selected_record()
                .map(|r| r.name.clone())
                .unwrap_or_default();
            self.render_confirm(
                f,
                " Confirm Delete ",
                &format!("Delete '{}'?", name),
                "Press y to confirm, n to cancel",
            );
        }
        if self.show_new_list_confirm {
            self.render_confirm(
                f,
                " Discard changes? ",
                "This will clear the current list.",
                "Continue? (y/n)",
            );
        }
        if self.prompt.is_some() {
            self.render_prompt(f);
        }
    }

    fn render_config_error(&self, f: &mut Frame, error: String) {
        let area = centered_rect(60, 40, f.area());
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(Span::styled(
                "Configuration Error",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(error),
            Line::from(""),
            Line::from(Span::styled(
                "Press q to quit",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let paragraph = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
        f.render_widget(paragraph, area);
    }

    fn render_title(&self, f: &mut Frame, area: Rect) {
        let file = self
            .current_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(unsaved list)".to_string());

        let line = Line::from(vec![
            Span::styled(file, Style::default().fg(Color::Cyan)),
            Span::styled(
                format!(
                    "  {} types | {} presets",
                    self.collection.len(),
                    self.presets.len()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        let title = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" types.xml Editor "),
        );
        f.render_widget(title, area);
    }

    fn render_main(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(area);

        self.render_list(f, chunks[0]);
        self.render_detail(f, chunks[1]);
    }

    fn render_list(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .collection
            .records()
            .iter()
            .map(|r| ListItem::new(r.name.clone()))
            .collect();

        let border_style = if self.mode == Mode::Browse {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(" Types "),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_detail(&self, f: &mut Frame, area: Rect) {
        match self.mode {
            Mode::Edit => self.render_edit_form(f, area),
            Mode::Browse | Mode::Prompt => self.render_detail_preview(f, area),
        }
    }

    fn render_detail_preview(&self, f: &mut Frame, area: Rect) {
        let content = match self.collection.selected_record() {
            Some(record) => views::record::render_preview(record),
            None => vec![Line::from("No type selected")],
        };

        let paragraph =
            Paragraph::new(content).block(Block::default().borders(Borders::ALL).title(" Detail "));
        f.render_widget(paragraph, area);
    }

    fn render_edit_form(&self, f: &mut Frame, area: Rect) {
        let title = if self.collection.selection().index().is_none() {
            " New Type "
        } else {
            " Edit Type "
        };

        let content = views::record::render_edit_form(self);
        let paragraph = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title),
        );
        f.render_widget(paragraph, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let help_text = if let Some(ref msg) = self.message {
            Span::styled(msg.clone(), Style::default().fg(Color::Yellow))
        } else {
            match self.mode {
                Mode::Browse => Span::raw(
                    "j/k:Nav | e:Edit | n:New | c:Dup | d:Del | i:Import | x:Export | p/P:Presets | N:New list | q:Quit",
                ),
                Mode::Edit => Span::raw("Tab:Next | Ctrl+P:Preset | Ctrl+S:Save | Esc:Cancel"),
                Mode::Prompt => Span::raw("Enter:Confirm | Esc:Cancel"),
            }
        };

        let dirty_indicator = if self.dirty {
            Span::styled(" [*Modified] ", Style::default().fg(Color::Yellow))
        } else {
            Span::raw("")
        };

        let help = Paragraph::new(Line::from(vec![help_text, dirty_indicator]))
            .block(Block::default().borders(Borders::ALL).title(" Help "));
        f.render_widget(help, area);
    }

    fn render_confirm(&self, f: &mut Frame, title: &str, first: &str, second: &str) {
        let area = centered_rect(40, 20, f.area());
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(first.to_string()),
            Line::from(""),
            Line::from(second.to_string()),
        ];

        let paragraph = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(title.to_string()),
        );
        f.render_widget(paragraph, area);
    }

    fn render_prompt(&self, f: &mut Frame) {
        let Some(prompt) = &self.prompt else {
            return;
        };
        let area = centered_rect(60, 15, f.area());
        f.render_widget(Clear, area);

        let text = vec![
            Line::from("Path:"),
            Line::from(""),
            Line::from(Span::styled(
                prompt.input.display_with_cursor(),
                Style::default().fg(Color::Cyan),
            )),
        ];

        let paragraph = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(prompt.action.title()),
        );
        f.render_widget(paragraph, area);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
