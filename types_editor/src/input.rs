/// Single-line text input with a character cursor
#[derive(Debug, Default, Clone)]
pub struct TextInputState {
    value: String,
    /// Cursor position counted in characters
    cursor: usize,
}

impl TextInputState {
    pub fn new(value: String) -> Self {
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    fn byte_offset(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Get the value with cursor indicator for display
    pub fn display_with_cursor(&self) -> String {
        let mut result = self.value.clone();
        result.insert(self.byte_offset(self.cursor), '|');
        result
    }
}

/// Which characters a field accepts while typing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    None,
    Integer,
}

impl ValidationMode {
    pub fn validate(&self, c: char) -> bool {
        match self {
            ValidationMode::None => !c.is_control(),
            ValidationMode::Integer => c.is_ascii_digit() || c == '-',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_basic() {
        let mut input = TextInputState::new(String::new());
        for c in "Apple".chars() {
            input.insert(c);
        }
        assert_eq!(input.display_with_cursor(), "Apple|");
    }

    #[test]
    fn test_text_input_backspace() {
        let mut input = TextInputState::new("Apple".to_string());
        input.backspace();
        assert_eq!(input.value(), "Appl");
    }

    #[test]
    fn test_text_input_cursor_movement() {
        let mut input = TextInputState::new("Apple".to_string());
        input.move_left();
        assert_eq!(input.display_with_cursor(), "Appl|e");
        input.move_home();
        assert_eq!(input.display_with_cursor(), "|Apple");
        input.delete();
        assert_eq!(input.value(), "pple");
        input.move_end();
        input.move_right();
        assert_eq!(input.display_with_cursor(), "pple|");
    }

    #[test]
    fn test_text_input_multibyte() {
        let mut input = TextInputState::new("Käse".to_string());
        input.move_left();
        input.move_left();
        input.backspace();
        assert_eq!(input.value(), "Kse");
        input.insert('ä');
        assert_eq!(input.value(), "Käse");
        assert_eq!(input.display_with_cursor(), "Kä|se");
    }

    #[test]
    fn test_validation_modes() {
        assert!(ValidationMode::Integer.validate('5'));
        assert!(ValidationMode::Integer.validate('-'));
        assert!(!ValidationMode::Integer.validate('a'));
        assert!(ValidationMode::None.validate('a'));
        assert!(!ValidationMode::None.validate('\n'));
    }
}
