//! Светлая/тёмная тема как явное состояние приложения.
//!
//! Единственный владелец — [`super::App`]; экраны только читают цвета.
//! Переключение — одна клавиша, без глобальных переменных.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Theme {
    pub mode: ThemeMode,
}

impl Theme {
    pub fn toggle(&mut self) {
        self.mode = match self.mode {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        };
    }

    /// Основной цвет текста.
    pub fn text(&self) -> Color {
        match self.mode {
            ThemeMode::Light => Color::Black,
            ThemeMode::Dark => Color::White,
        }
    }

    /// Второстепенный текст: адреса, подписи, подсказки.
    pub fn muted(&self) -> Color {
        match self.mode {
            ThemeMode::Light => Color::DarkGray,
            ThemeMode::Dark => Color::Gray,
        }
    }

    /// Фирменный зелёный Futzer.
    pub fn accent(&self) -> Color {
        match self.mode {
            ThemeMode::Light => Color::Green,
            ThemeMode::Dark => Color::LightGreen,
        }
    }

    pub fn error(&self) -> Color {
        match self.mode {
            ThemeMode::Light => Color::Red,
            ThemeMode::Dark => Color::LightRed,
        }
    }

    pub fn rating(&self) -> Color {
        Color::Yellow
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.muted())
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.text()).add_modifier(Modifier::BOLD)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.accent())
            .add_modifier(Modifier::BOLD)
    }

    /// Стиль поля ввода в зависимости от фокуса.
    pub fn input(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(self.text())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_modes() {
        let mut theme = Theme::default();
        assert_eq!(theme.mode, ThemeMode::Dark);
        theme.toggle();
        assert_eq!(theme.mode, ThemeMode::Light);
        theme.toggle();
        assert_eq!(theme.mode, ThemeMode::Dark);
    }
}
