use teloxide::types::{KeyboardButton, KeyboardMarkup};

use crate::quiz::{BonusDelta, Progress, QuizEngine, QuizError, QuizView, Theme};

pub const HEADING: &str = "What's My CS Score? 🎮";
pub const YES: &str = "YES";
pub const NO: &str = "NO";
pub const DARK_MODE: &str = "🌙 Dark mode";
pub const LIGHT_MODE: &str = "☀️ Light mode";
pub const TAKE_AGAIN: &str = "Take Test Again";

const PROGRESS_WIDTH: usize = 18;

/// A button press or command, independent of how it was sent.
///
/// Theme buttons name the theme they ask for, so a press coming from an
/// outdated keyboard cannot flip the theme back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Answer(bool),
    SetTheme(bool),
    ToggleTheme,
    Restart,
}

impl Action {
    pub fn from_text(text: &str) -> Option<Self> {
        match text.trim() {
            YES => Some(Action::Answer(true)),
            NO => Some(Action::Answer(false)),
            DARK_MODE => Some(Action::SetTheme(true)),
            LIGHT_MODE => Some(Action::SetTheme(false)),
            TAKE_AGAIN => Some(Action::Restart),
            _ => None,
        }
    }

    pub fn apply(self, engine: &mut QuizEngine) -> Result<Progress, QuizError> {
        match self {
            Action::Answer(value) => return engine.record_answer(value),
            Action::SetTheme(on) => {
                engine.set_theme(on);
            }
            Action::ToggleTheme => {
                engine.toggle_theme();
            }
            Action::Restart => engine.restart(),
        }
        Ok(engine.progress())
    }
}

pub fn progress_bar(fraction: f32, theme: Theme) -> String {
    let (filled, empty) = if theme.is_dark() {
        ('▰', '▱')
    } else {
        ('■', '□')
    };
    let done = ((fraction.clamp(0.0, 1.0) * PROGRESS_WIDTH as f32).round()) as usize;

    std::iter::repeat(filled)
        .take(done)
        .chain(std::iter::repeat(empty).take(PROGRESS_WIDTH - done))
        .collect()
}

pub fn screen_text(engine: &QuizEngine) -> String {
    match engine.view() {
        QuizView::Question {
            number,
            total,
            question,
            progress,
        } => format!(
            "{}\n{} {}/{}\n\nQuestion {}: {}",
            HEADING,
            progress_bar(progress, engine.theme()),
            number - 1,
            total,
            number,
            question.text
        ),
        QuizView::Result { score, tier } => format!(
            "{}\n\nYour CS Score: {}\n{}",
            HEADING,
            score,
            tier.message()
        ),
    }
}

pub fn theme_button(theme: Theme) -> KeyboardButton {
    if theme.is_dark() {
        KeyboardButton::new(LIGHT_MODE)
    } else {
        KeyboardButton::new(DARK_MODE)
    }
}

pub fn keyboard(engine: &QuizEngine) -> KeyboardMarkup {
    let main_row = if engine.is_finished() {
        vec![KeyboardButton::new(TAKE_AGAIN)]
    } else {
        vec![KeyboardButton::new(YES), KeyboardButton::new(NO)]
    };

    KeyboardMarkup::new(vec![main_row, vec![theme_button(engine.theme())]])
}

pub fn flash_text(delta: BonusDelta) -> String {
    let marker = match delta {
        BonusDelta::Plus => "🟢",
        BonusDelta::Minus => "🔴",
    };
    format!("{} {}", marker, delta)
}
