pub mod questions;
pub mod tier;

use std::fmt;

use log::debug;
use questions::QUESTIONS;
use tier::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: u32,
    pub text: &'static str,
    pub weight: u32,
}

impl Question {
    pub const fn new(id: u32, text: &'static str, weight: u32) -> Self {
        Self { id, text, weight }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("The quiz is already finished, restart it to answer again")]
    AlreadyFinished,
    #[error("A quiz needs at least one question")]
    NoQuestions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    InProgress { index: usize },
    Finished,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark(on: bool) -> Self {
        if on {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

/// Score adjustment applied by a theme change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusDelta {
    Plus,
    Minus,
}

impl BonusDelta {
    pub fn value(&self) -> i32 {
        match self {
            BonusDelta::Plus => 1,
            BonusDelta::Minus => -1,
        }
    }
}

impl fmt::Display for BonusDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.value())
    }
}

/// What the chat should currently show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuizView<'a> {
    Question {
        number: usize,
        total: usize,
        question: &'a Question,
        progress: f32,
    },
    Result {
        score: i32,
        tier: Tier,
    },
}

/// Progress, answers and the theme bonus of one quiz session.
///
/// Answers are only ever appended by [`QuizEngine::record_answer`], so while
/// the quiz is in progress the number of answers equals the current index.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizEngine {
    questions: &'static [Question],
    progress: Progress,
    answers: Vec<bool>,
    bonus: i32,
    theme: Theme,
    pending_flash: Option<BonusDelta>,
}

impl Default for QuizEngine {
    fn default() -> Self {
        Self::fresh(&QUESTIONS)
    }
}

impl QuizEngine {
    pub fn new(questions: &'static [Question]) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        Ok(Self::fresh(questions))
    }

    fn fresh(questions: &'static [Question]) -> Self {
        Self {
            questions,
            progress: Progress::InProgress { index: 0 },
            answers: Vec::with_capacity(questions.len()),
            bonus: 0,
            theme: Theme::default(),
            pending_flash: None,
        }
    }

    pub fn record_answer(&mut self, value: bool) -> Result<Progress, QuizError> {
        let index = match self.progress {
            Progress::InProgress { index } => index,
            Progress::Finished => return Err(QuizError::AlreadyFinished),
        };

        self.answers.push(value);
        self.progress = if index + 1 < self.questions.len() {
            Progress::InProgress { index: index + 1 }
        } else {
            Progress::Finished
        };
        debug!("Answered question #{} with {}", index + 1, value);

        Ok(self.progress)
    }

    /// Weights of the "yes" answers plus the theme bonus. Valid mid-quiz too.
    pub fn score(&self) -> i32 {
        let answered: u32 = self
            .answers
            .iter()
            .zip(self.questions)
            .filter(|(answer, _)| **answer)
            .map(|(_, question)| question.weight)
            .sum();
        (answered as i32).saturating_add(self.bonus)
    }

    pub fn tier(&self) -> Tier {
        Tier::classify(self.score())
    }

    /// Switches the theme. Only an actual change moves the bonus, and every
    /// change does, so the bonus is unbounded in both directions (it
    /// saturates at the `i32` limits).
    pub fn set_theme(&mut self, on: bool) -> Option<BonusDelta> {
        if on == self.theme.is_dark() {
            return None;
        }

        let delta = if on {
            BonusDelta::Plus
        } else {
            BonusDelta::Minus
        };
        self.bonus = self.bonus.saturating_add(delta.value());
        self.theme = Theme::from_dark(on);
        self.pending_flash = Some(delta);
        debug!("Theme switched to {:?}, bonus is now {}", self.theme, self.bonus);

        Some(delta)
    }

    pub fn toggle_theme(&mut self) -> Option<BonusDelta> {
        self.set_theme(!self.theme.is_dark())
    }

    pub fn take_bonus_flash(&mut self) -> Option<BonusDelta> {
        self.pending_flash.take()
    }

    /// Back to the first question with a zero bonus. The theme stays.
    pub fn restart(&mut self) {
        self.progress = Progress::InProgress { index: 0 };
        self.answers.clear();
        self.bonus = 0;
        self.pending_flash = None;
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.progress == Progress::Finished
    }

    pub fn current_index(&self) -> usize {
        match self.progress {
            Progress::InProgress { index } => index,
            Progress::Finished => self.questions.len() - 1,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.progress {
            Progress::InProgress { index } => self.questions.get(index),
            Progress::Finished => None,
        }
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn progress_fraction(&self) -> f32 {
        match self.progress {
            Progress::InProgress { index } => index as f32 / self.questions.len() as f32,
            Progress::Finished => 1.0,
        }
    }

    pub fn answers(&self) -> &[bool] {
        &self.answers
    }

    pub fn bonus(&self) -> i32 {
        self.bonus
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn view(&self) -> QuizView<'_> {
        match self.progress {
            Progress::InProgress { index } => QuizView::Question {
                number: index + 1,
                total: self.questions.len(),
                question: &self.questions[index],
                progress: self.progress_fraction(),
            },
            Progress::Finished => {
                let score = self.score();
                QuizView::Result {
                    score,
                    tier: Tier::classify(score),
                }
            }
        }
    }
}
