/// Score bands shown on the result screen, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Certified,
    GettingThere,
    WrongMajor,
    AreYouSure,
}

impl Tier {
    /// Lower bounds are inclusive and checked top-down.
    pub fn classify(score: i32) -> Self {
        match score {
            s if s >= 15 => Tier::Certified,
            s if s >= 10 => Tier::GettingThere,
            s if s >= 5 => Tier::WrongMajor,
            _ => Tier::AreYouSure,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Tier::Certified => "You're a certified CS student! 🎓",
            Tier::GettingThere => "You're getting there! Keep coding! 💻",
            Tier::WrongMajor => "You might be in the wrong major... 😅",
            Tier::AreYouSure => "Are you sure you're a CS student? 🤔",
        }
    }
}
