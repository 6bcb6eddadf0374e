use crate::quiz::Question;

pub const QUESTION_COUNT: usize = 18;

// Order matters: answers are matched to weights by position
pub static QUESTIONS: [Question; QUESTION_COUNT] = [
    Question::new(1, "Do you always wear a jacket?", 1),
    Question::new(2, "Do you know what soap is?", 2),
    Question::new(3, "Are you a nerd?", 1),
    Question::new(4, "Do you watch anime?", 1),
    Question::new(5, "Do you play Genshin/Valorant/Honkai?", 1),
    Question::new(6, "Are you a Discord expert?", 1),
    Question::new(7, "Do you avoid making the first move?", 1),
    Question::new(8, "Are you an introvert?", 1),
    Question::new(9, "Can you fix a refrigerator?", 1),
    Question::new(10, "Are you a red flag?", 2),
    Question::new(11, "Are you always busy?", 1),
    Question::new(12, "Do you use a mechanical keyboard?", 1),
    Question::new(13, "Do you give mixed signals?", 1),
    Question::new(14, "Do you drink coffee?", 1),
    Question::new(15, "Are Indian YouTubers your best friends?", 1),
    Question::new(16, "Are you good at math?", 1),
    Question::new(17, "Do you hate GE courses?", 1),
    Question::new(18, "Are you a procrastinator?", 1),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_and_ordered() {
        let ids = QUESTIONS.iter().map(|q| q.id).collect::<Vec<_>>();
        let unique = ids.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), QUESTION_COUNT);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn weights_are_positive_and_sum_to_twenty() {
        assert!(QUESTIONS.iter().all(|q| q.weight >= 1));
        let total: u32 = QUESTIONS.iter().map(|q| q.weight).sum();
        assert_eq!(total, 20);
    }
}
