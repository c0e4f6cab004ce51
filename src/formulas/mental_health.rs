//! Screening questionnaire scoring (PHQ-9, GAD-7)

use crate::types::Questionnaire;
use crate::validation::MAX_ANSWER;

/// Index of the PHQ-9 item about thoughts of self-harm
pub const PHQ9_SELF_HARM_ITEM: usize = 8;

/// Sum of all answers
pub fn total_score(answers: &[u8]) -> u32 {
    answers.iter().map(|a| u32::from(*a)).sum()
}

/// Highest possible total for a questionnaire
pub fn max_score(questionnaire: Questionnaire) -> u32 {
    questionnaire.item_count() as u32 * u32::from(MAX_ANSWER)
}

/// Whether the answers call for urgent support regardless of total score
pub fn needs_urgent_support(questionnaire: Questionnaire, answers: &[u8]) -> bool {
    match questionnaire {
        Questionnaire::Phq9 => answers
            .get(PHQ9_SELF_HARM_ITEM)
            .is_some_and(|answer| *answer > 0),
        Questionnaire::Gad7 => false,
    }
}
