use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use super::utc;

/// Wire form of a multiple-choice option. Which option is correct stays
/// server-side, same as quiz answers.
#[derive(Serialize, Clone)]
pub struct ChoiceOption {
    pub id: i64,
    pub question_id: i64,
    pub option_text: String,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbChoiceOption {
    pub id: i64,
    pub question_id: i64,
    pub option_text: String,
    pub is_correct: bool,
}

impl From<DbChoiceOption> for ChoiceOption {
    fn from(option: DbChoiceOption) -> Self {
        Self {
            id: option.id,
            question_id: option.question_id,
            option_text: option.option_text,
        }
    }
}

#[derive(Serialize, Clone)]
pub struct PictureGuessQuestion {
    pub id: i64,
    pub image: String,
    pub question_type: String,
    pub hanzi_answer: String,
    pub pinyin: String,
    pub english: String,
    pub hint: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub options: Vec<ChoiceOption>,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbPictureGuessQuestion {
    pub id: i64,
    pub image: String,
    pub question_type: String,
    pub hanzi_answer: String,
    pub pinyin: String,
    pub english: String,
    pub hint: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl From<DbPictureGuessQuestion> for PictureGuessQuestion {
    fn from(question: DbPictureGuessQuestion) -> Self {
        Self {
            id: question.id,
            image: question.image,
            question_type: question.question_type,
            hanzi_answer: question.hanzi_answer,
            pinyin: question.pinyin,
            english: question.english,
            hint: question.hint,
            is_active: question.is_active,
            created_at: utc(question.created_at),
            options: Vec::new(),
        }
    }
}

#[derive(Serialize, Clone)]
pub struct MatchingPair {
    pub id: i64,
    pub exercise_id: i64,
    pub hanzi: String,
    pub pinyin: String,
    pub english: String,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbMatchingPair {
    pub id: i64,
    pub exercise_id: i64,
    pub hanzi: String,
    pub pinyin: String,
    pub english: String,
}

impl From<DbMatchingPair> for MatchingPair {
    fn from(pair: DbMatchingPair) -> Self {
        Self {
            id: pair.id,
            exercise_id: pair.exercise_id,
            hanzi: pair.hanzi,
            pinyin: pair.pinyin,
            english: pair.english,
        }
    }
}

#[derive(Serialize, Clone)]
pub struct MatchingExercise {
    pub id: i64,
    pub title: String,
    pub instructions: String,
    pub exercise_type: String,
    pub is_active: bool,
    pub pairs: Vec<MatchingPair>,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbMatchingExercise {
    pub id: i64,
    pub title: String,
    pub instructions: String,
    pub exercise_type: String,
    pub is_active: bool,
}

impl From<DbMatchingExercise> for MatchingExercise {
    fn from(exercise: DbMatchingExercise) -> Self {
        Self {
            id: exercise.id,
            title: exercise.title,
            instructions: exercise.instructions,
            exercise_type: exercise.exercise_type,
            is_active: exercise.is_active,
            pairs: Vec::new(),
        }
    }
}

#[derive(Serialize, Clone)]
pub struct WordTile {
    pub id: i64,
    pub puzzle_id: i64,
    pub hanzi: String,
    pub order: i64,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbWordTile {
    pub id: i64,
    pub puzzle_id: i64,
    pub hanzi: String,
    pub sort_order: i64,
}

impl From<DbWordTile> for WordTile {
    fn from(tile: DbWordTile) -> Self {
        Self {
            id: tile.id,
            puzzle_id: tile.puzzle_id,
            hanzi: tile.hanzi,
            order: tile.sort_order,
        }
    }
}

#[derive(Serialize, Clone)]
pub struct SentencePuzzle {
    pub id: i64,
    pub title: String,
    pub instruction: String,
    pub correct_sentence: String,
    pub pinyin: String,
    pub translation: String,
    pub is_active: bool,
    pub tiles: Vec<WordTile>,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbSentencePuzzle {
    pub id: i64,
    pub title: String,
    pub instruction: String,
    pub correct_sentence: String,
    pub pinyin: String,
    pub translation: String,
    pub is_active: bool,
}

impl From<DbSentencePuzzle> for SentencePuzzle {
    fn from(puzzle: DbSentencePuzzle) -> Self {
        Self {
            id: puzzle.id,
            title: puzzle.title,
            instruction: puzzle.instruction,
            correct_sentence: puzzle.correct_sentence,
            pinyin: puzzle.pinyin,
            translation: puzzle.translation,
            is_active: puzzle.is_active,
            tiles: Vec::new(),
        }
    }
}
