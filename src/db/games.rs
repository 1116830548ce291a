use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::error::{AppError, conflict_on_unique};
use crate::models::{
    ChoiceOption, DbChoiceOption, DbMatchingExercise, DbMatchingPair, DbPictureGuessQuestion,
    DbSentencePuzzle, DbWordTile, MatchingExercise, MatchingPair, PictureGuessQuestion,
    SentencePuzzle, WordTile,
};

fn validate_question_type(question_type: &str) -> Result<(), AppError> {
    match question_type {
        "input" | "multiple_choice" => Ok(()),
        _ => Err(AppError::Validation(
            "Question type must be 'input' or 'multiple_choice'".to_string(),
        )),
    }
}

fn validate_exercise_type(exercise_type: &str) -> Result<(), AppError> {
    match exercise_type {
        "pinyin_hanzi" | "hanzi_english" => Ok(()),
        _ => Err(AppError::Validation(
            "Exercise type must be 'pinyin_hanzi' or 'hanzi_english'".to_string(),
        )),
    }
}

// Picture guessing

#[instrument]
pub async fn get_active_guess_questions(
    pool: &Pool<Sqlite>,
) -> Result<Vec<PictureGuessQuestion>, AppError> {
    info!("Listing active picture-guess questions");

    let rows = sqlx::query_as::<_, DbPictureGuessQuestion>(
        "SELECT * FROM picture_guess_questions WHERE is_active = 1 ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    let mut questions = Vec::with_capacity(rows.len());
    for row in rows {
        let mut question = PictureGuessQuestion::from(row);
        question.options = options_for_question(pool, question.id).await?;
        questions.push(question);
    }

    Ok(questions)
}

async fn options_for_question(
    pool: &Pool<Sqlite>,
    question_id: i64,
) -> Result<Vec<ChoiceOption>, AppError> {
    let rows = sqlx::query_as::<_, DbChoiceOption>(
        "SELECT * FROM multiple_choice_options WHERE question_id = ?",
    )
    .bind(question_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ChoiceOption::from).collect())
}

#[allow(clippy::too_many_arguments)]
#[instrument(skip(pool, hint))]
pub async fn create_guess_question(
    pool: &Pool<Sqlite>,
    image: &str,
    question_type: &str,
    hanzi_answer: &str,
    pinyin: &str,
    english: &str,
    hint: &str,
    is_active: bool,
) -> Result<i64, AppError> {
    info!("Creating picture-guess question");

    validate_question_type(question_type)?;

    let res = sqlx::query(
        "INSERT INTO picture_guess_questions
         (image, question_type, hanzi_answer, pinyin, english, hint, is_active)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(image)
    .bind(question_type)
    .bind(hanzi_answer)
    .bind(pinyin)
    .bind(english)
    .bind(hint)
    .bind(is_active)
    .execute(pool)
    .await?;

    Ok(res.last_insert_rowid())
}

#[allow(clippy::too_many_arguments)]
#[instrument(skip(pool, hint))]
pub async fn update_guess_question(
    pool: &Pool<Sqlite>,
    id: i64,
    image: &str,
    question_type: &str,
    hanzi_answer: &str,
    pinyin: &str,
    english: &str,
    hint: &str,
    is_active: bool,
) -> Result<(), AppError> {
    info!("Updating picture-guess question");

    validate_question_type(question_type)?;

    let res = sqlx::query(
        "UPDATE picture_guess_questions
         SET image = ?, question_type = ?, hanzi_answer = ?, pinyin = ?, english = ?,
             hint = ?, is_active = ?
         WHERE id = ?",
    )
    .bind(image)
    .bind(question_type)
    .bind(hanzi_answer)
    .bind(pinyin)
    .bind(english)
    .bind(hint)
    .bind(is_active)
    .bind(id)
    .execute(pool)
    .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Question {} not found", id)));
    }

    Ok(())
}

#[instrument]
pub async fn delete_guess_question(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting picture-guess question");

    let res = sqlx::query("DELETE FROM picture_guess_questions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Question {} not found", id)));
    }

    Ok(())
}

/// At most one option per question may be correct. `exclude` carries the
/// option's own id on updates so flipping other fields stays legal.
async fn ensure_single_correct(
    pool: &Pool<Sqlite>,
    question_id: i64,
    exclude: Option<i64>,
) -> Result<(), AppError> {
    let existing: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM multiple_choice_options WHERE question_id = ? AND is_correct = 1",
    )
    .bind(question_id)
    .fetch_optional(pool)
    .await?;

    match existing {
        Some((id,)) if Some(id) != exclude => Err(AppError::Validation(
            "Only one correct option is allowed per question".to_string(),
        )),
        _ => Ok(()),
    }
}

#[instrument(skip(pool))]
pub async fn create_choice_option(
    pool: &Pool<Sqlite>,
    question_id: i64,
    option_text: &str,
    is_correct: bool,
) -> Result<i64, AppError> {
    info!("Creating choice option");

    let question: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM picture_guess_questions WHERE id = ?")
            .bind(question_id)
            .fetch_optional(pool)
            .await?;
    if question.is_none() {
        return Err(AppError::Validation(format!(
            "Question {} does not exist",
            question_id
        )));
    }

    if is_correct {
        ensure_single_correct(pool, question_id, None).await?;
    }

    let res = sqlx::query(
        "INSERT INTO multiple_choice_options (question_id, option_text, is_correct)
         VALUES (?, ?, ?)",
    )
    .bind(question_id)
    .bind(option_text)
    .bind(is_correct)
    .execute(pool)
    .await
    .map_err(|e| conflict_on_unique(e, "Only one correct option is allowed per question"))?;

    Ok(res.last_insert_rowid())
}

#[instrument(skip(pool))]
pub async fn update_choice_option(
    pool: &Pool<Sqlite>,
    id: i64,
    option_text: &str,
    is_correct: bool,
) -> Result<(), AppError> {
    info!("Updating choice option");

    let row = sqlx::query_as::<_, DbChoiceOption>(
        "SELECT * FROM multiple_choice_options WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let existing = match row {
        Some(option) => option,
        _ => return Err(AppError::NotFound(format!("Option {} not found", id))),
    };

    if is_correct {
        ensure_single_correct(pool, existing.question_id, Some(id)).await?;
    }

    sqlx::query("UPDATE multiple_choice_options SET option_text = ?, is_correct = ? WHERE id = ?")
        .bind(option_text)
        .bind(is_correct)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Only one correct option is allowed per question"))?;

    Ok(())
}

#[instrument]
pub async fn delete_choice_option(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting choice option");

    let res = sqlx::query("DELETE FROM multiple_choice_options WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Option {} not found", id)));
    }

    Ok(())
}

// Matching exercises

#[instrument]
pub async fn get_active_matching_exercises(
    pool: &Pool<Sqlite>,
) -> Result<Vec<MatchingExercise>, AppError> {
    info!("Listing active matching exercises");

    let rows = sqlx::query_as::<_, DbMatchingExercise>(
        "SELECT * FROM matching_exercises WHERE is_active = 1 ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let mut exercises = Vec::with_capacity(rows.len());
    for row in rows {
        let mut exercise = MatchingExercise::from(row);
        exercise.pairs = pairs_for_exercise(pool, exercise.id).await?;
        exercises.push(exercise);
    }

    Ok(exercises)
}

async fn pairs_for_exercise(
    pool: &Pool<Sqlite>,
    exercise_id: i64,
) -> Result<Vec<MatchingPair>, AppError> {
    let rows =
        sqlx::query_as::<_, DbMatchingPair>("SELECT * FROM matching_pairs WHERE exercise_id = ?")
            .bind(exercise_id)
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().map(MatchingPair::from).collect())
}

#[instrument(skip(pool, instructions))]
pub async fn create_matching_exercise(
    pool: &Pool<Sqlite>,
    title: &str,
    instructions: &str,
    exercise_type: &str,
    is_active: bool,
) -> Result<i64, AppError> {
    info!("Creating matching exercise");

    validate_exercise_type(exercise_type)?;

    let res = sqlx::query(
        "INSERT INTO matching_exercises (title, instructions, exercise_type, is_active)
         VALUES (?, ?, ?, ?)",
    )
    .bind(title)
    .bind(instructions)
    .bind(exercise_type)
    .bind(is_active)
    .execute(pool)
    .await?;

    Ok(res.last_insert_rowid())
}

#[instrument(skip(pool, instructions))]
pub async fn update_matching_exercise(
    pool: &Pool<Sqlite>,
    id: i64,
    title: &str,
    instructions: &str,
    exercise_type: &str,
    is_active: bool,
) -> Result<(), AppError> {
    info!("Updating matching exercise");

    validate_exercise_type(exercise_type)?;

    let res = sqlx::query(
        "UPDATE matching_exercises
         SET title = ?, instructions = ?, exercise_type = ?, is_active = ?
         WHERE id = ?",
    )
    .bind(title)
    .bind(instructions)
    .bind(exercise_type)
    .bind(is_active)
    .bind(id)
    .execute(pool)
    .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Exercise {} not found", id)));
    }

    Ok(())
}

#[instrument]
pub async fn delete_matching_exercise(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting matching exercise");

    let res = sqlx::query("DELETE FROM matching_exercises WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Exercise {} not found", id)));
    }

    Ok(())
}

#[instrument(skip(pool))]
pub async fn create_matching_pair(
    pool: &Pool<Sqlite>,
    exercise_id: i64,
    hanzi: &str,
    pinyin: &str,
    english: &str,
) -> Result<i64, AppError> {
    info!("Creating matching pair");

    let exercise: Option<(i64,)> = sqlx::query_as("SELECT id FROM matching_exercises WHERE id = ?")
        .bind(exercise_id)
        .fetch_optional(pool)
        .await?;
    if exercise.is_none() {
        return Err(AppError::Validation(format!(
            "Exercise {} does not exist",
            exercise_id
        )));
    }

    let res = sqlx::query(
        "INSERT INTO matching_pairs (exercise_id, hanzi, pinyin, english) VALUES (?, ?, ?, ?)",
    )
    .bind(exercise_id)
    .bind(hanzi)
    .bind(pinyin)
    .bind(english)
    .execute(pool)
    .await?;

    Ok(res.last_insert_rowid())
}

#[instrument]
pub async fn delete_matching_pair(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting matching pair");

    let res = sqlx::query("DELETE FROM matching_pairs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Pair {} not found", id)));
    }

    Ok(())
}

// Sentence puzzles

#[instrument]
pub async fn get_active_puzzles(pool: &Pool<Sqlite>) -> Result<Vec<SentencePuzzle>, AppError> {
    info!("Listing active sentence puzzles");

    let rows = sqlx::query_as::<_, DbSentencePuzzle>(
        "SELECT * FROM sentence_puzzles WHERE is_active = 1 ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let mut puzzles = Vec::with_capacity(rows.len());
    for row in rows {
        let mut puzzle = SentencePuzzle::from(row);
        puzzle.tiles = tiles_for_puzzle(pool, puzzle.id).await?;
        puzzles.push(puzzle);
    }

    Ok(puzzles)
}

async fn tiles_for_puzzle(pool: &Pool<Sqlite>, puzzle_id: i64) -> Result<Vec<WordTile>, AppError> {
    let rows = sqlx::query_as::<_, DbWordTile>(
        "SELECT * FROM word_tiles WHERE puzzle_id = ? ORDER BY sort_order",
    )
    .bind(puzzle_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(WordTile::from).collect())
}

#[instrument(skip(pool, correct_sentence, translation))]
pub async fn create_puzzle(
    pool: &Pool<Sqlite>,
    title: &str,
    instruction: &str,
    correct_sentence: &str,
    pinyin: &str,
    translation: &str,
    is_active: bool,
) -> Result<i64, AppError> {
    info!("Creating sentence puzzle");

    let res = sqlx::query(
        "INSERT INTO sentence_puzzles
         (title, instruction, correct_sentence, pinyin, translation, is_active)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(title)
    .bind(instruction)
    .bind(correct_sentence)
    .bind(pinyin)
    .bind(translation)
    .bind(is_active)
    .execute(pool)
    .await?;

    Ok(res.last_insert_rowid())
}

#[instrument(skip(pool, correct_sentence, translation))]
pub async fn update_puzzle(
    pool: &Pool<Sqlite>,
    id: i64,
    title: &str,
    instruction: &str,
    correct_sentence: &str,
    pinyin: &str,
    translation: &str,
    is_active: bool,
) -> Result<(), AppError> {
    info!("Updating sentence puzzle");

    let res = sqlx::query(
        "UPDATE sentence_puzzles
         SET title = ?, instruction = ?, correct_sentence = ?, pinyin = ?, translation = ?,
             is_active = ?
         WHERE id = ?",
    )
    .bind(title)
    .bind(instruction)
    .bind(correct_sentence)
    .bind(pinyin)
    .bind(translation)
    .bind(is_active)
    .bind(id)
    .execute(pool)
    .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Puzzle {} not found", id)));
    }

    Ok(())
}

#[instrument]
pub async fn delete_puzzle(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting sentence puzzle");

    let res = sqlx::query("DELETE FROM sentence_puzzles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Puzzle {} not found", id)));
    }

    Ok(())
}

#[instrument(skip(pool))]
pub async fn create_word_tile(
    pool: &Pool<Sqlite>,
    puzzle_id: i64,
    hanzi: &str,
    sort_order: i64,
) -> Result<i64, AppError> {
    info!("Creating word tile");

    let puzzle: Option<(i64,)> = sqlx::query_as("SELECT id FROM sentence_puzzles WHERE id = ?")
        .bind(puzzle_id)
        .fetch_optional(pool)
        .await?;
    if puzzle.is_none() {
        return Err(AppError::Validation(format!(
            "Puzzle {} does not exist",
            puzzle_id
        )));
    }

    let res = sqlx::query("INSERT INTO word_tiles (puzzle_id, hanzi, sort_order) VALUES (?, ?, ?)")
        .bind(puzzle_id)
        .bind(hanzi)
        .bind(sort_order)
        .execute(pool)
        .await?;

    Ok(res.last_insert_rowid())
}

#[instrument]
pub async fn delete_word_tile(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting word tile");

    let res = sqlx::query("DELETE FROM word_tiles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Tile {} not found", id)));
    }

    Ok(())
}
