use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde::Deserialize;
use sqlx::{Pool, Sqlite};
use validator::Validate;

use crate::auth::{Permission, User};
use crate::db::{
    create_choice_option, create_guess_question, create_matching_exercise, create_matching_pair,
    create_puzzle, create_word_tile, delete_choice_option, delete_guess_question,
    delete_matching_exercise, delete_matching_pair, delete_puzzle, delete_word_tile,
    get_active_guess_questions, get_active_matching_exercises, get_active_puzzles,
    update_choice_option, update_guess_question, update_matching_exercise, update_puzzle,
};
use crate::models::{MatchingExercise, PictureGuessQuestion, SentencePuzzle};
use crate::validation::{AppErrorExt, JsonValidateExt, PermissionCheckExt, ValidationResponse};

use super::{CreatedResponse, default_true};

// Game content mirrors the lesson surfaces: anyone can read the active
// records, staff manage them. Updates take the full payload.

#[get("/games/picture-guess")]
pub async fn api_get_guess_questions(
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<PictureGuessQuestion>>, Status> {
    let questions = get_active_guess_questions(db).await?;

    Ok(Json(questions))
}

#[derive(Deserialize, Validate)]
pub struct GuessQuestionRequest {
    #[validate(length(min = 1, message = "Image path is required"))]
    image: String,
    #[serde(default = "default_question_type")]
    question_type: String,
    #[validate(length(min = 1, max = 50, message = "Answer must be 1-50 characters"))]
    hanzi_answer: String,
    #[serde(default)]
    pinyin: String,
    #[serde(default)]
    english: String,
    #[serde(default)]
    hint: String,
    #[serde(default = "default_true")]
    is_active: bool,
}

fn default_question_type() -> String {
    "input".to_string()
}

#[post("/games/picture-guess", data = "<question>")]
pub async fn api_create_guess_question(
    question: Json<GuessQuestionRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<CreatedResponse>>, Custom<Json<ValidationResponse>>> {
    user.require_permission(Permission::ManageContent)
        .validate_custom()?;

    let validated = question.validate_custom()?;

    let id = create_guess_question(
        db,
        &validated.image,
        &validated.question_type,
        &validated.hanzi_answer,
        &validated.pinyin,
        &validated.english,
        &validated.hint,
        validated.is_active,
    )
    .await
    .validate_custom()?;

    Ok(Custom(Status::Created, Json(CreatedResponse { id })))
}

#[put("/games/picture-guess/<id>", data = "<question>")]
pub async fn api_update_guess_question(
    id: i64,
    question: Json<GuessQuestionRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Custom<Json<ValidationResponse>>> {
    user.require_permission(Permission::ManageContent)
        .validate_custom()?;

    let validated = question.validate_custom()?;

    update_guess_question(
        db,
        id,
        &validated.image,
        &validated.question_type,
        &validated.hanzi_answer,
        &validated.pinyin,
        &validated.english,
        &validated.hint,
        validated.is_active,
    )
    .await
    .validate_custom()?;

    Ok(Status::Ok)
}

#[delete("/games/picture-guess/<id>")]
pub async fn api_delete_guess_question(
    id: i64,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    user.require_permission(Permission::ManageContent)?;

    delete_guess_question(db, id).await?;

    Ok(Status::NoContent)
}

#[derive(Deserialize, Validate)]
pub struct ChoiceOptionRequest {
    #[validate(length(min = 1, max = 100, message = "Option text must be 1-100 characters"))]
    option_text: String,
    #[serde(default)]
    is_correct: bool,
}

#[post("/games/picture-guess/<question_id>/options", data = "<option>")]
pub async fn api_create_choice_option(
    question_id: i64,
    option: Json<ChoiceOptionRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<CreatedResponse>>, Custom<Json<ValidationResponse>>> {
    user.require_permission(Permission::ManageContent)
        .validate_custom()?;

    let validated = option.validate_custom()?;

    let id = create_choice_option(db, question_id, &validated.option_text, validated.is_correct)
        .await
        .validate_custom()?;

    Ok(Custom(Status::Created, Json(CreatedResponse { id })))
}

#[put("/games/options/<id>", data = "<option>")]
pub async fn api_update_choice_option(
    id: i64,
    option: Json<ChoiceOptionRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Custom<Json<ValidationResponse>>> {
    user.require_permission(Permission::ManageContent)
        .validate_custom()?;

    let validated = option.validate_custom()?;

    update_choice_option(db, id, &validated.option_text, validated.is_correct)
        .await
        .validate_custom()?;

    Ok(Status::Ok)
}

#[delete("/games/options/<id>")]
pub async fn api_delete_choice_option(
    id: i64,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    user.require_permission(Permission::ManageContent)?;

    delete_choice_option(db, id).await?;

    Ok(Status::NoContent)
}

#[get("/games/matching")]
pub async fn api_get_matching_exercises(
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<MatchingExercise>>, Status> {
    let exercises = get_active_matching_exercises(db).await?;

    Ok(Json(exercises))
}

#[derive(Deserialize, Validate)]
pub struct MatchingExerciseRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    title: String,
    #[serde(default = "default_instructions")]
    instructions: String,
    exercise_type: String,
    #[serde(default = "default_true")]
    is_active: bool,
}

fn default_instructions() -> String {
    "Match the correct pairs".to_string()
}

#[post("/games/matching", data = "<exercise>")]
pub async fn api_create_matching_exercise(
    exercise: Json<MatchingExerciseRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<CreatedResponse>>, Custom<Json<ValidationResponse>>> {
    user.require_permission(Permission::ManageContent)
        .validate_custom()?;

    let validated = exercise.validate_custom()?;

    let id = create_matching_exercise(
        db,
        &validated.title,
        &validated.instructions,
        &validated.exercise_type,
        validated.is_active,
    )
    .await
    .validate_custom()?;

    Ok(Custom(Status::Created, Json(CreatedResponse { id })))
}

#[put("/games/matching/<id>", data = "<exercise>")]
pub async fn api_update_matching_exercise(
    id: i64,
    exercise: Json<MatchingExerciseRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Custom<Json<ValidationResponse>>> {
    user.require_permission(Permission::ManageContent)
        .validate_custom()?;

    let validated = exercise.validate_custom()?;

    update_matching_exercise(
        db,
        id,
        &validated.title,
        &validated.instructions,
        &validated.exercise_type,
        validated.is_active,
    )
    .await
    .validate_custom()?;

    Ok(Status::Ok)
}

#[delete("/games/matching/<id>")]
pub async fn api_delete_matching_exercise(
    id: i64,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    user.require_permission(Permission::ManageContent)?;

    delete_matching_exercise(db, id).await?;

    Ok(Status::NoContent)
}

#[derive(Deserialize, Validate)]
pub struct MatchingPairRequest {
    #[validate(length(min = 1, max = 50, message = "Hanzi must be 1-50 characters"))]
    hanzi: String,
    #[serde(default)]
    pinyin: String,
    #[serde(default)]
    english: String,
}

#[post("/games/matching/<exercise_id>/pairs", data = "<pair>")]
pub async fn api_create_matching_pair(
    exercise_id: i64,
    pair: Json<MatchingPairRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<CreatedResponse>>, Custom<Json<ValidationResponse>>> {
    user.require_permission(Permission::ManageContent)
        .validate_custom()?;

    let validated = pair.validate_custom()?;

    let id = create_matching_pair(
        db,
        exercise_id,
        &validated.hanzi,
        &validated.pinyin,
        &validated.english,
    )
    .await
    .validate_custom()?;

    Ok(Custom(Status::Created, Json(CreatedResponse { id })))
}

#[delete("/games/pairs/<id>")]
pub async fn api_delete_matching_pair(
    id: i64,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    user.require_permission(Permission::ManageContent)?;

    delete_matching_pair(db, id).await?;

    Ok(Status::NoContent)
}

#[get("/games/puzzles")]
pub async fn api_get_puzzles(
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<SentencePuzzle>>, Status> {
    let puzzles = get_active_puzzles(db).await?;

    Ok(Json(puzzles))
}

#[derive(Deserialize, Validate)]
pub struct SentencePuzzleRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    title: String,
    #[serde(default = "default_instruction")]
    instruction: String,
    #[validate(length(min = 1, message = "Sentence is required"))]
    correct_sentence: String,
    #[serde(default)]
    pinyin: String,
    #[serde(default)]
    translation: String,
    #[serde(default = "default_true")]
    is_active: bool,
}

fn default_instruction() -> String {
    "Reorder the sentence correctly".to_string()
}

#[post("/games/puzzles", data = "<puzzle>")]
pub async fn api_create_puzzle(
    puzzle: Json<SentencePuzzleRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<CreatedResponse>>, Custom<Json<ValidationResponse>>> {
    user.require_permission(Permission::ManageContent)
        .validate_custom()?;

    let validated = puzzle.validate_custom()?;

    let id = create_puzzle(
        db,
        &validated.title,
        &validated.instruction,
        &validated.correct_sentence,
        &validated.pinyin,
        &validated.translation,
        validated.is_active,
    )
    .await
    .validate_custom()?;

    Ok(Custom(Status::Created, Json(CreatedResponse { id })))
}

#[put("/games/puzzles/<id>", data = "<puzzle>")]
pub async fn api_update_puzzle(
    id: i64,
    puzzle: Json<SentencePuzzleRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Custom<Json<ValidationResponse>>> {
    user.require_permission(Permission::ManageContent)
        .validate_custom()?;

    let validated = puzzle.validate_custom()?;

    update_puzzle(
        db,
        id,
        &validated.title,
        &validated.instruction,
        &validated.correct_sentence,
        &validated.pinyin,
        &validated.translation,
        validated.is_active,
    )
    .await
    .validate_custom()?;

    Ok(Status::Ok)
}

#[delete("/games/puzzles/<id>")]
pub async fn api_delete_puzzle(
    id: i64,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    user.require_permission(Permission::ManageContent)?;

    delete_puzzle(db, id).await?;

    Ok(Status::NoContent)
}

#[derive(Deserialize, Validate)]
pub struct WordTileRequest {
    #[validate(length(min = 1, max = 20, message = "Hanzi must be 1-20 characters"))]
    hanzi: String,
    #[serde(default)]
    order: i64,
}

#[post("/games/puzzles/<puzzle_id>/tiles", data = "<tile>")]
pub async fn api_create_word_tile(
    puzzle_id: i64,
    tile: Json<WordTileRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<CreatedResponse>>, Custom<Json<ValidationResponse>>> {
    user.require_permission(Permission::ManageContent)
        .validate_custom()?;

    let validated = tile.validate_custom()?;

    let id = create_word_tile(db, puzzle_id, &validated.hanzi, validated.order)
        .await
        .validate_custom()?;

    Ok(Custom(Status::Created, Json(CreatedResponse { id })))
}

#[delete("/games/tiles/<id>")]
pub async fn api_delete_word_tile(
    id: i64,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    user.require_permission(Permission::ManageContent)?;

    delete_word_tile(db, id).await?;

    Ok(Status::NoContent)
}
