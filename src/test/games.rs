#[cfg(test)]
mod tests {
    use rocket::http::{ContentType, Status};
    use serde_json::{Value, json};

    use crate::api::CreatedResponse;
    use crate::test::utils::{create_standard_test_db, login, logout, setup_test_client};

    async fn create_resource(
        client: &rocket::local::asynchronous::Client,
        path: &str,
        body: Value,
    ) -> i64 {
        let response = client
            .post(path)
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Created, "POST {} failed", path);

        let body = response.into_string().await.unwrap();
        let created: CreatedResponse = serde_json::from_str(&body).unwrap();
        created.id
    }

    #[rocket::async_test]
    async fn test_single_correct_option_rule() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db).await;

        login(&client, "staff_user").await;

        let question_id = create_resource(
            &client,
            "/api/games/picture-guess",
            json!({
                "image": "picture_guessing/cat.jpg",
                "question_type": "multiple_choice",
                "hanzi_answer": "猫"
            }),
        )
        .await;

        let correct_id = create_resource(
            &client,
            &format!("/api/games/picture-guess/{}/options", question_id),
            json!({"option_text": "猫", "is_correct": true}),
        )
        .await;

        // A second correct option is rejected.
        let response = client
            .post(format!("/api/games/picture-guess/{}/options", question_id))
            .header(ContentType::JSON)
            .body(json!({"option_text": "狗", "is_correct": true}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        // An incorrect one is fine.
        let wrong_id = create_resource(
            &client,
            &format!("/api/games/picture-guess/{}/options", question_id),
            json!({"option_text": "狗", "is_correct": false}),
        )
        .await;

        // Re-saving the correct option as correct excludes itself.
        let response = client
            .put(format!("/api/games/options/{}", correct_id))
            .header(ContentType::JSON)
            .body(json!({"option_text": "猫", "is_correct": true}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        // Promoting the other one while the first is still correct fails.
        let response = client
            .put(format!("/api/games/options/{}", wrong_id))
            .header(ContentType::JSON)
            .body(json!({"option_text": "狗", "is_correct": true}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[rocket::async_test]
    async fn test_option_correctness_never_serialized() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db).await;

        login(&client, "staff_user").await;

        let question_id = create_resource(
            &client,
            "/api/games/picture-guess",
            json!({
                "image": "picture_guessing/tea.jpg",
                "question_type": "multiple_choice",
                "hanzi_answer": "茶"
            }),
        )
        .await;

        create_resource(
            &client,
            &format!("/api/games/picture-guess/{}/options", question_id),
            json!({"option_text": "茶", "is_correct": true}),
        )
        .await;

        logout(&client).await;

        let response = client.get("/api/games/picture-guess").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let body = response.into_string().await.unwrap();
        let questions: Value = serde_json::from_str(&body).unwrap();

        let question = questions
            .as_array()
            .unwrap()
            .iter()
            .find(|q| q["id"] == question_id)
            .expect("Question missing from listing");

        let options = question["options"].as_array().unwrap();
        assert_eq!(options.len(), 1);
        assert!(
            options[0].get("is_correct").is_none(),
            "is_correct leaked into the option representation"
        );
    }

    #[rocket::async_test]
    async fn test_inactive_game_content_hidden() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db).await;

        login(&client, "staff_user").await;

        let inactive_id = create_resource(
            &client,
            "/api/games/picture-guess",
            json!({
                "image": "picture_guessing/old.jpg",
                "hanzi_answer": "旧",
                "is_active": false
            }),
        )
        .await;

        logout(&client).await;

        let response = client.get("/api/games/picture-guess").dispatch().await;
        let body = response.into_string().await.unwrap();
        let questions: Value = serde_json::from_str(&body).unwrap();

        assert!(
            !questions
                .as_array()
                .unwrap()
                .iter()
                .any(|q| q["id"] == inactive_id),
            "Inactive question appeared in the public listing"
        );
    }

    #[rocket::async_test]
    async fn test_matching_exercise_flow() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db).await;

        // Students cannot manage game content.
        login(&client, "student_user").await;

        let response = client
            .post("/api/games/matching")
            .header(ContentType::JSON)
            .body(json!({"title": "Basics", "exercise_type": "pinyin_hanzi"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Forbidden);

        logout(&client).await;
        login(&client, "staff_user").await;

        // The exercise type is constrained.
        let response = client
            .post("/api/games/matching")
            .header(ContentType::JSON)
            .body(json!({"title": "Basics", "exercise_type": "hanzi_morse"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        let exercise_id = create_resource(
            &client,
            "/api/games/matching",
            json!({"title": "Basics", "exercise_type": "pinyin_hanzi"}),
        )
        .await;

        create_resource(
            &client,
            &format!("/api/games/matching/{}/pairs", exercise_id),
            json!({"hanzi": "山", "pinyin": "shān", "english": "mountain"}),
        )
        .await;

        logout(&client).await;

        let response = client.get("/api/games/matching").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let body = response.into_string().await.unwrap();
        let exercises: Value = serde_json::from_str(&body).unwrap();

        let exercise = exercises
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["id"] == exercise_id)
            .expect("Exercise missing from listing");

        assert_eq!(exercise["instructions"], "Match the correct pairs");
        let pairs = exercise["pairs"].as_array().unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0]["hanzi"], "山");
    }

    #[rocket::async_test]
    async fn test_puzzle_tiles_come_back_ordered() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db).await;

        login(&client, "staff_user").await;

        let puzzle_id = create_resource(
            &client,
            "/api/games/puzzles",
            json!({
                "title": "Simple sentence",
                "correct_sentence": "我喜欢茶",
                "pinyin": "wǒ xǐhuān chá",
                "translation": "I like tea"
            }),
        )
        .await;

        // Inserted out of order on purpose.
        for (hanzi, order) in [("喜欢", 2), ("我", 1), ("茶", 3)] {
            create_resource(
                &client,
                &format!("/api/games/puzzles/{}/tiles", puzzle_id),
                json!({"hanzi": hanzi, "order": order}),
            )
            .await;
        }

        logout(&client).await;

        let response = client.get("/api/games/puzzles").dispatch().await;
        let body = response.into_string().await.unwrap();
        let puzzles: Value = serde_json::from_str(&body).unwrap();

        let puzzle = puzzles
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["id"] == puzzle_id)
            .expect("Puzzle missing from listing");

        let tiles: Vec<&str> = puzzle["tiles"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["hanzi"].as_str().unwrap())
            .collect();

        assert_eq!(tiles, vec!["我", "喜欢", "茶"]);
    }
}
