#[cfg(test)]
mod tests {
    use rocket::http::{ContentType, Status};
    use serde_json::{Value, json};

    use crate::api::CreatedResponse;
    use crate::test::utils::{
        TestDbBuilder, create_standard_test_db, login, logout, setup_test_client,
    };

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
    async fn test_chapter_nesting_and_answer_hiding() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db).await;

        login(&client, "admin_user").await;

        let chapter_id = create_resource(
            &client,
            "/api/chapters",
            json!({"title": "HSK1", "order": 1, "is_published": true}),
        )
        .await;

        let lesson_id = create_resource(
            &client,
            "/api/lessons",
            json!({"chapter_id": chapter_id, "title": "Greetings", "order": 1, "is_published": true}),
        )
        .await;

        create_resource(
            &client,
            "/api/flashcards",
            json!({"lesson_id": lesson_id, "hanzi": "你好", "pinyin": "nǐ hǎo", "meaning": "hello"}),
        )
        .await;

        create_resource(
            &client,
            "/api/quizzes",
            json!({
                "lesson_id": lesson_id,
                "question": "How do you greet someone?",
                "option_a": "你好",
                "option_b": "再见",
                "option_c": "谢谢",
                "option_d": "对不起",
                "correct_answer": "A"
            }),
        )
        .await;

        // Reads are open; check the nested shape as an anonymous client.
        logout(&client).await;

        let response = client.get("/api/chapters").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let body = response.into_string().await.unwrap();
        let chapters: Value = serde_json::from_str(&body).unwrap();

        let hsk1 = chapters
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["title"] == "HSK1")
            .expect("HSK1 chapter missing from listing");

        let lessons = hsk1["lessons"].as_array().unwrap();
        let greetings = lessons
            .iter()
            .find(|l| l["title"] == "Greetings")
            .expect("Greetings lesson missing from chapter");

        assert_eq!(greetings["flashcards"].as_array().unwrap().len(), 1);
        assert_eq!(greetings["flashcards"][0]["hanzi"], "你好");

        let quizzes = greetings["quizzes"].as_array().unwrap();
        assert_eq!(quizzes.len(), 1);
        assert_eq!(quizzes[0]["question"], "How do you greet someone?");
        assert!(
            quizzes[0].get("correct_answer").is_none(),
            "correct_answer leaked into the quiz representation"
        );
    }

    #[rocket::async_test]
    async fn test_unpublished_content_hidden_from_everyone() {
        let test_db = TestDbBuilder::new()
            .admin("admin_user")
            .chapter("Visible", 1, true)
            .chapter("Drafts", 2, false)
            .lesson("Visible", "Shown", 1, true)
            .lesson("Visible", "Hidden", 2, false)
            .build()
            .await
            .expect("Failed to build test DB");

        let (client, test_db) = setup_test_client(test_db).await;

        // Admins get no special view of unpublished content.
        login(&client, "admin_user").await;

        let response = client.get("/api/chapters").dispatch().await;
        let body = response.into_string().await.unwrap();
        let chapters: Value = serde_json::from_str(&body).unwrap();
        let titles: Vec<&str> = chapters
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["title"].as_str().unwrap())
            .collect();

        assert!(titles.contains(&"Visible"));
        assert!(!titles.contains(&"Drafts"));

        let drafts_id = test_db.chapter_id("Drafts").unwrap();
        let response = client
            .get(format!("/api/chapters/{}", drafts_id))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);

        let response = client.get("/api/lessons").dispatch().await;
        let body = response.into_string().await.unwrap();
        let lessons: Value = serde_json::from_str(&body).unwrap();
        let titles: Vec<&str> = lessons
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["title"].as_str().unwrap())
            .collect();

        assert!(titles.contains(&"Shown"));
        assert!(!titles.contains(&"Hidden"));

        let hidden_id = test_db.lesson_id("Hidden").unwrap();
        let response = client
            .get(format!("/api/lessons/{}", hidden_id))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn test_content_write_permissions() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db).await;

        let payload = json!({"title": "Numbers", "order": 2}).to_string();

        // Anonymous writes are rejected outright.
        let response = client
            .post("/api/chapters")
            .header(ContentType::JSON)
            .body(payload.clone())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);

        // Anonymous reads succeed.
        let response = client.get("/api/chapters").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        // Students can read but not write.
        login(&client, "student_user").await;

        let response = client
            .post("/api/chapters")
            .header(ContentType::JSON)
            .body(payload.clone())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Forbidden);

        let response = client.get("/api/chapters").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        // Staff can write.
        logout(&client).await;
        login(&client, "staff_user").await;

        let response = client
            .post("/api/chapters")
            .header(ContentType::JSON)
            .body(payload)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);
    }

    #[rocket::async_test]
    async fn test_quiz_answer_letter_validation() {
        let test_db = create_standard_test_db().await;
        let (client, test_db) = setup_test_client(test_db).await;

        let lesson_id = test_db.lesson_id("Greetings").unwrap();

        login(&client, "staff_user").await;

        let mut payload = json!({
            "lesson_id": lesson_id,
            "question": "Pick one",
            "option_a": "a",
            "option_b": "b",
            "option_c": "c",
            "option_d": "d",
            "correct_answer": "E"
        });

        let response = client
            .post("/api/quizzes")
            .header(ContentType::JSON)
            .body(payload.to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        payload["correct_answer"] = json!("C");
        let quiz_id = {
            let response = client
                .post("/api/quizzes")
                .header(ContentType::JSON)
                .body(payload.to_string())
                .dispatch()
                .await;
            assert_eq!(response.status(), Status::Created);

            let body = response.into_string().await.unwrap();
            let created: CreatedResponse = serde_json::from_str(&body).unwrap();
            created.id
        };

        let response = client
            .put(format!("/api/quizzes/{}", quiz_id))
            .header(ContentType::JSON)
            .body(json!({"correct_answer": "Z"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        let response = client
            .put(format!("/api/quizzes/{}", quiz_id))
            .header(ContentType::JSON)
            .body(json!({"correct_answer": "A"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
    }

    #[rocket::async_test]
    async fn test_chapter_delete_cascades() {
        let test_db = create_standard_test_db().await;
        let (client, test_db) = setup_test_client(test_db).await;

        login(&client, "staff_user").await;

        let chapter_id = create_resource(
            &client,
            "/api/chapters",
            json!({"title": "Doomed", "order": 9}),
        )
        .await;

        let lesson_id = create_resource(
            &client,
            "/api/lessons",
            json!({"chapter_id": chapter_id, "title": "Doomed lesson", "order": 1}),
        )
        .await;

        create_resource(
            &client,
            "/api/flashcards",
            json!({"lesson_id": lesson_id, "hanzi": "水", "pinyin": "shuǐ", "meaning": "water"}),
        )
        .await;

        create_resource(
            &client,
            "/api/quizzes",
            json!({
                "lesson_id": lesson_id,
                "question": "q",
                "option_a": "a",
                "option_b": "b",
                "option_c": "c",
                "option_d": "d",
                "correct_answer": "B"
            }),
        )
        .await;

        let response = client
            .delete(format!("/api/chapters/{}", chapter_id))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NoContent);

        let lessons: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM lessons WHERE chapter_id = ?")
                .bind(chapter_id)
                .fetch_one(&test_db.pool)
                .await
                .unwrap();
        assert_eq!(lessons, 0, "Lessons survived the chapter delete");

        let flashcards: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM flashcards WHERE lesson_id = ?")
                .bind(lesson_id)
                .fetch_one(&test_db.pool)
                .await
                .unwrap();
        assert_eq!(flashcards, 0, "Flashcards survived the chapter delete");

        let quizzes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quizzes WHERE lesson_id = ?")
            .bind(lesson_id)
            .fetch_one(&test_db.pool)
            .await
            .unwrap();
        assert_eq!(quizzes, 0, "Quizzes survived the chapter delete");
    }

    #[rocket::async_test]
    async fn test_user_delete_nulls_chapter_creator() {
        let test_db = create_standard_test_db().await;
        let (client, test_db) = setup_test_client(test_db).await;

        login(&client, "staff_user").await;

        let chapter_id = create_resource(
            &client,
            "/api/chapters",
            json!({"title": "Orphaned", "order": 5}),
        )
        .await;

        logout(&client).await;
        login(&client, "admin_user").await;

        let staff_id = test_db.user_id("staff_user").unwrap();
        let response = client
            .delete(format!("/api/users/{}", staff_id))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NoContent);

        let created_by: Option<i64> =
            sqlx::query_scalar("SELECT created_by FROM chapters WHERE id = ?")
                .bind(chapter_id)
                .fetch_one(&test_db.pool)
                .await
                .unwrap();
        assert_eq!(created_by, None, "created_by was not nulled");

        // The chapter itself survives.
        let response = client
            .get(format!("/api/chapters/{}", chapter_id))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
    }
}
