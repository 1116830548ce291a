#[cfg(test)]
mod tests {
    use rocket::http::{ContentType, Status};
    use serde_json::{Value, json};

    use crate::api::CreatedResponse;
    use crate::test::utils::{create_standard_test_db, login, logout, setup_test_client};

    async fn create_post(client: &rocket::local::asynchronous::Client, body: Value) -> i64 {
        let response = client
            .post("/api/posts")
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Created);

        let body = response.into_string().await.unwrap();
        let created: CreatedResponse = serde_json::from_str(&body).unwrap();
        created.id
    }

    #[rocket::async_test]
    async fn test_feed_requires_authentication_for_reads() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db).await;

        let response = client.get("/api/posts").dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);

        let response = client.get("/api/comments").dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    async fn test_post_and_comment_flow() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db).await;

        login(&client, "student_user").await;

        let post_id = create_post(
            &client,
            json!({"title": "First day", "body": "Learned tones today"}),
        )
        .await;

        let response = client
            .post("/api/comments")
            .header(ContentType::JSON)
            .body(json!({"post_id": post_id, "body": "加油!"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);

        let response = client
            .get(format!("/api/posts/{}", post_id))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body = response.into_string().await.unwrap();
        let post: Value = serde_json::from_str(&body).unwrap();

        assert_eq!(post["title"], "First day");
        assert_eq!(post["author_username"], "student_user");

        let comments = post["comments"].as_array().unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0]["body"], "加油!");
        assert_eq!(comments[0]["commenter_username"], "student_user");
    }

    #[rocket::async_test]
    async fn test_unpublished_posts_hidden() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db).await;

        login(&client, "student_user").await;

        let post_id = create_post(
            &client,
            json!({"title": "Draft", "body": "wip", "is_published": false}),
        )
        .await;

        let response = client.get("/api/posts").dispatch().await;
        let body = response.into_string().await.unwrap();
        let posts: Value = serde_json::from_str(&body).unwrap();

        assert!(
            !posts
                .as_array()
                .unwrap()
                .iter()
                .any(|p| p["title"] == "Draft"),
            "Unpublished post appeared in the feed"
        );

        let response = client
            .get(format!("/api/posts/{}", post_id))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn test_comment_update_and_delete() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db).await;

        login(&client, "student_user").await;

        let post_id = create_post(&client, json!({"title": "Q", "body": "?"})).await;

        let response = client
            .post("/api/comments")
            .header(ContentType::JSON)
            .body(json!({"post_id": post_id, "body": "first"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);

        let body = response.into_string().await.unwrap();
        let comment: CreatedResponse = serde_json::from_str(&body).unwrap();

        // The feed policy draws no ownership line: another member may edit.
        logout(&client).await;
        login(&client, "other_student").await;

        let response = client
            .put(format!("/api/comments/{}", comment.id))
            .header(ContentType::JSON)
            .body(json!({"body": "edited"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let response = client
            .get(format!("/api/comments/{}", comment.id))
            .dispatch()
            .await;
        let body = response.into_string().await.unwrap();
        let fetched: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(fetched["body"], "edited");
        assert_eq!(fetched["commenter_username"], "student_user");

        let response = client
            .delete(format!("/api/comments/{}", comment.id))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NoContent);

        let response = client
            .get(format!("/api/comments/{}", comment.id))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn test_comment_on_missing_post_rejected() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db).await;

        login(&client, "student_user").await;

        let response = client
            .post("/api/comments")
            .header(ContentType::JSON)
            .body(json!({"post_id": 4242, "body": "hello?"}).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
    }
}
