#[cfg(test)]
mod tests {
    use rocket::http::{ContentType, Status};
    use serde_json::{Value, json};

    use crate::test::utils::{create_standard_test_db, login, logout, setup_test_client};

    #[rocket::async_test]
    async fn test_about_flow() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db).await;

        // Nothing configured yet.
        let response = client.get("/api/about").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);

        // Students cannot write it.
        login(&client, "student_user").await;
        let response = client
            .put("/api/about")
            .header(ContentType::JSON)
            .body(json!({"content": "nope"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Forbidden);

        logout(&client).await;
        login(&client, "staff_user").await;

        let response = client
            .put("/api/about")
            .header(ContentType::JSON)
            .body(json!({"content": "Welcome to the course"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        // A second write replaces the singleton rather than adding a row.
        let response = client
            .put("/api/about")
            .header(ContentType::JSON)
            .body(json!({"content": "Welcome back"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        logout(&client).await;

        let response = client.get("/api/about").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let body = response.into_string().await.unwrap();
        let about: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(about["content"], "Welcome back");
    }

    #[rocket::async_test]
    async fn test_profile_flow() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db).await;

        login(&client, "student_user").await;

        let response = client.get("/api/profile").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let body = response.into_string().await.unwrap();
        let profile: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(profile["bio"], "");
        assert_eq!(profile["avatar"], Value::Null);

        let response = client
            .put("/api/profile")
            .header(ContentType::JSON)
            .body(json!({"bio": "Learning Mandarin"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let response = client.get("/api/profile").dispatch().await;
        let body = response.into_string().await.unwrap();
        let profile: Value = serde_json::from_str(&body).unwrap();

        assert_eq!(profile["bio"], "Learning Mandarin");
        assert_eq!(profile["avatar"], Value::Null, "avatar was clobbered");
    }
}
