//! Integration tests for the authentication endpoints
//!
//! - POST /auth/login
//! - POST /auth/logout
//! - the authentication and admin middlewares
//!
//! `#[sqlx::test]` creates an isolated SQLite database, applies the
//! migrations from `migrations/` and the requested `fixtures/` scripts.

mod common;

#[cfg(test)]
mod auth_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use society_server::dtos::{CreateUserDTO, LoginResponseDTO};
    use society_server::entities::{Role, User};
    use society_server::repositories::Create;
    use sqlx::SqlitePool;

    async fn add_user(
        state: &society_server::AppState,
        username: &str,
        password: &str,
        role: Role,
        resident_id: Option<i64>,
    ) {
        state
            .user
            .create(&CreateUserDTO {
                username: username.to_string(),
                password: User::hash_password(password).expect("hash"),
                role,
                resident_id,
            })
            .await
            .expect("user should be created");
    }

    // ============================================================
    // POST /auth/login - login_user
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("residents")))]
    async fn test_login_resident_success(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state.clone());
        add_user(&state, "carla", "Secret123", Role::Resident, Some(3)).await;

        let response = server
            .post("/auth/login")
            .json(&json!({ "username": "carla", "password": "Secret123" }))
            .await;

        response.assert_status_ok();
        let body: LoginResponseDTO = response.json();
        assert_eq!(body.role, Role::Resident);
        assert_eq!(body.resident_id, Some(3));
        assert_eq!(body.flat_number.as_deref(), Some("C-303"));
        assert!(state.sessions.resolve(&body.token).is_some());

        Ok(())
    }

    #[sqlx::test]
    async fn test_login_admin_has_no_flat(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state.clone());
        add_user(&state, "manager", "Secret123", Role::Admin, None).await;

        let response = server
            .post("/auth/login")
            .json(&json!({ "username": "manager", "password": "Secret123" }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["role"], "ADMIN");
        assert!(body.get("resident_id").is_none());
        assert!(body.get("flat_number").is_none());

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("residents")))]
    async fn test_login_wrong_password(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state.clone());
        add_user(&state, "carla", "Secret123", Role::Resident, Some(3)).await;

        let response = server
            .post("/auth/login")
            .json(&json!({ "username": "carla", "password": "wrong" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert!(state.sessions.is_empty());

        Ok(())
    }

    #[sqlx::test]
    async fn test_login_unknown_user(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        let response = server
            .post("/auth/login")
            .json(&json!({ "username": "nobody", "password": "Secret123" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);

        Ok(())
    }

    // ============================================================
    // POST /auth/logout - logout_user
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("residents", "users")))]
    async fn test_logout_revokes_session(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state.clone());
        let token = alice_token(&state);

        server
            .get("/residents/1/conversations")
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        server
            .post("/auth/logout")
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        server
            .get("/residents/1/conversations")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        server
            .post("/auth/logout")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        Ok(())
    }

    // ============================================================
    // Middlewares
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("residents", "users")))]
    async fn test_missing_or_unknown_token_is_unauthenticated(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        server
            .get("/residents/1/conversations")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        server
            .get("/admin/messages")
            .authorization_bearer("not-a-session")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("residents", "users")))]
    async fn test_admin_routes_reject_residents(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state.clone());
        let token = alice_token(&state);

        server
            .get("/admin/residents")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        server
            .post("/admin/messages")
            .authorization_bearer(&token)
            .json(&json!({ "recipient_resident_id": 2, "subject": "Hi", "body": "Hello" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        Ok(())
    }

    #[sqlx::test]
    async fn test_root_health_check(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        server.get("/").await.assert_status_ok();
        Ok(())
    }
}
