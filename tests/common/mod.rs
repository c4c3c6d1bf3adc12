use axum_test::TestServer;
use society_server::core::AppState;
use society_server::messaging::Actor;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Create an AppState for the tests
///
/// # Arguments
/// * `pool` - SQLite connection pool prepared by `#[sqlx::test]`
///
/// # Returns
/// Arc<AppState> with a one hour session lifetime
pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::new(pool, chrono::Duration::hours(1)))
}

/// Create a TestServer for the tests
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = society_server::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Open a session for the given actor, bypassing the password check.
/// The fixture accounts have no usable password hash.
pub fn login_as(state: &AppState, actor: Actor) -> String {
    state.sessions.create(actor)
}

/// Token of the fixture administrator (user 1)
pub fn admin_token(state: &AppState) -> String {
    login_as(state, Actor::admin(1))
}

/// Token of alice (user 2, resident 1)
pub fn alice_token(state: &AppState) -> String {
    login_as(state, Actor::resident(2, 1))
}

/// Token of bruno (user 3, resident 2)
pub fn bruno_token(state: &AppState) -> String {
    login_as(state, Actor::resident(3, 2))
}
