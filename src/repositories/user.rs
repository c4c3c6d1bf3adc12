//! UserRepository - Repository for login accounts

use super::{Create, Read};
use crate::dtos::CreateUserDTO;
use crate::entities::User;
use sqlx::{Error, SqliteConnection, SqlitePool};

// USER REPO
pub struct UserRepository {
    connection_pool: SqlitePool,
}

impl UserRepository {
    pub fn new(connection_pool: SqlitePool) -> UserRepository {
        Self { connection_pool }
    }

    /// Usernames are unique
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, username, password, role, resident_id FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.connection_pool)
        .await
    }

    /// Resident linked to a login account, `None` for admins and unknown users
    pub async fn resident_id_for_user(&self, user_id: &i64) -> Result<Option<i64>, Error> {
        let resident_id: Option<Option<i64>> =
            sqlx::query_scalar("SELECT resident_id FROM users WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.connection_pool)
                .await?;

        Ok(resident_id.flatten())
    }

    /// Login account of a resident, if the resident has one
    pub async fn user_id_for_resident(&self, resident_id: &i64) -> Result<Option<i64>, Error> {
        sqlx::query_scalar("SELECT user_id FROM users WHERE resident_id = ?")
            .bind(resident_id)
            .fetch_optional(&self.connection_pool)
            .await
    }

    /// Insert an account on the given connection (used inside transactions)
    pub async fn insert(conn: &mut SqliteConnection, data: &CreateUserDTO) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, role, resident_id)
            VALUES (?, ?, ?, ?)
            RETURNING user_id, username, password, role, resident_id
            "#,
        )
        .bind(&data.username)
        .bind(&data.password)
        .bind(data.role)
        .bind(data.resident_id)
        .fetch_one(conn)
        .await
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        let mut conn = self.connection_pool.acquire().await?;
        Self::insert(&mut conn, data).await
    }
}

impl Read<User, i64> for UserRepository {
    async fn read(&self, id: &i64) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, username, password, role, resident_id FROM users WHERE user_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Role;

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("residents", "users")))]
    async fn test_directory_lookups(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        assert_eq!(repo.resident_id_for_user(&2).await?, Some(1));
        assert_eq!(repo.resident_id_for_user(&1).await?, None);
        assert_eq!(repo.resident_id_for_user(&999).await?, None);

        assert_eq!(repo.user_id_for_resident(&2).await?, Some(3));
        assert_eq!(repo.user_id_for_resident(&3).await?, None);

        let admin = repo.find_by_username("admin").await?.expect("admin should exist");
        assert_eq!(admin.role, Role::Admin);
        assert!(admin.resident_id.is_none());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("residents", "users")))]
    async fn test_resident_account_requires_resident(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);
        let result = repo
            .create(&CreateUserDTO {
                username: "ghost".to_string(),
                password: "x".to_string(),
                role: Role::Resident,
                resident_id: None,
            })
            .await;

        assert!(result.is_err(), "a resident account without resident must be rejected");
        Ok(())
    }
}
