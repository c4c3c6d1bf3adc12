//! ResidentRepository - Resident directory consumed by the messaging core

use super::{Read, UserRepository};
use crate::dtos::{CreateResidentDTO, CreateUserDTO};
use crate::entities::{Resident, Role, User};
use sqlx::{Error, SqliteConnection, SqlitePool};

// RESIDENT REPO
pub struct ResidentRepository {
    connection_pool: SqlitePool,
}

impl ResidentRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Look up a resident on the given connection (used inside transactions)
    pub async fn find_by_id(
        conn: &mut SqliteConnection,
        resident_id: i64,
    ) -> Result<Option<Resident>, Error> {
        sqlx::query_as::<_, Resident>(
            "SELECT resident_id, name, flat_number, email, phone FROM residents WHERE resident_id = ?",
        )
        .bind(resident_id)
        .fetch_optional(conn)
        .await
    }

    pub async fn exists(&self, resident_id: &i64) -> Result<bool, Error> {
        Ok(self.read(resident_id).await?.is_some())
    }

    pub async fn find_by_flat_number(&self, flat_number: &str) -> Result<Option<Resident>, Error> {
        sqlx::query_as::<_, Resident>(
            "SELECT resident_id, name, flat_number, email, phone FROM residents WHERE flat_number = ?",
        )
        .bind(flat_number)
        .fetch_optional(&self.connection_pool)
        .await
    }

    pub async fn find_all(&self) -> Result<Vec<Resident>, Error> {
        sqlx::query_as::<_, Resident>(
            "SELECT resident_id, name, flat_number, email, phone FROM residents ORDER BY flat_number ASC",
        )
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Create a resident together with its login account in a single transaction
    ///
    /// # Arguments
    /// * `data` - resident details
    /// * `username` - login name of the new account
    /// * `password_hash` - bcrypt hash of the account password
    pub async fn create_with_account(
        &self,
        data: &CreateResidentDTO,
        username: &str,
        password_hash: &str,
    ) -> Result<(Resident, User), Error> {
        let mut tx = self.connection_pool.begin().await?;

        let resident = Self::insert(&mut *tx, data).await?;
        let user = UserRepository::insert(
            &mut *tx,
            &CreateUserDTO {
                username: username.to_string(),
                password: password_hash.to_string(),
                role: Role::Resident,
                resident_id: Some(resident.resident_id),
            },
        )
        .await?;

        tx.commit().await?;
        Ok((resident, user))
    }

    async fn insert(conn: &mut SqliteConnection, data: &CreateResidentDTO) -> Result<Resident, Error> {
        sqlx::query_as::<_, Resident>(
            r#"
            INSERT INTO residents (name, flat_number, email, phone)
            VALUES (?, ?, ?, ?)
            RETURNING resident_id, name, flat_number, email, phone
            "#,
        )
        .bind(&data.name)
        .bind(&data.flat_number)
        .bind(&data.email)
        .bind(&data.phone)
        .fetch_one(conn)
        .await
    }
}

impl Read<Resident, i64> for ResidentRepository {
    async fn read(&self, id: &i64) -> Result<Option<Resident>, Error> {
        let mut conn = self.connection_pool.acquire().await?;
        Self::find_by_id(&mut conn, *id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_resident(flat_number: &str) -> CreateResidentDTO {
        CreateResidentDTO {
            name: "Dario Neri".to_string(),
            flat_number: flat_number.to_string(),
            email: Some("dario@example.com".to_string()),
            phone: None,
        }
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("residents")))]
    async fn test_lookup_by_flat_number(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = ResidentRepository::new(pool);

        let resident = repo.find_by_flat_number("B-202").await?.expect("resident should exist");
        assert_eq!(resident.resident_id, 2);
        assert!(repo.find_by_flat_number("Z-999").await?.is_none());
        assert!(repo.exists(&1).await?);
        assert!(!repo.exists(&42).await?);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("residents", "users")))]
    async fn test_create_with_account_is_atomic(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = ResidentRepository::new(pool.clone());

        let (resident, user) = repo.create_with_account(&new_resident("D-404"), "dario", "hash").await?;
        assert_eq!(user.resident_id, Some(resident.resident_id));
        assert_eq!(user.role, Role::Resident);

        // username already taken: the resident row must be rolled back too
        let result = repo.create_with_account(&new_resident("E-505"), "dario", "hash").await;
        assert!(result.is_err());
        assert!(repo.find_by_flat_number("E-505").await?.is_none());
        Ok(())
    }
}
