use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use super::blocking;
use crate::db::DbPool;
use crate::error::{unique_violation, AppError, Result};
use crate::models::{FromSqliteRow, User, UserRole};

const DUPLICATE_USER: &str = "Username or email is already taken";

#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64> {
        blocking(&self.pool, |conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let id = id.to_string();
        blocking(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?")?;
            let result = stmt.query_row([&id], User::from_row).optional()?;
            Ok(result)
        })
        .await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let username = username.to_string();
        blocking(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM users WHERE username = ?")?;
            let result = stmt.query_row([&username], User::from_row).optional()?;
            Ok(result)
        })
        .await
    }

    pub async fn find_all(&self) -> Result<Vec<User>> {
        blocking(&self.pool, |conn| {
            let mut stmt = conn.prepare("SELECT * FROM users ORDER BY created_at DESC")?;
            let users = stmt
                .query_map([], User::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(users)
        })
        .await
    }

    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User> {
        let user = new_user(username, email, password, role)?;
        let user_clone = user.clone();

        blocking(&self.pool, move |conn| insert_user(conn, &user_clone)).await?;

        Ok(user)
    }

    /// Creates an account, making it an admin when it is the first one.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let mut user = new_user(username, email, password, UserRole::User)?;

        blocking(&self.pool, move |conn| {
            let tx = conn.transaction()?;
            let existing: i64 = tx.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            if existing == 0 {
                user.role = UserRole::Admin;
            }
            insert_user(&tx, &user)?;
            tx.commit()?;
            Ok(user)
        })
        .await
    }

    pub async fn verify_password(&self, username: &str, password: &str) -> Result<Option<User>> {
        let user = self.find_by_username(username).await?;

        match user {
            Some(user) => {
                if verify_password(password, &user.password_hash)? {
                    Ok(Some(user))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        blocking(&self.pool, move |conn| {
            let rows = conn.execute("DELETE FROM users WHERE id = ?", [&id])?;
            Ok(rows > 0)
        })
        .await
    }

    pub async fn update_role(&self, id: &str, role: UserRole) -> Result<bool> {
        let id = id.to_string();
        blocking(&self.pool, move |conn| {
            let rows = conn.execute(
                "UPDATE users SET role = ? WHERE id = ?",
                rusqlite::params![role.as_str(), id],
            )?;
            Ok(rows > 0)
        })
        .await
    }
}

fn new_user(username: &str, email: &str, password: &str, role: UserRole) -> Result<User> {
    Ok(User {
        id: Uuid::new_v4().to_string(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash: hash_password(password)?,
        role,
        created_at: Utc::now(),
    })
}

fn insert_user(conn: &rusqlite::Connection, user: &User) -> Result<()> {
    conn.execute(
        "INSERT INTO users (id, username, email, password_hash, role, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        rusqlite::params![
            user.id,
            user.username,
            user.email,
            user.password_hash,
            user.role.as_str(),
            user.created_at
        ],
    )
    .map_err(|e| unique_violation(e, DUPLICATE_USER))?;
    Ok(())
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::PasswordHash)?
        .to_string();
    Ok(password_hash)
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AppError::PasswordHash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
