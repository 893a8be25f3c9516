use sea_orm::*;

use crate::auth::{hash_password, ROLE_ASSISTANT, ROLE_LIBRARIAN};
use crate::models::user;

/// Create the default staff accounts when USERS is empty, so a fresh
/// database has a librarian and an assistant to log in with. Passwords
/// are stored hashed; change them after first login.
pub async fn ensure_default_users(db: &DatabaseConnection) -> Result<(), DbErr> {
    let existing = user::Entity::find().count(db).await?;
    if existing > 0 {
        return Ok(());
    }

    let defaults = [
        ("admin", "admin123", ROLE_LIBRARIAN),
        ("staff", "staff123", ROLE_ASSISTANT),
    ];

    for (username, password, role) in defaults {
        let password_hash = hash_password(password)
            .map_err(|e| DbErr::Custom(format!("password hashing failed: {}", e)))?;

        let account = user::ActiveModel {
            username: Set(username.to_owned()),
            password_hash: Set(password_hash),
            role: Set(role.to_owned()),
        };
        account.insert(db).await?;
    }

    tracing::info!("created default users: admin (librarian), staff (assistant)");
    Ok(())
}
