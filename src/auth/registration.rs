//! User registration for Memwall.
//!
//! Registration is invite-gated: every new account redeems exactly one
//! invite code and is granted a batch of fresh codes to pass on.

use thiserror::Error;
use tracing::info;

use crate::auth::invite::{self, InviteError};
use crate::auth::validation::{validate_registration, ValidationError};
use crate::auth::{hash_password, PasswordError};
use crate::db::{InviteCodeRepository, NewUser, User, UserRepository};
use crate::Database;

/// Registration-specific errors.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Validation failed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Invite code rejected.
    #[error("invite error: {0}")]
    Invite(#[from] InviteError),

    /// Password hashing failed.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Desired username (2-20 characters).
    pub username: String,
    /// Password (at least 6 characters).
    pub password: String,
    /// Password confirmation (must match).
    pub confirm_password: String,
    /// Invite code to redeem.
    pub invite_code: String,
    /// Campus.
    pub campus: String,
    /// School type.
    pub school_type: String,
    /// Graduation year.
    pub graduation_year: String,
    /// Class name.
    pub class_name: String,
}

impl RegistrationRequest {
    /// Create a new registration request with empty profile fields.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        invite_code: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            username: username.into(),
            confirm_password: password.clone(),
            password,
            invite_code: invite_code.into(),
            campus: String::new(),
            school_type: String::new(),
            graduation_year: String::new(),
            class_name: String::new(),
        }
    }

    /// Set the profile fields.
    pub fn with_profile(
        mut self,
        campus: impl Into<String>,
        school_type: impl Into<String>,
        graduation_year: impl Into<String>,
        class_name: impl Into<String>,
    ) -> Self {
        self.campus = campus.into();
        self.school_type = school_type.into();
        self.graduation_year = graduation_year.into();
        self.class_name = class_name.into();
        self
    }

    /// Set a differing confirmation value.
    pub fn with_confirm_password(mut self, confirm: impl Into<String>) -> Self {
        self.confirm_password = confirm.into();
        self
    }
}

/// Register a new user.
///
/// All checks run before any mutation: field validation, username
/// uniqueness, then a read-only invite code check. The mutations - user
/// insert, invite consumption, and granting `codes_per_user` fresh codes
/// to the new user - run in one transaction, so a failure at any step
/// leaves no partially registered account behind.
///
/// The invite code is consumed with a conditional update inside the
/// transaction; if another registration redeemed it between the read-only
/// check and the write, this registration rolls back with AlreadyUsed.
pub async fn register(
    db: &Database,
    request: RegistrationRequest,
    codes_per_user: u32,
) -> Result<User, RegistrationError> {
    // 1. Validate all fields
    validate_registration(
        &request.username,
        &request.password,
        &request.confirm_password,
    )?;

    let users = UserRepository::new(db.pool());

    // 2. Check if the username is taken, regardless of the invite code
    if users
        .username_exists(&request.username)
        .await
        .map_err(|e| RegistrationError::Database(e.to_string()))?
    {
        return Err(ValidationError::UsernameTaken.into());
    }

    // 3. Read-only invite check (NotFound / AlreadyUsed surface here)
    let invite = invite::validate(db.pool(), &request.invite_code).await?;

    // 4. Hash the password
    let password_hash = hash_password(&request.password)?;

    // 5. Atomically: insert user, consume code, grant fresh codes
    let mut tx = db
        .begin()
        .await
        .map_err(|e| RegistrationError::Database(e.to_string()))?;

    let new_user = NewUser::new(&request.username, &password_hash)
        .with_profile(
            &request.campus,
            &request.school_type,
            &request.graduation_year,
            &request.class_name,
        )
        .with_invited_by(invite.created_by);

    let user_id = UserRepository::create_in_tx(&mut tx, &new_user)
        .await
        .map_err(|e| RegistrationError::Database(e.to_string()))?;

    let consumed = InviteCodeRepository::consume_in_tx(&mut tx, &request.invite_code, user_id)
        .await
        .map_err(|e| RegistrationError::Database(e.to_string()))?;
    if consumed.is_none() {
        // Lost the race since the read-only check; roll everything back
        drop(tx);
        return Err(InviteError::AlreadyUsed.into());
    }

    for _ in 0..codes_per_user {
        invite::generate_in_tx(&mut tx, Some(user_id)).await?;
    }

    tx.commit()
        .await
        .map_err(|e| RegistrationError::Database(e.to_string()))?;

    let user = users
        .get_by_id(user_id)
        .await
        .map_err(|e| RegistrationError::Database(e.to_string()))?
        .ok_or_else(|| RegistrationError::Database("registered user vanished".to_string()))?;

    info!(
        username = %user.username,
        user_id = user.id,
        invited_by = ?user.invited_by,
        "New user registered"
    );

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::invite::generate;
    use crate::db::InviteCodeRepository;

    async fn setup() -> (Database, String) {
        let db = Database::open_in_memory().await.unwrap();
        let code = generate(db.pool(), None).await.unwrap();
        (db, code.code)
    }

    #[tokio::test]
    async fn test_register_success() {
        let (db, code) = setup().await;

        let request = RegistrationRequest::new("alice", "secret1", code.as_str()).with_profile(
            "East Campus",
            "senior",
            "2025",
            "Class 3",
        );
        let user = register(&db, request, 3).await.unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.campus, "East Campus");
        assert!(!user.is_admin);
        // System code: no inviting user to reference
        assert!(user.invited_by.is_none());
    }

    #[tokio::test]
    async fn test_register_grants_codes_and_consumes_invite() {
        let (db, code) = setup().await;

        let user = register(&db, RegistrationRequest::new("alice", "secret1", code.as_str()), 3)
            .await
            .unwrap();

        let repo = InviteCodeRepository::new(db.pool());

        // The redeemed code is attributed to the new user
        let used = repo.get_by_code(&code).await.unwrap().unwrap();
        assert!(used.is_used());
        assert_eq!(used.used_by, Some(user.id));

        // Exactly 3 fresh unused codes owned by the new user
        let granted = repo.list_by_creator(user.id).await.unwrap();
        assert_eq!(granted.len(), 3);
        assert!(granted.iter().all(|c| !c.is_used()));
    }

    #[tokio::test]
    async fn test_register_invited_by_chain() {
        let (db, code) = setup().await;

        let alice = register(&db, RegistrationRequest::new("alice", "secret1", code.as_str()), 3)
            .await
            .unwrap();

        let repo = InviteCodeRepository::new(db.pool());
        let alice_code = &repo.list_by_creator(alice.id).await.unwrap()[0].code;

        let bob = register(
            &db,
            RegistrationRequest::new("bob", "secret2", alice_code.as_str()),
            3,
        )
        .await
        .unwrap();

        assert_eq!(bob.invited_by, Some(alice.id));
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let (db, code) = setup().await;

        // 5 characters fails on the password rule
        let result = register(&db, RegistrationRequest::new("alice", "12345", code.as_str()), 3).await;
        match result {
            Err(RegistrationError::Validation(e)) => assert_eq!(e.field(), "password"),
            other => panic!("expected validation error, got {other:?}"),
        }

        // 6 characters passes that rule
        assert!(
            register(&db, RegistrationRequest::new("alice", "123456", code.as_str()), 3)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_register_password_mismatch() {
        let (db, code) = setup().await;

        let request =
            RegistrationRequest::new("alice", "secret1", code.as_str()).with_confirm_password("secret2");
        let result = register(&db, request, 3).await;
        assert!(matches!(
            result,
            Err(RegistrationError::Validation(
                ValidationError::PasswordMismatch
            ))
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let (db, code) = setup().await;

        register(&db, RegistrationRequest::new("alice", "secret1", code.as_str()), 3)
            .await
            .unwrap();

        // Duplicate username fails even with a bogus invite code: the
        // username check runs first
        let result = register(
            &db,
            RegistrationRequest::new("alice", "secret1", "NOSUCH"),
            3,
        )
        .await;
        match result {
            Err(RegistrationError::Validation(e)) => assert_eq!(e.field(), "username"),
            other => panic!("expected username validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_invalid_invite() {
        let (db, _code) = setup().await;

        let result = register(
            &db,
            RegistrationRequest::new("alice", "secret1", "NOSUCH"),
            3,
        )
        .await;
        assert!(matches!(
            result,
            Err(RegistrationError::Invite(InviteError::NotFound))
        ));
    }

    #[tokio::test]
    async fn test_register_used_invite() {
        let (db, code) = setup().await;

        register(&db, RegistrationRequest::new("alice", "secret1", code.as_str()), 3)
            .await
            .unwrap();

        let result = register(&db, RegistrationRequest::new("bob", "secret2", code.as_str()), 3).await;
        assert!(matches!(
            result,
            Err(RegistrationError::Invite(InviteError::AlreadyUsed))
        ));

        // The failed registration left nothing behind
        let users = UserRepository::new(db.pool());
        assert!(!users.username_exists("bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_case_insensitive_code() {
        let (db, code) = setup().await;

        let request = RegistrationRequest::new("alice", "secret1", code.to_lowercase());
        assert!(register(&db, request, 3).await.is_ok());
    }

    #[tokio::test]
    async fn test_password_is_hashed() {
        let (db, code) = setup().await;

        let user = register(&db, RegistrationRequest::new("alice", "secret1", code.as_str()), 3)
            .await
            .unwrap();

        assert_ne!(user.password, "secret1");
        assert!(user.password.starts_with("$argon2id$"));
    }
}
