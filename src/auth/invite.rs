//! Invite code generation and validation.
//!
//! Tokens are short uppercase strings drawn from an alphabet without
//! look-alike characters (no 0/O or 1/I). Generation collision-checks the
//! fresh token against existing codes; the UNIQUE constraint on the code
//! column is the backstop for the rare race between two generators.

use rand::Rng;
use thiserror::Error;
use tracing::info;

use crate::db::{DbPool, DbTransaction, InviteCode, InviteCodeRepository, NewInviteCode};

/// Characters used in invite codes.
const CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of a generated invite code.
pub const CODE_LENGTH: usize = 6;

/// Attempts before giving up on finding a collision-free token.
const MAX_GENERATION_ATTEMPTS: usize = 16;

/// Invite code errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InviteError {
    /// No such code exists.
    #[error("invite code not found")]
    NotFound,

    /// The code was already redeemed.
    #[error("invite code already used")]
    AlreadyUsed,

    /// Token generation kept colliding.
    #[error("could not generate a unique invite code")]
    Exhausted,

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

impl From<crate::WallError> for InviteError {
    fn from(e: crate::WallError) -> Self {
        InviteError::Database(e.to_string())
    }
}

/// Produce a random candidate token.
fn random_token() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CODE_CHARSET.len());
            CODE_CHARSET[idx] as char
        })
        .collect()
}

/// Generate and persist a fresh invite code.
///
/// `created_by` is None for system codes. The token is collision-checked
/// against existing codes before insertion.
pub async fn generate(
    pool: &DbPool,
    created_by: Option<i64>,
) -> Result<InviteCode, InviteError> {
    let repo = InviteCodeRepository::new(pool);

    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let token = random_token();
        if repo.code_exists(&token).await? {
            continue;
        }

        let code = repo
            .create(&NewInviteCode {
                code: token,
                created_by,
            })
            .await?;

        info!(code = %code.code, created_by = ?created_by, "Invite code generated");
        return Ok(code);
    }

    Err(InviteError::Exhausted)
}

/// Generate a batch of invite codes with the same creator.
pub async fn generate_batch(
    pool: &DbPool,
    created_by: Option<i64>,
    count: u32,
) -> Result<Vec<InviteCode>, InviteError> {
    let mut codes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        codes.push(generate(pool, created_by).await?);
    }
    Ok(codes)
}

/// Generate and persist a fresh invite code within an open transaction.
///
/// Used by registration, which grants codes to the new user in the same
/// transaction that creates them.
pub async fn generate_in_tx(
    tx: &mut DbTransaction<'_>,
    created_by: Option<i64>,
) -> Result<String, InviteError> {
    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let token = random_token();

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM invite_codes WHERE code = $1)")
                .bind(&token)
                .fetch_one(&mut **tx)
                .await
                .map_err(|e| InviteError::Database(e.to_string()))?;
        if exists {
            continue;
        }

        InviteCodeRepository::create_in_tx(
            tx,
            &NewInviteCode {
                code: token.clone(),
                created_by,
            },
        )
        .await?;

        return Ok(token);
    }

    Err(InviteError::Exhausted)
}

/// Ensure a fresh installation has invite codes to hand out.
///
/// With no users and no system codes yet, nobody could ever register, so
/// generate an initial batch and log them for the operator. Returns the
/// generated codes, empty if bootstrapping was not needed.
pub async fn ensure_bootstrap_codes(
    pool: &DbPool,
    count: u32,
) -> Result<Vec<InviteCode>, InviteError> {
    let users = crate::db::UserRepository::new(pool);
    let codes = InviteCodeRepository::new(pool);

    let user_count = users.count().await?;
    let system_codes = codes.list_system().await?;
    if user_count > 0 || !system_codes.is_empty() {
        return Ok(Vec::new());
    }

    let generated = generate_batch(pool, None, count).await?;
    for code in &generated {
        info!(code = %code.code, "Bootstrap invite code");
    }
    Ok(generated)
}

/// Validate an invite code without consuming it.
///
/// Read-only, so a registration form can be re-validated without side
/// effects. Case-insensitive lookup.
pub async fn validate(pool: &DbPool, code: &str) -> Result<InviteCode, InviteError> {
    let repo = InviteCodeRepository::new(pool);

    match repo.get_by_code(code).await? {
        None => Err(InviteError::NotFound),
        Some(invite) if invite.is_used() => Err(InviteError::AlreadyUsed),
        Some(invite) => Ok(invite),
    }
}

/// Consume an invite code for the given user.
///
/// Exactly one of two concurrent consumers can win; the loser observes
/// AlreadyUsed (or NotFound if the code never existed).
pub async fn consume(pool: &DbPool, code: &str, used_by: i64) -> Result<InviteCode, InviteError> {
    let repo = InviteCodeRepository::new(pool);

    match repo.consume(code, used_by).await? {
        Some(invite) => Ok(invite),
        // The conditional update matched nothing: distinguish a missing
        // code from one that lost the race.
        None => match repo.get_by_code(code).await? {
            Some(_) => Err(InviteError::AlreadyUsed),
            None => Err(InviteError::NotFound),
        },
    }
}
