//! Database schema and migrations for Memwall.
//!
//! This module contains all database migrations that will be applied
//! sequentially when the database is first opened or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - users table
    r#"
-- Users table for authentication and member management
CREATE TABLE users (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    username        TEXT NOT NULL UNIQUE,
    password        TEXT NOT NULL,           -- Argon2 hash
    campus          TEXT NOT NULL DEFAULT '',
    school_type     TEXT NOT NULL DEFAULT '',
    graduation_year TEXT NOT NULL DEFAULT '',
    class_name      TEXT NOT NULL DEFAULT '',
    is_admin        INTEGER NOT NULL DEFAULT 0,
    invited_by      INTEGER REFERENCES users(id),
    created_at      TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_users_username ON users(username);
"#,
    // v2: Invite codes, single-use, creator/consumer attributed
    r#"
CREATE TABLE invite_codes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    code        TEXT NOT NULL UNIQUE,        -- stored uppercase
    created_by  INTEGER REFERENCES users(id), -- NULL = system code
    used_by     INTEGER REFERENCES users(id),
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    used_at     TEXT
);

CREATE INDEX idx_invite_codes_created_by ON invite_codes(created_by);
"#,
    // v3: Server-side sessions (cookie token -> user)
    r#"
CREATE TABLE sessions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    token       TEXT NOT NULL UNIQUE,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    expires_at  TEXT NOT NULL
);

CREATE INDEX idx_sessions_user_id ON sessions(user_id);
"#,
    // v4: Classes (the halls of the memory wall)
    r#"
CREATE TABLE classes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    full_name   TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v5: Posts and comments
    r#"
CREATE TABLE posts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    class_id    INTEGER NOT NULL REFERENCES classes(id),
    user_id     INTEGER REFERENCES users(id),
    content     TEXT NOT NULL,
    image       TEXT,                        -- stored upload name, empty if none
    likes       INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_posts_class_id ON posts(class_id);

CREATE TABLE comments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id     INTEGER NOT NULL REFERENCES posts(id),
    user_id     INTEGER REFERENCES users(id),
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_comments_post_id ON comments(post_id);
"#,
    // v6: Second-hand market listings
    r#"
CREATE TABLE market_items (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      INTEGER NOT NULL REFERENCES users(id),
    title        TEXT NOT NULL,
    description  TEXT,
    price        TEXT,                       -- free text, e.g. "¥20" or "面议"
    contact_info TEXT,
    image_url    TEXT,
    status       TEXT NOT NULL DEFAULT 'active',  -- 'active', 'sold', 'removed'
    view_count   INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_market_items_status ON market_items(status);
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_not_empty() {
        assert!(!MIGRATIONS.is_empty());
        for migration in MIGRATIONS {
            assert!(!migration.trim().is_empty());
        }
    }

    #[test]
    fn test_first_migration_creates_users() {
        assert!(MIGRATIONS[0].contains("CREATE TABLE users"));
    }
}
