//! User model for Memwall.

/// User entity representing a registered member.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Login username (unique, matched case-sensitively).
    pub username: String,
    /// Password hash (Argon2).
    pub password: String,
    /// Campus the member attended.
    pub campus: String,
    /// School type (e.g. junior or senior section).
    pub school_type: String,
    /// Graduation year.
    pub graduation_year: String,
    /// Class name within the cohort.
    pub class_name: String,
    /// Whether the user is an administrator.
    pub is_admin: bool,
    /// ID of the user whose invite code was used at registration.
    pub invited_by: Option<i64>,
    /// Account creation timestamp.
    pub created_at: String,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login username.
    pub username: String,
    /// Password hash (pre-hashed with Argon2).
    pub password: String,
    /// Campus.
    pub campus: String,
    /// School type.
    pub school_type: String,
    /// Graduation year.
    pub graduation_year: String,
    /// Class name.
    pub class_name: String,
    /// Inviting user, if the invite code was user-created.
    pub invited_by: Option<i64>,
}

impl NewUser {
    /// Create a new user with minimal required fields.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            campus: String::new(),
            school_type: String::new(),
            graduation_year: String::new(),
            class_name: String::new(),
            invited_by: None,
        }
    }

    /// Set the profile attributes.
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

    /// Set the inviting user.
    pub fn with_invited_by(mut self, invited_by: Option<i64>) -> Self {
        self.invited_by = invited_by;
        self
    }
}
