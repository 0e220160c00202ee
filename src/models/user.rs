use serde::Serialize;

use crate::db::repositories::user::verify_password;

/// A registered account.
///
/// The password hash is carried so credentials can be checked against the
/// loaded row, but it is never serialized or printed.
#[derive(Clone, Serialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Remaining scans. Not floored; may go negative.
    pub scan_quota: i32,
    pub is_admin: bool,
    /// Last issued session token. Older tokens stay valid until they expire.
    pub token: Option<String>,
    #[serde(skip)]
    pub(crate) password_hash: String,
}

impl User {
    /// Verifies `candidate` against the stored PBKDF2 hash.
    ///
    /// CPU bound; async callers should go through `AccountService::check_password`.
    #[must_use]
    pub fn check_password(&self, candidate: &str) -> bool {
        verify_password(&self.password_hash, candidate)
    }

    #[must_use]
    pub const fn has_scan_quota(&self) -> bool {
        self.scan_quota > 0
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.id, self.name)
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("scan_quota", &self.scan_quota)
            .field("is_admin", &self.is_admin)
            .field("token", &self.token.as_ref().map(|_| "<set>"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::user::hash_password;

    fn user_with_password(password: &str) -> User {
        User {
            id: 7,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            scan_quota: 31,
            is_admin: false,
            token: None,
            password_hash: hash_password(password, 1_000).unwrap(),
        }
    }

    #[test]
    fn displays_id_and_name() {
        let user = user_with_password("pw");
        assert_eq!(user.to_string(), "7 - Ada");
    }

    #[test]
    fn debug_never_leaks_hash() {
        let user = user_with_password("pw");
        let rendered = format!("{user:?}");
        assert!(!rendered.contains(&user.password_hash));
        assert!(!rendered.contains("pbkdf2"));
    }

    #[test]
    fn check_password_is_exact() {
        let user = user_with_password("correct horse");
        assert!(user.check_password("correct horse"));
        assert!(!user.check_password("correct hors3"));
        assert!(!user.check_password("Correct horse"));
        assert!(!user.check_password(""));
    }

    #[test]
    fn quota_check() {
        let mut user = user_with_password("pw");
        assert!(user.has_scan_quota());
        user.scan_quota = 0;
        assert!(!user.has_scan_quota());
        user.scan_quota = -3;
        assert!(!user.has_scan_quota());
    }
}
