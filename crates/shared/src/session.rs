use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Password errata")]
    WrongPassword,
}

/// State for one interactive run. Created when the user connects and
/// dropped when the run ends; nothing in here outlives the process.
#[derive(Debug, Default)]
pub struct Session {
    authenticated: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Compare `attempt` with the shared access password. A wrong attempt
    /// leaves the session as it was, so the caller can simply ask again.
    pub fn authenticate(&mut self, attempt: &str, secret: &str) -> Result<(), AuthError> {
        if attempt == secret {
            self.authenticated = true;
            Ok(())
        } else {
            Err(AuthError::WrongPassword)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_locked() {
        assert!(!Session::new().is_authenticated());
    }

    #[test]
    fn test_correct_password_unlocks() {
        let mut session = Session::new();
        assert_eq!(session.authenticate("segreta", "segreta"), Ok(()));
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_wrong_password_allows_retry() {
        let mut session = Session::new();
        assert_eq!(
            session.authenticate("sbagliata", "segreta"),
            Err(AuthError::WrongPassword)
        );
        assert!(!session.is_authenticated());

        assert_eq!(session.authenticate("segreta", "segreta"), Ok(()));
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_flag_is_never_reset() {
        let mut session = Session::new();
        session.authenticate("segreta", "segreta").unwrap();
        assert!(session.authenticate("altro", "segreta").is_err());
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_error_message_is_user_facing() {
        assert_eq!(AuthError::WrongPassword.to_string(), "Password errata");
    }
}
