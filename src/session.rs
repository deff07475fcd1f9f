use std::time::{Duration, Instant};

/// Default lifetime of a portal session.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(300);

/// Tracks whether the portal session cookie can still be trusted.
///
/// The portals do not tell when a session expires, so the session is assumed
/// valid for `timeout` after the last successful login.
#[derive(Debug, Clone)]
pub struct Session {
    logged_in_at: Option<Instant>,
    timeout: Duration,
    auto_renew: bool,
}

impl Session {
    pub fn new(timeout: Duration, auto_renew: bool) -> Self {
        Self {
            logged_in_at: None,
            timeout,
            auto_renew,
        }
    }

    /// True iff a login happened less than `timeout` ago.
    pub fn is_logged(&self) -> bool {
        match self.logged_in_at {
            Some(at) => at.elapsed() < self.timeout,
            None => false,
        }
    }

    /// Whether an authenticated call must log in first.
    pub fn needs_login(&self) -> bool {
        self.auto_renew && !self.is_logged()
    }

    pub fn mark_logged_in(&mut self) {
        self.logged_in_at = Some(Instant::now());
    }

    /// Forgets the current login.
    pub fn invalidate(&mut self) {
        self.logged_in_at = None;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn auto_renew(&self) -> bool {
        self.auto_renew
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TIMEOUT, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod succeeds {
        use super::*;

        #[test]
        fn test_new_session_is_logged_out() {
            let session = Session::default();
            assert!(!session.is_logged());
            assert!(session.needs_login());
            assert_eq!(session.timeout(), Duration::from_secs(300));
        }

        #[test]
        fn test_mark_logged_in() {
            let mut session = Session::default();
            session.mark_logged_in();
            assert!(session.is_logged());
            assert!(!session.needs_login());
        }

        #[test]
        fn test_invalidate() {
            let mut session = Session::default();
            session.mark_logged_in();
            session.invalidate();
            assert!(!session.is_logged());
        }

        #[test]
        fn test_expired_session() {
            let mut session = Session::new(Duration::from_millis(10), true);
            session.mark_logged_in();
            std::thread::sleep(Duration::from_millis(20));
            assert!(!session.is_logged());
            assert!(session.needs_login());
        }

        #[test]
        fn test_zero_timeout_is_never_logged() {
            let mut session = Session::new(Duration::ZERO, true);
            session.mark_logged_in();
            assert!(!session.is_logged());
        }
    }

    mod fails {
        use super::*;

        #[test]
        fn test_no_renewal_when_auto_renew_disabled() {
            let session = Session::new(DEFAULT_SESSION_TIMEOUT, false);
            assert!(!session.is_logged());
            assert!(!session.needs_login());
        }
    }
}
