//! Session and role context

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{
    enums::Role,
    session::{BorrowerSession, Session},
    user::UserShort,
};

/// Holds the active role and the borrower identity. Not persisted.
#[derive(Clone, Default)]
pub struct SessionService {
    state: Arc<RwLock<Session>>,
}

impl SessionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> Session {
        self.state.read().await.clone()
    }

    pub async fn role(&self) -> Role {
        self.state.read().await.active_role
    }

    pub async fn borrower(&self) -> BorrowerSession {
        self.state.read().await.borrower.clone()
    }

    /// Remember who the borrower is after a submission or lookup
    pub async fn establish_borrower(&self, email: &str, nik: &str, name: &str) {
        let mut state = self.state.write().await;
        state.borrower = BorrowerSession {
            email: email.trim().to_string(),
            nik: nik.to_string(),
            name: name.to_string(),
        };
        tracing::debug!(email = %state.borrower.email, "Borrower session established");
    }

    /// Forget the borrower identity, keeping the active role
    pub async fn end_borrower(&self) {
        self.state.write().await.borrower = BorrowerSession::default();
    }

    pub async fn login(&self, user: UserShort) {
        let mut state = self.state.write().await;
        state.active_role = Role::from(user.role);
        tracing::info!(username = %user.username, role = ?state.active_role, "Staff logged in");
        state.staff = Some(user);
    }

    /// Back to an anonymous borrower
    pub async fn logout(&self) {
        let mut state = self.state.write().await;
        if let Some(user) = state.staff.take() {
            tracing::info!(username = %user.username, "Staff logged out");
        }
        *state = Session::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::StaffRole;

    fn staff(role: StaffRole) -> UserShort {
        UserShort {
            id: "u2".into(),
            name: "Tim Verifikasi".into(),
            username: "verify".into(),
            email: "verify@simpanse.id".into(),
            role,
        }
    }

    #[tokio::test]
    async fn test_starts_as_anonymous_borrower() {
        let session = SessionService::new();
        assert_eq!(session.role().await, Role::Borrower);
        assert!(session.borrower().await.is_empty());
    }

    #[tokio::test]
    async fn test_login_and_logout() {
        let session = SessionService::new();
        session.establish_borrower("a@x.com", "1234", "Siti").await;
        session.login(staff(StaffRole::Verificator)).await;
        assert_eq!(session.role().await, Role::Verificator);

        session.logout().await;
        let current = session.current().await;
        assert_eq!(current.active_role, Role::Borrower);
        assert!(current.borrower.is_empty());
        assert!(current.staff.is_none());
    }

    #[tokio::test]
    async fn test_end_borrower_keeps_role() {
        let session = SessionService::new();
        session.login(staff(StaffRole::Admin)).await;
        session.establish_borrower(" a@x.com ", "1234", "Siti").await;
        assert_eq!(session.borrower().await.email, "a@x.com");

        session.end_borrower().await;
        assert!(session.borrower().await.is_empty());
        assert_eq!(session.role().await, Role::Admin);
    }
}
