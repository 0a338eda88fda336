//! Staff account store

use indexmap::IndexMap;

use crate::{
    error::{AppError, AppResult},
    models::user::{UserAccount, UserQuery},
};

#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: IndexMap<String, UserAccount>,
}

impl UserStore {
    pub fn from_users(users: Vec<UserAccount>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
        }
    }

    pub fn to_vec(&self) -> Vec<UserAccount> {
        self.users.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.users.contains_key(id)
    }

    pub fn get(&self, id: &str) -> AppResult<&UserAccount> {
        self.users
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    pub fn search(&self, query: &UserQuery) -> Vec<&UserAccount> {
        self.users.values().filter(|u| query.matches(u)).collect()
    }

    /// Account whose username or email equals `login`
    pub fn find_by_login(&self, login: &str) -> Option<&UserAccount> {
        self.users.values().find(|u| u.is_identified_by(login))
    }

    /// Whether another account already uses this username
    pub fn username_taken(&self, username: &str, except_id: Option<&str>) -> bool {
        self.users
            .values()
            .any(|u| u.username.eq_ignore_ascii_case(username) && Some(u.id.as_str()) != except_id)
    }

    pub fn insert(&mut self, user: UserAccount) -> AppResult<&UserAccount> {
        if self.username_taken(&user.username, None) {
            return Err(AppError::Conflict(format!(
                "Username {} already exists",
                user.username
            )));
        }
        let id = user.id.clone();
        self.users.insert(id.clone(), user);
        self.get(&id)
    }

    pub fn get_mut(&mut self, id: &str) -> AppResult<&mut UserAccount> {
        self.users
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    pub fn delete(&mut self, id: &str) -> AppResult<UserAccount> {
        self.users
            .shift_remove(id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::StaffRole;

    fn user(id: &str, username: &str) -> UserAccount {
        UserAccount {
            id: id.into(),
            name: format!("Staf {}", username),
            username: username.into(),
            email: format!("{}@simpanse.id", username),
            role: StaffRole::Admin,
            password_hash: String::new(),
        }
    }

    #[test]
    fn test_duplicate_username_is_conflict() {
        let mut store = UserStore::from_users(vec![user("u1", "admin")]);
        assert!(matches!(store.insert(user("u2", "ADMIN")), Err(AppError::Conflict(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_username_taken_ignores_self() {
        let store = UserStore::from_users(vec![user("u1", "admin")]);
        assert!(store.username_taken("admin", None));
        assert!(!store.username_taken("admin", Some("u1")));
    }

    #[test]
    fn test_find_by_login() {
        let store = UserStore::from_users(vec![user("u1", "admin"), user("u2", "verify")]);
        assert_eq!(store.find_by_login("verify@simpanse.id").map(|u| u.id.as_str()), Some("u2"));
        assert!(store.find_by_login("nobody").is_none());
    }

    #[test]
    fn test_delete() {
        let mut store = UserStore::from_users(vec![user("u1", "admin")]);
        store.delete("u1").unwrap();
        assert!(store.is_empty());
        assert!(matches!(store.delete("u1"), Err(AppError::NotFound(_))));
    }
}
