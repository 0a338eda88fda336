//! Staff accounts and login

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{Capability, StaffRole},
        user::{
            normalize_username, CreateUser, CreatedUser, LoginRequest, UpdateUser, UserAccount,
            UserQuery, UserShort,
        },
    },
    repository::SharedRepository,
    services::{codes, email::EmailService, session::SessionService},
};

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check `password` against a stored hash
pub fn verify_password(user: &UserAccount, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

static SEED_ACCOUNTS: OnceLock<Vec<UserAccount>> = OnceLock::new();

/// Built-in staff accounts used when no snapshot provides any
pub fn seed_accounts() -> AppResult<Vec<UserAccount>> {
    if let Some(accounts) = SEED_ACCOUNTS.get() {
        return Ok(accounts.clone());
    }

    let seeds = [
        ("u1", "Admin Utama", "admin", StaffRole::Admin, "admin123"),
        ("u2", "Tim Verifikasi", "verify", StaffRole::Verificator, "verify123"),
        ("u3", "Super Admin", "super", StaffRole::SuperAdmin, "super123"),
    ];
    let accounts = seeds
        .iter()
        .map(|(id, name, username, role, password)| {
            Ok(UserAccount {
                id: id.to_string(),
                name: name.to_string(),
                username: username.to_string(),
                email: format!("{}@simpanse.id", username),
                role: *role,
                password_hash: hash_password(password)?,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(SEED_ACCOUNTS.get_or_init(|| accounts).clone())
}

#[derive(Clone)]
pub struct UsersService {
    repository: SharedRepository,
    session: SessionService,
    email: EmailService,
}

impl UsersService {
    pub fn new(repository: SharedRepository, session: SessionService, email: EmailService) -> Self {
        Self {
            repository,
            session,
            email,
        }
    }

    /// Log a staff member in by username or email
    pub async fn login(&self, request: &LoginRequest) -> AppResult<UserShort> {
        let user = self
            .repository
            .read(|repo| repo.users.find_by_login(&request.username).cloned())
            .await
            .ok_or_else(|| AppError::Authentication("Invalid login or password".to_string()))?;

        if !verify_password(&user, &request.password)? {
            tracing::warn!(login = %request.username, "Rejected staff login");
            return Err(AppError::Authentication("Invalid login or password".to_string()));
        }

        let short = UserShort::from(&user);
        self.session.login(short.clone()).await;
        Ok(short)
    }

    pub async fn logout(&self) {
        self.session.logout().await;
    }

    async fn require(&self, capability: Capability) -> AppResult<()> {
        self.session.role().await.require(capability)
    }

    pub async fn search_users(&self, query: &UserQuery) -> AppResult<Vec<UserShort>> {
        self.require(Capability::ManageUsers).await?;
        Ok(self
            .repository
            .read(|repo| repo.users.search(query).into_iter().map(UserShort::from).collect())
            .await)
    }

    pub async fn get_user(&self, id: &str) -> AppResult<UserShort> {
        self.require(Capability::ManageUsers).await?;
        self.repository
            .read(|repo| repo.users.get(id).map(UserShort::from))
            .await
    }

    /// Create an account and mail the credentials to its owner.
    /// A failed email does not undo the creation.
    pub async fn create_user(&self, data: CreateUser) -> AppResult<CreatedUser> {
        self.require(Capability::ManageUsers).await?;
        data.validate()?;

        let username = normalize_username(&data.username);
        let password = data.password.clone().unwrap_or_else(codes::staff_password);
        let password_hash = hash_password(&password)?;

        let (user, app_name) = self
            .repository
            .transaction(|repo| {
                let mut id = format!("U{}", codes::upper_code(5));
                while repo.users.contains(&id) {
                    id = format!("U{}", codes::upper_code(5));
                }
                let user = repo
                    .users
                    .insert(UserAccount {
                        id,
                        name: data.name.trim().to_string(),
                        username,
                        email: data.email.trim().to_string(),
                        role: data.role,
                        password_hash,
                    })?
                    .clone();
                Ok((user, repo.config.app_name.clone()))
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, role = ?user.role, "Staff account created");

        if let Err(e) = self
            .email
            .send_account_activation(&user, &password, &app_name)
            .await
        {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to send activation email");
        }

        Ok(CreatedUser {
            user: UserShort::from(&user),
            initial_password: password,
        })
    }

    pub async fn update_user(&self, id: &str, data: UpdateUser) -> AppResult<UserShort> {
        self.require(Capability::ManageUsers).await?;
        data.validate()?;

        let password_hash = match data.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };
        let username = data.username.as_deref().map(normalize_username);

        let user = self
            .repository
            .transaction(|repo| {
                if let Some(username) = username.as_deref() {
                    if repo.users.username_taken(username, Some(id)) {
                        return Err(AppError::Conflict(format!(
                            "Username {} already exists",
                            username
                        )));
                    }
                }

                let user = repo.users.get_mut(id)?;
                if let Some(name) = data.name {
                    user.name = name.trim().to_string();
                }
                if let Some(username) = username {
                    user.username = username;
                }
                if let Some(email) = data.email {
                    user.email = email.trim().to_string();
                }
                if let Some(role) = data.role {
                    user.role = role;
                }
                if let Some(hash) = password_hash {
                    user.password_hash = hash;
                }
                Ok(UserShort::from(&*user))
            })
            .await?;

        tracing::info!(user_id = %user.id, "Staff account updated");
        Ok(user)
    }

    pub async fn delete_user(&self, id: &str) -> AppResult<()> {
        self.require(Capability::ManageUsers).await?;
        let removed = self
            .repository
            .transaction(|repo| repo.users.delete(id))
            .await?;
        tracing::info!(user_id = %removed.id, username = %removed.username, "Staff account deleted");
        Ok(())
    }
}
