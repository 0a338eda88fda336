//! Business logic services

pub mod catalog;
pub mod codes;
pub mod email;
pub mod identity;
pub mod lifecycle;
pub mod loans;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod users;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::AppResult,
    models::{item::seed_items, settings::SystemConfig},
    repository::{items::ItemStore, users::UserStore, Repository, SharedRepository},
};

/// State the service starts from when nothing was saved yet
pub fn seed_repository() -> AppResult<Repository> {
    Ok(Repository {
        items: ItemStore::from_items(seed_items()),
        loans: Default::default(),
        users: UserStore::from_users(users::seed_accounts()?),
        config: SystemConfig::default(),
    })
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub users: users::UsersService,
    pub settings: settings::SettingsService,
    pub session: session::SessionService,
    pub email: email::EmailService,
    pub persistence: persistence::PersistenceService,
}

impl Services {
    /// Create all services around one shared repository
    pub fn new(
        repository: SharedRepository,
        store: Arc<dyn persistence::SnapshotStore>,
        config: &AppConfig,
    ) -> Self {
        let session = session::SessionService::new();
        let email = email::EmailService::new(config.email.clone());

        Self {
            catalog: catalog::CatalogService::new(repository.clone(), session.clone()),
            loans: loans::LoansService::new(repository.clone(), session.clone()),
            users: users::UsersService::new(repository.clone(), session.clone(), email.clone()),
            settings: settings::SettingsService::new(repository.clone(), session.clone()),
            persistence: persistence::PersistenceService::from_config(
                store,
                repository,
                &config.storage,
            ),
            session,
            email,
        }
    }
}
