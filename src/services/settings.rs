//! Settings service

use validator::Validate;

use crate::{
    error::AppResult,
    models::{enums::Capability, settings::SystemConfig},
    repository::SharedRepository,
    services::session::SessionService,
};

#[derive(Clone)]
pub struct SettingsService {
    repository: SharedRepository,
    session: SessionService,
}

impl SettingsService {
    pub fn new(repository: SharedRepository, session: SessionService) -> Self {
        Self { repository, session }
    }

    /// Get current branding and contact settings
    pub async fn get_settings(&self) -> SystemConfig {
        self.repository.read(|repo| repo.config.clone()).await
    }

    /// Replace the settings
    pub async fn update_settings(&self, config: SystemConfig) -> AppResult<SystemConfig> {
        self.session.role().await.require(Capability::ManageSettings)?;
        config.validate()?;

        let config = self
            .repository
            .transaction(|repo| {
                repo.config = config;
                Ok(repo.config.clone())
            })
            .await?;

        tracing::info!(app_name = %config.app_name, sliders = config.sliders.len(), "Settings updated");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::{enums::StaffRole, user::UserShort},
        repository::Repository,
    };

    fn super_admin() -> UserShort {
        UserShort {
            id: "u3".into(),
            name: "Super Admin".into(),
            username: "super".into(),
            email: "super@simpanse.id".into(),
            role: StaffRole::SuperAdmin,
        }
    }

    #[tokio::test]
    async fn test_defaults_are_readable_by_anyone() {
        let service = SettingsService::new(SharedRepository::new(Repository::default()), SessionService::new());
        let config = service.get_settings().await;
        assert_eq!(config.app_name, "SIMPANSE");
        assert_eq!(config.sliders.len(), 2);
    }

    #[tokio::test]
    async fn test_only_super_admin_updates() {
        let session = SessionService::new();
        let service = SettingsService::new(SharedRepository::new(Repository::default()), session.clone());

        let mut config = SystemConfig::default();
        config.app_name = "SIMPANSE Malut".into();
        assert!(matches!(
            service.update_settings(config.clone()).await,
            Err(AppError::Authorization(_))
        ));

        session.login(super_admin()).await;
        service.update_settings(config).await.unwrap();
        assert_eq!(service.get_settings().await.app_name, "SIMPANSE Malut");

        let mut invalid = SystemConfig::default();
        invalid.app_name = String::new();
        assert!(matches!(
            service.update_settings(invalid).await,
            Err(AppError::Validation(_))
        ));
    }
}
