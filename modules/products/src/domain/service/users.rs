use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::storage;
use crate::contract::model::{EntityKind, User};
use crate::domain::error::DomainError;
use crate::domain::page::{Page, PageRequest};
use crate::domain::repo::UsersRepository;

/// Keeps a local `users` row for every principal seen at the edge.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UsersRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UsersRepository>) -> Self {
        Self { repo }
    }

    /// Return the user for `login`, creating it on first sight.
    /// Logins are stored lowercase.
    #[instrument(name = "products.service.users.sync_user", skip(self))]
    pub async fn sync_user(&self, login: &str) -> Result<User, DomainError> {
        let login = normalize_login(login)?;

        if let Some(user) = self.repo.find_by_login(&login).await.map_err(storage)? {
            debug!("User already known");
            return Ok(user);
        }

        match self
            .repo
            .insert(User {
                id: None,
                login: login.clone(),
            })
            .await
        {
            Ok(user) => {
                info!(id = ?user.id, "Registered new user");
                Ok(user)
            }
            Err(e) => {
                // A concurrent request may have inserted the same login.
                warn!("User insert failed, re-reading: {e:#}");
                self.repo
                    .find_by_login(&login)
                    .await
                    .map_err(storage)?
                    .ok_or_else(|| storage(e))
            }
        }
    }

    #[instrument(name = "products.service.users.find_all", skip(self))]
    pub async fn find_all(&self, req: PageRequest) -> Result<Page<User>, DomainError> {
        self.repo.find_page(req).await.map_err(storage)
    }

    #[instrument(name = "products.service.users.find_by_login", skip(self))]
    pub async fn find_by_login(&self, login: &str) -> Result<User, DomainError> {
        let login = normalize_login(login)?;
        self.repo
            .find_by_login(&login)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::not_found(EntityKind::User, login))
    }
}

fn normalize_login(login: &str) -> Result<String, DomainError> {
    let login = login.trim();
    if login.is_empty() {
        return Err(DomainError::validation(
            EntityKind::User,
            "login",
            "must not be blank",
        ));
    }
    Ok(login.to_lowercase())
}
