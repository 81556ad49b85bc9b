use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::task;

use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Identity;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::PasswordHash;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserStatus;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Owns registration, login, password and email changes. Password hashing
/// and verification go through [`auth::PasswordHasher`] on the blocking
/// pool; persistence through the injected repository.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    async fn find_existing(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    // Argon2 is CPU-bound; keep it off the async workers.
    async fn hash_password(&self, plaintext: String) -> Result<PasswordHash, UserError> {
        let hasher = self.password_hasher;
        let hash = task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| UserError::PasswordHashing(e.to_string()))??;
        Ok(PasswordHash::new(hash)?)
    }

    async fn verify_password(
        &self,
        plaintext: String,
        hash: PasswordHash,
    ) -> Result<bool, UserError> {
        let hasher = self.password_hasher;
        task::spawn_blocking(move || hasher.verify(&plaintext, hash.as_str()))
            .await
            .map_err(|e| UserError::PasswordHashing(e.to_string()))
    }

    async fn verify_decoy(&self, plaintext: String) -> Result<(), UserError> {
        let hasher = self.password_hasher;
        task::spawn_blocking(move || hasher.verify_against_decoy(&plaintext))
            .await
            .map_err(|e| UserError::PasswordHashing(e.to_string()))
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<Identity, UserError> {
        if self
            .repository
            .exists_by_username(&command.username)
            .await?
        {
            return Err(UserError::UsernameTaken(command.username.to_string()));
        }

        if self.repository.exists_by_email(&command.email).await? {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self
            .hash_password(command.password.expose().to_string())
            .await?;
        let user = User::register(command.username, command.email, password_hash);

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(Identity::from(&created_user))
    }

    async fn login(&self, command: LoginCommand) -> Result<Identity, UserError> {
        let Some(user) = self.repository.find_by_email(&command.email).await? else {
            self.verify_decoy(command.password).await?;
            return Err(UserError::InvalidCredentials);
        };

        if !self
            .verify_password(command.password, user.password_hash.clone())
            .await?
        {
            return Err(UserError::InvalidCredentials);
        }

        if user.is_active() {
            return Ok(Identity::from(&user));
        }
        match user.status {
            UserStatus::Banned => Err(UserError::AccountBanned),
            _ => Err(UserError::AccountInactive),
        }
    }

    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), UserError> {
        let mut user = self.find_existing(id).await?;

        if !self
            .verify_password(command.old_password, user.password_hash.clone())
            .await?
        {
            return Err(UserError::OldPasswordIncorrect);
        }

        user.password_hash = self
            .hash_password(command.new_password.expose().to_string())
            .await?;
        user.updated_at = Utc::now();
        self.repository.update(user).await?;

        tracing::info!(user_id = %id, "Password changed");
        Ok(())
    }

    async fn update_email(&self, id: &UserId, email: EmailAddress) -> Result<User, UserError> {
        let mut user = self.find_existing(id).await?;
        if user.email == email {
            return Ok(user);
        }

        if self.repository.exists_by_email(&email).await? {
            return Err(UserError::EmailAlreadyExists(email.to_string()));
        }

        user.email = email;
        user.updated_at = Utc::now();
        let updated_user = self.repository.update(user).await?;

        tracing::info!(user_id = %id, "Email changed");
        Ok(updated_user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.find_existing(id).await
    }

    async fn change_user_status(
        &self,
        id: &UserId,
        status: UserStatus,
    ) -> Result<User, UserError> {
        let mut user = self.find_existing(id).await?;
        user.status = status;
        user.updated_at = Utc::now();

        let updated_user = self.repository.update(user).await?;
        tracing::info!(user_id = %id, status = %status, "User status changed");

        Ok(updated_user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
