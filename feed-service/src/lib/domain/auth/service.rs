use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::email::EmailTemplate;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AccessToken;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::Token;
use crate::domain::auth::models::TokenId;
use crate::domain::auth::models::TokenType;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::EmailSender;
use crate::domain::auth::ports::TokenRepository;
use crate::domain::errors::StorageError;
use crate::domain::transaction::run_in_transaction;
use crate::domain::transaction::UnitOfWork;
use crate::domain::user::models::RoleName;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::RoleRepository;
use crate::domain::user::ports::UserRepository;

/// Confirmation tokens stay valid for three days.
const CONFIRMATION_TOKEN_TTL_HOURS: i64 = 72;

const USERNAME_UNIQUE: &str = "users_username_key";

/// Domain service for registration and login.
pub struct AuthService<U, UR, RR, TR, ES>
where
    U: UnitOfWork,
    UR: UserRepository<U::Session>,
    RR: RoleRepository<U::Session>,
    TR: TokenRepository<U::Session>,
    ES: EmailSender,
{
    unit_of_work: Arc<U>,
    user_repository: Arc<UR>,
    role_repository: Arc<RR>,
    token_repository: Arc<TR>,
    email_sender: Arc<ES>,
    authenticator: Arc<auth::Authenticator>,
    activation_base_url: String,
}

impl<U, UR, RR, TR, ES> AuthService<U, UR, RR, TR, ES>
where
    U: UnitOfWork,
    UR: UserRepository<U::Session>,
    RR: RoleRepository<U::Session>,
    TR: TokenRepository<U::Session>,
    ES: EmailSender,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `activation_base_url` - Web client base; links are `{base}/confirm/{token}`
    pub fn new(
        unit_of_work: Arc<U>,
        user_repository: Arc<UR>,
        role_repository: Arc<RR>,
        token_repository: Arc<TR>,
        email_sender: Arc<ES>,
        authenticator: Arc<auth::Authenticator>,
        activation_base_url: impl Into<String>,
    ) -> Self {
        Self {
            unit_of_work,
            user_repository,
            role_repository,
            token_repository,
            email_sender,
            authenticator,
            activation_base_url: activation_base_url.into(),
        }
    }

    fn activation_url(&self, raw_token: &str) -> String {
        format!(
            "{}/confirm/{}",
            self.activation_base_url.trim_end_matches('/'),
            raw_token
        )
    }
}

#[async_trait]
impl<U, UR, RR, TR, ES> AuthServicePort for AuthService<U, UR, RR, TR, ES>
where
    U: UnitOfWork,
    UR: UserRepository<U::Session>,
    RR: RoleRepository<U::Session>,
    TR: TokenRepository<U::Session>,
    ES: EmailSender,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError> {
        let email = command.email.as_str().to_string();

        let role = {
            let mut session = self.unit_of_work.session().await?;

            // Fast path only; the unique constraint on users.email decides races.
            if self
                .user_repository
                .find_by_email(&mut session, &command.email)
                .await?
                .is_some()
            {
                return Err(AuthError::AlreadyExists(email));
            }

            self.role_repository
                .find_by_name(&mut session, RoleName::User)
                .await?
                .ok_or_else(|| {
                    tracing::error!(role = %RoleName::User, "default role missing from roles table");
                    AuthError::DefaultRoleMissing(RoleName::User)
                })?
        };

        let password_hash = self.authenticator.hash_secret(command.password.as_str())?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            is_active: false,
            role,
            created_at: Utc::now(),
            created_by: email.clone(),
            updated_at: None,
            updated_by: None,
        };

        let raw_token = Uuid::new_v4().to_string();
        let token = Token {
            id: TokenId::new(),
            token_type: TokenType::Confirmation,
            value_hash: self.authenticator.hash_secret(&raw_token)?,
            expires_at: user.created_at + Duration::hours(CONFIRMATION_TOKEN_TTL_HOURS),
            user_id: user.id,
        };
        let template = EmailTemplate::Confirmation {
            username: user.username.to_string(),
            activation_url: self.activation_url(&raw_token),
        };

        let users = Arc::clone(&self.user_repository);
        let tokens = Arc::clone(&self.token_repository);
        let email_sender = Arc::clone(&self.email_sender);
        let new_user = user.clone();

        run_in_transaction(&*self.unit_of_work, move |session| {
            Box::pin(async move {
                users
                    .create(session, &new_user)
                    .await
                    .map_err(|e| {
                        if e.violates(USERNAME_UNIQUE) {
                            AuthError::AlreadyExists(new_user.username.to_string())
                        } else if let StorageError::UniqueViolation { .. } = e {
                            AuthError::AlreadyExists(new_user.email.to_string())
                        } else {
                            AuthError::Storage(e)
                        }
                    })?;

                tokens.create(session, &token).await?;

                email_sender.send(&template, &new_user.email).await?;
                Ok(())
            })
        })
        .await
        .map_err(|e: AuthError| {
            tracing::error!(email = %email, error = %e, "registration aborted");
            e
        })?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AccessToken, AuthError> {
        let lookup = match self.unit_of_work.session().await {
            Ok(mut session) => {
                self.user_repository
                    .find_by_email(&mut session, &command.email)
                    .await
            }
            Err(e) => Err(e),
        };

        let user = match lookup {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!(email = %command.email, "login rejected: unknown email");
                return Err(AuthError::Unauthorized);
            }
            Err(e) => {
                tracing::warn!(email = %command.email, error = %e, "login rejected: lookup failed");
                return Err(AuthError::Unauthorized);
            }
        };

        let claims = self
            .authenticator
            .claims_for(user.id, user.role.name)
            .with_extra("username", user.username.as_str());

        match self
            .authenticator
            .authenticate(&command.password, &user.password_hash, &claims)
        {
            Ok(result) => Ok(AccessToken(result.access_token)),
            Err(auth::AuthenticationError::InvalidCredentials) => {
                tracing::warn!(user_id = %user.id, "login rejected: password mismatch");
                Err(AuthError::Unauthorized)
            }
            Err(auth::AuthenticationError::JwtError(e)) => {
                tracing::error!(user_id = %user.id, error = %e, "failed to issue access token");
                Err(AuthError::TokenIssuance(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use mockall::mock;

    use super::*;
    use crate::domain::auth::email::EmailDeliveryError;
    use crate::domain::auth::models::Password;
    use crate::domain::testing::FakeSession;
    use crate::domain::testing::FakeUnitOfWork;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Role;
    use crate::domain::user::models::RoleId;
    use crate::domain::user::models::Username;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository<FakeSession> for TestUserRepository {
            async fn create(&self, session: &mut FakeSession, user: &User) -> Result<(), StorageError>;
            async fn find_by_id(&self, session: &mut FakeSession, id: &UserId) -> Result<Option<User>, StorageError>;
            async fn find_by_email(&self, session: &mut FakeSession, email: &EmailAddress) -> Result<Option<User>, StorageError>;
            async fn update(&self, session: &mut FakeSession, user: &User) -> Result<bool, StorageError>;
        }
    }

    mock! {
        pub TestRoleRepository {}

        #[async_trait]
        impl RoleRepository<FakeSession> for TestRoleRepository {
            async fn find_by_name(&self, session: &mut FakeSession, name: RoleName) -> Result<Option<Role>, StorageError>;
        }
    }

    mock! {
        pub TestTokenRepository {}

        #[async_trait]
        impl TokenRepository<FakeSession> for TestTokenRepository {
            async fn create(&self, session: &mut FakeSession, token: &Token) -> Result<(), StorageError>;
        }
    }

    mock! {
        pub TestEmailSender {}

        #[async_trait]
        impl EmailSender for TestEmailSender {
            async fn send(&self, template: &EmailTemplate, recipient: &EmailAddress) -> Result<(), EmailDeliveryError>;
        }
    }

    type TestService = AuthService<
        FakeUnitOfWork,
        MockTestUserRepository,
        MockTestRoleRepository,
        MockTestTokenRepository,
        MockTestEmailSender,
    >;

    fn authenticator() -> Arc<auth::Authenticator> {
        Arc::new(auth::Authenticator::new(
            b"test_secret_key_at_least_32_bytes!",
            auth::TokenSettings {
                issuer: "feed-service".to_string(),
                audience: "feed-service".to_string(),
                expiration_hours: 24,
            },
        ))
    }

    fn user_role() -> Role {
        Role {
            id: RoleId(Uuid::new_v4()),
            name: RoleName::User,
            level: 1,
            description: "regular user".to_string(),
            is_active: true,
        }
    }

    fn register_command() -> RegisterCommand {
        RegisterCommand {
            username: Username::new("jane".to_string()).unwrap(),
            email: EmailAddress::new("jane@example.com".to_string()).unwrap(),
            password: Password::new("password123".to_string()).unwrap(),
        }
    }

    fn roles_with_default() -> MockTestRoleRepository {
        let mut roles = MockTestRoleRepository::new();
        roles
            .expect_find_by_name()
            .withf(|_, name| *name == RoleName::User)
            .returning(|_, _| Ok(Some(user_role())));
        roles
    }

    fn service(
        unit_of_work: Arc<FakeUnitOfWork>,
        users: MockTestUserRepository,
        roles: MockTestRoleRepository,
        tokens: MockTestTokenRepository,
        email_sender: MockTestEmailSender,
        authenticator: Arc<auth::Authenticator>,
    ) -> TestService {
        AuthService::new(
            unit_of_work,
            Arc::new(users),
            Arc::new(roles),
            Arc::new(tokens),
            Arc::new(email_sender),
            authenticator,
            "https://feed.test/",
        )
    }

    #[tokio::test]
    async fn test_register_success() {
        let authenticator = authenticator();
        let stored_token: Arc<Mutex<Option<Token>>> = Arc::new(Mutex::new(None));
        let sent: Arc<Mutex<Option<EmailTemplate>>> = Arc::new(Mutex::new(None));

        let mut users = MockTestUserRepository::new();
        users.expect_find_by_email().times(1).returning(|_, _| Ok(None));
        users
            .expect_create()
            .withf(|session, user| {
                session.is_transactional()
                    && !user.is_active
                    && user.created_by == "jane@example.com"
                    && user.password_hash.starts_with("$argon2")
                    && user.role.name == RoleName::User
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let mut tokens = MockTestTokenRepository::new();
        let token_slot = Arc::clone(&stored_token);
        tokens
            .expect_create()
            .withf(|session, _| session.is_transactional())
            .times(1)
            .returning(move |_, token| {
                *token_slot.lock().unwrap() = Some(token.clone());
                Ok(())
            });

        let mut email_sender = MockTestEmailSender::new();
        let sent_slot = Arc::clone(&sent);
        email_sender
            .expect_send()
            .withf(|_, recipient| recipient.as_str() == "jane@example.com")
            .times(1)
            .returning(move |template, _| {
                *sent_slot.lock().unwrap() = Some(template.clone());
                Ok(())
            });

        let unit_of_work = Arc::new(FakeUnitOfWork::new());
        let service = service(
            Arc::clone(&unit_of_work),
            users,
            roles_with_default(),
            tokens,
            email_sender,
            Arc::clone(&authenticator),
        );

        let user = service.register(register_command()).await.unwrap();

        assert_eq!(user.username.as_str(), "jane");
        assert_eq!(user.role.name, RoleName::User);
        assert!(!user.is_active);
        assert_eq!(unit_of_work.commits(), 1);
        assert_eq!(unit_of_work.rollbacks(), 0);

        let token = stored_token.lock().unwrap().clone().unwrap();
        assert_eq!(token.user_id, user.id);
        assert_eq!(token.token_type, TokenType::Confirmation);
        assert_eq!(token.expires_at - user.created_at, Duration::hours(72));

        let Some(EmailTemplate::Confirmation {
            username,
            activation_url,
        }) = sent.lock().unwrap().clone()
        else {
            panic!("confirmation email was not sent");
        };
        assert_eq!(username, "jane");
        let raw_token = activation_url
            .strip_prefix("https://feed.test/confirm/")
            .expect("activation url uses the web base url");
        assert_ne!(raw_token, token.value_hash);
        assert!(authenticator.verify_secret(&token.value_hash, raw_token));
    }

    #[tokio::test]
    async fn test_register_existing_email() {
        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_email()
            .times(1)
            .returning(|_, email| {
                Ok(Some(User {
                    id: UserId::new(),
                    username: Username::new("other".to_string()).unwrap(),
                    email: email.clone(),
                    password_hash: "$argon2id$hash".to_string(),
                    is_active: true,
                    role: user_role(),
                    created_at: Utc::now(),
                    created_by: email.to_string(),
                    updated_at: None,
                    updated_by: None,
                }))
            });
        users.expect_create().times(0);

        let unit_of_work = Arc::new(FakeUnitOfWork::new());
        let service = service(
            Arc::clone(&unit_of_work),
            users,
            MockTestRoleRepository::new(),
            MockTestTokenRepository::new(),
            MockTestEmailSender::new(),
            authenticator(),
        );

        let result = service.register(register_command()).await;

        assert!(matches!(result, Err(AuthError::AlreadyExists(_))));
        assert_eq!(unit_of_work.begins(), 0);
    }

    #[tokio::test]
    async fn test_register_unique_violation_race_is_already_exists() {
        let mut users = MockTestUserRepository::new();
        users.expect_find_by_email().returning(|_, _| Ok(None));
        users.expect_create().returning(|_, _| {
            Err(StorageError::UniqueViolation {
                constraint: "users_email_key".to_string(),
            })
        });

        let mut tokens = MockTestTokenRepository::new();
        tokens.expect_create().times(0);

        let unit_of_work = Arc::new(FakeUnitOfWork::new());
        let service = service(
            Arc::clone(&unit_of_work),
            users,
            roles_with_default(),
            tokens,
            MockTestEmailSender::new(),
            authenticator(),
        );

        let result = service.register(register_command()).await;

        assert!(matches!(result, Err(AuthError::AlreadyExists(_))));
        assert_eq!(unit_of_work.rollbacks(), 1);
    }

    #[tokio::test]
    async fn test_register_username_clash_names_username() {
        let mut users = MockTestUserRepository::new();
        users.expect_find_by_email().returning(|_, _| Ok(None));
        users.expect_create().returning(|_, _| {
            Err(StorageError::UniqueViolation {
                constraint: "users_username_key".to_string(),
            })
        });

        let service = service(
            Arc::new(FakeUnitOfWork::new()),
            users,
            roles_with_default(),
            MockTestTokenRepository::new(),
            MockTestEmailSender::new(),
            authenticator(),
        );

        match service.register(register_command()).await {
            Err(AuthError::AlreadyExists(taken)) => assert_eq!(taken, "jane"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_missing_default_role() {
        let mut users = MockTestUserRepository::new();
        users.expect_find_by_email().returning(|_, _| Ok(None));
        users.expect_create().times(0);

        let mut roles = MockTestRoleRepository::new();
        roles.expect_find_by_name().returning(|_, _| Ok(None));

        let service = service(
            Arc::new(FakeUnitOfWork::new()),
            users,
            roles,
            MockTestTokenRepository::new(),
            MockTestEmailSender::new(),
            authenticator(),
        );

        let result = service.register(register_command()).await;
        assert!(matches!(
            result,
            Err(AuthError::DefaultRoleMissing(RoleName::User))
        ));
    }

    #[tokio::test]
    async fn test_register_email_failure_rolls_back() {
        let mut users = MockTestUserRepository::new();
        users.expect_find_by_email().returning(|_, _| Ok(None));
        users
            .expect_create()
            .times(1)
            .returning(|session, _| {
                session.record("user");
                Ok(())
            });

        let mut tokens = MockTestTokenRepository::new();
        tokens.expect_create().times(1).returning(|session, _| {
            session.record("token");
            Ok(())
        });

        let mut email_sender = MockTestEmailSender::new();
        email_sender
            .expect_send()
            .times(1)
            .returning(|_, _| Err(EmailDeliveryError::SendFailed("smtp down".to_string())));

        let unit_of_work = Arc::new(FakeUnitOfWork::new());
        let service = service(
            Arc::clone(&unit_of_work),
            users,
            roles_with_default(),
            tokens,
            email_sender,
            authenticator(),
        );

        let result = service.register(register_command()).await;

        assert!(matches!(result, Err(AuthError::EmailDelivery(_))));
        assert_eq!(unit_of_work.commits(), 0);
        assert_eq!(unit_of_work.rollbacks(), 1);
        assert!(unit_of_work.committed_work().is_empty());
    }

    #[tokio::test]
    async fn test_register_rollback_failure_keeps_cause() {
        let mut users = MockTestUserRepository::new();
        users.expect_find_by_email().returning(|_, _| Ok(None));
        users.expect_create().returning(|_, _| Ok(()));

        let mut tokens = MockTestTokenRepository::new();
        tokens
            .expect_create()
            .returning(|_, _| Err(StorageError::Timeout(std::time::Duration::from_secs(5))));

        let service = service(
            Arc::new(FakeUnitOfWork::new().failing_rollback()),
            users,
            roles_with_default(),
            tokens,
            MockTestEmailSender::new(),
            authenticator(),
        );

        match service.register(register_command()).await {
            Err(AuthError::RollbackFailed { original, .. }) => {
                assert!(matches!(
                    *original,
                    AuthError::Storage(StorageError::Timeout(_))
                ));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    fn stored_user(authenticator: &auth::Authenticator, password: &str) -> User {
        User {
            id: UserId::new(),
            username: Username::new("jane".to_string()).unwrap(),
            email: EmailAddress::new("jane@example.com".to_string()).unwrap(),
            password_hash: authenticator.hash_secret(password).unwrap(),
            is_active: false,
            role: user_role(),
            created_at: Utc::now(),
            created_by: "jane@example.com".to_string(),
            updated_at: None,
            updated_by: None,
        }
    }

    fn login_command(password: &str) -> LoginCommand {
        LoginCommand {
            email: EmailAddress::new("jane@example.com".to_string()).unwrap(),
            password: password.to_string(),
        }
    }

    fn login_service(
        users: MockTestUserRepository,
        authenticator: Arc<auth::Authenticator>,
    ) -> TestService {
        service(
            Arc::new(FakeUnitOfWork::new()),
            users,
            MockTestRoleRepository::new(),
            MockTestTokenRepository::new(),
            MockTestEmailSender::new(),
            authenticator,
        )
    }

    #[tokio::test]
    async fn test_login_success() {
        let authenticator = authenticator();
        let user = stored_user(&authenticator, "password123");
        let user_id = user.id;

        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_email()
            .times(1)
            .returning(move |_, _| Ok(Some(user.clone())));

        let service = login_service(users, Arc::clone(&authenticator));

        let token = service.login(login_command("password123")).await.unwrap();

        let claims = authenticator
            .validate_header(&format!("Bearer {}", token.0))
            .unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "user");
        assert_eq!(claims.username(), Some("jane".to_string()));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let authenticator = authenticator();
        let user = stored_user(&authenticator, "password123");

        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_, _| Ok(Some(user.clone())));

        let service = login_service(users, authenticator);

        let result = service.login(login_command("password124")).await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_login_unknown_email_and_lookup_failure_look_identical() {
        let mut missing = MockTestUserRepository::new();
        missing.expect_find_by_email().returning(|_, _| Ok(None));

        let mut broken = MockTestUserRepository::new();
        broken
            .expect_find_by_email()
            .returning(|_, _| Err(StorageError::Database("connection reset".to_string())));

        let missing = login_service(missing, authenticator())
            .login(login_command("password123"))
            .await;
        let broken = login_service(broken, authenticator())
            .login(login_command("password123"))
            .await;

        assert!(matches!(missing, Err(AuthError::Unauthorized)));
        assert!(matches!(broken, Err(AuthError::Unauthorized)));
    }
}
