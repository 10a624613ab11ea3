use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, validate_password_strength, verify_password, PasswordPolicy};
use crate::auth::{AuthError, AuthResponse, JwtService, LoginRequest, SignupRequest, UserSession};
use crate::models::{validate_email, User, UserResponse};

const USER_COLUMNS: &str = "id, email, name, password_hash, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    db: PgPool,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_secret: &str) -> Self {
        Self {
            jwt_service: JwtService::new(jwt_secret),
            db,
        }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Register a new user and issue a session token
    pub async fn signup(&self, request: SignupRequest) -> Result<AuthResponse, AuthError> {
        let email = request.email.trim().to_lowercase();
        validate_email(&email).map_err(AuthError::EmailValidation)?;
        validate_password_strength(&request.password, &PasswordPolicy::default())
            .map_err(|err| AuthError::PasswordValidation(err.to_string()))?;

        if self.get_user_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let name = request
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| default_display_name(&email));
        let password_hash = hash_password(&request.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, email, name, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&email)
        .bind(&name)
        .bind(&password_hash)
        .fetch_one(&self.db)
        .await?;

        info!("Registered user {}", user.id);
        self.issue(user)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let email = request.email.trim().to_lowercase();
        // Unknown emails and wrong passwords are indistinguishable to the caller.
        let user = self
            .get_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue(user)
    }

    /// Validate user session from token
    pub async fn validate_session(&self, token: &str) -> Result<UserSession, AuthError> {
        self.jwt_service.extract_user_session(token)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<UserResponse, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AuthError::UserNotFound)?;

        Ok(user.into())
    }

    fn issue(&self, user: User) -> Result<AuthResponse, AuthError> {
        let token = self.jwt_service.create_token(user.id, &user.email)?;

        Ok(AuthResponse {
            success: true,
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.expires_in_seconds(),
            user: user.into(),
        })
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }
}

fn default_display_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
