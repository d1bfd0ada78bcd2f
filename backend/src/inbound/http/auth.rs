//! Account and session handlers.
//!
//! ```text
//! POST /api/v1/auth/login {"email":"admin@hannah.ai","password":"123456"}
//! POST /api/v1/auth/register {"name":"Ada","email":"ada@x.com","password":"123456"}
//! POST /api/v1/auth/password-reset {"email":"ada@x.com"}
//! POST /api/v1/auth/logout
//! GET  /api/v1/session
//! ```
//!
//! Each request builds a [`SessionStore`](crate::domain::SessionStore) over the
//! caller's session cookie, so the cookie plays the part browser local storage
//! plays for a standalone client.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{
    Error, LoginCredentials, LoginOutcome, LoginValidationError,
    RegistrationOutcome, RegistrationRejection, StudentRegistration, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account email.
    #[schema(example = "faculty@hannah.ai")]
    pub email: String,
    /// Account password.
    #[schema(example = "123456")]
    pub password: String,
}

/// Self-registration request body.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name; blank falls back to the email's local part.
    #[serde(default)]
    pub name: String,
    /// Email to register.
    pub email: String,
    /// Password, at least six characters.
    pub password: String,
}

/// Password reset request body.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    /// Email the reset link would be sent to.
    pub email: String,
}

/// Response carrying the signed-in user.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AuthResponse {
    /// The active session user.
    pub user: User,
}

/// Response describing the current session.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Signed-in user, or `null`.
    pub user: Option<User>,
}

/// Password reset acknowledgement.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PasswordResetResponse {
    /// Whether the email belongs to a known account.
    pub accepted: bool,
}

/// Logout acknowledgement.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    /// Path the client should navigate to.
    #[schema(example = "/")]
    pub redirect_to: String,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyEmail => "email",
        LoginValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(format!("{field} must not be blank"))
        .with_details(json!({ "field": field, "code": "blank" }))
}

fn map_registration_rejection(rejection: RegistrationRejection) -> Error {
    let (field, code) = match rejection {
        RegistrationRejection::EmptyEmail => ("email", "empty_email"),
        RegistrationRejection::InvalidEmail => ("email", "invalid_email"),
        RegistrationRejection::EmptyPassword => ("password", "empty_password"),
        RegistrationRejection::PasswordTooShort { .. } => ("password", "password_too_short"),
        RegistrationRejection::DuplicateEmail => {
            return Error::conflict(rejection.to_string())
                .with_details(json!({ "field": "email", "code": "duplicate_email" }));
        }
    };
    Error::invalid_request(rejection.to_string())
        .with_details(json!({ "field": field, "code": code }))
}

/// Authenticate against the fixed accounts and start a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Blank email or password", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let password = Zeroizing::new(password);
    let credentials = LoginCredentials::try_from_parts(&email, &password)
        .map_err(map_login_validation_error)?;

    let mut store = state.session_store(session.clone())?;
    match store
        .login(credentials.email(), credentials.password())
        .await?
    {
        LoginOutcome::Authenticated(user) => {
            session.renew();
            Ok(web::Json(AuthResponse { user }))
        }
        LoginOutcome::Rejected => Err(Error::unauthorized("invalid credentials")),
    }
}

/// Register a student account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Student registered and signed in", body = AuthResponse),
        (status = 400, description = "Invalid registration", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "registerStudent",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        name,
        email,
        password,
    } = payload.into_inner();
    let registration = StudentRegistration::new(name, email, password);

    let mut store = state.session_store(session.clone())?;
    let outcome = {
        let _guard = state.lock_registrations().await;
        store.register_student(&registration).await?
    };
    match outcome {
        RegistrationOutcome::Registered(user) => {
            session.renew();
            Ok(HttpResponse::Created().json(AuthResponse { user }))
        }
        RegistrationOutcome::Rejected(rejection) => Err(map_registration_rejection(rejection)),
    }
}

/// Check whether a password reset could be sent. Nothing is sent.
#[utoipa::path(
    post,
    path = "/api/v1/auth/password-reset",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Reset request evaluated", body = PasswordResetResponse),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "requestPasswordReset",
    security([])
)]
#[post("/auth/password-reset")]
pub async fn password_reset(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PasswordResetRequest>,
) -> ApiResult<web::Json<PasswordResetResponse>> {
    let store = state.session_store(session)?;
    let accepted = store.request_password_reset(&payload.email).await?;
    Ok(web::Json(PasswordResetResponse { accepted }))
}

/// End the session and expire the cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Session cleared", body = LogoutResponse),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<LogoutResponse>> {
    let mut store = state.session_store(session.clone())?;
    let redirect = store.logout()?;
    session.purge();
    Ok(web::Json(LogoutResponse {
        redirect_to: redirect.location.to_owned(),
    }))
}

/// Report the signed-in user, if any.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentSession"
)]
#[get("/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SessionResponse>> {
    let store = state.session_store(session)?;
    Ok(web::Json(SessionResponse {
        user: store.current_user().cloned(),
    }))
}
