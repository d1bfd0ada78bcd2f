//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer (auth,
//! navigation, health), the domain and DTO schemas they exchange, and the
//! session cookie security scheme.
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Role, Section, User, Viewport};
use crate::inbound::http::auth::{
    AuthResponse, LoginRequest, LogoutResponse, PasswordResetRequest, PasswordResetResponse,
    RegisterRequest, SessionResponse,
};
use crate::inbound::http::shell::{MenuEntry, ShellResponse, ViewKind};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login or /api/v1/auth/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Hannah AI Assistant backend API",
        description = "Cookie-session authentication, role routing and navigation for the dashboard."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::password_reset,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::shell::resolve_shell,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Role,
        Error,
        ErrorCode,
        Section,
        Viewport,
        LoginRequest,
        RegisterRequest,
        PasswordResetRequest,
        AuthResponse,
        SessionResponse,
        PasswordResetResponse,
        LogoutResponse,
        ShellResponse,
        ViewKind,
        MenuEntry,
    )),
    tags(
        (name = "auth", description = "Login, registration, password reset and logout"),
        (name = "navigation", description = "Root view and role menu resolution"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;
        match schemas.get(name).expect("schema registered") {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected object schema for {name}"),
        }
    }

    #[rstest]
    #[case("Error", &["code", "message", "traceId", "details"])]
    #[case("User", &["id", "name", "email", "role", "avatar"])]
    #[case("LogoutResponse", &["redirectTo"])]
    #[case("ShellResponse", &["view", "role", "activeSection", "viewport", "menu"])]
    fn schemas_expose_wire_field_names(#[case] name: &str, #[case] expected: &[&str]) {
        let fields = schema_fields(name);
        for field in expected {
            assert!(
                fields.iter().any(|f| f == field),
                "{name} should have field '{field}', got {fields:?}"
            );
        }
    }

    #[rstest]
    #[case("/api/v1/auth/login")]
    #[case("/api/v1/auth/register")]
    #[case("/api/v1/auth/password-reset")]
    #[case("/api/v1/auth/logout")]
    #[case("/api/v1/session")]
    #[case("/api/v1/shell")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn documents_every_endpoint(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[test]
    fn registers_session_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
