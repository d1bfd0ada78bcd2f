//! Shell resolution handler.
//!
//! ```text
//! GET /api/v1/shell?section=knowledge&viewport=compact
//! ```
//!
//! Reports which root view the client should mount and, for authenticated
//! shells, the role menu with the requested section resolved against it.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, NavigationState, Role, Section, ShellView, Viewport};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Query parameters for `GET /api/v1/shell`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShellQuery {
    /// Section the client wants to show; unknown or foreign ids fall back to
    /// the role default.
    pub section: Option<String>,
    /// Viewport class of the client.
    pub viewport: Option<Viewport>,
}

/// Root view kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// Session restoration in flight.
    Loading,
    /// Login, registration and password reset.
    Entry,
    /// Student shell.
    Student,
    /// Admin and faculty shell.
    Staff,
}

impl From<ShellView> for ViewKind {
    fn from(value: ShellView) -> Self {
        match value {
            ShellView::Loading => Self::Loading,
            ShellView::Entry => Self::Entry,
            ShellView::Student => Self::Student,
            ShellView::Staff { .. } => Self::Staff,
        }
    }
}

/// One menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct MenuEntry {
    /// Section id.
    pub section: Section,
    /// Menu label.
    #[schema(example = "Knowledge Base")]
    pub label: String,
}

/// Shell description returned to the client.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShellResponse {
    /// Root view to mount.
    pub view: ViewKind,
    /// Role whose menu is shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Section resolved for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_section: Option<Section>,
    /// Viewport the navigation state was built for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    /// Menu entries in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<Vec<MenuEntry>>,
}

impl ShellResponse {
    fn unauthenticated(view: ShellView) -> Self {
        Self {
            view: view.into(),
            role: None,
            active_section: None,
            viewport: None,
            menu: None,
        }
    }

    fn authenticated(view: ShellView, nav: &NavigationState) -> Self {
        let menu = nav.menu();
        Self {
            view: view.into(),
            role: Some(menu.role()),
            active_section: Some(nav.active()),
            viewport: Some(nav.viewport()),
            menu: Some(
                menu.entries()
                    .iter()
                    .map(|entry| MenuEntry {
                        section: entry.section,
                        label: entry.label.to_owned(),
                    })
                    .collect(),
            ),
        }
    }
}

/// Resolve the root view and navigation for the caller's session.
#[utoipa::path(
    get,
    path = "/api/v1/shell",
    params(ShellQuery),
    responses(
        (status = 200, description = "Resolved shell", body = ShellResponse),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["navigation"],
    operation_id = "resolveShell"
)]
#[get("/shell")]
pub async fn resolve_shell(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ShellQuery>,
) -> ApiResult<web::Json<ShellResponse>> {
    let ShellQuery { section, viewport } = query.into_inner();
    let store = state.session_store(session)?;
    let view = store.shell();
    let Some(role) = view.role() else {
        return Ok(web::Json(ShellResponse::unauthenticated(view)));
    };

    let mut nav = NavigationState::new(role, viewport.unwrap_or_default());
    if let Some(id) = section.as_deref() {
        nav.select(id);
    }
    Ok(web::Json(ShellResponse::authenticated(view, &nav)))
}

#[cfg(test)]
mod tests {
    //! Shell resolution over cookie sessions.
    use super::*;
    use crate::inbound::http::auth::login;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware, test_state};
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::json;

    async fn shell_for(email: Option<&str>, query: &str) -> ShellResponse {
        let app = actix_test::init_service(
            App::new().app_data(web::Data::new(test_state())).service(
                web::scope("/api/v1")
                    .wrap(test_session_middleware())
                    .service(login)
                    .service(resolve_shell),
            ),
        )
        .await;

        let cookie: Option<Cookie<'static>> = match email {
            Some(email) => {
                let res = actix_test::call_service(
                    &app,
                    actix_test::TestRequest::post()
                        .uri("/api/v1/auth/login")
                        .set_json(json!({ "email": email, "password": "123456" }))
                        .to_request(),
                )
                .await;
                assert_eq!(res.status(), StatusCode::OK);
                session_cookie(&res)
            }
            None => None,
        };

        let mut req = actix_test::TestRequest::get().uri(&format!("/api/v1/shell{query}"));
        if let Some(cookie) = cookie {
            req = req.cookie(cookie);
        }
        let res = actix_test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        actix_test::read_body_json(res).await
    }

    #[actix_web::test]
    async fn anonymous_callers_get_the_entry_screen() {
        let body = shell_for(None, "?section=users").await;
        assert_eq!(body.view, ViewKind::Entry);
        assert!(body.role.is_none());
        assert!(body.menu.is_none());
    }

    #[rstest]
    #[case("admin@hannah.ai", "", ViewKind::Staff, Role::Admin, Section::Users)]
    #[case("faculty@hannah.ai", "?section=knowledge", ViewKind::Staff, Role::Faculty, Section::Knowledge)]
    #[case("faculty@hannah.ai", "?section=security", ViewKind::Staff, Role::Faculty, Section::Dashboard)]
    #[case("student@hannah.ai", "?section=history", ViewKind::Student, Role::Student, Section::History)]
    #[case("student@hannah.ai", "?section=users", ViewKind::Student, Role::Student, Section::Chat)]
    #[actix_web::test]
    async fn signed_in_callers_get_their_role_shell(
        #[case] email: &str,
        #[case] query: &str,
        #[case] view: ViewKind,
        #[case] role: Role,
        #[case] active: Section,
    ) {
        let body = shell_for(Some(email), query).await;
        assert_eq!(body.view, view);
        assert_eq!(body.role, Some(role));
        assert_eq!(body.active_section, Some(active));
        assert_eq!(body.viewport, Some(Viewport::Wide));
    }

    #[actix_web::test]
    async fn menu_lists_role_entries_in_order() {
        let body = shell_for(Some("student@hannah.ai"), "?viewport=compact").await;
        assert_eq!(body.viewport, Some(Viewport::Compact));
        let menu = body.menu.expect("menu present");
        let labels: Vec<_> = menu.iter().map(|entry| entry.label.as_str()).collect();
        assert_eq!(
            labels,
            ["Ask Hannah", "Conversation History", "Course Resources", "Profile"]
        );
    }
}
