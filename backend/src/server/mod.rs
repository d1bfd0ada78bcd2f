//! Server construction and middleware wiring.

mod config;

pub use config::{ServerConfig, ServerConfigError};

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite, time::Duration};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use hannah_backend::Trace;
#[cfg(debug_assertions)]
use hannah_backend::doc::ApiDoc;
use hannah_backend::domain::ports::{FixtureAccountRegistry, SharedKeyValueStore};
use hannah_backend::inbound::http::auth::{
    current_session, login, logout, password_reset, register,
};
use hannah_backend::inbound::http::error::configure_extractors;
use hannah_backend::inbound::http::health::{HealthState, live, ready};
use hannah_backend::inbound::http::session_config::SessionSettings;
use hannah_backend::inbound::http::shell::resolve_shell;
use hannah_backend::inbound::http::state::HttpState;
use hannah_backend::outbound::storage::{InMemoryKeyValueStore, JsonFileKeyValueStore};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Open the registered-student store selected by `config`.
///
/// # Errors
/// Returns [`std::io::Error`] when the data directory cannot be opened.
fn build_student_store(config: &ServerConfig) -> std::io::Result<SharedKeyValueStore> {
    match &config.data_dir {
        Some(dir) => {
            let store = JsonFileKeyValueStore::open(dir).map_err(std::io::Error::other)?;
            info!(root = %store.root(), "persisting registered students on disk");
            Ok(Arc::new(store))
        }
        None => {
            info!("keeping registered students in memory");
            Ok(Arc::new(InMemoryKeyValueStore::new()))
        }
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
    ttl: Duration,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
        ttl,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(ttl))
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .configure(configure_extractors)
        .service(login)
        .service(register)
        .service(password_reset)
        .service(logout)
        .service(current_session)
        .service(resolve_shell);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing session, binding and storage settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when opening the student store, binding the
/// socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let students = build_student_store(&config)?;
    let http_state = web::Data::new(HttpState::new(
        Arc::new(FixtureAccountRegistry),
        students,
        config.store,
    ));
    let ServerConfig {
        session:
            SessionSettings {
                key,
                cookie_secure,
                same_site,
                ttl,
            },
        bind_addr,
        store,
        data_dir: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
            ttl,
        })
    })
    .bind(bind_addr)?
    .run();

    info!(
        %bind_addr,
        latency_ms = store.simulated_latency.as_millis(),
        role_policy = ?store.role_policy,
        "server listening"
    );
    health_state.mark_ready();
    Ok(server)
}
