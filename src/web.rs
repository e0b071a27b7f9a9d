use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use serde::Deserialize;
use sha2::{Digest, Sha512};

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::model::{ProjectConfig, QuestionnaireSubmission};
use crate::service::{FinalizeRequest, GroupService, SessionInfo};

const SESSION_TOKEN_KEY: &str = "token";

pub struct AppState {
    pub service: GroupService,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    project_name: String,
    admin_name: String,
}

#[derive(Deserialize)]
pub struct JoinGroupRequest {
    code: String,
    name: String,
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Resolves the caller from the bearer header, falling back to the session cookie
fn authenticate(req: &HttpRequest, session: &Session, state: &AppState) -> Result<SessionInfo> {
    let token = bearer_token(req)
        .or_else(|| session.get::<String>(SESSION_TOKEN_KEY).ok().flatten())
        .ok_or_else(|| Error::Unauthorized("missing session token".to_string()))?;
    state.service.validate_session(&token)
}

fn authenticate_admin(req: &HttpRequest, session: &Session, state: &AppState) -> Result<SessionInfo> {
    let info = authenticate(req, session, state)?;
    if !info.user.is_admin {
        return Err(Error::Forbidden("admin access required".to_string()));
    }
    Ok(info)
}

fn remember_token(session: &Session, token: &str) -> Result<()> {
    session
        .insert(SESSION_TOKEN_KEY, token)
        .map_err(|e| Error::Storage(format!("Failed to store session: {}", e)))
}

async fn create_group(
    body: web::Json<CreateGroupRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let auth = state.service.create_group(&body.project_name, &body.admin_name)?;
    remember_token(&session, &auth.token)?;
    Ok(HttpResponse::Created().json(auth))
}

async fn join_group(
    body: web::Json<JoinGroupRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let auth = state.service.join_group(&body.code, &body.name)?;
    remember_token(&session, &auth.token)?;
    Ok(HttpResponse::Ok().json(auth))
}

async fn current_session(req: HttpRequest, session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let info = authenticate(&req, &session, &state)?;
    Ok(HttpResponse::Ok().json(info))
}

async fn logout(session: Session) -> Result<HttpResponse> {
    session.purge();
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
}

async fn submit_questionnaire(
    req: HttpRequest,
    session: Session,
    body: web::Json<QuestionnaireSubmission>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let info = authenticate(&req, &session, &state)?;
    let questionnaire = state.service.submit_questionnaire(&info.user.id, body.into_inner())?;
    Ok(HttpResponse::Ok().json(questionnaire))
}

async fn group_status(req: HttpRequest, session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let info = authenticate(&req, &session, &state)?;
    Ok(HttpResponse::Ok().json(state.service.group_status(&info.group.id)?))
}

async fn alignment(req: HttpRequest, session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let info = authenticate_admin(&req, &session, &state)?;
    Ok(HttpResponse::Ok().json(state.service.alignment_data(&info.group.id)?))
}

async fn finalize(
    req: HttpRequest,
    session: Session,
    body: web::Json<FinalizeRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let info = authenticate_admin(&req, &session, &state)?;
    let group = state.service.finalize_group(&info.group.id, body.into_inner())?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "group": group})))
}

async fn dashboard(req: HttpRequest, session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let info = authenticate(&req, &session, &state)?;
    Ok(HttpResponse::Ok().json(state.service.dashboard_data(&info.group.id)?))
}

async fn update_project_config(
    req: HttpRequest,
    session: Session,
    body: web::Json<ProjectConfig>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let info = authenticate_admin(&req, &session, &state)?;
    let config = state.service.update_project_config(&info.group.id, body.into_inner())?;
    Ok(HttpResponse::Ok().json(config))
}

/// Registers the API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/groups", web::post().to(create_group))
        .route("/api/groups/join", web::post().to(join_group))
        .route("/api/groups/status", web::get().to(group_status))
        .route("/api/session", web::get().to(current_session))
        .route("/api/logout", web::post().to(logout))
        .route("/api/questionnaire", web::post().to(submit_questionnaire))
        .route("/api/alignment", web::get().to(alignment))
        .route("/api/finalize", web::post().to(finalize))
        .route("/api/dashboard", web::get().to(dashboard))
        .route("/api/project-config", web::put().to(update_project_config));
}

/// Cookie session keyed off the token secret, so cookies stay valid across restarts
pub fn session_middleware(secret: &str) -> SessionMiddleware<CookieSessionStore> {
    let key = Key::from(&Sha512::digest(secret.as_bytes())[..]);
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("kickoff_session".to_string())
        .cookie_secure(false)
        .build()
}

pub async fn start_server(config: ServerConfig, service: GroupService) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState { service });
    let secret = config.secret.clone();
    let static_dir = config.static_dir.clone();

    log::info!("Starting web server on {}:{}", config.bind, config.port);

    HttpServer::new(move || {
        let app = App::new()
            .app_data(app_state.clone())
            .wrap(session_middleware(&secret))
            .wrap(middleware::Logger::default())
            .configure(configure);

        match &static_dir {
            Some(dir) => app.service(Files::new("/", dir).index_file("index.html")),
            None => app,
        }
    })
    .bind((config.bind.as_str(), config.port))?
    .run()
    .await
}
