//! Login route.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::info;

use crate::{AppState, error::ApiError, middleware::auth::TOKEN_COOKIE};
use painel_core::auth::{normalize_email, verify_login};
use painel_db::UserRepository;
use painel_db::entities::users;
use painel_shared::AppError;
use painel_shared::auth::{AccountInfo, LoginRequest, LoginResponse};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Builds the client-facing account view (never includes the hash).
pub(crate) fn account_info(user: &users::Model) -> AccountInfo {
    AccountInfo {
        id: user.id,
        nome: user.nome.clone(),
        nome_empresa: user.nome_empresa.clone(),
        cpf: user.cpf.clone(),
        cnpj: user.cnpj.clone(),
        codi_emp: user.company_codes(),
        celular: user.celular.clone(),
        email: user.email.clone(),
        is_admin: user.is_admin,
    }
}

/// POST /login - Verify credentials and issue a session token.
///
/// The token is returned in the body and set as an `HttpOnly` cookie.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let Json(payload) = payload?;
    let email = normalize_email(&payload.email);
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError(AppError::Validation(
            "email and password are required".to_string(),
        )));
    }

    let user_repo = UserRepository::new((*state.db).clone());
    let user = user_repo.find_by_email(&email).await?;

    let verified = verify_login(
        &payload.password,
        user.as_ref().map(|u| u.password_hash.as_str()),
    )?;
    let Some(user) = user.filter(|_| verified) else {
        info!(email = %email, "Failed login attempt");
        return Err(ApiError(AppError::InvalidCredentials));
    };

    let access_token = state.jwt_service.generate_access_token(
        user.id,
        &user.email,
        user.is_admin,
        user.company_codes(),
    )?;

    info!(account_id = user.id, is_admin = user.is_admin, "Account logged in");

    let cookie = Cookie::build((TOKEN_COOKIE, access_token.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/");

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            user: account_info(&user),
            access_token,
            token_type: "Bearer",
            expires_in: state.jwt_service.access_token_expires_in(),
        }),
    ))
}
