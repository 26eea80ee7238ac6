//! Account management routes. Administrators only.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::{AppState, error::ApiError, middleware::auth::AuthUser, routes::auth::account_info};
use painel_core::auth::{
    AccountFields, hash_password, normalize_email, validate_account, validate_password,
};
use painel_db::{CreateUserInput, UpdateUserInput, UserFilter, UserRepository};
use painel_shared::auth::{AccountInfo, CreateAccountRequest, UpdateAccountRequest};
use painel_shared::{AppError, CompanyCode};

/// Creates the user management router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/user", post(create_user))
        .route("/user/{id}", put(update_user).delete(delete_user))
}

/// Query parameters for listing users.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    /// Only administrators (`true`) or only company accounts (`false`).
    pub is_admin: Option<bool>,
    /// Only accounts holding this company code.
    pub codi_emp: Option<CompanyCode>,
}

/// GET /users - List accounts.
async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<AccountInfo>>, ApiError> {
    auth.require_admin()?;

    let users = UserRepository::new((*state.db).clone())
        .find_all(UserFilter {
            is_admin: query.is_admin,
            codi_emp: query.codi_emp,
        })
        .await?;

    Ok(Json(users.iter().map(account_info).collect()))
}

/// POST /user - Create an account.
async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountInfo>), ApiError> {
    auth.require_admin()?;
    let Json(payload) = payload?;

    let email = normalize_email(&payload.email);
    let cnpj = payload.cnpj.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
    validate_account(&AccountFields {
        nome: &payload.nome,
        email: &email,
        cnpj: cnpj.as_deref(),
        codi_emp: &payload.codi_emp,
        is_admin: payload.is_admin,
    })?;
    validate_password(&payload.password)?;

    let password_hash = hash_password(&payload.password)?;
    let user = UserRepository::new((*state.db).clone())
        .create(CreateUserInput {
            nome: payload.nome,
            nome_empresa: payload.nome_empresa,
            cpf: payload.cpf,
            cnpj,
            codi_emp: payload.codi_emp,
            celular: payload.celular,
            email,
            password_hash,
            is_admin: payload.is_admin,
        })
        .await?;

    info!(account_id = user.id, created_by = auth.account_id(), "Account created");
    Ok((StatusCode::CREATED, Json(account_info(&user))))
}

/// PUT /user/{id} - Partially update an account.
///
/// Rules are checked against the record as it will look after the update.
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    payload: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> Result<Json<AccountInfo>, ApiError> {
    auth.require_admin()?;
    let Json(payload) = payload?;

    let user_repo = UserRepository::new((*state.db).clone());
    let current = user_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound(format!("user {id} not found"))))?;

    let email = payload.email.as_deref().map(normalize_email);
    let cnpj = payload
        .cnpj
        .map(|c| c.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()));
    let current_codes = current.company_codes();
    validate_account(&AccountFields {
        nome: payload.nome.as_deref().unwrap_or(&current.nome),
        email: email.as_deref().unwrap_or(&current.email),
        cnpj: match &cnpj {
            Some(cnpj) => cnpj.as_deref(),
            None => current.cnpj.as_deref(),
        },
        codi_emp: payload.codi_emp.as_deref().unwrap_or(&current_codes),
        is_admin: payload.is_admin.unwrap_or(current.is_admin),
    })?;

    let password_hash = match payload.password.as_deref() {
        Some(password) => {
            validate_password(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let user = user_repo
        .update(
            id,
            UpdateUserInput {
                nome: payload.nome,
                nome_empresa: payload.nome_empresa,
                cpf: payload.cpf,
                cnpj,
                codi_emp: payload.codi_emp,
                celular: payload.celular,
                email,
                password_hash,
                is_admin: payload.is_admin,
            },
        )
        .await?;

    info!(account_id = id, updated_by = auth.account_id(), "Account updated");
    Ok(Json(account_info(&user)))
}

/// DELETE /user/{id} - Delete an account.
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;

    UserRepository::new((*state.db).clone()).delete(id).await?;

    info!(account_id = id, deleted_by = auth.account_id(), "Account deleted");
    Ok(Json(json!({ "message": format!("user {id} deleted") })))
}
