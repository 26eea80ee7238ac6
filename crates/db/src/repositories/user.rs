//! User repository for the account store.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use painel_shared::CompanyCode;

use crate::entities::users::{self, company_codes_to_json};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Email already registered to another account.
    #[error("email '{0}' is already registered")]
    EmailTaken(String),

    /// Cnpj already registered to another account.
    #[error("cnpj '{0}' is already registered")]
    CnpjTaken(String),

    /// User not found.
    #[error("user not found: {0}")]
    NotFound(i32),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Display name.
    pub nome: String,
    /// Company display name.
    pub nome_empresa: String,
    /// Personal tax id.
    pub cpf: String,
    /// Corporate tax id.
    pub cnpj: Option<String>,
    /// ERP company codes.
    pub codi_emp: Vec<CompanyCode>,
    /// Contact number.
    pub celular: String,
    /// Login email, normalized.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Administrator flag.
    pub is_admin: bool,
}

/// Input for a partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    /// Display name.
    pub nome: Option<String>,
    /// Company display name.
    pub nome_empresa: Option<String>,
    /// Personal tax id.
    pub cpf: Option<String>,
    /// Corporate tax id; `Some(None)` clears it.
    pub cnpj: Option<Option<String>>,
    /// ERP company codes.
    pub codi_emp: Option<Vec<CompanyCode>>,
    /// Contact number.
    pub celular: Option<String>,
    /// Login email, normalized.
    pub email: Option<String>,
    /// New Argon2id PHC string.
    pub password_hash: Option<String>,
    /// Administrator flag.
    pub is_admin: Option<bool>,
}

/// Filter options for listing users.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserFilter {
    /// Filter by administrator flag.
    pub is_admin: Option<bool>,
    /// Only accounts whose `codi_emp` contains this code.
    pub codi_emp: Option<CompanyCode>,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by cnpj.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_cnpj(&self, cnpj: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Cnpj.eq(cnpj))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists users ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all(&self, filter: UserFilter) -> Result<Vec<users::Model>, DbErr> {
        let mut query = users::Entity::find().order_by_asc(users::Column::Id);

        if let Some(is_admin) = filter.is_admin {
            query = query.filter(users::Column::IsAdmin.eq(is_admin));
        }
        if let Some(code) = filter.codi_emp {
            query = query.filter(Expr::cust_with_values(
                "codi_emp @> ?",
                [company_codes_to_json(&[code])],
            ));
        }

        query.all(&self.db).await
    }

    /// Creates a user after checking email and cnpj uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmailTaken` or `UserError::CnpjTaken` on a clash,
    /// including one that only the database's unique constraints catch.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        self.ensure_unique(&input.email, input.cnpj.as_deref(), None)
            .await?;

        let email = input.email.clone();
        let cnpj = input.cnpj.clone();
        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            nome: Set(input.nome),
            nome_empresa: Set(input.nome_empresa),
            cpf: Set(input.cpf),
            cnpj: Set(input.cnpj),
            codi_emp: Set(company_codes_to_json(&input.codi_emp)),
            celular: Set(input.celular),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            is_admin: Set(input.is_admin),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        user.insert(&self.db)
            .await
            .map_err(|err| unique_violation(err, &email, cnpj.as_deref()))
    }

    /// Applies a partial update. The id never changes.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` for an unknown id and a uniqueness error
    /// when the new email or cnpj belongs to another account.
    pub async fn update(&self, id: i32, input: UpdateUserInput) -> Result<users::Model, UserError> {
        let user = self
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        let email = input.email.clone().unwrap_or_else(|| user.email.clone());
        let cnpj = match &input.cnpj {
            Some(cnpj) => cnpj.clone(),
            None => user.cnpj.clone(),
        };
        self.ensure_unique(&email, cnpj.as_deref(), Some(id)).await?;

        let mut active: users::ActiveModel = user.into();
        if let Some(nome) = input.nome {
            active.nome = Set(nome);
        }
        if let Some(nome_empresa) = input.nome_empresa {
            active.nome_empresa = Set(nome_empresa);
        }
        if let Some(cpf) = input.cpf {
            active.cpf = Set(cpf);
        }
        if let Some(cnpj) = input.cnpj {
            active.cnpj = Set(cnpj);
        }
        if let Some(codi_emp) = input.codi_emp {
            active.codi_emp = Set(company_codes_to_json(&codi_emp));
        }
        if let Some(celular) = input.celular {
            active.celular = Set(celular);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(password_hash) = input.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(is_admin) = input.is_admin {
            active.is_admin = Set(is_admin);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active
            .update(&self.db)
            .await
            .map_err(|err| unique_violation(err, &email, cnpj.as_deref()))
    }

    /// Deletes a user.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` when no row was deleted.
    pub async fn delete(&self, id: i32) -> Result<(), UserError> {
        let result = users::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }

    /// Checks email and cnpj against every account except `exclude_id`.
    async fn ensure_unique(
        &self,
        email: &str,
        cnpj: Option<&str>,
        exclude_id: Option<i32>,
    ) -> Result<(), UserError> {
        let is_other = |user: &users::Model| Some(user.id) != exclude_id;

        if self.find_by_email(email).await?.as_ref().is_some_and(is_other) {
            return Err(UserError::EmailTaken(email.to_string()));
        }
        if let Some(cnpj) = cnpj
            && self.find_by_cnpj(cnpj).await?.as_ref().is_some_and(is_other)
        {
            return Err(UserError::CnpjTaken(cnpj.to_string()));
        }
        Ok(())
    }
}

/// Maps a unique constraint violation raised by the database (a concurrent
/// insert that slipped past `ensure_unique`) to the matching clash.
fn unique_violation(err: DbErr, email: &str, cnpj: Option<&str>) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => {
            clash_from_message(&message, email, cnpj).unwrap_or(UserError::Database(err))
        }
        _ => UserError::Database(err),
    }
}

/// Postgres names inline unique constraints `users_<column>_key`.
fn clash_from_message(message: &str, email: &str, cnpj: Option<&str>) -> Option<UserError> {
    if message.contains("cnpj") {
        Some(UserError::CnpjTaken(cnpj.unwrap_or_default().to_string()))
    } else if message.contains("email") {
        Some(UserError::EmailTaken(email.to_string()))
    } else {
        None
    }
}
