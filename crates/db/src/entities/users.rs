//! `SeaORM` Entity for users table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use painel_shared::CompanyCode;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nome: String,
    pub nome_empresa: String,
    pub cpf: String,
    #[sea_orm(unique)]
    pub cnpj: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub codi_emp: Json,
    pub celular: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Company codes stored in `codi_emp`, in order.
    ///
    /// Numeric strings (`"101"`) are accepted; anything else is skipped.
    #[must_use]
    pub fn company_codes(&self) -> Vec<CompanyCode> {
        company_codes_from_json(&self.codi_emp)
    }
}

/// Reads a JSON company-code list.
#[must_use]
pub fn company_codes_from_json(value: &Json) -> Vec<CompanyCode> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Json::Number(n) => n.as_i64().and_then(|n| CompanyCode::try_from(n).ok()),
            Json::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .collect()
}

/// Encodes a company-code list for storage.
#[must_use]
pub fn company_codes_to_json(codes: &[CompanyCode]) -> Json {
    Json::from(codes.to_vec())
}
