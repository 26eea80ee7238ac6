//! Users table for company and administrator accounts.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(USERS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS users CASCADE;")
            .await?;
        Ok(())
    }
}

const USERS_SQL: &str = r"
CREATE TABLE users (
    id SERIAL PRIMARY KEY,
    nome VARCHAR(255) NOT NULL,
    nome_empresa VARCHAR(255) NOT NULL DEFAULT '',
    cpf VARCHAR(14) NOT NULL DEFAULT '',
    cnpj VARCHAR(18) UNIQUE,
    codi_emp JSONB NOT NULL DEFAULT '[]'::jsonb,
    celular VARCHAR(20) NOT NULL DEFAULT '',
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    is_admin BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- Company accounts always carry a cnpj and at least one ERP company
    CONSTRAINT chk_company_account CHECK (
        is_admin OR (cnpj IS NOT NULL AND jsonb_array_length(codi_emp) > 0)
    ),
    CONSTRAINT chk_codi_emp_array CHECK (jsonb_typeof(codi_emp) = 'array')
);

CREATE INDEX idx_users_is_admin ON users(is_admin);

-- Containment lookups for the codi_emp filter
CREATE INDEX idx_users_codi_emp ON users USING GIN (codi_emp);
";
