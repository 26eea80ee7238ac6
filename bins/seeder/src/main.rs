//! Creates the first administrator account.
//!
//! Reads `DATABASE_URL`, `PAINEL_SEED_ADMIN_EMAIL` and
//! `PAINEL_SEED_ADMIN_PASSWORD`. Does nothing if the email is already taken.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use painel_core::auth::{
    AccountFields, hash_password, normalize_email, validate_account, validate_password,
};
use painel_db::{CreateUserInput, UserRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let email = normalize_email(
        &std::env::var("PAINEL_SEED_ADMIN_EMAIL").context("PAINEL_SEED_ADMIN_EMAIL must be set")?,
    );
    let password = std::env::var("PAINEL_SEED_ADMIN_PASSWORD")
        .context("PAINEL_SEED_ADMIN_PASSWORD must be set")?;
    let nome =
        std::env::var("PAINEL_SEED_ADMIN_NAME").unwrap_or_else(|_| "Administrador".to_string());

    validate_account(&AccountFields {
        nome: &nome,
        email: &email,
        cnpj: None,
        codi_emp: &[],
        is_admin: true,
    })
    .context("invalid administrator account")?;
    validate_password(&password).context("invalid administrator password")?;

    println!("Connecting to database...");
    let db = painel_db::connect(&database_url)
        .await
        .context("failed to connect to database")?;
    let repo = UserRepository::new(db);

    if repo.find_by_email(&email).await?.is_some() {
        println!("  Account {email} already exists, skipping...");
        return Ok(());
    }

    let password_hash = hash_password(&password).context("failed to hash password")?;
    let user = repo
        .create(CreateUserInput {
            nome,
            nome_empresa: String::new(),
            cpf: String::new(),
            cnpj: None,
            codi_emp: Vec::new(),
            celular: String::new(),
            email,
            password_hash,
            is_admin: true,
        })
        .await?;

    println!("  Created administrator {} (id {})", user.email, user.id);
    Ok(())
}
