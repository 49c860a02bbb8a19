//! # Client Repository
//!
//! Clients are only created and listed; quotes reference them by id.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::records::ClientRow;
use orca_core::{Client, ClientId};

/// Repository for `clientes`.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Inserts a client and returns its generated id.
    pub async fn insert(
        &self,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> DbResult<ClientId> {
        debug!(name = %name, "Inserting client");

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO clientes (nome, email, telefone) VALUES (?1, ?2, ?3) RETURNING id",
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(ClientId(id))
    }

    /// Gets a client by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Client))` - Client found
    /// * `Ok(None)` - Client not found
    pub async fn get(&self, id: ClientId) -> DbResult<Option<Client>> {
        let row: Option<ClientRow> = sqlx::query_as(
            "SELECT id, nome, email, telefone FROM clientes WHERE id = ?1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Client::from))
    }

    /// Lists all clients ordered by name (client select of the forms).
    pub async fn list(&self) -> DbResult<Vec<Client>> {
        let rows: Vec<ClientRow> = sqlx::query_as(
            "SELECT id, nome, email, telefone FROM clientes ORDER BY nome, id",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed clients");
        Ok(rows.into_iter().map(Client::from).collect())
    }
}
