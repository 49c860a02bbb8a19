//! # Product Repository
//!
//! Products and product groups. Both feed the form selects; groups also
//! drive report grouping and filtering.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::records::{ProductGroupRow, ProductRow};
use orca_core::{Money, Product, ProductGroup, ProductGroupId, ProductId};

/// Repository for `produtos` and `grupos_produtos`.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product group and returns its id.
    pub async fn insert_group(&self, name: &str) -> DbResult<ProductGroupId> {
        debug!(name = %name, "Inserting product group");

        let id: i64 = sqlx::query_scalar("INSERT INTO grupos_produtos (nome) VALUES (?1) RETURNING id")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Ok(ProductGroupId(id))
    }

    /// Inserts a product and returns its id.
    pub async fn insert(
        &self,
        name: &str,
        price: Money,
        group_id: Option<ProductGroupId>,
    ) -> DbResult<ProductId> {
        debug!(name = %name, price_cents = price.cents(), "Inserting product");

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO produtos (nome, preco, grupo_id) VALUES (?1, ?2, ?3) RETURNING id",
        )
        .bind(name)
        .bind(price.cents())
        .bind(group_id.map(|g| g.get()))
        .fetch_one(&self.pool)
        .await?;

        Ok(ProductId(id))
    }

    /// Gets a product by id.
    pub async fn get(&self, id: ProductId) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(
            "SELECT id, nome, preco, grupo_id FROM produtos WHERE id = ?1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Lists all products ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, nome, preco, grupo_id FROM produtos ORDER BY nome, id",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Lists all product groups ordered by name.
    pub async fn list_groups(&self) -> DbResult<Vec<ProductGroup>> {
        let rows: Vec<ProductGroupRow> =
            sqlx::query_as("SELECT id, nome FROM grupos_produtos ORDER BY nome, id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(ProductGroup::from).collect())
    }
}
