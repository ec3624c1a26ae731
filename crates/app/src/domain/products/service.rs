//! Products service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::products::{
        data::{NewProduct, ProductUpdate},
        errors::ProductsServiceError,
        records::{ProductRecord, ProductUuid},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    #[tracing::instrument(
        name = "products.service.create_product",
        skip(self, product),
        fields(product_uuid = %product.uuid),
        err
    )]
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_product(&mut tx, product).await?;

        tx.commit().await?;

        info!("created product");

        Ok(created)
    }

    #[tracing::instrument(
        name = "products.service.update_product",
        skip(self, update),
        fields(product_uuid = %product),
        err
    )]
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "products.service.delete_product",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "products.service.decrement_stock",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn decrement_stock(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<u32, ProductsServiceError> {
        if quantity == 0 {
            return Err(ProductsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin_transaction().await?;

        let Some(remaining) = self
            .repository
            .decrement_stock(&mut tx, product, quantity)
            .await?
        else {
            // Tell a missing product apart from a failed stock guard.
            self.repository.get_product(&mut tx, product).await?;

            return Err(ProductsServiceError::InsufficientStock(product));
        };

        tx.commit().await?;

        Ok(remaining)
    }

    #[tracing::instrument(
        name = "products.service.increment_stock",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn increment_stock(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<u32, ProductsServiceError> {
        if quantity == 0 {
            return Err(ProductsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin_transaction().await?;

        let stock = self
            .repository
            .increment_stock(&mut tx, product, quantity)
            .await?;

        tx.commit().await?;

        Ok(stock)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all products that have not been deleted.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product with its live price and stock.
    async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Replace a product's name, price and stock level.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Soft-deletes a product with the given UUID.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;

    /// Atomically take `quantity` units from stock, failing if fewer remain.
    async fn decrement_stock(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<u32, ProductsServiceError>;

    /// Return `quantity` units to stock.
    async fn increment_stock(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<u32, ProductsServiceError>;
}
