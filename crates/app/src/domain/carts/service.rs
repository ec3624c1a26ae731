//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        carts::{
            data::{NewCartItem, is_valid_quantity},
            errors::CartsServiceError,
            records::{AddItemOutcome, AddedCartItem, CartItemRecord, CartItemState, CartRecord},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        products::{records::ProductUuid, repository::PgProductsRepository},
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_or_create_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let mut cart = self
            .carts_repository
            .get_or_create_cart(&mut tx, user)
            .await?;

        let lines = self
            .items_repository
            .list_cart_lines(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        cart.items.extend(lines);

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(user_uuid = %user, product_uuid = %item.product_uuid, quantity = item.quantity),
        err
    )]
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<AddedCartItem, CartsServiceError> {
        if !is_valid_quantity(item.quantity) {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin_user_transaction(user).await?;

        self.products_repository
            .get_product(&mut tx, item.product_uuid)
            .await?;

        let cart = self
            .carts_repository
            .get_or_create_cart(&mut tx, user)
            .await?;

        self.carts_repository.lock_cart(&mut tx, cart.uuid).await?;

        let existing = self
            .items_repository
            .find_cart_item(&mut tx, cart.uuid, item.product_uuid)
            .await?;

        let outcome = match existing.map(|existing| existing.state) {
            None => AddItemOutcome::Added,
            Some(CartItemState::Removed { .. }) => AddItemOutcome::Restored,
            Some(CartItemState::Active) => AddItemOutcome::AlreadyPresent,
        };

        let stored = self
            .items_repository
            .upsert_cart_item(&mut tx, cart.uuid, item.product_uuid, item.quantity)
            .await?;

        if outcome != AddItemOutcome::AlreadyPresent {
            self.carts_repository.touch_cart(&mut tx, cart.uuid).await?;
        }

        tx.commit().await?;

        info!(?outcome, "added item to cart");

        Ok(AddedCartItem {
            item: stored,
            outcome,
        })
    }

    #[tracing::instrument(
        name = "carts.service.update_quantity",
        skip(self),
        fields(user_uuid = %user, product_uuid = %product),
        err
    )]
    async fn update_quantity(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartItemRecord, CartsServiceError> {
        if !is_valid_quantity(quantity) {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin_user_transaction(user).await?;

        let cart = self
            .carts_repository
            .find_cart_by_user(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        self.carts_repository.lock_cart(&mut tx, cart.uuid).await?;

        let updated = self
            .items_repository
            .update_quantity(&mut tx, cart.uuid, product, quantity)
            .await?;

        self.carts_repository.touch_cart(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        info!("updated cart item quantity");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(user_uuid = %user, product_uuid = %product),
        err
    )]
    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let cart = self
            .carts_repository
            .find_cart_by_user(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        self.carts_repository.lock_cart(&mut tx, cart.uuid).await?;

        let rows_affected = self
            .items_repository
            .remove_cart_item(&mut tx, cart.uuid, product)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        self.carts_repository.touch_cart(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        info!("removed item from cart");

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.service.clear",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn clear(&self, user: UserUuid) -> Result<u64, CartsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let Some(cart) = self
            .carts_repository
            .find_cart_by_user(&mut tx, user)
            .await?
        else {
            return Ok(0);
        };

        self.carts_repository.lock_cart(&mut tx, cart.uuid).await?;

        let cleared = self
            .items_repository
            .clear_cart_items(&mut tx, cart.uuid)
            .await?;

        if cleared > 0 {
            self.carts_repository.touch_cart(&mut tx, cart.uuid).await?;
        }

        tx.commit().await?;

        info!(cleared, "cleared cart");

        Ok(cleared)
    }

    async fn list_active_items(
        &self,
        user: UserUuid,
    ) -> Result<Vec<CartItemRecord>, CartsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let items = match self
            .carts_repository
            .find_cart_by_user(&mut tx, user)
            .await?
        {
            Some(cart) => {
                self.items_repository
                    .list_active_items(&mut tx, cart.uuid)
                    .await?
            }
            None => Vec::new(),
        };

        tx.commit().await?;

        Ok(items)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart with its active lines, creating it if needed.
    async fn get_or_create_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError>;

    /// Add a product to the user's cart.
    ///
    /// An active line for the product is returned unchanged; a removed line
    /// is reactivated with quantity 1.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<AddedCartItem, CartsServiceError>;

    /// Set the quantity of an active line.
    async fn update_quantity(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartItemRecord, CartsServiceError>;

    /// Mark the line for a product as removed.
    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), CartsServiceError>;

    /// Mark every active line removed, returning how many were cleared.
    async fn clear(&self, user: UserUuid) -> Result<u64, CartsServiceError>;

    /// Active lines in insertion order.
    async fn list_active_items(
        &self,
        user: UserUuid,
    ) -> Result<Vec<CartItemRecord>, CartsServiceError>;
}
