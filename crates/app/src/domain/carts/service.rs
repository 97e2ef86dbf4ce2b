//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    auth::UserUuid,
    database::Db,
    domain::{
        carts::{
            data::NewCartItem,
            errors::CartsServiceError,
            records::CartRecord,
            repository::PgCartsRepository,
        },
        products::{
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    async fn stocked_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, CartsServiceError> {
        self.products_repository
            .find_product(tx, product)
            .await?
            .ok_or(CartsServiceError::ProductNotFound(product))
    }

    async fn load_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let lines = self.carts_repository.get_cart_lines(tx, user).await?;

        Ok(CartRecord { user, lines })
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.load_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        let product = self.stocked_product(&mut tx, item.product).await?;

        let quantity = self
            .carts_repository
            .add_cart_line(&mut tx, user, item.product, item.quantity)
            .await?;

        if quantity > product.stock {
            tx.rollback().await?;

            return Err(CartsServiceError::InsufficientStock {
                product: item.product,
                requested: quantity,
                available: product.stock,
            });
        }

        let cart = self.load_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn update_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartRecord, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        let record = self.stocked_product(&mut tx, product).await?;

        if quantity > record.stock {
            return Err(CartsServiceError::InsufficientStock {
                product,
                requested: quantity,
                available: record.stock,
            });
        }

        let rows_affected = self
            .carts_repository
            .update_cart_line(&mut tx, user, product, quantity)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::ItemNotFound(product));
        }

        let cart = self.load_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.carts_repository
            .remove_cart_line(&mut tx, user, product)
            .await?;

        let cart = self.load_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn clear_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.carts_repository.clear_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(CartRecord::empty(user))
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The user's cart, priced at current catalog prices.
    async fn get_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError>;

    /// Add units of a product, creating the line if needed.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Replace the quantity of an existing line.
    async fn update_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove a line. Removing an absent line is not an error.
    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove every line.
    async fn clear_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::products::ProductsService,
        test::{TestContext, new_product},
    };

    use super::*;

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL test container"]
    async fn add_item_creates_then_increments_line() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.products.create_product(new_product(3_00, 5)).await?;

        let item = NewCartItem {
            product: product.uuid,
            quantity: 2,
        };

        ctx.carts.add_item(ctx.customer, item).await?;
        let cart = ctx.carts.add_item(ctx.customer, item).await?;

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines.first().map(|line| line.quantity), Some(4));
        assert_eq!(cart.subtotal(), Some(12_00));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL test container"]
    async fn add_item_beyond_stock_is_rejected_and_rolled_back() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.products.create_product(new_product(3_00, 3)).await?;

        let item = NewCartItem {
            product: product.uuid,
            quantity: 2,
        };

        ctx.carts.add_item(ctx.customer, item).await?;

        let result = ctx.carts.add_item(ctx.customer, item).await;

        assert!(matches!(
            result,
            Err(CartsServiceError::InsufficientStock {
                requested: 4,
                available: 3,
                ..
            })
        ));

        let cart = ctx.carts.get_cart(ctx.customer).await?;

        assert_eq!(cart.lines.first().map(|line| line.quantity), Some(2));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL test container"]
    async fn add_unknown_product_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let missing = ProductUuid::new();

        let result = ctx
            .carts
            .add_item(
                ctx.customer,
                NewCartItem {
                    product: missing,
                    quantity: 1,
                },
            )
            .await;

        assert!(matches!(result, Err(CartsServiceError::ProductNotFound(uuid)) if uuid == missing));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL test container"]
    async fn update_missing_line_is_item_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.products.create_product(new_product(3_00, 3)).await?;

        let result = ctx.carts.update_item(ctx.customer, product.uuid, 1).await;

        assert!(matches!(result, Err(CartsServiceError::ItemNotFound(_))));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL test container"]
    async fn carts_are_per_user() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.products.create_product(new_product(3_00, 3)).await?;

        ctx.carts
            .add_item(
                ctx.customer,
                NewCartItem {
                    product: product.uuid,
                    quantity: 1,
                },
            )
            .await?;

        let other = ctx.carts.get_cart(ctx.admin).await?;

        assert!(other.lines.is_empty());

        let cleared = ctx.carts.clear_cart(ctx.customer).await?;

        assert!(cleared.lines.is_empty());
        assert!(ctx.carts.get_cart(ctx.customer).await?.lines.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected_before_touching_storage() -> TestResult {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgresql://unused@localhost/unused")?;
        let service = PgCartsService::new(Db::new(pool));

        let result = service
            .add_item(
                UserUuid::new(),
                NewCartItem {
                    product: ProductUuid::new(),
                    quantity: 0,
                },
            )
            .await;

        assert!(matches!(result, Err(CartsServiceError::InvalidQuantity)));

        Ok(())
    }
}
