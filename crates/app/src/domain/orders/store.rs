//! Orders persistence.

use async_trait::async_trait;
use mockall::automock;
use pantry::status::OrderStatus;
use sqlx::error::ErrorKind;

use crate::{
    auth::UserUuid,
    database::Db,
    domain::{
        carts::repository::PgCartsRepository,
        orders::{
            data::PendingOrder,
            errors::OrdersStoreError,
            records::{OrderRecord, OrderUuid},
            repository::PgOrdersRepository,
        },
        products::{
            records::{ProductRecord, ProductUuid, StockDecrement},
            repository::PgProductsRepository,
        },
    },
};

/// Storage the order service runs against.
#[automock]
#[async_trait]
pub trait OrdersStore: Send + Sync {
    /// Current catalog entry for a product, if it exists.
    async fn find_product(
        &self,
        product: ProductUuid,
    ) -> Result<Option<ProductRecord>, OrdersStoreError>;

    /// Atomically decrement stock for every line, persist the order and clear the owner's
    /// cart. Nothing is written unless everything is. A uuid that is already taken yields
    /// [`OrdersStoreError::OrderExists`].
    async fn commit_order(&self, order: PendingOrder) -> Result<OrderRecord, OrdersStoreError>;

    /// Any order by uuid.
    async fn find_order(&self, order: OrderUuid) -> Result<Option<OrderRecord>, OrdersStoreError>;

    /// An order by uuid, only if it belongs to `user`.
    async fn find_user_order(
        &self,
        order: OrderUuid,
        user: UserUuid,
    ) -> Result<Option<OrderRecord>, OrdersStoreError>;

    /// Orders newest first, optionally limited to one user.
    async fn list_orders(
        &self,
        user: Option<UserUuid>,
    ) -> Result<Vec<OrderRecord>, OrdersStoreError>;

    /// Compare-and-set the status. `None` when the order no longer has status `from`.
    async fn update_status(
        &self,
        order: OrderUuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<OrderRecord>, OrdersStoreError>;
}

#[derive(Debug, Clone)]
pub struct PgOrdersStore {
    db: Db,
    orders: PgOrdersRepository,
    products: PgProductsRepository,
    carts: PgCartsRepository,
}

impl PgOrdersStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            products: PgProductsRepository::new(),
            carts: PgCartsRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersStore for PgOrdersStore {
    async fn find_product(
        &self,
        product: ProductUuid,
    ) -> Result<Option<ProductRecord>, OrdersStoreError> {
        let mut tx = self.db.begin().await?;

        let product = self.products.find_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn commit_order(&self, order: PendingOrder) -> Result<OrderRecord, OrdersStoreError> {
        let mut tx = self.db.begin().await?;

        // Lock product rows in uuid order so concurrent multi-product orders cannot deadlock.
        let mut decrements = order.items.clone();
        decrements.sort_by_key(|line| line.product);

        for line in &decrements {
            let outcome = self
                .products
                .decrement_stock(&mut tx, line.product, line.quantity)
                .await?;

            let error = match outcome {
                StockDecrement::Decremented { .. } => continue,
                StockDecrement::Insufficient { available } => OrdersStoreError::InsufficientStock {
                    product: line.product,
                    requested: line.quantity,
                    available,
                },
                StockDecrement::NotFound => OrdersStoreError::ProductNotFound {
                    product: line.product,
                },
            };

            tx.rollback().await?;

            return Err(error);
        }

        let record = match self.orders.insert_order(&mut tx, &order).await {
            Ok(record) => record,
            Err(error)
                if error
                    .as_database_error()
                    .is_some_and(|error| error.kind() == ErrorKind::UniqueViolation) =>
            {
                tx.rollback().await?;

                return Err(OrdersStoreError::OrderExists { order: order.uuid });
            }
            Err(error) => return Err(error.into()),
        };

        self.carts.clear_cart(&mut tx, order.user).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn find_order(&self, order: OrderUuid) -> Result<Option<OrderRecord>, OrdersStoreError> {
        let mut tx = self.db.begin().await?;

        let order = self.orders.find_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn find_user_order(
        &self,
        order: OrderUuid,
        user: UserUuid,
    ) -> Result<Option<OrderRecord>, OrdersStoreError> {
        let mut tx = self.db.begin().await?;

        let order = self.orders.find_user_order(&mut tx, order, user).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn list_orders(
        &self,
        user: Option<UserUuid>,
    ) -> Result<Vec<OrderRecord>, OrdersStoreError> {
        let mut tx = self.db.begin().await?;

        let orders = self.orders.list_orders(&mut tx, user).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn update_status(
        &self,
        order: OrderUuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<OrderRecord>, OrdersStoreError> {
        let mut tx = self.db.begin().await?;

        let order = self.orders.update_status(&mut tx, order, from, to).await?;

        tx.commit().await?;

        Ok(order)
    }
}
