//! Orders service.

use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use mockall::automock;
use pantry::{
    pricing::{PricedLine, STORE_CURRENCY_CODE, TotalPriceError, order_totals},
    status::{OrderStatus, StatusPolicy},
};
use smallvec::SmallVec;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::{
    auth::{Identity, UserUuid},
    database::Db,
    domain::{
        orders::{
            data::{NewOrder, PendingOrder},
            errors::{OrdersServiceError, OrdersStoreError},
            records::{OrderLineRecord, OrderRecord, OrderUuid, PlacedOrder},
            store::{OrdersStore, PgOrdersStore},
        },
        products::records::ProductUuid,
    },
    payments::{PaymentAuthorization, PaymentGateway, PaymentGatewayError, PaymentRequest},
};

/// Default upper bound on a payment authorization round trip.
pub const DEFAULT_PAYMENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Tunables for order placement and status management.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSettings {
    /// How long to wait for the gateway before giving up on authorization.
    pub payment_timeout: Duration,

    /// Which status changes administrators may make.
    pub status_policy: StatusPolicy,
}

impl Default for OrderSettings {
    fn default() -> Self {
        Self {
            payment_timeout: DEFAULT_PAYMENT_TIMEOUT,
            status_policy: StatusPolicy::default(),
        }
    }
}

/// Orders service backed by an [`OrdersStore`] and a [`PaymentGateway`].
#[derive(Clone)]
pub struct PgOrdersService {
    store: Arc<dyn OrdersStore>,
    gateway: Arc<dyn PaymentGateway>,
    settings: OrderSettings,
}

impl fmt::Debug for PgOrdersService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgOrdersService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, gateway: Arc<dyn PaymentGateway>, settings: OrderSettings) -> Self {
        Self::with_store(Arc::new(PgOrdersStore::new(db)), gateway, settings)
    }

    #[must_use]
    pub fn with_store(
        store: Arc<dyn OrdersStore>,
        gateway: Arc<dyn PaymentGateway>,
        settings: OrderSettings,
    ) -> Self {
        Self {
            store,
            gateway,
            settings,
        }
    }

    /// Check every line against the catalog, in order, and freeze its current price. Stock is
    /// checked against the running total per product, so repeated lines cannot overdraw it.
    async fn price_lines(
        &self,
        order: &NewOrder,
    ) -> Result<Vec<OrderLineRecord>, OrdersServiceError> {
        let mut lines = Vec::with_capacity(order.items.len());
        let mut requested: HashMap<ProductUuid, u32> = HashMap::new();

        for item in &order.items {
            let product = self.store.find_product(item.product).await?.ok_or(
                OrdersServiceError::ProductNotFound {
                    product: item.product,
                },
            )?;

            let total = requested.entry(item.product).or_default();

            *total = total.saturating_add(item.quantity);

            if product.stock < *total {
                return Err(OrdersServiceError::InsufficientStock {
                    product: item.product,
                    requested: *total,
                    available: product.stock,
                });
            }

            lines.push(OrderLineRecord {
                product: item.product,
                quantity: item.quantity,
                price: product.price,
            });
        }

        Ok(lines)
    }

    async fn authorize_payment(
        &self,
        order: &NewOrder,
        amount: u64,
    ) -> Result<PaymentAuthorization, OrdersServiceError> {
        let request = PaymentRequest {
            order: order.uuid.into_uuid(),
            amount,
            currency: STORE_CURRENCY_CODE,
            instrument_types: order
                .payment_method
                .instrument_types()
                .iter()
                .copied()
                .collect(),
        };

        let limit = self.settings.payment_timeout;

        match timeout(limit, self.gateway.authorize(request)).await {
            Ok(Ok(authorization)) => Ok(authorization),
            Ok(Err(error)) => {
                warn!(order_uuid = %order.uuid, "payment authorization failed: {error}");

                Err(OrdersServiceError::PaymentAuthorizationFailed(error))
            }
            Err(_elapsed) => {
                warn!(order_uuid = %order.uuid, "payment authorization timed out");

                Err(OrdersServiceError::PaymentAuthorizationFailed(
                    PaymentGatewayError::Timeout(limit.as_millis()),
                ))
            }
        }
    }

    /// Best-effort cancellation of an intent whose order could not be committed.
    async fn release_payment(&self, payment_id: &str) {
        match timeout(self.settings.payment_timeout, self.gateway.cancel(payment_id)).await {
            Ok(Ok(())) => info!(payment_id, "cancelled payment intent for uncommitted order"),
            Ok(Err(error)) => warn!(payment_id, "failed to cancel payment intent: {error}"),
            Err(_elapsed) => warn!(payment_id, "timed out cancelling payment intent"),
        }
    }
}

fn totals_error(_error: TotalPriceError) -> OrdersServiceError {
    OrdersServiceError::validation("items")
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn place_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<PlacedOrder, OrdersServiceError> {
        order.validate()?;

        let lines = self.price_lines(&order).await?;

        let priced: SmallVec<[PricedLine; 8]> = lines
            .iter()
            .map(|line| PricedLine {
                unit_price: line.price,
                quantity: line.quantity,
            })
            .collect();

        let totals = order_totals(&priced).map_err(totals_error)?;
        let total_amount = totals.total_minor().map_err(totals_error)?;

        let authorization = self.authorize_payment(&order, total_amount).await?;

        let pending = PendingOrder {
            uuid: order.uuid,
            user,
            items: lines,
            shipping_address: order.shipping_address,
            payment_method: order.payment_method,
            subtotal: totals.subtotal_minor().map_err(totals_error)?,
            shipping: totals.shipping_minor().map_err(totals_error)?,
            total_amount,
            payment_id: authorization.payment_id.clone(),
        };

        match self.store.commit_order(pending).await {
            Ok(order) => {
                info!(
                    order_uuid = %order.uuid,
                    user_uuid = %user,
                    total_amount,
                    "order placed"
                );

                Ok(PlacedOrder {
                    order,
                    client_secret: authorization.client_secret,
                })
            }
            // The uuid is the gateway idempotency key, so the intent belongs to the order
            // that already holds it and must stay live.
            Err(error @ OrdersStoreError::OrderExists { .. }) => {
                warn!(
                    order_uuid = %order.uuid,
                    payment_id = %authorization.payment_id,
                    "order already placed, keeping its payment intent"
                );

                Err(error.into())
            }
            Err(error) => {
                self.release_payment(&authorization.payment_id).await;

                Err(error.into())
            }
        }
    }

    async fn get_order(
        &self,
        identity: Identity,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        if identity.is_admin() {
            return self
                .store
                .find_order(order)
                .await?
                .ok_or(OrdersServiceError::NotFound);
        }

        // Non-admins cannot tell a missing order from someone else's.
        self.store
            .find_user_order(order, identity.user)
            .await?
            .ok_or(OrdersServiceError::Forbidden)
    }

    async fn list_orders(&self) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        Ok(self.store.list_orders(None).await?)
    }

    async fn list_user_orders(
        &self,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        Ok(self.store.list_orders(Some(user)).await?)
    }

    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let current = self
            .store
            .find_order(order)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        self.settings.status_policy.check(current.status, status)?;

        if current.status == status {
            return Ok(current);
        }

        let updated = self
            .store
            .update_status(order, current.status, status)
            .await?
            .ok_or(OrdersServiceError::StatusConflict)?;

        info!(
            order_uuid = %order,
            from = %current.status,
            to = %status,
            "order status updated"
        );

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Validate, price, authorize payment for and commit a new order.
    async fn place_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<PlacedOrder, OrdersServiceError>;

    /// A single order, visible to its owner and to administrators.
    async fn get_order(
        &self,
        identity: Identity,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Every order, newest first.
    async fn list_orders(&self) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// One user's orders, newest first.
    async fn list_user_orders(&self, user: UserUuid)
    -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Move an order to a new status, subject to the configured policy.
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError>;
}
