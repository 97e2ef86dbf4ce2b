//! Orders Repository

use std::collections::HashMap;

use jiff_sqlx::Timestamp as SqlxTimestamp;
use pantry::{addresses::ShippingAddress, payment_methods::PaymentMethod, status::OrderStatus};
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json,
};
use uuid::Uuid;

use crate::{
    auth::UserUuid,
    domain::{
        orders::{
            data::PendingOrder,
            records::{OrderLineRecord, OrderRecord, OrderUuid},
        },
        products::records::ProductUuid,
    },
};

const INSERT_ORDER_SQL: &str = include_str!("sql/insert_order.sql");
const INSERT_ORDER_ITEM_SQL: &str = include_str!("sql/insert_order_item.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_USER_ORDER_SQL: &str = include_str!("sql/get_user_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("sql/get_order_items.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn insert_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &PendingOrder,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, OrderRecord>(INSERT_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user.into_uuid())
            .bind(Json(&order.shipping_address))
            .bind(order.payment_method.as_str())
            .bind(to_i64("subtotal", order.subtotal)?)
            .bind(to_i64("shipping", order.shipping)?)
            .bind(to_i64("total_amount", order.total_amount)?)
            .bind(&order.payment_id)
            .fetch_one(&mut **tx)
            .await?;

        for (position, line) in order.items.iter().enumerate() {
            let position = i32::try_from(position).map_err(|e| sqlx::Error::ColumnDecode {
                index: "position".to_string(),
                source: Box::new(e),
            })?;

            query(INSERT_ORDER_ITEM_SQL)
                .bind(order.uuid.into_uuid())
                .bind(position)
                .bind(line.product.into_uuid())
                .bind(i64::from(line.quantity))
                .bind(to_i64("price", line.price)?)
                .execute(&mut **tx)
                .await?;
        }

        record.items.clone_from(&order.items);

        Ok(record)
    }

    pub(crate) async fn find_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        let record = query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        self.with_items(tx, record.into_iter().collect())
            .await
            .map(|mut orders| orders.pop())
    }

    pub(crate) async fn find_user_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        user: UserUuid,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        let record = query_as::<Postgres, OrderRecord>(GET_USER_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        self.with_items(tx, record.into_iter().collect())
            .await
            .map(|mut orders| orders.pop())
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Option<UserUuid>,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let orders = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(user.map(UserUuid::into_uuid))
            .fetch_all(&mut **tx)
            .await?;

        self.with_items(tx, orders).await
    }

    /// Set `to` only if the order still has status `from`.
    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        let record = query_as::<Postgres, OrderRecord>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(&mut **tx)
            .await?;

        self.with_items(tx, record.into_iter().collect())
            .await
            .map(|mut orders| orders.pop())
    }

    async fn with_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut orders: Vec<OrderRecord>,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        if orders.is_empty() {
            return Ok(orders);
        }

        let uuids: Vec<Uuid> = orders.iter().map(|order| order.uuid.into_uuid()).collect();

        let rows = query_as::<Postgres, OrderItemRow>(GET_ORDER_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut items: HashMap<Uuid, Vec<OrderLineRecord>> = HashMap::new();

        for row in rows {
            items.entry(row.order_uuid).or_default().push(row.line);
        }

        for order in &mut orders {
            order.items = items.remove(&order.uuid.into_uuid()).unwrap_or_default();
        }

        Ok(orders)
    }
}

struct OrderItemRow {
    order_uuid: Uuid,
    line: OrderLineRecord,
}

fn to_i64(field: &str, value: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: field.to_string(),
        source: Box::new(e),
    })
}

fn decode_u64(row: &PgRow, field: &str) -> sqlx::Result<u64> {
    u64::try_from(row.try_get::<i64, _>(field)?).map_err(|e| sqlx::Error::ColumnDecode {
        index: field.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for OrderItemRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity = u32::try_from(row.try_get::<i64, _>("quantity")?).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "quantity".to_string(),
                source: Box::new(e),
            }
        })?;

        Ok(Self {
            order_uuid: row.try_get("order_uuid")?,
            line: OrderLineRecord {
                product: ProductUuid::from_uuid(row.try_get("product_uuid")?),
                quantity,
                price: decode_u64(row, "price")?,
            },
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let payment_method = row
            .try_get::<String, _>("payment_method")?
            .parse::<PaymentMethod>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "payment_method".to_string(),
                source: Box::new(e),
            })?;

        let status = row
            .try_get::<String, _>("status")?
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user: UserUuid::from_uuid(row.try_get("user_uuid")?),
            items: Vec::new(),
            shipping_address: row
                .try_get::<Json<ShippingAddress>, _>("shipping_address")?
                .0,
            payment_method,
            subtotal: decode_u64(row, "subtotal")?,
            shipping: decode_u64(row, "shipping")?,
            total_amount: decode_u64(row, "total_amount")?,
            payment_id: row.try_get("payment_id")?,
            status,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
