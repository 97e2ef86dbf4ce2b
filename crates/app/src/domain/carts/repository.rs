//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    auth::UserUuid,
    domain::{carts::records::CartLineRecord, products::records::ProductUuid},
};

const GET_CART_LINES_SQL: &str = include_str!("sql/get_cart_lines.sql");
const ADD_CART_LINE_SQL: &str = include_str!("sql/add_cart_line.sql");
const UPDATE_CART_LINE_SQL: &str = include_str!("sql/update_cart_line.sql");
const REMOVE_CART_LINE_SQL: &str = include_str!("sql/remove_cart_line.sql");
const CLEAR_CART_SQL: &str = include_str!("sql/clear_cart.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<CartLineRecord>, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(GET_CART_LINES_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Insert a line or add to an existing one, returning the resulting quantity.
    pub(crate) async fn add_cart_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<u32, sqlx::Error> {
        let quantity: i64 = query_scalar(ADD_CART_LINE_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .bind(i64::from(quantity))
            .fetch_one(&mut **tx)
            .await?;

        decode_quantity(quantity)
    }

    pub(crate) async fn update_cart_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_CART_LINE_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .bind(i64::from(quantity))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn remove_cart_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REMOVE_CART_LINE_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_SQL)
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn decode_quantity(quantity: i64) -> Result<u32, sqlx::Error> {
    u32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
        index: "quantity".to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for CartLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let price_i64: i64 = row.try_get("price")?;

        let price = u64::try_from(price_i64).map_err(|e| sqlx::Error::ColumnDecode {
            index: "price".to_string(),
            source: Box::new(e),
        })?;

        let stock = u32::try_from(row.try_get::<i64, _>("stock")?).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "stock".to_string(),
                source: Box::new(e),
            }
        })?;

        Ok(Self {
            product: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: decode_quantity(row.try_get("quantity")?)?,
            name: row.try_get("name")?,
            price,
            image_url: row.try_get("image_url")?,
            stock,
            added_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
