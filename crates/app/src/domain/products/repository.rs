//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use pantry::categories::Category;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::products::{
    data::{NewProduct, ProductFilter, ProductUpdate},
    records::{ProductRecord, ProductUuid, StockDecrement},
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");
const GET_STOCK_SQL: &str = include_str!("sql/get_stock.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: ProductFilter,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .bind(filter.category.map(Category::as_str))
            .bind(filter.min_price.map(|price| to_i64("min_price", price)).transpose()?)
            .bind(filter.max_price.map(|price| to_i64("max_price", price)).transpose()?)
            .bind(filter.is_organic)
            .bind(filter.is_featured)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Option<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(&product.name)
            .bind(&product.description)
            .bind(to_i64("price", product.price)?)
            .bind(product.category.as_str())
            .bind(i64::from(product.stock))
            .bind(&product.image_url)
            .bind(product.is_organic)
            .bind(product.is_featured)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: &ProductUpdate,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(update.name.as_deref())
            .bind(update.description.as_deref())
            .bind(update.price.map(|price| to_i64("price", price)).transpose()?)
            .bind(update.category.map(Category::as_str))
            .bind(update.stock.map(i64::from))
            .bind(update.image_url.as_deref())
            .bind(update.is_organic)
            .bind(update.is_featured)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Take `amount` units out of stock only if that many are on hand.
    ///
    /// The check and the write are one statement, so concurrent decrements of the same row
    /// serialize on its lock and never drive stock below zero.
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        amount: u32,
    ) -> Result<StockDecrement, sqlx::Error> {
        let remaining: Option<i64> = query_scalar(DECREMENT_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(i64::from(amount))
            .fetch_optional(&mut **tx)
            .await?;

        if let Some(remaining) = remaining {
            return Ok(StockDecrement::Decremented {
                remaining: to_u32("stock", remaining)?,
            });
        }

        let available: Option<i64> = query_scalar(GET_STOCK_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        match available {
            Some(available) => Ok(StockDecrement::Insufficient {
                available: to_u32("stock", available)?,
            }),
            None => Ok(StockDecrement::NotFound),
        }
    }
}

fn to_i64(field: &str, value: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(value).map_err(|error| sqlx::Error::ColumnDecode {
        index: field.to_string(),
        source: Box::new(error),
    })
}

fn to_u32(field: &str, value: i64) -> Result<u32, sqlx::Error> {
    u32::try_from(value).map_err(|error| sqlx::Error::ColumnDecode {
        index: field.to_string(),
        source: Box::new(error),
    })
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let price_i64: i64 = row.try_get("price")?;

        let price = u64::try_from(price_i64).map_err(|e| sqlx::Error::ColumnDecode {
            index: "price".to_string(),
            source: Box::new(e),
        })?;

        let category = row
            .try_get::<String, _>("category")?
            .parse::<Category>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "category".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price,
            category,
            stock: to_u32("stock", row.try_get("stock")?)?,
            image_url: row.try_get("image_url")?,
            is_organic: row.try_get("is_organic")?,
            is_featured: row.try_get("is_featured")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
