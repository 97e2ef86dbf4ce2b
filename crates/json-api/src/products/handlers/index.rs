//! Product Index Handler

use std::{str::FromStr, sync::Arc};

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use pantry_app::domain::products::data::ProductFilter;

use crate::{
    extensions::*,
    products::{errors::invalid_field, get::ProductResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The list of products
    pub products: Vec<ProductResponse>,
}

/// Parse an optional query parameter, rejecting values that do not parse.
fn query_param<T: FromStr>(req: &Request, key: &str) -> Result<Option<T>, StatusError> {
    req.query::<String>(key)
        .map(|raw| raw.parse::<T>().map_err(|_ignored| invalid_field(key)))
        .transpose()
}

fn product_filter(req: &Request) -> Result<ProductFilter, StatusError> {
    Ok(ProductFilter {
        category: query_param(req, "category")?,
        min_price: query_param(req, "minPrice")?,
        max_price: query_param(req, "maxPrice")?,
        is_organic: query_param(req, "isOrganic")?,
        is_featured: query_param(req, "isFeatured")?,
    })
}

/// Product Index Handler
///
/// Lists the live catalog. Optional `category`, `minPrice`, `maxPrice`, `isOrganic` and
/// `isFeatured` query parameters narrow the listing.
#[endpoint(
    tags("products"),
    summary = "List Products",
    responses(
        (status_code = StatusCode::OK, description = "Matching products"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid filter"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let filter = product_filter(req)?;

    let products = state
        .app
        .products
        .list_products(filter)
        .await
        .or_500("failed to fetch products")?;

    Ok(Json(ProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}
