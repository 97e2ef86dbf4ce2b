//! Create Product Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pantry::categories::Category;
use pantry_app::domain::products::{data::NewProduct, records::ProductUuid};

use crate::{
    extensions::*,
    products::{
        errors::{into_status_error, invalid_field},
        get::ProductResponse,
    },
    state::State,
};

/// Create Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateProductRequest {
    /// Client-chosen identifier, generated when omitted
    #[serde(default)]
    pub uuid: Option<Uuid>,
    pub name: String,
    pub description: String,
    /// Price in pence/cents
    pub price: u64,
    pub category: String,
    pub stock: u32,
    pub image_url: String,
    #[serde(default)]
    pub is_organic: bool,
    #[serde(default)]
    pub is_featured: bool,
}

impl TryFrom<CreateProductRequest> for NewProduct {
    type Error = StatusError;

    fn try_from(request: CreateProductRequest) -> Result<Self, Self::Error> {
        let category = request
            .category
            .parse::<Category>()
            .map_err(|_ignored| invalid_field("category"))?;

        Ok(NewProduct {
            uuid: request.uuid.map_or_else(ProductUuid::new, ProductUuid::from_uuid),
            name: request.name,
            description: request.description,
            price: request.price,
            category,
            stock: request.stock,
            image_url: request.image_url,
            is_organic: request.is_organic,
            is_featured: request.is_featured,
        })
    }
}

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::CONFLICT, description = "Product already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator access required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.create",
    skip(json, depot, res),
    fields(product_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product: NewProduct = json.into_inner().try_into()?;

    tracing::Span::current().record("product_uuid", tracing::field::display(product.uuid));

    let product = state
        .app
        .products
        .create_product(product)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/products/{}", product.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    tracing::info!(product_uuid = %product.uuid, "created product");

    Ok(Json(product.into()))
}
