//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pantry::categories::Category;
use pantry_app::domain::products::data::ProductUpdate;

use crate::{
    extensions::*,
    products::{
        errors::{into_status_error, invalid_field},
        get::ProductResponse,
    },
    state::State,
};

/// Update Product Request
///
/// Omitted fields keep their current value.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub category: Option<String>,
    pub stock: Option<u32>,
    pub image_url: Option<String>,
    pub is_organic: Option<bool>,
    pub is_featured: Option<bool>,
}

impl TryFrom<UpdateProductRequest> for ProductUpdate {
    type Error = StatusError;

    fn try_from(request: UpdateProductRequest) -> Result<Self, Self::Error> {
        let category = request
            .category
            .map(|category| category.parse::<Category>())
            .transpose()
            .map_err(|_ignored| invalid_field("category"))?;

        Ok(ProductUpdate {
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

/// Product Update Handler
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator access required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.update",
    skip(product, json, depot),
    fields(product_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<UpdateProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = product.into_inner();
    let update: ProductUpdate = json.into_inner().try_into()?;

    tracing::Span::current().record("product_uuid", tracing::field::display(product));

    let record = state
        .app
        .products
        .update_product(product.into(), update)
        .await
        .map_err(into_status_error)?;

    tracing::info!(product_uuid = %product, price = record.price, stock = record.stock, "updated product");

    Ok(Json(record.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use pantry_app::domain::products::{
        MockProductsService, ProductsServiceError, records::ProductUuid,
    };

    use crate::test_helpers::{make_product, products_service};

    use super::*;

    fn make_service(repo: MockProductsService) -> Service {
        products_service(repo, Router::with_path("products/{product}").put(handler))
    }

    fn strict_mock() -> MockProductsService {
        let mut repo = MockProductsService::new();

        repo.expect_get_product().never();
        repo.expect_create_product().never();
        repo.expect_list_products().never();
        repo.expect_delete_product().never();

        repo
    }

    #[tokio::test]
    async fn test_update_product_success() -> TestResult {
        let uuid = ProductUuid::new();

        let mut product = make_product(uuid);

        product.price = 300;
        product.stock = 4;

        let mut repo = strict_mock();

        repo.expect_update_product()
            .once()
            .withf(move |u, update| {
                *u == uuid
                    && *update
                        == ProductUpdate {
                            price: Some(300),
                            stock: Some(4),
                            ..ProductUpdate::default()
                        }
            })
            .return_once(move |_, _| Ok(product));

        let mut res = TestClient::put(format!("http://example.com/products/{uuid}"))
            .json(&json!({ "price": 300, "stock": 4 }))
            .send(&make_service(repo))
            .await;

        let body: ProductResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.price, 300);
        assert_eq!(body.stock, 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_invalid_uuid_returns_400() -> TestResult {
        let mut repo = strict_mock();

        repo.expect_update_product().never();

        let res = TestClient::put("http://example.com/products/123")
            .json(&json!({ "price": 300 }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_product_returns_404() -> TestResult {
        let uuid = ProductUuid::new();

        let mut repo = strict_mock();

        repo.expect_update_product()
            .once()
            .withf(move |u, _| *u == uuid)
            .return_once(|_, _| Err(ProductsServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/products/{uuid}"))
            .json(&json!({ "name": "Plantains" }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_category_returns_400() -> TestResult {
        let uuid = ProductUuid::new();

        let mut repo = strict_mock();

        repo.expect_update_product().never();

        let res = TestClient::put(format!("http://example.com/products/{uuid}"))
            .json(&json!({ "category": "jewellery" }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
