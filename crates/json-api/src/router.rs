//! App Router

use salvo::Router;

use crate::{auth, carts, orders, products};

/// Every API route. Catalog reads are public, everything else sits behind the bearer token
/// hoop, and catalog writes plus order administration additionally require an admin.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(
                    Router::with_path("cart")
                        .get(carts::get::handler)
                        .delete(carts::clear::handler)
                        .push(
                            Router::with_path("items")
                                .post(carts::items::create::handler)
                                .push(
                                    Router::with_path("{product}")
                                        .put(carts::items::update::handler)
                                        .delete(carts::items::delete::handler),
                                ),
                        ),
                )
                .push(
                    Router::with_path("orders")
                        .post(orders::create::handler)
                        .push(Router::with_path("mine").get(orders::mine::handler))
                        .push(Router::with_path("{order}").get(orders::get::handler)),
                )
                .push(
                    Router::new()
                        .hoop(auth::middleware::require_admin)
                        .push(
                            Router::with_path("products")
                                .post(products::create::handler)
                                .push(
                                    Router::with_path("{product}")
                                        .put(products::update::handler)
                                        .delete(products::delete::handler),
                                ),
                        )
                        .push(
                            Router::with_path("orders")
                                .get(orders::index::handler)
                                .push(
                                    Router::with_path("{order}/status")
                                        .patch(orders::update_status::handler),
                                ),
                        ),
                ),
        )
}
