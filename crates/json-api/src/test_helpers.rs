//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use pantry::{
    addresses::ShippingAddress, categories::Category, payment_methods::PaymentMethod,
    status::OrderStatus,
};
use pantry_app::{
    auth::{Identity, MockAuthService, UserUuid},
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            records::{CartLineRecord, CartRecord},
        },
        orders::{
            MockOrdersService,
            records::{OrderLineRecord, OrderRecord, OrderUuid},
        },
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
    },
};
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_CUSTOMER: Identity = Identity::customer(TEST_USER);

pub(crate) const TEST_ADMIN: Identity = Identity::admin(TEST_USER);

#[derive(Debug)]
struct InjectIdentity(Identity);

#[handler]
impl InjectIdentity {
    async fn handle(&self, depot: &mut Depot) {
        depot.insert_identity(self.0);
    }
}

fn identity_hoop(identity: Identity) -> InjectIdentity {
    InjectIdentity(identity)
}

/// Mocks for every service, each refusing any call until a test sets expectations.
#[derive(Debug)]
pub(crate) struct Mocks {
    pub(crate) products: MockProductsService,
    pub(crate) carts: MockCartsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) auth: MockAuthService,
}

impl Default for Mocks {
    fn default() -> Self {
        let mut products = MockProductsService::new();

        products.expect_list_products().never();
        products.expect_get_product().never();
        products.expect_create_product().never();
        products.expect_update_product().never();
        products.expect_delete_product().never();

        let mut carts = MockCartsService::new();

        carts.expect_get_cart().never();
        carts.expect_add_item().never();
        carts.expect_update_item().never();
        carts.expect_remove_item().never();
        carts.expect_clear_cart().never();

        let mut orders = MockOrdersService::new();

        orders.expect_place_order().never();
        orders.expect_get_order().never();
        orders.expect_list_orders().never();
        orders.expect_list_user_orders().never();
        orders.expect_update_status().never();

        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        Self {
            products,
            carts,
            orders,
            auth,
        }
    }
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            products: Arc::new(self.products),
            carts: Arc::new(self.carts),
            orders: Arc::new(self.orders),
            auth: Arc::new(self.auth),
        })
    }

    /// Serve `route` as if the authentication hoop had resolved `identity`.
    pub(crate) fn service_as(self, identity: Identity, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(identity_hoop(identity))
                .push(route),
        )
    }

    /// Serve `route` without any authenticated caller.
    pub(crate) fn anonymous_service(self, route: Router) -> Service {
        Service::new(Router::new().hoop(inject(self.into_state())).push(route))
    }
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    Mocks {
        products,
        ..Mocks::default()
    }
    .service_as(TEST_ADMIN, route)
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Mocks {
        carts,
        ..Mocks::default()
    }
    .service_as(TEST_CUSTOMER, route)
}

pub(crate) fn orders_service(orders: MockOrdersService, identity: Identity, route: Router) -> Service {
    Mocks {
        orders,
        ..Mocks::default()
    }
    .service_as(identity, route)
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Bananas".to_string(),
        description: "A bunch of ripe bananas".to_string(),
        price: 250,
        category: Category::Fruits,
        stock: 12,
        image_url: "https://images.example.com/bananas.jpg".to_string(),
        is_organic: true,
        is_featured: false,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_cart(lines: &[(ProductUuid, u32, u64)]) -> CartRecord {
    CartRecord {
        user: TEST_USER,
        lines: lines
            .iter()
            .map(|&(product, quantity, price)| CartLineRecord {
                product,
                quantity,
                name: "Bananas".to_string(),
                price,
                image_url: "https://images.example.com/bananas.jpg".to_string(),
                stock: 12,
                added_at: Timestamp::UNIX_EPOCH,
            })
            .collect(),
    }
}

pub(crate) fn make_address() -> ShippingAddress {
    ShippingAddress {
        recipient_name: "Grace Hopper".to_string(),
        street: "1 Navy Way".to_string(),
        city: "Arlington".to_string(),
        region: "VA".to_string(),
        postal_code: "22202".to_string(),
        phone: "555-0100".to_string(),
    }
}

pub(crate) fn make_order(uuid: OrderUuid, user: UserUuid, product: ProductUuid) -> OrderRecord {
    OrderRecord {
        uuid,
        user,
        items: vec![OrderLineRecord {
            product,
            quantity: 2,
            price: 250,
        }],
        shipping_address: make_address(),
        payment_method: PaymentMethod::CreditCard,
        subtotal: 500,
        shipping: 1000,
        total_amount: 1500,
        payment_id: "pi_test".to_string(),
        status: OrderStatus::Pending,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
