//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use shopfusion_app::{
    auth::{AuthenticatedUser, MockAuthService},
    context::AppContext,
    domain::{
        carts::MockCartsService,
        checkout::MockCheckoutService,
        orders::{
            MockOrdersService,
            records::{
                ContactDetails, OrderItemRecord, OrderItemUuid, OrderRecord, OrderStatus,
                OrderUuid, PaymentMethod, PaymentStatus,
            },
        },
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
        promo_codes::MockPromoCodesService,
        users::records::UserUuid,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

/// One mock per service; any call without an expectation fails the test.
#[derive(Default)]
pub(crate) struct MockServices {
    pub(crate) products: MockProductsService,
    pub(crate) carts: MockCartsService,
    pub(crate) promo_codes: MockPromoCodesService,
    pub(crate) orders: MockOrdersService,
    pub(crate) checkout: MockCheckoutService,
    pub(crate) auth: MockAuthService,
}

impl MockServices {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            products: Arc::new(self.products),
            carts: Arc::new(self.carts),
            promo_codes: Arc::new(self.promo_codes),
            orders: Arc::new(self.orders),
            checkout: Arc::new(self.checkout),
            auth: Arc::new(self.auth),
        })
    }
}

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_authenticated_user(AuthenticatedUser {
        uuid: TEST_USER_UUID,
        is_verified: true,
    });

    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_unverified_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_authenticated_user(AuthenticatedUser {
        uuid: TEST_USER_UUID,
        is_verified: false,
    });

    ctrl.call_next(req, depot, res).await;
}

/// Serve `route` as the verified test user.
pub(crate) fn service(mocks: MockServices, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_user)
            .push(route),
    )
}

/// Serve `route` as a user who has not verified their email.
pub(crate) fn unverified_service(mocks: MockServices, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_unverified_user)
            .push(route),
    )
}

pub(crate) fn money(value: &str) -> Decimal {
    value.parse().unwrap_or_default()
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Widget".to_string(),
        price: money("25.00"),
        stock_quantity: 5,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn contact() -> ContactDetails {
    ContactDetails {
        name: "Asha Rao".to_string(),
        phone: "+91 98765 43210".to_string(),
        address: "12 MG Road, Bengaluru".to_string(),
    }
}

pub(crate) fn make_order(uuid: OrderUuid, status: OrderStatus) -> OrderRecord {
    let product = ProductUuid::from_uuid(Uuid::nil());

    OrderRecord {
        uuid,
        order_number: "ORD-20261018-AB12CD34".to_string(),
        user_uuid: TEST_USER_UUID,
        status,
        payment_status: PaymentStatus::Unpaid,
        payment_method: PaymentMethod::CashOnDelivery,
        payment_reference: None,
        promo_code: None,
        subtotal: money("45.00"),
        tax_amount: money("4.50"),
        shipping_amount: money("10.00"),
        discount_amount: money("0.00"),
        total_amount: money("59.50"),
        shipping: contact(),
        billing: contact(),
        tracking_number: None,
        items: vec![
            OrderItemRecord {
                uuid: OrderItemUuid::new(),
                order_uuid: uuid,
                product_uuid: Some(product),
                product_name: "Widget A".to_string(),
                product_price: money("25.00"),
                quantity: 1,
                subtotal: money("25.00"),
                created_at: Timestamp::UNIX_EPOCH,
            },
            OrderItemRecord {
                uuid: OrderItemUuid::new(),
                order_uuid: uuid,
                product_uuid: None,
                product_name: "Widget B".to_string(),
                product_price: money("10.00"),
                quantity: 2,
                subtotal: money("20.00"),
                created_at: Timestamp::UNIX_EPOCH,
            },
        ],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        shipped_at: None,
        delivered_at: None,
    }
}
