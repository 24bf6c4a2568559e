use utoipa::{
    Modify, OpenApi,
    openapi::{
        self, OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cart::CartTotals,
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, ApplyCouponRequest, CartView, UpdateCartRequest},
        orders::{CheckoutReceipt, DeliveryInfo, UpdateOrderStatusRequest},
        profile::NewAddressRequest,
        seller::{CreateCouponRequest, CreateFoodRequest},
    },
    models::{
        Branch, CartLine, Coupon, Food, FoodGroup, FoodOption, Order, OrderItem, OrderStatus,
        SavedAddress,
    },
    poller::OrderHistory,
    response::{ApiResponse, Meta},
    routes::{auth, cart, catalog, checkout, health, orders, profile, seller},
    services::checkout_service::CheckoutState,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("session-id")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::logout,
        catalog::search,
        catalog::options,
        cart::cart_view,
        cart::add_to_cart,
        cart::replace_cart,
        cart::update_quantity,
        cart::clear_cart,
        cart::apply_coupon,
        checkout::checkout_state,
        checkout::checkout,
        orders::order_history,
        profile::list_addresses,
        profile::add_address,
        seller::list_orders,
        seller::update_order_status,
        seller::list_foods,
        seller::create_food,
        seller::delete_food,
        seller::create_coupon,
        seller::delete_coupon
    ),
    components(
        schemas(
            Branch,
            CartLine,
            CartTotals,
            CartView,
            Coupon,
            Food,
            FoodGroup,
            FoodOption,
            Order,
            OrderItem,
            OrderStatus,
            OrderHistory,
            SavedAddress,
            NewAddressRequest,
            CheckoutState,
            CheckoutReceipt,
            DeliveryInfo,
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            AddToCartRequest,
            UpdateCartRequest,
            ApplyCouponRequest,
            UpdateOrderStatusRequest,
            CreateFoodRequest,
            CreateCouponRequest,
            Meta,
            ApiResponse<CartView>,
            ApiResponse<CheckoutReceipt>,
            ApiResponse<OrderHistory>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Sign in, sign up and session endpoints"),
        (name = "Catalog", description = "Food search endpoints"),
        (name = "Cart", description = "Single-branch cart endpoints"),
        (name = "Checkout", description = "Order creation and payment"),
        (name = "Orders", description = "Buyer order history"),
        (name = "Profile", description = "Saved delivery addresses"),
        (name = "Seller", description = "Branch order queue, menu and coupons"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
