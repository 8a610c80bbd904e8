use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest, UpdateRoleRequest, UserInfo},
        cart::{CartDto, CartItemDto, CartItemRequest},
        categories::{CategoryDto, CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
        orders::{CreateOrderRequest, OrderDto, OrderLineDto, OrderList, UpdateOrderStateRequest},
        products::{CreateProductRequest, ProductDto, ProductList},
    },
    models::OrderState,
    response::{ApiResponse, Meta},
    routes::{admin, cart, categories, health, orders, params, products, users},
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
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::register,
        users::login,
        users::get_me,
        users::get_user,
        users::update_role,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        cart::get_cart,
        cart::add_item,
        cart::update_item,
        cart::remove_item,
        orders::list_orders,
        orders::get_order,
        orders::create_order,
        admin::list_all_orders,
        admin::update_order_state
    ),
    components(
        schemas(
            UserInfo,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UpdateRoleRequest,
            CategoryDto,
            CategoryList,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            ProductDto,
            ProductList,
            CreateProductRequest,
            CartDto,
            CartItemDto,
            CartItemRequest,
            OrderDto,
            OrderLineDto,
            OrderList,
            CreateOrderRequest,
            UpdateOrderStateRequest,
            OrderState,
            params::PaginationFilter,
            params::ProductQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<ProductList>,
            ApiResponse<CategoryList>,
            ApiResponse<OrderList>,
            ApiResponse<OrderDto>,
            ApiResponse<CartDto>,
            ApiResponse<UserInfo>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Users", description = "Identity and role endpoints"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Products", description = "Product endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
