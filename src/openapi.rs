use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "casecraft API",
        version = "0.1.0",
        description = r#"
Storefront backend for custom phone cases.

Clients create a case configuration, attach an uploaded image, pick a
model/material/color combination, and pay through a provider-hosted
checkout. Orders are created exactly once per checkout session by the
payment webhook.

Authenticated endpoints expect a session token issued by the external
auth provider:

```
Authorization: Bearer <session-token>
```
"#
    ),
    paths(
        crate::handlers::phone_cases::create_phone_case,
        crate::handlers::phone_cases::get_phone_case,
        crate::handlers::phone_cases::update_phone_case,
        crate::handlers::catalog::list_colors,
        crate::handlers::catalog::list_models,
        crate::handlers::catalog::list_materials,
        crate::handlers::orders::create_checkout,
        crate::handlers::orders::get_order_by_session,
        crate::handlers::orders::dashboard,
        crate::handlers::payment_webhooks::payment_webhook,
        crate::handlers::uploads::upload_complete,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::phone_cases::CreatePhoneCaseRequest,
        crate::handlers::phone_cases::UpdatePhoneCaseRequest,
        crate::handlers::orders::CreateCheckoutRequest,
        crate::handlers::orders::CheckoutResponse,
        crate::handlers::uploads::UploadCompleteRequest,
        crate::services::catalog::ModelView,
        crate::services::catalog::MaterialView,
        crate::services::catalog::ColorView,
        crate::services::phone_cases::PhoneCaseView,
        crate::services::phone_cases::PhoneCaseDetail,
        crate::services::orders::OrderDetail,
        crate::services::orders::OrderCaseSummary,
        crate::services::orders::OrderCaseColor,
        crate::services::orders::AddressView,
        crate::entities::order::OrderStatus,
    )),
    tags(
        (name = "Phone cases", description = "Case configuration CRUD"),
        (name = "Catalog", description = "Reference data"),
        (name = "Orders", description = "Checkout, webhook, and order queries"),
        (name = "Uploads", description = "Upload-collaborator callback")
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
