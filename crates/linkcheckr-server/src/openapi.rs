use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "linkcheckr API",
        version = "0.1.0",
        description = "Renders a page, extracts its links, and reports which ones are broken."
    ),
    paths(crate::routes::check_links, crate::routes::health),
    components(schemas(
        crate::dto::CheckLinksRequest,
        crate::dto::CheckLinksResponse,
        crate::dto::LinkResponse,
        crate::dto::LinkStatus,
        crate::dto::SummaryResponse,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "links", description = "Link checking"),
        (name = "system", description = "Health and system status"),
    )
)]
pub struct ApiDoc;
