//! OpenAPI documentation for the web API

use utoipa::OpenApi;

/// OpenAPI document covering the service's HTTP surface
#[derive(OpenApi)]
#[openapi(
    info(
        title = "tunebundle API",
        description = "Resolve music-catalog links and download fetched audio, \
                       packaged per session as a single file or a zip archive.",
        license(name = "MIT OR Apache-2.0")
    ),
    paths(
        crate::api::routes::get_info,
        crate::api::routes::download,
        crate::api::routes::health_check,
    ),
    components(schemas(
        crate::api::routes::InfoRequest,
        crate::api::routes::InfoResponse,
        crate::api::routes::DownloadForm,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "catalog", description = "Link metadata resolution"),
        (name = "download", description = "Fetch-and-package download flow"),
        (name = "system", description = "Health and documentation"),
    )
)]
pub struct ApiDoc;
