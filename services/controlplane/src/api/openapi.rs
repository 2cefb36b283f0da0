//! OpenAPI schema aggregation for the control-plane API.
use crate::api::types::{AccessGrant, ActorView, ErrorResponse, HealthStatus};
use crate::api::{access, system, users};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "mesh-controlplane",
        version = "v1",
        description = "Mesh control plane HTTP API"
    ),
    paths(system::system_health, users::get_user, access::access_grant),
    components(schemas(AccessGrant, ActorView, ErrorResponse, HealthStatus)),
    modifiers(&BearerAuth),
    tags(
        (name = "system", description = "Service health"),
        (name = "users", description = "Actor records"),
        (name = "authz", description = "Access decisions")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

pub(crate) async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}
