use starlink_core::ErrorBody;
use starlink_models::{
    ChangePasswordRequest, Credentials, LoginResponse, Permission, RefreshTokenRequest,
    RefreshTokenResponse, RegisterRequest, Role, UserProfile,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::model::MessageResponse;
use crate::router::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::router::health_check,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::get_me,
        crate::modules::auth::controller::logout_user,
        crate::modules::auth::controller::change_password,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
    ),
    components(
        schemas(
            Credentials,
            LoginResponse,
            RefreshTokenRequest,
            RefreshTokenResponse,
            RegisterRequest,
            ChangePasswordRequest,
            UserProfile,
            Role,
            Permission,
            MessageResponse,
            HealthResponse,
            ErrorBody,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness check"),
        (name = "Authentication", description = "Login, token refresh and session endpoints"),
        (name = "Users", description = "User lookup endpoints")
    ),
    info(
        title = "Starlink Platform API",
        version = "0.1.0",
        description = "Authentication and session API for the Starlink Platform. Successful responses use a `{status, message?, data?}` envelope; 401s carry a machine-readable `code`.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
