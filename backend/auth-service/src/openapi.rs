//! OpenAPI documentation for the CampusHub Auth Service
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CampusHub Auth Service API",
        version = "1.0.0",
        description = "Account authentication and session-token lifecycle. Handles OTP-gated signup, credential sign-in with JWT access plus rotating refresh tokens, single-use password reset, and role-gated admin routes.",
        contact(
            name = "CampusHub Team",
            email = "team@campushub.app"
        ),
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8084", description = "Development server"),
        (url = "https://auth-api.campushub.app", description = "Production server"),
    ),
    paths(
        handlers::auth::signup,
        handlers::auth::send_otp,
        handlers::auth::verify_otp,
        handlers::auth::signin,
        handlers::auth::refresh_token,
        handlers::auth::signout,
        handlers::auth::current_user,
        handlers::auth::forgot_password,
        handlers::auth::reset_password,
        handlers::admin::analytics,
    ),
    components(schemas(
        models::SignupRequest,
        models::SendOtpRequest,
        models::VerifyOtpRequest,
        models::SigninRequest,
        models::RefreshTokenRequest,
        models::ForgotPasswordRequest,
        models::ResetPasswordRequest,
        models::SignupResponse,
        models::MessageResponse,
        models::OtpSentResponse,
        models::SigninResponse,
        models::RefreshResponse,
        models::CurrentUserResponse,
        models::AccountStats,
    )),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "auth", description = "Signup, verification, sign-in, token lifecycle, password reset"),
        (name = "admin", description = "Admin-gated analytics"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            )
        }
    }
}

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/v1/openapi.json"
    }
}
