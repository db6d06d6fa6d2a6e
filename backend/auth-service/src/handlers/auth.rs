use actix_web::{web, HttpResponse};
use actix_middleware::AuthUser;

use crate::error::Result;
use crate::models::{
    CurrentUserResponse, ForgotPasswordRequest, MessageResponse, OtpSentResponse,
    RefreshResponse, RefreshTokenRequest, ResetPasswordRequest, SendOtpRequest, SigninRequest,
    SigninResponse, SignupRequest, SignupResponse, VerifyOtpRequest,
};
use crate::AppState;

/// Register a new account and send a verification code.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created, verification pending", body = SignupResponse),
        (status = 400, description = "Invalid email or weak password"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn signup(
    state: web::Data<AppState>,
    payload: web::Json<SignupRequest>,
) -> Result<HttpResponse> {
    let (account, otp_sent) = state.auth.signup(&payload.email, &payload.password).await?;

    let message = if otp_sent {
        "Account created; check your email for the verification code".to_string()
    } else {
        "Account created; code delivery failed, request a new one".to_string()
    };

    Ok(HttpResponse::Created().json(SignupResponse {
        account_id: account.id,
        email: account.email,
        verified: false,
        otp_sent,
        message,
    }))
}

/// Issue a fresh verification code for an unverified account.
#[utoipa::path(
    post,
    path = "/auth/send-otp",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "Code sent", body = OtpSentResponse),
        (status = 400, description = "Invalid email or account already verified"),
        (status = 404, description = "Account not found")
    ),
    tag = "auth"
)]
pub async fn send_otp(
    state: web::Data<AppState>,
    payload: web::Json<SendOtpRequest>,
) -> Result<HttpResponse> {
    let expires_in = state.auth.send_otp(&payload.email).await?;
    Ok(HttpResponse::Ok().json(OtpSentResponse {
        message: "Verification code sent".to_string(),
        expires_in,
    }))
}

/// Redeem a verification code, marking the account verified.
#[utoipa::path(
    post,
    path = "/auth/verify-otp",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Account verified", body = MessageResponse),
        (status = 400, description = "Code missing, expired, or incorrect"),
        (status = 404, description = "Account not found")
    ),
    tag = "auth"
)]
pub async fn verify_otp(
    state: web::Data<AppState>,
    payload: web::Json<VerifyOtpRequest>,
) -> Result<HttpResponse> {
    state.auth.verify_otp(&payload.email, &payload.code).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Account verified".to_string(),
    }))
}

/// Authenticate credentials and receive an access/refresh token pair.
#[utoipa::path(
    post,
    path = "/auth/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in", body = SigninResponse),
        (status = 401, description = "Invalid email or password"),
        (status = 403, description = "Account not verified")
    ),
    tag = "auth"
)]
pub async fn signin(
    state: web::Data<AppState>,
    payload: web::Json<SigninRequest>,
) -> Result<HttpResponse> {
    let pair = state.auth.sign_in(&payload.email, &payload.password).await?;
    Ok(HttpResponse::Ok().json(SigninResponse {
        account_id: pair.account_id,
        email: pair.email,
        role: pair.role.to_string(),
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        expires_in: pair.expires_in,
    }))
}

/// Rotate a refresh token for a new access/refresh pair.
#[utoipa::path(
    post,
    path = "/auth/refresh-token",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Tokens rotated", body = RefreshResponse),
        (status = 401, description = "Token unknown, expired, or already used")
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    state: web::Data<AppState>,
    payload: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse> {
    let pair = state.auth.refresh(&payload.refresh_token).await?;
    Ok(HttpResponse::Ok().json(RefreshResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        expires_in: pair.expires_in,
    }))
}

/// Revoke the caller's refresh session.
#[utoipa::path(
    post,
    path = "/auth/signout",
    responses(
        (status = 200, description = "Signed out", body = MessageResponse),
        (status = 401, description = "Missing or invalid access token")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn signout(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse> {
    state.auth.sign_out(user.id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Signed out".to_string(),
    }))
}

/// The account behind the presented access token.
#[utoipa::path(
    get,
    path = "/auth/current-user",
    responses(
        (status = 200, description = "Current account", body = CurrentUserResponse),
        (status = 401, description = "Missing or invalid access token")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn current_user(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse> {
    let account = state.auth.current_user(user.id).await?;
    Ok(HttpResponse::Ok().json(CurrentUserResponse::from(&account)))
}

/// Begin a password reset. Always reports success.
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset initiated if the address is registered", body = MessageResponse),
        (status = 400, description = "Invalid email shape")
    ),
    tag = "auth"
)]
pub async fn forgot_password(
    state: web::Data<AppState>,
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse> {
    state.auth.request_reset(&payload.email).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "If the address is registered, a reset email has been sent".to_string(),
    }))
}

/// Redeem a reset token and install a new password.
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated; existing session revoked", body = MessageResponse),
        (status = 400, description = "New password too weak"),
        (status = 401, description = "Token unknown, expired, or already used")
    ),
    tag = "auth"
)]
pub async fn reset_password(
    state: web::Data<AppState>,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse> {
    state
        .auth
        .redeem_reset(&payload.token, &payload.new_password)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Password updated; sign in with your new password".to_string(),
    }))
}
