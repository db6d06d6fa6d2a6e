use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::error::GateError;
use crate::jwt_auth::AuthUser;

/// Role gate for administrative routes.
///
/// Must be composed after `JwtAuthMiddleware`: it reads the `AuthUser`
/// attached by token validation and rejects non-admin roles with 403.
/// A request that somehow reaches this gate without an attached identity
/// is rejected with 401.
pub struct RequireAdmin;

impl<S, B> Transform<S, ServiceRequest> for RequireAdmin
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAdminService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAdminService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireAdminService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireAdminService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let user = req
                .extensions()
                .get::<AuthUser>()
                .copied()
                .ok_or(GateError::Unauthenticated("Not authenticated"))?;

            if !user.role.is_admin() {
                tracing::warn!(account_id = %user.id, "Admin route rejected for non-admin role");
                return Err(GateError::Forbidden("Admin role required").into());
            }

            service.call(req).await
        })
    }
}
