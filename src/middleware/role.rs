use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::database::Store;
use crate::models::Role;
use crate::services::{require_role, Claims};
use crate::utils::AppError;

/// Lets a request through only if the authenticated caller's stored role is
/// `role`. Must be wrapped inside [`super::AuthMiddleware`] so the claims are
/// already attached:
///
/// ```ignore
/// web::resource("/{id}/status")
///     .wrap(RequireRole::admin())
///     .wrap(AuthMiddleware)
/// ```
#[derive(Clone, Copy)]
pub struct RequireRole {
    role: Role,
}

impl RequireRole {
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    pub fn admin() -> Self {
        Self::new(Role::Admin)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleService {
            service: Rc::new(service),
            role: self.role,
        }))
    }
}

pub struct RequireRoleService<S> {
    service: Rc<S>,
    role: Role,
}

impl<S, B> Service<ServiceRequest> for RequireRoleService<S>
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
        let service = Rc::clone(&self.service);
        let required = self.role;

        Box::pin(async move {
            let claims = req
                .extensions()
                .get::<Claims>()
                .cloned()
                .ok_or_else(|| AppError::Unauthorized("request is not authenticated".into()))?;

            let store = req
                .app_data::<web::Data<dyn Store>>()
                .cloned()
                .ok_or_else(|| AppError::DatabaseError("store is not configured".into()))?;

            if let Err(e) = require_role(store.get_ref(), &claims.email, required).await {
                log::warn!("⛔ {} {} denied for {}", req.method(), req.path(), claims.email);
                return Err(e.into());
            }

            service.call(req).await
        })
    }
}
