use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderValue, AUTHORIZATION},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::services::{Claims, JwtService};
use crate::utils::AppError;

/// Rejects requests without a valid bearer token and attaches the decoded
/// [`Claims`] to the request for handlers (`web::ReqData<Claims>`) and gates.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let claims = match authenticate(&req) {
            Ok(claims) => claims,
            Err(e) => {
                log::warn!("🔒 {} {} rejected: {}", req.method(), req.path(), e);
                let err: Error = e.into();
                return Box::pin(async move { Err(err) });
            }
        };

        log::debug!("🔓 Authenticated {}", claims.email);
        req.extensions_mut().insert(claims);

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res)
        })
    }
}

fn authenticate(req: &ServiceRequest) -> Result<Claims, AppError> {
    let jwt = req
        .app_data::<web::Data<JwtService>>()
        .ok_or_else(|| AppError::Unauthorized("token verification is not configured".into()))?;

    let token = bearer_token(req.headers().get(AUTHORIZATION))?;
    jwt.verify(token)
}

/// Extracts `<token>` from an `Authorization: Bearer <token>` header.
pub fn bearer_token(header: Option<&HeaderValue>) -> Result<&str, AppError> {
    let value = header
        .ok_or_else(|| AppError::Unauthorized("Missing authorization token".into()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid token format".into()))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AppError::Unauthorized("Invalid token format".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bearer_token() {
        let header = HeaderValue::from_static("Bearer abc.def.ghi");
        assert_eq!(bearer_token(Some(&header)).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn rejects_missing_or_foreign_schemes() {
        assert!(matches!(bearer_token(None), Err(AppError::Unauthorized(_))));

        let basic = HeaderValue::from_static("Basic dXNlcjpwYXNz");
        assert!(matches!(bearer_token(Some(&basic)), Err(AppError::Unauthorized(_))));

        let empty = HeaderValue::from_static("Bearer ");
        assert!(matches!(bearer_token(Some(&empty)), Err(AppError::Unauthorized(_))));
    }
}
