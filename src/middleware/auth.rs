/// Bearer token authentication middleware
///
/// Resolves `Authorization: Bearer <token>` into a `CurrentUser` request
/// extension by looking up the token digest. Requests without a Bearer
/// header pass through anonymously and the handlers decide; a presented
/// token that resolves to nothing is rejected with 401 outright.
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;
use std::rc::Rc;

use crate::db::token_repo;
use crate::error::AppError;
use crate::models::User;
use crate::services::auth::digest_token;

/// The authenticated identity attached to a request, along with the digest
/// of the token it presented (logout revokes exactly that row).
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token_hash: String,
}

/// Optional identity for endpoints that serve anonymous viewers too.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

/// Extract the token from an Authorization header value, if the scheme is
/// Bearer.
fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
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
            // Copy the header out before touching extensions; header access
            // borrows the request immutably.
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(bearer_token)
                .map(|t| t.to_string());

            if let Some(token) = token {
                let pool = req
                    .app_data::<web::Data<PgPool>>()
                    .ok_or_else(|| {
                        Error::from(AppError::Internal("Database pool missing".to_string()))
                    })?
                    .clone();

                let token_hash = digest_token(&token);
                let user = token_repo::get_user_by_token_hash(&pool, &token_hash)
                    .await
                    .map_err(AppError::from)?;

                match user {
                    Some(user) => {
                        req.extensions_mut().insert(CurrentUser { user, token_hash });
                    }
                    None => {
                        return Err(AppError::Unauthorized("Invalid token.".to_string()).into());
                    }
                }
            }

            service.call(req).await
        })
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<CurrentUser>().cloned() {
            Some(current) => ready(Ok(current)),
            None => ready(Err(AppError::Unauthorized(
                "Authentication credentials were not provided.".to_string(),
            )
            .into())),
        }
    }
}

impl FromRequest for MaybeUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(MaybeUser(req.extensions().get::<CurrentUser>().cloned())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Token abc123"), None);
        assert_eq!(bearer_token("abc123"), None);
    }
}
