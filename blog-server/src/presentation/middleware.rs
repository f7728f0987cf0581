use crate::domain::AuthenticatedUser;
use crate::infrastructure::jwt::JwtService;
use actix_web::dev::Payload;
use actix_web::http::header::Header;
use actix_web::{error, web, Error, FromRequest, HttpRequest};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use std::future::{ready, Ready};
use std::sync::Arc;

/// Identity from `Authorization: Bearer <jwt>`.
///
/// Extraction fails with 401 when the header is missing or the token does not
/// verify; handlers that also serve anonymous callers take `Option<AuthenticatedUser>`.
impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let jwt_service = match req.app_data::<web::Data<Arc<JwtService>>>() {
        Some(service) => service.get_ref().clone(),
        None => {
            tracing::error!("JWT service not configured");
            return Err(error::ErrorInternalServerError("JWT service not configured"));
        }
    };

    let authorization = Authorization::<Bearer>::parse(req)
        .map_err(|_| error::ErrorUnauthorized("Missing bearer token"))?;

    jwt_service
        .verify_token(authorization.as_ref().token())
        .map_err(|e| error::ErrorUnauthorized(e.to_string()))
}
