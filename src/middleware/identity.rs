use axum::{body::Body, extract::Request, middleware::Next, response::Response};

use crate::models::IdentityToken;

/// HTTP header carrying the caller's opaque identity token
pub const IDENTITY_HEADER: &str = "x-identity-token";

/// Extension type holding the caller identity, if one was presented
///
/// Handlers decide what an absent identity means; for recommendations it
/// means an empty result rather than a 401.
#[derive(Clone, Debug, Default)]
pub struct CallerIdentity(Option<IdentityToken>);

impl CallerIdentity {
    pub fn token(&self) -> Option<&IdentityToken> {
        self.0.as_ref()
    }
}

/// Middleware that extracts the caller's identity token into request extensions
///
/// A missing, empty, or non-UTF-8 header leaves the identity unset.
pub async fn identity_middleware(mut request: Request, next: Next) -> Response {
    let identity = request
        .headers()
        .get(IDENTITY_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|t| !t.is_empty())
        .map(|t| CallerIdentity(Some(IdentityToken::new(t))))
        .unwrap_or_default();

    request.extensions_mut().insert(identity);

    next.run(request).await
}

/// Helper to create the per-request tracing span
///
/// The identity token itself is never recorded.
pub fn make_http_span(request: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
    )
}
