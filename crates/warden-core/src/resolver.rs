//! Subject resolution contract.
//!
//! # Purpose
//! Defines how the embedding application tells Warden who is making a
//! request. Warden never inspects credentials itself; it only consumes the
//! resolved subject identifier.
use async_trait::async_trait;
use axum::http::request::Parts;

/// Extracts the requesting subject from a request.
///
/// Returning the empty string means "no authenticated subject"; the guard
/// then short-circuits to the unauthenticated outcome without consulting the
/// decision engine. Resolvers must be safe to call from any number of
/// in-flight requests.
#[async_trait]
pub trait SubjectResolver: Send + Sync {
    async fn subject(&self, parts: &Parts) -> String;
}

/// Plain functions and closures over request parts are resolvers, so header
/// or extension lookups stay one-liners.
#[async_trait]
impl<F> SubjectResolver for F
where
    F: Fn(&Parts) -> String + Send + Sync,
{
    async fn subject(&self, parts: &Parts) -> String {
        self(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_header(name: &'static str, value: &'static str) -> Parts {
        let (parts, ()) = Request::builder()
            .uri("/blog")
            .header(name, value)
            .body(())
            .expect("request")
            .into_parts();
        parts
    }

    fn header_subject(parts: &Parts) -> String {
        parts
            .headers
            .get("x-subject")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn function_resolver_reads_request_parts() {
        let parts = parts_with_header("x-subject", "alice");
        let resolver: &dyn SubjectResolver = &(header_subject as fn(&Parts) -> String);
        assert_eq!(resolver.subject(&parts).await, "alice");
    }

    #[tokio::test]
    async fn missing_header_resolves_to_empty_subject() {
        let parts = parts_with_header("x-other", "alice");
        assert_eq!(header_subject(&parts), "");
    }
}
