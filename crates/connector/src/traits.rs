//! Transport seam between the signed-request client and the network
//!
//! The client never opens sockets itself; it hands a fully built
//! [`HttpRequest`] to an [`HttpTransport`]. Production code uses
//! [`crate::http::MonoioHttpsClient`], tests swap in a mock.

use crate::errors::Result;
use crate::http::{HttpRequest, HttpResponse};
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// Synchronous request/response HTTP exchange
///
/// One call is one round trip. Implementations must not retry.
#[cfg_attr(test, automock)]
#[async_trait(?Send)]
pub trait HttpTransport {
    /// Execute a request and return the response with any status code
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}
