//! Host-side primitives for Palisade.
//!
//! Palisade's protection layers are written against a small request/response
//! model rather than a specific server. This crate holds that model:
//!
//! - [`HttpRequest`] / [`HttpResponse`] with case-insensitive header lookup,
//!   query parameters and URL-encoded form access
//! - [`Extensions`], the per-request context store middleware uses to hand
//!   values to downstream handlers
//! - [`Middleware`], [`Next`] and [`MiddlewareChain`] for composing layers
//! - [`Error`], the error type handlers and middleware return
//!
//! Adapters for a concrete server translate its request type into an
//! [`HttpRequest`] and write the resulting [`HttpResponse`] back out.

pub mod error;
pub mod extensions;
pub mod form;
pub mod http;
pub mod middleware;

pub use error::*;
pub use extensions::Extensions;
pub use form::*;
pub use http::*;
pub use middleware::*;
