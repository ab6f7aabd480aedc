// Palisade - session-bound CSRF protection
//
// Facade over the workspace crates: the request/middleware primitives, the
// session capability and the CSRF gate.

// Re-export core functionality
pub use palisade_core::*;

// Re-export optional crates
#[cfg(feature = "session")]
pub use palisade_session;

#[cfg(feature = "csrf")]
pub use palisade_csrf;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Error, Extensions, HandlerFn, HttpRequest, HttpResponse, Middleware, MiddlewareChain,
        Next, handler,
    };

    #[cfg(feature = "csrf")]
    pub use palisade_csrf::prelude::*;

    #[cfg(feature = "session")]
    pub use palisade_session::prelude::*;
}
