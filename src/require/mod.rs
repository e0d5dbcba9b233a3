//! One require() for hosts that disagree on how modules load
//!
//! The [LoaderDispatcher](dispatcher::LoaderDispatcher) probes which module loading
//! primitive the host provides, settles on it once and dispatches every batch to it,
//! the [RequireFacade](facades::RequireFacade) is the Send front which runs a dispatcher
//! on an [EventLoop](crate::eventloop::EventLoop) worker thread
//!
//! The adapter traits in [adapters] are used on the worker thread and are not Send,
//! they should never leave that thread, [values](values::ModuleValue) are Send and
//! carry loaded modules out

pub mod adapters;
pub mod dispatcher;
pub mod error;
pub mod facades;
pub mod values;

use std::borrow::Cow;

/// which host module loading mechanism is in use for the remainder of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderKind {
    /// native per module dynamic import
    NativeImport,
    /// define/require style batch loader with positional callbacks
    CallbackLoader,
    /// synchronous per module package loader
    SyncLoader,
    /// no probe has succeeded yet, probing happens again on the next call
    Undetermined,
}

/// rewrite a bare module identifier to a relative path with a .js extension
/// so native import can resolve it outside bundled contexts, "foo" becomes "./foo.js"
/// identifiers which already look like a path pass through unchanged
/// this is best effort string manipulation and never fails
pub fn rewrite_import_specifier(module: &str) -> Cow<str> {
    match module.chars().next() {
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => {
            Cow::Owned(format!("./{}.js", module))
        }
        _ => Cow::Borrowed(module),
    }
}
