//! promised_require provides a require() implementation for hosts with a native
//! dynamic import primitive as well as define/require and CommonJS style hosts,
//! in a Promise based approach
//!
//! the [LoaderDispatcher](require::dispatcher::LoaderDispatcher) probes which
//! primitive the host provides and keeps using it, the
//! [RequireFacade](require::facades::RequireFacade) runs a dispatcher on the worker
//! thread of an [EventLoop](eventloop::EventLoop) so callers on other threads can
//! await batches through it
//!
//! host adapters are not Send and should never leave the worker thread, loaded
//! [ModuleValue](require::values::ModuleValue)s are Send and carry the results out

pub mod eventloop;
pub mod require;
pub mod resolvable_future;
