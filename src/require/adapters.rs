use crate::require::error::RequireError;
use crate::require::values::ModuleValue;
use futures::future::LocalBoxFuture;
use std::rc::Rc;

/// success callback handed to a callback flavor require hook
/// the values must match the requested identifier list positionally
pub type RequireResolve = Box<dyn FnOnce(Vec<ModuleValue>)>;
/// failure callback handed to a callback flavor require hook
pub type RequireReject = Box<dyn FnOnce(RequireError)>;

/// the host's native per module import primitive
pub trait DynamicImportAdapter {
    /// import a single module by path, completion is delivered at a later turn of the queue
    fn import(&self, path: &str) -> LocalBoxFuture<'static, Result<ModuleValue, RequireError>>;
}

/// the host's require primitive, whichever flavor the host speaks
/// a host implements the flavor it has, the dispatcher only consults the flavor selected
/// by the current filename marker
pub trait RequireHookAdapter {
    /// synchronous package loader flavor, loads one module fully in-line
    fn require_sync(&self, module: &str) -> Result<ModuleValue, RequireError> {
        Err(RequireError::load_failed_msg(
            module,
            "host require hook has no synchronous flavor",
        ))
    }

    /// callback flavor, loads the whole batch and reports through resolve or reject
    fn require_callback(&self, modules: &[String], resolve: RequireResolve, reject: RequireReject) {
        let _ = (modules, resolve);
        reject(RequireError::batch_failed_msg(
            "host require hook has no callback flavor",
        ));
    }
}

/// probe surface of a host environment
///
/// adapters are not Send, they live on the worker thread of the EventLoop,
/// use the RequireFacade to talk to them from other threads
pub trait HostRuntimeAdapter {
    /// obtain the host's dynamic import capability
    /// Err means the capability is absent or could not be constructed, the dispatcher
    /// absorbs that and falls back to the require hook
    fn dynamic_import(&self) -> Result<Rc<dyn DynamicImportAdapter>, RequireError> {
        Err(RequireError::import_setup(
            "host has no dynamic import primitive",
        ))
    }

    /// the host's require primitive, if it has one
    fn require_hook(&self) -> Option<Rc<dyn RequireHookAdapter>> {
        None
    }

    /// name of the file the current script runs from
    /// present on synchronous package loader hosts only, its presence is what
    /// distinguishes the synchronous flavor from the callback flavor
    fn current_filename(&self) -> Option<String> {
        None
    }

    /// protocol the host page was loaded over, e.g. "https:" or "file:"
    /// None for hosts without a page origin, which prefer dynamic import
    fn page_protocol(&self) -> Option<String> {
        None
    }

    /// host flag forcing the legacy require hook over native dynamic import
    fn dynamic_import_disabled(&self) -> bool {
        false
    }
}
