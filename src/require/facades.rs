use crate::eventloop::EventLoop;
use crate::require::adapters::HostRuntimeAdapter;
use crate::require::dispatcher::LoaderDispatcher;
use crate::require::error::RequireError;
use crate::require::values::ModuleMap;
use crate::require::LoaderKind;
use crate::resolvable_future::ResolvableFuture;
use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

/// object safe view on a LoaderDispatcher so the worker thread can keep one
/// without the facade knowing the host type
trait DispatcherHandle {
    fn require_boxed(
        self: Rc<Self>,
        modules: Vec<String>,
    ) -> LocalBoxFuture<'static, Result<ModuleMap, RequireError>>;
    fn loader_kind(&self) -> LoaderKind;
    fn reset(&self);
}

impl<H: HostRuntimeAdapter + 'static> DispatcherHandle for LoaderDispatcher<H> {
    fn require_boxed(
        self: Rc<Self>,
        modules: Vec<String>,
    ) -> LocalBoxFuture<'static, Result<ModuleMap, RequireError>> {
        Box::pin(async move {
            let refs: Vec<&str> = modules.iter().map(String::as_str).collect();
            self.require(&refs).await
        })
    }

    fn loader_kind(&self) -> LoaderKind {
        LoaderDispatcher::loader_kind(self)
    }

    fn reset(&self) {
        LoaderDispatcher::reset(self)
    }
}

thread_local! {
    static DISPATCHER: RefCell<Option<Rc<dyn DispatcherHandle>>> = RefCell::new(None);
}

/// Send front for a [LoaderDispatcher]
///
/// the dispatcher and its host adapter are built on the worker thread of an
/// [EventLoop] and stay there, require hands back a future which may be awaited
/// from any thread, the result is delivered at a later turn of the worker's queue
///
/// # Example
/// ```rust
/// use promised_require::require::adapters::{HostRuntimeAdapter, RequireHookAdapter};
/// use promised_require::require::error::RequireError;
/// use promised_require::require::facades::RequireFacade;
/// use promised_require::require::values::ModuleValue;
/// use futures::executor::block_on;
/// use std::rc::Rc;
///
/// struct PackageHost;
/// impl RequireHookAdapter for PackageHost {
///     fn require_sync(&self, module: &str) -> Result<ModuleValue, RequireError> {
///         Ok(ModuleValue::new_string(format!("exports of {}", module)))
///     }
/// }
/// impl HostRuntimeAdapter for PackageHost {
///     fn require_hook(&self) -> Option<Rc<dyn RequireHookAdapter>> {
///         Some(Rc::new(PackageHost))
///     }
///     fn current_filename(&self) -> Option<String> {
///         Some("/srv/app/main.js".to_string())
///     }
/// }
///
/// let facade = RequireFacade::new(|| PackageHost);
/// let map = block_on(facade.require(&["fs", "path"])).expect("require failed");
/// let keys: Vec<&String> = map.keys().collect();
/// assert_eq!(keys, vec!["fs", "path"]);
/// ```
pub struct RequireFacade {
    event_loop: EventLoop,
}

impl RequireFacade {
    /// init a facade, the host adapter is constructed on the worker thread by the factory
    pub fn new<H, F>(host_factory: F) -> Self
    where
        H: HostRuntimeAdapter + 'static,
        F: FnOnce() -> H + Send + 'static,
    {
        let event_loop = EventLoop::new();
        event_loop.exe(move || {
            let dispatcher: Rc<dyn DispatcherHandle> =
                Rc::new(LoaderDispatcher::new(host_factory()));
            DISPATCHER.with(|rc| {
                rc.borrow_mut().replace(dispatcher);
            });
        });
        Self { event_loop }
    }

    /// load the given modules on the worker thread
    /// resolves to a mapping from identifier to loaded value in request order, or
    /// rejects as a whole
    pub fn require(
        &self,
        modules: &[&str],
    ) -> impl Future<Output = Result<ModuleMap, RequireError>> {
        let modules: Vec<String> = modules.iter().map(|m| (*m).to_string()).collect();
        let fut = ResolvableFuture::new();
        let resolver = fut.get_resolver();
        self.event_loop.add_void(move || {
            let dispatcher_opt = DISPATCHER.with(|rc| rc.borrow().clone());
            match dispatcher_opt {
                Some(dispatcher) => {
                    EventLoop::add_local_future_void(async move {
                        let res = dispatcher.require_boxed(modules).await;
                        if resolver.resolve(res).is_err() {
                            // the caller abandoned the future, nothing to deliver to
                            log::trace!("RequireFacade.require result dropped");
                        }
                    });
                }
                None => {
                    log::error!("RequireFacade.require -> no dispatcher on this worker");
                    let _ = resolver.resolve(Err(RequireError::batch_failed_msg(
                        "worker has no dispatcher",
                    )));
                }
            }
        });
        fut
    }

    /// the loader kind the dispatcher has settled on, Undetermined before the first probe
    pub fn loader_kind(&self) -> LoaderKind {
        self.event_loop.exe(|| {
            DISPATCHER.with(|rc| {
                rc.borrow()
                    .as_ref()
                    .map_or(LoaderKind::Undetermined, |d| d.loader_kind())
            })
        })
    }

    /// forget the memoized route so the next require call probes the host again
    /// meant for test isolation
    pub fn reset(&self) {
        self.event_loop.exe(|| {
            DISPATCHER.with(|rc| {
                if let Some(dispatcher) = rc.borrow().as_ref() {
                    dispatcher.reset();
                }
            })
        })
    }
}
