use crate::require::adapters::{DynamicImportAdapter, HostRuntimeAdapter, RequireHookAdapter};
use crate::require::error::RequireError;
use crate::require::values::{ModuleMap, ModuleValue};
use crate::require::{rewrite_import_specifier, LoaderKind};
use crate::resolvable_future::ResolvableFuture;
use futures::future::try_join_all;
use std::cell::RefCell;
use std::rc::Rc;

/// route settled by a successful probe, carries the memoized capability handle
#[derive(Clone)]
enum LoaderRoute {
    Import(Rc<dyn DynamicImportAdapter>),
    Callback(Rc<dyn RequireHookAdapter>),
    Sync(Rc<dyn RequireHookAdapter>),
}

impl LoaderRoute {
    fn kind(&self) -> LoaderKind {
        match self {
            LoaderRoute::Import(_) => LoaderKind::NativeImport,
            LoaderRoute::Callback(_) => LoaderKind::CallbackLoader,
            LoaderRoute::Sync(_) => LoaderKind::SyncLoader,
        }
    }
}

/// probes which module loading primitive the host provides and dispatches
/// require batches to it
///
/// the route is settled by the first successful probe and reused for the lifetime
/// of the dispatcher, a failed probe settles nothing so the next call probes again
///
/// not Send, a dispatcher lives on the worker thread together with its host adapter,
/// see [RequireFacade](crate::require::facades::RequireFacade) for the Send front
///
/// # Example
/// ```rust
/// use promised_require::require::adapters::{HostRuntimeAdapter, RequireHookAdapter};
/// use promised_require::require::dispatcher::LoaderDispatcher;
/// use promised_require::require::error::RequireError;
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
/// let dispatcher = LoaderDispatcher::new(PackageHost);
/// let map = block_on(dispatcher.require(&["fs", "path"])).expect("require failed");
/// let keys: Vec<&String> = map.keys().collect();
/// assert_eq!(keys, vec!["fs", "path"]);
/// ```
pub struct LoaderDispatcher<H: HostRuntimeAdapter> {
    host: H,
    route: RefCell<Option<LoaderRoute>>,
}

impl<H: HostRuntimeAdapter> LoaderDispatcher<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            route: RefCell::new(None),
        }
    }

    /// the memoized loader kind, Undetermined until a probe has succeeded
    pub fn loader_kind(&self) -> LoaderKind {
        self.route
            .borrow()
            .as_ref()
            .map_or(LoaderKind::Undetermined, LoaderRoute::kind)
    }

    /// forget the memoized route so the next require call probes the host again
    /// meant for test isolation
    pub fn reset(&self) {
        let _ = self.route.borrow_mut().take();
    }

    /// load the given modules through whichever loading primitive the host provides
    /// and map identifier to loaded value, keys in request order
    ///
    /// the whole batch fails as one, a rejection never leaves a partial mapping behind
    pub async fn require(&self, modules: &[&str]) -> Result<ModuleMap, RequireError> {
        if modules.is_empty() {
            return Ok(ModuleMap::new());
        }
        let modules: Vec<String> = modules.iter().map(|m| (*m).to_string()).collect();
        match self.resolve_route() {
            Some(LoaderRoute::Import(hook)) => self.import_all(hook, &modules).await,
            Some(LoaderRoute::Callback(hook)) => self.require_via_callback(hook, modules).await,
            Some(LoaderRoute::Sync(hook)) => self.require_in_line(hook, &modules),
            None => {
                log::debug!("LoaderDispatcher.require -> no implementation available");
                Err(RequireError::NoImplementationAvailable)
            }
        }
    }

    /// reuse the settled route or probe the host for one
    /// only a successful probe is memoized
    fn resolve_route(&self) -> Option<LoaderRoute> {
        let settled = self.route.borrow().clone();
        if settled.is_some() {
            return settled;
        }
        let probed = self.probe();
        if let Some(route) = &probed {
            log::debug!("LoaderDispatcher.probe -> {:?}", route.kind());
            self.route.borrow_mut().replace(route.clone());
        }
        probed
    }

    fn probe(&self) -> Option<LoaderRoute> {
        if self.native_import_preferred() {
            match self.host.dynamic_import() {
                Ok(hook) => return Some(LoaderRoute::Import(hook)),
                Err(setup_err) => {
                    log::trace!("LoaderDispatcher.probe import setup absorbed: {}", setup_err);
                }
            }
        }
        let hook = self.host.require_hook()?;
        let route = if self.host.current_filename().is_some() {
            LoaderRoute::Sync(hook)
        } else {
            LoaderRoute::Callback(hook)
        };
        Some(route)
    }

    fn native_import_preferred(&self) -> bool {
        if self.host.dynamic_import_disabled() {
            return false;
        }
        match self.host.page_protocol() {
            Some(protocol) => !protocol.eq_ignore_ascii_case("file:"),
            None => true,
        }
    }

    /// one import per identifier, driven concurrently, any failure fails the batch
    async fn import_all(
        &self,
        hook: Rc<dyn DynamicImportAdapter>,
        modules: &[String],
    ) -> Result<ModuleMap, RequireError> {
        let imports = modules.iter().map(|module| {
            let path = rewrite_import_specifier(module);
            log::trace!("LoaderDispatcher.import {} as {}", module, path);
            hook.import(path.as_ref())
        });
        let loaded = try_join_all(imports).await?;
        Ok(Self::zip_normalized(modules, loaded))
    }

    /// one call with the full identifier list, values arrive positionally
    async fn require_via_callback(
        &self,
        hook: Rc<dyn RequireHookAdapter>,
        modules: Vec<String>,
    ) -> Result<ModuleMap, RequireError> {
        let fut: ResolvableFuture<Result<Vec<ModuleValue>, RequireError>> = ResolvableFuture::new();
        let resolver = fut.get_resolver();
        let rejector = fut.get_resolver();
        hook.require_callback(
            &modules,
            Box::new(move |values| {
                if resolver.resolve(Ok(values)).is_err() {
                    log::trace!("LoaderDispatcher.require_via_callback resolution dropped");
                }
            }),
            Box::new(move |err| {
                if rejector.resolve(Err(err)).is_err() {
                    log::trace!("LoaderDispatcher.require_via_callback rejection dropped");
                }
            }),
        );
        let loaded = fut.await?;
        Ok(Self::zip_normalized(&modules, loaded))
    }

    /// one in-line call per identifier, in request order, the first error aborts the batch
    fn require_in_line(
        &self,
        hook: Rc<dyn RequireHookAdapter>,
        modules: &[String],
    ) -> Result<ModuleMap, RequireError> {
        let mut map = ModuleMap::new();
        for module in modules {
            let loaded = hook.require_sync(module)?;
            map.insert(module.clone(), loaded.unwrap_default_export());
        }
        Ok(map)
    }

    fn zip_normalized(modules: &[String], loaded: Vec<ModuleValue>) -> ModuleMap {
        let mut map = ModuleMap::new();
        for (module, value) in modules.iter().zip(loaded) {
            map.insert(module.clone(), value.unwrap_default_export());
        }
        map
    }
}
