

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use futures::executor::block_on;
use std::rc::Rc;

use promised_require::eventloop::EventLoop;
use promised_require::require::adapters::{HostRuntimeAdapter, RequireHookAdapter};
use promised_require::require::dispatcher::LoaderDispatcher;
use promised_require::require::error::RequireError;
use promised_require::require::rewrite_import_specifier;
use promised_require::require::values::ModuleValue;

struct BenchHook;

impl RequireHookAdapter for BenchHook {
    fn require_sync(&self, module: &str) -> Result<ModuleValue, RequireError> {
        Ok(ModuleValue::new_str(module))
    }
}

struct BenchHost;

impl HostRuntimeAdapter for BenchHost {
    fn require_hook(&self) -> Option<Rc<dyn RequireHookAdapter>> {
        Some(Rc::new(BenchHook))
    }
    fn current_filename(&self) -> Option<String> {
        Some("/srv/bench/main.js".to_string())
    }
}

fn test_eventloop_exe(){

    let event_loop = EventLoop::new();
    for x in 0..5000 {
        let y = x;
        event_loop.exe(move || {
            black_box(y);
        });
    }

}

fn test_sync_require(){

    let dispatcher = LoaderDispatcher::new(BenchHost);

    for _x in 0..5000 {

        let map = block_on(dispatcher.require(&["a", "b", "c"])).expect("require failed");
        assert_eq!(map.len(), 3);

    }

}

fn test_rewrite(){

    for _x in 0..5000 {
        black_box(rewrite_import_specifier(black_box("some_module")));
        black_box(rewrite_import_specifier(black_box("./already/a/path.js")));
    }

}


pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("eventLoop.exe", |b| b.iter(|| test_eventloop_exe()));
    c.bench_function("dispatcher.require", |b| b.iter(|| test_sync_require()));
    c.bench_function("rewrite_import_specifier", |b| b.iter(|| test_rewrite()));

}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
