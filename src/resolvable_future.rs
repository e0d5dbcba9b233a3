use futures::task::{Context, Poll, Waker};
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};
use std::sync::Arc;

/// the resolver half of a [ResolvableFuture]
/// it is Send and may be moved into a host callback or another thread, the future half stays with the caller
pub struct ResolvableFutureResolver<R> {
    sender: SyncSender<R>,
    waker: Mutex<Option<Waker>>,
}

impl<R> ResolvableFutureResolver<R> {
    pub fn new(tx: SyncSender<R>) -> Self {
        Self {
            sender: tx,
            waker: Mutex::new(None),
        }
    }
    /// fulfill the future half
    /// fails when the future was already resolved or its owner dropped it
    pub fn resolve(&self, resolution: R) -> Result<(), TrySendError<R>> {
        log::trace!("ResolvableFutureResolver.resolve");
        self.sender.try_send(resolution)?;

        let waker_opt = &mut *self.waker.lock();
        if let Some(waker) = waker_opt.take() {
            waker.wake();
        }
        Ok(())
    }
}

/// a Future which is completed by calling resolve on its [ResolvableFutureResolver]
pub struct ResolvableFuture<R> {
    result: Receiver<R>,
    resolver: Arc<ResolvableFutureResolver<R>>,
}

impl<R> ResolvableFuture<R> {
    pub fn new() -> Self {
        let (tx, rx) = sync_channel(1);

        Self {
            result: rx,
            resolver: Arc::new(ResolvableFutureResolver::new(tx)),
        }
    }
    pub fn get_resolver(&self) -> Arc<ResolvableFutureResolver<R>> {
        self.resolver.clone()
    }
}

impl<R> Default for ResolvableFuture<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Future for ResolvableFuture<R> {
    type Output = R;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        log::trace!("ResolvableFuture::poll");
        match self.result.try_recv() {
            Ok(res) => {
                log::trace!("ResolvableFuture::poll -> Ready");
                Poll::Ready(res)
            }
            Err(_) => {
                let mtx = &self.resolver.waker;
                let waker_opt = &mut *mtx.lock();
                let _ = waker_opt.replace(cx.waker().clone());
                // the resolver may have fired between the failed recv and the waker registration
                match self.result.try_recv() {
                    Ok(res) => Poll::Ready(res),
                    Err(_) => {
                        log::trace!("ResolvableFuture::poll -> Pending");
                        Poll::Pending
                    }
                }
            }
        }
    }
}
