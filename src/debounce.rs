use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::trace;

type Operation<A, R> = Arc<dyn Fn(A) -> BoxFuture<'static, R> + Send + Sync>;

/// Trailing-edge debounce around an async operation.
///
/// Every [`Debounced::call`] reschedules the operation `delay` into the
/// future and cancels the call before it. Only the last call of a burst runs,
/// with its own arguments. A call whose delay has already elapsed is never
/// interrupted.
pub struct Debounced<A, R> {
    delay: Duration,
    op: Operation<A, R>,
    pending: Option<CancellationToken>,
}

impl<A, R> Debounced<A, R>
where
    A: Send + 'static,
    R: Send + 'static,
{
    pub fn new<F, Fut>(delay: Duration, op: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        Self {
            delay,
            op: Arc::new(move |args| op(args).boxed()),
            pending: None,
        }
    }

    pub fn call(&mut self, args: A) -> Deferred<R> {
        self.cancel();

        let token = CancellationToken::new();
        self.pending = Some(token.clone());

        let (tx, rx) = oneshot::channel();
        let op = self.op.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    trace!("debounced call superseded");
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }
            let out = op(args).await;
            // The caller may have stopped waiting; nothing to do then.
            let _ = tx.send(out);
        });

        Deferred { rx }
    }

    /// Drops the pending call, if it has not fired yet.
    pub fn cancel(&mut self) {
        if let Some(prev) = self.pending.take() {
            prev.cancel();
        }
    }
}

impl<A, R> Drop for Debounced<A, R> {
    fn drop(&mut self) {
        if let Some(prev) = self.pending.take() {
            prev.cancel();
        }
    }
}

/// Result of one debounced call.
///
/// Resolves to `Some` once the operation completed, or `None` if a later call
/// superseded this one before it fired.
pub struct Deferred<R> {
    rx: oneshot::Receiver<R>,
}

impl<R> Future for Deferred<R> {
    type Output = Option<R>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(Result::ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recorder() -> (
        Arc<Mutex<Vec<String>>>,
        Debounced<String, usize>,
    ) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_op = seen.clone();
        let debounced = Debounced::new(Duration::from_millis(1000), move |q: String| {
            let seen = seen_op.clone();
            async move {
                let mut seen = seen.lock().unwrap();
                seen.push(q);
                seen.len()
            }
        });
        (seen, debounced)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_runs_once_with_last_args() {
        let (seen, mut debounced) = recorder();

        let first = debounced.call("r".to_string());
        tokio::time::sleep(Duration::from_millis(300)).await;
        let second = debounced.call("re".to_string());
        tokio::time::sleep(Duration::from_millis(300)).await;
        let last = debounced.call("rea".to_string());

        assert_eq!(first.await, None);
        assert_eq!(second.await, None);
        assert_eq!(last.await, Some(1));
        assert_eq!(*seen.lock().unwrap(), vec!["rea".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn fires_only_after_quiet_period() {
        let (seen, mut debounced) = recorder();
        let start = tokio::time::Instant::now();

        let _ = debounced.call("a".to_string());
        tokio::time::sleep(Duration::from_millis(900)).await;
        let deferred = debounced.call("ab".to_string());

        tokio::time::sleep(Duration::from_millis(950)).await;
        assert!(seen.lock().unwrap().is_empty());

        assert_eq!(deferred.await, Some(1));
        assert!(start.elapsed() >= Duration::from_millis(1900));
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_each_fire() {
        let (seen, mut debounced) = recorder();

        assert_eq!(debounced.call("one".to_string()).await, Some(1));
        assert_eq!(debounced.call("two".to_string()).await, Some(2));
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["one".to_string(), "two".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn running_call_is_not_interrupted() {
        let started = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicUsize::new(0));
        let (s, f) = (started.clone(), finished.clone());
        let mut debounced = Debounced::new(Duration::from_millis(100), move |_: ()| {
            let (s, f) = (s.clone(), f.clone());
            async move {
                s.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(500)).await;
                f.fetch_add(1, Ordering::SeqCst);
            }
        });

        let slow = debounced.call(());
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(started.load(Ordering::SeqCst), 1);

        // Rescheduling while the first operation is in flight leaves it alone.
        let next = debounced.call(());
        assert_eq!(slow.await, Some(()));
        assert_eq!(next.await, Some(()));
        assert_eq!(finished.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_call() {
        let (seen, mut debounced) = recorder();
        let deferred = debounced.call("gone".to_string());
        debounced.cancel();
        assert_eq!(deferred.await, None);
        assert!(seen.lock().unwrap().is_empty());
    }
}
