//! Scheduled success delivery.
//!
//! # Responsibilities
//! - Hand a zero-argument completion to a scheduler with a delay
//! - Invoke success sinks in a fixed order
//!
//! # Sink Order
//! 1. context success observer (host, path)
//! 2. `on_success(value)`
//! 3. `on_success_extended(headers, status, raw body, value)`
//! 4. `on_complete()`

use reqwest::header::HeaderMap;
use std::sync::Arc;
use std::time::Duration;

use crate::http::request::{Callbacks, ExtendedCallback, SignalCallback, ValueCallback};
use crate::http::response::ExtendedResponse;
use crate::http::status::StatusCode;
use crate::lifecycle::SuccessObserver;

/// Deferred work handed to a scheduler.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs a task once, no earlier than `delay` from now.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task);
}

impl<S: Scheduler + ?Sized> Scheduler for Arc<S> {
    fn schedule(&self, delay: Duration, task: Task) {
        (**self).schedule(delay, task)
    }
}

/// Runs every task immediately, ignoring the delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineScheduler;

impl Scheduler for InlineScheduler {
    fn schedule(&self, _delay: Duration, task: Task) {
        task();
    }
}

/// Scheduler backed by a Tokio runtime.
///
/// A zero delay runs the task inline; otherwise it runs on a spawned task
/// after `tokio::time::sleep`.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
}

impl TokioScheduler {
    /// Scheduler on the runtime of the calling context, if any.
    pub fn current() -> Option<Self> {
        tokio::runtime::Handle::try_current()
            .ok()
            .map(Self::from_handle)
    }

    pub fn from_handle(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        if delay.is_zero() {
            task();
            return;
        }
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}

/// One success sink.
pub enum SuccessSink<T> {
    Observer(SuccessObserver),
    Value(ValueCallback<T>),
    Extended(ExtendedCallback<T>),
    Completed(SignalCallback),
}

impl<T> Callbacks<T> {
    /// Configured success sinks in delivery order.
    pub fn success_sinks(&self, observer: Option<SuccessObserver>) -> Vec<SuccessSink<T>> {
        [
            observer.map(SuccessSink::Observer),
            self.on_success.clone().map(SuccessSink::Value),
            self.on_success_extended.clone().map(SuccessSink::Extended),
            self.on_complete.clone().map(SuccessSink::Completed),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// A decoded success waiting for its delivery time.
pub struct SuccessDelivery<T> {
    pub host: String,
    pub path: String,
    pub headers: HeaderMap,
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub value: T,
    pub sinks: Vec<SuccessSink<T>>,
}

impl<T: Clone> SuccessDelivery<T> {
    pub fn deliver(self) {
        let SuccessDelivery {
            host,
            path,
            headers,
            status,
            body,
            value,
            sinks,
        } = self;
        let mut extended = Some((headers, body));

        for sink in sinks {
            match sink {
                SuccessSink::Observer(observer) => observer(&host, &path),
                SuccessSink::Value(callback) => callback(value.clone()),
                SuccessSink::Extended(callback) => {
                    if let Some((headers, body)) = extended.take() {
                        callback(ExtendedResponse {
                            headers,
                            status,
                            body,
                            value: value.clone(),
                        });
                    }
                }
                SuccessSink::Completed(callback) => callback(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_sinks_fire_in_order() {
        let log = Arc::new(Mutex::new(Vec::<String>::new()));

        let (l1, l2, l3, l4) = (log.clone(), log.clone(), log.clone(), log.clone());
        let callbacks = Callbacks::<i64> {
            on_success: Some(Arc::new(move |v: i64| l2.lock().unwrap().push(format!("success {}", v)))),
            on_success_extended: Some(Arc::new(move |r: ExtendedResponse<i64>| {
                l3.lock().unwrap().push(format!("extended {} {}", r.status, r.value))
            })),
            on_complete: Some(Arc::new(move || l4.lock().unwrap().push("complete".into()))),
            ..Default::default()
        };
        let observer: SuccessObserver = Arc::new(move |host: &str, path: &str| {
            l1.lock().unwrap().push(format!("observer {}{}", host, path))
        });

        let delivery = SuccessDelivery {
            host: "example.com".into(),
            path: "/answer".into(),
            headers: HeaderMap::new(),
            status: StatusCode::Ok,
            body: b"42".to_vec(),
            value: 42i64,
            sinks: callbacks.success_sinks(Some(observer)),
        };
        delivery.deliver();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "observer example.com/answer",
                "success 42",
                "extended ok (200) 42",
                "complete",
            ]
        );
    }

    #[test]
    fn test_missing_sinks_are_skipped() {
        let callbacks = Callbacks::<i64>::default();
        assert!(callbacks.success_sinks(None).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_waits() {
        let scheduler = TokioScheduler::current().unwrap();
        let (tx, mut rx) = tokio::sync::oneshot::channel();
        let start = tokio::time::Instant::now();

        scheduler.schedule(Duration::from_millis(1500), Box::new(move || {
            let _ = tx.send(());
        }));
        assert!(rx.try_recv().is_err());

        (&mut rx).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[test]
    fn test_zero_delay_runs_inline() {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
        let scheduler = TokioScheduler::from_handle(runtime.handle().clone());
        let fired = Arc::new(Mutex::new(false));
        let f = fired.clone();
        scheduler.schedule(Duration::ZERO, Box::new(move || *f.lock().unwrap() = true));
        assert!(*fired.lock().unwrap());
    }
}
