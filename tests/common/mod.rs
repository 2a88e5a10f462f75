//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use response_resolver::http::{Request, RequestDescriptor, ResponseEnvelope, ResponseError, Transport};
use response_resolver::decode::ResponseValue;
use response_resolver::resolver::{Scheduler, Task};

/// Transport replaying scripted envelopes, one per attempt.
///
/// Once the script runs out the last envelope is repeated.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<ResponseEnvelope>>,
    last: Mutex<Option<ResponseEnvelope>>,
    sent: Mutex<u32>,
}

impl MockTransport {
    pub fn new(script: impl IntoIterator<Item = ResponseEnvelope>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            ..Default::default()
        }
    }

    pub fn repeating(envelope: ResponseEnvelope) -> Self {
        Self::new([envelope])
    }

    pub fn attempts(&self) -> u32 {
        *self.sent.lock().unwrap()
    }
}

impl Transport for MockTransport {
    async fn send(&self, _descriptor: &RequestDescriptor) -> ResponseEnvelope {
        *self.sent.lock().unwrap() += 1;
        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(envelope) = next {
            *last = Some(envelope);
        }
        last.clone().unwrap_or_default()
    }
}

/// Scheduler that records every requested delay.
///
/// Tasks run inline unless `hold` is set, in which case they wait for
/// `run_pending`.
#[derive(Default)]
pub struct RecordingScheduler {
    delays: Mutex<Vec<Duration>>,
    pending: Mutex<Vec<Task>>,
    hold: bool,
}

impl RecordingScheduler {
    pub fn holding() -> Self {
        Self {
            hold: true,
            ..Default::default()
        }
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }

    pub fn run_pending(&self) {
        let tasks: Vec<Task> = self.pending.lock().unwrap().drain(..).collect();
        for task in tasks {
            task();
        }
    }
}

impl Scheduler for RecordingScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        self.delays.lock().unwrap().push(delay);
        if self.hold {
            self.pending.lock().unwrap().push(task);
        } else {
            task();
        }
    }
}

/// Every callback invocation, in order.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<String>>,
    errors: Mutex<Vec<ResponseError>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<ResponseError> {
        self.errors.lock().unwrap().clone()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }
}

/// Request with every callback wired to a fresh recorder.
pub fn recorded<T>(descriptor: RequestDescriptor) -> (Request<T>, Arc<Recorder>)
where
    T: ResponseValue + std::fmt::Debug,
{
    let recorder = Arc::new(Recorder::default());
    let (r1, r2, r3, r4) = (recorder.clone(), recorder.clone(), recorder.clone(), recorder.clone());
    let request = Request::new(descriptor)
        .on_success(move |value: T| r1.push(format!("success {:?}", value)))
        .on_success_extended(move |response| r2.push(format!("extended {}", response.status)))
        .on_complete(move || r3.push("complete"))
        .on_error(move |error| {
            r4.push(format!("error {}", error.status));
            r4.errors.lock().unwrap().push(error);
        });
    (request, recorder)
}

/// Start a programmable HTTP/1.1 backend on an ephemeral port.
///
/// The handler returns `(status, body, delay)`; the response is written
/// after `delay`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String, Duration)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        let (status, body, delay) = f().await;
                        tokio::time::sleep(delay).await;
                        let reason = match status {
                            200 => "OK",
                            204 => "No Content",
                            401 => "Unauthorized",
                            404 => "Not Found",
                            500 => "Internal Server Error",
                            503 => "Service Unavailable",
                            _ => "Unknown",
                        };

                        let response = format!(
                            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
