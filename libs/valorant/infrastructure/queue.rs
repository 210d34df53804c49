//! Request queue and rate limiter
//!
//! The provider allows a fixed number of requests per minute. Every HTTP
//! call takes a slot from the shared `RateLimiter`; analysis requests are
//! served by a small pool of workers reading from a bounded channel, each
//! request answered through its own oneshot.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Length of the rate-limit window
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueueError {
    #[error("Request queue is closed")]
    Closed,

    #[error("Worker dropped the request before answering")]
    Dropped,
}

pub type Result<T> = std::result::Result<T, QueueError>;

/// Snapshot of the rate limiter and queue backlog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub requests_made: usize,
    pub requests_remaining: usize,
    /// When the oldest request in the window expires
    pub reset_time: DateTime<Utc>,
    pub is_throttled: bool,
}

/// Sliding-window limiter: at most `max_requests` per window
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize) -> Self {
        Self::with_window(max_requests, RATE_LIMIT_WINDOW)
    }

    pub fn with_window(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window,
            timestamps: Mutex::new(VecDeque::with_capacity(max_requests)),
        }
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Take a slot, waiting until one frees up
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut timestamps = self.timestamps.lock();
                let now = Instant::now();
                self.prune(&mut timestamps, now);

                if timestamps.len() < self.max_requests {
                    timestamps.push_back(now);
                    return;
                }
                match timestamps.front() {
                    Some(oldest) => (*oldest + self.window).saturating_duration_since(now),
                    None => Duration::ZERO,
                }
            };

            debug!("Rate limit reached, waiting {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }

    pub fn status(&self) -> RateLimitStatus {
        let mut timestamps = self.timestamps.lock();
        let now = Instant::now();
        self.prune(&mut timestamps, now);

        let until_reset = timestamps
            .front()
            .map(|oldest| (*oldest + self.window).saturating_duration_since(now))
            .unwrap_or(self.window);
        let reset_time = Utc::now()
            + chrono::Duration::from_std(until_reset).unwrap_or_else(|_| chrono::Duration::zero());

        let requests_made = timestamps.len();
        RateLimitStatus {
            requests_made,
            requests_remaining: self.max_requests.saturating_sub(requests_made),
            reset_time,
            is_throttled: requests_made >= self.max_requests,
        }
    }

    fn prune(&self, timestamps: &mut VecDeque<Instant>, now: Instant) {
        while let Some(oldest) = timestamps.front() {
            if now.duration_since(*oldest) >= self.window {
                timestamps.pop_front();
            } else {
                break;
            }
        }
    }
}

struct Job<Req, Res> {
    request: Req,
    reply: oneshot::Sender<Res>,
}

/// Bounded work queue served by a pool of async workers
pub struct RequestQueue<Req, Res> {
    sender: Mutex<Option<mpsc::Sender<Job<Req, Res>>>>,
    receiver: Arc<tokio::sync::Mutex<mpsc::Receiver<Job<Req, Res>>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    limiter: Arc<RateLimiter>,
    batch_size: usize,
}

impl<Req, Res> RequestQueue<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    /// `batch_size` only tunes when the queue reports itself throttled
    pub fn new(capacity: usize, limiter: Arc<RateLimiter>, batch_size: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            sender: Mutex::new(Some(sender)),
            receiver: Arc::new(tokio::sync::Mutex::new(receiver)),
            workers: Mutex::new(Vec::new()),
            limiter,
            batch_size,
        }
    }

    /// Spawn `count` workers running `handler` for each request
    pub fn start_workers<F, Fut>(&self, count: usize, handler: F)
    where
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Res> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let mut workers = self.workers.lock();

        for id in 0..count {
            let receiver = Arc::clone(&self.receiver);
            let handler = Arc::clone(&handler);

            workers.push(tokio::spawn(async move {
                debug!(worker = id, "Queue worker started");
                loop {
                    let job = {
                        let mut receiver = receiver.lock().await;
                        receiver.recv().await
                    };
                    let Some(job) = job else {
                        break;
                    };

                    let result = handler(job.request).await;
                    if job.reply.send(result).is_err() {
                        debug!(worker = id, "Requester went away before the reply");
                    }
                }
                debug!(worker = id, "Queue worker stopped");
            }));
        }

        info!("Started {} queue workers", count);
    }

    /// Queue a request; the receiver yields its result
    pub async fn enqueue(&self, request: Req) -> Result<oneshot::Receiver<Res>> {
        let sender = self.sender.lock().clone().ok_or(QueueError::Closed)?;
        let (reply, receiver) = oneshot::channel();

        sender
            .send(Job { request, reply })
            .await
            .map_err(|_| QueueError::Closed)?;
        Ok(receiver)
    }

    /// Queue a request and wait for its result
    pub async fn submit(&self, request: Req) -> Result<Res> {
        let receiver = self.enqueue(request).await?;
        receiver.await.map_err(|_| QueueError::Dropped)
    }

    /// Requests waiting for a worker
    pub fn queue_size(&self) -> usize {
        self.sender
            .lock()
            .as_ref()
            .map(|sender| sender.max_capacity() - sender.capacity())
            .unwrap_or(0)
    }

    pub fn status(&self) -> RateLimitStatus {
        let mut status = self.limiter.status();
        status.is_throttled |= self.queue_size() > self.batch_size * 2;
        status
    }

    pub fn is_closed(&self) -> bool {
        self.sender.lock().is_none()
    }

    /// Close the queue, let workers drain it, and wait for them
    pub async fn stop(&self) {
        self.sender.lock().take();
        let workers: Vec<JoinHandle<()>> = self.workers.lock().drain(..).collect();

        for worker in workers {
            if let Err(e) = worker.await {
                warn!("Queue worker ended abnormally: {}", e);
            }
        }
        info!("Request queue stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limiter_counts_requests() {
        let limiter = RateLimiter::new(2);
        limiter.acquire().await;
        limiter.acquire().await;

        let status = limiter.status();
        assert_eq!(status.requests_made, 2);
        assert_eq!(status.requests_remaining, 0);
        assert!(status.is_throttled);
        assert!(status.reset_time > Utc::now());
    }

    #[tokio::test]
    async fn test_limiter_waits_for_window() {
        let limiter = RateLimiter::with_window(1, Duration::from_millis(50));
        limiter.acquire().await;

        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_queue_round_trip() {
        let queue: RequestQueue<u32, u32> = RequestQueue::new(8, Arc::new(RateLimiter::new(10)), 2);
        queue.start_workers(2, |n| async move { n * 2 });

        let first = queue.enqueue(3).await.unwrap();
        let second = queue.submit(5).await.unwrap();
        assert_eq!(first.await.unwrap(), 6);
        assert_eq!(second, 10);

        queue.stop().await;
        assert!(queue.is_closed());
        assert_eq!(queue.enqueue(1).await.unwrap_err(), QueueError::Closed);
    }

    #[tokio::test]
    async fn test_stop_drains_pending_requests() {
        let queue: RequestQueue<u32, u32> = RequestQueue::new(8, Arc::new(RateLimiter::new(10)), 2);
        let pending: Vec<_> = {
            let mut receivers = Vec::new();
            for n in 0..4 {
                receivers.push(queue.enqueue(n).await.unwrap());
            }
            receivers
        };
        assert_eq!(queue.queue_size(), 4);

        queue.start_workers(1, |n| async move { n + 100 });
        queue.stop().await;

        for (n, receiver) in pending.into_iter().enumerate() {
            assert_eq!(receiver.await.unwrap(), n as u32 + 100);
        }
    }
}
