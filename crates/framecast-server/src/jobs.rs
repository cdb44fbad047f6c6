//! Background delivery queue.
//!
//! Each accepted request becomes one job: transcode the named object, then
//! notify the destination device if a token was supplied. The HTTP response
//! has already gone out by the time a job runs, so failures here are logged
//! and dropped; there is no channel back to the original caller.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, Semaphore};

use framecast_core::MediaType;
use framecast_notify::{MediaNotificationOptions, PushClient};
use framecast_transcode::Transcoder;

#[derive(Debug, Clone)]
pub struct DeliveryJob {
    pub object_name: String,
    pub device_token: Option<String>,
}

/// Services a job needs; shared by all workers.
pub struct DeliveryContext {
    pub transcoder: Transcoder,
    pub notifier: PushClient,
}

/// Bounded queue with a worker pool. Jobs are independent: two requests
/// naming the same object run two transcodes, by design.
pub struct DeliveryQueue {
    tx: mpsc::Sender<DeliveryJob>,
}

impl DeliveryQueue {
    pub fn new(ctx: Arc<DeliveryContext>, queue_size: usize, max_concurrent: usize) -> Self {
        let queue_size = queue_size.max(1);
        let (tx, rx) = mpsc::channel(queue_size);

        tokio::spawn(async move {
            Self::worker_pool(rx, ctx, max_concurrent.max(1)).await;
        });

        tracing::info!(
            queue_size = queue_size,
            max_concurrent = max_concurrent,
            "Delivery queue initialized with bounded channel"
        );

        Self { tx }
    }

    /// Enqueue without waiting. A full queue is an error so the handler can
    /// surface a synchronous failure instead of blocking the request.
    #[tracing::instrument(skip(self), fields(object = %job.object_name))]
    pub fn submit(&self, job: DeliveryJob) -> Result<()> {
        tracing::info!(has_token = job.device_token.is_some(), "Enqueuing delivery job");
        self.tx.try_send(job).map_err(|e| match &e {
            mpsc::error::TrySendError::Full(_) => {
                tracing::warn!("Delivery queue is full, rejecting job");
                anyhow::anyhow!("Delivery queue is full, please try again later")
            }
            _ => anyhow::anyhow!("Failed to submit delivery job: {}", e),
        })?;
        Ok(())
    }

    async fn worker_pool(
        mut rx: mpsc::Receiver<DeliveryJob>,
        ctx: Arc<DeliveryContext>,
        max_concurrent: usize,
    ) {
        let semaphore = Arc::new(Semaphore::new(max_concurrent));

        while let Some(job) = rx.recv().await {
            let permit = semaphore.clone().acquire_owned().await;
            let ctx = ctx.clone();

            tokio::spawn(async move {
                let _permit = permit;
                if let Err(e) = Self::process_job(job, ctx).await {
                    tracing::error!(error = %e, "Delivery job failed");
                }
            });
        }
    }

    #[tracing::instrument(skip(ctx), fields(object = %job.object_name, job.status = tracing::field::Empty))]
    async fn process_job(job: DeliveryJob, ctx: Arc<DeliveryContext>) -> Result<()> {
        let start = std::time::Instant::now();
        tracing::info!("Starting delivery job");

        let result = ctx
            .transcoder
            .process_media(&job.object_name)
            .await
            .with_context(|| format!("transcoding {} failed", job.object_name))?;

        match &job.device_token {
            Some(token) => {
                let accepted = ctx
                    .notifier
                    .send_media_notification(
                        token,
                        &result.public_url,
                        MediaType::Video,
                        MediaNotificationOptions::default(),
                    )
                    .await
                    .context("push notification dispatch failed")?;
                if !accepted {
                    tracing::warn!(token = %token, "Push gateway declined the notification");
                }
            }
            None => {
                tracing::info!("No device token supplied, skipping notification");
            }
        }

        tracing::Span::current().record("job.status", "success");
        tracing::info!(
            public_url = %result.public_url,
            converted = result.needs_conversion,
            duration_ms = start.elapsed().as_millis(),
            "Delivery job completed"
        );
        Ok(())
    }
}

impl Clone for DeliveryQueue {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}
