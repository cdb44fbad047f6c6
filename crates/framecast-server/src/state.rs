//! Shared application state.

use std::sync::Arc;

use anyhow::{Context, Result};

use framecast_core::Config;
use framecast_notify::PushClient;
use framecast_transcode::Transcoder;

use crate::jobs::{DeliveryContext, DeliveryQueue};

pub struct AppState {
    pub config: Config,
    pub jobs: DeliveryQueue,
}

impl AppState {
    /// Wire up the transcoder, push client, and delivery queue from config.
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let transcoder = Transcoder::new(
            config.ffmpeg_path.clone(),
            config.videos_dir.clone(),
            &config.server_url,
        );
        let notifier = PushClient::new(config.push_gateway_url.clone(), config.notify_timeout())
            .context("failed to build push client")?;

        let ctx = Arc::new(DeliveryContext {
            transcoder,
            notifier,
        });
        let jobs = DeliveryQueue::new(
            ctx,
            config.delivery_queue_size,
            config.max_concurrent_deliveries,
        );

        Ok(Arc::new(Self { config, jobs }))
    }
}
