//! Helpers shared by the scheduler's unit tests

use super::sink::RenderSink;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Sink forwarding every applied line to a channel
pub(crate) struct ChannelSink(pub mpsc::UnboundedSender<String>);

impl RenderSink for ChannelSink {
    fn apply(&self, line: &str) -> Result<()> {
        let _ = self.0.send(line.to_string());
        Ok(())
    }
}

/// A channel sink together with the receiving end of its lines
pub(crate) fn channel_sink() -> (Arc<dyn RenderSink>, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(ChannelSink(tx)), rx)
}
