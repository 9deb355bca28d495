use crate::event::AppEvent;
use std::time::Duration;
use tokio::sync::mpsc;

pub const MIN_REFRESH_SECS: u64 = 30;

pub async fn start_refresh_poller(tx: mpsc::UnboundedSender<AppEvent>, interval_secs: u64) {
    let secs = interval_secs.max(MIN_REFRESH_SECS);
    let mut interval = tokio::time::interval(Duration::from_secs(secs));
    interval.tick().await;

    loop {
        interval.tick().await;
        if tx.send(AppEvent::Refresh).is_err() {
            break;
        }
    }
}
