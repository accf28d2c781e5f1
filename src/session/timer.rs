use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

/// Recurring one-second driver of the countdown.
///
/// Ticks arrive on the receiver returned by [`CountdownTimer::start`]. The
/// task is aborted when the timer is dropped, so no tick can be delivered
/// after the owner has let go of it.
pub struct CountdownTimer {
    task: JoinHandle<()>,
}

impl CountdownTimer {
    pub fn start(period: Duration) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            // First tick one full period after start.
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tx.send(()).is_err() {
                    break;
                }
            }
        });
        (Self { task }, rx)
    }

    /// Stops the countdown; equivalent to dropping the timer.
    pub fn cancel(self) {
        drop(self);
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let (timer, mut ticks) = CountdownTimer::start(Duration::from_secs(1));
        let started = Instant::now();
        for _ in 0..3 {
            ticks.recv().await.unwrap();
        }
        assert_eq!(started.elapsed(), Duration::from_secs(3));
        assert!(timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_delivery() {
        let (timer, mut ticks) = CountdownTimer::start(Duration::from_secs(1));
        ticks.recv().await.unwrap();
        timer.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(ticks.recv().await.is_none());
    }
}
