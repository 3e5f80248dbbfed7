//! Audible alerts and the repeating bell

use std::{io::Write, sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::{interval_at, sleep, Instant}};
use tracing::{debug, warn};

/// Gap between the two chimes of a double alert
pub const DOUBLE_CHIME_GAP: Duration = Duration::from_millis(600);
/// Period of the single chime repeated while the timer keeps running
pub const BELL_REPEAT_PERIOD: Duration = Duration::from_secs(5);

/// Something that can make an audible cue
pub trait AlertPlayer: Send + Sync {
    /// Play one chime
    fn play_chime(&self);
}

/// Rings the terminal bell on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl AlertPlayer for TerminalBell {
    fn play_chime(&self) {
        let mut stdout = std::io::stdout();
        if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
            warn!("Failed to ring terminal bell: {}", e);
        }
    }
}

/// Player that stays silent
#[derive(Debug, Default, Clone, Copy)]
pub struct Muted;

impl AlertPlayer for Muted {
    fn play_chime(&self) {}
}

/// Owns the background task playing the bell: a double chime right away,
/// then one chime every [`BELL_REPEAT_PERIOD`] until cancelled
pub struct BellRepeater {
    player: Arc<dyn AlertPlayer>,
    task: Option<JoinHandle<()>>,
}

impl BellRepeater {
    pub fn new(player: Arc<dyn AlertPlayer>) -> Self {
        Self { player, task: None }
    }

    /// Ring the bell, replacing any repeat already in progress
    pub fn ring(&mut self) {
        self.cancel();
        debug!("Ringing bell");

        let player = Arc::clone(&self.player);
        // The repeat schedule is anchored on the first chime
        let first_repeat = Instant::now() + BELL_REPEAT_PERIOD;
        self.task = Some(tokio::spawn(async move {
            player.play_chime();
            sleep(DOUBLE_CHIME_GAP).await;
            player.play_chime();

            let mut repeat = interval_at(first_repeat, BELL_REPEAT_PERIOD);
            loop {
                repeat.tick().await;
                player.play_chime();
            }
        }));
    }

    /// Stop the bell. Safe to call when nothing is ringing.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("Cancelling bell repeat");
            task.abort();
        }
    }

    pub fn is_ringing(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for BellRepeater {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingPlayer {
        chimes: AtomicUsize,
    }

    impl AlertPlayer for CountingPlayer {
        fn play_chime(&self) {
            self.chimes.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn settle(duration: Duration) {
        tokio::time::sleep(duration).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn rings_twice_then_repeats_every_five_seconds() {
        let player = Arc::new(CountingPlayer::default());
        let mut bell = BellRepeater::new(player.clone());

        bell.ring();
        settle(Duration::from_millis(100)).await;
        assert_eq!(player.chimes.load(Ordering::SeqCst), 1);

        settle(Duration::from_millis(600)).await;
        assert_eq!(player.chimes.load(Ordering::SeqCst), 2);

        settle(Duration::from_millis(4_400)).await;
        assert_eq!(player.chimes.load(Ordering::SeqCst), 3);

        settle(Duration::from_secs(5)).await;
        assert_eq!(player.chimes.load(Ordering::SeqCst), 4);
        assert!(bell.is_ringing());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_the_repeat() {
        let player = Arc::new(CountingPlayer::default());
        let mut bell = BellRepeater::new(player.clone());

        bell.ring();
        settle(Duration::from_secs(1)).await;
        assert_eq!(player.chimes.load(Ordering::SeqCst), 2);

        bell.cancel();
        assert!(!bell.is_ringing());
        settle(Duration::from_secs(20)).await;
        assert_eq!(player.chimes.load(Ordering::SeqCst), 2);

        // Cancelling again is harmless
        bell.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_second_chime_silences_it() {
        let player = Arc::new(CountingPlayer::default());
        let mut bell = BellRepeater::new(player.clone());

        bell.ring();
        settle(Duration::from_millis(100)).await;
        bell.cancel();
        settle(Duration::from_secs(10)).await;
        assert_eq!(player.chimes.load(Ordering::SeqCst), 1);
    }
}
