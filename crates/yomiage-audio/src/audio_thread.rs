//! Dedicated audio thread: isolates the `!Send` output stream from the async runtime.
//!
//! `rodio::OutputStream` is `!Send` on some platforms. Rather than using
//! `unsafe impl Send/Sync`, the player is constructed on a single OS thread
//! and every operation is routed to it as an [`AudioCommand`].
//!
//! [`AudioThreadHandle`] is the `Send + Sync` proxy the rest of the program
//! holds.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use yomiage_core::AudioError;

/// How often the audio thread refreshes the shared "playing" flag while idle
/// between commands.
pub const STATUS_REFRESH_INTERVAL: Duration = Duration::from_millis(10);

/// Operations the audio thread performs on its player.
///
/// Implemented by [`DevicePlayer`](crate::DevicePlayer). The player never
/// leaves the audio thread, so it does not need to be `Send`.
pub trait Player {
    /// Start playing `samples`, replacing anything still queued.
    fn submit(&mut self, samples: Vec<i16>) -> Result<(), AudioError>;

    fn is_playing(&self) -> bool;

    /// Stop and drop the current clip. No-op when idle.
    fn release(&mut self);
}

// ── Commands ───────────────────────────────────────────────────────

/// A command sent to the audio thread.
enum AudioCommand {
    /// Start playing decoded samples.
    Submit {
        samples: Vec<i16>,
        reply: mpsc::Sender<Result<(), AudioError>>,
    },

    /// Stop the current clip.
    Release { reply: mpsc::Sender<()> },

    /// Shut down the audio thread, releasing all resources.
    Shutdown,
}

// ── Handle (Send + Sync proxy) ─────────────────────────────────────

/// `Send + Sync` handle to the dedicated audio thread.
///
/// `submit` and `release` wait for the audio thread to answer; they run once
/// per clip. `is_playing` is polled in a loop, so it only reads a flag the
/// audio thread keeps current and never waits on the thread.
pub struct AudioThreadHandle {
    cmd_tx: mpsc::Sender<AudioCommand>,
    playing: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

/// Clears the playing flag when the audio thread exits, panics included.
struct IdleOnExit(Arc<AtomicBool>);

impl Drop for IdleOnExit {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AudioThreadHandle {
    /// Spawn the audio thread and build the player on it with `open`.
    ///
    /// Errors from `open` are propagated back through a one-shot init
    /// channel.
    pub fn spawn<P, F>(open: F) -> Result<Self, AudioError>
    where
        P: Player,
        F: FnOnce() -> Result<P, AudioError> + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel::<AudioCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), AudioError>>();
        let playing = Arc::new(AtomicBool::new(false));
        let thread_playing = Arc::clone(&playing);

        let thread = thread::Builder::new()
            .name("yomiage-audio".into())
            .spawn(move || Self::run(open, &cmd_rx, &init_tx, &thread_playing))
            .map_err(|e| AudioError::DeviceUnavailable(format!("failed to spawn audio thread: {e}")))?;

        init_rx.recv().map_err(|_| AudioError::AudioThreadDied)??;

        Ok(Self {
            cmd_tx,
            playing,
            thread: Some(thread),
        })
    }

    /// Start playing `samples`.
    pub fn submit(&self, samples: Vec<i16>) -> Result<(), AudioError> {
        self.send_and_recv(|reply| AudioCommand::Submit { samples, reply })
    }

    /// Whether audio is playing, as of the last refresh. A dead thread
    /// reports idle.
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    /// Stop the current clip. Returns once the thread has stopped it.
    pub fn release(&self) {
        let _ = self.query(|reply| AudioCommand::Release { reply });
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Send a command that expects a `Result<T, AudioError>` reply. Channel
    /// failures map to [`AudioError::AudioThreadDied`].
    fn send_and_recv<T>(
        &self,
        build: impl FnOnce(mpsc::Sender<Result<T, AudioError>>) -> AudioCommand,
    ) -> Result<T, AudioError> {
        self.query(build).ok_or(AudioError::AudioThreadDied)?
    }

    /// Like `send_and_recv` for bare-value replies. `None` if the thread is
    /// dead, in which case the playing flag is cleared right away.
    fn query<T>(&self, build: impl FnOnce(mpsc::Sender<T>) -> AudioCommand) -> Option<T> {
        let (tx, rx) = mpsc::channel();
        let reply = self
            .cmd_tx
            .send(build(tx))
            .ok()
            .and_then(|()| rx.recv().ok());
        if reply.is_none() {
            self.playing.store(false, Ordering::Release);
        }
        reply
    }

    // ── Audio thread event loop ────────────────────────────────────

    /// Body of the audio thread. Owns the player for its whole lifetime.
    ///
    /// The playing flag is refreshed after every command and at least every
    /// [`STATUS_REFRESH_INTERVAL`], before any reply is sent.
    fn run<P, F>(
        open: F,
        cmd_rx: &mpsc::Receiver<AudioCommand>,
        init_tx: &mpsc::Sender<Result<(), AudioError>>,
        playing: &Arc<AtomicBool>,
    ) where
        P: Player,
        F: FnOnce() -> Result<P, AudioError>,
    {
        let _idle = IdleOnExit(Arc::clone(playing));
        let refresh = |player: &P| playing.store(player.is_playing(), Ordering::Release);

        let mut player = match open() {
            Ok(p) => p,
            Err(e) => {
                let _ = init_tx.send(Err(e));
                return;
            }
        };

        if init_tx.send(Ok(())).is_err() {
            return;
        }

        loop {
            match cmd_rx.recv_timeout(STATUS_REFRESH_INTERVAL) {
                Ok(AudioCommand::Submit { samples, reply }) => {
                    let result = player.submit(samples);
                    refresh(&player);
                    let _ = reply.send(result);
                }

                Ok(AudioCommand::Release { reply }) => {
                    player.release();
                    refresh(&player);
                    let _ = reply.send(());
                }

                Ok(AudioCommand::Shutdown) => {
                    player.release();
                    tracing::debug!("Audio thread shutting down");
                    break;
                }

                Err(RecvTimeoutError::Timeout) => refresh(&player),

                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }
}

impl Drop for AudioThreadHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(AudioCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
