use tracing::{debug, error, warn};

use super::audio_url;
use super::backend::{AudioBackend, PlaybackError, PlaybackHandle};

/// Where the single playback slot is. Verses are identified by their global
/// number, which is also what the audio URL is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Loading(u32),
    Playing(u32),
    Stopping,
}

/// Owns at most one playback handle. A new verse is only started after the
/// previous handle has been stopped, and the handle is released on drop.
pub struct Player<B: AudioBackend> {
    backend: B,
    handle: Option<Box<dyn PlaybackHandle>>,
    state: PlaybackState,
}

impl<B: AudioBackend> Player<B> {
    /// An idle player that starts verses through `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            handle: None,
            state: PlaybackState::Idle,
        }
    }

    /// Current state of the playback slot.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// `true` while `verse` is loading or playing.
    pub fn is_playing(&self, verse: u32) -> bool {
        matches!(self.state, PlaybackState::Playing(current) | PlaybackState::Loading(current) if current == verse)
    }

    /// Start `verse`, replacing whatever was playing. On failure the player is
    /// back to `Idle` and the error is handed to the caller for display.
    pub fn play(&mut self, verse: u32) -> Result<(), PlaybackError> {
        if let Err(err) = self.release() {
            warn!(error = %err, "previous playback did not stop cleanly");
        }

        self.transition(PlaybackState::Loading(verse));
        match self.backend.start(&audio_url(verse)) {
            Ok(handle) => {
                self.handle = Some(handle);
                self.transition(PlaybackState::Playing(verse));
                Ok(())
            }
            Err(err) => {
                error!(verse, error = %err, "failed to start playback");
                self.transition(PlaybackState::Idle);
                Err(err)
            }
        }
    }

    /// Stop `verse` when it is the one playing, otherwise play it. Returns
    /// whether the verse is playing afterwards.
    pub fn toggle(&mut self, verse: u32) -> Result<bool, PlaybackError> {
        if self.is_playing(verse) {
            self.stop()?;
            Ok(false)
        } else {
            self.play(verse)?;
            Ok(true)
        }
    }

    pub fn stop(&mut self) -> Result<(), PlaybackError> {
        let result = self.release();
        if let Err(err) = &result {
            error!(error = %err, "failed to stop playback");
        }
        result
    }

    /// Poll the active handle. Returns the verse that just played to the end,
    /// if any.
    pub fn tick(&mut self) -> Result<Option<u32>, PlaybackError> {
        let PlaybackState::Playing(verse) = self.state else {
            return Ok(None);
        };
        let Some(handle) = self.handle.as_mut() else {
            self.transition(PlaybackState::Idle);
            return Ok(None);
        };

        match handle.poll_finished() {
            Ok(false) => Ok(None),
            Ok(true) => {
                self.handle = None;
                self.transition(PlaybackState::Idle);
                Ok(Some(verse))
            }
            Err(err) => {
                error!(verse, error = %err, "playback failed");
                self.handle = None;
                self.transition(PlaybackState::Idle);
                Err(err)
            }
        }
    }

    /// Stop and drop the handle, ending in `Idle` whatever happens.
    fn release(&mut self) -> Result<(), PlaybackError> {
        let Some(mut handle) = self.handle.take() else {
            self.transition(PlaybackState::Idle);
            return Ok(());
        };
        self.transition(PlaybackState::Stopping);
        let result = handle.stop();
        drop(handle);
        self.transition(PlaybackState::Idle);
        result
    }

    fn transition(&mut self, next: PlaybackState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "playback state");
            self.state = next;
        }
    }
}

impl<B: AudioBackend> Drop for Player<B> {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!(error = %err, "failed to stop playback on teardown");
        }
    }
}
