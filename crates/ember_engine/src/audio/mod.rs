//! Audio interface boundary
//!
//! Device handling and resource decoding live behind the [`AudioBackend`]
//! trait; the engine core only produces [`PlaybackRequest`] values.
//! Delayed playback goes through the [`crate::scheduler::Scheduler`]
//! collaborator rather than blocking a frame.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::scheduler::{Scheduler, TaskId};

/// A request to play one sound
#[derive(Debug, Clone)]
pub struct PlaybackRequest {
    /// Identifier of the sound resource
    pub sound: String,

    /// Linear volume in [0, 1]
    pub volume: f32,

    /// Whether playback should loop until stopped
    pub looping: bool,
}

impl PlaybackRequest {
    /// Request one-shot playback at full volume
    pub fn new(sound: impl Into<String>) -> Self {
        Self {
            sound: sound.into(),
            volume: 1.0,
            looping: false,
        }
    }

    /// Set the playback volume
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    /// Request looping playback
    pub fn looped(mut self) -> Self {
        self.looping = true;
        self
    }
}

/// Backend consuming playback requests
pub trait AudioBackend {
    /// Start playing the requested sound
    fn play(&mut self, request: &PlaybackRequest);

    /// Stop everything currently playing
    fn stop_all(&mut self) {}
}

/// Shared handle to an audio backend, cloneable into scheduled callbacks
pub type SharedAudioBackend = Rc<RefCell<dyn AudioBackend>>;

/// Schedule a sound to play after a delay
///
/// The returned task id can be used to cancel the playback before it fires.
pub fn play_in(
    scheduler: &mut Scheduler,
    backend: &SharedAudioBackend,
    delay: Duration,
    request: PlaybackRequest,
) -> TaskId {
    let backend = Rc::clone(backend);
    scheduler.schedule_in(delay, move || backend.borrow_mut().play(&request))
}
