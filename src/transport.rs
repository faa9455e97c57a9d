//! Playback session — transport state around one rendered track.
//!
//! The session owns the buffer and a play/pause/stop state machine. It never
//! reads a clock itself: every time-dependent call takes `now`, the host's
//! current time in seconds, so any audio or wall clock can drive it.

use std::fmt;

use crate::dsp::renderer::RenderedTrack;

/// Transport state of a [`PlaybackSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Playing,
    Paused,
}

type ElapsedCallback = Box<dyn FnMut(f64) + Send>;

/// Caller-owned playback handle for one [`RenderedTrack`].
pub struct PlaybackSession {
    track: RenderedTrack,
    state: TransportState,
    /// Host time at which position 0 would have started (valid while playing).
    started_at: f64,
    /// Position held while paused or stopped.
    position: f64,
    on_elapsed: Option<ElapsedCallback>,
}

impl PlaybackSession {
    /// Open a session in the stopped state.
    pub fn open(track: RenderedTrack) -> Self {
        log::debug!("session opened ({:.2}s)", track.duration_seconds());
        PlaybackSession {
            track,
            state: TransportState::Stopped,
            started_at: 0.0,
            position: 0.0,
            on_elapsed: None,
        }
    }

    /// Register the callback invoked by [`tick`](Self::tick) with the elapsed time.
    pub fn on_elapsed(&mut self, callback: impl FnMut(f64) + Send + 'static) {
        self.on_elapsed = Some(Box::new(callback));
    }

    pub fn track(&self) -> &RenderedTrack {
        &self.track
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn duration(&self) -> f64 {
        self.track.duration_seconds()
    }

    /// Start or resume playback. A session parked at the end restarts from 0.
    pub fn play(&mut self, now: f64) {
        if self.state == TransportState::Playing {
            return;
        }
        if self.position >= self.duration() {
            self.position = 0.0;
        }
        if self.position > 0.0 {
            log::info!("resuming at {}", format_time(self.position));
        }
        self.started_at = now - self.position;
        self.state = TransportState::Playing;
    }

    /// Pause, remembering the current position.
    pub fn pause(&mut self, now: f64) {
        if self.state != TransportState::Playing {
            return;
        }
        self.position = self.elapsed(now);
        self.state = TransportState::Paused;
    }

    /// Stop and rewind to the start.
    pub fn stop(&mut self) {
        self.state = TransportState::Stopped;
        self.position = 0.0;
        self.started_at = 0.0;
    }

    /// Move to `position` seconds, clamped to the track.
    ///
    /// Playback continues from the new position when playing; otherwise the
    /// session is left paused there.
    pub fn seek(&mut self, position: f64, now: f64) {
        let position = position.clamp(0.0, self.duration());
        match self.state {
            TransportState::Playing => self.started_at = now - position,
            TransportState::Paused | TransportState::Stopped => {
                self.position = position;
                self.state = TransportState::Paused;
            }
        }
    }

    /// Seconds into the track, never beyond its duration.
    pub fn elapsed(&self, now: f64) -> f64 {
        let raw = match self.state {
            TransportState::Playing => now - self.started_at,
            TransportState::Paused | TransportState::Stopped => self.position,
        };
        raw.clamp(0.0, self.duration())
    }

    /// Fraction of the track played, in `0..=1`.
    pub fn progress(&self, now: f64) -> f64 {
        let duration = self.duration();
        if duration <= 0.0 {
            return 0.0;
        }
        (self.elapsed(now) / duration).min(1.0)
    }

    /// Report elapsed time to the callback and stop at the end of the buffer.
    ///
    /// Does nothing unless playing. Returns the state after the tick.
    pub fn tick(&mut self, now: f64) -> TransportState {
        if self.state != TransportState::Playing {
            return self.state;
        }
        let elapsed = self.elapsed(now);
        if let Some(callback) = self.on_elapsed.as_mut() {
            callback(elapsed);
        }
        if now - self.started_at >= self.duration() {
            log::debug!("end of track reached");
            self.stop();
        }
        self.state
    }

    /// Close the session, handing the buffer back.
    pub fn close(self) -> RenderedTrack {
        self.track
    }
}

impl fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("state", &self.state)
            .field("position", &self.position)
            .field("started_at", &self.started_at)
            .field("duration", &self.duration())
            .field("has_callback", &self.on_elapsed.is_some())
            .finish()
    }
}

/// Format seconds as `m:ss`.
pub fn format_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{minutes}:{secs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Ten seconds of silence at a tiny sample rate.
    fn session() -> PlaybackSession {
        let n = 1000;
        PlaybackSession::open(RenderedTrack::from_channels(&vec![0.0; n], &vec![0.0; n], 100).unwrap())
    }

    #[test]
    fn opens_stopped() {
        let s = session();
        assert_eq!(s.state(), TransportState::Stopped);
        assert_eq!(s.elapsed(123.0), 0.0);
        assert_eq!(s.duration(), 10.0);
    }

    #[test]
    fn elapsed_follows_clock() {
        let mut s = session();
        s.play(100.0);
        assert_eq!(s.elapsed(102.5), 2.5);
        assert_eq!(s.progress(105.0), 0.5);
    }

    #[test]
    fn pause_and_resume_keep_position() {
        let mut s = session();
        s.play(0.0);
        s.pause(3.0);
        assert_eq!(s.state(), TransportState::Paused);
        assert_eq!(s.elapsed(50.0), 3.0);

        s.play(50.0);
        assert_eq!(s.elapsed(51.0), 4.0);
    }

    #[test]
    fn stop_resets_position() {
        let mut s = session();
        s.play(0.0);
        s.pause(4.0);
        s.stop();
        assert_eq!(s.state(), TransportState::Stopped);
        s.play(10.0);
        assert_eq!(s.elapsed(10.0), 0.0);
    }

    #[test]
    fn seek_while_playing_and_stopped() {
        let mut s = session();
        s.play(0.0);
        s.seek(7.0, 1.0);
        assert_eq!(s.elapsed(2.0), 8.0);

        s.stop();
        s.seek(20.0, 0.0);
        assert_eq!(s.state(), TransportState::Paused);
        assert_eq!(s.elapsed(0.0), 10.0);
    }

    #[test]
    fn tick_reports_and_stops_at_end() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut s = session();
        s.on_elapsed(move |t| sink.lock().unwrap().push(t));
        assert_eq!(s.tick(0.0), TransportState::Stopped);

        s.play(0.0);
        assert_eq!(s.tick(4.0), TransportState::Playing);
        assert_eq!(s.tick(12.0), TransportState::Stopped);
        assert_eq!(*seen.lock().unwrap(), vec![4.0, 10.0]);
        assert_eq!(s.elapsed(20.0), 0.0);
    }

    #[test]
    fn play_at_end_restarts() {
        let mut s = session();
        s.seek(10.0, 0.0);
        s.play(5.0);
        assert_eq!(s.elapsed(6.0), 1.0);
    }

    #[test]
    fn close_returns_buffer() {
        let track = session().close();
        assert_eq!(track.frames(), 1000);
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(59.9), "0:59");
        assert_eq!(format_time(61.0), "1:01");
        assert_eq!(format_time(180.0), "3:00");
        assert_eq!(format_time(-3.0), "0:00");
    }
}
