// src/audio/media/rodio_media.rs
//! Media element backed by a rodio sink running on its own audio thread.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};
use tracing::{debug, error, info, warn};

use super::{MediaElement, MediaError, MediaEvent};
use crate::audio::graph::{SignalTap, TapSlot, TapSource};
use crate::audio::metadata::probe_duration;
use crate::fs::Track;

/// How often a playing element reports its position.
const TIME_UPDATE_INTERVAL: Duration = Duration::from_millis(250);

/// Commands sent to the audio thread.
enum MediaCommand {
    Play,
    Pause,
    Seek(Duration),
    Volume(f32),
}

/// Values mirrored from the audio thread for lock-free reads on the UI side.
#[derive(Debug)]
struct SharedClock {
    position_ms: AtomicU64,
    /// `0` while unknown.
    duration_ms: AtomicU64,
    volume_bits: AtomicU32,
    paused: AtomicBool,
    /// Cleared when the thread could not open an output device.
    alive: AtomicBool,
}

impl SharedClock {
    fn new() -> Self {
        Self {
            position_ms: AtomicU64::new(0),
            duration_ms: AtomicU64::new(0),
            volume_bits: AtomicU32::new(1.0f32.to_bits()),
            paused: AtomicBool::new(true),
            alive: AtomicBool::new(true),
        }
    }

    fn set_position(&self, pos: Duration) {
        self.position_ms
            .store(pos.as_millis() as u64, Ordering::Release);
    }

    fn position(&self) -> Duration {
        Duration::from_millis(self.position_ms.load(Ordering::Acquire))
    }
}

/// A media element playing one track through the default output device.
pub struct RodioMedia {
    cmd_tx: Sender<MediaCommand>,
    event_rx: Receiver<MediaEvent>,
    clock: Arc<SharedClock>,
    tap_slot: TapSlot,
}

impl RodioMedia {
    /// Spawn the audio thread and load `track` paused at the start.
    pub fn open(track: &Track) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<MediaCommand>();
        let (event_tx, event_rx) = mpsc::channel::<MediaEvent>();
        let clock = Arc::new(SharedClock::new());
        let tap_slot: TapSlot = Arc::new(OnceLock::new());

        let worker = AudioWorker {
            path: track.path().to_path_buf(),
            clock: clock.clone(),
            tap_slot: tap_slot.clone(),
            events: event_tx,
        };
        let spawned = thread::Builder::new()
            .name("warble-audio".into())
            .spawn(move || worker.run(cmd_rx));
        if let Err(e) = spawned {
            error!("failed to spawn audio thread: {e}");
            clock.alive.store(false, Ordering::Release);
        }

        Self {
            cmd_tx,
            event_rx,
            clock,
            tap_slot,
        }
    }

    fn send(&self, cmd: MediaCommand) -> Result<(), MediaError> {
        if !self.clock.alive.load(Ordering::Acquire) {
            return Err(MediaError::NoOutput);
        }
        self.cmd_tx.send(cmd).map_err(|_| MediaError::Closed)
    }
}

impl MediaElement for RodioMedia {
    fn current_time(&self) -> f64 {
        self.clock.position().as_secs_f64()
    }

    fn set_current_time(&mut self, t: f64) {
        if !t.is_finite() {
            return;
        }
        let pos = Duration::from_secs_f64(t.max(0.0));
        self.clock.set_position(pos);
        let _ = self.send(MediaCommand::Seek(pos));
    }

    fn duration(&self) -> Option<f64> {
        match self.clock.duration_ms.load(Ordering::Acquire) {
            0 => None,
            ms => Some(ms as f64 / 1000.0),
        }
    }

    fn volume(&self) -> f64 {
        f32::from_bits(self.clock.volume_bits.load(Ordering::Relaxed)) as f64
    }

    fn set_volume(&mut self, volume: f64) {
        let volume = volume.clamp(0.0, 1.0) as f32;
        self.clock
            .volume_bits
            .store(volume.to_bits(), Ordering::Relaxed);
        let _ = self.send(MediaCommand::Volume(volume));
    }

    fn paused(&self) -> bool {
        self.clock.paused.load(Ordering::Acquire)
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.send(MediaCommand::Play)?;
        self.clock.paused.store(false, Ordering::Release);
        Ok(())
    }

    fn pause(&mut self) {
        if self.send(MediaCommand::Pause).is_ok() {
            self.clock.paused.store(true, Ordering::Release);
        }
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        self.event_rx.try_recv().ok()
    }

    fn attach_tap(&mut self, tap: SignalTap) -> Result<(), MediaError> {
        self.tap_slot
            .set(tap)
            .map_err(|_| MediaError::AlreadyTapped)
    }

    fn is_tapped(&self) -> bool {
        self.tap_slot.get().is_some()
    }
}

/// What the audio thread needs to start the transport.
struct AudioWorker {
    path: PathBuf,
    clock: Arc<SharedClock>,
    tap_slot: TapSlot,
    events: Sender<MediaEvent>,
}

impl AudioWorker {
    fn run(self, cmd_rx: Receiver<MediaCommand>) {
        // The output stream is not Send, so it lives and dies on this thread.
        let Ok((stream, handle)) = OutputStream::try_default() else {
            warn!("no audio output device; playback disabled");
            self.disable(&cmd_rx);
            return;
        };
        let sink = match Sink::try_new(&handle) {
            Ok(sink) => sink,
            Err(e) => {
                warn!("failed to create audio sink: {e}");
                self.disable(&cmd_rx);
                return;
            }
        };

        let output = SinkOutput {
            sink,
            path: self.path.clone(),
            tap_slot: self.tap_slot.clone(),
        };
        let mut transport = Transport::new(output, self.clock.clone(), self.events.clone());
        if !transport.load() {
            error!("cannot play {}", self.path.display());
            self.disable(&cmd_rx);
            return;
        }

        loop {
            match cmd_rx.recv_timeout(TIME_UPDATE_INTERVAL) {
                Ok(cmd) => transport.apply(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            transport.poll();
        }

        transport.output.stop();
        drop(stream);
        debug!("audio thread exiting");
    }

    /// Mark the element dead and swallow commands until it is dropped.
    fn disable(&self, cmd_rx: &Receiver<MediaCommand>) {
        self.clock.alive.store(false, Ordering::Release);
        while cmd_rx.recv().is_ok() {}
    }
}

/// The playing end of the transport: a queue holding the one track.
trait TrackOutput {
    /// Clear the queue and queue the track again from the start, paused.
    /// Returns the track length when known.
    fn load(&mut self) -> Result<Option<Duration>, String>;

    fn play(&mut self);

    fn pause(&mut self);

    fn is_paused(&self) -> bool;

    /// Nothing left to play.
    fn is_drained(&self) -> bool;

    fn seek(&mut self, pos: Duration) -> Result<(), String>;

    fn position(&self) -> Duration;

    fn set_volume(&mut self, volume: f32);

    fn stop(&mut self);
}

/// A rodio sink fed from the decoded track through the tap.
struct SinkOutput {
    sink: Sink,
    path: PathBuf,
    tap_slot: TapSlot,
}

impl TrackOutput for SinkOutput {
    fn load(&mut self) -> Result<Option<Duration>, String> {
        self.sink.clear();
        let source = open_decoder(&self.path)?;
        let total = source.total_duration().or_else(|| probe_duration(&self.path));
        let converted = source.convert_samples::<f32>();
        self.sink
            .append(TapSource::new(converted, self.tap_slot.clone()));
        self.sink.pause();
        Ok(total)
    }

    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }

    fn is_drained(&self) -> bool {
        self.sink.empty()
    }

    fn seek(&mut self, pos: Duration) -> Result<(), String> {
        self.sink.try_seek(pos).map_err(|e| e.to_string())
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn stop(&mut self) {
        self.sink.stop();
    }
}

/// Command handling and end-of-track detection on the audio thread.
struct Transport<O> {
    output: O,
    clock: Arc<SharedClock>,
    events: Sender<MediaEvent>,
    ended: bool,
}

impl<O: TrackOutput> Transport<O> {
    fn new(output: O, clock: Arc<SharedClock>, events: Sender<MediaEvent>) -> Self {
        Self {
            output,
            clock,
            events,
            ended: false,
        }
    }

    /// Queue the track paused at zero. The first known length is announced.
    fn load(&mut self) -> bool {
        let total = match self.output.load() {
            Ok(total) => total,
            Err(reason) => {
                error!("failed to decode track: {reason}");
                return false;
            }
        };
        self.ended = false;
        self.clock.paused.store(true, Ordering::Release);
        self.clock.set_position(Duration::ZERO);

        if let Some(total) = total {
            let first = self
                .clock
                .duration_ms
                .swap(total.as_millis() as u64, Ordering::AcqRel)
                == 0;
            if first {
                let _ = self.events.send(MediaEvent::LoadedMetadata {
                    duration: total.as_secs_f64(),
                });
            }
        }
        true
    }

    fn apply(&mut self, cmd: MediaCommand) {
        match cmd {
            MediaCommand::Play => {
                if self.ended || self.output.is_drained() {
                    debug!("restarting track after end");
                    if !self.load() {
                        return;
                    }
                }
                self.output.play();
                self.clock.paused.store(false, Ordering::Release);
            }
            MediaCommand::Pause => {
                self.output.pause();
                self.clock.paused.store(true, Ordering::Release);
            }
            MediaCommand::Seek(pos) => {
                // The track may have run out since the last poll.
                if !self.ended && !self.output.is_paused() && self.output.is_drained() {
                    self.finish();
                }
                if (self.ended || self.output.is_drained()) && !self.load() {
                    return;
                }
                if let Err(e) = self.output.seek(pos) {
                    warn!("seek to {:.2}s failed: {e}", pos.as_secs_f64());
                }
                self.report_position(self.output.position());
            }
            MediaCommand::Volume(v) => self.output.set_volume(v),
        }
    }

    /// Report the position while playing, or the end once the queue drains.
    fn poll(&mut self) {
        if self.ended || self.output.is_paused() {
            return;
        }
        if self.output.is_drained() {
            self.finish();
        } else {
            self.report_position(self.output.position());
        }
    }

    fn finish(&mut self) {
        self.ended = true;
        self.output.pause();
        self.clock.paused.store(true, Ordering::Release);
        match self.clock.duration_ms.load(Ordering::Acquire) {
            0 => {}
            ms => self.clock.set_position(Duration::from_millis(ms)),
        }
        let _ = self.events.send(MediaEvent::Ended);
        info!("playback reached the end of the track");
    }

    fn report_position(&self, pos: Duration) {
        self.clock.set_position(pos);
        let _ = self.events.send(MediaEvent::TimeUpdate {
            current_time: pos.as_secs_f64(),
        });
    }
}

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    Decoder::new(BufReader::new(file)).map_err(|e| e.to_string())
}
