//! The poll loop: sleep, sample, test, until the line goes low.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use peckio::{DigitalInput, DioError, Level};
use thiserror::Error;

/// Default cadence between samples. Detection can lag the physical event by
/// up to one interval, which bounds the precision of the emitted timestamp.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_nanos(500_000);

#[derive(Debug, Error)]
pub enum DetectError {
    /// The device failed mid-poll. Kept separate from a genuine low reading
    /// so a broken card can never report a peck.
    #[error(transparent)]
    Read(#[from] DioError),
    #[error("polling cancelled before the line went low")]
    Cancelled,
}

/// Polls one digital-input channel until it reads low.
pub struct Detector<D> {
    device: D,
    subdevice: u32,
    channel: u32,
    interval: Duration,
    cancel: Option<Arc<AtomicBool>>,
}

impl<D: DigitalInput> Detector<D> {
    pub fn new(device: D, subdevice: u32, channel: u32, interval: Duration) -> Detector<D> {
        Detector {
            device,
            subdevice,
            channel,
            interval,
            cancel: None,
        }
    }

    /// Install a flag that aborts the wait cooperatively.
    ///
    /// The flag is checked once per iteration on the polling thread; nothing
    /// else ever calls into the device.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Detector<D> {
        self.cancel = Some(flag);
        self
    }

    /// Block until the channel reads low, then return the detection time.
    ///
    /// The level starts at the high sentinel, so at least one sample is
    /// always taken. A single low sample ends the wait; there is no debounce.
    /// Without a cancel flag and with the line stuck high, this never
    /// returns.
    pub fn wait_for_low(&self) -> Result<DateTime<Local>, DetectError> {
        let mut level = Level::High;
        while level == Level::High {
            if self.cancelled() {
                return Err(DetectError::Cancelled);
            }
            std::thread::sleep(self.interval);
            level = self.device.read_channel(self.subdevice, self.channel)?;
        }
        Ok(Local::now())
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }
}
