//! Scripted stand-in for a comedi device.
//!
//! Plays back a fixed sequence of read outcomes so polling logic can be
//! exercised without a card installed. Counters for reads, writes, and
//! closes are shared out through [`SimDevice::stats`] for assertions.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{DigitalInput, DigitalOutput, DioError, Level};

/// Counters that outlive the device itself.
#[derive(Debug, Default)]
pub struct SimStats {
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
    pub closes: AtomicUsize,
}

/// A digital-I/O device that plays back a script instead of touching
/// hardware.
///
/// Reads consume the script front to back. Once it is exhausted, a pinned
/// level (if any) repeats forever; otherwise further reads fail, which keeps
/// a test from silently sampling past its script.
pub struct SimDevice {
    script: Mutex<VecDeque<Result<Level, DioError>>>,
    pinned: Option<Level>,
    last_write: Mutex<Option<(u32, u32, Level)>>,
    stats: Arc<SimStats>,
}

impl SimDevice {
    /// A script of plain levels.
    pub fn new<I>(levels: I) -> SimDevice
    where
        I: IntoIterator<Item = Level>,
    {
        SimDevice::with_script(levels.into_iter().map(Ok).collect())
    }

    /// A script of read outcomes, including failures.
    pub fn with_script(steps: Vec<Result<Level, DioError>>) -> SimDevice {
        SimDevice {
            script: Mutex::new(steps.into()),
            pinned: None,
            last_write: Mutex::new(None),
            stats: Arc::new(SimStats::default()),
        }
    }

    /// A line stuck at `level` forever.
    pub fn pinned(level: Level) -> SimDevice {
        SimDevice {
            script: Mutex::new(VecDeque::new()),
            pinned: Some(level),
            last_write: Mutex::new(None),
            stats: Arc::new(SimStats::default()),
        }
    }

    pub fn stats(&self) -> Arc<SimStats> {
        Arc::clone(&self.stats)
    }

    /// Last `(subdevice, channel, level)` written, if any.
    pub fn last_write(&self) -> Option<(u32, u32, Level)> {
        *self.last_write.lock()
    }
}

impl DigitalInput for SimDevice {
    fn read_channel(&self, subdevice: u32, channel: u32) -> Result<Level, DioError> {
        self.stats.reads.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().pop_front() {
            Some(step) => step,
            None => match self.pinned {
                Some(level) => Ok(level),
                None => Err(DioError::Read {
                    subdevice,
                    channel,
                    reason: String::from("simulated script exhausted"),
                }),
            },
        }
    }
}

impl DigitalOutput for SimDevice {
    fn write_channel(&self, subdevice: u32, channel: u32, level: Level) -> Result<(), DioError> {
        self.stats.writes.fetch_add(1, Ordering::SeqCst);
        *self.last_write.lock() = Some((subdevice, channel, level));
        Ok(())
    }
}

impl Drop for SimDevice {
    fn drop(&mut self) {
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_plays_back_in_order() {
        let dev = SimDevice::new([Level::High, Level::High, Level::Low]);
        let stats = dev.stats();
        assert_eq!(dev.read_channel(0, 0).unwrap(), Level::High);
        assert_eq!(dev.read_channel(0, 0).unwrap(), Level::High);
        assert_eq!(dev.read_channel(0, 0).unwrap(), Level::Low);
        assert_eq!(stats.reads.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn exhausted_script_fails_reads() {
        let dev = SimDevice::new([Level::Low]);
        let _ = dev.read_channel(0, 0).unwrap();
        assert!(matches!(
            dev.read_channel(2, 5),
            Err(DioError::Read {
                subdevice: 2,
                channel: 5,
                ..
            })
        ));
    }

    #[test]
    fn pinned_level_repeats() {
        let dev = SimDevice::pinned(Level::High);
        for _ in 0..100 {
            assert_eq!(dev.read_channel(0, 0).unwrap(), Level::High);
        }
        assert_eq!(dev.stats().reads.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn scripted_failure_surfaces() {
        let dev = SimDevice::with_script(vec![
            Ok(Level::High),
            Err(DioError::Read {
                subdevice: 0,
                channel: 0,
                reason: String::from("bus fault"),
            }),
        ]);
        assert_eq!(dev.read_channel(0, 0).unwrap(), Level::High);
        assert!(dev.read_channel(0, 0).is_err());
    }

    #[test]
    fn writes_are_recorded() {
        let dev = SimDevice::pinned(Level::Low);
        assert_eq!(dev.last_write(), None);
        dev.write_channel(1, 3, Level::High).unwrap();
        assert_eq!(dev.last_write(), Some((1, 3, Level::High)));
        assert_eq!(dev.stats().writes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_counts_as_close() {
        let dev = SimDevice::pinned(Level::Low);
        let stats = dev.stats();
        assert_eq!(stats.closes.load(Ordering::SeqCst), 0);
        drop(dev);
        assert_eq!(stats.closes.load(Ordering::SeqCst), 1);
    }
}
