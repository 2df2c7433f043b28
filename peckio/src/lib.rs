//! Digital I/O for the peck-detection tools.
//!
//! Behavioral rigs wire response keys to digital-input lines on a
//! [comedi](https://www.comedi.org/) data-acquisition card. This crate holds
//! the device boundary: the [`Level`] read off a line, the [`DigitalInput`]
//! and [`DigitalOutput`] seams the tools program against, the
//! [`comedi::ComediDevice`] binding to comedilib, and a scriptable
//! [`sim::SimDevice`] so the polling logic can be tested without a card.
//!
//! This crate does not distribute or vendor comedilib. The real binding only
//! compiles with the `hardware` cargo feature enabled, which links
//! `libcomedi` from the system; without it, [`comedi::ComediDevice::open`]
//! fails with [`DioError::HardwareSupport`] and everything else still builds
//! and tests.
//!
//! ## Note: FFI integer types
//!
//! comedilib addresses lines as `unsigned int` subdevice and channel indices
//! and reads samples into an `unsigned int` bit. Indices are passed through
//! as `u32`. The sampled bit is collapsed immediately into a [`Level`]: the
//! library only defines zero as low, so any set bit decodes as high.

use thiserror::Error;

pub mod comedi;
pub mod sim;

/// Logic level of a digital line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Decode a raw comedi sample: zero is low, any set bit is high.
    pub fn from_raw(bit: u32) -> Level {
        if bit == 0 {
            Level::Low
        } else {
            Level::High
        }
    }

    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

/// Direction a digital line is configured for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DioDirection {
    Input,
    Output,
}

/// Failures at the device boundary, one variant per operation so callers can
/// tell a failed read apart from anything the line actually did.
#[derive(Debug, Error)]
pub enum DioError {
    #[error("could not open comedi device {device}: {reason}")]
    Open { device: String, reason: String },
    #[error("could not read subdevice {subdevice}, channel {channel}: {reason}")]
    Read {
        subdevice: u32,
        channel: u32,
        reason: String,
    },
    #[error("could not write subdevice {subdevice}, channel {channel}: {reason}")]
    Write {
        subdevice: u32,
        channel: u32,
        reason: String,
    },
    #[error("could not configure subdevice {subdevice}, channel {channel}: {reason}")]
    Config {
        subdevice: u32,
        channel: u32,
        reason: String,
    },
    #[error("built without comedi support (enable the `hardware` feature)")]
    HardwareSupport,
}

/// A device that can sample the current logic level of a digital-input line.
pub trait DigitalInput {
    fn read_channel(&self, subdevice: u32, channel: u32) -> Result<Level, DioError>;
}

/// A device that can drive a digital-output line.
pub trait DigitalOutput {
    fn write_channel(&self, subdevice: u32, channel: u32, level: Level) -> Result<(), DioError>;
}
