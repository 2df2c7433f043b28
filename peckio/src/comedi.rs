//! Binding to comedilib's digital-I/O calls.
//!
//! comedilib is plain C with a stable ABI, so the binding is a direct
//! `extern "C"` block rather than a generated wrapper. The block, and the
//! `-lcomedi` link requirement it brings, only exist under the `hardware`
//! feature; the default build keeps the same API surface but every operation
//! reports [`DioError::HardwareSupport`].

use crate::{DigitalInput, DigitalOutput, DioDirection, DioError, Level};

#[cfg(feature = "hardware")]
mod ffi {
    #![allow(non_camel_case_types)]

    use std::os::raw::{c_char, c_int, c_uint};

    #[repr(C)]
    pub struct comedi_t {
        _opaque: [u8; 0],
    }

    pub const COMEDI_INPUT: c_uint = 0;
    pub const COMEDI_OUTPUT: c_uint = 1;

    #[link(name = "comedi")]
    extern "C" {
        pub fn comedi_open(filename: *const c_char) -> *mut comedi_t;
        pub fn comedi_close(device: *mut comedi_t) -> c_int;
        pub fn comedi_dio_config(
            device: *mut comedi_t,
            subdevice: c_uint,
            channel: c_uint,
            direction: c_uint,
        ) -> c_int;
        pub fn comedi_dio_read(
            device: *mut comedi_t,
            subdevice: c_uint,
            channel: c_uint,
            bit: *mut c_uint,
        ) -> c_int;
        pub fn comedi_dio_write(
            device: *mut comedi_t,
            subdevice: c_uint,
            channel: c_uint,
            bit: c_uint,
        ) -> c_int;
        pub fn comedi_errno() -> c_int;
        pub fn comedi_strerror(errnum: c_int) -> *const c_char;
    }
}

#[cfg(feature = "hardware")]
fn last_error() -> String {
    unsafe {
        let msg = ffi::comedi_strerror(ffi::comedi_errno());
        if msg.is_null() {
            String::from("unknown comedi error")
        } else {
            std::ffi::CStr::from_ptr(msg).to_string_lossy().into_owned()
        }
    }
}

/// An open comedi device.
///
/// Opening is checked: a null handle from `comedi_open` is an error here,
/// never a handle that gets polled blindly. The device is closed exactly once,
/// when the value drops.
pub struct ComediDevice {
    path: String,
    #[cfg(feature = "hardware")]
    dev: *mut ffi::comedi_t,
}

impl ComediDevice {
    /// Device file the handle was opened from, e.g. `/dev/comedi0`.
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(feature = "hardware")]
impl ComediDevice {
    pub fn open(path: &str) -> Result<ComediDevice, DioError> {
        let fname = std::ffi::CString::new(path).map_err(|_| DioError::Open {
            device: path.to_string(),
            reason: String::from("device path contains a NUL byte"),
        })?;
        let dev = unsafe { ffi::comedi_open(fname.as_ptr()) };
        if dev.is_null() {
            return Err(DioError::Open {
                device: path.to_string(),
                reason: last_error(),
            });
        }
        Ok(ComediDevice {
            path: path.to_string(),
            dev,
        })
    }

    /// Configure a line for input or output (`comedi_dio_config`).
    pub fn configure(
        &self,
        subdevice: u32,
        channel: u32,
        direction: DioDirection,
    ) -> Result<(), DioError> {
        let dir = match direction {
            DioDirection::Input => ffi::COMEDI_INPUT,
            DioDirection::Output => ffi::COMEDI_OUTPUT,
        };
        let ret = unsafe { ffi::comedi_dio_config(self.dev, subdevice, channel, dir) };
        if ret < 0 {
            return Err(DioError::Config {
                subdevice,
                channel,
                reason: last_error(),
            });
        }
        Ok(())
    }
}

#[cfg(feature = "hardware")]
impl DigitalInput for ComediDevice {
    fn read_channel(&self, subdevice: u32, channel: u32) -> Result<Level, DioError> {
        let mut bit: std::os::raw::c_uint = 0;
        let ret = unsafe { ffi::comedi_dio_read(self.dev, subdevice, channel, &mut bit) };
        if ret < 0 {
            return Err(DioError::Read {
                subdevice,
                channel,
                reason: last_error(),
            });
        }
        Ok(Level::from_raw(bit))
    }
}

#[cfg(feature = "hardware")]
impl DigitalOutput for ComediDevice {
    fn write_channel(&self, subdevice: u32, channel: u32, level: Level) -> Result<(), DioError> {
        let bit = if level.is_high() { 1 } else { 0 };
        let ret = unsafe { ffi::comedi_dio_write(self.dev, subdevice, channel, bit) };
        if ret < 0 {
            return Err(DioError::Write {
                subdevice,
                channel,
                reason: last_error(),
            });
        }
        Ok(())
    }
}

#[cfg(feature = "hardware")]
impl Drop for ComediDevice {
    fn drop(&mut self) {
        let ret = unsafe { ffi::comedi_close(self.dev) };
        if ret < 0 {
            tracing::warn!(device = %self.path, "comedi_close failed: {}", last_error());
        }
    }
}

#[cfg(not(feature = "hardware"))]
impl ComediDevice {
    pub fn open(_path: &str) -> Result<ComediDevice, DioError> {
        Err(DioError::HardwareSupport)
    }

    pub fn configure(
        &self,
        _subdevice: u32,
        _channel: u32,
        _direction: DioDirection,
    ) -> Result<(), DioError> {
        Err(DioError::HardwareSupport)
    }
}

#[cfg(not(feature = "hardware"))]
impl DigitalInput for ComediDevice {
    fn read_channel(&self, _subdevice: u32, _channel: u32) -> Result<Level, DioError> {
        Err(DioError::HardwareSupport)
    }
}

#[cfg(not(feature = "hardware"))]
impl DigitalOutput for ComediDevice {
    fn write_channel(&self, _subdevice: u32, _channel: u32, _level: Level) -> Result<(), DioError> {
        Err(DioError::HardwareSupport)
    }
}
