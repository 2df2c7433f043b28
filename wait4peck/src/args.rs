//! Command-line surface.
//!
//! The grammar is fixed by callers that already exist: the experiment
//! framework execs `wait4peck <device> -s N -c M` and parses our one line of
//! output. Those are single-dash long flags with a bare device token, so the
//! argument list is parsed by hand rather than through a derive-style CLI
//! crate.

use thiserror::Error;

/// Exit status for usage errors and `-help`, matching the tool this replaced.
pub const EXIT_USAGE: i32 = 255;

pub const USAGE: &str = "\
wait4peck usage:
     [-help] [-s int] [-c int] [device]

        -help        = show this help message
        -s           = (int) subdevice index
        -c           = (int) channel index
        device       = device file to open, e.g. /dev/comedi0
";

/// Values pulled off the command line. Indices default to 0 when their flags
/// are absent; the device stays unset until a bare token supplies it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub device: Option<String>,
    pub subdevice: u32,
    pub channel: u32,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            device: None,
            subdevice: 0,
            channel: 0,
        }
    }
}

/// A successfully parsed command line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Invocation {
    Run(Config),
    Help,
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum UsageError {
    #[error("unknown option: {0}")]
    UnknownFlag(String),
    #[error("option {0} expects an integer value")]
    MissingValue(&'static str),
    #[error("option {flag} expects an integer value, got {value:?}")]
    BadValue { flag: &'static str, value: String },
}

/// Parse the raw argument list, program name already stripped.
///
/// Tokens are processed left to right. Flags and the device token may appear
/// in any order; if several bare tokens appear, the last one wins. `-help`
/// and unknown options terminate parsing immediately.
pub fn parse<I>(args: I) -> Result<Invocation, UsageError>
where
    I: IntoIterator<Item = String>,
{
    let mut cfg = Config::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-s" => cfg.subdevice = int_value("-s", args.next())?,
            "-c" => cfg.channel = int_value("-c", args.next())?,
            "-help" => return Ok(Invocation::Help),
            flag if flag.starts_with('-') => return Err(UsageError::UnknownFlag(arg)),
            _ => cfg.device = Some(arg),
        }
    }
    Ok(Invocation::Run(cfg))
}

fn int_value(flag: &'static str, value: Option<String>) -> Result<u32, UsageError> {
    let value = value.ok_or(UsageError::MissingValue(flag))?;
    value
        .parse()
        .map_err(|_| UsageError::BadValue { flag, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn full_invocation() {
        let parsed = parse(argv(&["-s", "0", "-c", "2", "/dev/comedi0"])).unwrap();
        assert_eq!(
            parsed,
            Invocation::Run(Config {
                device: Some(String::from("/dev/comedi0")),
                subdevice: 0,
                channel: 2,
            })
        );
    }

    #[test]
    fn argument_order_does_not_matter() {
        let a = parse(argv(&["-s", "1", "-c", "7", "/dev/comedi0"])).unwrap();
        let b = parse(argv(&["/dev/comedi0", "-c", "7", "-s", "1"])).unwrap();
        let c = parse(argv(&["-c", "7", "/dev/comedi0", "-s", "1"])).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn defaults_when_flags_absent() {
        let parsed = parse(argv(&["/dev/comedi1"])).unwrap();
        assert_eq!(
            parsed,
            Invocation::Run(Config {
                device: Some(String::from("/dev/comedi1")),
                subdevice: 0,
                channel: 0,
            })
        );
        assert_eq!(parse(argv(&[])).unwrap(), Invocation::Run(Config::default()));
    }

    #[test]
    fn last_device_token_wins() {
        let parsed = parse(argv(&["/dev/comedi0", "-s", "1", "/dev/comedi1"])).unwrap();
        match parsed {
            Invocation::Run(cfg) => assert_eq!(cfg.device.as_deref(), Some("/dev/comedi1")),
            other => panic!("expected Run, got {:?}", other),
        }
    }

    #[test]
    fn help_anywhere_short_circuits() {
        assert_eq!(parse(argv(&["-help"])).unwrap(), Invocation::Help);
        assert_eq!(
            parse(argv(&["-s", "1", "-help", "/dev/comedi0"])).unwrap(),
            Invocation::Help
        );
        // tokens after -help are never inspected, even bad ones
        assert_eq!(
            parse(argv(&["-help", "-bogus"])).unwrap(),
            Invocation::Help
        );
    }

    #[test]
    fn unknown_flag_names_the_token() {
        assert_eq!(
            parse(argv(&["-x", "/dev/comedi0"])),
            Err(UsageError::UnknownFlag(String::from("-x")))
        );
        // first terminating condition wins, same as processing left to right
        assert_eq!(
            parse(argv(&["-x", "-help"])),
            Err(UsageError::UnknownFlag(String::from("-x")))
        );
    }

    #[test]
    fn flag_values_must_be_integers() {
        assert_eq!(parse(argv(&["-s"])), Err(UsageError::MissingValue("-s")));
        assert_eq!(
            parse(argv(&["-c", "two"])),
            Err(UsageError::BadValue {
                flag: "-c",
                value: String::from("two"),
            })
        );
        // a following flag is not a value
        assert_eq!(
            parse(argv(&["-s", "-c"])),
            Err(UsageError::BadValue {
                flag: "-s",
                value: String::from("-c"),
            })
        );
    }
}
