use clap::Parser;
use std::path::PathBuf;

// Build version with target info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Device-emulation viewport host
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Image to show as the screencast frame (PNG, JPEG)
    #[arg(value_name = "FRAME")]
    pub frame: Option<PathBuf>,

    /// Requested viewport width
    #[arg(long = "width", value_name = "PX")]
    pub width: Option<f32>,

    /// Requested viewport height
    #[arg(long = "height", value_name = "PX")]
    pub height: Option<f32>,

    /// Padding reserved around the resizable frame
    #[arg(long = "padding", value_name = "PX")]
    pub padding: Option<f32>,

    /// Enable device emulation (drag-resizable frame)
    #[arg(short = 'e', long = "emulate")]
    pub emulate: bool,

    /// Start in inspect mode
    #[arg(short = 'i', long = "inspect")]
    pub inspect: bool,

    /// Window-resize debounce in milliseconds
    #[arg(long = "debounce", value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Enable logging to file (default: emuview.log in config dir)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Custom configuration directory (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

impl Args {
    /// Apply CLI overrides on top of a loaded config
    pub fn apply(&self, config: &mut crate::config::ViewportConfig) {
        if let Some(w) = self.width {
            config.width = w;
        }
        if let Some(h) = self.height {
            config.height = h;
        }
        if let Some(p) = self.padding {
            config.padding = p;
        }
        if let Some(ms) = self.debounce_ms {
            config.resize_debounce_ms = ms;
        }
        if self.emulate {
            config.device_emulation = true;
        }
        if self.inspect {
            config.inspect = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewportConfig;

    #[test]
    fn test_overrides() {
        let args = Args::parse_from(["emuview", "--width", "375", "--padding", "20", "-e", "-vv"]);
        let mut cfg = ViewportConfig::default();
        args.apply(&mut cfg);

        assert_eq!(cfg.width, 375.0);
        assert_eq!(cfg.height, 600.0);
        assert_eq!(cfg.padding, 20.0);
        assert!(cfg.device_emulation);
        assert!(!cfg.inspect);
        assert_eq!(args.verbosity, 2);
    }

    #[test]
    fn test_log_flag_optional_value() {
        let args = Args::parse_from(["emuview", "-l"]);
        assert_eq!(args.log_file, Some(None));
        let args = Args::parse_from(["emuview", "--log", "out.log"]);
        assert_eq!(args.log_file, Some(Some(PathBuf::from("out.log"))));
    }
}
