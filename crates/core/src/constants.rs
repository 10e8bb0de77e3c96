//! Shared constants for the application

use std::time::Duration;

/// Separator placed between module outputs
pub const DEFAULT_SEPARATOR: &str = " | ";

/// Padding placed before the first and after the last module output
pub const DEFAULT_PADDING: &str = " ";

/// Number of module updates collected before the bar is redrawn.
/// A batch size of 1 redraws on every update.
pub const DEFAULT_BATCH_SIZE: usize = 1;

/// Longest time pending updates wait for a batch to fill
pub const DEFAULT_MIN_TIME: Duration = Duration::from_millis(1000);

/// Unix socket on which signals are accepted
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/dwmstat_sig";

/// How long shutdown waits for workers and the aggregator before
/// abandoning them
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// Capacity of the channel between the signal listener and the router
pub const SIGNAL_CHANNEL_CAPACITY: usize = 5;

// Icons (Nerd Font glyphs)

pub const ICO_DATE: &str = "\u{f073}";
pub const ICO_TIME: &str = "\u{f017}";

pub const ICO_BAT_FULL: &str = "\u{f0079} (F)";
pub const ICO_BAT_C20: &str = "\u{f0086}";
pub const ICO_BAT_C40: &str = "\u{f0088}";
pub const ICO_BAT_C60: &str = "\u{f0089}";
pub const ICO_BAT_C80: &str = "\u{f008a}";
pub const ICO_BAT_C90: &str = "\u{f008b}";
pub const ICO_BAT_00: &str = "\u{f008e}";
pub const ICO_BAT_10: &str = "\u{f007a}";
pub const ICO_BAT_20: &str = "\u{f007b}";
pub const ICO_BAT_30: &str = "\u{f007c}";
pub const ICO_BAT_40: &str = "\u{f007d}";
pub const ICO_BAT_50: &str = "\u{f007e}";
pub const ICO_BAT_60: &str = "\u{f007f}";
pub const ICO_BAT_70: &str = "\u{f0080}";
pub const ICO_BAT_80: &str = "\u{f0081}";
pub const ICO_BAT_90: &str = "\u{f0082}";
pub const ICO_BAT_100: &str = "\u{f0079}";

pub const ICO_VOL_MUTE: &str = "\u{f6a9}";
pub const ICO_VOL_DOWN: &str = "\u{f027}";
pub const ICO_VOL_UP: &str = "\u{f028}";

pub const ICO_RES_RAM: &str = "\u{f035b}";
pub const ICO_RES_CPU: &str = "\u{f4bc}";

// Sentinel markers shown in place of a module's output when it fails

pub const BAT_MOD_ERR: &str = "BAT_MOD_ERR";
pub const EXT_MOD_MVOL_ERR: &str = "EXT_MOD_MVOL_ERR";
pub const EXT_MOD_RAM_ERR: &str = "EXT_MOD_RAM_ERR";

/// Marker for an external module whose command could not be run
pub fn ext_mod_exec_err(name: &str) -> String {
    format!("EXT_MOD_EXEC_ERR({})", name)
}

/// Marker for a module whose execution panicked
pub fn mod_exec_panic(name: &str) -> String {
    format!("MOD_EXEC_PANIC({})", name)
}
