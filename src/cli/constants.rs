// cli/constants.rs: program identity, display level and the user-facing
// output macros shared by every subcommand.

use std::sync::atomic::{AtomicU32, Ordering};

// ── Identity ──────────────────────────────────────────────────────────────────
pub const COMPRESSOR_NAME: &str = "lzip";
pub const LZIP_EXTENSION: &str = ".lz";

/// Input/output name meaning standard input or standard output.
pub const STDIO_MARK: &str = "-";

// ── Sweep grid defaults ───────────────────────────────────────────────────────
pub const SWEEP_DICTIONARY_SIZES: [u32; 11] = [
    65_535,
    1 << 12,
    1 << 20,
    3 << 19,
    1 << 21,
    3 << 20,
    1 << 22,
    1 << 23,
    1 << 24,
    3 << 23,
    1 << 25,
];

pub const SWEEP_MATCH_LEN_LIMITS: [u32; 11] = [5, 6, 8, 12, 16, 20, 36, 68, 132, 192, 273];

// ── Display level ─────────────────────────────────────────────────────────────
//
// 0 = no output; 1 = errors only; 2 = normal; 3 = verbose; 4 = debug
pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Display level after applying `-q` / `-v` counts to the default.
pub fn display_level_from_flags(quiet: u8, verbose: u8) -> u32 {
    (2 + u32::from(verbose)).saturating_sub(u32::from(quiet))
}

// ── Display helpers ───────────────────────────────────────────────────────────

/// Print to stdout.
#[macro_export]
macro_rules! displayout {
    ($($arg:tt)*) => { print!($($arg)*) };
}

/// Print to stderr.
#[macro_export]
macro_rules! display {
    ($($arg:tt)*) => { eprint!($($arg)*) };
}

/// Print to stderr when the display level is at least `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::cli::constants::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}
