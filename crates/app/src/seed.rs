//! Seed selection for the desktop app.
//! This module exists so a session can be pinned with `--seed` or left to the clock.
//! It does not derive per-round seeds; the round does that from this value.

use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionSeed {
    Pinned(u64),
    Clock(u64),
}

impl SessionSeed {
    pub fn value(self) -> u64 {
        match self {
            Self::Pinned(seed) | Self::Clock(seed) => seed,
        }
    }
}

/// Seed from the wall clock and process id, spread with a splitmix finaliser.
pub fn clock_seed() -> u64 {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_nanos());
    let folded = (nanos as u64) ^ ((nanos >> 64) as u64) ^ u64::from(process::id()).rotate_left(32);
    splitmix(folded)
}

/// Reads `--seed N` or `--seed=N`, skipping the program name.
pub fn session_seed<I>(args: I, clock: u64) -> Result<SessionSeed, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().skip(1);
    let mut pinned = None;
    while let Some(arg) = args.next() {
        let raw = if arg == "--seed" {
            args.next().ok_or_else(|| "--seed needs a value".to_string())?
        } else if let Some(value) = arg.strip_prefix("--seed=") {
            value.to_string()
        } else {
            continue;
        };
        if pinned.is_some() {
            return Err("--seed given twice".to_string());
        }
        let seed = raw.parse::<u64>().map_err(|_| format!("--seed '{raw}' is not a u64"))?;
        pinned = Some(seed);
    }
    Ok(pinned.map_or(SessionSeed::Clock(clock), SessionSeed::Pinned))
}

fn splitmix(mut value: u64) -> u64 {
    value = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    value = (value ^ (value >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value = (value ^ (value >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}
