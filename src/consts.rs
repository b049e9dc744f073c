//! Project-wide defaults. All of these are CLI-overridable deployment
//! knobs; none are baked into the core.

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3001;

/// Default per-request engine deadline, measured from spawn.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default cap on concurrent engine processes.
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Default engine program.
pub const DEFAULT_ENGINE_PROGRAM: &str = "python3";

/// Default engine arguments. The trailing `-` tells the recovery script
/// to read its input from stdin.
pub fn default_engine_args() -> Vec<String> {
    vec!["wallet_recovery.py".to_string(), "-".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_reads_from_stdin_by_default() {
        assert_eq!(default_engine_args().last().map(String::as_str), Some("-"));
    }
}
