//! Logger installation for the `log` facade.
//!
//! By default records go to the system log (facility `daemon`, tagged
//! `<program>[<pid>]`), which is where a background service's output is
//! collected. `LogTarget::Stderr` uses `env_logger` instead.
//!
//! Severity mapping onto syslog priorities:
//!
//! | Record                  | `log` level | syslog        |
//! |-------------------------|-------------|---------------|
//! | fatal (`fatal:` prefix) | `error!`    | `LOG_ERR`     |
//! | error                   | `error!`    | `LOG_ERR`     |
//! | warning                 | `warn!`     | `LOG_WARNING` |
//! | notice, info            | `info!`     | `LOG_INFO`    |
//! | debug                   | `debug!`    | `LOG_DEBUG`   |

use anyhow::anyhow;
use log::{LevelFilter, warn};
use syslog::{BasicLogger, Facility, Formatter3164};

use crate::config::LogTarget;

/// Level named by `RUST_LOG` if it is a bare level, else `Info`.
pub fn level_from(var: Option<&str>) -> LevelFilter {
    var.and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Install the global logger. Falls back to stderr when the system log
/// socket cannot be reached. Returns the target actually in use.
pub fn init(program: &str, target: LogTarget) -> LogTarget {
    match target {
        LogTarget::Syslog => {
            let level = level_from(std::env::var("RUST_LOG").ok().as_deref());
            match init_syslog(program, level) {
                Ok(()) => LogTarget::Syslog,
                Err(e) => {
                    init_stderr();
                    warn!("syslog unavailable ({:#}), logging to stderr", e);
                    LogTarget::Stderr
                }
            }
        }
        LogTarget::Stderr => {
            init_stderr();
            LogTarget::Stderr
        }
    }
}

fn init_syslog(program: &str, level: LevelFilter) -> anyhow::Result<()> {
    let formatter = Formatter3164 {
        facility: Facility::LOG_DAEMON,
        hostname: None,
        process: program.to_owned(),
        pid: std::process::id(),
    };
    let logger = syslog::unix(formatter).map_err(|e| anyhow!("{}", e))?;
    log::set_boxed_logger(Box::new(BasicLogger::new(logger)))?;
    log::set_max_level(level);
    Ok(())
}

fn init_stderr() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
