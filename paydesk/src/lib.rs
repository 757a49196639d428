//! PayDesk - payment request approvals
//!
//! - core: configuration, session context, route guard, navigation
//! - form: multi-template request form builder
//! - views: lists, queues, dashboard, analytics, admin screens
//! - export: request PDFs and the analytics CSV
//! - commands: the `paydesk` command line

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub use paydesk_client;
pub use shared;

pub mod commands;
pub mod core;
pub mod export;
pub mod form;
pub mod views;

pub const LOG_FILE_PREFIX: &str = "paydesk.log";

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

fn env_filter(level: &str) -> EnvFilter {
    if let Ok(from_env) = EnvFilter::try_from_default_env() {
        return from_env;
    }
    EnvFilter::try_new(format!("{level},hyper=warn,reqwest=warn"))
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"))
}

/// Install the global subscriber.
///
/// Logs go to stderr (stdout carries command output) and, when `log_dir` is
/// set, to a daily rolling file. Keep the returned guard alive until exit or
/// buffered file lines are lost.
pub fn init_logging(level: &str, log_dir: Option<&Path>) -> std::io::Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let (writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, LOG_FILE_PREFIX));
            let layer = fmt::layer()
                .with_timer(LocalTimer)
                .with_ansi(false)
                .with_target(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stderr_layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(file_layer)
        .with(stderr_layer)
        .init();

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        let msg = info.to_string();
        eprintln!("!!! PAYDESK PANIC !!!\nMessage: {}\nBacktrace:\n{}", msg, backtrace);
        tracing::error!(target: "panic", message = %msg, backtrace = %backtrace, "panic occurred");
    }));

    if let Some(dir) = log_dir {
        tracing::debug!(path = %dir.display(), "File logging enabled");
    }
    Ok(guard)
}
