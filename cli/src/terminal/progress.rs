use std::io::Write;
use std::sync::OnceLock;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use keyprobe_core::scanner::ledger::ScanProgress;

const TICK: Duration = Duration::from_millis(100);
const TIP: &str = "press 'q' to stop early";

pub struct ProgressHandle {
    bar: ProgressBar,
}

impl ProgressHandle {
    pub fn update(&self, progress: ScanProgress) {
        self.bar.set_position(progress.completed as u64);
        if progress.successes > 0 {
            self.bar.set_message(format!(
                "{} credentials found",
                progress.successes.to_string().green().bold()
            ));
        }
    }

    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }

    fn is_drawing(&self) -> bool {
        !self.bar.is_finished() && !self.bar.is_hidden()
    }
}

static PROGRESS: OnceLock<ProgressHandle> = OnceLock::new();

/// Starts the scan progress bar. Only one bar exists per process; later calls
/// return the bar that is already running.
pub fn start(total: usize, interactive: bool, quiet: u8) -> &'static ProgressHandle {
    PROGRESS.get_or_init(|| ProgressHandle {
        bar: build_bar(total, interactive, quiet),
    })
}

/// Any quiet level hides the bar.
fn build_bar(total: usize, interactive: bool, quiet: u8) -> ProgressBar {
    if quiet > 0 {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template("{spinner:.blue} [{bar:30.green/bright_black}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ])
        .progress_chars("━╸ ");

    bar.set_style(style);
    if interactive {
        bar.set_message(format!("{}", TIP.italic().white()));
    }
    bar.enable_steady_tick(TICK);
    bar
}

/// Log writer that prints above a running progress bar instead of tearing it.
pub struct ProgressWriter;

impl Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match PROGRESS.get() {
            Some(handle) if handle.is_drawing() => {
                let msg = String::from_utf8_lossy(buf);
                handle.bar.println(msg.trim_end());
                Ok(buf.len())
            }
            _ => std::io::stdout().write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stdout().flush()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
