use colored::*;
use keyprobe_common::log::{TARGET_DEBUG, TARGET_ERROR, TARGET_INFO, TARGET_SUCCESS, TARGET_WARN};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::registry::LookupSpan;

use crate::terminal::progress::ProgressWriter;

/// Target of lines that are printed as-is, without a glyph.
pub const TARGET_PRINT: &str = "keyprobe::print";

pub struct KeyprobeFormatter;

impl<S, N> FormatEvent<S, N> for KeyprobeFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> std::fmt::Result {
        let meta = event.metadata();

        if meta.target() == TARGET_PRINT {
            let mut visitor = RawMessage::default();
            event.record(&mut visitor);
            return writeln!(writer, "{}", visitor.0);
        }

        let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) = match (meta.target(), *meta.level()) {
            (TARGET_SUCCESS, _) => ("[+]", |s| s.green().bold()),
            (TARGET_INFO, _) => ("[*]", |s| s.blue().bold()),
            (TARGET_WARN, _) => ("[!]", |s| s.yellow().bold()),
            (TARGET_ERROR, _) => ("[-]", |s| s.red().bold()),
            (TARGET_DEBUG, _) => ("[?]", |s| s.dimmed()),
            (_, Level::TRACE) => ("[ ]", |s| s.dimmed()),
            (_, Level::DEBUG) => ("[?]", |s| s.dimmed()),
            (_, Level::INFO) => ("[*]", |s| s.blue().bold()),
            (_, Level::WARN) => ("[!]", |s| s.yellow().bold()),
            (_, Level::ERROR) => ("[-]", |s| s.red().bold()),
        };

        write!(writer, "{} ", color_func(symbol.into()))?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

#[derive(Default)]
struct RawMessage(String);

impl Visit for RawMessage {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "raw_msg" {
            self.0 = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "raw_msg" {
            self.0 = format!("{value:?}");
        }
    }
}

/// `-v` enables debug output, `-vv` trace output; `-q` keeps warnings and
/// errors only, `-qq` errors only. Printed results are never filtered.
/// `RUST_LOG` overrides the level.
pub fn init_logging(verbose: u8, quiet: u8) {
    let level: &str = match (verbose, quiet) {
        (0, 0) => "info",
        (1, 0) => "debug",
        (_, 0) => "trace",
        (_, 1) => "warn",
        _ => "error",
    };
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if let Ok(directive) = format!("{TARGET_PRINT}=info").parse::<Directive>() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(KeyprobeFormatter)
        .with_writer(|| ProgressWriter)
        .init();
}
