//! Log line formatter that stamps each event with the wall time and the current frame number.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

/// Frame number shown in log lines. Written by the game loop, read by the formatter.
static FRAME: AtomicU64 = AtomicU64::new(0);

const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond digits:4]");

pub fn set_frame(frame: u64) {
    FRAME.store(frame, Ordering::Relaxed);
}

pub fn current_frame() -> u64 {
    FRAME.load(Ordering::Relaxed)
}

/// `HH:MM:SS.ssss #frame LEVEL spans: target: fields`
///
/// ANSI styling is applied only when the writer supports it.
pub struct FrameFormatter;

impl<S, N> FormatEvent<S, N> for FrameFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        let timestamp = OffsetDateTime::now_utc().format(&TIMESTAMP_FORMAT).map_err(|_| fmt::Error)?;
        paint(&mut writer, ansi, Style::Dim, timestamp)?;
        writer.write_char(' ')?;
        paint(&mut writer, ansi, Style::Dim, format_args!("#{:<6}", current_frame()))?;
        writer.write_char(' ')?;

        let (style, label) = level_label(meta.level());
        paint(&mut writer, ansi, style, label)?;
        writer.write_char(' ')?;

        if let Some(scope) = ctx.event_scope() {
            let mut any = false;
            for span in scope.from_root() {
                any = true;
                paint(&mut writer, ansi, Style::Bold, span.metadata().name())?;
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>().filter(|fields| !fields.is_empty()) {
                    paint(&mut writer, ansi, Style::Bold, "{")?;
                    write!(writer, "{fields}")?;
                    paint(&mut writer, ansi, Style::Bold, "}")?;
                }
                paint(&mut writer, ansi, Style::Dim, ':')?;
            }
            if any {
                writer.write_char(' ')?;
            }
        }

        paint(&mut writer, ansi, Style::Dim, format_args!("{}:", meta.target()))?;
        writer.write_char(' ')?;

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[derive(Clone, Copy)]
enum Style {
    Dim,
    Bold,
    Color(&'static str),
}

fn level_label(level: &Level) -> (Style, &'static str) {
    match *level {
        Level::TRACE => (Style::Color("\x1b[35m"), "TRACE"),
        Level::DEBUG => (Style::Color("\x1b[34m"), "DEBUG"),
        Level::INFO => (Style::Color("\x1b[32m"), " INFO"),
        Level::WARN => (Style::Color("\x1b[33m"), " WARN"),
        Level::ERROR => (Style::Color("\x1b[31m"), "ERROR"),
    }
}

fn paint(writer: &mut Writer<'_>, ansi: bool, style: Style, value: impl fmt::Display) -> fmt::Result {
    if !ansi {
        return write!(writer, "{value}");
    }
    let code = match style {
        Style::Dim => "\x1b[2m",
        Style::Bold => "\x1b[1m",
        Style::Color(code) => code,
    };
    write!(writer, "{code}{value}\x1b[0m")
}
