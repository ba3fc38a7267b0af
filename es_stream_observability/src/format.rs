//! Human-readable log line format.
//!
//! `[LEVEL] [mm-dd|hh:mm:ss.sss] message code=... key=...`

use std::fmt;
use std::io;

use nu_ansi_term::Color;
use time::format_description::OwnedFormatItem;
use tracing::{Event, Level, Subscriber, field, span};
use tracing_subscriber::field::{RecordFields, VisitFmt, VisitOutput};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

const TIME_FORMAT: &str =
    r#"\[[month]-[day]|[hour]:[minute]:[second].[subsecond digits:3]\]"#;

pub struct StreamFormat {
    time_format: Option<OwnedFormatItem>,
}

impl Default for StreamFormat {
    fn default() -> Self {
        let time_format = time::format_description::parse_owned::<2>(TIME_FORMAT).ok();
        Self { time_format }
    }
}

impl StreamFormat {
    fn format_time(&self, writer: &mut Writer<'_>) -> fmt::Result {
        let Some(time_format) = &self.time_format else {
            return Err(fmt::Error);
        };

        let now = time::OffsetDateTime::from(std::time::SystemTime::now());
        let mut adaptor = WriteAdaptor { inner: writer };
        now.format_into(&mut adaptor, time_format)
            .map_err(|_| fmt::Error)?;
        Ok(())
    }
}

impl<S, N> FormatEvent<S, N> for StreamFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let level = event.metadata().level();
        write_level(&mut writer, level)?;
        writer.write_char(' ')?;

        if self.format_time(&mut writer).is_err() {
            writer.write_str("[<unknown-timestamp>]")?;
        }
        writer.write_char(' ')?;

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

impl<'w> FormatFields<'w> for StreamFormat {
    fn format_fields<R: RecordFields>(&self, writer: Writer<'w>, fields: R) -> fmt::Result {
        let mut visitor = FieldVisitor::new(writer, true);
        fields.record(&mut visitor);
        visitor.finish()
    }

    fn add_fields(
        &self,
        current: &'w mut FormattedFields<Self>,
        fields: &span::Record<'_>,
    ) -> fmt::Result {
        let is_empty = current.is_empty();
        let mut visitor = FieldVisitor::new(current.as_writer(), is_empty);
        fields.record(&mut visitor);
        visitor.finish()
    }
}

fn write_level(writer: &mut Writer<'_>, level: &Level) -> fmt::Result {
    let (label, color) = match *level {
        Level::TRACE => ("TRACE", Color::Purple),
        Level::DEBUG => ("DEBUG", Color::Blue),
        Level::INFO => ("INFO", Color::Green),
        Level::WARN => ("WARN", Color::Yellow),
        Level::ERROR => ("ERROR", Color::Red),
    };

    if writer.has_ansi_escapes() {
        write!(writer, "[{}]", color.paint(label))
    } else {
        write!(writer, "[{label}]")
    }
}

struct FieldVisitor<'a> {
    writer: Writer<'a>,
    is_empty: bool,
    result: fmt::Result,
}

impl<'a> FieldVisitor<'a> {
    fn new(writer: Writer<'a>, is_empty: bool) -> Self {
        Self {
            writer,
            is_empty,
            result: Ok(()),
        }
    }

    fn separator(&mut self) -> &'static str {
        if std::mem::take(&mut self.is_empty) {
            ""
        } else {
            " "
        }
    }
}

impl field::Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &field::Field, value: &str) {
        if field.name() == "message" {
            self.record_debug(field, &format_args!("{value}"));
        } else {
            self.record_debug(field, &value);
        }
    }

    fn record_debug(&mut self, field: &field::Field, value: &dyn fmt::Debug) {
        if self.result.is_err() {
            return;
        }

        let separator = self.separator();
        self.result = match field.name() {
            "message" => write!(self.writer, "{separator}{value:?}"),
            name => {
                let color = match name {
                    "error" => Color::Red,
                    "code" => Color::Yellow,
                    _ => Color::Blue,
                };

                if self.writer.has_ansi_escapes() {
                    let value = format!("{value:?}");
                    write!(self.writer, "{separator}{name}={}", color.paint(value))
                } else {
                    write!(self.writer, "{separator}{name}={value:?}")
                }
            }
        };
    }
}

impl VisitOutput<fmt::Result> for FieldVisitor<'_> {
    fn finish(self) -> fmt::Result {
        self.result
    }
}

impl VisitFmt for FieldVisitor<'_> {
    fn writer(&mut self) -> &mut dyn fmt::Write {
        &mut self.writer
    }
}

struct WriteAdaptor<'a, 'w> {
    inner: &'a mut Writer<'w>,
}

impl io::Write for WriteAdaptor<'_, '_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.inner.write_str(s).map_err(io::Error::other)?;
        Ok(s.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
