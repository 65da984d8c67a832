use crate::codegen::CompileError;
use crate::parser::ParseError;
use ariadne::{Color, Label, Report, ReportKind, Source};
use std::io;
use std::ops::Range;

/// Span of the first block of type `block_type` in the source, falling back
/// to the document start.
fn block_span(source: &str, block_type: Option<&str>) -> Range<usize> {
    block_type
        .and_then(|kind| {
            let needle = format!("type=\"{}\"", kind);
            source
                .find(&needle)
                .map(|start| start..start + needle.len())
        })
        .unwrap_or(0..std::cmp::min(1, source.len()))
}

/// Display a parse error with ariadne formatting
pub fn display_parse_error(source: &str, filename: &str, error: &ParseError) -> io::Result<()> {
    let span = match error {
        ParseError::MissingAttribute { element, .. } => source
            .find(&format!("<{}", element))
            .map(|start| start..start + element.len() + 1)
            .unwrap_or(0..std::cmp::min(1, source.len())),
        _ => 0..std::cmp::min(1, source.len()),
    };

    Report::build(ReportKind::Error, filename, span.start)
        .with_message("Parse error")
        .with_label(
            Label::new((filename, span))
                .with_message(error.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .eprint((filename, Source::from(source)))
}

/// Display a compile error with ariadne formatting
pub fn display_compile_error(
    source: &str,
    filename: &str,
    error: &CompileError,
) -> io::Result<()> {
    let span = block_span(source, error.block_type());

    Report::build(ReportKind::Error, filename, span.start)
        .with_message("Compile error")
        .with_label(
            Label::new((filename, span))
                .with_message(error.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .eprint((filename, Source::from(source)))
}
