//! Explicitly positioned text runs.

use super::sink::{ContentSink, FontHandle};
use crate::error::Result;

/// Leading used for multi-line runs without an explicit line spacing,
/// relative to the font size.
const DEFAULT_LEADING_FACTOR: f32 = 1.2;

/// One text object: font, origin, and one or more lines.
///
/// A run carries all of its positioning so that nothing depends on
/// coordinates left over from earlier content.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Font to show the text with
    pub font: FontHandle,
    /// Font size in points
    pub size: f32,
    /// Origin of the first line, in user space
    pub origin: (f32, f32),
    /// Distance between baselines of consecutive lines
    pub leading: Option<f32>,
    /// Lines, top to bottom
    pub lines: Vec<String>,
}

impl TextRun {
    /// Create an empty run at the page origin.
    pub fn new(font: FontHandle, size: f32) -> Self {
        Self {
            font,
            size,
            origin: (0.0, 0.0),
            leading: None,
            lines: Vec::new(),
        }
    }

    /// Set the origin of the first line.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.origin = (x, y);
        self
    }

    /// Set the line spacing.
    pub fn with_leading(mut self, leading: f32) -> Self {
        self.leading = Some(leading);
        self
    }

    /// Append a line.
    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }

    /// Line spacing actually emitted for multi-line runs.
    pub fn effective_leading(&self) -> f32 {
        self.leading.unwrap_or(self.size * DEFAULT_LEADING_FACTOR)
    }

    /// Emit the run as one text object.
    pub fn emit<S: ContentSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        sink.begin_text_run()?;
        sink.set_font(&self.font, self.size)?;
        if self.leading.is_some() || self.lines.len() > 1 {
            sink.set_line_spacing(self.effective_leading())?;
        }
        sink.move_to(self.origin.0, self.origin.1)?;

        let mut lines = self.lines.iter();
        if let Some(first) = lines.next() {
            sink.show_text(first)?;
        }
        for line in lines {
            sink.next_line_show_text(line)?;
        }

        sink.end_text_run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentStreamBuilder;
    use crate::encoding::FontEncoding;

    fn font() -> FontHandle {
        FontHandle::new("F1", FontEncoding::WinAnsi)
    }

    fn render(run: &TextRun) -> String {
        let mut builder = ContentStreamBuilder::new();
        run.emit(&mut builder).unwrap();
        String::from_utf8_lossy(&builder.build().unwrap()).into_owned()
    }

    #[test]
    fn test_single_line() {
        let run = TextRun::new(font(), 12.0).at(100.0, 800.0).line("This is some english text.");
        assert_eq!(
            render(&run),
            "BT\n/F1 12 Tf\n100 800 Td\n(This is some english text.) Tj\nET\n"
        );
    }

    #[test]
    fn test_two_lines_with_leading() {
        let run = TextRun::new(font(), 12.0)
            .at(50.0, 200.0)
            .with_leading(14.0)
            .line("Bundestags-")
            .line("rest.");
        assert_eq!(
            render(&run),
            "BT\n/F1 12 Tf\n14 TL\n50 200 Td\n(Bundestags-) Tj\n(rest.) '\nET\n"
        );
    }

    #[test]
    fn test_default_leading_for_multi_line() {
        let run = TextRun::new(font(), 10.0).line("a").line("b");
        assert!((run.effective_leading() - 12.0).abs() < 1e-4);
        assert!(render(&run).contains(" TL\n"));
    }
}
