//! Value rendering
//!
//! Values are converted to `serde_json::Value` first. Its object maps are
//! ordered by key, which gives every rendering the same sorted key order.

use std::fs::File;
use std::io::{BufWriter, Write};

use serde::Serialize;
use serde_json::Value;

use lv_core::{OutputTarget, Result, RunConfig, TextEncoding};

use super::{JqFormatter, OutputContext};

/// Per-call overrides; `None` falls back to the run's settings
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub compact: Option<bool>,
    pub colorize: Option<bool>,
    pub raw: Option<bool>,
}

impl RenderOptions {
    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = Some(compact);
        self
    }

    pub fn colorize(mut self, colorize: bool) -> Self {
        self.colorize = Some(colorize);
        self
    }

    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = Some(raw);
        self
    }
}

/// Renders values to standard output or the configured output file
#[derive(Debug, Clone)]
pub struct Renderer {
    raw: bool,
    compact: bool,
    output: OutputTarget,
    encoding: TextEncoding,
    formatter: JqFormatter,
}

impl Renderer {
    /// Create a renderer from the run's settings
    pub fn new(config: &RunConfig) -> Self {
        Self {
            raw: config.raw,
            compact: config.compact,
            output: config.output.clone(),
            encoding: config.encoding,
            formatter: JqFormatter::new(),
        }
    }

    /// Use a different colorizing formatter
    pub fn with_formatter(mut self, formatter: JqFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Render `value` to its destination
    ///
    /// In raw mode a string is written to standard output as-is. Everything
    /// else is JSON, colorized through the formatter only when the
    /// destination is a colorizable standard output.
    pub fn render<T>(
        &self,
        streams: &mut OutputContext,
        value: &T,
        options: RenderOptions,
    ) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value)?;

        if options.raw.unwrap_or(self.raw)
            && let Value::String(text) = &value
        {
            streams.stdout.write_all(text.as_bytes())?;
            streams.stdout.flush()?;
            return Ok(());
        }

        let compact = options.compact.unwrap_or(self.compact);
        let colorize = options.colorize.unwrap_or(true);

        match &self.output {
            OutputTarget::Stdout => {
                let text = if colorize && streams.stdout.colorize() {
                    let input = serde_json::to_string(&value)?;
                    self.formatter.format(&input, compact)?
                } else {
                    to_json_text(&value, compact)?
                };
                streams.stdout.write_all(text.as_bytes())?;
                streams.stdout.flush()?;
            }
            OutputTarget::File(path) => {
                tracing::debug!(path = %path.display(), "Writing output file");
                let mut file = BufWriter::new(File::create(path)?);
                let text = to_json_text(&value, compact)?;
                match self.encoding {
                    TextEncoding::Utf8 => file.write_all(text.as_bytes())?,
                }
                file.flush()?;
            }
        }

        Ok(())
    }
}

/// Serialize as JSON text with a trailing newline
///
/// Compact output has no whitespace; pretty output indents by two spaces.
pub fn to_json_text(value: &Value, compact: bool) -> Result<String> {
    let mut text = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::colorize::tests::jq_available;
    use crate::output::{OutputStream, SharedBuffer};
    use lv_core::Error;
    use serde_json::json;

    #[derive(Serialize)]
    struct Upload {
        zeta: u32,
        bucket: &'static str,
        alpha: Vec<bool>,
    }

    fn upload() -> Upload {
        Upload {
            zeta: 7,
            bucket: "artifacts",
            alpha: vec![true, false],
        }
    }

    fn streams(terminal: bool) -> (OutputContext, SharedBuffer) {
        let out = SharedBuffer::new();
        let mut ctx = OutputContext::new(
            OutputStream::new(out.clone(), terminal),
            OutputStream::new(SharedBuffer::new(), false),
        );
        ctx.enable_color(false);
        (ctx, out)
    }

    #[test]
    fn test_pretty_sorted_with_newline() {
        let (mut ctx, out) = streams(false);
        let renderer = Renderer::new(&RunConfig::default());
        renderer
            .render(&mut ctx, &upload(), RenderOptions::default())
            .unwrap();

        let text = out.contents();
        assert_eq!(
            text,
            "{\n  \"alpha\": [\n    true,\n    false\n  ],\n  \"bucket\": \"artifacts\",\n  \"zeta\": 7\n}\n"
        );
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, serde_json::to_value(upload()).unwrap());
    }

    #[test]
    fn test_compact_output() {
        let (mut ctx, out) = streams(false);
        let renderer = Renderer::new(&RunConfig::default());
        renderer
            .render(&mut ctx, &upload(), RenderOptions::default().compact(true))
            .unwrap();
        let text = out.contents();
        insta::assert_snapshot!(
            text.trim_end(),
            @r#"{"alpha":[true,false],"bucket":"artifacts","zeta":7}"#
        );
    }

    #[test]
    fn test_compact_is_pretty_without_whitespace() {
        let value = json!({"b": {"y": [1, 2], "x": "s p a c e"}, "a": null});
        let pretty = to_json_text(&value, false).unwrap();
        let compact = to_json_text(&value, true).unwrap();

        let reparsed: Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(compact, to_json_text(&reparsed, true).unwrap());
        assert!(compact.ends_with('\n'));
        assert_eq!(compact.matches('\n').count(), 1);
    }

    #[test]
    fn test_compact_default_from_config() {
        let (mut ctx, out) = streams(false);
        let config = RunConfig {
            compact: true,
            ..Default::default()
        };
        Renderer::new(&config)
            .render(&mut ctx, &json!({"k": 1}), RenderOptions::default())
            .unwrap();
        assert_eq!(out.contents(), "{\"k\":1}\n");
    }

    #[test]
    fn test_raw_string_is_verbatim() {
        let (mut ctx, out) = streams(true);
        ctx.enable_color(false);
        let renderer = Renderer::new(&RunConfig::default());
        renderer
            .render(
                &mut ctx,
                "hello",
                RenderOptions::default().raw(true).compact(false),
            )
            .unwrap();
        assert_eq!(out.contents(), "hello");
    }

    #[test]
    fn test_raw_ignores_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let config = RunConfig {
            raw: true,
            output: OutputTarget::File(path.clone()),
            ..Default::default()
        };
        let (mut ctx, out) = streams(false);
        Renderer::new(&config)
            .render(&mut ctx, "0.1.0", RenderOptions::default())
            .unwrap();
        assert_eq!(out.contents(), "0.1.0");
        assert!(!path.exists());
    }

    #[test]
    fn test_raw_non_string_is_json() {
        let (mut ctx, out) = streams(false);
        Renderer::new(&RunConfig::default())
            .render(&mut ctx, &json!([1]), RenderOptions::default().raw(true).compact(true))
            .unwrap();
        assert_eq!(out.contents(), "[1]\n");
    }

    #[test]
    fn test_file_destination_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "previous contents that are much longer\n").unwrap();

        let config = RunConfig {
            output: OutputTarget::File(path.clone()),
            compact: true,
            ..Default::default()
        };
        let (mut ctx, out) = streams(true);
        Renderer::new(&config)
            .with_formatter(JqFormatter::with_program("false"))
            .render(&mut ctx, &json!({"b": 2, "a": 1}), RenderOptions::default())
            .unwrap();

        // Never colorized, so the failing formatter is not consulted
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"a\":1,\"b\":2}\n");
        assert_eq!(out.contents(), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_formatter_writes_nothing() {
        let (mut ctx, out) = streams(true);
        let renderer =
            Renderer::new(&RunConfig::default()).with_formatter(JqFormatter::with_program("false"));
        let err = renderer
            .render(&mut ctx, &json!({"a": 1}), RenderOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Subprocess { status: 1, .. }));
        assert_eq!(out.contents(), "");
    }

    #[test]
    fn test_colorize_false_skips_formatter() {
        let (mut ctx, out) = streams(true);
        let renderer =
            Renderer::new(&RunConfig::default()).with_formatter(JqFormatter::with_program("false"));
        renderer
            .render(
                &mut ctx,
                &json!({"a": 1}),
                RenderOptions::default().colorize(false).compact(true),
            )
            .unwrap();
        assert_eq!(out.contents(), "{\"a\":1}\n");
    }

    #[test]
    fn test_colorized_with_jq() {
        if !jq_available() {
            return;
        }
        let (mut ctx, out) = streams(true);
        Renderer::new(&RunConfig::default())
            .render(&mut ctx, &json!({"a": 1}), RenderOptions::default().compact(true))
            .unwrap();
        let text = out.contents();
        assert!(text.contains("\x1b["));
        assert!(text.contains("\"a\""));
    }
}
