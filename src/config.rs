//! `pio-delay.toml`: solver defaults for the command-line front end.
//!
//! The file is a small TOML subset: `[section]` headers, `key = value`
//! lines, `#` comments, integers, floats and double-quoted strings.
//! Every key and value is tracked by byte span so mistakes are reported
//! against the exact text that caused them.
//!
//! ```toml
//! [solver]
//! max_val = 31
//! variant = "hybrid"
//! radius = 5
//!
//! [table]
//! max_n = 1024
//!
//! [clock]
//! frequency_hz = 133_000_000
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::diagnostic::{render_diagnostics, Diagnostic};
use crate::frame::DEFAULT_CLOCK_HZ;
use crate::search::Variant;
use crate::span::{Span, Spanned};
use crate::table::{DEFAULT_TABLE_LEN, MAX_TABLE_LEN};
use crate::triple::MAX_COUNTER;

/// Name looked up in the working directory when no path is given.
pub const CONFIG_FILE: &str = "pio-delay.toml";

const SECTIONS: [&str; 3] = ["solver", "table", "clock"];

#[derive(Clone, Debug)]
pub struct Config {
    pub max_val: u32,
    /// The file's variant with its parameters applied.
    pub variant: Variant,
    pub table_len: u32,
    pub clock_hz: f64,
    /// Variant parameters as written, whichever variant the file selects.
    /// A command-line `--variant` can make them apply.
    pub radius: Option<Spanned<u8>>,
    pub error_weight: Option<Spanned<u32>>,
    pub footprint_weight: Option<Spanned<u32>>,
}

/// Variant parameters given on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VariantFlags {
    pub radius: Option<u8>,
    pub error_weight: Option<u32>,
    pub footprint_weight: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_val: MAX_COUNTER as u32,
            variant: Variant::CostModel,
            table_len: DEFAULT_TABLE_LEN,
            clock_hz: DEFAULT_CLOCK_HZ,
            radius: None,
            error_weight: None,
            footprint_weight: None,
        }
    }
}

impl Config {
    /// Find `pio-delay.toml` in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        let path = dir.join(CONFIG_FILE);
        path.is_file().then_some(path)
    }

    pub fn parse(source: &str) -> Result<Config, Vec<Diagnostic>> {
        let mut parser = ConfigParser::default();
        parser.run(source);
        parser.finish()
    }

    /// Resolve the variant to run.
    ///
    /// The kind is `selected` if given, else the file's. Each parameter
    /// comes from `flags`, then from this file, then from the selected
    /// variant itself.
    pub fn merge_variant(&self, selected: Option<Variant>, flags: VariantFlags) -> Variant {
        match selected.unwrap_or(self.variant) {
            Variant::Hybrid { radius } => Variant::Hybrid {
                radius: flags.radius.or(self.file_radius()).unwrap_or(radius),
            },
            Variant::Constrained {
                error_weight,
                footprint_weight,
            } => {
                let (file_error, file_footprint) = self.file_weights();
                Variant::Constrained {
                    error_weight: flags.error_weight.or(file_error).unwrap_or(error_weight),
                    footprint_weight: flags
                        .footprint_weight
                        .or(file_footprint)
                        .unwrap_or(footprint_weight),
                }
            }
            other => other,
        }
    }

    fn file_radius(&self) -> Option<u8> {
        match self.variant {
            Variant::Hybrid { radius } => Some(radius),
            _ => self.radius.as_ref().map(|r| r.node),
        }
    }

    fn file_weights(&self) -> (Option<u32>, Option<u32>) {
        match self.variant {
            Variant::Constrained {
                error_weight,
                footprint_weight,
            } => (Some(error_weight), Some(footprint_weight)),
            _ => (
                self.error_weight.as_ref().map(|w| w.node),
                self.footprint_weight.as_ref().map(|w| w.node),
            ),
        }
    }

    /// Warnings for file keys that do nothing under the variant that will
    /// actually run.
    pub fn ignored_keys(&self, running: Variant) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        let name = running.name();
        if !matches!(running, Variant::Hybrid { .. }) {
            if let Some(r) = &self.radius {
                out.push(ignored("radius", "hybrid", name, r.span));
            }
        }
        if !matches!(running, Variant::Constrained { .. }) {
            let weights = [
                ("error_weight", self.error_weight.as_ref().map(|w| w.span)),
                ("footprint_weight", self.footprint_weight.as_ref().map(|w| w.span)),
            ];
            for (key, span) in weights {
                if let Some(span) = span {
                    out.push(ignored(key, "constrained", name, span));
                }
            }
        }
        out
    }
}

fn ignored(key: &str, wanted: &str, actual: &str, span: Span) -> Diagnostic {
    Diagnostic::warning(
        format!("'{}' has no effect with variant \"{}\"", key, actual),
        span,
    )
    .with_help(format!("set variant = \"{}\" to use it", wanted))
}

// ---------------------------------------------------------------------------
// Source file
// ---------------------------------------------------------------------------

/// A configuration file held in memory so diagnostics can quote it.
#[derive(Clone, Debug)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub text: String,
}

impl ConfigSource {
    pub fn read(path: &Path) -> Result<Self, Diagnostic> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Diagnostic::error(
                format!("cannot read '{}': {}", path.display(), e),
                Span::dummy(),
            )
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }

    pub fn parse(&self) -> Result<Config, Vec<Diagnostic>> {
        Config::parse(&self.text)
    }

    /// Render diagnostics against this file's text.
    pub fn render(&self, diagnostics: &[Diagnostic]) {
        render_diagnostics(diagnostics, &self.path.display().to_string(), &self.text);
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ConfigParser {
    diagnostics: Vec<Diagnostic>,
    seen: HashSet<(String, String)>,
    max_val: Option<Spanned<u32>>,
    variant: Option<Spanned<Variant>>,
    radius: Option<Spanned<u32>>,
    error_weight: Option<Spanned<u32>>,
    footprint_weight: Option<Spanned<u32>>,
    table_len: Option<Spanned<u32>>,
    clock_hz: Option<Spanned<f64>>,
}

impl ConfigParser {
    fn run(&mut self, source: &str) {
        let mut section = String::new();
        let mut offset = 0usize;

        for line in source.split_inclusive('\n') {
            let line_start = offset;
            offset += line.len();

            let body = line.trim_end_matches(['\n', '\r']);
            let body = match find_comment(body) {
                Some(i) => &body[..i],
                None => body,
            };
            let trimmed = body.trim();
            if trimmed.is_empty() {
                continue;
            }
            let start = line_start + (body.len() - body.trim_start().len());

            if trimmed.starts_with('[') {
                let span = Span::at(start, trimmed.len());
                if !trimmed.ends_with(']') {
                    self.error("unterminated section header".to_string(), span);
                    continue;
                }
                let name = trimmed[1..trimmed.len() - 1].trim();
                if !SECTIONS.contains(&name) {
                    self.diagnostics.push(
                        Diagnostic::error(format!("unknown section [{}]", name), span)
                            .with_help("expected [solver], [table] or [clock]".to_string()),
                    );
                }
                section = name.to_string();
                continue;
            }

            let Some(eq) = trimmed.find('=') else {
                self.error(
                    "expected `key = value`".to_string(),
                    Span::at(start, trimmed.len()),
                );
                continue;
            };
            let key = trimmed[..eq].trim();
            let key_span = Span::at(start, key.len());
            let raw = &trimmed[eq + 1..];
            let value = raw.trim();
            let value_span = Span::at(start + eq + 1 + (raw.len() - raw.trim_start().len()), value.len());

            if section.is_empty() {
                self.error(
                    format!("key '{}' appears before any section header", key),
                    key_span,
                );
                continue;
            }
            if !self.seen.insert((section.clone(), key.to_string())) {
                self.error(format!("duplicate key '{}' in [{}]", key, section), key_span);
                continue;
            }

            let value = Spanned::new(value, value_span);
            match (section.as_str(), key) {
                ("solver", "max_val") => {
                    self.max_val = self.int_in(value, 1, MAX_COUNTER as u32, "max_val");
                }
                ("solver", "variant") => {
                    self.variant = self.string(value).and_then(|s| {
                        match Variant::from_str(&s.node) {
                            Ok(v) => Some(Spanned::new(v, s.span)),
                            Err(e) => {
                                self.error(e, s.span);
                                None
                            }
                        }
                    });
                }
                ("solver", "radius") => {
                    self.radius = self.int_in(value, 0, MAX_COUNTER as u32, "radius");
                }
                ("solver", "error_weight") => {
                    self.error_weight = self.int_in(value, 1, u32::MAX, "error_weight");
                }
                ("solver", "footprint_weight") => {
                    self.footprint_weight = self.int_in(value, 0, u32::MAX, "footprint_weight");
                }
                ("table", "max_n") => {
                    self.table_len = self.int_in(value, 0, MAX_TABLE_LEN, "max_n");
                }
                ("clock", "frequency_hz") => {
                    self.clock_hz = self.float_positive(value, "frequency_hz");
                }
                (s, k) if SECTIONS.contains(&s) => {
                    self.error(format!("unknown key '{}' in [{}]", k, s), key_span);
                }
                // Keys under an unknown section were already covered by the
                // section diagnostic.
                _ => {}
            }
        }
    }

    fn finish(mut self) -> Result<Config, Vec<Diagnostic>> {
        if !self.diagnostics.is_empty() {
            return Err(self.diagnostics);
        }
        let mut config = Config::default();
        if let Some(v) = self.max_val.take() {
            config.max_val = v.node;
        }
        if let Some(v) = self.table_len.take() {
            config.table_len = v.node;
        }
        if let Some(v) = self.clock_hz.take() {
            config.clock_hz = v.node;
        }
        config.radius = self
            .radius
            .take()
            .map(|r| Spanned::new(r.node as u8, r.span));
        config.error_weight = self.error_weight.take();
        config.footprint_weight = self.footprint_weight.take();

        let selected = self.variant.take().map(|v| v.node).unwrap_or_default();
        config.variant = config.merge_variant(Some(selected), VariantFlags::default());
        Ok(config)
    }

    fn error(&mut self, message: String, span: Span) {
        self.diagnostics.push(Diagnostic::error(message, span));
    }

    fn int_in(&mut self, v: Spanned<&str>, min: u32, max: u32, key: &str) -> Option<Spanned<u32>> {
        let parsed = v.node.replace('_', "").parse::<u64>();
        match parsed {
            Ok(n) if n >= min as u64 && n <= max as u64 => Some(Spanned::new(n as u32, v.span)),
            Ok(n) => {
                let mut d = Diagnostic::error(
                    format!("{} = {} is outside {}..={}", key, n, min, max),
                    v.span,
                );
                if key == "max_val" || key == "radius" {
                    d = d.with_note("PIO loop counters are 5 bits wide".to_string());
                }
                self.diagnostics.push(d);
                None
            }
            Err(_) => {
                self.error(
                    format!("expected a non-negative integer for '{}', found `{}`", key, v.node),
                    v.span,
                );
                None
            }
        }
    }

    fn float_positive(&mut self, v: Spanned<&str>, key: &str) -> Option<Spanned<f64>> {
        match v.node.replace('_', "").parse::<f64>() {
            Ok(x) if x.is_finite() && x > 0.0 => Some(Spanned::new(x, v.span)),
            _ => {
                self.error(
                    format!("expected a positive number for '{}', found `{}`", key, v.node),
                    v.span,
                );
                None
            }
        }
    }

    fn string(&mut self, v: Spanned<&str>) -> Option<Spanned<String>> {
        let s = v.node;
        if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
            Some(Spanned::new(s[1..s.len() - 1].to_string(), v.span))
        } else {
            self.diagnostics.push(
                Diagnostic::error(format!("expected a quoted string, found `{}`", s), v.span)
                    .with_help(format!("write it as \"{}\"", s.trim_matches('"'))),
            );
            None
        }
    }
}

/// Byte index of the first `#` outside a double-quoted string.
fn find_comment(line: &str) -> Option<usize> {
    let mut in_string = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return Some(i),
            _ => {}
        }
    }
    None
}
