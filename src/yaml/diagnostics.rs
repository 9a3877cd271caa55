//! Diagnostics for selection and config files

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A selection/config file that failed to parse, pointing at the bad spot
#[derive(Debug, Error, Diagnostic)]
#[error("cannot parse {filename}: {message}")]
#[diagnostic(code(bomq::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    filename: String,
    message: String,
}

impl YamlSyntaxError {
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = suggest_fix(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            filename: filename.to_string(),
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("cannot read {path}: {source}")]
    #[diagnostic(code(bomq::yaml::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Byte offset of a 1-based line/column position
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for (n, text) in source.split_inclusive('\n').enumerate() {
        if n + 1 == line {
            let within = text
                .char_indices()
                .nth(column.saturating_sub(1))
                .map(|(i, _)| i)
                .unwrap_or(text.len().saturating_sub(1));
            return line_start + within;
        }
        line_start += text.len();
    }
    source.len().saturating_sub(1)
}

fn suggest_fix(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("unknown field") {
        return Some(
            "selection files accept: assembly_picks, extra_lines, overrides, headcount".to_string(),
        );
    }

    if msg.contains("missing field `component_id`") {
        return Some("every extra line needs a component_id".to_string());
    }

    if msg.contains("missing field `quantity`") {
        return Some("extra lines and overrides need a quantity".to_string());
    }

    if msg.contains("invalid type") && msg.contains("i64") {
        return Some("IDs, multiplicities and headcount must be whole numbers".to_string());
    }

    if msg.contains("decimal") {
        return Some("quantities must be plain numbers such as 2 or 0.5".to_string());
    }

    if msg.contains("tab") {
        return Some("YAML indentation uses spaces, not tabs".to_string());
    }

    if msg.contains("duplicate key") {
        return Some("an assembly or component ID can only be listed once per map".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 3), 14);
    }

    #[test]
    fn test_offset_past_end_is_clamped() {
        let source = "a: 1\n";
        assert_eq!(line_col_to_offset(source, 9, 1), 4);
    }

    #[test]
    fn test_fix_suggestions() {
        assert!(suggest_fix("unknown field `picks`, expected one of ...").is_some());
        assert!(suggest_fix("missing field `quantity`").is_some());
        assert!(suggest_fix("duplicate key").is_some());
        assert!(suggest_fix("something else entirely").is_none());
    }
}
