//! Diagnostic rendering for type warnings
//!
//! Renders [`TypeWarning`]s with source context through codespan-reporting,
//! or as JSON for editor integration.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, LabelStyle, Severity};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use termcolor::{ColorChoice, StandardStream, WriteColor};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ast::Span;
use crate::error::{MessageKind, Severity as WarningSeverity, TypeWarning, WarningCode, WarningConfig};

/// A diagnostic message with source code context
pub struct Diagnostic {
    inner: CsDiagnostic<usize>,
    code: Option<WarningCode>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
            code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn note(message: impl Into<String>) -> Self {
        Self::new(Severity::Note, message)
    }

    pub fn with_code(mut self, code: WarningCode) -> Self {
        self.code = Some(code);
        self.inner = self.inner.with_code(code.as_str());
        self
    }

    /// Add a primary label (main location)
    pub fn with_primary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        let label = Label::primary(file_id, span.start as usize..span.end as usize).with_message(message);
        self.inner.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.notes.push(format!("help: {}", help.into()));
        self
    }

    /// Create a diagnostic from a type warning
    ///
    /// Denied warnings render as errors, info pointers as notes.
    pub fn from_warning(warning: &TypeWarning, file_id: usize, config: &WarningConfig) -> Self {
        let code = warning.code();
        let message = warning.kind.to_string();
        let base = match warning.severity {
            WarningSeverity::Info => Diagnostic::note(message),
            WarningSeverity::Warning if config.is_denied(code) => Diagnostic::error(message),
            WarningSeverity::Warning => Diagnostic::warning(message),
        };
        let diag = base
            .with_code(code)
            .with_primary_label(file_id, warning.span, label_text(&warning.kind));

        match &warning.kind {
            MessageKind::NotAssignable { to, .. } if to == "bool" => {
                diag.with_help("conditions must be of type bool")
            }
            MessageKind::VoidExpression => diag.with_note("the expression has type void and produces no value"),
            MessageKind::MaybeMissingReturn => diag.with_help("add a return or throw at the end of the body"),
            _ => diag,
        }
    }

    /// Emit the diagnostic to stderr with colors
    pub fn emit(&self, files: &SimpleFiles<String, String>) -> Result<(), codespan_reporting::files::Error> {
        let mut writer = StandardStream::stderr(ColorChoice::Auto);
        self.emit_to(&mut writer, files)
    }

    /// Emit the diagnostic to an arbitrary writer
    pub fn emit_to(
        &self,
        writer: &mut dyn WriteColor,
        files: &SimpleFiles<String, String>,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        term::emit(writer, &config, files, &self.inner)
    }

    /// Get the underlying codespan diagnostic (for testing/custom rendering)
    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    pub fn code(&self) -> Option<WarningCode> {
        self.code
    }

    /// Convert to JSON representation for IDE integration
    pub fn to_json(&self, files: &SimpleFiles<String, String>) -> Result<String, serde_json::Error> {
        let json_diag = JsonDiagnostic::from_diagnostic(self, files);
        serde_json::to_string_pretty(&json_diag)
    }
}

fn label_text(kind: &MessageKind) -> String {
    match kind {
        MessageKind::NotAssignable { from, to } => format!("expected '{}', found '{}'", to, from),
        MessageKind::MethodNotFound { .. } => "method not found".to_string(),
        MessageKind::OperatorNotFound { .. } => "operator not found".to_string(),
        MessageKind::PropertyNotFound { .. } => "member not found".to_string(),
        MessageKind::MissingReturn | MessageKind::MaybeMissingReturn => "declared here".to_string(),
        MessageKind::UnreachableCode => "unreachable".to_string(),
        MessageKind::ThisIsTheMethod => "declared here".to_string(),
        MessageKind::AdditionalArgument => "extra argument".to_string(),
        MessageKind::MissingArgument { .. } => "argument missing".to_string(),
        MessageKind::NamedArgumentNotFound { .. } => "unknown argument".to_string(),
        MessageKind::NotCallable { .. } => "cannot be called".to_string(),
        MessageKind::VoidExpression => "void value used".to_string(),
        MessageKind::VoidVariable => "void type".to_string(),
        MessageKind::ReturnValueInVoid => "value returned".to_string(),
        MessageKind::ReturnNothing { return_type } => format!("'{}' expected", return_type),
    }
}

/// JSON representation of a diagnostic for IDE integration
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    /// Warning code (e.g., "W2001")
    pub code: Option<String>,
    pub severity: String,
    pub message: String,
    pub labels: Vec<JsonLabel>,
    /// Additional notes and help
    pub notes: Vec<String>,
}

/// JSON representation of a diagnostic label
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLabel {
    pub file: String,
    /// Start line (1-indexed)
    pub start_line: usize,
    /// Start column (1-indexed)
    pub start_column: usize,
    /// End line (1-indexed)
    pub end_line: usize,
    /// End column (1-indexed)
    pub end_column: usize,
    pub message: Option<String>,
    /// Label style (primary or secondary)
    pub style: String,
}

impl JsonDiagnostic {
    /// Convert a Diagnostic to JSON representation
    pub fn from_diagnostic(diag: &Diagnostic, files: &SimpleFiles<String, String>) -> Self {
        let severity = match diag.inner.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
            Severity::Bug => "bug",
        };

        let labels = diag
            .inner
            .labels
            .iter()
            .filter_map(|label| {
                let file = files.get(label.file_id).ok()?;
                let start = file.location((), label.range.start).ok()?;
                let end = file.location((), label.range.end).ok()?;

                Some(JsonLabel {
                    file: file.name().to_string(),
                    start_line: start.line_number,
                    start_column: start.column_number,
                    end_line: end.line_number,
                    end_column: end.column_number,
                    message: Some(label.message.clone()),
                    style: match label.style {
                        LabelStyle::Primary => "primary",
                        LabelStyle::Secondary => "secondary",
                    }
                    .to_string(),
                })
            })
            .collect();

        JsonDiagnostic {
            code: diag.code.map(|c| c.as_str().to_string()),
            severity: severity.to_string(),
            message: diag.inner.message.clone(),
            labels,
            notes: diag.inner.notes.clone(),
        }
    }
}

/// Helper to create a SimpleFiles instance from source code
pub fn create_files(path: impl Into<PathBuf>, source: impl Into<String>) -> SimpleFiles<String, String> {
    let mut files = SimpleFiles::new();
    files.add(path.into().display().to_string(), source.into());
    files
}
