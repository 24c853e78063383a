use thiserror::Error;

/// Malformed template markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
	/// The HTML parser reported parse errors, in the order it found them.
	///
	/// Messages only quote the markup with the `dangerous-logging` feature enabled.
	#[error("malformed template markup: {}", .errors.join("; "))]
	Malformed { errors: Vec<String> },
}
