use std::path::Path;
use std::path::PathBuf;

use regex::Regex;

use crate::SrcmarkError;
use crate::SrcmarkResult;
use crate::config::DEFAULT_DIRECTIVE_PATTERN;
use crate::resolver::LineRange;
use crate::resolver::MarkerMapping;

/// A compiled placeholder pattern with exactly two capture groups: the source
/// path and the marker name.
#[derive(Debug, Clone)]
pub struct DirectivePattern {
	regex: Regex,
}

impl DirectivePattern {
	/// Compile `pattern`. Matches only count when they start at the beginning
	/// of the trimmed line.
	pub fn new(pattern: &str) -> SrcmarkResult<Self> {
		let regex =
			Regex::new(pattern).map_err(|e| SrcmarkError::InvalidDirectivePattern(e.to_string()))?;

		// Group 0 is the whole match.
		let groups = regex.captures_len() - 1;
		if groups != 2 {
			return Err(SrcmarkError::MalformedDirective { groups });
		}

		Ok(Self { regex })
	}

	/// Match a trimmed markdown line, returning the source path and marker
	/// name.
	pub fn matches<'l>(&self, line: &'l str) -> Option<(&'l str, &'l str)> {
		let captures = self.regex.captures(line)?;
		if captures.get(0)?.start() != 0 {
			return None;
		}
		let source = captures.get(1)?.as_str();
		let label = captures.get(2)?.as_str();
		Some((source, label))
	}
}

impl Default for DirectivePattern {
	fn default() -> Self {
		Self::new(DEFAULT_DIRECTIVE_PATTERN)
			.unwrap_or_else(|e| panic!("default directive pattern is invalid: {e}"))
	}
}

/// A placeholder replaced during a rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
	/// 1-indexed line of the markdown file.
	pub line: usize,
	pub name: String,
	/// Canonical path of the referenced source file.
	pub source_file: PathBuf,
	pub range: LineRange,
}

/// The result of rewriting one markdown file.
#[derive(Debug, Clone, Default)]
pub struct RewriteOutcome {
	pub content: String,
	pub replacements: Vec<Replacement>,
}

impl RewriteOutcome {
	/// Whether at least one placeholder was replaced.
	pub fn is_replaced(&self) -> bool {
		!self.replacements.is_empty()
	}
}

/// Rewrite markdown `content` held in memory. `markdown_path` is only used to
/// resolve `src=` references relative to its directory and for error
/// messages.
pub fn rewrite_content(
	markdown_path: &Path,
	content: &str,
	mapping: &MarkerMapping,
	pattern: &DirectivePattern,
) -> SrcmarkResult<RewriteOutcome> {
	let base_dir = markdown_path.parent().unwrap_or_else(|| Path::new(""));
	let mut outcome = RewriteOutcome {
		content: String::with_capacity(content.len()),
		replacements: Vec::new(),
	};

	for (index, line) in content.split_inclusive('\n').enumerate() {
		let Some((source, name)) = pattern.matches(line.trim()) else {
			outcome.content.push_str(line);
			continue;
		};

		let dangling = || {
			SrcmarkError::DanglingReference {
				name: name.to_string(),
				source_file: base_dir.join(source).display().to_string(),
				markdown: markdown_path.display().to_string(),
			}
		};
		let source_file = base_dir.join(source).canonicalize().map_err(|_| dangling())?;
		let range = mapping.lookup(&source_file, name).ok_or_else(dangling)?;

		tracing::debug!(
			"Replacing marker `{name}` with {range} in {}",
			markdown_path.display()
		);
		outcome
			.content
			.push_str(&line.replace(&format!("&label={name}"), &format!("&{range}")));
		outcome.replacements.push(Replacement {
			line: index + 1,
			name: name.to_string(),
			source_file,
			range,
		});
	}

	Ok(outcome)
}

/// Read `markdown_path`, replace every placeholder, and write the result to
/// `output_path`. The input file is never modified.
pub fn rewrite(
	markdown_path: &Path,
	output_path: &Path,
	mapping: &MarkerMapping,
	pattern: &DirectivePattern,
) -> SrcmarkResult<RewriteOutcome> {
	let content = std::fs::read_to_string(markdown_path)?;
	let outcome = rewrite_content(markdown_path, &content, mapping, pattern)?;
	std::fs::write(output_path, &outcome.content)?;

	Ok(outcome)
}
