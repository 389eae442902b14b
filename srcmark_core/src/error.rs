use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum SrcmarkError {
	#[error(transparent)]
	#[diagnostic(code(srcmark::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(srcmark::config_parse),
		help("check that srcmark.toml is valid TOML")
	)]
	ConfigParse(String),

	#[error(
		"unbalanced comment markers in {file}: found marker `{open_name}` at line {open_line}, and \
		 `{close_name}` at line {close_line}"
	)]
	#[diagnostic(
		code(srcmark::unbalanced_markers),
		help("every end marker must close the begin marker that precedes it")
	)]
	UnbalancedMarkers {
		file: String,
		open_name: String,
		open_line: usize,
		close_name: String,
		close_line: usize,
	},

	#[error("end marker `{name}` at line {line} in {file} has no open begin marker")]
	#[diagnostic(
		code(srcmark::unopened_marker),
		help("add a matching begin marker above line {line}")
	)]
	UnopenedMarker {
		file: String,
		name: String,
		line: usize,
	},

	#[error(
		"begin marker `{name}` at line {line} in {file} opened while `{open_name}` (line \
		 {open_line}) is still open"
	)]
	#[diagnostic(
		code(srcmark::nested_marker),
		help("markers cannot be nested; close `{open_name}` before opening `{name}`")
	)]
	NestedMarker {
		file: String,
		name: String,
		line: usize,
		open_name: String,
		open_line: usize,
	},

	#[error("marker `{name}` at line {line} is already defined in {file}")]
	#[diagnostic(
		code(srcmark::duplicate_marker),
		help("marker names must be unique within a single source file")
	)]
	DuplicateMarker {
		file: String,
		name: String,
		line: usize,
	},

	#[error("incorrect code block line numbers for marker `{name}` in {file}: {start}-{end}")]
	#[diagnostic(
		code(srcmark::empty_block),
		help("a marked block must enclose at least one non-blank line")
	)]
	EmptyBlock {
		file: String,
		name: String,
		start: usize,
		end: usize,
	},

	#[error("tag `{name}` in source file {source_file} cannot be found for markdown file {markdown}")]
	#[diagnostic(
		code(srcmark::dangling_reference),
		help("check the `src=` path and that the source directory was passed to the scan")
	)]
	DanglingReference {
		name: String,
		source_file: String,
		markdown: String,
	},

	#[error("directive pattern must capture exactly 2 groups, found {groups}")]
	#[diagnostic(
		code(srcmark::malformed_directive),
		help("the pattern needs one group for the source path and one for the marker name")
	)]
	MalformedDirective { groups: usize },

	#[error("invalid directive pattern: {0}")]
	#[diagnostic(code(srcmark::invalid_directive_pattern))]
	InvalidDirectivePattern(String),

	#[error("documentation generator failed for {file}: {reason}")]
	#[diagnostic(
		code(srcmark::generator_failed),
		help("run the generator command manually to inspect its output, or pass `--no-generate`")
	)]
	GeneratorFailed { file: String, reason: String },

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(srcmark::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },
}

pub type SrcmarkResult<T> = Result<T, SrcmarkError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
