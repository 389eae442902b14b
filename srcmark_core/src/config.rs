use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::SrcmarkError;
use crate::SrcmarkResult;

/// Default maximum source file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["srcmark.toml", ".srcmark.toml", ".config/srcmark.toml"];

/// Comment text that opens a marked region.
pub const DEFAULT_BEGIN_MARKER: &str = "SOURCE_MARKER_BEGIN";

/// Comment text that closes a marked region.
pub const DEFAULT_END_MARKER: &str = "SOURCE_MARKER_END";

/// Suffix appended to the markdown directory to name the output directory.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_out";

/// Placeholder directive understood by `markdown-autodocs`. The first group
/// captures the source path and the second the marker name.
pub const DEFAULT_DIRECTIVE_PATTERN: &str =
	r"<!-- MARKDOWN-AUTO-DOCS:START \(CODE:src=(.*?)&label=(\w+).*?\) -->";

/// Generator command run on every rewritten markdown file. `{pattern}` and
/// `{file}` are substituted before the command is handed to the shell.
pub const DEFAULT_GENERATOR_COMMAND: &str = "docker run -v $(pwd):/data -it \
                                             karolswdev/autodocs-markdown-docker -c {pattern} -o \
                                             {file}";

/// Pattern id passed to the generator.
pub const DEFAULT_GENERATOR_PATTERN: &str = "code-block";

/// Configuration loaded from a `srcmark.toml` file.
///
/// ```toml
/// strip_empty_lines = true
/// output_suffix = "_out"
///
/// [markers]
/// begin = "SOURCE_MARKER_BEGIN"
/// end = "SOURCE_MARKER_END"
///
/// [markdown]
/// extensions = ["md", "markdown"]
///
/// [generator]
/// enabled = false
///
/// [exclude]
/// patterns = ["vendor/"]
///
/// [content_types]
/// toml = "text/x-shellscript"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SrcmarkConfig {
	/// Trim blank lines at the start and end of every marked block.
	#[serde(default = "default_true")]
	pub strip_empty_lines: bool,
	/// Suffix appended to the markdown directory when no explicit output
	/// directory is given.
	#[serde(default = "default_output_suffix")]
	pub output_suffix: String,
	/// Maximum source file size in bytes to scan. Larger files are skipped.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
	#[serde(default)]
	pub markers: MarkerConfig,
	#[serde(default)]
	pub markdown: MarkdownConfig,
	#[serde(default)]
	pub generator: GeneratorConfig,
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// Map of file extension (without the dot) to content type, consulted
	/// before the built-in table.
	#[serde(default)]
	pub content_types: HashMap<String, String>,
}

impl Default for SrcmarkConfig {
	fn default() -> Self {
		Self {
			strip_empty_lines: true,
			output_suffix: default_output_suffix(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			markers: MarkerConfig::default(),
			markdown: MarkdownConfig::default(),
			generator: GeneratorConfig::default(),
			exclude: ExcludeConfig::default(),
			content_types: HashMap::new(),
		}
	}
}

/// Marker prefixes searched for in source comments.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkerConfig {
	#[serde(default = "default_begin_marker")]
	pub begin: String,
	#[serde(default = "default_end_marker")]
	pub end: String,
}

impl Default for MarkerConfig {
	fn default() -> Self {
		Self {
			begin: default_begin_marker(),
			end: default_end_marker(),
		}
	}
}

/// Controls which files are treated as markdown and how placeholders are
/// recognised.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownConfig {
	/// File extensions routed to the rewriter. Everything else is copied.
	#[serde(default = "default_markdown_extensions")]
	pub extensions: Vec<String>,
	/// Regular expression with exactly two capture groups: the source path
	/// and the marker name.
	#[serde(default = "default_directive_pattern")]
	pub directive_pattern: String,
}

impl Default for MarkdownConfig {
	fn default() -> Self {
		Self {
			extensions: default_markdown_extensions(),
			directive_pattern: default_directive_pattern(),
		}
	}
}

impl MarkdownConfig {
	/// Returns `true` when the path has one of the configured markdown
	/// extensions.
	pub fn is_markdown(&self, path: &Path) -> bool {
		path.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| self.extensions.iter().any(|candidate| candidate == ext))
	}
}

/// External documentation generator settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
	/// When false, rewritten files are never handed to the generator.
	#[serde(default = "default_true")]
	pub enabled: bool,
	#[serde(default = "default_generator_command")]
	pub command: String,
	#[serde(default = "default_generator_pattern")]
	pub pattern: String,
}

impl Default for GeneratorConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			command: default_generator_command(),
			pattern: default_generator_pattern(),
		}
	}
}

/// Configuration for excluding source files from scanning.
///
/// Patterns follow gitignore syntax and are relative to each source
/// directory. Supports negation (`!pattern`), directory markers (trailing
/// `/`), and all standard gitignore wildcards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

fn default_true() -> bool {
	true
}

fn default_output_suffix() -> String {
	DEFAULT_OUTPUT_SUFFIX.to_string()
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

fn default_begin_marker() -> String {
	DEFAULT_BEGIN_MARKER.to_string()
}

fn default_end_marker() -> String {
	DEFAULT_END_MARKER.to_string()
}

fn default_markdown_extensions() -> Vec<String> {
	vec!["md".to_string()]
}

fn default_directive_pattern() -> String {
	DEFAULT_DIRECTIVE_PATTERN.to_string()
}

fn default_generator_command() -> String {
	DEFAULT_GENERATOR_COMMAND.to_string()
}

fn default_generator_pattern() -> String {
	DEFAULT_GENERATOR_PATTERN.to_string()
}

impl SrcmarkConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> SrcmarkResult<Option<SrcmarkConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::load_file(&config_path).map(Some)
	}

	/// Load the config from an explicit file path.
	pub fn load_file(path: &Path) -> SrcmarkResult<SrcmarkConfig> {
		let content = std::fs::read_to_string(path)?;
		Self::from_toml(&content)
	}

	pub fn from_toml(content: &str) -> SrcmarkResult<SrcmarkConfig> {
		toml::from_str(content).map_err(|e| SrcmarkError::ConfigParse(e.to_string()))
	}

	/// The output directory used when none is given: the markdown directory
	/// path with [`output_suffix`](Self::output_suffix) appended, so
	/// `docs/` becomes the sibling `docs_out/`.
	pub fn default_output_dir(&self, markdown_dir: &Path) -> PathBuf {
		let mut name = markdown_dir
			.components()
			.as_path()
			.as_os_str()
			.to_os_string();
		name.push(&self.output_suffix);
		PathBuf::from(name)
	}
}
