use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Pin markdown code snippets to marked regions of your source files.",
	long_about = "srcmark scans source files for `SOURCE_MARKER_BEGIN_<name>` / \
	              `SOURCE_MARKER_END_<name>` comments and rewrites markdown placeholders such \
	              as\n\n  <!-- MARKDOWN-AUTO-DOCS:START (CODE:src=./main.py&label=setup) -->\n\ninto \
	              explicit line ranges (`&lines=4-9`) that markdown-autodocs can inline.\n\nQuick \
	              start:\n  srcmark build docs src   Rewrite docs/ into docs_out/\n  srcmark list \
	              src         Show every resolved marker"
)]
pub struct SrcmarkCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to a config file. Defaults to `srcmark.toml` in the current
	/// directory when present.
	#[arg(long, short, global = true)]
	pub config: Option<PathBuf>,

	/// Enable verbose (debug) logging.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Only log warnings and errors.
	#[arg(long, short, global = true, default_value_t = false, conflicts_with = "verbose")]
	pub quiet: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,

	/// Keep blank lines at the start and end of marked blocks.
	#[arg(long, global = true, default_value_t = false)]
	pub no_strip_empty_lines: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Rewrite a markdown tree using markers found in source directories.
	///
	/// Scans every source directory for marker comments, then mirrors the
	/// markdown directory into the output directory. Markdown files have
	/// their placeholders rewritten; all other files are copied unchanged.
	/// Each rewritten file is handed to the documentation generator.
	Build {
		/// Directory containing the markdown files to rewrite.
		markdown_dir: PathBuf,

		/// One or more directories to scan for source markers.
		#[arg(required = true)]
		source_dirs: Vec<PathBuf>,

		/// Output directory. Defaults to the markdown directory with `_out`
		/// appended.
		#[arg(long, short)]
		output: Option<PathBuf>,

		/// Do not run the documentation generator on rewritten files.
		#[arg(long, default_value_t = false)]
		no_generate: bool,

		/// Override the generator command. `{file}` and `{pattern}` are
		/// substituted.
		#[arg(long)]
		generator_command: Option<String>,

		/// Output format for the build summary.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List every marker resolved from the source directories.
	List {
		/// One or more directories to scan for source markers.
		#[arg(required = true)]
		source_dirs: Vec<PathBuf>,

		/// Output format for the marker list.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
