use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use srcmark_cli::Commands;
use srcmark_cli::OutputFormat;
use srcmark_cli::SrcmarkCli;
use srcmark_core::BuildSummary;
use srcmark_core::ResolveOptions;
use srcmark_core::SrcmarkConfig;
use srcmark_core::SyntaxCommentExtractor;
use srcmark_core::generator_from_config;
use srcmark_core::resolve;
use srcmark_core::run_pipeline;
use tracing_subscriber::EnvFilter;

fn main() {
	let args = SrcmarkCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_logging(&args, use_color);

	let result = match &args.command {
		Some(Commands::Build {
			markdown_dir,
			source_dirs,
			output,
			no_generate,
			generator_command,
			format,
		}) => {
			run_build(
				&args,
				markdown_dir,
				source_dirs,
				output.as_deref(),
				*no_generate,
				generator_command.as_deref(),
				*format,
			)
		}
		Some(Commands::List {
			source_dirs,
			format,
		}) => run_list(&args, source_dirs, *format),
		None => {
			eprintln!("No subcommand specified. Run `srcmark --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<srcmark_core::SrcmarkError>() {
			Ok(srcmark_err) => {
				let report: miette::Report = (*srcmark_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				if use_color {
					eprintln!("{} {e}", "error:".red());
				} else {
					eprintln!("error: {e}");
				}
			}
		}
		process::exit(1);
	}
}

/// Progress goes to stdout, except when stdout carries JSON.
fn init_logging(args: &SrcmarkCli, use_color: bool) {
	let level = if args.verbose {
		"debug"
	} else if args.quiet {
		"warn"
	} else {
		"info"
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
	let json_output = matches!(
		args.command,
		Some(
			Commands::Build {
				format: OutputFormat::Json,
				..
			} | Commands::List {
				format: OutputFormat::Json,
				..
			}
		)
	);

	let builder = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.without_time()
		.with_ansi(use_color);

	if json_output {
		builder.with_writer(std::io::stderr).init();
	} else {
		builder.with_writer(std::io::stdout).init();
	}
}

fn load_config(args: &SrcmarkCli) -> Result<SrcmarkConfig, Box<dyn std::error::Error>> {
	let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
	let config_path = args
		.config
		.clone()
		.or_else(|| SrcmarkConfig::resolve_path(&cwd));

	let mut config = match &config_path {
		Some(path) => {
			tracing::debug!("Loading config from {}", path.display());
			SrcmarkConfig::load_file(path)?
		}
		None => {
			tracing::debug!("No config file found, using defaults");
			SrcmarkConfig::default()
		}
	};

	if args.no_strip_empty_lines {
		config.strip_empty_lines = false;
	}

	Ok(config)
}

fn check_source_dirs(source_dirs: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
	for dir in source_dirs {
		if !dir.is_dir() {
			return Err(format!("source directory not found: {}", dir.display()).into());
		}
	}

	Ok(())
}

fn run_build(
	args: &SrcmarkCli,
	markdown_dir: &Path,
	source_dirs: &[PathBuf],
	output: Option<&Path>,
	no_generate: bool,
	generator_command: Option<&str>,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let mut config = load_config(args)?;
	if no_generate {
		config.generator.enabled = false;
	}
	if let Some(command) = generator_command {
		config.generator.command = command.to_string();
	}

	if !markdown_dir.is_dir() {
		return Err(format!("markdown directory not found: {}", markdown_dir.display()).into());
	}

	let output_dir = output.map_or_else(
		|| config.default_output_dir(markdown_dir),
		Path::to_path_buf,
	);
	check_source_dirs(source_dirs)?;
	let generator = generator_from_config(&config.generator);
	let summary = run_pipeline(
		markdown_dir,
		source_dirs,
		&output_dir,
		&config,
		&SyntaxCommentExtractor,
		generator.as_ref(),
	)?;

	match format {
		OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
		OutputFormat::Text => print_summary(&summary, &output_dir),
	}

	Ok(())
}

fn print_summary(summary: &BuildSummary, output_dir: &Path) {
	println!(
		"Wrote {} file(s) to {}: {} markdown file(s) rewritten, {} markdown file(s) copied, {} \
		 other file(s) copied.",
		summary.total(),
		output_dir.display(),
		summary.replaced.len(),
		summary.copied_markdown.len(),
		summary.copied_other.len()
	);
}

fn run_list(
	args: &SrcmarkCli,
	source_dirs: &[PathBuf],
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let config = load_config(args)?;
	check_source_dirs(source_dirs)?;
	let mapping = resolve(
		source_dirs,
		&ResolveOptions::from_config(&config),
		&SyntaxCommentExtractor,
	)?;

	match format {
		OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&mapping)?),
		OutputFormat::Text => {
			if mapping.is_empty() {
				println!("No markers found.");
			}
			for (file, blocks) in mapping.iter() {
				println!("{}", file.display());
				for (name, range) in blocks {
					println!("  {name:<28} {range}");
				}
			}
		}
	}

	Ok(())
}
