use std::path::Path;
use std::process::Command;

use crate::SrcmarkError;
use crate::SrcmarkResult;
use crate::config::GeneratorConfig;

/// Runs the external documentation generator on a rewritten markdown file.
pub trait DocGenerator {
	/// Generate documentation for `file` using the generator pattern
	/// `pattern` (for `markdown-autodocs`, e.g. `code-block`).
	fn generate(&self, file: &Path, pattern: &str) -> SrcmarkResult<()>;
}

/// Generator that does nothing. Used when generation is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGenerator;

impl DocGenerator for NoopGenerator {
	fn generate(&self, file: &Path, _pattern: &str) -> SrcmarkResult<()> {
		tracing::debug!("Skipping documentation generator for {}", file.display());
		Ok(())
	}
}

/// Generator that runs a shell command template. `{file}` and `{pattern}`
/// are substituted before the command is run. The file path is quoted for
/// the shell; the pattern is inserted as written.
#[derive(Debug, Clone)]
pub struct ShellGenerator {
	command: String,
}

impl ShellGenerator {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
		}
	}

	pub fn render(&self, file: &Path, pattern: &str) -> String {
		self.command
			.replace("{pattern}", pattern)
			.replace("{file}", &quote_path(file))
	}
}

#[cfg(not(target_os = "windows"))]
fn quote_path(file: &Path) -> String {
	shell_words::quote(&file.display().to_string()).into_owned()
}

#[cfg(target_os = "windows")]
fn quote_path(file: &Path) -> String {
	let path = file.display().to_string();
	if path.contains(|c: char| c.is_whitespace() || "&|<>^()%!\"".contains(c)) {
		format!("\"{path}\"")
	} else {
		path
	}
}

impl DocGenerator for ShellGenerator {
	fn generate(&self, file: &Path, pattern: &str) -> SrcmarkResult<()> {
		let script = self.render(file, pattern);
		tracing::info!("Running documentation generator: {script}");

		let status = if cfg!(target_os = "windows") {
			Command::new("cmd").arg("/C").arg(&script).status()?
		} else {
			Command::new("sh").arg("-c").arg(&script).status()?
		};

		if !status.success() {
			return Err(SrcmarkError::GeneratorFailed {
				file: file.display().to_string(),
				reason: format!(
					"command exited with status {}",
					status
						.code()
						.map_or_else(|| "unknown".to_string(), |code| code.to_string())
				),
			});
		}

		Ok(())
	}
}

/// Build the generator described by `config`.
pub fn generator_from_config(config: &GeneratorConfig) -> Box<dyn DocGenerator> {
	if config.enabled {
		Box::new(ShellGenerator::new(config.command.clone()))
	} else {
		Box::new(NoopGenerator)
	}
}
