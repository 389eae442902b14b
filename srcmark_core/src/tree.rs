use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::SrcmarkResult;
use crate::config::MarkdownConfig;
use crate::config::SrcmarkConfig;
use crate::generator::DocGenerator;
use crate::resolver::MarkerMapping;
use crate::rewriter::DirectivePattern;
use crate::rewriter::rewrite;
use crate::walk::enter_dir;
use crate::walk::sorted_entries;

/// Options for mirroring a markdown tree.
#[derive(Debug, Clone)]
pub struct TreeOptions {
	pub markdown: MarkdownConfig,
	/// Pattern id handed to the generator for each rewritten file.
	pub generator_pattern: String,
}

impl Default for TreeOptions {
	fn default() -> Self {
		Self::from_config(&SrcmarkConfig::default())
	}
}

impl TreeOptions {
	pub fn from_config(config: &SrcmarkConfig) -> Self {
		Self {
			markdown: config.markdown.clone(),
			generator_pattern: config.generator.pattern.clone(),
		}
	}
}

/// Output files written by [`build_tree`], grouped by how they were
/// produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildSummary {
	/// Markdown files with at least one placeholder replaced.
	pub replaced: Vec<PathBuf>,
	/// Markdown files copied without changes.
	pub copied_markdown: Vec<PathBuf>,
	/// Every other file, copied byte for byte.
	pub copied_other: Vec<PathBuf>,
}

impl BuildSummary {
	/// Total number of files written.
	pub fn total(&self) -> usize {
		self.replaced.len() + self.copied_markdown.len() + self.copied_other.len()
	}
}

/// Mirror `markdown_dir` into `output_dir`, rewriting markdown placeholders
/// with ranges from `mapping` and copying everything else unchanged.
///
/// The generator runs on each rewritten file as soon as it is written. The
/// first error aborts the build; files written before it stay on disk.
pub fn build_tree(
	markdown_dir: &Path,
	output_dir: &Path,
	mapping: &MarkerMapping,
	options: &TreeOptions,
	generator: &dyn DocGenerator,
) -> SrcmarkResult<BuildSummary> {
	std::fs::create_dir_all(output_dir)?;
	let mut mirror = Mirror {
		mapping,
		options,
		pattern: DirectivePattern::new(&options.markdown.directive_pattern)?,
		generator,
		output_root: output_dir.canonicalize()?,
		summary: BuildSummary::default(),
		ancestors: HashSet::new(),
	};
	mirror.mirror_dir(markdown_dir, output_dir)?;
	let summary = mirror.summary;

	tracing::info!("{} markdown files get auto replaced.", summary.replaced.len());
	tracing::info!("{} markdown files copied.", summary.copied_markdown.len());
	tracing::info!("{} other files copied.", summary.copied_other.len());

	Ok(summary)
}

struct Mirror<'a> {
	mapping: &'a MarkerMapping,
	options: &'a TreeOptions,
	pattern: DirectivePattern,
	generator: &'a dyn DocGenerator,
	/// Never descended into, so an output directory nested inside the
	/// markdown tree is not mirrored into itself.
	output_root: PathBuf,
	summary: BuildSummary,
	/// Canonical paths of the directories on the current recursion path.
	ancestors: HashSet<PathBuf>,
}

impl Mirror<'_> {
	fn mirror_dir(&mut self, source_dir: &Path, target_dir: &Path) -> SrcmarkResult<()> {
		let canonical = enter_dir(source_dir, &mut self.ancestors)?;
		std::fs::create_dir_all(target_dir)?;

		for path in sorted_entries(source_dir)? {
			let Some(name) = path.file_name() else {
				continue;
			};
			let target = target_dir.join(name);

			if path.is_dir() {
				if path
					.canonicalize()
					.is_ok_and(|canonical| canonical == self.output_root)
				{
					continue;
				}
				self.mirror_dir(&path, &target)?;
			} else if self.options.markdown.is_markdown(&path) {
				self.mirror_markdown(&path, target)?;
			} else {
				std::fs::copy(&path, &target)?;
				self.summary.copied_other.push(target);
			}
		}

		self.ancestors.remove(&canonical);
		Ok(())
	}

	fn mirror_markdown(&mut self, path: &Path, target: PathBuf) -> SrcmarkResult<()> {
		let outcome = rewrite(path, &target, self.mapping, &self.pattern)?;
		if !outcome.is_replaced() {
			self.summary.copied_markdown.push(target);
			return Ok(());
		}

		tracing::info!(
			"Replaced {} placeholder(s) in {}",
			outcome.replacements.len(),
			target.display()
		);
		self.generator
			.generate(&target, &self.options.generator_pattern)?;
		self.summary.replaced.push(target);

		Ok(())
	}
}
