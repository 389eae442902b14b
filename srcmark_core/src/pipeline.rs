use std::path::Path;
use std::path::PathBuf;

use crate::SrcmarkResult;
use crate::comments::CommentExtractor;
use crate::config::SrcmarkConfig;
use crate::generator::DocGenerator;
use crate::resolver::ResolveOptions;
use crate::resolver::resolve;
use crate::tree::BuildSummary;
use crate::tree::TreeOptions;
use crate::tree::build_tree;

/// Scan `source_dirs` for markers, then mirror `markdown_dir` into
/// `output_dir` with every placeholder resolved.
///
/// The scan completes before any markdown file is touched.
pub fn run_pipeline<E: CommentExtractor>(
	markdown_dir: &Path,
	source_dirs: &[PathBuf],
	output_dir: &Path,
	config: &SrcmarkConfig,
	extractor: &E,
	generator: &dyn DocGenerator,
) -> SrcmarkResult<BuildSummary> {
	let mapping = resolve(source_dirs, &ResolveOptions::from_config(config), extractor)?;
	build_tree(
		markdown_dir,
		output_dir,
		&mapping,
		&TreeOptions::from_config(config),
		generator,
	)
}
