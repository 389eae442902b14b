use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::SrcmarkError;
use crate::SrcmarkResult;

/// Build a `Gitignore` matcher from the `[exclude]` patterns in
/// `srcmark.toml`, rooted at `root`.
pub fn build_exclude_matcher(root: &Path, patterns: &[String]) -> SrcmarkResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			SrcmarkError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| SrcmarkError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

fn is_hidden_name(name: &str) -> bool {
	name.starts_with('.') && name != "." && name != ".."
}

/// Collect every file below `root` that should be scanned for markers.
///
/// Hidden directories and paths matched by `exclude_patterns` are skipped.
/// The result is sorted for deterministic ordering.
pub fn collect_source_files(root: &Path, exclude_patterns: &[String]) -> SrcmarkResult<Vec<PathBuf>> {
	let mut files = Vec::new();
	let mut ancestors = HashSet::new();
	let exclude = build_exclude_matcher(root, exclude_patterns)?;

	walk_sources(root, &mut files, &exclude, &mut ancestors)?;
	files.sort();
	Ok(files)
}

fn walk_sources(
	dir: &Path,
	files: &mut Vec<PathBuf>,
	exclude: &Gitignore,
	ancestors: &mut HashSet<PathBuf>,
) -> SrcmarkResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	let canonical = enter_dir(dir, ancestors)?;

	for path in sorted_entries(dir)? {
		let is_dir = path.is_dir();

		if is_dir
			&& path
				.file_name()
				.and_then(|n| n.to_str())
				.is_some_and(is_hidden_name)
		{
			continue;
		}

		if exclude.matched(&path, is_dir).is_ignore() {
			continue;
		}

		if is_dir {
			walk_sources(&path, files, exclude, ancestors)?;
		} else if path.is_file() {
			files.push(path);
		}
	}

	ancestors.remove(&canonical);
	Ok(())
}

/// Push `dir` onto the set of directories currently being walked and return
/// its canonical path. Fails when `dir` resolves to one of its own
/// ancestors. Aliases of sibling directories are walked normally.
///
/// The caller removes the returned path once `dir` is done.
pub(crate) fn enter_dir(dir: &Path, ancestors: &mut HashSet<PathBuf>) -> SrcmarkResult<PathBuf> {
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !ancestors.insert(canonical.clone()) {
		return Err(SrcmarkError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}

	Ok(canonical)
}

/// Directory entries of `dir` in sorted order.
pub(crate) fn sorted_entries(dir: &Path) -> SrcmarkResult<Vec<PathBuf>> {
	let mut entries = Vec::new();
	for entry in std::fs::read_dir(dir)? {
		entries.push(entry?.path());
	}
	entries.sort();
	Ok(entries)
}
