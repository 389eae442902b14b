use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use derive_more::Deref;
use serde::Serialize;

use crate::SrcmarkError;
use crate::SrcmarkResult;
use crate::comments::Comment;
use crate::comments::CommentExtractor;
use crate::comments::ContentType;
use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::config::MarkerConfig;
use crate::config::SrcmarkConfig;
use crate::walk::collect_source_files;

/// Options for controlling how source directories are scanned.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
	/// Trim blank lines at the start and end of each block.
	pub strip_empty_lines: bool,
	/// Maximum file size to scan in bytes.
	pub max_file_size: u64,
	pub markers: MarkerConfig,
	/// Gitignore-style patterns to exclude from scanning.
	pub exclude_patterns: Vec<String>,
	/// Extension → content type overrides.
	pub content_types: HashMap<String, String>,
}

impl Default for ResolveOptions {
	fn default() -> Self {
		Self {
			strip_empty_lines: true,
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			markers: MarkerConfig::default(),
			exclude_patterns: Vec::new(),
			content_types: HashMap::new(),
		}
	}
}

impl ResolveOptions {
	pub fn from_config(config: &SrcmarkConfig) -> Self {
		Self {
			strip_empty_lines: config.strip_empty_lines,
			max_file_size: config.max_file_size,
			markers: config.markers.clone(),
			exclude_patterns: config.exclude.patterns.clone(),
			content_types: config.content_types.clone(),
		}
	}
}

/// Inclusive, 0-indexed range of lines enclosed by a marker pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineRange {
	pub start: usize,
	pub end: usize,
}

impl LineRange {
	/// The location descriptor substituted into placeholder directives.
	pub fn descriptor(&self) -> String {
		self.to_string()
	}
}

impl fmt::Display for LineRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "lines={}-{}", self.start, self.end)
	}
}

/// A marker pair resolved to its line range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBlock {
	pub file: PathBuf,
	pub name: String,
	pub range: LineRange,
}

/// Absolute source path → marker name → resolved range.
#[derive(Debug, Clone, Default, Deref, Serialize)]
pub struct MarkerMapping(BTreeMap<PathBuf, BTreeMap<String, LineRange>>);

impl MarkerMapping {
	pub fn insert(&mut self, block: ResolvedBlock) {
		self.0
			.entry(block.file)
			.or_default()
			.insert(block.name, block.range);
	}

	/// Find the range for `name` in `file`.
	pub fn lookup(&self, file: &Path, name: &str) -> Option<LineRange> {
		self.0.get(file).and_then(|blocks| blocks.get(name)).copied()
	}

	/// Total number of resolved blocks across all files.
	pub fn block_count(&self) -> usize {
		self.0.values().map(BTreeMap::len).sum()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
	Begin,
	End,
}

/// A begin or end marker found in a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
	pub kind: MarkerKind,
	pub name: String,
	/// 1-indexed line of the comment holding the marker.
	pub line: usize,
}

impl Marker {
	/// Parse a marker from a comment. The comment text is trimmed and must
	/// start with one of the configured prefixes; the name is whatever
	/// follows `<prefix>_`.
	pub fn parse(comment: &Comment, markers: &MarkerConfig) -> Option<Self> {
		let text = comment.text.trim();
		let (kind, rest) = if let Some(rest) = text.strip_prefix(markers.begin.as_str()) {
			(MarkerKind::Begin, rest)
		} else if let Some(rest) = text.strip_prefix(markers.end.as_str()) {
			(MarkerKind::End, rest)
		} else {
			return None;
		};

		Some(Self {
			kind,
			name: rest.strip_prefix('_').unwrap_or(rest).to_string(),
			line: comment.line,
		})
	}
}

/// The single marker currently waiting for its end. Markers never nest.
#[derive(Debug)]
struct OpenMarker {
	name: String,
	line: usize,
}

/// Accumulates a [`MarkerMapping`] file by file.
///
/// Entries resolved before a failure stay in the mapping, so a caller can
/// still inspect what was found up to the offending marker.
pub struct Resolver<'a, E: CommentExtractor> {
	extractor: &'a E,
	options: &'a ResolveOptions,
	mapping: MarkerMapping,
	/// Canonical paths already scanned. Overlapping source directories
	/// visit each file once.
	scanned: HashSet<PathBuf>,
}

impl<'a, E: CommentExtractor> Resolver<'a, E> {
	pub fn new(extractor: &'a E, options: &'a ResolveOptions) -> Self {
		Self {
			extractor,
			options,
			mapping: MarkerMapping::default(),
			scanned: HashSet::new(),
		}
	}

	pub fn mapping(&self) -> &MarkerMapping {
		&self.mapping
	}

	pub fn into_mapping(self) -> MarkerMapping {
		self.mapping
	}

	/// Scan every file below `dir`.
	pub fn scan_dir(&mut self, dir: &Path) -> SrcmarkResult<()> {
		for file in collect_source_files(dir, &self.options.exclude_patterns)? {
			self.scan_file(&file)?;
		}

		Ok(())
	}

	/// Scan a single file. Files that are too large, not UTF-8 text, or of a
	/// content type without comment support are skipped.
	pub fn scan_file(&mut self, path: &Path) -> SrcmarkResult<()> {
		let file = path.canonicalize()?;
		if !self.scanned.insert(file.clone()) {
			tracing::debug!("Skipping already scanned file {}", path.display());
			return Ok(());
		}

		let size = std::fs::metadata(path)?.len();
		if size > self.options.max_file_size {
			tracing::info!(
				"Ignoring large file {} ({size} bytes, limit {})",
				path.display(),
				self.options.max_file_size
			);
			return Ok(());
		}

		let Ok(content) = String::from_utf8(std::fs::read(path)?) else {
			tracing::info!("Ignoring non-text file {}", path.display());
			return Ok(());
		};

		let content_type = ContentType::from_path(path, &self.options.content_types);
		let comments = match self.extractor.extract(&content, &content_type) {
			Ok(comments) => comments,
			Err(_) => {
				tracing::info!(
					"Ignoring unsupported file {} of type {content_type}",
					path.display()
				);
				return Ok(());
			}
		};

		tracing::info!("Parsing file {} of type {content_type}", path.display());
		self.resolve_comments(&file, &content, &comments)
	}

	/// Pair the markers found in `comments` and record each resolved block
	/// under `file`. `content` is the file text used for blank-line trimming.
	pub fn resolve_comments(
		&mut self,
		file: &Path,
		content: &str,
		comments: &[Comment],
	) -> SrcmarkResult<()> {
		let lines: Vec<&str> = content.lines().collect();
		let mut open: Option<OpenMarker> = None;

		for marker in comments
			.iter()
			.filter_map(|comment| Marker::parse(comment, &self.options.markers))
		{
			match marker.kind {
				MarkerKind::Begin => {
					if let Some(current) = &open {
						return Err(SrcmarkError::NestedMarker {
							file: file.display().to_string(),
							name: marker.name,
							line: marker.line,
							open_name: current.name.clone(),
							open_line: current.line,
						});
					}

					if self.mapping.lookup(file, &marker.name).is_some() {
						return Err(SrcmarkError::DuplicateMarker {
							file: file.display().to_string(),
							name: marker.name,
							line: marker.line,
						});
					}

					open = Some(OpenMarker {
						name: marker.name,
						line: marker.line,
					});
				}
				MarkerKind::End => {
					let Some(current) = open.take() else {
						return Err(SrcmarkError::UnopenedMarker {
							file: file.display().to_string(),
							name: marker.name,
							line: marker.line,
						});
					};

					if current.name != marker.name {
						return Err(SrcmarkError::UnbalancedMarkers {
							file: file.display().to_string(),
							open_name: current.name,
							open_line: current.line,
							close_name: marker.name,
							close_line: marker.line,
						});
					}

					let range = take_block(
						file,
						&current.name,
						&lines,
						current.line,
						marker.line,
						self.options.strip_empty_lines,
					)?;
					tracing::debug!("Resolved marker `{}` in {} to {range}", current.name, file.display());
					self.mapping.insert(ResolvedBlock {
						file: file.to_path_buf(),
						name: current.name,
						range,
					});
				}
			}
		}

		if let Some(current) = open {
			tracing::warn!(
				"Marker `{}` opened at line {} in {} is never closed",
				current.name,
				current.line,
				file.display()
			);
		}

		Ok(())
	}
}

fn is_blank(line: &str) -> bool {
	line.trim().is_empty()
}

/// Compute the 0-indexed inclusive range of the lines strictly between a
/// begin marker on 1-indexed line `begin_line` and an end marker on 1-indexed
/// line `end_line`, optionally trimming blank lines at both ends.
pub fn take_block(
	file: &Path,
	name: &str,
	lines: &[&str],
	begin_line: usize,
	end_line: usize,
	strip_empty: bool,
) -> SrcmarkResult<LineRange> {
	let empty_block = |start: usize, end: usize| {
		SrcmarkError::EmptyBlock {
			file: file.display().to_string(),
			name: name.to_string(),
			start,
			end,
		}
	};

	if end_line <= begin_line + 1 {
		return Err(empty_block(begin_line, end_line.saturating_sub(2)));
	}

	let start = begin_line;
	let end = end_line - 2;

	if !strip_empty {
		return Ok(LineRange { start, end });
	}

	let interior = (start..=end).map(|index| lines.get(index).copied().unwrap_or(""));
	let empty_begins = interior.clone().take_while(|line| is_blank(line)).count();
	let empty_ends = interior.rev().take_while(|line| is_blank(line)).count();

	let trimmed_start = start + empty_begins;
	let trimmed_end = end.saturating_sub(empty_ends);
	if trimmed_end < trimmed_start {
		return Err(empty_block(trimmed_start, trimmed_end));
	}

	Ok(LineRange {
		start: trimmed_start,
		end: trimmed_end,
	})
}

/// Scan every source directory in order and return the complete mapping.
pub fn resolve<E: CommentExtractor>(
	source_dirs: &[PathBuf],
	options: &ResolveOptions,
	extractor: &E,
) -> SrcmarkResult<MarkerMapping> {
	let mut resolver = Resolver::new(extractor, options);
	for dir in source_dirs {
		resolver.scan_dir(dir)?;
	}

	let mapping = resolver.into_mapping();
	tracing::info!(
		"Resolved {} marker(s) across {} file(s)",
		mapping.block_count(),
		mapping.len()
	);

	Ok(mapping)
}
