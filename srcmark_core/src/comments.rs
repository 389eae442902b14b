use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Content type assumed for files whose extension is not recognised. Files
/// of this type are scanned for `#` line comments.
pub const FALLBACK_CONTENT_TYPE: &str = "text/x-shellscript";

/// A single comment found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
	/// The comment body without its delimiters.
	pub text: String,
	/// 1-indexed line the comment starts on.
	pub line: usize,
}

impl Comment {
	pub fn new(text: impl Into<String>, line: usize) -> Self {
		Self {
			text: text.into(),
			line,
		}
	}
}

/// MIME-style content type hint for a source file, e.g. `text/x-python`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentType(String);

impl ContentType {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Infer the content type from the file extension. Entries in
	/// `overrides` (extension without the dot → content type) win over the
	/// built-in table. Unknown extensions fall back to
	/// [`FALLBACK_CONTENT_TYPE`].
	pub fn from_path(path: &Path, overrides: &HashMap<String, String>) -> Self {
		let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
			return Self::new(FALLBACK_CONTENT_TYPE);
		};
		let ext = ext.to_ascii_lowercase();

		if let Some(value) = overrides.get(&ext) {
			return Self::new(value.as_str());
		}

		Self::new(guess_content_type(&ext).unwrap_or(FALLBACK_CONTENT_TYPE))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ContentType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

fn guess_content_type(ext: &str) -> Option<&'static str> {
	let value = match ext {
		"py" | "pyi" | "pyw" => "text/x-python",
		"sh" | "bash" | "zsh" | "ksh" => "application/x-sh",
		"rb" | "rake" | "gemspec" => "text/x-ruby",
		"pl" | "pm" => "text/x-perl",
		"r" => "text/x-r",
		"yaml" | "yml" => "application/x-yaml",
		"toml" => "application/toml",
		"c" | "h" => "text/x-c",
		"cc" | "cpp" | "cxx" | "hpp" | "hh" | "hxx" => "text/x-c++",
		"cs" => "text/x-csharp",
		"java" => "text/x-java-source",
		"kt" | "kts" => "text/x-kotlin",
		"scala" => "text/x-scala",
		"swift" => "text/x-swift",
		"go" => "text/x-go",
		"rs" => "text/rust",
		"js" | "mjs" | "cjs" | "jsx" => "application/javascript",
		"ts" | "mts" | "cts" | "tsx" => "application/typescript",
		"css" => "text/css",
		"html" | "htm" => "text/html",
		"xml" | "svg" | "xsd" | "xsl" => "text/xml",
		"sql" => "application/sql",
		"lua" => "text/x-lua",
		"hs" => "text/x-haskell",
		"md" | "markdown" => "text/markdown",
		"txt" | "text" | "log" => "text/plain",
		"csv" => "text/csv",
		"json" => "application/json",
		"ipynb" => "application/x-ipynb+json",
		"pdf" => "application/pdf",
		"png" => "image/png",
		"jpg" | "jpeg" => "image/jpeg",
		"gif" => "image/gif",
		"ico" => "image/vnd.microsoft.icon",
		"zip" => "application/zip",
		"gz" => "application/gzip",
		_ => return None,
	};

	Some(value)
}

/// Returned when a content type has no known comment syntax.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported content type `{0}`")]
pub struct UnsupportedContentType(pub String);

/// Produces the comments contained in a source file.
pub trait CommentExtractor {
	fn extract(
		&self,
		content: &str,
		content_type: &ContentType,
	) -> Result<Vec<Comment>, UnsupportedContentType>;
}

/// A string literal delimiter. Text inside literals is never reported as a
/// comment.
#[derive(Debug, Clone, Copy)]
pub struct StringDelimiter {
	pub delimiter: &'static str,
	/// Whether the literal may span lines. Single-line literals end at the
	/// next newline even when unterminated.
	pub multiline: bool,
}

const fn single(delimiter: &'static str) -> StringDelimiter {
	StringDelimiter {
		delimiter,
		multiline: false,
	}
}

const fn multi(delimiter: &'static str) -> StringDelimiter {
	StringDelimiter {
		delimiter,
		multiline: true,
	}
}

/// Comment and string delimiters of a language family. Longer delimiters
/// must come first within each list.
#[derive(Debug, Clone, Copy)]
pub struct CommentSyntax {
	pub line: &'static [&'static str],
	pub block: &'static [(&'static str, &'static str)],
	pub strings: &'static [StringDelimiter],
	/// Rust-style `'c'` char literals. A `'` that does not close a char
	/// literal is a lifetime or label and is skipped on its own.
	pub char_literals: bool,
	/// Rust-style `r"…"` / `r#"…"#` raw strings, which have no escapes.
	pub raw_strings: bool,
}

pub const HASH_SYNTAX: CommentSyntax = CommentSyntax {
	line: &["#"],
	block: &[],
	strings: &[single("\""), single("'")],
	char_literals: false,
	raw_strings: false,
};

pub const PYTHON_SYNTAX: CommentSyntax = CommentSyntax {
	line: &["#"],
	block: &[],
	strings: &[multi("\"\"\""), multi("'''"), single("\""), single("'")],
	char_literals: false,
	raw_strings: false,
};

pub const C_SYNTAX: CommentSyntax = CommentSyntax {
	line: &["//"],
	block: &[("/*", "*/")],
	strings: &[single("\""), single("'")],
	char_literals: false,
	raw_strings: false,
};

pub const RUST_SYNTAX: CommentSyntax = CommentSyntax {
	line: &["///", "//!", "//"],
	block: &[("/*", "*/")],
	strings: &[multi("\"")],
	char_literals: true,
	raw_strings: true,
};

pub const JAVASCRIPT_SYNTAX: CommentSyntax = CommentSyntax {
	line: &["//"],
	block: &[("/*", "*/")],
	strings: &[single("\""), single("'"), multi("`")],
	char_literals: false,
	raw_strings: false,
};

pub const GO_SYNTAX: CommentSyntax = CommentSyntax {
	line: &["//"],
	block: &[("/*", "*/")],
	strings: &[single("\""), single("'"), multi("`")],
	char_literals: false,
	raw_strings: false,
};

pub const CSS_SYNTAX: CommentSyntax = CommentSyntax {
	line: &[],
	block: &[("/*", "*/")],
	strings: &[single("\""), single("'")],
	char_literals: false,
	raw_strings: false,
};

pub const HTML_SYNTAX: CommentSyntax = CommentSyntax {
	line: &[],
	block: &[("<!--", "-->")],
	strings: &[],
	char_literals: false,
	raw_strings: false,
};

pub const SQL_SYNTAX: CommentSyntax = CommentSyntax {
	line: &["--"],
	block: &[("/*", "*/")],
	strings: &[single("'")],
	char_literals: false,
	raw_strings: false,
};

pub const LUA_SYNTAX: CommentSyntax = CommentSyntax {
	line: &["--"],
	block: &[("--[[", "]]")],
	strings: &[single("\""), single("'")],
	char_literals: false,
	raw_strings: false,
};

pub const HASKELL_SYNTAX: CommentSyntax = CommentSyntax {
	line: &["--"],
	block: &[("{-", "-}")],
	strings: &[single("\"")],
	char_literals: false,
	raw_strings: false,
};

/// Look up the comment syntax for a content type.
pub fn syntax_for(content_type: &ContentType) -> Option<&'static CommentSyntax> {
	let syntax = match content_type.as_str() {
		"text/x-shellscript" | "application/x-sh" | "text/x-sh" | "text/x-ruby"
		| "text/x-perl" | "text/x-r" | "application/x-yaml" | "application/toml" => &HASH_SYNTAX,
		"text/x-python" => &PYTHON_SYNTAX,
		"text/x-c" | "text/x-c++" | "text/x-csharp" | "text/x-java-source" | "text/x-java"
		| "text/x-kotlin" | "text/x-scala" | "text/x-swift" => &C_SYNTAX,
		"text/rust" | "text/x-rust" => &RUST_SYNTAX,
		"application/javascript" | "text/javascript" | "application/typescript" => {
			&JAVASCRIPT_SYNTAX
		}
		"text/x-go" => &GO_SYNTAX,
		"text/css" => &CSS_SYNTAX,
		"text/html" | "text/xml" | "application/xml" => &HTML_SYNTAX,
		"application/sql" => &SQL_SYNTAX,
		"text/x-lua" => &LUA_SYNTAX,
		"text/x-haskell" => &HASKELL_SYNTAX,
		_ => return None,
	};

	Some(syntax)
}

/// Built-in extractor driven by the [`syntax_for`] table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxCommentExtractor;

impl CommentExtractor for SyntaxCommentExtractor {
	fn extract(
		&self,
		content: &str,
		content_type: &ContentType,
	) -> Result<Vec<Comment>, UnsupportedContentType> {
		let syntax = syntax_for(content_type)
			.ok_or_else(|| UnsupportedContentType(content_type.to_string()))?;

		Ok(extract_comments(content, syntax))
	}
}

/// Pre-computed table of line-start byte offsets for offset-to-line
/// conversion.
struct LineTable {
	/// Byte offsets of the start of each line. `line_starts[0]` is always 0.
	line_starts: Vec<usize>,
}

impl LineTable {
	fn new(content: &str) -> Self {
		let mut line_starts = vec![0];
		for (i, byte) in content.bytes().enumerate() {
			if byte == b'\n' {
				line_starts.push(i + 1);
			}
		}
		Self { line_starts }
	}

	/// 1-indexed line containing `offset`.
	fn line_of(&self, offset: usize) -> usize {
		match self.line_starts.binary_search(&offset) {
			Ok(exact) => exact + 1,
			Err(insert) => insert,
		}
	}
}

fn find_from(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
	bytes[from..]
		.windows(needle.len())
		.position(|window| window == needle)
		.map(|position| from + position)
}

fn line_end(bytes: &[u8], from: usize) -> usize {
	bytes[from..]
		.iter()
		.position(|&b| b == b'\n')
		.map_or(bytes.len(), |position| from + position)
}

/// Skip a string literal whose opening delimiter ends at `from`. Returns the
/// offset just past the closing delimiter.
fn skip_string(bytes: &[u8], from: usize, delimiter: &StringDelimiter) -> usize {
	let close = delimiter.delimiter.as_bytes();
	let mut i = from;

	while i < bytes.len() {
		if bytes[i] == b'\\' {
			i += 2;
			continue;
		}
		if bytes[i] == b'\n' && !delimiter.multiline {
			return i;
		}
		if bytes[i..].starts_with(close) {
			return i + close.len();
		}
		i += 1;
	}

	bytes.len()
}

fn is_ident_byte(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Skip a raw string starting at `from` (`r"…"`, `r#"…"#`, `br"…"`).
/// Returns `None` when no raw string starts there.
fn skip_raw_string(bytes: &[u8], from: usize) -> Option<usize> {
	if bytes[from] != b'r' {
		return None;
	}

	// `r` must start a token, optionally after a `b` byte-string prefix.
	let prefix_start = match from.checked_sub(1).map(|prev| bytes[prev]) {
		Some(b'b') => from - 1,
		_ => from,
	};
	if prefix_start > 0 && is_ident_byte(bytes[prefix_start - 1]) {
		return None;
	}

	let mut i = from + 1;
	let hashes = bytes[i..].iter().take_while(|&&b| b == b'#').count();
	i += hashes;
	if bytes.get(i) != Some(&b'"') {
		return None;
	}
	i += 1;

	let mut close = vec![b'"'];
	close.extend(std::iter::repeat_n(b'#', hashes));
	Some(find_from(bytes, i, &close).map_or(bytes.len(), |end| end + close.len()))
}

/// Skip a char literal opening at `from`. A quote that does not form a
/// literal (lifetimes, loop labels) only advances past itself.
fn skip_char_literal(content: &str, from: usize) -> usize {
	let rest = &content[from + 1..];
	let mut chars = rest.char_indices();

	let body_end = match chars.next() {
		Some((_, '\\')) => {
			// Escapes are short: `\n`, `\x7f`, `\u{10FFFF}`.
			match rest.char_indices().skip(2).take(9).find(|&(_, c)| c == '\'' || c == '\n') {
				Some((offset, '\'')) => Some(offset),
				_ => None,
			}
		}
		Some((_, '\n')) | None => None,
		Some((_, c)) => {
			let offset = c.len_utf8();
			rest[offset..].starts_with('\'').then_some(offset)
		}
	};

	match body_end {
		Some(offset) => from + 1 + offset + 1,
		None => from + 1,
	}
}

/// Scan `content` and return every comment in file order.
///
/// Block comments are checked before line comments so that openers such as
/// Lua's `--[[` win over the shorter `--`.
pub fn extract_comments(content: &str, syntax: &CommentSyntax) -> Vec<Comment> {
	let bytes = content.as_bytes();
	let line_table = LineTable::new(content);
	let mut comments = Vec::new();
	let mut i = 0;

	'scan: while i < bytes.len() {
		for (open, close) in syntax.block {
			if !bytes[i..].starts_with(open.as_bytes()) {
				continue;
			}

			let body_start = i + open.len();
			let (body_end, next) = match find_from(bytes, body_start, close.as_bytes()) {
				Some(end) => (end, end + close.len()),
				None => (bytes.len(), bytes.len()),
			};
			comments.push(Comment::new(
				&content[body_start..body_end],
				line_table.line_of(i),
			));
			i = next;
			continue 'scan;
		}

		for prefix in syntax.line {
			if !bytes[i..].starts_with(prefix.as_bytes()) {
				continue;
			}

			let body_start = i + prefix.len();
			let end = line_end(bytes, body_start);
			let text = content[body_start..end].trim_end_matches('\r');
			comments.push(Comment::new(text, line_table.line_of(i)));
			i = end;
			continue 'scan;
		}

		if syntax.raw_strings {
			if let Some(next) = skip_raw_string(bytes, i) {
				i = next;
				continue;
			}
		}

		if syntax.char_literals && bytes[i] == b'\'' {
			i = skip_char_literal(content, i);
			continue;
		}

		for delimiter in syntax.strings {
			if bytes[i..].starts_with(delimiter.delimiter.as_bytes()) {
				i = skip_string(bytes, i + delimiter.delimiter.len(), delimiter);
				continue 'scan;
			}
		}

		i += 1;
	}

	comments
}
