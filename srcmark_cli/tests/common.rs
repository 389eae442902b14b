#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;

pub const DEMO_SOURCE: &str = "import os\n\n\n\n# SOURCE_MARKER_BEGIN_demo\nprint(\"a\")\nprint(\"b\")\n# \
                               SOURCE_MARKER_END_demo\n";

pub const DEMO_DIRECTIVE: &str =
	"<!-- MARKDOWN-AUTO-DOCS:START (CODE:src=../src/a.py&label=demo) -->";

pub fn srcmark_cmd() -> Command {
	let mut cmd = Command::cargo_bin("srcmark").unwrap_or_else(|e| panic!("srcmark binary: {e}"));
	cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
	cmd
}

pub fn write(path: &Path, content: &str) {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap();
	}
	std::fs::write(path, content).unwrap();
}

/// A project with `docs/readme.md` referencing the `demo` block in
/// `src/a.py`, plus one plain markdown file and one asset.
pub fn demo_project(root: &Path) {
	write(&root.join("src/a.py"), DEMO_SOURCE);
	write(
		&root.join("docs/readme.md"),
		&format!("# Demo\n\n{DEMO_DIRECTIVE}\n<!-- MARKDOWN-AUTO-DOCS:END -->\n"),
	);
	write(&root.join("docs/guide/plain.md"), "# Nothing to replace\n");
	write(&root.join("docs/logo.svg"), "<svg/>\n");
}
