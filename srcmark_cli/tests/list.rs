mod common;

use serde_json::Value;
use srcmark_core::AnyEmptyResult;

#[test]
fn list_prints_resolved_markers() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::demo_project(tmp.path());

	common::srcmark_cmd()
		.current_dir(tmp.path())
		.args(["list", "src"])
		.assert()
		.success()
		.stdout(predicates::str::contains("a.py"))
		.stdout(predicates::str::contains("demo"))
		.stdout(predicates::str::contains("lines=5-6"));

	Ok(())
}

#[test]
fn list_json_maps_paths_to_ranges() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::demo_project(tmp.path());
	let source = tmp.path().join("src/a.py").canonicalize()?;

	let output = common::srcmark_cmd()
		.current_dir(tmp.path())
		.args(["list", "src", "--format", "json"])
		.output()?;
	assert!(output.status.success());

	let mapping: Value = serde_json::from_slice(&output.stdout)?;
	let key = source.display().to_string();
	assert_eq!(mapping[key.as_str()]["demo"]["start"], 5);
	assert_eq!(mapping[key.as_str()]["demo"]["end"], 6);

	Ok(())
}

#[test]
fn list_reports_empty_tree() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("src"))?;

	common::srcmark_cmd()
		.current_dir(tmp.path())
		.args(["list", "src"])
		.assert()
		.success()
		.stdout(predicates::str::contains("No markers found."));

	Ok(())
}

#[test]
fn list_fails_on_missing_source_dir() {
	common::srcmark_cmd()
		.args(["list", "/definitely/not/a/dir"])
		.assert()
		.failure()
		.stderr(predicates::str::contains("source directory not found"));
}

#[test]
fn no_strip_empty_lines_keeps_blank_lines() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(
		&tmp.path().join("src/a.py"),
		"# SOURCE_MARKER_BEGIN_pad\n\nx = 1\n\n# SOURCE_MARKER_END_pad\n",
	);

	common::srcmark_cmd()
		.current_dir(tmp.path())
		.args(["list", "src"])
		.assert()
		.success()
		.stdout(predicates::str::contains("lines=2-2"));

	common::srcmark_cmd()
		.current_dir(tmp.path())
		.args(["--no-strip-empty-lines", "list", "src"])
		.assert()
		.success()
		.stdout(predicates::str::contains("lines=1-3"));

	Ok(())
}
