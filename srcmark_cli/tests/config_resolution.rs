mod common;

use srcmark_core::AnyEmptyResult;

#[test]
fn config_file_disables_generator_and_changes_suffix() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::demo_project(tmp.path());
	common::write(
		&tmp.path().join("srcmark.toml"),
		"output_suffix = \"_site\"\n\n[generator]\nenabled = false\n",
	);

	common::srcmark_cmd()
		.current_dir(tmp.path())
		.args(["build", "docs", "src"])
		.assert()
		.success();

	assert!(tmp.path().join("docs_site/readme.md").is_file());
	assert!(!tmp.path().join("docs_out").exists());

	Ok(())
}

#[test]
fn config_resolves_dot_config_candidate() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::demo_project(tmp.path());
	common::write(
		&tmp.path().join(".config/srcmark.toml"),
		"[markers]\nbegin = \"SNIPPET_START\"\nend = \"SNIPPET_STOP\"\n",
	);
	common::write(
		&tmp.path().join("src/b.py"),
		"# SNIPPET_START_custom\nvalue = 1\n# SNIPPET_STOP_custom\n",
	);

	common::srcmark_cmd()
		.current_dir(tmp.path())
		.args(["list", "src"])
		.assert()
		.success()
		.stdout(predicates::str::contains("custom"))
		.stdout(predicates::str::contains("lines=1-1"));

	Ok(())
}

#[test]
fn explicit_config_flag_wins() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::demo_project(tmp.path());
	common::write(
		&tmp.path().join("srcmark.toml"),
		"[generator]\nenabled = true\ncommand = \"exit 1\"\n",
	);
	common::write(
		&tmp.path().join("other.toml"),
		"[generator]\nenabled = false\n",
	);

	common::srcmark_cmd()
		.current_dir(tmp.path())
		.args(["--config", "other.toml", "build", "docs", "src"])
		.assert()
		.success();

	Ok(())
}

#[test]
fn invalid_config_is_reported() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::demo_project(tmp.path());
	common::write(&tmp.path().join("srcmark.toml"), "strip_empty_lines = [\n");

	common::srcmark_cmd()
		.current_dir(tmp.path())
		.args(["list", "src"])
		.assert()
		.failure()
		.stderr(predicates::str::contains("srcmark::config_parse"));

	Ok(())
}
