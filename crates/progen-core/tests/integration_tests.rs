//! Integration tests for progen-core's public domain API.

use std::path::Path;

use progen_core::domain::{
    DomainError, ManifestSource, RelativePath, Substitutions, TemplateSpec,
};
use progen_core::prelude::*;

#[test]
fn default_settings_compile_to_the_standard_manifest() {
    let settings = SessionSettings::default();
    let manifest = TemplateManifest::from_source(&settings.templates).unwrap();

    let paths: Vec<_> = manifest
        .entries()
        .iter()
        .map(|e| e.path.to_slash_string())
        .collect();
    assert_eq!(
        paths,
        [
            ".coveragerc",
            ".env",
            ".flake8",
            ".gitlab-ci.yaml",
            ".isort.cfg",
            ".pre-commit-config.yaml",
            ".vscode/settings.json",
            "Dockerfile",
        ]
    );
    assert!(
        manifest
            .entries()
            .iter()
            .all(|e| e.url.starts_with(&settings.templates.base_url))
    );
}

#[test]
fn manifest_url_override_and_base_joining() {
    let source = ManifestSource {
        base_url: "https://templates.test/base/".into(),
        entries: vec![
            TemplateSpec::new("env", ".env"),
            TemplateSpec {
                url: Some("https://mirror.test/ci.yaml".into()),
                ..TemplateSpec::new("ci", ".gitlab-ci.yaml")
            },
        ],
    };

    let manifest = TemplateManifest::from_source(&source).unwrap();

    assert_eq!(manifest.entries()[0].url, "https://templates.test/base/.env");
    assert_eq!(manifest.entries()[1].url, "https://mirror.test/ci.yaml");
}

#[test]
fn manifest_rejects_paths_outside_the_project() {
    let source = ManifestSource {
        entries: vec![TemplateSpec::new("escape", "../outside")],
        ..ManifestSource::default()
    };
    assert!(TemplateManifest::from_source(&source).is_err());
    assert!(RelativePath::try_new("/etc/passwd").is_err());
}

#[test]
fn target_name_feeds_the_placeholder() {
    let target = TargetPath::resolve("../services/billing", "/work/app").unwrap();
    assert_eq!(target.as_path(), Path::new("/work/services/billing"));

    let project = ProjectSettings::default();
    let subs = Substitutions::new().with(project.placeholder.clone(), target.name());

    assert_eq!(
        subs.apply("name = \"{project_name}\"\n{other}"),
        "name = \"billing\"\n{other}"
    );
}

#[test]
fn current_directory_target_takes_the_base_name() {
    let target = TargetPath::resolve(".", "/work/myapp").unwrap();
    assert_eq!(target.name(), "myapp");
    assert_eq!(target.parent(), Path::new("/work"));
}

#[test]
fn core_errors_convert_into_the_root_error() {
    let err: ProgenError = DomainError::EmptyManifest.into();
    assert_eq!(err.to_string(), "Template manifest is empty");
    assert!(!progen_core::VERSION.is_empty());
}

#[test]
fn command_lines_render_like_a_shell_would_show_them() {
    let cmd = CommandLine::new("/usr/bin/poetry")
        .args(["add", "-D", "black"])
        .env("POETRY_BASE_URL", "https://mirror.test/");
    assert_eq!(cmd.to_string(), "/usr/bin/poetry add -D black");
    assert_eq!(cmd.env.len(), 1);
}
