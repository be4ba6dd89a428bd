//! End-to-end provisioning runs against the in-memory filesystem and
//! scripted network/process fakes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use progen_adapters::MemoryFilesystem;
use progen_core::application::ApplicationError;
use progen_core::domain::{DomainError, TemplateSpec};
use progen_core::prelude::*;

#[derive(Clone, Default)]
struct FakeDownloader {
    fs: MemoryFilesystem,
    failing: Arc<Vec<&'static str>>,
    missing_repository: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Downloader for FakeDownloader {
    fn download(&self, url: &str, dest: &Path) -> ProgenResult<()> {
        self.calls.lock().unwrap().push(url.to_string());
        if self.failing.iter().any(|f| url.ends_with(f)) {
            return Err(ApplicationError::DownloadFailed {
                url: url.into(),
                reason: "connection reset by peer".into(),
            }
            .into());
        }
        let body = format!("# {{project_name}} settings from {url}\n");
        self.fs.write_file(dest, body.as_bytes())
    }

    fn probe(&self, _url: &str) -> ProgenResult<ProbeOutcome> {
        Ok(if self.missing_repository {
            ProbeOutcome::NotFound
        } else {
            ProbeOutcome::Reachable
        })
    }
}

/// Pretends to be poetry and git: `new` creates the project directory,
/// `init` creates `.git`. Statuses can be overridden per command prefix.
#[derive(Clone, Default)]
struct FakeRunner {
    fs: MemoryFilesystem,
    statuses: Arc<HashMap<&'static str, i32>>,
    panics_on: Option<&'static str>,
    calls: Arc<Mutex<Vec<(String, PathBuf, Vec<(String, String)>)>>>,
}

impl FakeRunner {
    fn commands(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(c, _, _)| c.clone())
            .collect()
    }
}

impl ProcessRunner for FakeRunner {
    fn run(
        &self,
        command: &CommandLine,
        cwd: &Path,
        on_line: &mut dyn FnMut(&str),
    ) -> ProgenResult<Option<i32>> {
        let rendered = command.to_string();
        self.calls
            .lock()
            .unwrap()
            .push((rendered.clone(), cwd.to_path_buf(), command.env.clone()));
        on_line(&format!("$ {rendered}"));

        if self.panics_on.is_some_and(|p| rendered.starts_with(p)) {
            panic!("runner crashed on {rendered}");
        }

        if let Some((_, status)) = self.statuses.iter().find(|(p, _)| rendered.starts_with(*p)) {
            return Ok(Some(*status));
        }
        match command.args.first().map(String::as_str) {
            Some("new") => self.fs.create_dir_all(Path::new(&command.args[1]))?,
            Some("init") => self.fs.create_dir_all(&cwd.join(".git"))?,
            _ => {}
        }
        Ok(Some(0))
    }
}

#[derive(Clone)]
struct FakeLocator {
    on_path: Option<PathBuf>,
}

impl ToolLocator for FakeLocator {
    fn which(&self, _name: &str) -> Option<PathBuf> {
        self.on_path.clone()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        Some(PathBuf::from("/home/dev"))
    }

    fn is_file(&self, _path: &Path) -> bool {
        false
    }
}

#[derive(Clone, Default)]
struct CollectingSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl OutputSink for CollectingSink {
    fn line(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }
}

struct Harness {
    fs: MemoryFilesystem,
    downloader: FakeDownloader,
    runner: FakeRunner,
    sink: CollectingSink,
    locator: FakeLocator,
    settings: SessionSettings,
}

impl Harness {
    /// Nine templates, toolchain on the search path, every command succeeds.
    fn new() -> Self {
        let fs = MemoryFilesystem::new();
        fs.add_dir("/work");
        let mut settings = SessionSettings::default();
        settings
            .templates
            .entries
            .push(TemplateSpec::new("k8s-values", "deploy/values.yaml"));

        Self {
            downloader: FakeDownloader {
                fs: fs.clone(),
                ..FakeDownloader::default()
            },
            runner: FakeRunner {
                fs: fs.clone(),
                ..FakeRunner::default()
            },
            sink: CollectingSink::default(),
            locator: FakeLocator {
                on_path: Some(PathBuf::from("/usr/bin/poetry")),
            },
            fs,
            settings,
        }
    }

    fn run(&self, request: SessionRequest) -> ProgenResult<SessionReport> {
        SessionController::new(
            Box::new(self.fs.clone()),
            Box::new(self.downloader.clone()),
            Box::new(self.runner.clone()),
            Box::new(self.locator.clone()),
            Box::new(self.sink.clone()),
            self.settings.clone(),
        )
        .run(&request)
    }

    fn downloads(&self) -> usize {
        self.downloader.calls.lock().unwrap().len()
    }

    fn output(&self) -> Vec<String> {
        self.sink.lines.lock().unwrap().clone()
    }

    fn assert_staging_removed_once(&self) {
        let staging = self.fs.staging_dirs();
        assert_eq!(staging.len(), 1);
        assert_eq!(self.fs.removal_count(&staging[0]), 1);
        assert!(!self.fs.exists(&staging[0]));
    }
}

#[test]
fn fresh_target_is_fully_provisioned() {
    let h = Harness::new();

    let report = h.run(SessionRequest::new("./myapp", "/work")).unwrap();

    assert_eq!(report.project.as_path(), Path::new("/work/myapp"));
    assert_eq!(report.templates, 9);
    assert_eq!(h.downloads(), 9);
    assert_eq!(report.pipeline.status, 0);
    assert_eq!(report.pipeline.executed, 10);
    assert_eq!(report.pipeline.total, 10);

    assert_eq!(
        h.runner.commands(),
        vec![
            "/usr/bin/poetry new /work/myapp".to_string(),
            "/usr/bin/poetry config virtualenvs.in-project true --local".to_string(),
            "/usr/bin/poetry config virtualenvs.create true --local".to_string(),
            format!(
                "/usr/bin/poetry add -D {}",
                h.settings.project.dev_dependencies.join(" ")
            ),
            "/usr/bin/poetry install".to_string(),
            "git init".to_string(),
            "/work/myapp/.venv/bin/pre-commit install".to_string(),
        ]
    );

    let gitignore = h.fs.read_to_string("/work/myapp/.gitignore").unwrap();
    assert_eq!(gitignore.lines().next(), Some("/.vscode"));
    assert!(
        h.fs.read_to_string("/work/myapp/peru.yaml")
            .unwrap()
            .contains("k8s-deploy")
    );

    let settings = h
        .fs
        .read_to_string("/work/myapp/.vscode/settings.json")
        .unwrap();
    assert!(settings.starts_with("# myapp settings from "));
    assert!(!settings.contains("{project_name}"));
    assert!(h.fs.exists(Path::new("/work/myapp/deploy/values.yaml")));

    let output = h.output();
    assert!(output.iter().any(|l| l.contains("\"myapp\"") && l.contains("successfully set up")));
    assert_eq!(output.last().map(String::as_str), Some("(*＾▽＾)/ Happy coding..."));

    h.assert_staging_removed_once();
}

#[test]
fn project_creation_runs_from_the_parent_directory() {
    let h = Harness::new();
    h.run(SessionRequest::new("myapp", "/work")).unwrap();

    let calls = h.runner.calls.lock().unwrap();
    assert_eq!(calls[0].1, PathBuf::from("/work"));
    assert!(calls[1..].iter().all(|(_, cwd, _)| cwd == Path::new("/work/myapp")));
}

#[test]
fn existing_repository_is_rejected_without_side_effects() {
    let h = Harness::new();
    h.fs.add_dir("/work/myapp/.git");

    let err = h.run(SessionRequest::new("./myapp", "/work")).unwrap_err();

    assert_eq!(
        err,
        ProgenError::Domain(DomainError::ReservedPathConflict {
            path: PathBuf::from("/work/myapp"),
            names: vec![".git".into()],
        })
    );
    assert_eq!(h.downloads(), 0);
    assert!(h.fs.staging_dirs().is_empty());
    assert!(h.runner.commands().is_empty());
}

#[test]
fn one_failed_download_aborts_before_the_pipeline() {
    let mut h = Harness::new();
    h.downloader.failing = Arc::new(vec!["Dockerfile"]);

    let err = h.run(SessionRequest::new("myapp", "/work")).unwrap_err();

    assert!(matches!(
        err,
        ProgenError::Application(ApplicationError::IncompleteAssets {
            fetched: 8,
            expected: 9,
            ..
        })
    ));
    assert!(h.runner.commands().is_empty());
    assert!(!h.output().iter().any(|l| l.contains("successfully")));
    h.assert_staging_removed_once();
}

#[test]
fn cached_templates_are_not_downloaded_again() {
    let h = Harness::new();
    // MemoryFilesystem names its first staging directory /tmp/progen-1.
    h.fs.add_file("/tmp/progen-1/templates/.env", "SECRET={project_name}\n");

    h.run(SessionRequest::new("myapp", "/work")).unwrap();

    assert_eq!(h.downloads(), 8);
    assert!(
        !h.downloader
            .calls
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.ends_with("/.env"))
    );
    assert_eq!(h.fs.read_to_string("/work/myapp/.env").unwrap(), "SECRET=myapp\n");
}

#[test]
fn failing_step_stops_the_pipeline_and_skips_the_banner() {
    let mut h = Harness::new();
    h.runner.statuses = Arc::new(HashMap::from([("git init", 128)]));

    let err = h.run(SessionRequest::new("myapp", "/work")).unwrap_err();

    assert_eq!(
        err,
        ProgenError::Application(ApplicationError::PipelineStepFailure {
            step: "git init".into(),
            status: 128,
        })
    );
    let commands = h.runner.commands();
    assert_eq!(commands.last().map(String::as_str), Some("git init"));
    assert_eq!(commands.len(), 6);
    assert!(!commands.iter().any(|c| c.ends_with("/.venv/bin/pre-commit install")));
    // Files from earlier steps stay.
    assert!(h.fs.exists(Path::new("/work/myapp/.gitignore")));
    assert!(!h.output().iter().any(|l| l.contains("Happy coding")));
    h.assert_staging_removed_once();
}

#[test]
fn panic_inside_a_step_still_removes_staging() {
    let mut h = Harness::new();
    h.runner.panics_on = Some("git init");

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        h.run(SessionRequest::new("myapp", "/work"))
    }));

    assert!(outcome.is_err());
    assert!(!h.output().iter().any(|l| l.contains("Happy coding")));
    h.assert_staging_removed_once();
}

#[test]
fn force_allows_reserved_entries_and_ignores_project_creation_errors() {
    let mut h = Harness::new();
    h.fs.add_dir("/work/myapp/.venv");
    h.runner.statuses = Arc::new(HashMap::from([("/usr/bin/poetry new", 1)]));

    let report = h
        .run(SessionRequest::new("myapp", "/work").force(true))
        .unwrap();

    assert_eq!(report.pipeline.executed, 10);
    assert_eq!(report.pipeline.status, 0);
}

#[test]
fn missing_toolchain_is_installed_from_the_fallback_mirror() {
    let mut h = Harness::new();
    h.locator.on_path = None;
    h.downloader.missing_repository = true;

    let report = h.run(SessionRequest::new("myapp", "/work")).unwrap();

    assert_eq!(report.toolchain, PathBuf::from("/home/dev/.poetry/bin/poetry"));
    let calls = h.runner.calls.lock().unwrap();
    let (installer, _, env) = &calls[0];
    assert!(installer.starts_with("python3 /tmp/progen-1/installer/get-poetry.py --yes"));
    assert_eq!(
        env,
        &vec![(
            "POETRY_BASE_URL".to_string(),
            "https://github.com/sdispater/poetry/releases/download/".to_string()
        )]
    );
    assert!(calls[1].0.starts_with("/home/dev/.poetry/bin/poetry new"));
}

#[test]
fn failed_installer_aborts_before_the_pipeline() {
    let mut h = Harness::new();
    h.locator.on_path = None;
    h.runner.statuses = Arc::new(HashMap::from([("python3", 1)]));

    let err = h.run(SessionRequest::new("myapp", "/work")).unwrap_err();

    assert!(matches!(
        err,
        ProgenError::Application(ApplicationError::ToolchainBootstrapFailure { .. })
    ));
    assert_eq!(h.runner.commands().len(), 1);
    h.assert_staging_removed_once();
}
