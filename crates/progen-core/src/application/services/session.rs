//! Session Controller - the outermost provisioning flow.
//!
//! One run:
//! 1. Validate the target path
//! 2. Create a staging area (removed on every exit path)
//! 3. Fetch templates into it; a short result aborts the run
//! 4. Ensure the dependency manager is runnable
//! 5. Build and run the ten-step pipeline
//! 6. Print the success banner

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ports::{Downloader, Filesystem, OutputSink, ProcessRunner, ToolLocator},
        services::{
            AssetFetcher, PathValidator, PipelineReport, PipelineRunner, Step,
            TemplateMaterializer, ToolchainBootstrapper,
        },
    },
    domain::{CachedAsset, CommandLine, SessionSettings, Substitutions, TargetPath, TemplateManifest},
    error::ProgenResult,
};

const STAGING_PREFIX: &str = "progen-";
const TEMPLATE_CACHE_DIR: &str = "templates";

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    /// Project name or path, relative to `base` unless absolute.
    pub target: PathBuf,
    pub base: PathBuf,
    /// Ignore reserved entries in an existing target.
    pub force: bool,
}

impl SessionRequest {
    pub fn new(target: impl Into<PathBuf>, base: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            base: base.into(),
            force: false,
        }
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub project: TargetPath,
    pub toolchain: PathBuf,
    pub templates: usize,
    pub pipeline: PipelineReport,
}

/// Owns the ports and settings for provisioning runs.
pub struct SessionController {
    filesystem: Box<dyn Filesystem>,
    downloader: Box<dyn Downloader>,
    runner: Box<dyn ProcessRunner>,
    locator: Box<dyn ToolLocator>,
    sink: Box<dyn OutputSink>,
    settings: SessionSettings,
}

impl SessionController {
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        downloader: Box<dyn Downloader>,
        runner: Box<dyn ProcessRunner>,
        locator: Box<dyn ToolLocator>,
        sink: Box<dyn OutputSink>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            filesystem,
            downloader,
            runner,
            locator,
            sink,
            settings,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Compile the configured manifest.
    pub fn manifest(&self) -> ProgenResult<TemplateManifest> {
        Ok(TemplateManifest::from_source(&self.settings.templates)?)
    }

    /// Provision one project.
    ///
    /// Any error leaves whatever earlier steps created on disk; only the
    /// staging area is cleaned up.
    pub fn run(&self, request: &SessionRequest) -> ProgenResult<SessionReport> {
        self.run_session(Uuid::new_v4(), request)
    }

    #[instrument(
        skip_all,
        fields(
            session = %session_id,
            target = %request.target.display(),
            force = request.force
        )
    )]
    fn run_session(&self, session_id: Uuid, request: &SessionRequest) -> ProgenResult<SessionReport> {
        let fs = self.filesystem.as_ref();

        let target = PathValidator::new(fs, &self.settings.project.reserved_names).validate(
            &request.target,
            &request.base,
            request.force,
        )?;
        let manifest = self.manifest()?;

        let staging = StagingArea::create(fs)?;
        let cache = staging.path().join(TEMPLATE_CACHE_DIR);

        let fetcher = AssetFetcher::new(fs, self.downloader.as_ref());
        let assets = fetcher.fetch(&manifest, &cache);
        AssetFetcher::require_complete(&manifest, &assets)?;
        info!(templates = assets.len(), "Templates ready");

        let toolchain = ToolchainBootstrapper::new(
            fs,
            self.downloader.as_ref(),
            self.runner.as_ref(),
            self.locator.as_ref(),
            self.sink.as_ref(),
            &self.settings.toolchain,
        )
        .ensure(staging.path())?;

        let steps = self.steps(&target, &toolchain, &assets, request.force);
        let pipeline = PipelineRunner::new(self.runner.as_ref(), self.sink.as_ref())
            .run(steps)
            .into_result()?;

        self.sink.success(&format!(
            "Your project \"{}\" is successfully set up!",
            target.name()
        ));
        self.sink.success("(*＾▽＾)/ Happy coding...");

        Ok(SessionReport {
            session_id,
            project: target,
            toolchain,
            templates: assets.len(),
            pipeline,
        })
    }

    /// The ordered provisioning steps for `target`.
    fn steps<'s>(
        &'s self,
        target: &'s TargetPath,
        toolchain: &Path,
        assets: &'s [CachedAsset],
        force: bool,
    ) -> Vec<Step<'s>> {
        let fs = self.filesystem.as_ref();
        let project = &self.settings.project;
        let root = target.as_path();
        let tool = || CommandLine::new(toolchain);

        let mut steps = vec![
            Step::command(
                tool().arg("new").arg(root.display().to_string()),
                target.parent(),
            )
            .ignore_error(force),
            Step::command(
                tool().args(["config", "virtualenvs.in-project", "true", "--local"]),
                root,
            ),
            Step::command(
                tool().args(["config", "virtualenvs.create", "true", "--local"]),
                root,
            ),
        ];

        if project.dev_dependencies.is_empty() {
            debug!("No dev dependencies configured; skipping add");
        } else {
            steps.push(Step::command(
                tool()
                    .args(["add", "-D"])
                    .args(project.dev_dependencies.iter().cloned()),
                root,
            ));
        }

        steps.push(Step::command(tool().arg("install"), root));

        let ignore_path = target.join(&project.ignore_file);
        steps.push(Step::callable(
            format!("write {}", project.ignore_file),
            move || fs.write_file(&ignore_path, project.ignore_file_contents().as_bytes()),
        ));

        let mirror_path = target.join(&project.mirror_manifest_file);
        steps.push(Step::callable(
            format!("write {}", project.mirror_manifest_file),
            move || fs.write_file(&mirror_path, project.mirror_manifest.as_bytes()),
        ));

        let substitutions = Substitutions::new().with(&project.placeholder, target.name());
        steps.push(Step::callable("install templates", move || {
            TemplateMaterializer::new(fs)
                .materialize(assets, target.as_path(), &substitutions)
                .map(|placed| debug!(placed, "Templates installed"))
        }));

        steps.push(Step::command(
            CommandLine::new(&project.vcs_program).arg("init"),
            root,
        ));
        steps.push(Step::command(
            CommandLine::new(target.join(&project.hook_installer)).arg("install"),
            root,
        ));

        steps
    }
}

/// Scratch directory removed when dropped.
struct StagingArea<'a> {
    filesystem: &'a dyn Filesystem,
    path: PathBuf,
}

impl<'a> StagingArea<'a> {
    fn create(filesystem: &'a dyn Filesystem) -> ProgenResult<Self> {
        let path = filesystem.create_staging_dir(STAGING_PREFIX)?;
        debug!(path = %path.display(), "Staging area created");
        Ok(Self { filesystem, path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagingArea<'_> {
    fn drop(&mut self) {
        match self.filesystem.remove_dir_all(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Staging area removed"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Cannot remove staging area"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::application::ports::output::{MockDownloader, MockFilesystem, MockToolLocator};
    use crate::application::services::test_support::{RecordingSink, ScriptedRunner};
    use crate::domain::{DomainError, ManifestSource, TemplateSpec};
    use crate::error::ProgenError;
    use mockall::predicate::eq;

    fn settings(paths: &[&str]) -> SessionSettings {
        SessionSettings {
            templates: ManifestSource {
                base_url: "https://t".into(),
                entries: paths.iter().map(|p| TemplateSpec::new(*p, *p)).collect(),
            },
            ..SessionSettings::default()
        }
    }

    fn controller(
        fs: MockFilesystem,
        dl: MockDownloader,
        locator: MockToolLocator,
        settings: SessionSettings,
    ) -> SessionController {
        SessionController::new(
            Box::new(fs),
            Box::new(dl),
            Box::new(ScriptedRunner::new()),
            Box::new(locator),
            Box::new(RecordingSink::default()),
            settings,
        )
    }

    #[test]
    fn reserved_conflict_stops_before_staging_or_network() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().return_const(true);
        fs.expect_list_dir()
            .returning(|_| Ok(vec![".git".to_string(), "README.md".to_string()]));
        fs.expect_create_staging_dir().never();
        let mut dl = MockDownloader::new();
        dl.expect_download().never();
        let mut locator = MockToolLocator::new();
        locator.expect_which().never();

        let err = controller(fs, dl, locator, settings(&[".env"]))
            .run(&SessionRequest::new("myapp", "/work"))
            .unwrap_err();

        assert_eq!(
            err,
            ProgenError::Domain(DomainError::ReservedPathConflict {
                path: PathBuf::from("/work/myapp"),
                names: vec![".git".into()],
            })
        );
    }

    #[test]
    fn incomplete_templates_skip_toolchain_and_clean_up_once() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().return_const(false);
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_create_staging_dir()
            .times(1)
            .returning(|_| Ok(PathBuf::from("/tmp/progen-1")));
        fs.expect_remove_dir_all()
            .with(eq(PathBuf::from("/tmp/progen-1")))
            .times(1)
            .returning(|_| Ok(()));
        let mut dl = MockDownloader::new();
        dl.expect_download().returning(|url, _| {
            if url.ends_with("Dockerfile") {
                Err(ApplicationError::DownloadFailed {
                    url: url.into(),
                    reason: "reset".into(),
                }
                .into())
            } else {
                Ok(())
            }
        });
        let mut locator = MockToolLocator::new();
        locator.expect_which().never();

        let err = controller(fs, dl, locator, settings(&[".env", "Dockerfile"]))
            .run(&SessionRequest::new("myapp", "/work"))
            .unwrap_err();

        assert!(matches!(
            err,
            ProgenError::Application(ApplicationError::IncompleteAssets {
                fetched: 1,
                expected: 2,
                ..
            })
        ));
    }

    #[test]
    fn default_plan_has_ten_steps_in_order() {
        let ctl = controller(
            MockFilesystem::new(),
            MockDownloader::new(),
            MockToolLocator::new(),
            SessionSettings::default(),
        );
        let target = TargetPath::resolve("myapp", "/work").unwrap();
        let steps = ctl.steps(&target, Path::new("/usr/bin/poetry"), &[], false);

        let labels: Vec<_> = steps.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels.len(), 10);
        assert_eq!(labels[0], "/usr/bin/poetry new /work/myapp");
        assert_eq!(labels[1], "/usr/bin/poetry config virtualenvs.in-project true --local");
        assert_eq!(labels[2], "/usr/bin/poetry config virtualenvs.create true --local");
        assert!(labels[3].starts_with("/usr/bin/poetry add -D black isort flake8"));
        assert_eq!(labels[4], "/usr/bin/poetry install");
        assert_eq!(labels[5], "write .gitignore");
        assert_eq!(labels[6], "write peru.yaml");
        assert_eq!(labels[7], "install templates");
        assert_eq!(labels[8], "git init");
        assert_eq!(labels[9], "/work/myapp/.venv/bin/pre-commit install");
    }

    #[test]
    fn project_creation_runs_in_the_parent_directory() {
        let ctl = controller(
            MockFilesystem::new(),
            MockDownloader::new(),
            MockToolLocator::new(),
            SessionSettings::default(),
        );
        let target = TargetPath::resolve("myapp", "/work").unwrap();
        let steps = ctl.steps(&target, Path::new("poetry"), &[], true);

        match &steps[0].action {
            crate::application::services::StepAction::Command {
                cwd, ignore_error, ..
            } => {
                assert_eq!(cwd, Path::new("/work"));
                assert!(*ignore_error);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn empty_dev_dependencies_drop_the_add_step() {
        let mut settings = SessionSettings::default();
        settings.project.dev_dependencies.clear();
        let ctl = controller(
            MockFilesystem::new(),
            MockDownloader::new(),
            MockToolLocator::new(),
            settings,
        );
        let target = TargetPath::resolve("myapp", "/work").unwrap();
        let steps = ctl.steps(&target, Path::new("poetry"), &[], false);
        assert_eq!(steps.len(), 9);
        assert!(steps.iter().all(|s| !s.label.contains(" add ")));
    }
}
