//! Phase 5: Rendering the Properties File
//!
//! Produces the single properties text for the whole analysis:
//!
//! 1. Run identity: key, name, version and base directory.
//! 2. Source encoding, working directory and the run-wide settings.
//! 3. One block per valid project, prefixed with the project identifier.
//!    Product projects list their files under `sonar.sources`; test projects
//!    leave `sonar.sources` empty and list them under `sonar.tests`.
//! 4. `sonar.modules`, listing every rendered project in order.
//!
//! `PropertiesRenderer::finish` consumes the renderer, so no project can be
//! added after the module list has been written.

use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::properties::{Properties, PropertiesWriter};
use crate::record::{ProjectKind, ProjectRecord};
use crate::settings::ConsolidatedSetting;

/// Encoding declared for every analysed file
pub const SOURCE_ENCODING: &str = "UTF-8";

/// A valid project ready to be rendered
#[derive(Debug, Clone, Copy)]
pub struct RenderProject<'a> {
    pub record: &'a ProjectRecord,
    pub files: &'a [PathBuf],
    pub settings: &'a [ConsolidatedSetting],
}

/// One-shot renderer for a properties file
#[derive(Debug)]
pub struct PropertiesRenderer {
    writer: PropertiesWriter,
    project_key: String,
    modules: Vec<String>,
}

impl PropertiesRenderer {
    /// Start a file with the run identity and run-wide settings
    pub fn new(
        config: &RunConfig,
        base_dir: &Path,
        working_dir: &Path,
        global: &[ConsolidatedSetting],
    ) -> Self {
        let mut writer = PropertiesWriter::new();
        writer
            .property("sonar.projectKey", &config.project_key)
            .property("sonar.projectName", config.name())
            .property("sonar.projectVersion", config.version())
            .property("sonar.projectBaseDir", &path_str(base_dir))
            .blank_line()
            .property("sonar.sourceEncoding", SOURCE_ENCODING)
            .property("sonar.working.directory", &path_str(&working_dir.join(".sonar")));
        for setting in global {
            writer.property(&setting.key, &setting.value);
        }
        writer.blank_line();

        Self {
            writer,
            project_key: config.project_key.clone(),
            modules: Vec::new(),
        }
    }

    /// Append the block for one project
    pub fn add_project(&mut self, project: &RenderProject<'_>) -> &mut Self {
        let id = &project.record.identifier;
        let prefixed = |key: &str| format!("{}.{}", id, key);

        self.writer
            .property(
                &prefixed("sonar.projectKey"),
                &format!("{}:{}", self.project_key, id),
            )
            .property(&prefixed("sonar.projectName"), &project.record.name)
            .property(
                &prefixed("sonar.projectBaseDir"),
                &path_str(project.record.root_path()),
            );
        for setting in project.settings {
            self.writer.property(&prefixed(&setting.key), &setting.value);
        }

        let files: Vec<String> = project.files.iter().map(|f| path_str(f)).collect();
        match project.record.kind {
            ProjectKind::Product => {
                self.writer.list(&prefixed("sonar.sources"), &files);
            }
            ProjectKind::Test => {
                self.writer
                    .list::<String>(&prefixed("sonar.sources"), &[])
                    .list(&prefixed("sonar.tests"), &files);
            }
        }
        self.writer.blank_line();

        self.modules.push(id.clone());
        self
    }

    /// Write the module list and seal the output
    pub fn finish(mut self) -> Properties {
        self.writer
            .property("sonar.modules", &self.modules.join(","));
        self.writer.seal()
    }
}

/// Execute Phase 5: Render the complete properties text
pub fn execute(
    config: &RunConfig,
    base_dir: &Path,
    working_dir: &Path,
    global: &[ConsolidatedSetting],
    projects: &[RenderProject<'_>],
) -> Properties {
    let mut renderer = PropertiesRenderer::new(config, base_dir, working_dir, global);
    for project in projects {
        renderer.add_project(project);
    }
    renderer.finish()
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
