//! Fixed project skeletons that surround model output.

pub mod angular;
pub mod figma;
pub mod spring;

pub use angular::{
    APP_COMPONENT_CSS_PATH, APP_COMPONENT_HTML_PATH, APP_COMPONENT_TS_PATH, APP_MODULE_PATH,
    AngularProject, REQUIRED_FILES, missing_required_files,
};
pub use figma::with_workspace_defaults;
pub use spring::{
    analysis_project_files, complete_structure, integrate_java_methods,
    integrate_python_functions,
};
