//! Response extraction
//!
//! Turns free-text LLM replies into JSON values, cleaned single files and
//! `(path, content)` sets. Every function is pure and tolerant: a reply that
//! does not fit yields an empty or absent result rather than an error.

pub mod code;
pub mod files;
pub mod json;
pub mod naming;

pub use code::{clean_code, fenced_blocks, split_app_component, split_section};
pub use files::{
    DEFAULT_BASE_PACKAGE, JavaStructure, NO_ANGULAR_CODE, PYTHON_MODULES, base_package,
    extract_java_files, extract_java_structure, extract_named_blocks, extract_python_structure,
    normalize_java_path,
};
pub use json::{extract_json_object, parse_json_response, strip_json_fence};
pub use naming::{java_base_name, to_kebab_case};
