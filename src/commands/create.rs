//! The `create` command: scaffold a unit test next to a component module.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::constants::TEST_DIR_NAME;
use crate::project::Project;

use super::error::CommandError;

#[derive(Clone, Debug, Serialize)]
pub struct CreateResult {
    pub message: String,
    pub test_path: PathBuf,
    pub class_name: String,
    pub element_name: String,
}

/// Scaffold `__tests__/{module}.test.js` beside the module at
/// `module_path` (absolute; the CLI resolves relative input against the
/// working directory). The module must be a `.js` file inside the project.
pub fn run(project: &Project, module_path: &Path) -> Result<CreateResult, CommandError> {
    if module_path.extension().and_then(OsStr::to_str) != Some("js") {
        return Err(CommandError::NotAJsModule {
            path: module_path.to_path_buf(),
        });
    }
    if !module_path.is_file() {
        return Err(CommandError::ModuleNotFound {
            path: module_path.to_path_buf(),
        });
    }
    project.rooted(module_path)?;

    let module_name = module_path
        .file_stem()
        .and_then(OsStr::to_str)
        .ok_or_else(|| CommandError::NotAJsModule {
            path: module_path.to_path_buf(),
        })?;
    let bundle_dir = module_path.parent().unwrap_or_else(|| Path::new("."));
    let test_dir = bundle_dir.join(TEST_DIR_NAME);
    let test_path = test_dir.join(format!("{module_name}.test.js"));
    if test_path.exists() {
        return Err(CommandError::TestFileExists { path: test_path });
    }

    let class_name = pascal_case(module_name);
    let element_name = element_name(module_name);
    let content = scaffold(module_name, &class_name, &element_name);

    fs::create_dir_all(&test_dir)
        .map_err(|source| CommandError::io("create directory", &test_dir, source))?;
    fs::write(&test_path, content).map_err(|source| CommandError::io("write", &test_path, source))?;
    log::info!("created {}", test_path.display());

    Ok(CreateResult {
        message: format!("created {}", test_path.display()),
        test_path,
        class_name,
        element_name,
    })
}

fn pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// `myButton` becomes `my-button`, the way custom-element tags are derived
/// from module names.
fn element_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn scaffold(module_name: &str, class_name: &str, element_name: &str) -> String {
    format!(
        "import {class_name} from '../{module_name}';

describe('{element_name}', () => {{
    afterEach(() => {{
        // jsdom state is shared across test cases in this file; reset the DOM
        while (document.body.firstChild) {{
            document.body.removeChild(document.body.firstChild);
        }}
    }});

    it('TODO: scaffolded test case, fill in test logic', () => {{
        const element = new {class_name}();
        document.body.appendChild(element);
        expect(1).toBe(2);
    }});
}});
"
    )
}
