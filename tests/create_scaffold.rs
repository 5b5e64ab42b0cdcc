//! Scaffolding behavior of the `create` command.

mod common;

use std::fs;

use common::temp_root;
use testyard::commands::{create, CommandError};
use testyard::project::Project;

fn component_project() -> (tempfile::TempDir, Project) {
    let td = temp_root();
    fs::write(td.path().join("package.json"), "{\"name\":\"demo\"}").unwrap();
    let bundle = td.path().join("src/components");
    fs::create_dir_all(&bundle).unwrap();
    fs::write(
        bundle.join("myButton.js"),
        "export default class MyButton extends HTMLElement {}\n",
    )
    .unwrap();
    let project = Project::from_root(td.path().to_path_buf());
    (td, project)
}

#[test]
fn scaffolds_a_test_next_to_the_module() {
    let (td, project) = component_project();
    let module = td.path().join("src/components/myButton.js");

    let result = create::run(&project, &module).unwrap();
    assert_eq!(result.class_name, "MyButton");
    assert_eq!(result.element_name, "my-button");
    assert_eq!(
        result.test_path,
        td.path().join("src/components/__tests__/myButton.test.js")
    );

    let content = fs::read_to_string(&result.test_path).unwrap();
    assert!(content.contains("import MyButton from '../myButton';"));
    assert!(content.contains("describe('my-button'"));
}

#[test]
fn rejects_files_that_are_not_js_modules() {
    let (td, project) = component_project();
    let css = td.path().join("src/components/myButton.css");
    fs::write(&css, ":host { display: block; }\n").unwrap();

    let err = create::run(&project, &css).unwrap_err();
    assert!(matches!(err, CommandError::NotAJsModule { .. }), "{err}");
}

#[test]
fn rejects_missing_modules() {
    let (td, project) = component_project();
    let ghost = td.path().join("src/components/ghost.js");

    let err = create::run(&project, &ghost).unwrap_err();
    assert!(matches!(err, CommandError::ModuleNotFound { .. }), "{err}");
}

#[test]
fn rejects_an_existing_test_file() {
    let (td, project) = component_project();
    let module = td.path().join("src/components/myButton.js");
    create::run(&project, &module).unwrap();

    let err = create::run(&project, &module).unwrap_err();
    assert!(matches!(err, CommandError::TestFileExists { .. }), "{err}");
}

#[test]
fn rejects_modules_outside_the_project() {
    let (_td, project) = component_project();
    let elsewhere = temp_root();
    let foreign = elsewhere.path().join("widget.js");
    fs::write(&foreign, "export default class Widget {}\n").unwrap();

    let err = create::run(&project, &foreign).unwrap_err();
    assert!(matches!(err, CommandError::Path(_)), "{err}");
}
