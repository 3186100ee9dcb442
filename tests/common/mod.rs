#![allow(dead_code)]

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use localkit::cmd::{Runner, format_command};
use localkit::error::{LaunchError, LaunchResult};

/// Records every command instead of running it. Commands containing a
/// `fail_on` pattern fail; `respond` patterns supply stdout.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    calls: Rc<RefCell<Vec<String>>>,
    failures: Rc<RefCell<Vec<String>>>,
    outputs: Rc<RefCell<Vec<(String, String)>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(self, pattern: &str) -> Self {
        self.failures.borrow_mut().push(pattern.to_string());
        self
    }

    pub fn respond(self, pattern: &str, stdout: &str) -> Self {
        self.outputs
            .borrow_mut()
            .push((pattern.to_string(), stdout.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn calls_matching(&self, pattern: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.contains(pattern))
            .collect()
    }

    fn record(&self, program: &str, args: &[&str]) -> LaunchResult<String> {
        let command = format_command(program, args);
        self.calls.borrow_mut().push(command.clone());

        if self.failures.borrow().iter().any(|p| command.contains(p.as_str())) {
            return Err(LaunchError::CommandFailed {
                command,
                code: Some(1),
            });
        }

        Ok(self
            .outputs
            .borrow()
            .iter()
            .find(|(p, _)| command.contains(p.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default())
    }
}

impl Runner for RecordingRunner {
    fn capture(&self, program: &str, args: &[&str], _cwd: Option<&Path>) -> LaunchResult<String> {
        self.record(program, args)
    }

    fn stream(&self, program: &str, args: &[&str], _cwd: Option<&Path>) -> LaunchResult<()> {
        self.record(program, args).map(|_| ())
    }
}

pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).unwrap();
    }
    std::fs::write(path, content).unwrap();
}
