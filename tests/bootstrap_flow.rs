//! End-to-end bootstrap scenarios
//!
//! These tests drive the whole resolve → compile → launch → cleanup sequence
//! against a scripted process runner that behaves like a compiler: it writes
//! the `-out:` artifact unless a source contains a syntax error marker.

use sprove_bootstrap::build::{Bootstrap, BootstrapError, BootstrapOutcome, Stage};
use sprove_bootstrap::config::BootstrapConfig;
use sprove_bootstrap::process::{ProcessOutput, ProcessRunner};
use sprove_bootstrap::toolchain::{self, CompilerKind, Platform, ToolchainDescriptor, ToolchainError, ToolchainResolver};
use std::cell::{Cell, RefCell};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const SYNTAX_ERROR: &str = "SYNTAX_ERROR";

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Locate,
    Compile(Vec<String>),
    Version(String),
    Launch { program: PathBuf, args: Vec<String>, artifact_existed: bool },
}

struct CompilerDouble {
    launch_exit: i32,
    install_path: Option<PathBuf>,
    events: RefCell<Vec<Event>>,
    artifacts_written: Cell<usize>,
}

impl CompilerDouble {
    fn new(launch_exit: i32) -> Self {
        Self {
            launch_exit,
            install_path: None,
            events: RefCell::new(Vec::new()),
            artifacts_written: Cell::new(0),
        }
    }

    fn with_install(mut self, install: &Path) -> Self {
        self.install_path = Some(install.to_path_buf());
        self
    }

    fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    fn compile(&self, args: &[String]) -> io::Result<ProcessOutput> {
        self.events.borrow_mut().push(Event::Compile(args.to_vec()));

        let out = args
            .iter()
            .find_map(|a| a.strip_prefix("-out:"))
            .expect("compile without -out:");

        for input in args.iter().filter(|a| !a.starts_with('-')) {
            if fs::read_to_string(input)?.contains(SYNTAX_ERROR) {
                return Ok(ProcessOutput {
                    exit_code: 1,
                    stdout: String::new(),
                    stderr: format!("{}(1,1): error CS1525: Unexpected symbol\n", input),
                });
            }
        }

        fs::write(out, b"MZ")?;
        self.artifacts_written.set(self.artifacts_written.get() + 1);
        Ok(ProcessOutput {
            exit_code: 0,
            stdout: "Compilation succeeded\n".to_string(),
            stderr: String::new(),
        })
    }
}

impl ProcessRunner for CompilerDouble {
    fn run(&self, program: &Path, args: &[String]) -> io::Result<ProcessOutput> {
        if program.ends_with("vswhere.exe") {
            self.events.borrow_mut().push(Event::Locate);
            let stdout = self
                .install_path
                .as_ref()
                .map(|p| format!("{}\r\n", p.display()))
                .unwrap_or_default();
            return Ok(ProcessOutput {
                exit_code: 0,
                stdout,
                stderr: String::new(),
            });
        }

        if args.len() == 1 && args[0].ends_with("version") {
            self.events.borrow_mut().push(Event::Version(args[0].clone()));
            return Ok(ProcessOutput {
                exit_code: 0,
                stdout: "Compiler version 4.8.0\n".to_string(),
                stderr: String::new(),
            });
        }

        self.compile(args)
    }

    fn launch(&self, program: &Path, args: &[String]) -> io::Result<i32> {
        let artifact = args.first().map(PathBuf::from).unwrap_or_else(|| program.to_path_buf());
        self.events.borrow_mut().push(Event::Launch {
            program: program.to_path_buf(),
            args: args.to_vec(),
            artifact_existed: artifact.exists(),
        });
        Ok(self.launch_exit)
    }
}

struct Mcs;

impl ToolchainResolver for Mcs {
    fn resolve(&self) -> Result<ToolchainDescriptor, ToolchainError> {
        Ok(ToolchainDescriptor::wrapped(
            CompilerKind::Mcs,
            PathBuf::from("/usr/bin/mcs"),
            "mono",
        ))
    }
}

fn write_project(root: &Path, files: &[(&str, &str)]) {
    let src = root.join("Source").join("sprove");
    for (name, body) in files {
        let path = src.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }
}

fn run(root: &Path, runner: &CompilerDouble) -> Result<BootstrapOutcome, BootstrapError> {
    let config = BootstrapConfig::default();
    let (mut out, mut err) = (Vec::new(), Vec::new());
    Bootstrap::new(&config, root, &Mcs, runner).run(&mut out, &mut err)
}

#[test]
fn test_two_valid_sources_bootstrap_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[("Main.cs", "class Main {}"), ("Build/Target.cs", "class Target {}")],
    );
    let runner = CompilerDouble::new(0);

    let outcome = run(dir.path(), &runner).unwrap();

    assert_eq!(outcome, BootstrapOutcome::Success(0));
    assert_eq!(outcome.exit_code(), 0);
    assert!(!dir.path().join("sprove.exe").exists());

    let events = runner.events();
    assert_eq!(events.len(), 2);
    let Event::Compile(args) = &events[0] else {
        panic!("expected compile first, got {:?}", events[0]);
    };
    assert_eq!(args.iter().filter(|a| a.ends_with(".cs")).count(), 2);
    assert!(args.contains(&"-define:SPROVE_BOOTSTRAP".to_string()));
    assert!(!args.iter().any(|a| a.starts_with("-reference")));

    let Event::Launch { program, artifact_existed, .. } = &events[1] else {
        panic!("expected launch second, got {:?}", events[1]);
    };
    assert_eq!(program, &PathBuf::from("mono"));
    assert!(artifact_existed);
}

#[test]
fn test_syntax_error_aborts_before_launch() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), &[("Main.cs", "class Main { SYNTAX_ERROR")]);
    let runner = CompilerDouble::new(0);

    let outcome = run(dir.path(), &runner).unwrap();

    assert_eq!(
        outcome,
        BootstrapOutcome::Failure {
            stage: Stage::Compile,
            exit_code: 1
        }
    );
    assert_eq!(runner.artifacts_written.get(), 0);
    assert!(!dir.path().join("sprove.exe").exists());

    let events = runner.events();
    assert!(!events.iter().any(|e| matches!(e, Event::Launch { .. })));
    let versions = events.iter().filter(|e| matches!(e, Event::Version(_))).count();
    assert_eq!(versions, 1);
    assert_eq!(events.last(), Some(&Event::Version("--version".to_string())));
}

#[test]
fn test_failing_launch_still_removes_artifact() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), &[("Main.cs", "class Main {}"), ("Cache.cs", "class Cache {}")]);
    let runner = CompilerDouble::new(3);

    let outcome = run(dir.path(), &runner).unwrap();

    assert_eq!(
        outcome,
        BootstrapOutcome::Failure {
            stage: Stage::Launch,
            exit_code: 3
        }
    );
    assert!(!dir.path().join("sprove.exe").exists());
    assert!(!runner.events().iter().any(|e| matches!(e, Event::Version(_))));
}

#[test]
fn test_second_run_matches_first() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), &[("Main.cs", "class Main {}"), ("Solution.cs", "class Solution {}")]);

    let first = run(dir.path(), &CompilerDouble::new(0)).unwrap();
    assert!(!dir.path().join("sprove.exe").exists());

    let second = run(dir.path(), &CompilerDouble::new(0)).unwrap();
    assert!(!dir.path().join("sprove.exe").exists());

    assert_eq!(first.exit_code(), second.exit_code());
    assert_eq!(first, BootstrapOutcome::Success(0));
}

#[test]
fn test_locator_strategy_launches_natively() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("sprove");
    write_project(&root, &[("Main.cs", "class Main {}")]);

    let vswhere = root.join("Source/Vendor/vswhere/vswhere.exe");
    fs::create_dir_all(vswhere.parent().unwrap()).unwrap();
    fs::write(&vswhere, b"").unwrap();

    let install = dir.path().join("Microsoft Visual Studio/2019/BuildTools");
    let csc = install.join("MSBuild/Current/Bin/Roslyn/csc.exe");
    fs::create_dir_all(csc.parent().unwrap()).unwrap();
    fs::write(&csc, b"").unwrap();

    let runner = CompilerDouble::new(0).with_install(&install);
    let config = BootstrapConfig::default();
    let resolver = toolchain::resolver_for(Platform::Windows, &config, &root, &runner);

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let outcome = Bootstrap::new(&config, &root, resolver.as_ref(), &runner)
        .run(&mut out, &mut err)
        .unwrap();

    assert_eq!(outcome, BootstrapOutcome::Success(0));
    assert!(!root.join("sprove.exe").exists());

    let events = runner.events();
    assert_eq!(events[0], Event::Locate);
    let Event::Launch { program, args, artifact_existed } = &events[2] else {
        panic!("expected launch, got {:?}", events[2]);
    };
    assert_eq!(program, &root.join("sprove.exe"));
    assert!(args.is_empty());
    assert!(artifact_existed);

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains(&csc.display().to_string()));
}

#[test]
fn test_locator_without_installation_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_project(root, &[("Main.cs", "class Main {}")]);
    let vswhere = root.join("Source/Vendor/vswhere/vswhere.exe");
    fs::create_dir_all(vswhere.parent().unwrap()).unwrap();
    fs::write(&vswhere, b"").unwrap();

    let runner = CompilerDouble::new(0);
    let config = BootstrapConfig::default();
    let resolver = toolchain::resolver_for(Platform::Windows, &config, root, &runner);

    let (mut out, mut stderr) = (Vec::new(), Vec::new());
    let err = Bootstrap::new(&config, root, resolver.as_ref(), &runner)
        .run(&mut out, &mut stderr)
        .unwrap_err();

    assert!(matches!(err, BootstrapError::Toolchain(ToolchainError::NotFound(_))));
    assert!(err.to_string().contains("Visual Studio 2017"));
    assert_eq!(runner.events(), vec![Event::Locate]);
}
