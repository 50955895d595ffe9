use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use pscli::config::HostConfig;
use pscli::console::Style;
use pscli::error::RegistrationError;
use pscli::plugin::bundled::{BundledPlugin, Declarations};
use pscli::plugin::metadata::RawMetadata;
use pscli::plugin::LoadState;
use pscli::user::{CommandContext, CommandDecl, Outcome};
use pscli::{CliResult, Session};

type Calls = Arc<Mutex<Vec<(String, Vec<String>)>>>;

/// Bundled plugin whose commands record their invocations.
struct Recording {
    id: &'static str,
    category: &'static str,
    commands: Vec<(&'static str, Vec<&'static str>)>,
    calls: Calls,
}

impl BundledPlugin for Recording {
    fn id(&self) -> &str {
        self.id
    }

    fn metadata(&self) -> RawMetadata {
        RawMetadata::new("tester", self.category, "test", self.id)
    }

    fn declare(&self, decls: &mut Declarations) -> CliResult<()> {
        for (name, aliases) in &self.commands {
            let calls = Arc::clone(&self.calls);
            let handler = move |ctx: &CommandContext<'_>| -> CliResult<()> {
                calls
                    .lock()
                    .unwrap()
                    .push((ctx.name.to_string(), ctx.args().to_vec()));
                Ok(())
            };
            decls.command(CommandDecl::new(*name, handler).aliases(aliases.iter().copied()));
        }
        Ok(())
    }
}

fn recording(
    id: &'static str,
    category: &'static str,
    commands: Vec<(&'static str, Vec<&'static str>)>,
    calls: &Calls,
) -> Box<dyn BundledPlugin> {
    Box::new(Recording {
        id,
        category,
        commands,
        calls: Arc::clone(calls),
    })
}

fn config(dirs: &[&Path]) -> HostConfig {
    HostConfig {
        plugin_dirs: dirs.iter().map(|d| d.to_path_buf()).collect(),
        prompt: "> ".to_string(),
        ..HostConfig::default()
    }
}

fn drive(session: &Session, input: &str) -> String {
    let mut out = Vec::new();
    session.run_interactive(input.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn scenario_session(calls: &Calls) -> Session {
    Session::build_with(
        &config(&[]),
        Style::plain(),
        vec![
            recording("A", "text", vec![("echo", vec!["e"])], calls),
            recording("B", "math", vec![("calc", vec![])], calls),
            recording("C", "text", vec![("echo", vec![])], calls),
        ],
    )
}

#[test]
fn test_scenario_echo_missing_calc_exit() {
    let calls: Calls = Arc::default();
    let session = scenario_session(&calls);

    let out = drive(&session, "E hello\nmissing 1 2\ncalc\nexit\necho never\n");

    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            ("echo".to_string(), vec!["hello".to_string()]),
            ("calc".to_string(), vec![]),
        ]
    );
    assert!(out.contains("Unknown command: missing"));
    assert!(!out.contains("never"));
}

#[test]
fn test_scenario_conflicting_unit_is_rejected() {
    let calls: Calls = Arc::default();
    let session = scenario_session(&calls);

    assert_eq!(session.rejected().len(), 1);
    assert!(matches!(
        &session.rejected()[0],
        RegistrationError::Conflict { unit, key, .. } if unit == "C" && key == "echo"
    ));

    let outcome = session.run_once("echo hi", Vec::new()).unwrap();
    assert_eq!(
        outcome,
        Outcome::Completed {
            command: "echo".into()
        }
    );
    let entry = session.registry().find("echo").unwrap();
    assert_eq!(session.units()[entry.unit.0].id, "A");
}

#[test]
fn test_help_enumerates_registered_commands_by_group() {
    let calls: Calls = Arc::default();
    let session = scenario_session(&calls);

    let out = drive(&session, "help\n");
    assert!(out.contains("[text/test]\n  echo (e)"));
    assert!(out.contains("[math/test]\n  calc"));
    assert_eq!(out.matches("echo (e)").count(), 1);
    assert!(out.contains("1 plugin problem(s)"));
}

const LIST_MANIFEST: &str = r#"
author = "Jane"
category = "file list"
group = "system"
description = "List generator"

[[command]]
name = "list"
aliases = ["lg", "listgen"]
exec = ["true"]

[[command]]
name = "nope"
exec = ["false"]
"#;

#[test]
fn test_manifest_units_load_beside_broken_ones() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("10-list.toml"), LIST_MANIFEST).unwrap();
    fs::write(dir.path().join("20-broken.toml"), "[[command]\nname=").unwrap();
    fs::write(
        dir.path().join("30-clash.toml"),
        "[[command]]\nname = \"LG\"\nexec = [\"true\"]\n",
    )
    .unwrap();

    let session = Session::build_with(&config(&[dir.path()]), Style::plain(), Vec::new());

    let states: Vec<(&str, LoadState)> = session
        .units()
        .iter()
        .map(|u| (u.id.as_str(), u.state()))
        .collect();
    assert_eq!(
        states,
        vec![
            ("10-list", LoadState::Loaded),
            ("20-broken", LoadState::Failed),
            ("30-clash", LoadState::Loaded),
        ]
    );
    assert!(session.registry().find("LISTGEN").is_some());
    assert_eq!(session.rejected().len(), 1);

    let out = drive(&session, "plugins\n");
    assert!(out.contains("20-broken"));
    assert!(out.contains("invalid manifest"));
    assert!(out.contains("Rejected commands:"));
    assert!(out.contains("List generator [file list/system] by Jane"));
}

#[cfg(unix)]
#[test]
fn test_exec_commands_report_failures_and_continue() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("list.toml"), LIST_MANIFEST).unwrap();
    let session = Session::build_with(&config(&[dir.path()]), Style::plain(), Vec::new());

    assert_eq!(
        session.run_once("lg a b", Vec::new()).unwrap(),
        Outcome::Completed {
            command: "list".into()
        }
    );

    let mut out = Vec::new();
    let outcome = session.run_once("nope", &mut out).unwrap();
    assert!(matches!(outcome, Outcome::Failed { ref command, .. } if command == "nope"));
    assert!(String::from_utf8(out).unwrap().contains("command 'nope' failed"));
}

#[cfg(unix)]
#[test]
fn test_exec_runs_relative_to_manifest() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("touch.toml"),
        "[[command]]\nname = \"mark\"\nexec = [\"sh\", \"-c\", \"touch \\\"$0\\\"\"]\n",
    )
    .unwrap();
    let session = Session::build_with(&config(&[dir.path()]), Style::plain(), Vec::new());

    session.run_once("mark made.txt", Vec::new()).unwrap();
    assert!(dir.path().join("made.txt").exists());
}
