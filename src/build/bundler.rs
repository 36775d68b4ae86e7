//! The bundler seam.
//!
//! [`Bundler`] is the only thing the rest of the crate knows about the
//! toolchain. [`CommandBundler`] drives an esbuild-compatible CLI:
//!
//! ```text
//! import shim ──stdin──▶ esbuild --bundle ... ──stdout──▶ bundle bytes
//!                                            ──stderr──▶ [ERROR] blocks
//! ```
//!
//! Reading the bundle from stdout keeps live builds entirely in memory.

use std::process::Output;
use std::sync::OnceLock;

use regex::Regex;

use crate::utils::exec::{Cmd, strip_ansi};

use super::{BuildResult, Bundle, BundlePlan, Diagnostic};

/// Turns a [`BundlePlan`] into a [`BuildResult`].
///
/// Implementations block until the build finishes and never panic or return
/// errors out of band: everything that goes wrong is a `Failure`.
pub trait Bundler: Send + Sync {
    fn bundle(&self, plan: &BundlePlan) -> BuildResult;
}

/// Menu runtime is written against preact; hacks may import from `react`.
const JSX_ARGS: &[&str] = &[
    "--jsx=automatic",
    "--jsx-import-source=preact",
    "--alias:react=preact/compat",
    "--alias:react-dom=preact/compat",
];

/// Runs an external esbuild-compatible command.
#[derive(Debug, Clone)]
pub struct CommandBundler {
    command: Vec<String>,
}

impl CommandBundler {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    /// Full argument list for `plan`, excluding the command itself.
    pub fn arguments(plan: &BundlePlan) -> Vec<String> {
        let (name, json) = &plan.define;
        let mut args = vec![
            "--bundle".to_string(),
            "--format=iife".to_string(),
            "--platform=browser".to_string(),
            "--loader=ts".to_string(),
            format!("--sourcefile={}", plan.output_name),
            format!("--resolve-dir={}", plan.root.display()),
            format!("--define:{name}={json}"),
            "--log-level=error".to_string(),
            "--color=false".to_string(),
        ];
        args.extend(JSX_ARGS.iter().map(ToString::to_string));
        if plan.minify {
            args.push("--minify".to_string());
        }
        args.extend(plan.extra_args.iter().cloned());
        args
    }

    fn program(&self) -> String {
        self.command.first().cloned().unwrap_or_default()
    }
}

impl Bundler for CommandBundler {
    fn bundle(&self, plan: &BundlePlan) -> BuildResult {
        let output = Cmd::from_slice(&self.command)
            .args(Self::arguments(plan))
            .cwd(&plan.root)
            .stdin(plan.import_shim())
            .output();

        match output {
            Ok(output) => interpret(output),
            Err(err) => BuildResult::fail(Diagnostic::from_error(
                format!("failed to run bundler `{}`", self.program()),
                &err,
            )),
        }
    }
}

fn interpret(output: Output) -> BuildResult {
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        return BuildResult::Failure(parse_diagnostics(&stderr, &output.status.to_string()));
    }
    if output.stdout.is_empty() {
        return BuildResult::fail(Diagnostic::new(
            "bundler produced no output",
            strip_ansi(stderr.trim()),
        ));
    }
    BuildResult::Success(Bundle::new(output.stdout))
}

/// Split esbuild-style stderr into diagnostics.
///
/// ```text
/// ✘ [ERROR] Expected ";" but found "}"
///
///     src/hacks/speed.ts:4:2:
///       4 │ }
///         ╵ ^
///
/// 1 error
/// ```
///
/// Each `[ERROR]` line starts a diagnostic; following lines (dedented) are
/// its trace. Output without any marker becomes one diagnostic carrying the
/// whole stderr, so nothing the bundler said is lost.
pub fn parse_diagnostics(stderr: &str, status: &str) -> Vec<Diagnostic> {
    static ERROR_LINE: OnceLock<Regex> = OnceLock::new();
    static SUMMARY_LINE: OnceLock<Regex> = OnceLock::new();
    let error_line = ERROR_LINE
        .get_or_init(|| Regex::new(r"^\s*(?:✘|X|×)?\s*\[ERROR\]\s*(.*)$").unwrap());
    let summary_line = SUMMARY_LINE
        .get_or_init(|| Regex::new(r"^\d+ (?:errors?|warnings?)(?: and \d+ warnings?)?$").unwrap());

    let stderr = strip_ansi(stderr);
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut traces: Vec<Vec<&str>> = Vec::new();

    for line in stderr.lines() {
        if let Some(caps) = error_line.captures(line) {
            diagnostics.push(Diagnostic::message(caps[1].trim()));
            traces.push(Vec::new());
        } else if summary_line.is_match(line.trim()) {
            continue;
        } else if let Some(trace) = traces.last_mut() {
            trace.push(line.trim_end());
        }
    }

    for (diagnostic, lines) in diagnostics.iter_mut().zip(traces) {
        diagnostic.trace = dedent(&lines);
    }

    if diagnostics.is_empty() {
        let trimmed = stderr.trim();
        let trace = if trimmed.is_empty() {
            "(no output on stderr)".to_string()
        } else {
            trimmed.to_string()
        };
        diagnostics.push(Diagnostic::new(format!("bundler failed ({status})"), trace));
    }
    diagnostics
}

/// Drop surrounding blank lines and the common indentation.
fn dedent(lines: &[&str]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    let (Some(start), Some(end)) = (start, end) else {
        return String::new();
    };
    let lines = &lines[start..=end];

    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| l.get(indent..).unwrap_or("").trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn plan(minify: bool) -> BundlePlan {
        BundlePlan {
            root: PathBuf::from("/menu"),
            entries: vec![PathBuf::from("/menu/src/index.ts")],
            define: ("CHEATMENUCONFIG".into(), r#"{"title":"T","categories":[]}"#.into()),
            output_name: "bundle.js".into(),
            minify,
            extra_args: vec!["--target=es2019".into()],
        }
    }

    #[test]
    fn test_arguments() {
        let args = CommandBundler::arguments(&plan(true));
        assert!(args.contains(&"--bundle".to_string()));
        assert!(args.contains(&"--resolve-dir=/menu".to_string()));
        assert!(args.contains(&r#"--define:CHEATMENUCONFIG={"title":"T","categories":[]}"#.to_string()));
        assert!(args.contains(&"--minify".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("--target=es2019"));

        assert!(!CommandBundler::arguments(&plan(false)).contains(&"--minify".to_string()));
    }

    #[test]
    fn test_parse_single_error() {
        let stderr = "✘ [ERROR] Expected \";\" but found \"}\"\n\n    src/hacks/speed.ts:4:2:\n      4 │ }\n        ╵ ^\n\n1 error\n";
        let diagnostics = parse_diagnostics(stderr, "exit status: 1");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Expected \";\" but found \"}\"");
        assert_eq!(
            diagnostics[0].trace,
            "src/hacks/speed.ts:4:2:\n  4 │ }\n    ╵ ^"
        );
    }

    #[test]
    fn test_parse_keeps_order() {
        let stderr = "X [ERROR] first\n\n    a.ts:1:1:\n\nX [ERROR] second\n\n2 errors\n";
        let diagnostics = parse_diagnostics(stderr, "exit status: 1");
        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(diagnostics[0].trace, "a.ts:1:1:");
        assert_eq!(diagnostics[1].trace, "");
    }

    #[test]
    fn test_parse_unstructured_output() {
        let stderr = "npm ERR! could not determine executable to run\n";
        let diagnostics = parse_diagnostics(stderr, "exit status: 1");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "bundler failed (exit status: 1)");
        assert!(diagnostics[0].trace.contains("could not determine executable"));
    }

    #[test]
    fn test_parse_empty_stderr() {
        let diagnostics = parse_diagnostics("", "signal: 9");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("signal: 9"));
    }

    #[test]
    fn test_missing_bundler_is_failure() {
        let bundler = CommandBundler::new(vec!["definitely-not-a-real-bundler-xyz".into()]);
        let mut plan = plan(false);
        plan.root = std::env::temp_dir();

        let result = bundler.bundle(&plan);
        let diagnostics = result.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("definitely-not-a-real-bundler-xyz"));
    }

    /// `sh -c 'cat'` echoes the import shim back as the "bundle".
    #[cfg(unix)]
    #[test]
    fn test_stdout_becomes_bundle() {
        let bundler = CommandBundler::new(vec!["sh".into(), "-c".into(), "cat".into(), "sh".into()]);
        let mut plan = plan(false);
        plan.root = std::env::temp_dir();
        plan.entries = vec![plan.root.join("src").join("index.ts")];

        match bundler.bundle(&plan) {
            BuildResult::Success(bundle) => {
                assert_eq!(bundle.text(), "import \"./src/index.ts\";\n");
            }
            BuildResult::Failure(d) => panic!("expected success, got {d:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_failure() {
        let script = "echo '✘ [ERROR] Could not resolve \"missing\"' >&2; exit 1";
        let bundler = CommandBundler::new(vec!["sh".into(), "-c".into(), script.into(), "sh".into()]);
        let mut plan = plan(false);
        plan.root = std::env::temp_dir();

        let result = bundler.bundle(&plan);
        assert!(result.bundle().is_none());
        assert_eq!(result.diagnostics()[0].message, "Could not resolve \"missing\"");
    }
}
