// Terminal output for build reports
//
// Reports use GitHub Actions workflow commands so each triple folds into its
// own log group in CI.

use colored::Colorize;
use std::io::Write;

use crate::config::Environment;
use crate::domain::BuildAttempt;

/// Force colored output on unless `NO_COLOR` is set
///
/// Reports are read in CI logs where stdout is a pipe, which `colored`
/// would otherwise treat as "no color".
pub fn configure_color(env: &Environment) {
    colored::control::set_override(color_enabled(env));
}

fn color_enabled(env: &Environment) -> bool {
    env.get("NO_COLOR").is_none()
}

/// An error followed by each of its sources, joined with `: `
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Notice written to a triple's output before each external program starts
pub fn running_notice(program: &str) -> String {
    format!("{}\n", format!("⚙ Running {}...", program).green())
}

/// Render the report block for a finished triple
pub fn render_report(attempt: &BuildAttempt, error: Option<&dyn std::error::Error>) -> String {
    let triple = &attempt.triple;
    let title = format!(
        "version={} registry={} tag={}",
        triple.version, triple.registry, triple.tag
    );

    let mut report = String::from("::group::");
    match error {
        None => report.push_str(&format!("✅ {}", title).green().to_string()),
        Some(_) => report.push_str(&format!("❌ {}", title).red().to_string()),
    }
    report.push('\n');

    let output = String::from_utf8_lossy(&attempt.output);
    report.push_str(&output);
    if !output.is_empty() && !output.ends_with('\n') {
        report.push('\n');
    }

    if let Some(error) = error {
        report.push_str(&format!("{}\n", error_chain(error).red()));
    }
    report.push_str("::endgroup::\n");
    report
}

/// Write the report block for a finished triple and flush it
pub fn write_report<W: Write>(
    out: &mut W,
    attempt: &BuildAttempt,
    error: Option<&dyn std::error::Error>,
) -> std::io::Result<()> {
    out.write_all(render_report(attempt, error).as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProcessError, StepError};

    fn attempt(output: &str) -> BuildAttempt {
        let mut attempt = BuildAttempt::new("0.4.1", "docker.io/containerssh", "latest");
        attempt.output.extend_from_slice(output.as_bytes());
        attempt
    }

    #[test]
    fn test_success_report() {
        let report = render_report(&attempt("step output\n"), None);

        assert!(report.starts_with("::group::"));
        assert!(report.contains("✅ version=0.4.1 registry=docker.io/containerssh tag=latest"));
        assert!(report.contains("\nstep output\n"));
        assert!(report.ends_with("::endgroup::\n"));
        assert!(!report.contains("❌"));
    }

    #[test]
    fn test_failure_report() {
        let error = ProcessError::NonZeroExit {
            program: "docker".to_string(),
            code: Some(2),
        };
        let report = render_report(&attempt("partial"), Some(&error));

        assert!(report.contains("❌ version=0.4.1"));
        assert!(report.contains("docker exited with status 2"));
        // endgroup marker must start its own line
        assert!(report.contains("partial\n"));
        assert!(report.ends_with("::endgroup::\n"));
    }

    #[test]
    fn test_write_report() {
        let mut out = Vec::new();
        write_report(&mut out, &attempt(""), None).unwrap();

        let written = String::from_utf8(out).unwrap();
        assert_eq!(written.matches("::group::").count(), 1);
        assert_eq!(written.matches("::endgroup::").count(), 1);
    }

    #[test]
    fn test_failure_report_is_colored() {
        colored::control::set_override(true);
        let error = ProcessError::NonZeroExit {
            program: "docker".to_string(),
            code: Some(1),
        };
        let report = render_report(&attempt(""), Some(&error));

        assert!(report.contains("\x1b[31m❌ version=0.4.1"));
        assert!(report.contains("\x1b[31mdocker exited with status 1\x1b[0m"));
        assert!(running_notice("docker").starts_with("\x1b[32m⚙ Running docker..."));
    }

    #[test]
    fn test_no_color_env() {
        assert!(color_enabled(&Environment::default()));
        let env: Environment = [("NO_COLOR", "1")].into_iter().collect();
        assert!(!color_enabled(&env));
    }

    #[test]
    fn test_failure_report_includes_cause() {
        let attempt = attempt("");
        let error = StepError::TestFailed {
            triple: attempt.triple.clone(),
            source: ProcessError::NonZeroExit {
                program: "docker".to_string(),
                code: Some(1),
            },
        };
        let report = render_report(&attempt, Some(&error));

        assert!(report.contains(
            "tests failed for version 0.4.1 registry docker.io/containerssh tag latest: \
             docker exited with status 1"
        ));
    }
}
