//! External text extraction tools

use std::path::Path;
use tokio::process::Command;

use crate::{ReadError, Result};

/// Run an extraction tool as `tool <before..> <path> <after..>` and
/// return its stdout
pub(crate) async fn run(
    tool: &str,
    before: &[&str],
    path: &Path,
    after: &[&str],
) -> Result<String> {
    let program = which::which(tool).map_err(|_| ReadError::ToolMissing(tool.to_string()))?;

    let output = Command::new(program)
        .args(before)
        .arg(path)
        .args(after)
        .output()
        .await?;

    if !output.status.success() {
        return Err(ReadError::ToolFailed {
            tool: tool.to_string(),
            path: path.display().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_tool_failure_reported() {
        // `false` exists on every unix and always exits non-zero
        let err = run("false", &[], Path::new("a.doc"), &[]).await.unwrap_err();
        assert!(matches!(err, ReadError::ToolFailed { ref tool, .. } if tool == "false"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_tool_stdout_captured() {
        let out = run("echo", &["第一行"], Path::new("第二行"), &[]).await.unwrap();
        assert_eq!(out.trim(), "第一行 第二行");
    }
}
