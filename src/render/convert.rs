//! Format conversion collaborators.

use std::io::Write;
use std::process::{Command, Stdio};

/// Errors raised while converting rendered content.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Converter '{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Conversion to '{0}' failed: {1}")]
    Other(String, String),
}

/// Transforms content rendered in an intermediate format into the target.
pub trait Converter {
    fn convert(&self, content: &[u8], target: &str) -> Result<Vec<u8>, ConvertError>;
}

/// Pipes content through an external program, stdin to stdout.
///
/// Arguments may contain `{format}`, replaced with the target format tag.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
}

impl CommandConverter {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl Converter for CommandConverter {
    fn convert(&self, content: &[u8], target: &str) -> Result<Vec<u8>, ConvertError> {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|a| a.replace("{format}", target))
            .collect();
        tracing::debug!(program = %self.program, ?args, target, "running converter");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // The child may fill stdout before it drains stdin.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = content.to_vec();
            std::thread::spawn(move || stdin.write_all(&input))
        });
        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // Programs that exit without reading all input close the pipe.
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => {
                    return Err(ConvertError::Other(
                        target.into(),
                        "stdin writer panicked".into(),
                    ))
                }
            }
        }

        if !output.status.success() {
            return Err(ConvertError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}
