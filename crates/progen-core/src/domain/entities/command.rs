use std::fmt;
use std::path::PathBuf;

/// An external program invocation: program, arguments, extra environment.
///
/// No shell is involved; arguments reach the program exactly as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{arg}'")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_only_when_needed() {
        let cmd = CommandLine::new("/usr/bin/poetry")
            .args(["config", "virtualenvs.in-project", "true"])
            .arg("a b");
        assert_eq!(
            cmd.to_string(),
            "/usr/bin/poetry config virtualenvs.in-project true 'a b'"
        );
    }

    #[test]
    fn env_is_not_rendered() {
        let cmd = CommandLine::new("python3").env("POETRY_BASE_URL", "https://x");
        assert_eq!(cmd.to_string(), "python3");
        assert_eq!(cmd.env.len(), 1);
    }
}
