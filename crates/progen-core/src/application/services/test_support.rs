//! Hand-written fakes for ports that mockall cannot express cleanly.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::{
    application::ports::{OutputSink, ProcessRunner},
    domain::CommandLine,
    error::ProgenResult,
};

/// Replays queued results in call order; once the queue is empty every
/// command exits with 0.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    replies: Mutex<VecDeque<ProgenResult<Option<i32>>>>,
    output: Vec<String>,
    calls: Mutex<Vec<(String, PathBuf)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, result: ProgenResult<Option<i32>>) -> Self {
        self.replies.lock().unwrap().push_back(result);
        self
    }

    pub fn printing(mut self, lines: &[&str]) -> Self {
        self.output = lines.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(c, _)| c.clone())
            .collect()
    }

    pub fn cwds(&self) -> Vec<PathBuf> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, d)| d.clone())
            .collect()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(
        &self,
        command: &CommandLine,
        cwd: &Path,
        on_line: &mut dyn FnMut(&str),
    ) -> ProgenResult<Option<i32>> {
        self.calls
            .lock()
            .unwrap()
            .push((command.to_string(), cwd.to_path_buf()));
        for line in &self.output {
            on_line(line);
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Some(0)))
    }
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    pub lines: Mutex<Vec<String>>,
}

impl OutputSink for RecordingSink {
    fn line(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }
}
