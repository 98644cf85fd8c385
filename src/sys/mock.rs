// src/sys/mock.rs

use std::collections::BTreeSet;
use std::ffi::CString;
use std::io;
use std::sync::{Arc, Mutex};

use super::Platform;
use crate::types::Fd;

/// One recorded platform operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    OpenNull,
    OpenEmptyPipe,
    MoveFd { src: Fd, dst: Fd },
    Close { fd: Fd, was_open: bool },
    NewSession,
    DropTerminal,
    RestoreSignals,
    ReplaceImage(Vec<String>),
}

#[derive(Debug, Default)]
struct MockState {
    open: BTreeSet<Fd>,
    calls: Vec<MockCall>,
}

/// Simulated process: a descriptor table plus knobs for every failure path.
///
/// Clones share state, so a test can keep a handle while the launcher owns
/// another.
#[derive(Debug, Clone)]
pub struct MockPlatform {
    state: Arc<Mutex<MockState>>,
    enumerable: bool,
    limit: Option<u64>,
    null_error: Option<io::ErrorKind>,
    pipe_error: Option<io::ErrorKind>,
    session_error: Option<io::ErrorKind>,
    terminal_error: Option<io::ErrorKind>,
    exec_error: Option<io::ErrorKind>,
    exec_supported: bool,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlatform {
    /// A process with only 0, 1 and 2 open, enumerable descriptors, a limit
    /// of 1024, and an `exec` that succeeds.
    pub fn new() -> Self {
        let mut state = MockState::default();
        state.open.extend([0, 1, 2]);
        Self {
            state: Arc::new(Mutex::new(state)),
            enumerable: true,
            limit: Some(1024),
            null_error: None,
            pipe_error: None,
            session_error: None,
            terminal_error: None,
            exec_error: None,
            exec_supported: true,
        }
    }

    pub fn with_open_fds(self, fds: impl IntoIterator<Item = Fd>) -> Self {
        self.state.lock().unwrap().open.extend(fds);
        self
    }

    pub fn with_stdin_closed(self) -> Self {
        self.state.lock().unwrap().open.remove(&0);
        self
    }

    pub fn with_enumeration(mut self, enumerable: bool) -> Self {
        self.enumerable = enumerable;
        self
    }

    pub fn with_limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_null_error(mut self, kind: io::ErrorKind) -> Self {
        self.null_error = Some(kind);
        self
    }

    pub fn with_pipe_error(mut self, kind: io::ErrorKind) -> Self {
        self.pipe_error = Some(kind);
        self
    }

    pub fn with_session_error(mut self, kind: io::ErrorKind) -> Self {
        self.session_error = Some(kind);
        self
    }

    pub fn with_terminal_error(mut self, kind: io::ErrorKind) -> Self {
        self.terminal_error = Some(kind);
        self
    }

    pub fn with_exec_error(mut self, kind: io::ErrorKind) -> Self {
        self.exec_error = Some(kind);
        self
    }

    pub fn without_exec(mut self) -> Self {
        self.exec_supported = false;
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Descriptors currently open in the simulated table.
    pub fn open_fds(&self) -> Vec<Fd> {
        self.state.lock().unwrap().open.iter().copied().collect()
    }

    fn record(&self, call: MockCall) {
        self.state.lock().unwrap().calls.push(call);
    }

    /// Lowest free descriptor, like `open(2)` and `pipe(2)` hand out.
    fn allocate(&self) -> Fd {
        let mut state = self.state.lock().unwrap();
        let fd = (0..).find(|fd| !state.open.contains(fd)).unwrap_or(0);
        state.open.insert(fd);
        fd
    }
}

impl Platform for MockPlatform {
    fn supports_exec(&self) -> bool {
        self.exec_supported
    }

    fn open_null(&mut self) -> io::Result<Fd> {
        self.record(MockCall::OpenNull);
        match self.null_error {
            Some(kind) => Err(io::Error::from(kind)),
            None => Ok(self.allocate()),
        }
    }

    fn open_empty_pipe(&mut self) -> io::Result<Fd> {
        self.record(MockCall::OpenEmptyPipe);
        if let Some(kind) = self.pipe_error {
            return Err(io::Error::from(kind));
        }
        // Write end is allocated and immediately closed again.
        let read_end = self.allocate();
        let write_end = self.allocate();
        self.state.lock().unwrap().open.remove(&write_end);
        Ok(read_end)
    }

    fn move_fd(&mut self, src: Fd, dst: Fd) -> io::Result<()> {
        self.record(MockCall::MoveFd { src, dst });
        if src == dst {
            return Ok(());
        }
        let mut state = self.state.lock().unwrap();
        if !state.open.remove(&src) {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "bad file descriptor"));
        }
        state.open.insert(dst);
        Ok(())
    }

    fn list_open_fds(&self) -> Option<Vec<Fd>> {
        if !self.enumerable {
            return None;
        }
        Some(self.open_fds())
    }

    fn fd_limit(&self) -> Option<u64> {
        self.limit
    }

    fn close_fd(&mut self, fd: Fd) -> bool {
        let was_open = self.state.lock().unwrap().open.remove(&fd);
        self.record(MockCall::Close { fd, was_open });
        was_open
    }

    fn new_session(&mut self) -> io::Result<()> {
        self.record(MockCall::NewSession);
        match self.session_error {
            Some(kind) => Err(io::Error::from(kind)),
            None => Ok(()),
        }
    }

    fn drop_controlling_terminal(&mut self) -> io::Result<()> {
        self.record(MockCall::DropTerminal);
        match self.terminal_error {
            Some(kind) => Err(io::Error::from(kind)),
            None => Ok(()),
        }
    }

    fn restore_signal_defaults(&mut self) -> io::Result<()> {
        self.record(MockCall::RestoreSignals);
        Ok(())
    }

    fn replace_image(&mut self, argv: &[CString]) -> io::Result<()> {
        let argv = argv
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        self.record(MockCall::ReplaceImage(argv));
        match (self.exec_supported, self.exec_error) {
            (false, _) => Err(io::Error::from(io::ErrorKind::Unsupported)),
            (true, Some(kind)) => Err(io::Error::from(kind)),
            (true, None) => Ok(()),
        }
    }
}
