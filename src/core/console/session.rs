use crate::core::console::sanitize::{contains_subsequence, sanitize_line};
use crate::core::console::transport::ConsoleTransport;
use crate::domain::config::ProtocolConfig;
use crate::domain::device::{DeviceInfo, SlaveDescriptor};
use crate::domain::error::{BoardComError, BoardComResult};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Command line terminator expected by the device console
const LINE_TERMINATOR: &[u8] = b"\r\n";
/// Token that activates the console task on the device
const CONSOLE_TOKEN: &[u8] = b"console\r\n";
/// Byte marking the console prompt line
const PROMPT_MARKER: u8 = b'>';
/// Escape byte introducing terminal control sequences
const ESCAPE: u8 = 0x1b;

/// Protocol timing knobs. Defaults match the device firmware; tests shrink
/// them to keep the retry loops fast.
#[derive(Debug, Clone)]
pub struct ConsoleTiming {
    /// Delay between opening the port and prompt detection
    pub settle_delay: Duration,
    /// Delay between the reset pulse and the console token
    pub reset_delay: Duration,
    /// Wall-clock deadline for prompt detection
    pub prompt_timeout: Duration,
    /// Deadline per transaction attempt, shared by the echo and response phases
    pub echo_timeout: Duration,
    /// Retries after the initial attempt before a command fails permanently
    pub max_retries: u32,
}

impl Default for ConsoleTiming {
    fn default() -> Self {
        Self::from(&ProtocolConfig::default())
    }
}

impl From<&ProtocolConfig> for ConsoleTiming {
    fn from(config: &ProtocolConfig) -> Self {
        Self {
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            reset_delay: Duration::from_millis(config.reset_delay_ms),
            prompt_timeout: Duration::from_millis(config.prompt_timeout_ms),
            echo_timeout: Duration::from_millis(config.echo_timeout_ms),
            max_retries: config.max_retries,
        }
    }
}

/// Stateful client for the line-oriented console a device firmware exposes
/// over its serial link.
///
/// The console is a shared asynchronous text stream with no framing: the
/// only reliable signal that a command started being processed is seeing it
/// echoed back. Every transaction therefore confirms the echo before
/// trusting anything else on the stream, and treats any per-attempt timeout
/// as a transient link glitch worth a full restart of the transaction.
///
/// A session exclusively owns its transport. All operations are synchronous
/// and blocking; `connected` gates every command method.
pub struct ConsoleSession<T: ConsoleTransport> {
    transport: T,
    connected: bool,
    prompt: String,
    last_response: Vec<u8>,
    timing: ConsoleTiming,
}

impl<T: ConsoleTransport> ConsoleSession<T> {
    /// Create a session over `transport` with default timing
    pub fn new(transport: T) -> Self {
        Self::with_timing(transport, ConsoleTiming::default())
    }

    /// Create a session with explicit timing
    pub fn with_timing(transport: T, timing: ConsoleTiming) -> Self {
        Self {
            transport,
            connected: false,
            prompt: String::new(),
            last_response: Vec::new(),
            timing,
        }
    }

    /// Whether the session has an established console
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Trimmed prompt line observed during connection
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Sanitized payload of the most recent completed transaction
    pub fn last_response(&self) -> &[u8] {
        &self.last_response
    }

    /// Establish the console session. Idempotent: an already connected
    /// session returns `true` without touching the transport. Any transport
    /// error or a missed prompt yields `false`, never an error.
    pub fn connect(&mut self) -> bool {
        if self.connected {
            return true;
        }
        match self.try_connect() {
            Ok(true) => true,
            Ok(false) => {
                debug!("prompt not detected, connection failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "transport error during connect");
                let _ = self.transport.close();
                false
            }
        }
    }

    fn try_connect(&mut self) -> BoardComResult<bool> {
        self.transport.open()?;
        thread::sleep(self.timing.settle_delay);
        let prompt = self.resolve_prompt()?;
        if prompt.is_empty() {
            // Leave the port closed so a later connect starts from scratch.
            self.transport.close()?;
            return Ok(false);
        }
        self.prompt = prompt;
        self.connected = true;
        debug!(prompt = %self.prompt, "console ready");
        Ok(true)
    }

    /// Reset the device into a known state and wait for the console prompt.
    /// Returns the trimmed prompt line, or an empty string when the deadline
    /// elapses first.
    fn resolve_prompt(&mut self) -> BoardComResult<String> {
        // Reset pulse: both control lines deasserted.
        self.transport.set_dtr(false)?;
        self.transport.set_rts(false)?;
        thread::sleep(self.timing.reset_delay);

        // Whatever the device printed while booting is not ours to parse.
        self.transport.flush_input()?;
        self.transport.write(CONSOLE_TOKEN)?;

        let deadline = Instant::now() + self.timing.prompt_timeout;
        loop {
            let line = self.transport.read_line()?;
            if line.contains(&PROMPT_MARKER) {
                let prompt = String::from_utf8_lossy(&line).trim().to_string();
                return Ok(prompt);
            }
            if line.is_empty() {
                // Nudge a mid-boot console into printing its prompt.
                self.transport.write(LINE_TERMINATOR)?;
            }
            if Instant::now() >= deadline {
                return Ok(String::new());
            }
        }
    }

    /// Tear down the session. No-op when not connected. The control lines
    /// are reasserted to their idle state before the port is closed, so the
    /// device is left in its hardware-idle state no matter why the session
    /// ended.
    pub fn disconnect(&mut self) {
        if !self.connected {
            return;
        }
        if let Err(e) = self.transport.set_dtr(true) {
            warn!(error = %e, "failed to reassert DTR");
        }
        if let Err(e) = self.transport.set_rts(true) {
            warn!(error = %e, "failed to reassert RTS");
        }
        if let Err(e) = self.transport.close() {
            warn!(error = %e, "failed to close transport");
        }
        self.connected = false;
        debug!("disconnected");
    }

    /// Send a command and confirm the device echoed it. No response payload
    /// is extracted; success only means the command was accepted.
    pub fn send_msg(&mut self, cmd: &str) -> BoardComResult<()> {
        if !self.connected {
            return Err(BoardComError::NotConnected);
        }
        let cmd_bytes = cmd.as_bytes();
        let frame = Self::frame(cmd_bytes);
        let attempts = self.timing.max_retries + 1;

        for attempt in 0..attempts {
            trace!(command = cmd, attempt, "sending message");
            self.last_response.clear();
            self.transport.write(&frame)?;

            let deadline = Instant::now() + self.timing.echo_timeout;
            while Instant::now() < deadline {
                let line = self.transport.read_line()?;
                if contains_subsequence(&line, cmd_bytes) {
                    trace!(command = cmd, "echo confirmed");
                    return Ok(());
                }
            }
            debug!(command = cmd, attempt, "echo not observed, retrying");
        }
        warn!(command = cmd, "device unresponsive");
        Err(BoardComError::Unresponsive { attempts })
    }

    /// Send a command, confirm its echo, and extract the single response
    /// line that follows, stripped of terminal artifacts. The sanitized
    /// payload is also stored as the session's last response.
    ///
    /// Each attempt runs under one fresh deadline shared by the echo-wait
    /// and escape-skip phases; a timeout in either phase restarts the whole
    /// transaction, including the input flush and the write.
    pub fn send_msg_with_return(&mut self, cmd: &str) -> BoardComResult<String> {
        if !self.connected {
            return Err(BoardComError::NotConnected);
        }
        let cmd_bytes = cmd.as_bytes();
        let frame = Self::frame(cmd_bytes);
        let attempts = self.timing.max_retries + 1;

        for attempt in 0..attempts {
            trace!(command = cmd, attempt, "sending message");
            self.last_response.clear();

            // Stale output from an earlier interaction must not be taken
            // for this command's echo.
            self.transport.flush_input()?;
            self.transport.write(&frame)?;

            let deadline = Instant::now() + self.timing.echo_timeout;

            let mut echoed = false;
            while Instant::now() < deadline {
                let line = self.transport.read_line()?;
                if contains_subsequence(&line, cmd_bytes) {
                    echoed = true;
                    break;
                }
            }
            if !echoed {
                debug!(command = cmd, attempt, "echo not observed, retrying");
                continue;
            }

            while Instant::now() < deadline {
                let line = self.transport.read_line()?;
                if line.is_empty() {
                    // Timed-out read: no data yet, keep waiting.
                    continue;
                }
                if line.contains(&ESCAPE) {
                    trace!("skipping terminal escape sequence line");
                    continue;
                }
                let cleaned = sanitize_line(&line);
                let text = String::from_utf8_lossy(&cleaned).into_owned();
                trace!(command = cmd, response = %text, "response received");
                self.last_response = cleaned;
                return Ok(text);
            }
            debug!(command = cmd, attempt, "response not observed, retrying");
        }
        warn!(command = cmd, "device unresponsive");
        Err(BoardComError::Unresponsive { attempts })
    }

    /// Query the four board identity fields. Best-effort aggregate: each
    /// field stays at its sentinel when its query fails, and the record is
    /// returned unconditionally.
    pub fn get_info(&mut self) -> DeviceInfo {
        debug!("querying board info");
        let mut info = DeviceInfo::default();
        if let Ok(response) = self.send_msg_with_return("get-board-info -t") {
            info.board_type = response;
        }
        if let Ok(response) = self.send_msg_with_return("get-board-info -n") {
            info.serial_num = response;
        }
        if let Ok(response) = self.send_msg_with_return("get-board-info -h") {
            info.hardware_var = response;
        }
        if let Ok(response) = self.send_msg_with_return("get-board-info -s") {
            info.version_fw = response;
        }
        info
    }

    /// Enumerate the sub-devices reachable through this board's console and
    /// query each one's identity. A command or parse failure yields an empty
    /// list; an empty list is a valid result meaning "no sub-devices".
    pub fn get_slaves(&mut self) -> Vec<DeviceInfo> {
        debug!("discovering sub-devices");
        let descriptors: Vec<SlaveDescriptor> = match self.send_msg_with_return("discover-slaves") {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(list) => list,
                Err(e) => {
                    warn!(error = %e, "unparseable discovery response");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(error = %e, "discovery command failed");
                Vec::new()
            }
        };

        descriptors
            .into_iter()
            .map(|slave| {
                let address = format!("{} {}", slave.board_type, slave.sn);
                let mut info = DeviceInfo::default();
                if let Ok(response) =
                    self.send_msg_with_return(&format!("get-slave-info {} -t", address))
                {
                    info.board_type = response;
                }
                if let Ok(response) =
                    self.send_msg_with_return(&format!("get-slave-info {} -n", address))
                {
                    info.serial_num = response;
                }
                if let Ok(response) =
                    self.send_msg_with_return(&format!("get-slave-info {} -h", address))
                {
                    info.hardware_var = response;
                }
                if let Ok(response) =
                    self.send_msg_with_return(&format!("get-slave-info {} -s", address))
                {
                    info.version_fw = response;
                }
                info
            })
            .collect()
    }

    /// Set the verbosity of the device-side console logger
    pub fn set_log_level(&mut self, level: &str) -> BoardComResult<()> {
        self.send_msg(&format!("log {}", level))
    }

    /// Put a sub-device into program mode so an external flashing tool can
    /// reach it. Only the console-side trigger; flashing itself is not this
    /// crate's concern.
    pub fn enter_program_mode(&mut self, board_type: &str, sn: &str) -> BoardComResult<()> {
        self.send_msg(&format!("program {} {}", board_type, sn))
    }

    /// Read the device id
    pub fn device_id(&mut self) -> BoardComResult<i64> {
        let response = self.send_msg_with_return("get-id")?;
        response
            .parse()
            .map_err(|_| BoardComError::InvalidData(format!("not an integer id: {:?}", response)))
    }

    /// Write the device id and verify it by reading it back
    pub fn set_device_id(&mut self, id: i64) -> BoardComResult<()> {
        self.send_msg(&format!("set-id {}", id))?;
        let readback = self.device_id()?;
        if readback != id {
            return Err(BoardComError::InvalidData(format!(
                "id read-back mismatch: expected {}, got {}",
                id, readback
            )));
        }
        Ok(())
    }

    fn frame(cmd: &[u8]) -> Vec<u8> {
        let mut frame = Vec::with_capacity(cmd.len() + LINE_TERMINATOR.len());
        frame.extend_from_slice(cmd);
        frame.extend_from_slice(LINE_TERMINATOR);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::device::UNDEFINED;
    use std::collections::VecDeque;

    type Responder = Box<dyn FnMut(&[u8]) -> Vec<Vec<u8>>>;

    /// Transport fake driven by a responder closure: every write is handed
    /// to the responder, which returns the lines the device would produce.
    struct FakeTransport {
        opened: bool,
        open_count: u32,
        fail_open: bool,
        writes: Vec<Vec<u8>>,
        rx: VecDeque<Vec<u8>>,
        responder: Option<Responder>,
        flushes: u32,
        dtr: Vec<bool>,
        rts: Vec<bool>,
    }

    impl FakeTransport {
        fn new() -> Self {
            Self {
                opened: false,
                open_count: 0,
                fail_open: false,
                writes: Vec::new(),
                rx: VecDeque::new(),
                responder: None,
                flushes: 0,
                dtr: Vec::new(),
                rts: Vec::new(),
            }
        }

        fn with_responder(responder: impl FnMut(&[u8]) -> Vec<Vec<u8>> + 'static) -> Self {
            let mut transport = Self::new();
            transport.responder = Some(Box::new(responder));
            transport
        }

        /// Writes that carry a command (everything but the bare nudge)
        fn command_writes(&self) -> Vec<&Vec<u8>> {
            self.writes
                .iter()
                .filter(|w| w.as_slice() != LINE_TERMINATOR)
                .collect()
        }
    }

    impl ConsoleTransport for FakeTransport {
        fn open(&mut self) -> BoardComResult<()> {
            if self.fail_open {
                return Err(BoardComError::Communication {
                    message: "no such port".to_string(),
                });
            }
            if !self.opened {
                self.opened = true;
                self.open_count += 1;
            }
            Ok(())
        }

        fn close(&mut self) -> BoardComResult<()> {
            self.opened = false;
            Ok(())
        }

        fn write(&mut self, data: &[u8]) -> BoardComResult<()> {
            self.writes.push(data.to_vec());
            if let Some(responder) = &mut self.responder {
                for line in responder(data) {
                    self.rx.push_back(line);
                }
            }
            Ok(())
        }

        fn read_line(&mut self) -> BoardComResult<Vec<u8>> {
            match self.rx.pop_front() {
                Some(line) => Ok(line),
                None => {
                    // Emulate the per-read timeout of a real port.
                    thread::sleep(Duration::from_millis(1));
                    Ok(Vec::new())
                }
            }
        }

        fn flush_input(&mut self) -> BoardComResult<()> {
            self.flushes += 1;
            self.rx.clear();
            Ok(())
        }

        fn set_dtr(&mut self, level: bool) -> BoardComResult<()> {
            self.dtr.push(level);
            Ok(())
        }

        fn set_rts(&mut self, level: bool) -> BoardComResult<()> {
            self.rts.push(level);
            Ok(())
        }
    }

    fn test_timing() -> ConsoleTiming {
        ConsoleTiming {
            settle_delay: Duration::ZERO,
            reset_delay: Duration::ZERO,
            prompt_timeout: Duration::from_millis(100),
            echo_timeout: Duration::from_millis(30),
            max_retries: 10,
        }
    }

    /// Session pre-marked as connected, bypassing prompt detection
    fn connected_session(transport: FakeTransport) -> ConsoleSession<FakeTransport> {
        let mut session = ConsoleSession::with_timing(transport, test_timing());
        session.connected = true;
        session
    }

    fn echo_with_reply(reply: &'static [u8]) -> impl FnMut(&[u8]) -> Vec<Vec<u8>> {
        move |written| vec![written.to_vec(), reply.to_vec()]
    }

    #[test]
    fn test_send_msg_fails_without_connection() {
        let mut session = ConsoleSession::with_timing(FakeTransport::new(), test_timing());
        let result = session.send_msg("get-id");
        assert!(matches!(result, Err(BoardComError::NotConnected)));
        assert!(session.transport.writes.is_empty());
    }

    #[test]
    fn test_send_msg_with_return_fails_without_connection() {
        let mut session = ConsoleSession::with_timing(FakeTransport::new(), test_timing());
        let result = session.send_msg_with_return("get-id");
        assert!(matches!(result, Err(BoardComError::NotConnected)));
        assert!(session.transport.writes.is_empty());
    }

    #[test]
    fn test_send_msg_confirmed_by_echo() {
        let transport = FakeTransport::with_responder(|written| vec![written.to_vec()]);
        let mut session = connected_session(transport);
        assert!(session.send_msg("log debug").is_ok());
        assert_eq!(session.transport.writes.len(), 1);
        assert_eq!(session.transport.writes[0], b"log debug\r\n".to_vec());
    }

    #[test]
    fn test_send_msg_with_return_extracts_sanitized_response() {
        let transport = FakeTransport::with_responder(echo_with_reply(b"  > OK 42 \r\n"));
        let mut session = connected_session(transport);
        let response = session.send_msg_with_return("get-board-info -t").unwrap();
        assert_eq!(response, "OK42");
        assert_eq!(session.last_response(), b"OK42");
        // Stale input is flushed before the command goes out.
        assert_eq!(session.transport.flushes, 1);
    }

    #[test]
    fn test_escape_lines_are_skipped() {
        let transport = FakeTransport::with_responder(|written| {
            vec![
                written.to_vec(),
                b"\x1b[0;32mI (1234) console:\x1b[0m\r\n".to_vec(),
                b"\x1b[0;33mwarning noise\x1b[0m\r\n".to_vec(),
                b"1.0.1\r\n".to_vec(),
            ]
        });
        let mut session = connected_session(transport);
        let response = session.send_msg_with_return("get-board-info -s").unwrap();
        assert_eq!(response, "1.0.1");
    }

    #[test]
    fn test_unresponsive_after_all_attempts() {
        let transport = FakeTransport::with_responder(|_| Vec::new());
        let mut session = connected_session(transport);
        let result = session.send_msg_with_return("get-id");
        assert!(matches!(
            result,
            Err(BoardComError::Unresponsive { attempts: 11 })
        ));
        // Initial attempt plus ten retries.
        assert_eq!(session.transport.command_writes().len(), 11);
    }

    #[test]
    fn test_send_msg_unresponsive_after_all_attempts() {
        let transport = FakeTransport::with_responder(|_| Vec::new());
        let mut session = connected_session(transport);
        let result = session.send_msg("log debug");
        assert!(matches!(
            result,
            Err(BoardComError::Unresponsive { attempts: 11 })
        ));
        assert_eq!(session.transport.command_writes().len(), 11);
    }

    #[test]
    fn test_echo_on_third_attempt_succeeds() {
        let mut attempt = 0;
        let transport = FakeTransport::with_responder(move |written| {
            attempt += 1;
            if attempt < 3 {
                Vec::new()
            } else {
                vec![written.to_vec(), b"7\r\n".to_vec()]
            }
        });
        let mut session = connected_session(transport);
        let response = session.send_msg_with_return("get-id").unwrap();
        assert_eq!(response, "7");
        assert_eq!(session.transport.command_writes().len(), 3);
    }

    #[test]
    fn test_last_response_cleared_on_failed_transaction() {
        let mut replies = VecDeque::from(vec![true, false]);
        let transport = FakeTransport::with_responder(move |written| {
            if replies.pop_front() == Some(true) {
                vec![written.to_vec(), b"first\r\n".to_vec()]
            } else {
                Vec::new()
            }
        });
        let mut session = connected_session(transport);
        assert_eq!(session.send_msg_with_return("get-id").unwrap(), "first");
        assert_eq!(session.last_response(), b"first");
        assert!(session.send_msg_with_return("get-id").is_err());
        assert!(session.last_response().is_empty());
    }

    #[test]
    fn test_connect_detects_prompt_and_is_idempotent() {
        let transport = FakeTransport::with_responder(|written| {
            if contains_subsequence(written, b"console") {
                vec![b"boot log line\r\n".to_vec(), b"> \r\n".to_vec()]
            } else {
                Vec::new()
            }
        });
        let mut session = ConsoleSession::with_timing(transport, test_timing());
        assert!(session.connect());
        assert!(session.is_connected());
        assert_eq!(session.prompt(), ">");
        let writes_after_first = session.transport.writes.len();

        // Second connect is a no-op: no further prompt-detection I/O.
        assert!(session.connect());
        assert_eq!(session.transport.writes.len(), writes_after_first);
        assert_eq!(session.transport.open_count, 1);
    }

    #[test]
    fn test_connect_nudges_silent_console() {
        let mut nudges = 0;
        let transport = FakeTransport::with_responder(move |written| {
            if written == LINE_TERMINATOR {
                nudges += 1;
                if nudges >= 3 {
                    return vec![b"> \r\n".to_vec()];
                }
            }
            Vec::new()
        });
        let mut session = ConsoleSession::with_timing(transport, test_timing());
        assert!(session.connect());
        assert!(session.is_connected());
    }

    #[test]
    fn test_connect_times_out_without_prompt() {
        let transport = FakeTransport::with_responder(|_| vec![b"no marker here\r\n".to_vec()]);
        let mut session = ConsoleSession::with_timing(transport, test_timing());
        assert!(!session.connect());
        assert!(!session.is_connected());
        // The port is closed again so a later connect starts clean.
        assert!(!session.transport.opened);
    }

    #[test]
    fn test_connect_reports_open_failure() {
        let mut transport = FakeTransport::new();
        transport.fail_open = true;
        let mut session = ConsoleSession::with_timing(transport, test_timing());
        assert!(!session.connect());
        assert!(!session.is_connected());
    }

    #[test]
    fn test_connect_resets_then_disconnect_restores_idle_lines() {
        let transport = FakeTransport::with_responder(|written| {
            if contains_subsequence(written, b"console") {
                vec![b">\r\n".to_vec()]
            } else {
                Vec::new()
            }
        });
        let mut session = ConsoleSession::with_timing(transport, test_timing());
        assert!(session.connect());
        assert_eq!(session.transport.dtr, vec![false]);
        assert_eq!(session.transport.rts, vec![false]);

        session.disconnect();
        assert!(!session.is_connected());
        assert!(!session.transport.opened);
        assert_eq!(session.transport.dtr, vec![false, true]);
        assert_eq!(session.transport.rts, vec![false, true]);

        // Disconnecting again is a no-op.
        session.disconnect();
        assert_eq!(session.transport.dtr, vec![false, true]);
    }

    #[test]
    fn test_get_info_is_best_effort() {
        let timing = ConsoleTiming {
            echo_timeout: Duration::from_millis(10),
            max_retries: 1,
            ..test_timing()
        };
        let transport = FakeTransport::with_responder(|written| {
            // Only the type query answers; the other three time out.
            if contains_subsequence(written, b"-t") {
                vec![written.to_vec(), b"CoreBoard\r\n".to_vec()]
            } else {
                Vec::new()
            }
        });
        let mut session = ConsoleSession::with_timing(transport, timing);
        session.connected = true;

        let info = session.get_info();
        assert_eq!(info.board_type, "CoreBoard");
        assert_eq!(info.serial_num, UNDEFINED);
        assert_eq!(info.hardware_var, UNDEFINED);
        assert_eq!(info.version_fw, UNDEFINED);
    }

    #[test]
    fn test_get_slaves_empty_discovery() {
        let transport = FakeTransport::with_responder(echo_with_reply(b"[]\r\n"));
        let mut session = connected_session(transport);
        assert!(session.get_slaves().is_empty());
        // Only the discovery command went out.
        assert_eq!(session.transport.command_writes().len(), 1);
    }

    #[test]
    fn test_get_slaves_queries_each_descriptor() {
        let transport = FakeTransport::with_responder(|written| {
            if contains_subsequence(written, b"discover-slaves") {
                vec![written.to_vec(), b"[{\"type\":\"X\",\"sn\":1}]\r\n".to_vec()]
            } else {
                vec![written.to_vec(), b"val\r\n".to_vec()]
            }
        });
        let mut session = connected_session(transport);
        let slaves = session.get_slaves();
        assert_eq!(slaves.len(), 1);
        assert_eq!(slaves[0].board_type, "val");
        assert_eq!(slaves[0].version_fw, "val");

        let follow_ups: Vec<_> = session
            .transport
            .command_writes()
            .into_iter()
            .filter(|w| contains_subsequence(w, b"get-slave-info X 1"))
            .cloned()
            .collect();
        assert_eq!(follow_ups.len(), 4);
    }

    #[test]
    fn test_get_slaves_tolerates_garbage_payload() {
        let transport = FakeTransport::with_responder(echo_with_reply(b"not json\r\n"));
        let mut session = connected_session(transport);
        assert!(session.get_slaves().is_empty());
    }

    #[test]
    fn test_device_id_parses_integer() {
        let transport = FakeTransport::with_responder(echo_with_reply(b"42\r\n"));
        let mut session = connected_session(transport);
        assert_eq!(session.device_id().unwrap(), 42);
    }

    #[test]
    fn test_device_id_rejects_garbage() {
        let transport = FakeTransport::with_responder(echo_with_reply(b"oops\r\n"));
        let mut session = connected_session(transport);
        assert!(matches!(
            session.device_id(),
            Err(BoardComError::InvalidData(_))
        ));
    }

    #[test]
    fn test_set_device_id_verifies_readback() {
        let transport = FakeTransport::with_responder(|written| {
            if contains_subsequence(written, b"get-id") {
                vec![written.to_vec(), b"7\r\n".to_vec()]
            } else {
                vec![written.to_vec()]
            }
        });
        let mut session = connected_session(transport);
        assert!(session.set_device_id(7).is_ok());
        assert!(matches!(
            session.set_device_id(9),
            Err(BoardComError::InvalidData(_))
        ));
    }

    #[test]
    fn test_timing_from_protocol_config() {
        let config = ProtocolConfig {
            settle_delay_ms: 10,
            reset_delay_ms: 20,
            prompt_timeout_ms: 500,
            echo_timeout_ms: 250,
            max_retries: 3,
        };
        let timing = ConsoleTiming::from(&config);
        assert_eq!(timing.settle_delay, Duration::from_millis(10));
        assert_eq!(timing.reset_delay, Duration::from_millis(20));
        assert_eq!(timing.prompt_timeout, Duration::from_millis(500));
        assert_eq!(timing.echo_timeout, Duration::from_millis(250));
        assert_eq!(timing.max_retries, 3);
    }
}
