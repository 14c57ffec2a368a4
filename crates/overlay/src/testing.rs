//! Test doubles for sinks, views and native output.

use crate::channel::Channel;
use crate::panel::PanelView;
use crate::sink::{Record, Sink};
use common::{Color, Px};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Sink that keeps every record it receives.
pub struct RecordingSink {
    records: Mutex<Vec<Record>>,
    active: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            active: AtomicBool::new(true),
        }
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.text.clone()).collect()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for RecordingSink {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn write(&self, record: &Record) {
        self.records.lock().push(record.clone());
    }
}

/// A call made on a [`RecordingView`].
#[derive(Clone, Debug, PartialEq)]
pub enum ViewCall {
    Mount(Px),
    Unmount,
    AppendLine(Channel),
    ScrollToLatest,
    SetOffset(Px),
}

#[derive(Default)]
struct ViewLog {
    calls: Vec<ViewCall>,
    lines: Vec<(Channel, Color, String)>,
    height: Px,
    mounted: bool,
}

/// Panel view that records calls instead of rendering.
///
/// Clones share state, so a test can keep one while the controller owns
/// another.
#[derive(Clone, Default)]
pub struct RecordingView {
    log: Arc<Mutex<ViewLog>>,
}

impl RecordingView {
    pub fn new(height: Px) -> Self {
        let view = Self::default();
        view.set_rendered_height(height);
        view
    }

    pub fn set_rendered_height(&self, height: Px) {
        self.log.lock().height = height;
    }

    pub fn calls(&self) -> Vec<ViewCall> {
        self.log.lock().calls.clone()
    }

    pub fn lines(&self) -> Vec<(Channel, Color, String)> {
        self.log.lock().lines.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.log.lock().mounted
    }

    pub fn last_offset(&self) -> Option<Px> {
        self.log.lock().calls.iter().rev().find_map(|call| match call {
            ViewCall::Mount(offset) | ViewCall::SetOffset(offset) => Some(*offset),
            _ => None,
        })
    }
}

impl PanelView for RecordingView {
    fn mount(&mut self, offset: Px) {
        let mut log = self.log.lock();
        log.mounted = true;
        log.calls.push(ViewCall::Mount(offset));
    }

    fn unmount(&mut self) {
        let mut log = self.log.lock();
        log.mounted = false;
        log.lines.clear();
        log.calls.push(ViewCall::Unmount);
    }

    fn append_line(&mut self, channel: Channel, color: Color, markup: &str) {
        let mut log = self.log.lock();
        log.lines.push((channel, color, markup.to_string()));
        log.calls.push(ViewCall::AppendLine(channel));
    }

    fn scroll_to_latest(&mut self) {
        self.log.lock().calls.push(ViewCall::ScrollToLatest);
    }

    fn set_offset(&mut self, offset: Px) {
        self.log.lock().calls.push(ViewCall::SetOffset(offset));
    }

    fn rendered_height(&self) -> Px {
        self.log.lock().height
    }

    fn line_count(&self) -> usize {
        self.log.lock().lines.len()
    }
}

/// In-memory writer whose clones share one buffer.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
