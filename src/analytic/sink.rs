use parking_lot::Mutex;
use std::sync::Arc;

use super::frame::OutputFrame;

/// Latest-wins handoff of output frames from the producer to a render loop.
///
/// Frames are immutable once published; `publish` swaps the pointer and
/// `snapshot` clones it, so a reader never sees a half-written frame.
pub struct OutputSink {
    current: Mutex<Arc<OutputFrame>>,
}

impl OutputSink {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            current: Mutex::new(Arc::new(OutputFrame::silent(buffer_size))),
        }
    }

    pub fn publish(&self, frame: OutputFrame) -> Arc<OutputFrame> {
        let frame = Arc::new(frame);
        let previous = std::mem::replace(&mut *self.current.lock(), Arc::clone(&frame));
        // Release the old frame outside the lock.
        drop(previous);
        frame
    }

    pub fn snapshot(&self) -> Arc<OutputFrame> {
        Arc::clone(&self.current.lock())
    }

    pub fn sequence(&self) -> u64 {
        self.current.lock().sequence
    }
}
