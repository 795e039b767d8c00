//! Extraction progress tracking and delivery.
//!
//! Progress is a pair of monotonic counters (bytes written, entries
//! finished) folded into a bounded percentage, delivered to the caller
//! over a latest-value channel. One channel is created per operation and
//! moved into it; nothing is shared between operations.
//!
//! The percentage is computed as `processed_bytes / total_bytes`, capped
//! at 99.0 until the final entry has begun and fractionally below 100
//! after that. Uncompressed sizes are only an estimate of the work left
//! (a zero-byte final entry lets the byte ratio hit 100 while an entry is
//! still in flight), so exactly 100.0 is reported once, on the terminal
//! success update, and never before.

use tokio::sync::watch;

/// A point-in-time snapshot of extraction completion state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionProgress {
    /// Completion percentage in `0.0..=100.0`, non-decreasing within one
    /// operation; exactly 100.0 only on terminal success.
    pub percentage: f64,
    /// Name of the entry currently being processed.
    pub current_entry: Option<String>,
    pub total_entries: usize,
    pub processed_entries: usize,
}

/// Sending half of a per-operation progress channel.
///
/// Delivery is best-effort: a dropped receiver stops delivery but never
/// interrupts the extraction itself.
#[derive(Clone)]
pub struct ProgressSender {
    tx: watch::Sender<ExtractionProgress>,
}

impl ProgressSender {
    pub fn publish(&self, snapshot: ExtractionProgress) {
        // A closed channel just means the caller stopped watching.
        let _ = self.tx.send(snapshot);
    }
}

/// Receiving half of a per-operation progress channel.
///
/// Holds at most one buffered value; late subscribers observe only the
/// most recent snapshot, not the history.
pub type ProgressReceiver = watch::Receiver<ExtractionProgress>;

/// Create a fresh progress channel for one operation.
pub fn channel() -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = watch::channel(ExtractionProgress::default());
    (ProgressSender { tx }, rx)
}

/// Aggregates byte and entry counters into bounded progress snapshots
/// over the lifetime of one extraction operation.
pub struct ProgressTracker {
    total_bytes: u64,
    total_entries: usize,
    processed_bytes: u64,
    processed_entries: usize,
    current_entry: Option<String>,
    completed: bool,
}

impl ProgressTracker {
    /// Compute totals once up front from the full entry table.
    pub fn new(entry_sizes: impl IntoIterator<Item = u64>) -> Self {
        let mut total_bytes = 0u64;
        let mut total_entries = 0usize;
        for size in entry_sizes {
            total_bytes += size;
            total_entries += 1;
        }
        Self {
            total_bytes,
            total_entries,
            processed_bytes: 0,
            processed_entries: 0,
            current_entry: None,
            completed: false,
        }
    }

    /// Record that an entry is about to be processed.
    pub fn begin_entry(&mut self, name: &str) {
        self.current_entry = Some(name.to_string());
    }

    /// Record bytes written for the current entry.
    pub fn add_bytes(&mut self, n: u64) {
        self.processed_bytes += n;
    }

    /// Record that the current entry has been fully processed.
    pub fn finish_entry(&mut self) {
        self.processed_entries += 1;
    }

    /// Record terminal success; the next snapshot reports exactly 100.0.
    pub fn complete(&mut self) {
        self.completed = true;
        self.processed_entries = self.total_entries;
        self.current_entry = None;
    }

    /// Whether the entry currently in flight is the last one.
    fn final_entry_reached(&self) -> bool {
        self.processed_entries + 1 >= self.total_entries
    }

    pub fn snapshot(&self) -> ExtractionProgress {
        let percentage = if self.completed {
            // Terminal success overrides any cap.
            100.0
        } else if self.total_bytes == 0 {
            // Directory-only or empty archives have no byte total to
            // divide by; hold at zero until completion.
            0.0
        } else {
            let ratio = self.processed_bytes as f64 / self.total_bytes as f64 * 100.0;
            // Exactly 100.0 is reserved for the terminal update; until
            // then the final entry may only approach it.
            let cap = if self.final_entry_reached() { 99.9 } else { 99.0 };
            ratio.min(cap)
        };

        ExtractionProgress {
            percentage,
            current_entry: self.current_entry.clone(),
            total_entries: self.total_entries,
            processed_entries: self.processed_entries,
        }
    }
}
