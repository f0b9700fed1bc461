use std::collections::VecDeque;

/// One chart sample: altitude in meters and impact pressure (chamber B) in kPa.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TelemetrySample {
    pub altitude: f64,
    pub pressure: f64,
}

impl TelemetrySample {
    pub fn new(altitude: f64, pressure: f64) -> Self { Self { altitude, pressure } }
}

/// A fixed-capacity FIFO of telemetry samples.
/// Insertion order is the chart's x-axis; when full, the oldest sample (at the front) is dropped.
#[derive(Debug, Clone)]
pub struct TelemetryBuffer {
    /// `VecDeque` holding the samples, oldest first
    list: VecDeque<TelemetrySample>,
    /// Maximum length of the queue
    size: usize,
}

impl TelemetryBuffer {
    /// Creates a new, empty `TelemetryBuffer` holding at most `size` samples.
    pub fn new(size: usize) -> Self { Self { list: VecDeque::with_capacity(size + 1), size } }

    /// Appends a sample at the back.
    ///
    /// If the size limit is exceeded, the sample at the front of the list is removed.
    pub fn append(&mut self, sample: TelemetrySample) {
        self.list.push_back(sample);
        while self.len() > self.size {
            self.list.pop_front();
        }
    }

    /// Copy of the whole history, oldest first.
    pub fn snapshot(&self) -> Vec<TelemetrySample> { self.list.iter().copied().collect() }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TelemetrySample> { self.list.iter() }

    /// Drops all samples.
    pub fn clear(&mut self) { self.list.clear(); }

    /// Returns a reference to the oldest sample, if present.
    pub fn front(&self) -> Option<&TelemetrySample> { self.list.front() }

    /// Returns a reference to the newest sample, if present.
    pub fn back(&self) -> Option<&TelemetrySample> { self.list.back() }

    pub fn len(&self) -> usize { self.list.len() }

    /// Maximum number of samples held.
    pub fn size(&self) -> usize { self.size }

    pub fn is_empty(&self) -> bool { self.list.is_empty() }
}
