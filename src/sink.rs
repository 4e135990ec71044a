//! Output sinks.
//!
//! A sink renders one element (tone, light, ...) for the given duration.
//! The keyer only calls it; a sink must return immediately and do its own
//! timing.

use crate::element::Element;

/// Renders keyed elements.
pub trait OutputSink {
    /// Render `element` for `duration_secs`. Must not block.
    fn emit(&mut self, element: Element, duration_secs: f64);

    /// Tone frequency for sinks that produce audio.
    fn set_frequency(&mut self, _frequency_hz: u32) {}
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn emit(&mut self, element: Element, duration_secs: f64) {
        (**self).emit(element, duration_secs)
    }

    fn set_frequency(&mut self, frequency_hz: u32) {
        (**self).set_frequency(frequency_hz)
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit(&mut self, _element: Element, _duration_secs: f64) {}
}

/// Logs every element through `tracing`.
///
/// Stand-in for tone or torch hardware when running on a host.
#[derive(Debug, Clone)]
pub struct TraceSink {
    frequency_hz: u32,
}

impl TraceSink {
    pub fn new(frequency_hz: u32) -> Self {
        Self { frequency_hz }
    }

    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }
}

impl OutputSink for TraceSink {
    fn emit(&mut self, element: Element, duration_secs: f64) {
        tracing::info!(
            element = %element,
            duration_ms = duration_secs * 1000.0,
            frequency_hz = self.frequency_hz,
            "{}",
            element.symbol()
        );
    }

    fn set_frequency(&mut self, frequency_hz: u32) {
        self.frequency_hz = frequency_hz;
    }
}

/// One recorded emission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emission {
    pub element: Element,
    pub duration_secs: f64,
    pub frequency_hz: u32,
}

/// Records emissions in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    emissions: Vec<Emission>,
    frequency_hz: u32,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emissions(&self) -> &[Emission] {
        &self.emissions
    }

    /// Emitted elements as a `.`/`-` string.
    pub fn symbols(&self) -> String {
        self.emissions.iter().map(|e| e.element.symbol()).collect()
    }

    pub fn clear(&mut self) {
        self.emissions.clear();
    }
}

impl OutputSink for RecordingSink {
    fn emit(&mut self, element: Element, duration_secs: f64) {
        self.emissions.push(Emission {
            element,
            duration_secs,
            frequency_hz: self.frequency_hz,
        });
    }

    fn set_frequency(&mut self, frequency_hz: u32) {
        self.frequency_hz = frequency_hz;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        sink.set_frequency(600);
        sink.emit(Element::Dah, 0.18);
        sink.emit(Element::Dit, 0.06);

        assert_eq!(sink.symbols(), "-.");
        assert_eq!(sink.emissions()[0].frequency_hz, 600);
    }

    #[test]
    fn test_boxed_sink_forwards() {
        let mut sink: Box<dyn OutputSink> = Box::new(NullSink);
        sink.emit(Element::Dit, 0.1);
        sink.set_frequency(700);
    }
}
