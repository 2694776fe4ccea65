//! Diagnostic output.
//!
//! A watcher that can't stat its path at construction reports it exactly
//! once. Where that line goes is up to the caller: the default sink logs it
//! through `tracing`, tests usually collect it into a `Vec<String>`.

use tracing::error;

/// Receives formatted diagnostic lines.
pub trait DiagnosticSink {
    fn emit(&mut self, line: &str);
}

/// Logs every line at `error` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, line: &str) {
        error!("{}", line);
    }
}

/// Collects lines in memory.
impl DiagnosticSink for Vec<String> {
    fn emit(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

impl<F: FnMut(&str)> DiagnosticSink for F {
    fn emit(&mut self, line: &str) {
        self(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(sink: &mut dyn DiagnosticSink, line: &str) {
        sink.emit(line);
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut lines: Vec<String> = Vec::new();
        report(&mut lines, "first");
        report(&mut lines, "second");
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn test_closure_sink() {
        let mut count = 0;
        {
            let mut sink = |_: &str| count += 1;
            report(&mut sink, "x");
            report(&mut sink, "y");
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn test_tracing_sink_does_not_panic_without_subscriber() {
        report(&mut TracingSink, "nobody is listening");
    }
}
