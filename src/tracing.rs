use std::cell::Cell;
use std::collections::HashMap;
use std::fmt::Write;
use std::io::stdout;
use std::num::NonZeroU64;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use thread_local::ThreadLocal;
use tracing::field::{Field, Visit};
use tracing::span::Id;
use tracing::{span, Event, Level, Metadata, Subscriber};
use tracing_core::Interest;

struct SpanState {
    parent: Option<Id>,
    /// number of existing handles; the span is removed from the map when this reaches zero
    reference_counter: AtomicUsize,
    /// span name followed by its recorded fields
    description: Mutex<FieldRecorder>,
    metadata: &'static Metadata<'static>,
    /// microseconds since creation of the subscriber, or 0 if the span is not entered
    entered_timestamp: AtomicU64,
    depth: usize
}

enum LogTarget {
    Stdout,
    Buffer(Arc<Mutex<Vec<String>>>)
}

impl LogTarget {

    fn write_line(&self, line: String) {
        match self {
            LogTarget::Stdout => {
                println!("{}", line);
                _ = std::io::Write::flush(&mut stdout());
            },
            LogTarget::Buffer(lines) => lines.lock().unwrap_or_else(PoisonError::into_inner).push(line)
        }
    }
}

///
/// A simple [`Subscriber`] that prints the tree of entered spans, together with the time
/// spent in them, and the events within them, one line each, indented by the depth of the span.
///
/// Spans deeper than `max_depth` and all their events are not printed.
///
pub struct LogAlgorithmSubscriber {
    span_ids: AtomicU64,
    span_map: RwLock<HashMap<Id, SpanState>>,
    current_span: ThreadLocal<Cell<Option<NonZeroU64>>>,
    default_instant: Instant,
    interested_level: RangeInclusive<Level>,
    max_depth: usize,
    target: LogTarget
}

impl LogAlgorithmSubscriber {

    fn new(levels: RangeInclusive<Level>, max_depth: usize, target: LogTarget) -> Self {
        LogAlgorithmSubscriber {
            span_ids: AtomicU64::new(1),
            span_map: RwLock::new(HashMap::new()),
            current_span: ThreadLocal::new(),
            default_instant: Instant::now(),
            interested_level: levels,
            max_depth: max_depth,
            target: target
        }
    }

    ///
    /// Installs the subscriber as global default, printing to stdout. Note that
    /// `Level::ERROR < Level::TRACE`, so `Level::INFO..=Level::TRACE` covers all levels
    /// at least as verbose as `INFO`.
    ///
    pub fn init(levels: RangeInclusive<Level>, max_depth: usize) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
        tracing::subscriber::set_global_default(Self::new(levels, max_depth, LogTarget::Stdout))
    }

    ///
    /// Installs a subscriber for tests, that prints warnings and debug output of the
    /// outermost spans. Does nothing if a global subscriber is already installed.
    ///
    pub fn init_test() {
        _ = Self::init(Level::WARN..=Level::DEBUG, 2);
    }

    ///
    /// Creates a subscriber that does not print, but collects its output lines in the
    /// returned buffer. Use it with [`tracing::subscriber::with_default()`].
    ///
    pub fn with_buffer(levels: RangeInclusive<Level>, max_depth: usize) -> (Self, Arc<Mutex<Vec<String>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        return (Self::new(levels, max_depth, LogTarget::Buffer(buffer.clone())), buffer);
    }

    fn span_map<'a>(&'a self) -> RwLockReadGuard<'a, HashMap<Id, SpanState>> {
        self.span_map.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn span_map_mut<'a>(&'a self) -> RwLockWriteGuard<'a, HashMap<Id, SpanState>> {
        self.span_map.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_span_cell(&self) -> &Cell<Option<NonZeroU64>> {
        self.current_span.get_or(|| Cell::new(None))
    }

    fn elapsed_micros(&self) -> u64 {
        // never 0, since 0 marks a span that is not entered
        Instant::now().duration_since(self.default_instant).as_micros() as u64 + 1
    }

    fn indent(depth: usize) -> String {
        "  ".repeat(depth)
    }
}

struct FieldRecorder {
    message: Option<String>,
    fields: Option<String>
}

impl FieldRecorder {

    fn new() -> Self {
        Self { message: None, fields: None }
    }

    fn to_string(&self) -> String {
        let mut result = self.message.clone().unwrap_or_default();
        if let Some(fields) = &self.fields {
            _ = write!(&mut result, "({})", fields);
        }
        return result;
    }
}

impl Visit for FieldRecorder {

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else if let Some(fields) = &mut self.fields {
            _ = write!(fields, ", {}={:?}", field.name(), value);
        } else {
            self.fields = Some(format!("{}={:?}", field.name(), value));
        }
    }
}

impl Subscriber for LogAlgorithmSubscriber {

    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        if self.interested_level.contains(metadata.level()) {
            Interest::always()
        } else {
            Interest::never()
        }
    }

    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.interested_level.contains(metadata.level())
    }

    fn current_span(&self) -> tracing_core::span::Current {
        let current = self.current_span_cell().get().map(Id::from_non_zero_u64);
        match current.and_then(|id| self.span_map().get(&id).map(|state| (id.clone(), state.metadata))) {
            Some((id, metadata)) => tracing_core::span::Current::new(id, metadata),
            None => tracing_core::span::Current::none()
        }
    }

    fn new_span(&self, span: &span::Attributes<'_>) -> Id {
        let id = Id::from_u64(self.span_ids.fetch_add(1, Ordering::Relaxed));
        let mut spans = self.span_map_mut();
        let parent = span.parent().cloned().or_else(|| self.current_span_cell().get().map(Id::from_non_zero_u64));
        let depth = parent.as_ref().and_then(|id| spans.get(id)).map(|state| state.depth + 1).unwrap_or(0);

        let mut description = FieldRecorder::new();
        span.record(&mut description);
        description.message = Some(span.metadata().name().to_owned());

        let previous = spans.insert(id.clone(), SpanState {
            parent: parent,
            depth: depth,
            metadata: span.metadata(),
            reference_counter: AtomicUsize::new(1),
            description: Mutex::new(description),
            entered_timestamp: AtomicU64::new(0)
        });
        assert!(previous.is_none());
        return id;
    }

    fn record(&self, span: &Id, values: &span::Record<'_>) {
        if let Some(state) = self.span_map().get(span) {
            values.record(&mut *state.description.lock().unwrap_or_else(PoisonError::into_inner));
        }
    }

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {
        // only parents are displayed
    }

    fn event(&self, event: &Event<'_>) {
        let span_map = self.span_map();
        let depth = self.current_span_cell().get()
            .and_then(|id| span_map.get(&Id::from_non_zero_u64(id)))
            .map(|state| state.depth + 1)
            .unwrap_or(0);
        if depth <= self.max_depth {
            let mut description = FieldRecorder::new();
            event.record(&mut description);
            self.target.write_line(format!("{}{} {}", Self::indent(depth), event.metadata().level(), description.to_string()));
        }
    }

    fn enter(&self, span: &Id) {
        self.current_span_cell().set(Some(span.into_non_zero_u64()));
        let span_map = self.span_map();
        if let Some(entered_span) = span_map.get(span) {
            let entered = entered_span.entered_timestamp.compare_exchange(0, self.elapsed_micros(), Ordering::SeqCst, Ordering::SeqCst);
            assert!(entered.is_ok(), "entered an already running span");
            if entered_span.depth <= self.max_depth {
                let description = entered_span.description.lock().unwrap_or_else(PoisonError::into_inner).to_string();
                self.target.write_line(format!("{}{}", Self::indent(entered_span.depth), description));
            }
        }
    }

    fn exit(&self, span: &Id) {
        let span_map = self.span_map();
        if let Some(exited_span) = span_map.get(span) {
            let entered_timestamp = exited_span.entered_timestamp.swap(0, Ordering::SeqCst);
            let time = self.elapsed_micros().saturating_sub(entered_timestamp);
            if exited_span.depth <= self.max_depth {
                self.target.write_line(format!("{}done {} ({}us)", Self::indent(exited_span.depth), exited_span.metadata.name(), time));
            }
            self.current_span_cell().set(exited_span.parent.as_ref().map(|id| id.into_non_zero_u64()));
        }
    }

    fn clone_span(&self, id: &Id) -> Id {
        if let Some(state) = self.span_map().get(id) {
            _ = state.reference_counter.fetch_add(1, Ordering::Relaxed);
        }
        return id.clone();
    }

    fn try_close(&self, id: Id) -> bool {
        let remaining_handles = match self.span_map().get(&id) {
            Some(state) => state.reference_counter.fetch_sub(1, Ordering::Relaxed) - 1,
            None => return false
        };
        if remaining_handles == 0 {
            _ = self.span_map_mut().remove(&id);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
fn collect_output<F: FnOnce()>(levels: RangeInclusive<Level>, max_depth: usize, f: F) -> Vec<String> {
    let (subscriber, buffer) = LogAlgorithmSubscriber::with_buffer(levels, max_depth);
    tracing::subscriber::with_default(subscriber, f);
    let result = buffer.lock().unwrap().clone();
    return result;
}

#[test]
fn test_span_tree() {
    let output = collect_output(Level::INFO..=Level::TRACE, 1, || {
        let outer = tracing::info_span!("outer", p = 5);
        let _outer = outer.enter();
        tracing::debug!(d = 2, "building");
        let inner = tracing::trace_span!("inner");
        let _inner = inner.enter();
        let innermost = tracing::trace_span!("innermost");
        let _innermost = innermost.enter();
        tracing::info!("hidden");
    });
    assert_eq!(5, output.len(), "{:?}", output);
    assert_eq!("outer(p=5)", output[0]);
    assert_eq!("  DEBUG building(d=2)", output[1]);
    assert_eq!("  inner", output[2]);
    assert!(output[3].starts_with("  done inner ("));
    assert!(output[4].starts_with("done outer"));
}

#[test]
fn test_levels() {
    let output = collect_output(Level::WARN..=Level::DEBUG, 2, || {
        tracing::warn!("shown");
        tracing::debug!("shown too");
        tracing::trace!("not shown");
        tracing::error!("not shown either");
    });
    assert_eq!(vec!["WARN shown".to_owned(), "DEBUG shown too".to_owned()], output);
}

#[test]
fn test_record() {
    let output = collect_output(Level::INFO..=Level::TRACE, 2, || {
        let span = tracing::info_span!("span", p = 7, class = tracing::field::Empty);
        span.record("class", 3);
        let _entered = span.enter();
    });
    assert_eq!("span(p=7, class=3)", output[0]);
}

#[test]
fn test_init_test() {
    LogAlgorithmSubscriber::init_test();
    LogAlgorithmSubscriber::init_test();
}
