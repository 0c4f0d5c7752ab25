//! Minimal typed event registries.
//!
//! `Listeners<T>` replaces reactive-stream subjects with a plain callback
//! registry: register, emit, unregister. Delivery is synchronous and in
//! registration order, so consumers observe changes in the order they were
//! produced.

/// Handle returned by [`Listeners::register`]; pass to `unregister`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Callback registry for one event type.
pub struct Listeners<T> {
    next_id: u64,
    entries: Vec<(u64, Box<dyn FnMut(&T)>)>,
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Listeners<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, f: impl FnMut(&T) + 'static) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, Box::new(f)));
        ListenerId(id)
    }

    /// Remove a listener. Returns `false` if the id was already gone.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(eid, _)| *eid != id.0);
        self.entries.len() != before
    }

    /// Deliver `event` to every listener, in registration order.
    pub fn emit(&mut self, event: &T) {
        for (_, f) in &mut self.entries {
            f(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Wall-clock debounce gate for consumers that recompute derived layout
/// (multi-select bounding boxes and the like) on every pointer event.
/// Callers supply their own timestamps, so this works the same under test
/// and when bridging timestamps in from a host UI loop.
#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl Debounce {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// True when at least `interval_ms` has passed since the last accepted
    /// call. The first call is always accepted.
    pub fn ready(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emit_delivers_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut reg: Listeners<i32> = Listeners::new();

        let a = seen.clone();
        reg.register(move |v| a.borrow_mut().push(("a", *v)));
        let b = seen.clone();
        reg.register(move |v| b.borrow_mut().push(("b", *v)));

        reg.emit(&1);
        reg.emit(&2);
        assert_eq!(
            *seen.borrow(),
            vec![("a", 1), ("b", 1), ("a", 2), ("b", 2)]
        );
    }

    #[test]
    fn unregister_stops_delivery() {
        let seen = Rc::new(RefCell::new(0));
        let mut reg: Listeners<()> = Listeners::new();
        let s = seen.clone();
        let id = reg.register(move |_| *s.borrow_mut() += 1);

        reg.emit(&());
        assert!(reg.unregister(id));
        assert!(!reg.unregister(id));
        reg.emit(&());
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn debounce_gates_by_interval() {
        let mut d = Debounce::new(15.0);
        assert!(d.ready(0.0));
        assert!(!d.ready(10.0));
        assert!(d.ready(16.0));
        assert!(!d.ready(30.0));
        assert!(d.ready(31.5));
    }
}
