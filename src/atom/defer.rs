use crate::atom::{Atom, AtomError};
use std::sync::{Arc, Mutex};

/// The callback a scheduler eventually fires to land a deferred write.
pub type Trigger = Box<dyn FnOnce() + Send>;

/// The callback a scheduler returns to cancel a pending trigger.
pub type CancelDeferred = Box<dyn FnOnce() + Send>;

impl<T: Clone + Send + Sync + 'static> Atom<T> {
    /// Defer writes through a caller-supplied scheduler.
    ///
    /// The returned atom reads like this one. A write hands the scheduler a
    /// [`Trigger`]; the value only reaches the underlying atom when the
    /// scheduler fires it. At most one write is pending per handle: a new
    /// write synchronously cancels the previous one (via the
    /// [`CancelDeferred`] the scheduler returned) before registering its
    /// own, so a superseded write never lands. The scheduler alone decides
    /// whether and when triggers fire; no timers live here.
    ///
    /// A deferred write onto a read-only atom panics at trigger time.
    ///
    /// # Examples
    ///
    /// ```
    /// use quark::{Atom, Trigger};
    /// use std::sync::{Arc, Mutex};
    ///
    /// // A by-hand scheduler that parks the trigger until the test fires it.
    /// let parked: Arc<Mutex<Option<Trigger>>> = Arc::new(Mutex::new(None));
    /// let atom = Atom::value(0);
    /// let deferred = atom.defer({
    ///     let parked = Arc::clone(&parked);
    ///     move |trigger| {
    ///         *parked.lock().unwrap() = Some(trigger);
    ///         let parked = Arc::clone(&parked);
    ///         Box::new(move || {
    ///             parked.lock().unwrap().take();
    ///         })
    ///     }
    /// });
    ///
    /// deferred.set(1);
    /// assert_eq!(atom.get(), 0); // nothing landed yet
    ///
    /// let trigger = parked.lock().unwrap().take().unwrap();
    /// trigger();
    /// assert_eq!(atom.get(), 1);
    /// ```
    pub fn defer<S>(&self, schedule: S) -> Atom<T>
    where
        S: Fn(Trigger) -> CancelDeferred + Send + Sync + 'static,
    {
        // None = idle, Some = a scheduled write is in flight.
        let pending: Arc<Mutex<Option<CancelDeferred>>> = Arc::new(Mutex::new(None));
        let read = Arc::clone(&self.read);
        let target = Arc::clone(&self.write);

        let write = move |value: T| -> Result<(), AtomError> {
            // Cancel the write still in flight, synchronously, before
            // registering the new one.
            let superseded = pending.lock().unwrap().take();
            if let Some(cancel) = superseded {
                cancel();
            }

            let trigger: Trigger = Box::new({
                let pending = Arc::clone(&pending);
                let target = Arc::clone(&target);
                move || {
                    // Clear the slot before writing so the landing write is
                    // no longer cancellable.
                    pending.lock().unwrap().take();
                    if let Err(err) = target(value) {
                        panic!("{err}");
                    }
                }
            });
            *pending.lock().unwrap() = Some(schedule(trigger));
            Ok(())
        };

        Atom::from_parts(read, Arc::new(write))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Parked = Arc<Mutex<Option<Trigger>>>;

    // Scheduler that parks triggers and counts cancellations.
    fn parking_scheduler(
        parked: Parked,
        cancels: Arc<AtomicUsize>,
    ) -> impl Fn(Trigger) -> CancelDeferred + Send + Sync + 'static {
        move |trigger| {
            *parked.lock().unwrap() = Some(trigger);
            let parked = Arc::clone(&parked);
            let cancels = Arc::clone(&cancels);
            Box::new(move || {
                parked.lock().unwrap().take();
                cancels.fetch_add(1, Ordering::SeqCst);
            })
        }
    }

    #[test]
    fn superseded_write_never_lands() {
        let parked: Parked = Arc::new(Mutex::new(None));
        let cancels = Arc::new(AtomicUsize::new(0));
        let atom = Atom::value(0);
        let deferred = atom.defer(parking_scheduler(Arc::clone(&parked), Arc::clone(&cancels)));

        deferred.set(1);
        deferred.set(2);

        // The first trigger was cancelled before the second was registered.
        assert_eq!(cancels.load(Ordering::SeqCst), 1);
        assert_eq!(atom.get(), 0);

        let trigger = parked.lock().unwrap().take().unwrap();
        trigger();
        assert_eq!(atom.get(), 2);
    }

    #[test]
    fn slot_clears_after_landing() {
        let parked: Parked = Arc::new(Mutex::new(None));
        let cancels = Arc::new(AtomicUsize::new(0));
        let atom = Atom::value(0);
        let deferred = atom.defer(parking_scheduler(Arc::clone(&parked), Arc::clone(&cancels)));

        deferred.set(1);
        let trigger = parked.lock().unwrap().take().unwrap();
        trigger();
        assert_eq!(atom.get(), 1);

        // A later write must not cancel the already-landed one.
        deferred.set(2);
        assert_eq!(cancels.load(Ordering::SeqCst), 0);

        let trigger = parked.lock().unwrap().take().unwrap();
        trigger();
        assert_eq!(atom.get(), 2);
    }

    #[test]
    fn reads_pass_through_while_pending() {
        let parked: Parked = Arc::new(Mutex::new(None));
        let cancels = Arc::new(AtomicUsize::new(0));
        let atom = Atom::value(10);
        let deferred = atom.defer(parking_scheduler(parked, cancels));

        deferred.set(20);
        assert_eq!(deferred.get(), 10);
    }
}
