//! Integration tests for Quark

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use quark::{create_signal, Atom, Effect, Signal, Trigger};


#[test]
fn atom_round_trip() {
    let atom = Atom::value(1);

    // Test read
    assert_eq!(atom.get(), 1);

    // Test write
    atom.set(42);
    assert_eq!(atom.get(), 42);

    // Test update
    atom.update(|n| n + 10);
    assert_eq!(atom.get(), 52);
}

#[test]
fn atom_increment_scenario() {
    let count = Atom::value(1);
    count.update(|n| n + 1);
    assert_eq!(count.get(), 2);
}

#[test]
fn convert_is_bijective_over_the_base() {
    let meters = Atom::value(2.0_f64);
    let millimeters = meters.convert(|m| m * 1000.0, |mm: f64| mm / 1000.0);

    assert_eq!(millimeters.get(), 2000.0);

    millimeters.set(500.0);
    assert_eq!(meters.get(), 0.5);
    assert_eq!(millimeters.get(), 500.0);
}

#[test]
fn read_only_atom() {
    let version = Atom::read_only(|| 5);
    assert_eq!(version.get(), 5);
    assert!(version.try_set(1).is_err());
}

#[test]
#[should_panic(expected = "no setter defined")]
fn read_only_write_panics() {
    let version = Atom::read_only(|| 5);
    version.set(1);
}

#[test]
fn deferred_writes_are_cancellable() {
    let parked: Arc<Mutex<Option<Trigger>>> = Arc::new(Mutex::new(None));
    let atom = Atom::value(0);
    let deferred = atom.defer({
        let parked = Arc::clone(&parked);
        move |trigger| {
            *parked.lock().unwrap() = Some(trigger);
            let parked = Arc::clone(&parked);
            Box::new(move || {
                parked.lock().unwrap().take();
            })
        }
    });

    deferred.set(1);
    deferred.set(2);

    // v1 was superseded before its trigger fired and must never land.
    let trigger = parked.lock().unwrap().take().unwrap();
    trigger();
    assert_eq!(atom.get(), 2);
}

#[test]
fn selector_group_behaves_like_radio_buttons() {
    let picked = Atom::value("red");
    let group = picked.selector();

    let red = group.select(|| "red", "none");
    let green = group.select(|| "green", "none");
    let blue = group.select(|| "blue", "none");

    assert!(red.get());
    assert!(!green.get());
    assert!(!blue.get());

    // Selecting one deselects the others through the shared parent.
    green.set(true);
    assert_eq!(picked.get(), "green");
    assert!(!red.get());
    assert!(green.get());

    // Deselecting a non-selected candidate changes nothing.
    blue.set(false);
    assert_eq!(picked.get(), "green");

    // Deselecting the selected candidate resets to the default.
    green.set(false);
    assert_eq!(picked.get(), "none");
}

#[test]
fn selector_observers_run_only_on_flips() {
    let picked = Atom::value(0);
    let group = picked.selector();
    let is_three = group.select(|| 3, 0);

    let runs = Arc::new(AtomicUsize::new(0));
    let _effect = Effect::new({
        let is_three = is_three.clone();
        let runs = Arc::clone(&runs);
        move || {
            let _ = is_three.get();
            runs.fetch_add(1, Ordering::SeqCst);
        }
    });
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    picked.set(1);
    picked.set(2);
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    picked.set(3);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[test]
fn source_forwards_to_external_atom() {
    let external = Atom::value(5);
    let binding = Signal::new(Some(external.clone()));
    let bound = Atom::source({
        let binding = binding.clone();
        move || binding.get()
    });

    assert_eq!(bound.get(), 5);
    bound.set(6);
    assert_eq!(external.get(), 6);
}

#[test]
fn source_fallback_retains_local_state() {
    let binding = Signal::new(None::<Atom<String>>);
    let bound = Atom::source({
        let binding = binding.clone();
        move || binding.get()
    });

    bound.set("typed locally".to_string());

    // Re-resolving with the binding still absent keeps the fallback value.
    binding.set(None);
    assert_eq!(bound.get(), "typed locally");

    // Attaching and removing an external atom never reconciles the two.
    let external = Atom::value("external".to_string());
    binding.set(Some(external.clone()));
    assert_eq!(bound.get(), "external");

    binding.set(None);
    assert_eq!(bound.get(), "typed locally");
    assert_eq!(external.get(), "external");
}

#[test]
fn update_reads_without_tracking() {
    let trigger = Atom::value(0);
    let counter = Atom::value(0);
    let runs = Arc::new(AtomicUsize::new(0));

    let _effect = Effect::new({
        let trigger = trigger.clone();
        let counter = counter.clone();
        let runs = Arc::clone(&runs);
        move || {
            let _ = trigger.get();
            // The untracked read inside update must not subscribe this
            // effect to `counter`, or the write below would loop.
            counter.update(|n| n + 1);
            runs.fetch_add(1, Ordering::SeqCst);
        }
    });

    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(counter.get(), 1);

    // Writes to `counter` from outside do not re-run the effect.
    counter.set(100);
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    trigger.set(1);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert_eq!(counter.get(), 101);
}

#[test]
fn touch_defers_to_the_cell_equality_policy() {
    // Plain cell: re-setting the same value notifies.
    let plain = Atom::value(1);
    let plain_runs = Arc::new(AtomicUsize::new(0));
    let _plain_effect = Effect::new({
        let plain = plain.clone();
        let runs = Arc::clone(&plain_runs);
        move || {
            let _ = plain.get();
            runs.fetch_add(1, Ordering::SeqCst);
        }
    });
    plain.touch();
    assert_eq!(plain_runs.load(Ordering::SeqCst), 2);

    // Equality-skipping cell: the same write is swallowed.
    let skipping = Atom::value_with_equals(1, |a, b| a == b);
    let skip_runs = Arc::new(AtomicUsize::new(0));
    let _skip_effect = Effect::new({
        let skipping = skipping.clone();
        let runs = Arc::clone(&skip_runs);
        move || {
            let _ = skipping.get();
            runs.fetch_add(1, Ordering::SeqCst);
        }
    });
    skipping.touch();
    assert_eq!(skip_runs.load(Ordering::SeqCst), 1);
}

#[test]
fn memoized_atom_caches_reads() {
    let (signal, set_signal) = create_signal(1);
    let reads = Arc::new(AtomicUsize::new(0));

    let counted = Atom::new(
        {
            let reads = Arc::clone(&reads);
            move || {
                reads.fetch_add(1, Ordering::SeqCst);
                signal.get()
            }
        },
        move |value| set_signal.set(value),
    );
    let memoized = counted.memo();

    assert_eq!(memoized.get(), 1);
    assert_eq!(memoized.get(), 1);
    assert_eq!(reads.load(Ordering::SeqCst), 1);

    // The memoized handle shares the setter; a write invalidates the cache.
    memoized.set(2);
    assert_eq!(memoized.get(), 2);
    assert_eq!(reads.load(Ordering::SeqCst), 2);
}
