//! End-to-end dispatch scenarios through the public API

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use winit::keyboard::NativeKeyCode;

use key_dispatch::diagnostics::FaultLog;
use key_dispatch::input::{
    FnListener, KeyCode, KeyEventDispatcher, KeyEventKind, KeyboardListener, ModifierSet,
    RawKeyTransition, RecordingListener, ScanCode, SharedListener, shared,
};

const NO_MODS: ModifierSet = ModifierSet::empty();
const SCAN_A: ScanCode = ScanCode(30);

/// Shared call log so ordering across listeners can be checked
type CallLog = Rc<RefCell<Vec<(String, KeyEventKind, KeyCode, ModifierSet)>>>;

fn logging_listener(name: &'static str, log: &CallLog) -> SharedListener {
    let log = Rc::clone(log);
    shared(FnListener::new(name, move |kind, key, _scancode, mods| {
        log.borrow_mut().push((name.to_string(), kind, key, mods));
    }))
}

fn names_and_kinds(log: &CallLog) -> Vec<(String, KeyEventKind)> {
    log.borrow()
        .iter()
        .map(|(name, kind, _, _)| (name.clone(), *kind))
        .collect()
}

#[test]
fn test_two_listener_press_repeat_release_scenario() {
    let mut dispatcher = KeyEventDispatcher::new();
    let log: CallLog = Rc::default();
    dispatcher.register_listener(logging_listener("L1", &log));
    dispatcher.register_listener(logging_listener("L2", &log));

    dispatcher.on_raw_transition(KeyCode::A, SCAN_A, NO_MODS, true);
    assert_eq!(
        log.borrow().clone(),
        vec![
            ("L1".to_string(), KeyEventKind::Down, KeyCode::A, NO_MODS),
            ("L2".to_string(), KeyEventKind::Down, KeyCode::A, NO_MODS),
        ]
    );
    log.borrow_mut().clear();

    dispatcher.dispatch_raw(RawKeyTransition::repeat(KeyCode::A, SCAN_A, NO_MODS));
    assert_eq!(
        names_and_kinds(&log),
        vec![
            ("L1".to_string(), KeyEventKind::Repeat),
            ("L2".to_string(), KeyEventKind::Repeat),
        ]
    );
    log.borrow_mut().clear();

    dispatcher.on_raw_transition(KeyCode::A, SCAN_A, NO_MODS, false);
    assert_eq!(
        names_and_kinds(&log),
        vec![
            ("L1".to_string(), KeyEventKind::Up),
            ("L2".to_string(), KeyEventKind::Up),
        ]
    );
    log.borrow_mut().clear();

    // Spurious second release
    let event = dispatcher.on_raw_transition(KeyCode::A, SCAN_A, NO_MODS, false);
    assert_eq!(event, None);
    assert!(log.borrow().is_empty());
}

#[test]
fn test_stray_press_while_down_is_one_repeat() {
    let mut dispatcher = KeyEventDispatcher::new();
    let recorder = shared(RecordingListener::new("recorder"));
    dispatcher.register_listener(recorder.clone());

    dispatcher.on_raw_transition(KeyCode::Enter, ScanCode(28), NO_MODS, true);
    dispatcher.on_raw_transition(KeyCode::Enter, ScanCode(28), NO_MODS, true);

    let recorder = recorder.borrow();
    assert_eq!(recorder.count(KeyEventKind::Down), 1);
    assert_eq!(recorder.count(KeyEventKind::Repeat), 1);
}

#[test]
fn test_shift_modifier_snapshot_is_immutable() {
    let mut dispatcher = KeyEventDispatcher::new();
    let recorder = shared(RecordingListener::new("recorder"));
    dispatcher.register_listener(recorder.clone());

    dispatcher.on_raw_transition(KeyCode::ShiftLeft, ScanCode(42), NO_MODS, true);
    let a_down = dispatcher
        .on_raw_transition(KeyCode::A, SCAN_A, ModifierSet::SHIFT, true)
        .unwrap();
    assert!(a_down.mods.shift());

    dispatcher.on_raw_transition(KeyCode::ShiftLeft, ScanCode(42), NO_MODS, false);
    dispatcher.on_raw_transition(KeyCode::A, SCAN_A, NO_MODS, false);

    let calls = recorder.borrow().calls().to_vec();
    let kinds: Vec<(KeyEventKind, KeyCode)> = calls.iter().map(|c| (c.kind, c.key)).collect();
    assert_eq!(
        kinds,
        vec![
            (KeyEventKind::Down, KeyCode::ShiftLeft),
            (KeyEventKind::Down, KeyCode::A),
            (KeyEventKind::Up, KeyCode::ShiftLeft),
            (KeyEventKind::Up, KeyCode::A),
        ]
    );
    assert_eq!(calls[0].mods, ModifierSet::SHIFT);
    assert_eq!(calls[1].mods, ModifierSet::SHIFT);
    assert_eq!(calls[3].mods, NO_MODS);
    assert!(a_down.mods.shift());
}

#[test]
fn test_unregister_during_fan_out_applies_to_next_event() {
    let mut dispatcher = KeyEventDispatcher::new();
    let log: CallLog = Rc::default();
    let registry = dispatcher.registry();

    let second: SharedListener = logging_listener("L2", &log);
    let target = Rc::clone(&second);
    let first_log = Rc::clone(&log);
    let first = shared(FnListener::new("L1", move |kind, key, _scancode, mods| {
        first_log
            .borrow_mut()
            .push(("L1".to_string(), kind, key, mods));
        registry.unregister(&target);
    }));

    dispatcher.register_listener(first);
    dispatcher.register_listener(second.clone());

    dispatcher.on_raw_transition(KeyCode::Q, ScanCode(16), NO_MODS, true);
    assert_eq!(
        names_and_kinds(&log),
        vec![
            ("L1".to_string(), KeyEventKind::Down),
            ("L2".to_string(), KeyEventKind::Down),
        ]
    );
    assert_eq!(dispatcher.listener_count(), 1);
    log.borrow_mut().clear();

    dispatcher.on_raw_transition(KeyCode::Q, ScanCode(16), NO_MODS, false);
    assert_eq!(names_and_kinds(&log), vec![("L1".to_string(), KeyEventKind::Up)]);
}

#[test]
fn test_register_during_fan_out_applies_to_next_event() {
    let mut dispatcher = KeyEventDispatcher::new();
    let registry = dispatcher.registry();
    let late = shared(RecordingListener::new("late"));
    let late_handle: SharedListener = late.clone();

    let first = shared(FnListener::new("first", move |_kind, _key, _scancode, _mods| {
        registry.register(Rc::clone(&late_handle));
    }));
    dispatcher.register_listener(first);

    dispatcher.on_raw_transition(KeyCode::E, ScanCode(18), NO_MODS, true);
    assert!(late.borrow().calls().is_empty());
    assert_eq!(dispatcher.listener_count(), 2);

    dispatcher.on_raw_transition(KeyCode::E, ScanCode(18), NO_MODS, false);
    assert_eq!(late.borrow().count(KeyEventKind::Up), 1);
}

#[test]
fn test_duplicate_registration_delivers_once() {
    let mut dispatcher = KeyEventDispatcher::new();
    let recorder = shared(RecordingListener::new("recorder"));

    assert!(dispatcher.register_listener(recorder.clone()));
    assert!(!dispatcher.register_listener(recorder.clone()));

    dispatcher.on_raw_transition(KeyCode::Z, ScanCode(44), NO_MODS, true);
    assert_eq!(recorder.borrow().calls().len(), 1);

    let handle: SharedListener = recorder.clone();
    assert!(dispatcher.unregister_listener(&handle));
    assert!(!dispatcher.unregister_listener(&handle));
}

struct Faulty;

impl KeyboardListener for Faulty {
    fn name(&self) -> &str {
        "faulty"
    }

    fn key_down(&mut self, _key: KeyCode, _scancode: ScanCode, _mods: ModifierSet) {
        panic!("faulty listener");
    }

    fn key_up(&mut self, _key: KeyCode, _scancode: ScanCode, _mods: ModifierSet) {
        panic!("faulty listener");
    }

    fn key_repeat(&mut self, _key: KeyCode, _scancode: ScanCode, _mods: ModifierSet) {}
}

#[test]
fn test_faulting_listener_does_not_skip_later_listeners() {
    let mut dispatcher = KeyEventDispatcher::new();
    let faults = Rc::new(RefCell::new(FaultLog::new()));
    dispatcher.set_fault_sink(faults.clone());

    let recorder = shared(RecordingListener::new("recorder"));
    dispatcher.register_listener(shared(Faulty));
    dispatcher.register_listener(recorder.clone());

    dispatcher.on_raw_transition(KeyCode::F5, ScanCode(63), NO_MODS, true);
    dispatcher.on_raw_transition(KeyCode::F5, ScanCode(63), NO_MODS, false);

    assert_eq!(recorder.borrow().calls().len(), 2);
    assert_eq!(faults.borrow().counts("faulty").panicked, 2);
    assert_eq!(dispatcher.listener_count(), 2);
}

#[test]
fn test_unknown_keys_are_dispatched() {
    let mut dispatcher = KeyEventDispatcher::new();
    let recorder = shared(RecordingListener::new("recorder"));
    dispatcher.register_listener(recorder.clone());

    let media = KeyCode::Native(NativeKeyCode::Xkb(0x1008ff14));
    dispatcher.on_raw_transition(media, ScanCode(164), NO_MODS, true);
    dispatcher.on_raw_transition(media, ScanCode(164), NO_MODS, false);

    let recorder = recorder.borrow();
    assert_eq!(recorder.count(KeyEventKind::Down), 1);
    assert_eq!(recorder.count(KeyEventKind::Up), 1);
    assert_eq!(recorder.calls()[0].scancode, ScanCode(164));
}

#[test]
fn test_random_traces_keep_up_down_balanced() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..50 {
        let mut dispatcher = KeyEventDispatcher::new();
        let recorder = shared(RecordingListener::new("recorder"));
        dispatcher.register_listener(recorder.clone());

        for _ in 0..200 {
            let was_down = dispatcher.is_down(KeyCode::K);
            let raw = match rng.random_range(0..3) {
                0 => RawKeyTransition::press(KeyCode::K, ScanCode(37), NO_MODS),
                1 => RawKeyTransition::repeat(KeyCode::K, ScanCode(37), NO_MODS),
                _ => RawKeyTransition::release(KeyCode::K, ScanCode(37), NO_MODS),
            };
            let before = recorder.borrow().calls().len();
            let event = dispatcher.dispatch_raw(raw);
            let after = recorder.borrow().calls().len();

            match (raw.pressed, was_down) {
                (true, true) => assert_eq!(event.map(|e| e.kind), Some(KeyEventKind::Repeat)),
                (true, false) => assert_eq!(event.map(|e| e.kind), Some(KeyEventKind::Down)),
                (false, true) => assert_eq!(event.map(|e| e.kind), Some(KeyEventKind::Up)),
                (false, false) => {
                    assert_eq!(event, None);
                    assert_eq!(before, after);
                }
            }

            let recorder = recorder.borrow();
            let downs = recorder.count(KeyEventKind::Down);
            let ups = recorder.count(KeyEventKind::Up);
            assert!(ups <= downs);
            assert_eq!(ups == downs, !dispatcher.is_down(KeyCode::K));
        }
    }
}
