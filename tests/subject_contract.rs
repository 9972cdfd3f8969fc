use std::sync::{Arc, Mutex};

use statecast::{
    BinaryFormatter, EventKind, HexFormatter, NotFoundError, Phase, ReactionError, Subject,
    SubjectConfig, Subscribe, ValidationError,
};
use tokio::sync::broadcast::Receiver;

type Journal = Arc<Mutex<Vec<(&'static str, i64)>>>;

/// Records `(tag, observed value)`; fails or panics on demand.
struct Recorder {
    tag: &'static str,
    journal: Journal,
    mode: Mode,
}

#[derive(Clone, Copy)]
enum Mode {
    Ok,
    Fail,
    Panic,
}

impl Subscribe for Recorder {
    fn react(&self, subject: &Subject) -> Result<(), ReactionError> {
        self.journal.lock().unwrap().push((self.tag, subject.get_state()));
        match self.mode {
            Mode::Ok => Ok(()),
            Mode::Fail => Err(ReactionError::fail(format!("{} refused", self.tag))),
            Mode::Panic => panic!("{} exploded", self.tag),
        }
    }

    fn name(&self) -> &'static str {
        self.tag
    }
}

fn recorder(tag: &'static str, journal: &Journal, mode: Mode) -> Arc<Recorder> {
    Arc::new(Recorder {
        tag,
        journal: Arc::clone(journal),
        mode,
    })
}

fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

fn kinds(rx: &mut Receiver<statecast::Event>) -> Vec<EventKind> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        out.push(ev.kind);
    }
    out
}

#[test]
fn test_duplicate_registration_is_idempotent_and_warned_once() {
    let j = journal();
    let a = recorder("a", &j, Mode::Ok);
    let subject = Subject::new("s", 0);
    let mut rx = subject.bus().subscribe();

    subject.register(&a);
    assert_eq!(kinds(&mut rx), vec![EventKind::SubscriberRegistered]);

    subject.register(&a);
    assert_eq!(subject.subscriber_count(), 1);
    assert_eq!(kinds(&mut rx), vec![EventKind::DuplicateRegistration]);

    subject.set_state(1).unwrap();
    assert_eq!(*j.lock().unwrap(), vec![("a", 1)]);
}

#[test]
fn test_deregister_absent_returns_not_found() {
    let j = journal();
    let a = recorder("a", &j, Mode::Ok);
    let stranger = recorder("stranger", &j, Mode::Ok);
    let subject = Subject::new("s", 0);
    subject.register(&a);
    let mut rx = subject.bus().subscribe();

    let err = subject.deregister(&stranger).unwrap_err();
    assert_eq!(
        err,
        NotFoundError {
            subscriber: "stranger"
        }
    );
    assert_eq!(subject.subscriber_names(), vec!["a"]);
    assert_eq!(kinds(&mut rx), vec![EventKind::SubscriberNotFound]);

    subject.deregister(&a).unwrap();
    assert!(subject.deregister(&a).is_err());
    assert_eq!(subject.subscriber_count(), 0);
}

#[test]
fn test_delivery_follows_registration_order() {
    let j = journal();
    let a = recorder("a", &j, Mode::Ok);
    let b = recorder("b", &j, Mode::Ok);
    let c = recorder("c", &j, Mode::Ok);
    let subject = Subject::new("s", 0);
    subject.register(&a);
    subject.register(&b);
    subject.register(&c);

    for v in 1..=3 {
        subject.set_state(v).unwrap();
    }
    subject.notify();

    let tags: Vec<&str> = j.lock().unwrap().iter().map(|(t, _)| *t).collect();
    assert_eq!(tags, ["a", "b", "c"].repeat(4));
}

#[test]
fn test_invalid_value_changes_nothing() {
    let j = journal();
    let a = recorder("a", &j, Mode::Ok);
    let subject = Subject::new("s", 7);
    subject.register(&a);
    let mut rx = subject.bus().subscribe();

    let err = subject.set_state("seven").unwrap_err();
    assert_eq!(
        err,
        ValidationError::NotAnInteger {
            input: "seven".into()
        }
    );
    assert!(subject.set_state(f64::NAN).is_err());

    assert_eq!(subject.get_state(), 7);
    assert!(j.lock().unwrap().is_empty());
    assert_eq!(
        kinds(&mut rx),
        vec![EventKind::ValidationRejected, EventKind::ValidationRejected]
    );
}

#[test]
fn test_out_of_bounds_value_is_rejected() {
    let j = journal();
    let a = recorder("a", &j, Mode::Ok);
    let subject = Subject::builder("bounded")
        .with_config(SubjectConfig {
            min: 0,
            max: 100,
            ..SubjectConfig::default()
        })
        .with_subscriber(&a)
        .build()
        .unwrap();

    assert!(subject.set_state(100).is_ok());
    assert_eq!(
        subject.set_state(101),
        Err(ValidationError::OutOfRange {
            value: 101,
            min: 0,
            max: 100
        })
    );
    assert_eq!(subject.get_state(), 100);
    assert_eq!(*j.lock().unwrap(), vec![("a", 100)]);
}

#[test]
fn test_failing_subscriber_is_isolated() {
    let j = journal();
    let a = recorder("a", &j, Mode::Ok);
    let b = recorder("b", &j, Mode::Fail);
    let c = recorder("c", &j, Mode::Ok);
    let subject = Subject::new("s", 0);
    subject.register(&a);
    subject.register(&b);
    subject.register(&c);
    let mut rx = subject.bus().subscribe();

    assert!(subject.set_state(4).is_ok());

    assert_eq!(*j.lock().unwrap(), vec![("a", 4), ("b", 4), ("c", 4)]);
    assert_eq!(subject.get_state(), 4);
    assert_eq!(subject.phase(), Phase::Unchanged);

    let _changed = rx.try_recv().unwrap();
    let failed = rx.try_recv().unwrap();
    assert_eq!(failed.kind, EventKind::ReactionFailed);
    assert_eq!(failed.subscriber, Some("b"));
    assert_eq!(failed.value, Some(4));
    assert_eq!(failed.reason.as_deref(), Some("b refused"));
}

#[test]
fn test_panicking_subscriber_is_isolated() {
    let j = journal();
    let a = recorder("a", &j, Mode::Ok);
    let b = recorder("b", &j, Mode::Panic);
    let c = recorder("c", &j, Mode::Ok);
    let subject = Subject::new("s", 0);
    subject.register(&a);
    subject.register(&b);
    subject.register(&c);
    let mut rx = subject.bus().subscribe();

    subject.set_state(2).unwrap();
    subject.set_state(3).unwrap();

    assert_eq!(
        *j.lock().unwrap(),
        vec![("a", 2), ("b", 2), ("c", 2), ("a", 3), ("b", 3), ("c", 3)]
    );

    let panics: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
        .filter(|ev| ev.kind == EventKind::ReactionPanicked)
        .collect();
    assert_eq!(panics.len(), 2);
    assert_eq!(panics[0].reason.as_deref(), Some("b exploded"));
}

#[test]
fn test_hex_and_binary_scenario() {
    let j = journal();
    let subject = Subject::new("DefaultFormatter", 0);
    assert_eq!(subject.get_state(), 0);

    let h = Arc::new(HexFormatter::new());
    let n = Arc::new(BinaryFormatter::new());
    subject.register(&h);
    subject.register(&n);

    subject.set_state(3).unwrap();
    assert_eq!(h.last().as_deref(), Some("0x3"));
    assert_eq!(n.last().as_deref(), Some("0b11"));

    let m = recorder("m", &j, Mode::Ok);
    subject.register(&m);
    subject.set_state(5).unwrap();

    assert_eq!(h.history(), vec!["0x3", "0x5"]);
    assert_eq!(n.history(), vec!["0b11", "0b101"]);
    assert_eq!(*j.lock().unwrap(), vec![("m", 5)]);
    assert_eq!(
        subject.subscriber_names(),
        vec!["HexFormatter", "BinaryFormatter", "m"]
    );
}

#[test]
fn test_dropped_subscriber_stops_receiving() {
    let j = journal();
    let a = recorder("a", &j, Mode::Ok);
    let b = recorder("b", &j, Mode::Ok);
    let subject = Subject::new("s", 0);
    subject.register(&a);
    subject.register(&b);

    drop(a);
    subject.set_state(1).unwrap();

    assert_eq!(*j.lock().unwrap(), vec![("b", 1)]);
    assert_eq!(subject.subscriber_count(), 1);
}

#[test]
fn test_subscriber_shared_between_subjects() {
    let j = journal();
    let shared = recorder("shared", &j, Mode::Ok);
    let left = Subject::new("left", 0);
    let right = Subject::new("right", 0);
    left.register(&shared);
    right.register(&shared);

    left.set_state(1).unwrap();
    drop(left);
    right.set_state(2).unwrap();

    assert_eq!(*j.lock().unwrap(), vec![("shared", 1), ("shared", 2)]);
    assert_eq!(Arc::strong_count(&shared), 1);
}

#[test]
fn test_type_erased_registration() {
    let j = journal();
    let a: Arc<dyn Subscribe> = recorder("a", &j, Mode::Ok);
    let subject = Subject::new("s", 0);

    subject.register_dyn(&a);
    subject.register_dyn(&a);
    subject.set_state(1).unwrap();
    subject.deregister_dyn(&a).unwrap();
    subject.set_state(2).unwrap();

    assert_eq!(*j.lock().unwrap(), vec![("a", 1)]);
}

/// Reacts normally, but its name panics once `armed` is set.
struct Moody {
    armed: std::sync::atomic::AtomicBool,
    journal: Journal,
}

impl Subscribe for Moody {
    fn react(&self, subject: &Subject) -> Result<(), ReactionError> {
        self.journal.lock().unwrap().push(("moody", subject.get_state()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        if self.armed.load(std::sync::atomic::Ordering::SeqCst) {
            panic!("name unavailable");
        }
        "moody"
    }
}

#[test]
fn test_pass_never_asks_subscribers_for_their_name() {
    let j = journal();
    let moody = Arc::new(Moody {
        armed: std::sync::atomic::AtomicBool::new(false),
        journal: Arc::clone(&j),
    });
    let failing = recorder("failing", &j, Mode::Fail);
    let after = recorder("after", &j, Mode::Ok);
    let subject = Subject::new("s", 0);
    let mut rx = subject.bus().subscribe();
    subject.register(&moody);
    subject.register(&failing);
    subject.register(&after);
    kinds(&mut rx);

    moody.armed.store(true, std::sync::atomic::Ordering::SeqCst);
    subject.set_state(1).unwrap();
    assert_eq!(subject.phase(), Phase::Unchanged);

    let ev = rx.try_recv().expect("state changed");
    assert_eq!(ev.kind, EventKind::StateChanged);
    let ev = rx.try_recv().expect("failure reported");
    assert_eq!(ev.kind, EventKind::ReactionFailed);
    assert_eq!(ev.subscriber, Some("failing"));

    moody.armed.store(false, std::sync::atomic::Ordering::SeqCst);
    subject.deregister(&moody).unwrap();
    subject.set_state(7).unwrap();

    assert_eq!(subject.get_state(), 7);
    assert_eq!(subject.phase(), Phase::Unchanged);
    assert_eq!(
        *j.lock().unwrap(),
        vec![
            ("moody", 1),
            ("failing", 1),
            ("after", 1),
            ("failing", 7),
            ("after", 7)
        ]
    );
}

/// Panics when destroyed.
struct Fragile {
    journal: Journal,
}

impl Subscribe for Fragile {
    fn react(&self, subject: &Subject) -> Result<(), ReactionError> {
        self.journal.lock().unwrap().push(("fragile", subject.get_state()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fragile"
    }
}

impl Drop for Fragile {
    fn drop(&mut self) {
        panic!("fragile destroyed");
    }
}

/// Gives up the only outside reference to another subscriber on first reaction.
struct Releaser {
    held: Mutex<Option<Arc<Fragile>>>,
}

impl Subscribe for Releaser {
    fn react(&self, _subject: &Subject) -> Result<(), ReactionError> {
        drop(self.held.lock().unwrap().take());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "releaser"
    }
}

#[test]
fn test_panicking_destructor_after_pass_does_not_wedge_subject() {
    let j = journal();
    let fragile = Arc::new(Fragile {
        journal: Arc::clone(&j),
    });
    let releaser = Arc::new(Releaser {
        held: Mutex::new(None),
    });
    let tail = recorder("tail", &j, Mode::Ok);
    let subject = Subject::new("s", 0);
    subject.register(&releaser);
    subject.register(&fragile);
    subject.register(&tail);
    *releaser.held.lock().unwrap() = Some(fragile);

    let mut rx = subject.bus().subscribe();
    subject.set_state(1).unwrap();

    // The pass still reached the subscriber whose owner let go mid-pass.
    assert_eq!(*j.lock().unwrap(), vec![("fragile", 1), ("tail", 1)]);
    assert_eq!(subject.phase(), Phase::Unchanged);

    let panicked: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
        .filter(|ev| ev.kind == EventKind::ReactionPanicked)
        .collect();
    assert_eq!(panicked.len(), 1);
    assert_eq!(panicked[0].subscriber, Some("fragile"));
    assert_eq!(panicked[0].reason.as_deref(), Some("fragile destroyed"));

    subject.set_state(7).unwrap();
    assert_eq!(subject.get_state(), 7);
    assert_eq!(subject.subscriber_names(), vec!["releaser", "tail"]);
    assert_eq!(j.lock().unwrap().last(), Some(&("tail", 7)));
}
