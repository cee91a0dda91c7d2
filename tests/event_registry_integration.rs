//! Listener registry integration tests: two owners sharing one bus, the way
//! the game controller and its level do.

use std::cell::RefCell;
use std::rc::Rc;

use endlessforest::events::emitter::{ListenerRegistry, MessageBus, Scope};
use endlessforest::events::level::{AUDIO_SFX, ENTITY_PASSED, EventData};

fn sound(id: &str) -> EventData {
    EventData::Sound {
        id: id.to_string(),
        volume: 1.0,
    }
}

#[test]
fn off_leaves_the_other_handler() {
    let bus = MessageBus::new();
    let mut registry = ListenerRegistry::new(bus);
    let seen: Rc<RefCell<Vec<(char, i32)>>> = Rc::default();

    let sink = seen.clone();
    let a = registry.on("x", move |v: &i32| sink.borrow_mut().push(('A', *v)));
    let sink = seen.clone();
    registry.on("x", move |v: &i32| sink.borrow_mut().push(('B', *v)));

    registry.off(&a);
    registry.emit("x", 1);

    assert_eq!(*seen.borrow(), vec![('B', 1)]);
}

#[test]
fn once_keeps_the_first_payload() {
    let mut registry = ListenerRegistry::new(MessageBus::new());
    let seen: Rc<RefCell<Vec<i32>>> = Rc::default();
    let sink = seen.clone();
    registry.once("y", move |v: &i32| sink.borrow_mut().push(*v));

    registry.emit("y", 5);
    registry.emit("y", 6);

    assert_eq!(*seen.borrow(), vec![5]);
    assert_eq!(registry.listener_count(), 0);
}

#[test]
fn level_events_stay_local_and_cues_go_global() {
    let bus = MessageBus::new();
    let mut game = ListenerRegistry::new(bus.clone());
    let mut level = ListenerRegistry::new(bus);
    let seen: Rc<RefCell<Vec<String>>> = Rc::default();

    let sink = seen.clone();
    let cue = game.on_global(AUDIO_SFX, move |data: &EventData| {
        if let EventData::Sound { id, .. } = data {
            sink.borrow_mut().push(format!("cue {}", id));
        }
    });
    assert_eq!(cue.scope(), Scope::Global);
    let sink = seen.clone();
    game.on(ENTITY_PASSED, move |_| sink.borrow_mut().push("game saw passed".into()));
    let sink = seen.clone();
    level.on(ENTITY_PASSED, move |_| sink.borrow_mut().push("level saw passed".into()));

    level.emit(ENTITY_PASSED, EventData::None);
    level.emit_global(AUDIO_SFX, sound("swoosh2"));

    assert_eq!(
        *seen.borrow(),
        vec!["level saw passed".to_string(), "cue swoosh2".to_string()]
    );
}

#[test]
fn destroying_one_owner_leaves_the_other_working() {
    let bus = MessageBus::new();
    let mut first = ListenerRegistry::new(bus.clone());
    let mut second = ListenerRegistry::new(bus.clone());
    let hits: Rc<RefCell<u32>> = Rc::default();

    for registry in [&mut first, &mut second] {
        let sink = hits.clone();
        registry.on_global(AUDIO_SFX, move |_| *sink.borrow_mut() += 1);
    }
    assert_eq!(bus.handler_count(AUDIO_SFX), 2);

    first.destroy();
    assert_eq!(bus.handler_count(AUDIO_SFX), 1);

    second.emit_global(AUDIO_SFX, sound("crashTree"));
    first.emit_global(AUDIO_SFX, sound("crashTree"));
    assert_eq!(*hits.borrow(), 1);
}

#[test]
fn remove_all_listeners_silences_every_handler() {
    let bus = MessageBus::new();
    let mut registry = ListenerRegistry::new(bus.clone());
    let hits: Rc<RefCell<u32>> = Rc::default();
    for event in ["a", "b"] {
        let sink = hits.clone();
        registry.on(event, move |_: &i32| *sink.borrow_mut() += 1);
        let sink = hits.clone();
        registry.once(event, move |_: &i32| *sink.borrow_mut() += 1);
        let sink = hits.clone();
        registry.on_global(event, move |_: &i32| *sink.borrow_mut() += 1);
    }

    registry.remove_all_listeners();
    registry.emit("a", 1);
    registry.emit("b", 1);
    bus.emit("a", &1);
    bus.emit("b", &1);

    assert_eq!(*hits.borrow(), 0);
    assert_eq!(registry.listener_count(), 0);
    assert!(!registry.is_destroyed());
}
