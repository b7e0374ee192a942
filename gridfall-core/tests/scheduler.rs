//! End-to-end scheduling behavior, driven through the engine's public
//! per-interrupt entry points with a synthetic cadence (no timer driver).

use gridfall::components::queue::CAPACITY;
use gridfall::prelude::*;
use tokio::sync::broadcast;

/// A scripted collaborator: records every call and answers effect probes
/// from plain flags the test flips.
#[derive(Debug, Default)]
struct TestWorld {
    calls: Vec<String>,
    landed: bool,
    decay_done: bool,
    move_done: bool,
    capsule_done: bool,
    overflow: bool,
}

impl World for TestWorld {
    fn set_backdrop(&mut self, backdrop: Backdrop) {
        self.calls.push(format!("backdrop:{backdrop:?}"));
    }
    fn show(&mut self, view: View) {
        self.calls.push(format!("show:{view:?}"));
    }
    fn say(&mut self, row: u8, line: &str) {
        self.calls.push(format!("say:{row}:{line}"));
    }
    fn clear_text(&mut self) {
        self.calls.push("clear".into());
    }
    fn display_grid(&mut self, visible: bool) {
        self.calls.push(format!("grid:{visible}"));
    }
    fn spawn_capsules(&mut self) {
        self.calls.push("capsules".into());
    }
    fn resolve_capsule(&mut self, capsule: Capsule) {
        self.calls.push(format!("resolve:{capsule:?}"));
    }
    fn spawn_runner(&mut self) {
        self.calls.push("runner".into());
    }
    fn rebuild_bit_block(&mut self) {
        self.calls.push("rebuild_block".into());
    }
    fn rebuild_grid(&mut self) {
        self.calls.push("rebuild_grid".into());
    }
    fn begin_move(&mut self, axis: Axis) {
        self.calls.push(format!("move:{axis:?}"));
    }
    fn update_pivot(&mut self) {
        self.calls.push("pivot".into());
    }
    fn shake_bit(&mut self, offset: i8) {
        self.calls.push(format!("shake:{offset}"));
    }
    fn commit_frame(&mut self) {}

    fn bit_block_landed(&mut self) -> bool {
        self.landed
    }
    fn grid_decay_done(&mut self) -> bool {
        self.decay_done
    }
    fn move_finished(&mut self, _axis: Axis) -> bool {
        self.move_done
    }
    fn capsule_landed(&mut self, _capsule: Capsule) -> bool {
        self.capsule_done
    }
    fn bit_block_overflowed(&mut self) -> bool {
        self.overflow
    }
}

/// An engine whose elapsed time advances by one unit per interrupt.
fn test_engine() -> GridfallEngine<TestWorld> {
    let mut config = GridfallConfig::default();
    config.timer.interruption_rate = 1;
    GridfallEngine::new(config, TestWorld::default())
}

fn drain(rx: &mut broadcast::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

fn fired(events: &[EngineEvent]) -> Vec<EventId> {
    events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::EventFired { id, .. } => Some(*id),
            _ => None,
        })
        .collect()
}

fn interrupts(engine: &mut GridfallEngine<TestWorld>, n: u64) {
    for _ in 0..n {
        engine.on_timer_interrupt();
    }
}

#[test]
fn staggered_due_times_fire_one_by_one() {
    let mut engine = test_engine();
    let mut rx = engine.subscribe_engine_events();

    engine.schedule_event(EventId::ClearText, 0);
    engine.schedule_event(EventId::SetBackdropGrid, 5);
    engine.schedule_event(EventId::ListenInput, 10);

    engine.process_due();
    assert_eq!(fired(&drain(&mut rx)), vec![EventId::ClearText]);
    assert_eq!(engine.queue().len(), 2);

    interrupts(&mut engine, 5);
    assert_eq!(fired(&drain(&mut rx)), vec![EventId::SetBackdropGrid]);
    assert_eq!(engine.queue().len(), 1);

    interrupts(&mut engine, 5);
    assert_eq!(fired(&drain(&mut rx)), vec![EventId::ListenInput]);
    assert!(engine.queue().is_empty());
}

#[test]
fn compaction_during_scan_fires_all_due_events_in_order() {
    let mut engine = test_engine();
    let mut rx = engine.subscribe_engine_events();

    engine.schedule_event(EventId::ClearText, 0);
    engine.schedule_event(EventId::SetBackdropGrid, 0);
    engine.schedule_event(EventId::SetBackdropTitle, 0);

    // A single pass must fire all three exactly once, in order: after each
    // removal the scan re-reads the slot the next event slid into.
    engine.process_due();
    assert_eq!(
        fired(&drain(&mut rx)),
        vec![
            EventId::ClearText,
            EventId::SetBackdropGrid,
            EventId::SetBackdropTitle,
        ]
    );
    assert!(engine.queue().is_empty());
}

#[test]
fn events_enqueued_by_a_handler_wait_for_the_next_pass() {
    let mut engine = test_engine();
    let mut rx = engine.subscribe_engine_events();

    // IntroBoot's handler schedules ClearText with zero delay.
    engine.schedule_event(EventId::IntroBoot, 0);
    engine.process_due();
    assert_eq!(fired(&drain(&mut rx)), vec![EventId::IntroBoot]);
    assert!(engine
        .queue()
        .iter()
        .any(|event| event.id == EventId::ClearText && event.due == 0));

    // The zero-delay follow-up fires on the next pass, not the same one.
    engine.process_due();
    assert_eq!(fired(&drain(&mut rx)), vec![EventId::ClearText]);
}

#[test]
fn full_queue_drops_requests_silently() {
    let mut engine = test_engine();
    let mut rx = engine.subscribe_engine_events();

    for _ in 0..CAPACITY {
        engine.schedule_event(EventId::ListenInput, 50);
    }
    assert_eq!(engine.queue().len(), CAPACITY);

    engine.schedule_event(EventId::ShowHud, 50);
    assert_eq!(engine.queue().len(), CAPACITY);
    let events = drain(&mut rx);
    assert!(events
        .iter()
        .any(|event| matches!(event, EngineEvent::EventDropped { id: EventId::ShowHud })));
}

#[test]
fn cancel_all_empties_the_queue() {
    let mut engine = test_engine();
    engine.schedule_event(EventId::DecayCheck, 1);
    engine.schedule_event(EventId::DropBitBlock, 100);
    engine.cancel_all_events();
    assert!(engine.queue().is_empty());
}

#[test]
fn finished_fall_effect_defers_regeneration_to_the_queue() {
    let mut engine = test_engine();
    engine.set_screen(Screen::Game);
    engine.set_phase(Phase::BitBlockFalling);
    engine.world_mut().landed = true;

    // The phase machine runs on the fifteenth tick; elapsed time is then 15.
    interrupts(&mut engine, 15);

    assert_eq!(engine.state().phase, Phase::Idle);
    assert!(engine
        .queue()
        .iter()
        .any(|event| event.id == EventId::RegenerateBitBlock && event.due == 16));
}

#[test]
fn unfinished_fall_effect_leaves_the_phase_alone() {
    let mut engine = test_engine();
    engine.set_screen(Screen::Game);
    engine.set_phase(Phase::BitBlockFalling);

    interrupts(&mut engine, 30);

    assert_eq!(engine.state().phase, Phase::BitBlockFalling);
    assert!(engine.queue().is_empty());
}

#[test]
fn runner_arrival_restores_input_and_reactivates_the_shake() {
    let mut engine = test_engine();
    engine.set_screen(Screen::Game);
    engine.set_phase(Phase::RunnerMovingX);
    engine.world_mut().move_done = true;

    interrupts(&mut engine, 15);
    assert_eq!(engine.state().phase, Phase::AwaitingInput);
    assert!(engine.world().calls.iter().any(|call| call == "pivot"));

    // The reactivated shake oscillates on every third tick from here on.
    interrupts(&mut engine, 6);
    let shakes: Vec<&String> = engine
        .world()
        .calls
        .iter()
        .filter(|call| call.starts_with("shake:"))
        .collect();
    assert_eq!(shakes, vec!["shake:-1", "shake:1"]);
}

#[test]
fn pause_preserves_the_queue_and_phase_until_resume() {
    let mut engine = test_engine();
    engine.set_screen(Screen::Game);
    engine.set_phase(Phase::AwaitingInput);
    engine.schedule_event(EventId::ListenInput, 2);

    engine.set_screen(Screen::Pause);
    engine.set_phase(Phase::Paused);
    interrupts(&mut engine, 10);
    assert_eq!(engine.queue().len(), 1);
    assert_eq!(engine.state().phase, Phase::Paused);

    engine.resume();
    assert_eq!(engine.state().screen, Screen::Game);
    interrupts(&mut engine, 1);
    assert!(engine.queue().is_empty());
    assert_eq!(engine.state().phase, Phase::AwaitingInput);
}

#[test]
fn menu_prompt_blinks_through_the_queue() {
    let mut engine = test_engine();
    let mut rx = engine.subscribe_engine_events();

    engine.power_on();
    engine.process_due();
    interrupts(&mut engine, 2);

    assert_eq!(
        fired(&drain(&mut rx)),
        vec![
            EventId::MenuStart,
            EventId::MenuHidePrompt,
            EventId::MenuShowPrompt,
        ]
    );
    assert_eq!(engine.state().phase, Phase::ShowMenu);
    // The loop keeps itself alive: the next blink is already queued.
    assert_eq!(engine.queue().len(), 1);
}

#[test]
fn surrender_discards_the_script_and_schedules_stats() {
    let mut engine = test_engine();
    let mut rx = engine.subscribe_engine_events();
    engine.set_screen(Screen::Game);
    engine.schedule_event(EventId::DecayCheck, 1);
    engine.schedule_event(EventId::DropBitBlock, 2);

    engine.on_key_interrupt();

    let events = drain(&mut rx);
    assert!(events
        .iter()
        .any(|event| matches!(event, EngineEvent::GameOver { victory: false })));
    let pending: Vec<EventId> = engine.queue().iter().map(|event| event.id).collect();
    assert_eq!(pending, vec![EventId::ShowStats]);
}

#[test]
fn key_interrupt_is_ignored_outside_the_game() {
    let mut engine = test_engine();
    engine.schedule_event(EventId::MenuStart, 0);
    engine.on_key_interrupt();
    assert_eq!(engine.queue().len(), 1);
}

#[test]
fn capsule_choice_sets_difficulty_and_schedules_the_next_beat() {
    let mut engine = test_engine();
    engine.set_phase(Phase::AwaitingInput);

    engine.select_capsule(Capsule::Red);
    assert_eq!(engine.state().difficulty, Difficulty::Hard);
    assert!(engine
        .queue()
        .iter()
        .any(|event| event.id == EventId::CapsuleChosen));

    // Outside the choice window the input is ignored.
    engine.process_due();
    engine.select_capsule(Capsule::Blue);
    assert_eq!(engine.state().difficulty, Difficulty::Hard);
}
