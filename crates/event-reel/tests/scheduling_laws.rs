// tests/scheduling_laws.rs
// Ordering, chaining and teardown laws of the frame scheduler

use std::cell::RefCell;
use std::rc::Rc;

use event_reel::action::{BackgroundOp, CrossFadeOp, FadeOp, SceneOp, ScriptOp, TextOp};
use event_reel::{Action, Category, Collaborator, Dispatcher, Event, EventHandle, EventQueue, Handled, Payload, Producer, Schedule};

// ============================================================================
// Test harness - recording collaborators
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Effect {
	Fired(EventHandle),
	Sampled(EventHandle, f64),
}

type Log = Rc<RefCell<Vec<Effect>>>;

struct Recorder {
	log: Log,
}

impl Collaborator for Recorder {
	fn fire(&mut self, event: &Event, _producer: &mut Producer) -> Handled {
		self.log.borrow_mut().push(Effect::Fired(event.handle()));
		match event.action() {
			Action::Scene(SceneOp::End) => Handled::Halt,
			_ => Handled::Done,
		}
	}

	fn sample(&mut self, event: &Event, fraction: f64, _producer: &mut Producer) -> Handled {
		self.log.borrow_mut().push(Effect::Sampled(event.handle(), fraction));
		Handled::Done
	}
}

/// Script thread that schedules more work from inside dispatch
struct Spawner {
	log: Log,
	spawned: Rc<RefCell<Vec<EventHandle>>>,
}

impl Collaborator for Spawner {
	fn fire(&mut self, event: &Event, producer: &mut Producer) -> Handled {
		self.log.borrow_mut().push(Effect::Fired(event.handle()));
		if event.action() == Action::Script(ScriptOp::Exec) {
			let caption = producer.queue(Event::one_shot(Action::Text(TextOp::Display), 0)).unwrap();
			let wake = producer.chain(event.handle(), Event::one_shot(Action::Script(ScriptOp::Wake), 0)).unwrap();
			self.spawned.borrow_mut().extend([wake, caption]);
		}
		Handled::Done
	}
}

fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).with_test_writer().try_init();
}

fn harness() -> (EventQueue, Dispatcher, Log) {
	init_tracing();
	let log: Log = Rc::new(RefCell::new(Vec::new()));
	let mut dispatcher = Dispatcher::new();
	for category in Category::all() {
		dispatcher.register(category, Box::new(Recorder { log: Rc::clone(&log) }));
	}
	(EventQueue::default(), dispatcher, log)
}

fn caption(delay: i64) -> Event {
	Event::one_shot(Action::Text(TextOp::Display), delay)
}

fn fade(duration: i64) -> Event {
	Event::continuous(Action::PaletteFade(FadeOp::BlackToPalette), 0, duration)
}

fn samples_of(log: &Log, handle: EventHandle) -> Vec<f64> {
	log.borrow()
		.iter()
		.filter_map(|effect| match effect {
			Effect::Sampled(h, fraction) if *h == handle => Some(*fraction),
			_ => None,
		})
		.collect()
}

fn touched(log: &Log) -> Vec<EventHandle> {
	let mut order = Vec::new();
	for effect in log.borrow().iter() {
		let handle = match effect {
			Effect::Fired(h) | Effect::Sampled(h, _) => *h,
		};
		if order.last() != Some(&handle) {
			order.push(handle);
		}
	}
	order
}

// ============================================================================
// OneShot ordering
// ============================================================================

#[test]
fn one_shots_fire_in_deadline_order_exactly_once() {
	let (mut queue, mut dispatcher, log) = harness();
	let delays = [70, 10, 40, 25, 55, 5];
	let mut by_delay: Vec<_> = delays.iter().map(|&delay| (delay, queue.queue(caption(delay)).unwrap())).collect();
	by_delay.sort_by_key(|(delay, _)| *delay);

	let mut frames = 0;
	while !queue.is_empty() {
		queue.handle_events(5, &mut dispatcher);
		frames += 1;
		assert!(frames <= 20, "queue never drained");
	}

	let expected: Vec<_> = by_delay.iter().map(|(_, handle)| Effect::Fired(*handle)).collect();
	assert_eq!(*log.borrow(), expected);
}

// ============================================================================
// Continuous monotonicity and idempotent start
// ============================================================================

#[test]
fn continuous_samples_rise_from_zero_to_one() {
	for first_delta in [1, 150, 299, 300, 5_000] {
		let (mut queue, mut dispatcher, log) = harness();
		let handle = queue.queue(fade(300)).unwrap();

		queue.handle_events(first_delta, &mut dispatcher);
		while !queue.is_empty() {
			queue.handle_events(40, &mut dispatcher);
		}

		let samples = samples_of(&log, handle);
		assert_eq!(samples.first(), Some(&0.0), "first delta {}", first_delta);
		assert_eq!(samples.last(), Some(&1.0), "first delta {}", first_delta);
		assert!(samples.windows(2).all(|pair| pair[0] <= pair[1]), "samples not monotonic: {:?}", samples);
	}
}

#[test]
fn ten_frames_of_a_second_long_fade() {
	let (mut queue, mut dispatcher, log) = harness();
	let handle = queue.queue(fade(1000)).unwrap();

	for _ in 0..10 {
		queue.handle_events(100, &mut dispatcher);
	}

	let expected: Vec<f64> = (0..=10).map(|step| f64::from(step) / 10.0).collect();
	assert_eq!(samples_of(&log, handle), expected);
	assert!(queue.is_empty());
}

#[test]
fn zero_duration_fade_completes_on_first_dispatch() {
	let (mut queue, mut dispatcher, log) = harness();
	let handle = queue.queue(fade(0)).unwrap();

	queue.handle_events(0, &mut dispatcher);

	assert_eq!(samples_of(&log, handle), vec![0.0, 1.0]);
	assert!(queue.is_empty());
}

#[test]
fn delayed_zero_duration_fade_ignores_its_countdown() {
	let (mut queue, mut dispatcher, log) = harness();
	let handle = queue.queue(Event::continuous(Action::PaletteFade(FadeOp::BlackToPalette), 50, 0)).unwrap();

	queue.handle_events(10, &mut dispatcher);

	assert_eq!(samples_of(&log, handle), vec![0.0, 1.0]);
	assert!(queue.is_empty());
}

// ============================================================================
// Chaining and overshoot
// ============================================================================

#[test]
fn chained_links_collapse_within_one_frame() {
	let (mut queue, mut dispatcher, log) = harness();
	let a = queue.queue(fade(100)).unwrap();
	let b = queue.chain(a, Event::continuous(Action::CrossFade(CrossFadeOp::Blend), 0, 50)).unwrap();
	let c = queue.chain(b, caption(0)).unwrap();

	queue.handle_events(1_000, &mut dispatcher);

	assert_eq!(touched(&log), vec![a, b, c]);
	assert_eq!(samples_of(&log, a), vec![0.0, 1.0]);
	assert_eq!(samples_of(&log, b), vec![0.0, 1.0]);
	assert!(queue.is_empty());
}

#[test]
fn chained_links_run_back_to_back_across_frames() {
	let (mut queue, mut dispatcher, log) = harness();
	let a = queue.queue(caption(20)).unwrap();
	let b = queue.chain(a, caption(20)).unwrap();
	let c = queue.chain(a, caption(20)).unwrap();

	let mut fired_at = Vec::new();
	for frame in 1..=6 {
		let before = log.borrow().len();
		queue.handle_events(10, &mut dispatcher);
		if log.borrow().len() > before {
			fired_at.push(frame);
		}
	}

	assert_eq!(touched(&log), vec![a, b, c]);
	assert_eq!(fired_at, vec![2, 4, 6]);
}

#[test]
fn overshoot_carries_into_successor() {
	let (mut queue, mut dispatcher, log) = harness();
	let cue = queue.queue(caption(10)).unwrap();
	let sweep = queue.chain(cue, fade(100)).unwrap();

	queue.handle_events(15, &mut dispatcher);

	let promoted = queue.get(sweep).expect("successor resident");
	assert_eq!(promoted.duration() - promoted.time(), 5);
	assert_eq!(samples_of(&log, sweep), vec![0.0, 0.05]);
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn clear_list_spares_no_destroy_but_free_list_does_not() {
	let (mut queue, _dispatcher, _log) = harness();
	let poller = queue.queue(Event::interval(Action::Script(ScriptOp::Wake), 16).no_destroy()).unwrap();
	let poller_next = queue.chain(poller, caption(0)).unwrap();
	let scene = queue.queue(caption(100)).unwrap();
	let scene_next = queue.chain(scene, caption(0)).unwrap();

	queue.clear_list();
	assert!(queue.contains(poller) && queue.contains(poller_next));
	assert!(!queue.contains(scene) && !queue.contains(scene_next));

	queue.clear_list();
	assert!(queue.contains(poller));

	queue.free_list();
	assert!(queue.is_empty());
}

#[test]
fn payload_outlives_the_event() {
	let (mut queue, mut dispatcher, _log) = harness();
	let text = Rc::new(String::from("The curtain rises"));
	queue.queue(caption(0).with_payload(Payload::share(&text))).unwrap();
	queue.queue(caption(500).with_payload(Payload::share(&text))).unwrap();
	assert_eq!(Rc::strong_count(&text), 3);

	queue.handle_events(1, &mut dispatcher);
	assert_eq!(Rc::strong_count(&text), 2);

	queue.free_list();
	assert_eq!(Rc::strong_count(&text), 1);
	assert_eq!(text.as_str(), "The curtain rises");
}

// ============================================================================
// Immediate barrier
// ============================================================================

#[test]
fn immediate_holds_back_due_one_shot_until_complete() {
	let (mut queue, mut dispatcher, log) = harness();
	let blackout = queue.queue(Event::immediate(Action::PaletteFade(FadeOp::PaletteToBlack), 0, 100)).unwrap();
	let due = queue.queue(caption(0)).unwrap();

	queue.handle_events(10, &mut dispatcher);
	assert!(!log.borrow().contains(&Effect::Fired(due)));
	assert!(queue.contains(due));

	queue.handle_events(100, &mut dispatcher);
	assert_eq!(touched(&log), vec![blackout, due]);
	assert!(queue.is_empty());
}

#[test]
fn immediate_instant_action_holds_back_later_events_for_its_duration() {
	let (mut queue, mut dispatcher, log) = harness();
	let backdrop = queue.queue(Event::immediate(Action::Background(BackgroundOp::Draw), 0, 500)).unwrap();
	let due = queue.queue(caption(0)).unwrap();

	queue.handle_events(10, &mut dispatcher);
	assert!(log.borrow().is_empty(), "nothing fires while the backdrop is held");
	assert!(queue.contains(backdrop) && queue.contains(due));

	queue.handle_events(480, &mut dispatcher);
	assert!(log.borrow().is_empty());

	queue.handle_events(10, &mut dispatcher);
	assert_eq!(*log.borrow(), vec![Effect::Fired(backdrop), Effect::Fired(due)]);
	assert!(queue.is_empty());
}

/// The barrier halts the whole remaining scan, not just the Immediate event's own chain.
#[test]
fn immediate_barrier_spans_unrelated_events() {
	let (mut queue, mut dispatcher, log) = harness();
	let ahead = queue.queue(caption(0)).unwrap();
	let barrier = queue.queue(Event::immediate(Action::CrossFade(CrossFadeOp::Blend), 0, 50)).unwrap();
	let behind = queue.queue(caption(0)).unwrap();
	let behind_later = queue.queue(caption(30)).unwrap();

	queue.handle_events(20, &mut dispatcher);

	assert_eq!(touched(&log), vec![ahead, barrier]);
	assert_eq!(queue.get(behind_later).map(Event::time), Some(30));

	queue.handle_events(30, &mut dispatcher);
	assert_eq!(touched(&log), vec![ahead, barrier, behind]);
	assert_eq!(queue.get(behind_later).map(Event::time), Some(30));

	queue.handle_events(30, &mut dispatcher);
	assert_eq!(touched(&log), vec![ahead, barrier, behind, behind_later]);
}

#[test]
fn scene_end_halts_remaining_frame() {
	let (mut queue, mut dispatcher, log) = harness();
	let end = queue.queue(Event::one_shot(Action::Scene(SceneOp::End), 0)).unwrap();
	let next = queue.queue(caption(0)).unwrap();

	queue.handle_events(0, &mut dispatcher);
	assert_eq!(*log.borrow(), vec![Effect::Fired(end)]);
	assert!(!queue.contains(end));

	queue.handle_events(0, &mut dispatcher);
	assert_eq!(*log.borrow(), vec![Effect::Fired(end), Effect::Fired(next)]);
}

// ============================================================================
// Scheduling from inside dispatch
// ============================================================================

#[test]
fn handlers_extend_timeline_mid_frame() {
	let (mut queue, mut dispatcher, log) = harness();
	let spawned = Rc::new(RefCell::new(Vec::new()));
	dispatcher.register(
		Category::Script,
		Box::new(Spawner {
			log: Rc::clone(&log),
			spawned: Rc::clone(&spawned),
		}),
	);

	let waiting = queue.queue(caption(5)).unwrap();
	let exec = queue.queue(Event::one_shot(Action::Script(ScriptOp::Exec), 0)).unwrap();

	queue.handle_events(0, &mut dispatcher);

	let spawned = spawned.borrow();
	let (wake, late_caption) = (spawned[0], spawned[1]);
	assert_eq!(touched(&log), vec![exec, wake, late_caption]);
	assert!(queue.contains(waiting));
	assert_eq!(queue.len(), 1);
}
