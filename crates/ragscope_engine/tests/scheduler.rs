use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use ragscope_engine::{EngineEvent, EventSink, RevealScheduler};
use tokio::runtime::Handle;
use tokio::time::{sleep, Instant};

const INTERVAL: Duration = Duration::from_millis(300);

#[derive(Default)]
struct TimedSink {
    events: Mutex<Vec<(Instant, EngineEvent)>>,
}

impl TimedSink {
    fn reveals(&self) -> Vec<(Duration, String)> {
        self.reveals_since(None)
    }

    fn reveals_since(&self, origin: Option<Instant>) -> Vec<(Duration, String)> {
        let events = self.events.lock().unwrap();
        let origin = origin.unwrap_or_else(|| events.first().map(|(at, _)| *at).unwrap());
        events
            .iter()
            .filter_map(|(at, event)| match event {
                EngineEvent::StepRevealed { text, .. } => {
                    Some((at.duration_since(origin), text.clone()))
                }
                _ => None,
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl EventSink for TimedSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push((Instant::now(), event));
    }
}

fn scheduler(sink: &Arc<TimedSink>) -> RevealScheduler {
    RevealScheduler::new(Handle::current(), INTERVAL, sink.clone())
}

fn steps(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|text| text.to_string()).collect()
}

#[tokio::test(start_paused = true)]
async fn reveals_fire_in_order_at_fixed_offsets() {
    let sink = Arc::new(TimedSink::default());
    let mut scheduler = scheduler(&sink);
    let origin = Instant::now();

    scheduler.schedule(steps(&[
        "Routing to Vector Store",
        "Grading docs: relevant",
        "Generated Answer",
    ]));
    sleep(Duration::from_secs(2)).await;

    let reveals = sink.reveals_since(Some(origin));
    let texts: Vec<_> = reveals.iter().map(|(_, text)| text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["Routing to Vector Store", "Grading docs: relevant", "Generated Answer"]
    );
    for (index, (offset, _)) in reveals.iter().enumerate() {
        assert!(*offset >= INTERVAL * index as u32, "step {index} fired early at {offset:?}");
    }
    assert_eq!(scheduler.pending_batches(), 0);
}

#[tokio::test(start_paused = true)]
async fn two_steps_reveal_at_zero_and_three_hundred_ms() {
    let sink = Arc::new(TimedSink::default());
    let mut scheduler = scheduler(&sink);
    let origin = Instant::now();

    scheduler.schedule(steps(&["Routing to Vector Store", "Grading docs: relevant"]));
    sleep(Duration::from_millis(100)).await;
    assert_eq!(sink.len(), 1);
    sleep(Duration::from_millis(500)).await;

    let reveals = sink.reveals_since(Some(origin));
    assert_eq!(reveals.len(), 2);
    assert_eq!(reveals[0].1, "Routing to Vector Store");
    assert!(reveals[0].0 < Duration::from_millis(50));
    assert_eq!(reveals[1].1, "Grading docs: relevant");
    assert!(reveals[1].0 >= INTERVAL && reveals[1].0 < INTERVAL + Duration::from_millis(50));
}

#[tokio::test(start_paused = true)]
async fn overlapping_batches_interleave_by_firing_time() {
    let sink = Arc::new(TimedSink::default());
    let mut scheduler = scheduler(&sink);

    let first = scheduler.schedule(steps(&["a0", "a1", "a2"]));
    sleep(Duration::from_millis(150)).await;
    let second = scheduler.schedule(steps(&["b0", "b1"]));
    assert_ne!(first, second);
    assert_eq!(scheduler.pending_batches(), 2);

    sleep(Duration::from_secs(1)).await;

    let texts: Vec<_> = sink.reveals().into_iter().map(|(_, text)| text).collect();
    assert_eq!(texts, vec!["a0", "b0", "a1", "b1", "a2"]);
}

#[tokio::test(start_paused = true)]
async fn cancel_all_stops_pending_reveals() {
    let sink = Arc::new(TimedSink::default());
    let mut scheduler = scheduler(&sink);

    scheduler.schedule(steps(&["shown", "pending one", "pending two"]));
    sleep(Duration::from_millis(100)).await;
    assert_eq!(sink.len(), 1);
    assert_eq!(scheduler.pending_batches(), 1);

    scheduler.cancel_all();
    sleep(Duration::from_secs(5)).await;

    assert_eq!(sink.len(), 1);
    assert_eq!(scheduler.pending_batches(), 0);
}

#[tokio::test(start_paused = true)]
async fn dropping_scheduler_cancels_its_timers() {
    let sink = Arc::new(TimedSink::default());
    {
        let mut scheduler = scheduler(&sink);
        scheduler.schedule(steps(&["first", "second"]));
        sleep(Duration::from_millis(10)).await;
    }
    sleep(Duration::from_secs(5)).await;

    let texts: Vec<_> = sink.reveals().into_iter().map(|(_, text)| text).collect();
    assert_eq!(texts, vec!["first"]);
}

#[tokio::test(start_paused = true)]
async fn empty_step_list_creates_no_timers() {
    let sink = Arc::new(TimedSink::default());
    let mut scheduler = scheduler(&sink);

    scheduler.schedule(Vec::new());
    sleep(Duration::from_secs(1)).await;

    assert_eq!(sink.len(), 0);
    assert_eq!(scheduler.pending_batches(), 0);
}
