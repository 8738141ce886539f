//! Single-threaded event loop for native hosts.
//!
//! All listener and timer callbacks run on the thread that owns the loop.
//! Other threads (stdin reader) only send plain `LoopInput` values through
//! the inbox channel.

use crate::{Document, PlatformError, PlatformResult};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use hotclick_core::{ScriptedClick, TimerId, TimerService, TimerTask};
use std::cell::{Cell, RefCell};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Input delivered to the loop from outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopInput {
    /// Click the element matching `selector`.
    Click { selector: String, x: i32, y: i32 },
    /// Stop the loop, even with timers pending.
    Shutdown,
}

/// Loop time in milliseconds since the loop was created.
#[derive(Debug)]
pub enum Clock {
    Real(Instant),
    /// Only moves through `EventLoop::advance_to`.
    Manual(Cell<u64>),
}

impl Clock {
    pub fn real() -> Self {
        Clock::Real(Instant::now())
    }

    pub fn manual() -> Self {
        Clock::Manual(Cell::new(0))
    }

    pub fn now_ms(&self) -> u64 {
        match self {
            Clock::Real(start) => start.elapsed().as_millis() as u64,
            Clock::Manual(now) => now.get(),
        }
    }
}

/// Pending timers ordered by deadline, then by scheduling order.
#[derive(Default)]
struct TimerQueue {
    deadlines: RefCell<BinaryHeap<Reverse<(u64, u64)>>>,
    tasks: RefCell<HashMap<u64, TimerTask>>,
    next_id: Cell<u64>,
}

impl TimerQueue {
    /// Earliest deadline of a timer that has not been cleared.
    fn next_deadline(&self) -> Option<u64> {
        let mut deadlines = self.deadlines.borrow_mut();
        let tasks = self.tasks.borrow();
        while let Some(Reverse((deadline, id))) = deadlines.peek().copied() {
            if tasks.contains_key(&id) {
                return Some(deadline);
            }
            deadlines.pop();
        }
        None
    }

    fn pop_due(&self, now_ms: u64) -> Option<TimerTask> {
        let mut deadlines = self.deadlines.borrow_mut();
        let mut tasks = self.tasks.borrow_mut();
        while let Some(Reverse((deadline, id))) = deadlines.peek().copied() {
            if deadline > now_ms {
                return None;
            }
            deadlines.pop();
            if let Some(task) = tasks.remove(&id) {
                return Some(task);
            }
        }
        None
    }

    fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }
}

/// `TimerService` backed by an `EventLoop`.
#[derive(Clone)]
pub struct LoopTimer {
    clock: Rc<Clock>,
    queue: Rc<TimerQueue>,
}

impl TimerService for LoopTimer {
    fn set_timeout(&self, delay: Duration, task: TimerTask) -> TimerId {
        let id = self.queue.next_id.get();
        self.queue.next_id.set(id + 1);
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        let deadline = self.clock.now_ms().saturating_add(delay_ms);

        self.queue.deadlines.borrow_mut().push(Reverse((deadline, id)));
        self.queue.tasks.borrow_mut().insert(id, task);
        debug!(timer = id, deadline, "setTimeout");
        TimerId(id)
    }

    fn clear_timeout(&self, id: TimerId) -> bool {
        let cleared = self.queue.tasks.borrow_mut().remove(&id.0).is_some();
        debug!(timer = id.0, cleared, "clearTimeout");
        cleared
    }
}

pub struct EventLoop {
    document: Document,
    clock: Rc<Clock>,
    timers: Rc<TimerQueue>,
    inbox: Receiver<LoopInput>,
}

impl EventLoop {
    /// Create a loop over `document` and the sender for its inbox.
    ///
    /// `run` returns once every sender is dropped and no timers are pending.
    pub fn with_inbox(document: Document, clock: Clock) -> (Self, Sender<LoopInput>) {
        let (inbox_tx, inbox_rx) = bounded(1024);
        let event_loop = Self {
            document,
            clock: Rc::new(clock),
            timers: Rc::new(TimerQueue::default()),
            inbox: inbox_rx,
        };
        (event_loop, inbox_tx)
    }

    pub fn timer(&self) -> LoopTimer {
        LoopTimer {
            clock: self.clock.clone(),
            queue: self.timers.clone(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Schedule a simulated click at `click.at_ms` loop time.
    pub fn schedule_click(&self, selector: &str, click: ScriptedClick) -> TimerId {
        let document = self.document.clone();
        let clock = self.clock.clone();
        let selector = selector.to_string();
        let delay = click.at_ms.saturating_sub(self.now_ms());

        self.timer().set_timeout(
            Duration::from_millis(delay),
            Box::new(move || click_element(&document, &selector, click.x, click.y, clock.now_ms())),
        )
    }

    /// Run every timer whose deadline has passed. Returns how many ran.
    pub fn run_due_timers(&self) -> usize {
        let mut ran = 0;
        // The borrow on the queue is released before each task runs.
        while let Some(task) = self.timers.pop_due(self.now_ms()) {
            task();
            ran += 1;
        }
        ran
    }

    /// Handle queued input and due timers without blocking.
    ///
    /// Returns false if a `Shutdown` was received.
    pub fn run_pending(&self) -> bool {
        loop {
            match self.inbox.try_recv() {
                Ok(input) => {
                    if !self.handle_input(input) {
                        return false;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        self.run_due_timers();
        true
    }

    /// Move a manual clock forward to `ms`, firing timers at their deadlines.
    pub fn advance_to(&self, ms: u64) -> PlatformResult<()> {
        let Clock::Manual(now) = &*self.clock else {
            return Err(PlatformError::RealClock);
        };

        while let Some(deadline) = self.timers.next_deadline() {
            if deadline > ms {
                break;
            }
            if deadline > now.get() {
                now.set(deadline);
            }
            self.run_due_timers();
        }
        if ms > now.get() {
            now.set(ms);
        }
        Ok(())
    }

    /// Run until `Shutdown`, or until the inbox is closed and no timers remain.
    ///
    /// With a manual clock, time jumps straight to each next deadline.
    pub fn run(&self) -> PlatformResult<()> {
        info!("Event loop started");
        match &*self.clock {
            Clock::Real(_) => self.run_real(),
            Clock::Manual(_) => self.run_manual()?,
        }
        info!(pending_timers = self.pending_timers(), "Event loop exiting");
        Ok(())
    }

    fn run_real(&self) {
        loop {
            self.run_due_timers();

            let input = match self.timers.next_deadline() {
                Some(deadline) => {
                    let wait = Duration::from_millis(deadline.saturating_sub(self.now_ms()));
                    match self.inbox.recv_timeout(wait) {
                        Ok(input) => Some(input),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => {
                            thread::sleep(wait);
                            None
                        }
                    }
                }
                None => match self.inbox.recv() {
                    Ok(input) => Some(input),
                    Err(_) => break,
                },
            };

            if let Some(input) = input {
                if !self.handle_input(input) {
                    break;
                }
            }
        }
    }

    fn run_manual(&self) -> PlatformResult<()> {
        loop {
            if !self.run_pending() {
                return Ok(());
            }
            match self.timers.next_deadline() {
                Some(deadline) => self.advance_to(deadline)?,
                None => return Ok(()),
            }
        }
    }

    fn handle_input(&self, input: LoopInput) -> bool {
        match input {
            LoopInput::Click { selector, x, y } => {
                click_element(&self.document, &selector, x, y, self.now_ms());
                true
            }
            LoopInput::Shutdown => {
                info!("Shutdown requested");
                false
            }
        }
    }
}

fn click_element(document: &Document, selector: &str, x: i32, y: i32, timestamp_ms: u64) {
    match document.find(selector) {
        Some(element) => {
            let delivered = element.click(x, y, timestamp_ms);
            debug!(selector, x, y, delivered, "Click dispatched");
        }
        None => warn!("Click dropped: no element matches {}", selector),
    }
}
