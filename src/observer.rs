//! The hook through which a running search hands control back to its host.
//!
//! The engine calls [StepObserver::on_step] once per iteration, after the cell mutations of that
//! iteration are complete. A host typically redraws the grid there, pumps its input queue and
//! decides whether the user asked to stop. Returning [ControlFlow::Break] requests cancellation,
//! which the engine honours at the top of its next iteration without undoing any marking.
use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;

use log::debug;

use crate::config::VisualizerConfig;
use crate::grid::Grid;

pub trait StepObserver {
    fn on_step(&mut self, grid: &Grid) -> ControlFlow<()>;
}

impl<F> StepObserver for F
where
    F: FnMut(&Grid) -> ControlFlow<()>,
{
    fn on_step(&mut self, grid: &Grid) -> ControlFlow<()> {
        self(grid)
    }
}

/// Never interrupts and draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {
    fn on_step(&mut self, _: &Grid) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Sleeps for a fixed delay after every step the wrapped observer lets through, so a human can
/// follow the search.
#[derive(Clone, Debug)]
pub struct Paced<O> {
    inner: O,
    delay: Duration,
}

impl<O: StepObserver> Paced<O> {
    pub fn new(inner: O, delay: Duration) -> Paced<O> {
        Paced { inner, delay }
    }

    pub fn from_config(inner: O, config: &VisualizerConfig) -> Paced<O> {
        Paced::new(inner, config.step_delay)
    }

    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: StepObserver> StepObserver for Paced<O> {
    fn on_step(&mut self, grid: &Grid) -> ControlFlow<()> {
        let flow = self.inner.on_step(grid);
        if flow.is_continue() && !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        flow
    }
}

/// Requests cancellation on the `limit`-th step, bounding how much work a search may do.
#[derive(Clone, Copy, Debug)]
pub struct CancelAfter {
    limit: usize,
    seen: usize,
}

impl CancelAfter {
    pub fn new(limit: usize) -> CancelAfter {
        CancelAfter { limit, seen: 0 }
    }

    pub fn steps_seen(&self) -> usize {
        self.seen
    }
}

impl StepObserver for CancelAfter {
    fn on_step(&mut self, _: &Grid) -> ControlFlow<()> {
        self.seen += 1;
        if self.seen >= self.limit {
            debug!("Step limit of {} reached", self.limit);
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}
