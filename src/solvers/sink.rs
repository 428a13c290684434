use std::{
    ops::ControlFlow,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
    },
};

use crate::maze::{Coord, Maze};

/// Receives a callback after every node expansion of a solve.
///
/// The call is synchronous and happens in visitation order, with the maze
/// already reflecting the expansion. Returning `ControlFlow::Break(())` stops
/// the solve, which then reports [`SolveError::Cancelled`](super::SolveError::Cancelled).
pub trait StepSink {
    fn on_step(&mut self, maze: &Maze, expanded: Coord) -> ControlFlow<()>;
}

impl<F> StepSink for F
where
    F: FnMut(&Maze, Coord) -> ControlFlow<()>,
{
    fn on_step(&mut self, maze: &Maze, expanded: Coord) -> ControlFlow<()> {
        self(maze, expanded)
    }
}

/// Ignores every step. Used for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl StepSink for NoopSink {
    fn on_step(&mut self, _maze: &Maze, _expanded: Coord) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// A single expansion, as forwarded by [`ChannelSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEvent {
    /// 1-based expansion counter within the solve.
    pub step: usize,
    pub coord: Coord,
}

/// Forwards every expansion over a channel, e.g. to a render thread.
/// The solve is cancelled once the receiving side hangs up.
pub struct ChannelSink {
    sender: Sender<StepEvent>,
    steps: usize,
}

impl ChannelSink {
    pub fn new(sender: Sender<StepEvent>) -> Self {
        ChannelSink { sender, steps: 0 }
    }
}

impl StepSink for ChannelSink {
    fn on_step(&mut self, _maze: &Maze, expanded: Coord) -> ControlFlow<()> {
        self.steps += 1;
        let event = StepEvent {
            step: self.steps,
            coord: expanded,
        };
        match self.sender.send(event) {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => {
                tracing::debug!("[sink] step receiver disconnected, cancelling solve");
                ControlFlow::Break(())
            }
        }
    }
}

/// Wraps another sink and cancels as soon as the shared flag is raised.
pub struct FlagSink<S> {
    cancel: Arc<AtomicBool>,
    inner: S,
}

impl<S: StepSink> FlagSink<S> {
    pub fn new(cancel: Arc<AtomicBool>, inner: S) -> Self {
        FlagSink { cancel, inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: StepSink> StepSink for FlagSink<S> {
    fn on_step(&mut self, maze: &Maze, expanded: Coord) -> ControlFlow<()> {
        if self.cancel.load(Ordering::Relaxed) {
            return ControlFlow::Break(());
        }
        self.inner.on_step(maze, expanded)
    }
}
