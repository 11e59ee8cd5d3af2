//! Graphics state stack for the content stream processor.
//!
//! The current state is always present; `q` pushes a copy of it onto the
//! saved stack and `Q` pops the most recent copy back. The base state can
//! never be popped.

use crate::graphics_state::GraphicsState;

/// The current graphics state plus the states saved by `q`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterpreterState {
    current: GraphicsState,
    stack: Vec<GraphicsState>,
}

impl InterpreterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graphics_state(&self) -> &GraphicsState {
        &self.current
    }

    pub fn graphics_state_mut(&mut self) -> &mut GraphicsState {
        &mut self.current
    }

    /// Number of states saved above the base state.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// `q`: save a copy of the current state.
    pub fn save_state(&mut self) {
        self.stack.push(self.current.clone());
    }

    /// `Q`: restore the most recently saved state.
    ///
    /// Returns `false` and leaves the state untouched when only the base
    /// state remains (unbalanced `Q`).
    pub fn restore_state(&mut self) -> bool {
        match self.stack.pop() {
            Some(saved) => {
                self.current = saved;
                true
            }
            None => false,
        }
    }
}
