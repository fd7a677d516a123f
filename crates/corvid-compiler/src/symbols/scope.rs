//! Local scope management for function bodies.
//!
//! `LocalScope` tracks the locals of one frame (a function body or the
//! ordinary instruction stream). It handles:
//! - Slot allocation in declaration order
//! - Nested block scopes (if/while/for bodies)
//! - Shadowing with restoration on scope exit
//! - Slot reuse across sibling scopes

use corvid_core::{CompilationError, Span};
use rustc_hash::FxHashMap;

use crate::ids::LocalSlot;

/// Information about a local variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVar {
    pub name: String,
    pub slot: LocalSlot,
    /// Scope depth where declared
    pub depth: u32,
    /// Source location of declaration
    pub span: Span,
}

/// Locals of a single frame.
#[derive(Debug, Clone, Default)]
pub struct LocalScope {
    /// Visible variables by name
    variables: FxHashMap<String, LocalVar>,

    /// Current scope depth (0 = frame scope)
    scope_depth: u32,

    /// Variables hidden by a declaration, with the depth at which the
    /// hiding declaration happened
    shadowed: Vec<(u32, LocalVar)>,

    /// `next_slot` at entry of each open scope
    scope_starts: Vec<u32>,

    /// Next available slot
    next_slot: u32,

    /// Maximum number of simultaneously live slots
    max_slot: u32,
}

impl LocalScope {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Scope Management
    // ==========================================================================

    /// Enter a new scope (block, if body, loop body, etc.).
    pub fn enter_scope(&mut self) {
        self.scope_depth += 1;
        self.scope_starts.push(self.next_slot);
    }

    /// Exit the current scope, forgetting its variables and releasing their
    /// slots for reuse by the next sibling scope.
    ///
    /// Returns the number of slots released.
    pub fn exit_scope(&mut self) -> Result<u32, CompilationError> {
        let start = self
            .scope_starts
            .pop()
            .ok_or_else(|| CompilationError::internal("exit_scope without matching enter_scope"))?;
        let depth = self.scope_depth;

        self.variables.retain(|_, var| var.depth < depth);

        while let Some((shadowing_depth, _)) = self.shadowed.last() {
            if *shadowing_depth != depth {
                break;
            }
            if let Some((_, var)) = self.shadowed.pop()
                && var.depth < depth
            {
                self.variables.insert(var.name.clone(), var);
            }
        }

        let released = self.next_slot - start;
        self.next_slot = start;
        self.scope_depth -= 1;
        Ok(released)
    }

    /// Get current scope depth.
    pub fn depth(&self) -> u32 {
        self.scope_depth
    }

    // ==========================================================================
    // Variable Declaration
    // ==========================================================================

    /// Declare a local in the current scope and allocate its slot.
    ///
    /// A declaration with a name already visible hides the older one until
    /// the current scope exits.
    pub fn declare(&mut self, name: &str, span: Span) -> LocalSlot {
        let slot = self.allocate_slot();
        let var = LocalVar {
            name: name.to_string(),
            slot,
            depth: self.scope_depth,
            span,
        };
        if let Some(old) = self.variables.insert(name.to_string(), var) {
            self.shadowed.push((self.scope_depth, old));
        }
        slot
    }

    /// Declare a function parameter. Parameters live at depth 0 and take
    /// slots in order.
    pub fn declare_param(&mut self, name: &str, span: Span) -> LocalSlot {
        debug_assert_eq!(self.scope_depth, 0, "parameters are declared first");
        self.declare(name, span)
    }

    fn allocate_slot(&mut self) -> LocalSlot {
        let slot = self.next_slot;
        self.next_slot += 1;
        self.max_slot = self.max_slot.max(self.next_slot);
        LocalSlot::new(slot)
    }

    // ==========================================================================
    // Lookup & Accessors
    // ==========================================================================

    pub fn get(&self, name: &str) -> Option<&LocalVar> {
        self.variables.get(name)
    }

    /// Number of slots currently live.
    pub fn slot_count(&self) -> u32 {
        self.next_slot
    }

    /// Get the maximum frame size needed.
    pub fn frame_size(&self) -> u32 {
        self.max_slot
    }
}
