//! Disambiguation context
//!
//! Small mutable state the classifiers and builders consult while a line is
//! being matched: the last emitted token kind, and flags describing what
//! construct is currently open. Cloned wholesale into matcher snapshots.

use crate::kotoba::scope::ScopeKind;
use crate::kotoba::tokens::TokenKind;

#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Kind of the most recently built token.
    pub last_kind: Option<TokenKind>,

    /// Inside the condition of an if/else-if line.
    pub inside_if_condition: bool,

    /// An assignment target has been read on this line.
    pub inside_assignment: bool,

    /// A comma appeared on the right-hand side: the value list is an array
    /// literal.
    pub inside_array: bool,

    /// A function definition line is open; its scope is created when the
    /// line completes.
    pub open_function_def: bool,

    /// Bound direction pending between a `以上`/`以下` operand and its
    /// comparator.
    pub pending_bound: Option<TokenKind>,

    /// Kind of the scope that was closed by the most recent indentation
    /// decrease. Decides whether else/else-if lines are legal.
    pub last_closed_scope: Option<ScopeKind>,
}

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    /// Reset the per-line flags after a line has been flushed. The last
    /// emitted kind survives; the last closed scope is consumed by the
    /// line that followed it.
    pub fn end_line(&mut self) {
        self.inside_if_condition = false;
        self.inside_assignment = false;
        self.inside_array = false;
        self.open_function_def = false;
        self.pending_bound = None;
        self.last_closed_scope = None;
    }
}
