//! Lexical scope chain
//!
//! A stack of frames, one per open block (main, if, function, loop, try).
//! Each frame holds its declared variables and a registry of callable
//! spellings: every function is stored under its dictionary form, its
//! aliases, and every conjugated surface form, each keyed together with the
//! sorted particle signature. Lookups bubble down the stack, so child
//! frames shadow their parents.

use std::collections::{HashMap, HashSet};

use crate::kotoba::conjugator;
use crate::kotoba::errors::ErrorKind;

/// What kind of block a frame belongs to. Consulted when deciding the
/// legality of break/next/return and else placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Main,
    If,
    ElseIf,
    Else,
    Function,
    Loop,
    Try,
}

/// One resolvable function spelling.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionEntry {
    /// Dictionary-form name the evaluator dispatches on.
    pub canonical: String,
    /// Sorted, concatenated particle signature.
    pub signature: String,
    /// The sorted particles the signature was built from, kept for
    /// diagnosing call-site mismatches.
    pub particles: Vec<String>,
    pub built_in: bool,
}

#[derive(Debug, Clone)]
struct Frame {
    kind: ScopeKind,
    variables: HashSet<String>,
    functions: HashMap<String, Vec<FunctionEntry>>,
    saw_return: bool,
}

impl Frame {
    fn new(kind: ScopeKind) -> Self {
        Frame {
            kind,
            variables: HashSet::new(),
            functions: HashMap::new(),
            saw_return: false,
        }
    }
}

/// Options for registering a function.
#[derive(Debug, Clone, Default)]
pub struct AddFunction {
    /// Register the surfaces as spellings of an existing canonical name
    /// instead of the dictionary form itself.
    pub alias_of: Option<String>,
    /// Additional dictionary-form spellings, conjugated like the name.
    pub aliases: Vec<String>,
    /// Explicit surface forms; when given, automatic conjugation is skipped.
    pub conjugations: Option<Vec<String>>,
    /// Overwrite a colliding key in the current frame instead of erroring.
    pub force: bool,
    pub built_in: bool,
}

#[derive(Debug, Clone)]
pub struct Scope {
    frames: Vec<Frame>,
}

impl Scope {
    pub fn new() -> Self {
        Scope {
            frames: vec![Frame::new(ScopeKind::Main)],
        }
    }

    /// Nesting depth beyond the main frame; equals the live indentation
    /// level of the program text.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn open(&mut self, kind: ScopeKind) {
        self.frames.push(Frame::new(kind));
    }

    /// Close the innermost frame, reporting its kind and whether an
    /// explicit return was seen directly in it. The main frame never
    /// closes.
    pub fn close(&mut self) -> Option<(ScopeKind, bool)> {
        if self.frames.len() == 1 {
            return None;
        }
        let frame = self.frames.pop().unwrap();
        Some((frame.kind, frame.saw_return))
    }

    pub fn current_kind(&self) -> ScopeKind {
        self.frames.last().unwrap().kind
    }

    /// Walk outward from the innermost frame. Break/next legality: is
    /// there a loop frame before the enclosing function boundary?
    pub fn inside_loop(&self) -> bool {
        for frame in self.frames.iter().rev() {
            match frame.kind {
                ScopeKind::Loop => return true,
                ScopeKind::Function => return false,
                _ => {}
            }
        }
        false
    }

    pub fn inside_function(&self) -> bool {
        self.frames.iter().any(|f| f.kind == ScopeKind::Function)
    }

    /// Record that the innermost function frame returned explicitly.
    pub fn mark_return(&mut self) {
        if self.frames.last().unwrap().kind == ScopeKind::Function {
            self.frames.last_mut().unwrap().saw_return = true;
        }
    }

    pub fn add_variable(&mut self, name: impl Into<String>) {
        self.frames.last_mut().unwrap().variables.insert(name.into());
    }

    /// Whether a variable is visible here, bubbling to parent frames.
    pub fn has_variable(&self, name: &str) -> bool {
        self.frames.iter().rev().any(|f| f.variables.contains(name))
    }

    /// The canonical signature for a set of call-site particles: sorted
    /// and concatenated, so argument order is irrelevant.
    pub fn signature_of(particles: &[String]) -> String {
        let mut sorted: Vec<&str> = particles.iter().map(|p| p.as_str()).collect();
        sorted.sort_unstable();
        sorted.concat()
    }

    /// Register a function under every callable spelling.
    ///
    /// The key is surface form + particle signature. A key already present
    /// in the *current* frame raises: the dictionary form itself collides
    /// as an already-declared function, a conjugated or aliased spelling as
    /// an ambiguous conjugation naming both canonical forms. Keys inherited
    /// from parent frames are shadowed silently; `force` also overwrites
    /// same-frame keys.
    pub fn add_function(
        &mut self,
        name: &str,
        particles: &[String],
        options: AddFunction,
    ) -> Result<(), ErrorKind> {
        let signature = Self::signature_of(particles);
        let mut sorted_particles = particles.to_vec();
        sorted_particles.sort_unstable();
        let canonical = options.alias_of.clone().unwrap_or_else(|| name.to_string());

        let mut surfaces: Vec<(String, bool)> = Vec::new();
        match &options.conjugations {
            Some(forms) => {
                surfaces.push((name.to_string(), true));
                surfaces.extend(forms.iter().map(|f| (f.clone(), false)));
            }
            None => {
                for spelling in std::iter::once(name).chain(options.aliases.iter().map(|a| a.as_str())) {
                    let forms = conjugator::surface_forms(spelling);
                    if forms.is_empty() {
                        surfaces.push((spelling.to_string(), spelling == name));
                    } else {
                        for (index, form) in forms.into_iter().enumerate() {
                            surfaces.push((form, index == 0 && spelling == name));
                        }
                    }
                }
            }
        }

        // Collision check against the current frame only.
        if !options.force {
            let frame = self.frames.last().unwrap();
            for (surface, is_dictionary) in &surfaces {
                if let Some(entries) = frame.functions.get(surface) {
                    if let Some(existing) = entries.iter().find(|e| e.signature == signature) {
                        return Err(if *is_dictionary {
                            ErrorKind::FunctionAlreadyDeclared(name.to_string())
                        } else {
                            ErrorKind::AmbiguousConjugation(
                                existing.canonical.clone(),
                                canonical.clone(),
                            )
                        });
                    }
                }
            }
        }

        let frame = self.frames.last_mut().unwrap();
        for (surface, _) in surfaces {
            let entries = frame.functions.entry(surface).or_default();
            entries.retain(|e| e.signature != signature);
            entries.push(FunctionEntry {
                canonical: canonical.clone(),
                signature: signature.clone(),
                particles: sorted_particles.clone(),
                built_in: options.built_in,
            });
        }
        Ok(())
    }

    /// Whether any function is callable under this surface spelling,
    /// regardless of signature.
    pub fn has_function_named(&self, surface: &str) -> bool {
        self.frames
            .iter()
            .rev()
            .any(|f| f.functions.contains_key(surface))
    }

    /// Resolve a surface spelling with the exact particle signature,
    /// bubbling to parent frames.
    pub fn get_function(&self, surface: &str, signature: &str) -> Option<&FunctionEntry> {
        for frame in self.frames.iter().rev() {
            if let Some(entries) = frame.functions.get(surface) {
                if let Some(entry) = entries.iter().find(|e| e.signature == signature) {
                    return Some(entry);
                }
            }
        }
        None
    }

    /// All signatures reachable under a surface spelling, innermost frame
    /// first. Used to diagnose particle mismatches at a call site.
    pub fn signatures_named(&self, surface: &str) -> Vec<&FunctionEntry> {
        let mut found = Vec::new();
        for frame in self.frames.iter().rev() {
            if let Some(entries) = frame.functions.get(surface) {
                found.extend(entries.iter());
            }
        }
        found
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in functions available in every root scope: canonical name,
/// argument particles, alias spellings.
pub const BUILT_INS: &[(&str, &[&str], &[&str])] = &[
    ("言う", &["を"], &["いう"]),
    ("表示する", &["を"], &[]),
    ("投げる", &["を"], &[]),
    ("追加する", &["に", "を"], &[]),
    ("抜く", &["から", "を"], &[]),
];

/// Register the built-ins into a (fresh) root scope.
pub fn register_built_ins(scope: &mut Scope) {
    for (name, particles, aliases) in BUILT_INS {
        let particles: Vec<String> = particles.iter().map(|p| p.to_string()).collect();
        let options = AddFunction {
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            built_in: true,
            ..AddFunction::default()
        };
        scope
            .add_function(name, &particles, options)
            .expect("built-in registration never collides");
    }
}
