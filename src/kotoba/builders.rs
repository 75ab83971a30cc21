//! Token builders
//!
//! One builder per token kind, run after the kind's classifier has
//! accepted the chunk at the cursor. Builders consume chunks, construct
//! tokens onto the accumulation stack, and carry the grammar's semantic
//! side effects: declaring variables, registering functions, opening
//! scopes, rewriting the stack so comparators precede their operands, and
//! rejecting constructs the surface shape alone cannot rule out.

use crate::kotoba::errors::{Error, ErrorKind};
use crate::kotoba::scope::{AddFunction, Scope, ScopeKind};
use crate::kotoba::tokenizer::{Phrase, Tokenizer};
use crate::kotoba::tokens::{Token, TokenKind, TokenSub};
use crate::kotoba::words;

impl Tokenizer<'_> {
    pub(crate) fn build_kind(&mut self, kind: TokenKind) -> Result<(), Error> {
        match kind {
            TokenKind::NoOp
            | TokenKind::Debug
            | TokenKind::Try
            | TokenKind::Bang
            | TokenKind::Question
            | TokenKind::If => self.build_simple(kind),
            TokenKind::Break => self.build_break(),
            TokenKind::Next => self.build_next(),
            TokenKind::Return => self.build_return(),
            TokenKind::ElseIf => self.build_else_if(),
            TokenKind::Else => self.build_else(),
            TokenKind::Loop => self.build_loop(),
            TokenKind::LoopIterator => self.build_loop_iterator(),
            TokenKind::Parameter => self.build_parameter(),
            TokenKind::FunctionDef => self.build_function_def(),
            TokenKind::FunctionCall => self.build_function_call(),
            TokenKind::Assignment => self.build_assignment(),
            TokenKind::Variable => self.build_variable(),
            TokenKind::Comma => self.build_comma(),
            TokenKind::Comp1 => self.build_comp_operand(TokenKind::Comp1, &[words::SUBJECT_PARTICLE]),
            TokenKind::Comp2To => self.build_comp_operand(TokenKind::Comp2, &["と"]),
            TokenKind::Comp2Yori => self.build_comp_operand(TokenKind::Comp2, &["より"]),
            TokenKind::Comp2Bound => self.build_comp_bound(),
            TokenKind::CompEq => self.build_comp_eq(),
            TokenKind::CompSize => self.build_comp_size(),
            TokenKind::CompBe => self.build_comp_be(),
            TokenKind::CompExists => self.build_comp_exists(),
            TokenKind::Possessive => self.build_possessive(),
            TokenKind::Property => self.build_property(),
            TokenKind::Attribute => self.build_attribute(),
            TokenKind::Eol => self.build_eol(),
            // never produced by a classifier
            _ => Ok(()),
        }
    }

    /// Keyword-like kinds: one chunk in, one token out. The if keyword
    /// additionally opens its condition context.
    fn build_simple(&mut self, kind: TokenKind) -> Result<(), Error> {
        let chunk = self.expect_chunk()?;
        if kind == TokenKind::If {
            self.context.inside_if_condition = true;
        }
        self.push(Token::new(kind, chunk.text));
        Ok(())
    }

    fn build_break(&mut self) -> Result<(), Error> {
        if !self.scope.inside_loop() {
            return Err(self.fail(ErrorKind::UnexpectedBreak));
        }
        self.build_simple(TokenKind::Break)
    }

    fn build_next(&mut self) -> Result<(), Error> {
        if !self.scope.inside_loop() {
            return Err(self.fail(ErrorKind::UnexpectedNext));
        }
        self.build_simple(TokenKind::Next)
    }

    fn build_return(&mut self) -> Result<(), Error> {
        if !self.scope.inside_function() {
            return Err(self.fail(ErrorKind::UnexpectedReturn));
        }
        let parameter = self.stack.last().cloned();
        if let Some(parameter) = parameter {
            if parameter.kind == TokenKind::Parameter {
                if parameter.particle.as_deref() != Some("を") {
                    return Err(self.fail(ErrorKind::InvalidReturnParameter(parameter.text)));
                }
                if parameter.sub.is_none() {
                    return Err(self.fail(ErrorKind::UndeclaredVariable(parameter.text)));
                }
            }
        }
        self.scope.mark_return();
        self.build_simple(TokenKind::Return)
    }

    fn build_else_if(&mut self) -> Result<(), Error> {
        if !matches!(
            self.context.last_closed_scope,
            Some(ScopeKind::If) | Some(ScopeKind::ElseIf)
        ) {
            return Err(self.fail(ErrorKind::UnexpectedElseIf));
        }
        let chunk = self.expect_chunk()?;
        self.context.inside_if_condition = true;
        self.push(Token::new(TokenKind::ElseIf, chunk.text));
        Ok(())
    }

    fn build_else(&mut self) -> Result<(), Error> {
        if !matches!(
            self.context.last_closed_scope,
            Some(ScopeKind::If) | Some(ScopeKind::ElseIf)
        ) {
            return Err(self.fail(ErrorKind::UnexpectedElse));
        }
        self.build_simple(TokenKind::Else)
    }

    /// The loop verb. In a while line the comparator builder has already
    /// produced the WHILE marker and the verb adds nothing; otherwise the
    /// range parameters are validated here.
    fn build_loop(&mut self) -> Result<(), Error> {
        let chunk = self.expect_chunk()?;
        if self.stack.first().map(|t| t.kind) == Some(TokenKind::While) {
            self.context.last_kind = Some(TokenKind::Loop);
            return Ok(());
        }
        if self.stack.last().map(|t| t.kind) != Some(TokenKind::LoopIterator) {
            self.check_range_parameters()?;
        }
        self.push(Token::new(TokenKind::Loop, chunk.text));
        Ok(())
    }

    fn check_range_parameters(&mut self) -> Result<(), Error> {
        let parameters: Vec<Token> = self
            .stack
            .iter()
            .filter(|t| t.kind == TokenKind::Parameter)
            .cloned()
            .collect();
        let mut seen: Vec<&str> = Vec::new();
        for parameter in &parameters {
            let particle = parameter.particle.as_deref().unwrap_or("");
            if particle != "から" && particle != "まで" {
                return Err(self.fail(ErrorKind::InvalidLoopParticle(particle.to_string())));
            }
            if seen.contains(&particle) {
                return Err(self.fail(ErrorKind::InvalidLoopParticle(particle.to_string())));
            }
            seen.push(particle);
            match parameter.sub {
                Some(TokenSub::ValNum) | Some(TokenSub::ValVar) | Some(TokenSub::ValSore) => {}
                Some(_) => {
                    return Err(
                        self.fail(ErrorKind::InvalidLoopParameter(parameter.text.clone()))
                    )
                }
                None => {
                    return Err(self.fail(ErrorKind::UndeclaredVariable(parameter.text.clone())))
                }
            }
        }
        Ok(())
    }

    fn build_loop_iterator(&mut self) -> Result<(), Error> {
        let subject = match self.stack.last() {
            Some(token) if token.kind == TokenKind::Parameter => token.clone(),
            _ => return Err(self.fail(ErrorKind::MissingLoopIterator)),
        };
        if subject.particle.as_deref() != Some("に") {
            let particle = subject.particle.unwrap_or_default();
            return Err(self.fail(ErrorKind::InvalidLoopParticle(particle)));
        }
        match subject.sub {
            Some(TokenSub::ValVar) | Some(TokenSub::ValStr) | Some(TokenSub::ValSore) => {}
            Some(_) => {
                return Err(self.fail(ErrorKind::InvalidLoopParameter(subject.text)));
            }
            None => return Err(self.fail(ErrorKind::UndeclaredVariable(subject.text))),
        }
        self.build_simple(TokenKind::LoopIterator)
    }

    /// A phrase with a function-argument particle. Validation of what the
    /// stem may be is deferred to the statement that claims the parameters
    /// (definition, call, loop, return), which is the first point where the
    /// required shape is known.
    fn build_parameter(&mut self) -> Result<(), Error> {
        let phrase = self.expect_phrase(words::FUNCTION_PARTICLES)?;
        let sub = self.value_sub_of(&phrase);
        let token = Token {
            kind: TokenKind::Parameter,
            text: phrase.stem,
            sub,
            particle: Some(phrase.particle),
        };
        self.push(token);
        Ok(())
    }

    fn build_function_def(&mut self) -> Result<(), Error> {
        let chunk = self.expect_chunk()?;
        let name = chunk
            .text
            .strip_suffix("とは")
            .unwrap_or(&chunk.text)
            .to_string();
        if words::is_reserved(&name) {
            return Err(self.fail(ErrorKind::FunctionDefReservedName(name)));
        }
        if !crate::kotoba::conjugator::is_verb(&name) {
            return Err(self.fail(ErrorKind::FunctionDefNonVerbName(name)));
        }

        let parameters: Vec<Token> = self
            .stack
            .iter()
            .filter(|t| t.kind == TokenKind::Parameter)
            .cloned()
            .collect();
        let mut names: Vec<&str> = Vec::new();
        for parameter in &parameters {
            if words::is_reserved(&parameter.text) {
                return Err(
                    self.fail(ErrorKind::FunctionDefReservedParameter(parameter.text.clone()))
                );
            }
            if matches!(
                parameter.sub,
                Some(TokenSub::ValNum)
                    | Some(TokenSub::ValStr)
                    | Some(TokenSub::ValTrue)
                    | Some(TokenSub::ValFalse)
                    | Some(TokenSub::ValNull)
                    | Some(TokenSub::ValArray)
                    | Some(TokenSub::ValSore)
            ) {
                return Err(
                    self.fail(ErrorKind::FunctionDefLiteralParameter(parameter.text.clone()))
                );
            }
            if names.contains(&parameter.text.as_str()) {
                return Err(
                    self.fail(ErrorKind::FunctionDefDuplicateParameter(parameter.text.clone()))
                );
            }
            names.push(&parameter.text);
        }

        let particles: Vec<String> = parameters
            .iter()
            .filter_map(|p| p.particle.clone())
            .collect();
        let line = self.error_line();
        self.scope
            .add_function(&name, &particles, AddFunction::default())
            .map_err(|kind| Error::new(kind, line))?;

        self.context.open_function_def = true;
        self.push(Token::new(TokenKind::FunctionDef, name));
        Ok(())
    }

    fn build_function_call(&mut self) -> Result<(), Error> {
        let chunk = self.expect_chunk()?;
        let surface = chunk.text;

        let mut provided: Vec<String> = Vec::new();
        let mut undeclared: Option<String> = None;
        for token in &self.stack {
            match token.kind {
                TokenKind::Parameter => {
                    if token.sub.is_none() && undeclared.is_none() {
                        undeclared = Some(token.text.clone());
                    }
                    provided.extend(token.particle.clone());
                }
                TokenKind::Property | TokenKind::Attribute => {
                    provided.extend(token.particle.clone());
                }
                _ => {}
            }
        }
        if let Some(text) = undeclared {
            return Err(self.fail(ErrorKind::UndeclaredVariable(text)));
        }

        let signature = Scope::signature_of(&provided);
        if let Some(entry) = self.scope.get_function(&surface, &signature) {
            let canonical = entry.canonical.clone();
            self.push(Token::new(TokenKind::FunctionCall, canonical));
            return Ok(());
        }

        // The name exists under some other signature: diagnose by particle
        // counts against the innermost candidate.
        let candidate = self
            .scope
            .signatures_named(&surface)
            .first()
            .map(|entry| (*entry).clone());
        let Some(candidate) = candidate else {
            return Err(self.fail(ErrorKind::FunctionDoesNotExist(surface)));
        };
        let count = |list: &[String], particle: &str| {
            list.iter().filter(|p| *p == particle).count()
        };
        for required in &candidate.particles {
            if count(&provided, required) < count(&candidate.particles, required) {
                return Err(self.fail(ErrorKind::MissingParticle(
                    candidate.canonical.clone(),
                    required.clone(),
                )));
            }
        }
        for given in &provided {
            if count(&candidate.particles, given) < count(&provided, given) {
                return Err(self.fail(ErrorKind::WrongParticle(
                    candidate.canonical.clone(),
                    given.clone(),
                )));
            }
        }
        Err(self.fail(ErrorKind::FunctionDoesNotExist(surface)))
    }

    fn build_assignment(&mut self) -> Result<(), Error> {
        let phrase = self.expect_phrase(&[words::ASSIGNMENT_PARTICLE])?;
        if phrase.is_string || words::value_sub(&phrase.stem).is_some() {
            return Err(self.fail(ErrorKind::AssignmentToValue(phrase.stem)));
        }
        if words::is_reserved(&phrase.stem) {
            return Err(self.fail(ErrorKind::AssignmentToReservedWord(phrase.stem)));
        }
        self.context.inside_assignment = true;
        let token = Token::new(TokenKind::Assignment, phrase.stem).with_particle(phrase.particle);
        self.push(token);
        Ok(())
    }

    fn build_variable(&mut self) -> Result<(), Error> {
        let chunk = self.expect_chunk()?;
        if chunk.is_string() {
            let token =
                Token::new(TokenKind::Variable, chunk.string_contents()).with_sub(TokenSub::ValStr);
            self.push(token);
            return Ok(());
        }
        let text = chunk.text;
        let sub = if let Some(sub) = words::value_sub(&text) {
            sub
        } else if self.scope.has_variable(&text) {
            TokenSub::ValVar
        } else if self.assignment_target().as_deref() == Some(text.as_str()) {
            return Err(self.fail(ErrorKind::SelfReferentialAssignment(text)));
        } else {
            return Err(self.fail(ErrorKind::UndeclaredVariable(text)));
        };
        self.push(Token::new(TokenKind::Variable, text).with_sub(sub));
        Ok(())
    }

    fn build_comma(&mut self) -> Result<(), Error> {
        let chunk = self.expect_chunk()?;
        self.context.inside_array = true;
        self.push(Token::new(TokenKind::Comma, chunk.text));
        Ok(())
    }

    /// A comparison operand: subject (が) or second operand (と/より).
    fn build_comp_operand(&mut self, kind: TokenKind, particles: &[&str]) -> Result<(), Error> {
        let phrase = self.expect_phrase(particles)?;
        let sub = match self.value_sub_of(&phrase) {
            Some(sub) => sub,
            None => {
                let stem = phrase.stem;
                return Err(self.fail(ErrorKind::UndeclaredVariable(stem)));
            }
        };
        let token = Token {
            kind,
            text: phrase.stem,
            sub: Some(sub),
            particle: Some(phrase.particle),
        };
        self.push(token);
        Ok(())
    }

    /// A bounded operand (`X以上` / `X以下`): the bound direction is held in
    /// the context until the closing `であれば` resolves it.
    fn build_comp_bound(&mut self) -> Result<(), Error> {
        let chunk = self.expect_chunk()?;
        let (stem, bound) = if let Some(stem) = chunk.text.strip_suffix(words::BOUND_UPPER_SUFFIX) {
            (stem.to_string(), TokenKind::CompGtEq)
        } else {
            let stem = chunk
                .text
                .strip_suffix(words::BOUND_LOWER_SUFFIX)
                .unwrap_or(&chunk.text)
                .to_string();
            (stem, TokenKind::CompLtEq)
        };
        let phrase = Phrase {
            stem: stem.clone(),
            particle: String::new(),
            chunks: 0,
            is_string: false,
        };
        let sub = match self.value_sub_of(&phrase) {
            Some(sub) => sub,
            None => return Err(self.fail(ErrorKind::UndeclaredVariable(stem))),
        };
        self.context.pending_bound = Some(bound);
        self.push(Token::new(TokenKind::Comp2, stem).with_sub(sub));
        Ok(())
    }

    fn build_comp_eq(&mut self) -> Result<(), Error> {
        let chunk = self.expect_chunk()?;
        let kind = if chunk.text.contains("等しくな") {
            TokenKind::CompNeq
        } else {
            TokenKind::CompEq
        };
        self.finish_comparison(kind)
    }

    fn build_comp_size(&mut self) -> Result<(), Error> {
        let chunk = self.expect_chunk()?;
        let kind = if chunk.text.starts_with("大き") {
            TokenKind::CompGt
        } else {
            TokenKind::CompLt
        };
        self.finish_comparison(kind)
    }

    fn build_comp_be(&mut self) -> Result<(), Error> {
        let chunk = self.expect_chunk()?;
        let kind = match self.context.pending_bound.take() {
            Some(kind) => kind,
            None => return Err(self.fail(ErrorKind::UnexpectedInput(chunk.text))),
        };
        self.finish_comparison(kind)
    }

    fn build_comp_exists(&mut self) -> Result<(), Error> {
        let chunk = self.expect_chunk()?;
        let kind = if chunk.text.starts_with('な') {
            TokenKind::CompEmp
        } else {
            TokenKind::CompNemp
        };
        self.finish_comparison(kind)
    }

    /// Rewrite the accumulated stack so the comparator precedes its
    /// operands, and re-emit the operands as plain variables. Outside an
    /// if/else-if condition this is a while condition, marked by a leading
    /// WHILE token.
    fn finish_comparison(&mut self, kind: TokenKind) -> Result<(), Error> {
        let mut operands: Vec<Token> = Vec::new();
        while matches!(
            self.stack.last().map(|t| t.kind),
            Some(TokenKind::Comp1) | Some(TokenKind::Comp2)
        ) {
            operands.push(self.stack.pop().unwrap());
        }
        operands.reverse();

        if !self.context.inside_if_condition {
            self.stack.push(Token::of(TokenKind::While));
        }
        self.stack.push(Token::of(kind));
        for operand in operands {
            self.stack.push(Token {
                kind: TokenKind::Variable,
                text: operand.text,
                sub: operand.sub,
                particle: operand.particle,
            });
        }
        self.context.last_kind = Some(kind);
        Ok(())
    }

    fn build_possessive(&mut self) -> Result<(), Error> {
        let phrase = self.expect_phrase(&[words::POSSESSIVE_PARTICLE])?;
        let sub = if phrase.is_string {
            TokenSub::ValStr
        } else if self.scope.has_variable(&phrase.stem) {
            TokenSub::ValVar
        } else if phrase.stem == "それ" {
            TokenSub::ValSore
        } else if words::value_sub(&phrase.stem).is_some() {
            return Err(self.fail(ErrorKind::InvalidPropertyOwner(phrase.stem)));
        } else {
            return Err(self.fail(ErrorKind::UndeclaredVariable(phrase.stem)));
        };
        let token = Token {
            kind: TokenKind::Possessive,
            text: phrase.stem,
            sub: Some(sub),
            particle: Some(phrase.particle),
        };
        self.push(token);
        Ok(())
    }

    fn build_property(&mut self) -> Result<(), Error> {
        let (stem, particle) = match self.phrase_at(words::FUNCTION_PARTICLES)? {
            Some(phrase) => {
                self.advance(phrase.chunks);
                (phrase.stem, Some(phrase.particle))
            }
            None => {
                let chunk = self.expect_chunk()?;
                (chunk.text, None)
            }
        };
        let sub = words::property_sub(&stem);
        // a string owner's type is known here, so its capabilities are too
        let owner = self.stack.last().cloned();
        if let Some(owner) = owner {
            if owner.sub == Some(TokenSub::ValStr) && sub == Some(TokenSub::PropKeys) {
                return Err(self.fail(ErrorKind::InvalidProperty(owner.text, stem)));
            }
        }
        let token = Token {
            kind: TokenKind::Property,
            text: stem,
            sub,
            particle,
        };
        self.push(token);
        Ok(())
    }

    fn build_attribute(&mut self) -> Result<(), Error> {
        let owner_token = self.stack.last().cloned();
        let owner = owner_token
            .as_ref()
            .map(|t| t.text.clone())
            .unwrap_or_default();

        let (stem, particle, is_string) = match self.phrase_at(words::FUNCTION_PARTICLES)? {
            Some(phrase) => {
                self.advance(phrase.chunks);
                (phrase.stem, Some(phrase.particle), phrase.is_string)
            }
            None => {
                let chunk = self.expect_chunk()?;
                let is_string = chunk.is_string();
                let text = if is_string {
                    chunk.string_contents().to_string()
                } else {
                    chunk.text
                };
                (text, None, is_string)
            }
        };

        let sub = if is_string {
            // string keys index arrays of pairs, never string owners
            if owner_token.as_ref().and_then(|t| t.sub) == Some(TokenSub::ValStr) {
                return Err(self.fail(ErrorKind::InvalidAttribute(owner, stem)));
            }
            TokenSub::KeyName
        } else if words::is_number(&stem) {
            TokenSub::KeyIndex
        } else if self.scope.has_variable(&stem) || stem == "それ" {
            TokenSub::KeyVar
        } else {
            return Err(self.fail(ErrorKind::InvalidAttribute(owner, stem)));
        };
        let token = Token {
            kind: TokenKind::Attribute,
            text: stem,
            sub: Some(sub),
            particle,
        };
        self.push(token);
        Ok(())
    }

    /// End of line: the only place tokens become externally observable.
    /// Scope-opening statements finish with SCOPE_BEGIN instead of EOL;
    /// no-op and debug lines end with their own kind.
    fn build_eol(&mut self) -> Result<(), Error> {
        let cursor = self.cursor;
        if self.chunk_at(cursor)?.is_some() {
            self.advance(1);
        }

        if self.context.open_function_def {
            let parameters: Vec<String> = self
                .stack
                .iter()
                .filter(|t| t.kind == TokenKind::Parameter)
                .map(|t| t.text.clone())
                .collect();
            self.scope.open(ScopeKind::Function);
            for parameter in parameters {
                self.scope.add_variable(parameter);
            }
            self.push(Token::of(TokenKind::ScopeBegin));
            return Ok(());
        }

        let opener = match self.stack.first().map(|t| t.kind) {
            Some(TokenKind::If) => Some(ScopeKind::If),
            Some(TokenKind::ElseIf) => Some(ScopeKind::ElseIf),
            Some(TokenKind::Else) => Some(ScopeKind::Else),
            Some(TokenKind::While) => Some(ScopeKind::Loop),
            Some(TokenKind::Try) => Some(ScopeKind::Try),
            _ => None,
        };
        let opener = opener.or_else(|| {
            (self.stack.last().map(|t| t.kind) == Some(TokenKind::Loop)).then_some(ScopeKind::Loop)
        });
        if let Some(kind) = opener {
            self.scope.open(kind);
            self.push(Token::of(TokenKind::ScopeBegin));
            return Ok(());
        }

        match self.stack.first().map(|t| t.kind) {
            Some(TokenKind::NoOp) | Some(TokenKind::Debug) => Ok(()),
            Some(TokenKind::Assignment) => {
                if self.context.inside_array {
                    self.stack.insert(1, Token::of(TokenKind::ArrayBegin));
                    self.push(Token::of(TokenKind::ArrayClose));
                }
                let target = self.stack[0].text.clone();
                self.scope.add_variable(target);
                self.push(Token::of(TokenKind::Eol));
                Ok(())
            }
            _ => {
                self.push(Token::of(TokenKind::Eol));
                Ok(())
            }
        }
    }

    // --- shared helpers ---

    /// Literal-or-declared resolution used by parameters and comparison
    /// operands. `None` means an undeclared bare word.
    fn value_sub_of(&self, phrase: &Phrase) -> Option<TokenSub> {
        if phrase.is_string {
            return Some(TokenSub::ValStr);
        }
        if let Some(sub) = words::value_sub(&phrase.stem) {
            return Some(sub);
        }
        if self.scope.has_variable(&phrase.stem) {
            return Some(TokenSub::ValVar);
        }
        None
    }

    fn assignment_target(&self) -> Option<String> {
        self.stack
            .first()
            .filter(|t| t.kind == TokenKind::Assignment)
            .map(|t| t.text.clone())
    }
}
