// Path: crates/types/src/policy/expression.rs

//! Recursive-descent parser for the policy expression language.
//!
//! ```text
//! rule      := operator '(' arguments ')' | principal
//! operator  := AND | OR | OutOf
//! principal := quote MSPID '.' role quote
//! ```
//!
//! `OutOf` takes its threshold as the first argument, optionally quoted.

use super::{MspRole, PolicyIdentity, PolicyRule, SignaturePolicySpec};
use crate::error::LifecycleError;

/// Deepest operator nesting accepted.
pub(super) const MAX_DEPTH: usize = 64;

/// Characters of the expression quoted back in error messages.
const ECHO_LIMIT: usize = 80;

pub(super) fn parse(expr: &str) -> Result<SignaturePolicySpec, LifecycleError> {
    let mut parser = Parser {
        src: expr,
        bytes: expr.as_bytes(),
        pos: 0,
        depth: 0,
        identities: Vec::new(),
    };
    let policy = parser.rule()?;
    parser.skip_ws();
    if parser.peek().is_some() {
        return Err(parser.error("unexpected trailing input"));
    }
    let spec = SignaturePolicySpec {
        identities: parser.identities,
        policy,
    };
    spec.validate()?;
    Ok(spec)
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
    identities: Vec<PolicyIdentity>,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn error(&self, msg: &str) -> LifecycleError {
        let shown = match self.src.char_indices().nth(ECHO_LIMIT) {
            Some((end, _)) => format!("{}...", self.src.get(..end).unwrap_or_default()),
            None => self.src.to_string(),
        };
        LifecycleError::InvalidPolicy(format!("{} at position {} in '{}'", msg, self.pos, shown))
    }

    fn expect(&mut self, c: u8) -> Result<(), LifecycleError> {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", c as char)))
        }
    }

    fn slice(&self, start: usize, end: usize) -> Result<&str, LifecycleError> {
        self.src
            .get(start..end)
            .ok_or_else(|| self.error("invalid character boundary"))
    }

    fn rule(&mut self) -> Result<PolicyRule, LifecycleError> {
        self.skip_ws();
        match self.peek() {
            Some(b'\'') | Some(b'"') => {
                let principal = self.quoted()?;
                self.principal(&principal).map(PolicyRule::SignedBy)
            }
            Some(b) if b.is_ascii_alphabetic() => {
                let operator = self.word()?.to_ascii_lowercase();
                self.expect(b'(')?;
                self.depth += 1;
                if self.depth > MAX_DEPTH {
                    return Err(self.error(&format!(
                        "policy nesting exceeds {} levels",
                        MAX_DEPTH
                    )));
                }
                let rule = match operator.as_str() {
                    "and" => {
                        let rules = self.arguments()?;
                        let n = u32::try_from(rules.len())
                            .map_err(|_| self.error("too many sub-rules"))?;
                        PolicyRule::NOutOf { n, rules }
                    }
                    "or" => PolicyRule::NOutOf {
                        n: 1,
                        rules: self.arguments()?,
                    },
                    "outof" => {
                        let n = self.threshold()?;
                        self.expect(b',')?;
                        PolicyRule::NOutOf {
                            n,
                            rules: self.arguments()?,
                        }
                    }
                    other => return Err(self.error(&format!("unknown operator '{}'", other))),
                };
                self.expect(b')')?;
                self.depth -= 1;
                Ok(rule)
            }
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of expression")),
        }
    }

    fn arguments(&mut self) -> Result<Vec<PolicyRule>, LifecycleError> {
        let mut rules = vec![self.rule()?];
        loop {
            self.skip_ws();
            if self.peek() != Some(b',') {
                return Ok(rules);
            }
            self.pos += 1;
            rules.push(self.rule()?);
        }
    }

    fn word(&mut self) -> Result<String, LifecycleError> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric()) {
            self.pos += 1;
        }
        self.slice(start, self.pos).map(str::to_string)
    }

    fn quoted(&mut self) -> Result<String, LifecycleError> {
        let quote = self.peek().ok_or_else(|| self.error("expected a quote"))?;
        self.pos += 1;
        let start = self.pos;
        loop {
            match self.peek() {
                Some(c) if c == quote => break,
                Some(_) => self.pos += 1,
                None => return Err(self.error("unterminated quoted string")),
            }
        }
        let text = self.slice(start, self.pos)?.to_string();
        self.pos += 1;
        Ok(text)
    }

    fn threshold(&mut self) -> Result<u32, LifecycleError> {
        self.skip_ws();
        let text = match self.peek() {
            Some(b'\'') | Some(b'"') => self.quoted()?,
            _ => {
                let start = self.pos;
                while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                    self.pos += 1;
                }
                self.slice(start, self.pos)?.to_string()
            }
        };
        text.trim()
            .parse::<u32>()
            .map_err(|_| self.error(&format!("invalid OutOf threshold '{}'", text)))
    }

    /// Returns the identity index for `MSPID.role`, adding it on first use.
    fn principal(&mut self, text: &str) -> Result<u32, LifecycleError> {
        let (msp_id, role) = text
            .rsplit_once('.')
            .ok_or_else(|| self.error(&format!("principal '{}' is not of the form MSPID.role", text)))?;
        if msp_id.is_empty() {
            return Err(self.error(&format!("principal '{}' has an empty MSP ID", text)));
        }
        let identity = PolicyIdentity::new(msp_id, role.parse::<MspRole>()?);
        let index = match self.identities.iter().position(|i| *i == identity) {
            Some(index) => index,
            None => {
                self.identities.push(identity);
                self.identities.len() - 1
            }
        };
        u32::try_from(index).map_err(|_| self.error("too many identities"))
    }
}
