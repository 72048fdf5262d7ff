use crate::core::utils::elements;
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Empty SMARTS pattern")]
    Empty,

    #[error("Unexpected character '{found}' at position {position} in SMARTS '{smarts}'")]
    UnexpectedCharacter {
        smarts: String,
        position: usize,
        found: char,
    },

    #[error("Unexpected end of SMARTS '{smarts}'")]
    UnexpectedEnd { smarts: String },

    #[error("Unknown element '{symbol}' at position {position} in SMARTS '{smarts}'")]
    UnknownElement {
        smarts: String,
        position: usize,
        symbol: String,
    },

    #[error("Unclosed ring bond {label} in SMARTS '{smarts}'")]
    UnclosedRing { smarts: String, label: u16 },

    #[error("Unbalanced branch at position {position} in SMARTS '{smarts}'")]
    UnbalancedBranch { smarts: String, position: usize },
}

/// A primitive atom test.
#[derive(Debug, Clone, PartialEq)]
pub enum AtomPrimitive {
    /// `#n` or an element symbol.
    AtomicNum(u8),
    /// `a`
    Aromatic,
    /// `A`
    Aliphatic,
    /// `Dn`: number of explicit neighbors.
    Degree(u8),
    /// `Hn`: attached hydrogens, explicit and implicit.
    HCount(u8),
    /// `hn`: implicit hydrogens only.
    ImplicitHCount(u8),
    /// `Xn`: explicit neighbors plus implicit hydrogens.
    Connectivity(u8),
    /// `vn`: bond order sum plus implicit hydrogens.
    Valence(u8),
    /// `+n`, `-n`, `+0`
    Charge(i8),
    /// `R`
    RingMember,
    /// `*`
    Wildcard,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AtomExpr {
    Prim(AtomPrimitive),
    And(Vec<AtomExpr>),
    Or(Vec<AtomExpr>),
    Not(Box<AtomExpr>),
    /// `$(...)`: the atom must be the first atom of a match of the inner pattern.
    Recursive(Box<SmartsPattern>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BondExpr {
    Single,
    Double,
    Triple,
    Aromatic,
    Ring,
    Any,
    /// No bond symbol written: single or aromatic.
    Implicit,
    Not(Box<BondExpr>),
    And(Vec<BondExpr>),
    Or(Vec<BondExpr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmartsBond {
    pub atom1: usize,
    pub atom2: usize,
    pub expr: BondExpr,
}

/// A parsed SMARTS query graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SmartsPattern {
    atoms: Vec<AtomExpr>,
    bonds: Vec<SmartsBond>,
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl SmartsPattern {
    fn new(atoms: Vec<AtomExpr>, bonds: Vec<SmartsBond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bond_idx, bond) in bonds.iter().enumerate() {
            adjacency[bond.atom1].push((bond.atom2, bond_idx));
            adjacency[bond.atom2].push((bond.atom1, bond_idx));
        }
        Self {
            atoms,
            bonds,
            adjacency,
        }
    }

    pub fn atoms(&self) -> &[AtomExpr] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[SmartsBond] {
        &self.bonds
    }

    pub fn neighbors(&self, atom: usize) -> &[(usize, usize)] {
        self.adjacency.get(atom).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

impl FromStr for SmartsPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_smarts(s)
    }
}

pub fn parse_smarts(smarts: &str) -> Result<SmartsPattern, PatternError> {
    let smarts = smarts.trim();
    if smarts.is_empty() {
        return Err(PatternError::Empty);
    }
    SmartsParser::new(smarts).parse()
}

struct SmartsParser<'a> {
    source: &'a str,
    input: &'a [u8],
    pos: usize,
    atoms: Vec<AtomExpr>,
    bonds: Vec<SmartsBond>,
    branches: Vec<usize>,
    prev_atom: Option<usize>,
    pending_bond: Option<BondExpr>,
    ring_closures: BTreeMap<u16, (usize, Option<BondExpr>)>,
}

impl<'a> SmartsParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            input: source.as_bytes(),
            pos: 0,
            atoms: Vec::new(),
            bonds: Vec::new(),
            branches: Vec::new(),
            prev_atom: None,
            pending_bond: None,
            ring_closures: BTreeMap::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn unexpected(&self) -> PatternError {
        match self.peek() {
            Some(ch) => PatternError::UnexpectedCharacter {
                smarts: self.source.to_string(),
                position: self.pos,
                found: ch as char,
            },
            None => PatternError::UnexpectedEnd {
                smarts: self.source.to_string(),
            },
        }
    }

    fn unexpected_at(&self, position: usize) -> PatternError {
        match self.input.get(position) {
            Some(&ch) => PatternError::UnexpectedCharacter {
                smarts: self.source.to_string(),
                position,
                found: ch as char,
            },
            None => PatternError::UnexpectedEnd {
                smarts: self.source.to_string(),
            },
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), PatternError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn parse(mut self) -> Result<SmartsPattern, PatternError> {
        while let Some(ch) = self.peek() {
            match ch {
                b'(' => {
                    let prev = self.prev_atom.ok_or_else(|| self.unexpected())?;
                    self.advance();
                    self.branches.push(prev);
                }
                b')' => {
                    if self.pending_bond.is_some() {
                        return Err(self.unexpected());
                    }
                    let open = self.branches.pop().ok_or(PatternError::UnbalancedBranch {
                        smarts: self.source.to_string(),
                        position: self.pos,
                    })?;
                    self.advance();
                    self.prev_atom = Some(open);
                }
                b'.' => {
                    if self.pending_bond.is_some() {
                        return Err(self.unexpected());
                    }
                    self.advance();
                    self.prev_atom = None;
                }
                b'[' => {
                    self.advance();
                    let expr = self.parse_low_and(true)?;
                    self.expect(b']')?;
                    self.push_atom(expr);
                }
                b'%' => {
                    self.advance();
                    let tens = self.advance().filter(u8::is_ascii_digit);
                    let ones = self.advance().filter(u8::is_ascii_digit);
                    match (tens, ones) {
                        (Some(t), Some(o)) => {
                            self.close_ring(u16::from(t - b'0') * 10 + u16::from(o - b'0'))?
                        }
                        _ => return Err(self.unexpected()),
                    }
                }
                b'0'..=b'9' => {
                    self.advance();
                    self.close_ring(u16::from(ch - b'0'))?;
                }
                b'*' => {
                    self.advance();
                    self.push_atom(AtomExpr::Prim(AtomPrimitive::Wildcard));
                }
                ch if is_bond_start(ch) => {
                    if self.prev_atom.is_none() || self.pending_bond.is_some() {
                        return Err(self.unexpected());
                    }
                    let bond = self.parse_bond_low_and()?;
                    self.pending_bond = Some(bond);
                }
                ch if ch.is_ascii_alphabetic() => {
                    let expr = self.parse_organic_atom()?;
                    self.push_atom(expr);
                }
                _ => return Err(self.unexpected()),
            }
        }

        if !self.branches.is_empty() {
            return Err(PatternError::UnbalancedBranch {
                smarts: self.source.to_string(),
                position: self.pos,
            });
        }
        if let Some(&label) = self.ring_closures.keys().next() {
            return Err(PatternError::UnclosedRing {
                smarts: self.source.to_string(),
                label,
            });
        }
        if self.pending_bond.is_some() || self.atoms.is_empty() {
            return Err(self.unexpected());
        }

        Ok(SmartsPattern::new(self.atoms, self.bonds))
    }

    fn push_atom(&mut self, expr: AtomExpr) {
        let idx = self.atoms.len();
        self.atoms.push(expr);
        if let Some(prev) = self.prev_atom {
            let expr = self.pending_bond.take().unwrap_or(BondExpr::Implicit);
            self.bonds.push(SmartsBond {
                atom1: prev,
                atom2: idx,
                expr,
            });
        }
        self.pending_bond = None;
        self.prev_atom = Some(idx);
    }

    fn close_ring(&mut self, label: u16) -> Result<(), PatternError> {
        let current = match self.prev_atom {
            Some(atom) => atom,
            None => {
                self.pos -= 1;
                return Err(self.unexpected());
            }
        };
        let bond = self.pending_bond.take();
        match self.ring_closures.remove(&label) {
            Some((open_atom, open_bond)) => {
                let expr = bond.or(open_bond).unwrap_or(BondExpr::Implicit);
                self.bonds.push(SmartsBond {
                    atom1: open_atom,
                    atom2: current,
                    expr,
                });
            }
            None => {
                self.ring_closures.insert(label, (current, bond));
            }
        }
        Ok(())
    }

    // Organic subset outside brackets: B, C, N, O, P, S, F, Cl, Br, I, their
    // aromatic forms, and the `a` / `A` primitives.
    fn parse_organic_atom(&mut self) -> Result<AtomExpr, PatternError> {
        let start = self.pos;
        let ch = self.advance().ok_or_else(|| self.unexpected())?;
        let (symbol, aromatic) = match ch {
            b'a' => return Ok(AtomExpr::Prim(AtomPrimitive::Aromatic)),
            b'A' => return Ok(AtomExpr::Prim(AtomPrimitive::Aliphatic)),
            b'C' if self.peek() == Some(b'l') => {
                self.advance();
                ("Cl", false)
            }
            b'B' if self.peek() == Some(b'r') => {
                self.advance();
                ("Br", false)
            }
            b'B' => ("B", false),
            b'C' => ("C", false),
            b'N' => ("N", false),
            b'O' => ("O", false),
            b'P' => ("P", false),
            b'S' => ("S", false),
            b'F' => ("F", false),
            b'I' => ("I", false),
            b'b' => ("B", true),
            b'c' => ("C", true),
            b'n' => ("N", true),
            b'o' => ("O", true),
            b'p' => ("P", true),
            b's' => ("S", true),
            _ => {
                self.pos = start;
                return Err(self.unexpected());
            }
        };
        self.element_expr(symbol, aromatic, start)
    }

    fn element_expr(&self, symbol: &str, aromatic: bool, position: usize) -> Result<AtomExpr, PatternError> {
        let atomic_number =
            elements::atomic_number(symbol).ok_or_else(|| PatternError::UnknownElement {
                smarts: self.source.to_string(),
                position,
                symbol: symbol.to_string(),
            })?;
        let flag = if aromatic {
            AtomPrimitive::Aromatic
        } else {
            AtomPrimitive::Aliphatic
        };
        Ok(AtomExpr::And(vec![
            AtomExpr::Prim(AtomPrimitive::AtomicNum(atomic_number)),
            AtomExpr::Prim(flag),
        ]))
    }

    // Bracket atom grammar, lowest to highest precedence:
    //   low_and  = or (';' or)*
    //   or       = high_and (',' high_and)*
    //   high_and = not (('&' | juxtaposition) not)*
    //   not      = '!'* primitive

    fn parse_low_and(&mut self, bracket_start: bool) -> Result<AtomExpr, PatternError> {
        let mut terms = vec![self.parse_or(bracket_start)?];
        while self.peek() == Some(b';') {
            self.advance();
            terms.push(self.parse_or(false)?);
        }
        Ok(collapse(terms, AtomExpr::And))
    }

    fn parse_or(&mut self, bracket_start: bool) -> Result<AtomExpr, PatternError> {
        let mut terms = vec![self.parse_high_and(bracket_start)?];
        while self.peek() == Some(b',') {
            self.advance();
            terms.push(self.parse_high_and(false)?);
        }
        Ok(collapse(terms, AtomExpr::Or))
    }

    fn parse_high_and(&mut self, bracket_start: bool) -> Result<AtomExpr, PatternError> {
        let mut terms = vec![self.parse_not(bracket_start)?];
        loop {
            match self.peek() {
                Some(b'&') => {
                    self.advance();
                    terms.push(self.parse_not(false)?);
                }
                Some(b']' | b',' | b';') | None => break,
                Some(_) => terms.push(self.parse_not(false)?),
            }
        }
        Ok(collapse(terms, AtomExpr::And))
    }

    fn parse_not(&mut self, bracket_start: bool) -> Result<AtomExpr, PatternError> {
        if self.peek() == Some(b'!') {
            self.advance();
            let inner = self.parse_not(false)?;
            return Ok(AtomExpr::Not(Box::new(inner)));
        }
        self.parse_primitive(bracket_start)
    }

    fn parse_primitive(&mut self, bracket_start: bool) -> Result<AtomExpr, PatternError> {
        let start = self.pos;
        let ch = self.peek().ok_or_else(|| self.unexpected())?;
        let next = self.peek_at(1);

        let prim = match ch {
            b'$' => return self.parse_recursive(),
            b'#' => {
                self.advance();
                let n = self.parse_number()?.ok_or_else(|| self.unexpected())?;
                AtomPrimitive::AtomicNum(n)
            }
            b'*' => {
                self.advance();
                AtomPrimitive::Wildcard
            }
            b'+' | b'-' => {
                self.advance();
                let sign: i8 = if ch == b'+' { 1 } else { -1 };
                let digits_start = self.pos;
                let magnitude = match self.parse_number()? {
                    Some(n) => i8::try_from(n).map_err(|_| self.unexpected_at(digits_start))?,
                    None => {
                        let mut count: i8 = 1;
                        while self.peek() == Some(ch) {
                            count = count.checked_add(1).ok_or_else(|| self.unexpected())?;
                            self.advance();
                        }
                        count
                    }
                };
                AtomPrimitive::Charge(sign * magnitude)
            }
            b'a' if next != Some(b's') => {
                self.advance();
                AtomPrimitive::Aromatic
            }
            b'h' => {
                self.advance();
                AtomPrimitive::ImplicitHCount(self.parse_number()?.unwrap_or(1))
            }
            b'v' => {
                self.advance();
                AtomPrimitive::Valence(self.parse_number()?.unwrap_or(1))
            }
            b'D' => {
                self.advance();
                AtomPrimitive::Degree(self.parse_number()?.unwrap_or(1))
            }
            b'A' | b'X' | b'R' | b'H' if !self.two_letter_element_ahead() => {
                self.advance();
                match ch {
                    b'A' => AtomPrimitive::Aliphatic,
                    b'X' => AtomPrimitive::Connectivity(self.parse_number()?.unwrap_or(1)),
                    b'R' => match self.parse_number()? {
                        Some(0) => {
                            return Ok(AtomExpr::Not(Box::new(AtomExpr::Prim(
                                AtomPrimitive::RingMember,
                            ))));
                        }
                        _ => AtomPrimitive::RingMember,
                    },
                    // A leading H is the hydrogen atom itself, e.g. `[H]` or `[H+]`.
                    _ if bracket_start && !next.is_some_and(|c| c.is_ascii_digit()) => {
                        AtomPrimitive::AtomicNum(1)
                    }
                    _ => AtomPrimitive::HCount(self.parse_number()?.unwrap_or(1)),
                }
            }
            ch if ch.is_ascii_uppercase() => {
                let (symbol, len) = if self.two_letter_element_ahead() {
                    let pair = [ch, next.unwrap_or_default()];
                    (String::from_utf8_lossy(&pair).into_owned(), 2)
                } else {
                    ((ch as char).to_string(), 1)
                };
                self.pos += len;
                return self.element_expr(&symbol, false, start);
            }
            b'c' | b'n' | b'o' | b'p' | b's' | b'b' | b'a' => {
                let two = match (ch, next) {
                    (b's', Some(b'e')) => Some("Se"),
                    (b'a', Some(b's')) => Some("As"),
                    _ => None,
                };
                let symbol = match two {
                    Some(symbol) => {
                        self.pos += 2;
                        symbol.to_string()
                    }
                    None => {
                        self.pos += 1;
                        (ch.to_ascii_uppercase() as char).to_string()
                    }
                };
                return self.element_expr(&symbol, true, start);
            }
            _ => return Err(self.unexpected()),
        };

        Ok(AtomExpr::Prim(prim))
    }

    fn two_letter_element_ahead(&self) -> bool {
        match (self.peek(), self.peek_at(1)) {
            (Some(first), Some(second)) if first.is_ascii_uppercase() && second.is_ascii_lowercase() => {
                let pair = [first, second];
                std::str::from_utf8(&pair)
                    .ok()
                    .and_then(elements::atomic_number)
                    .is_some()
            }
            _ => false,
        }
    }

    fn parse_recursive(&mut self) -> Result<AtomExpr, PatternError> {
        self.advance();
        self.expect(b'(')?;
        let start = self.pos;
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance() {
                Some(b'(') => depth += 1,
                Some(b')') => depth -= 1,
                Some(_) => {}
                None => {
                    return Err(PatternError::UnbalancedBranch {
                        smarts: self.source.to_string(),
                        position: start - 1,
                    });
                }
            }
        }
        let inner = &self.source[start..self.pos - 1];
        let pattern = parse_smarts(inner)?;
        Ok(AtomExpr::Recursive(Box::new(pattern)))
    }

    /// Reads an optional run of digits. Values that do not fit in a `u8` are
    /// rejected at the first digit.
    fn parse_number(&mut self) -> Result<Option<u8>, PatternError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Ok(None);
        }
        std::str::from_utf8(&self.input[start..self.pos])
            .ok()
            .and_then(|digits| digits.parse().ok())
            .map(Some)
            .ok_or_else(|| self.unexpected_at(start))
    }

    fn parse_bond_low_and(&mut self) -> Result<BondExpr, PatternError> {
        let mut terms = vec![self.parse_bond_or()?];
        while self.peek() == Some(b';') {
            self.advance();
            terms.push(self.parse_bond_or()?);
        }
        Ok(collapse(terms, BondExpr::And))
    }

    fn parse_bond_or(&mut self) -> Result<BondExpr, PatternError> {
        let mut terms = vec![self.parse_bond_high_and()?];
        while self.peek() == Some(b',') {
            self.advance();
            terms.push(self.parse_bond_high_and()?);
        }
        Ok(collapse(terms, BondExpr::Or))
    }

    fn parse_bond_high_and(&mut self) -> Result<BondExpr, PatternError> {
        let mut terms = vec![self.parse_bond_not()?];
        loop {
            match self.peek() {
                Some(b'&') => {
                    self.advance();
                    terms.push(self.parse_bond_not()?);
                }
                Some(ch) if is_bond_start(ch) => terms.push(self.parse_bond_not()?),
                _ => break,
            }
        }
        Ok(collapse(terms, BondExpr::And))
    }

    fn parse_bond_not(&mut self) -> Result<BondExpr, PatternError> {
        let expr = match self.peek() {
            Some(b'!') => {
                self.advance();
                return Ok(BondExpr::Not(Box::new(self.parse_bond_not()?)));
            }
            Some(b'-' | b'/' | b'\\') => BondExpr::Single,
            Some(b'=') => BondExpr::Double,
            Some(b'#') => BondExpr::Triple,
            Some(b':') => BondExpr::Aromatic,
            Some(b'~') => BondExpr::Any,
            Some(b'@') => BondExpr::Ring,
            _ => return Err(self.unexpected()),
        };
        self.advance();
        Ok(expr)
    }
}

fn is_bond_start(ch: u8) -> bool {
    matches!(ch, b'-' | b'=' | b'#' | b':' | b'~' | b'@' | b'!' | b'/' | b'\\')
}

fn collapse<T>(mut terms: Vec<T>, combine: fn(Vec<T>) -> T) -> T {
    match terms.len() {
        1 => terms.remove(0),
        _ => combine(terms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(n: u8, aromatic: bool) -> AtomExpr {
        let flag = if aromatic {
            AtomPrimitive::Aromatic
        } else {
            AtomPrimitive::Aliphatic
        };
        AtomExpr::And(vec![
            AtomExpr::Prim(AtomPrimitive::AtomicNum(n)),
            AtomExpr::Prim(flag),
        ])
    }

    #[test]
    fn parses_chain_with_implicit_and_explicit_bonds() {
        let pattern = parse_smarts("CC=O").unwrap();
        assert_eq!(pattern.len(), 3);
        assert_eq!(pattern.bonds()[0].expr, BondExpr::Implicit);
        assert_eq!(pattern.bonds()[1].expr, BondExpr::Double);
        assert_eq!(pattern.atoms()[2], element(8, false));
    }

    #[test]
    fn parses_two_letter_organic_atoms() {
        let pattern = parse_smarts("ClCBr").unwrap();
        assert_eq!(pattern.atoms()[0], element(17, false));
        assert_eq!(pattern.atoms()[2], element(35, false));
    }

    #[test]
    fn parses_aromatic_ring_closure() {
        let pattern = parse_smarts("a1:a:a:a:a:a:1").unwrap();
        assert_eq!(pattern.len(), 6);
        assert_eq!(pattern.bonds().len(), 6);
        let closure = &pattern.bonds()[5];
        assert_eq!((closure.atom1, closure.atom2), (0, 5));
        assert_eq!(closure.expr, BondExpr::Aromatic);
        assert!(
            pattern
                .atoms()
                .iter()
                .all(|a| *a == AtomExpr::Prim(AtomPrimitive::Aromatic))
        );
    }

    #[test]
    fn branches_attach_to_the_atom_before_the_parenthesis() {
        let pattern = parse_smarts("O(~a)~a").unwrap();
        let ends: Vec<(usize, usize)> = pattern.bonds().iter().map(|b| (b.atom1, b.atom2)).collect();
        assert_eq!(ends, [(0, 1), (0, 2)]);
        assert!(pattern.bonds().iter().all(|b| b.expr == BondExpr::Any));
    }

    #[test]
    fn bracket_precedence_puts_semicolon_lowest() {
        let pattern = parse_smarts("[+,+2,+3;!a]").unwrap();
        let expected = AtomExpr::And(vec![
            AtomExpr::Or(vec![
                AtomExpr::Prim(AtomPrimitive::Charge(1)),
                AtomExpr::Prim(AtomPrimitive::Charge(2)),
                AtomExpr::Prim(AtomPrimitive::Charge(3)),
            ]),
            AtomExpr::Not(Box::new(AtomExpr::Prim(AtomPrimitive::Aromatic))),
        ]);
        assert_eq!(pattern.atoms()[0], expected);
    }

    #[test]
    fn bracket_distinguishes_elements_from_primitives() {
        let pattern = parse_smarts("[#6X4H0]").unwrap();
        assert_eq!(
            pattern.atoms()[0],
            AtomExpr::And(vec![
                AtomExpr::Prim(AtomPrimitive::AtomicNum(6)),
                AtomExpr::Prim(AtomPrimitive::Connectivity(4)),
                AtomExpr::Prim(AtomPrimitive::HCount(0)),
            ])
        );

        let metals = parse_smarts("[Ca,Na,Se,At]").unwrap();
        let AtomExpr::Or(terms) = &metals.atoms()[0] else {
            panic!("expected alternatives");
        };
        assert_eq!(terms[0], element(20, false));
        assert_eq!(terms[1], element(11, false));
        assert_eq!(terms[2], element(34, false));
        assert_eq!(terms[3], element(85, false));
    }

    #[test]
    fn leading_h_in_bracket_is_hydrogen() {
        let pattern = parse_smarts("[H]").unwrap();
        assert_eq!(pattern.atoms()[0], AtomExpr::Prim(AtomPrimitive::AtomicNum(1)));
        let counted = parse_smarts("[NH3]").unwrap();
        assert_eq!(
            counted.atoms()[0],
            AtomExpr::And(vec![element(7, false), AtomExpr::Prim(AtomPrimitive::HCount(3))])
        );
    }

    #[test]
    fn charges_parse_with_and_without_magnitude() {
        let pattern = parse_smarts("[-2].[+0].[--].[!+]").unwrap();
        assert_eq!(pattern.atoms()[0], AtomExpr::Prim(AtomPrimitive::Charge(-2)));
        assert_eq!(pattern.atoms()[1], AtomExpr::Prim(AtomPrimitive::Charge(0)));
        assert_eq!(pattern.atoms()[2], AtomExpr::Prim(AtomPrimitive::Charge(-2)));
        assert_eq!(
            pattern.atoms()[3],
            AtomExpr::Not(Box::new(AtomExpr::Prim(AtomPrimitive::Charge(1))))
        );
        assert!(pattern.bonds().is_empty());
    }

    #[test]
    fn recursive_smarts_is_parsed_as_nested_pattern() {
        let pattern = parse_smarts("[O&!$([OX2](C)C=O)]").unwrap();
        let AtomExpr::And(terms) = &pattern.atoms()[0] else {
            panic!("expected conjunction");
        };
        let AtomExpr::Not(inner) = &terms[1] else {
            panic!("expected negation");
        };
        let AtomExpr::Recursive(nested) = inner.as_ref() else {
            panic!("expected recursive pattern");
        };
        assert_eq!(nested.len(), 4);
    }

    #[test]
    fn malformed_patterns_report_errors() {
        assert_eq!(parse_smarts(""), Err(PatternError::Empty));
        assert!(matches!(
            parse_smarts("c1ccccc"),
            Err(PatternError::UnclosedRing { label: 1, .. })
        ));
        assert!(matches!(
            parse_smarts("C(C"),
            Err(PatternError::UnbalancedBranch { .. })
        ));
        assert!(matches!(
            parse_smarts("C)C"),
            Err(PatternError::UnbalancedBranch { .. })
        ));
        assert!(matches!(
            parse_smarts("[C"),
            Err(PatternError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            parse_smarts("C-"),
            Err(PatternError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            parse_smarts("[Qq]"),
            Err(PatternError::UnknownElement { .. }) | Err(PatternError::UnexpectedCharacter { .. })
        ));
        assert!(matches!(
            parse_smarts("C?"),
            Err(PatternError::UnexpectedCharacter { found: '?', position: 1, .. })
        ));
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        assert!(matches!(
            parse_smarts("[+300]"),
            Err(PatternError::UnexpectedCharacter { position: 2, found: '3', .. })
        ));
        assert!(matches!(
            parse_smarts("[+200]"),
            Err(PatternError::UnexpectedCharacter { position: 2, found: '2', .. })
        ));
        assert!(matches!(
            parse_smarts("[D300]"),
            Err(PatternError::UnexpectedCharacter { position: 2, .. })
        ));
        assert!(matches!(
            parse_smarts("[#999]"),
            Err(PatternError::UnexpectedCharacter { position: 2, .. })
        ));
        assert_eq!(
            parse_smarts("[+127]").unwrap().atoms()[0],
            AtomExpr::Prim(AtomPrimitive::Charge(127))
        );
    }

    #[test]
    fn long_runs_of_charge_signs_are_rejected() {
        let widest = format!("[{}]", "+".repeat(127));
        assert_eq!(
            parse_smarts(&widest).unwrap().atoms()[0],
            AtomExpr::Prim(AtomPrimitive::Charge(127))
        );
        let overflowing = format!("[{}]", "+".repeat(130));
        assert!(matches!(
            parse_smarts(&overflowing),
            Err(PatternError::UnexpectedCharacter { position: 128, found: '+', .. })
        ));
    }
}
