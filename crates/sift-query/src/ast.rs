//! Query abstract syntax tree.
//!
//! The tree mirrors the grammar's precedence levels: an [`OrNode`] holds one or more
//! [`AndNode`]s, which hold one or more [`TermNode`]s. Single-operand nodes are kept as-is
//! so every level of the tree has the same shape.

use std::fmt;

/// A disjunction of one or more conjunctions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrNode {
    /// Operands in source order. Never empty.
    operands: Vec<AndNode>,
}

/// A conjunction of one or more terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AndNode {
    /// Operands in source order. Never empty.
    operands: Vec<TermNode>,
}

/// A single term: either a `key:value` leaf or a parenthesized group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermNode {
    /// A `key:value` filter term.
    Leaf {
        /// The key, resolved against the key table at compile time.
        key: String,
        /// The raw value text.
        value: String,
    },
    /// A parenthesized sub-expression.
    Group {
        /// The expression inside the parentheses.
        inner: OrNode,
    },
}

impl OrNode {
    /// Creates a disjunction with a single operand.
    pub fn new(first: AndNode) -> Self {
        Self {
            operands: vec![first],
        }
    }

    /// Creates a disjunction from a list of operands, or `None` if the list is empty.
    pub fn from_operands(operands: Vec<AndNode>) -> Option<Self> {
        (!operands.is_empty()).then_some(Self { operands })
    }

    /// Appends an operand.
    pub(crate) fn push(&mut self, operand: AndNode) {
        self.operands.push(operand);
    }

    /// Returns the operands in source order.
    pub fn operands(&self) -> &[AndNode] {
        &self.operands
    }

    /// Returns the deepest parenthesis nesting in the tree.
    pub fn depth(&self) -> usize {
        self.operands.iter().map(AndNode::depth).max().unwrap_or(0)
    }

    /// Returns every leaf in the tree as `(key, value)` pairs, in source order.
    pub fn leaves(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    /// Appends this node's leaves to `out`.
    fn collect_leaves<'a>(&'a self, out: &mut Vec<(&'a str, &'a str)>) {
        for and in &self.operands {
            for term in &and.operands {
                match term {
                    TermNode::Leaf { key, value } => out.push((key.as_str(), value.as_str())),
                    TermNode::Group { inner } => inner.collect_leaves(out),
                }
            }
        }
    }

    /// Formats the tree with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        writeln!(f, "{}Or", "  ".repeat(indent))?;
        for and in &self.operands {
            and.fmt_tree(f, indent + 1)?;
        }
        Ok(())
    }

    /// Formats the tree as canonical query text.
    ///
    /// The output parses back to an identical tree: groups keep their parentheses and
    /// connectives are always spelled out.
    pub fn to_query_string(&self) -> String {
        self.operands
            .iter()
            .map(AndNode::to_query_string)
            .collect::<Vec<_>>()
            .join(" OR ")
    }
}

impl AndNode {
    /// Creates a conjunction with a single operand.
    pub fn new(first: TermNode) -> Self {
        Self {
            operands: vec![first],
        }
    }

    /// Creates a conjunction from a list of operands, or `None` if the list is empty.
    pub fn from_operands(operands: Vec<TermNode>) -> Option<Self> {
        (!operands.is_empty()).then_some(Self { operands })
    }

    /// Appends an operand.
    pub(crate) fn push(&mut self, operand: TermNode) {
        self.operands.push(operand);
    }

    /// Returns the operands in source order.
    pub fn operands(&self) -> &[TermNode] {
        &self.operands
    }

    /// Returns the deepest parenthesis nesting below this node.
    fn depth(&self) -> usize {
        self.operands.iter().map(TermNode::depth).max().unwrap_or(0)
    }

    /// Formats the node with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        writeln!(f, "{}And", "  ".repeat(indent))?;
        for term in &self.operands {
            term.fmt_tree(f, indent + 1)?;
        }
        Ok(())
    }

    /// Formats the node as query text.
    fn to_query_string(&self) -> String {
        self.operands
            .iter()
            .map(TermNode::to_query_string)
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

impl TermNode {
    /// Creates a leaf term.
    pub fn leaf(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Leaf {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a group term.
    pub fn group(inner: OrNode) -> Self {
        Self::Group { inner }
    }

    /// Returns the parenthesis nesting of this term.
    fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 0,
            Self::Group { inner } => inner.depth() + 1,
        }
    }

    /// Formats the term with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Leaf { key, value } => writeln!(f, "{prefix}Leaf({key}:{value})"),
            Self::Group { inner } => {
                writeln!(f, "{prefix}Group")?;
                inner.fmt_tree(f, indent + 1)
            }
        }
    }

    /// Formats the term as query text.
    fn to_query_string(&self) -> String {
        match self {
            Self::Leaf { key, value } => format!("{key}:{value}"),
            Self::Group { inner } => format!("({})", inner.to_query_string()),
        }
    }
}

impl From<TermNode> for AndNode {
    fn from(term: TermNode) -> Self {
        Self::new(term)
    }
}

impl From<AndNode> for OrNode {
    fn from(and: AndNode) -> Self {
        Self::new(and)
    }
}

impl From<TermNode> for OrNode {
    fn from(term: TermNode) -> Self {
        Self::new(AndNode::new(term))
    }
}

impl fmt::Display for OrNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
