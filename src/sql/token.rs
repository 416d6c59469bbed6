/// Tag carried by every leaf of the token tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Dml,            // SELECT, INSERT, UPDATE, DELETE
    Ddl,            // CREATE, DROP, ALTER, TRUNCATE
    Name,
    Integer,
    Float,
    String,         // text keeps its surrounding single quotes
    Wildcard,       // *
    Punctuation,    // ( ) , ; .
    Operator,
    Whitespace,
}

/// Shape of a composite node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Statement,
    Parenthesis,    // children start with "(" and end with ")"
    Function,       // name, optional whitespace, parenthesis
    Identifier,     // dotted name
    Values,         // VALUES keyword followed by its parenthesized lists
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenTree {
    Leaf { kind: TokenKind, text: String },
    Group { kind: GroupKind, children: Vec<TokenTree> },
}

impl TokenTree {
    pub fn leaf(kind: TokenKind, text: &str) -> Self {
        TokenTree::Leaf {
            kind,
            text: text.to_string(),
        }
    }

    pub fn group(kind: GroupKind, children: Vec<TokenTree>) -> Self {
        TokenTree::Group { kind, children }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, TokenTree::Leaf { kind: TokenKind::Whitespace, .. })
    }

    pub fn is_leaf(&self, expected: TokenKind) -> bool {
        matches!(self, TokenTree::Leaf { kind, .. } if *kind == expected)
    }

    pub fn is_group(&self, expected: GroupKind) -> bool {
        matches!(self, TokenTree::Group { kind, .. } if *kind == expected)
    }

    /// Case-insensitive match on a keyword-like leaf (keyword, DML or DDL).
    pub fn is_keyword(&self, word: &str) -> bool {
        match self {
            TokenTree::Leaf { kind: TokenKind::Keyword | TokenKind::Dml | TokenKind::Ddl, text } => {
                text.eq_ignore_ascii_case(word)
            }
            _ => false,
        }
    }

    pub fn is_punctuation(&self, symbol: &str) -> bool {
        matches!(self, TokenTree::Leaf { kind: TokenKind::Punctuation, text } if text == symbol)
    }

    pub fn children(&self) -> &[TokenTree] {
        match self {
            TokenTree::Leaf { .. } => &[],
            TokenTree::Group { children, .. } => children,
        }
    }

    /// Children of a group with every whitespace leaf filtered out.
    pub fn significant_children(&self) -> Vec<&TokenTree> {
        self.children().iter().filter(|c| !c.is_whitespace()).collect()
    }

    /// Source text of the node, groups concatenating their children.
    pub fn text(&self) -> String {
        match self {
            TokenTree::Leaf { text, .. } => text.clone(),
            TokenTree::Group { children, .. } => children.iter().map(TokenTree::text).collect(),
        }
    }
}
