use crate::lexer::Token;
use crate::value::Value;

/// Expression trees. Nodes own their children; there is no sharing.
///
/// Operators and names keep the token they were parsed from so later
/// stages can report positions and printers can recover the source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal {
        value: Value,
    },
    Grouping {
        expr: Box<Expr>,
    },
    Unary {
        operator: Token,
        right: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    /// `condition ? then_branch : else_branch`
    Ternary {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Variable {
        name: Token,
    },
    Assign {
        name: Token,
        value: Box<Expr>,
    },
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        paren: Token,
        arguments: Vec<Expr>,
    },
    Get {
        object: Box<Expr>,
        name: Token,
    },
    Set {
        object: Box<Expr>,
        name: Token,
        value: Box<Expr>,
    },
    This {
        keyword: Token,
    },
    Super {
        keyword: Token,
        method: Token,
    },
}

impl Expr {
    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal {
            value: value.into(),
        }
    }

    pub fn grouping(expr: Expr) -> Self {
        Expr::Grouping {
            expr: Box::new(expr),
        }
    }

    pub fn unary(operator: Token, right: Expr) -> Self {
        Expr::Unary {
            operator,
            right: Box::new(right),
        }
    }

    pub fn binary(left: Expr, operator: Token, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    pub fn ternary(condition: Expr, then_branch: Expr, else_branch: Expr) -> Self {
        Expr::Ternary {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Literal { .. }
            | Expr::Variable { .. }
            | Expr::This { .. }
            | Expr::Super { .. } => Vec::new(),
            Expr::Grouping { expr } => vec![expr.as_ref()],
            Expr::Unary { right, .. } => vec![right.as_ref()],
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                vec![left.as_ref(), right.as_ref()]
            }
            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => vec![
                condition.as_ref(),
                then_branch.as_ref(),
                else_branch.as_ref(),
            ],
            Expr::Assign { value, .. } => vec![value.as_ref()],
            Expr::Call {
                callee, arguments, ..
            } => {
                let mut children = vec![callee.as_ref()];
                children.extend(arguments.iter());
                children
            }
            Expr::Get { object, .. } => vec![object.as_ref()],
            Expr::Set { object, value, .. } => vec![object.as_ref(), value.as_ref()],
        }
    }

    /// Nesting depth of the tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Expr::depth)
            .max()
            .unwrap_or(0)
    }
}

/// Statement shapes. The front end only builds `Expression` statements;
/// the rest are carried for tools that consume the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block {
        statements: Vec<Stmt>,
    },
    Class {
        name: Token,
        superclass: Option<Expr>,
        methods: Vec<Function>,
    },
    Expression {
        expr: Expr,
    },
    Function(Function),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    Print {
        expr: Expr,
    },
    Return {
        keyword: Token,
        value: Option<Expr>,
    },
    Var {
        name: Token,
        initializer: Option<Expr>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

impl Stmt {
    /// Expressions held directly by this statement, in source order.
    pub fn expressions(&self) -> Vec<&Expr> {
        match self {
            Stmt::Block { .. } | Stmt::Function(_) => Vec::new(),
            Stmt::Class { superclass, .. } => superclass.iter().collect(),
            Stmt::Expression { expr } | Stmt::Print { expr } => vec![expr],
            Stmt::If { condition, .. } | Stmt::While { condition, .. } => vec![condition],
            Stmt::Return { value, .. } => value.iter().collect(),
            Stmt::Var { initializer, .. } => initializer.iter().collect(),
        }
    }
}
