use std::mem;
use std::rc::Rc;
use serde::{Serialize, Serializer};
use crate::language::stack;
use crate::language::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarDecl {
    pub name: String,
    pub expr: Box<AstNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub name: String,
    pub expr: Box<AstNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<AstNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum AstNode {
    VarDecl(VarDecl),
    Assignment(Assignment),
    FunctionDecl(Rc<FunctionDecl>),
    FunctionCall {
        name: String,
        args: Vec<AstNode>,
    },
    IfStatement {
        condition: Box<AstNode>,
        then_branch: Vec<AstNode>,
        else_branch: Vec<AstNode>,
    },
    WhileStatement {
        condition: Box<AstNode>,
        body: Vec<AstNode>,
    },
    ForStatement {
        initializer: VarDecl,
        condition: Box<AstNode>,
        increment: Assignment,
        body: Vec<AstNode>,
    },
    Print {
        expr: Box<AstNode>,
    },
    Return {
        expr: Box<AstNode>,
    },
    BinaryExpression {
        operator: String,
        #[serde(serialize_with = "serialize_operand")]
        left: Box<AstNode>,
        #[serde(serialize_with = "serialize_operand")]
        right: Box<AstNode>,
    },
    Literal {
        value: Value,
    },
    Identifier {
        name: String,
    },
}

pub trait AstVisitor<T> {
    type Error;

    fn visit_var_decl(&mut self, decl: &VarDecl) -> Result<T, Self::Error>;
    fn visit_assignment(&mut self, assignment: &Assignment) -> Result<T, Self::Error>;
    fn visit_function_decl(&mut self, decl: &Rc<FunctionDecl>) -> Result<T, Self::Error>;
    fn visit_function_call(&mut self, name: &str, args: &[AstNode]) -> Result<T, Self::Error>;
    fn visit_if_statement(&mut self, condition: &AstNode, then_branch: &[AstNode], else_branch: &[AstNode]) -> Result<T, Self::Error>;
    fn visit_while_statement(&mut self, condition: &AstNode, body: &[AstNode]) -> Result<T, Self::Error>;
    fn visit_for_statement(&mut self, initializer: &VarDecl, condition: &AstNode, increment: &Assignment, body: &[AstNode]) -> Result<T, Self::Error>;
    fn visit_print(&mut self, expr: &AstNode) -> Result<T, Self::Error>;
    fn visit_return(&mut self, expr: &AstNode) -> Result<T, Self::Error>;
    fn visit_binary_expression(&mut self, operator: &str, left: &AstNode, right: &AstNode) -> Result<T, Self::Error>;
    fn visit_literal(&mut self, value: &Value) -> Result<T, Self::Error>;
    fn visit_identifier(&mut self, name: &str) -> Result<T, Self::Error>;
}

impl AstNode {
    pub fn accept<T, V: AstVisitor<T>>(&self, visitor: &mut V) -> Result<T, V::Error> {
        stack::grow(|| match self {
            AstNode::VarDecl(decl) => visitor.visit_var_decl(decl),
            AstNode::Assignment(assignment) => visitor.visit_assignment(assignment),
            AstNode::FunctionDecl(decl) => visitor.visit_function_decl(decl),
            AstNode::FunctionCall { name, args } => visitor.visit_function_call(name, args),
            AstNode::IfStatement { condition, then_branch, else_branch } =>
                visitor.visit_if_statement(condition, then_branch, else_branch),
            AstNode::WhileStatement { condition, body } => visitor.visit_while_statement(condition, body),
            AstNode::ForStatement { initializer, condition, increment, body } =>
                visitor.visit_for_statement(initializer, condition, increment, body),
            AstNode::Print { expr } => visitor.visit_print(expr),
            AstNode::Return { expr } => visitor.visit_return(expr),
            AstNode::BinaryExpression { operator, left, right } =>
                visitor.visit_binary_expression(operator, left, right),
            AstNode::Literal { value } => visitor.visit_literal(value),
            AstNode::Identifier { name } => visitor.visit_identifier(name),
        })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            AstNode::VarDecl(_) => "VarDecl",
            AstNode::Assignment(_) => "Assignment",
            AstNode::FunctionDecl(_) => "FunctionDecl",
            AstNode::FunctionCall { .. } => "FunctionCall",
            AstNode::IfStatement { .. } => "IfStatement",
            AstNode::WhileStatement { .. } => "WhileStatement",
            AstNode::ForStatement { .. } => "ForStatement",
            AstNode::Print { .. } => "Print",
            AstNode::Return { .. } => "Return",
            AstNode::BinaryExpression { .. } => "BinaryExpression",
            AstNode::Literal { .. } => "Literal",
            AstNode::Identifier { .. } => "Identifier",
        }
    }
}

/// Dismantles nested operand chains without recursing, so dropping
/// `1 + 1 + ... + 1` uses constant stack.
impl Drop for AstNode {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_operands(self, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_operands(&mut node, &mut pending);
        }
    }
}

fn detach_operands(node: &mut AstNode, pending: &mut Vec<AstNode>) {
    if let AstNode::BinaryExpression { left, right, .. } = node {
        for operand in [left, right] {
            if matches!(**operand, AstNode::BinaryExpression { .. }) {
                pending.push(mem::replace(&mut **operand, AstNode::Literal { value: Value::Null }));
            }
        }
    }
}

fn serialize_operand<S: Serializer>(operand: &Box<AstNode>, serializer: S) -> Result<S::Ok, S::Error> {
    stack::grow(|| operand.serialize(serializer))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(n: f64) -> Box<AstNode> {
        Box::new(AstNode::Literal { value: Value::Number(n) })
    }

    #[test]
    fn dump_is_tagged_by_type() {
        let node = AstNode::Print {
            expr: Box::new(AstNode::BinaryExpression {
                operator: "+".to_string(),
                left: number(1.0),
                right: number(2.0),
            }),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "Print");
        assert_eq!(json["expr"]["type"], "BinaryExpression");
        assert_eq!(json["expr"]["operator"], "+");
        assert_eq!(json["expr"]["left"]["value"], 1.0);
    }

    #[test]
    fn dump_uses_camel_case_branches() {
        let node = AstNode::IfStatement {
            condition: number(1.0),
            then_branch: vec![],
            else_branch: vec![],
        };
        let json = serde_json::to_value(&node).unwrap();
        assert!(json.get("thenBranch").is_some());
        assert!(json.get("elseBranch").is_some());
    }

    #[test]
    fn null_literal_dumps_as_null() {
        let node = AstNode::VarDecl(VarDecl {
            name: "x".to_string(),
            expr: Box::new(AstNode::Literal { value: Value::Null }),
        });
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "VarDecl");
        assert!(json["expr"]["value"].is_null());
    }

    fn chain(terms: usize) -> AstNode {
        let mut expr = AstNode::Literal { value: Value::Number(1.0) };
        for _ in 1..terms {
            expr = AstNode::BinaryExpression {
                operator: "+".to_string(),
                left: Box::new(expr),
                right: number(1.0),
            };
        }
        expr
    }

    #[test]
    fn long_operand_chain_dumps_and_drops() {
        let expr = chain(50_000);
        let json = serde_json::to_string(&expr).unwrap();
        assert!(json.starts_with("{\"type\":\"BinaryExpression\""));
        drop(expr);
    }
}
