//! Expression tree
//!
//! An [`Expression`] is a constant, a column reference, or an interval
//! operation over two operand expressions. The tree is built bottom-up, mapped
//! to row slots with [`Expression::map_columns`], folded once with
//! [`Expression::optimize`], and then evaluated any number of times.

use std::fmt;
use tempora_types::{TypeInfo, Value};

use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::interval_operation::IntervalOperation;

/// Resolves column names of one table source to row slots
pub trait ColumnResolver {
    /// Alias of the table source this resolver stands for
    fn table_alias(&self) -> &str;

    /// Slot of the named column in the rows of this source
    fn find_column(&self, name: &str) -> Option<usize>;
}

/// Properties an expression can be checked for with [`Expression::is_everything`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionVisitor {
    /// All column references can be evaluated at this point
    Evaluatable,
    /// Evaluation always yields the same result for the same row
    Deterministic,
    /// Evaluation does not read the current row
    Independent,
}

/// Reference to a column of a table source
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    table: Option<String>,
    name: String,
    type_info: TypeInfo,
    slot: Option<usize>,
    evaluatable: bool,
}

impl ColumnRef {
    /// Create an unmapped column reference with its declared type
    pub fn new(table: Option<&str>, name: impl Into<String>, type_info: TypeInfo) -> Self {
        Self {
            table: table.map(str::to_string),
            name: name.into(),
            type_info,
            slot: None,
            evaluatable: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Row slot, once mapped
    pub fn slot(&self) -> Option<usize> {
        self.slot
    }

    fn matches(&self, table_alias: &str) -> bool {
        self.table.as_deref().is_none_or(|t| t == table_alias)
    }

    fn sql(&self) -> String {
        match &self.table {
            Some(table) => format!("{table}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Node of an expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal or folded value
    Constant(Value),
    /// Column of the current row
    Column(ColumnRef),
    /// Interval arithmetic over two operands
    Interval(Box<IntervalOperation>),
}

impl Expression {
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant(value.into())
    }

    pub fn column(column: ColumnRef) -> Self {
        Self::Column(column)
    }

    pub fn interval(operation: IntervalOperation) -> Self {
        Self::Interval(Box::new(operation))
    }

    /// Static result type
    pub fn type_info(&self) -> TypeInfo {
        match self {
            Self::Constant(value) => value.type_info(),
            Self::Column(column) => column.type_info,
            Self::Interval(op) => op.type_info(),
        }
    }

    /// Evaluate against the current row of `ctx`
    pub fn evaluate(&self, ctx: &EvaluationContext) -> EvalResult<Value> {
        match self {
            Self::Constant(value) => Ok(value.clone()),
            Self::Column(column) => {
                let slot = column
                    .slot
                    .ok_or_else(|| EvalError::unmapped_column(column.sql()))?;
                ctx.column_value(slot).cloned()
            }
            Self::Interval(op) => op.evaluate(ctx),
        }
    }

    /// Bind column references that belong to `resolver`'s table source
    pub fn map_columns(&mut self, resolver: &dyn ColumnResolver) {
        match self {
            Self::Constant(_) => {}
            Self::Column(column) => {
                if column.matches(resolver.table_alias()) {
                    if let Some(slot) = resolver.find_column(&column.name) {
                        column.slot = Some(slot);
                    }
                }
            }
            Self::Interval(op) => op.map_columns(resolver),
        }
    }

    /// Mark column references of `table_alias` as evaluatable or not
    pub fn set_evaluatable(&mut self, table_alias: &str, evaluatable: bool) {
        match self {
            Self::Constant(_) => {}
            Self::Column(column) => {
                if column.matches(table_alias) {
                    column.evaluatable = evaluatable;
                }
            }
            Self::Interval(op) => op.set_evaluatable(table_alias, evaluatable),
        }
    }

    /// Fold constant sub-trees, returning the rebuilt expression
    pub fn optimize(self, ctx: &EvaluationContext) -> EvalResult<Expression> {
        match self {
            Self::Interval(op) => op.optimize(ctx),
            other => Ok(other),
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    /// Check if the whole tree has the given property
    pub fn is_everything(&self, visitor: ExpressionVisitor) -> bool {
        match self {
            Self::Constant(_) => true,
            Self::Column(column) => match visitor {
                ExpressionVisitor::Evaluatable => column.evaluatable,
                ExpressionVisitor::Deterministic => true,
                ExpressionVisitor::Independent => false,
            },
            Self::Interval(op) => op.is_everything(visitor),
        }
    }

    /// Estimated cost of one evaluation
    pub fn cost(&self) -> u32 {
        match self {
            Self::Constant(_) => 0,
            Self::Column(_) => 2,
            Self::Interval(op) => op.cost(),
        }
    }

    pub fn subexpression_count(&self) -> usize {
        match self {
            Self::Interval(_) => 2,
            _ => 0,
        }
    }

    /// Operand at `index`
    pub fn subexpression(&self, index: usize) -> EvalResult<&Expression> {
        match self {
            Self::Interval(op) => op.subexpression(index),
            _ => Err(EvalError::index_out_of_bounds(index)),
        }
    }

    /// SQL text of this expression
    pub fn sql(&self) -> String {
        match self {
            Self::Constant(value) => value.to_string(),
            Self::Column(column) => column.sql(),
            Self::Interval(op) => op.sql(),
        }
    }
}

impl From<Value> for Expression {
    fn from(value: Value) -> Self {
        Self::Constant(value)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempora_types::ValueType;

    struct Orders;

    impl ColumnResolver for Orders {
        fn table_alias(&self) -> &str {
            "O"
        }

        fn find_column(&self, name: &str) -> Option<usize> {
            match name {
                "SHIPPED" => Some(0),
                "ORDERED" => Some(1),
                _ => None,
            }
        }
    }

    fn column(table: Option<&str>, name: &str) -> Expression {
        Expression::column(ColumnRef::new(table, name, TypeInfo::of(ValueType::Timestamp)))
    }

    #[test]
    fn test_column_mapping() {
        let ctx = EvaluationContext::builder()
            .row(vec![Value::Integer(7), Value::Integer(8)])
            .build();

        let mut expr = column(Some("O"), "ORDERED");
        assert!(matches!(expr.evaluate(&ctx), Err(EvalError::UnmappedColumn { .. })));
        expr.map_columns(&Orders);
        assert_eq!(expr.evaluate(&ctx).unwrap(), Value::Integer(8));

        let mut other_table = column(Some("X"), "ORDERED");
        other_table.map_columns(&Orders);
        assert!(other_table.evaluate(&ctx).is_err());

        let mut unqualified = column(None, "SHIPPED");
        unqualified.map_columns(&Orders);
        assert_eq!(unqualified.evaluate(&ctx).unwrap(), Value::Integer(7));
    }

    #[test]
    fn test_visitors() {
        let mut expr = column(Some("O"), "SHIPPED");
        assert!(!expr.is_everything(ExpressionVisitor::Evaluatable));
        expr.set_evaluatable("O", true);
        assert!(expr.is_everything(ExpressionVisitor::Evaluatable));
        assert!(expr.is_everything(ExpressionVisitor::Deterministic));
        assert!(!expr.is_everything(ExpressionVisitor::Independent));

        let constant = Expression::constant(Value::Null);
        assert!(constant.is_everything(ExpressionVisitor::Independent));
    }

    #[test]
    fn test_leaf_shape() {
        let expr = column(None, "SHIPPED");
        assert_eq!(expr.cost(), 2);
        assert_eq!(expr.subexpression_count(), 0);
        assert!(matches!(
            expr.subexpression(0),
            Err(EvalError::IndexOutOfBounds { index: 0 })
        ));
        assert_eq!(Expression::constant(Value::Integer(1)).cost(), 0);
        assert_eq!(column(Some("O"), "SHIPPED").sql(), "O.SHIPPED");
    }
}
