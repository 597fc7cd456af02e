use crate::catalog_connection::{CatalogValue, SqlStatement};
use itertools::Itertools;

/// Builds Oracle `select` statements.
///
/// Clauses are always rendered in the order `select`, `from`, `join`, `where`,
/// `group by`, `order by`, no matter in which order they were added. This allows
/// filters to be added to an already complete query.
#[derive(Debug, Clone, Default)]
pub struct SelectQueryBuilder {
    columns: Vec<SelectItem>,
    from: String,
    joins: Vec<Join>,
    conditions: Vec<Condition>,
    group_by: Vec<String>,
    order_by: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum SelectItem {
    Expression {
        expression: String,
        alias: Option<String>,
    },
    Case {
        condition: Condition,
        then: String,
        otherwise: String,
        alias: String,
    },
    Subquery {
        query: Box<SelectQueryBuilder>,
        alias: String,
    },
}

#[derive(Debug, Clone)]
pub struct Join {
    table: String,
    on: Vec<Condition>,
}

#[derive(Debug, Clone)]
pub enum Condition {
    /// `column = :n`
    Bind { column: String, value: CatalogValue },
    /// `column = other`, used for correlations between aliases.
    Columns { column: String, other: String },
    /// `column = 'text'`
    Literal { column: String, value: String },
}

impl Condition {
    pub fn bind(column: &str, value: impl Into<CatalogValue>) -> Self {
        Condition::Bind {
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn columns(column: &str, other: &str) -> Self {
        Condition::Columns {
            column: column.to_string(),
            other: other.to_string(),
        }
    }

    pub fn literal(column: &str, value: &str) -> Self {
        Condition::Literal {
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    fn render(&self, binds: &mut Vec<CatalogValue>) -> String {
        match self {
            Condition::Bind { column, value } => {
                binds.push(value.clone());
                format!("{} = :{}", column, binds.len())
            }
            Condition::Columns { column, other } => format!("{} = {}", column, other),
            Condition::Literal { column, value } => {
                format!("{} = {}", column, quote_literal(value))
            }
        }
    }
}

impl SelectQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds plain select expressions, `"t.owner schema_name"` style aliases included.
    pub fn select<S: AsRef<str>>(&mut self, expressions: impl IntoIterator<Item = S>) -> &mut Self {
        self.columns
            .extend(expressions.into_iter().map(|e| SelectItem::Expression {
                expression: e.as_ref().to_string(),
                alias: None,
            }));

        self
    }

    pub fn select_as(&mut self, expression: &str, alias: &str) -> &mut Self {
        self.columns.push(SelectItem::Expression {
            expression: expression.to_string(),
            alias: Some(alias.to_string()),
        });

        self
    }

    /// Adds `case when <condition> then <then> else <otherwise> end <alias>`.
    pub fn select_case(
        &mut self,
        condition: Condition,
        then: &str,
        otherwise: &str,
        alias: &str,
    ) -> &mut Self {
        self.columns.push(SelectItem::Case {
            condition,
            then: then.to_string(),
            otherwise: otherwise.to_string(),
            alias: alias.to_string(),
        });

        self
    }

    /// Adds a scalar subquery as a column.
    pub fn select_subquery(&mut self, query: SelectQueryBuilder, alias: &str) -> &mut Self {
        self.columns.push(SelectItem::Subquery {
            query: Box::new(query),
            alias: alias.to_string(),
        });

        self
    }

    pub fn from(&mut self, table: &str) -> &mut Self {
        self.from = table.to_string();

        self
    }

    pub fn join(&mut self, table: &str, on: impl IntoIterator<Item = Condition>) -> &mut Self {
        self.joins.push(Join {
            table: table.to_string(),
            on: on.into_iter().collect(),
        });

        self
    }

    pub fn and_where(&mut self, condition: Condition) -> &mut Self {
        self.conditions.push(condition);

        self
    }

    pub fn group_by<S: AsRef<str>>(&mut self, columns: impl IntoIterator<Item = S>) -> &mut Self {
        self.group_by
            .extend(columns.into_iter().map(|c| c.as_ref().to_string()));

        self
    }

    pub fn order_by<S: AsRef<str>>(&mut self, columns: impl IntoIterator<Item = S>) -> &mut Self {
        self.order_by
            .extend(columns.into_iter().map(|c| c.as_ref().to_string()));

        self
    }

    pub fn build(&self) -> SqlStatement {
        let mut binds = Vec::new();
        let sql = self.render("\n", &mut binds);

        SqlStatement { sql, binds }
    }

    fn render(&self, separator: &str, binds: &mut Vec<CatalogValue>) -> String {
        let mut sql = "select ".to_string();

        let columns = self
            .columns
            .iter()
            .map(|c| match c {
                SelectItem::Expression {
                    expression,
                    alias: Some(alias),
                } => format!("{} {}", expression, alias),
                SelectItem::Expression {
                    expression,
                    alias: None,
                } => expression.clone(),
                SelectItem::Case {
                    condition,
                    then,
                    otherwise,
                    alias,
                } => format!(
                    "case when {} then {} else {} end {}",
                    condition.render(binds),
                    then,
                    otherwise,
                    alias
                ),
                SelectItem::Subquery { query, alias } => {
                    format!("({}) {}", query.render(" ", binds), alias)
                }
            })
            .join(", ");
        sql.push_str(&columns);

        sql.push_str(separator);
        sql.push_str("from ");
        sql.push_str(&self.from);

        for join in &self.joins {
            sql.push_str(separator);
            sql.push_str("join ");
            sql.push_str(&join.table);
            sql.push_str(" on ");
            sql.push_str(&join.on.iter().map(|c| c.render(binds)).join(" and "));
        }

        if !self.conditions.is_empty() {
            sql.push_str(separator);
            sql.push_str("where ");
            sql.push_str(
                &self
                    .conditions
                    .iter()
                    .map(|c| c.render(binds))
                    .join(" and "),
            );
        }

        if !self.group_by.is_empty() {
            sql.push_str(separator);
            sql.push_str("group by ");
            sql.push_str(&self.group_by.join(", "));
        }

        if !self.order_by.is_empty() {
            sql.push_str(separator);
            sql.push_str("order by ");
            sql.push_str(&self.order_by.join(", "));
        }

        sql
    }
}

/// Quotes a string literal for Oracle, doubling embedded quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
