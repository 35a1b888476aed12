//! Composable query criteria.
//!
//! A domain declares one enum of criteria and implements [`Criterion`] for
//! it: `condition` renders the SQL predicate, `matches` evaluates the same
//! predicate against an in-memory item. A [`Specification`] ANDs any number
//! of them; an empty specification matches everything.

use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, ExprTrait};
use std::fmt;

pub trait Criterion: Clone + fmt::Debug + Send + Sync {
    type Item;

    fn condition(&self) -> Condition;

    fn matches(&self, item: &Self::Item) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Specification<C> {
    criteria: Vec<C>,
}

impl<C> Default for Specification<C> {
    fn default() -> Self {
        Self {
            criteria: Vec::new(),
        }
    }
}

impl<C: Criterion> Specification<C> {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn and(mut self, criterion: C) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn and_opt(self, criterion: Option<C>) -> Self {
        match criterion {
            Some(criterion) => self.and(criterion),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn criteria(&self) -> &[C] {
        &self.criteria
    }

    pub fn condition(&self) -> Condition {
        self.criteria
            .iter()
            .fold(Condition::all(), |acc, criterion| acc.add(criterion.condition()))
    }

    pub fn matches(&self, item: &C::Item) -> bool {
        self.criteria.iter().all(|criterion| criterion.matches(item))
    }

    /// Keeps the items that satisfy every criterion, preserving order.
    pub fn filter<'a, I>(&'a self, items: I) -> impl Iterator<Item = I::Item> + 'a
    where
        I: IntoIterator + 'a,
        I::Item: std::borrow::Borrow<C::Item>,
    {
        items
            .into_iter()
            .filter(move |item| self.matches(std::borrow::Borrow::borrow(item)))
    }
}

impl<C> From<C> for Specification<C> {
    fn from(criterion: C) -> Self {
        Self {
            criteria: vec![criterion],
        }
    }
}

impl<C> FromIterator<C> for Specification<C> {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self {
            criteria: iter.into_iter().collect(),
        }
    }
}

/// Trimmed search term, or `None` when blank.
pub fn normalize_term(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
}

/// `LOWER(column) LIKE '%term%'` with LIKE wildcards in `term` escaped.
pub fn contains_ignore_case<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    Expr::expr(Func::lower(Expr::col((column.entity_name(), column))))
        .like(LikeExpr::new(pattern).escape('\\'))
}

/// In-memory counterpart of [`contains_ignore_case`].
pub fn text_contains_ignore_case(haystack: Option<&str>, term: &str) -> bool {
    haystack
        .map(|value| value.to_lowercase().contains(&term.to_lowercase()))
        .unwrap_or(false)
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
