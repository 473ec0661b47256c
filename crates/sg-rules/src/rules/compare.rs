//! Value comparisons shared by several rule types.
//!
//! Dates are compared as `YYYY-MM-DD` strings, which order the same way as
//! the dates they spell.

use polars::prelude::{DataType, Expr, lit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextMatch {
    Is,
    Contains,
    BeginsWith,
    EndsOn,
}

impl TextMatch {
    pub(crate) fn condition(self, column: Expr, value: &str) -> Expr {
        match self {
            Self::Is => column.eq(lit(value)),
            Self::Contains => column.str().contains_literal(lit(value)),
            Self::BeginsWith => column.str().starts_with(lit(value)),
            Self::EndsOn => column.str().ends_with(lit(value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateMatch {
    Before,
    After,
    Exactly,
}

impl DateMatch {
    pub(crate) fn condition(self, column: Expr, date: &str) -> Expr {
        match self {
            Self::Before => column.lt(lit(date)),
            Self::After => column.gt(lit(date)),
            Self::Exactly => column.eq(lit(date)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberMatch {
    Equal,
    Larger,
    LargerOrEqual,
    Smaller,
    SmallerOrEqual,
}

impl NumberMatch {
    /// `column` holds text; values that do not parse as numbers never match.
    pub(crate) fn condition(self, column: Expr, number: f64) -> Expr {
        let column = column.cast(DataType::Float64);
        match self {
            Self::Equal => column.eq(lit(number)),
            Self::Larger => column.gt(lit(number)),
            Self::LargerOrEqual => column.gt_eq(lit(number)),
            Self::Smaller => column.lt(lit(number)),
            Self::SmallerOrEqual => column.lt_eq(lit(number)),
        }
    }
}
