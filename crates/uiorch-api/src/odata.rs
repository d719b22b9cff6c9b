//! OData query options and response envelopes.
//!
//! Orchestrator's `/odata/` endpoints accept the standard system query
//! options and wrap collections as `{"@odata.count": n, "value": [...]}`.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Collection envelope returned by every OData list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ODataList<T> {
    /// Total matching entities; present only when `$count=true` was sent.
    #[serde(rename = "@odata.count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

impl<T> ODataList<T> {
    pub fn into_vec(self) -> Vec<T> {
        self.value
    }
}

/// Builder for `$filter` expressions.
///
/// Clauses are joined with ` and `. String values are quoted with OData's
/// doubled-apostrophe escaping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    clauses: Vec<String>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Field eq 'value'`
    pub fn eq_str(mut self, field: &str, value: &str) -> Self {
        self.clauses.push(format!("{field} eq {}", quote(value)));
        self
    }

    /// `Field eq value` for numbers, booleans, and enum literals.
    pub fn eq(mut self, field: &str, value: impl Display) -> Self {
        self.clauses.push(format!("{field} eq {value}"));
        self
    }

    /// `Field gt value`; dates are passed through as given.
    pub fn gt(mut self, field: &str, value: impl Display) -> Self {
        self.clauses.push(format!("{field} gt {value}"));
        self
    }

    /// `Field lt value`
    pub fn lt(mut self, field: &str, value: impl Display) -> Self {
        self.clauses.push(format!("{field} lt {value}"));
        self
    }

    /// `contains(Field,'value')`
    pub fn contains(mut self, field: &str, value: &str) -> Self {
        self.clauses
            .push(format!("contains({field},{})", quote(value)));
        self
    }

    /// Append a pre-built clause verbatim.
    pub fn raw(mut self, clause: impl Into<String>) -> Self {
        self.clauses.push(clause.into());
        self
    }

    /// Add `Field eq 'value'` only when `value` is present.
    pub fn eq_str_opt(self, field: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.eq_str(field, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// The joined expression, or `None` when no clause was added.
    pub fn build(&self) -> Option<String> {
        if self.clauses.is_empty() {
            None
        } else {
            Some(self.clauses.join(" and "))
        }
    }
}

/// OData system query options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ODataQuery {
    pub filter: Option<String>,
    pub select: Option<String>,
    pub expand: Option<String>,
    pub order_by: Option<String>,
    pub top: Option<u32>,
    pub skip: Option<u32>,
    pub count: bool,
}

impl ODataQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Use a [`Filter`] builder; an empty builder leaves `$filter` unset.
    pub fn with_filter(mut self, filter: &Filter) -> Self {
        self.filter = filter.build();
        self
    }

    pub fn select(mut self, fields: impl Into<String>) -> Self {
        self.select = Some(fields.into());
        self
    }

    pub fn expand(mut self, navigation: impl Into<String>) -> Self {
        self.expand = Some(navigation.into());
        self
    }

    pub fn order_by(mut self, order: impl Into<String>) -> Self {
        self.order_by = Some(order.into());
        self
    }

    pub fn top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn count(mut self, count: bool) -> Self {
        self.count = count;
        self
    }

    /// Render as query-string pairs (`$filter`, `$top`, …).
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(ref f) = self.filter {
            params.push(("$filter", f.clone()));
        }
        if let Some(ref s) = self.select {
            params.push(("$select", s.clone()));
        }
        if let Some(ref e) = self.expand {
            params.push(("$expand", e.clone()));
        }
        if let Some(ref o) = self.order_by {
            params.push(("$orderby", o.clone()));
        }
        if let Some(top) = self.top {
            params.push(("$top", top.to_string()));
        }
        if let Some(skip) = self.skip {
            params.push(("$skip", skip.to_string()));
        }
        if self.count {
            params.push(("$count", "true".to_owned()));
        }
        params
    }
}

impl From<Filter> for ODataQuery {
    fn from(filter: Filter) -> Self {
        Self::new().with_filter(&filter)
    }
}

/// Quote a string as an OData literal: `O'Brien` → `'O''Brien'`.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Quote a string for use inside a key or function-call path segment.
///
/// Besides OData quoting, characters that would end the path segment
/// (`/`, `?`, `#`) and `%` itself are percent-encoded.
pub fn literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    for ch in quote(value).chars() {
        match ch {
            '%' => out.push_str("%25"),
            '/' => out.push_str("%2F"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            other => out.push(other),
        }
    }
    out
}
