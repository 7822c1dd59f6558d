//! Translation of request filter parameters into query descriptors.
//!
//! Every list endpoint declares a [`QuerySpec`]: which query-string
//! parameters it understands, which column each one constrains and how the
//! rows are sorted. [`QuerySpec::build`] turns the request's [`FilterSet`]
//! into a [`QueryDescriptor`] that the repositories execute with bound
//! parameters.

use std::collections::HashMap;

use crate::pagination::Window;

/// Optional named request parameters. Blank values are dropped on
/// construction, so a blank parameter and a missing one behave the same.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    values: HashMap<String, String>,
}

impl FilterSet {
    pub fn new(values: HashMap<String, String>) -> Self {
        values.into_iter().collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl From<HashMap<String, String>> for FilterSet {
    fn from(values: HashMap<String, String>) -> Self {
        Self::new(values)
    }
}

impl<K, V> FromIterator<(K, V)> for FilterSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let values = iter
            .into_iter()
            .filter_map(|(key, value)| {
                let value = value.into().trim().to_string();
                (!value.is_empty()).then(|| (key.into(), value))
            })
            .collect();
        Self { values }
    }
}

/// How a request parameter constrains its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRule {
    /// `field = value`.
    Equals {
        param: &'static str,
        field: &'static str,
    },
    /// `field >= value`; the `*_inicio` half of a range.
    From {
        param: &'static str,
        field: &'static str,
    },
    /// `field <= value`; the `*_fim` half of a range.
    Until {
        param: &'static str,
        field: &'static str,
    },
    /// Case-insensitive substring match on any of `fields`.
    Search {
        param: &'static str,
        fields: &'static [&'static str],
    },
}

impl FilterRule {
    pub fn param(&self) -> &'static str {
        match self {
            FilterRule::Equals { param, .. }
            | FilterRule::From { param, .. }
            | FilterRule::Until { param, .. }
            | FilterRule::Search { param, .. } => param,
        }
    }

    fn predicate(&self, value: &str) -> Predicate {
        let value = value.to_string();
        match *self {
            FilterRule::Equals { field, .. } => Predicate::Equals { field, value },
            FilterRule::From { field, .. } => Predicate::AtLeast { field, value },
            FilterRule::Until { field, .. } => Predicate::AtMost { field, value },
            FilterRule::Search { fields, .. } => Predicate::Matches {
                fields,
                term: value,
            },
        }
    }
}

/// A single constraint applied to the query. Values stay textual here and
/// are coerced to the column type by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Equals {
        field: &'static str,
        value: String,
    },
    AtLeast {
        field: &'static str,
        value: String,
    },
    AtMost {
        field: &'static str,
        value: String,
    },
    Before {
        field: &'static str,
        value: String,
    },
    Matches {
        fields: &'static [&'static str],
        term: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl SortKey {
    pub const fn asc(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub const fn desc(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }
}

/// Static description of a list endpoint's filters and ordering.
#[derive(Debug, Clone, Copy)]
pub struct QuerySpec {
    pub rules: &'static [FilterRule],
    pub sort: &'static [SortKey],
}

impl QuerySpec {
    /// Applies every rule whose parameter is present. Parameters without a
    /// rule are ignored.
    pub fn build(&self, filters: &FilterSet) -> QueryDescriptor {
        let predicates = self
            .rules
            .iter()
            .filter_map(|rule| filters.get(rule.param()).map(|value| rule.predicate(value)))
            .collect();

        QueryDescriptor {
            predicates,
            sort: self.sort.to_vec(),
            window: None,
        }
    }
}

/// Predicates, ordering and row window for one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    predicates: Vec<Predicate>,
    sort: Vec<SortKey>,
    window: Option<Window>,
}

impl QueryDescriptor {
    pub fn new(sort: &[SortKey]) -> Self {
        Self {
            predicates: Vec::new(),
            sort: sort.to_vec(),
            window: None,
        }
    }

    /// Adds a fixed predicate on top of the request filters.
    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn paginate(mut self, window: Window) -> Self {
        self.window = Some(window);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn sort(&self) -> &[SortKey] {
        &self.sort
    }

    pub fn window(&self) -> Option<Window> {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEETINGS: QuerySpec = QuerySpec {
        rules: &[
            FilterRule::Equals {
                param: "projeto_id",
                field: "projeto_id",
            },
            FilterRule::Equals {
                param: "status",
                field: "status",
            },
            FilterRule::From {
                param: "data_inicio",
                field: "data_reuniao",
            },
            FilterRule::Until {
                param: "data_fim",
                field: "data_reuniao",
            },
            FilterRule::Search {
                param: "busca",
                fields: &["titulo", "descricao"],
            },
        ],
        sort: &[SortKey::desc("data_reuniao")],
    };

    #[test]
    fn empty_filter_set_yields_only_sort() {
        let descriptor = MEETINGS.build(&FilterSet::default());
        assert!(descriptor.predicates().is_empty());
        assert_eq!(descriptor.sort(), &[SortKey::desc("data_reuniao")]);
        assert_eq!(descriptor.window(), None);
    }

    #[test]
    fn blank_and_unknown_parameters_are_ignored() {
        let filters: FilterSet = [("status", "  "), ("unknown", "x"), ("page", "2")]
            .into_iter()
            .collect();
        let descriptor = MEETINGS.build(&filters);
        assert!(descriptor.predicates().is_empty());
    }

    #[test]
    fn range_bounds_apply_independently() {
        let only_start: FilterSet = [("data_inicio", "2025-01-01")].into_iter().collect();
        assert_eq!(
            MEETINGS.build(&only_start).predicates(),
            &[Predicate::AtLeast {
                field: "data_reuniao",
                value: "2025-01-01".to_string()
            }]
        );

        let both: FilterSet = [("data_inicio", "2025-01-01"), ("data_fim", "2025-01-31")]
            .into_iter()
            .collect();
        assert_eq!(
            MEETINGS.build(&both).predicates(),
            &[
                Predicate::AtLeast {
                    field: "data_reuniao",
                    value: "2025-01-01".to_string()
                },
                Predicate::AtMost {
                    field: "data_reuniao",
                    value: "2025-01-31".to_string()
                },
            ]
        );
    }

    #[test]
    fn equality_and_search_predicates_follow_rule_order() {
        let filters: FilterSet = [("busca", " kickoff "), ("projeto_id", "4")]
            .into_iter()
            .collect();
        let descriptor = MEETINGS.build(&filters);
        assert_eq!(
            descriptor.predicates(),
            &[
                Predicate::Equals {
                    field: "projeto_id",
                    value: "4".to_string()
                },
                Predicate::Matches {
                    fields: &["titulo", "descricao"],
                    term: "kickoff".to_string()
                },
            ]
        );
    }

    #[test]
    fn fixed_predicates_and_window_are_appended() {
        let window = Window {
            offset: 10,
            limit: 10,
        };
        let descriptor = QueryDescriptor::new(&[SortKey::asc("data_reuniao")])
            .with(Predicate::Equals {
                field: "status",
                value: "agendada".to_string(),
            })
            .paginate(window);
        assert_eq!(descriptor.predicates().len(), 1);
        assert_eq!(descriptor.window(), Some(window));
    }
}
