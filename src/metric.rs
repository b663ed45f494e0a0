use serde::Serialize;

use crate::filter::{FilterState, StatusFilter};
use crate::record::{Field, Record, Status};

/// An aggregate over a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric<S, F> {
    Count,
    CountWhere(S),
    Sum(F),
    SumWhere(F, StatusFilter<S>),
    /// Mean of a field; zero records average to 0.
    Average(F),
}

impl<S: Status, F: Field> Metric<S, F> {
    pub fn evaluate<'a, R, I>(&self, records: I) -> f64
    where
        R: Record<Status = S, Field = F> + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let records = records.into_iter();
        match *self {
            Metric::Count => records.count() as f64,
            Metric::CountWhere(status) => records
                .filter(|record| record.status() == status)
                .count() as f64,
            Metric::Sum(field) => records.map(|record| record.value(field)).sum(),
            Metric::SumWhere(field, predicate) => records
                .filter(|record| predicate.matches(record.status()))
                .map(|record| record.value(field))
                .sum(),
            Metric::Average(field) => {
                let (total, count) = records.fold((0.0, 0usize), |(total, count), record| {
                    (total + record.value(field), count + 1)
                });
                if count == 0 {
                    0.0
                } else {
                    total / count as f64
                }
            }
        }
    }
}

/// Which records an aggregate is evaluated over.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'f, S> {
    /// The whole collection, regardless of any active filter.
    Collection,
    /// Only the records that pass the given filter.
    View(&'f FilterState<S>),
}

/// Declared scope of a displayed statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatScope {
    Collection,
    View,
}

/// A labelled statistic with its scope fixed at declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat<S, F> {
    pub label: &'static str,
    pub metric: Metric<S, F>,
    pub scope: StatScope,
}

impl<S, F> Stat<S, F> {
    pub const fn collection(label: &'static str, metric: Metric<S, F>) -> Self {
        Self {
            label,
            metric,
            scope: StatScope::Collection,
        }
    }

    pub const fn view(label: &'static str, metric: Metric<S, F>) -> Self {
        Self {
            label,
            metric,
            scope: StatScope::View,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatValue {
    pub label: &'static str,
    pub scope: StatScope,
    pub value: f64,
}

/// Values of a list of statistics, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DerivedStats {
    values: Vec<StatValue>,
}

impl DerivedStats {
    pub fn push(&mut self, value: StatValue) {
        self.values.push(value);
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|stat| stat.label == label)
            .map(|stat| stat.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub const RESULTS_SHOWN: &str = "Results shown";

/// Headline counters a list page shows above its results.
pub trait HeadlineStats: Record {
    /// Collection-scoped statistics; they must not move while the user types.
    fn headline_stats() -> Vec<Stat<Self::Status, Self::Field>>;

    /// Headline statistics followed by the view-scoped result count.
    fn page_stats() -> Vec<Stat<Self::Status, Self::Field>> {
        let mut stats = Self::headline_stats();
        stats.push(Stat::view(RESULTS_SHOWN, Metric::Count));
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Payment, PaymentField, PaymentStatus, Student, StudentField, StudentStatus,
    };
    use crate::record::Tag;
    use crate::seed::Seeded;

    #[test]
    fn average_of_nothing_is_zero() {
        let students: Vec<Student> = Vec::new();
        let average = Metric::<StudentStatus, _>::Average(StudentField::AverageScore).evaluate(&students);
        assert_eq!(average, 0.0);
        assert!(!average.is_nan());
    }

    #[test]
    fn sum_where_only_counts_matching_status() {
        let payments = Payment::seed().expect("seed payments");
        let revenue = Metric::SumWhere(
            PaymentField::Amount,
            StatusFilter::Only(PaymentStatus::Completed),
        )
        .evaluate(&payments);
        let gross = Metric::<PaymentStatus, _>::Sum(PaymentField::Amount).evaluate(&payments);

        assert!((revenue - (599.0 + 499.0 + 449.0)).abs() < 0.001);
        assert!((gross - (599.0 + 499.0 + 399.0 + 449.0 + 699.0)).abs() < 0.001);
    }

    #[test]
    fn count_where_over_every_status_equals_count() {
        let payments = Payment::seed().expect("seed payments");
        let total = Metric::<PaymentStatus, PaymentField>::Count.evaluate(&payments);
        let by_status: f64 = PaymentStatus::ALL
            .iter()
            .map(|status| Metric::<_, PaymentField>::CountWhere(*status).evaluate(&payments))
            .sum();
        assert_eq!(total, by_status);
    }

    #[test]
    fn page_stats_end_with_view_scoped_count() {
        let stats = Student::page_stats();
        let last = stats.last().expect("page stats");
        assert_eq!(last.label, RESULTS_SHOWN);
        assert_eq!(last.scope, StatScope::View);
        assert!(stats[..stats.len() - 1]
            .iter()
            .all(|stat| stat.scope == StatScope::Collection));
    }

    #[test]
    fn derived_stats_lookup_by_label() {
        let mut stats = DerivedStats::default();
        stats.push(StatValue {
            label: "Total",
            scope: StatScope::Collection,
            value: 3.0,
        });
        assert_eq!(stats.get("Total"), Some(3.0));
        assert_eq!(stats.get("Missing"), None);
        assert_eq!(stats.len(), 1);
    }
}
