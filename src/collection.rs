use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;
use std::slice;

use tracing::debug;

use crate::error::{CollectionError, DuplicateIdentifierError, NotFoundError};
use crate::filter::{FilterState, StatusFilter};
use crate::metric::{DerivedStats, Metric, Scope, Stat, StatScope, StatValue};
use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Owns an ordered collection of records with unique identifiers.
///
/// Insertion order is the display order. Filtering and aggregation never
/// touch the collection, and each mutation either applies fully or
/// returns an error with nothing changed.
#[derive(Debug, Clone)]
pub struct CollectionView<R: Record> {
    records: Vec<R>,
}

impl<R: Record> CollectionView<R> {
    pub fn new(records: impl IntoIterator<Item = R>) -> Result<Self, DuplicateIdentifierError> {
        let records: Vec<R> = records.into_iter().collect();
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id()) {
                return Err(duplicate::<R>(record.id()));
            }
        }

        debug!(entity = R::ENTITY, count = records.len(), "collection initialized");
        Ok(Self { records })
    }

    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: &R::Id) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn contains(&self, id: &R::Id) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: &R::Id) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    pub fn apply_filter(&self, search: &str, status: StatusFilter<R::Status>) -> FilteredView<'_, R> {
        self.filter(&FilterState::new(search, status))
    }

    pub fn filter(&self, filter: &FilterState<R::Status>) -> FilteredView<'_, R> {
        FilteredView {
            records: &self.records,
            filter: filter.clone(),
        }
    }

    pub fn aggregate(&self, metric: &Metric<R::Status, R::Field>, scope: Scope<'_, R::Status>) -> f64 {
        match scope {
            Scope::Collection => metric.evaluate(&self.records),
            Scope::View(filter) => metric.evaluate(&self.filter(filter)),
        }
    }

    /// Evaluates each statistic over the scope it was declared with.
    pub fn derive(
        &self,
        stats: &[Stat<R::Status, R::Field>],
        filter: &FilterState<R::Status>,
    ) -> DerivedStats {
        let mut derived = DerivedStats::default();
        for stat in stats {
            let scope = match stat.scope {
                StatScope::Collection => Scope::Collection,
                StatScope::View => Scope::View(filter),
            };
            derived.push(StatValue {
                label: stat.label,
                scope: stat.scope,
                value: self.aggregate(&stat.metric, scope),
            });
        }
        derived
    }

    /// Distinct keys in first-seen order.
    pub fn distinct<K, F>(&self, key: F) -> Vec<K>
    where
        K: Eq + Hash + Clone,
        F: Fn(&R) -> K,
    {
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for record in &self.records {
            let value = key(record);
            if seen.insert(value.clone()) {
                values.push(value);
            }
        }
        values
    }

    pub fn add(&mut self, record: R) -> Result<(), DuplicateIdentifierError> {
        if self.contains(record.id()) {
            return Err(duplicate::<R>(record.id()));
        }

        debug!(entity = R::ENTITY, id = %record.id(), "record added");
        self.records.push(record);
        Ok(())
    }

    /// Replaces one record in place with the mutator's output.
    ///
    /// The mutator may change the identifier, but not to one held by
    /// another record.
    pub fn update<F>(&mut self, id: &R::Id, mutator: F) -> Result<(), CollectionError>
    where
        F: FnOnce(R) -> R,
    {
        let index = self.position(id).ok_or_else(|| not_found::<R>(id))?;
        let updated = mutator(self.records[index].clone());

        if updated.id() != id && self.contains(updated.id()) {
            return Err(duplicate::<R>(updated.id()).into());
        }

        debug!(entity = R::ENTITY, id = %id, "record updated");
        self.records[index] = updated;
        Ok(())
    }

    /// Removes a record, closing the gap it leaves.
    pub fn remove(&mut self, id: &R::Id) -> Result<R, NotFoundError> {
        let index = self.position(id).ok_or_else(|| not_found::<R>(id))?;

        debug!(entity = R::ENTITY, id = %id, "record removed");
        Ok(self.records.remove(index))
    }
}

impl<R: Record> Default for CollectionView<R> {
    fn default() -> Self {
        Self::empty()
    }
}

fn duplicate<R: Record>(id: &R::Id) -> DuplicateIdentifierError {
    DuplicateIdentifierError {
        entity: R::ENTITY,
        id: id.to_string(),
    }
}

fn not_found<R: Record>(id: &R::Id) -> NotFoundError {
    NotFoundError {
        entity: R::ENTITY,
        id: id.to_string(),
    }
}

/// Records of a collection that pass a filter, in collection order.
///
/// Nothing is evaluated until iterated, and every call to `iter` starts
/// over from the first record.
#[derive(Clone)]
pub struct FilteredView<'a, R: Record> {
    records: &'a [R],
    filter: FilterState<R::Status>,
}

impl<'a, R: Record> FilteredView<'a, R> {
    pub fn filter(&self) -> &FilterState<R::Status> {
        &self.filter
    }

    pub fn iter(&self) -> FilteredIter<'a, '_, R> {
        FilteredIter {
            inner: self.records.iter(),
            filter: &self.filter,
        }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn to_vec(&self) -> Vec<&'a R> {
        self.iter().collect()
    }

    /// Matching records ordered by a numeric field. Ties keep collection order.
    pub fn sorted_by(&self, field: R::Field, order: SortOrder) -> Vec<&'a R> {
        let mut records = self.to_vec();
        records.sort_by(|a, b| {
            let ordering = a
                .value(field)
                .partial_cmp(&b.value(field))
                .unwrap_or(Ordering::Equal);
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
        records
    }
}

impl<'v, 'a, R: Record> IntoIterator for &'v FilteredView<'a, R> {
    type Item = &'a R;
    type IntoIter = FilteredIter<'a, 'v, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct FilteredIter<'a, 'f, R: Record> {
    inner: slice::Iter<'a, R>,
    filter: &'f FilterState<R::Status>,
}

impl<'a, 'f, R: Record> Iterator for FilteredIter<'a, 'f, R> {
    type Item = &'a R;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = self.filter;
        self.inner.find(|record| filter.matches(*record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Course, CourseField, CourseStatus, Student, StudentField, StudentPlan, StudentStatus,
    };
    use crate::record::Tag;
    use crate::seed::Seeded;
    use chrono::NaiveDate;

    fn student(id: u32, name: &str, status: StudentStatus) -> Student {
        Student {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: String::new(),
            status,
            course: "Physics Fundamentals".to_string(),
            progress: 50,
            points: 100 * id,
            join_date: NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date"),
            tests_completed: 4,
            average_score: 70.0 + id as f64,
            rank: id,
            plan: StudentPlan::Basic,
        }
    }

    fn alice_and_bob() -> CollectionView<Student> {
        CollectionView::new(vec![
            student(1, "Alice", StudentStatus::Active),
            student(2, "Bob", StudentStatus::Inactive),
        ])
        .expect("unique ids")
    }

    fn ids<'a>(records: impl IntoIterator<Item = &'a Student>) -> Vec<u32> {
        records.into_iter().map(|record| record.id).collect()
    }

    #[test]
    fn status_filter_and_scoped_counts() {
        let view = alice_and_bob();
        let active = view.apply_filter("", StatusFilter::Only(StudentStatus::Active));

        assert_eq!(ids(&active), vec![1]);
        assert_eq!(view.aggregate(&Metric::Count, Scope::Collection), 2.0);
        assert_eq!(
            view.aggregate(&Metric::CountWhere(StudentStatus::Active), Scope::Collection),
            1.0
        );
        assert_eq!(view.aggregate(&Metric::Count, Scope::View(active.filter())), 1.0);
    }

    #[test]
    fn new_rejects_duplicate_identifiers() {
        let err = CollectionView::new(vec![
            student(1, "Alice", StudentStatus::Active),
            student(1, "Alicia", StudentStatus::Active),
        ])
        .unwrap_err();
        assert_eq!(err.entity, "student");
        assert_eq!(err.id, "1");
    }

    #[test]
    fn identity_filter_returns_everything_in_order() {
        let view = CollectionView::new(Student::seed().expect("seed")).expect("unique");
        let all = view.filter(&FilterState::default());

        assert!(all.filter().is_identity());
        assert_eq!(ids(&all), ids(view.records()));
        assert_eq!(all.len() as f64, view.aggregate(&Metric::Count, Scope::Collection));
    }

    #[test]
    fn empty_collection_filters_to_nothing() {
        let view: CollectionView<Student> = CollectionView::empty();
        let filtered = view.apply_filter("", StatusFilter::All);
        assert!(filtered.is_empty());
        assert_eq!(
            view.aggregate(&Metric::Average(StudentField::AverageScore), Scope::Collection),
            0.0
        );
    }

    #[test]
    fn filtering_is_deterministic_and_restartable() {
        let view = CollectionView::new(Course::seed().expect("seed")).expect("unique");
        let science = view.apply_filter("science", StatusFilter::All);

        let first = ids_of_courses(science.iter());
        let second = ids_of_courses(science.iter());
        let again = ids_of_courses(view.apply_filter("science", StatusFilter::All).iter());

        assert_eq!(first, vec![2, 3, 5]);
        assert_eq!(first, second);
        assert_eq!(first, again);
    }

    fn ids_of_courses<'a>(records: impl Iterator<Item = &'a Course>) -> Vec<u32> {
        records.map(|course| course.id).collect()
    }

    #[test]
    fn search_upper_case_matches_title() {
        let view = CollectionView::new(Course::seed().expect("seed")).expect("unique");
        let matches = view.apply_filter("MATH", StatusFilter::All).to_vec();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "Advanced Mathematics");
    }

    #[test]
    fn headline_stats_ignore_search_text() {
        let view = CollectionView::new(Course::seed().expect("seed")).expect("unique");
        let narrow = FilterState::new("art", StatusFilter::Only(CourseStatus::Completed));
        let wide = FilterState::default();

        let stats = [
            Stat::collection("Total Revenue", Metric::Sum(CourseField::Revenue)),
            Stat::view("Shown", Metric::Count),
        ];
        let narrow_stats = view.derive(&stats, &narrow);
        let wide_stats = view.derive(&stats, &wide);

        assert_eq!(narrow_stats.get("Total Revenue"), wide_stats.get("Total Revenue"));
        assert_eq!(narrow_stats.get("Shown"), Some(1.0));
        assert_eq!(wide_stats.get("Shown"), Some(6.0));
    }

    #[test]
    fn add_appends_and_rejects_duplicates() {
        let mut view = alice_and_bob();
        view.add(student(3, "Carol", StudentStatus::Suspended))
            .expect("new id");
        assert_eq!(ids(view.records()), vec![1, 2, 3]);

        let err = view
            .add(student(1, "Alice Again", StudentStatus::Active))
            .unwrap_err();
        assert_eq!(err.id, "1");
        assert_eq!(view.len(), 3);
        assert_eq!(view.get(&1).map(|s| s.name.as_str()), Some("Alice"));
    }

    #[test]
    fn add_then_remove_restores_collection() {
        let mut view = alice_and_bob();
        let before = ids(view.records());

        view.add(student(7, "Dan", StudentStatus::Active)).expect("new id");
        let removed = view.remove(&7).expect("present");

        assert_eq!(removed.name, "Dan");
        assert_eq!(ids(view.records()), before);
    }

    #[test]
    fn remove_missing_leaves_collection_unchanged() {
        let mut view = alice_and_bob();
        let err = view.remove(&99).unwrap_err();
        assert_eq!(err.to_string(), "student with id 99 not found");
        assert_eq!(ids(view.records()), vec![1, 2]);
    }

    #[test]
    fn remove_shifts_later_records() {
        let mut view = alice_and_bob();
        view.add(student(3, "Carol", StudentStatus::Active)).expect("new id");
        view.remove(&1).expect("present");
        assert_eq!(ids(view.records()), vec![2, 3]);
    }

    #[test]
    fn update_replaces_in_place() {
        let mut view = alice_and_bob();
        view.add(student(3, "Carol", StudentStatus::Active)).expect("new id");

        view.update(&2, |mut bob| {
            bob.status = StudentStatus::Suspended;
            bob
        })
        .expect("present");

        assert_eq!(ids(view.records()), vec![1, 2, 3]);
        assert_eq!(view.get(&2).map(|s| s.status), Some(StudentStatus::Suspended));
        assert_eq!(view.get(&1).map(|s| s.status), Some(StudentStatus::Active));
    }

    #[test]
    fn identity_update_changes_nothing() {
        let mut view = alice_and_bob();
        let before = view.records().to_vec();
        view.update(&1, |record| record).expect("present");
        assert_eq!(view.records(), before.as_slice());
    }

    #[test]
    fn update_missing_is_not_found() {
        let mut view = alice_and_bob();
        let err = view.update(&42, |record| record).unwrap_err();
        assert!(matches!(err, CollectionError::NotFound(_)));
    }

    #[test]
    fn update_cannot_take_another_records_id() {
        let mut view = alice_and_bob();
        let err = view
            .update(&2, |mut bob| {
                bob.id = 1;
                bob
            })
            .unwrap_err();

        assert!(matches!(err, CollectionError::DuplicateIdentifier(_)));
        assert_eq!(view.get(&2).map(|s| s.name.as_str()), Some("Bob"));
    }

    #[test]
    fn sorting_is_stable_and_leaves_collection_alone() {
        let view = CollectionView::new(Course::seed().expect("seed")).expect("unique");
        let all = view.apply_filter("", StatusFilter::All);

        let by_credits = all.sorted_by(CourseField::Credits, SortOrder::Descending);
        let credit_ids: Vec<u32> = by_credits.iter().map(|course| course.id).collect();
        assert_eq!(credit_ids, vec![4, 5, 1, 2, 6, 3]);

        let by_price = all.sorted_by(CourseField::Price, SortOrder::Ascending);
        assert_eq!(by_price.first().map(|course| course.id), Some(6));
        assert_eq!(
            view.records().iter().map(|course| course.id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5, 6]
        );
    }

    #[test]
    fn distinct_keeps_first_seen_order() {
        let view = CollectionView::new(Course::seed().expect("seed")).expect("unique");
        let categories = view.distinct(|course| course.category.clone());
        assert_eq!(
            categories,
            vec!["Mathematics", "Science", "Literature", "Technology", "Arts"]
        );
    }

    #[test]
    fn count_by_status_sums_to_total() {
        let view = CollectionView::new(Student::seed().expect("seed")).expect("unique");
        let total: f64 = StudentStatus::ALL
            .iter()
            .map(|status| view.aggregate(&Metric::CountWhere(*status), Scope::Collection))
            .sum();
        assert_eq!(total, view.len() as f64);
    }
}
