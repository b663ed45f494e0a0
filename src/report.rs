use std::fmt::{Display, Write};

use chrono::NaiveDate;
use serde::Serialize;

use crate::collection::CollectionView;
use crate::filter::FilterState;
use crate::metric::{HeadlineStats, Metric, Scope};
use crate::record::{Record, Tag};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSummary {
    pub status: &'static str,
    pub count: usize,
}

/// Record count per status over the whole collection, most common first.
pub fn summarize_by_status<R: Record>(view: &CollectionView<R>) -> Vec<StatusSummary> {
    let mut summaries: Vec<StatusSummary> = <R::Status as Tag>::ALL
        .iter()
        .map(|status| StatusSummary {
            status: status.as_str(),
            count: view.aggregate(&Metric::CountWhere(*status), Scope::Collection) as usize,
        })
        .filter(|summary| summary.count > 0)
        .collect();

    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

/// Whole numbers print without decimals, everything else with one.
pub fn format_value(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

pub fn build_report<R>(
    session: &Session,
    view: &CollectionView<R>,
    filter: &FilterState<R::Status>,
    generated_on: NaiveDate,
) -> String
where
    R: HeadlineStats + Display,
{
    let headline = view.derive(&R::headline_stats(), filter);
    let summaries = summarize_by_status(view);
    let results = view.filter(filter);

    let mut output = String::new();
    let title = capitalize(R::COLLECTION);

    let _ = writeln!(output, "# {title} Report");
    match session.user() {
        Some(user) => {
            let _ = writeln!(
                output,
                "Prepared for {} ({}) on {}",
                user.name, user.email, generated_on
            );
        }
        None => {
            let _ = writeln!(output, "Generated on {generated_on}");
        }
    }
    let search = if filter.search().is_empty() {
        "none".to_string()
    } else {
        format!("\"{}\"", filter.search())
    };
    let _ = writeln!(
        output,
        "Filter: search {}, status {}",
        search,
        filter.status().as_str()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");

    for stat in headline.iter() {
        let _ = writeln!(output, "- {}: {}", stat.label, format_value(stat.value));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Status Mix");

    if summaries.is_empty() {
        let _ = writeln!(output, "No {} recorded.", R::COLLECTION);
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(output, "- {}: {}", summary.status, summary.count);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Results");

    let shown = results.to_vec();
    let _ = writeln!(
        output,
        "Showing {} of {} {}.",
        shown.len(),
        view.len(),
        R::COLLECTION
    );

    if shown.is_empty() {
        let _ = writeln!(output, "No {} match this filter.", R::COLLECTION);
    } else {
        for record in shown {
            let _ = writeln!(output, "- {record}");
        }
    }

    output
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
