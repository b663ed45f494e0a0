use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::collection::CollectionView;
use crate::record::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Parses CSV rows whose headers match the record's field names.
pub fn read_records<R, Rd>(source: Rd) -> anyhow::Result<Vec<R>>
where
    R: Record + DeserializeOwned,
    Rd: Read,
{
    let mut reader = csv::Reader::from_reader(source);
    let mut records = Vec::new();

    for (index, result) in reader.deserialize::<R>().enumerate() {
        // header is line 1
        let record = result.with_context(|| format!("invalid {} row on line {}", R::ENTITY, index + 2))?;
        records.push(record);
    }

    Ok(records)
}

/// Adds each record in order; rows whose id is already present are skipped.
pub fn import_records<R: Record>(view: &mut CollectionView<R>, records: Vec<R>) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for record in records {
        match view.add(record) {
            Ok(()) => summary.inserted += 1,
            Err(err) => {
                warn!(error = %err, "skipping duplicate row");
                summary.skipped += 1;
            }
        }
    }

    summary
}

pub fn import_csv<R>(view: &mut CollectionView<R>, csv_path: &Path) -> anyhow::Result<ImportSummary>
where
    R: Record + DeserializeOwned,
{
    let file = File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let records = read_records::<R, _>(file)
        .with_context(|| format!("failed to read {}", csv_path.display()))?;
    let summary = import_records(view, records);

    info!(
        entity = R::ENTITY,
        path = %csv_path.display(),
        inserted = summary.inserted,
        skipped = summary.skipped,
        "csv import finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Payment, PaymentMethod, PaymentStatus};
    use crate::seed::seeded_view;

    const PAYMENTS: &str = "\
id,student,email,course,amount,method,status,date,transaction_id
6,Frank Green,frank.green@email.com,Art History,349,paypal,refunded,2024-01-28,TXN006
2,Bob Smith,bob.smith@email.com,Physics Fundamentals,499,paypal,completed,2024-01-20,TXN002
7,Gina Hall,gina.hall@email.com,Chemistry Basics,399,bank_transfer,pending,2024-02-02,TXN007
";

    #[test]
    fn reads_rows_with_typed_enums_and_dates() {
        let payments: Vec<Payment> = read_records(PAYMENTS.as_bytes()).expect("valid csv");
        assert_eq!(payments.len(), 3);
        assert_eq!(payments[0].status, PaymentStatus::Refunded);
        assert_eq!(payments[2].method, PaymentMethod::BankTransfer);
        assert_eq!(payments[2].date.to_string(), "2024-02-02");
    }

    #[test]
    fn duplicate_ids_are_skipped_not_fatal() {
        let mut view = seeded_view::<Payment>().expect("seed");
        let payments = read_records(PAYMENTS.as_bytes()).expect("valid csv");
        let summary = import_records(&mut view, payments);

        assert_eq!(summary, ImportSummary { inserted: 2, skipped: 1 });
        let ids: Vec<u32> = view.records().iter().map(|payment| payment.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn unknown_status_names_the_line() {
        let csv = "\
id,student,email,course,amount,method,status,date,transaction_id
8,Hal Ives,hal@email.com,Art History,349,cash,disputed,2024-02-03,TXN008
";
        let err = read_records::<Payment, _>(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
