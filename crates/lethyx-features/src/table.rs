//! Feature and pair table writers.
//!
//! CSV tables carry `gene_a,gene_b[,label]` followed by every feature
//! column; features that were not estimated are left empty. JSON-lines
//! output writes one flat object per pair with only the estimated features.

use std::io::Write;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::combined::PairFeatures;

/// Write a feature table. `labels`, when given, must align with `features`.
pub fn write_features_csv<W: Write>(
    writer: W,
    features: &[PairFeatures],
    labels: Option<&[u8]>,
) -> Result<()> {
    if let Some(labels) = labels {
        anyhow::ensure!(
            labels.len() == features.len(),
            "{} labels for {} feature rows",
            labels.len(),
            features.len()
        );
    }

    let mut csv = csv::Writer::from_writer(writer);
    let mut header = vec!["gene_a", "gene_b"];
    if labels.is_some() {
        header.push("label");
    }
    header.extend(PairFeatures::columns());
    csv.write_record(&header)?;

    for (i, f) in features.iter().enumerate() {
        let mut record = vec![f.gene_a.clone(), f.gene_b.clone()];
        if let Some(labels) = labels {
            record.push(labels[i].to_string());
        }
        record.extend(f.to_row().into_iter().map(format_value));
        csv.write_record(&record)?;
    }
    csv.flush().context("Failed to flush feature table")?;
    Ok(())
}

/// Write one JSON object per line.
pub fn write_features_jsonl<W: Write>(
    mut writer: W,
    features: &[PairFeatures],
    labels: Option<&[u8]>,
) -> Result<()> {
    for (i, f) in features.iter().enumerate() {
        let mut object = Map::new();
        object.insert("gene_a".into(), Value::from(f.gene_a.as_str()));
        object.insert("gene_b".into(), Value::from(f.gene_b.as_str()));
        if let Some(label) = labels.and_then(|l| l.get(i)) {
            object.insert("label".into(), Value::from(*label));
        }
        for (name, value) in f.to_map() {
            object.insert(name.into(), Value::from(value));
        }
        serde_json::to_writer(&mut writer, &Value::Object(object))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a two-column `gene_a,gene_b` table.
pub fn write_pairs_csv<W, I, P>(writer: W, pairs: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = P>,
    P: Into<(String, String)>,
{
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["gene_a", "gene_b"])?;
    let mut n = 0;
    for pair in pairs {
        let (a, b) = pair.into();
        csv.write_record([a, b])?;
        n += 1;
    }
    csv.flush()?;
    Ok(n)
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}
