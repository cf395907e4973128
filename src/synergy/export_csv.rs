//! CSV export of a team breakdown.
//!
//! Columns: `kind,name,count`, where kind is `affinity` or `class`. Rows are
//! affinities first, then classes, each ranked by count.

use crate::synergy::breakdown::Breakdown;

#[derive(Debug, serde::Serialize)]
struct BreakdownRow<'a> {
    kind: &'static str,
    name: &'a str,
    count: u32,
}

pub fn breakdown_to_csv(breakdown: &Breakdown) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let affinities = breakdown
        .ranked_affinities()
        .into_iter()
        .map(|(name, count)| BreakdownRow { kind: "affinity", name, count });
    let classes = breakdown
        .ranked_classes()
        .into_iter()
        .map(|(name, count)| BreakdownRow { kind: "class", name, count });
    for row in affinities.chain(classes) {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
