//! Serializable results handed back to JavaScript.

use anyhow::{anyhow, bail, Context};
use fdm_core::{
    coefficients, convert, matrix_with_boundary, BigRational, BoundaryPolicy, Scheme,
};
use serde::{Deserialize, Serialize};

/// One stencil weight, exact as decimal strings plus its nearest `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightPayload {
    pub offset: i64,
    pub numerator: String,
    pub denominator: String,
    pub value: f64,
}

/// CSR arrays of an operator, ready for a JavaScript sparse matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorPayload {
    pub nrows: usize,
    pub ncols: usize,
    pub row_offsets: Vec<usize>,
    pub col_indices: Vec<usize>,
    pub values: Vec<f64>,
}

pub fn weight_payload(scheme: &Scheme) -> anyhow::Result<Vec<WeightPayload>> {
    let table = coefficients::<BigRational>(scheme)?;
    table
        .iter()
        .map(|(offset, weight)| {
            let value = convert::<BigRational, f64>(weight)
                .ok_or_else(|| anyhow!("weight at offset {offset} does not fit in f64"))?;
            Ok(WeightPayload {
                offset,
                numerator: weight.numer().to_string(),
                denominator: weight.denom().to_string(),
                value,
            })
        })
        .collect()
}

pub fn operator_payload(
    grid_size: usize,
    scheme: &Scheme,
    spacing: f64,
    policy: BoundaryPolicy,
) -> anyhow::Result<OperatorPayload> {
    let operator = matrix_with_boundary::<BigRational, f64>(grid_size, scheme, spacing, policy)
        .with_context(|| format!("assembling {grid_size}x{grid_size} operator"))?;
    Ok(OperatorPayload {
        nrows: operator.nrows(),
        ncols: operator.ncols(),
        row_offsets: operator.row_offsets().to_vec(),
        col_indices: operator.col_indices().to_vec(),
        values: operator.values().to_vec(),
    })
}

/// Accepts `one_sided`/`one-sided`/`onesided` and `truncate`; missing means the default.
pub fn parse_boundary(name: Option<&str>) -> anyhow::Result<BoundaryPolicy> {
    let Some(name) = name else {
        return Ok(BoundaryPolicy::default());
    };
    match name.trim().to_ascii_lowercase().as_str() {
        "one_sided" | "one-sided" | "onesided" => Ok(BoundaryPolicy::OneSided),
        "truncate" => Ok(BoundaryPolicy::Truncate),
        other => bail!("Unknown boundary policy '{other}'"),
    }
}
