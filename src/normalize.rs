// SPDX-License-Identifier: MIT

//! Response normalization for evaluation results
//!
//! The backend is loose about its response envelope: the result array may
//! arrive bare, wrapped under one of several field spellings, or as a JSON
//! string that itself contains JSON. Shape detection runs in a fixed
//! priority order so the precedence is a documented contract, and each
//! element is decoded into a strict [`ResultRow`] with per-element drop on
//! failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{CvRankError, Result};

/// One normalized candidate score record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Candidate name as reported by the backend
    pub candidate: String,
    /// Match score, clamped to 0..=100
    pub score: u8,
    /// Model explanation for the score (may be empty)
    pub explanation: String,
}

impl ResultRow {
    /// Up to two initials for avatar-style display, `??` when the name is blank
    pub fn initials(&self) -> String {
        let parts: Vec<&str> = self.candidate.split_whitespace().take(2).collect();
        if parts.is_empty() {
            return "??".to_string();
        }
        parts
            .iter()
            .filter_map(|p| p.chars().next())
            .flat_map(|c| c.to_uppercase())
            .collect()
    }
}

/// Recognized envelope shapes, in detection priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// The payload is itself the result array
    BareArray,
    /// Array under `RespuestaModelo`
    RespuestaModelo,
    /// Array under `respuestaModelo`
    RespuestaModeloLower,
    /// Array under `data.RespuestaModelo`
    DataRespuestaModelo,
    /// No recognizable array anywhere
    Unrecognized,
}

/// Detect which envelope shape a payload uses.
///
/// Priority is fixed: bare array, then `RespuestaModelo`, then
/// `respuestaModelo`, then `data.RespuestaModelo`. The first shape whose
/// array is actually present wins.
pub fn detect_shape(payload: &Value) -> ResponseShape {
    if payload.is_array() {
        return ResponseShape::BareArray;
    }
    if payload.get("RespuestaModelo").map_or(false, Value::is_array) {
        return ResponseShape::RespuestaModelo;
    }
    if payload.get("respuestaModelo").map_or(false, Value::is_array) {
        return ResponseShape::RespuestaModeloLower;
    }
    if payload
        .pointer("/data/RespuestaModelo")
        .map_or(false, Value::is_array)
    {
        return ResponseShape::DataRespuestaModelo;
    }
    ResponseShape::Unrecognized
}

/// Extract the result array for a detected shape, empty when unrecognized
fn extract_array(payload: &Value, shape: ResponseShape) -> &[Value] {
    let found = match shape {
        ResponseShape::BareArray => payload.as_array(),
        ResponseShape::RespuestaModelo => {
            payload.get("RespuestaModelo").and_then(Value::as_array)
        }
        ResponseShape::RespuestaModeloLower => {
            payload.get("respuestaModelo").and_then(Value::as_array)
        }
        ResponseShape::DataRespuestaModelo => payload
            .pointer("/data/RespuestaModelo")
            .and_then(Value::as_array),
        ResponseShape::Unrecognized => None,
    };
    found.map(Vec::as_slice).unwrap_or(&[])
}

/// Unwrap a payload that arrived as a JSON string containing JSON.
///
/// A parse failure is tolerated silently: the original string value is kept
/// and falls through to shape detection, which will not find an array in it.
fn unwrap_nested(payload: Value) -> Value {
    if let Value::String(s) = &payload {
        if let Ok(inner) = serde_json::from_str::<Value>(s) {
            return inner;
        }
    }
    payload
}

/// Coerce a raw score value to an integer in 0..=100.
///
/// Numbers and numeric strings are accepted; anything else (including a
/// missing field) collapses to 0. Rounding is half-up, then the result is
/// clamped to the valid range.
fn coerce_score(raw: Option<&Value>) -> u8 {
    let n = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(n) if n.is_finite() => n.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}

/// Decode one raw element into a result row.
///
/// The element is kept only if it carries a string candidate name under
/// `postulante` or `name`; everything else about it is coerced rather than
/// rejected, so one malformed field never drops the row.
fn decode_row(raw: &Value) -> Option<ResultRow> {
    let postulante = raw.get("postulante").and_then(Value::as_str);
    let name = raw.get("name").and_then(Value::as_str);

    // Kept only when at least one name key holds a string
    postulante.or(name)?;

    // A blank value under one key falls through to the other before the
    // placeholder is used
    let candidate = [postulante, name]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .unwrap_or("Postulante")
        .to_string();

    let explanation = ["explanation", "descripcion"]
        .iter()
        .find_map(|k| raw.get(*k).and_then(Value::as_str))
        .unwrap_or("")
        .to_string();

    Some(ResultRow {
        candidate,
        score: coerce_score(raw.get("score")),
        explanation,
    })
}

/// Normalize a raw backend payload into ranked result rows.
///
/// Rows are sorted descending by score with a stable sort, so tied scores
/// keep the backend's ordering. An empty final list is
/// [`CvRankError::NoResults`], distinct from a payload the client could not
/// read at all.
pub fn normalize(payload: Value) -> Result<Vec<ResultRow>> {
    let payload = unwrap_nested(payload);

    let shape = detect_shape(&payload);
    tracing::debug!("Detected response shape: {:?}", shape);

    let mut rows: Vec<ResultRow> = extract_array(&payload, shape)
        .iter()
        .filter_map(decode_row)
        .collect();

    rows.sort_by(|a, b| b.score.cmp(&a.score));

    if rows.is_empty() {
        return Err(CvRankError::NoResults);
    }
    Ok(rows)
}
