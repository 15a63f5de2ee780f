//! Structural validation of a raw configuration document.
//!
//! Checks run in a fixed order and the first failure aborts:
//! layout → figsize → chart list → chart count → per chart (type, then data shape).
//! On success the typed [`Config`] is returned, so every downstream consumer
//! works on statically shaped data.

use crate::error::ValidationError;
use crate::models::{
    Axis, ChartData, ChartKind, ChartSpec, Config, DEFAULT_FIGSIZE, Layout, LineEntry, XY,
};
use serde_json::{Map, Value};

/// Validate a parsed configuration document.
///
/// ### Errors
/// The first violated precondition, see [`ValidationError`].
pub fn validate(doc: &Value) -> Result<Config, ValidationError> {
    let layout = validate_layout(doc)?;

    let charts = match doc.get("charts") {
        None => return Err(missing("charts")),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ValidationError::InvalidChartList),
    };
    if charts.is_empty() {
        return Err(ValidationError::EmptyChartList);
    }
    if charts.len() > layout.cells() {
        return Err(ValidationError::LayoutOverflow {
            charts: charts.len(),
            rows: layout.rows,
            columns: layout.columns,
        });
    }

    let charts = charts
        .iter()
        .enumerate()
        .map(|(index, chart)| validate_chart(index, chart))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "validated {} chart(s) for a {}x{} layout",
        charts.len(),
        layout.rows,
        layout.columns
    );
    Ok(Config { layout, charts })
}

fn missing(field: impl Into<String>) -> ValidationError {
    ValidationError::MissingField {
        field: field.into(),
    }
}

fn validate_layout(doc: &Value) -> Result<Layout, ValidationError> {
    let layout = doc.get("layout").ok_or_else(|| missing("layout"))?;

    // Presence of both dimensions is checked before either value.
    for key in ["rows", "columns"] {
        if layout.get(key).is_none() {
            return Err(missing(format!("layout.{key}")));
        }
    }
    let rows = grid_dimension(layout, "rows")?;
    let columns = grid_dimension(layout, "columns")?;
    if rows.checked_mul(columns).is_none() {
        return Err(ValidationError::InvalidLayout {
            field: "columns",
            reason: "rows × columns overflows".into(),
        });
    }

    let figsize = match layout.get("figsize") {
        None | Some(Value::Null) => DEFAULT_FIGSIZE,
        Some(Value::Array(pair)) if pair.len() == 2 => {
            let mut out = [0.0f64; 2];
            for (slot, v) in out.iter_mut().zip(pair) {
                *slot = v.as_f64().ok_or_else(|| ValidationError::InvalidLayout {
                    field: "figsize",
                    reason: "values must be numbers".into(),
                })?;
                if !(slot.is_finite() && *slot > 0.0) {
                    return Err(ValidationError::InvalidLayout {
                        field: "figsize",
                        reason: "values must be positive".into(),
                    });
                }
            }
            (out[0], out[1])
        }
        Some(_) => {
            return Err(ValidationError::InvalidLayout {
                field: "figsize",
                reason: "must be a list of two numbers".into(),
            });
        }
    };

    Ok(Layout {
        rows,
        columns,
        figsize,
    })
}

fn grid_dimension(layout: &Value, key: &'static str) -> Result<usize, ValidationError> {
    let value = &layout[key];
    match value.as_u64() {
        Some(n) if n >= 1 => Ok(n as usize),
        Some(_) => Err(ValidationError::InvalidLayout {
            field: key,
            reason: "must be at least 1".into(),
        }),
        None if value.as_i64().is_some() => Err(ValidationError::InvalidLayout {
            field: key,
            reason: "must be at least 1".into(),
        }),
        None => Err(ValidationError::InvalidLayout {
            field: key,
            reason: "must be an integer".into(),
        }),
    }
}

fn validate_chart(index: usize, chart: &Value) -> Result<ChartSpec, ValidationError> {
    let obj = chart
        .as_object()
        .ok_or(ValidationError::InvalidChartEntry { index })?;

    let kind = match obj.get("type") {
        None => return Err(missing(format!("charts[{index}].type"))),
        Some(Value::String(name)) => {
            name.parse::<ChartKind>()
                .map_err(|_| ValidationError::UnknownChartType {
                    index,
                    found: format!("'{name}'"),
                })?
        }
        Some(other) => {
            return Err(ValidationError::UnknownChartType {
                index,
                found: other.to_string(),
            });
        }
    };

    let empty = Map::new();
    let data = match obj.get("data") {
        None | Some(Value::Null) => &empty,
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(ValidationError::MalformedChartData {
                index,
                kind,
                field: "data".into(),
                reason: "must be an object".into(),
            });
        }
    };

    let fields = Fields::new(index, kind, data);
    let data = match kind {
        ChartKind::Line => ChartData::Line(fields.xy()?),
        ChartKind::Bar => ChartData::Bar(fields.xy()?),
        ChartKind::Scatter => ChartData::Scatter(fields.xy()?),
        ChartKind::MultiLine => ChartData::MultiLine {
            lines: fields.lines()?,
        },
        ChartKind::Smith => {
            fields.require_all(&["real", "imag"])?;
            let real = fields.numbers("real")?;
            let imag = fields.numbers("imag")?;
            fields.same_length("imag", imag.len(), "real", real.len())?;
            ChartData::Smith { real, imag }
        }
        ChartKind::Hist => ChartData::Hist {
            values: fields.numbers("values")?,
        },
        ChartKind::Heatmap => fields.heatmap()?,
        ChartKind::Pie => fields.pie()?,
    };

    Ok(ChartSpec {
        data,
        options: obj.get("options").cloned(),
    })
}

/// Field accessors for one chart's `data` object (or one `multi_line` entry).
struct Fields<'a> {
    index: usize,
    kind: ChartKind,
    data: &'a Map<String, Value>,
    prefix: String,
}

impl<'a> Fields<'a> {
    fn new(index: usize, kind: ChartKind, data: &'a Map<String, Value>) -> Self {
        Self {
            index,
            kind,
            data,
            prefix: String::new(),
        }
    }

    fn nested(&self, prefix: String, data: &'a Map<String, Value>) -> Self {
        Self {
            index: self.index,
            kind: self.kind,
            data,
            prefix,
        }
    }

    fn malformed(&self, field: &str, reason: impl Into<String>) -> ValidationError {
        ValidationError::MalformedChartData {
            index: self.index,
            kind: self.kind,
            field: format!("{}{}", self.prefix, field),
            reason: reason.into(),
        }
    }

    fn require(&self, field: &str) -> Result<&'a Value, ValidationError> {
        self.data
            .get(field)
            .ok_or_else(|| self.malformed(field, "is missing"))
    }

    fn require_all(&self, fields: &[&str]) -> Result<(), ValidationError> {
        fields.iter().try_for_each(|f| self.require(f).map(|_| ()))
    }

    fn sequence(&self, field: &str) -> Result<&'a Vec<Value>, ValidationError> {
        self.require(field)?
            .as_array()
            .ok_or_else(|| self.malformed(field, "must be a sequence"))
    }

    fn numbers(&self, field: &str) -> Result<Vec<f64>, ValidationError> {
        self.sequence(field)?
            .iter()
            .map(|v| {
                v.as_f64()
                    .ok_or_else(|| self.malformed(field, "must contain only numbers"))
            })
            .collect()
    }

    /// Text labels; numbers are accepted and rendered with their JSON spelling.
    fn labels(&self, field: &str) -> Result<Vec<String>, ValidationError> {
        self.sequence(field)?
            .iter()
            .map(|v| match v {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                _ => Err(self.malformed(field, "must contain only strings or numbers")),
            })
            .collect()
    }

    fn axis(&self, field: &str) -> Result<Axis, ValidationError> {
        let items = self.sequence(field)?;
        if items.iter().all(Value::is_number) {
            return self.numbers(field).map(Axis::Numeric);
        }
        if items.iter().all(Value::is_string) {
            return self.labels(field).map(Axis::Categorical);
        }
        Err(self.malformed(field, "must contain only numbers or only strings"))
    }

    fn same_length(
        &self,
        field: &str,
        len: usize,
        other: &str,
        other_len: usize,
    ) -> Result<(), ValidationError> {
        if len == other_len {
            Ok(())
        } else {
            Err(self.malformed(
                field,
                format!("has {len} entries but '{other}' has {other_len}"),
            ))
        }
    }

    fn xy(&self) -> Result<XY, ValidationError> {
        self.require_all(&["x", "y"])?;
        self.sequence("x")?;
        self.sequence("y")?;
        let x = self.axis("x")?;
        let y = self.numbers("y")?;
        self.same_length("y", y.len(), "x", x.len())?;
        Ok(XY { x, y })
    }

    fn lines(&self) -> Result<Vec<LineEntry>, ValidationError> {
        self.sequence("lines")?
            .iter()
            .enumerate()
            .map(|(j, line)| {
                let field = format!("lines[{j}]");
                let obj = line
                    .as_object()
                    .ok_or_else(|| self.malformed(&field, "must be an object"))?;
                let entry = self.nested(format!("{}{field}.", self.prefix), obj);
                let xy = entry.xy()?;
                let label = match obj.get("label") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(Value::Number(n)) => Some(n.to_string()),
                    Some(_) => return Err(entry.malformed("label", "must be a string")),
                };
                Ok(LineEntry {
                    xy,
                    style: obj.get("style").cloned(),
                    label,
                })
            })
            .collect()
    }

    fn heatmap(&self) -> Result<ChartData, ValidationError> {
        let rows = self.sequence("matrix")?;
        if rows.iter().any(|r| !r.is_array()) {
            return Err(self.malformed("matrix", "must be a sequence of sequences"));
        }
        if rows.is_empty() {
            return Err(self.malformed("matrix", "must contain at least one row"));
        }
        let mut matrix = Vec::with_capacity(rows.len());
        for (r, row) in rows.iter().enumerate() {
            let cells = row.as_array().map(Vec::as_slice).unwrap_or_default();
            let values = cells
                .iter()
                .map(|v| {
                    v.as_f64().ok_or_else(|| {
                        self.malformed(&format!("matrix[{r}]"), "must contain only numbers")
                    })
                })
                .collect::<Result<Vec<f64>, _>>()?;
            matrix.push(values);
        }
        let columns = matrix[0].len();
        if columns == 0 {
            return Err(self.malformed("matrix", "rows must not be empty"));
        }
        if let Some(r) = matrix.iter().position(|row| row.len() != columns) {
            return Err(self.malformed(
                &format!("matrix[{r}]"),
                format!("has {} columns but the first row has {columns}", matrix[r].len()),
            ));
        }

        let x_labels = self.optional_labels("x_labels")?;
        if let Some(labels) = &x_labels
            && labels.len() != columns
        {
            return Err(self.malformed(
                "x_labels",
                format!(
                    "has {} entries but 'matrix' has {columns} columns",
                    labels.len()
                ),
            ));
        }
        let y_labels = self.optional_labels("y_labels")?;
        if let Some(labels) = &y_labels
            && labels.len() != matrix.len()
        {
            return Err(self.malformed(
                "y_labels",
                format!(
                    "has {} entries but 'matrix' has {} rows",
                    labels.len(),
                    matrix.len()
                ),
            ));
        }

        Ok(ChartData::Heatmap {
            matrix,
            x_labels,
            y_labels,
        })
    }

    fn optional_labels(&self, field: &str) -> Result<Option<Vec<String>>, ValidationError> {
        match self.data.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.labels(field).map(Some),
        }
    }

    fn pie(&self) -> Result<ChartData, ValidationError> {
        self.require_all(&["labels", "sizes"])?;
        let label_count = self.sequence("labels")?.len();
        let size_count = self.sequence("sizes")?.len();
        self.same_length("sizes", size_count, "labels", label_count)?;

        let labels = self.labels("labels")?;
        let sizes = self.numbers("sizes")?;
        if sizes.iter().any(|s| *s < 0.0) {
            return Err(self.malformed("sizes", "must not contain negative values"));
        }
        if !sizes.is_empty() && sizes.iter().all(|s| *s == 0.0) {
            return Err(self.malformed("sizes", "must not sum to zero"));
        }
        Ok(ChartData::Pie { labels, sizes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn figsize_defaults_when_absent_or_null() {
        let doc = json!({
            "layout": {"rows": 1, "columns": 1, "figsize": null},
            "charts": [{"type": "hist", "data": {"values": [1, 2]}}]
        });
        let cfg = validate(&doc).unwrap();
        assert_eq!(cfg.layout.figsize, DEFAULT_FIGSIZE);
    }

    #[test]
    fn string_x_becomes_categorical_axis() {
        let doc = json!({
            "layout": {"rows": 1, "columns": 1},
            "charts": [{"type": "bar", "data": {"x": ["A", "B"], "y": [1, 2]}}]
        });
        let cfg = validate(&doc).unwrap();
        match &cfg.charts[0].data {
            ChartData::Bar(xy) => {
                assert_eq!(xy.x.categories().unwrap(), ["A".to_string(), "B".to_string()]);
                assert_eq!(xy.points(), vec![(0.0, 1.0), (1.0, 2.0)]);
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn missing_rows_is_reported_before_invalid_columns() {
        let doc = json!({"layout": {"columns": 0}, "charts": []});
        let err = validate(&doc).unwrap_err();
        assert_eq!(err.field(), Some("layout.rows"));
    }

    #[test]
    fn nested_line_fields_are_prefixed() {
        let doc = json!({
            "layout": {"rows": 1, "columns": 1},
            "charts": [{"type": "multi_line", "data": {"lines": [
                {"x": [1], "y": [1]},
                {"x": [1, 2], "y": "nope"}
            ]}}]
        });
        let err = validate(&doc).unwrap_err();
        assert_eq!(err.field(), Some("lines[1].y"));
        assert_eq!(err.chart_index(), Some(0));
    }
}
