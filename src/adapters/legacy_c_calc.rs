use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::adapters::BackendAdapter;
use crate::canonical::{CanonicalRequest, CanonicalResponse, KIND_TOOL};
use crate::client::BackendClient;
use crate::error::GatewayResult;
use crate::registry;

/// Fixed success-shaped sentinel returned when no calculable expression is
/// found in the input. Not an error.
pub const NO_EXPRESSION_SENTINEL: &str = "（計算対象が見つかりませんでした）";

/// Legacy C calculator: POST /legacyC/calc
/// `{a, b, op}` -> `{res}`
pub struct LegacyCCalcAdapter {
    client: Arc<BackendClient>,
}

/// First `number operator number` span found in an input string.
/// `a` and `b` keep the original matched text so the result line can echo
/// the operands exactly as the user wrote them.
#[derive(Debug)]
struct ExprMatch<'a> {
    a: &'a str,
    op: char,
    b: &'a str,
    a_value: f64,
    b_value: f64,
}

fn is_operator(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '×' | '÷')
}

/// Scans `digits[.digits]` with an optional leading minus starting at byte
/// offset `start`; returns the end offset of the number on a match. A bare
/// trailing dot is not part of the number.
fn scan_number(s: &str, start: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = start;
    if i < bytes.len() && bytes[i] == b'-' {
        i += 1;
    }
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits_start {
        return None;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > frac_start {
            i = j;
        }
    }
    Some(i)
}

fn skip_whitespace(s: &str, i: usize) -> usize {
    s[i..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(off, _)| i + off)
        .unwrap_or(s.len())
}

fn match_at(s: &str, start: usize) -> Option<ExprMatch<'_>> {
    let a_end = scan_number(s, start)?;
    let op_start = skip_whitespace(s, a_end);
    let op = s[op_start..].chars().next().filter(|c| is_operator(*c))?;
    let b_start = skip_whitespace(s, op_start + op.len_utf8());
    let b_end = scan_number(s, b_start)?;

    let a = &s[start..a_end];
    let b = &s[b_start..b_end];
    Some(ExprMatch {
        a,
        op,
        b,
        a_value: a.parse().ok()?,
        b_value: b.parse().ok()?,
    })
}

/// Returns the first matching expression span, scanning left to right.
/// Anything before or after the first match is silently ignored, matching
/// the legacy contract's permissiveness.
fn find_expression(s: &str) -> Option<ExprMatch<'_>> {
    s.char_indices().find_map(|(i, _)| match_at(s, i))
}

/// The legacy backend only speaks `×` and `÷` for multiplication and
/// division; ASCII forms are normalized on the way in.
fn normalize_op(op: char) -> char {
    match op {
        '*' => '×',
        '/' => '÷',
        other => other,
    }
}

/// Renders the backend `res` value exactly as received, including
/// backend-defined division-by-zero outcomes.
fn render_result_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl LegacyCCalcAdapter {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BackendAdapter for LegacyCCalcAdapter {
    fn name(&self) -> &str {
        registry::TOOL_C
    }

    fn kind(&self) -> &str {
        KIND_TOOL
    }

    async fn invoke(&self, req: &CanonicalRequest) -> GatewayResult<CanonicalResponse> {
        let expr = req.input_str("expr").unwrap_or("");

        let Some(m) = find_expression(expr) else {
            let mut outputs = HashMap::new();
            outputs.insert(
                "result".to_string(),
                Value::String(NO_EXPRESSION_SENTINEL.to_string()),
            );
            return Ok(CanonicalResponse::ok(KIND_TOOL, outputs));
        };

        let op = normalize_op(m.op);
        let payload = json!({
            "a": m.a_value,
            "b": m.b_value,
            "op": op.to_string(),
        });
        let data = self.client.call("/legacyC/calc", &payload).await?;
        let res = data.get("res").cloned().unwrap_or(Value::Null);

        // operands echo the original matched text, not re-serialized numbers
        let result = format!("{}{}{} = {}", m.a, op, m.b, render_result_value(&res));

        let mut outputs = HashMap::new();
        outputs.insert("result".to_string(), Value::String(result));
        Ok(CanonicalResponse::ok(KIND_TOOL, outputs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use tokio::net::TcpListener;

    #[test]
    fn test_find_expression_basic() {
        let m = find_expression("3+4").unwrap();
        assert_eq!((m.a, m.op, m.b), ("3", '+', "4"));
        assert_eq!((m.a_value, m.b_value), (3.0, 4.0));
    }

    #[test]
    fn test_find_expression_first_match_in_surrounding_text() {
        let m = find_expression("合計は 12.5 × -3 です").unwrap();
        assert_eq!((m.a, m.op, m.b), ("12.5", '×', "-3"));
    }

    #[test]
    fn test_find_expression_ignores_trailing_content() {
        // everything after the first match is silently dropped
        let m = find_expression("3+4 and then 5*6").unwrap();
        assert_eq!((m.a, m.op, m.b), ("3", '+', "4"));
    }

    #[test]
    fn test_find_expression_minus_binds_to_second_operand() {
        let m = find_expression("5--3").unwrap();
        assert_eq!((m.a, m.op, m.b), ("5", '-', "-3"));
    }

    #[test]
    fn test_find_expression_bare_dot_is_not_a_fraction() {
        assert!(find_expression("3.+4").is_none());
        let m = find_expression("3.5.2+1").unwrap();
        assert_eq!((m.a, m.op, m.b), ("5.2", '+', "1"));
    }

    #[test]
    fn test_find_expression_no_match() {
        assert!(find_expression("hello").is_none());
        assert!(find_expression("").is_none());
    }

    #[test]
    fn test_normalize_op() {
        assert_eq!(normalize_op('*'), '×');
        assert_eq!(normalize_op('/'), '÷');
        assert_eq!(normalize_op('+'), '+');
        assert_eq!(normalize_op('×'), '×');
    }

    async fn start_mock_calc() -> String {
        let app = Router::new().route(
            "/legacyC/calc",
            post(|Json(body): Json<Value>| async move {
                let a = body["a"].as_f64().unwrap();
                let b = body["b"].as_f64().unwrap();
                let res = match body["op"].as_str().unwrap() {
                    "+" => a + b,
                    "-" => a - b,
                    "×" => a * b,
                    "÷" if b == 0.0 => {
                        return Json(json!({"res": "Infinity"}));
                    }
                    "÷" => a / b,
                    _ => f64::NAN,
                };
                if res.fract() == 0.0 {
                    Json(json!({"res": res as i64}))
                } else {
                    Json(json!({"res": res}))
                }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_invoke_formats_result_from_original_operand_text() {
        let base = start_mock_calc().await;
        let adapter = LegacyCCalcAdapter::new(Arc::new(BackendClient::new(base)));
        let req = CanonicalRequest::new(KIND_TOOL).with_input("expr", "3+4");
        let resp = adapter.invoke(&req).await.unwrap();
        assert_eq!(resp.outputs["result"], json!("3+4 = 7"));
        assert!(resp.errors.is_empty());
    }

    #[tokio::test]
    async fn test_invoke_normalizes_ascii_operators() {
        let base = start_mock_calc().await;
        let adapter = LegacyCCalcAdapter::new(Arc::new(BackendClient::new(base)));
        let req = CanonicalRequest::new(KIND_TOOL).with_input("expr", "3*4");
        let resp = adapter.invoke(&req).await.unwrap();
        assert_eq!(resp.outputs["result"], json!("3×4 = 12"));
    }

    #[tokio::test]
    async fn test_invoke_surfaces_division_by_zero_result_unmodified() {
        let base = start_mock_calc().await;
        let adapter = LegacyCCalcAdapter::new(Arc::new(BackendClient::new(base)));
        let req = CanonicalRequest::new(KIND_TOOL).with_input("expr", "10/0");
        let resp = adapter.invoke(&req).await.unwrap();
        assert_eq!(resp.outputs["result"], json!("10÷0 = Infinity"));
        assert!(resp.errors.is_empty());
    }

    #[tokio::test]
    async fn test_invoke_without_expression_returns_sentinel() {
        // no backend at all: the sentinel path must not touch the network
        let adapter =
            LegacyCCalcAdapter::new(Arc::new(BackendClient::new("http://127.0.0.1:9")));
        let req = CanonicalRequest::new(KIND_TOOL).with_input("expr", "hello");
        let resp = adapter.invoke(&req).await.unwrap();
        assert_eq!(resp.outputs["result"], json!(NO_EXPRESSION_SENTINEL));
        assert!(resp.errors.is_empty());
    }
}
