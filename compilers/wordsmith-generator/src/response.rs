//! Typed validation of question and hint payloads returned by a generative
//! service. Nothing from the payload is trusted until it passes here.

use std::collections::HashSet;

use nom::{
    bytes::complete::{tag, take_until},
    character::complete::{alphanumeric0, multispace0},
    sequence::{delimited, tuple},
    IResult,
};
use serde_json::{Map, Value};
use thiserror::Error;
use wordsmith_protocol::{Morpheme, Question, Role};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("empty payload")]
    EmptyPayload,
    #[error("payload is not valid JSON: {0}")]
    Unparseable(String),
    #[error("payload is not a JSON object")]
    NotAnObject,
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("field '{field}' should be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("field '{0}' is empty")]
    EmptyField(&'static str),
    #[error("element {index} of '{field}' has the wrong shape: {reason}")]
    WrongElementShape {
        field: &'static str,
        index: usize,
        reason: String,
    },
    #[error("bank tile {index} repeats '{text}'")]
    DuplicateTile { index: usize, text: String },
    #[error("part '{0}' does not appear in the bank")]
    PartNotInBank(String),
}

/// Parses a generated question of the form
/// `{"answer", "definition", "parts": [str], "bank": [{"text", "meaning", "role"}]}`.
/// A surrounding markdown code fence and prose before or after the object
/// are tolerated. Bank surfaces must be unique.
pub fn parse_question_response(raw: &str) -> Result<Question, SchemaError> {
    let body = json_body(raw)?;
    // Only the first JSON value counts; trailing chatter is ignored.
    let value = serde_json::Deserializer::from_str(body)
        .into_iter::<Value>()
        .next()
        .ok_or(SchemaError::EmptyPayload)?
        .map_err(|e| SchemaError::Unparseable(e.to_string()))?;
    let obj = value.as_object().ok_or(SchemaError::NotAnObject)?;

    let answer = required_text(obj, "answer")?;
    let definition = required_text(obj, "definition")?;

    let parts = required_array(obj, "parts")?
        .iter()
        .enumerate()
        .map(|(index, v)| match v.as_str().map(str::trim) {
            Some(s) if !s.is_empty() => Ok(s.to_string()),
            _ => Err(SchemaError::WrongElementShape {
                field: "parts",
                index,
                reason: "expected a non-empty string".to_string(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let bank = required_array(obj, "bank")?
        .iter()
        .enumerate()
        .map(|(index, v)| bank_tile(index, v))
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::new();
    for (index, tile) in bank.iter().enumerate() {
        if !seen.insert(tile.text.as_str()) {
            return Err(SchemaError::DuplicateTile {
                index,
                text: tile.text.clone(),
            });
        }
    }

    if let Some(missing) = parts.iter().find(|p| !bank.iter().any(|m| &m.text == *p)) {
        return Err(SchemaError::PartNotInBank(missing.clone()));
    }

    Ok(Question {
        answer,
        definition,
        parts,
        bank,
    })
}

/// A hint is free text; only emptiness is rejected.
pub fn parse_hint_response(raw: &str) -> Result<String, SchemaError> {
    let text = raw.trim().trim_matches('"').trim();
    if text.is_empty() {
        return Err(SchemaError::EmptyPayload);
    }
    Ok(text.to_string())
}

fn json_body(raw: &str) -> Result<&str, SchemaError> {
    if raw.trim().is_empty() {
        return Err(SchemaError::EmptyPayload);
    }
    let body = match code_fence(raw) {
        Ok((_, inner)) => inner.trim(),
        Err(_) => raw.trim(),
    };
    if body.is_empty() {
        return Err(SchemaError::EmptyPayload);
    }
    // Drop any prose before the object.
    match take_until::<_, _, nom::error::Error<&str>>("{")(body) {
        Ok((object, _prose)) => Ok(object),
        Err(_) => Ok(body),
    }
}

/// "```json\n ... \n```" -> the text between the fences.
fn code_fence(input: &str) -> IResult<&str, &str> {
    delimited(
        tuple((multispace0, tag("```"), alphanumeric0, multispace0)),
        take_until("```"),
        tag("```"),
    )(input)
}

fn required<'v>(obj: &'v Map<String, Value>, field: &'static str) -> Result<&'v Value, SchemaError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(SchemaError::MissingField(field)),
        Some(v) => Ok(v),
    }
}

fn required_text(obj: &Map<String, Value>, field: &'static str) -> Result<String, SchemaError> {
    let text = required(obj, field)?
        .as_str()
        .ok_or(SchemaError::WrongType { field, expected: "a string" })?
        .trim();
    if text.is_empty() {
        return Err(SchemaError::EmptyField(field));
    }
    Ok(text.to_string())
}

fn required_array<'v>(obj: &'v Map<String, Value>, field: &'static str) -> Result<&'v Vec<Value>, SchemaError> {
    let items = required(obj, field)?
        .as_array()
        .ok_or(SchemaError::WrongType { field, expected: "an array" })?;
    if items.is_empty() {
        return Err(SchemaError::EmptyField(field));
    }
    Ok(items)
}

fn bank_tile(index: usize, value: &Value) -> Result<Morpheme, SchemaError> {
    let shape = |reason: &str| SchemaError::WrongElementShape {
        field: "bank",
        index,
        reason: reason.to_string(),
    };
    let tile = value.as_object().ok_or_else(|| shape("expected an object"))?;
    let text = tile
        .get("text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| shape("missing 'text'"))?;
    let meaning = tile
        .get("meaning")
        .and_then(Value::as_str)
        .ok_or_else(|| shape("missing 'meaning'"))?;
    let role: Role = tile
        .get("role")
        .and_then(Value::as_str)
        .ok_or_else(|| shape("missing 'role'"))?
        .parse()
        .map_err(|_| shape("role must be prefix, root or suffix"))?;
    Ok(Morpheme::new(text, meaning.trim(), role))
}
