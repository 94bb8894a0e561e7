//! The expression codec: [Value] trees to and from tagged [ValueRecord]s.
//!
//! Encoding is a pure structural transform and cannot fail. Decoding is
//! the exact inverse and rejects anything it does not recognize: unknown
//! tags, wrong child counts for a variant's fixed arity, non-numeric
//! parameter indices, unregistered function names. It never guesses.

use bstr::ByteSlice;
use maku_eval::{functions, AssignOp, Origin, Value};

use crate::errors::DecodeError;
use crate::schema::ValueRecord;

pub(crate) const TAG_LITERAL: &str = "literal";
pub(crate) const TAG_SCRATCH: &str = "scratch";
pub(crate) const TAG_CONCAT: &str = "concat";
pub(crate) const TAG_REF: &str = "ref";
pub(crate) const TAG_PARAM: &str = "param";
pub(crate) const TAG_SUBST: &str = "subst";
pub(crate) const TAG_CALL: &str = "call";
pub(crate) const TAG_ASSIGN: &str = "assign";
pub(crate) const TAG_OPAQUE: &str = "opaque";
pub(crate) const TAG_IMMEDIATE: &str = "immediate";
pub(crate) const TAG_DEFERRED: &str = "deferred";
// Assignment wrappers use their operator token as the tag.

fn tagged(tag: &str) -> ValueRecord {
    ValueRecord {
        tag: tag.to_string(),
        ..ValueRecord::default()
    }
}

fn literal_record(text: &str) -> ValueRecord {
    ValueRecord {
        tag: TAG_LITERAL.to_string(),
        text: text.into(),
        ..ValueRecord::default()
    }
}

/// Encode one value into its tagged wire record.
pub fn encode_value(value: &Value) -> ValueRecord {
    match value {
        Value::Literal(text) => literal_record(text),
        Value::Scratch(bytes) => ValueRecord {
            text: bytes.clone(),
            ..tagged(TAG_SCRATCH)
        },
        Value::Concat(parts) => ValueRecord {
            children: parts.iter().map(encode_value).collect(),
            ..tagged(TAG_CONCAT)
        },
        Value::VarRef(name) => ValueRecord {
            children: vec![encode_value(name)],
            ..tagged(TAG_REF)
        },
        Value::ParamRef(index) => ValueRecord {
            text: index.to_string().into(),
            ..tagged(TAG_PARAM)
        },
        Value::Substitution {
            name,
            pattern,
            subst,
        } => ValueRecord {
            children: vec![encode_value(name), encode_value(pattern), encode_value(subst)],
            ..tagged(TAG_SUBST)
        },
        Value::Call { func, args } => {
            let mut children = Vec::with_capacity(args.len() + 1);
            children.push(literal_record(func.name));
            children.extend(args.iter().map(encode_value));
            ValueRecord {
                children,
                ..tagged(TAG_CALL)
            }
        }
        Value::EvalAssign { lhs, op, rhs } => ValueRecord {
            children: vec![literal_record(lhs), literal_record(op), encode_value(rhs)],
            ..tagged(TAG_ASSIGN)
        },
        Value::Opaque(text) => ValueRecord {
            text: text.as_str().into(),
            ..tagged(TAG_OPAQUE)
        },
        Value::Immediate { value, origin } => ValueRecord {
            text: value.clone(),
            origin: origin.to_string(),
            ..tagged(TAG_IMMEDIATE)
        },
        Value::Deferred { body, origin } => ValueRecord {
            origin: origin.to_string(),
            children: vec![encode_value(body)],
            ..tagged(TAG_DEFERRED)
        },
        Value::TargetScoped { op, inner } => ValueRecord {
            children: vec![encode_value(inner)],
            ..tagged(op.token())
        },
    }
}

fn malformed(record: &ValueRecord, what: impl AsRef<str>) -> DecodeError {
    DecodeError::MalformedExpression(format!("`{}`: {}", record.tag, what.as_ref()))
}

/// The record's text payload as UTF-8, or a decode failure.
fn utf8_text(record: &ValueRecord) -> Result<String, DecodeError> {
    record
        .text
        .to_str()
        .map(str::to_string)
        .map_err(|_| malformed(record, "text payload is not valid UTF-8"))
}

/// The record's children, checked against a variant's fixed arity.
fn arity(record: &ValueRecord, expected: usize) -> Result<&[ValueRecord], DecodeError> {
    if record.children.len() != expected {
        return Err(malformed(
            record,
            format!(
                "takes {} children, found {}",
                expected,
                record.children.len()
            ),
        ));
    }
    Ok(&record.children)
}

/// A child that must be a literal record, returned as its text.
fn literal_child(record: &ValueRecord, index: usize) -> Result<String, DecodeError> {
    let child = &record.children[index];
    if child.tag != TAG_LITERAL {
        return Err(malformed(
            record,
            format!("child {} must be a literal, found `{}`", index, child.tag),
        ));
    }
    utf8_text(child)
}

/// Decode one tagged record back into a [Value].
pub fn decode_value(record: &ValueRecord) -> Result<Value, DecodeError> {
    match record.tag.as_str() {
        TAG_LITERAL => Ok(Value::Literal(utf8_text(record)?)),
        TAG_SCRATCH => Ok(Value::Scratch(record.text.clone())),
        TAG_CONCAT => Ok(Value::Concat(
            record
                .children
                .iter()
                .map(decode_value)
                .collect::<Result<_, _>>()?,
        )),
        TAG_REF => {
            let children = arity(record, 1)?;
            Ok(Value::VarRef(Box::new(decode_value(&children[0])?)))
        }
        TAG_PARAM => {
            let index = utf8_text(record)?
                .parse::<u32>()
                .map_err(|_| malformed(record, "parameter index is not a number"))?;
            Ok(Value::ParamRef(index))
        }
        TAG_SUBST => {
            let children = arity(record, 3)?;
            Ok(Value::Substitution {
                name: Box::new(decode_value(&children[0])?),
                pattern: Box::new(decode_value(&children[1])?),
                subst: Box::new(decode_value(&children[2])?),
            })
        }
        TAG_CALL => {
            if record.children.is_empty() {
                return Err(malformed(record, "missing the function name child"));
            }
            let name = literal_child(record, 0)?;
            let func = functions::lookup(&name).ok_or(DecodeError::UnknownFunction(name))?;
            let args = record.children[1..]
                .iter()
                .map(decode_value)
                .collect::<Result<_, _>>()?;
            Ok(Value::Call { func, args })
        }
        TAG_ASSIGN => {
            arity(record, 3)?;
            Ok(Value::EvalAssign {
                lhs: literal_child(record, 0)?,
                op: literal_child(record, 1)?,
                rhs: Box::new(decode_value(&record.children[2])?),
            })
        }
        TAG_OPAQUE => Ok(Value::Opaque(utf8_text(record)?)),
        TAG_IMMEDIATE => {
            arity(record, 0)?;
            Ok(Value::Immediate {
                value: record.text.clone(),
                origin: Origin::from_tag(&record.origin),
            })
        }
        TAG_DEFERRED => {
            let children = arity(record, 1)?;
            Ok(Value::Deferred {
                body: Box::new(decode_value(&children[0])?),
                origin: Origin::from_tag(&record.origin),
            })
        }
        other => match AssignOp::from_token(other) {
            Some(op) => {
                let children = arity(record, 1)?;
                let inner = decode_value(&children[0])?;
                if !inner.is_variable() {
                    return Err(DecodeError::TypeMismatch {
                        expected: "variable",
                        found: inner.kind(),
                    });
                }
                Ok(Value::TargetScoped {
                    op,
                    inner: Box::new(inner),
                })
            }
            None => Err(malformed(record, "unknown tag")),
        },
    }
}

/// Decode a record that must yield a variable form, e.g. a global table
/// entry or a scoped-variable pool slot.
pub fn decode_var(record: &ValueRecord) -> Result<Value, DecodeError> {
    let value = decode_value(record)?;
    if !value.is_variable() {
        return Err(DecodeError::TypeMismatch {
            expected: "variable",
            found: value.kind(),
        });
    }
    Ok(value)
}
